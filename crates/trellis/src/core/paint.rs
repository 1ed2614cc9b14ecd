//! The painting capability consumed from the pixel backend, and the dirty-node
//! paint walk.

use tracing::trace;

use crate::{
    core::{context::CoreViewContext, id::NodeId, world::Core},
    error::Result,
    geom::{Point, Rect},
    style::{Color, Style},
};

/// Drawing primitives provided by the display backend. All coordinates are
/// in screen space.
pub trait Painter {
    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    /// Draw a one-pixel rectangle outline.
    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    /// Draw a single line of text with its top-left corner at `at`.
    fn draw_string(&mut self, at: Point, style: Style, text: &str) -> Result<()>;
}

/// Paint every dirty node under `root`, skipping hidden subtrees. Painting a
/// node repaints all of its descendants, since they are drawn over it.
pub fn paint_tree(core: &mut Core, root: NodeId, painter: &mut dyn Painter) -> Result<()> {
    paint_node(core, root, painter, false)
}

fn paint_node(
    core: &mut Core,
    node_id: NodeId,
    painter: &mut dyn Painter,
    forced: bool,
) -> Result<()> {
    let Some(node) = core.nodes.get_mut(node_id) else {
        return Ok(());
    };
    if node.hidden {
        return Ok(());
    }
    let paint = forced || node.dirty;
    if paint {
        node.dirty = false;
        trace!(node = ?node_id, name = node.name, "paint");
        core.with_widget_mut(node_id, |widget, core| {
            let ctx = CoreViewContext::new(core, node_id);
            widget.paint(painter, &ctx)
        })??;
    }
    for child in core.children_of(node_id) {
        paint_node(core, child, painter, paint)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        testing::{Probe, ProbeWidget, RecordingPainter},
    };

    #[test]
    fn clean_nodes_are_skipped() -> Result<()> {
        let mut core = Core::new(Config::default());
        let root = core.root_id();
        let probe = Probe::default();
        let a = core.add_child_to(root, ProbeWidget::new(probe.clone()), Rect::new(0, 0, 10, 10))?;
        core.add_child_to(a, ProbeWidget::new(probe.clone()), Rect::new(0, 0, 5, 5))?;

        let mut painter = RecordingPainter::default();
        paint_tree(&mut core, root, &mut painter)?;
        assert_eq!(probe.paints.get(), 2);

        paint_tree(&mut core, root, &mut painter)?;
        assert_eq!(probe.paints.get(), 2);

        core.set_dirty(a);
        paint_tree(&mut core, root, &mut painter)?;
        assert_eq!(probe.paints.get(), 4);
        Ok(())
    }

    #[test]
    fn hidden_subtrees_are_not_painted() -> Result<()> {
        let mut core = Core::new(Config::default());
        let root = core.root_id();
        let probe = Probe::default();
        let a = core.add_child_to(root, ProbeWidget::new(probe.clone()), Rect::new(0, 0, 10, 10))?;
        core.add_child_to(a, ProbeWidget::new(probe.clone()), Rect::new(0, 0, 5, 5))?;
        core.hide(a);

        let mut painter = RecordingPainter::default();
        paint_tree(&mut core, root, &mut painter)?;
        assert_eq!(probe.paints.get(), 0);

        core.show(a);
        paint_tree(&mut core, root, &mut painter)?;
        assert_eq!(probe.paints.get(), 2);
        Ok(())
    }
}
