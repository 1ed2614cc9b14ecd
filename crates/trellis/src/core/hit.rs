//! Recursive hit testing for touch-start events.

use tracing::trace;

use crate::{
    core::{context::CoreContext, id::NodeId, world::Core},
    event::TouchEvent,
};

/// Find the topmost widget under `root` that accepts `event`.
///
/// The walk is depth-first. Hidden subtrees are skipped, and children are
/// tested before their parent with later children first, so the most
/// recently added sibling wins where siblings overlap. A node is hit only if
/// its screen rectangle contains the point and its touch handler returns
/// [`EventOutcome::Handle`](crate::EventOutcome::Handle). The accepting
/// handler has therefore already seen the event when this returns.
pub fn hit_test(core: &mut Core, root: NodeId, event: TouchEvent) -> Option<NodeId> {
    let node = core.nodes.get(root)?;
    if node.hidden {
        return None;
    }
    let children = node.children.clone();
    for child in children.into_iter().rev() {
        if let Some(hit) = hit_test(core, child, event) {
            return Some(hit);
        }
    }

    let rect = core.screen_rect(root)?;
    if !rect.contains_point(event.point) {
        return None;
    }
    match core.with_widget_mut(root, |widget, core| {
        widget.on_touch(event, &mut CoreContext::new(core, root))
    }) {
        Ok(outcome) if outcome.is_handled() => {
            trace!(node = ?root, point = ?event.point, "hit");
            Some(root)
        }
        Ok(_) => None,
        Err(e) => {
            trace!(node = ?root, error = %e, "hit test skipped node");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        error::Result,
        event::TouchKind,
        geom::{Point, Rect},
        testing::{Probe, ProbeWidget},
    };

    fn start(x: i32, y: i32) -> TouchEvent {
        TouchEvent::new((x, y), TouchKind::Start)
    }

    #[test]
    fn later_sibling_wins() -> Result<()> {
        let mut core = Core::new(Config::default());
        let root = core.root_id();
        let first = core.add_child_to(
            root,
            ProbeWidget::new(Probe::default()).touchable(),
            Rect::new(0, 0, 100, 100),
        )?;
        let second = core.add_child_to(
            root,
            ProbeWidget::new(Probe::default()).touchable(),
            Rect::new(50, 50, 100, 100),
        )?;

        assert_eq!(hit_test(&mut core, root, start(75, 75)), Some(second.id()));
        assert_eq!(hit_test(&mut core, root, start(10, 10)), Some(first.id()));
        assert_eq!(hit_test(&mut core, root, start(200, 10)), None);
        Ok(())
    }

    #[test]
    fn declining_child_falls_through_to_parent() -> Result<()> {
        let mut core = Core::new(Config::default());
        let root = core.root_id();
        let parent_probe = Probe::default();
        let parent = core.add_child_to(
            root,
            ProbeWidget::new(parent_probe.clone()).touchable(),
            Rect::new(10, 10, 100, 100),
        )?;
        let child_probe = Probe::default();
        core.add_child_to(
            parent,
            ProbeWidget::new(child_probe.clone()),
            Rect::new(0, 0, 50, 50),
        )?;

        assert_eq!(hit_test(&mut core, root, start(20, 20)), Some(parent.id()));
        assert_eq!(child_probe.touches.borrow().len(), 1);
        assert_eq!(
            parent_probe.touches.borrow().first().map(|e| e.point),
            Some(Point::new(20, 20))
        );
        Ok(())
    }

    #[test]
    fn hidden_subtrees_are_skipped() -> Result<()> {
        let mut core = Core::new(Config::default());
        let root = core.root_id();
        let probe = Probe::default();
        let a = core.add_child_to(
            root,
            ProbeWidget::new(probe.clone()).touchable(),
            Rect::new(0, 0, 100, 100),
        )?;
        core.hide(a);
        assert_eq!(hit_test(&mut core, root, start(5, 5)), None);
        assert!(probe.touches.borrow().is_empty());
        Ok(())
    }
}
