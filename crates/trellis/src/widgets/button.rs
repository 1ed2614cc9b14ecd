//! Button widget.

use crate::{
    Context, ViewContext,
    error::Result,
    event::{Key, TouchEvent, TouchKind},
    geom::Point,
    paint::Painter,
    style::Style,
    widget::{EventOutcome, Widget},
};

/// Action run when a button is selected.
pub type SelectFn = Box<dyn FnMut(&mut dyn Context)>;

/// A labelled button selected by touch release or the select key.
pub struct Button {
    /// Button label.
    label: String,
    /// Action to run on selection.
    on_select: Option<SelectFn>,
    /// A touch gesture started on this button and has not ended.
    pressed: bool,
    /// Colors for the idle state. Focused and pressed states invert them.
    style: Style,
}

impl Button {
    /// Construct a new button with a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on_select: None,
            pressed: false,
            style: Style::default(),
        }
    }

    /// Build a button that runs `f` when selected.
    pub fn with_on_select(mut self, f: impl FnMut(&mut dyn Context) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// Return the button label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Is a touch gesture in progress on this button?
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Trigger the button action. The action may destroy this button.
    pub fn select(&mut self, ctx: &mut dyn Context) {
        if let Some(mut f) = self.on_select.take() {
            f(ctx);
            self.on_select = Some(f);
        }
    }
}

impl Widget for Button {
    fn accept_focus(&self) -> bool {
        true
    }

    fn paint(&mut self, painter: &mut dyn Painter, ctx: &dyn ViewContext) -> Result<()> {
        let rect = ctx.screen_rect();
        let style = if self.pressed || ctx.is_focused() {
            self.style.invert()
        } else {
            self.style
        };
        painter.fill_rect(rect, style.bg)?;
        painter.draw_rect(rect, style.fg)?;

        let config = ctx.config();
        let text_w = config.cells_wide(self.label.chars().count() as u32);
        let x = rect.left() + (rect.w.saturating_sub(text_w) / 2) as i32;
        let y = rect.top() + (rect.h.saturating_sub(config.line_height) / 2) as i32;
        painter.draw_string(Point::new(x, y), style, &self.label)
    }

    fn on_touch(&mut self, event: TouchEvent, ctx: &mut dyn Context) -> EventOutcome {
        match event.kind {
            TouchKind::Start => {
                self.pressed = true;
                ctx.set_dirty();
            }
            TouchKind::Move => {}
            TouchKind::End => {
                if self.pressed {
                    self.pressed = false;
                    ctx.set_dirty();
                    self.select(ctx);
                }
            }
        }
        EventOutcome::Handle
    }

    fn on_key(&mut self, key: Key, ctx: &mut dyn Context) -> EventOutcome {
        if key == Key::Select {
            self.select(ctx);
            EventOutcome::Handle
        } else {
            EventOutcome::Ignore
        }
    }

    fn name(&self) -> &'static str {
        "button"
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::{
        Core, FocusManager,
        config::Config,
        geom::Rect,
        paint::paint_tree,
        testing::{PaintOp, RecordingPainter},
    };

    fn counting_button(label: &str) -> (Button, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let button = Button::new(label).with_on_select(move |_| c.set(c.get() + 1));
        (button, count)
    }

    #[test]
    fn touch_release_selects() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (button, count) = counting_button("OK");
        let id = core.add_child_to(core.root_id(), button, Rect::new(0, 0, 80, 48))?;

        let start = TouchEvent::new((5, 5), TouchKind::Start);
        let end = TouchEvent::new((500, -5), TouchKind::End);
        assert!(core.dispatch_touch(id.id(), start)?.is_handled());
        assert!(core.with_typed(id, |b, _| b.is_pressed())?);
        assert_eq!(count.get(), 0);
        assert!(core.dispatch_touch(id.id(), end)?.is_handled());
        assert_eq!(count.get(), 1);

        // A release without a press does nothing.
        core.dispatch_touch(id.id(), end)?;
        assert_eq!(count.get(), 1);
        Ok(())
    }

    #[test]
    fn select_key_selects() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (button, count) = counting_button("OK");
        let id = core.add_child_to(core.root_id(), button, Rect::new(0, 0, 80, 48))?;
        assert!(core.dispatch_key(id.id(), Key::Select)?.is_handled());
        assert!(!core.dispatch_key(id.id(), Key::Down)?.is_handled());
        assert_eq!(count.get(), 1);
        Ok(())
    }

    #[test]
    fn focused_button_paints_inverted() -> Result<()> {
        let mut core = Core::new(Config::default());
        let id = core.add_child_to(core.root_id(), Button::new("YES"), Rect::new(8, 8, 64, 48))?;
        core.set_focus(id.id());

        let root = core.root_id();
        let mut painter = RecordingPainter::default();
        paint_tree(&mut core, root, &mut painter)?;
        let inverted = Style::default().invert();
        assert!(painter.ops.contains(&PaintOp::Fill(Rect::new(8, 8, 64, 48), inverted.bg)));
        assert!(painter.ops.contains(&PaintOp::Text(
            Point::new(8 + (64 - 24) / 2, 8 + (48 - 16) / 2),
            inverted,
            "YES".into()
        )));
        Ok(())
    }
}
