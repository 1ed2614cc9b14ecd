//! Widget and view traits, and the event outcome type.

use std::any::{Any, type_name};

use crate::{
    Context, ViewContext,
    error::Result,
    event::{Key, TouchEvent},
    paint::Painter,
};

/// The result of an event handler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EventOutcome {
    /// The event was consumed.
    Handle,
    /// The event was not handled.
    Ignore,
}

impl EventOutcome {
    /// Was the event consumed?
    pub fn is_handled(self) -> bool {
        self == Self::Handle
    }
}

impl From<bool> for EventOutcome {
    fn from(handled: bool) -> Self {
        if handled { Self::Handle } else { Self::Ignore }
    }
}

/// Widgets are the behavior attached to nodes in the Core arena.
///
/// Handlers receive a [`Context`] bound to their own node. While a handler
/// runs, the widget is out of its arena slot; a handler may therefore remove
/// its own node, in which case the widget is dropped once the handler returns.
pub trait Widget: Any {
    /// Can this widget take key focus? Sampled when the node is created.
    fn accept_focus(&self) -> bool {
        false
    }

    /// Paint this widget's own content. Does not paint children.
    fn paint(&mut self, _painter: &mut dyn Painter, _ctx: &dyn ViewContext) -> Result<()> {
        Ok(())
    }

    /// Handle a touch event. During hit testing, returning
    /// [`EventOutcome::Handle`] for a start event claims the gesture.
    fn on_touch(&mut self, _event: TouchEvent, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// Handle a key press. Only called on the focused widget.
    fn on_key(&mut self, _key: Key, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// Handle a rotary encoder step. Only called on the focused widget.
    fn on_encoder(&mut self, _delta: i32, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// Handle a character from an attached keyboard. Only called on the
    /// focused widget.
    fn on_keyboard(&mut self, _ch: u8, _ctx: &mut dyn Context) -> EventOutcome {
        EventOutcome::Ignore
    }

    /// Take focus. The default focuses the first focusable node in this
    /// widget's subtree, in pre-order.
    fn focus(&mut self, ctx: &mut dyn Context) {
        ctx.focus_first();
    }

    /// Periodic frame-sync hook, roughly 60 times a second.
    fn on_framesync(&mut self, _ctx: &mut dyn Context) {}

    /// Called exactly once when the widget is first attached under the root,
    /// before it is focused or painted. Widgets build their children here.
    fn on_mount(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        Ok(())
    }

    /// Name used in logs.
    fn name(&self) -> &'static str {
        let name = type_name::<Self>();
        name.rsplit("::").next().unwrap_or(name)
    }
}

/// A widget that represents one full navigable screen.
pub trait View: Widget {
    /// Human-readable title shown by the host chrome.
    fn title(&self) -> String {
        String::new()
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

/// Read the title of a view stored behind a type-erased widget.
pub(crate) fn view_title<V: View>(widget: &dyn Widget) -> Option<String> {
    let any = widget as &dyn Any;
    any.downcast_ref::<V>().map(View::title)
}
