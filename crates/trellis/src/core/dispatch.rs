//! Routing of raw input to widgets.

use tracing::{trace, warn};

use crate::{
    core::{focus::FocusManager, hit::hit_test, id::NodeId, world::Core},
    error::Result,
    event::{Key, TouchEvent, TouchKind},
    widget::EventOutcome,
};

/// Routes touch, key, encoder and keyboard input.
///
/// Touch-start events are hit tested from the root and the accepting widget
/// captures the gesture, start event included. Everything else goes to the focused
/// widget.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    /// Widget receiving the current touch gesture.
    capture: Option<NodeId>,
}

impl InputDispatcher {
    /// Construct a dispatcher with no gesture in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// The widget capturing the current gesture, if it is still attached.
    pub fn capture(&self, core: &Core) -> Option<NodeId> {
        self.capture.filter(|id| core.is_attached_to_root(*id))
    }

    /// Route a touch event. Returns `true` if a widget handled it.
    ///
    /// A start event is hit tested from `root`; the accepting widget is
    /// captured, focused and marked dirty, and then receives the start event
    /// again as the first event of its gesture.
    pub fn touch(&mut self, core: &mut Core, root: NodeId, event: TouchEvent) -> bool {
        if event.kind == TouchKind::Start {
            self.capture = hit_test(core, root, event);
            let Some(target) = self.capture else {
                trace!(point = ?event.point, "touch start missed");
                return false;
            };
            if let Err(e) = core.focus_node(target) {
                warn!(node = ?target, error = %e, "focusing touched widget");
            }
            core.set_dirty(target);
        }

        let Some(target) = self.capture(core) else {
            trace!(kind = ?event.kind, "touch without capture dropped");
            self.capture = None;
            return false;
        };
        deliver(core, target, |core| core.dispatch_touch(target, event))
    }

    /// Route a key press. An unhandled arrow key moves focus. An unhandled
    /// back-like key that does not move focus releases it and returns
    /// `false`, so the caller can treat it as "go back".
    pub fn key(&self, core: &mut Core, root: NodeId, key: Key) -> bool {
        let Some(focus) = core.focus_widget() else {
            return false;
        };
        if deliver(core, focus, |core| core.dispatch_key(focus, key)) {
            return true;
        }
        core.focus_update(root, key);
        if core.focus_widget() != Some(focus) {
            return true;
        }
        if key.is_back_like() {
            trace!(?key, "releasing focus");
            core.blur();
        }
        false
    }

    /// Route an encoder step to the focused widget.
    pub fn encoder(&self, core: &mut Core, delta: i32) -> bool {
        let Some(focus) = core.focus_widget() else {
            return false;
        };
        deliver(core, focus, |core| core.dispatch_encoder(focus, delta))
    }

    /// Route a keyboard character to the focused widget.
    pub fn keyboard(&self, core: &mut Core, ch: u8) -> bool {
        let Some(focus) = core.focus_widget() else {
            return false;
        };
        deliver(core, focus, |core| core.dispatch_keyboard(focus, ch))
    }
}

/// Run one delivery, logging failures as unhandled.
fn deliver(
    core: &mut Core,
    target: NodeId,
    f: impl FnOnce(&mut Core) -> Result<EventOutcome>,
) -> bool {
    match f(core) {
        Ok(outcome) => outcome.is_handled(),
        Err(e) => {
            warn!(node = ?target, error = %e, "event delivery failed");
            false
        }
    }
}
