use tracing::{debug, warn};

use super::{dispatch::InputDispatcher, focus::FocusManager, id::NodeId, nav::NavId};
use crate::{
    Navigator,
    config::Config,
    core::world::Core,
    error::Result,
    event::{Key, TouchEvent},
    paint::{Painter, paint_tree},
    widget::View,
};

/// Host event bit signalling a frame-sync tick.
pub const EVENT_FRAMESYNC: u32 = 1;

/// Application state: the arena, the root navigation view and the input
/// dispatcher.
pub struct App {
    /// Core state.
    pub core: Core,
    /// The root navigation view, covering the whole screen.
    nav: NavId,
    /// Input routing state.
    dispatcher: InputDispatcher,
}

impl App {
    /// Build an application whose root navigation view starts with the view
    /// produced by `base`.
    pub fn new<V: View>(config: Config, base: impl FnOnce(NavId) -> V) -> Result<Self> {
        let mut core = Core::new(config);
        let screen = core.config().screen_rect();
        let root = core.root_id();
        let nav = core.mount_navigation(root, screen, base)?;
        debug!(?screen, "application started");
        Ok(Self {
            core,
            nav,
            dispatcher: InputDispatcher::new(),
        })
    }

    /// The root navigation view.
    pub fn nav(&self) -> NavId {
        self.nav
    }

    /// Handle a host event bitmask.
    pub fn on_event(&mut self, events: u32) {
        if events & EVENT_FRAMESYNC != 0 {
            self.framesync();
        }
    }

    /// Run the frame-sync hook of the root navigation view.
    pub fn framesync(&mut self) {
        if let Err(e) = self.core.framesync(self.nav) {
            warn!(error = %e, "frame sync");
        }
    }

    /// Paint all dirty nodes.
    pub fn paint(&mut self, painter: &mut dyn Painter) -> Result<()> {
        let root = self.core.root_id();
        paint_tree(&mut self.core, root, painter)
    }

    /// Run the focus hook of the root navigation view.
    pub fn focus(&mut self) {
        if let Err(e) = self.core.focus_node(self.nav) {
            warn!(error = %e, "focusing root view");
        }
    }

    /// Route a touch event.
    pub fn touch(&mut self, event: TouchEvent) -> bool {
        let root = self.core.root_id();
        self.dispatcher.touch(&mut self.core, root, event)
    }

    /// Route a key press.
    pub fn key(&mut self, key: Key) -> bool {
        let root = self.core.root_id();
        self.dispatcher.key(&mut self.core, root, key)
    }

    /// Route an encoder step.
    pub fn encoder(&mut self, delta: i32) -> bool {
        self.dispatcher.encoder(&mut self.core, delta)
    }

    /// Route a keyboard character.
    pub fn keyboard(&mut self, ch: u8) -> bool {
        self.dispatcher.keyboard(&mut self.core, ch)
    }

    /// The widget capturing the current touch gesture.
    pub fn touch_capture(&self) -> Option<NodeId> {
        self.dispatcher.capture(&self.core)
    }

    /// The focused widget.
    pub fn focus_widget(&self) -> Option<NodeId> {
        self.core.focus_widget()
    }
}
