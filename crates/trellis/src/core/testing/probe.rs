use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    Context, ViewContext,
    error::Result,
    event::{Key, TouchEvent},
    geom::Rect,
    paint::Painter,
    widget::{EventOutcome, View, Widget},
};

/// Counters shared between a test and its probe widgets.
#[derive(Debug, Default)]
pub struct Counters {
    /// Paint calls.
    pub paints: Cell<usize>,
    /// Focus hook calls.
    pub focuses: Cell<usize>,
    /// Widgets dropped.
    pub drops: Cell<usize>,
    /// Mount hook calls.
    pub mounts: Cell<usize>,
    /// Frame-sync hook calls.
    pub framesyncs: Cell<usize>,
    /// Keys received.
    pub keys: RefCell<Vec<Key>>,
    /// Touch events received, including those seen during hit testing.
    pub touches: RefCell<Vec<TouchEvent>>,
    /// Encoder deltas received.
    pub encoder: RefCell<Vec<i32>>,
    /// Keyboard characters received.
    pub chars: RefCell<Vec<u8>>,
}

/// Shared handle to probe counters.
pub type Probe = Rc<Counters>;

/// Custom key handler for a probe.
type KeyHandler = Box<dyn FnMut(Key, &mut dyn Context) -> EventOutcome>;

/// A widget that records every hook call.
pub struct ProbeWidget {
    /// Shared counters.
    probe: Probe,
    /// Accept key focus.
    focusable: bool,
    /// Accept touch events.
    touchable: bool,
    /// Handle all input events instead of ignoring them.
    consumes: bool,
    /// Overrides key handling when set.
    on_key: Option<KeyHandler>,
}

impl ProbeWidget {
    /// A probe that ignores input and refuses focus.
    pub fn new(probe: Probe) -> Self {
        Self {
            probe,
            focusable: false,
            touchable: false,
            consumes: false,
            on_key: None,
        }
    }

    /// Accept key focus.
    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    /// Accept touch events.
    pub fn touchable(mut self) -> Self {
        self.touchable = true;
        self
    }

    /// Handle key, encoder and keyboard input.
    pub fn consuming(mut self) -> Self {
        self.consumes = true;
        self
    }

    /// Handle keys with `f`.
    pub fn with_key_handler(
        mut self,
        f: impl FnMut(Key, &mut dyn Context) -> EventOutcome + 'static,
    ) -> Self {
        self.on_key = Some(Box::new(f));
        self
    }
}

impl Widget for ProbeWidget {
    fn accept_focus(&self) -> bool {
        self.focusable
    }

    fn paint(&mut self, _painter: &mut dyn Painter, _ctx: &dyn ViewContext) -> Result<()> {
        self.probe.paints.set(self.probe.paints.get() + 1);
        Ok(())
    }

    fn on_touch(&mut self, event: TouchEvent, _ctx: &mut dyn Context) -> EventOutcome {
        self.probe.touches.borrow_mut().push(event);
        self.touchable.into()
    }

    fn on_key(&mut self, key: Key, ctx: &mut dyn Context) -> EventOutcome {
        self.probe.keys.borrow_mut().push(key);
        match self.on_key.as_mut() {
            Some(f) => f(key, ctx),
            None => self.consumes.into(),
        }
    }

    fn on_encoder(&mut self, delta: i32, _ctx: &mut dyn Context) -> EventOutcome {
        self.probe.encoder.borrow_mut().push(delta);
        self.consumes.into()
    }

    fn on_keyboard(&mut self, ch: u8, _ctx: &mut dyn Context) -> EventOutcome {
        self.probe.chars.borrow_mut().push(ch);
        self.consumes.into()
    }

    fn focus(&mut self, ctx: &mut dyn Context) {
        self.probe.focuses.set(self.probe.focuses.get() + 1);
        ctx.focus_first();
    }

    fn on_framesync(&mut self, _ctx: &mut dyn Context) {
        self.probe.framesyncs.set(self.probe.framesyncs.get() + 1);
    }

    fn on_mount(&mut self, _ctx: &mut dyn Context) -> Result<()> {
        self.probe.mounts.set(self.probe.mounts.get() + 1);
        Ok(())
    }
}

impl Drop for ProbeWidget {
    fn drop(&mut self) {
        self.probe.drops.set(self.probe.drops.get() + 1);
    }
}

/// A view that records every hook call and builds probe children on mount.
pub struct ProbeView {
    /// View title.
    title: String,
    /// Hook recording for the view itself.
    inner: ProbeWidget,
    /// Children to add on mount.
    pending: Vec<(ProbeWidget, Rect)>,
}

impl ProbeView {
    /// A view with no children.
    pub fn new(title: impl Into<String>, probe: Probe) -> Self {
        Self {
            title: title.into(),
            inner: ProbeWidget::new(probe),
            pending: Vec::new(),
        }
    }

    /// Add `child` at `rect` when the view is mounted.
    pub fn with_child(mut self, child: ProbeWidget, rect: Rect) -> Self {
        self.pending.push((child, rect));
        self
    }

    /// Accept focus on the view itself.
    pub fn focusable(mut self) -> Self {
        self.inner = self.inner.focusable();
        self
    }

    /// Accept touch events on the view itself.
    pub fn touchable(mut self) -> Self {
        self.inner = self.inner.touchable();
        self
    }

    /// Handle keys on the view itself with `f`.
    pub fn with_key_handler(
        mut self,
        f: impl FnMut(Key, &mut dyn Context) -> EventOutcome + 'static,
    ) -> Self {
        self.inner = self.inner.with_key_handler(f);
        self
    }
}

impl Widget for ProbeView {
    fn accept_focus(&self) -> bool {
        self.inner.accept_focus()
    }

    fn paint(&mut self, painter: &mut dyn Painter, ctx: &dyn ViewContext) -> Result<()> {
        self.inner.paint(painter, ctx)
    }

    fn on_touch(&mut self, event: TouchEvent, ctx: &mut dyn Context) -> EventOutcome {
        self.inner.on_touch(event, ctx)
    }

    fn on_key(&mut self, key: Key, ctx: &mut dyn Context) -> EventOutcome {
        self.inner.on_key(key, ctx)
    }

    fn on_encoder(&mut self, delta: i32, ctx: &mut dyn Context) -> EventOutcome {
        self.inner.on_encoder(delta, ctx)
    }

    fn on_keyboard(&mut self, ch: u8, ctx: &mut dyn Context) -> EventOutcome {
        self.inner.on_keyboard(ch, ctx)
    }

    fn focus(&mut self, ctx: &mut dyn Context) {
        self.inner.focus(ctx);
    }

    fn on_framesync(&mut self, ctx: &mut dyn Context) {
        self.inner.on_framesync(ctx);
    }

    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        self.inner.on_mount(ctx)?;
        for (child, rect) in self.pending.drain(..) {
            ctx.add_child(child, rect)?;
        }
        Ok(())
    }
}

impl View for ProbeView {
    fn title(&self) -> String {
        self.title.clone()
    }
}
