//! Entry points for the host firmware.
//!
//! The host drives the UI through plain integers: touch coordinates and a
//! gesture kind, key codes, encoder deltas and event bitmasks. A [`Host`]
//! owns at most one live [`App`] session.

use tracing::{debug, warn};

use super::{app::App, nav::NavId};
use crate::{
    config::Config,
    error::{Error, Result},
    event::{Key, TouchEvent, TouchKind},
    paint::Painter,
    widget::View,
};

/// Session holder for the host callback surface.
#[derive(Default)]
pub struct Host {
    /// The live session, if any.
    app: Option<App>,
}

impl Host {
    /// Construct a host with no live session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session. Fails without touching the live session if one
    /// exists.
    pub fn initialize<V: View>(
        &mut self,
        config: Config,
        base: impl FnOnce(NavId) -> V,
    ) -> Result<()> {
        if self.app.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        self.app = Some(App::new(config, base)?);
        debug!("session initialized");
        Ok(())
    }

    /// End the session, dropping every widget. Safe without a session.
    pub fn shutdown(&mut self) {
        if self.app.take().is_some() {
            debug!("session shut down");
        }
    }

    /// Is a session live?
    pub fn is_running(&self) -> bool {
        self.app.is_some()
    }

    /// The live session.
    pub fn app(&self) -> Option<&App> {
        self.app.as_ref()
    }

    /// The live session, mutably.
    pub fn app_mut(&mut self) -> Option<&mut App> {
        self.app.as_mut()
    }

    /// Handle a host event bitmask. Bit 0 is the frame-sync tick.
    pub fn on_event(&mut self, events: u32) {
        if let Some(app) = self.app.as_mut() {
            app.on_event(events);
        }
    }

    /// Paint dirty nodes. Returns `false` without a session or on a paint
    /// failure.
    pub fn paint(&mut self, painter: &mut dyn Painter) -> bool {
        let Some(app) = self.app.as_mut() else {
            return false;
        };
        match app.paint(painter) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "paint failed");
                false
            }
        }
    }

    /// Handle a touch sample. `kind` is 0 for start, 1 for move, 2 for end.
    pub fn on_touch(&mut self, x: i32, y: i32, kind: u32) -> bool {
        let Some(app) = self.app.as_mut() else {
            return false;
        };
        match TouchKind::try_from(kind) {
            Ok(kind) => app.touch(TouchEvent::new((x, y), kind)),
            Err(e) => {
                warn!(error = %e, "rejecting touch");
                false
            }
        }
    }

    /// Run the root view's focus hook.
    pub fn on_focus(&mut self) -> bool {
        let Some(app) = self.app.as_mut() else {
            return false;
        };
        app.focus();
        true
    }

    /// Handle a key code.
    pub fn on_key(&mut self, code: u8) -> bool {
        let Some(app) = self.app.as_mut() else {
            return false;
        };
        match Key::try_from(code) {
            Ok(key) => app.key(key),
            Err(e) => {
                warn!(error = %e, "rejecting key");
                false
            }
        }
    }

    /// Handle an encoder step.
    pub fn on_encoder(&mut self, delta: i32) -> bool {
        self.app.as_mut().is_some_and(|app| app.encoder(delta))
    }

    /// Handle a character from an attached keyboard.
    pub fn on_keyboard(&mut self, ch: u8) -> bool {
        self.app.as_mut().is_some_and(|app| app.keyboard(ch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Probe, ProbeView};

    #[test]
    fn entry_points_without_session() {
        let mut host = Host::new();
        host.shutdown();
        assert!(!host.on_touch(10, 10, 0));
        assert!(!host.on_key(4));
        assert!(!host.on_encoder(1));
        assert!(!host.on_keyboard(b'a'));
        assert!(!host.on_focus());
        host.on_event(1);
        assert!(!host.is_running());
    }

    #[test]
    fn second_initialize_keeps_live_session() -> Result<()> {
        let mut host = Host::new();
        let first = Probe::default();
        let p = first.clone();
        host.initialize(Config::default(), move |_| ProbeView::new("first", p))?;

        let second = Probe::default();
        let p = second.clone();
        assert!(matches!(
            host.initialize(Config::default(), move |_| ProbeView::new("second", p)),
            Err(Error::AlreadyInitialized)
        ));
        assert_eq!(first.mounts.get(), 1);
        assert_eq!(second.mounts.get(), 0);

        host.shutdown();
        assert_eq!(first.drops.get(), 1);
        assert!(!host.is_running());
        Ok(())
    }

    #[test]
    fn unknown_codes_are_rejected() -> Result<()> {
        let mut host = Host::new();
        host.initialize(Config::default(), |_| ProbeView::new("base", Probe::default()))?;
        assert!(!host.on_touch(1, 1, 7));
        assert!(!host.on_key(42));
        Ok(())
    }
}
