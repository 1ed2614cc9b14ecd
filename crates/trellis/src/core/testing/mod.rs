/// Recording painter.
pub mod painter;
/// Probe widgets and views with shared counters.
pub mod probe;

pub use painter::{PaintOp, RecordingPainter};
pub use probe::{Counters, Probe, ProbeView, ProbeWidget};
use tracing::Level;

/// Install a fmt subscriber that writes through the test harness.
pub fn init_tracing() {
    // Another test in the same binary may have installed it already.
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::TRACE)
        .try_init()
        .ok();
}
