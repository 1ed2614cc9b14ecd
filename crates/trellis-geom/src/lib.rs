//! Geometry primitives used across trellis.
//!
//! Coordinates are signed: touch panels report points outside the visible
//! area during a drag, and widgets may be positioned partly off-screen.

/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use point::Point;
pub use rect::Rect;
pub use size::Size;

/// Cardinal directions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Direction {
    /// Upward direction.
    Up,
    /// Downward direction.
    Down,
    /// Leftward direction.
    Left,
    /// Rightward direction.
    Right,
}
