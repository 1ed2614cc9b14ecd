//! Input event types delivered by the host.

use crate::{error::Error, geom::Point};

/// Phase of a touch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchKind {
    /// Finger down. Starts a gesture and runs hit testing.
    Start,
    /// Finger moved while down.
    Move,
    /// Finger lifted.
    End,
}

impl TryFrom<u32> for TouchKind {
    type Error = Error;

    fn try_from(v: u32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Start),
            1 => Ok(Self::Move),
            2 => Ok(Self::End),
            other => Err(Error::UnknownTouchKind(other)),
        }
    }
}

/// A touch event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchEvent {
    /// Screen-space location. May lie outside the screen during a drag.
    pub point: Point,
    /// Gesture phase.
    pub kind: TouchKind,
}

impl TouchEvent {
    /// Construct a touch event.
    pub fn new(point: impl Into<Point>, kind: TouchKind) -> Self {
        Self {
            point: point.into(),
            kind,
        }
    }
}

/// Hardware navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Right arrow.
    Right,
    /// Left arrow.
    Left,
    /// Down arrow.
    Down,
    /// Up arrow.
    Up,
    /// Centre select button.
    Select,
    /// Firmware-update button, delivered as an ordinary key.
    Dfu,
    /// Back button.
    Back,
}

impl Key {
    /// Keys that, when nothing consumes them, release focus so an outer
    /// context can treat them as "go back".
    pub fn is_back_like(self) -> bool {
        matches!(self, Self::Up | Self::Back | Self::Left)
    }
}

impl TryFrom<u8> for Key {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Right),
            1 => Ok(Self::Left),
            2 => Ok(Self::Down),
            3 => Ok(Self::Up),
            4 => Ok(Self::Select),
            5 => Ok(Self::Dfu),
            6 => Ok(Self::Back),
            other => Err(Error::UnknownKey(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_host_codes() {
        assert_eq!(Key::try_from(3).ok(), Some(Key::Up));
        assert_eq!(Key::try_from(6).ok(), Some(Key::Back));
        assert!(matches!(Key::try_from(7), Err(Error::UnknownKey(7))));
        assert_eq!(TouchKind::try_from(1).ok(), Some(TouchKind::Move));
        assert!(matches!(
            TouchKind::try_from(9),
            Err(Error::UnknownTouchKind(9))
        ));
    }

    #[test]
    fn back_like_keys() {
        assert!(Key::Up.is_back_like());
        assert!(Key::Left.is_back_like());
        assert!(Key::Back.is_back_like());
        assert!(!Key::Down.is_back_like());
        assert!(!Key::Select.is_back_like());
    }
}
