//! Trellis: the view stack and input routing core for small touchscreen
//! devices.
//!
//! Widgets live in an arena ([`Core`]) and are addressed by generational
//! [`NodeId`]s. A [`NavigationView`] owns a stack of full-screen [`View`]s and
//! shows the top one. Touch gestures are routed by hit testing and capture,
//! while keys, encoder steps and keyboard characters go to the single focused
//! widget.
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Point, Size, Rect, Direction)
//! - [`widget`] - The widget and view traits
//! - [`widgets`] - Built-in buttons and modal dialogs

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

pub use trellis_geom as geom;
pub mod widget;
pub mod widgets;

#[cfg(any(test, feature = "testing"))]
pub use core::testing;
pub use core::{
    App, Context, Core, FocusManager, Host, InputDispatcher, NavId, NavigationView, Navigator,
    NodeId, TypedId, ViewContext,
};
pub use core::{config, dispatch, error, event, hit, nav, node, paint, style};

pub use config::Config;
pub use widget::{EventOutcome, View, Widget};
