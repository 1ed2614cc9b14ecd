//! Core types: the widget arena, focus, navigation and input routing.

/// Application state.
pub mod app;
/// Configuration.
pub mod config;
/// Core context traits and implementations.
pub mod context;
/// Input routing.
pub mod dispatch;
/// Core error types.
pub mod error;
/// Input event types.
pub mod event;
/// Focus management.
pub mod focus;
/// Hit testing.
pub mod hit;
/// Host entry points.
pub mod host;
/// Node ID types.
pub mod id;
/// Navigation views and their view stacks.
pub mod nav;
/// Node data.
pub mod node;
/// Painting interfaces.
pub mod paint;
/// Colors and styles.
pub mod style;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// The node arena.
pub mod world;

pub use app::App;
pub use context::{Context, ViewContext};
pub use dispatch::InputDispatcher;
pub use focus::FocusManager;
pub use host::Host;
pub use id::{NodeId, TypedId};
pub use nav::{NavId, NavigationView, Navigator};
pub use world::Core;
