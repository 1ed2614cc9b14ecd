//! Built-in widgets.

/// Button widget.
pub mod button;
/// Modal message dialogs.
pub mod modal;

pub use button::Button;
pub use modal::{ChoiceFn, ModalKind, ModalMessageView};
