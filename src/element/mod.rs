//! Lazy page-object elements.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LazyElement`] | Lazily resolved native element proxy |
//! | [`LazyList`] | Lazily resolved list of typed elements |
//! | [`UiElement`] | Typed wrapper trait and lenient state queries |
//! | [`Interactable`], [`Textual`] | Capability traits |
//! | [`SwipeDirection`] | Swipe gesture geometry |

// ============================================================================
// Submodules
// ============================================================================

mod finder;

/// Swipe gestures.
pub mod gesture;

/// Element kinds and capability traits.
pub mod kinds;

/// Lazy element proxy.
pub mod lazy;

/// Lazy element lists.
pub mod list;

// ============================================================================
// Re-exports
// ============================================================================

pub use gesture::SwipeDirection;
pub use kinds::{
    Button, Checkbox, ContainerElement, Interactable, Link, RadioButton, Text, TextBox, Textual, UiElement,
};
pub use lazy::LazyElement;
pub use list::LazyList;
