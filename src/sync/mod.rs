//! Polling waits and element conditions.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Wait`] | Timeout + poll interval poll loop |
//! | [`Until`] | Entry point for condition builders |
//! | [`Check`] | Described predicate over one element |
//! | [`Condition`] | Check bound to its subject, waitable |
//! | [`UiElementCondition`] | One element |
//! | [`AllMatchCondition`] | Every element on the same poll |
//! | [`FirstMatchCondition`] | Earliest matching element |
//! | [`SyncHelper`] | Context-bound convenience wrapper |
//!
//! Checks never search for an element: each poll looks once, and the poll
//! loop supplies the waiting.

// ============================================================================
// Submodules
// ============================================================================

/// Every-member conditions.
pub mod all;

/// Condition builders.
pub mod builder;

/// Checks and the condition trait.
pub mod condition;

/// First-match conditions.
pub mod first;

/// Context-bound helper.
pub mod helper;

/// Single-element conditions.
pub mod single;

/// Poll loop.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

pub use all::AllMatchCondition;
pub use builder::{ConditionBuilder, Until};
pub use condition::{Check, Condition, Predicate};
pub use first::FirstMatchCondition;
pub use helper::SyncHelper;
pub use single::UiElementCondition;
pub use wait::Wait;
