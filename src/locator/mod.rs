//! Locator declarations, strategies and per-platform resolution.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `strategy` | [`Strategy`] and the concrete [`By`] selector |
//! | `locate` | [`Locate`] declarations, [`FieldLocators`] tables, resolved [`Locator`] |
//! | `resolve` | [`filter_by_platform`] and the [`LocatorRegistry`] |
//! | `chain` | [`LocatorChain`] of ancestor locators |

// ============================================================================
// Submodules
// ============================================================================

pub mod chain;
pub mod locate;
pub mod resolve;
pub mod strategy;

// ============================================================================
// Re-exports
// ============================================================================

pub use chain::{ChainLink, LocatorChain};
pub use locate::{FieldLocators, Locate, Locator};
pub use resolve::{LocatorRegistry, filter_by_platform, select_by_platform};
pub use strategy::{By, Strategy};
