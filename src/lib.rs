//! Page Object Driver - Lazy page objects over any WebDriver.
//!
//! This library models web and mobile screens as typed page objects whose
//! elements are located lazily, per platform, and recover on their own from
//! the usual WebDriver flakiness.
//!
//! # Architecture
//!
//! The crate sits on top of a native driver it does not own:
//!
//! - **Native boundary**: the [`WebDriver`] trait, implemented by any W3C
//!   WebDriver or Appium client
//! - **Locators**: per-field tables of [`Locate`] declarations, resolved
//!   through the [`Platform`] fallback hierarchy
//! - **Elements**: [`LazyElement`] proxies that search on first use, retry
//!   once on a stale handle and once after waiting for visibility
//! - **Waits**: [`Until`] conditions polled by a [`Wait`] loop
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use page_object_driver::{
//!     Button, Component, Condition, FieldLocators, Interactable, Locate, PageObjectBuilder,
//!     PageObjectContext, Platform, Result, Strategy, TextBox, Until, WebDriver,
//! };
//!
//! const QUERY: FieldLocators = FieldLocators::new("SearchPage", "query", &[
//!     Locate::new(Platform::Web, Strategy::Css, "input[name=q]"),
//!     Locate::new(Platform::Mobile, Strategy::AccessibilityId, "Search"),
//! ]);
//! const GO: FieldLocators = FieldLocators::new("SearchPage", "go", &[
//!     Locate::new(Platform::Default, Strategy::Id, "go"),
//! ]);
//!
//! struct SearchPage {
//!     query: TextBox,
//!     go: Button,
//! }
//!
//! impl Component for SearchPage {
//!     fn build(page: &PageObjectBuilder) -> Result<Self> {
//!         Ok(Self { query: page.element(&QUERY)?, go: page.element(&GO)? })
//!     }
//! }
//!
//! async fn search(driver: Arc<dyn WebDriver>) -> Result<()> {
//!     let context = PageObjectContext::builder()
//!         .driver(driver)
//!         .platform(Platform::WebDesktopChrome)
//!         .build()?;
//!
//!     let page: SearchPage = PageObjectBuilder::new(&context).component()?;
//!     page.query.set_text("rust").await?;
//!     Until::element(&page.go).clickable().wait_then_return(&context).await?;
//!     page.go.click().await
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`context`] | Driver, platform and wait settings shared by page objects |
//! | [`driver`] | Native driver trait and element handles |
//! | [`element`] | Lazy elements, lists and typed element kinds |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`locator`] | Locator declarations, resolution and chains |
//! | [`page`] | Page-object construction |
//! | [`platform`] | Platform hierarchy and fallback |
//! | [`sync`] | Polling waits and conditions |

// ============================================================================
// Modules
// ============================================================================

/// Driver, platform and wait settings shared by page objects.
pub mod context;

/// Native driver boundary.
///
/// Implement [`WebDriver`] to plug in a concrete client.
pub mod driver;

/// Lazy elements, lists and typed element kinds.
pub mod element;

/// Error types and Result alias.
pub mod error;

/// Type-safe identifier wrappers.
pub mod identifiers;

/// Locator declarations, resolution and chains.
pub mod locator;

/// Page-object construction.
pub mod page;

/// Platform hierarchy and fallback.
pub mod platform;

/// Polling waits and conditions.
pub mod sync;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Context types
pub use context::{ContextBuilder, PageObjectContext, PageObjectOptions};

// Driver types
pub use driver::{ElementRect, NativeElement, Point, SearchScope, WebDriver, WindowSize};

// Element types
pub use element::{
    Button, Checkbox, ContainerElement, Interactable, LazyElement, LazyList, Link, RadioButton,
    SwipeDirection, Text, TextBox, Textual, UiElement,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::ElementId;

// Locator types
pub use locator::{By, FieldLocators, Locate, Locator, LocatorChain, LocatorRegistry, Strategy};

// Page types
pub use page::{Component, Implementation, Implementations, PageObjectBuilder};

// Platform types
pub use platform::Platform;

// Sync types
pub use sync::{Check, Condition, SyncHelper, Until, Wait};
