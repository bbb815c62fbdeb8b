//! Native driver boundary.
//!
//! The crate never speaks the WebDriver wire protocol itself. Every native
//! element operation goes through the [`WebDriver`] trait, which any W3C
//! WebDriver or Appium client (or a test double) can implement.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`WebDriver`] | Async native driver trait |
//! | [`SearchScope`] | Where a native find starts |
//! | [`NativeElement`] | Handle to one native element |
//! | [`ElementRect`], [`Point`], [`WindowSize`] | Geometry |
//!
//! # Error Contract
//!
//! Implementations report a missing element as [`Error::ElementNotFound`],
//! a detached handle as [`Error::StaleElement`] and a refused interaction as
//! [`Error::NotInteractable`] (or [`Error::Driver`] carrying the W3C
//! "not pointer or keyboard interactable" text). The lazy element layer
//! relies on these to decide what to retry.
//!
//! [`Error::ElementNotFound`]: crate::Error::ElementNotFound
//! [`Error::StaleElement`]: crate::Error::StaleElement
//! [`Error::NotInteractable`]: crate::Error::NotInteractable
//! [`Error::Driver`]: crate::Error::Driver

// ============================================================================
// Submodules
// ============================================================================

/// Native element handle.
pub mod element;

/// Script-based element lookups.
pub mod script;

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::identifiers::ElementId;
use crate::locator::By;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::NativeElement;

// ============================================================================
// Geometry
// ============================================================================

/// Element position and size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl ElementRect {
    /// Returns the center point, rounded toward zero.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            (self.x + self.width / 2.0) as i64,
            (self.y + self.height / 2.0) as i64,
        )
    }
}

/// Viewport coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal offset.
    pub x: i64,
    /// Vertical offset.
    pub y: i64,
}

impl Point {
    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Window dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WindowSize {
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

// ============================================================================
// SearchScope
// ============================================================================

/// Where a native find starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope<'a> {
    /// The whole document.
    Document,
    /// Descendants of an element.
    Element(&'a ElementId),
    /// The shadow root hosted by an element.
    ShadowRoot(&'a ElementId),
}

// ============================================================================
// WebDriver Trait
// ============================================================================

/// Async native driver.
///
/// Object safe; the crate holds it as `Arc<dyn WebDriver>`.
#[async_trait]
pub trait WebDriver: Send + Sync {
    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    /// Finds the first element matching `by` within `scope`.
    async fn find_element(&self, scope: SearchScope<'_>, by: &By) -> Result<ElementId>;

    /// Finds every element matching `by` within `scope`.
    ///
    /// Returns an empty vector when nothing matches.
    async fn find_elements(&self, scope: SearchScope<'_>, by: &By) -> Result<Vec<ElementId>>;

    /// Returns the shadow root hosted by `element`.
    async fn shadow_root(&self, element: &ElementId) -> Result<ElementId>;

    // ------------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------------

    /// Clicks an element.
    async fn click(&self, element: &ElementId) -> Result<()>;

    /// Submits the form an element belongs to.
    async fn submit(&self, element: &ElementId) -> Result<()>;

    /// Types text into an element.
    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<()>;

    /// Clears an editable element.
    async fn clear(&self, element: &ElementId) -> Result<()>;

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    /// Returns the rendered text.
    async fn text(&self, element: &ElementId) -> Result<String>;

    /// Returns the tag name.
    async fn tag_name(&self, element: &ElementId) -> Result<String>;

    /// Returns an attribute, falling back to the property of the same name.
    async fn attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>>;

    /// Returns a declared DOM attribute.
    async fn dom_attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>>;

    /// Returns a DOM property.
    async fn dom_property(&self, element: &ElementId, name: &str) -> Result<Value>;

    /// Returns a computed CSS value.
    async fn css_value(&self, element: &ElementId, name: &str) -> Result<String>;

    /// Returns `true` if the element is displayed.
    async fn is_displayed(&self, element: &ElementId) -> Result<bool>;

    /// Returns `true` if the element is enabled.
    async fn is_enabled(&self, element: &ElementId) -> Result<bool>;

    /// Returns `true` if the element is selected or checked.
    async fn is_selected(&self, element: &ElementId) -> Result<bool>;

    /// Returns the element rectangle.
    async fn rect(&self, element: &ElementId) -> Result<ElementRect>;

    // ------------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------------

    /// Executes synchronous JavaScript with the given arguments.
    ///
    /// Element arguments and results use the W3C element reference object
    /// (see [`script::element_reference`]).
    async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value>;

    /// Returns the current window size.
    async fn window_size(&self) -> Result<WindowSize>;

    // ------------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------------

    /// Presses a pointer down at `at`.
    async fn pointer_down(&self, at: Point) -> Result<()>;

    /// Releases a pointer at `at`.
    async fn pointer_up(&self, at: Point) -> Result<()>;

    /// Performs a touch swipe from `start` to `end` over `duration`.
    async fn swipe(&self, start: Point, end: Point, duration: Duration) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================
