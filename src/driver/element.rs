//! Native element handle.
//!
//! A [`NativeElement`] is a direct, eager reference to one element handed
//! out by the driver. It can go stale; the lazy layer in
//! [`crate::element`] wraps it to recover from that.
//!
//! # Example
//!
//! ```ignore
//! let element = lazy.underlying().await?;
//!
//! let text = element.text().await?;
//! element.click().await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::identifiers::ElementId;
use crate::locator::By;

use super::{ElementRect, SearchScope, WebDriver};

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for an element.
pub(crate) struct NativeElementInner {
    /// Driver-assigned element reference.
    pub id: ElementId,

    /// Driver that handed out the reference.
    pub driver: Arc<dyn WebDriver>,
}

// ============================================================================
// NativeElement
// ============================================================================

/// A handle to a native element.
///
/// Cheap to clone; clones share the same reference.
#[derive(Clone)]
pub struct NativeElement {
    /// Shared inner state.
    pub(crate) inner: Arc<NativeElementInner>,
}

// ============================================================================
// NativeElement - Display
// ============================================================================

impl fmt::Debug for NativeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeElement")
            .field("id", &self.inner.id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for NativeElement {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for NativeElement {}

// ============================================================================
// NativeElement - Constructor
// ============================================================================

impl NativeElement {
    /// Creates a new element handle.
    pub fn new(id: ElementId, driver: Arc<dyn WebDriver>) -> Self {
        Self {
            inner: Arc::new(NativeElementInner { id, driver }),
        }
    }
}

// ============================================================================
// NativeElement - Accessors
// ============================================================================

impl NativeElement {
    /// Returns this element's ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.inner.id
    }

    /// Returns the driver that owns this element.
    #[inline]
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn WebDriver> {
        &self.inner.driver
    }
}

// ============================================================================
// NativeElement - Actions
// ============================================================================

impl NativeElement {
    /// Clicks the element.
    pub async fn click(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Clicking element");
        self.inner.driver.click(&self.inner.id).await
    }

    /// Submits the element's form.
    pub async fn submit(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Submitting element");
        self.inner.driver.submit(&self.inner.id).await
    }

    /// Types text into the element.
    pub async fn send_keys(&self, text: &str) -> Result<()> {
        debug!(element_id = %self.inner.id, text_len = text.len(), "Typing into element");
        self.inner.driver.send_keys(&self.inner.id, text).await
    }

    /// Clears the element's value.
    pub async fn clear(&self) -> Result<()> {
        debug!(element_id = %self.inner.id, "Clearing element");
        self.inner.driver.clear(&self.inner.id).await
    }
}

// ============================================================================
// NativeElement - Properties
// ============================================================================

impl NativeElement {
    /// Gets the rendered text.
    pub async fn text(&self) -> Result<String> {
        self.inner.driver.text(&self.inner.id).await
    }

    /// Gets the tag name.
    pub async fn tag_name(&self) -> Result<String> {
        self.inner.driver.tag_name(&self.inner.id).await
    }

    /// Gets an attribute (or same-named property).
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner.driver.attribute(&self.inner.id, name).await
    }

    /// Gets a declared DOM attribute.
    pub async fn dom_attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner.driver.dom_attribute(&self.inner.id, name).await
    }

    /// Gets a DOM property.
    pub async fn dom_property(&self, name: &str) -> Result<Value> {
        self.inner.driver.dom_property(&self.inner.id, name).await
    }

    /// Gets a computed CSS value.
    pub async fn css_value(&self, name: &str) -> Result<String> {
        self.inner.driver.css_value(&self.inner.id, name).await
    }

    /// Checks if the element is displayed.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.inner.driver.is_displayed(&self.inner.id).await
    }

    /// Checks if the element is enabled.
    pub async fn is_enabled(&self) -> Result<bool> {
        self.inner.driver.is_enabled(&self.inner.id).await
    }

    /// Checks if the element is selected.
    pub async fn is_selected(&self) -> Result<bool> {
        self.inner.driver.is_selected(&self.inner.id).await
    }

    /// Gets the element rectangle.
    pub async fn rect(&self) -> Result<ElementRect> {
        self.inner.driver.rect(&self.inner.id).await
    }
}

// ============================================================================
// NativeElement - Nested Search
// ============================================================================

impl NativeElement {
    /// Finds a descendant element.
    pub async fn find_element(&self, by: &By) -> Result<NativeElement> {
        let id = self
            .inner
            .driver
            .find_element(SearchScope::Element(&self.inner.id), by)
            .await?;
        Ok(self.sibling(id))
    }

    /// Finds all matching descendants.
    pub async fn find_elements(&self, by: &By) -> Result<Vec<NativeElement>> {
        let ids = self
            .inner
            .driver
            .find_elements(SearchScope::Element(&self.inner.id), by)
            .await?;
        Ok(ids.into_iter().map(|id| self.sibling(id)).collect())
    }

    /// Returns the shadow root this element hosts.
    pub async fn shadow_root(&self) -> Result<ElementId> {
        self.inner.driver.shadow_root(&self.inner.id).await
    }

    /// Wraps another ID from the same driver.
    fn sibling(&self, id: ElementId) -> NativeElement {
        NativeElement::new(id, Arc::clone(&self.inner.driver))
    }
}

// ============================================================================
// Tests
// ============================================================================
