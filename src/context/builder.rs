//! Builder pattern for context configuration.
//!
//! Provides a fluent API for configuring and creating
//! [`PageObjectContext`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use page_object_driver::{PageObjectContext, Result, WebDriver};
//!
//! fn connect(driver: Arc<dyn WebDriver>) -> Result<PageObjectContext> {
//!     PageObjectContext::builder()
//!         .driver(driver)
//!         .platform_alias("WebDesktopChrome")
//!         .timeout(Duration::from_secs(15))
//!         .build()
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::driver::WebDriver;
use crate::error::{Error, Result};
use crate::platform::Platform;

use super::PageObjectContext;
use super::options::PageObjectOptions;

// ============================================================================
// ContextBuilder
// ============================================================================

/// Builder for configuring a [`PageObjectContext`].
///
/// Use [`PageObjectContext::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct ContextBuilder {
    /// Native driver.
    driver: Option<Arc<dyn WebDriver>>,
    /// Initial platform.
    platform: Platform,
    /// Options, including wait timings.
    options: PageObjectOptions,
}

impl fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("has_driver", &self.driver.is_some())
            .field("platform", &self.platform)
            .field("options", &self.options)
            .finish()
    }
}

// ============================================================================
// ContextBuilder Implementation
// ============================================================================

impl ContextBuilder {
    /// Creates a builder with default settings and no driver.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the native driver.
    #[inline]
    #[must_use]
    pub fn driver(mut self, driver: Arc<dyn WebDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Sets the initial platform.
    #[inline]
    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the initial platform from a label or symbolic name.
    ///
    /// Unknown aliases fall back to [`Platform::Default`] with a warning.
    #[inline]
    #[must_use]
    pub fn platform_alias(mut self, alias: &str) -> Self {
        self.platform = Platform::from_alias(alias);
        self
    }

    /// Sets the default wait timeout.
    #[inline]
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Sets the default poll interval.
    #[inline]
    #[must_use]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.options.poll_interval = poll_interval;
        self
    }

    /// Replaces all options, including wait timings.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: PageObjectOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the context with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if no driver was set
    /// - [`Error::Config`] if the options are invalid
    pub fn build(self) -> Result<PageObjectContext> {
        let driver = self.driver.ok_or_else(|| {
            Error::config(
                "A driver is required. Use .driver() to set it.\n\
                 Example: PageObjectContext::builder().driver(Arc::new(my_driver))",
            )
        })?;

        self.options.validate()?;

        Ok(PageObjectContext::new(driver, self.platform, self.options))
    }
}

// ============================================================================
// Tests
// ============================================================================
