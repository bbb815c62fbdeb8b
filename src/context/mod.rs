//! Per-execution page-object context.
//!
//! One [`PageObjectContext`] is created per test execution. It owns the
//! native driver handle and the runtime settings (platform, wait timings,
//! [`PageObjectOptions`]) every lazy element reads when it resolves.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PageObjectContext`] | Shared driver + settings handle |
//! | [`ContextBuilder`] | Fluent configuration builder |
//! | [`PageObjectOptions`] | Wait timings and list behaviour |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use page_object_driver::{PageObjectContext, Platform, Result, WebDriver};
//!
//! fn switch_to_phone(driver: Arc<dyn WebDriver>) -> Result<PageObjectContext> {
//!     let context = PageObjectContext::builder()
//!         .driver(driver)
//!         .platform(Platform::WebDesktopChrome)
//!         .build()?;
//!
//!     context.set_platform(Platform::WebMobilePhone);
//!     Ok(context)
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for contexts.
pub mod builder;

/// Page-object options.
pub mod options;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use crate::driver::WebDriver;
use crate::platform::Platform;
use crate::sync::Wait;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ContextBuilder;
pub use options::PageObjectOptions;

// ============================================================================
// Types
// ============================================================================

/// Runtime-mutable settings.
#[derive(Debug, Clone)]
struct Settings {
    platform: Platform,
    options: PageObjectOptions,
}

/// Internal shared state for a context.
pub(crate) struct ContextInner {
    /// Native driver.
    driver: Arc<dyn WebDriver>,

    /// Platform and options; never held across an await.
    settings: RwLock<Settings>,
}

// ============================================================================
// PageObjectContext
// ============================================================================

/// Shared driver and settings for one test execution.
///
/// Cheap to clone; clones observe the same settings.
#[derive(Clone)]
pub struct PageObjectContext {
    inner: Arc<ContextInner>,
}

impl fmt::Debug for PageObjectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.inner.settings.read();
        f.debug_struct("PageObjectContext")
            .field("platform", &settings.platform)
            .field("options", &settings.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PageObjectContext - Constructors
// ============================================================================

impl PageObjectContext {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Creates a context directly.
    ///
    /// Prefer [`PageObjectContext::builder`], which validates the options.
    pub(crate) fn new(
        driver: Arc<dyn WebDriver>,
        platform: Platform,
        options: PageObjectOptions,
    ) -> Self {
        debug!(%platform, ?options, "Created page-object context");
        Self {
            inner: Arc::new(ContextInner {
                driver,
                settings: RwLock::new(Settings { platform, options }),
            }),
        }
    }
}

// ============================================================================
// PageObjectContext - Accessors
// ============================================================================

impl PageObjectContext {
    /// Returns the native driver.
    #[inline]
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn WebDriver> {
        &self.inner.driver
    }

    /// Returns the current platform.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.inner.settings.read().platform
    }

    /// Returns the default wait timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.inner.settings.read().options.timeout
    }

    /// Returns the default poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.inner.settings.read().options.poll_interval
    }

    /// Returns a snapshot of the options.
    #[must_use]
    pub fn options(&self) -> PageObjectOptions {
        self.inner.settings.read().options.clone()
    }

    /// Returns the context's default wait.
    #[must_use]
    pub fn wait(&self) -> Wait {
        let settings = self.inner.settings.read();
        Wait::new(settings.options.timeout, settings.options.poll_interval)
    }
}

// ============================================================================
// PageObjectContext - Mutators
// ============================================================================

impl PageObjectContext {
    /// Switches the platform.
    ///
    /// Only affects locators resolved afterwards.
    pub fn set_platform(&self, platform: Platform) -> &Self {
        debug!(%platform, "Context platform changed");
        self.inner.settings.write().platform = platform;
        self
    }

    /// Sets the default wait timeout.
    pub fn set_timeout(&self, timeout: Duration) -> &Self {
        self.inner.settings.write().options.timeout = timeout;
        self
    }

    /// Sets the default poll interval.
    pub fn set_poll_interval(&self, poll_interval: Duration) -> &Self {
        self.inner.settings.write().options.poll_interval = poll_interval;
        self
    }

    /// Replaces the options.
    pub fn set_options(&self, options: PageObjectOptions) -> &Self {
        self.inner.settings.write().options = options;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDriver;

    #[test]
    fn test_settings_are_shared_between_clones() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        let clone = context.clone();

        clone
            .set_platform(Platform::MobileIos)
            .set_timeout(Duration::from_secs(2));

        assert_eq!(context.platform(), Platform::MobileIos);
        assert_eq!(context.timeout(), Duration::from_secs(2));
    }

    #[test]
    fn test_wait_reflects_options() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Default);
        context.set_options(
            PageObjectOptions::new()
                .with_timeout(Duration::from_millis(500))
                .with_poll_interval(Duration::from_millis(50)),
        );

        let wait = context.wait();
        assert_eq!(wait.timeout(), Duration::from_millis(500));
        assert_eq!(wait.poll_interval(), Duration::from_millis(50));
        assert_eq!(context.poll_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_debug_shows_platform() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::OttAppleTv);
        assert!(format!("{context:?}").contains("OttAppleTv"));
    }
}
