//! Page-object options.
//!
//! Wait timings and list/parent refresh behaviour shared by every element
//! created from one [`PageObjectContext`](super::PageObjectContext).
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use page_object_driver::PageObjectOptions;
//!
//! let options = PageObjectOptions::new()
//!     .with_timeout(Duration::from_secs(5))
//!     .with_poll_interval(Duration::from_millis(250))
//!     .with_throw_on_empty_list(false);
//!
//! assert!(options.validate().is_ok());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default wait timeout (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default poll interval (1 second).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// PageObjectOptions
// ============================================================================

/// Options applied to every element of a context.
///
/// Durations serialize as whole milliseconds (`timeout_ms`,
/// `poll_interval_ms`) so settings can be loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageObjectOptions {
    /// Default wait timeout.
    #[serde(rename = "timeout_ms", with = "millis")]
    pub timeout: Duration,

    /// Default poll interval.
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,

    /// Fail list initialization when nothing matches.
    pub throw_on_empty_list: bool,

    /// Re-run the list lookup before every list access.
    pub auto_refresh_list: bool,

    /// Re-find the whole parent chain before a nested element lookup.
    pub auto_refresh_parent_chain: bool,
}

impl Default for PageObjectOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl PageObjectOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            throw_on_empty_list: true,
            auto_refresh_list: false,
            auto_refresh_parent_chain: false,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl PageObjectOptions {
    /// Sets the default wait timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default poll interval.
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Sets whether an empty list is an error.
    #[inline]
    #[must_use]
    pub fn with_throw_on_empty_list(mut self, throw: bool) -> Self {
        self.throw_on_empty_list = throw;
        self
    }

    /// Sets whether lists re-run their lookup on every access.
    #[inline]
    #[must_use]
    pub fn with_auto_refresh_list(mut self, refresh: bool) -> Self {
        self.auto_refresh_list = refresh;
        self
    }

    /// Sets whether parents are re-found before nested lookups.
    #[inline]
    #[must_use]
    pub fn with_auto_refresh_parent_chain(mut self, refresh: bool) -> Self {
        self.auto_refresh_parent_chain = refresh;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl PageObjectOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the poll interval is zero while the timeout is
    /// not, or if the poll interval exceeds the timeout.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Ok(());
        }

        if self.poll_interval.is_zero() {
            return Err(Error::config(
                "Poll interval must be greater than zero when a timeout is set",
            ));
        }

        if self.poll_interval > self.timeout {
            return Err(Error::config(format!(
                "Poll interval ({}ms) must not exceed the timeout ({}ms)",
                self.poll_interval.as_millis(),
                self.timeout.as_millis()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Serde Helpers
// ============================================================================

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

// ============================================================================
// Tests
// ============================================================================
