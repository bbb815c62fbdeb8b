//! Error types for page-object resolution, lazy elements and waits.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```no_run
//! use page_object_driver::{Button, Error, Interactable, Result};
//!
//! async fn press(button: &Button) -> Result<bool> {
//!     match button.click().await {
//!         Ok(()) => Ok(true),
//!         Err(Error::ElementNotVisible { .. }) => Ok(false),
//!         Err(e) => Err(e),
//!     }
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Locator | [`Error::NoMatchingLocator`], [`Error::AmbiguousLocator`], [`Error::MissingLocator`], [`Error::InvalidLocatorChain`], [`Error::NoMatchingImplementation`], [`Error::AmbiguousImplementation`] |
//! | Element | [`Error::ElementNotFound`], [`Error::StaleElement`], [`Error::NotInteractable`], [`Error::ElementNotVisible`] |
//! | Execution | [`Error::ConditionTimeout`], [`Error::Timeout`], [`Error::ScriptError`], [`Error::Unsupported`] |
//! | Driver | [`Error::Driver`] |
//! | External | [`Error::Json`] |
//!
//! Locator errors describe a broken page-object declaration and are never
//! retried. Stale and not-interactable errors are transient and are retried
//! once by [`LazyElement`](crate::LazyElement) before they reach the caller.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::ElementId;
use crate::platform::Platform;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant carries enough context (field, platform, locator chain,
/// timings) to diagnose a failure without re-running with extra logging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when context options or builder input are invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Locator Errors
    // ========================================================================
    /// No declaration matched anywhere along the platform fallback chain.
    #[error("No locator declared for field [{field}] on platform [{platform}] or any of its fallbacks")]
    NoMatchingLocator {
        /// Field the declarations belong to (`Owner#field`).
        field: String,
        /// Platform resolution started from.
        platform: Platform,
    },

    /// More than one declaration matched at the same fallback level.
    #[error("Ambiguous locator for field [{field}]: {count} declarations match platform [{platform}]")]
    AmbiguousLocator {
        /// Field the declarations belong to (`Owner#field`).
        field: String,
        /// Fallback level where the conflict was found.
        platform: Platform,
        /// Number of conflicting declarations.
        count: usize,
    },

    /// An element or list was asked to initialize without any locator.
    #[error("Could not initialize element without a locator matching platform [{platform}]")]
    MissingLocator {
        /// Current context platform.
        platform: Platform,
    },

    /// A parent chain cannot be composed into a single document query.
    #[error("Invalid locator chain: {message}")]
    InvalidLocatorChain {
        /// Description of the offending link.
        message: String,
    },

    /// No component implementation matched along the fallback chain.
    #[error("No implementation of [{component}] declared for platform [{platform}] or any of its fallbacks")]
    NoMatchingImplementation {
        /// Component the implementations belong to.
        component: String,
        /// Platform resolution started from.
        platform: Platform,
    },

    /// More than one component implementation matched at the same level.
    #[error("Ambiguous implementation of [{component}]: {count} implementations match platform [{platform}]")]
    AmbiguousImplementation {
        /// Component the implementations belong to.
        component: String,
        /// Fallback level where the conflict was found.
        platform: Platform,
        /// Number of conflicting implementations.
        count: usize,
    },

    // ========================================================================
    // Element Errors
    // ========================================================================
    /// Element could not be found.
    #[error("Could not find element{}. Locator [{locator}]", .variable.as_deref().map(|v| format!(" [{v}]")).unwrap_or_default())]
    ElementNotFound {
        /// Page-object variable name, when known.
        variable: Option<String>,
        /// Locator (or locator chain) used for the search.
        locator: String,
    },

    /// Element is stale (no longer attached to the DOM).
    #[error("Stale element: {element_id}")]
    StaleElement {
        /// The stale element's ID.
        element_id: ElementId,
    },

    /// Native call refused because the element is not interactable yet.
    #[error("Element not interactable: {message}")]
    NotInteractable {
        /// Message reported by the driver.
        message: String,
    },

    /// Waiting for visibility after a not-interactable failure timed out.
    #[error("Element not visible. Locator {locator}. Platform [{platform}]. Waited {timeout_ms}ms")]
    ElementNotVisible {
        /// Full locator chain of the element.
        locator: String,
        /// Platform the locator was matched at.
        platform: Platform,
        /// Milliseconds waited for visibility.
        timeout_ms: u64,
    },

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// A polled condition never became true.
    #[error("Timed out waiting until {subject} {description}. Waited {timeout_ms}ms with polling interval {poll_ms}ms")]
    ConditionTimeout {
        /// What the condition was applied to.
        subject: String,
        /// Human-readable condition description.
        description: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
        /// Poll interval in milliseconds.
        poll_ms: u64,
    },

    /// Generic operation timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// JavaScript execution error.
    #[error("Script error: {message}")]
    ScriptError {
        /// Error message from script execution.
        message: String,
    },

    /// Operation not supported by the current platform or driver.
    #[error("Unsupported operation: {operation}")]
    Unsupported {
        /// Description of the unsupported operation.
        operation: String,
    },

    // ========================================================================
    // Driver Errors
    // ========================================================================
    /// Any other failure reported by the native driver.
    #[error("Driver error: {message}")]
    Driver {
        /// Message reported by the driver.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a no-matching-locator error.
    #[inline]
    pub fn no_matching_locator(field: impl Into<String>, platform: Platform) -> Self {
        Self::NoMatchingLocator {
            field: field.into(),
            platform,
        }
    }

    /// Creates an ambiguous-locator error.
    #[inline]
    pub fn ambiguous_locator(field: impl Into<String>, platform: Platform, count: usize) -> Self {
        Self::AmbiguousLocator {
            field: field.into(),
            platform,
            count,
        }
    }

    /// Creates an invalid locator chain error.
    #[inline]
    pub fn invalid_locator_chain(message: impl Into<String>) -> Self {
        Self::InvalidLocatorChain {
            message: message.into(),
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(variable: Option<&str>, locator: impl Into<String>) -> Self {
        Self::ElementNotFound {
            variable: variable.map(str::to_string),
            locator: locator.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(element_id: ElementId) -> Self {
        Self::StaleElement { element_id }
    }

    /// Creates a not-interactable error.
    #[inline]
    pub fn not_interactable(message: impl Into<String>) -> Self {
        Self::NotInteractable {
            message: message.into(),
        }
    }

    /// Creates a script error.
    #[inline]
    pub fn script_error(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates an unsupported operation error.
    #[inline]
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Creates a generic driver error.
    #[inline]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if the native handle went stale.
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleElement { .. })
    }

    /// Returns `true` if the element refused interaction.
    ///
    /// Drivers that only report a generic error still qualify when the
    /// message carries the W3C "not pointer or keyboard interactable" text.
    #[must_use]
    pub fn is_not_interactable(&self) -> bool {
        match self {
            Self::NotInteractable { .. } => true,
            Self::Driver { message } => message.contains("not pointer or keyboard interactable"),
            _ => false,
        }
    }

    /// Returns `true` if this is a page-object declaration error.
    #[inline]
    #[must_use]
    pub fn is_locator_error(&self) -> bool {
        matches!(
            self,
            Self::NoMatchingLocator { .. }
                | Self::AmbiguousLocator { .. }
                | Self::MissingLocator { .. }
                | Self::InvalidLocatorChain { .. }
                | Self::NoMatchingImplementation { .. }
                | Self::AmbiguousImplementation { .. }
        )
    }

    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConditionTimeout { .. } | Self::Timeout { .. } | Self::ElementNotVisible { .. }
        )
    }

    /// Returns `true` if this is an element lookup or state error.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::StaleElement { .. }
                | Self::NotInteractable { .. }
                | Self::ElementNotVisible { .. }
        )
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on retry.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.is_stale()
            || self.is_not_interactable()
            || matches!(
                self,
                Self::ElementNotFound { .. } | Self::Timeout { .. } | Self::ConditionTimeout { .. }
            )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_locator_names_field_and_platform() {
        let err = Error::no_matching_locator("LoginPage#submit", Platform::WebDesktopChrome);
        let text = err.to_string();
        assert!(text.contains("LoginPage#submit"));
        assert!(text.contains("WebDesktopChrome"));
        assert!(err.is_locator_error());
    }

    #[test]
    fn test_ambiguous_locator_display() {
        let err = Error::ambiguous_locator("LoginPage#submit", Platform::Web, 2);
        assert_eq!(
            err.to_string(),
            "Ambiguous locator for field [LoginPage#submit]: 2 declarations match platform [Web]"
        );
    }

    #[test]
    fn test_element_not_found_display() {
        let named = Error::element_not_found(Some("Home#logo"), "By.id: logo");
        assert_eq!(
            named.to_string(),
            "Could not find element [Home#logo]. Locator [By.id: logo]"
        );

        let anonymous = Error::element_not_found(None, "By.id: logo");
        assert_eq!(anonymous.to_string(), "Could not find element. Locator [By.id: logo]");
    }

    #[test]
    fn test_condition_timeout_display() {
        let err = Error::ConditionTimeout {
            subject: "Button".into(),
            description: "is visible".into(),
            timeout_ms: 1000,
            poll_ms: 100,
        };
        assert_eq!(
            err.to_string(),
            "Timed out waiting until Button is visible. Waited 1000ms with polling interval 100ms"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_is_not_interactable_from_driver_message() {
        let err = Error::driver("element click intercepted: not pointer or keyboard interactable");
        assert!(err.is_not_interactable());
        assert!(!Error::driver("boom").is_not_interactable());
        assert!(Error::not_interactable("hidden").is_not_interactable());
    }

    #[test]
    fn test_stale_and_not_interactable_are_distinct() {
        let stale = Error::stale_element(ElementId::new("e-1"));
        let hidden = Error::not_interactable("hidden");

        assert!(stale.is_stale());
        assert!(!stale.is_not_interactable());
        assert!(!hidden.is_stale());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::stale_element(ElementId::new("e-1")).is_recoverable());
        assert!(!Error::config("bad").is_recoverable());
        assert!(!Error::ambiguous_locator("A#b", Platform::Default, 2).is_recoverable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
