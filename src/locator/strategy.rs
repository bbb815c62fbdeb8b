//! Element locator strategies.
//!
//! Provides Selenium/Appium-like `By` selectors for finding elements.
//!
//! # Example
//!
//! ```
//! use page_object_driver::{By, Strategy};
//!
//! let btn = By::css("#submit");
//! assert_eq!(btn.strategy(), Strategy::Css);
//! assert_eq!(btn.to_string(), "By.cssSelector: #submit");
//!
//! let parsed = By::parse("By.xpath: //button").unwrap();
//! assert_eq!(parsed, By::xpath("//button"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Strategy Enum
// ============================================================================

/// Locator strategy.
///
/// Native strategies are passed to the driver as-is. [`Strategy::JQuery`]
/// and [`Strategy::JavaScript`] are script-based and are evaluated through
/// `execute_script` by the lazy element layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
    /// Element ID.
    Id,
    /// CSS selector.
    Css,
    /// XPath expression.
    XPath,
    /// Single class name.
    ClassName,
    /// `name` attribute.
    Name,
    /// Tag name.
    TagName,
    /// Exact link text.
    LinkText,
    /// Partial link text.
    PartialLinkText,
    /// Appium accessibility ID.
    AccessibilityId,
    /// Android UiAutomator expression.
    AndroidUiAutomator,
    /// iOS class chain.
    IosClassChain,
    /// iOS NSPredicate string.
    IosNsPredicate,
    /// Appium class name.
    AppiumClassName,
    /// jQuery/Sizzle document query.
    JQuery,
    /// JavaScript expression returning element(s).
    JavaScript,
}

impl Strategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Strategy; 15] = [
        Self::Id,
        Self::Css,
        Self::XPath,
        Self::ClassName,
        Self::Name,
        Self::TagName,
        Self::LinkText,
        Self::PartialLinkText,
        Self::AccessibilityId,
        Self::AndroidUiAutomator,
        Self::IosClassChain,
        Self::IosNsPredicate,
        Self::AppiumClassName,
        Self::JQuery,
        Self::JavaScript,
    ];

    /// Returns the `By` display prefix (e.g. `By.cssSelector`).
    #[must_use]
    pub const fn by_prefix(self) -> &'static str {
        match self {
            Self::Id => "By.id",
            Self::Css => "By.cssSelector",
            Self::XPath => "By.xpath",
            Self::ClassName => "By.className",
            Self::Name => "By.name",
            Self::TagName => "By.tagName",
            Self::LinkText => "By.linkText",
            Self::PartialLinkText => "By.partialLinkText",
            Self::AccessibilityId => "By.AccessibilityId",
            Self::AndroidUiAutomator => "By.AndroidUIAutomator",
            Self::IosClassChain => "By.IosClassChain",
            Self::IosNsPredicate => "By.IosNsPredicate",
            Self::AppiumClassName => "AppiumBy.className",
            Self::JQuery => "By.JQuery",
            Self::JavaScript => "By.JavaScript",
        }
    }

    /// Returns the W3C / Appium `using` value sent to the driver.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Css => "css selector",
            Self::XPath => "xpath",
            Self::ClassName | Self::AppiumClassName => "class name",
            Self::Name => "name",
            Self::TagName => "tag name",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::AccessibilityId => "accessibility id",
            Self::AndroidUiAutomator => "-android uiautomator",
            Self::IosClassChain => "-ios class chain",
            Self::IosNsPredicate => "-ios predicate string",
            Self::JQuery => "jquery",
            Self::JavaScript => "javascript",
        }
    }

    /// Returns `true` for strategies evaluated by executing a script.
    #[inline]
    #[must_use]
    pub const fn is_script_based(self) -> bool {
        matches!(self, Self::JQuery | Self::JavaScript)
    }

    /// Detects the strategy of a `By` display string.
    ///
    /// Longer prefixes are checked first so `By.linkText` never shadows
    /// `By.partialLinkText`-style overlaps.
    pub fn for_by_string(by: &str) -> Result<Strategy> {
        let mut candidates: Vec<Strategy> = Self::ALL
            .into_iter()
            .filter(|s| by.starts_with(s.by_prefix()))
            .collect();
        candidates.sort_by_key(|s| std::cmp::Reverse(s.by_prefix().len()));
        candidates
            .first()
            .copied()
            .ok_or_else(|| Error::config(format!("Could not detect strategy for by [{by}]")))
    }

    /// Extracts the selector from a `By` display string of this strategy.
    pub fn parse_locator_string(self, by: &str) -> Result<String> {
        let rest = by.strip_prefix(self.by_prefix()).ok_or_else(|| {
            Error::config(format!(
                "Could not parse locator string from by [{by}] using strategy [{}]",
                self.by_prefix()
            ))
        })?;
        let rest = rest.strip_prefix(':').unwrap_or(rest);
        Ok(rest.trim_start().to_string())
    }
}

// ============================================================================
// By
// ============================================================================

/// A concrete `(strategy, selector)` pair handed to the native driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct By {
    strategy: Strategy,
    value: String,
}

impl By {
    /// Creates a selector for any strategy.
    #[inline]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Strategy::Id, id)
    }

    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, expr)
    }

    /// Creates a name attribute selector.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Strategy::Name, name)
    }

    /// Creates a tag name selector.
    #[inline]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, tag)
    }

    /// Creates an accessibility ID selector.
    #[inline]
    pub fn accessibility_id(id: impl Into<String>) -> Self {
        Self::new(Strategy::AccessibilityId, id)
    }

    /// Creates a jQuery selector.
    #[inline]
    pub fn jquery(selector: impl Into<String>) -> Self {
        Self::new(Strategy::JQuery, selector)
    }

    /// Creates a JavaScript selector.
    #[inline]
    pub fn javascript(script: impl Into<String>) -> Self {
        Self::new(Strategy::JavaScript, script)
    }

    /// Parses a `By.xxx: value` display string.
    pub fn parse(by: &str) -> Result<Self> {
        let strategy = Strategy::for_by_string(by)?;
        let value = strategy.parse_locator_string(by)?;
        Ok(Self { strategy, value })
    }

    /// Returns the strategy.
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the selector value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy.by_prefix(), self.value)
    }
}

impl From<&str> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: &str) -> Self {
        Self::css(s)
    }
}

impl From<String> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: String) -> Self {
        Self::css(s)
    }
}

// ============================================================================
// Tests
// ============================================================================
