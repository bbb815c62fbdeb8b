//! Locator declarations and resolved locators.
//!
//! A page-object field carries a static table of [`Locate`] declarations,
//! one per platform it supports. Resolving the table against the current
//! [`Platform`] yields a [`Locator`], which turns into a concrete [`By`]
//! once format arguments are applied.
//!
//! # Example
//!
//! ```
//! use page_object_driver::{FieldLocators, Locate, Platform, Strategy};
//!
//! const SUBMIT: FieldLocators = FieldLocators::new(
//!     "LoginPage",
//!     "submit",
//!     &[
//!         Locate::new(Platform::Web, Strategy::Css, "button[type='submit']"),
//!         Locate::new(Platform::Mobile, Strategy::AccessibilityId, "submit"),
//!     ],
//! );
//!
//! let locator = SUBMIT.resolve(Platform::WebDesktopChrome).unwrap();
//! assert_eq!(locator.platform(), Platform::Web);
//! assert_eq!(locator.variable_name(), Some("LoginPage#submit"));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::platform::Platform;

use super::resolve::filter_by_platform;
use super::strategy::{By, Strategy};

// ============================================================================
// Constants
// ============================================================================

/// Matches `%s`, `%d` and the `%%` escape.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%([sd%])").expect("placeholder pattern is valid"));

// ============================================================================
// Locate
// ============================================================================

/// One `(platform, strategy, selector)` declaration for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locate {
    /// Platform this declaration applies to.
    pub on: Platform,
    /// Lookup strategy.
    pub using: Strategy,
    /// Selector, optionally containing `%s` / `%d` placeholders.
    pub value: &'static str,
    /// Whether the element hosts a shadow root its children live under.
    pub shadow_root: bool,
}

impl Locate {
    /// Creates a declaration.
    #[inline]
    #[must_use]
    pub const fn new(on: Platform, using: Strategy, value: &'static str) -> Self {
        Self {
            on,
            using,
            value,
            shadow_root: false,
        }
    }

    /// Marks the element as a shadow-root host.
    #[inline]
    #[must_use]
    pub const fn shadow_root(mut self) -> Self {
        self.shadow_root = true;
        self
    }
}

// ============================================================================
// FieldLocators
// ============================================================================

/// The full declaration table of one page-object field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocators {
    owner: &'static str,
    field: &'static str,
    locates: &'static [Locate],
}

impl FieldLocators {
    /// Creates a field table.
    #[inline]
    #[must_use]
    pub const fn new(owner: &'static str, field: &'static str, locates: &'static [Locate]) -> Self {
        Self {
            owner,
            field,
            locates,
        }
    }

    /// Returns the owning page-object name.
    #[inline]
    #[must_use]
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    /// Returns the field name.
    #[inline]
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the declarations in declaration order.
    #[inline]
    #[must_use]
    pub const fn locates(&self) -> &'static [Locate] {
        self.locates
    }

    /// Returns the `Owner#field` identifier.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}#{}", self.owner, self.field)
    }

    /// Resolves the declaration for `platform` along its fallback chain.
    ///
    /// # Errors
    ///
    /// - [`Error::NoMatchingLocator`] if nothing matches anywhere on the chain
    /// - [`Error::AmbiguousLocator`] if the first matching level has several
    pub fn resolve(&self, platform: Platform) -> Result<Locator> {
        let (matched, hits) = filter_by_platform(self.locates, platform)
            .ok_or_else(|| Error::no_matching_locator(self.id(), platform))?;

        match hits.as_slice() {
            [single] => Ok(Locator::from_locate(single).with_variable_name(self.id())),
            _ => Err(Error::ambiguous_locator(self.id(), matched, hits.len())),
        }
    }
}

// ============================================================================
// Locator
// ============================================================================

/// A resolved locator, ready to be formatted into a [`By`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
    platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variable_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    #[serde(default)]
    shadow_root: bool,
}

// ============================================================================
// Locator - Constructors
// ============================================================================

impl Locator {
    /// Creates a locator matched at [`Platform::Default`].
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
            platform: Platform::Default,
            variable_name: None,
            index: None,
            shadow_root: false,
        }
    }

    /// Creates a locator from a declaration.
    #[must_use]
    pub fn from_locate(locate: &Locate) -> Self {
        Self {
            platform: locate.on,
            shadow_root: locate.shadow_root,
            ..Self::new(locate.using, locate.value)
        }
    }

    /// Creates a locator from a concrete selector.
    #[must_use]
    pub fn from_by(by: &By, platform: Platform) -> Self {
        Self {
            platform,
            ..Self::new(by.strategy(), by.value())
        }
    }

    /// Sets the platform the locator was matched at.
    #[inline]
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Sets the diagnostic variable name (`Owner#field`).
    #[inline]
    #[must_use]
    pub fn with_variable_name(mut self, name: impl Into<String>) -> Self {
        self.variable_name = Some(name.into());
        self
    }

    /// Marks the element as a shadow-root host.
    #[inline]
    #[must_use]
    pub fn with_shadow_root(mut self, shadow_root: bool) -> Self {
        self.shadow_root = shadow_root;
        self
    }

    /// Returns a copy pointing at the `index`-th match.
    ///
    /// Indexed copies are list members and never host a shadow root.
    #[must_use]
    pub fn with_index(&self, index: usize) -> Self {
        Self {
            index: Some(index),
            shadow_root: false,
            ..self.clone()
        }
    }
}

// ============================================================================
// Locator - Accessors
// ============================================================================

impl Locator {
    /// Returns the strategy.
    #[inline]
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the unformatted selector.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the platform the locator was matched at.
    #[inline]
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the diagnostic variable name, if any.
    #[inline]
    #[must_use]
    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    /// Returns the list index, if any.
    #[inline]
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns `true` if the element hosts a shadow root.
    #[inline]
    #[must_use]
    pub fn is_shadow_root(&self) -> bool {
        self.shadow_root
    }
}

// ============================================================================
// Locator - Formatting
// ============================================================================

impl Locator {
    /// Builds the concrete selector, filling placeholders from `args`.
    ///
    /// Placeholders are consumed in order. With no arguments the selector
    /// is used verbatim; a placeholder without a matching argument is kept.
    #[must_use]
    pub fn by(&self, args: &[String]) -> By {
        By::new(self.strategy, format_selector(&self.value, args))
    }

    /// Returns the document-query fragment of this locator.
    ///
    /// Only JQuery and CSS locators compose into a single query; indexed
    /// locators get `:eq(index)` appended. Returns `None` for any other
    /// strategy.
    #[must_use]
    pub fn query_string(&self, args: &[String]) -> Option<String> {
        match self.strategy {
            Strategy::JQuery | Strategy::Css => {
                let selector = format_selector(&self.value, args).into_owned();
                Some(match self.index {
                    Some(index) => format!("{selector}:eq({index})"),
                    None => selector,
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy.by_prefix(), self.value)?;
        if let Some(index) = self.index {
            write!(f, " [{index}]")?;
        }
        Ok(())
    }
}

/// Substitutes `%s` / `%d` placeholders positionally.
fn format_selector<'a>(selector: &'a str, args: &[String]) -> Cow<'a, str> {
    if args.is_empty() {
        return Cow::Borrowed(selector);
    }

    let mut next = args.iter();
    PLACEHOLDER.replace_all(selector, |caps: &Captures<'_>| {
        if &caps[1] == "%" {
            return "%".to_string();
        }
        next.next()
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LOGO: FieldLocators = FieldLocators::new(
        "HomePage",
        "logo",
        &[
            Locate::new(Platform::Default, Strategy::Id, "logo"),
            Locate::new(Platform::WebDesktop, Strategy::Css, "#desktop-logo"),
            Locate::new(Platform::Mobile, Strategy::AccessibilityId, "logo"),
        ],
    );

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_resolve_exact_platform() {
        let locator = LOGO.resolve(Platform::WebDesktop).unwrap();
        assert_eq!(locator.strategy(), Strategy::Css);
        assert_eq!(locator.platform(), Platform::WebDesktop);
    }

    #[test]
    fn test_resolve_walks_fallback_chain() {
        let locator = LOGO.resolve(Platform::WebDesktopFirefox).unwrap();
        assert_eq!(locator.value(), "#desktop-logo");

        let locator = LOGO.resolve(Platform::MobileIosTablet).unwrap();
        assert_eq!(locator.strategy(), Strategy::AccessibilityId);
        assert_eq!(locator.platform(), Platform::Mobile);
    }

    #[test]
    fn test_resolve_root_declaration_reaches_everything() {
        let locator = LOGO.resolve(Platform::OttFireTv4k).unwrap();
        assert_eq!(locator.platform(), Platform::Default);
        assert_eq!(locator.variable_name(), Some("HomePage#logo"));
    }

    #[test]
    fn test_resolve_missing_names_field() {
        const ONLY_MOBILE: FieldLocators = FieldLocators::new(
            "Cart",
            "checkout",
            &[Locate::new(Platform::Mobile, Strategy::Id, "checkout")],
        );

        let err = ONLY_MOBILE.resolve(Platform::WebDesktopChrome).unwrap_err();
        assert!(matches!(err, Error::NoMatchingLocator { .. }));
        assert!(err.to_string().contains("Cart#checkout"));
    }

    #[test]
    fn test_resolve_ambiguous() {
        const TWICE: FieldLocators = FieldLocators::new(
            "Cart",
            "total",
            &[
                Locate::new(Platform::Web, Strategy::Id, "total"),
                Locate::new(Platform::Web, Strategy::Css, ".total"),
                Locate::new(Platform::WebDesktop, Strategy::Css, ".desktop-total"),
            ],
        );

        let err = TWICE.resolve(Platform::WebMobilePhone).unwrap_err();
        match err {
            Error::AmbiguousLocator {
                platform, count, ..
            } => {
                assert_eq!(platform, Platform::Web);
                assert_eq!(count, 2);
            }
            other => panic!("unexpected error: {other}"),
        }

        // A closer unique declaration shadows the ambiguous level.
        assert!(TWICE.resolve(Platform::WebDesktopSafari).is_ok());
    }

    #[test]
    fn test_shadow_root_flag() {
        const HOST: FieldLocators = FieldLocators::new(
            "Shell",
            "host",
            &[Locate::new(Platform::Default, Strategy::Css, "my-app").shadow_root()],
        );

        let locator = HOST.resolve(Platform::Web).unwrap();
        assert!(locator.is_shadow_root());
        assert!(!locator.with_index(0).is_shadow_root());
    }

    #[test]
    fn test_by_formats_placeholders() {
        let locator = Locator::new(Strategy::XPath, "//li[%d]/a[text()='%s']");
        let by = locator.by(&args(&["3", "Home"]));
        assert_eq!(by.value(), "//li[3]/a[text()='Home']");
    }

    #[test]
    fn test_by_without_args_is_verbatim() {
        let locator = Locator::new(Strategy::Css, "div[data-pct='100%%']");
        assert_eq!(locator.by(&[]).value(), "div[data-pct='100%%']");
        assert_eq!(locator.by(&args(&["x"])).value(), "div[data-pct='100%']");
    }

    #[test]
    fn test_by_missing_argument_keeps_placeholder() {
        let locator = Locator::new(Strategy::Css, "#%s-%s");
        assert_eq!(locator.by(&args(&["a"])).value(), "#a-%s");
    }

    #[test]
    fn test_query_string() {
        let css = Locator::new(Strategy::Css, ".row");
        assert_eq!(css.query_string(&[]).as_deref(), Some(".row"));
        assert_eq!(css.with_index(2).query_string(&[]).as_deref(), Some(".row:eq(2)"));

        let jquery = Locator::new(Strategy::JQuery, "li:contains('%s')");
        assert_eq!(
            jquery.query_string(&args(&["Tea"])).as_deref(),
            Some("li:contains('Tea')")
        );

        assert!(Locator::new(Strategy::XPath, "//a").query_string(&[]).is_none());
    }

    #[test]
    fn test_with_index_keeps_identity() {
        let locator = LOGO.resolve(Platform::Web).unwrap().with_index(4);
        assert_eq!(locator.index(), Some(4));
        assert_eq!(locator.variable_name(), Some("HomePage#logo"));
        assert_eq!(locator.to_string(), "By.id: logo [4]");
    }

    #[test]
    fn test_locator_serde() {
        let locator = Locator::new(Strategy::Css, "#a").with_platform(Platform::WebDesktop);
        let json = serde_json::to_value(&locator).unwrap();
        assert_eq!(json["strategy"], "css");
        assert_eq!(json["platform"], "WebDesktop");
        let back: Locator = serde_json::from_value(json).unwrap();
        assert_eq!(back, locator);
    }
}
