//! Condition builders.
//!
//! [`Until`] picks what a condition applies to; the returned
//! [`ConditionBuilder`] picks the check.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use page_object_driver::sync::{Condition, Until};
//! use page_object_driver::{PageObjectContext, Result, Text};
//!
//! async fn first_sale(context: &PageObjectContext, banner: &Text, rows: &[Text]) -> Result<Text> {
//!     Until::element(banner).visible().wait_then_return(context).await?;
//!     Until::one_of(rows)
//!         .text_contains("SALE")
//!         .with_timeout(Duration::from_secs(3))
//!         .wait_then_return(context)
//!         .await
//! }
//! ```

use std::future::Future;

use crate::element::UiElement;
use crate::error::Result;

use super::all::AllMatchCondition;
use super::condition::Check;
use super::first::FirstMatchCondition;
use super::single::UiElementCondition;

// ============================================================================
// Subjects
// ============================================================================

/// What a check is bound to.
pub trait Subject {
    /// Element kind checked.
    type Element: UiElement;

    /// Condition produced by binding a check.
    type Condition;

    /// Binds `check` to this subject.
    fn bind(self, check: Check<Self::Element>) -> Self::Condition;
}

/// One element.
#[derive(Debug, Clone)]
pub struct OneElement<E>(E);

/// Every element of a set.
#[derive(Debug, Clone)]
pub struct AllOf<E>(Vec<E>);

/// The first matching element of a set.
#[derive(Debug, Clone)]
pub struct OneOf<E>(Vec<E>);

impl<E: UiElement> Subject for OneElement<E> {
    type Element = E;
    type Condition = UiElementCondition<E>;

    fn bind(self, check: Check<E>) -> Self::Condition {
        UiElementCondition::new(self.0, check)
    }
}

impl<E: UiElement> Subject for AllOf<E> {
    type Element = E;
    type Condition = AllMatchCondition<E>;

    fn bind(self, check: Check<E>) -> Self::Condition {
        AllMatchCondition::new(self.0, check)
    }
}

impl<E: UiElement> Subject for OneOf<E> {
    type Element = E;
    type Condition = FirstMatchCondition<E>;

    fn bind(self, check: Check<E>) -> Self::Condition {
        FirstMatchCondition::new(self.0, check)
    }
}

// ============================================================================
// Until
// ============================================================================

/// Entry point for building conditions.
#[derive(Debug, Clone, Copy)]
pub struct Until;

impl Until {
    /// Conditions over one element.
    #[must_use]
    pub fn element<E: UiElement>(element: &E) -> ConditionBuilder<OneElement<E>> {
        ConditionBuilder::new(OneElement(element.clone()))
    }

    /// Conditions every element must satisfy on the same poll.
    #[must_use]
    pub fn all_of<E: UiElement>(elements: &[E]) -> ConditionBuilder<AllOf<E>> {
        ConditionBuilder::new(AllOf(elements.to_vec()))
    }

    /// Conditions the first matching element satisfies.
    #[must_use]
    pub fn one_of<E: UiElement>(elements: &[E]) -> ConditionBuilder<OneOf<E>> {
        ConditionBuilder::new(OneOf(elements.to_vec()))
    }
}

// ============================================================================
// ConditionBuilder
// ============================================================================

/// Picks the check for a subject.
#[derive(Debug, Clone)]
pub struct ConditionBuilder<S> {
    subject: S,
}

impl<S: Subject> ConditionBuilder<S> {
    fn new(subject: S) -> Self {
        Self { subject }
    }

    /// Binds an arbitrary check.
    #[must_use]
    pub fn check(self, check: Check<S::Element>) -> S::Condition {
        self.subject.bind(check)
    }

    /// Present in the document.
    #[must_use]
    pub fn present(self) -> S::Condition {
        self.check(Check::present())
    }

    /// Absent from the document.
    #[must_use]
    pub fn not_present(self) -> S::Condition {
        self.check(Check::not_present())
    }

    /// Displayed.
    #[must_use]
    pub fn visible(self) -> S::Condition {
        self.check(Check::visible())
    }

    /// Absent or hidden.
    #[must_use]
    pub fn not_visible(self) -> S::Condition {
        self.check(Check::not_visible())
    }

    /// Displayed and enabled.
    #[must_use]
    pub fn clickable(self) -> S::Condition {
        self.check(Check::clickable())
    }

    /// Absent, hidden or disabled.
    #[must_use]
    pub fn not_clickable(self) -> S::Condition {
        self.check(Check::not_clickable())
    }

    /// Enabled.
    #[must_use]
    pub fn enabled(self) -> S::Condition {
        self.check(Check::enabled())
    }

    /// Absent or disabled.
    #[must_use]
    pub fn not_enabled(self) -> S::Condition {
        self.check(Check::not_enabled())
    }

    /// Attribute set to a non-empty value.
    #[must_use]
    pub fn attribute_exists(self, attribute: impl Into<String>) -> S::Condition {
        self.check(Check::attribute_exists(attribute))
    }

    /// Attribute equal to `expected`.
    #[must_use]
    pub fn attribute_equals(self, attribute: impl Into<String>, expected: impl Into<String>) -> S::Condition {
        self.check(Check::attribute_equals(attribute, expected))
    }

    /// Attribute containing `fragment`.
    #[must_use]
    pub fn attribute_contains(self, attribute: impl Into<String>, fragment: impl Into<String>) -> S::Condition {
        self.check(Check::attribute_contains(attribute, fragment))
    }

    /// Visible text equal to `expected`.
    #[must_use]
    pub fn text_equals(self, expected: impl Into<String>) -> S::Condition {
        self.check(Check::text_equals(expected))
    }

    /// Visible text containing `fragment`.
    #[must_use]
    pub fn text_contains(self, fragment: impl Into<String>) -> S::Condition {
        self.check(Check::text_contains(fragment))
    }

    /// A user predicate, described by `description` in timeout errors.
    #[must_use]
    pub fn meets_custom_condition<F, Fut>(self, predicate: F, description: impl Into<String>) -> S::Condition
    where
        F: Fn(S::Element) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        self.check(Check::new(description, predicate))
    }
}
