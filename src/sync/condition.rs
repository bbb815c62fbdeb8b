//! Condition trait and element checks.
//!
//! A [`Check`] is a described predicate over one element. Conditions bind a
//! check to an element or a set of elements and poll it with a [`Wait`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use crate::context::PageObjectContext;
use crate::element::UiElement;
use crate::error::{Error, Result};

use super::wait::Wait;

// ============================================================================
// Check
// ============================================================================

/// Async predicate over one element.
pub type Predicate<E> = Arc<dyn Fn(E) -> BoxFuture<'static, Result<bool>> + Send + Sync>;

/// A described predicate over one element.
///
/// Checks run with the element's wait suspended, so a missing element is
/// reported on the current tick instead of being searched for.
pub struct Check<E> {
    description: String,
    predicate: Predicate<E>,
}

impl<E> Clone for Check<E> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<E> fmt::Debug for Check<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl<E: UiElement> Check<E> {
    /// Creates a check from an async predicate.
    pub fn new<F, Fut>(description: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        Self {
            description: description.into(),
            predicate: Arc::new(move |element| Box::pin(predicate(element))),
        }
    }

    /// Returns the human-readable description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Evaluates the check once against `element`.
    pub async fn evaluate(&self, element: &E) -> Result<bool> {
        let _single_check = element.lazy().suspend_wait();
        (self.predicate)(element.clone()).await
    }
}

// ============================================================================
// Check - Built-in Predicates
// ============================================================================

impl<E: UiElement> Check<E> {
    /// The element can be found.
    #[must_use]
    pub fn present() -> Self {
        Self::new("is present", |e: E| async move { e.exists().await })
    }

    /// The element cannot be found.
    #[must_use]
    pub fn not_present() -> Self {
        Self::new("is not present", |e: E| async move { Ok(!e.exists().await?) })
    }

    /// The element is displayed.
    #[must_use]
    pub fn visible() -> Self {
        Self::new("is visible", |e: E| async move { e.is_displayed().await })
    }

    /// The element is absent or hidden.
    #[must_use]
    pub fn not_visible() -> Self {
        Self::new("is not visible", |e: E| async move { Ok(!e.is_displayed().await?) })
    }

    /// The element is displayed and enabled.
    #[must_use]
    pub fn clickable() -> Self {
        Self::new("is clickable", |e: E| async move { e.is_clickable().await })
    }

    /// The element is absent, hidden or disabled.
    #[must_use]
    pub fn not_clickable() -> Self {
        Self::new("is not clickable", |e: E| async move { Ok(!e.is_clickable().await?) })
    }

    /// The element is enabled.
    #[must_use]
    pub fn enabled() -> Self {
        Self::new("is enabled", |e: E| async move { e.is_enabled().await })
    }

    /// The element is absent or disabled.
    #[must_use]
    pub fn not_enabled() -> Self {
        Self::new("is not enabled", |e: E| async move { Ok(!e.is_enabled().await?) })
    }

    /// The attribute is set to a non-empty value.
    #[must_use]
    pub fn attribute_exists(attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        Self::new(format!("has attribute [{attribute}]"), move |e: E| {
            let attribute = attribute.clone();
            async move {
                let value = e.attribute(&attribute).await?;
                Ok(value.is_some_and(|v| !v.is_empty()))
            }
        })
    }

    /// The attribute equals `expected`.
    #[must_use]
    pub fn attribute_equals(attribute: impl Into<String>, expected: impl Into<String>) -> Self {
        let attribute = attribute.into();
        let expected = expected.into();
        Self::new(
            format!("attribute [{attribute}] equals [{expected}]"),
            move |e: E| {
                let attribute = attribute.clone();
                let expected = expected.clone();
                async move { Ok(e.attribute(&attribute).await?.as_deref() == Some(expected.as_str())) }
            },
        )
    }

    /// The attribute contains `fragment`.
    #[must_use]
    pub fn attribute_contains(attribute: impl Into<String>, fragment: impl Into<String>) -> Self {
        let attribute = attribute.into();
        let fragment = fragment.into();
        Self::new(
            format!("attribute [{attribute}] contains [{fragment}]"),
            move |e: E| {
                let attribute = attribute.clone();
                let fragment = fragment.clone();
                async move {
                    let value = e.attribute(&attribute).await?;
                    Ok(value.is_some_and(|v| v.contains(fragment.as_str())))
                }
            },
        )
    }

    /// The visible text equals `expected`.
    #[must_use]
    pub fn text_equals(expected: impl Into<String>) -> Self {
        let expected = expected.into();
        Self::new(format!("text equals [{expected}]"), move |e: E| {
            let expected = expected.clone();
            async move { Ok(e.lazy().text().await? == expected) }
        })
    }

    /// The visible text contains `fragment`.
    #[must_use]
    pub fn text_contains(fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        Self::new(format!("text contains [{fragment}]"), move |e: E| {
            let fragment = fragment.clone();
            async move { Ok(e.lazy().text().await?.contains(fragment.as_str())) }
        })
    }
}

// ============================================================================
// Condition Trait
// ============================================================================

/// A check bound to its subject, ready to be waited on.
///
/// Conditions are immutable; one condition can be waited on many times.
#[async_trait]
pub trait Condition: Send + Sync {
    /// Value returned once the condition holds.
    type Output: Send;

    /// What the check is applied to, for diagnostics.
    fn subject(&self) -> String;

    /// Human-readable check description.
    fn description(&self) -> &str;

    /// Timeout override, if set.
    fn timeout_override(&self) -> Option<Duration>;

    /// Poll interval override, if set.
    fn poll_interval_override(&self) -> Option<Duration>;

    /// Evaluates the check once.
    ///
    /// `Ok(None)` means "not yet".
    async fn poll_once(&self) -> Result<Option<Self::Output>>;

    /// Waits using the overrides, else the context's timings.
    ///
    /// # Errors
    ///
    /// [`Error::ConditionTimeout`] when the check never held.
    async fn wait_then_return(&self, context: &PageObjectContext) -> Result<Self::Output> {
        let timeout = self.timeout_override().unwrap_or_else(|| context.timeout());
        let poll_interval = self
            .poll_interval_override()
            .unwrap_or_else(|| context.poll_interval());
        self.wait_then_return_with(context, timeout, poll_interval).await
    }

    /// Waits with explicit timings.
    ///
    /// # Errors
    ///
    /// [`Error::ConditionTimeout`] when the check never held.
    async fn wait_then_return_with(
        &self,
        context: &PageObjectContext,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<Self::Output> {
        let wait = Wait::new(timeout, poll_interval);
        debug!(
            subject = %self.subject(),
            description = self.description(),
            platform = %context.platform(),
            timeout_ms = wait.timeout_ms(),
            "Waiting for condition"
        );

        match wait.until(|| self.poll_once()).await? {
            Some(output) => Ok(output),
            None => Err(Error::ConditionTimeout {
                subject: self.subject(),
                description: self.description().to_string(),
                timeout_ms: wait.timeout_ms(),
                poll_ms: wait.poll_ms(),
            }),
        }
    }

    /// Returns whether the condition holds within the wait.
    ///
    /// Never fails: errors other than the timeout are logged and reported
    /// as `false`.
    async fn matches_condition(&self, context: &PageObjectContext) -> bool {
        match self.wait_then_return(context).await {
            Ok(_) => true,
            Err(e) if e.is_timeout() => false,
            Err(e) => {
                warn!(error = %e, subject = %self.subject(), "Condition failed");
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
