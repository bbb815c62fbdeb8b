//! Conditions over one element.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::element::UiElement;
use crate::error::Result;

use super::condition::{Check, Condition};

/// Waits until one element satisfies a check; returns the element.
pub struct UiElementCondition<E> {
    element: E,
    check: Check<E>,
    timeout: Option<Duration>,
    poll_interval: Option<Duration>,
}

impl<E: UiElement + fmt::Debug> fmt::Debug for UiElementCondition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiElementCondition")
            .field("element", &self.element)
            .field("check", &self.check)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl<E: UiElement> UiElementCondition<E> {
    /// Binds `check` to `element`.
    #[must_use]
    pub fn new(element: E, check: Check<E>) -> Self {
        Self {
            element,
            check,
            timeout: None,
            poll_interval: None,
        }
    }

    /// Overrides the context timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the context poll interval.
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = Some(poll_interval);
        self
    }
}

#[async_trait]
impl<E: UiElement> Condition for UiElementCondition<E> {
    type Output = E;

    fn subject(&self) -> String {
        E::KIND.to_string()
    }

    fn description(&self) -> &str {
        self.check.description()
    }

    fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    fn poll_interval_override(&self) -> Option<Duration> {
        self.poll_interval
    }

    async fn poll_once(&self) -> Result<Option<E>> {
        let matched = self.check.evaluate(&self.element).await?;
        Ok(matched.then(|| self.element.clone()))
    }
}
