//! Conditions satisfied by the first matching member of a set.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::element::UiElement;
use crate::error::Result;

use super::condition::{Check, Condition};

/// Waits until some element satisfies a check; returns the earliest one in
/// set order on the tick that succeeded.
///
/// An empty set never holds.
pub struct FirstMatchCondition<E> {
    elements: Vec<E>,
    check: Check<E>,
    timeout: Option<Duration>,
    poll_interval: Option<Duration>,
}

impl<E> fmt::Debug for FirstMatchCondition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirstMatchCondition")
            .field("elements", &self.elements.len())
            .field("check", &self.check)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl<E: UiElement> FirstMatchCondition<E> {
    /// Binds `check` to the set.
    #[must_use]
    pub fn new(elements: Vec<E>, check: Check<E>) -> Self {
        Self {
            elements,
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
impl<E: UiElement> Condition for FirstMatchCondition<E> {
    type Output = E;

    fn subject(&self) -> String {
        "an item in List".to_string()
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
        for element in &self.elements {
            match self.check.evaluate(element).await {
                Ok(true) => return Ok(Some(element.clone())),
                Ok(false) => {}
                Err(e) if e.is_locator_error() => return Err(e),
                Err(e) => trace!(error = %e, "Member check failed, trying the next one"),
            }
        }
        Ok(None)
    }
}
