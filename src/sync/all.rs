//! Conditions every member of a set must satisfy on the same tick.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::element::UiElement;
use crate::error::Result;

use super::condition::{Check, Condition};

/// Waits until every element satisfies a check within one poll; returns the
/// elements.
///
/// An empty set holds immediately.
pub struct AllMatchCondition<E> {
    elements: Vec<E>,
    check: Check<E>,
    timeout: Option<Duration>,
    poll_interval: Option<Duration>,
}

impl<E> fmt::Debug for AllMatchCondition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllMatchCondition")
            .field("elements", &self.elements.len())
            .field("check", &self.check)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl<E: UiElement> AllMatchCondition<E> {
    /// Binds `check` to every element.
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
impl<E: UiElement> Condition for AllMatchCondition<E> {
    type Output = Vec<E>;

    fn subject(&self) -> String {
        "entire List".to_string()
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

    async fn poll_once(&self) -> Result<Option<Vec<E>>> {
        for element in &self.elements {
            if !self.check.evaluate(element).await? {
                return Ok(None);
            }
        }
        Ok(Some(self.elements.clone()))
    }
}
