//! Async poll loop.
//!
//! [`Wait`] repeatedly runs a probe until it yields a value or the timeout
//! elapses, sleeping the poll interval between attempts. The probe always
//! runs at least once, so a zero timeout is a single check.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use page_object_driver::sync::Wait;
//! use page_object_driver::{Error, Result, Text, Textual};
//!
//! async fn first_text(element: &Text) -> Result<Option<String>> {
//!     let wait = Wait::new(Duration::from_secs(5), Duration::from_millis(200));
//!     wait.until(|| async {
//!         let text = element.text().await?;
//!         Ok::<_, Error>(Some(text).filter(|t| !t.is_empty()))
//!     })
//!     .await
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::error::{Error, Result};

// ============================================================================
// Wait
// ============================================================================

/// Timeout and poll interval of one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
    timeout: Duration,
    poll_interval: Duration,
}

impl Wait {
    /// Creates a wait.
    #[inline]
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// A wait that checks exactly once.
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Returns the timeout.
    #[inline]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the poll interval.
    #[inline]
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns `true` for a single-check wait.
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.timeout.is_zero()
    }

    /// Returns the timeout in whole milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Returns the poll interval in whole milliseconds.
    #[must_use]
    pub fn poll_ms(&self) -> u64 {
        u64::try_from(self.poll_interval.as_millis()).unwrap_or(u64::MAX)
    }
}

// ============================================================================
// Wait - Polling
// ============================================================================

impl Wait {
    /// Polls `probe` until it returns `Ok(Some(_))`.
    ///
    /// `Ok(None)` and transient errors mean "not yet". Declaration errors
    /// (see [`Error::is_locator_error`]) and configuration errors end the
    /// wait immediately.
    ///
    /// Returns `Ok(None)` when the timeout elapses.
    pub async fn until<T, F, Fut>(&self, mut probe: F) -> Result<Option<T>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let deadline = Instant::now() + self.timeout;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            match probe().await {
                Ok(Some(value)) => return Ok(Some(value)),
                Ok(None) => {}
                Err(e) if is_fatal(&e) => return Err(e),
                Err(e) => trace!(error = %e, attempts, "Probe failed, treating as not ready"),
            }

            let now = Instant::now();
            if now >= deadline {
                trace!(attempts, timeout_ms = self.timeout_ms(), "Wait timed out");
                return Ok(None);
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    /// Polls a boolean predicate until it returns `true`.
    ///
    /// Returns `Ok(false)` on timeout.
    pub async fn until_true<F, Fut>(&self, mut predicate: F) -> Result<bool>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let matched = self
            .until(|| {
                let fut = predicate();
                async move { fut.await.map(|ok| ok.then_some(())) }
            })
            .await?;
        Ok(matched.is_some())
    }
}

/// Errors that no amount of polling can fix.
fn is_fatal(err: &Error) -> bool {
    err.is_locator_error() || matches!(err, Error::Config { .. })
}

// ============================================================================
// Tests
// ============================================================================
