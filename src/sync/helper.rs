//! Context-bound wait helper.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::context::PageObjectContext;
use crate::error::{Error, Result};

use super::condition::Condition;
use super::wait::Wait;

/// Subject reported by [`SyncHelper::wait_until`] timeouts.
const CUSTOM_SUBJECT: &str = "custom wait";

/// Runs conditions and ad-hoc waits against one context.
#[derive(Debug, Clone)]
pub struct SyncHelper {
    context: PageObjectContext,
}

impl SyncHelper {
    /// Creates a helper for `context`.
    #[must_use]
    pub fn new(context: &PageObjectContext) -> Self {
        Self {
            context: context.clone(),
        }
    }

    /// Waits for `condition` and returns its output.
    ///
    /// # Errors
    ///
    /// [`Error::ConditionTimeout`] if the condition never held.
    pub async fn wait<C: Condition>(&self, condition: &C) -> Result<C::Output> {
        condition.wait_then_return(&self.context).await
    }

    /// Returns whether `condition` holds within its wait.
    pub async fn matches_condition<C: Condition>(&self, condition: &C) -> bool {
        condition.matches_condition(&self.context).await
    }

    /// Polls `probe` with the context timings until it yields a value.
    ///
    /// # Errors
    ///
    /// [`Error::ConditionTimeout`] naming `description` on timeout.
    pub async fn wait_until<T, F, Fut>(&self, description: &str, probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        self.wait_until_polled(description, self.context.poll_interval(), probe)
            .await
    }

    /// Like [`SyncHelper::wait_until`] with an explicit poll interval.
    ///
    /// # Errors
    ///
    /// [`Error::ConditionTimeout`] naming `description` on timeout.
    pub async fn wait_until_polled<T, F, Fut>(
        &self,
        description: &str,
        poll_interval: Duration,
        probe: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let wait = Wait::new(self.context.timeout(), poll_interval);
        debug!(description, timeout_ms = wait.timeout_ms(), "Waiting until");

        wait.until(probe).await?.ok_or_else(|| Error::ConditionTimeout {
            subject: CUSTOM_SUBJECT.to_string(),
            description: description.to_string(),
            timeout_ms: wait.timeout_ms(),
            poll_ms: wait.poll_ms(),
        })
    }

    /// Suspends the task for `duration`.
    pub async fn sleep(duration: Duration) {
        sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::element::{Button, LazyElement, UiElement};
    use crate::locator::{Locator, Strategy};
    use crate::platform::Platform;
    use crate::sync::Until;
    use crate::testing::FakeDriver;

    #[tokio::test]
    async fn test_wait_and_matches() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        fake.add_element("#ok", "");
        let sync = SyncHelper::new(&context);
        let ok = Button::from_lazy(LazyElement::new(&context, Locator::new(Strategy::Css, "#ok")));

        let condition = Until::element(&ok).clickable();
        assert!(sync.wait(&condition).await.is_ok());
        assert!(sync.matches_condition(&condition).await);
    }

    #[tokio::test]
    async fn test_wait_until_returns_value() {
        let fake = FakeDriver::new();
        let sync = SyncHelper::new(&fake.context(Platform::Web));
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let value = sync
            .wait_until("counter reaches two", || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok((n == 2).then_some("done")) }
            })
            .await
            .unwrap();
        assert_eq!(value, "done");
    }

    #[tokio::test]
    async fn test_wait_until_timeout_names_description() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        context.set_timeout(Duration::from_millis(30));
        let sync = SyncHelper::new(&context);

        let err = sync
            .wait_until::<(), _, _>("cart is empty", || async { Ok(None) })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("custom wait cart is empty"));
    }

    #[tokio::test]
    async fn test_sleep() {
        let started = std::time::Instant::now();
        SyncHelper::sleep(Duration::from_millis(15)).await;
        assert!(started.elapsed() >= Duration::from_millis(15));
    }
}
