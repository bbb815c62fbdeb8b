//! Lazily resolved element proxy.
//!
//! A [`LazyElement`] stands in for a native element. Nothing is searched
//! until the first native call; the handle is then cached and reused until
//! the driver reports it stale.
//!
//! # Resolution
//!
//! | Locator | Search |
//! |---------|--------|
//! | JQuery | Whole ancestor chain composed into one document query |
//! | JavaScript | Script from the document root (parents ignored) |
//! | Any other, with parent | Single find under the parent (or its shadow root) |
//! | Any other, no parent | Document search, polled up to the wait timeout |
//!
//! # Recovery
//!
//! Every native call goes through one recovery step:
//!
//! - a stale handle is re-resolved and the call retried once;
//! - a not-interactable failure waits for visibility, then retries once.
//!
//! # Example
//!
//! ```ignore
//! let search = LazyElement::new(&context, Locator::new(Strategy::Id, "search"));
//! search.send_keys("rust").await?;
//! assert!(search.is_initialized());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::context::PageObjectContext;
use crate::driver::{ElementRect, NativeElement, SearchScope};
use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::{By, ChainLink, FieldLocators, Locator, LocatorChain, Strategy};
use crate::platform::Platform;
use crate::sync::Wait;

use super::finder;
use super::gesture::{SWIPE_DURATION, SwipeDirection};
use super::kinds::{ContainerElement, UiElement};
use super::list::LazyList;

// ============================================================================
// Constants
// ============================================================================

/// Scrolls the window to a vertical offset.
const SCROLL_SCRIPT: &str = "window.scrollTo(0, arguments[0]);";

/// Shown in place of a locator chain when no locator matched.
const UNLOCATED: &str = "[no locator]";

// ============================================================================
// Types
// ============================================================================

/// Mutable part of a proxy; never held across an await.
#[derive(Default)]
struct LazyState {
    native: Option<NativeElement>,
    shadow_root: Option<ElementId>,
    format_args: Vec<String>,
    wait: Option<Wait>,
}

/// Internal shared state for a proxy.
pub(crate) struct LazyInner {
    context: PageObjectContext,
    locator: Option<Locator>,
    parent: Option<LazyElement>,
    state: Mutex<LazyState>,
}

// ============================================================================
// LazyElement
// ============================================================================

/// Lazily resolved stand-in for a native element.
///
/// Cheap to clone; clones share the cached handle, format arguments and
/// wait override.
#[derive(Clone)]
pub struct LazyElement {
    inner: Arc<LazyInner>,
}

impl fmt::Debug for LazyElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyElement")
            .field("locator", &self.inner.locator)
            .field("has_parent", &self.inner.parent.is_some())
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LazyElement - Constructors
// ============================================================================

impl LazyElement {
    /// Creates a proxy searched from the document root.
    #[must_use]
    pub fn new(context: &PageObjectContext, locator: Locator) -> Self {
        Self::build(context.clone(), Some(locator), None, None, Vec::new())
    }

    /// Creates a proxy searched under `parent`.
    #[must_use]
    pub fn child_of(parent: &LazyElement, locator: Locator) -> Self {
        Self::build(
            parent.inner.context.clone(),
            Some(locator),
            Some(parent.clone()),
            None,
            Vec::new(),
        )
    }

    /// Resolves a field's declarations at the context platform.
    ///
    /// # Errors
    ///
    /// [`Error::NoMatchingLocator`] or [`Error::AmbiguousLocator`] from
    /// resolution.
    pub fn from_field(
        context: &PageObjectContext,
        field: &FieldLocators,
        parent: Option<&LazyElement>,
    ) -> Result<Self> {
        let locator = field.resolve(context.platform())?;
        Ok(Self::build(
            context.clone(),
            Some(locator),
            parent.cloned(),
            None,
            Vec::new(),
        ))
    }

    /// Creates a proxy without a locator.
    ///
    /// Useful as a placeholder root; every native call fails with
    /// [`Error::MissingLocator`].
    #[must_use]
    pub fn unlocated(context: &PageObjectContext) -> Self {
        Self::build(context.clone(), None, None, None, Vec::new())
    }

    /// Creates a proxy around an already found handle.
    pub(crate) fn pre_initialized(
        context: PageObjectContext,
        locator: Locator,
        parent: Option<LazyElement>,
        native: NativeElement,
        format_args: Vec<String>,
    ) -> Self {
        Self::build(context, Some(locator), parent, Some(native), format_args)
    }

    fn build(
        context: PageObjectContext,
        locator: Option<Locator>,
        parent: Option<LazyElement>,
        native: Option<NativeElement>,
        format_args: Vec<String>,
    ) -> Self {
        Self {
            inner: Arc::new(LazyInner {
                context,
                locator,
                parent,
                state: Mutex::new(LazyState {
                    native,
                    format_args,
                    ..LazyState::default()
                }),
            }),
        }
    }
}

// ============================================================================
// LazyElement - Accessors
// ============================================================================

impl LazyElement {
    /// Returns the context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &PageObjectContext {
        &self.inner.context
    }

    /// Returns the resolved locator, if any.
    #[inline]
    #[must_use]
    pub fn locator(&self) -> Option<&Locator> {
        self.inner.locator.as_ref()
    }

    /// Returns the parent proxy, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&LazyElement> {
        self.inner.parent.as_ref()
    }

    /// Returns the format arguments.
    #[must_use]
    pub fn format_args(&self) -> Vec<String> {
        self.inner.state.lock().format_args.clone()
    }

    /// Returns `true` if a native handle is cached.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.state.lock().native.is_some()
    }

    /// Returns the wait override, if one is set.
    #[must_use]
    pub fn wait_override(&self) -> Option<Wait> {
        self.inner.state.lock().wait
    }

    /// Returns the effective wait: the override, else the context's.
    #[must_use]
    pub fn wait(&self) -> Wait {
        self.wait_override()
            .unwrap_or_else(|| self.inner.context.wait())
    }

    /// Returns the locator chain from the root ancestor to this proxy.
    ///
    /// Ancestors without a locator are skipped.
    #[must_use]
    pub fn locator_chain(&self) -> Option<LocatorChain> {
        let locator = self.inner.locator.as_ref()?;
        let target = ChainLink::new(locator.clone(), self.format_args());

        let mut ancestors = Vec::new();
        let mut current = self.inner.parent.as_ref();
        while let Some(parent) = current {
            if let Some(locator) = &parent.inner.locator {
                ancestors.push(ChainLink::new(locator.clone(), parent.format_args()));
            }
            current = parent.inner.parent.as_ref();
        }
        ancestors.reverse();

        Some(LocatorChain::with_ancestors(ancestors, target))
    }

    /// Renders the locator chain for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        self.locator_chain()
            .map_or_else(|| UNLOCATED.to_string(), |chain| chain.to_string())
    }

    /// Platform used in diagnostics: the matched one, else the context's.
    fn diagnostic_platform(&self) -> Platform {
        self.inner
            .locator
            .as_ref()
            .map_or_else(|| self.inner.context.platform(), Locator::platform)
    }
}

// ============================================================================
// LazyElement - Configuration
// ============================================================================

impl LazyElement {
    /// Sets the selector format arguments.
    ///
    /// Drops the cached handle, since the selector changed.
    pub fn format<I, S>(&self, args: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.inner.state.lock();
        state.format_args = args.into_iter().map(Into::into).collect();
        state.native = None;
        state.shadow_root = None;
        self
    }

    /// Overrides the context wait for this proxy.
    pub fn set_wait(&self, timeout: Duration, poll_interval: Duration) -> &Self {
        self.inner.state.lock().wait = Some(Wait::new(timeout, poll_interval));
        self
    }

    /// Makes every lookup a single check.
    pub fn no_wait(&self) -> &Self {
        self.inner.state.lock().wait = Some(Wait::none());
        self
    }

    /// Removes the wait override.
    pub fn clear_wait(&self) -> &Self {
        self.inner.state.lock().wait = None;
        self
    }

    /// Switches to a single-check wait until the guard drops.
    pub(crate) fn suspend_wait(&self) -> SuspendedWait<'_> {
        let previous = self.inner.state.lock().wait.replace(Wait::none());
        SuspendedWait {
            element: self,
            previous,
        }
    }

    /// Drops the cached handle; the next native call re-resolves.
    pub(crate) fn invalidate(&self) {
        let mut state = self.inner.state.lock();
        state.native = None;
        state.shadow_root = None;
    }

    /// Drops the cached handles of this proxy and every ancestor.
    pub(crate) fn invalidate_chain(&self) {
        let mut current = Some(self);
        while let Some(element) = current {
            element.invalidate();
            current = element.inner.parent.as_ref();
        }
    }
}

/// Restores a proxy's wait override when dropped.
pub(crate) struct SuspendedWait<'a> {
    element: &'a LazyElement,
    previous: Option<Wait>,
}

impl Drop for SuspendedWait<'_> {
    fn drop(&mut self) {
        self.element.inner.state.lock().wait = self.previous;
    }
}

// ============================================================================
// LazyElement - Resolution
// ============================================================================

impl LazyElement {
    /// Resolves the element now, replacing any cached handle.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingLocator`] without a locator
    /// - [`Error::ElementNotFound`] if the search fails
    /// - [`Error::InvalidLocatorChain`] for a JQuery locator under a
    ///   non-query parent
    pub async fn initialize(&self) -> Result<()> {
        self.locate().await.map(|_| ())
    }

    /// Returns the native handle, resolving it first if needed.
    pub async fn underlying(&self) -> Result<NativeElement> {
        self.resolve_native().await
    }

    fn cached(&self) -> Option<NativeElement> {
        self.inner.state.lock().native.clone()
    }

    /// Boxed so resolution can recurse through the parent chain.
    fn resolve_native(&self) -> BoxFuture<'_, Result<NativeElement>> {
        Box::pin(async move {
            match self.cached() {
                Some(native) => Ok(native),
                None => self.locate().await,
            }
        })
    }

    async fn locate(&self) -> Result<NativeElement> {
        let context = &self.inner.context;
        let locator = self.inner.locator.as_ref().ok_or_else(|| Error::MissingLocator {
            platform: context.platform(),
        })?;
        let args = self.format_args();
        let wait = self.wait();

        let native = match locator.strategy() {
            Strategy::JavaScript => {
                let by = locator.by(&args);
                if self.inner.parent.is_some() {
                    warn!(
                        locator = %by,
                        "Relative search is not possible with a JavaScript locator; searching from the document root"
                    );
                }
                finder::find_in_document(context, &by, locator.index(), locator.variable_name(), wait)
                    .await?
            }
            Strategy::JQuery => {
                let chain = self.locator_chain().ok_or_else(|| Error::MissingLocator {
                    platform: context.platform(),
                })?;
                let by = chain.query_by()?;
                finder::find_in_document(context, &by, None, locator.variable_name(), wait).await?
            }
            _ => self.find_through_parent(locator, &args, wait).await?,
        };

        let shadow_root = if locator.is_shadow_root() {
            Some(native.shadow_root().await?)
        } else {
            None
        };

        {
            let mut state = self.inner.state.lock();
            state.native = Some(native.clone());
            state.shadow_root = shadow_root;
        }

        debug!(
            locator = %self.describe(),
            platform = %locator.platform(),
            element_id = %native.id(),
            "Initialized element"
        );
        Ok(native)
    }

    async fn find_through_parent(&self, locator: &Locator, args: &[String], wait: Wait) -> Result<NativeElement> {
        let context = &self.inner.context;
        let by = locator.by(args);

        let Some(parent) = self.nearest_located_parent() else {
            return finder::find_in_document(context, &by, locator.index(), locator.variable_name(), wait)
                .await;
        };

        if context.options().auto_refresh_parent_chain {
            parent.invalidate_chain();
        }

        match self.find_under(parent, &by, locator).await {
            Err(e) if e.is_stale() => {
                debug!(parent = %parent.describe(), "Parent element is stale, reinitializing");
                parent.invalidate();
                self.find_under(parent, &by, locator).await
            }
            other => other,
        }
    }

    async fn find_under(&self, parent: &LazyElement, by: &By, locator: &Locator) -> Result<NativeElement> {
        let (root, is_shadow) = parent.search_root().await?;
        let scope = if is_shadow {
            SearchScope::ShadowRoot(&root)
        } else {
            SearchScope::Element(&root)
        };
        finder::find_one(&self.inner.context, scope, by, locator.index(), locator.variable_name()).await
    }

    /// Finds every match under this element, re-finding it once if stale.
    pub(crate) async fn find_all_within(&self, by: &By) -> Result<Vec<NativeElement>> {
        match self.find_all_within_once(by).await {
            Err(e) if e.is_stale() => {
                debug!(parent = %self.describe(), "Parent element is stale, reinitializing");
                self.invalidate();
                self.find_all_within_once(by).await
            }
            other => other,
        }
    }

    async fn find_all_within_once(&self, by: &By) -> Result<Vec<NativeElement>> {
        let (root, is_shadow) = self.search_root().await?;
        let scope = if is_shadow {
            SearchScope::ShadowRoot(&root)
        } else {
            SearchScope::Element(&root)
        };
        finder::find_all(&self.inner.context, scope, by).await
    }

    /// Returns the node children are searched under, and whether it is a
    /// shadow root.
    async fn search_root(&self) -> Result<(ElementId, bool)> {
        let native = self.resolve_native().await?;
        if !self.inner.locator.as_ref().is_some_and(Locator::is_shadow_root) {
            return Ok((native.id().clone(), false));
        }

        let cached = self.inner.state.lock().shadow_root.clone();
        let root = match cached {
            Some(root) => root,
            None => {
                let root = native.shadow_root().await?;
                self.inner.state.lock().shadow_root = Some(root.clone());
                root
            }
        };
        Ok((root, true))
    }

    fn nearest_located_parent(&self) -> Option<&LazyElement> {
        let mut current = self.inner.parent.as_ref();
        while let Some(parent) = current {
            if parent.inner.locator.is_some() {
                return Some(parent);
            }
            current = parent.inner.parent.as_ref();
        }
        None
    }
}

// ============================================================================
// LazyElement - Recovery
// ============================================================================

impl LazyElement {
    /// Runs a native call with one stale retry or one visibility retry.
    async fn run_lazily<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn(NativeElement) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let native = self.resolve_native().await?;
        let err = match op(native).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if err.is_stale() {
            debug!(locator = %self.describe(), "Element is stale, reinitializing");
            self.invalidate();
            let native = self.resolve_native().await?;
            return op(native).await;
        }

        if err.is_not_interactable() {
            self.wait_for_visibility().await?;
            let native = self.resolve_native().await?;
            return op(native).await;
        }

        Err(err)
    }

    async fn wait_for_visibility(&self) -> Result<()> {
        let wait = self.wait();
        debug!(
            locator = %self.describe(),
            timeout_ms = wait.timeout_ms(),
            "Element is not interactable, waiting for visibility"
        );

        let visible = wait
            .until_true(|| async move {
                let native = self.resolve_native().await?;
                let shown = native.is_displayed().await;
                if matches!(&shown, Err(e) if e.is_stale()) {
                    self.invalidate();
                }
                shown
            })
            .await?;

        if visible {
            Ok(())
        } else {
            Err(Error::ElementNotVisible {
                locator: self.describe(),
                platform: self.diagnostic_platform(),
                timeout_ms: wait.timeout_ms(),
            })
        }
    }
}

// ============================================================================
// LazyElement - Native Calls
// ============================================================================

impl LazyElement {
    /// Clicks the element.
    pub async fn click(&self) -> Result<()> {
        self.run_lazily(|el| async move { el.click().await }).await
    }

    /// Submits the element's form.
    pub async fn submit(&self) -> Result<()> {
        self.run_lazily(|el| async move { el.submit().await }).await
    }

    /// Types text into the element.
    pub async fn send_keys(&self, text: &str) -> Result<()> {
        self.run_lazily(|el| async move { el.send_keys(text).await }).await
    }

    /// Clears the element's value.
    pub async fn clear(&self) -> Result<()> {
        self.run_lazily(|el| async move { el.clear().await }).await
    }

    /// Returns the visible text.
    pub async fn text(&self) -> Result<String> {
        self.run_lazily(|el| async move { el.text().await }).await
    }

    /// Returns the tag name.
    pub async fn tag_name(&self) -> Result<String> {
        self.run_lazily(|el| async move { el.tag_name().await }).await
    }

    /// Returns an attribute (or same-named property).
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.run_lazily(|el| async move { el.attribute(name).await }).await
    }

    /// Returns an attribute as written in the markup.
    pub async fn dom_attribute(&self, name: &str) -> Result<Option<String>> {
        self.run_lazily(|el| async move { el.dom_attribute(name).await }).await
    }

    /// Returns a DOM property.
    pub async fn dom_property(&self, name: &str) -> Result<Value> {
        self.run_lazily(|el| async move { el.dom_property(name).await }).await
    }

    /// Returns a computed CSS value.
    pub async fn css_value(&self, name: &str) -> Result<String> {
        self.run_lazily(|el| async move { el.css_value(name).await }).await
    }

    /// Returns whether the element is displayed.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.run_lazily(|el| async move { el.is_displayed().await }).await
    }

    /// Returns whether the element is enabled.
    pub async fn is_enabled(&self) -> Result<bool> {
        self.run_lazily(|el| async move { el.is_enabled().await }).await
    }

    /// Returns whether the element is selected.
    pub async fn is_selected(&self) -> Result<bool> {
        self.run_lazily(|el| async move { el.is_selected().await }).await
    }

    /// Returns the position and size.
    pub async fn rect(&self) -> Result<ElementRect> {
        self.run_lazily(|el| async move { el.rect().await }).await
    }

    /// Finds a native descendant, bypassing proxies.
    pub async fn find_element(&self, by: &By) -> Result<NativeElement> {
        self.run_lazily(|el| async move { el.find_element(by).await }).await
    }

    /// Finds native descendants, bypassing proxies.
    pub async fn find_elements(&self, by: &By) -> Result<Vec<NativeElement>> {
        self.run_lazily(|el| async move { el.find_elements(by).await }).await
    }
}

// ============================================================================
// LazyElement - Compound Operations
// ============================================================================

impl LazyElement {
    /// Returns whether the element can be found.
    ///
    /// Absence (not found or stale after the retry) is `Ok(false)`; other
    /// failures propagate.
    pub async fn exists(&self) -> Result<bool> {
        match self.is_enabled().await {
            Ok(_) => Ok(true),
            Err(Error::ElementNotFound { .. } | Error::StaleElement { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns whether the element is displayed and enabled.
    pub async fn is_clickable(&self) -> Result<bool> {
        Ok(self.is_displayed().await? && self.is_enabled().await?)
    }

    /// Scrolls the window so the element's top edge is at the top.
    pub async fn scroll_to_element(&self) -> Result<()> {
        let rect = self.rect().await?;
        debug!(locator = %self.describe(), y = rect.y, "Scrolling to element");
        self.inner
            .context
            .driver()
            .execute_script(SCROLL_SCRIPT, vec![json!(rect.y.round() as i64)])
            .await?;
        Ok(())
    }

    /// Presses the element's center for `duration`, then releases.
    pub async fn press_and_hold(&self, duration: Duration) -> Result<()> {
        let center = self.rect().await?.center();
        let driver = self.inner.context.driver();

        debug!(locator = %self.describe(), duration_ms = duration.as_millis() as u64, "Press and hold");
        driver.pointer_down(center).await?;
        sleep(duration).await;
        driver.pointer_up(center).await
    }

    /// Swipes the viewport until the element exists.
    ///
    /// # Errors
    ///
    /// - [`Error::Unsupported`] unless the platform is a native mobile one
    /// - [`Error::ElementNotFound`] after `attempts` swipes without a match
    pub async fn swipe_to_element(&self, direction: SwipeDirection, attempts: u32) -> Result<()> {
        if !self.inner.context.platform().has_native_fallback() {
            return Err(Error::unsupported(
                "Cannot swipe to element if not using a mobile driver. Try scroll_to_element()",
            ));
        }

        let driver = self.inner.context.driver();
        let (start, end) = direction.vector(driver.window_size().await?);

        for attempt in 1..=attempts {
            driver.swipe(start, end, SWIPE_DURATION).await?;

            let _single_check = self.suspend_wait();
            if self.exists().await? {
                debug!(locator = %self.describe(), attempt, %direction, "Element found after swipe");
                return Ok(());
            }
        }

        Err(Error::element_not_found(
            self.inner.locator.as_ref().and_then(Locator::variable_name),
            format!("{} after [{attempts}] swipes [{direction}]", self.describe()),
        ))
    }
}

// ============================================================================
// LazyElement - Children
// ============================================================================

impl LazyElement {
    /// Returns a child container found under this element.
    #[must_use]
    pub fn child(&self, by: &By) -> ContainerElement {
        self.child_as(by)
    }

    /// Returns a typed child found under this element.
    #[must_use]
    pub fn child_as<E: UiElement>(&self, by: &By) -> E {
        let locator = Locator::from_by(by, self.inner.context.platform());
        E::from_lazy(Self::child_of(self, locator))
    }

    /// Returns the child containers found under this element.
    #[must_use]
    pub fn children(&self, by: &By) -> LazyList<ContainerElement> {
        self.children_as(by)
    }

    /// Returns the typed children found under this element.
    #[must_use]
    pub fn children_as<E: UiElement>(&self, by: &By) -> LazyList<E> {
        let locator = Locator::from_by(by, self.inner.context.platform());
        LazyList::child_of(self, locator)
    }
}

// ============================================================================
// Tests
// ============================================================================
