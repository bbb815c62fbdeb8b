//! Lazily resolved element lists.
//!
//! A [`LazyList`] runs its lookup on first access and wraps every match in a
//! pre-initialized proxy whose locator carries the match's index, so each
//! member can re-find itself after going stale.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::context::PageObjectContext;
use crate::driver::NativeElement;
use crate::error::{Error, Result};
use crate::locator::{ChainLink, FieldLocators, Locator, LocatorChain, Strategy};
use crate::sync::Wait;

use super::finder;
use super::kinds::UiElement;
use super::lazy::LazyElement;

// ============================================================================
// Types
// ============================================================================

#[derive(Default)]
struct ListState {
    members: Option<Vec<LazyElement>>,
    format_args: Vec<String>,
    wait: Option<Wait>,
}

struct ListInner {
    context: PageObjectContext,
    locator: Option<Locator>,
    parent: Option<LazyElement>,
    state: Mutex<ListState>,
}

// ============================================================================
// LazyList
// ============================================================================

/// Lazily resolved list of typed elements.
///
/// Cheap to clone; clones share the cached members.
pub struct LazyList<E> {
    inner: Arc<ListInner>,
    _kind: PhantomData<fn() -> E>,
}

impl<E> Clone for LazyList<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _kind: PhantomData,
        }
    }
}

impl<E> fmt::Debug for LazyList<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members = self.inner.state.lock().members.as_ref().map(Vec::len);
        f.debug_struct("LazyList")
            .field("locator", &self.inner.locator)
            .field("members", &members)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// LazyList - Constructors
// ============================================================================

impl<E: UiElement> LazyList<E> {
    /// Creates a list searched from the document root.
    #[must_use]
    pub fn new(context: &PageObjectContext, locator: Locator) -> Self {
        Self::build(context.clone(), Some(locator), None)
    }

    /// Creates a list searched under `parent`.
    #[must_use]
    pub fn child_of(parent: &LazyElement, locator: Locator) -> Self {
        Self::build(parent.context().clone(), Some(locator), Some(parent.clone()))
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
        Ok(Self::build(context.clone(), Some(locator), parent.cloned()))
    }

    fn build(context: PageObjectContext, locator: Option<Locator>, parent: Option<LazyElement>) -> Self {
        Self {
            inner: Arc::new(ListInner {
                context,
                locator,
                parent,
                state: Mutex::new(ListState::default()),
            }),
            _kind: PhantomData,
        }
    }
}

// ============================================================================
// LazyList - Accessors & Configuration
// ============================================================================

impl<E: UiElement> LazyList<E> {
    /// Returns the list locator, if any.
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

    /// Returns `true` once the lookup has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.state.lock().members.is_some()
    }

    /// Returns the effective wait: the override, else the context's.
    #[must_use]
    pub fn wait(&self) -> Wait {
        self.inner
            .state
            .lock()
            .wait
            .unwrap_or_else(|| self.inner.context.wait())
    }

    /// Sets the selector format arguments and drops cached members.
    pub fn format<I, S>(&self, args: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = self.inner.state.lock();
        state.format_args = args.into_iter().map(Into::into).collect();
        state.members = None;
        self
    }

    /// Overrides the context wait for the lookup.
    pub fn set_wait(&self, timeout: Duration, poll_interval: Duration) -> &Self {
        self.inner.state.lock().wait = Some(Wait::new(timeout, poll_interval));
        self
    }

    /// Makes the lookup a single check.
    pub fn no_wait(&self) -> &Self {
        self.inner.state.lock().wait = Some(Wait::none());
        self
    }

    fn chain(&self, locator: &Locator, format_args: &[String]) -> LocatorChain {
        let ancestors = self
            .inner
            .parent
            .as_ref()
            .and_then(LazyElement::locator_chain)
            .map(|parent| {
                let mut links = parent.ancestors().to_vec();
                links.push(parent.target().clone());
                links
            })
            .unwrap_or_default();
        LocatorChain::with_ancestors(ancestors, ChainLink::new(locator.clone(), format_args.to_vec()))
    }
}

// ============================================================================
// LazyList - Resolution
// ============================================================================

impl<E: UiElement> LazyList<E> {
    /// Runs the lookup now, replacing any cached members.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingLocator`] without a locator
    /// - [`Error::ElementNotFound`] when nothing matches and the context
    ///   option `throw_on_empty_list` is set
    pub async fn initialize(&self) -> Result<()> {
        self.load().await.map(|_| ())
    }

    async fn load(&self) -> Result<Vec<LazyElement>> {
        let context = &self.inner.context;
        let locator = self.inner.locator.as_ref().ok_or_else(|| Error::MissingLocator {
            platform: context.platform(),
        })?;
        let format_args = self.inner.state.lock().format_args.clone();
        let wait = self.wait();

        let natives = self.find(locator, &format_args, wait).await?;
        if natives.is_empty() && context.options().throw_on_empty_list {
            return Err(Error::element_not_found(
                locator.variable_name(),
                self.chain(locator, &format_args).to_string(),
            ));
        }

        let members: Vec<LazyElement> = natives
            .into_iter()
            .enumerate()
            .map(|(index, native)| {
                LazyElement::pre_initialized(
                    context.clone(),
                    locator.with_index(index),
                    self.inner.parent.clone(),
                    native,
                    format_args.clone(),
                )
            })
            .collect();

        debug!(
            locator = %self.chain(locator, &format_args),
            platform = %locator.platform(),
            count = members.len(),
            "Initialized list"
        );
        self.inner.state.lock().members = Some(members.clone());
        Ok(members)
    }

    async fn find(&self, locator: &Locator, format_args: &[String], wait: Wait) -> Result<Vec<NativeElement>> {
        let context = &self.inner.context;
        let parent = self.inner.parent.as_ref().filter(|p| p.locator().is_some());

        let natives = match (locator.strategy(), parent) {
            (Strategy::JavaScript, _) if self.inner.parent.is_some() => {
                let by = locator.by(format_args);
                warn!(
                    locator = %by,
                    "Relative search is not possible with a JavaScript locator; searching from the document root"
                );
                finder::find_all_in_document(context, &by, wait).await?
            }
            (Strategy::JQuery, Some(_)) => {
                let by = self.chain(locator, format_args).query_by()?;
                finder::find_all_in_document(context, &by, wait).await?
            }
            (_, Some(parent)) if !locator.strategy().is_script_based() => {
                if context.options().auto_refresh_parent_chain {
                    parent.invalidate_chain();
                }
                parent.find_all_within(&locator.by(format_args)).await?
            }
            _ => finder::find_all_in_document(context, &locator.by(format_args), wait).await?,
        };

        Ok(match locator.index() {
            Some(index) => natives.into_iter().nth(index).into_iter().collect(),
            None => natives,
        })
    }

    async fn members(&self) -> Result<Vec<LazyElement>> {
        if !self.inner.context.options().auto_refresh_list {
            let cached = self.inner.state.lock().members.clone();
            if let Some(members) = cached {
                return Ok(members);
            }
        }
        self.load().await
    }
}

// ============================================================================
// LazyList - Access
// ============================================================================

impl<E: UiElement> LazyList<E> {
    /// Returns the number of members.
    pub async fn len(&self) -> Result<usize> {
        Ok(self.members().await?.len())
    }

    /// Returns `true` if nothing matched.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.members().await?.is_empty())
    }

    /// Returns the member at `index`.
    pub async fn get(&self, index: usize) -> Result<Option<E>> {
        Ok(self.members().await?.into_iter().nth(index).map(E::from_lazy))
    }

    /// Returns the first member.
    pub async fn first(&self) -> Result<Option<E>> {
        self.get(0).await
    }

    /// Returns every member.
    pub async fn elements(&self) -> Result<Vec<E>> {
        Ok(self.members().await?.into_iter().map(E::from_lazy).collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::kinds::{Button, Textual};
    use crate::platform::Platform;
    use crate::driver::script::element_reference;
    use crate::testing::{FakeDriver, LogCapture};

    fn css(value: &str) -> Locator {
        Locator::new(Strategy::Css, value)
    }

    #[tokio::test]
    async fn test_members_are_indexed_and_pre_initialized() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        fake.add_element("li", "a");
        fake.add_element("li", "b");
        fake.add_element("li", "c");

        let items: LazyList<Button> = LazyList::new(&context, css("li"));
        let members = items.elements().await.unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(fake.find_calls(), 1);

        let second = &members[1];
        assert!(second.lazy().is_initialized());
        assert_eq!(second.lazy().locator().unwrap().index(), Some(1));
        assert_eq!(second.text().await.unwrap(), "b");
        assert_eq!(fake.find_calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_member_refinds_by_index() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        fake.add_element("li", "a");
        let b = fake.add_element("li", "b");

        let items: LazyList<Button> = LazyList::new(&context, css("li"));
        let second = items.get(1).await.unwrap().unwrap();
        fake.detach(&b);

        assert_eq!(second.text().await.unwrap(), "b");
    }

    #[tokio::test]
    async fn test_empty_list_errors_by_default() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);

        let items: LazyList<Button> =
            LazyList::new(&context, css("li").with_variable_name("Menu#items"));
        items.set_wait(Duration::from_millis(30), Duration::from_millis(10));

        let err = items.len().await.unwrap_err();
        assert!(matches!(err, Error::ElementNotFound { .. }));
        assert!(err.to_string().contains("Menu#items"));
    }

    #[tokio::test]
    async fn test_empty_list_allowed_when_configured() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        context.set_options(context.options().with_throw_on_empty_list(false));

        let items: LazyList<Button> = LazyList::new(&context, css("li"));
        items.no_wait();
        assert!(items.is_empty().await.unwrap());
        assert!(items.first().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cached_unless_auto_refresh() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        fake.add_element("li", "a");

        let items: LazyList<Button> = LazyList::new(&context, css("li"));
        assert_eq!(items.len().await.unwrap(), 1);
        fake.add_element("li", "b");
        assert_eq!(items.len().await.unwrap(), 1);

        context.set_options(context.options().with_auto_refresh_list(true));
        assert_eq!(items.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_children_of_parent() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        let nav = fake.add_element("nav", "");
        fake.add_child(&nav, "a", "home");
        fake.add_child(&nav, "a", "about");
        fake.add_element("a", "footer");

        let parent = LazyElement::new(&context, css("nav"));
        let links = parent.children(&crate::locator::By::css("a"));
        assert_eq!(links.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_jquery_members_compose_parent_chain() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        fake.add_element("#menu li", "one");
        fake.add_element("#menu li", "two");

        let menu = LazyElement::new(&context, css("#menu"));
        let items: LazyList<Button> = LazyList::child_of(&menu, Locator::new(Strategy::JQuery, "li"));
        let members = items.elements().await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].text().await.unwrap(), "two");
    }

    #[tokio::test]
    async fn test_format_drops_members() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        fake.add_element("li.a", "a");

        let items: LazyList<Button> = LazyList::new(&context, css("li.%s"));
        items.format(["a"]);
        assert_eq!(items.len().await.unwrap(), 1);
        assert!(items.is_initialized());

        items.format(["b"]);
        assert!(!items.is_initialized());
    }

    #[tokio::test]
    async fn test_javascript_members_under_parent_warn_and_search_document() {
        const SCRIPT: &str = "return document.querySelectorAll('.tile');";
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        let first = fake.add_element(".tile", "first");
        let second = fake.add_element(".tile", "second");
        fake.set_script_result(
            SCRIPT,
            serde_json::json!([element_reference(&first), element_reference(&second)]),
        );

        let logs = LogCapture::default();
        let _guard = logs.install();

        let grid = LazyElement::new(&context, css("#never-searched"));
        let tiles: LazyList<Button> = LazyList::child_of(&grid, Locator::new(Strategy::JavaScript, SCRIPT));
        let members = tiles.elements().await.unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[1].text().await.unwrap(), "second");
        assert!(!grid.is_initialized());

        let warnings: Vec<String> = logs
            .lines()
            .into_iter()
            .filter(|line| line.contains("Relative search is not possible"))
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("WARN"));
    }
}
