//! Page-object construction.
//!
//! A page object is a plain struct of typed elements. Implement
//! [`Component`] to describe how its fields are resolved, then build it
//! through a [`PageObjectBuilder`]:
//!
//! ```no_run
//! use page_object_driver::{
//!     Button, Component, FieldLocators, Locate, PageObjectBuilder, Platform, Result, Strategy,
//!     PageObjectContext, TextBox,
//! };
//!
//! const USERNAME: FieldLocators = FieldLocators::new("LoginPage", "username", &[
//!     Locate::new(Platform::Default, Strategy::Id, "username"),
//!     Locate::new(Platform::MobileIos, Strategy::AccessibilityId, "Username"),
//! ]);
//! const SUBMIT: FieldLocators = FieldLocators::new("LoginPage", "submit", &[
//!     Locate::new(Platform::Default, Strategy::Css, "button[type=submit]"),
//! ]);
//!
//! struct LoginPage {
//!     username: TextBox,
//!     submit: Button,
//! }
//!
//! impl Component for LoginPage {
//!     fn build(page: &PageObjectBuilder) -> Result<Self> {
//!         Ok(Self {
//!             username: page.element(&USERNAME)?,
//!             submit: page.element(&SUBMIT)?,
//!         })
//!     }
//! }
//!
//! fn open(context: &PageObjectContext) -> Result<LoginPage> {
//!     PageObjectBuilder::new(context).component()
//! }
//! ```
//!
//! Locators are resolved against the context platform while building, so an
//! ambiguous or missing declaration fails here rather than at first use.
//!
//! # Platform implementations
//!
//! A component whose structure differs per platform declares one
//! [`Implementation`] per variant in an [`Implementations`] table.
//! [`PageObjectBuilder::implementation`] picks the variant closest to the
//! context platform along its fallback chain; a variant declared on
//! [`Platform::Default`] serves every platform without a closer one.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::debug;

use crate::context::PageObjectContext;
use crate::element::{ContainerElement, LazyElement, LazyList, UiElement};
use crate::error::{Error, Result};
use crate::locator::{FieldLocators, Locator, select_by_platform};
use crate::platform::Platform;

// ============================================================================
// Component
// ============================================================================

/// A page object or a reusable part of one.
pub trait Component: Sized + Send + Sync {
    /// Resolves the component's fields.
    ///
    /// # Errors
    ///
    /// Locator resolution errors for any field.
    fn build(page: &PageObjectBuilder) -> Result<Self>;

    /// Runs once after [`Component::build`] succeeded.
    fn after_init(&self) {}
}

// ============================================================================
// Implementations
// ============================================================================

/// Builds one platform variant of a component.
pub type BuildFn<O> = fn(&PageObjectBuilder) -> Result<O>;

/// One platform variant of a component.
pub struct Implementation<O: 'static> {
    on: Platform,
    name: &'static str,
    build: BuildFn<O>,
}

impl<O: 'static> Implementation<O> {
    /// Declares `build` as the variant named `name` for `on`.
    #[inline]
    #[must_use]
    pub const fn new(on: Platform, name: &'static str, build: BuildFn<O>) -> Self {
        Self { on, name, build }
    }

    /// Returns the platform this variant is declared for.
    #[inline]
    #[must_use]
    pub const fn on(&self) -> Platform {
        self.on
    }

    /// Returns the variant name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<O: 'static> Clone for Implementation<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: 'static> Copy for Implementation<O> {}

impl<O: 'static> fmt::Debug for Implementation<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("on", &self.on)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Every platform variant of one component.
pub struct Implementations<O: 'static> {
    component: &'static str,
    variants: &'static [Implementation<O>],
}

impl<O: 'static> Implementations<O> {
    /// Creates a variant table.
    #[inline]
    #[must_use]
    pub const fn new(component: &'static str, variants: &'static [Implementation<O>]) -> Self {
        Self { component, variants }
    }

    /// Returns the component name.
    #[inline]
    #[must_use]
    pub const fn component(&self) -> &'static str {
        self.component
    }

    /// Returns the variants in declaration order.
    #[inline]
    #[must_use]
    pub const fn variants(&self) -> &'static [Implementation<O>] {
        self.variants
    }

    /// Selects the variant for `platform` along its fallback chain.
    ///
    /// # Errors
    ///
    /// - [`Error::NoMatchingImplementation`] if nothing matches anywhere on the chain
    /// - [`Error::AmbiguousImplementation`] if the first matching level has several
    pub fn resolve(&self, platform: Platform) -> Result<&'static Implementation<O>> {
        let (matched, hits) = select_by_platform(self.variants, platform, Implementation::on)
            .ok_or_else(|| Error::NoMatchingImplementation {
                component: self.component.to_string(),
                platform,
            })?;

        match hits.as_slice() {
            [single] => Ok(*single),
            _ => Err(Error::AmbiguousImplementation {
                component: self.component.to_string(),
                platform: matched,
                count: hits.len(),
            }),
        }
    }
}

impl<O: 'static> Clone for Implementations<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: 'static> Copy for Implementations<O> {}

impl<O: 'static> fmt::Debug for Implementations<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementations")
            .field("component", &self.component)
            .field("variants", &self.variants)
            .finish()
    }
}

// ============================================================================
// PageObjectBuilder
// ============================================================================

/// Resolves page-object fields against a context.
///
/// Elements built here are searched under the builder's parent, if any.
#[derive(Debug, Clone)]
pub struct PageObjectBuilder {
    context: PageObjectContext,
    parent: Option<LazyElement>,
}

impl PageObjectBuilder {
    /// Creates a builder for top-level elements.
    #[must_use]
    pub fn new(context: &PageObjectContext) -> Self {
        Self {
            context: context.clone(),
            parent: None,
        }
    }

    /// Searches built elements under `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: &LazyElement) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Returns the context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &PageObjectContext {
        &self.context
    }

    /// Returns the platform fields are resolved for.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.context.platform()
    }

    /// Returns the parent element, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<&LazyElement> {
        self.parent.as_ref()
    }

    /// Builds a typed element from its declarations.
    ///
    /// # Errors
    ///
    /// [`Error::NoMatchingLocator`](crate::Error::NoMatchingLocator) or
    /// [`Error::AmbiguousLocator`](crate::Error::AmbiguousLocator).
    pub fn element<E: UiElement>(&self, field: &FieldLocators) -> Result<E> {
        let element = LazyElement::from_field(&self.context, field, self.parent.as_ref())?;
        debug!(field = %field.id(), platform = %self.platform(), "Built element");
        Ok(E::from_lazy(element))
    }

    /// Builds a typed element from an explicit locator.
    #[must_use]
    pub fn element_at<E: UiElement>(&self, locator: Locator) -> E {
        let element = match &self.parent {
            Some(parent) => LazyElement::child_of(parent, locator),
            None => LazyElement::new(&self.context, locator),
        };
        E::from_lazy(element)
    }

    /// Builds a typed list from its declarations.
    ///
    /// # Errors
    ///
    /// [`Error::NoMatchingLocator`](crate::Error::NoMatchingLocator) or
    /// [`Error::AmbiguousLocator`](crate::Error::AmbiguousLocator).
    pub fn list<E: UiElement>(&self, field: &FieldLocators) -> Result<LazyList<E>> {
        let list = LazyList::from_field(&self.context, field, self.parent.as_ref())?;
        debug!(field = %field.id(), platform = %self.platform(), "Built list");
        Ok(list)
    }

    /// Builds a typed list from an explicit locator.
    #[must_use]
    pub fn list_at<E: UiElement>(&self, locator: Locator) -> LazyList<E> {
        match &self.parent {
            Some(parent) => LazyList::child_of(parent, locator),
            None => LazyList::new(&self.context, locator),
        }
    }

    /// Builds a component sharing this builder's parent.
    ///
    /// # Errors
    ///
    /// Any error from [`Component::build`].
    pub fn component<C: Component>(&self) -> Result<C> {
        let component = C::build(self)?;
        component.after_init();
        Ok(component)
    }

    /// Builds the variant of a component declared for the context platform.
    ///
    /// # Errors
    ///
    /// [`Error::NoMatchingImplementation`], [`Error::AmbiguousImplementation`],
    /// or any error from the variant's build function.
    pub fn implementation<O: 'static>(&self, table: &Implementations<O>) -> Result<O> {
        let platform = self.platform();
        let variant = table.resolve(platform)?;
        debug!(
            component = table.component(),
            variant = variant.name(),
            %platform,
            "Selected implementation"
        );
        (variant.build)(self)
    }

    /// Builds a component whose fields are searched under `root`.
    ///
    /// # Errors
    ///
    /// Resolution errors for `root` or any component field.
    pub fn component_within<C: Component>(&self, root: &FieldLocators) -> Result<C> {
        let root: ContainerElement = self.element(root)?;
        self.clone().with_parent(root.lazy()).component()
    }

    /// Builds one component per element matching `root`.
    ///
    /// # Errors
    ///
    /// Resolution or lookup errors for `root`, or any component field.
    pub async fn components_within<C: Component>(&self, root: &FieldLocators) -> Result<Vec<C>> {
        let roots: LazyList<ContainerElement> = self.list(root)?;
        roots
            .elements()
            .await?
            .iter()
            .map(|root| self.clone().with_parent(root.lazy()).component())
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Button, Interactable, Text, TextBox, Textual};
    use crate::error::Error;
    use crate::locator::{Locate, Strategy};
    use crate::testing::FakeDriver;

    const USERNAME: FieldLocators = FieldLocators::new(
        "LoginPage",
        "username",
        &[
            Locate::new(Platform::Default, Strategy::Id, "#username"),
            Locate::new(Platform::MobileIos, Strategy::AccessibilityId, "Username"),
        ],
    );

    const SUBMIT: FieldLocators = FieldLocators::new(
        "LoginPage",
        "submit",
        &[Locate::new(Platform::Default, Strategy::Css, "#submit")],
    );

    const CONFLICT: FieldLocators = FieldLocators::new(
        "BrokenPage",
        "title",
        &[
            Locate::new(Platform::Web, Strategy::Css, "h1"),
            Locate::new(Platform::Web, Strategy::Css, "h2"),
        ],
    );

    const CARD: FieldLocators = FieldLocators::new(
        "ProductPage",
        "card",
        &[Locate::new(Platform::Default, Strategy::Css, ".card")],
    );

    const CARD_TITLE: FieldLocators = FieldLocators::new(
        "ProductCard",
        "title",
        &[Locate::new(Platform::Default, Strategy::Css, ".title")],
    );

    struct LoginPage {
        username: TextBox,
        submit: Button,
    }

    impl Component for LoginPage {
        fn build(page: &PageObjectBuilder) -> Result<Self> {
            Ok(Self {
                username: page.element(&USERNAME)?,
                submit: page.element(&SUBMIT)?,
            })
        }
    }

    #[derive(Debug)]
    struct BrokenPage {
        _title: Text,
    }

    impl Component for BrokenPage {
        fn build(page: &PageObjectBuilder) -> Result<Self> {
            Ok(Self {
                _title: page.element(&CONFLICT)?,
            })
        }
    }

    struct ProductCard {
        title: Text,
    }

    impl Component for ProductCard {
        fn build(page: &PageObjectBuilder) -> Result<Self> {
            Ok(Self {
                title: page.element(&CARD_TITLE)?,
            })
        }
    }

    trait SearchBar: Send + Sync {
        fn variant(&self) -> &'static str;
        fn query(&self) -> &TextBox;
    }

    struct WebSearchBar {
        query: TextBox,
    }

    struct NativeSearchBar {
        query: TextBox,
    }

    const WEB_QUERY: FieldLocators = FieldLocators::new(
        "WebSearchBar",
        "query",
        &[Locate::new(Platform::Default, Strategy::Css, "input[name=q]")],
    );

    const NATIVE_QUERY: FieldLocators = FieldLocators::new(
        "NativeSearchBar",
        "query",
        &[Locate::new(Platform::Mobile, Strategy::AccessibilityId, "Search")],
    );

    impl Component for WebSearchBar {
        fn build(page: &PageObjectBuilder) -> Result<Self> {
            Ok(Self {
                query: page.element(&WEB_QUERY)?,
            })
        }
    }

    impl Component for NativeSearchBar {
        fn build(page: &PageObjectBuilder) -> Result<Self> {
            Ok(Self {
                query: page.element(&NATIVE_QUERY)?,
            })
        }
    }

    impl SearchBar for WebSearchBar {
        fn variant(&self) -> &'static str {
            "web"
        }

        fn query(&self) -> &TextBox {
            &self.query
        }
    }

    impl SearchBar for NativeSearchBar {
        fn variant(&self) -> &'static str {
            "native"
        }

        fn query(&self) -> &TextBox {
            &self.query
        }
    }

    fn web_search_bar(page: &PageObjectBuilder) -> Result<Box<dyn SearchBar>> {
        Ok(Box::new(page.component::<WebSearchBar>()?))
    }

    fn native_search_bar(page: &PageObjectBuilder) -> Result<Box<dyn SearchBar>> {
        Ok(Box::new(page.component::<NativeSearchBar>()?))
    }

    const SEARCH_BARS: Implementations<Box<dyn SearchBar>> = Implementations::new(
        "SearchBar",
        &[
            Implementation::new(Platform::Default, "WebSearchBar", web_search_bar),
            Implementation::new(Platform::Mobile, "NativeSearchBar", native_search_bar),
        ],
    );

    const MOBILE_ONLY: Implementations<Box<dyn SearchBar>> = Implementations::new(
        "SearchBar",
        &[Implementation::new(Platform::Mobile, "NativeSearchBar", native_search_bar)],
    );

    const CONFLICTING: Implementations<Box<dyn SearchBar>> = Implementations::new(
        "SearchBar",
        &[
            Implementation::new(Platform::MobileIos, "NativeSearchBar", native_search_bar),
            Implementation::new(Platform::MobileIos, "WebSearchBar", web_search_bar),
        ],
    );

    #[test]
    fn test_implementation_follows_fallback_chain() {
        let fake = FakeDriver::new();

        let phone = fake.context(Platform::MobileIosPhone);
        let bar = PageObjectBuilder::new(&phone).implementation(&SEARCH_BARS).unwrap();
        assert_eq!(bar.variant(), "native");
        assert_eq!(bar.query().locator().unwrap().strategy(), Strategy::AccessibilityId);

        let desktop = fake.context(Platform::WebDesktopChrome);
        let bar = PageObjectBuilder::new(&desktop).implementation(&SEARCH_BARS).unwrap();
        assert_eq!(bar.variant(), "web");
    }

    #[test]
    fn test_implementation_resolve_reports_level() {
        let variant = SEARCH_BARS.resolve(Platform::MobileAndroidTablet).unwrap();
        assert_eq!(variant.name(), "NativeSearchBar");
        assert_eq!(variant.on(), Platform::Mobile);
    }

    #[test]
    fn test_missing_implementation_names_component() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::OttFireTv);

        let err = PageObjectBuilder::new(&context)
            .implementation(&MOBILE_ONLY)
            .map(|bar| bar.variant())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NoMatchingImplementation { ref component, platform: Platform::OttFireTv } if component == "SearchBar"
        ));
        assert!(err.is_locator_error());
    }

    #[test]
    fn test_ambiguous_implementation_fails() {
        let err = CONFLICTING.resolve(Platform::MobileIosTablet).unwrap_err();
        assert!(matches!(
            err,
            Error::AmbiguousImplementation { platform: Platform::MobileIos, count: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_builds_page_without_searching() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::WebDesktopChrome);
        fake.add_element("#username", "");
        fake.add_element("#submit", "Sign in");

        let page: LoginPage = PageObjectBuilder::new(&context).component().unwrap();
        assert_eq!(fake.find_calls(), 0);

        page.username.set_text("ada").await.unwrap();
        page.submit.click().await.unwrap();
        assert_eq!(fake.typed(), vec!["ada".to_string()]);
        assert_eq!(fake.clicks(), 1);
    }

    #[test]
    fn test_platform_selects_declaration() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::MobileIosTablet);

        let page: LoginPage = PageObjectBuilder::new(&context).component().unwrap();
        let locator = page.username.locator().unwrap();
        assert_eq!(locator.strategy(), Strategy::AccessibilityId);
        assert_eq!(locator.platform(), Platform::MobileIos);
    }

    #[test]
    fn test_ambiguous_declaration_fails_at_build() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::WebDesktop);

        let err = PageObjectBuilder::new(&context).component::<BrokenPage>().unwrap_err();
        assert!(matches!(err, Error::AmbiguousLocator { count: 2, .. }));
    }

    #[tokio::test]
    async fn test_component_within_root() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        fake.add_element(".title", "page title");
        let card = fake.add_element(".card", "");
        fake.add_child(&card, ".title", "card title");

        let product: ProductCard = PageObjectBuilder::new(&context).component_within(&CARD).unwrap();
        assert_eq!(product.title.text().await.unwrap(), "card title");
    }

    #[tokio::test]
    async fn test_components_within_each_root() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        for name in ["first", "second"] {
            let card = fake.add_element(".card", "");
            fake.add_child(&card, ".title", name);
        }

        let cards: Vec<ProductCard> = PageObjectBuilder::new(&context)
            .components_within(&CARD)
            .await
            .unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].title.text().await.unwrap(), "second");
    }
}
