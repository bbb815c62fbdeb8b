//! Typed page-object elements.
//!
//! Every kind wraps one [`LazyElement`]. Shared behaviour lives in
//! capability traits with provided methods, so a kind only picks the
//! capabilities it has.
//!
//! | Kind | Capabilities | Extras |
//! |------|--------------|--------|
//! | [`Button`] | [`Interactable`], [`Textual`] | |
//! | [`TextBox`] | [`Interactable`], [`Textual`] | typing, current value |
//! | [`Checkbox`] | [`Interactable`] | check / uncheck |
//! | [`RadioButton`] | [`Interactable`] | selected member of the group |
//! | [`Link`] | [`Interactable`], [`Textual`] | target URL |
//! | [`ContainerElement`] | [`Textual`] | generic child holder |
//! | [`Text`] | [`Textual`] | |
//!
//! State queries on [`UiElement`] are lenient: an element that cannot be
//! found (or stays stale) reports `false` instead of an error.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::driver::ElementRect;
use crate::error::{Error, Result};
use crate::locator::{By, Locator, Strategy};

use super::gesture::SwipeDirection;
use super::lazy::LazyElement;
use super::list::LazyList;

// ============================================================================
// UiElement
// ============================================================================

/// A typed wrapper around one lazy element.
#[async_trait]
pub trait UiElement: Clone + Send + Sync + 'static {
    /// Kind name used in diagnostics.
    const KIND: &'static str;

    /// Wraps a lazy element.
    fn from_lazy(element: LazyElement) -> Self;

    /// Returns the wrapped lazy element.
    fn lazy(&self) -> &LazyElement;

    /// Returns the resolved locator, if any.
    fn locator(&self) -> Option<&Locator> {
        self.lazy().locator()
    }

    /// Sets the selector format arguments.
    fn format<I, S>(&self, args: I) -> &Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lazy().format(args);
        self
    }

    /// Overrides the context wait for this element.
    fn set_wait(&self, timeout: Duration, poll_interval: Duration) -> &Self
    where
        Self: Sized,
    {
        self.lazy().set_wait(timeout, poll_interval);
        self
    }

    /// Resolves the element now.
    async fn initialize(&self) -> Result<()> {
        self.lazy().initialize().await
    }

    /// Returns `true` if a native handle is cached.
    fn is_initialized(&self) -> bool {
        self.lazy().is_initialized()
    }

    /// Returns whether the element can be found.
    async fn exists(&self) -> Result<bool> {
        let exists = self.lazy().exists().await?;
        debug!(kind = Self::KIND, exists, "Checked existence");
        Ok(exists)
    }

    /// Returns whether the element is displayed; absent elements are not.
    async fn is_displayed(&self) -> Result<bool> {
        let displayed = absent_as_false(self.lazy().is_displayed().await)?;
        debug!(kind = Self::KIND, displayed, "Checked visibility");
        Ok(displayed)
    }

    /// Returns whether the element is enabled; absent elements are not.
    async fn is_enabled(&self) -> Result<bool> {
        let enabled = absent_as_false(self.lazy().is_enabled().await)?;
        debug!(kind = Self::KIND, enabled, "Checked enabled state");
        Ok(enabled)
    }

    /// Returns whether the element is displayed and enabled.
    async fn is_clickable(&self) -> Result<bool> {
        let clickable = absent_as_false(self.lazy().is_clickable().await)?;
        debug!(kind = Self::KIND, clickable, "Checked clickability");
        Ok(clickable)
    }

    /// Returns an attribute (or same-named property).
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.lazy().attribute(name).await
    }

    /// Returns an attribute as written in the markup.
    async fn dom_attribute(&self, name: &str) -> Result<Option<String>> {
        self.lazy().dom_attribute(name).await
    }

    /// Returns a DOM property rendered as a string.
    async fn dom_property(&self, name: &str) -> Result<Option<String>> {
        Ok(property_string(self.lazy().dom_property(name).await?))
    }

    /// Returns the position and size.
    async fn rect(&self) -> Result<ElementRect> {
        self.lazy().rect().await
    }

    /// Scrolls the window to the element.
    async fn scroll_to_element(&self) -> Result<()> {
        self.lazy().scroll_to_element().await
    }

    /// Swipes until the element exists (native mobile platforms only).
    async fn swipe_to_element(&self, direction: SwipeDirection, attempts: u32) -> Result<()> {
        self.lazy().swipe_to_element(direction, attempts).await
    }

    /// Returns a typed child.
    fn child_as<C: UiElement>(&self, by: &By) -> C
    where
        Self: Sized,
    {
        self.lazy().child_as(by)
    }

    /// Returns the typed children.
    fn children_as<C: UiElement>(&self, by: &By) -> LazyList<C>
    where
        Self: Sized,
    {
        self.lazy().children_as(by)
    }
}

/// Maps "cannot be found" outcomes to `false`.
fn absent_as_false(result: Result<bool>) -> Result<bool> {
    match result {
        Err(Error::ElementNotFound { .. } | Error::StaleElement { .. } | Error::Timeout { .. }) => Ok(false),
        other => other,
    }
}

fn property_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Reads a DOM property, falling back to the attribute on drivers that do
/// not support property reads.
async fn property_or_attribute(element: &LazyElement, name: &str) -> Result<Option<String>> {
    match element.dom_property(name).await {
        Ok(value) => Ok(property_string(value)),
        Err(Error::Unsupported { .. }) => element.attribute(name).await,
        Err(e) => Err(e),
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Elements that can be clicked.
#[async_trait]
pub trait Interactable: UiElement {
    /// Clicks the element.
    async fn click(&self) -> Result<()> {
        debug!(kind = Self::KIND, "Clicking");
        self.lazy().click().await
    }

    /// Presses the element's center for `duration`.
    async fn press_and_hold(&self, duration: Duration) -> Result<()> {
        self.lazy().press_and_hold(duration).await
    }
}

/// Elements with visible text.
#[async_trait]
pub trait Textual: UiElement {
    /// Returns the visible text.
    async fn text(&self) -> Result<String> {
        self.lazy().text().await
    }
}

// ============================================================================
// Kinds
// ============================================================================

macro_rules! ui_element_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            element: LazyElement,
        }

        impl UiElement for $name {
            const KIND: &'static str = stringify!($name);

            fn from_lazy(element: LazyElement) -> Self {
                Self { element }
            }

            fn lazy(&self) -> &LazyElement {
                &self.element
            }
        }
    };
}

ui_element_kind!(
    /// A clickable button.
    Button
);
ui_element_kind!(
    /// A text input.
    TextBox
);
ui_element_kind!(
    /// A checkbox.
    Checkbox
);
ui_element_kind!(
    /// One radio button of a named group.
    RadioButton
);
ui_element_kind!(
    /// A hyperlink.
    Link
);
ui_element_kind!(
    /// Generic element holding other elements.
    ContainerElement
);
ui_element_kind!(
    /// Static text.
    Text
);

impl Interactable for Button {}
impl Textual for Button {}

impl Interactable for TextBox {}
impl Textual for TextBox {}

impl Interactable for Checkbox {}

impl Interactable for RadioButton {}

impl Interactable for Link {}
impl Textual for Link {}

impl Textual for ContainerElement {}

impl Textual for Text {}

// ============================================================================
// TextBox
// ============================================================================

impl TextBox {
    /// Types `keys` after the current value.
    pub async fn send_keys(&self, keys: &str) -> Result<()> {
        self.element.send_keys(keys).await
    }

    /// Clears the current value.
    pub async fn clear_text(&self) -> Result<()> {
        self.element.clear().await
    }

    /// Replaces the current value.
    pub async fn set_text(&self, text: &str) -> Result<()> {
        self.element.clear().await?;
        self.element.send_keys(text).await
    }

    /// Returns the current value.
    pub async fn current_text(&self) -> Result<Option<String>> {
        property_or_attribute(&self.element, "value").await
    }
}

// ============================================================================
// Checkbox
// ============================================================================

impl Checkbox {
    /// Returns whether the box is checked.
    pub async fn is_checked(&self) -> Result<bool> {
        self.element.is_selected().await
    }

    /// Checks the box unless it already is.
    pub async fn check(&self) -> Result<()> {
        if !self.is_checked().await? {
            self.element.click().await?;
        }
        Ok(())
    }

    /// Unchecks the box unless it already is.
    pub async fn uncheck(&self) -> Result<()> {
        if self.is_checked().await? {
            self.element.click().await?;
        }
        Ok(())
    }
}

// ============================================================================
// RadioButton
// ============================================================================

impl RadioButton {
    /// Returns whether this button is selected.
    pub async fn is_selected(&self) -> Result<bool> {
        self.element.is_selected().await
    }

    /// Returns the selected button of this button's group.
    ///
    /// The group is every element sharing this button's `name`.
    pub async fn selected_in_group(&self) -> Result<Option<RadioButton>> {
        let Some(name) = property_or_attribute(&self.element, "name").await? else {
            return Ok(None);
        };

        let context = self.element.context();
        let locator = Locator::new(Strategy::Name, name.clone()).with_platform(context.platform());
        let group: LazyList<RadioButton> = LazyList::new(context, locator);

        for button in group.elements().await? {
            if button.is_selected().await? {
                return Ok(Some(button));
            }
        }

        debug!(group = %name, "No radio button of the group is selected");
        Ok(None)
    }
}

// ============================================================================
// Link
// ============================================================================

impl Link {
    /// Returns the link target.
    pub async fn url(&self) -> Result<Option<String>> {
        property_or_attribute(&self.element, "href").await
    }
}

// ============================================================================
// ContainerElement
// ============================================================================

impl ContainerElement {
    /// Returns a child container.
    #[must_use]
    pub fn child(&self, by: &By) -> ContainerElement {
        self.element.child(by)
    }

    /// Returns the child containers.
    #[must_use]
    pub fn children(&self, by: &By) -> LazyList<ContainerElement> {
        self.element.children(by)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use crate::testing::FakeDriver;

    fn css(value: &str) -> Locator {
        Locator::new(Strategy::Css, value)
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Button::KIND, "Button");
        assert_eq!(ContainerElement::KIND, "ContainerElement");
    }

    #[tokio::test]
    async fn test_lenient_state_queries() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        let id = fake.add_element("#save", "Save");
        fake.set_enabled(&id, false);

        let save = Button::from_lazy(LazyElement::new(&context, css("#save")));
        assert!(save.is_displayed().await.unwrap());
        assert!(!save.is_enabled().await.unwrap());
        assert!(!save.is_clickable().await.unwrap());

        let missing = Button::from_lazy(LazyElement::new(&context, css("#missing")));
        missing.lazy().no_wait();
        assert!(!missing.is_displayed().await.unwrap());
        assert!(!missing.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_text_box() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        let id = fake.add_element("#name", "old");
        fake.set_attribute(&id, "value", "typed value");

        let name = TextBox::from_lazy(LazyElement::new(&context, css("#name")));
        name.set_text("new").await.unwrap();
        assert_eq!(name.text().await.unwrap(), "new");
        assert_eq!(fake.typed(), vec!["new".to_string()]);
        assert_eq!(name.current_text().await.unwrap().as_deref(), Some("typed value"));
    }

    #[tokio::test]
    async fn test_checkbox_check_is_idempotent() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        fake.add_element("#terms", "");

        let terms = Checkbox::from_lazy(LazyElement::new(&context, css("#terms")));
        terms.check().await.unwrap();
        assert_eq!(fake.clicks(), 1);
        terms.uncheck().await.unwrap();
        assert_eq!(fake.clicks(), 1);
    }

    #[tokio::test]
    async fn test_link_url_and_format() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        let id = fake.add_element("a.nav-2", "Docs");
        fake.set_attribute(&id, "href", "/docs");

        let link = Link::from_lazy(LazyElement::new(&context, css("a.nav-%d")));
        link.format(["2"]);
        assert_eq!(link.url().await.unwrap().as_deref(), Some("/docs"));
        assert_eq!(link.text().await.unwrap(), "Docs");
    }

    #[tokio::test]
    async fn test_radio_group_without_selection() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        let id = fake.add_element("size", "");
        fake.set_attribute(&id, "name", "size");

        let radio = RadioButton::from_lazy(LazyElement::new(&context, css("size")));
        assert!(radio.selected_in_group().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_container_children() {
        let fake = FakeDriver::new();
        let context = fake.context(Platform::Web);
        let table = fake.add_element("table", "");
        let row = fake.add_child(&table, "tr", "");
        fake.add_child(&row, "td", "cell");

        let container = ContainerElement::from_lazy(LazyElement::new(&context, css("table")));
        let cell: Text = container.child(&By::css("tr")).child_as(&By::css("td"));
        assert_eq!(cell.text().await.unwrap(), "cell");
        assert_eq!(container.children(&By::css("tr")).len().await.unwrap(), 1);
    }
}
