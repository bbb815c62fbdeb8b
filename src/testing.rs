//! In-memory driver and helpers shared by the unit tests.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::context::PageObjectContext;
use crate::driver::script::element_reference;
use crate::driver::{ElementRect, Point, SearchScope, WebDriver, WindowSize};
use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::By;
use crate::platform::Platform;

const SHADOW_SUFFIX: &str = "::shadow";

// ============================================================================
// Tracing
// ============================================================================

/// Installs a test subscriber once; honours `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Buffer that collects `WARN` and above while installed on this thread.
#[derive(Clone, Default)]
pub(crate) struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes this thread's events into the buffer until the guard drops.
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// FakeDriver
// ============================================================================

#[derive(Debug, Clone)]
struct Node {
    id: ElementId,
    selector: String,
    parent: Option<ElementId>,
    in_shadow: bool,
    text: String,
    attributes: FxHashMap<String, String>,
    displayed: bool,
    hidden_checks: u32,
    enabled: bool,
    selected: bool,
    stale: bool,
}

#[derive(Debug, Default)]
struct State {
    nodes: Vec<Node>,
    next_id: usize,
    scripts: FxHashMap<String, Value>,
    executed: Vec<String>,
    find_calls: usize,
    clicks: usize,
    typed: Vec<String>,
    swipes: Vec<(Point, Point)>,
    pointer_events: Vec<(&'static str, Point)>,
}

/// A scriptable in-memory DOM.
///
/// Elements match a search when their registered selector equals the
/// selector value exactly; the strategy is ignored.
#[derive(Clone, Default)]
pub(crate) struct FakeDriver {
    state: Arc<Mutex<State>>,
}

impl FakeDriver {
    pub(crate) fn new() -> Self {
        init_tracing();
        Self::default()
    }

    pub(crate) fn as_driver(&self) -> Arc<dyn WebDriver> {
        Arc::new(self.clone())
    }

    /// Builds a context with short waits.
    pub(crate) fn context(&self, platform: Platform) -> PageObjectContext {
        PageObjectContext::builder()
            .driver(self.as_driver())
            .platform(platform)
            .timeout(Duration::from_millis(300))
            .poll_interval(Duration::from_millis(10))
            .build()
            .unwrap()
    }

    fn insert(&self, selector: &str, text: &str, parent: Option<&ElementId>, in_shadow: bool) -> ElementId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = ElementId::new(format!("e-{}", state.next_id));
        state.nodes.push(Node {
            id: id.clone(),
            selector: selector.to_string(),
            parent: parent.cloned(),
            in_shadow,
            text: text.to_string(),
            attributes: FxHashMap::default(),
            displayed: true,
            hidden_checks: 0,
            enabled: true,
            selected: false,
            stale: false,
        });
        id
    }

    pub(crate) fn add_element(&self, selector: &str, text: &str) -> ElementId {
        self.insert(selector, text, None, false)
    }

    pub(crate) fn add_child(&self, parent: &ElementId, selector: &str, text: &str) -> ElementId {
        self.insert(selector, text, Some(parent), false)
    }

    pub(crate) fn add_shadow_child(&self, host: &ElementId, selector: &str, text: &str) -> ElementId {
        self.insert(selector, text, Some(host), true)
    }

    /// Marks `id` stale and inserts a fresh copy; returns the copy's ID.
    ///
    /// Children of the old node are re-parented to the copy.
    pub(crate) fn detach(&self, id: &ElementId) -> ElementId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let fresh = ElementId::new(format!("e-{}", state.next_id));

        let Some(node) = state.nodes.iter_mut().find(|n| &n.id == id) else {
            panic!("unknown element {id}");
        };
        node.stale = true;
        let mut copy = node.clone();
        copy.id = fresh.clone();
        copy.stale = false;

        for child in state.nodes.iter_mut().filter(|n| n.parent.as_ref() == Some(id)) {
            child.parent = Some(fresh.clone());
        }
        state.nodes.push(copy);
        fresh
    }

    /// Marks `id` stale without a replacement.
    pub(crate) fn remove(&self, id: &ElementId) {
        self.update(id, |n| n.stale = true);
    }

    pub(crate) fn set_displayed(&self, id: &ElementId, displayed: bool) {
        self.update(id, |n| n.displayed = displayed);
    }

    /// Keeps `id` hidden for the next `checks` visibility checks.
    pub(crate) fn hide_for_checks(&self, id: &ElementId, checks: u32) {
        self.update(id, |n| {
            n.displayed = false;
            n.hidden_checks = checks;
        });
    }

    pub(crate) fn set_enabled(&self, id: &ElementId, enabled: bool) {
        self.update(id, |n| n.enabled = enabled);
    }

    pub(crate) fn set_text(&self, id: &ElementId, text: &str) {
        self.update(id, |n| n.text = text.to_string());
    }

    pub(crate) fn set_attribute(&self, id: &ElementId, name: &str, value: &str) {
        self.update(id, |n| {
            n.attributes.insert(name.to_string(), value.to_string());
        });
    }

    pub(crate) fn set_script_result(&self, script: &str, value: Value) {
        self.state.lock().scripts.insert(script.to_string(), value);
    }

    pub(crate) fn find_calls(&self) -> usize {
        self.state.lock().find_calls
    }

    pub(crate) fn clicks(&self) -> usize {
        self.state.lock().clicks
    }

    pub(crate) fn typed(&self) -> Vec<String> {
        self.state.lock().typed.clone()
    }

    pub(crate) fn swipes(&self) -> usize {
        self.state.lock().swipes.len()
    }

    pub(crate) fn executed_scripts(&self) -> Vec<String> {
        self.state.lock().executed.clone()
    }

    pub(crate) fn pointer_events(&self) -> Vec<(&'static str, Point)> {
        self.state.lock().pointer_events.clone()
    }

    fn update(&self, id: &ElementId, f: impl FnOnce(&mut Node)) {
        let mut state = self.state.lock();
        let Some(node) = state.nodes.iter_mut().find(|n| &n.id == id) else {
            panic!("unknown element {id}");
        };
        f(node);
    }

    /// Runs `f` against a live node, or fails like a real driver would.
    fn with_node<T>(&self, id: &ElementId, f: impl FnOnce(&mut Node) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock();
        match state.nodes.iter_mut().find(|n| &n.id == id) {
            Some(node) if node.stale => Err(Error::stale_element(id.clone())),
            Some(node) => f(node),
            None => Err(Error::driver(format!("no such element {id}"))),
        }
    }

    fn matches(state: &State, scope: SearchScope<'_>, selector: &str) -> Result<Vec<ElementId>> {
        let (parent, in_shadow) = match scope {
            SearchScope::Document => (None, false),
            SearchScope::Element(id) => (Some(id.clone()), false),
            SearchScope::ShadowRoot(root) => {
                let host = root
                    .as_str()
                    .strip_suffix(SHADOW_SUFFIX)
                    .map(ElementId::new)
                    .ok_or_else(|| Error::driver(format!("not a shadow root: {root}")))?;
                (Some(host), true)
            }
        };

        if let Some(parent) = &parent
            && state.nodes.iter().any(|n| &n.id == parent && n.stale)
        {
            return Err(Error::stale_element(parent.clone()));
        }

        Ok(state
            .nodes
            .iter()
            .filter(|n| !n.stale && n.selector == selector)
            .filter(|n| match &parent {
                None => true,
                Some(p) => n.parent.as_ref() == Some(p) && n.in_shadow == in_shadow,
            })
            .map(|n| n.id.clone())
            .collect())
    }
}

#[async_trait]
impl WebDriver for FakeDriver {
    async fn find_element(&self, scope: SearchScope<'_>, by: &By) -> Result<ElementId> {
        let mut state = self.state.lock();
        state.find_calls += 1;
        Self::matches(&state, scope, by.value())?
            .into_iter()
            .next()
            .ok_or_else(|| Error::element_not_found(None, by.to_string()))
    }

    async fn find_elements(&self, scope: SearchScope<'_>, by: &By) -> Result<Vec<ElementId>> {
        let mut state = self.state.lock();
        state.find_calls += 1;
        Self::matches(&state, scope, by.value())
    }

    async fn shadow_root(&self, element: &ElementId) -> Result<ElementId> {
        self.with_node(element, |n| Ok(ElementId::new(format!("{}{SHADOW_SUFFIX}", n.id))))
    }

    async fn click(&self, element: &ElementId) -> Result<()> {
        self.with_node(element, |n| {
            if n.displayed {
                Ok(())
            } else {
                Err(Error::not_interactable(format!("{} is hidden", n.id)))
            }
        })?;
        self.state.lock().clicks += 1;
        Ok(())
    }

    async fn submit(&self, element: &ElementId) -> Result<()> {
        self.with_node(element, |_| Ok(()))
    }

    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<()> {
        self.with_node(element, |n| {
            if !n.displayed {
                return Err(Error::driver("element not interactable: not pointer or keyboard interactable"));
            }
            n.text.push_str(text);
            Ok(())
        })?;
        self.state.lock().typed.push(text.to_string());
        Ok(())
    }

    async fn clear(&self, element: &ElementId) -> Result<()> {
        self.with_node(element, |n| {
            n.text.clear();
            Ok(())
        })
    }

    async fn text(&self, element: &ElementId) -> Result<String> {
        self.with_node(element, |n| Ok(n.text.clone()))
    }

    async fn tag_name(&self, element: &ElementId) -> Result<String> {
        self.with_node(element, |n| Ok(n.selector.clone()))
    }

    async fn attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>> {
        self.with_node(element, |n| Ok(n.attributes.get(name).cloned()))
    }

    async fn dom_attribute(&self, element: &ElementId, name: &str) -> Result<Option<String>> {
        self.attribute(element, name).await
    }

    async fn dom_property(&self, element: &ElementId, name: &str) -> Result<Value> {
        Ok(self
            .attribute(element, name)
            .await?
            .map(Value::String)
            .unwrap_or(Value::Null))
    }

    async fn css_value(&self, element: &ElementId, name: &str) -> Result<String> {
        Ok(self.attribute(element, name).await?.unwrap_or_default())
    }

    async fn is_displayed(&self, element: &ElementId) -> Result<bool> {
        self.with_node(element, |n| {
            if n.hidden_checks > 0 {
                n.hidden_checks -= 1;
                if n.hidden_checks == 0 {
                    n.displayed = true;
                }
                return Ok(false);
            }
            Ok(n.displayed)
        })
    }

    async fn is_enabled(&self, element: &ElementId) -> Result<bool> {
        self.with_node(element, |n| Ok(n.enabled))
    }

    async fn is_selected(&self, element: &ElementId) -> Result<bool> {
        self.with_node(element, |n| Ok(n.selected))
    }

    async fn rect(&self, element: &ElementId) -> Result<ElementRect> {
        self.with_node(element, |_| {
            Ok(ElementRect {
                x: 10.0,
                y: 300.0,
                width: 80.0,
                height: 20.0,
            })
        })
    }

    async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        let mut state = self.state.lock();
        state.executed.push(script.to_string());

        if let Some(value) = state.scripts.get(script).cloned() {
            state.find_calls += 1;
            return Ok(value);
        }

        // The JQuery document query passes the selector as its only argument.
        if script.contains("window.Sizzle")
            && let Some(Value::String(selector)) = args.first()
        {
            state.find_calls += 1;
            let ids = Self::matches(&state, SearchScope::Document, selector)?;
            return Ok(Value::Array(ids.iter().map(element_reference).collect()));
        }

        Ok(Value::Null)
    }

    async fn window_size(&self) -> Result<WindowSize> {
        Ok(WindowSize {
            width: 400,
            height: 800,
        })
    }

    async fn pointer_down(&self, at: Point) -> Result<()> {
        self.state.lock().pointer_events.push(("down", at));
        Ok(())
    }

    async fn pointer_up(&self, at: Point) -> Result<()> {
        self.state.lock().pointer_events.push(("up", at));
        Ok(())
    }

    async fn swipe(&self, start: Point, end: Point, _duration: Duration) -> Result<()> {
        self.state.lock().swipes.push((start, end));
        Ok(())
    }
}
