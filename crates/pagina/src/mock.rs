//! In-memory driver double for tests.
//!
//! [`MockPage`] implements [`Session`] and [`MockNode`] implements
//! [`Element`] over a hand-built element tree keyed by locator. Every native
//! call is appended to one shared, ordered log so tests can assert both
//! *which* scope performed a lookup and in *what order* actions ran.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::driver::{Element, Handle, Session};
use crate::locator::Locator;
use crate::result::{DriverError, DriverResult};

type CallLog = Rc<RefCell<Vec<String>>>;

/// Mock session: the tree root plus the shared call log.
#[derive(Debug, Default)]
pub struct MockPage {
    log: CallLog,
    singles: RefCell<HashMap<Locator, Arc<MockNode>>>,
    multis: RefCell<HashMap<Locator, Vec<Arc<MockNode>>>>,
}

impl MockPage {
    /// Create an empty mock session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node wired to this session's call log
    #[must_use]
    pub fn node(&self, id: impl Into<String>) -> Arc<MockNode> {
        Arc::new(MockNode {
            id: id.into(),
            log: Rc::clone(&self.log),
            singles: RefCell::new(HashMap::new()),
            multis: RefCell::new(HashMap::new()),
            visible: Cell::new(true),
            visible_after: Cell::new(0),
            selected: Cell::new(false),
            value: RefCell::new(String::new()),
            text: RefCell::new(String::new()),
            attributes: RefCell::new(HashMap::new()),
        })
    }

    /// Make a top-level single lookup of `locator` yield `node`
    pub fn mount_single(&self, locator: Locator, node: &Arc<MockNode>) {
        self.singles.borrow_mut().insert(locator, Arc::clone(node));
    }

    /// Make a top-level multi lookup of `locator` yield `nodes`, in order
    pub fn mount_many(&self, locator: Locator, nodes: &[Arc<MockNode>]) {
        self.multis
            .borrow_mut()
            .insert(locator, nodes.iter().map(Arc::clone).collect());
    }

    /// The full ordered call log, across the session and every node
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Session for MockPage {
    fn find_single(&self, locator: &Locator) -> DriverResult<Handle> {
        self.log
            .borrow_mut()
            .push(format!("session.find_single {locator}"));
        self.singles
            .borrow()
            .get(locator)
            .map(|node| Arc::clone(node) as Handle)
            .ok_or_else(|| DriverError::NotFound {
                locator: locator.to_string(),
            })
    }

    fn find_many(&self, locator: &Locator) -> DriverResult<Vec<Handle>> {
        self.log
            .borrow_mut()
            .push(format!("session.find_many {locator}"));
        Ok(self
            .multis
            .borrow()
            .get(locator)
            .map(|nodes| nodes.iter().map(|n| Arc::clone(n) as Handle).collect())
            .unwrap_or_default())
    }
}

/// Mock element handle.
///
/// Visibility, selection state, input value, text, and attributes are all
/// settable; `click` toggles the selected state the way a real checkbox
/// does, and `send_keys` appends to the value the way real typing does.
#[derive(Debug)]
pub struct MockNode {
    id: String,
    log: CallLog,
    singles: RefCell<HashMap<Locator, Arc<MockNode>>>,
    multis: RefCell<HashMap<Locator, Vec<Arc<MockNode>>>>,
    visible: Cell<bool>,
    visible_after: Cell<u32>,
    selected: Cell<bool>,
    value: RefCell<String>,
    text: RefCell<String>,
    attributes: RefCell<HashMap<String, String>>,
}

impl MockNode {
    /// Make a scoped single lookup of `locator` beneath this node yield `node`
    pub fn mount_single(&self, locator: Locator, node: &Arc<MockNode>) {
        self.singles.borrow_mut().insert(locator, Arc::clone(node));
    }

    /// Make a scoped multi lookup of `locator` beneath this node yield `nodes`
    pub fn mount_many(&self, locator: Locator, nodes: &[Arc<MockNode>]) {
        self.multis
            .borrow_mut()
            .insert(locator, nodes.iter().map(Arc::clone).collect());
    }

    /// Set current visibility
    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    /// Report "not displayed" for the next `checks` visibility polls, then
    /// fall back to the visibility flag
    pub fn set_visible_after(&self, checks: u32) {
        self.visible_after.set(checks);
    }

    /// Set the selected state
    pub fn set_selected(&self, selected: bool) {
        self.selected.set(selected);
    }

    /// Set the current input value
    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.borrow_mut() = value.into();
    }

    /// Set the text content
    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    /// Set an arbitrary attribute
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.borrow_mut().insert(name.into(), value.into());
    }

    /// Calls performed against this node, in order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        let prefix = format!("{}.", self.id);
        self.log
            .borrow()
            .iter()
            .filter(|entry| entry.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn record(&self, call: &str) {
        self.log.borrow_mut().push(format!("{}.{call}", self.id));
    }
}

impl Element for MockNode {
    fn find_single(&self, locator: &Locator) -> DriverResult<Handle> {
        self.record(&format!("find_single {locator}"));
        self.singles
            .borrow()
            .get(locator)
            .map(|node| Arc::clone(node) as Handle)
            .ok_or_else(|| DriverError::NotFound {
                locator: locator.to_string(),
            })
    }

    fn find_many(&self, locator: &Locator) -> DriverResult<Vec<Handle>> {
        self.record(&format!("find_many {locator}"));
        Ok(self
            .multis
            .borrow()
            .get(locator)
            .map(|nodes| nodes.iter().map(|n| Arc::clone(n) as Handle).collect())
            .unwrap_or_default())
    }

    fn is_displayed(&self) -> DriverResult<bool> {
        self.record("is_displayed");
        let pending = self.visible_after.get();
        if pending > 0 {
            self.visible_after.set(pending - 1);
            return Ok(false);
        }
        Ok(self.visible.get())
    }

    fn click(&self) -> DriverResult<()> {
        self.record("click");
        self.selected.set(!self.selected.get());
        Ok(())
    }

    fn clear(&self) -> DriverResult<()> {
        self.record("clear");
        self.value.borrow_mut().clear();
        Ok(())
    }

    fn send_keys(&self, text: &str) -> DriverResult<()> {
        self.record(&format!("send_keys {text}"));
        self.value.borrow_mut().push_str(text);
        Ok(())
    }

    fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        self.record(&format!("attribute {name}"));
        if name == "value" {
            return Ok(Some(self.value.borrow().clone()));
        }
        Ok(self.attributes.borrow().get(name).cloned())
    }

    fn text(&self) -> DriverResult<String> {
        self.record("text");
        Ok(self.text.borrow().clone())
    }

    fn is_selected(&self) -> DriverResult<bool> {
        self.record("is_selected");
        Ok(self.selected.get())
    }

    fn execute_script(&self, script: &str) -> DriverResult<()> {
        self.record(&format!("execute_script {script}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_lookup_yields_mounted_node() {
        let page = MockPage::new();
        let node = page.node("n");
        node.set_text("marker");
        page.mount_single(Locator::css("div"), &node);

        let found = page.find_single(&Locator::css("div")).unwrap();
        assert_eq!(found.text().unwrap(), "marker");
    }

    #[test]
    fn unmounted_single_lookup_is_not_found() {
        let page = MockPage::new();
        assert!(matches!(
            page.find_single(&Locator::css("div")),
            Err(DriverError::NotFound { .. })
        ));
    }

    #[test]
    fn unmounted_multi_lookup_is_empty() {
        let page = MockPage::new();
        assert!(page.find_many(&Locator::css("li")).unwrap().is_empty());
    }

    #[test]
    fn typing_appends_and_clear_empties() {
        let page = MockPage::new();
        let node = page.node("input");
        node.send_keys("ab").unwrap();
        node.send_keys("c").unwrap();
        assert_eq!(node.attribute("value").unwrap(), Some("abc".to_string()));
        node.clear().unwrap();
        assert_eq!(node.attribute("value").unwrap(), Some(String::new()));
    }

    #[test]
    fn click_toggles_selection() {
        let page = MockPage::new();
        let node = page.node("box");
        assert!(!node.is_selected().unwrap());
        node.click().unwrap();
        assert!(node.is_selected().unwrap());
    }

    #[test]
    fn visible_after_counts_down_polls() {
        let page = MockPage::new();
        let node = page.node("n");
        node.set_visible_after(2);
        assert!(!node.is_displayed().unwrap());
        assert!(!node.is_displayed().unwrap());
        assert!(node.is_displayed().unwrap());
    }

    #[test]
    fn log_is_shared_and_ordered() {
        let page = MockPage::new();
        let a = page.node("a");
        let b = page.node("b");
        a.click().unwrap();
        b.click().unwrap();
        a.text().unwrap();
        assert_eq!(page.calls(), ["a.click", "b.click", "a.text"]);
        assert_eq!(a.calls(), ["a.click", "a.text"]);
    }
}
