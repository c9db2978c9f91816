//! Document nodes.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::document::DocumentInner;
use crate::error::DomError;
use crate::mutation::MutationRecord;
use crate::selector::Selector;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique node identity. Never reused, so a stale id can not alias a
/// newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared node handle.
pub type NodeRef = Arc<Node>;

/// Async click callback attached to a node.
pub type ClickHandler = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with a lowercase tag name.
    Element(String),
    Text,
}

/// A node in a [`Document`](crate::Document).
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    document: Weak<DocumentInner>,
    state: RwLock<NodeState>,
}

#[derive(Default)]
struct NodeState {
    parent: Weak<Node>,
    children: Vec<NodeRef>,
    attributes: Vec<(String, String)>,
    /// Character data of a text node.
    text: String,
    /// Form control value.
    value: String,
    click_handler: Option<ClickHandler>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, document: Weak<DocumentInner>) -> NodeRef {
        Arc::new(Self {
            id: NodeId::next(),
            kind,
            document,
            state: RwLock::new(NodeState::default()),
        })
    }

    pub(crate) fn new_text(text: impl Into<String>, document: Weak<DocumentInner>) -> NodeRef {
        let node = Self::new(NodeKind::Text, document);
        node.state.write().text = text.into();
        node
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Lowercase tag name, `None` for text nodes.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text)
    }

    // ------------------------------------------------------------------
    // Attributes and properties
    // ------------------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.state
            .read()
            .attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.state
            .read()
            .attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        self.state.read().attributes.clone()
    }

    /// Set an attribute. Attribute changes are not child-list mutations and
    /// are not reported to observers.
    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        let mut state = self.state.write();
        match state.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => state.attributes.push((name, value)),
        }
    }

    pub fn remove_attribute(&self, name: &str) {
        self.state
            .write()
            .attributes
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn is_disabled(&self) -> bool {
        self.has_attribute("disabled")
    }

    /// Whether edits to this element go through its text content rather than
    /// a form value. Inherited from the nearest ancestor declaring
    /// `contenteditable`.
    pub fn is_content_editable(&self) -> bool {
        if let Some(editable) = self.own_content_editable() {
            return editable;
        }
        let mut current = self.parent();
        while let Some(node) = current {
            if let Some(editable) = node.own_content_editable() {
                return editable;
            }
            current = node.parent();
        }
        false
    }

    fn own_content_editable(&self) -> Option<bool> {
        if !self.is_element() {
            return None;
        }
        self.attribute("contenteditable")
            .map(|value| match value.to_ascii_lowercase().as_str() {
                "" | "true" | "plaintext-only" => true,
                _ => false,
            })
    }

    /// Form control value.
    pub fn value(&self) -> String {
        self.state.read().value.clone()
    }

    /// Set the form control value. Not a child-list mutation.
    pub fn set_value(&self, value: impl Into<String>) {
        self.state.write().value = value.into();
    }

    /// Concatenated character data of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let state = self.state.read();
        if self.is_text() {
            out.push_str(&state.text);
            return;
        }
        let children = state.children.clone();
        drop(state);
        for child in children {
            child.collect_text(out);
        }
    }

    /// Replace all children with a single text node holding `text`.
    ///
    /// On a text node this replaces its character data instead.
    pub fn set_text_content(self: &Arc<Self>, text: impl Into<String>) {
        let text = text.into();
        if self.is_text() {
            self.state.write().text = text;
            return;
        }

        let removed = std::mem::take(&mut self.state.write().children);
        for child in &removed {
            child.state.write().parent = Weak::new();
        }

        let mut added = Vec::new();
        if !text.is_empty() {
            let node = Node::new_text(text, self.document.clone());
            node.state.write().parent = Arc::downgrade(self);
            self.state.write().children.push(node.clone());
            added.push(node.id);
        }

        self.notify_child_list(added, removed.iter().map(|n| n.id).collect());
    }

    // ------------------------------------------------------------------
    // Tree navigation
    // ------------------------------------------------------------------

    pub fn parent(&self) -> Option<NodeRef> {
        self.state.read().parent.upgrade()
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.state.read().children.clone()
    }

    pub fn element_children(&self) -> Vec<NodeRef> {
        self.state
            .read()
            .children
            .iter()
            .filter(|c| c.is_element())
            .cloned()
            .collect()
    }

    pub fn next_sibling(&self) -> Option<NodeRef> {
        let parent = self.parent()?;
        let siblings = parent.state.read();
        let index = siblings.children.iter().position(|c| c.id == self.id)?;
        siblings.children.get(index + 1).cloned()
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            current = node.parent();
            out.push(node);
        }
        out
    }

    /// Whether `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Node) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node.id == self.id {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeRef> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }
        out
    }

    /// Whether the node is reachable from its document's root.
    pub fn is_connected(&self) -> bool {
        let Some(document) = self.document.upgrade() else {
            return false;
        };
        let root = document.root();
        root.id == self.id || root.is_ancestor_of(self)
    }

    // ------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------

    pub fn matches(&self, selector: &Selector) -> bool {
        selector.matches(self)
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(self: &Arc<Self>, selector: &Selector) -> Option<NodeRef> {
        if selector.matches(self) {
            return Some(self.clone());
        }
        self.ancestors().into_iter().find(|a| selector.matches(a))
    }

    /// First descendant matching `selector`.
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeRef> {
        self.descendants().into_iter().find(|n| selector.matches(n))
    }

    /// All descendants matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeRef> {
        self.descendants()
            .into_iter()
            .filter(|n| selector.matches(n))
            .collect()
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    pub fn append_child(self: &Arc<Self>, child: &NodeRef) -> Result<(), DomError> {
        self.insert_before(child, None)
    }

    /// Insert `child` before `reference`, or at the end when `reference` is
    /// `None`. A child that already has a parent is moved.
    pub fn insert_before(
        self: &Arc<Self>,
        child: &NodeRef,
        reference: Option<&NodeRef>,
    ) -> Result<(), DomError> {
        if self.is_text() {
            return Err(DomError::HierarchyRequest(
                "text nodes cannot have children".to_string(),
            ));
        }
        if child.id == self.id || child.is_ancestor_of(self) {
            return Err(DomError::HierarchyRequest(format!(
                "inserting {} into {} would create a cycle",
                child.id, self.id
            )));
        }
        if let Some(reference) = reference {
            if reference.parent().map(|p| p.id) != Some(self.id) {
                return Err(DomError::NotAChild(reference.id));
            }
        }

        // inserting a node before itself keeps its position
        let reference = match reference {
            Some(r) if r.id == child.id => child.next_sibling(),
            other => other.cloned(),
        };

        child.detach();

        {
            let mut state = self.state.write();
            let index = reference
                .as_ref()
                .and_then(|r| state.children.iter().position(|c| c.id == r.id))
                .unwrap_or(state.children.len());
            state.children.insert(index, child.clone());
        }
        child.state.write().parent = Arc::downgrade(self);

        self.notify_child_list(vec![child.id], Vec::new());
        Ok(())
    }

    /// Remove this node from its parent. No-op for detached nodes.
    pub fn remove(&self) {
        self.detach();
    }

    fn detach(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent.state.write().children.retain(|c| c.id != self.id);
        self.state.write().parent = Weak::new();
        parent.notify_child_list(Vec::new(), vec![self.id]);
    }

    /// Append without cycle checks or observer notification. Construction only.
    pub(crate) fn adopt(self: &Arc<Self>, child: NodeRef) {
        child.state.write().parent = Arc::downgrade(self);
        self.state.write().children.push(child);
    }

    fn notify_child_list(self: &Arc<Self>, added: Vec<NodeId>, removed: Vec<NodeId>) {
        if added.is_empty() && removed.is_empty() {
            return;
        }
        if let Some(document) = self.document.upgrade() {
            document.dispatch(
                self,
                MutationRecord {
                    target: self.id,
                    added_nodes: added,
                    removed_nodes: removed,
                },
            );
        }
    }

    // ------------------------------------------------------------------
    // Click handling
    // ------------------------------------------------------------------

    pub fn set_click_handler(&self, handler: ClickHandler) {
        self.state.write().click_handler = Some(handler);
    }

    pub fn has_click_handler(&self) -> bool {
        self.state.read().click_handler.is_some()
    }

    /// Run the click handler to completion. Returns `false` when the node is
    /// disabled or has no handler.
    pub async fn click(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        let handler = self.state.read().click_handler.clone();
        match handler {
            Some(handler) => {
                handler().await;
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("attributes", &state.attributes)
            .field("children", &state.children.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
