//! The host document.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::mutation::{MutationRecord, MutationSubscription, ObserverRegistry};
use crate::node::{Node, NodeId, NodeKind, NodeRef};
use crate::selector::Selector;

/// An `input` event dispatched to the host's listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub target: NodeId,
    pub bubbles: bool,
}

/// Host page listener for input events.
pub type InputListener = Arc<dyn Fn(&InputEvent) + Send + Sync>;

/// A live document: `html` root with `head` and `body`, a location, child-list
/// observers and input listeners.
///
/// Cloning is cheap and yields another handle to the same document.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

pub(crate) struct DocumentInner {
    root: NodeRef,
    location: watch::Sender<String>,
    observers: Mutex<ObserverRegistry>,
    input_listeners: RwLock<Vec<InputListener>>,
}

impl DocumentInner {
    pub(crate) fn root(&self) -> NodeRef {
        self.root.clone()
    }

    pub(crate) fn observers(&self) -> &Mutex<ObserverRegistry> {
        &self.observers
    }

    pub(crate) fn dispatch(&self, target: &Node, record: MutationRecord) {
        self.observers.lock().dispatch(target, &record);
    }
}

impl Document {
    pub fn new(location: impl Into<String>) -> Self {
        let (location, _) = watch::channel(location.into());
        let inner = Arc::new_cyclic(|document: &Weak<DocumentInner>| DocumentInner {
            root: Node::new(NodeKind::Element("html".to_string()), document.clone()),
            location,
            observers: Mutex::new(ObserverRegistry::default()),
            input_listeners: RwLock::new(Vec::new()),
        });

        let document = Self { inner };
        let root = document.root();
        root.adopt(document.create_element("head"));
        root.adopt(document.create_element("body"));
        document
    }

    /// The `html` element.
    pub fn root(&self) -> NodeRef {
        self.inner.root()
    }

    pub fn head(&self) -> NodeRef {
        self.child_of_root("head")
    }

    pub fn body(&self) -> NodeRef {
        self.child_of_root("body")
    }

    fn child_of_root(&self, tag: &str) -> NodeRef {
        let root = self.root();
        match root
            .element_children()
            .into_iter()
            .find(|c| c.tag_name() == Some(tag))
        {
            Some(node) => node,
            // head/body are only missing if the caller removed them
            None => {
                let node = self.create_element(tag);
                root.adopt(node.clone());
                node
            }
        }
    }

    pub fn create_element(&self, tag: &str) -> NodeRef {
        Node::new(
            NodeKind::Element(tag.to_ascii_lowercase()),
            Arc::downgrade(&self.inner),
        )
    }

    pub fn create_text(&self, text: impl Into<String>) -> NodeRef {
        Node::new_text(text, Arc::downgrade(&self.inner))
    }

    /// First node in document order matching `selector`, root included.
    pub fn query_selector(&self, selector: &Selector) -> Option<NodeRef> {
        let root = self.root();
        if selector.matches(&root) {
            return Some(root);
        }
        root.query_selector(selector)
    }

    /// All nodes in document order matching `selector`, root included.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeRef> {
        let root = self.root();
        let mut out = Vec::new();
        if selector.matches(&root) {
            out.push(root.clone());
        }
        out.extend(root.query_selector_all(selector));
        out
    }

    /// Connected node with the given id.
    pub fn node(&self, id: NodeId) -> Option<NodeRef> {
        let root = self.root();
        if root.id() == id {
            return Some(root);
        }
        root.descendants().into_iter().find(|n| n.id() == id)
    }

    // ------------------------------------------------------------------
    // Location
    // ------------------------------------------------------------------

    pub fn location(&self) -> String {
        self.inner.location.borrow().clone()
    }

    /// Change the location without reloading (history push/replace).
    /// Every subscriber is notified, even when the URL is unchanged.
    pub fn navigate(&self, url: impl Into<String>) {
        let url = url.into();
        debug!("Document navigated to {}", url);
        self.inner.location.send_replace(url);
    }

    pub fn subscribe_location(&self) -> watch::Receiver<String> {
        self.inner.location.subscribe()
    }

    // ------------------------------------------------------------------
    // Observers and listeners
    // ------------------------------------------------------------------

    /// Observe child-list changes anywhere under `scope` (inclusive).
    pub fn observe(&self, scope: &NodeRef) -> MutationSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.inner.observers.lock().register(scope, sender);
        debug!("Mutation subscription {} bound to {}", id, scope.id());
        MutationSubscription::new(id, scope.id(), receiver, Arc::downgrade(&self.inner))
    }

    /// Number of live mutation subscriptions.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }

    pub fn add_input_listener<F>(&self, listener: F)
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        self.inner.input_listeners.write().push(Arc::new(listener));
    }

    /// Tell the host page that `target`'s content changed, the way a bubbling
    /// `input` event would.
    pub fn notify_input(&self, target: &Node) {
        let event = InputEvent {
            target: target.id(),
            bubbles: true,
        };
        let listeners = self.inner.input_listeners.read().clone();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("location", &self.location())
            .field("observers", &self.observer_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
