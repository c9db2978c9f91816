//! # FeedFill DOM
//!
//! The host document the auto-fill coordinator works against.
//!
//! - [`Document`]: owns the node tree, the location, mutation observers and
//!   host input listeners
//! - [`Node`]: element or text node with attributes, a form value and an
//!   optional click handler
//! - [`Selector`]: CSS subset (type, `#id`, `.class`, attribute predicates,
//!   descendant and child combinators, selector lists)
//! - [`MutationSubscription`]: child-list observer scoped to a subtree,
//!   disconnected when dropped
//! - [`DocumentSpec`]: JSON fixture describing a page
//!
//! Nodes are shared (`Arc`) and keep only weak references upward (parent,
//! owning document), so a node removed from the tree and dropped by every
//! holder is freed.

mod document;
mod error;
mod fixture;
mod mutation;
mod node;
mod selector;

pub use document::{Document, InputEvent, InputListener};
pub use error::DomError;
pub use fixture::{DocumentSpec, NodeSpec};
pub use mutation::{MutationRecord, MutationSubscription};
pub use node::{ClickHandler, Node, NodeId, NodeKind, NodeRef};
pub use selector::Selector;
