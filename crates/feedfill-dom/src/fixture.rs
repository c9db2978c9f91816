//! JSON page fixtures.
//!
//! ```json
//! {
//!   "location": "https://www.linkedin.com/feed/",
//!   "body": [
//!     { "tag": "main", "children": [
//!       { "tag": "div", "attributes": { "class": "feed-shared-update-v2" },
//!         "children": [ { "text": "Hello" } ] }
//!     ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::DomError;
use crate::node::{Node, NodeRef};

fn default_location() -> String {
    "about:blank".to_string()
}

/// A whole page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default)]
    pub head: Vec<NodeSpec>,
    #[serde(default)]
    pub body: Vec<NodeSpec>,
}

/// One node. Without a `tag` the spec is a text node and only `text` is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    fn validate(&self) -> Result<(), DomError> {
        match &self.tag {
            None => {
                if !self.children.is_empty() || !self.attributes.is_empty() {
                    return Err(DomError::InvalidFixture(
                        "text nodes take neither children nor attributes".to_string(),
                    ));
                }
                if self.text.is_none() {
                    return Err(DomError::InvalidFixture(
                        "node needs a tag or text".to_string(),
                    ));
                }
            }
            Some(tag) if tag.trim().is_empty() => {
                return Err(DomError::InvalidFixture("empty tag name".to_string()));
            }
            Some(_) => {}
        }
        self.children.iter().try_for_each(NodeSpec::validate)
    }

    fn snapshot(node: &Node) -> Self {
        match node.tag_name() {
            None => Self::text(node.text_content()),
            Some(tag) => {
                let value = node.value();
                Self {
                    tag: Some(tag.to_string()),
                    attributes: node.attributes().into_iter().collect(),
                    text: None,
                    value: (!value.is_empty()).then_some(value),
                    children: node.children().iter().map(|c| Self::snapshot(c)).collect(),
                }
            }
        }
    }
}

impl Document {
    /// Build a detached node tree from `spec`. The nodes belong to this
    /// document but are not inserted.
    pub fn build(&self, spec: &NodeSpec) -> Result<NodeRef, DomError> {
        spec.validate()?;
        Ok(self.build_unchecked(spec))
    }

    fn build_unchecked(&self, spec: &NodeSpec) -> NodeRef {
        let Some(tag) = &spec.tag else {
            return self.create_text(spec.text.clone().unwrap_or_default());
        };
        let node = self.create_element(tag);
        for (name, value) in &spec.attributes {
            node.set_attribute(name, value.clone());
        }
        if let Some(value) = &spec.value {
            node.set_value(value.clone());
        }
        if let Some(text) = &spec.text {
            node.adopt(self.create_text(text.clone()));
        }
        for child in &spec.children {
            node.adopt(self.build_unchecked(child));
        }
        node
    }

    pub fn from_spec(spec: &DocumentSpec) -> Result<Self, DomError> {
        spec.head.iter().try_for_each(NodeSpec::validate)?;
        spec.body.iter().try_for_each(NodeSpec::validate)?;

        let document = Document::new(spec.location.clone());
        let head = document.head();
        for node in &spec.head {
            head.adopt(document.build_unchecked(node));
        }
        let body = document.body();
        for node in &spec.body {
            body.adopt(document.build_unchecked(node));
        }
        Ok(document)
    }

    pub fn from_json(json: &str) -> Result<Self, DomError> {
        let spec: DocumentSpec = serde_json::from_str(json)?;
        Self::from_spec(&spec)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DomError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomError::InvalidFixture(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Current state of the page as a fixture.
    pub fn snapshot(&self) -> DocumentSpec {
        DocumentSpec {
            location: self.location(),
            head: self.head().children().iter().map(|n| NodeSpec::snapshot(n)).collect(),
            body: self.body().children().iter().map(|n| NodeSpec::snapshot(n)).collect(),
        }
    }

    /// Snapshot of a single subtree.
    pub fn snapshot_node(&self, node: &Node) -> NodeSpec {
        NodeSpec::snapshot(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::Selector;

    const FEED: &str = r#"{
        "location": "https://www.linkedin.com/feed/",
        "body": [
            { "tag": "main", "children": [
                { "tag": "div", "attributes": { "class": "post" }, "children": [
                    { "tag": "span", "text": "Hello world" },
                    { "tag": "textarea", "value": "draft" }
                ] }
            ] }
        ]
    }"#;

    #[test]
    fn test_from_json_builds_tree() {
        let doc = Document::from_json(FEED).unwrap();
        assert_eq!(doc.location(), "https://www.linkedin.com/feed/");

        let post = doc.query_selector(&Selector::parse("main > .post").unwrap()).unwrap();
        assert_eq!(post.text_content(), "Hello world");

        let textarea = doc.query_selector(&Selector::parse("textarea").unwrap()).unwrap();
        assert_eq!(textarea.value(), "draft");
        assert!(textarea.is_connected());
    }

    #[test]
    fn test_location_defaults_to_blank() {
        let doc = Document::from_json("{}").unwrap();
        assert_eq!(doc.location(), "about:blank");
        assert!(doc.body().children().is_empty());
    }

    #[test]
    fn test_text_node_with_children_rejected() {
        let spec = DocumentSpec {
            body: vec![NodeSpec::text("x").child(NodeSpec::element("b"))],
            ..Default::default()
        };
        assert!(matches!(
            Document::from_spec(&spec),
            Err(DomError::InvalidFixture(_))
        ));
    }

    #[test]
    fn test_node_without_tag_or_text_rejected() {
        let result = Document::from_json(r#"{ "body": [ {} ] }"#);
        assert!(matches!(result, Err(DomError::InvalidFixture(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Document::from_json("{"), Err(DomError::Json(_))));
    }

    #[test]
    fn test_build_is_detached() {
        let doc = Document::new("about:blank");
        let node = doc
            .build(&NodeSpec::element("div").class("a b").child(NodeSpec::text("hi")))
            .unwrap();
        assert!(!node.is_connected());
        assert!(node.has_class("b"));
        assert_eq!(node.text_content(), "hi");
    }

    #[test]
    fn test_snapshot_reflects_changes() {
        let doc = Document::from_json(FEED).unwrap();
        let textarea = doc.query_selector(&Selector::parse("textarea").unwrap()).unwrap();
        textarea.set_value("edited");
        textarea.set_attribute("data-assistant-filled", "1");

        let snapshot = doc.snapshot();
        let main = &snapshot.body[0];
        let post = &main.children[0];
        let area = &post.children[1];
        assert_eq!(area.value.as_deref(), Some("edited"));
        assert_eq!(
            area.attributes.get("data-assistant-filled").map(String::as_str),
            Some("1")
        );
        assert_eq!(post.children[0].children[0].text.as_deref(), Some("Hello world"));
    }
}
