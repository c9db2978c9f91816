use super::*;
use crate::document::Document;
use crate::fixture::NodeSpec;
use crate::node::NodeRef;

fn sample() -> (Document, NodeRef) {
    let doc = Document::new("about:blank");
    let tree = doc
        .build(
            &NodeSpec::element("div")
                .class("feed-shared-update-v2 post")
                .attr("id", "p1")
                .child(
                    NodeSpec::element("section").class("comments").child(
                        NodeSpec::element("div")
                            .class("ql-editor")
                            .attr("contenteditable", "true")
                            .attr("data-placeholder", "Add a comment…"),
                    ),
                )
                .child(NodeSpec::element("textarea").attr("name", "comment")),
        )
        .unwrap();
    doc.body().append_child(&tree).unwrap();
    (doc, tree)
}

fn find(doc: &Document, selector: &str) -> Vec<NodeRef> {
    doc.query_selector_all(&Selector::parse(selector).unwrap())
}

#[test]
fn test_type_selector() {
    let (doc, _) = sample();
    assert_eq!(find(&doc, "textarea").len(), 1);
    assert_eq!(find(&doc, "TEXTAREA").len(), 1);
    assert_eq!(find(&doc, "div").len(), 2);
}

#[test]
fn test_class_and_id() {
    let (doc, tree) = sample();
    assert_eq!(find(&doc, ".post")[0].id(), tree.id());
    assert_eq!(find(&doc, "#p1")[0].id(), tree.id());
    assert_eq!(find(&doc, "div.post.feed-shared-update-v2").len(), 1);
    assert!(find(&doc, ".post.missing").is_empty());
}

#[test]
fn test_attribute_operators() {
    let (doc, _) = sample();
    assert_eq!(find(&doc, "[contenteditable]").len(), 1);
    assert_eq!(find(&doc, "[contenteditable='true']").len(), 1);
    assert_eq!(find(&doc, "[contenteditable=\"false\"]").len(), 0);
    assert_eq!(find(&doc, "[class~=post]").len(), 1);
    assert_eq!(find(&doc, "[class~=pos]").len(), 0);
    assert_eq!(find(&doc, "[data-placeholder^='Add a']").len(), 1);
    assert_eq!(find(&doc, "[data-placeholder*='comment']").len(), 1);
    assert_eq!(find(&doc, "[data-placeholder$='…']").len(), 1);
    assert_eq!(find(&doc, "[name*='']").len(), 0);
}

#[test]
fn test_combinators() {
    let (doc, _) = sample();
    assert_eq!(find(&doc, ".post .ql-editor").len(), 1);
    assert_eq!(find(&doc, ".post > .ql-editor").len(), 0);
    assert_eq!(find(&doc, ".post > section > .ql-editor").len(), 1);
    assert_eq!(find(&doc, "body .post textarea").len(), 1);
    assert_eq!(find(&doc, "section textarea").len(), 0);
}

#[test]
fn test_selector_list_matches_any() {
    let (doc, _) = sample();
    let nodes = find(&doc, "textarea, .ql-editor");
    assert_eq!(nodes.len(), 2);
}

#[test]
fn test_parse_all_joins_sources() {
    let selector = Selector::parse_all(&["textarea", "div.ql-editor"]).unwrap();
    assert_eq!(selector.to_string(), "textarea, div.ql-editor");
    assert!(Selector::parse_all::<&str>(&[]).is_err());
}

#[test]
fn test_universal_selector() {
    let (doc, _) = sample();
    let all = find(&doc, "*");
    // html, head, body, div, section, div, textarea
    assert_eq!(all.len(), 7);
}

#[test]
fn test_text_nodes_never_match() {
    let doc = Document::new("about:blank");
    let text = doc.create_text("hello");
    assert!(!Selector::parse("*").unwrap().matches(&text));
}

#[test]
fn test_invalid_selectors() {
    for bad in ["", "  ", "div >", ".", "[", "[a", "[a=]", "[a='x", "a,", "a ! b", "[a|=x]"] {
        assert!(
            matches!(Selector::parse(bad), Err(DomError::InvalidSelector { .. })),
            "expected '{}' to be rejected",
            bad
        );
    }
}

#[test]
fn test_from_str_and_display() {
    let selector: Selector = "  div.a > span  ".parse().unwrap();
    assert_eq!(selector.as_str(), "div.a > span");
    assert_eq!(format!("{}", selector), "div.a > span");
}
