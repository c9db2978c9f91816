use super::*;
use std::time::Duration;

use feedfill_dom::NodeSpec;

fn page() -> (Document, NodeRef) {
    let doc = Document::new("https://www.linkedin.com/feed/");
    let main = doc
        .build(
            &NodeSpec::element("main").child(
                NodeSpec::element("div")
                    .class("feed-shared-update-v2")
                    // matches both the class and the contenteditable descriptor
                    .child(
                        NodeSpec::element("div")
                            .class("comments-comment-box__editor ql-editor")
                            .attr("contenteditable", "true"),
                    )
                    .child(NodeSpec::element("textarea").attr("name", "comment")),
            ),
        )
        .unwrap();
    doc.body().append_child(&main).unwrap();
    (doc, main)
}

fn scanner(doc: &Document) -> TargetScanner {
    TargetScanner::new(doc.clone(), &ScannerConfig::default()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_descriptors_yield_once() {
    let (doc, _) = page();
    let mut scanner = scanner(&doc);
    let found = scanner.scan();
    assert_eq!(found.len(), 2);
    assert_ne!(found[0].id(), found[1].id());
    assert_eq!(scanner.throttle().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_descriptor_order() {
    let (doc, _) = page();
    let mut scanner = scanner(&doc);
    let found = scanner.scan();
    assert_eq!(found[0].tag_name(), Some("div"));
    assert_eq!(found[1].tag_name(), Some("textarea"));
}

#[tokio::test(start_paused = true)]
async fn test_rescan_within_cooldown_yields_nothing() {
    let (doc, _) = page();
    let mut scanner = scanner(&doc);
    let t0 = Instant::now();
    assert_eq!(scanner.scan_at(t0).len(), 2);
    assert!(scanner.scan_at(t0 + Duration::from_millis(500)).is_empty());
    assert_eq!(scanner.scan_at(t0 + Duration::from_millis(1000)).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_scan_uses_tokio_clock() {
    let (doc, _) = page();
    let mut scanner = scanner(&doc);
    assert_eq!(scanner.scan().len(), 2);
    tokio::time::advance(Duration::from_millis(999)).await;
    assert!(scanner.scan().is_empty());
    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(scanner.scan().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_new_target_is_eligible_immediately() {
    let (doc, main) = page();
    let mut scanner = scanner(&doc);
    let t0 = Instant::now();
    scanner.scan_at(t0);

    let late = doc.create_element("textarea");
    late.set_attribute("aria-label", "Add a comment...");
    main.append_child(&late).unwrap();

    let found = scanner.scan_at(t0 + Duration::from_millis(10));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), late.id());
}

#[tokio::test(start_paused = true)]
async fn test_removed_targets_are_pruned() {
    let (doc, main) = page();
    let mut scanner = scanner(&doc);
    scanner.scan();
    assert_eq!(scanner.throttle().len(), 2);

    for child in main.children() {
        child.remove();
    }
    assert!(scanner.scan().is_empty());
    assert!(scanner.throttle().is_empty());
}

#[test]
fn test_invalid_descriptor_is_reported() {
    let doc = Document::new("about:blank");
    let config = ScannerConfig {
        target_selectors: vec!["textarea".to_string(), "div[".to_string()],
        ..Default::default()
    };
    let err = TargetScanner::new(doc, &config).err().unwrap();
    assert!(matches!(
        err,
        AutoFillError::Selector {
            field: "scanner.target_selectors",
            ..
        }
    ));
}
