use super::*;
use feedfill_dom::Document;

fn setup() -> (Document, NodeRef, ScanThrottle) {
    let doc = Document::new("about:blank");
    let node = doc.create_element("textarea");
    (doc, node, ScanThrottle::new(Duration::from_millis(1000)))
}

#[tokio::test(start_paused = true)]
async fn test_never_seen_is_admitted() {
    let (_doc, node, mut throttle) = setup();
    assert!(throttle.admit(&node, Instant::now()));
    assert_eq!(throttle.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_law() {
    let (_doc, node, mut throttle) = setup();
    let t0 = Instant::now();
    assert!(throttle.admit(&node, t0));
    assert!(!throttle.admit(&node, t0 + Duration::from_millis(400)));
    assert!(!throttle.admit(&node, t0 + Duration::from_millis(999)));
    assert!(throttle.admit(&node, t0 + Duration::from_millis(1000)));
}

#[tokio::test(start_paused = true)]
async fn test_throttled_scan_does_not_restamp() {
    let (_doc, node, mut throttle) = setup();
    let t0 = Instant::now();
    assert!(throttle.admit(&node, t0));
    assert!(!throttle.admit(&node, t0 + Duration::from_millis(900)));
    // still measured from t0, not from the rejected attempt
    assert!(throttle.admit(&node, t0 + Duration::from_millis(1100)));
}

#[tokio::test(start_paused = true)]
async fn test_elements_are_independent() {
    let (doc, first, mut throttle) = setup();
    let second = doc.create_element("textarea");
    let t0 = Instant::now();
    assert!(throttle.admit(&first, t0));
    assert!(throttle.admit(&second, t0 + Duration::from_millis(10)));
    assert!(!throttle.admit(&first, t0 + Duration::from_millis(20)));
}

#[tokio::test(start_paused = true)]
async fn test_prune_drops_dead_elements() {
    let (doc, node, mut throttle) = setup();
    let other = doc.create_element("div");
    throttle.admit(&node, Instant::now());
    throttle.admit(&other, Instant::now());

    drop(node);
    assert_eq!(throttle.prune(), 1);
    assert_eq!(throttle.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_table_does_not_keep_elements_alive() {
    let (_doc, node, mut throttle) = setup();
    throttle.admit(&node, Instant::now());
    let weak = Arc::downgrade(&node);
    drop(node);
    assert!(weak.upgrade().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_forget_readmits() {
    let (_doc, node, mut throttle) = setup();
    let t0 = Instant::now();
    throttle.admit(&node, t0);
    throttle.forget(node.id());
    assert!(throttle.admit(&node, t0 + Duration::from_millis(1)));
    assert!(!throttle.is_empty());
}
