//! Reading and writing target content.

use feedfill_dom::{Document, Node, NodeRef};

/// Current draft of `target`.
pub fn read_content(target: &Node) -> String {
    if target.is_content_editable() {
        target.text_content()
    } else {
        target.value()
    }
}

/// Replace `target`'s content and notify the host.
///
/// Rich editors get their text replaced, plain fields their value. The host
/// learns about it through a bubbling input notification either way.
pub fn write_content(document: &Document, target: &NodeRef, text: &str) {
    if target.is_content_editable() {
        target.set_text_content(text);
    } else {
        target.set_value(text);
    }
    document.notify_input(target);
}
