//! Post composer insertion.

use tracing::{debug, info};

use feedfill_config::ComposerConfig;
use feedfill_dom::{Document, NodeRef, Selector};

use crate::error::{AutoFillError, AutoFillResult};

/// Puts externally supplied text into the page's post editor.
#[derive(Debug, Clone)]
pub struct PostComposer {
    editors: Vec<Selector>,
}

impl PostComposer {
    pub fn new(config: &ComposerConfig) -> AutoFillResult<Self> {
        let editors = config
            .editor_selectors
            .iter()
            .map(|s| Selector::parse(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AutoFillError::selector("composer.editor_selectors"))?;
        Ok(Self { editors })
    }

    /// First editor of the highest-priority kind present on the page.
    pub fn find(&self, document: &Document) -> Option<NodeRef> {
        self.editors
            .iter()
            .find_map(|selector| document.query_selector(selector))
    }

    /// Replace the editor's text with `text` and notify the host.
    pub fn insert(&self, document: &Document, text: &str) -> AutoFillResult<NodeRef> {
        let editor = self.find(document).ok_or(AutoFillError::ComposerNotFound)?;
        debug!("Inserting {} chars into composer {}", text.len(), editor.id());
        editor.set_text_content(text);
        document.notify_input(&editor);
        info!("Inserted text into post composer");
        Ok(editor)
    }
}
