//! Regenerate/refine controls and page hygiene.

use tracing::debug;

use feedfill_config::AffordanceConfig;
use feedfill_dom::{Document, Node, NodeRef, Selector};

use crate::error::{AutoFillError, AutoFillResult};

/// Id of the stylesheet element installed into the head.
pub const STYLESHEET_ID: &str = "feedfill-styles";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffordanceKind {
    Regenerate,
    Refine,
}

impl AffordanceKind {
    pub const ALL: [AffordanceKind; 2] = [AffordanceKind::Regenerate, AffordanceKind::Refine];
}

/// Creates, finds and removes the controls attached next to filled targets.
#[derive(Debug, Clone)]
pub struct Affordances {
    config: AffordanceConfig,
    regenerate: Selector,
    refine: Selector,
    own: Selector,
    legacy: Vec<Selector>,
    stylesheet: Selector,
}

impl Affordances {
    pub fn new(config: &AffordanceConfig) -> AutoFillResult<Self> {
        let class = |field: &'static str, name: &str| {
            Selector::parse(&format!(".{}", name)).map_err(AutoFillError::selector(field))
        };
        let regenerate = class("affordances.regenerate_class", &config.regenerate_class)?;
        let refine = class("affordances.refine_class", &config.refine_class)?;
        let own = Selector::parse(&format!(
            ".{}, .{}",
            config.regenerate_class, config.refine_class
        ))
        .map_err(AutoFillError::selector("affordances"))?;
        let legacy = config
            .legacy_selectors
            .iter()
            .map(|s| Selector::parse(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AutoFillError::selector("affordances.legacy_selectors"))?;
        let stylesheet = Selector::parse(&format!("style#{}", STYLESHEET_ID))
            .map_err(AutoFillError::selector("affordances"))?;

        Ok(Self {
            config: config.clone(),
            regenerate,
            refine,
            own,
            legacy,
            stylesheet,
        })
    }

    pub fn class(&self, kind: AffordanceKind) -> &str {
        match kind {
            AffordanceKind::Regenerate => &self.config.regenerate_class,
            AffordanceKind::Refine => &self.config.refine_class,
        }
    }

    pub fn label(&self, kind: AffordanceKind) -> &str {
        match kind {
            AffordanceKind::Regenerate => &self.config.regenerate_label,
            AffordanceKind::Refine => &self.config.refine_label,
        }
    }

    pub fn busy_label(&self, kind: AffordanceKind) -> &str {
        match kind {
            AffordanceKind::Regenerate => &self.config.regenerate_busy_label,
            AffordanceKind::Refine => &self.config.refine_busy_label,
        }
    }

    pub fn refine_prompt(&self) -> (&str, &str) {
        (&self.config.refine_prompt, &self.config.refine_default)
    }

    /// Controls of `kind` under `host`.
    pub fn find(&self, host: &Node, kind: AffordanceKind) -> Vec<NodeRef> {
        let selector = match kind {
            AffordanceKind::Regenerate => &self.regenerate,
            AffordanceKind::Refine => &self.refine,
        };
        host.query_selector_all(selector)
    }

    /// Remove every regenerate/refine control under `host`.
    pub fn remove_stale(&self, host: &Node) -> usize {
        let stale = host.query_selector_all(&self.own);
        for node in &stale {
            node.remove();
        }
        stale.len()
    }

    /// A detached button of `kind` with its idle label.
    pub fn create(&self, document: &Document, kind: AffordanceKind) -> NodeRef {
        let button = document.create_element("button");
        button.set_attribute("type", "button");
        button.set_attribute("class", self.class(kind));
        button.set_text_content(self.label(kind));
        button
    }

    /// Insert `buttons` right after `target`, in order.
    pub fn insert_after(&self, target: &NodeRef, buttons: &[NodeRef]) -> AutoFillResult<()> {
        let host = target.parent().ok_or(AutoFillError::Detached(target.id()))?;
        let mut anchor = target.clone();
        for button in buttons {
            host.insert_before(button, anchor.next_sibling().as_ref())?;
            anchor = button.clone();
        }
        Ok(())
    }

    /// Remove controls left behind by other tools.
    pub fn cleanup_legacy(&self, document: &Document) -> usize {
        let mut removed = 0;
        for selector in &self.legacy {
            for node in document.query_selector_all(selector) {
                node.remove();
                removed += 1;
            }
        }
        if removed > 0 {
            debug!("Removed {} legacy controls", removed);
        }
        removed
    }

    /// Install the isolated stylesheet once. Returns whether it was added.
    pub fn install_styles(&self, document: &Document) -> AutoFillResult<bool> {
        if document.query_selector(&self.stylesheet).is_some() {
            return Ok(false);
        }
        let style = document.create_element("style");
        style.set_attribute("id", STYLESHEET_ID);
        style.set_text_content(self.stylesheet_text());
        document.head().append_child(&style)?;
        debug!("Installed stylesheet #{}", STYLESHEET_ID);
        Ok(true)
    }

    fn stylesheet_text(&self) -> String {
        let regenerate = &self.config.regenerate_class;
        let refine = &self.config.refine_class;
        let mut css = format!(
            ".{regenerate}, .{refine} {{ padding: 4px 10px; margin: 4px 8px 4px 0; \
             font-size: 12px; cursor: pointer; border: none; border-radius: 4px; \
             color: white; display: inline-block; box-sizing: border-box; \
             font-family: inherit; }}\n\
             .{regenerate} {{ background: #0077B5; }}\n\
             .{refine} {{ background: #0072b1; }}\n\
             .{regenerate}:disabled, .{refine}:disabled {{ background: #cccccc; \
             cursor: not-allowed; }}\n"
        );
        if !self.config.legacy_selectors.is_empty() {
            css.push_str(&format!(
                "{} {{ display: none !important; }}\n",
                self.config.legacy_selectors.join(", ")
            ));
        }
        css
    }
}

/// Marks a control busy for as long as it lives.
///
/// The control is disabled and shows the busy label; dropping the guard
/// re-enables it and restores the idle label, whatever the outcome.
pub struct BusyGuard {
    button: NodeRef,
    idle_label: String,
}

impl BusyGuard {
    pub fn engage(button: &NodeRef, busy_label: &str, idle_label: &str) -> Self {
        button.set_attribute("disabled", "");
        button.set_text_content(busy_label);
        Self {
            button: button.clone(),
            idle_label: idle_label.to_string(),
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.button.remove_attribute("disabled");
        self.button.set_text_content(self.idle_label.as_str());
    }
}

#[cfg(test)]
#[path = "affordance_tests.rs"]
mod tests;
