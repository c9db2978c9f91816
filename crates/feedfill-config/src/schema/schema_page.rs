//! Page-shape configuration: where to watch, what to fill, what to attach.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::strings;

/// Mutation watcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Selector of the feed container to observe.
    #[serde(default = "default_root_selector")]
    pub root_selector: String,

    /// Fallback rescan period.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Delay after a mutation batch before rescanning.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            root_selector: default_root_selector(),
            poll_interval_ms: default_poll_interval(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

impl WatcherConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn default_root_selector() -> String {
    "main".to_string()
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_settle_delay() -> u64 {
    500
}

/// Target scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Minimum interval between two eligible scans of the same element.
    #[serde(default = "default_cooldown")]
    pub cooldown_ms: u64,

    /// Shape descriptors of comment inputs.
    #[serde(default = "default_target_selectors")]
    pub target_selectors: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown(),
            target_selectors: default_target_selectors(),
        }
    }
}

impl ScannerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

fn default_cooldown() -> u64 {
    1000
}

fn default_target_selectors() -> Vec<String> {
    strings(&[
        ".comments-comment-box__editor",
        ".ql-editor[contenteditable=\"true\"]",
        "textarea[aria-label=\"Add a comment\u{2026}\"]",
        "textarea[aria-label=\"Add a comment...\"]",
        "textarea[name=\"comment\"]",
    ])
}

/// Post context extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Selector list matched by `closest` from a target.
    #[serde(default = "default_post_container")]
    pub post_container_selector: String,

    /// Post body selectors, first match wins.
    #[serde(default = "default_text_selectors")]
    pub text_selectors: Vec<String>,

    /// Author label selectors, first match wins.
    #[serde(default = "default_author_selectors")]
    pub author_selectors: Vec<String>,

    /// Header container searched when no author selector matched.
    #[serde(default = "default_author_header")]
    pub author_header_selector: String,

    /// First match inside the header becomes the author.
    #[serde(default = "default_author_header_fallback")]
    pub author_header_fallback: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            post_container_selector: default_post_container(),
            text_selectors: default_text_selectors(),
            author_selectors: default_author_selectors(),
            author_header_selector: default_author_header(),
            author_header_fallback: default_author_header_fallback(),
        }
    }
}

fn default_post_container() -> String {
    ".feed-shared-update-v2, .scaffold-finite-scroll__content, .update-components-update, article"
        .to_string()
}

fn default_text_selectors() -> Vec<String> {
    strings(&[
        "[data-ad-preview=\"message\"]",
        ".feed-shared-update-v2__description",
    ])
}

fn default_author_selectors() -> Vec<String> {
    strings(&[
        ".feed-shared-actor__name",
        ".update-components-actor__name",
        ".feed-shared-actor__meta a",
        ".update-components-actor__meta a",
    ])
}

fn default_author_header() -> String {
    ".feed-shared-actor, .update-components-actor".to_string()
}

fn default_author_header_fallback() -> String {
    "a, span".to_string()
}

/// Regenerate/refine control configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordanceConfig {
    #[serde(default = "default_regenerate_class")]
    pub regenerate_class: String,

    #[serde(default = "default_refine_class")]
    pub refine_class: String,

    #[serde(default = "default_regenerate_label")]
    pub regenerate_label: String,

    #[serde(default = "default_regenerate_busy_label")]
    pub regenerate_busy_label: String,

    #[serde(default = "default_refine_label")]
    pub refine_label: String,

    #[serde(default = "default_refine_busy_label")]
    pub refine_busy_label: String,

    #[serde(default = "default_refine_prompt")]
    pub refine_prompt: String,

    #[serde(default = "default_refine_default")]
    pub refine_default: String,

    /// Controls left behind by other tools, removed on every poll.
    #[serde(default = "default_legacy_selectors")]
    pub legacy_selectors: Vec<String>,

    /// Install the isolated stylesheet into the document head.
    #[serde(default = "default_install_styles")]
    pub install_styles: bool,
}

impl Default for AffordanceConfig {
    fn default() -> Self {
        Self {
            regenerate_class: default_regenerate_class(),
            refine_class: default_refine_class(),
            regenerate_label: default_regenerate_label(),
            regenerate_busy_label: default_regenerate_busy_label(),
            refine_label: default_refine_label(),
            refine_busy_label: default_refine_busy_label(),
            refine_prompt: default_refine_prompt(),
            refine_default: default_refine_default(),
            legacy_selectors: default_legacy_selectors(),
            install_styles: default_install_styles(),
        }
    }
}

fn default_regenerate_class() -> String {
    "assistant-regenerate-btn".to_string()
}

fn default_refine_class() -> String {
    "assistant-refine-btn".to_string()
}

fn default_regenerate_label() -> String {
    "Regenerate".to_string()
}

fn default_regenerate_busy_label() -> String {
    "Generating...".to_string()
}

fn default_refine_label() -> String {
    "Refine".to_string()
}

fn default_refine_busy_label() -> String {
    "Refining...".to_string()
}

fn default_refine_prompt() -> String {
    "How would you like to refine the comment?".to_string()
}

fn default_refine_default() -> String {
    "Make it more specific to the content".to_string()
}

fn default_legacy_selectors() -> Vec<String> {
    strings(&[
        ".butterfly-regenerate-btn",
        ".butterfly-refine-btn",
        ".butterfly-post-btn",
    ])
}

fn default_install_styles() -> bool {
    true
}

/// Post composer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Composer editors in priority order.
    #[serde(default = "default_editor_selectors")]
    pub editor_selectors: Vec<String>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            editor_selectors: default_editor_selectors(),
        }
    }
}

fn default_editor_selectors() -> Vec<String> {
    strings(&[
        "[contenteditable=\"true\"][data-placeholder=\"What do you want to talk about?\"]",
        "[contenteditable=\"true\"][aria-label=\"Text editor for creating content\"]",
        "[contenteditable=\"true\"][aria-label=\"Editor for article content\"]",
    ])
}
