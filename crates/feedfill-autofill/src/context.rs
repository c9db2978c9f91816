//! Post context resolution.

use feedfill_config::ContextConfig;
use feedfill_dom::{NodeRef, Selector};
use feedfill_protocols::PostContext;

use crate::error::{AutoFillError, AutoFillResult};

/// Finds the post a target belongs to and extracts its text and author.
#[derive(Debug, Clone)]
pub struct ContextResolver {
    container: Selector,
    text: Vec<Selector>,
    author: Vec<Selector>,
    header: Selector,
    header_fallback: Selector,
}

impl ContextResolver {
    pub fn new(config: &ContextConfig) -> AutoFillResult<Self> {
        Ok(Self {
            container: Selector::parse(&config.post_container_selector)
                .map_err(AutoFillError::selector("context.post_container_selector"))?,
            text: parse_list(&config.text_selectors, "context.text_selectors")?,
            author: parse_list(&config.author_selectors, "context.author_selectors")?,
            header: Selector::parse(&config.author_header_selector)
                .map_err(AutoFillError::selector("context.author_header_selector"))?,
            header_fallback: Selector::parse(&config.author_header_fallback)
                .map_err(AutoFillError::selector("context.author_header_fallback"))?,
        })
    }

    /// Nearest enclosing post container of `target`.
    pub fn container_of(&self, target: &NodeRef) -> Option<NodeRef> {
        target.closest(&self.container)
    }

    /// Text and author of `container`, trimmed. Missing parts are empty.
    pub fn extract(&self, container: &NodeRef) -> PostContext {
        let text = first_match(container, &self.text)
            .map(|n| n.text_content().trim().to_string())
            .unwrap_or_default();

        let author = first_match(container, &self.author)
            .or_else(|| {
                container
                    .query_selector(&self.header)
                    .and_then(|header| header.query_selector(&self.header_fallback))
            })
            .map(|n| n.text_content().trim().to_string())
            .unwrap_or_default();

        PostContext::new(text, author)
    }

    /// Container and context of `target`, `None` when either part is missing.
    pub fn resolve(&self, target: &NodeRef) -> Option<(NodeRef, PostContext)> {
        let container = self.container_of(target)?;
        let context = self.extract(&container);
        context.is_complete().then_some((container, context))
    }
}

fn parse_list(sources: &[String], field: &'static str) -> AutoFillResult<Vec<Selector>> {
    sources
        .iter()
        .map(|s| Selector::parse(s))
        .collect::<Result<Vec<_>, _>>()
        .map_err(AutoFillError::selector(field))
}

/// First descendant matching the earliest selector that matches anything.
fn first_match(scope: &NodeRef, selectors: &[Selector]) -> Option<NodeRef> {
    selectors.iter().find_map(|s| scope.query_selector(s))
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
