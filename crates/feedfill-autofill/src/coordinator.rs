//! Fill coordinator.
//!
//! Drives one target through `Unprocessed -> Filling -> Filled`:
//!
//! 1. a target carrying the marker is left alone
//! 2. a provisional in-flight claim is taken before the first suspension
//!    point, so overlapping scans can not fill the same target twice
//! 3. the auto-comment setting is read; an explicit `false` stops here
//! 4. the post container and its text/author are resolved
//! 5. stale controls next to the target are removed
//! 6. the generator is called under a timeout
//! 7. the content is written and the host notified
//! 8. the marker is set and the regenerate/refine controls attached
//!
//! Steps 3, 4 and 6 end the attempt without a marker, so a later scan may
//! retry.

use std::sync::{Arc, Weak};

use dashmap::DashSet;
use futures::future::BoxFuture;
use serde::Serialize;
use tracing::{debug, info, warn};

use feedfill_config::{AffordanceConfig, ContextConfig, FillConfig};
use feedfill_dom::{Document, Node, NodeId, NodeRef};
use feedfill_protocols::{
    auto_comments_enabled, GenerationRequest, Generator, GeneratorError, Prompter, SettingsStore,
};

use crate::affordance::{AffordanceKind, Affordances, BusyGuard};
use crate::content::{read_content, write_content};
use crate::context::ContextResolver;
use crate::error::{AutoFillError, AutoFillResult};

/// How a `process` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOutcome {
    /// The marker was already present.
    AlreadyFilled,
    /// Another `process` call holds the target.
    InFlight,
    /// Auto-comments are switched off.
    Disabled,
    /// No post container, or its text or author is empty.
    NoContext,
    /// The generator failed or returned nothing.
    NoContent,
    Filled,
}

impl FillOutcome {
    pub fn is_filled(self) -> bool {
        self == FillOutcome::Filled
    }
}

/// Releases an in-flight claim when dropped.
struct InFlightGuard<'a> {
    set: &'a DashSet<NodeId>,
    id: NodeId,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

pub struct FillCoordinator {
    document: Document,
    generator: Arc<dyn Generator>,
    settings: Arc<dyn SettingsStore>,
    prompter: Arc<dyn Prompter>,
    context: ContextResolver,
    affordances: Affordances,
    config: FillConfig,
    in_flight: DashSet<NodeId>,
}

impl FillCoordinator {
    pub fn new(
        document: Document,
        generator: Arc<dyn Generator>,
        settings: Arc<dyn SettingsStore>,
        prompter: Arc<dyn Prompter>,
        fill: &FillConfig,
        context: &ContextConfig,
        affordances: &AffordanceConfig,
    ) -> AutoFillResult<Arc<Self>> {
        Ok(Arc::new(Self {
            document,
            generator,
            settings,
            prompter,
            context: ContextResolver::new(context)?,
            affordances: Affordances::new(affordances)?,
            config: fill.clone(),
            in_flight: DashSet::new(),
        }))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn affordances(&self) -> &Affordances {
        &self.affordances
    }

    pub fn context(&self) -> &ContextResolver {
        &self.context
    }

    pub fn is_filled(&self, target: &Node) -> bool {
        target.has_attribute(&self.config.marker_attribute)
    }

    pub fn is_in_flight(&self, target: &Node) -> bool {
        self.in_flight.contains(&target.id())
    }

    /// Remove the marker so the automatic path may fill `target` again.
    pub fn reset(&self, target: &Node) {
        target.remove_attribute(&self.config.marker_attribute);
        debug!("Reset target {}", target.id());
    }

    fn claim(&self, id: NodeId) -> Option<InFlightGuard<'_>> {
        self.in_flight.insert(id).then_some(InFlightGuard {
            set: &self.in_flight,
            id,
        })
    }

    /// Fill `target` once.
    pub async fn process(self: &Arc<Self>, target: &NodeRef) -> AutoFillResult<FillOutcome> {
        if self.is_filled(target) {
            return Ok(FillOutcome::AlreadyFilled);
        }
        let Some(_claim) = self.claim(target.id()) else {
            debug!("Target {} already being filled", target.id());
            return Ok(FillOutcome::InFlight);
        };

        let enabled = auto_comments_enabled(self.settings.as_ref()).await?;
        if !enabled {
            debug!("Auto-comments disabled, skipping {}", target.id());
            return Ok(FillOutcome::Disabled);
        }

        let Some((container, context)) = self.context.resolve(target) else {
            debug!("No post context for {}", target.id());
            return Ok(FillOutcome::NoContext);
        };

        let host = target.parent().ok_or(AutoFillError::Detached(target.id()))?;
        let removed = self.affordances.remove_stale(&host);
        if removed > 0 {
            debug!("Removed {} stale controls next to {}", removed, target.id());
        }

        let request = GenerationRequest::from_context(&context);
        let text = match self.generate(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Generation for {} failed: {}", target.id(), e);
                return Ok(FillOutcome::NoContent);
            }
        };

        write_content(&self.document, target, &text);
        target.set_attribute(&self.config.marker_attribute, "1");
        self.attach(target, &container)?;

        info!("Filled target {} for post by {}", target.id(), context.author);
        Ok(FillOutcome::Filled)
    }

    /// Generate under the configured timeout; blank output is an error.
    async fn generate(&self, request: &GenerationRequest) -> AutoFillResult<String> {
        let limit = self.config.generation_timeout();
        let text = tokio::time::timeout(limit, self.generator.generate(request))
            .await
            .map_err(|_| AutoFillError::Timeout(limit))??;
        if text.trim().is_empty() {
            return Err(GeneratorError::EmptyContent.into());
        }
        Ok(text)
    }

    /// Generate for a user action. Failures yield the fallback message so
    /// the user sees that something went wrong; blank output yields nothing.
    async fn generate_for_user(&self, request: &GenerationRequest) -> Option<String> {
        match self.generate(request).await {
            Ok(text) => Some(text),
            Err(AutoFillError::Generator(GeneratorError::EmptyContent)) => None,
            Err(e) => {
                warn!("User-initiated generation failed: {}", e);
                Some(self.config.fallback_message.clone())
            }
        }
    }

    /// Re-extract the post context and replace the target's content.
    /// Returns the text written, if any.
    pub async fn regenerate(&self, target: &NodeRef, container: &NodeRef) -> Option<String> {
        let context = self.context.extract(container);
        let request = GenerationRequest::from_context(&context);
        let text = self.generate_for_user(&request).await?;
        write_content(&self.document, target, &text);
        debug!("Regenerated content of {}", target.id());
        Some(text)
    }

    /// Ask the user how to refine the current draft and replace it with the
    /// refined version. Nothing happens when the prompt is cancelled.
    pub async fn refine(&self, target: &NodeRef, container: &NodeRef) -> Option<String> {
        let (message, default) = self.affordances.refine_prompt();
        let instruction = self
            .prompter
            .prompt(message, default)
            .await
            .filter(|s| !s.trim().is_empty())?;

        let draft = read_content(target);
        let context = self.context.extract(container);
        let request = GenerationRequest::from_context(&context).with_refinement(instruction, draft);
        let text = self.generate_for_user(&request).await?;
        write_content(&self.document, target, &text);
        debug!("Refined content of {}", target.id());
        Some(text)
    }

    /// Insert fresh controls after `target`, bound to it and `container`.
    fn attach(self: &Arc<Self>, target: &NodeRef, container: &NodeRef) -> AutoFillResult<()> {
        let buttons: Vec<NodeRef> = AffordanceKind::ALL
            .iter()
            .map(|kind| {
                let button = self.affordances.create(&self.document, *kind);
                self.bind(*kind, &button, target, container);
                button
            })
            .collect();
        self.affordances.insert_after(target, &buttons)
    }

    /// Install the click handler of a control. The handler holds only weak
    /// references, so a removed control frees everything.
    fn bind(self: &Arc<Self>, kind: AffordanceKind, button: &NodeRef, target: &NodeRef, container: &NodeRef) {
        let coordinator: Weak<Self> = Arc::downgrade(self);
        let button_ref = Arc::downgrade(button);
        let target = Arc::downgrade(target);
        let container = Arc::downgrade(container);

        button.set_click_handler(Arc::new(move || -> BoxFuture<'static, ()> {
            let coordinator = coordinator.clone();
            let button = button_ref.clone();
            let target = target.clone();
            let container = container.clone();
            Box::pin(async move {
                let (Some(coordinator), Some(button), Some(target), Some(container)) = (
                    coordinator.upgrade(),
                    button.upgrade(),
                    target.upgrade(),
                    container.upgrade(),
                ) else {
                    return;
                };
                let _busy = BusyGuard::engage(
                    &button,
                    coordinator.affordances.busy_label(kind),
                    coordinator.affordances.label(kind),
                );
                match kind {
                    AffordanceKind::Regenerate => {
                        coordinator.regenerate(&target, &container).await;
                    }
                    AffordanceKind::Refine => {
                        coordinator.refine(&target, &container).await;
                    }
                }
            })
        }));
    }
}

impl std::fmt::Debug for FillCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FillCoordinator")
            .field("generator", &self.generator.id())
            .field("settings", &self.settings.id())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
