//! Auto-fill runtime driver.
//!
//! One loop multiplexes every trigger:
//!
//! - mutation batches under the feed container (after a settle delay)
//! - location changes (SPA navigation)
//! - a periodic fallback tick
//! - settings-change notifications
//! - shutdown
//!
//! Each eligible target is filled in its own tracked task, so a slow or
//! failing fill never blocks scanning.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use feedfill_config::{Config, WatcherConfig};
use feedfill_dom::{Document, NodeRef};
use feedfill_protocols::{
    auto_comments_enabled, Generator, Prompter, SettingsChange, SettingsStore, AUTO_COMMENTS_KEY,
};

use crate::coordinator::{FillCoordinator, FillOutcome};
use crate::error::AutoFillResult;
use crate::navigation::NavigationTracker;
use crate::scanner::TargetScanner;
use crate::watcher::FeedWatcher;

/// Counters of one runtime session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub mutation_batches: u64,
    pub navigations: u64,
    pub ticks: u64,
    pub scans: u64,
    pub fills_spawned: u64,
}

pub struct AutoFillRuntime {
    document: Document,
    watcher: FeedWatcher,
    scanner: TargetScanner,
    coordinator: Arc<FillCoordinator>,
    settings: Arc<dyn SettingsStore>,
    navigation: NavigationTracker,
    config: WatcherConfig,
    install_styles: bool,
    shutdown: CancellationToken,
    tracker: TaskTracker,
    stats: RunStats,
}

impl AutoFillRuntime {
    pub fn new(
        document: Document,
        config: &Config,
        generator: Arc<dyn Generator>,
        settings: Arc<dyn SettingsStore>,
        prompter: Arc<dyn Prompter>,
    ) -> AutoFillResult<Self> {
        let coordinator = FillCoordinator::new(
            document.clone(),
            generator,
            settings.clone(),
            prompter,
            &config.fill,
            &config.context,
            &config.affordances,
        )?;

        Ok(Self {
            watcher: FeedWatcher::new(document.clone(), &config.watcher)?,
            scanner: TargetScanner::new(document.clone(), &config.scanner)?,
            navigation: NavigationTracker::new(document.location()),
            document,
            coordinator,
            settings,
            config: config.watcher.clone(),
            install_styles: config.affordances.install_styles,
            shutdown: CancellationToken::new(),
            tracker: TaskTracker::new(),
            stats: RunStats::default(),
        })
    }

    /// Token that stops [`AutoFillRuntime::run`] when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn coordinator(&self) -> &Arc<FillCoordinator> {
        &self.coordinator
    }

    pub fn watcher(&self) -> &FeedWatcher {
        &self.watcher
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Page setup and the first scan.
    pub async fn start(&mut self) -> AutoFillResult<()> {
        info!("Auto-fill runtime starting on {}", self.document.location());
        self.check_settings().await;

        let affordances = self.coordinator.affordances();
        affordances.cleanup_legacy(&self.document);
        if self.install_styles {
            affordances.install_styles(&self.document)?;
        }

        self.rescan();
        self.watcher.rebind();
        Ok(())
    }

    /// Scan and spawn a fill for every eligible target.
    pub fn rescan(&mut self) -> usize {
        self.stats.scans += 1;
        let targets = self.scanner.scan();
        for target in &targets {
            self.spawn_fill(target.clone());
        }
        targets.len()
    }

    fn spawn_fill(&mut self, target: NodeRef) {
        self.stats.fills_spawned += 1;
        let coordinator = self.coordinator.clone();
        self.tracker.spawn(async move {
            match coordinator.process(&target).await {
                Ok(FillOutcome::Filled) => {}
                Ok(outcome) => debug!("Target {} not filled: {:?}", target.id(), outcome),
                Err(e) => warn!("Fill of target {} failed: {}", target.id(), e),
            }
        });
    }

    /// Periodic fallback: hygiene, rescan, rebind, settings and location check.
    pub async fn tick(&mut self) {
        self.stats.ticks += 1;
        self.coordinator.affordances().cleanup_legacy(&self.document);
        self.rescan();
        if self.watcher.rebind() {
            debug!("Feed container changed on poll");
        }
        self.check_settings().await;

        let location = self.document.location();
        if self.navigation.observe(&location) {
            self.on_navigation(&location);
        }
    }

    fn on_navigation(&mut self, location: &str) {
        self.stats.navigations += 1;
        info!("Navigated to {}", location);
        self.rescan();
        self.watcher.rebind();
    }

    async fn check_settings(&self) {
        match auto_comments_enabled(self.settings.as_ref()).await {
            Ok(enabled) => debug!("Auto-comments enabled: {}", enabled),
            Err(e) => warn!("Failed to read settings: {}", e),
        }
    }

    /// Run until the shutdown token is cancelled, then wait for in-flight
    /// fills.
    pub async fn run(mut self) -> AutoFillResult<RunStats> {
        let shutdown = self.shutdown.clone();
        let mut location = self.document.subscribe_location();
        let mut settings = Some(self.settings.subscribe());

        // interval() panics on a zero period
        let period = self.config.poll_interval().max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately; start() covers it
        ticker.tick().await;

        self.start().await?;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Auto-fill runtime shutting down");
                    break;
                }
                batch = self.watcher.next_batch() => {
                    self.stats.mutation_batches += 1;
                    let settle = self.config.settle_delay();
                    tokio::select! {
                        _ = tokio::time::sleep(settle) => {}
                        _ = shutdown.cancelled() => break,
                    }
                    let settled = self.watcher.drain();
                    debug!(
                        "Mutation batch of {} records ({} more while settling)",
                        batch.len(),
                        settled.len()
                    );
                    self.rescan();
                }
                changed = location.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let url = location.borrow_and_update().clone();
                    if self.navigation.observe(&url) {
                        self.on_navigation(&url);
                    }
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
                change = next_setting(&mut settings) => match change {
                    Ok(change) => log_setting(&change),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {} settings notifications", skipped);
                    }
                    Err(RecvError::Closed) => {
                        debug!("Settings notifications closed");
                        settings = None;
                    }
                },
            }
        }

        self.watcher.dispose();
        self.tracker.close();
        self.tracker.wait().await;
        info!("Auto-fill runtime stopped: {:?}", self.stats);
        Ok(self.stats)
    }
}

async fn next_setting(
    receiver: &mut Option<broadcast::Receiver<SettingsChange>>,
) -> Result<SettingsChange, RecvError> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

fn log_setting(change: &SettingsChange) {
    if change.key != AUTO_COMMENTS_KEY {
        debug!("Setting {} changed", change.key);
        return;
    }
    // in-flight fills keep the value they already read
    match &change.value {
        Some(serde_json::Value::Bool(false)) => info!("Auto-comments were disabled"),
        _ => info!("Auto-comments are enabled"),
    }
}

impl std::fmt::Debug for AutoFillRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoFillRuntime")
            .field("watcher", &self.watcher)
            .field("coordinator", &self.coordinator)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
