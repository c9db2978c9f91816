//! Feed subcommand handlers for FeedFill.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use feedfill_autofill::{read_content, AutoFillRuntime, PostComposer, RunStats};
use feedfill_config::Config;
use feedfill_dom::{Document, Selector};
use feedfill_generator_http::HttpGenerator;
use feedfill_protocols::{Generator, Prompter, SettingsStore};
use feedfill_settings::FileSettingsStore;

use crate::adapters::StdinPrompter;

/// Final state of one comment box.
#[derive(Debug, Serialize)]
pub(crate) struct TargetReport {
    pub id: u64,
    pub filled: bool,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct FeedReport {
    pub location: String,
    pub stats: RunStats,
    pub targets: Vec<TargetReport>,
}

/// Run the auto-fill runtime on a feed fixture until the duration elapses or
/// Ctrl-C, then print the report.
pub(crate) async fn run_feed(
    config: &Config,
    feed: &Path,
    duration_secs: Option<u64>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = Document::from_file(feed)?;
    info!("Loaded feed {} ({})", feed.display(), document.location());

    let generator = Arc::new(HttpGenerator::new(&config.generator)?);
    let settings = Arc::new(FileSettingsStore::open(&config.settings.path).await?);

    let stop = async move {
        match duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        }
    };

    let report = run_document(
        document.clone(),
        config,
        generator,
        settings,
        Arc::new(StdinPrompter),
        stop,
    )
    .await?;

    if let Some(output) = output {
        let snapshot = serde_json::to_string_pretty(&document.snapshot())?;
        tokio::fs::write(output, snapshot).await?;
        info!("Wrote document snapshot to {}", output.display());
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Drive the runtime on `document` until `stop` resolves.
pub(crate) async fn run_document(
    document: Document,
    config: &Config,
    generator: Arc<dyn Generator>,
    settings: Arc<dyn SettingsStore>,
    prompter: Arc<dyn Prompter>,
    stop: impl Future<Output = ()>,
) -> Result<FeedReport, Box<dyn std::error::Error>> {
    let runtime = AutoFillRuntime::new(document.clone(), config, generator, settings, prompter)?;
    let shutdown = runtime.shutdown_token();
    let handle = tokio::spawn(runtime.run());

    stop.await;
    shutdown.cancel();
    let stats = handle.await??;

    Ok(FeedReport {
        location: document.location(),
        stats,
        targets: collect_targets(&document, config)?,
    })
}

fn collect_targets(
    document: &Document,
    config: &Config,
) -> Result<Vec<TargetReport>, Box<dyn std::error::Error>> {
    let selector = Selector::parse_all(&config.scanner.target_selectors)?;
    Ok(document
        .query_selector_all(&selector)
        .into_iter()
        .map(|target| TargetReport {
            id: target.id().as_u64(),
            filled: target.has_attribute(&config.fill.marker_attribute),
            content: read_content(&target),
        })
        .collect())
}

/// Insert `text` into the feed fixture's post composer and print the editor.
pub(crate) async fn compose(
    config: &Config,
    feed: &Path,
    text: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = Document::from_file(feed)?;
    let composer = PostComposer::new(&config.composer)?;
    let editor = composer.insert(&document, text)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&document.snapshot_node(&editor))?
    );
    Ok(())
}
