//! Generate subcommand handler for FeedFill.

use tracing::info;

use feedfill_config::Config;
use feedfill_generator_http::HttpGenerator;
use feedfill_protocols::{GenerationRequest, Generator};

/// Call the configured generator once and print the comment.
pub(crate) async fn generate(
    config: &Config,
    text: String,
    author: String,
    refinement: Option<String>,
    draft: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let generator = HttpGenerator::new(&config.generator)?;
    let request = build_request(text, author, refinement, draft);
    info!(
        "Requesting comment for post by {} ({} endpoints)",
        request.post_author,
        generator.urls().len()
    );

    let limit = config.fill.generation_timeout();
    let comment = tokio::time::timeout(limit, generator.generate(&request))
        .await
        .map_err(|_| format!("generation timed out after {:?}", limit))??;
    println!("{}", comment);
    Ok(())
}

fn build_request(
    text: String,
    author: String,
    refinement: Option<String>,
    draft: Option<String>,
) -> GenerationRequest {
    let request = GenerationRequest::new(text, author);
    match (refinement, draft) {
        (Some(refinement), Some(draft)) => request.with_refinement(refinement, draft),
        _ => request,
    }
}
