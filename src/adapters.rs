//! Adapter types and utility functions for FeedFill.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use feedfill_protocols::Prompter;

/// Prompter that asks on the terminal.
///
/// An empty line accepts the default, end of input cancels.
pub(crate) struct StdinPrompter;

#[async_trait]
impl Prompter for StdinPrompter {
    async fn prompt(&self, message: &str, default: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        let question = format!("{} [{}]: ", message, default);
        if let Err(e) = stdout.write_all(question.as_bytes()).await {
            warn!("Failed to write prompt: {}", e);
            return None;
        }
        let _ = stdout.flush().await;

        let mut line = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(answer_or_default(&line, default)),
            Err(e) => {
                warn!("Failed to read prompt answer: {}", e);
                None
            }
        }
    }
}

fn answer_or_default(line: &str, default: &str) -> String {
    let answer = line.trim();
    if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    }
}

/// Interpret a command-line value as JSON, falling back to a plain string.
pub(crate) fn parse_setting_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
