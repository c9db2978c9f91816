//! Generator HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use feedfill_config::GeneratorConfig;
use feedfill_protocols::{GenerationRequest, Generator, GeneratorError};

use crate::api::{ApiRequest, ApiResponse};

/// Generator backed by one or more HTTP endpoints.
pub struct HttpGenerator {
    client: Client,
    urls: Vec<Url>,
}

impl HttpGenerator {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        if config.endpoints.is_empty() {
            return Err(GeneratorError::NoEndpoints);
        }

        let urls = config
            .endpoints
            .iter()
            .map(|endpoint| endpoint_url(endpoint, &config.path))
            .collect::<Result<Vec<_>, _>>()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GeneratorError::Configuration(e.to_string()))?;

        Ok(Self { client, urls })
    }

    /// Full request URLs in the order they are tried.
    pub fn urls(&self) -> &[Url] {
        &self.urls
    }

    async fn post(&self, url: &Url, body: &ApiRequest) -> Result<String, GeneratorError> {
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GeneratorError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;
        match parsed.comment {
            Some(comment) if !comment.trim().is_empty() => Ok(comment),
            _ => Err(GeneratorError::EmptyContent),
        }
    }
}

fn endpoint_url(endpoint: &str, path: &str) -> Result<Url, GeneratorError> {
    let joined = format!("{}{}", endpoint.trim_end_matches('/'), path);
    Url::parse(&joined)
        .map_err(|e| GeneratorError::Configuration(format!("invalid endpoint '{}': {}", endpoint, e)))
}

#[async_trait]
impl Generator for HttpGenerator {
    fn id(&self) -> &str {
        "http"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        let body = ApiRequest::from(request);
        let mut last_error = None;

        for (attempt, url) in self.urls.iter().enumerate() {
            debug!("Generation attempt {} via {}", attempt + 1, url);
            match self.post(url, &body).await {
                Ok(comment) => {
                    if attempt > 0 {
                        info!("Generated comment via fallback endpoint {}", url);
                    }
                    return Ok(comment);
                }
                Err(e) if e.is_transport() => {
                    warn!("Endpoint {} unreachable: {}", url, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(GeneratorError::AllEndpointsFailed {
            attempts: self.urls.len(),
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}

impl std::fmt::Debug for HttpGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGenerator")
            .field("urls", &self.urls)
            .finish()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
