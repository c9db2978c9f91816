//! Configuration validation.

use url::Url;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_generator(config, &mut result);
        Self::validate_fill(config, &mut result);
        Self::validate_watcher(config, &mut result);
        Self::validate_scanner(config, &mut result);
        Self::validate_context(config, &mut result);

        result
    }

    fn validate_generator(config: &Config, result: &mut ValidationResult) {
        let generator = &config.generator;

        if generator.endpoints.is_empty() {
            result.add_error(ValidationError::new(
                "generator.endpoints",
                "At least one endpoint is required",
            ));
        }

        for (index, endpoint) in generator.endpoints.iter().enumerate() {
            let path = format!("generator.endpoints[{}]", index);
            match Url::parse(endpoint) {
                Ok(url) if url.scheme() == "http" => {
                    result.add_warning(ValidationWarning::new(
                        path,
                        format!("Endpoint '{}' is not using TLS", endpoint),
                    ));
                }
                Ok(url) if url.scheme() == "https" => {}
                Ok(url) => {
                    result.add_error(ValidationError::new(
                        path,
                        format!("Unsupported scheme '{}'", url.scheme()),
                    ));
                }
                Err(e) => {
                    result.add_error(ValidationError::new(
                        path,
                        format!("Invalid endpoint '{}': {}", endpoint, e),
                    ));
                }
            }
        }

        if !generator.path.starts_with('/') {
            result.add_error(ValidationError::new(
                "generator.path",
                "path must start with '/'",
            ));
        }

        if generator.request_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "generator.request_timeout_secs",
                "request_timeout_secs must be greater than 0",
            ));
        }
    }

    fn validate_fill(config: &Config, result: &mut ValidationResult) {
        if config.fill.marker_attribute.trim().is_empty() {
            result.add_error(ValidationError::new(
                "fill.marker_attribute",
                "Marker attribute cannot be empty",
            ));
        }

        if config.fill.generation_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "fill.generation_timeout_secs",
                "generation_timeout_secs must be greater than 0",
            ));
        }

        let per_endpoint = config.generator.request_timeout_secs;
        let attempts = config.generator.endpoints.len().max(1) as u64;
        if config.fill.generation_timeout_secs < per_endpoint * attempts {
            result.add_warning(ValidationWarning::new(
                "fill.generation_timeout_secs",
                "generation timeout is shorter than the worst case of all endpoint attempts, \
                 fallback endpoints may never be reached",
            ));
        }
    }

    fn validate_watcher(config: &Config, result: &mut ValidationResult) {
        if config.watcher.root_selector.trim().is_empty() {
            result.add_error(ValidationError::new(
                "watcher.root_selector",
                "Root selector cannot be empty",
            ));
        }

        if config.watcher.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "watcher.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        } else if config.watcher.poll_interval_ms < config.scanner.cooldown_ms {
            result.add_warning(ValidationWarning::new(
                "watcher.poll_interval_ms",
                "poll interval is shorter than the scan cooldown, most polls will be throttled",
            ));
        }
    }

    fn validate_scanner(config: &Config, result: &mut ValidationResult) {
        if config.scanner.target_selectors.is_empty() {
            result.add_error(ValidationError::new(
                "scanner.target_selectors",
                "At least one target selector is required",
            ));
        }

        if config.scanner.cooldown_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "scanner.cooldown_ms",
                "cooldown is 0, every mutation burst rescans every target",
            ));
        }
    }

    fn validate_context(config: &Config, result: &mut ValidationResult) {
        if config.context.post_container_selector.trim().is_empty() {
            result.add_error(ValidationError::new(
                "context.post_container_selector",
                "Post container selector cannot be empty",
            ));
        }

        if config.context.text_selectors.is_empty() {
            result.add_error(ValidationError::new(
                "context.text_selectors",
                "At least one text selector is required",
            ));
        }

        if config.context.author_selectors.is_empty()
            && config.context.author_header_selector.trim().is_empty()
        {
            result.add_error(ValidationError::new(
                "context.author_selectors",
                "Either author selectors or an author header selector is required",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
