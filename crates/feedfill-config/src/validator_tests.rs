use super::*;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    // the default fallback endpoint is plain http
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "generator.endpoints[1]"));
}

#[test]
fn test_validate_no_endpoints() {
    let mut config = Config::default();
    config.generator.endpoints.clear();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "generator.endpoints"));
}

#[test]
fn test_validate_invalid_endpoint() {
    let mut config = Config::default();
    config.generator.endpoints = vec!["not a url".to_string()];

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "generator.endpoints[0]"));
}

#[test]
fn test_validate_unsupported_scheme() {
    let mut config = Config::default();
    config.generator.endpoints = vec!["ftp://example.com".to_string()];

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
}

#[test]
fn test_validate_path_without_slash() {
    let mut config = Config::default();
    config.generator.path = "generate_comment".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "generator.path"));
}

#[test]
fn test_validate_zero_timeouts() {
    let mut config = Config::default();
    config.generator.request_timeout_secs = 0;
    config.fill.generation_timeout_secs = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "generator.request_timeout_secs"));
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "fill.generation_timeout_secs"));
}

#[test]
fn test_validate_short_generation_timeout_warning() {
    let mut config = Config::default();
    config.fill.generation_timeout_secs = 5;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "fill.generation_timeout_secs"));
}

#[test]
fn test_validate_empty_target_selectors() {
    let mut config = Config::default();
    config.scanner.target_selectors.clear();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "scanner.target_selectors"));
}

#[test]
fn test_validate_poll_shorter_than_cooldown_warning() {
    let mut config = Config::default();
    config.watcher.poll_interval_ms = 100;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "watcher.poll_interval_ms"));
}

#[test]
fn test_validate_missing_author_sources() {
    let mut config = Config::default();
    config.context.author_selectors.clear();
    config.context.author_header_selector = String::new();

    let result = ConfigValidator::validate(&config);
    assert!(result
        .errors
        .iter()
        .any(|e| e.path == "context.author_selectors"));
}

#[test]
fn test_into_result_reports_first_error() {
    let mut config = Config::default();
    config.watcher.root_selector = " ".to_string();

    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(err.to_string().contains("watcher.root_selector"));
}

#[test]
fn test_into_result_returns_warnings() {
    let warnings = ConfigValidator::validate(&Config::default())
        .into_result()
        .unwrap();
    assert!(!warnings.is_empty());
}
