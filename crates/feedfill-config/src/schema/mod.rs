//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_generator;
mod schema_infra;
mod schema_page;

pub use schema_generator::*;
pub use schema_infra::*;
pub use schema_page::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub fill: FillConfig,

    #[serde(default)]
    pub watcher: WatcherConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub context: ContextConfig,

    #[serde(default)]
    pub affordances: AffordanceConfig,

    #[serde(default)]
    pub composer: ComposerConfig,

    #[serde(default)]
    pub settings: SettingsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

pub(crate) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
