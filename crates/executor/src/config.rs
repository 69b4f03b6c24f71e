use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use super::error::Error;
use descent_core::SearchConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct GraphConfig {
    pub edges_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorConfig {
    pub total_queries: usize,
    pub batch_size: usize,
    pub interval_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExecutorConfig {
    pub buffer_size: usize,
    pub batch_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub graph: GraphConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub simulator: SimulatorConfig,
    pub executor: ExecutorConfig,
}

/// Loads configuration from `crates/executor/Config.toml` and environment variables.
pub fn load_config() -> Result<Config, Error> {
    let base_path = env::current_dir().map_err(|e| {
        Error::ConfigLoadError(format!("Failed to determine current directory: {}", e))
    })?;

    let config_file_path: PathBuf = base_path
        .join("crates")
        .join("executor")
        .join("Config.toml");

    load_config_from(&config_file_path)
}

/// Loads configuration from `path`, letting `EXECUTOR__SECTION__KEY`
/// environment variables override individual values.
pub fn load_config_from(path: &Path) -> Result<Config, Error> {
    if !path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at calculated path: {}",
            path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("EXECUTOR")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use descent_core::CycleScope;
    use std::io::Write;
    use tempfile::Builder;

    const MOCK_CONFIG: &str = r#"
[graph]
edges_path = "landscape.csv"

[search]
max_depth = 8
cycle_scope = "per_search"

[simulator]
total_queries = 12
batch_size = 4
interval_ms = 10
seed = 7

[executor]
buffer_size = 2
batch_size = 3
"#;

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("Failed to create temp file");
        temp_file
            .write_all(MOCK_CONFIG.as_bytes())
            .expect("Failed to write mock config");

        let config = load_config_from(temp_file.path()).expect("Config should load");

        assert_eq!(config.graph.edges_path, "landscape.csv");
        assert_eq!(config.search.max_depth, 8);
        assert_eq!(config.search.cycle_scope, CycleScope::PerSearch);
        // Unset search keys keep their defaults.
        assert_eq!(config.search.max_steps, SearchConfig::default().max_steps);
        assert!(config.search.forbid_backtracked_edges);
        assert_eq!(config.simulator.seed, Some(7));
        assert_eq!(config.executor.batch_size, 3);
    }

    #[test]
    fn test_missing_config_file() {
        let result = load_config_from(Path::new("does/not/exist/Config.toml"));

        assert!(matches!(result, Err(Error::ConfigLoadError(_))));
    }
}
