use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::expression::Expressions;

/// Scan settings merged from config files and CLI flags.
///
/// # Configuration locations
///
/// Loaded in order of precedence:
/// 1. Custom config file passed via `--config`
/// 2. Local `.dragnet.yaml` in the current directory
/// 3. Global `$HOME/.config/dragnet/config.yaml`
///
/// # Format
///
/// YAML. The expression batch lives here too, which is how multi-rule scans
/// are described; the CLI flags only ever express a single rule. Example:
/// ```yaml
/// roots:
///   - "src"
/// workers: 4
/// log_level: "debug"
/// expressions:
///   file_exps:
///     - id: "rust-sources"
///       pattern: "\\.rs$"
///   content_exps:
///     - id: "todo"
///       pattern: "TODO|FIXME"
///       file_filter_enabled: true
///       file_filter: "\\.rs$"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directories that seed the walk.
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Expression batch; rules given on the command line are appended to it.
    #[serde(default)]
    pub expressions: Expressions,

    /// Worker pool size.
    #[serde(default = "default_worker_count")]
    pub workers: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write results to this file as JSON instead of streaming them through
    /// the logger.
    #[serde(default)]
    pub out: Option<PathBuf>,
}

fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            expressions: Expressions::default(),
            workers: default_worker_count(),
            log_level: default_log_level(),
            out: None,
        }
    }
}

impl ScanConfig {
    /// Loads configuration from the default locations.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, additionally reading `config_path` when given.
    /// The default locations are skipped silently when absent; an explicit
    /// path that does not exist is an error.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            dirs::config_dir().map(|p| p.join("dragnet/config.yaml")),
            Some(PathBuf::from(".dragnet.yaml")),
        ];
        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values. CLI values take
    /// precedence; CLI expressions are appended to the file's batch.
    pub fn merge_with_cli(mut self, cli_config: ScanConfig) -> Self {
        if !cli_config.roots.is_empty() {
            self.roots = cli_config.roots;
        }
        self.expressions
            .file_exps
            .extend(cli_config.expressions.file_exps);
        self.expressions
            .content_exps
            .extend(cli_config.expressions.content_exps);
        // Always use the CLI worker count
        self.workers = cli_config.workers;
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        if cli_config.out.is_some() {
            self.out = cli_config.out;
        }
        self
    }
}
