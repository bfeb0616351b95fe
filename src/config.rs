use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory scanned for user-defined workflow definition files
    #[serde(default = "default_workflows_dir")]
    pub dir: String,
    /// Whether the embedded builtin workflows are included in the catalog
    #[serde(default = "default_true")]
    pub include_builtins: bool,
}

fn default_workflows_dir() -> String {
    ".caseflow/workflows".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dir: default_workflows_dir(),
            include_builtins: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used by the embedding application when RUST_LOG
    /// is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Path to the project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".caseflow/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the crate works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        // Project config in .caseflow/ (primary config location)
        let project_config = Self::project_config_path();
        if project_config.exists() {
            builder = builder.add_source(config::File::from(project_config));
        }

        // User config in ~/.config/caseflow/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("caseflow").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (caller override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with CASEFLOW_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("CASEFLOW")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to .caseflow/config.toml
    pub fn save(&self) -> Result<()> {
        let config_path = Self::project_config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(&config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Directory scanned for user workflow definitions
    pub fn workflows_path(&self) -> PathBuf {
        PathBuf::from(&self.catalog.dir)
    }
}
