//! Configuration
//!
//! One YAML file names the schema documents to register and the directory of
//! view files to load. Relative paths are taken from the configuration file's
//! own directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

pub const CONFIG_ENV: &str = "MES_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/mes.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MesConfig {
    #[serde(default = "default_views_dir")]
    pub views_dir: PathBuf,
    #[serde(default)]
    pub schemas: Vec<PathBuf>,
    /// Stop loading views at the first file that fails to parse.
    #[serde(default)]
    pub fail_fast: bool,
}

fn default_views_dir() -> PathBuf {
    PathBuf::from("views")
}

impl Default for MesConfig {
    fn default() -> Self {
        Self {
            views_dir: default_views_dir(),
            schemas: Vec::new(),
            fail_fast: false,
        }
    }
}

impl MesConfig {
    /// Load from the path in `MES_CONFIG`, or `config/mes.yaml`.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(Path::new(&path))
    }

    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        // An empty document deserializes to null, not to an empty mapping.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    fn relative_to(mut self, base: &Path) -> Self {
        self.views_dir = base.join(&self.views_dir);
        self.schemas = self.schemas.iter().map(|schema| base.join(schema)).collect();
        self
    }
}
