//! Startup view loading
//!
//! Parses every `*.xml` file in the configured views directory, in file name
//! order, and reports which views were stored and which files failed.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::MesConfig;
use crate::error::ViewError;
use crate::view::ViewDefinitionParser;

#[derive(Debug, Default)]
pub struct LoadReport {
    /// `(plugin identifier, view name)` of every stored view.
    pub loaded: Vec<(String, String)>,
    pub failed: Vec<(PathBuf, ViewError)>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct ViewLoader<'a> {
    parser: &'a ViewDefinitionParser,
    views_dir: PathBuf,
    fail_fast: bool,
}

impl<'a> ViewLoader<'a> {
    pub fn new(parser: &'a ViewDefinitionParser, views_dir: impl Into<PathBuf>) -> Self {
        Self {
            parser,
            views_dir: views_dir.into(),
            fail_fast: false,
        }
    }

    pub fn from_config(parser: &'a ViewDefinitionParser, config: &MesConfig) -> Self {
        Self::new(parser, &config.views_dir).fail_fast(config.fail_fast)
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn views_dir(&self) -> &Path {
        &self.views_dir
    }

    /// Parse every view file. I/O problems are errors; a file that does not
    /// parse is recorded in the report unless `fail_fast` is set.
    pub fn load_all(&self) -> Result<LoadReport> {
        info!("Loading views from {}", self.views_dir.display());
        let mut report = LoadReport::default();

        for path in self.view_files()? {
            let file =
                File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;

            match self.parser.parse(file) {
                Ok(view) => {
                    report
                        .loaded
                        .push((view.plugin_identifier().to_string(), view.name().to_string()));
                }
                Err(e) if self.fail_fast => {
                    return Err(e).with_context(|| format!("Failed to load view {}", path.display()));
                }
                Err(e) => {
                    warn!("Skipping view file {}: {}", path.display(), e);
                    report.failed.push((path, e));
                }
            }
        }

        info!(
            "Loaded {} views ({} failed)",
            report.loaded.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn view_files(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.views_dir)
            .with_context(|| format!("Failed to read directory {}", self.views_dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to read directory {}", self.views_dir.display()))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "xml") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
