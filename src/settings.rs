use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::blog::writer::sibling_sql_dir;
use crate::blog::ExtractOptions;

pub const DEFAULT_SERIES: &str = "SQL for Python Developers";
pub const DEFAULT_OUTPUT_DIR: &str = "exercises";
/// Environment variable holding the Hugo site root.
pub const BLOG_PATH_VAR: &str = "BLOG_PATH";

/// Run settings: defaults, then `SQLEX_*` overrides, then `BLOG_PATH`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub blog_path: Option<PathBuf>,
    pub series: String,
    pub output_dir: PathBuf,
    pub sql_dir: Option<PathBuf>,
    pub code_block_index: usize,
}

impl Settings {
    pub fn load() -> Result<Settings> {
        Self::from_sources(
            Environment::with_prefix("SQLEX"),
            std::env::var(BLOG_PATH_VAR).ok().filter(|p| !p.is_empty()),
        )
    }

    fn from_sources(env: Environment, blog_path: Option<String>) -> Result<Settings> {
        Config::builder()
            .set_default("series", DEFAULT_SERIES)?
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("code_block_index", 0)?
            .add_source(env.try_parsing(true))
            .set_override_option("blog_path", blog_path)?
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn sql_dir(&self) -> PathBuf {
        self.sql_dir
            .clone()
            .unwrap_or_else(|| sibling_sql_dir(&self.output_dir))
    }

    /// The content root, which must be set and exist.
    pub fn require_blog_path(&self) -> Result<&Path> {
        let Some(path) = self.blog_path.as_deref() else {
            bail!(
                "{} environment variable not set.\n\
                 Usage: {}=/path/to/hugo/blog sql_exercises extract [CODE_BLOCK_INDEX]",
                BLOG_PATH_VAR,
                BLOG_PATH_VAR
            );
        };
        if !path.exists() {
            bail!("Blog path does not exist: {:?}", path);
        }
        Ok(path)
    }

    pub fn extract_options(&self) -> Result<ExtractOptions> {
        Ok(ExtractOptions {
            blog_root: self.require_blog_path()?.to_path_buf(),
            series: self.series.clone(),
            output_dir: self.output_dir.clone(),
            sql_dir: self.sql_dir(),
            code_block_index: self.code_block_index,
        })
    }
}

// ── Tests ──
