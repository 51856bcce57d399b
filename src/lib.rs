//! folio: a static generator for a personal blog and resume site
//!
//! A site is described by `site.yml`: metadata, a header, and an ordered list
//! of build plugins. Markdown posts and images are ingested from the sources
//! the plugins declare, passed through the markdown plugins, and rendered
//! with embedded Tera templates into the public directory.

pub mod commands;
pub mod components;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod plugins;
pub mod query;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file inside the base directory
pub const CONFIG_FILE: &str = "site.yml";

/// A site rooted at a base directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site from a directory, falling back to defaults when there is no `site.yml`
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Resolve the configured plugin list
    pub fn plugins(&self) -> Result<plugins::Plugins> {
        Ok(plugins::PluginRegistry::resolve(&self.config.plugins)?)
    }

    /// Paths whose changes require a rebuild
    pub fn watch_paths(&self) -> Result<Vec<PathBuf>> {
        let plugins = self.plugins()?;
        let mut paths: Vec<PathBuf> = plugins
            .sources()
            .map(|source| self.base_dir.join(&source.path))
            .filter(|path| path.exists())
            .collect();

        let config_path = self.base_dir.join(CONFIG_FILE);
        if config_path.exists() {
            paths.push(config_path);
        }

        Ok(paths)
    }

    /// Build the static site
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Remove the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
