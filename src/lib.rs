//! waypost: a server-rendered blog front-end for headless CMS content
//!
//! This crate fetches posts from a headless CMS and renders a paginated
//! listing plus individual post pages, pre-generating known post paths
//! and falling back to on-demand rendering for posts created later.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod pagination;
pub mod render;
pub mod server;

use anyhow::Result;
use std::path::Path;

/// The main waypost application
#[derive(Clone)]
pub struct Waypost {
    /// Application configuration
    pub config: config::AppConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory for generated pages
    pub public_dir: std::path::PathBuf,
}

impl Waypost {
    /// Create a new waypost instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::AppConfig::load(&config_path)?
        } else {
            config::AppConfig::default()
        };
        config.apply_env();

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// Generate the static pages for all posts known to the CMS
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
