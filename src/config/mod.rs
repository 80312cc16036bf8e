//! Site configuration management for `sitewright.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[build]`   | Export directory for generated projects        |
//! | `[store]`   | Document store directory                       |
//! | `[serve]`   | Preview server (interface, port)               |
//! | `[content]` | Fallback copy used to enrich page data         |
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "generated-websites"
//!
//! [store]
//! dir = ".sitewright/sites"
//!
//! [serve]
//! port = 5000
//!
//! [content]
//! contact_email = "hello@acme.test"
//! ```

mod build;
mod content;
pub mod defaults;
mod error;
mod handle;
mod serve;

pub use content::ContentConfig;
pub use handle::{cfg, init_config};

use build::{BuildConfig, StoreConfig};
use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

/// Upper bound for generated gallery images.
const MAX_GALLERY_SIZE: usize = 48;

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing sitewright.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Export settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Document store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Fallback page content
    #[serde(default)]
    pub content: ContentConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf());
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name), .. } => base.join(name),
            _ => base,
        };

        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.update_path_with_root(&root, &cli.config);

        match &cli.command {
            Commands::Serve { interface, port } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            Commands::Build { clean: true, .. } => self.build.clean = true,
            _ => {}
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_file));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));

        let store_dir = shellexpand::tilde(&self.store.dir.to_string_lossy()).into_owned();
        self.store.dir = Self::normalize_path(&root.join(store_dir));
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.serve.interface.parse::<IpAddr>().is_err() {
            bail!(ConfigError::Validation(format!(
                "[serve.interface] `{}` is not an IP address",
                self.serve.interface
            )));
        }

        if self.content.gallery_size > MAX_GALLERY_SIZE {
            bail!(ConfigError::Validation(format!(
                "[content.gallery_size] must be at most {MAX_GALLERY_SIZE}"
            )));
        }

        if self.build.output == self.store.dir {
            bail!(ConfigError::Validation(
                "[build.output] and [store.dir] must be different directories".into()
            ));
        }

        Ok(())
    }
}
