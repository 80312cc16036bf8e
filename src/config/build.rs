//! `[build]` and `[store]` section configuration.
//!
//! Contains where exported sites and stored site records live on disk.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in sitewright.toml - export settings.
///
/// # Example
/// ```toml
/// [build]
/// output = "generated-websites"  # Exported projects land here
/// clean = true                   # Remove a previous export first
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (set from CLI, never read from file).
    #[serde(skip)]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Directory that receives one sub-directory per exported site.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Remove an existing export of the same site before writing.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,
}

/// `[store]` section in sitewright.toml - document store location.
///
/// # Example
/// ```toml
/// [store]
/// dir = "~/.local/share/sitewright"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding one JSON document per generated site.
    /// `~` is expanded to the home directory.
    #[serde(default = "defaults::store::dir")]
    #[educe(Default = defaults::store::dir())]
    pub dir: PathBuf,
}
