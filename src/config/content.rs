//! `[content]` section configuration.
//!
//! Fallback copy used when a site specification arrives without data for a
//! component (see `spec::enrich`).

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[content]` section in sitewright.toml.
///
/// # Example
/// ```toml
/// [content]
/// contact_email = "hello@acme.test"
/// gallery_size = 9
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Email shown in generated footers.
    #[serde(default = "defaults::content::contact_email")]
    #[educe(Default = defaults::content::contact_email())]
    pub contact_email: String,

    /// Phone number shown in generated footers.
    #[serde(default = "defaults::content::contact_phone")]
    #[educe(Default = defaults::content::contact_phone())]
    pub contact_phone: String,

    /// Image used by `withImage` heroes when none was provided.
    #[serde(default = "defaults::content::placeholder_image")]
    #[educe(Default = defaults::content::placeholder_image())]
    pub placeholder_image: String,

    /// Number of placeholder images in a generated gallery.
    #[serde(default = "defaults::content::gallery_size")]
    #[educe(Default = defaults::content::gallery_size())]
    pub gallery_size: usize,
}
