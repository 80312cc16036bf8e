//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn output() -> PathBuf {
        "generated-websites".into()
    }
}

// ============================================================================
// [store] Section Defaults
// ============================================================================

pub mod store {
    use std::path::PathBuf;

    pub fn dir() -> PathBuf {
        ".sitewright/sites".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5000
    }
}

// ============================================================================
// [content] Section Defaults
// ============================================================================

pub mod content {
    pub fn contact_email() -> String {
        "contact@example.com".into()
    }

    pub fn contact_phone() -> String {
        "+1 (555) 123-4567".into()
    }

    pub fn placeholder_image() -> String {
        "https://via.placeholder.com/800x600".into()
    }

    pub fn gallery_size() -> usize {
        6
    }
}
