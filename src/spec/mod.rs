//! Structured site descriptions.
//!
//! A [`SiteSpec`] is the input of the assembler. It usually arrives as JSON
//! (from the CLI or the HTTP API) and is validated here before anything is
//! compiled:
//!
//! ```json
//! {
//!   "siteName": "Acme",
//!   "pages": [{ "name": "index", "title": "Home" }],
//!   "components": ["navbar", "hero", "footer"],
//!   "backend": { "contactForm": true }
//! }
//! ```

mod enrich;
mod summary;

pub use enrich::enrich;
pub use summary::SiteSummary;

use crate::template::DataRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid site specification: {0}")]
    Validation(String),

    #[error("invalid site specification: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which hero fragment variant a page uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeroStyle {
    #[default]
    Centered,
    WithImage,
}

impl HeroStyle {
    pub const fn variant(self) -> &'static str {
        match self {
            Self::Centered => "centered",
            Self::WithImage => "withImage",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendFeatures {
    #[serde(default)]
    pub contact_form: bool,
    #[serde(default)]
    pub authentication: bool,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub database: bool,
}

impl BackendFeatures {
    /// Names of the enabled flags, in declaration order.
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            ("contactForm", self.contact_form),
            ("authentication", self.authentication),
            ("admin", self.admin),
            ("database", self.database),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    /// Identifier used in file paths (`public/<name>.html`).
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Components in display order. Empty means the site-wide list.
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_style: Option<HeroStyle>,
    /// Placeholder data keyed by component name.
    #[serde(default)]
    pub data: BTreeMap<String, DataRecord>,
}

impl PageSpec {
    pub fn new(name: &str, title: &str, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
            ..Default::default()
        }
    }

    /// Site-relative URL of the page.
    pub fn href(&self) -> String {
        if self.name == "index" {
            "/".to_owned()
        } else {
            format!("/{}", self.name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSpec {
    pub site_name: String,
    #[serde(default)]
    pub website_type: String,
    #[serde(default)]
    pub industry: String,
    pub pages: Vec<PageSpec>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub backend: BackendFeatures,
    #[serde(default)]
    pub design_style: String,
    #[serde(default)]
    pub color_scheme: String,
}

impl SiteSpec {
    /// Parse and validate a specification.
    pub fn from_json(content: &str) -> Result<Self, SpecError> {
        let spec: Self = serde_json::from_str(content)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if self.site_name.trim().is_empty() {
            return Err(SpecError::Validation("site name is empty".into()));
        }
        if self.pages.is_empty() {
            return Err(SpecError::Validation("a site needs at least one page".into()));
        }

        let mut seen = HashSet::new();
        for page in &self.pages {
            if !is_identifier(&page.name) {
                return Err(SpecError::Validation(format!(
                    "page name `{}` must be non-empty and only use letters, digits, `-` or `_`",
                    page.name
                )));
            }
            if !seen.insert(page.name.as_str()) {
                return Err(SpecError::Validation(format!(
                    "duplicate page name `{}`",
                    page.name
                )));
            }
            if let Some(component) = page.components.iter().find(|c| c.trim().is_empty()) {
                return Err(SpecError::Validation(format!(
                    "page `{}` lists an empty component name {component:?}",
                    page.name
                )));
            }
        }

        if self.components.iter().any(|c| c.trim().is_empty()) {
            return Err(SpecError::Validation("empty component name".into()));
        }

        Ok(())
    }

    /// Components of a page, falling back to the site-wide list.
    pub fn components_for<'a>(&'a self, page: &'a PageSpec) -> &'a [String] {
        if page.components.is_empty() {
            &self.components
        } else {
            &page.components
        }
    }

    pub fn page_names(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.name.clone()).collect()
    }

    /// Default four-page site, typed from keywords in `prompt`.
    pub fn fallback(prompt: &str) -> Self {
        let keywords = prompt.to_lowercase();
        let website_type = if keywords.contains("portfolio") || keywords.contains("photographer") {
            "portfolio"
        } else if keywords.contains("business") || keywords.contains("company") {
            "business"
        } else {
            "general"
        };

        Self {
            site_name: "My Website".into(),
            website_type: website_type.into(),
            industry: "General".into(),
            pages: vec![
                PageSpec::new("index", "Home", "Homepage with hero and features"),
                PageSpec::new("about", "About", "About us page"),
                PageSpec::new("services", "Services", "Services we offer"),
                PageSpec::new("contact", "Contact", "Contact form page"),
            ],
            components: ["navbar", "hero", "features", "contact", "footer"]
                .map(String::from)
                .to_vec(),
            features: ["Responsive Design", "Contact Form", "Modern UI", "Working Backend"]
                .map(String::from)
                .to_vec(),
            backend: BackendFeatures {
                contact_form: true,
                authentication: false,
                admin: false,
                database: true,
            },
            design_style: "modern".into(),
            color_scheme: "blue and white".into(),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Value;

    const MINIMAL: &str = r#"{
        "siteName": "Acme",
        "pages": [
            { "name": "index", "title": "Home" },
            { "name": "about", "title": "About", "components": ["navbar"] }
        ],
        "components": ["navbar", "hero", "footer"]
    }"#;

    #[test]
    fn test_parse_minimal() {
        let spec = SiteSpec::from_json(MINIMAL).unwrap();

        assert_eq!(spec.site_name, "Acme");
        assert_eq!(spec.pages.len(), 2);
        assert!(!spec.backend.contact_form);
        assert_eq!(spec.components_for(&spec.pages[0]).len(), 3);
        assert_eq!(spec.components_for(&spec.pages[1]), ["navbar".to_string()]);
    }

    #[test]
    fn test_parse_page_data() {
        let spec = SiteSpec::from_json(
            r#"{
                "siteName": "Acme",
                "pages": [{
                    "name": "index",
                    "heroStyle": "withImage",
                    "data": {
                        "hero": { "title": "Hi", "buttons": [{ "text": "Go" }] }
                    }
                }]
            }"#,
        )
        .unwrap();

        let page = &spec.pages[0];
        assert_eq!(page.hero_style, Some(HeroStyle::WithImage));
        let hero = &page.data["hero"];
        assert_eq!(hero.scalar("title"), Some("Hi"));
        assert!(matches!(hero.get("buttons"), Some(Value::List(items)) if items.len() == 1));
    }

    #[test]
    fn test_rejects_nested_lists_in_data() {
        let err = SiteSpec::from_json(
            r#"{
                "siteName": "Acme",
                "pages": [{
                    "name": "index",
                    "data": { "features": { "items": [{ "tags": [{ "t": "x" }] }] } }
                }]
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
        assert!(err.to_string().contains("nested"));
    }

    #[test]
    fn test_rejects_duplicate_page_names() {
        let err = SiteSpec::from_json(
            r#"{ "siteName": "Acme", "pages": [{ "name": "index" }, { "name": "index" }] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate page name `index`"));
    }

    #[test]
    fn test_rejects_empty_site_name() {
        let err = SiteSpec::from_json(r#"{ "siteName": "  ", "pages": [{ "name": "index" }] }"#)
            .unwrap_err();
        assert!(matches!(err, SpecError::Validation(_)));
    }

    #[test]
    fn test_rejects_bad_page_names() {
        for name in ["", "../etc", "a b", "page.html"] {
            let mut spec = SiteSpec::fallback("");
            spec.pages[0].name = name.into();
            assert!(spec.validate().is_err(), "{name:?} accepted");
        }
    }

    #[test]
    fn test_rejects_no_pages() {
        let err = SiteSpec::from_json(r#"{ "siteName": "Acme", "pages": [] }"#).unwrap_err();
        assert!(err.to_string().contains("at least one page"));
    }

    #[test]
    fn test_rejects_missing_site_name() {
        assert!(SiteSpec::from_json(r#"{ "pages": [{ "name": "index" }] }"#).is_err());
    }

    #[test]
    fn test_fallback_types() {
        assert_eq!(SiteSpec::fallback("A photographer portfolio").website_type, "portfolio");
        assert_eq!(SiteSpec::fallback("my Company site").website_type, "business");
        assert_eq!(SiteSpec::fallback("a blog").website_type, "general");
    }

    #[test]
    fn test_fallback_is_valid() {
        let spec = SiteSpec::fallback("anything");
        assert!(spec.validate().is_ok());
        assert_eq!(spec.page_names(), ["index", "about", "services", "contact"]);
        assert!(spec.backend.contact_form);
    }

    #[test]
    fn test_href() {
        assert_eq!(PageSpec::new("index", "", "").href(), "/");
        assert_eq!(PageSpec::new("about", "", "").href(), "/about");
    }

    #[test]
    fn test_backend_enabled() {
        let backend = BackendFeatures {
            contact_form: true,
            admin: true,
            ..Default::default()
        };
        assert_eq!(backend.enabled(), ["contactForm", "admin"]);
    }

    #[test]
    fn test_json_round_trip() {
        let spec = SiteSpec::fallback("business");
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"siteName\":\"My Website\""));
        assert_eq!(SiteSpec::from_json(&json).unwrap(), spec);
    }
}
