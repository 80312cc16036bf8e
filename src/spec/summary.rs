use super::SiteSpec;
use serde::{Deserialize, Serialize};

/// Short description of a generated site, stored next to its files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub site_name: String,
    #[serde(rename = "type")]
    pub website_type: String,
    pub page_count: usize,
    /// Page titles in site order.
    pub pages: Vec<String>,
    pub features: Vec<String>,
    pub has_backend: bool,
    pub has_forms: bool,
    pub has_auth: bool,
    pub has_admin: bool,
    pub components: Vec<String>,
}

impl From<&SiteSpec> for SiteSummary {
    fn from(spec: &SiteSpec) -> Self {
        let backend = &spec.backend;
        Self {
            site_name: spec.site_name.clone(),
            website_type: spec.website_type.clone(),
            page_count: spec.pages.len(),
            pages: spec.pages.iter().map(|p| p.title.clone()).collect(),
            features: spec.features.clone(),
            has_backend: backend.contact_form || backend.authentication || backend.admin,
            has_forms: backend.contact_form,
            has_auth: backend.authentication,
            has_admin: backend.admin,
            components: spec.components.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_fallback() {
        let summary = SiteSummary::from(&SiteSpec::fallback("portfolio"));

        assert_eq!(summary.website_type, "portfolio");
        assert_eq!(summary.page_count, 4);
        assert_eq!(summary.pages, ["Home", "About", "Services", "Contact"]);
        assert!(summary.has_backend);
        assert!(summary.has_forms);
        assert!(!summary.has_auth);
    }

    #[test]
    fn test_summary_json_keys() {
        let summary = SiteSummary::from(&SiteSpec::fallback(""));
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["type"], "general");
        assert_eq!(json["pageCount"], 4);
        assert_eq!(json["hasBackend"], true);
    }
}
