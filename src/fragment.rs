//! Built-in template fragments.
//!
//! Every fragment is embedded at compile time and addressed by
//! `(component, variant)`. The store is immutable once built and is shared
//! by reference between the assembler and the preview server.

use serde::Serialize;

/// Server-side code a fragment needs in the exported project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendSnippet {
    /// Emitted as `routes/<route_name>.js`.
    pub route_name: &'static str,
    pub route_code: &'static str,
    /// Emitted as `models/<model_name>.js`.
    pub model_name: &'static str,
    pub model_code: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Fragment {
    pub component: &'static str,
    pub variant: &'static str,
    pub markup: &'static str,
    pub style: &'static str,
    pub script: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<BackendSnippet>,
}

/// Catalog entry describing one component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

/// Server-side feature switched on by a site's backend flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BackendFeature {
    Contact,
    Auth,
    Admin,
}

const CONTACT: BackendSnippet = BackendSnippet {
    route_name: "contact",
    route_code: include_str!("embed/backend/contact-route.js"),
    model_name: "Contact",
    model_code: include_str!("embed/backend/contact-model.js"),
};

const AUTH: BackendSnippet = BackendSnippet {
    route_name: "auth",
    route_code: include_str!("embed/backend/auth-route.js"),
    model_name: "User",
    model_code: include_str!("embed/backend/user-model.js"),
};

// Admin endpoints manage stored contact submissions
const ADMIN: BackendSnippet = BackendSnippet {
    route_name: "admin",
    route_code: include_str!("embed/backend/admin-route.js"),
    model_name: "Contact",
    model_code: include_str!("embed/backend/contact-model.js"),
};

const GLOBAL_STYLE: &str = include_str!("embed/fragments/global.css");
const BUTTON_STYLE: &str = include_str!("embed/fragments/buttons.css");

/// Immutable registry of fragments and the component catalog.
#[derive(Debug, Clone)]
pub struct FragmentStore {
    fragments: Vec<Fragment>,
    catalog: Vec<ComponentInfo>,
}

impl FragmentStore {
    /// Store holding every embedded fragment.
    pub fn builtin() -> Self {
        let fragments = [
            Fragment {
                component: "navbar",
                variant: "modern",
                markup: include_str!("embed/fragments/navbar-modern.html"),
                style: include_str!("embed/fragments/navbar-modern.css"),
                script: Some(include_str!("embed/fragments/navbar-modern.js")),
                backend: None,
            },
            Fragment {
                component: "hero",
                variant: "centered",
                markup: include_str!("embed/fragments/hero-centered.html"),
                style: include_str!("embed/fragments/hero-centered.css"),
                script: None,
                backend: None,
            },
            Fragment {
                component: "hero",
                variant: "withImage",
                markup: include_str!("embed/fragments/hero-with-image.html"),
                style: include_str!("embed/fragments/hero-with-image.css"),
                script: None,
                backend: None,
            },
            Fragment {
                component: "features",
                variant: "grid",
                markup: include_str!("embed/fragments/features-grid.html"),
                style: include_str!("embed/fragments/features-grid.css"),
                script: None,
                backend: None,
            },
            Fragment {
                component: "gallery",
                variant: "grid",
                markup: include_str!("embed/fragments/gallery-grid.html"),
                style: include_str!("embed/fragments/gallery-grid.css"),
                script: None,
                backend: None,
            },
            Fragment {
                component: "contactForm",
                variant: "standard",
                markup: include_str!("embed/fragments/contact-standard.html"),
                style: include_str!("embed/fragments/contact-standard.css"),
                script: Some(include_str!("embed/fragments/contact-standard.js")),
                backend: Some(CONTACT),
            },
            Fragment {
                component: "footer",
                variant: "standard",
                markup: include_str!("embed/fragments/footer-standard.html"),
                style: include_str!("embed/fragments/footer-standard.css"),
                script: None,
                backend: None,
            },
        ];

        let catalog = vec![
            ComponentInfo {
                id: "navbar",
                name: "Navigation Bar",
                description: "Responsive navigation with logo and menu items",
                category: "navigation",
            },
            ComponentInfo {
                id: "hero",
                name: "Hero Section",
                description: "Full-width hero section with heading, description, and CTA",
                category: "header",
            },
            ComponentInfo {
                id: "features",
                name: "Features Grid",
                description: "Grid layout showcasing features or services",
                category: "content",
            },
            ComponentInfo {
                id: "gallery",
                name: "Image Gallery",
                description: "Responsive image gallery with grid layout",
                category: "media",
            },
            ComponentInfo {
                id: "contactForm",
                name: "Contact Form",
                description: "Contact form with validation",
                category: "form",
            },
            ComponentInfo {
                id: "footer",
                name: "Footer",
                description: "Website footer with links and contact details",
                category: "footer",
            },
        ];

        Self::new(fragments, catalog)
    }

    pub fn new(fragments: impl IntoIterator<Item = Fragment>, catalog: Vec<ComponentInfo>) -> Self {
        Self {
            fragments: fragments.into_iter().collect(),
            catalog,
        }
    }

    pub fn get(&self, component: &str, variant: &str) -> Option<&Fragment> {
        self.fragments
            .iter()
            .find(|f| f.component == component && f.variant == variant)
    }

    /// All variants of a component.
    pub fn variants(&self, component: &str) -> Vec<&Fragment> {
        self.fragments
            .iter()
            .filter(|f| f.component == component)
            .collect()
    }

    pub fn catalog(&self) -> &[ComponentInfo] {
        &self.catalog
    }

    pub fn component(&self, id: &str) -> Option<&ComponentInfo> {
        self.catalog.iter().find(|c| c.id == id)
    }

    pub fn by_category(&self, category: &str) -> Vec<&ComponentInfo> {
        self.catalog
            .iter()
            .filter(|c| c.category == category)
            .collect()
    }

    /// Distinct categories in catalog order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for info in &self.catalog {
            if !seen.contains(&info.category) {
                seen.push(info.category);
            }
        }
        seen
    }

    /// Reset and base stylesheet prepended to every page.
    pub fn global_style(&self) -> &'static str {
        GLOBAL_STYLE
    }

    /// Shared `.btn` styles, emitted after the global stylesheet.
    pub fn button_style(&self) -> &'static str {
        BUTTON_STYLE
    }

    pub fn backend(&self, feature: BackendFeature) -> BackendSnippet {
        match feature {
            BackendFeature::Contact => CONTACT,
            BackendFeature::Auth => AUTH,
            BackendFeature::Admin => ADMIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let store = FragmentStore::builtin();

        let navbar = store.get("navbar", "modern").unwrap();
        assert!(navbar.markup.contains("{{siteName}}"));
        assert!(navbar.script.is_some());

        assert!(store.get("hero", "centered").is_some());
        assert!(store.get("hero", "withImage").is_some());
        assert!(store.get("hero", "fullscreen").is_none());
        assert!(store.get("doesnotexist", "modern").is_none());
    }

    #[test]
    fn test_contact_form_declares_backend() {
        let store = FragmentStore::builtin();
        let contact = store.get("contactForm", "standard").unwrap();
        let backend = contact.backend.unwrap();

        assert_eq!(backend.route_name, "contact");
        assert_eq!(backend.model_name, "Contact");
        assert!(backend.route_code.contains("router.post('/contact'"));
        assert!(contact.script.unwrap().contains("fetch('/api/contact'"));
    }

    #[test]
    fn test_every_catalog_entry_has_a_variant() {
        let store = FragmentStore::builtin();
        for info in store.catalog() {
            assert!(!store.variants(info.id).is_empty(), "{} has no variants", info.id);
        }
        assert_eq!(store.variants("hero").len(), 2);
    }

    #[test]
    fn test_catalog_queries() {
        let store = FragmentStore::builtin();

        assert_eq!(store.catalog().len(), 6);
        assert_eq!(store.component("gallery").unwrap().category, "media");
        assert!(store.component("carousel").is_none());

        let forms = store.by_category("form");
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].id, "contactForm");
        assert!(store.by_category("blog").is_empty());

        assert_eq!(
            store.categories(),
            vec!["navigation", "header", "content", "media", "form", "footer"]
        );
    }

    #[test]
    fn test_admin_reuses_contact_model() {
        let store = FragmentStore::builtin();
        let admin = store.backend(BackendFeature::Admin);
        let contact = store.backend(BackendFeature::Contact);

        assert_eq!(admin.model_name, contact.model_name);
        assert_eq!(admin.model_code, contact.model_code);
        assert_eq!(store.backend(BackendFeature::Auth).model_name, "User");
    }
}
