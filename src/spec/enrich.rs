//! Default page content.
//!
//! Fills in placeholder data a specification left out so every rendered
//! fragment has something to show. Provided data is never replaced.

use super::{HeroStyle, PageSpec, SiteSpec};
use crate::config::ContentConfig;
use crate::template::DataRecord;

/// Components that only make sense on pages that carry data for them.
const CONTENT_COMPONENTS: [&str; 4] = ["features", "services", "gallery", "contact"];

/// Complete `spec` with default data for every page.
///
/// `year` feeds the footer copyright line.
pub fn enrich(spec: &mut SiteSpec, content: &ContentConfig, year: i32) {
    let links = nav_links(spec);
    let industry = match spec.industry.trim() {
        "" => "General".to_owned(),
        industry => industry.to_owned(),
    };
    let wants_features = spec
        .components
        .iter()
        .any(|c| c == "features" || c == "services");

    let site_components = spec.components.clone();
    let site_name = spec.site_name.clone();

    for page in &mut spec.pages {
        let defaults = PageDefaults {
            site_name: &site_name,
            industry: &industry,
            links: &links,
            content,
            year,
        };

        if page.hero_style.is_none() {
            page.hero_style = Some(if page.name == "index" {
                HeroStyle::Centered
            } else {
                HeroStyle::WithImage
            });
        }

        insert_default(page, "navbar", || defaults.navbar());
        insert_default(page, "footer", || defaults.footer());
        let title = page_title(page);
        insert_default(page, "hero", || defaults.hero(title));

        if wants_features && shows_features(page) {
            insert_default(page, "features", || defaults.features());
        }
        if page.name == "contact" {
            insert_default(page, "contact", || defaults.contact());
        }
        if page.name == "gallery" || page.description.contains("gallery") {
            insert_default(page, "gallery", || defaults.gallery());
        }

        // Inherited lists drop content sections this page has no data for
        if page.components.is_empty() {
            page.components = site_components
                .iter()
                .filter(|c| !CONTENT_COMPONENTS.contains(&c.as_str()) || has_data(page, c))
                .cloned()
                .collect();
        }
    }
}

fn page_title(page: &PageSpec) -> String {
    if page.title.is_empty() {
        page.name.clone()
    } else {
        page.title.clone()
    }
}

fn shows_features(page: &PageSpec) -> bool {
    page.description.contains("service")
        || page.description.contains("feature")
        || page.name == "index"
        || page.name == "services"
}

fn has_data(page: &PageSpec, component: &str) -> bool {
    page.data.contains_key(component)
        || (component == "services" && page.data.contains_key("features"))
}

fn insert_default(page: &mut PageSpec, key: &str, make: impl FnOnce() -> DataRecord) {
    if !page.data.contains_key(key) {
        let record = make();
        page.data.insert(key.to_owned(), record);
    }
}

fn nav_links(spec: &SiteSpec) -> Vec<DataRecord> {
    spec.pages
        .iter()
        .map(|page| {
            DataRecord::new()
                .with("text", page_title(page))
                .with("href", page.href())
        })
        .collect()
}

struct PageDefaults<'a> {
    site_name: &'a str,
    industry: &'a str,
    links: &'a [DataRecord],
    content: &'a ContentConfig,
    year: i32,
}

impl PageDefaults<'_> {
    fn navbar(&self) -> DataRecord {
        DataRecord::new()
            .with("siteName", self.site_name)
            .with("navLinks", self.links.to_vec())
    }

    fn footer(&self) -> DataRecord {
        DataRecord::new()
            .with("siteName", self.site_name)
            .with(
                "description",
                format!("{} - Your trusted partner in {}", self.site_name, self.industry),
            )
            .with("links", self.links.to_vec())
            .with("contact.email", self.content.contact_email.as_str())
            .with("contact.phone", self.content.contact_phone.as_str())
            .with("year", self.year.to_string())
    }

    fn hero(&self, title: String) -> DataRecord {
        let button = |text: &str, href: &str, style: &str| {
            DataRecord::new()
                .with("text", text)
                .with("href", href)
                .with("style", style)
        };

        DataRecord::new()
            .with("imageAlt", title.as_str())
            .with("title", title)
            .with("subtitle", format!("Welcome to {}", self.site_name))
            .with(
                "buttons",
                vec![
                    button("Get Started", "#contact", "primary"),
                    button("Learn More", "#features", "secondary"),
                ],
            )
            .with("imageUrl", self.content.placeholder_image.as_str())
    }

    fn features(&self) -> DataRecord {
        let item = |icon: &str, title: &str, description: &str| {
            DataRecord::new()
                .with("icon", icon)
                .with("title", title)
                .with("description", description)
        };

        DataRecord::new()
            .with("title", "Our Services")
            .with("subtitle", "What we offer to our clients")
            .with(
                "items",
                vec![
                    item(
                        "🎯",
                        "Service 1",
                        "Professional service description goes here with details about what we offer.",
                    ),
                    item(
                        "💎",
                        "Service 2",
                        "High-quality service that meets your needs and exceeds expectations.",
                    ),
                    item(
                        "🚀",
                        "Service 3",
                        "Fast and reliable service delivery with attention to detail and quality.",
                    ),
                ],
            )
    }

    fn contact(&self) -> DataRecord {
        DataRecord::new().with("title", "Get In Touch").with(
            "subtitle",
            "Have questions? Send us a message and we'll respond as soon as possible.",
        )
    }

    fn gallery(&self) -> DataRecord {
        let images = (1..=self.content.gallery_size)
            .map(|i| {
                DataRecord::new()
                    .with(
                        "url",
                        format!("https://via.placeholder.com/400x300?text=Gallery+Image+{i}"),
                    )
                    .with("alt", format!("Gallery image {i}"))
                    .with("caption", format!("{} showcase {i}", self.industry))
            })
            .collect::<Vec<_>>();

        DataRecord::new()
            .with("title", "Our Gallery")
            .with("images", images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Value;

    fn enriched(mut spec: SiteSpec) -> SiteSpec {
        enrich(&mut spec, &ContentConfig::default(), 2025);
        spec
    }

    fn list_len(record: &DataRecord, key: &str) -> usize {
        match record.get(key) {
            Some(Value::List(items)) => items.len(),
            _ => 0,
        }
    }

    #[test]
    fn test_fallback_site_is_fully_populated() {
        let spec = enriched(SiteSpec::fallback("business"));

        let index = &spec.pages[0];
        assert_eq!(index.hero_style, Some(HeroStyle::Centered));
        assert_eq!(index.data["navbar"].scalar("siteName"), Some("My Website"));
        assert_eq!(list_len(&index.data["navbar"], "navLinks"), 4);
        assert_eq!(index.data["hero"].scalar("title"), Some("Home"));
        assert!(index.data.contains_key("features"));
        assert_eq!(index.components, ["navbar", "hero", "features", "footer"]);

        let about = &spec.pages[1];
        assert_eq!(about.hero_style, Some(HeroStyle::WithImage));
        assert!(!about.data.contains_key("features"));
        assert_eq!(about.components, ["navbar", "hero", "footer"]);

        let contact = &spec.pages[3];
        assert_eq!(contact.data["contact"].scalar("title"), Some("Get In Touch"));
        assert_eq!(contact.components, ["navbar", "hero", "contact", "footer"]);
    }

    #[test]
    fn test_footer_defaults() {
        let spec = enriched(SiteSpec::fallback(""));
        let footer = &spec.pages[0].data["footer"];

        assert_eq!(footer.scalar("year"), Some("2025"));
        assert_eq!(footer.scalar("contact.email"), Some("contact@example.com"));
        assert_eq!(
            footer.scalar("description"),
            Some("My Website - Your trusted partner in General")
        );
        assert_eq!(list_len(footer, "links"), 4);
    }

    #[test]
    fn test_provided_data_is_kept() {
        let mut spec = SiteSpec::fallback("");
        spec.pages[0].hero_style = Some(HeroStyle::WithImage);
        spec.pages[0]
            .data
            .insert("hero".into(), DataRecord::new().with("title", "Custom"));

        let spec = enriched(spec);
        let index = &spec.pages[0];
        assert_eq!(index.hero_style, Some(HeroStyle::WithImage));
        assert_eq!(index.data["hero"].scalar("title"), Some("Custom"));
        assert!(index.data["hero"].get("buttons").is_none());
    }

    #[test]
    fn test_explicit_components_are_kept() {
        let mut spec = SiteSpec::fallback("");
        spec.pages[1].components = vec!["navbar".into(), "gallery".into()];

        let spec = enriched(spec);
        assert_eq!(spec.pages[1].components, ["navbar", "gallery"]);
    }

    #[test]
    fn test_gallery_defaults() {
        let mut spec = SiteSpec::fallback("");
        spec.industry = "Photography".into();
        spec.components.push("gallery".into());
        spec.pages.push(PageSpec::new("gallery", "Gallery", "Our work"));

        let content = ContentConfig {
            gallery_size: 3,
            ..Default::default()
        };
        enrich(&mut spec, &content, 2025);

        let gallery = &spec.pages[4].data["gallery"];
        assert_eq!(list_len(gallery, "images"), 3);
        let Some(Value::List(images)) = gallery.get("images") else {
            panic!("expected images");
        };
        assert_eq!(images[2].scalar("caption"), Some("Photography showcase 3"));
        assert!(spec.pages[4].components.contains(&"gallery".to_string()));
        assert!(!spec.pages[0].components.contains(&"gallery".to_string()));
    }

    #[test]
    fn test_enrich_is_repeatable() {
        let once = enriched(SiteSpec::fallback(""));
        let twice = enriched(once.clone());
        assert_eq!(once, twice);
    }
}
