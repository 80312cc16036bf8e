//! Project files around the generated pages: server bootstrap, routes,
//! models, `package.json`, `.env.example` and `README.md`.

use super::VirtualFile;
use crate::fragment::{BackendFeature, BackendSnippet, FragmentStore};
use crate::spec::SiteSpec;
use crate::template::{self, DataRecord};
use crate::utils::slug::{db_name, slugify};
use serde_json::{Map, Value, json};

const SERVER: &str = include_str!("../embed/project/server.js");
const ENV: &str = include_str!("../embed/project/env.example");
const README: &str = include_str!("../embed/project/README.md");

/// Backend snippets for a site: those declared by used fragments first, then
/// those switched on by backend flags.
pub fn snippets(
    fragments: &FragmentStore,
    site: &SiteSpec,
    declared: impl IntoIterator<Item = BackendSnippet>,
) -> Vec<BackendSnippet> {
    let flags = [
        (site.backend.contact_form, BackendFeature::Contact),
        (site.backend.authentication, BackendFeature::Auth),
        (site.backend.admin, BackendFeature::Admin),
    ];
    let enabled = flags
        .into_iter()
        .filter(|(on, _)| *on)
        .map(|(_, feature)| fragments.backend(feature));

    declared.into_iter().chain(enabled).collect()
}

/// Emit every backend file in output order.
pub fn files(site: &SiteSpec, snippets: &[BackendSnippet], year: i32) -> Vec<VirtualFile> {
    let mut routes: Vec<&BackendSnippet> = Vec::new();
    let mut models: Vec<&BackendSnippet> = Vec::new();
    for snippet in snippets {
        if !routes.iter().any(|s| s.route_name == snippet.route_name) {
            routes.push(snippet);
        }
        if !models.iter().any(|s| s.model_name == snippet.model_name) {
            models.push(snippet);
        }
    }

    let mut files = vec![VirtualFile::new("server.js", server(site, &routes))];
    files.extend(
        routes
            .iter()
            .map(|s| VirtualFile::new(format!("routes/{}.js", s.route_name), s.route_code)),
    );
    files.extend(
        models
            .iter()
            .map(|s| VirtualFile::new(format!("models/{}.js", s.model_name), s.model_code)),
    );
    files.push(VirtualFile::new("package.json", package(site)));
    files.push(VirtualFile::new(".env.example", env(site)));
    files.push(VirtualFile::new("README.md", readme(site, year)));
    files
}

/// One empty item when `on`, none otherwise. Drives `{{#flag}}` sections.
fn flag(on: bool) -> Vec<DataRecord> {
    if on { vec![DataRecord::new()] } else { Vec::new() }
}

fn named<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<DataRecord> {
    names
        .into_iter()
        .map(|name| DataRecord::new().with("name", name))
        .collect()
}

fn server(site: &SiteSpec, routes: &[&BackendSnippet]) -> String {
    let data = DataRecord::new()
        .with("dbName", db_name(&site.site_name))
        .with("routes", named(routes.iter().map(|s| s.route_name)));
    template::render(SERVER, &data)
}

fn package(site: &SiteSpec) -> String {
    let mut dependencies = Map::new();
    for (name, version) in [
        ("express", "^4.18.2"),
        ("mongoose", "^7.0.0"),
        ("cors", "^2.8.5"),
        ("dotenv", "^16.0.3"),
    ] {
        dependencies.insert(name.into(), version.into());
    }
    if site.backend.authentication {
        dependencies.insert("bcryptjs".into(), "^2.4.3".into());
        dependencies.insert("jsonwebtoken".into(), "^9.0.0".into());
    }

    let manifest: Value = json!({
        "name": slugify(&site.site_name),
        "version": "1.0.0",
        "description": format!("Generated website - {}", site.site_name),
        "main": "server.js",
        "scripts": {
            "start": "node server.js",
            "dev": "nodemon server.js",
        },
        "dependencies": dependencies,
        "devDependencies": {
            "nodemon": "^2.0.22",
        },
    });

    format!("{manifest:#}\n")
}

fn env(site: &SiteSpec) -> String {
    let data = DataRecord::new()
        .with("dbName", db_name(&site.site_name))
        .with("auth", flag(site.backend.authentication));
    template::render(ENV, &data)
}

fn readme(site: &SiteSpec, year: i32) -> String {
    let enabled = site.backend.enabled();
    let pages = site
        .pages
        .iter()
        .map(|p| {
            DataRecord::new()
                .with("name", p.name.as_str())
                .with("title", p.title.as_str())
        })
        .collect::<Vec<_>>();

    let data = DataRecord::new()
        .with("siteName", site.site_name.as_str())
        .with("features", named(site.features.iter().map(String::as_str)))
        .with("pages", pages)
        .with("backend", named(enabled.iter().copied()))
        .with(
            "backendNone",
            if enabled.is_empty() { "No backend features\n" } else { "" },
        )
        .with("year", year.to_string());
    template::render(README, &data)
}
