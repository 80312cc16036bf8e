//! Per-page assembly: fragment resolution, markup, styles and scripts.

use crate::fragment::{BackendSnippet, Fragment, FragmentStore};
use crate::log;
use crate::spec::{PageSpec, SiteSpec};
use crate::template::{self, DataRecord};

const HEAD: &str = include_str!("../embed/page/head.html");
const TAIL: &str = include_str!("../embed/page/tail.html");

/// Everything one page contributes to the output.
#[derive(Debug)]
pub struct PageOutput {
    pub name: String,
    pub html: String,
    pub css: String,
    pub js: String,
    /// Backend code declared by the fragments on this page.
    pub backend: Vec<BackendSnippet>,
}

/// Map a requested component name to its `(component, variant)` fragment key.
pub fn resolve(name: &str, page: &PageSpec) -> Option<(&'static str, &'static str)> {
    let key = match name {
        "navbar" => ("navbar", "modern"),
        "hero" => ("hero", page.hero_style.unwrap_or_default().variant()),
        "features" | "services" => ("features", "grid"),
        "gallery" => ("gallery", "grid"),
        "contact" | "contactForm" => ("contactForm", "standard"),
        "footer" => ("footer", "standard"),
        _ => return None,
    };
    Some(key)
}

pub fn assemble(fragments: &FragmentStore, site: &SiteSpec, page: &PageSpec) -> PageOutput {
    let empty = DataRecord::new();
    let mut body = String::new();
    let mut css = format!("{}\n{}", fragments.global_style(), fragments.button_style());
    let mut scripts = Vec::new();
    let mut backend = Vec::new();

    for name in site.components_for(page) {
        let Some(fragment) = lookup(fragments, name, page) else {
            log!("assemble"; "skipping unknown component `{}` on page `{}`", name, page.name);
            continue;
        };

        let data = page
            .data
            .get(name.as_str())
            .or_else(|| page.data.get(fragment.component))
            .unwrap_or(&empty);

        body.push_str(&template::render(fragment.markup, data));
        if !body.ends_with('\n') {
            body.push('\n');
        }

        css.push('\n');
        css.push_str(fragment.style);

        if let Some(script) = fragment.script {
            scripts.push(script);
        }
        if let Some(snippet) = fragment.backend {
            backend.push(snippet);
        }
    }

    let title = if page.title.is_empty() {
        site.site_name.as_str()
    } else {
        page.title.as_str()
    };
    let head = DataRecord::new()
        .with("title", title)
        .with("name", page.name.as_str());

    let mut html = template::render(HEAD, &head);
    html.push_str(&body);
    html.push_str(TAIL);

    PageOutput {
        name: page.name.clone(),
        html,
        css,
        js: scripts.join("\n"),
        backend,
    }
}

fn lookup<'a>(fragments: &'a FragmentStore, name: &str, page: &PageSpec) -> Option<&'a Fragment> {
    let (component, variant) = resolve(name, page)?;
    fragments.get(component, variant)
}
