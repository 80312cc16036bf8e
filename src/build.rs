//! Site generation pipeline.
//!
//! ```text
//! SiteSpec ──▶ enrich ──▶ Assembler::compile_site ──▶ GeneratedSite ──▶ SiteStore
//!                                                                  │
//!                                                     (build) export::save
//! ```

use crate::{
    assembler::Assembler,
    config::{ContentConfig, SiteConfig},
    export,
    fragment::FragmentStore,
    log,
    spec::{SiteSpec, enrich},
    store::{GeneratedSite, SiteStore},
};
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Validate, enrich and compile `spec`, then store the result.
///
/// Validation failures surface as [`crate::spec::SpecError`] inside the
/// returned error.
pub fn generate_site(
    fragments: &FragmentStore,
    store: &SiteStore,
    content: &ContentConfig,
    user_input: &str,
    mut spec: SiteSpec,
) -> Result<GeneratedSite> {
    let assembler = Assembler::new(fragments);
    enrich(&mut spec, content, assembler.year());
    let files = assembler.compile_site(&spec)?;

    let site = GeneratedSite::new(user_input, spec, files);
    store.insert(site.clone())?;
    log!("store"; "{} `{}` ({} files)", site.id, site.name, site.files.len());
    Ok(site)
}

/// `build` command: compile a specification file, store and export it.
pub fn build_site(config: &SiteConfig, spec_path: &Path) -> Result<()> {
    let spec_path = config.get_root().join(spec_path);
    let content = fs::read_to_string(&spec_path)
        .with_context(|| format!("Failed to read site specification: {}", spec_path.display()))?;
    let spec = SiteSpec::from_json(&content)
        .with_context(|| format!("In {}", spec_path.display()))?;

    let fragments = FragmentStore::builtin();
    let store = SiteStore::open(&config.store.dir)?;
    let site = generate_site(&fragments, &store, &config.content, "", spec)?;

    let dir = export::save(&store, &site.id, &config.build.output, config.build.clean)?;
    log!("build"; "done -> {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecError;
    use crate::store::SiteStatus;
    use tempfile::TempDir;

    #[test]
    fn test_generate_site_stores_enriched_record() {
        let dir = TempDir::new().unwrap();
        let store = SiteStore::open(dir.path()).unwrap();
        let fragments = FragmentStore::builtin();

        let site = generate_site(
            &fragments,
            &store,
            &ContentConfig::default(),
            "a business site",
            SiteSpec::fallback("a business site"),
        )
        .unwrap();

        assert_eq!(site.status, SiteStatus::Generated);
        assert_eq!(site.user_input, "a business site");
        assert!(site.specifications.pages[0].data.contains_key("navbar"));
        assert!(site.files.iter().any(|f| f.path == "public/index.html"));
        assert_eq!(store.get(&site.id).unwrap(), site);
    }

    #[test]
    fn test_generate_site_rejects_invalid_spec() {
        let dir = TempDir::new().unwrap();
        let store = SiteStore::open(dir.path()).unwrap();
        let mut spec = SiteSpec::fallback("");
        spec.site_name.clear();

        let err = generate_site(
            &FragmentStore::builtin(),
            &store,
            &ContentConfig::default(),
            "",
            spec,
        )
        .unwrap_err();

        assert!(err.downcast_ref::<SpecError>().is_some());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_build_site_exports() {
        let root = TempDir::new().unwrap();
        let spec = serde_json::to_string(&SiteSpec::fallback("")).unwrap();
        fs::write(root.path().join("site.json"), spec).unwrap();

        let mut config = SiteConfig::default();
        config.set_root(root.path());
        config.build.output = root.path().join("out");
        config.store.dir = root.path().join("store");

        build_site(&config, Path::new("site.json")).unwrap();

        let project = root.path().join("out/my-website");
        assert!(project.join("public/index.html").exists());
        assert!(project.join("package.json").exists());

        let store = SiteStore::open(root.path().join("store")).unwrap();
        let sites = store.list().unwrap();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].status, SiteStatus::Saved);
    }
}
