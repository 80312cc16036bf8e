//! Project initialization.
//!
//! Writes a default `sitewright.toml` and a starter `site.json` built from
//! the fallback site layout.

use crate::{config::SiteConfig, log, spec::SiteSpec};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Starter site specification file name
const SPEC_FILE: &str = "site.json";

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore"];

/// Generated directories that should stay out of version control
const IGNORED: &[&str] = &["/generated-websites/", "/.sitewright/"];

/// Create a new project in the configured root.
pub fn new_project(config: &SiteConfig, prompt: Option<&str>) -> Result<()> {
    let root = config.get_root();
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create {}", root.display()))?;

    let spec_path = root.join(SPEC_FILE);
    if spec_path.exists() {
        bail!(
            "Path `{}` already exists. Try `sitewright init <NAME>` instead.",
            spec_path.display()
        );
    }

    init_default_config(&config.config_path)?;
    init_starter_spec(&spec_path, prompt.unwrap_or_default())?;
    init_ignored_files(root)?;

    log!("init"; "created {}", root.display());
    Ok(())
}

/// Write default configuration file
fn init_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn init_starter_spec(path: &Path, prompt: &str) -> Result<()> {
    let mut content = serde_json::to_string_pretty(&SiteSpec::fallback(prompt))?;
    content.push('\n');
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Initialize ignore files, leaving existing ones alone
fn init_ignored_files(root: &Path) -> Result<()> {
    let content = IGNORED.join("\n") + "\n";
    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }
    Ok(())
}
