//! Writing stored sites to disk as standalone projects.

use crate::assembler::VirtualFile;
use crate::log;
use crate::store::{GeneratedSite, SiteStatus, SiteStore};
use crate::utils::slug::slugify;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Export a stored site and mark it `saved`. Returns the project directory.
pub fn save(store: &SiteStore, id: &str, output: &Path, clean: bool) -> Result<PathBuf> {
    let site = store.get(id)?;
    let dir = write_site(&site, output, clean)?;
    store.set_project_path(id, &dir)?;
    store.set_status(id, SiteStatus::Saved)?;
    Ok(dir)
}

/// Write every file of `site` beneath `<output>/<slug of site name>/`.
pub fn write_site(site: &GeneratedSite, output: &Path, clean: bool) -> Result<PathBuf> {
    // Refuse the whole site before touching the disk
    for file in &site.files {
        check_path(&file.path)?;
    }

    let dir = output.join(slugify(&site.name));
    if clean && dir.exists() {
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to clear project directory: {}", dir.display()))?;
    }

    for file in &site.files {
        write_file(&dir, file)?;
    }

    log!("export"; "{} files -> {}", site.files.len(), dir.display());
    Ok(dir)
}

fn write_file(dir: &Path, file: &VirtualFile) -> Result<()> {
    let path = dir.join(&file.path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&path, &file.content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Only plain relative paths may leave the store.
fn check_path(path: &str) -> Result<()> {
    let components: Vec<_> = Path::new(path).components().collect();
    if components.is_empty() || !components.iter().all(|c| matches!(c, Component::Normal(_))) {
        bail!("refusing to export unsafe path `{path}`");
    }
    Ok(())
}
