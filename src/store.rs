//! Document store for generated sites.
//!
//! Each site is one pretty-printed JSON document, `<dir>/<id>.json`. Nothing
//! is held in memory, so documents written by another process (e.g.
//! `sitewright build` while `serve` runs) are visible on the next read.

use crate::assembler::VirtualFile;
use crate::spec::{SiteSpec, SiteSummary};
use chrono::{SecondsFormat, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Length of a site id in hex characters.
pub const ID_LEN: usize = 24;

/// Distinguishes ids minted within the same clock tick.
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid site id `{0}`")]
    InvalidId(String),

    #[error("site `{0}` not found")]
    NotFound(String),

    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt site record {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[default]
    Generated,
    Saved,
    Deployed,
}

impl SiteStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Saved => "saved",
            Self::Deployed => "deployed",
        }
    }
}

/// A stored site: its input, its specification and its compiled files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSite {
    pub id: String,
    pub name: String,
    /// Prompt or description the site was generated from.
    #[serde(default)]
    pub user_input: String,
    pub specifications: SiteSpec,
    pub files: Vec<VirtualFile>,
    pub summary: SiteSummary,
    /// Export directory, once saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<PathBuf>,
    #[serde(default)]
    pub status: SiteStatus,
    /// RFC 3339, UTC.
    pub created_at: String,
    pub updated_at: String,
}

impl GeneratedSite {
    /// Fresh record with a new id and current timestamps.
    pub fn new(user_input: &str, specifications: SiteSpec, files: Vec<VirtualFile>) -> Self {
        let now = timestamp();
        Self {
            id: new_id(&specifications.site_name, user_input),
            name: specifications.site_name.clone(),
            user_input: user_input.to_owned(),
            summary: SiteSummary::from(&specifications),
            specifications,
            files,
            project_path: None,
            status: SiteStatus::Generated,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn new_id(name: &str, user_input: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(&[0]);
    hasher.update(user_input.as_bytes());
    hasher.update(&Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    hasher.update(&ID_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());

    let mut id = hex::encode(hasher.finalize().as_bytes());
    id.truncate(ID_LEN);
    id
}

/// Whether `id` has the shape of a site id (24 hex characters).
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}

fn check_id(id: &str) -> Result<(), StoreError> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_owned()))
    }
}

/// Thread-safe store of [`GeneratedSite`] records.
///
/// Every read goes to disk. The lock only orders this process's own
/// read-modify-write cycles against its readers.
#[derive(Debug)]
pub struct SiteStore {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl SiteStore {
    /// Open (creating if needed) the store directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            lock: RwLock::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id.to_ascii_lowercase()))
    }

    /// Persist a record, replacing any record with the same id.
    pub fn insert(&self, site: GeneratedSite) -> Result<(), StoreError> {
        check_id(&site.id)?;
        let _guard = self.lock.write();
        self.write(&site)
    }

    pub fn get(&self, id: &str) -> Result<GeneratedSite, StoreError> {
        check_id(id)?;
        let _guard = self.lock.read();
        self.read(id)
    }

    fn read(&self, id: &str) -> Result<GeneratedSite, StoreError> {
        self.load(&self.path_of(id))?
            .ok_or_else(|| StoreError::NotFound(id.to_ascii_lowercase()))
    }

    fn write(&self, site: &GeneratedSite) -> Result<(), StoreError> {
        let path = self.path_of(&site.id);
        let json = serde_json::to_string_pretty(site).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| StoreError::Io { path, source })
    }

    /// Read a document, `None` when it does not exist.
    fn load(&self, path: &Path) -> Result<Option<GeneratedSite>, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Every stored site, newest first.
    pub fn list(&self) -> Result<Vec<GeneratedSite>, StoreError> {
        let _guard = self.lock.read();
        let entries = fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut sites = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_record = path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(is_valid_id);
            if !is_record {
                continue;
            }
            // `None`: removed between listing and reading
            if let Some(site) = self.load(&path)? {
                sites.push(site);
            }
        }

        sites.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sites)
    }

    pub fn remove(&self, id: &str) -> Result<(), StoreError> {
        check_id(id)?;
        let _guard = self.lock.write();
        let path = self.path_of(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_owned()))
            }
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Apply `change` to a stored record and persist it with a new
    /// `updated_at`.
    pub fn update(
        &self,
        id: &str,
        change: impl FnOnce(&mut GeneratedSite),
    ) -> Result<GeneratedSite, StoreError> {
        check_id(id)?;
        let _guard = self.lock.write();
        let mut site = self.read(id)?;
        change(&mut site);
        site.updated_at = timestamp();
        self.write(&site)?;
        Ok(site)
    }

    pub fn set_status(&self, id: &str, status: SiteStatus) -> Result<GeneratedSite, StoreError> {
        self.update(id, |site| site.status = status)
    }

    pub fn set_project_path(&self, id: &str, path: &Path) -> Result<GeneratedSite, StoreError> {
        self.update(id, |site| site.project_path = Some(path.to_path_buf()))
    }
}
