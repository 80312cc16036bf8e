//! Site compilation.
//!
//! Turns a [`SiteSpec`] into the ordered list of files of a complete project:
//!
//! ```text
//! public/<page>.html        one per page, in page order
//! public/css/<page>.css
//! public/js/<page>.js       only when the page has scripts
//! server.js
//! routes/<name>.js          one per distinct backend route
//! models/<name>.js          one per distinct backend model
//! package.json
//! .env.example
//! README.md
//! ```
//!
//! Output is byte-identical for the same input and year.

mod backend;
mod pages;

use crate::fragment::FragmentStore;
use crate::spec::{SiteSpec, SpecError};
use chrono::Datelike;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A generated file, path relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualFile {
    pub path: String,
    pub content: String,
}

impl VirtualFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

pub struct Assembler<'a> {
    fragments: &'a FragmentStore,
    /// Copyright year written to the readme.
    year: i32,
}

impl<'a> Assembler<'a> {
    pub fn new(fragments: &'a FragmentStore) -> Self {
        Self::with_year(fragments, chrono::Local::now().year())
    }

    pub fn with_year(fragments: &'a FragmentStore, year: i32) -> Self {
        Self { fragments, year }
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Validate, then compile. Nothing is compiled for an invalid site.
    pub fn compile_site(&self, spec: &SiteSpec) -> Result<Vec<VirtualFile>, SpecError> {
        spec.validate()?;
        Ok(self.compile(spec))
    }

    /// Compile an already validated site.
    pub fn compile(&self, spec: &SiteSpec) -> Vec<VirtualFile> {
        let outputs: Vec<_> = spec
            .pages
            .par_iter()
            .map(|page| pages::assemble(self.fragments, spec, page))
            .collect();

        let mut files = Vec::with_capacity(outputs.len() * 3 + 6);
        for page in &outputs {
            files.push(VirtualFile::new(format!("public/{}.html", page.name), page.html.as_str()));
            files.push(VirtualFile::new(format!("public/css/{}.css", page.name), page.css.as_str()));
            if !page.js.is_empty() {
                files.push(VirtualFile::new(format!("public/js/{}.js", page.name), page.js.as_str()));
            }
        }

        let declared = outputs.iter().flat_map(|page| page.backend.iter().copied());
        let snippets = backend::snippets(self.fragments, spec, declared);
        files.extend(backend::files(spec, &snippets, self.year));
        files
    }
}
