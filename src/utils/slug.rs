//! Slugs for generated project names.
//!
//! Site names are free text ("Café Lumière"), but they end up as directory
//! names, npm package names and database names.

use deunicode::deunicode;

/// Used when a name has no usable characters at all.
const FALLBACK: &str = "site";

/// Lowercase ASCII slug, runs of other characters collapsed to `-`.
///
/// `"Café Lumière!"` → `"cafe-lumiere"`
pub fn slugify(text: &str) -> String {
    slugify_with(text, '-')
}

/// Database name for a site: `"My Site"` → `"my_site"`.
pub fn db_name(text: &str) -> String {
    slugify_with(text, '_')
}

fn slugify_with(text: &str, separator: char) -> String {
    let ascii = deunicode(text).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending && !slug.is_empty() {
                slug.push(separator);
            }
            pending = false;
            slug.push(c);
        } else {
            pending = true;
        }
    }

    if slug.is_empty() {
        FALLBACK.to_owned()
    } else {
        slug
    }
}
