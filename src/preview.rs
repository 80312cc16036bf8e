//! Preview rewriting.
//!
//! A stored site is served from `/preview/<session>/` instead of its own
//! root. Before a page is returned its assets are inlined and its links are
//! moved under that prefix:
//!
//! | Input                                   | Output                                  |
//! |-----------------------------------------|-----------------------------------------|
//! | `<link rel="stylesheet" href="/css/p.css">` | `<style>…</style>`                  |
//! | `</body>`                               | `<script>…</script></body>`             |
//! | `fetch('/api/contact')` (in the script) | `fetch('/preview/<session>/api/contact')` |
//! | `href="/about"`                         | `href="/preview/<session>/about"`       |
//! | `href="/"`, `href="/#top"`              | `href="/preview/<session>/"`, …         |
//! | `href="//cdn.example"`, `href="https://…"` | unchanged                            |
//!
//! Rewriting works on text and must only be applied to stored files, never to
//! its own output.

use crate::assembler::VirtualFile;
use thiserror::Error;

const ROOT_HREF: &str = "href=\"/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("page `{0}` not found")]
    PageNotFound(String),

    #[error("asset `{0}` not found")]
    AssetNotFound(String),
}

/// Raw assets served next to previewed pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Css,
    Js,
}

impl AssetKind {
    pub fn from_dir(dir: &str) -> Option<Self> {
        match dir {
            "css" => Some(Self::Css),
            "js" => Some(Self::Js),
            _ => None,
        }
    }

    const fn dir(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Js => "js",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Css => "text/css; charset=utf-8",
            Self::Js => "application/javascript; charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset<'a> {
    pub content: &'a str,
    pub content_type: &'static str,
}

/// Rewrites the pages of one stored site for one preview session.
pub struct PreviewRewriter<'a> {
    files: &'a [VirtualFile],
    pages: Vec<String>,
    session: &'a str,
}

impl<'a> PreviewRewriter<'a> {
    /// `pages` are the site's page names. When empty they are recovered from
    /// the `public/<name>.html` files.
    pub fn new(files: &'a [VirtualFile], pages: Vec<String>, session: &'a str) -> Self {
        let pages = if pages.is_empty() {
            files
                .iter()
                .filter_map(|f| f.path.strip_prefix("public/")?.strip_suffix(".html"))
                .filter(|name| !name.contains('/'))
                .map(str::to_owned)
                .collect()
        } else {
            pages
        };
        Self {
            files,
            pages,
            session,
        }
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    fn file(&self, path: &str) -> Option<&'a str> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
    }

    /// Self-contained HTML of `page` for the preview session.
    pub fn rewrite(&self, page: &str) -> Result<String, PreviewError> {
        let mut html = self
            .file(&format!("public/{page}.html"))
            .ok_or_else(|| PreviewError::PageNotFound(page.to_owned()))?
            .to_owned();

        if let Some(css) = self.file(&format!("public/css/{page}.css")) {
            let link = format!(r#"<link rel="stylesheet" href="/css/{page}.css">"#);
            html = html.replacen(&link, &format!("<style>{css}</style>"), 1);
        }

        if let Some(js) = self.file(&format!("public/js/{page}.js")) {
            let js = js.replace("'/api/", &format!("'/preview/{}/api/", self.session));
            html = html.replacen("</body>", &format!("<script>{js}</script></body>"), 1);
        }

        for name in &self.pages {
            html = html.replace(
                &format!("href=\"/{name}\""),
                &format!("href=\"/preview/{}/{name}\"", self.session),
            );
        }

        Ok(self.rewrite_root_links(&html))
    }

    /// Move every remaining root-relative `href` under the session prefix.
    ///
    /// Protocol-relative URLs (`href="//…"`) and links already under the
    /// prefix are left alone.
    fn rewrite_root_links(&self, html: &str) -> String {
        let done = format!("preview/{}/", self.session);
        let mut out = String::with_capacity(html.len());
        let mut last = 0;

        for (at, _) in html.match_indices(ROOT_HREF) {
            let rest = &html[at + ROOT_HREF.len()..];
            if rest.starts_with('/') || rest.starts_with(&done) {
                continue;
            }
            out.push_str(&html[last..at]);
            out.push_str(ROOT_HREF);
            out.push_str(&done);
            last = at + ROOT_HREF.len();
        }

        out.push_str(&html[last..]);
        out
    }

    /// Raw `public/<kind>/<file>` content, without any rewriting.
    pub fn asset(&self, kind: AssetKind, file: &str) -> Result<Asset<'a>, PreviewError> {
        let path = format!("public/{}/{file}", kind.dir());
        let content = self.file(&path).ok_or(PreviewError::AssetNotFound(path))?;
        Ok(Asset {
            content,
            content_type: kind.content_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(html: &str, css: Option<&str>, js: Option<&str>) -> Vec<VirtualFile> {
        let mut files = vec![VirtualFile::new("public/index.html", html)];
        if let Some(css) = css {
            files.push(VirtualFile::new("public/css/index.css", css));
        }
        if let Some(js) = js {
            files.push(VirtualFile::new("public/js/index.js", js));
        }
        files
    }

    #[test]
    fn test_root_link_exclusion() {
        let files = site(
            r#"<a href="/">Home</a><a href="https://example.com">Ext</a>"#,
            None,
            None,
        );
        let html = PreviewRewriter::new(&files, vec![], "abc").rewrite("index").unwrap();

        assert_eq!(
            html,
            r#"<a href="/preview/abc/">Home</a><a href="https://example.com">Ext</a>"#
        );
    }

    #[test]
    fn test_protocol_relative_link_untouched() {
        let files = site(r#"<a href="//cdn.example.com/x.css">x</a>"#, None, None);
        let html = PreviewRewriter::new(&files, vec![], "abc").rewrite("index").unwrap();
        assert_eq!(html, r#"<a href="//cdn.example.com/x.css">x</a>"#);
    }

    #[test]
    fn test_api_fetch_rewrite() {
        let files = site(
            "<body></body>",
            None,
            Some("fetch('/api/contact', { method: 'POST' })"),
        );
        let html = PreviewRewriter::new(&files, vec![], "xyz").rewrite("index").unwrap();

        assert!(html.contains("fetch('/preview/xyz/api/contact', { method: 'POST' })"));
        assert!(html.ends_with("</script></body>"));
    }

    #[test]
    fn test_not_found() {
        let files = site("<body></body>", None, None);
        let err = PreviewRewriter::new(&files, vec![], "abc")
            .rewrite("nonexistent")
            .unwrap_err();
        assert_eq!(err, PreviewError::PageNotFound("nonexistent".into()));
    }

    #[test]
    fn test_stylesheet_inlined() {
        let files = site(
            r#"<head><link rel="stylesheet" href="/css/index.css"></head>"#,
            Some("body { margin: 0; }"),
            None,
        );
        let html = PreviewRewriter::new(&files, vec![], "abc").rewrite("index").unwrap();
        assert_eq!(html, "<head><style>body { margin: 0; }</style></head>");
    }

    #[test]
    fn test_missing_stylesheet_keeps_link() {
        let files = site(r#"<link rel="stylesheet" href="/css/index.css">"#, None, None);
        let html = PreviewRewriter::new(&files, vec![], "abc").rewrite("index").unwrap();
        // still moved under the preview prefix by the root pass
        assert_eq!(
            html,
            r#"<link rel="stylesheet" href="/preview/abc/css/index.css">"#
        );
    }

    #[test]
    fn test_page_links_not_double_prefixed() {
        let mut files = site(
            r#"<a href="/about">About</a><a href="/">Home</a><a href="/about#team">Team</a>"#,
            None,
            None,
        );
        files.push(VirtualFile::new("public/about.html", "<p>about</p>"));

        let rewriter = PreviewRewriter::new(&files, vec![], "s1");
        assert_eq!(rewriter.pages(), ["index", "about"]);

        let html = rewriter.rewrite("index").unwrap();
        assert_eq!(
            html,
            concat!(
                r#"<a href="/preview/s1/about">About</a>"#,
                r#"<a href="/preview/s1/">Home</a>"#,
                r#"<a href="/preview/s1/about#team">Team</a>"#,
            )
        );
    }

    #[test]
    fn test_known_pages_take_precedence() {
        let files = site(r#"<a href="/blog">Blog</a>"#, None, None);
        let rewriter = PreviewRewriter::new(&files, vec!["blog".into()], "s1");
        assert_eq!(rewriter.pages(), ["blog"]);
        assert_eq!(
            rewriter.rewrite("index").unwrap(),
            r#"<a href="/preview/s1/blog">Blog</a>"#
        );
    }

    #[test]
    fn test_non_index_page() {
        let files = vec![
            VirtualFile::new(
                "public/contact.html",
                r#"<link rel="stylesheet" href="/css/contact.css"><body></body>"#,
            ),
            VirtualFile::new("public/css/contact.css", "form{}"),
            VirtualFile::new("public/js/contact.js", "go()"),
        ];
        let html = PreviewRewriter::new(&files, vec![], "abc").rewrite("contact").unwrap();
        assert_eq!(html, "<style>form{}</style><body><script>go()</script></body>");
    }

    #[test]
    fn test_stored_files_untouched() {
        let files = site(r#"<a href="/">x</a>"#, None, None);
        let before = files.clone();
        PreviewRewriter::new(&files, vec![], "abc").rewrite("index").unwrap();
        assert_eq!(files, before);
    }

    #[test]
    fn test_asset() {
        let files = site("", Some("a{}"), Some("b()"));
        let rewriter = PreviewRewriter::new(&files, vec![], "abc");

        let css = rewriter.asset(AssetKind::Css, "index.css").unwrap();
        assert_eq!(css.content, "a{}");
        assert!(css.content_type.starts_with("text/css"));

        let js = rewriter.asset(AssetKind::Js, "index.js").unwrap();
        assert_eq!(js.content, "b()");

        assert_eq!(
            rewriter.asset(AssetKind::Css, "missing.css").unwrap_err(),
            PreviewError::AssetNotFound("public/css/missing.css".into())
        );
        assert_eq!(AssetKind::from_dir("img"), None);
    }
}
