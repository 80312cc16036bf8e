//! Preview server and JSON API.
//!
//! Built on `tiny_http`; requests are handled one at a time on the main
//! thread until Ctrl+C.
//!
//! | Method   | Path                                  | Response                         |
//! |----------|---------------------------------------|----------------------------------|
//! | `GET`    | `/`, `/health`                        | status JSON                      |
//! | `GET`    | `/api/components[/<id>]`              | component catalog                |
//! | `GET`    | `/api/components/category/<category>` | catalog filtered by category     |
//! | `GET`    | `/api/sites[/<id>]`                   | stored sites / one stored site   |
//! | `POST`   | `/api/sites`                          | generate from a SiteSpec body    |
//! | `POST`   | `/api/generate`                       | generate from `{"userInput"}`    |
//! | `POST`   | `/api/sites/<id>/save`                | export to `[build].output`       |
//! | `DELETE` | `/api/sites/<id>`                     | remove a stored site             |
//! | `GET`    | `/preview/<id>[/<page>]`              | rewritten page HTML              |
//! | `GET`    | `/preview/<id>/{css,js}/<file>`       | raw asset                        |
//! | `POST`   | `/preview/<id>/api/contact`           | acknowledgement, nothing stored  |

use crate::{
    build::generate_site,
    config::{SiteConfig, cfg},
    export,
    fragment::FragmentStore,
    log,
    preview::{AssetKind, PreviewError, PreviewRewriter},
    spec::{SiteSpec, SpecError},
    store::{SiteStore, StoreError, is_valid_id},
    template,
};
use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use std::{
    io::Read,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Request bodies larger than this are truncated.
const MAX_BODY: u64 = 2 * 1024 * 1024;

const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

// ============================================================================
// Server Entry Point
// ============================================================================

/// Start the preview server. Blocks until Ctrl+C is received.
pub fn serve_site() -> Result<()> {
    let c = cfg();
    let interface: IpAddr = c.serve.interface.parse()?;

    let store = SiteStore::open(&c.store.dir)?;
    let fragments = FragmentStore::builtin();
    let app = App {
        store: &store,
        fragments: &fragments,
        config: &c,
    };

    let (server, addr) = try_bind_port(interface, c.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);
    log!("serve"; "store: {}", store.dir().display());

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &app) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request(mut request: Request, app: &App) -> Result<()> {
    let method = request.method().to_string();
    let url = request.url().to_owned();

    let mut body = String::new();
    if method == "POST" {
        request
            .as_reader()
            .take(MAX_BODY)
            .read_to_string(&mut body)
            .context("Failed to read request body")?;
    }

    let reply = app.handle(&method, &url, &body);
    log!("serve"; "{} {} -> {}", method, url, reply.status);

    let header = Header::from_bytes("Content-Type", reply.content_type)
        .map_err(|()| anyhow!("invalid content type `{}`", reply.content_type))?;
    let response = Response::from_string(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

/// A finished response, independent of the HTTP library.
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl Reply {
    fn json(status: u16, value: Value) -> Self {
        Self {
            status,
            content_type: JSON,
            body: value.to_string(),
        }
    }

    fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: HTML,
            body: body.into(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: TEXT,
            body: "404 Not Found".into(),
        }
    }

    fn api_error(status: u16, error: &str, message: impl std::fmt::Display) -> Self {
        Self::json(status, json!({ "error": error, "message": message.to_string() }))
    }
}

struct App<'a> {
    store: &'a SiteStore,
    fragments: &'a FragmentStore,
    config: &'a SiteConfig,
}

impl App<'_> {
    /// Decode the raw request URL, drop the query and route it.
    fn handle(&self, method: &str, url: &str, body: &str) -> Reply {
        // Decode URL-encoded characters (e.g., %20 → space)
        let Ok(url) = urlencoding::decode(url) else {
            return Reply {
                status: 400,
                content_type: TEXT,
                body: "400 Bad Request".into(),
            };
        };
        let path = url.split('?').next().unwrap_or_default();
        self.route(method, path, body)
    }

    fn route(&self, method: &str, path: &str, body: &str) -> Reply {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match (method, segments.as_slice()) {
            ("GET", []) => Reply::json(
                200,
                json!({
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION"),
                    "status": "running",
                }),
            ),
            ("GET", ["health"]) => Reply::json(
                200,
                json!({ "status": "OK", "timestamp": chrono::Utc::now().to_rfc3339() }),
            ),

            ("GET", ["api", "components"]) => self.components(),
            ("GET", ["api", "components", "category", category]) => self.category(category),
            ("GET", ["api", "components", id]) => self.component(id),

            ("GET", ["api", "sites"]) => self.list_sites(),
            ("POST", ["api", "sites"]) => self.create_site(body),
            ("POST", ["api", "generate"]) => self.generate_from_prompt(body),
            ("GET", ["api", "sites", id]) => self.get_site(id),
            ("DELETE", ["api", "sites", id]) => self.delete_site(id),
            ("POST", ["api", "sites", id, "save"]) => self.save_site(id),

            ("GET", ["preview", id]) => self.preview(id, "index"),
            ("GET", ["preview", id, dir, file]) => match AssetKind::from_dir(dir) {
                Some(kind) => self.asset(id, kind, file),
                None => Reply::not_found(),
            },
            ("GET", ["preview", id, page]) => self.preview(id, page),
            ("POST", ["preview", id, "api", "contact"]) => self.preview_contact(id, body),

            _ => Reply::not_found(),
        }
    }

    // ------------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------------

    fn components(&self) -> Reply {
        let catalog = self.fragments.catalog();
        Reply::json(
            200,
            json!({ "success": true, "count": catalog.len(), "data": catalog }),
        )
    }

    fn component(&self, id: &str) -> Reply {
        let Some(info) = self.fragments.component(id) else {
            let available: Vec<_> = self.fragments.catalog().iter().map(|c| c.id).collect();
            return Reply::json(
                404,
                json!({
                    "error": "Component not found",
                    "message": format!("No component found with id: {id}"),
                    "availableTypes": available,
                }),
            );
        };

        Reply::json(
            200,
            json!({
                "success": true,
                "data": {
                    "id": info.id,
                    "name": info.name,
                    "description": info.description,
                    "category": info.category,
                    "variants": self.fragments.variants(id),
                },
            }),
        )
    }

    fn category(&self, category: &str) -> Reply {
        let components = self.fragments.by_category(category);
        if components.is_empty() {
            return Reply::json(
                404,
                json!({
                    "error": "No components found",
                    "message": format!("No components found in category: {category}"),
                    "availableCategories": self.fragments.categories(),
                }),
            );
        }
        Reply::json(
            200,
            json!({ "success": true, "count": components.len(), "data": components }),
        )
    }

    // ------------------------------------------------------------------------
    // Sites
    // ------------------------------------------------------------------------

    fn list_sites(&self) -> Reply {
        match self.store.list() {
            Ok(sites) => {
                let data: Vec<_> = sites
                    .iter()
                    .map(|site| {
                        json!({
                            "id": site.id,
                            "name": site.name,
                            "status": site.status,
                            "createdAt": site.created_at,
                            "summary": site.summary,
                        })
                    })
                    .collect();
                Reply::json(200, json!({ "success": true, "count": data.len(), "data": data }))
            }
            Err(err) => store_error(err),
        }
    }

    fn create_site(&self, body: &str) -> Reply {
        match SiteSpec::from_json(body) {
            Ok(spec) => self.generate(body_prompt(body), spec),
            Err(err) => Reply::api_error(400, "Validation failed", err),
        }
    }

    fn generate_from_prompt(&self, body: &str) -> Reply {
        let prompt = body_prompt(body);
        if prompt.trim().is_empty() {
            return Reply::api_error(400, "Validation failed", "userInput is required");
        }
        let spec = SiteSpec::fallback(&prompt);
        self.generate(prompt, spec)
    }

    fn generate(&self, user_input: String, spec: SiteSpec) -> Reply {
        let result = generate_site(
            self.fragments,
            self.store,
            &self.config.content,
            &user_input,
            spec,
        );

        match result {
            Ok(site) => Reply::json(
                201,
                json!({
                    "success": true,
                    "data": {
                        "id": site.id,
                        "name": site.name,
                        "summary": site.summary,
                        "fileCount": site.files.len(),
                        "previewUrl": format!("/preview/{}", site.id),
                    },
                }),
            ),
            Err(err) => match err.downcast::<SpecError>() {
                Ok(err) => Reply::api_error(400, "Validation failed", err),
                Err(err) => match err.downcast::<StoreError>() {
                    Ok(err) => store_error(err),
                    Err(err) => internal_error(err),
                },
            },
        }
    }

    fn get_site(&self, id: &str) -> Reply {
        match self.store.get(id) {
            Ok(site) => Reply::json(200, json!({ "success": true, "data": site })),
            Err(err) => store_error(err),
        }
    }

    fn delete_site(&self, id: &str) -> Reply {
        match self.store.remove(id) {
            Ok(()) => Reply::json(200, json!({ "success": true })),
            Err(err) => store_error(err),
        }
    }

    fn save_site(&self, id: &str) -> Reply {
        let build = &self.config.build;
        match export::save(self.store, id, &build.output, build.clean) {
            Ok(dir) => Reply::json(
                200,
                json!({ "success": true, "projectPath": dir.display().to_string() }),
            ),
            Err(err) => match err.downcast::<StoreError>() {
                Ok(err) => store_error(err),
                Err(err) => internal_error(err),
            },
        }
    }

    // ------------------------------------------------------------------------
    // Preview
    // ------------------------------------------------------------------------

    fn preview(&self, id: &str, page: &str) -> Reply {
        if !is_valid_id(id) {
            return Reply::html(400, "<h1>Invalid website ID</h1>");
        }
        let site = match self.store.get(id) {
            Ok(site) => site,
            Err(StoreError::NotFound(_)) => return Reply::html(404, "<h1>Website not found</h1>"),
            Err(err) => {
                log!("error"; "{err}");
                return Reply::html(500, "<h1>Error loading preview</h1>");
            }
        };

        let rewriter = PreviewRewriter::new(&site.files, site.specifications.page_names(), id);
        match rewriter.rewrite(page) {
            Ok(html) => {
                let left = template::unresolved(&html);
                if !left.is_empty() {
                    log!("preview"; "{}/{}: {} unresolved placeholders", id, page, left.len());
                }
                Reply::html(200, html)
            }
            Err(PreviewError::PageNotFound(_)) => {
                log!("preview"; "{}: no page `{}` in [{}]", id, page, rewriter.pages().join(", "));
                Reply::html(404, "<h1>Page not found</h1>")
            }
            Err(err) => Reply::html(404, format!("<h1>{err}</h1>")),
        }
    }

    fn asset(&self, id: &str, kind: AssetKind, file: &str) -> Reply {
        if !is_valid_id(id) {
            return Reply::not_found();
        }
        let Ok(site) = self.store.get(id) else {
            return Reply::not_found();
        };

        let rewriter = PreviewRewriter::new(&site.files, Vec::new(), id);
        match rewriter.asset(kind, file) {
            Ok(asset) => Reply {
                status: 200,
                content_type: asset.content_type,
                body: asset.content.to_owned(),
            },
            Err(_) => Reply::not_found(),
        }
    }

    /// Form posts from previews are acknowledged but never stored.
    fn preview_contact(&self, id: &str, body: &str) -> Reply {
        if !is_valid_id(id) {
            return Reply::api_error(400, "Invalid website ID", id);
        }
        let data = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
        Reply::json(
            200,
            json!({
                "success": true,
                "message": "Preview mode: Form submission received (not saved)",
                "data": data,
            }),
        )
    }
}

/// `userInput` field of a JSON body, empty when absent.
fn body_prompt(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("userInput")?.as_str().map(str::to_owned))
        .unwrap_or_default()
}

fn store_error(err: StoreError) -> Reply {
    match err {
        StoreError::InvalidId(_) => Reply::api_error(400, "Invalid website ID", err),
        StoreError::NotFound(_) => Reply::api_error(404, "Website not found", err),
        err => internal_error(err.into()),
    }
}

fn internal_error(err: anyhow::Error) -> Reply {
    log!("error"; "{err:#}");
    Reply::api_error(500, "Internal error", err)
}
