//! Embedded web dashboard.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - The single-page risk dashboard
//! - JSON API endpoints over one shared [`Session`]
//!
//! Launched via `claridian serve` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::assessment::ScoringService;
use crate::assessment::client::ScoringClient;
use crate::config::schema::ClaridianConfig;
use crate::session::Session;

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

/// State shared by every worker thread.
pub struct AppState {
    pub session: Mutex<Session>,
    pub scorer: Box<dyn ScoringService>,
    pub config: ClaridianConfig,
}

impl AppState {
    pub fn new(config: ClaridianConfig, scorer: Box<dyn ScoringService>) -> Self {
        Self {
            session: Mutex::new(Session::with_logging(config.logging.enabled)),
            scorer,
            config,
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server with the given configuration.
///
/// Blocks the current thread. Requests are handled by `web.workers` threads
/// pulling from one listener, so a slow scoring call does not stall the
/// rest of the dashboard.
pub fn serve(config: &ClaridianConfig) -> Result<()> {
    let addr = config.web.addr.clone();
    let server = Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;
    let server = Arc::new(server);

    let scorer = ScoringClient::from_config(&config.scoring);
    println!("claridian dashboard running at http://{addr}");
    println!("Scoring service: {}", scorer.endpoint());
    println!("Press Ctrl+C to stop.\n");

    if config.web.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    let state = Arc::new(AppState::new(config.clone(), Box::new(scorer)));
    let workers = config.web.workers.max(1);

    let handles: Vec<_> = (0..workers)
        .map(|i| {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            thread::Builder::new()
                .name(format!("claridian-web-{i}"))
                .spawn(move || {
                    for request in server.incoming_requests() {
                        handle(&state, request);
                    }
                })
                .context("failed to spawn web worker")
        })
        .collect::<Result<_>>()?;

    for handle in handles {
        let _ = handle.join();
    }

    Ok(())
}

fn handle(state: &AppState, mut request: Request) {
    let method = request.method().clone();
    let url = request.url().to_string();

    // Read body up-front for methods that carry one
    let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
        let mut buf = String::new();
        let _ = request.as_reader().read_to_string(&mut buf);
        Some(buf)
    } else {
        None
    };

    let response = dispatch(state, &method, &url, body.as_deref())
        .unwrap_or_else(|e| error_response(500, &format!("{e:#}")));
    let status = response.status_code().0;
    let _ = request.respond(response);

    // Brief access log
    println!(
        "{} {} {} {}",
        method,
        url,
        status,
        chrono::Local::now().format("%H:%M:%S")
    );
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub(crate) fn dispatch(
    state: &AppState,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<HttpResponse> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);
    let body = body.unwrap_or("{}");

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API: Session
        (&Method::Get, "/api/session") => api::get_session(state),
        (&Method::Post, "/api/navigate") => api::post_navigate(state, body),
        (&Method::Post, "/api/method") => api::post_method(state, body),
        (&Method::Put, "/api/metrics") => api::put_metric(state, body),

        // API: Assessment
        (&Method::Post, "/api/assess") => api::post_assess(state, body),
        (&Method::Get, "/api/timeline") => api::get_timeline(url),
        (&Method::Get, "/api/report") => api::get_report(state),

        // API: Health
        (&Method::Get, "/api/health") => api::get_health(state),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(header("Content-Type", "text/html; charset=utf-8"))
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> HttpResponse {
    error_response(404, "not found")
}

/// JSON `{ "error": … }` with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    header("Content-Type", "application/json; charset=utf-8")
}

/// Header from ASCII parts. Callers only pass literals or sanitized names.
pub(crate) fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("ASCII header")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
