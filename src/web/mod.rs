//! Embedded web dashboard.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) serving:
//! - the single-page evaluation dashboard (submit form, feedback controls,
//!   stat tiles, three analytics charts, recent-interaction table)
//! - JSON API endpoints for submit, feedback, stats, charts, and health
//!
//! Launched via `promptlens web` (default: `http://127.0.0.1:9747`). Requests
//! are handled sequentially — sufficient for the single-user session model,
//! and it keeps the read-modify-write log discipline race-free in practice.

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::PromptlensConfig;
use crate::dashboard::Dashboard;
use crate::llm::HfClient;
use crate::store::InteractionStore;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server with the given config.
///
/// Blocks the current thread. Per-request errors answer 500 JSON without
/// crashing the loop.
pub fn serve(config: PromptlensConfig) -> Result<()> {
    let addr = config.server_addr.clone();
    let server = Server::http(&addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let store = InteractionStore::open(config.log_file.clone());
    let client = HfClient::from_config(&config);
    let mut dash = Dashboard::new(store, client);

    println!("promptlens dashboard running at http://{addr}");
    if config.token.is_none() {
        println!("warning: HF_TOKEN is not set — submissions will return an error response");
    }
    println!("Press Ctrl+C to stop.\n");

    let url = format!("http://{addr}");
    let _ = open_browser(&url);

    for mut request in server.incoming_requests() {
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

        let result = dispatch(&mut dash, &config, &method, &url, body.as_deref());

        match result {
            Ok(resp) => {
                let _ = request.respond(resp);
            }
            Err(e) => {
                let body = serde_json::json!({ "error": e.to_string() }).to_string();
                let resp = Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(500));
                let _ = request.respond(resp);
            }
        }

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    dash: &mut Dashboard<HfClient>,
    config: &PromptlensConfig,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API — interaction flow
        (&Method::Post, "/api/submit") => api::post_submit(dash, body.unwrap_or("{}")),
        (&Method::Post, "/api/feedback") => api::post_feedback(dash, body.unwrap_or("{}")),

        // API — analytics
        (&Method::Get, "/api/stats") => api::get_stats(dash),
        (&Method::Get, "/api/charts") => api::get_charts(dash),
        (&Method::Get, "/api/log") => api::get_log(dash, url),

        // API — environment
        (&Method::Get, "/api/defaults") => api::get_defaults(config),
        (&Method::Get, "/api/health") => api::get_health(dash, config),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    let html = frontend::INDEX_HTML;
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
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
