//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content. The handlers only translate
//! between HTTP and the dashboard session — all behavior lives in the
//! orchestrator, store, analytics, and chart modules.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::config::{self, PromptlensConfig};
use crate::dashboard::Dashboard;
use crate::llm::HfClient;
use crate::store::Feedback;

use super::content_type_json;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /api/submit`.
#[derive(Debug, Deserialize)]
struct SubmitRequest {
    prompt: String,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    response: String,
    latency: f64,
}

/// Body of `POST /api/feedback`.
///
/// `feedback` may be absent — the handler then returns the current charts
/// without touching the log.
#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    prompt: String,
    response: String,
    latency: f64,
    #[serde(default)]
    feedback: Option<Feedback>,
    #[serde(default)]
    hallucination: bool,
}

/// Form-prefill values for the frontend.
#[derive(Debug, Serialize)]
struct DefaultsResponse {
    model: String,
    template: String,
}

/// Health summary for the header badges.
#[derive(Debug, Serialize)]
struct HealthResponse {
    token_set: bool,
    config_exists: bool,
    log_exists: bool,
    total_rows: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Parse the `?limit=N` query parameter from a URL.
fn parse_limit_param(url: &str) -> Option<usize> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == "limit" { v.parse().ok() } else { None }
    })
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/submit` — run one prompt through the orchestrator.
pub fn post_submit(
    dash: &mut Dashboard<HfClient>,
    body: &str,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: SubmitRequest =
        serde_json::from_str(body).context("invalid JSON in submit request")?;

    let template = req.template.as_deref().unwrap_or("Default");
    let model = req.model.as_deref().unwrap_or_default();

    let (response, latency) = dash.submit(&req.prompt, template, model);

    json_response(&SubmitResponse { response, latency })
}

/// `POST /api/feedback` — attach a rating to a logged interaction and return
/// the refreshed chart bundle.
pub fn post_feedback(
    dash: &mut Dashboard<HfClient>,
    body: &str,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: FeedbackRequest =
        serde_json::from_str(body).context("invalid JSON in feedback request")?;

    let bundle = dash.submit_feedback(
        &req.prompt,
        &req.response,
        req.latency,
        req.feedback,
        req.hallucination,
    );

    json_response(&bundle)
}

/// `GET /api/stats` — aggregate statistics for the cached table.
pub fn get_stats(dash: &mut Dashboard<HfClient>) -> Result<Response<Cursor<Vec<u8>>>> {
    dash.refresh();
    json_response(&dash.stats())
}

/// `GET /api/charts` — the three-panel chart bundle for the cached table.
pub fn get_charts(dash: &mut Dashboard<HfClient>) -> Result<Response<Cursor<Vec<u8>>>> {
    dash.refresh();
    json_response(&dash.charts())
}

/// `GET /api/log?limit=N` — recent interaction records, oldest first.
pub fn get_log(dash: &mut Dashboard<HfClient>, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    dash.refresh();
    let limit = parse_limit_param(url).unwrap_or(50);

    let table = dash.table();
    let start = table.len().saturating_sub(limit);

    json_response(&table[start..].to_vec())
}

/// `GET /api/defaults` — form-prefill values.
pub fn get_defaults(config: &PromptlensConfig) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&DefaultsResponse {
        model: config.default_model.clone(),
        template: config.default_template.clone(),
    })
}

/// `GET /api/health` — credential and file status for the header badges.
pub fn get_health(
    dash: &mut Dashboard<HfClient>,
    config: &PromptlensConfig,
) -> Result<Response<Cursor<Vec<u8>>>> {
    let config_exists = config::config_file_path()
        .map(|p| p.exists())
        .unwrap_or(false);

    dash.refresh();

    json_response(&HealthResponse {
        token_set: config.token.is_some(),
        config_exists,
        log_exists: config.log_file.exists(),
        total_rows: dash.table().len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
