use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::config::{CSV_FILE_NAME, CSV_MIME, XLSX_FILE_NAME, XLSX_MIME};
use crate::editor::StatGrid;
use crate::error::{AppError, Result};
use crate::export::{to_csv, to_xlsx};
use crate::matchup::merge_grids;
use crate::report::{self, GenerateFailure, Report};
use crate::state::SessionStore;
use crate::types::{MatchupRow, Side};

#[derive(Clone)]
pub struct ApiState {
    pub sessions: Arc<SessionStore>,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
    pub max_table_rows: usize,
}

impl ApiState {
    pub fn new(sessions: Arc<SessionStore>, max_table_rows: usize) -> Self {
        Self {
            sessions,
            health: Arc::new(HealthState::new()),
            latency: Arc::new(LatencyStats::new()),
            max_table_rows,
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/tables/:side", get(get_table).put(put_table))
        .route("/sessions/:id/generate", post(generate))
        .route("/sessions/:id/export/csv", get(export_csv))
        .route("/sessions/:id/export/xlsx", get(export_xlsx))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionTables {
    pub pitcher: StatGrid,
    pub batter: StatGrid,
}

#[derive(Debug, Serialize)]
pub struct TableUpdated {
    pub side: Side,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub active_sessions: usize,
    pub reports_generated: u64,
    pub generate_failures: u64,
    pub exports_served: u64,
    pub export_failures: u64,
    pub generate_samples: u64,
    pub generate_p50_us: Option<u64>,
    pub generate_p95_us: Option<u64>,
    pub generate_p99_us: Option<u64>,
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

async fn create_session(State(state): State<ApiState>) -> Result<(StatusCode, Json<SessionCreated>)> {
    let session_id = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(SessionCreated { session_id })))
}

async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<SessionTables>> {
    let (pitcher, batter) = state.sessions.tables(&id)?;
    Ok(Json(SessionTables { pitcher, batter }))
}

async fn delete_session(State(state): State<ApiState>, Path(id): Path<String>) -> Result<StatusCode> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(id))
    }
}

async fn get_table(
    State(state): State<ApiState>,
    Path((id, side)): Path<(String, Side)>,
) -> Result<Json<StatGrid>> {
    Ok(Json(state.sessions.grid(&id, side)?))
}

/// Editor write path: replaces one side's grid. Cell contents are not
/// validated until the next generate or export.
async fn put_table(
    State(state): State<ApiState>,
    Path((id, side)): Path<(String, Side)>,
    Json(grid): Json<StatGrid>,
) -> Result<Json<TableUpdated>> {
    if grid.row_count() > state.max_table_rows {
        return Err(AppError::TableTooLarge {
            side: side.to_string(),
            rows: grid.row_count(),
            limit: state.max_table_rows,
        });
    }
    let rows = state.sessions.replace_grid(&id, side, grid)?;
    Ok(Json(TableUpdated { side, rows }))
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

/// "Generate Matchup Table": full recompute from the session's current grids.
/// Every failure is reported as one message; the grids are left as they were.
async fn generate(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<Report>, GenerateFailure> {
    let started = Instant::now();
    let (pitcher, batter) = state.sessions.tables(&id).map_err(GenerateFailure)?;

    let result = report::generate(&pitcher, &batter, state.max_table_rows);
    state.latency.record(started.elapsed());
    state.health.record_generate(result.is_ok());

    match result {
        Ok(report) => {
            info!(
                session_id = %id,
                rows = report.row_count(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "matchup table generated"
            );
            Ok(Json(report))
        }
        Err(failure) => {
            warn!(session_id = %id, "{}", failure.message());
            Err(failure)
        }
    }
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

async fn export_csv(State(state): State<ApiState>, Path(id): Path<String>) -> Result<Response> {
    let bytes = run_export(&state, &id, "csv", to_csv)?;
    Ok(attachment(CSV_MIME, CSV_FILE_NAME, bytes))
}

async fn export_xlsx(State(state): State<ApiState>, Path(id): Path<String>) -> Result<Response> {
    let bytes = run_export(&state, &id, "xlsx", to_xlsx)?;
    Ok(attachment(XLSX_MIME, XLSX_FILE_NAME, bytes))
}

/// Recompute the merge and serialize it. Failures are logged and counted,
/// then returned to the caller as an error body.
fn run_export(
    state: &ApiState,
    id: &str,
    format: &'static str,
    write: impl FnOnce(&[MatchupRow]) -> Result<Vec<u8>>,
) -> Result<Vec<u8>> {
    let result = state
        .sessions
        .tables(id)
        .and_then(|(pitcher, batter)| merge_grids(&pitcher, &batter, state.max_table_rows))
        .and_then(|rows| write(&rows));

    state.health.record_export(result.is_ok());
    match &result {
        Ok(bytes) => info!(session_id = %id, format, bytes = bytes.len(), "export served"),
        Err(e) => error!(session_id = %id, format, "export failed: {e}"),
    }
    result
}

fn attachment(mime: &'static str, file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let (p50, p95, p99) = state.latency.percentiles();
    Json(HealthResponse {
        active_sessions: state.sessions.len(),
        reports_generated: state.health.reports_generated(),
        generate_failures: state.health.generate_failures(),
        exports_served: state.health.exports_served(),
        export_failures: state.health.export_failures(),
        generate_samples: state.latency.len(),
        generate_p50_us: p50,
        generate_p95_us: p95,
        generate_p99_us: p99,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
