//! In-memory stand-in for the remote logging service.
//!
//! Serves the same REST surface the real service exposes: a token-guarded
//! client listing, per-client log statistics, message appends, paged entry
//! reads with a "latest page" route, single-entry reads with a "last entry"
//! route, and the page-for-date lookup with its `-1` sentinel. Entry ids are
//! 1-based and pages are `PAGE_SIZE` entries indexed from 0.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const PAGE_SIZE: u32 = 10;

/// One stored log record, 1-based id in append order.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    pub data: String,
}

#[derive(Clone, Debug)]
pub struct LogRecord {
    pub id: String,
    pub create_date: DateTime<Utc>,
    /// Pre-encoded `name/count` strings reported in the stats response.
    pub command_names: Option<Vec<String>>,
    pub entries: Vec<EntryRecord>,
}

#[derive(Clone, Debug)]
pub struct ClientRecord {
    pub id: Uuid,
    pub name: String,
    pub register_date: DateTime<Utc>,
    pub logs: Vec<LogRecord>,
}

#[derive(Debug)]
pub struct ServiceState {
    pub admin_token: String,
    pub clients: Vec<ClientRecord>,
}

impl ServiceState {
    pub fn new(admin_token: &str) -> Self {
        Self {
            admin_token: admin_token.to_string(),
            clients: Vec::new(),
        }
    }
}

pub type Db = Arc<RwLock<ServiceState>>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientListing {
    id: Uuid,
    name: String,
    register_date: DateTime<Utc>,
    logs: Vec<LogListing>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogListing {
    id: String,
    create_date: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LogStatsBody {
    log_id: String,
    entries_count: u32,
    last_entry_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    command_names: Option<Vec<String>>,
}

pub fn app(db: Db) -> Router {
    Router::new()
        .route("/api/Clients", get(list_clients))
        .route("/api/Logging/{client_id}", get(log_stats))
        .route("/api/Logging/{client_id}/{log_id}", post(post_message))
        .route("/api/Logging/{client_id}/{log_id}/p", get(latest_page))
        .route("/api/Logging/{client_id}/{log_id}/p/{page}", get(entries_page))
        .route("/api/Logging/{client_id}/{log_id}/id", get(last_entry))
        .route("/api/Logging/{client_id}/{log_id}/id/{entry_id}", get(entry_by_id))
        .route("/api/Logging/{client_id}/{log_id}/pfd/{date}", get(page_for_date))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app(db)).await
}

#[derive(Deserialize)]
struct TokenQuery {
    #[serde(default)]
    token: String,
}

fn find_log<'a>(
    state: &'a ServiceState,
    client_id: Uuid,
    log_id: &str,
) -> Result<&'a LogRecord, StatusCode> {
    state
        .clients
        .iter()
        .find(|c| c.id == client_id)
        .ok_or(StatusCode::NOT_FOUND)?
        .logs
        .iter()
        .find(|l| l.id == log_id)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_clients(
    State(db): State<Db>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Vec<ClientListing>>, StatusCode> {
    let state = db.read().await;
    if query.token.is_empty() || query.token != state.admin_token {
        return Err(StatusCode::FORBIDDEN);
    }
    let listing = state
        .clients
        .iter()
        .map(|c| ClientListing {
            id: c.id,
            name: c.name.clone(),
            register_date: c.register_date,
            logs: c
                .logs
                .iter()
                .map(|l| LogListing {
                    id: l.id.clone(),
                    create_date: l.create_date,
                })
                .collect(),
        })
        .collect();
    Ok(Json(listing))
}

async fn log_stats(
    State(db): State<Db>,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<LogStatsBody>>, StatusCode> {
    let state = db.read().await;
    let client = state
        .clients
        .iter()
        .find(|c| c.id == client_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let stats = client
        .logs
        .iter()
        .map(|l| LogStatsBody {
            log_id: l.id.clone(),
            entries_count: l.entries.len() as u32,
            // Empty logs report the epoch sentinel.
            last_entry_date: l
                .entries
                .last()
                .map(|e| e.timestamp)
                .unwrap_or(DateTime::UNIX_EPOCH),
            command_names: l.command_names.clone(),
        })
        .collect();
    Ok(Json(stats))
}

async fn post_message(
    State(db): State<Db>,
    Path((client_id, log_id)): Path<(Uuid, String)>,
    Json(message): Json<String>,
) -> Result<Json<bool>, StatusCode> {
    let mut state = db.write().await;
    let log = state
        .clients
        .iter_mut()
        .find(|c| c.id == client_id)
        .ok_or(StatusCode::NOT_FOUND)?
        .logs
        .iter_mut()
        .find(|l| l.id == log_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let id = log.entries.len() as u32 + 1;
    log.entries.push(EntryRecord {
        id,
        timestamp: Utc::now(),
        data: message,
    });
    Ok(Json(true))
}

fn page_slice(entries: &[EntryRecord], page: u32) -> Vec<EntryRecord> {
    entries
        .iter()
        .skip(page as usize * PAGE_SIZE as usize)
        .take(PAGE_SIZE as usize)
        .cloned()
        .collect()
}

fn latest_page_index(entries: &[EntryRecord]) -> u32 {
    match entries.len() as u32 {
        0 => 0,
        n => (n - 1) / PAGE_SIZE,
    }
}

async fn entries_page(
    State(db): State<Db>,
    Path((client_id, log_id, page)): Path<(Uuid, String, u32)>,
) -> Result<Json<Vec<EntryRecord>>, StatusCode> {
    let state = db.read().await;
    let log = find_log(&state, client_id, &log_id)?;
    Ok(Json(page_slice(&log.entries, page)))
}

async fn latest_page(
    State(db): State<Db>,
    Path((client_id, log_id)): Path<(Uuid, String)>,
) -> Result<Json<Vec<EntryRecord>>, StatusCode> {
    let state = db.read().await;
    let log = find_log(&state, client_id, &log_id)?;
    Ok(Json(page_slice(&log.entries, latest_page_index(&log.entries))))
}

async fn entry_by_id(
    State(db): State<Db>,
    Path((client_id, log_id, entry_id)): Path<(Uuid, String, u32)>,
) -> Result<Json<EntryRecord>, StatusCode> {
    let state = db.read().await;
    let log = find_log(&state, client_id, &log_id)?;
    log.entries
        .iter()
        .find(|e| e.id == entry_id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn last_entry(
    State(db): State<Db>,
    Path((client_id, log_id)): Path<(Uuid, String)>,
) -> Result<Json<EntryRecord>, StatusCode> {
    let state = db.read().await;
    let log = find_log(&state, client_id, &log_id)?;
    log.entries.last().cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn page_for_date(
    State(db): State<Db>,
    Path((client_id, log_id, date)): Path<(Uuid, String, String)>,
) -> Result<Json<i64>, StatusCode> {
    let date: NaiveDate = date.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let state = db.read().await;
    let log = find_log(&state, client_id, &log_id)?;
    let index = log
        .entries
        .iter()
        .find(|e| e.timestamp.date_naive() == date)
        .map(|e| i64::from((e.id - 1) / PAGE_SIZE))
        .unwrap_or(-1);
    Ok(Json(index))
}
