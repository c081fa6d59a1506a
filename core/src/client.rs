//! Request builder, response parser, and executing façade for the log
//! service API.
//!
//! # Design
//! `LogServiceClient` holds the service address plus two mutable
//! configuration fields (admin token, timeout) that are read at call time.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`,
//! keeping the mapping layer deterministic and testable without a network.
//! The public operation methods combine the two through `http::execute`,
//! one independent round trip per call.

use std::time::Duration;

use chrono::NaiveDate;
use tracing::warn;

use crate::error::ApiError;
use crate::http::{self, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ClientInfo, LogEntry, LogInfo, LogStatsDto};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Synchronous client for the remote logging service.
///
/// Constructed from the service base address (required, non-empty). The
/// admin token and timeout may be reassigned between calls; mutating them
/// while requests are in flight is the caller's responsibility to avoid —
/// the client does not guard against it.
#[derive(Debug, Clone)]
pub struct LogServiceClient {
    service_address: String,

    /// Admin API token, required only by [`get_all_clients`].
    ///
    /// [`get_all_clients`]: LogServiceClient::get_all_clients
    pub admin_api_token: Option<String>,

    /// Per-request timeout. Defaults to 5 seconds.
    pub timeout: Duration,
}

impl LogServiceClient {
    pub fn new(service_address: &str) -> Self {
        Self {
            service_address: service_address.trim_end_matches('/').to_string(),
            admin_api_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Base URL with the `api` prefix baked in.
    fn api_url(&self) -> String {
        format!("{}/api", self.service_address)
    }

    // --- request building ---

    pub fn build_get_all_clients(&self) -> Result<HttpRequest, ApiError> {
        let token = self
            .admin_api_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApiError::MissingAdminToken)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/Clients?token={token}", self.api_url()),
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_get_log_stats(&self, client: &ClientInfo) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/Logging/{}", self.api_url(), client.id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_post_log_message(
        &self,
        client: &ClientInfo,
        log: &LogInfo,
        message: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(message).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/Logging/{}/{}", self.api_url(), client.id, log.id),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_get_entries(
        &self,
        client: &ClientInfo,
        log: &LogInfo,
        page: Option<u32>,
    ) -> HttpRequest {
        let base = format!("{}/Logging/{}/{}/p", self.api_url(), client.id, log.id);
        HttpRequest {
            method: HttpMethod::Get,
            // No page segment means "most recent page".
            path: match page {
                Some(p) => format!("{base}/{p}"),
                None => base,
            },
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_entry(
        &self,
        client: &ClientInfo,
        log: &LogInfo,
        entry_id: Option<u32>,
    ) -> HttpRequest {
        let base = format!("{}/Logging/{}/{}/id", self.api_url(), client.id, log.id);
        HttpRequest {
            method: HttpMethod::Get,
            // No id segment means "last entry".
            path: match entry_id {
                Some(id) => format!("{base}/{id}"),
                None => base,
            },
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_page_index_for_date(
        &self,
        client: &ClientInfo,
        log: &LogInfo,
        date: NaiveDate,
    ) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}/Logging/{}/{}/pfd/{}",
                self.api_url(),
                client.id,
                log.id,
                date.format("%Y-%m-%d")
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    // --- response parsing ---

    pub fn parse_get_all_clients(&self, response: HttpResponse) -> Result<Vec<ClientInfo>, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Pick the statistics object whose log id equals `log_id`
    /// (case-sensitive, first match) and build a populated `LogInfo` from
    /// it. `Ok(None)` when the client has no log with that id.
    pub fn parse_get_log_info(
        &self,
        response: HttpResponse,
        log_id: &str,
    ) -> Result<Option<LogInfo>, ApiError> {
        check_success(&response)?;
        let stats: Vec<LogStatsDto> = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        stats
            .into_iter()
            .find(|s| s.log_id == log_id)
            .map(LogInfo::from_stats)
            .transpose()
    }

    /// Non-success statuses are a service-side rejection of the post and
    /// read as `Ok(false)`; a success status carries the service's own
    /// boolean verdict in the body.
    pub fn parse_post_log_message(&self, response: HttpResponse) -> Result<bool, ApiError> {
        if check_success(&response).is_err() {
            return Ok(false);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_get_entries(&self, response: HttpResponse) -> Result<Vec<LogEntry>, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_get_entry(&self, response: HttpResponse) -> Result<Option<LogEntry>, ApiError> {
        if response.status == 404 {
            return Ok(None);
        }
        check_success(&response)?;
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// The service answers `-1` when no entries exist on the requested
    /// date; that sentinel becomes `Ok(None)` and never reaches callers.
    pub fn parse_get_page_index_for_date(
        &self,
        response: HttpResponse,
    ) -> Result<Option<u32>, ApiError> {
        check_success(&response)?;
        let index: i64 = serde_json::from_str(response.body.trim())
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        match index {
            -1 => Ok(None),
            i => u32::try_from(i)
                .map(Some)
                .map_err(|_| ApiError::DeserializationError(format!("unexpected page index {i}"))),
        }
    }

    // --- operations ---

    /// Fetch every registered client, in the order the service returns
    /// them. Requires a non-blank admin token; fails with
    /// `MissingAdminToken` before any network I/O otherwise.
    pub fn get_all_clients(&self) -> Result<Vec<ClientInfo>, ApiError> {
        let request = self.build_get_all_clients()?;
        self.parse_get_all_clients(http::execute(request, self.timeout)?)
    }

    /// Fetch statistics for one of `client`'s logs. `Ok(None)` when the
    /// client has no log with that id — distinct from transport failure.
    pub fn get_log_info(
        &self,
        client: &ClientInfo,
        log_id: &str,
    ) -> Result<Option<LogInfo>, ApiError> {
        let request = self.build_get_log_stats(client);
        self.parse_get_log_info(http::execute(request, self.timeout)?, log_id)
    }

    /// Append a message to a log. Returns the boolean verdict the service
    /// sends on success; every transport-level failure (connection error,
    /// timeout, non-success status) yields `Ok(false)` instead of an error.
    pub fn post_log_message(
        &self,
        client: &ClientInfo,
        log: &LogInfo,
        message: &str,
    ) -> Result<bool, ApiError> {
        let request = self.build_post_log_message(client, log, message)?;
        match http::execute(request, self.timeout) {
            Ok(response) => self.parse_post_log_message(response),
            Err(e) => {
                warn!(error = %e, "log message dropped on transport failure");
                Ok(false)
            }
        }
    }

    /// Fetch one page of entries, in service order. `None` requests the
    /// most recent page; an out-of-range page yields an empty list.
    pub fn get_entries(
        &self,
        client: &ClientInfo,
        log: &LogInfo,
        page: Option<u32>,
    ) -> Result<Vec<LogEntry>, ApiError> {
        let request = self.build_get_entries(client, log, page);
        self.parse_get_entries(http::execute(request, self.timeout)?)
    }

    /// Fetch a single entry. `None` requests the last entry in the log;
    /// an id that does not exist yields `Ok(None)`.
    pub fn get_entry(
        &self,
        client: &ClientInfo,
        log: &LogInfo,
        entry_id: Option<u32>,
    ) -> Result<Option<LogEntry>, ApiError> {
        let request = self.build_get_entry(client, log, entry_id);
        self.parse_get_entry(http::execute(request, self.timeout)?)
    }

    /// Resolve the page index holding the first entry written on `date`,
    /// or `Ok(None)` when no entries exist for that date.
    pub fn get_page_index_for_date(
        &self,
        client: &ClientInfo,
        log: &LogInfo,
        date: NaiveDate,
    ) -> Result<Option<u32>, ApiError> {
        let request = self.build_get_page_index_for_date(client, log, date);
        self.parse_get_page_index_for_date(http::execute(request, self.timeout)?)
    }
}

/// Map non-success status codes to `ApiError::HttpError`.
fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
