//! Synchronous client library for the remote logging service.
//!
//! # Overview
//! Discovers registered clients, fetches per-client log statistics, appends
//! log messages, and retrieves entries by page, by id, or by calendar date.
//! Each operation is one independent HTTP round trip against the service's
//! REST surface; the client holds no state beyond its configuration (base
//! address, admin token, timeout).
//!
//! # Design
//! - `LogServiceClient` splits every operation into `build_*` (produces an
//!   `HttpRequest`) and `parse_*` (consumes an `HttpResponse`), so the
//!   request/response mapping is testable without a network; the public
//!   operation methods execute the round trip with ureq.
//! - "Latest" selectors (page, entry id) are `Option<u32>` — `None` omits
//!   the trailing path segment and lets the service resolve the most recent
//!   page or last entry.
//! - Absence (unknown log, unknown entry, no page for a date) is `Ok(None)`,
//!   never an error; the service's `-1` page sentinel is translated at this
//!   boundary.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::LogServiceClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{ClientInfo, LogEntry, LogInfo};
