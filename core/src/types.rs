//! Domain objects and transfer objects for the log service.
//!
//! # Design
//! Wire shapes mirror the service's camelCase JSON but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. `LogInfo` doubles as a bare id placeholder (constructed locally,
//! timestamps at the epoch sentinel) and as a populated statistics snapshot
//! (built from [`LogStatsDto`]); `details_loaded` tells the two apart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

fn unix_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// A registered client of the logging service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    /// Identifier assigned by the service; immutable after construction.
    pub id: Uuid,
    pub name: String,
    #[serde(default = "unix_epoch")]
    pub register_date: DateTime<Utc>,
    /// Logs owned by this client, in service order.
    #[serde(default)]
    pub logs: Vec<LogInfo>,
}

impl ClientInfo {
    /// Bare placeholder for a client whose id is already known, skipping the
    /// listing round trip.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            name: String::new(),
            register_date: DateTime::UNIX_EPOCH,
            logs: Vec::new(),
        }
    }

    /// Look up an owned log by id.
    pub fn log(&self, id: &str) -> Option<&LogInfo> {
        self.logs.iter().find(|l| l.id == id)
    }
}

/// Metadata for one log of a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogInfo {
    pub id: String,
    #[serde(default = "unix_epoch")]
    pub create_date: DateTime<Utc>,
    #[serde(default)]
    pub entries_count: u32,
    #[serde(default = "unix_epoch")]
    pub last_entry_date: DateTime<Utc>,
    /// Per-command usage counters, decoded from the statistics response.
    /// Never part of the wire shape.
    #[serde(skip)]
    pub command_usage: Option<Vec<(String, u32)>>,
}

impl LogInfo {
    /// Bare placeholder for a log whose id is already known.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            create_date: DateTime::UNIX_EPOCH,
            entries_count: 0,
            last_entry_date: DateTime::UNIX_EPOCH,
            command_usage: None,
        }
    }

    /// Whether real statistics were fetched for this log, as opposed to a
    /// bare id placeholder. True iff the last-entry date is later than the
    /// epoch sentinel.
    pub fn details_loaded(&self) -> bool {
        self.last_entry_date > DateTime::UNIX_EPOCH
    }

    /// Build a populated `LogInfo` from a statistics transfer object,
    /// decoding each `name/count` command string into a pair. A string
    /// without a `/`, or whose suffix is not an integer, fails the whole
    /// conversion.
    pub(crate) fn from_stats(dto: LogStatsDto) -> Result<Self, ApiError> {
        let command_usage = dto
            .command_names
            .map(|commands| {
                commands
                    .into_iter()
                    .map(|cmd| {
                        let (name, count) = cmd
                            .split_once('/')
                            .ok_or_else(|| ApiError::CommandFormatError(cmd.clone()))?;
                        let count: u32 = count
                            .parse()
                            .map_err(|_| ApiError::CommandFormatError(cmd.clone()))?;
                        Ok((name.to_string(), count))
                    })
                    .collect::<Result<Vec<_>, ApiError>>()
            })
            .transpose()?;

        Ok(Self {
            id: dto.log_id,
            create_date: DateTime::UNIX_EPOCH,
            entries_count: dto.entries_count,
            last_entry_date: dto.last_entry_date,
            command_usage,
        })
    }
}

/// One record within a log. Ids are 1-based and increase in append order;
/// id 0 never exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: u32,
    pub timestamp: DateTime<Utc>,
    pub data: String,
}

/// Statistics transfer object, one per log, as returned by the per-client
/// logging endpoint. Consumed once to build a [`LogInfo`], then discarded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LogStatsDto {
    pub log_id: String,
    pub entries_count: u32,
    #[serde(default = "unix_epoch")]
    pub last_entry_date: DateTime<Utc>,
    pub command_names: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn stats(commands: Option<Vec<&str>>) -> LogStatsDto {
        LogStatsDto {
            log_id: "status".to_string(),
            entries_count: 42,
            last_entry_date: Utc.with_ymd_and_hms(2023, 3, 15, 10, 30, 0).unwrap(),
            command_names: commands.map(|c| c.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn placeholder_log_has_no_details() {
        let log = LogInfo::new("status");
        assert_eq!(log.id, "status");
        assert_eq!(log.entries_count, 0);
        assert!(!log.details_loaded());
    }

    #[test]
    fn from_stats_marks_details_loaded() {
        let log = LogInfo::from_stats(stats(None)).unwrap();
        assert_eq!(log.id, "status");
        assert_eq!(log.entries_count, 42);
        assert!(log.details_loaded());
        assert!(log.command_usage.is_none());
    }

    #[test]
    fn from_stats_decodes_command_usage() {
        let log = LogInfo::from_stats(stats(Some(vec!["save/3", "load/12"]))).unwrap();
        let usage = log.command_usage.unwrap();
        assert_eq!(
            usage,
            vec![("save".to_string(), 3), ("load".to_string(), 12)]
        );
    }

    #[test]
    fn from_stats_rejects_command_without_slash() {
        let err = LogInfo::from_stats(stats(Some(vec!["save"]))).unwrap_err();
        assert!(matches!(err, ApiError::CommandFormatError(_)));
    }

    #[test]
    fn from_stats_rejects_non_integer_count() {
        let err = LogInfo::from_stats(stats(Some(vec!["save/many"]))).unwrap_err();
        assert!(matches!(err, ApiError::CommandFormatError(_)));
    }

    #[test]
    fn from_stats_rejects_extra_slash() {
        // Split happens on the first '/', so the remainder must be a bare
        // integer.
        let err = LogInfo::from_stats(stats(Some(vec!["save/3/4"]))).unwrap_err();
        assert!(matches!(err, ApiError::CommandFormatError(_)));
    }

    #[test]
    fn client_log_lookup() {
        let mut client = ClientInfo::new(Uuid::nil());
        client.logs.push(LogInfo::new("status"));
        client.logs.push(LogInfo::new("errors"));

        assert_eq!(client.log("errors").unwrap().id, "errors");
        assert!(client.log("missing").is_none());
    }

    #[test]
    fn client_listing_deserializes() {
        let json = r#"{
            "id": "c19f8597-2a7c-412e-a14b-002aa6d025f0",
            "name": "Terminal 3",
            "registerDate": "2023-01-10T08:00:00Z",
            "logs": [{"id": "status", "createDate": "2023-01-10T08:05:00Z"}]
        }"#;
        let client: ClientInfo = serde_json::from_str(json).unwrap();
        assert_eq!(client.name, "Terminal 3");
        assert_eq!(client.logs.len(), 1);
        let log = &client.logs[0];
        assert_eq!(log.id, "status");
        // The listing carries no statistics.
        assert!(!log.details_loaded());
        assert_eq!(log.entries_count, 0);
    }

    #[test]
    fn log_entry_deserializes() {
        let json = r#"{"id": 7, "timestamp": "2023-03-15T10:30:00Z", "data": "started"}"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.data, "started");
    }

    #[test]
    fn stats_dto_deserializes_without_commands() {
        let json = r#"{"logId": "status", "entriesCount": 3, "lastEntryDate": "2023-03-15T10:30:00Z"}"#;
        let dto: LogStatsDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.log_id, "status");
        assert_eq!(dto.entries_count, 3);
        assert!(dto.command_names.is_none());
    }
}
