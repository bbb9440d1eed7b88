//! Typed data model for extracted device data
//!
//! Everything the parsers produce and the report pipeline consumes lives
//! here. Records are immutable once created; fields that could not be
//! decoded carry the [`UNKNOWN`] sentinel instead of failing the batch.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Sentinel used wherever a single field could not be decoded
pub const UNKNOWN: &str = "unknown";

/// A connected device, discovered as a point-in-time snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceHandle {
    pub serial: String,
}

/// Content category assigned to a file by extension/MIME heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Image,
    Video,
    Document,
    Other,
}

impl Category {
    /// Directory name used under the output root for downloads of this category
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Video => "videos",
            Category::Document => "documents",
            Category::Other => "others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One file reported by a directory listing
///
/// Path and category are derived, never user-supplied. Uniqueness is by
/// absolute path within one listing. The recursive listing carries no
/// modification times, so `modified` is `None` until a richer source
/// populates it.
#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub category: Category,
    pub download_ref: String,
    pub modified: Option<DateTime<Local>>,
}

/// Result of one listing operation, in depth-first traversal order
///
/// An empty `entries` with a non-empty device answer means "directory listed,
/// nothing in it"; the empty-or-unreachable case is reported by the parser
/// before this struct is built.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryListing {
    pub root: String,
    pub entries: Vec<FileEntry>,
}

/// Call direction/status decoded from the call-log type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CallKind {
    Incoming,
    Outgoing,
    Missed,
    Voicemail,
    Rejected,
    Blocked,
    Unknown,
}

impl CallKind {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => CallKind::Incoming,
            "2" => CallKind::Outgoing,
            "3" => CallKind::Missed,
            "4" => CallKind::Voicemail,
            "5" => CallKind::Rejected,
            "6" => CallKind::Blocked,
            _ => CallKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CallKind::Incoming => "Incoming",
            CallKind::Outgoing => "Outgoing",
            CallKind::Missed => "Missed",
            CallKind::Voicemail => "Voicemail",
            CallKind::Rejected => "Rejected",
            CallKind::Blocked => "Blocked",
            CallKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One call-log record
#[derive(Debug, Clone, Serialize)]
pub struct CallLogEntry {
    pub date: String,
    pub number: String,
    pub kind: CallKind,
    pub duration_secs: String,
    pub contact: String,
}

/// Message box decoded from the SMS type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageKind {
    Received,
    Sent,
    Draft,
    Outbox,
    Failed,
    Queued,
    Unknown,
}

impl MessageKind {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => MessageKind::Received,
            "2" => MessageKind::Sent,
            "3" => MessageKind::Draft,
            "4" => MessageKind::Outbox,
            "5" => MessageKind::Failed,
            "6" => MessageKind::Queued,
            _ => MessageKind::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Received => "Received",
            MessageKind::Sent => "Sent",
            MessageKind::Draft => "Draft",
            MessageKind::Outbox => "Outbox",
            MessageKind::Failed => "Failed",
            MessageKind::Queued => "Queued",
            MessageKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One SMS record
#[derive(Debug, Clone, Serialize)]
pub struct MessageEntry {
    pub date: String,
    pub address: String,
    pub kind: MessageKind,
    pub body: String,
}

/// Fixed set of device properties queried over `getprop`
#[derive(Debug, Clone, Serialize)]
pub struct DeviceProperties {
    pub model: String,
    pub manufacturer: String,
    pub android_version: String,
    pub sdk: String,
    pub serial: String,
}

/// Battery and uptime snapshot from `dumpsys battery` / `uptime`
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub battery_level: String,
    pub battery_status: String,
    pub battery_health: String,
    pub uptime: String,
}

/// A generated report document persisted to storage
#[derive(Debug, Clone, Serialize)]
pub struct ReportArtifact {
    pub path: PathBuf,
    pub kind: String,
    pub generated_at: DateTime<Local>,
}
