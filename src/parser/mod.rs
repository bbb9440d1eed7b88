//! Parsers for the bridge tool's semi-structured text output
//!
//! Two modes: recursive directory listings (`ls -R`) and line-oriented
//! key=value records (`content query`). Both parse tolerantly: garbled
//! fields degrade to sentinels, never to a failed batch.

pub mod listing;
pub mod records;

pub use listing::{parse_recursive_listing, ListedFile, Listing};
pub use records::{parse_call_log, parse_sms_log};
