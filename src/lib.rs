//! # droidscout - device data extraction and reporting
//!
//! Exposes an attached Android-style device, reached through an external
//! adb-compatible bridge executable, as a browsable, categorized file and
//! metadata source, and renders extracted data into paginated PDF reports.
//!
//! ## Pipeline
//!
//! - **bridge**: invokes the bridge executable with a literal argument list
//!   under a bounded timeout
//! - **parser**: turns recursive-listing text and key=value records into the
//!   typed model, degrading bad fields to sentinels
//! - **category**: pure extension/MIME categorization
//! - **device**: the repository façade every higher layer goes through
//! - **filter**: category/prefix/date/limit narrowing in listing order
//! - **report**: staged PDF assembly and artifact storage
//!
//! ## Quick Start
//!
//! ```bash
//! droidscout devices
//! droidscout ls /sdcard --recursive
//! droidscout report media --category image --path-prefix /sdcard/DCIM
//! ```

pub mod bridge;
pub mod category;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod report;

pub use cli::{Cli, Output};
pub use config::Config;
pub use error::{Error, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
