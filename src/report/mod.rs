//! Report assembly and storage
//!
//! [`builder`] drives the document capability in [`pdf`] through a staged
//! lifecycle; [`store`] owns artifact naming and on-disk locations.

pub mod builder;
pub mod pdf;
pub mod store;

pub use builder::ReportBuilder;
pub use store::{ReportKind, ReportStore};
