//! Command implementations for the droidscout CLI
//!
//! Each command lives in its own module and receives the resolved
//! configuration and output handler.

pub mod calls;
pub mod devices;
pub mod ls;
pub mod props;
pub mod pull;
pub mod report;
pub mod sms;
pub mod sysinfo;

use crate::bridge::Bridge;
use crate::config::Config;
use crate::device::DeviceRepo;
use anyhow::Result;

/// Build the device repository for commands that talk to the device
pub(crate) fn repo(config: &Config) -> Result<DeviceRepo> {
    Ok(DeviceRepo::new(Bridge::new(config)?))
}
