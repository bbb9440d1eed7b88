//! List connected devices

use crate::cli::{Output, OutputFormat};
use crate::config::Config;
use anyhow::Result;

pub async fn execute(config: &Config, output: &Output, format: OutputFormat) -> Result<()> {
    let repo = super::repo(config)?;
    let devices = repo.list_devices().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    // zero devices is a valid, non-error result
    if devices.is_empty() {
        output.warning("no devices connected");
        return Ok(());
    }
    output.section_header("Connected devices");
    for device in &devices {
        output.list_item(&device.serial);
    }
    Ok(())
}
