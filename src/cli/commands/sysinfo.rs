//! Show battery and uptime information

use crate::cli::{Output, OutputFormat};
use crate::config::Config;
use anyhow::Result;

pub async fn execute(config: &Config, output: &Output, format: OutputFormat) -> Result<()> {
    let repo = super::repo(config)?;
    let info = repo.get_system_info().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    output.section_header("System information");
    output.table_row("battery level", &info.battery_level);
    output.table_row("battery status", &info.battery_status);
    output.table_row("battery health", &info.battery_health);
    output.table_row("uptime", &info.uptime);
    Ok(())
}
