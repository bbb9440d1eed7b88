//! Show device properties

use crate::cli::{Output, OutputFormat};
use crate::config::Config;
use anyhow::Result;

pub async fn execute(config: &Config, output: &Output, format: OutputFormat) -> Result<()> {
    let repo = super::repo(config)?;
    let props = repo.get_properties().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&props)?);
        return Ok(());
    }

    output.section_header("Device properties");
    output.table_row("model", &props.model);
    output.table_row("manufacturer", &props.manufacturer);
    output.table_row("android version", &props.android_version);
    output.table_row("sdk", &props.sdk);
    output.table_row("serial", &props.serial);
    Ok(())
}
