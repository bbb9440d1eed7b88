//! Show the SMS log

use crate::cli::{Output, OutputFormat};
use crate::config::Config;
use anyhow::Result;

pub async fn execute(config: &Config, output: &Output, format: OutputFormat) -> Result<()> {
    let repo = super::repo(config)?;
    let messages = repo.get_sms_log().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        output.warning("sms log is empty");
        return Ok(());
    }
    output.section_header(&format!("SMS log ({} entries)", messages.len()));
    for message in &messages {
        output.list_item(&format!(
            "{}  {:<8}  {:<16}  {}",
            message.date, message.kind, message.address, message.body
        ));
    }
    Ok(())
}
