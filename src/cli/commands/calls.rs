//! Show the call log

use crate::cli::{Output, OutputFormat};
use crate::config::Config;
use anyhow::Result;

pub async fn execute(config: &Config, output: &Output, format: OutputFormat) -> Result<()> {
    let repo = super::repo(config)?;
    let calls = repo.get_call_log().await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&calls)?);
        return Ok(());
    }

    if calls.is_empty() {
        output.warning("call log is empty");
        return Ok(());
    }
    output.section_header(&format!("Call log ({} entries)", calls.len()));
    for call in &calls {
        output.list_item(&format!(
            "{}  {:<10}  {:<16}  {}s  {}",
            call.date, call.kind, call.number, call.duration_secs, call.contact
        ));
    }
    Ok(())
}
