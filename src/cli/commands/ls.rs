//! List files on the device, categorized

use crate::cli::{Output, OutputFormat};
use crate::config::Config;
use crate::filter::FileFilter;
use crate::model::Category;
use anyhow::Result;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    directory: &str,
    recursive: bool,
    category: Option<Category>,
    limit: Option<usize>,
    config: &Config,
    output: &Output,
    format: OutputFormat,
) -> Result<()> {
    let repo = super::repo(config)?;
    let mut listing = repo.list_files(directory, recursive).await?;

    if let Some(category) = category {
        let filter = FileFilter::new(category, limit.unwrap_or(config.default_limit));
        listing.entries = filter.apply(&listing.entries);
    } else if let Some(limit) = limit {
        listing.entries.truncate(limit);
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if listing.entries.is_empty() {
        output.warning(&format!(
            "'{}' is empty or unreachable (no entries)",
            listing.root
        ));
        return Ok(());
    }

    output.section_header(&format!("Files under {}", listing.root));
    for entry in &listing.entries {
        output.list_item(&format!("{}  [{}]", entry.path, entry.category));
    }
    output.blank_line();
    for cat in [
        Category::Image,
        Category::Video,
        Category::Document,
        Category::Other,
    ] {
        let count = listing.entries.iter().filter(|e| e.category == cat).count();
        output.table_row(cat.dir_name(), &count.to_string());
    }
    Ok(())
}
