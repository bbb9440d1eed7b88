//! Report generation and retrieval
//!
//! Ties the pipeline together: list → filter → download → build → store.

use crate::cli::{Output, OutputFormat, ReportCommands};
use crate::config::Config;
use crate::error::Error;
use crate::filter::FileFilter;
use crate::model::Category;
use crate::report::{ReportBuilder, ReportKind, ReportStore};
use anyhow::{anyhow, bail, Context as _, Result};
use chrono::{DateTime, Local, NaiveDate};
use std::path::PathBuf;

pub async fn execute(
    cmd: ReportCommands,
    config: &Config,
    output: &Output,
    format: OutputFormat,
) -> Result<()> {
    match cmd {
        ReportCommands::Media {
            category,
            directory,
            path_prefix,
            after,
            before,
            limit,
        } => {
            let mut filter = FileFilter::new(category, limit.unwrap_or(config.default_limit));
            filter.path_prefix = path_prefix;
            filter.after = after.as_deref().map(|s| parse_day(s, false)).transpose()?;
            filter.before = before.as_deref().map(|s| parse_day(s, true)).transpose()?;
            media_report(
                config,
                output,
                &directory,
                filter,
                ReportKind::Media(category),
            )
            .await
        }
        ReportCommands::Camera { limit } => {
            let filter = FileFilter::new(
                Category::Image,
                limit.unwrap_or(config.default_limit),
            );
            let directory = config.camera_dir.clone();
            media_report(config, output, &directory, filter, ReportKind::Camera).await
        }
        ReportCommands::Calls => calls_report(config, output).await,
        ReportCommands::Sms => sms_report(config, output).await,
        ReportCommands::Show { kind, category } => show(&kind, category, config, format),
    }
}

/// Inclusive day bound: start-of-day for `--after`, end-of-day for `--before`
fn parse_day(raw: &str, end_of_day: bool) -> Result<DateTime<Local>> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))?;
    let naive = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| anyhow!("invalid time of day"))?;
    naive
        .and_local_timezone(Local)
        .single()
        .ok_or_else(|| anyhow!("ambiguous local time for '{}'", raw))
}

/// Count occurrences of each label, preserving first-seen order
fn label_counts<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(l, _)| l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label.to_string(), 1)),
        }
    }
    counts
}

/// Shared pipeline for the filtered media report and the camera auto-report
async fn media_report(
    config: &Config,
    output: &Output,
    directory: &str,
    filter: FileFilter,
    kind: ReportKind,
) -> Result<()> {
    let repo = super::repo(config)?;
    let store = ReportStore::new(&config.output_root);
    let category = filter.category;

    output.verbose(&format!("listing {} recursively", directory));
    let listing = repo.list_files(directory, true).await?;
    let root = listing.root;
    let mut entries = listing.entries;

    // the recursive listing carries no timestamps, so a date bound needs a
    // stat pass over the entries that survive the category/prefix narrowing
    if filter.needs_dates() {
        entries = filter.candidates(&entries);
        output.verbose(&format!(
            "resolving modification times for {} candidates",
            entries.len()
        ));
        repo.populate_modified(&mut entries).await;
    }

    let selected = filter.apply(&entries);
    if selected.is_empty() {
        return Err(Error::NotFound(format!(
            "{} files under '{}' matching the filter",
            category, root
        ))
        .into());
    }

    let out_dir = config.output_root.join(category.dir_name());
    let pb = output.progress_bar(selected.len() as u64, "pulling");
    let mut locals: Vec<Option<PathBuf>> = Vec::with_capacity(selected.len());
    for entry in &selected {
        match repo.download_file(&entry.path, &out_dir).await {
            Ok(path) => locals.push(Some(path)),
            Err(e) => {
                output.error(&e.to_string());
                locals.push(None);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let downloaded = locals.iter().flatten().count();
    if downloaded == 0 {
        return Err(Error::Download {
            remote: format!("{} files", selected.len()),
            detail: "every pull in the batch failed".to_string(),
        }
        .into());
    }

    let mut builder = ReportBuilder::new("Media report")?;
    builder.header(
        "Media report",
        &format!("category: {}, directory: {}", category, root),
    )?;
    builder.summary(&[
        ("matched".to_string(), selected.len()),
        ("downloaded".to_string(), downloaded),
        ("failed".to_string(), selected.len() - downloaded),
    ])?;
    for (entry, local) in selected.iter().zip(&locals) {
        builder.media_section(entry, local.as_deref())?;
    }

    let artifact = builder.finalize(&store, kind)?;
    output.success(&format!("report written to {}", artifact.path.display()));
    Ok(())
}

async fn calls_report(config: &Config, output: &Output) -> Result<()> {
    let repo = super::repo(config)?;
    let store = ReportStore::new(&config.output_root);
    let calls = repo.get_call_log().await?;

    let mut builder = ReportBuilder::new("Call log report")?;
    builder.header("Call log report", &format!("{} entries", calls.len()))?;
    builder.summary(&label_counts(calls.iter().map(|c| c.kind.label())))?;
    builder.section_heading("Calls")?;
    for call in &calls {
        builder.call_row(call)?;
    }

    let artifact = builder.finalize(&store, ReportKind::Calls)?;
    output.success(&format!("report written to {}", artifact.path.display()));
    Ok(())
}

async fn sms_report(config: &Config, output: &Output) -> Result<()> {
    let repo = super::repo(config)?;
    let store = ReportStore::new(&config.output_root);
    let messages = repo.get_sms_log().await?;

    let mut builder = ReportBuilder::new("SMS report")?;
    builder.header("SMS report", &format!("{} entries", messages.len()))?;
    builder.summary(&label_counts(messages.iter().map(|m| m.kind.label())))?;
    builder.section_heading("Messages")?;
    for message in &messages {
        builder.message_row(message)?;
    }

    let artifact = builder.finalize(&store, ReportKind::Sms)?;
    output.success(&format!("report written to {}", artifact.path.display()));
    Ok(())
}

fn show(
    kind: &str,
    category: Option<Category>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let store = ReportStore::new(&config.output_root);
    let kind = match kind {
        "calls" => ReportKind::Calls,
        "sms" => ReportKind::Sms,
        "camera" => ReportKind::Camera,
        "media" => match category {
            Some(category) => ReportKind::Media(category),
            None => bail!("`report show media` requires --category"),
        },
        other => bail!("unknown report kind '{}'", other),
    };
    let path = store.path_for(kind)?;
    if format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "path": path }))?
        );
    } else {
        println!("{}", path.display());
    }
    Ok(())
}
