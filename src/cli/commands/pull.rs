//! Pull files from the device
//!
//! Without `--out`, each file lands under `<output-root>/<category>/` based
//! on its remote path. Per-file failures do not abort the batch; the batch
//! fails only when nothing succeeded.

use crate::cli::Output;
use crate::config::Config;
use crate::error::Error;
use crate::model::Category;
use anyhow::Result;
use std::path::Path;

pub async fn execute(
    remotes: &[String],
    out: Option<&Path>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    let repo = super::repo(config)?;

    if let Some(out_dir) = out {
        let outcome = repo.download_many(remotes, out_dir).await?;
        for path in &outcome.downloaded {
            output.success(&format!("pulled {}", path.display()));
        }
        for (remote, detail) in &outcome.failures {
            output.error(&format!("{}: {}", remote, detail));
        }
        return Ok(());
    }

    let pb = output.progress_bar(remotes.len() as u64, "pulling");
    let mut downloaded = 0usize;
    let mut failed = 0usize;
    for remote in remotes {
        let category = Category::from_path(remote);
        let out_dir = config.output_root.join(category.dir_name());
        match repo.download_file(remote, &out_dir).await {
            Ok(path) => {
                downloaded += 1;
                output.verbose(&format!("pulled {}", path.display()));
            }
            Err(e) => {
                failed += 1;
                output.error(&e.to_string());
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if downloaded == 0 && !remotes.is_empty() {
        return Err(Error::Download {
            remote: format!("{} files", remotes.len()),
            detail: "every pull in the batch failed".to_string(),
        }
        .into());
    }
    output.success(&format!("pulled {} file(s), {} failed", downloaded, failed));
    Ok(())
}
