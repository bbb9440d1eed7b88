//! On-disk location and naming of generated report artifacts
//!
//! Fixed-kind reports (calls, sms, the camera auto-report) use a fixed name
//! and overwrite on regenerate. Filtered media reports get a timestamp
//! suffix so successive filtered reports never clobber each other.

use crate::error::{Error, Result};
use crate::model::Category;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

/// A report kind determines its artifact name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Calls,
    Sms,
    Camera,
    Media(Category),
}

impl ReportKind {
    /// Fixed artifact name, if this kind overwrites on regenerate
    fn fixed_name(&self) -> Option<&'static str> {
        match self {
            ReportKind::Calls => Some("calls_report.pdf"),
            ReportKind::Sms => Some("sms_report.pdf"),
            ReportKind::Camera => Some("media_report.pdf"),
            ReportKind::Media(_) => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ReportKind::Calls => "calls".to_string(),
            ReportKind::Sms => "sms".to_string(),
            ReportKind::Camera => "camera".to_string(),
            ReportKind::Media(cat) => format!("media ({})", cat),
        }
    }
}

/// Manages `<output-root>/reports/`
pub struct ReportStore {
    reports_dir: PathBuf,
}

impl ReportStore {
    pub fn new(output_root: &Path) -> Self {
        Self {
            reports_dir: output_root.join("reports"),
        }
    }

    /// Pick the on-disk path a new artifact of this kind will be written to
    pub fn allocate(&self, kind: ReportKind, now: DateTime<Local>) -> Result<PathBuf> {
        fs::create_dir_all(&self.reports_dir)?;
        let name = match kind.fixed_name() {
            Some(fixed) => fixed.to_string(),
            None => {
                let ReportKind::Media(category) = kind else {
                    unreachable!("only media reports are timestamped");
                };
                format!("media_{}_{}.pdf", category, now.format("%Y%m%d_%H%M%S"))
            }
        };
        Ok(self.reports_dir.join(name))
    }

    /// Locate the current artifact for a kind; for timestamped media reports
    /// this is the most recent one for that category
    pub fn path_for(&self, kind: ReportKind) -> Result<PathBuf> {
        match kind.fixed_name() {
            Some(fixed) => {
                let path = self.reports_dir.join(fixed);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(Error::NotFound(format!("report '{}'", kind.label())))
                }
            }
            None => {
                let ReportKind::Media(category) = kind else {
                    unreachable!("only media reports are timestamped");
                };
                let prefix = format!("media_{}_", category);
                let mut candidates: Vec<PathBuf> = fs::read_dir(&self.reports_dir)
                    .map_err(|_| Error::NotFound(format!("report '{}'", kind.label())))?
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|p| {
                        p.file_name()
                            .and_then(|n| n.to_str())
                            .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(".pdf"))
                    })
                    .collect();
                // timestamp suffixes sort lexicographically
                candidates.sort();
                candidates
                    .pop()
                    .ok_or_else(|| Error::NotFound(format!("report '{}'", kind.label())))
            }
        }
    }
}
