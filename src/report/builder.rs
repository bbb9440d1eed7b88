//! Staged report assembly
//!
//! Lifecycle: `Initialized → HeaderWritten → SectionsWritten(N) → Finalized`.
//! Each transition is one-way; `finalize` consumes the builder, so nothing
//! can be appended afterwards. Every record renders independently; one
//! unembeddable asset inserts a visible placeholder and the document
//! continues.

use crate::error::{Error, Result};
use crate::model::{CallLogEntry, FileEntry, MessageEntry, ReportArtifact};
use crate::report::pdf::Document;
use crate::report::store::{ReportKind, ReportStore};
use chrono::Local;
use std::path::Path;
use tracing::warn;

const TITLE_PT: f32 = 18.0;
const HEADING_PT: f32 = 13.0;
const BODY_PT: f32 = 10.0;
const MAX_LINE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Initialized,
    HeaderWritten,
    SectionsWritten,
}

/// Replace anything the embedded font cannot render with `?`
///
/// The builtin Helvetica is WinAnsi-only; pictographs and other non-ASCII
/// code points would come out as garbage glyphs.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}

/// Truncate to the display width with an ellipsis
fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

fn display(text: &str) -> String {
    clip(&sanitize(text), MAX_LINE_CHARS)
}

/// Assembles one paginated report document
pub struct ReportBuilder {
    doc: Document,
    stage: Stage,
    sections: usize,
}

impl ReportBuilder {
    pub fn new(title: &str) -> Result<Self> {
        Ok(Self {
            doc: Document::new(title)?,
            stage: Stage::Initialized,
            sections: 0,
        })
    }

    /// Write the report header; allowed exactly once, before anything else
    pub fn header(&mut self, title: &str, subtitle: &str) -> Result<()> {
        if self.stage != Stage::Initialized {
            return Err(Error::Report(
                "header must be written first and only once".to_string(),
            ));
        }
        self.doc.text_line(&display(title), TITLE_PT);
        self.doc.gap(2.0);
        self.doc.text_line(&display(subtitle), BODY_PT);
        self.doc.text_line(
            &format!("Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
            BODY_PT,
        );
        self.doc.gap(4.0);
        self.stage = Stage::HeaderWritten;
        Ok(())
    }

    /// Summary statistics over the full filtered set; must precede any
    /// section so the counts reflect the whole input, not a rendered prefix
    pub fn summary(&mut self, counts: &[(String, usize)]) -> Result<()> {
        if self.stage != Stage::HeaderWritten || self.sections > 0 {
            return Err(Error::Report(
                "summary belongs between the header and the first section".to_string(),
            ));
        }
        self.doc.text_line("Summary", HEADING_PT);
        for (label, count) in counts {
            self.doc
                .text_line(&display(&format!("  {}: {}", label, count)), BODY_PT);
        }
        self.doc.gap(4.0);
        Ok(())
    }

    fn enter_section(&mut self) -> Result<()> {
        match self.stage {
            Stage::Initialized => Err(Error::Report(
                "sections require the header to be written first".to_string(),
            )),
            Stage::HeaderWritten | Stage::SectionsWritten => {
                self.stage = Stage::SectionsWritten;
                self.sections += 1;
                Ok(())
            }
        }
    }

    /// One media record: its own page with the filename and the image, or a
    /// visible placeholder when the asset cannot be embedded
    pub fn media_section(&mut self, entry: &FileEntry, local: Option<&Path>) -> Result<()> {
        self.enter_section()?;
        self.doc.new_page();
        self.doc
            .text_line(&display(&format!("Filename: {}", entry.name)), HEADING_PT);
        self.doc
            .text_line(&display(&format!("Remote path: {}", entry.path)), BODY_PT);
        self.doc.gap(4.0);

        match local {
            None => {
                self.doc
                    .text_line("[file could not be downloaded from the device]", BODY_PT);
            }
            Some(path) => {
                if let Err(e) = self.doc.image(path) {
                    warn!(path = %path.display(), error = %e, "asset failed to embed");
                    self.doc
                        .text_line("[image could not be embedded]", BODY_PT);
                }
            }
        }
        Ok(())
    }

    /// One call-log row
    pub fn call_row(&mut self, entry: &CallLogEntry) -> Result<()> {
        self.enter_section()?;
        let line = format!(
            "{}  {:<10}  {:<16}  {:>5}s  {}",
            entry.date, entry.kind, entry.number, entry.duration_secs, entry.contact
        );
        self.doc.text_line(&display(&line), BODY_PT);
        Ok(())
    }

    /// One SMS row
    pub fn message_row(&mut self, entry: &MessageEntry) -> Result<()> {
        self.enter_section()?;
        let line = format!(
            "{}  {:<8}  {:<16}  {}",
            entry.date, entry.kind, entry.address, entry.body
        );
        self.doc.text_line(&display(&line), BODY_PT);
        Ok(())
    }

    /// A small heading between groups of rows
    pub fn section_heading(&mut self, text: &str) -> Result<()> {
        self.enter_section()?;
        self.doc.gap(2.0);
        self.doc.text_line(&display(text), HEADING_PT);
        Ok(())
    }

    /// Number of sections written so far
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Write the artifact through the store, consuming the builder
    pub fn finalize(self, store: &ReportStore, kind: ReportKind) -> Result<ReportArtifact> {
        let generated_at = Local::now();
        let path = store.allocate(kind, generated_at)?;
        self.doc.save(&path)?;
        Ok(ReportArtifact {
            path,
            kind: kind.label(),
            generated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallKind, Category};
    use tempfile::TempDir;

    fn image_entry(name: &str) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            path: format!("/sdcard/DCIM/{}", name),
            category: Category::Image,
            download_ref: String::new(),
            modified: None,
        }
    }

    #[test]
    fn missing_asset_still_finalizes_with_a_placeholder() {
        let dir = TempDir::new().unwrap();
        let store = ReportStore::new(dir.path());
        let mut builder = ReportBuilder::new("media").unwrap();
        builder.header("Media report", "category: images").unwrap();
        builder
            .summary(&[("matched".to_string(), 1), ("downloaded".to_string(), 0)])
            .unwrap();
        builder
            .media_section(&image_entry("gone.jpg"), Some(&dir.path().join("gone.jpg")))
            .unwrap();
        let artifact = builder
            .finalize(&store, ReportKind::Media(Category::Image))
            .unwrap();
        assert!(artifact.path.is_file());
        assert!(std::fs::metadata(&artifact.path).unwrap().len() > 0);
    }

    #[test]
    fn sections_before_header_are_rejected() {
        let mut builder = ReportBuilder::new("calls").unwrap();
        let entry = CallLogEntry {
            date: "2023-11-14 00:00:00".to_string(),
            number: "12345".to_string(),
            kind: CallKind::Incoming,
            duration_secs: "30".to_string(),
            contact: "unknown".to_string(),
        };
        let err = builder.call_row(&entry).expect_err("no header yet");
        assert!(matches!(err, Error::Report(_)));
    }

    #[test]
    fn header_twice_is_rejected() {
        let mut builder = ReportBuilder::new("calls").unwrap();
        builder.header("a", "b").unwrap();
        assert!(builder.header("a", "b").is_err());
    }

    #[test]
    fn summary_after_first_section_is_rejected() {
        let mut builder = ReportBuilder::new("sms").unwrap();
        builder.header("SMS report", "").unwrap();
        builder.section_heading("Messages").unwrap();
        let err = builder
            .summary(&[("Sent".to_string(), 1)])
            .expect_err("too late for summary");
        assert!(matches!(err, Error::Report(_)));
    }

    #[test]
    fn text_is_sanitized_and_clipped() {
        assert_eq!(sanitize("hello 🚀 world"), "hello ? world");
        assert_eq!(sanitize("tab\there"), "tab?here");
        let long = "x".repeat(150);
        let clipped = clip(&long, 10);
        assert_eq!(clipped.chars().count(), 10);
        assert!(clipped.ends_with('…'));
        assert_eq!(clip("short", 10), "short");
    }
}
