//! Filtering over parsed file collections
//!
//! Narrowing is applied in a fixed order: category, path prefix, optional
//! inclusive date range, then a hard limit. The result keeps listing order
//! (depth-first traversal order as produced by the parser). No match is an
//! empty vector, never an error.

use crate::model::{Category, FileEntry};
use chrono::{DateTime, Local};

/// Filter parameters for one report/listing request
#[derive(Debug, Clone)]
pub struct FileFilter {
    pub category: Category,
    pub path_prefix: Option<String>,
    pub after: Option<DateTime<Local>>,
    pub before: Option<DateTime<Local>>,
    pub limit: usize,
}

impl FileFilter {
    pub fn new(category: Category, limit: usize) -> Self {
        Self {
            category,
            path_prefix: None,
            after: None,
            before: None,
            limit,
        }
    }

    /// Whether applying this filter needs modification times at all
    pub fn needs_dates(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// Category and path-prefix narrowing, without dates or the limit
    ///
    /// This is the candidate set a caller has to resolve modification
    /// times for before a date-bounded `apply` can mean anything.
    pub fn candidates(&self, entries: &[FileEntry]) -> Vec<FileEntry> {
        entries
            .iter()
            .filter(|e| self.shape_matches(e))
            .cloned()
            .collect()
    }

    fn shape_matches(&self, entry: &FileEntry) -> bool {
        entry.category == self.category
            && self
                .path_prefix
                .as_deref()
                .is_none_or(|p| entry.path.starts_with(p))
    }

    /// Entries without a known modification time cannot satisfy a date
    /// bound; they pass only when no bound is set.
    fn date_matches(&self, entry: &FileEntry) -> bool {
        if self.after.is_none() && self.before.is_none() {
            return true;
        }
        let Some(modified) = entry.modified else {
            return false;
        };
        self.after.is_none_or(|a| modified >= a) && self.before.is_none_or(|b| modified <= b)
    }

    /// Apply the filter, preserving listing order
    pub fn apply(&self, entries: &[FileEntry]) -> Vec<FileEntry> {
        entries
            .iter()
            .filter(|e| self.shape_matches(e))
            .filter(|e| self.date_matches(e))
            .take(self.limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(path: &str, category: Category, modified_ms: Option<i64>) -> FileEntry {
        FileEntry {
            name: path.rsplit('/').next().unwrap().to_string(),
            path: path.to_string(),
            category,
            download_ref: String::new(),
            modified: modified_ms.and_then(|ms| Local.timestamp_millis_opt(ms).single()),
        }
    }

    fn sample() -> Vec<FileEntry> {
        vec![
            entry("/sdcard/DCIM/a.jpg", Category::Image, None),
            entry("/sdcard/DCIM/b.jpg", Category::Image, None),
            entry("/sdcard/Movies/c.mp4", Category::Video, None),
            entry("/sdcard/DCIM/d.jpg", Category::Image, None),
            entry("/sdcard/Pictures/e.jpg", Category::Image, None),
            entry("/sdcard/DCIM/f.jpg", Category::Image, None),
        ]
    }

    #[test]
    fn limit_truncates_in_listing_order() {
        let filter = FileFilter::new(Category::Image, 2);
        let result = filter.apply(&sample());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].path, "/sdcard/DCIM/a.jpg");
        assert_eq!(result[1].path, "/sdcard/DCIM/b.jpg");
    }

    #[test]
    fn path_prefix_narrows() {
        let mut filter = FileFilter::new(Category::Image, 100);
        filter.path_prefix = Some("/sdcard/DCIM/".to_string());
        let result = filter.apply(&sample());
        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|e| e.path.starts_with("/sdcard/DCIM/")));
    }

    #[test]
    fn category_mismatch_yields_empty_not_error() {
        let filter = FileFilter::new(Category::Document, 10);
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn date_range_with_no_matches_is_empty() {
        let mut filter = FileFilter::new(Category::Image, 10);
        filter.after = Local.timestamp_millis_opt(1_600_000_000_000).single();
        filter.before = Local.timestamp_millis_opt(1_600_000_100_000).single();
        // sample entries carry no modification time, so a bound excludes them
        assert!(filter.apply(&sample()).is_empty());
    }

    #[test]
    fn candidates_ignore_dates_and_limit() {
        let mut filter = FileFilter::new(Category::Image, 1);
        filter.path_prefix = Some("/sdcard/DCIM/".to_string());
        filter.after = Local.timestamp_millis_opt(1_600_000_000_000).single();
        assert!(filter.needs_dates());
        let candidates = filter.candidates(&sample());
        // undated entries and those past the limit still count as candidates
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|e| e.category == Category::Image));
    }

    #[test]
    fn inclusive_date_range_with_known_mtimes() {
        let entries = vec![
            entry("/sdcard/DCIM/old.jpg", Category::Image, Some(1_000)),
            entry("/sdcard/DCIM/mid.jpg", Category::Image, Some(2_000)),
            entry("/sdcard/DCIM/new.jpg", Category::Image, Some(3_000)),
        ];
        let mut filter = FileFilter::new(Category::Image, 10);
        filter.after = Local.timestamp_millis_opt(2_000).single();
        filter.before = Local.timestamp_millis_opt(3_000).single();
        let result = filter.apply(&entries);
        let paths: Vec<&str> = result.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/sdcard/DCIM/mid.jpg", "/sdcard/DCIM/new.jpg"]);
    }
}
