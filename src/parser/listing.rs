//! Recursive directory listing parser
//!
//! Input is a concatenation of per-directory blocks. A line ending in `:`
//! names the directory the following entries belong to; every other
//! non-blank line is a name relative to the most recent header. The
//! "current directory" is explicit fold state local to one parse, seeded
//! with the queried root.

/// One name seen in a listing, resolved against its directory header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedFile {
    pub name: String,
    pub path: String,
}

/// Outcome of parsing one listing
///
/// `Empty` means the device produced no output at all (empty or unreachable
/// directory), distinct from a directory that listed successfully but
/// contains nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Empty,
    Entries(Vec<ListedFile>),
}

/// Parse raw `ls -R` output rooted at `root`
///
/// Also handles non-recursive `ls` output: with no header lines every name
/// resolves against the root.
pub fn parse_recursive_listing(root: &str, raw: &str) -> Listing {
    let raw = raw.trim();
    if raw.is_empty() {
        return Listing::Empty;
    }

    let mut current_dir = root.trim_end_matches('/').to_string();
    let mut entries = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(dir) = line.strip_suffix(':') {
            current_dir = dir.trim_end_matches('/').to_string();
        } else {
            entries.push(ListedFile {
                name: line.to_string(),
                path: format!("{}/{}", current_dir, line),
            });
        }
    }

    Listing::Entries(entries)
}
