//! File categorization by extension/MIME heuristic
//!
//! Pure and total: every path maps to exactly one [`Category`], with no file
//! content inspection. The MIME guess comes from the extension alone, so
//! re-categorizing the same path always yields the same answer.

use crate::model::Category;
use mime_guess::mime;

/// MIME essences treated as documents, beyond the image/video major types
const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.oasis.opendocument.text",
    "text/plain",
];

impl Category {
    /// Derive the content category for a remote file path
    pub fn from_path(path: &str) -> Category {
        match mime_guess::from_path(path).first() {
            Some(m) if m.type_() == mime::IMAGE => Category::Image,
            Some(m) if m.type_() == mime::VIDEO => Category::Video,
            Some(m) if DOCUMENT_TYPES.contains(&m.essence_str()) => Category::Document,
            _ => Category::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_and_videos_by_major_type() {
        assert_eq!(Category::from_path("/sdcard/DCIM/photo.jpg"), Category::Image);
        assert_eq!(Category::from_path("/sdcard/DCIM/shot.PNG"), Category::Image);
        assert_eq!(Category::from_path("/sdcard/Movies/clip.mp4"), Category::Video);
        assert_eq!(Category::from_path("/sdcard/Movies/old.3gp"), Category::Video);
    }

    #[test]
    fn document_allow_list() {
        assert_eq!(Category::from_path("/sdcard/doc.pdf"), Category::Document);
        assert_eq!(Category::from_path("/sdcard/letter.doc"), Category::Document);
        assert_eq!(Category::from_path("/sdcard/letter.docx"), Category::Document);
        assert_eq!(Category::from_path("/sdcard/notes.txt"), Category::Document);
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(Category::from_path("/sdcard/archive.zip"), Category::Other);
        assert_eq!(Category::from_path("/sdcard/app.apk"), Category::Other);
        assert_eq!(Category::from_path("/sdcard/noextension"), Category::Other);
        assert_eq!(Category::from_path("/sdcard/strange.zzz9"), Category::Other);
        assert_eq!(Category::from_path(""), Category::Other);
    }

    #[test]
    fn categorization_is_deterministic() {
        let path = "/sdcard/DCIM/Camera/IMG_0001.jpeg";
        let first = Category::from_path(path);
        for _ in 0..10 {
            assert_eq!(Category::from_path(path), first);
        }
    }
}
