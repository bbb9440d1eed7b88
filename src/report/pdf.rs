//! Thin wrapper over the PDF document capability
//!
//! Keeps the printpdf surface in one place: page management, a text cursor,
//! and image embedding with fit-to-width scaling. The builtin Helvetica font
//! only covers WinAnsi, so callers sanitize text before layout.

use crate::error::{Error, Result};
use printpdf::image_crate::GenericImageView;
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PAGE_W_MM: f32 = 210.0;
const PAGE_H_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const IMAGE_DPI: f32 = 150.0;
const MM_PER_INCH: f32 = 25.4;

/// A paginated A4 document with a top-down text cursor
pub struct Document {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    cursor_mm: f32,
}

impl Document {
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W_MM), Mm(PAGE_H_MM), "content");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| Error::Report(e.to_string()))?;
        Ok(Self {
            doc,
            font,
            page,
            layer,
            cursor_mm: PAGE_H_MM - MARGIN_MM,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.page).get_layer(self.layer)
    }

    pub fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W_MM), Mm(PAGE_H_MM), "content");
        self.page = page;
        self.layer = layer;
        self.cursor_mm = PAGE_H_MM - MARGIN_MM;
    }

    fn ensure_room(&mut self, needed_mm: f32) {
        if self.cursor_mm - needed_mm < MARGIN_MM {
            self.new_page();
        }
    }

    /// Write one line at the cursor and advance it
    pub fn text_line(&mut self, text: &str, size_pt: f32) {
        let line_height = size_pt * 0.5;
        self.ensure_room(line_height);
        self.layer()
            .use_text(text, size_pt, Mm(MARGIN_MM), Mm(self.cursor_mm), &self.font);
        self.cursor_mm -= line_height;
    }

    /// Extra vertical gap
    pub fn gap(&mut self, mm: f32) {
        self.cursor_mm -= mm;
    }

    /// Embed an image at the cursor, scaled to fit the content area
    ///
    /// Fails for missing/corrupt/unsupported assets; the caller decides how
    /// to recover.
    pub fn image(&mut self, path: &Path) -> Result<()> {
        let dynamic = printpdf::image_crate::open(path)
            .map_err(|e| Error::Report(format!("cannot decode '{}': {}", path.display(), e)))?;
        let (w_px, h_px) = dynamic.dimensions();
        if w_px == 0 || h_px == 0 {
            return Err(Error::Report(format!("empty image '{}'", path.display())));
        }

        let natural_w_mm = w_px as f32 / IMAGE_DPI * MM_PER_INCH;
        let natural_h_mm = h_px as f32 / IMAGE_DPI * MM_PER_INCH;
        let avail_w = PAGE_W_MM - 2.0 * MARGIN_MM;

        // start a fresh page rather than squeezing into a sliver
        if self.cursor_mm - MARGIN_MM < 40.0 {
            self.new_page();
        }
        let avail_h = self.cursor_mm - MARGIN_MM;
        let scale = (avail_w / natural_w_mm).min(avail_h / natural_h_mm).min(1.0);
        let drawn_h = natural_h_mm * scale;
        let y = self.cursor_mm - drawn_h;

        let image = Image::from_dynamic_image(&dynamic);
        image.add_to_layer(
            self.layer(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(y)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        self.cursor_mm = y - 5.0;
        Ok(())
    }

    /// Write the document out, consuming it
    pub fn save(self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| Error::Report(e.to_string()))?;
        Ok(())
    }
}
