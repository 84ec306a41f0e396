use std::path::PathBuf;

use pdf_writer::types::LineCapStyle;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::{Color, LineCap, VectorCanvas, write_atomic};
use crate::error::Result;
use crate::layout::Point;
use crate::text_metrics::{TextMeasure, helvetica_width};

const FONT_NAME: Name<'static> = Name(b"F1");

/// Single-page PDF. Text is set in the base-14 Helvetica font, so no font
/// data is embedded and any requested family falls back to Helvetica.
pub struct PdfCanvas {
    path: Option<PathBuf>,
    width: f64,
    height: f64,
    title: Option<String>,
    content: Content,
    font_size: f64,
    output: Option<Vec<u8>>,
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            path: None,
            width: 0.0,
            height: 0.0,
            title: None,
            content: Content::new(),
            font_size: 12.0,
            output: None,
        }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new()
        }
    }

    /// The finished document, once `finish` has run.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.output.as_deref()
    }

    fn build(&mut self) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let font_id = Ref::new(4);
        let content_id = Ref::new(5);
        let info_id = Ref::new(6);

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, self.width as f32, self.height as f32));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));

        let content = std::mem::replace(&mut self.content, Content::new());
        pdf.stream(content_id, &content.finish());

        if let Some(title) = &self.title {
            pdf.document_info(info_id)
                .title(TextStr(title.as_str()))
                .creator(TextStr(concat!("moa-target ", env!("CARGO_PKG_VERSION"))));
        }

        pdf.finish()
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for PdfCanvas {
    fn measure_width(&self, text: &str, _font_family: &str, font_size: f64) -> f64 {
        helvetica_width(text, font_size)
    }
}

impl VectorCanvas for PdfCanvas {
    fn set_page_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_stroke_color(&mut self, color: Color) {
        let (r, g, b) = color.unit_rgb();
        self.content.set_stroke_rgb(r, g, b);
    }

    fn set_line_width(&mut self, width: f64) {
        self.content.set_line_width(width as f32);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.content.set_line_cap(match cap {
            LineCap::Butt => LineCapStyle::ButtCap,
            LineCap::Round => LineCapStyle::RoundCap,
            LineCap::Square => LineCapStyle::ProjectingSquareCap,
        });
    }

    fn line(&mut self, from: Point, to: Point) {
        self.content
            .move_to(from.x as f32, from.y as f32)
            .line_to(to.x as f32, to.y as f32)
            .stroke();
    }

    fn set_fill_color(&mut self, color: Color) {
        let (r, g, b) = color.unit_rgb();
        self.content.set_fill_rgb(r, g, b);
    }

    fn set_font(&mut self, _font_family: &str, font_size: f64) {
        self.font_size = font_size;
    }

    fn draw_text(&mut self, origin: Point, text: &str) {
        // Helvetica here uses a single-byte encoding; anything else shows as '?'.
        let encoded: Vec<u8> = text
            .chars()
            .map(|ch| if ch.is_ascii() { ch as u8 } else { b'?' })
            .collect();
        self.content
            .begin_text()
            .set_font(FONT_NAME, self.font_size as f32)
            .next_line(origin.x as f32, origin.y as f32)
            .show(Str(&encoded))
            .end_text();
    }

    fn finish(&mut self) -> Result<()> {
        let bytes = self.build();
        if let Some(path) = &self.path {
            write_atomic(path, &bytes)?;
        }
        self.output = Some(bytes);
        Ok(())
    }
}
