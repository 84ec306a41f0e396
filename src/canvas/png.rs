use std::path::PathBuf;

use super::{Color, LineCap, SvgCanvas, VectorCanvas, write_atomic};
use crate::error::{Result, TargetError};
use crate::layout::Point;
use crate::text_metrics::TextMeasure;

/// Draws into an in-memory SVG and rasterizes it with resvg on `finish`.
pub struct PngCanvas {
    path: PathBuf,
    svg: SvgCanvas,
    background: Color,
    scale: f32,
    font_family: String,
}

impl PngCanvas {
    /// `scale` is pixels per point; 1.0 gives a 72 dpi image.
    pub fn to_file(path: impl Into<PathBuf>, background: Color, scale: f32) -> Self {
        Self {
            path: path.into(),
            svg: SvgCanvas::new(background),
            background,
            scale,
            font_family: "Helvetica".to_string(),
        }
    }

    fn rasterize(&self, svg: &str) -> Result<Vec<u8>> {
        let mut opt = usvg::Options::default();
        opt.font_family = self
            .font_family
            .split(',')
            .next()
            .unwrap_or("Helvetica")
            .trim()
            .to_string();
        opt.fontdb_mut().load_system_fonts();

        let tree = usvg::Tree::from_str(svg, &opt).map_err(|err| TargetError::Raster(err.to_string()))?;
        let (page_width, page_height) = self.svg.page_size();
        let width = (page_width as f32 * self.scale).ceil().max(1.0) as u32;
        let height = (page_height as f32 * self.scale).ceil().max(1.0) as u32;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| TargetError::Raster(format!("cannot allocate {width}x{height} pixmap")))?;
        let (r, g, b) = (self.background.r, self.background.g, self.background.b);
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255));

        // The SVG is sized in points; map its user space onto the pixmap.
        let size = tree.size();
        let transform = resvg::tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        pixmap
            .encode_png()
            .map_err(|err| TargetError::Raster(err.to_string()))
    }
}

impl TextMeasure for PngCanvas {
    fn measure_width(&self, text: &str, font_family: &str, font_size: f64) -> f64 {
        self.svg.measure_width(text, font_family, font_size)
    }
}

impl VectorCanvas for PngCanvas {
    fn set_page_size(&mut self, width: f64, height: f64) {
        self.svg.set_page_size(width, height);
    }

    fn set_title(&mut self, title: &str) {
        self.svg.set_title(title);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.svg.set_stroke_color(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.svg.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.svg.set_line_cap(cap);
    }

    fn line(&mut self, from: Point, to: Point) {
        self.svg.line(from, to);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.svg.set_fill_color(color);
    }

    fn set_font(&mut self, font_family: &str, font_size: f64) {
        self.font_family = font_family.to_string();
        self.svg.set_font(font_family, font_size);
    }

    fn draw_text(&mut self, origin: Point, text: &str) {
        self.svg.draw_text(origin, text);
    }

    fn finish(&mut self) -> Result<()> {
        self.svg.finish()?;
        let svg = self.svg.svg().unwrap_or_default();
        let png = self.rasterize(svg)?;
        write_atomic(&self.path, &png)
    }
}
