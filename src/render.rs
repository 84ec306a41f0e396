use std::path::Path;

use crate::angular::cell_size_with;
use crate::canvas::{Color, OutputFormat, PdfCanvas, SvgCanvas, VectorCanvas};
use crate::config::Config;
use crate::error::{Result, TargetError};
use crate::layout::{GridGeometry, Point, compute_layout};
use crate::naming::{name_for_format, with_extension};
use crate::target::{POINTS_PER_INCH, TargetSpec};
use crate::text_metrics::centered_origin;

/// Labels for the quadrant overlay, paired with the printable-area corner they
/// sit toward. A group landing low and left needs the sight moved right and
/// up, and so on around the page.
const QUADRANT_LABELS: [(&str, Corner); 4] = [
    ("R/U", Corner::BottomLeft),
    ("R/D", Corner::TopLeft),
    ("L/U", Corner::BottomRight),
    ("L/D", Corner::TopRight),
];

#[derive(Debug, Clone, Copy)]
enum Corner {
    BottomLeft,
    TopLeft,
    BottomRight,
    TopRight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Name the document should be stored under.
    pub name: String,
    /// Size of one grid cell in inches.
    pub cell_size_inches: f64,
    pub geometry: GridGeometry,
}

/// Colors resolved up front so a bad theme fails before anything is drawn.
struct Palette {
    line: Color,
    text: Color,
    overlay: Color,
    label: Color,
}

impl Palette {
    fn from_config(config: &Config) -> Result<Self> {
        let theme = &config.theme;
        Ok(Self {
            line: parse_color("line color", &theme.line_color)?,
            text: parse_color("text color", &theme.text_color)?,
            overlay: parse_color("overlay color", &theme.overlay_color)?,
            label: parse_color("label color", &theme.label_color)?,
        })
    }
}

fn parse_color(name: &'static str, value: &str) -> Result<Color> {
    Color::parse(value).ok_or_else(|| TargetError::InvalidColor {
        name,
        value: value.to_string(),
    })
}

pub fn caption(spec: &TargetSpec, cell_size_inches: f64) -> String {
    format!(
        "{} MOA grid ({:.3} in) at {} yards",
        spec.angular_increment, cell_size_inches, spec.distance
    )
}

pub fn title(spec: &TargetSpec) -> String {
    format!(
        "Target - {} yards - {} MOA per click",
        spec.distance.trunc(),
        spec.angular_increment
    )
}

/// Draws the target described by `spec` onto `canvas` and finishes it.
///
/// Every input is checked before the first canvas call, so an invalid spec
/// leaves the canvas untouched.
pub fn render_target<C: VectorCanvas + ?Sized>(
    spec: &TargetSpec,
    config: &Config,
    format: OutputFormat,
    canvas: &mut C,
) -> Result<RenderOutput> {
    spec.validate()?;
    let palette = Palette::from_config(config)?;
    let theme = &config.theme;

    let cell_size_inches = cell_size_with(
        spec.distance,
        spec.angular_increment,
        config.layout.cell_formula,
    )?;
    let geometry = compute_layout(
        spec.page_width,
        spec.page_height,
        spec.margin,
        cell_size_inches * POINTS_PER_INCH,
    )?;
    let name = match &spec.name {
        Some(name) => with_extension(name, format),
        None => name_for_format(spec.distance, spec.angular_increment, format),
    };

    crate::log::debug!(
        cell_size_inches,
        rows = geometry.row_count,
        cols = geometry.col_count,
        origin_x = geometry.origin.x,
        origin_y = geometry.origin.y,
        "grid layout"
    );
    if geometry.is_degenerate() {
        crate::log::warn!(
            cell_size_inches,
            "cell is wider than the printable area; no grid lines drawn"
        );
    }

    canvas.set_page_size(spec.page_width, spec.page_height);
    canvas.set_title(&title(spec));
    canvas.set_stroke_color(palette.line);
    canvas.set_line_width(theme.line_width);
    canvas.set_line_cap(theme.line_cap);

    let caption_y = config.layout.caption_y.unwrap_or(spec.margin);
    draw_centered_text(
        canvas,
        &caption(spec, cell_size_inches),
        &theme.font_family,
        theme.caption_font_size,
        palette.text,
        Point::new(spec.page_width / 2.0, caption_y),
    );

    if spec.show_quadrant_overlay && !geometry.is_degenerate() {
        let far = geometry.far_corner();
        let center = geometry.center;
        canvas.set_stroke_color(palette.overlay);
        canvas.set_line_width(theme.overlay_width);
        canvas.line(
            Point::new(center.x, geometry.origin.y),
            Point::new(center.x, far.y),
        );
        canvas.line(
            Point::new(geometry.origin.x, center.y),
            Point::new(far.x, center.y),
        );
        canvas.set_stroke_color(palette.line);
        canvas.set_line_width(theme.line_width);
    }

    for (from, to) in geometry.horizontal_lines() {
        canvas.line(from, to);
    }
    for (from, to) in geometry.vertical_lines() {
        canvas.line(from, to);
    }

    if !geometry.is_degenerate() {
        let origin = geometry.origin;
        let far = geometry.far_corner();
        canvas.set_line_width(spec.diagonal_thickness * POINTS_PER_INCH);
        canvas.line(origin, far);
        canvas.line(Point::new(far.x, origin.y), Point::new(origin.x, far.y));
    }

    if spec.show_quadrant_overlay {
        let [bottom_left, top_left, bottom_right, top_right] = geometry.printable_corners();
        for (label, corner) in QUADRANT_LABELS {
            let corner = match corner {
                Corner::BottomLeft => bottom_left,
                Corner::TopLeft => top_left,
                Corner::BottomRight => bottom_right,
                Corner::TopRight => top_right,
            };
            draw_centered_text(
                canvas,
                label,
                &theme.font_family,
                theme.label_font_size,
                palette.label,
                geometry.center.midpoint(corner),
            );
        }
    }

    canvas.finish()?;
    crate::log::info!(name = %name, "target rendered");

    Ok(RenderOutput {
        name,
        cell_size_inches,
        geometry,
    })
}

fn draw_centered_text<C: VectorCanvas + ?Sized>(
    canvas: &mut C,
    text: &str,
    font_family: &str,
    font_size: f64,
    color: Color,
    target: Point,
) {
    canvas.set_font(font_family, font_size);
    canvas.set_fill_color(color);
    let origin = centered_origin(&*canvas, text, font_family, font_size, target);
    canvas.draw_text(origin, text);
}

/// Renders `spec` to an in-memory SVG string.
pub fn render_svg(spec: &TargetSpec, config: &Config) -> Result<(RenderOutput, String)> {
    let background = parse_color("background", &config.theme.background)?;
    let mut canvas = SvgCanvas::new(background);
    let output = render_target(spec, config, OutputFormat::Svg, &mut canvas)?;
    Ok((output, canvas.into_svg().unwrap_or_default()))
}

/// Renders `spec` to an in-memory PDF.
pub fn render_pdf(spec: &TargetSpec, config: &Config) -> Result<(RenderOutput, Vec<u8>)> {
    let mut canvas = PdfCanvas::new();
    let output = render_target(spec, config, OutputFormat::Pdf, &mut canvas)?;
    Ok((output, canvas.bytes().unwrap_or_default().to_vec()))
}

/// Renders `spec` straight into `path` in the given format.
pub fn render_to_file(
    spec: &TargetSpec,
    config: &Config,
    format: OutputFormat,
    path: &Path,
) -> Result<RenderOutput> {
    let background = parse_color("background", &config.theme.background)?;
    match format {
        OutputFormat::Pdf => render_target(spec, config, format, &mut PdfCanvas::to_file(path)),
        OutputFormat::Svg => render_target(
            spec,
            config,
            format,
            &mut SvgCanvas::to_file(path, background),
        ),
        #[cfg(feature = "png")]
        OutputFormat::Png => render_target(
            spec,
            config,
            format,
            &mut crate::canvas::PngCanvas::to_file(path, background, config.render.png_scale),
        ),
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => Err(TargetError::Raster(
            "PNG output not enabled (compile with the 'png' feature)".to_string(),
        )),
    }
}
