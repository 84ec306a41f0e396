use crate::angular::CellFormula;
use crate::render::RenderOutput;
use crate::target::{POINTS_PER_INCH, TargetSpec};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Machine-readable summary of a rendered target, for checking a print
/// against the numbers it was built from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub name: String,
    pub distance: f64,
    pub angular_increment: f64,
    pub cell_formula: CellFormula,
    pub cell_size_inches: f64,
    pub cell_size_points: f64,
    pub rows: u32,
    pub cols: u32,
    pub page: [f64; 2],
    pub margin: f64,
    pub grid: GridDump,
    pub quadrant_overlay: bool,
}

#[derive(Debug, Serialize)]
pub struct GridDump {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub center: [f64; 2],
    /// Grid extent in inches, handy for measuring a printed sheet.
    pub width_inches: f64,
}

impl LayoutDump {
    pub fn from_output(output: &RenderOutput, spec: &TargetSpec, formula: CellFormula) -> Self {
        let geometry = &output.geometry;
        Self {
            name: output.name.clone(),
            distance: spec.distance,
            angular_increment: spec.angular_increment,
            cell_formula: formula,
            cell_size_inches: output.cell_size_inches,
            cell_size_points: geometry.cell_size,
            rows: geometry.row_count,
            cols: geometry.col_count,
            page: [spec.page_width, spec.page_height],
            margin: spec.margin,
            grid: GridDump {
                x: geometry.origin.x,
                y: geometry.origin.y,
                width: geometry.grid_width,
                height: geometry.grid_height,
                center: [geometry.center.x, geometry.center.y],
                width_inches: geometry.grid_width / POINTS_PER_INCH,
            },
            quadrant_overlay: spec.show_quadrant_overlay,
        }
    }
}

pub fn write_layout_dump(path: &Path, dump: &LayoutDump) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, dump)?;
    Ok(())
}
