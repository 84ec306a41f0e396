use serde::Serialize;

use crate::error::{Result, TargetError};
use crate::target::{positive, validate_page};

/// Largest grid drawn, in cells per side. Finer grids are unprintable and
/// would cost tens of thousands of strokes per page.
pub const MAX_GRID_CELLS: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Placement of the grid on the page, in page units with a bottom-left origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridGeometry {
    pub cell_size: f64,
    pub row_count: u32,
    pub col_count: u32,
    pub grid_width: f64,
    pub grid_height: f64,
    /// Bottom-left corner of the grid.
    pub origin: Point,
    /// Midpoint of the printable area.
    pub center: Point,
    pub printable_width: f64,
    pub printable_height: f64,
    pub margin: f64,
}

impl GridGeometry {
    pub fn is_degenerate(&self) -> bool {
        self.row_count == 0
    }

    /// Top-right corner of the grid.
    pub fn far_corner(&self) -> Point {
        Point::new(
            self.origin.x + self.grid_width,
            self.origin.y + self.grid_height,
        )
    }

    /// Corners of the printable area: bottom-left, top-left, bottom-right,
    /// top-right.
    pub fn printable_corners(&self) -> [Point; 4] {
        let left = self.margin;
        let bottom = self.margin;
        let right = self.margin + self.printable_width;
        let top = self.margin + self.printable_height;
        [
            Point::new(left, bottom),
            Point::new(left, top),
            Point::new(right, bottom),
            Point::new(right, top),
        ]
    }

    /// Empty for a degenerate grid.
    fn line_count(&self, cells: u32) -> u32 {
        if self.is_degenerate() { 0 } else { cells + 1 }
    }

    pub fn horizontal_lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..self.line_count(self.row_count)).map(move |i| {
            let y = self.origin.y + f64::from(i) * self.cell_size;
            (
                Point::new(self.origin.x, y),
                Point::new(self.origin.x + self.grid_width, y),
            )
        })
    }

    pub fn vertical_lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (0..self.line_count(self.col_count)).map(move |i| {
            let x = self.origin.x + f64::from(i) * self.cell_size;
            (
                Point::new(x, self.origin.y),
                Point::new(x, self.origin.y + self.grid_height),
            )
        })
    }
}

/// Fits the largest square grid with an even number of cells inside the
/// printable area and centers it. The cell count comes from the printable
/// width and is used for both axes; on a landscape page it is further capped
/// by the printable height so the grid never runs into the margin.
///
/// Grids finer than [`MAX_GRID_CELLS`] per side are rejected as
/// `InvalidParameter` rather than drawn.
pub fn compute_layout(
    page_width: f64,
    page_height: f64,
    margin: f64,
    cell_size: f64,
) -> Result<GridGeometry> {
    validate_page(page_width, page_height, margin)?;
    positive("cell size", cell_size)?;

    let printable_width = page_width - 2.0 * margin;
    let printable_height = page_height - 2.0 * margin;

    let count = even_fit(printable_width, cell_size)?;
    let count = if printable_height < printable_width {
        count.min(even_fit(printable_height, cell_size)?)
    } else {
        count
    };

    if count > MAX_GRID_CELLS {
        return Err(TargetError::invalid(
            "cell size",
            cell_size,
            "grid would exceed 4096 cells per side",
        ));
    }

    let grid_width = f64::from(count) * cell_size;
    let grid_height = grid_width;

    Ok(GridGeometry {
        cell_size,
        row_count: count,
        col_count: count,
        grid_width,
        grid_height,
        origin: Point::new(
            margin + (printable_width - grid_width) / 2.0,
            margin + (printable_height - grid_height) / 2.0,
        ),
        center: Point::new(
            margin + printable_width / 2.0,
            margin + printable_height / 2.0,
        ),
        printable_width,
        printable_height,
        margin,
    })
}

fn even_fit(extent: f64, cell_size: f64) -> Result<u32> {
    let raw = (extent / cell_size).floor();
    if raw > f64::from(u32::MAX) {
        return Err(TargetError::invalid(
            "cell size",
            cell_size,
            "too small for the printable area",
        ));
    }
    Ok((raw as u32 / 2) * 2)
}
