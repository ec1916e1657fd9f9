//! Screen <-> grid conversions under the current pan/zoom.
//!
//! Screen points are relative to the map container's bounding box. The scale
//! is clamped before any division, so these never produce NaN or infinity for
//! a finite input.

use super::viewport::Viewport;
use crate::model::{CELL_SIZE_PX, GridPoint, ScreenPoint};

fn cell_px(viewport: &Viewport, cell_size_px: f64) -> f64 {
    let cell = if cell_size_px.is_finite() && cell_size_px >= 1.0 {
        cell_size_px
    } else {
        CELL_SIZE_PX
    };
    cell * viewport.effective_scale()
}

/// Pointer position to content pixels (pan removed, zoom kept).
pub fn screen_to_content(point: ScreenPoint, viewport: &Viewport) -> ScreenPoint {
    ScreenPoint::new(point.x - viewport.offset.x, point.y - viewport.offset.y)
}

/// Pointer position to the grid cell under it. May lie outside the grid.
pub fn screen_to_grid(point: ScreenPoint, viewport: &Viewport, cell_size_px: f64) -> GridPoint {
    let content = screen_to_content(point, viewport);
    let size = cell_px(viewport, cell_size_px);
    GridPoint::new(to_cell(content.x / size), to_cell(content.y / size))
}

/// Top-left corner of `cell` in screen pixels.
pub fn grid_to_screen(cell: GridPoint, viewport: &Viewport, cell_size_px: f64) -> ScreenPoint {
    let size = cell_px(viewport, cell_size_px);
    ScreenPoint::new(
        cell.x as f64 * size + viewport.offset.x,
        cell.y as f64 * size + viewport.offset.y,
    )
}

/// Rendered side length of one cell in screen pixels.
pub fn cell_screen_size(viewport: &Viewport, cell_size_px: f64) -> f64 {
    cell_px(viewport, cell_size_px)
}

fn to_cell(v: f64) -> i32 {
    if v.is_nan() {
        return 0;
    }
    // `as` saturates on overflow
    v.floor() as i32
}
