//! Fog-of-war mask: `true` = obscured.

use crate::model::{GridPoint, GridSize};

/// Brush size 1 paints one cell, size 3 paints radius 2.
pub fn brush_radius(brush_size: u32) -> u32 {
    brush_size.saturating_sub(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FogGrid {
    size: GridSize,
    /// Row-major; length = width * height.
    cells: Vec<bool>,
}

impl FogGrid {
    pub fn new(size: GridSize, start_revealed: bool) -> Self {
        Self {
            size,
            cells: vec![!start_revealed; size.cell_count()],
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.size.contains(GridPoint::new(x, y)) {
            Some(y as usize * self.size.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Out-of-bounds cells count as fogged.
    pub fn is_revealed(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| !self.cells[i])
    }

    /// Paint a disc of `radius` cells around `center`. A cell is inside when
    /// its distance to the center rounds to at most `radius`.
    ///
    /// Returns the new grid only if some cell actually changed, so callers can
    /// keep the old allocation and skip a redraw.
    pub fn paint_circle(&self, center: GridPoint, radius: u32, reveal: bool) -> Option<FogGrid> {
        let fogged = !reveal;
        let r = radius as i64;
        let (cx, cy) = (center.x as i64, center.y as i64);
        let x0 = (cx - r).max(0);
        let y0 = (cy - r).max(0);
        let x1 = (cx + r).min(self.size.width as i64 - 1);
        let y1 = (cy + r).min(self.size.height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }

        let mut next: Option<FogGrid> = None;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);
                if (dx * dx + dy * dy).sqrt().round() > radius as f64 {
                    continue;
                }
                let i = y as usize * self.size.width as usize + x as usize;
                if self.cells[i] == fogged {
                    continue;
                }
                next.get_or_insert_with(|| self.clone()).cells[i] = fogged;
            }
        }
        next
    }

    /// Whole-map reveal or hide. `None` when already in that state.
    pub fn filled(&self, revealed: bool) -> Option<FogGrid> {
        if self.cells.iter().all(|&c| c == !revealed) {
            return None;
        }
        Some(FogGrid::new(self.size, revealed))
    }

    pub fn revealed_count(&self) -> usize {
        self.cells.iter().filter(|&&c| !c).count()
    }

    /// Fogged flags for row `y`, for the renderer.
    pub fn row(&self, y: u32) -> &[bool] {
        if y >= self.size.height {
            return &[];
        }
        let w = self.size.width as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }
}
