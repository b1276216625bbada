//! Grid Discretization
//!
//! Maps continuous board coordinates onto a uniform square grid. The grid
//! origin is the bounding-box minimum; cell (0,0) sits at the origin and
//! integer cells map bijectively back to world coordinates at the chosen
//! resolution.

use crate::geometry::{Point, Rect};
use crate::obstacles::ObstacleSet;

/// Default grid resolution (mm). Caller-tunable per search; grid size
/// scales with bounding-box area / resolution², so pick relative to board
/// scale.
pub const DEFAULT_RESOLUTION_MM: f64 = 0.5;

/// Padding applied around the search bounding box (mm).
pub const BOUNDS_MARGIN_MM: f64 = 10.0;

/// Discretized board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// One search's view of the board as a uniform grid.
#[derive(Debug, Clone)]
pub struct RouteGrid {
    origin: Point,
    resolution: f64,
    cols: i32,
    rows: i32,
}

impl RouteGrid {
    pub fn new(bounds: Rect, resolution: f64) -> Self {
        let cols = (bounds.width() / resolution).ceil() as i32 + 1;
        let rows = (bounds.height() / resolution).ceil() as i32 + 1;
        Self {
            origin: bounds.min,
            resolution,
            cols,
            rows,
        }
    }

    /// Grid for one routing request: covers the endpoints, every obstacle
    /// extent, and the board bounds when supplied, padded by
    /// [`BOUNDS_MARGIN_MM`].
    pub fn for_route(
        start: Point,
        end: Point,
        obstacles: &ObstacleSet,
        board_bounds: Option<Rect>,
        resolution: f64,
    ) -> Self {
        let mut bounds = Rect::new(start, start);
        bounds.include(&end);
        if let Some(obstacle_bounds) = obstacles.bounding_box() {
            bounds = bounds.union(&obstacle_bounds);
        }
        if let Some(board) = board_bounds {
            bounds = bounds.union(&board);
        }
        Self::new(bounds.expanded(BOUNDS_MARGIN_MM), resolution)
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Nearest grid cell for a world coordinate.
    pub fn to_cell(&self, p: &Point) -> GridCell {
        GridCell::new(
            ((p.x - self.origin.x) / self.resolution).round() as i32,
            ((p.y - self.origin.y) / self.resolution).round() as i32,
        )
    }

    /// World coordinate of a cell center.
    pub fn to_world(&self, cell: &GridCell) -> Point {
        Point::new(
            self.origin.x + cell.col as f64 * self.resolution,
            self.origin.y + cell.row as f64 * self.resolution,
        )
    }

    pub fn in_bounds(&self, cell: &GridCell) -> bool {
        cell.col >= 0 && cell.col < self.cols && cell.row >= 0 && cell.row < self.rows
    }

    /// A cell is blocked when its center lies within an obstacle's exclusion
    /// radius plus one resolution step (grid-quantization safety margin).
    pub fn is_blocked(&self, cell: &GridCell, obstacles: &ObstacleSet) -> bool {
        obstacles.blocks(&self.to_world(cell), self.resolution)
    }
}
