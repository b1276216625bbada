//! Grid Pathfinder
//!
//! Discretizes the board onto a uniform grid, runs A* from start to end
//! around the obstacle set, restores exact endpoint coordinates over the
//! quantized cells, and simplifies the waypoint sequence. When no
//! obstacle-free path exists the router signals a degraded outcome and
//! falls back to the direct two-point segment; it never fails the caller.

mod astar;
mod grid;
mod simplify;

pub use grid::{GridCell, RouteGrid, BOUNDS_MARGIN_MM, DEFAULT_RESOLUTION_MM};
pub use simplify::{simplify_path, COLLINEARITY_TOLERANCE};

use tracing::{debug, warn};

use crate::geometry::{Point, Rect};
use crate::obstacles::ObstacleSet;

/// Upper bound on explored grid cells per search, so pathological inputs
/// terminate. Hitting the cap degrades the route like open-set exhaustion.
pub const DEFAULT_NODE_CAP: usize = 200_000;

/// Result of one pathfinding call.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    /// Ordered waypoints from start to end, endpoints exact.
    pub waypoints: Vec<Point>,
    /// Set when no obstacle-free path was found and the waypoints are the
    /// direct fallback segment. Callers may reject or flag such routes.
    pub degraded: bool,
}

impl RouteOutcome {
    /// Consecutive waypoint pairs as segments.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.waypoints
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
    }
}

/// Grid-based A* pathfinder over an obstacle set.
#[derive(Debug, Clone)]
pub struct Router {
    resolution: f64,
    node_cap: usize,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION_MM,
            node_cap: DEFAULT_NODE_CAP,
        }
    }
}

impl Router {
    pub fn new(resolution: f64) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    pub fn with_node_cap(mut self, node_cap: usize) -> Self {
        self.node_cap = node_cap;
        self
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Find a waypoint path from `start` to `end` avoiding `obstacles`.
    ///
    /// When `board_bounds` is `None` the search area is the bounding box of
    /// the endpoints and all obstacles, padded by [`BOUNDS_MARGIN_MM`].
    pub fn find_path(
        &self,
        start: Point,
        end: Point,
        obstacles: &ObstacleSet,
        board_bounds: Option<Rect>,
    ) -> RouteOutcome {
        let grid = RouteGrid::for_route(start, end, obstacles, board_bounds, self.resolution);
        let start_cell = grid.to_cell(&start);
        let goal_cell = grid.to_cell(&end);
        debug!(
            cells = grid.cell_count(),
            resolution = self.resolution,
            "starting path search"
        );

        match astar::search(&grid, obstacles, start_cell, goal_cell, self.node_cap) {
            Some(cells) => {
                let mut waypoints: Vec<Point> =
                    cells.iter().map(|c| grid.to_world(c)).collect();
                // Restore exact input coordinates over the quantized endpoints.
                if waypoints.len() < 2 {
                    waypoints = vec![start, end];
                } else {
                    waypoints[0] = start;
                    let last = waypoints.len() - 1;
                    waypoints[last] = end;
                }
                RouteOutcome {
                    waypoints: simplify_path(&waypoints),
                    degraded: false,
                }
            }
            None => {
                warn!("no obstacle-free path found, falling back to direct segment");
                RouteOutcome {
                    waypoints: vec![start, end],
                    degraded: true,
                }
            }
        }
    }
}
