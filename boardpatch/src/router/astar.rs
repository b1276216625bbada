//! A* search over the route grid.
//!
//! 8-connected expansion (4 cardinal + 4 diagonal), cardinal step cost 1,
//! diagonal step cost √2, Manhattan-distance heuristic. Ties on f are
//! broken by discovery order (monotonic sequence number), which makes the
//! search deterministic for reproducible output.

use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

use super::grid::{GridCell, RouteGrid};
use crate::obstacles::ObstacleSet;

const CARDINAL_COST: f64 = 1.0;
const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;

const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Open-set entry. Orders the binary heap by lowest f, then earliest
/// discovery sequence on equal f.
struct OpenEntry {
    f: f64,
    g: f64,
    seq: u64,
    cell: GridCell,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest entry; invert so the lowest f (and
        // on ties, the earliest seq) pops first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn heuristic(from: &GridCell, to: &GridCell) -> f64 {
    ((to.col - from.col).abs() + (to.row - from.row).abs()) as f64 * CARDINAL_COST
}

/// Search for a cell path from `start` to `goal`. Returns `None` when the
/// open set exhausts or the explored-node cap is hit.
pub(super) fn search(
    grid: &RouteGrid,
    obstacles: &ObstacleSet,
    start: GridCell,
    goal: GridCell,
    node_cap: usize,
) -> Option<Vec<GridCell>> {
    if !grid.in_bounds(&start) || !grid.in_bounds(&goal) {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut g_costs: FxHashMap<GridCell, f64> = FxHashMap::default();
    let mut came_from: FxHashMap<GridCell, GridCell> = FxHashMap::default();
    let mut closed: FxHashSet<GridCell> = FxHashSet::default();
    let mut seq: u64 = 0;
    let mut explored: usize = 0;

    g_costs.insert(start, 0.0);
    open.push(OpenEntry {
        f: heuristic(&start, &goal),
        g: 0.0,
        seq,
        cell: start,
    });

    while let Some(entry) = open.pop() {
        let current = entry.cell;
        if closed.contains(&current) {
            continue;
        }

        if current == goal {
            debug!(explored, "goal reached");
            return Some(reconstruct(&came_from, goal));
        }

        closed.insert(current);
        explored += 1;
        if explored >= node_cap {
            debug!(explored, node_cap, "explored-node cap hit");
            return None;
        }

        for (dc, dr) in DIRECTIONS {
            let neighbor = GridCell::new(current.col + dc, current.row + dr);
            if !grid.in_bounds(&neighbor) || closed.contains(&neighbor) {
                continue;
            }
            if grid.is_blocked(&neighbor, obstacles) {
                continue;
            }

            let step = if dc != 0 && dr != 0 {
                DIAGONAL_COST
            } else {
                CARDINAL_COST
            };
            let tentative_g = entry.g + step;
            let existing = g_costs.get(&neighbor).copied().unwrap_or(f64::INFINITY);
            if tentative_g < existing {
                g_costs.insert(neighbor, tentative_g);
                came_from.insert(neighbor, current);
                seq += 1;
                open.push(OpenEntry {
                    f: tentative_g + heuristic(&neighbor, &goal),
                    g: tentative_g,
                    seq,
                    cell: neighbor,
                });
            }
        }
    }

    debug!(explored, "open set exhausted without reaching goal");
    None
}

fn reconstruct(came_from: &FxHashMap<GridCell, GridCell>, goal: GridCell) -> Vec<GridCell> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&parent) = came_from.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}
