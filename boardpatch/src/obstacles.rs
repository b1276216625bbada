//! Obstacle Model
//!
//! Derived view over a geometry snapshot: every footprint and via becomes a
//! circular exclusion zone with a clearance margin. Elements belonging to
//! the target net of a routing request are excluded, so a net is never
//! blocked by its own terminals. Tracks are not modeled as obstacles; this
//! keeps the search tractable at the cost of possible track crossings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{GeometrySnapshot, Point, Rect};

/// Clearance added around every obstacle (mm).
pub const CLEARANCE_MM: f64 = 0.3;

/// Radius used for footprints that carry no pads (mm).
pub const DEFAULT_FOOTPRINT_RADIUS_MM: f64 = 1.0;

/// A circular exclusion zone. The radius is inclusive of clearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Point,
    pub radius: f64,
}

impl Obstacle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// True when `p` lies within `radius + margin` of the center.
    pub fn blocks(&self, p: &Point, margin: f64) -> bool {
        self.center.distance_to(p) < self.radius + margin
    }
}

/// The obstacle set derived from one snapshot for one routing request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the exclusion zones for a routing request. Footprints with any
    /// pad on `target_net`, and vias on `target_net`, contribute nothing.
    pub fn from_snapshot(snapshot: &GeometrySnapshot, target_net: Option<u32>) -> Self {
        let mut obstacles = Vec::new();

        for footprint in &snapshot.footprints {
            let on_target = target_net
                .map(|net| footprint.pads.iter().any(|pad| pad.net == Some(net)))
                .unwrap_or(false);
            if on_target {
                continue;
            }
            let radius = if footprint.pads.is_empty() {
                DEFAULT_FOOTPRINT_RADIUS_MM
            } else {
                footprint
                    .pads
                    .iter()
                    .map(|pad| footprint.position.distance_to(&pad.position))
                    .fold(0.0_f64, f64::max)
                    + CLEARANCE_MM
            };
            obstacles.push(Obstacle::new(footprint.position, radius));
        }

        for via in &snapshot.vias {
            if target_net.is_some() && via.net == target_net {
                continue;
            }
            obstacles.push(Obstacle::new(via.position, via.drill / 2.0 + CLEARANCE_MM));
        }

        debug!(
            count = obstacles.len(),
            ?target_net,
            "built obstacle set from snapshot"
        );
        Self { obstacles }
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// True when `p` is within `margin` of any exclusion radius.
    pub fn blocks(&self, p: &Point, margin: f64) -> bool {
        self.obstacles.iter().any(|o| o.blocks(p, margin))
    }

    /// Bounding box covering every obstacle disc, or `None` when empty.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut iter = self.obstacles.iter();
        let first = iter.next()?;
        let mut rect = Rect::new(first.center, first.center).expanded(first.radius);
        for o in iter {
            rect = rect.union(&Rect::new(o.center, o.center).expanded(o.radius));
        }
        Some(rect)
    }
}
