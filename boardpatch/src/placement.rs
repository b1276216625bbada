//! Placement Optimizer
//!
//! Pairwise spacing scan over footprints. Every unordered pair closer than
//! the minimum spacing yields a movement directive pushing the second
//! footprint of the pair directly away from the first. Directives are
//! emitted independently per pair; a footprint flagged in several pairs
//! gets several directives and conflict resolution is left to the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{GeometrySnapshot, Point};

/// Default minimum center-to-center footprint spacing (mm).
pub const DEFAULT_MIN_SPACING_MM: f64 = 5.0;

/// Extra distance added beyond the minimum when separating a pair (mm).
pub const MOVE_BUFFER_MM: f64 = 0.5;

/// Proposed move of one footprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveDirective {
    pub footprint_id: String,
    pub reference: String,
    pub from: Point,
    pub to: Point,
    /// Spacing that triggered the directive (mm).
    pub violating_distance: f64,
}

/// Pairwise footprint spacing optimizer.
#[derive(Debug, Clone)]
pub struct PlacementOptimizer {
    min_spacing: f64,
    buffer: f64,
}

impl Default for PlacementOptimizer {
    fn default() -> Self {
        Self {
            min_spacing: DEFAULT_MIN_SPACING_MM,
            buffer: MOVE_BUFFER_MM,
        }
    }
}

impl PlacementOptimizer {
    pub fn new(min_spacing: f64) -> Self {
        Self {
            min_spacing,
            ..Self::default()
        }
    }

    pub fn min_spacing(&self) -> f64 {
        self.min_spacing
    }

    /// Scan all unordered footprint pairs and propose moves for those
    /// closer than the minimum spacing. Proposed positions are clamped to
    /// the board outline's bounding box when an outline is present.
    pub fn optimize_spacing(&self, snapshot: &GeometrySnapshot) -> Vec<MoveDirective> {
        let outline_bounds = snapshot.outline_bounds();
        let mut directives = Vec::new();

        for i in 0..snapshot.footprints.len() {
            for j in (i + 1)..snapshot.footprints.len() {
                let first = &snapshot.footprints[i];
                let second = &snapshot.footprints[j];
                let d = first.position.distance_to(&second.position);
                if d >= self.min_spacing {
                    continue;
                }

                // Unit vector from first to second; coincident centers get
                // an arbitrary fixed direction instead of dividing by zero.
                let (ux, uy) = if d > 0.0 {
                    (
                        (second.position.x - first.position.x) / d,
                        (second.position.y - first.position.y) / d,
                    )
                } else {
                    (1.0, 0.0)
                };

                let shift = (self.min_spacing - d) + self.buffer;
                let mut to = Point::new(
                    second.position.x + ux * shift,
                    second.position.y + uy * shift,
                );
                if let Some(bounds) = outline_bounds {
                    to = bounds.clamp(to);
                }

                debug!(
                    first = %first.reference,
                    second = %second.reference,
                    distance = d,
                    "footprint spacing below minimum"
                );
                directives.push(MoveDirective {
                    footprint_id: second.id.clone(),
                    reference: second.reference.clone(),
                    from: second.position,
                    to,
                    violating_distance: d,
                });
            }
        }

        directives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::schema::*;

    fn footprint(id: &str, x: f64, y: f64) -> Footprint {
        Footprint {
            id: id.to_string(),
            reference: id.to_uppercase(),
            value: String::new(),
            layer: "F.Cu".to_string(),
            position: Point::new(x, y),
            rotation: 0.0,
            pads: vec![],
        }
    }

    fn snapshot(footprints: Vec<Footprint>) -> GeometrySnapshot {
        GeometrySnapshot {
            artifact_id: "board".to_string(),
            version: 1,
            outline: vec![
                Point::new(-20.0, -20.0),
                Point::new(40.0, -20.0),
                Point::new(40.0, 40.0),
                Point::new(-20.0, 40.0),
            ],
            layers: vec![Layer {
                name: "F.Cu".to_string(),
                kind: LayerKind::Signal,
            }],
            setup: BoardSetup::default(),
            nets: vec![],
            footprints,
            tracks: vec![],
            vias: vec![],
        }
    }

    #[test]
    fn test_close_pair_moves_second_away() {
        let snapshot = snapshot(vec![footprint("a", 0.0, 0.0), footprint("b", 2.0, 0.0)]);
        let optimizer = PlacementOptimizer::default();
        let directives = optimizer.optimize_spacing(&snapshot);
        assert_eq!(directives.len(), 1);
        let d = &directives[0];
        assert_eq!(d.footprint_id, "b");
        // Distance 2 -> 5 + 0.5 buffer along +x.
        assert!((d.to.x - 5.5).abs() < 1e-9);
        assert!(d.to.y.abs() < 1e-9);
    }

    #[test]
    fn test_coincident_centers_use_fixed_direction() {
        let snapshot = snapshot(vec![footprint("a", 3.0, 3.0), footprint("b", 3.0, 3.0)]);
        let optimizer = PlacementOptimizer::default();
        let directives = optimizer.optimize_spacing(&snapshot);
        assert_eq!(directives.len(), 1);
        let d = &directives[0];
        assert!((d.to.x - (3.0 + 5.0 + MOVE_BUFFER_MM)).abs() < 1e-9);
        assert!((d.to.y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_clamped_to_outline_bounds() {
        let snapshot = snapshot(vec![footprint("a", 36.0, 0.0), footprint("b", 39.0, 0.0)]);
        let optimizer = PlacementOptimizer::default();
        let directives = optimizer.optimize_spacing(&snapshot);
        assert_eq!(directives.len(), 1);
        // Unclamped target would be 41.5, past the 40mm outline edge.
        assert!((directives[0].to.x - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_spaced_pair_not_flagged() {
        let snapshot = snapshot(vec![footprint("a", 0.0, 0.0), footprint("b", 10.0, 0.0)]);
        let optimizer = PlacementOptimizer::default();
        assert!(optimizer.optimize_spacing(&snapshot).is_empty());
    }

    #[test]
    fn test_each_violating_pair_emits_independently() {
        let snapshot = snapshot(vec![
            footprint("a", 0.0, 0.0),
            footprint("b", 2.0, 0.0),
            footprint("c", 0.0, 2.0),
        ]);
        let optimizer = PlacementOptimizer::default();
        let directives = optimizer.optimize_spacing(&snapshot);
        // a-b, a-c, b-c all violate.
        assert_eq!(directives.len(), 3);
    }

    #[test]
    fn test_flagged_pairs_spacing_increases_after_moves() {
        let snapshot = snapshot(vec![footprint("a", 0.0, 0.0), footprint("b", 2.0, 0.0)]);
        let optimizer = PlacementOptimizer::default();
        let directives = optimizer.optimize_spacing(&snapshot);
        for d in &directives {
            let before = d.from.distance_to(&Point::new(0.0, 0.0));
            let after = d.to.distance_to(&Point::new(0.0, 0.0));
            assert!(after > before);
            assert!(after >= optimizer.min_spacing());
        }
    }
}
