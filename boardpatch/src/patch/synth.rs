//! Patch Synthesizer
//!
//! Turns router and placement-optimizer output into typed patch operations
//! and wraps them, with metadata, into a patch targeting the source
//! snapshot's successor version. Synthesis never mutates the snapshot.

use tracing::debug;
use uuid::Uuid;

use super::model::{Patch, PatchError, PatchMetadata};
use super::ops::PatchOp;
use crate::geometry::{GeometrySnapshot, LayerKind, Net, Track};
use crate::placement::MoveDirective;
use crate::router::RouteOutcome;

/// Minimum segment length worth emitting (mm).
const MIN_SEGMENT_LENGTH_MM: f64 = 1e-6;

/// Mints ids for synthesized board elements.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator;

impl IdGenerator {
    pub fn track_id(&self) -> String {
        format!("track-{}", Uuid::new_v4())
    }

    pub fn via_id(&self) -> String {
        format!("via-{}", Uuid::new_v4())
    }
}

/// Builds patches from engine suggestions.
#[derive(Debug, Clone)]
pub struct PatchSynthesizer {
    author: String,
    ids: IdGenerator,
}

impl PatchSynthesizer {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ids: IdGenerator,
        }
    }

    /// Wrap a routed path for `net` into a patch of track-segment
    /// additions. Returns `Ok(None)` when the outcome carries no usable
    /// segments.
    pub fn route_patch(
        &self,
        snapshot: &GeometrySnapshot,
        net: &Net,
        outcome: &RouteOutcome,
    ) -> Result<Option<Patch>, PatchError> {
        let layer = preferred_signal_layer(snapshot);
        let width = snapshot.setup.track_width;

        let ops: Vec<PatchOp> = outcome
            .segments()
            .filter(|(a, b)| a.distance_to(b) > MIN_SEGMENT_LENGTH_MM)
            .map(|(start, end)| {
                PatchOp::AddTrackSegment {
                    track: Track {
                        id: self.ids.track_id(),
                        start,
                        end,
                        width,
                        layer: layer.clone(),
                        net: Some(net.id),
                    },
                }
            })
            .collect();

        if ops.is_empty() {
            return Ok(None);
        }

        let mut explanation = format!(
            "Routed net '{}' with {} track segment(s)",
            net.name,
            ops.len()
        );
        if outcome.degraded {
            explanation.push_str(" (degraded: obstacles ignored, no clear path found)");
        }

        let patch = Patch::new(
            snapshot.artifact_id.clone(),
            snapshot.version,
            ops,
            PatchMetadata::new(self.author.clone(), "router").with_explanation(explanation),
        );
        patch.validate()?;
        debug!(net = %net.name, ops = patch.op_count(), "synthesized route patch");
        Ok(Some(patch))
    }

    /// Wrap spacing-optimizer directives into a patch of component moves.
    /// Returns `Ok(None)` when there is nothing to move.
    pub fn placement_patch(
        &self,
        snapshot: &GeometrySnapshot,
        directives: &[MoveDirective],
    ) -> Result<Option<Patch>, PatchError> {
        if directives.is_empty() {
            return Ok(None);
        }

        let ops: Vec<PatchOp> = directives
            .iter()
            .map(|d| PatchOp::MoveComponent {
                footprint_id: d.footprint_id.clone(),
                to: d.to,
            })
            .collect();

        let references: Vec<&str> = directives.iter().map(|d| d.reference.as_str()).collect();
        let explanation = format!(
            "Moved {} footprint(s) to restore minimum spacing: {}",
            ops.len(),
            references.join(", ")
        );

        let patch = Patch::new(
            snapshot.artifact_id.clone(),
            snapshot.version,
            ops,
            PatchMetadata::new(self.author.clone(), "placement").with_explanation(explanation),
        );
        patch.validate()?;
        debug!(ops = patch.op_count(), "synthesized placement patch");
        Ok(Some(patch))
    }
}

/// First signal layer of the snapshot, falling back to the first layer.
fn preferred_signal_layer(snapshot: &GeometrySnapshot) -> String {
    snapshot
        .layers
        .iter()
        .find(|l| l.kind == LayerKind::Signal)
        .or_else(|| snapshot.layers.first())
        .map(|l| l.name.clone())
        .unwrap_or_else(|| "F.Cu".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::schema::*;
    use crate::geometry::Point;

    fn snapshot() -> GeometrySnapshot {
        GeometrySnapshot {
            artifact_id: "board-1".to_string(),
            version: 4,
            outline: vec![
                Point::new(0.0, 0.0),
                Point::new(30.0, 0.0),
                Point::new(30.0, 30.0),
                Point::new(0.0, 30.0),
            ],
            layers: vec![
                Layer {
                    name: "F.Cu".to_string(),
                    kind: LayerKind::Signal,
                },
                Layer {
                    name: "B.Cu".to_string(),
                    kind: LayerKind::Power,
                },
            ],
            setup: BoardSetup::default(),
            nets: vec![Net {
                id: 1,
                name: "N1".to_string(),
            }],
            footprints: vec![],
            tracks: vec![],
            vias: vec![],
        }
    }

    #[test]
    fn test_route_patch_adds_segments_in_order() {
        let snapshot = snapshot();
        let net = snapshot.nets[0].clone();
        let outcome = RouteOutcome {
            waypoints: vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 5.0),
                Point::new(10.0, 5.0),
            ],
            degraded: false,
        };
        let synth = PatchSynthesizer::new("engine");
        let patch = synth
            .route_patch(&snapshot, &net, &outcome)
            .unwrap()
            .unwrap();
        assert_eq!(patch.from_version, 4);
        assert_eq!(patch.to_version, 5);
        assert_eq!(patch.op_count(), 2);
        match &patch.ops[0] {
            PatchOp::AddTrackSegment { track } => {
                assert_eq!(track.start, Point::new(0.0, 0.0));
                assert_eq!(track.end, Point::new(5.0, 5.0));
                assert_eq!(track.net, Some(1));
                assert_eq!(track.layer, "F.Cu");
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn test_zero_length_segments_skipped() {
        let snapshot = snapshot();
        let net = snapshot.nets[0].clone();
        let outcome = RouteOutcome {
            waypoints: vec![Point::new(1.0, 1.0), Point::new(1.0, 1.0)],
            degraded: false,
        };
        let synth = PatchSynthesizer::new("engine");
        assert!(synth
            .route_patch(&snapshot, &net, &outcome)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_degraded_route_flagged_in_explanation() {
        let snapshot = snapshot();
        let net = snapshot.nets[0].clone();
        let outcome = RouteOutcome {
            waypoints: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            degraded: true,
        };
        let synth = PatchSynthesizer::new("engine");
        let patch = synth
            .route_patch(&snapshot, &net, &outcome)
            .unwrap()
            .unwrap();
        assert!(patch
            .metadata
            .explanation
            .as_deref()
            .unwrap()
            .contains("degraded"));
    }

    #[test]
    fn test_synthesized_track_ids_unique() {
        let ids = IdGenerator;
        assert_ne!(ids.track_id(), ids.track_id());
    }

    #[test]
    fn test_placement_patch_empty_moves_yield_none() {
        let snapshot = snapshot();
        let synth = PatchSynthesizer::new("engine");
        assert!(synth.placement_patch(&snapshot, &[]).unwrap().is_none());
    }
}
