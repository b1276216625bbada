//! Patch Operations
//!
//! The closed set of atomic edits a patch may carry. Each kind is a tagged
//! enum variant with its own typed payload; unknown kinds fail
//! deserialization rather than being carried opaquely.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Track, Via};

/// One atomic edit against a board snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOp {
    /// Move a footprint to a new center position. Pads follow by the same
    /// translation.
    MoveComponent { footprint_id: String, to: Point },

    /// Replace both endpoints of an existing track segment.
    MoveTrackSegment {
        track_id: String,
        start: Point,
        end: Point,
    },

    /// Add a new track segment.
    AddTrackSegment { track: Track },

    /// Delete a track segment by id.
    DeleteTrackSegment { track_id: String },

    /// Add a new via.
    AddVia { via: Via },

    /// Delete a via by id.
    DeleteVia { via_id: String },

    /// Replace all of a net's tracks inside a region with new segments.
    RegionReroute {
        net: u32,
        region: Rect,
        tracks: Vec<Track>,
    },

    /// Update the track width of a netclass.
    UpdateNetclassWidth { netclass: String, width: f64 },

    /// Update the board-level default clearance.
    UpdateClearanceParam { clearance: f64 },
}

impl PatchOp {
    /// Stable kind name, matching the serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            PatchOp::MoveComponent { .. } => "move_component",
            PatchOp::MoveTrackSegment { .. } => "move_track_segment",
            PatchOp::AddTrackSegment { .. } => "add_track_segment",
            PatchOp::DeleteTrackSegment { .. } => "delete_track_segment",
            PatchOp::AddVia { .. } => "add_via",
            PatchOp::DeleteVia { .. } => "delete_via",
            PatchOp::RegionReroute { .. } => "region_reroute",
            PatchOp::UpdateNetclassWidth { .. } => "update_netclass_width",
            PatchOp::UpdateClearanceParam { .. } => "update_clearance_param",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serialization() {
        let op = PatchOp::MoveComponent {
            footprint_id: "fp-1".to_string(),
            to: Point::new(4.0, 5.0),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "move_component");
        assert_eq!(json["footprint_id"], "fp-1");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"op": "teleport_component", "footprint_id": "fp-1"}"#;
        assert!(serde_json::from_str::<PatchOp>(json).is_err());
    }

    #[test]
    fn test_round_trip() {
        let op = PatchOp::UpdateNetclassWidth {
            netclass: "Power".to_string(),
            width: 0.5,
        };
        let json = serde_json::to_string(&op).unwrap();
        let back: PatchOp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);
        assert_eq!(back.kind(), "update_netclass_width");
    }
}
