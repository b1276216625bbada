//! Artifact Store Interface
//!
//! The engine never accesses storage directly; it reads snapshots and
//! submits patches through the [`ArtifactStore`] trait. The version check
//! at application time is the sole concurrency-control primitive: a
//! compare-and-swap on the version number, reported as a conflict rather
//! than an error so callers can regenerate against a fresh snapshot.
//!
//! [`InMemoryStore`] is a reference implementation used by tests and the
//! CLI's apply flow.

use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::geometry::GeometrySnapshot;
use crate::patch::{Patch, PatchError, PatchOp};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown artifact: {0}")]
    UnknownArtifact(String),

    #[error("unknown {kind}: {id}")]
    UnknownTarget { kind: &'static str, id: String },

    #[error("invalid patch: {0}")]
    InvalidPatch(#[from] PatchError),
}

/// Result of submitting a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The artifact advanced to the patch's target version.
    Applied { new_version: u64 },
    /// The artifact moved since the patch was generated; nothing changed.
    Conflict { current_version: u64 },
}

/// Versioned storage boundary for board snapshots.
pub trait ArtifactStore {
    /// Current snapshot of an artifact. The returned value is immutable;
    /// its `version` field identifies the state that was read.
    fn read(&self, artifact_id: &str) -> Result<GeometrySnapshot, StoreError>;

    /// Apply a patch if the artifact is still at the patch's from-version.
    /// Ops apply in list order, atomically: on any op failure nothing is
    /// committed.
    fn apply(&mut self, patch: &Patch) -> Result<ApplyOutcome, StoreError>;
}

/// Map-backed store for tests and local tooling.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    artifacts: HashMap<String, GeometrySnapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an artifact under its own id.
    pub fn insert(&mut self, snapshot: GeometrySnapshot) {
        self.artifacts.insert(snapshot.artifact_id.clone(), snapshot);
    }

    pub fn current_version(&self, artifact_id: &str) -> Option<u64> {
        self.artifacts.get(artifact_id).map(|s| s.version)
    }
}

impl ArtifactStore for InMemoryStore {
    fn read(&self, artifact_id: &str) -> Result<GeometrySnapshot, StoreError> {
        self.artifacts
            .get(artifact_id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownArtifact(artifact_id.to_string()))
    }

    fn apply(&mut self, patch: &Patch) -> Result<ApplyOutcome, StoreError> {
        patch.validate()?;

        let current = self
            .artifacts
            .get(&patch.artifact_id)
            .ok_or_else(|| StoreError::UnknownArtifact(patch.artifact_id.clone()))?;

        if patch.check_applicable(current.version).is_err() {
            warn!(
                artifact = %patch.artifact_id,
                patch_from = patch.from_version,
                current = current.version,
                "patch conflicts with current version"
            );
            return Ok(ApplyOutcome::Conflict {
                current_version: current.version,
            });
        }

        // Apply against a working copy so a failing op commits nothing.
        let mut next = current.clone();
        for op in &patch.ops {
            apply_op(&mut next, op)?;
        }
        next.version = patch.to_version;

        info!(
            artifact = %patch.artifact_id,
            version = next.version,
            ops = patch.op_count(),
            "applied patch"
        );
        self.artifacts.insert(patch.artifact_id.clone(), next);
        Ok(ApplyOutcome::Applied {
            new_version: patch.to_version,
        })
    }
}

fn apply_op(snapshot: &mut GeometrySnapshot, op: &PatchOp) -> Result<(), StoreError> {
    match op {
        PatchOp::MoveComponent { footprint_id, to } => {
            let footprint = snapshot
                .footprints
                .iter_mut()
                .find(|f| &f.id == footprint_id)
                .ok_or_else(|| StoreError::UnknownTarget {
                    kind: "footprint",
                    id: footprint_id.clone(),
                })?;
            let dx = to.x - footprint.position.x;
            let dy = to.y - footprint.position.y;
            footprint.position = *to;
            for pad in &mut footprint.pads {
                pad.position.x += dx;
                pad.position.y += dy;
            }
        }
        PatchOp::MoveTrackSegment {
            track_id,
            start,
            end,
        } => {
            let track = snapshot
                .tracks
                .iter_mut()
                .find(|t| &t.id == track_id)
                .ok_or_else(|| StoreError::UnknownTarget {
                    kind: "track",
                    id: track_id.clone(),
                })?;
            track.start = *start;
            track.end = *end;
        }
        PatchOp::AddTrackSegment { track } => {
            snapshot.tracks.push(track.clone());
        }
        PatchOp::DeleteTrackSegment { track_id } => {
            let before = snapshot.tracks.len();
            snapshot.tracks.retain(|t| &t.id != track_id);
            if snapshot.tracks.len() == before {
                return Err(StoreError::UnknownTarget {
                    kind: "track",
                    id: track_id.clone(),
                });
            }
        }
        PatchOp::AddVia { via } => {
            snapshot.vias.push(via.clone());
        }
        PatchOp::DeleteVia { via_id } => {
            let before = snapshot.vias.len();
            snapshot.vias.retain(|v| &v.id != via_id);
            if snapshot.vias.len() == before {
                return Err(StoreError::UnknownTarget {
                    kind: "via",
                    id: via_id.clone(),
                });
            }
        }
        PatchOp::RegionReroute {
            net,
            region,
            tracks,
        } => {
            snapshot.tracks.retain(|t| {
                t.net != Some(*net)
                    || !(region.contains(&t.start) && region.contains(&t.end))
            });
            snapshot.tracks.extend(tracks.iter().cloned());
        }
        PatchOp::UpdateNetclassWidth { netclass, width } => {
            snapshot
                .setup
                .netclass_widths
                .insert(netclass.clone(), *width);
        }
        PatchOp::UpdateClearanceParam { clearance } => {
            snapshot.setup.clearance = *clearance;
        }
    }
    debug!(op = op.kind(), "applied op");
    Ok(())
}
