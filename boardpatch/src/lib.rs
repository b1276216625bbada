//! BoardPatch - versioned patch model and autorouting engine for PCB designs
//!
//! This library reads a geometric snapshot of a board, proposes routing and
//! placement changes, and expresses them as versioned, reviewable patches
//! instead of mutating the board directly. Patches target exactly the next
//! version of the snapshot they were generated from, so concurrent
//! proposals resolve deterministically at the artifact store.
//!
//! # Quick Start
//!
//! ```no_run
//! use boardpatch::{BoardPatchCore, EngineOptions, GeometrySnapshot};
//!
//! let json = std::fs::read_to_string("board.json").unwrap();
//! let snapshot: GeometrySnapshot = serde_json::from_str(&json).unwrap();
//!
//! let options = EngineOptions::default();
//! let report = BoardPatchCore::route_unconnected_nets(&snapshot, &options, None).unwrap();
//!
//! for patch in &report.patches {
//!     println!("{} -> {}: {} op(s)", patch.from_version, patch.to_version, patch.op_count());
//! }
//! ```
//!
//! # Features
//!
//! - **Autorouting**: grid-based A* with obstacle clearance and diagonal moves
//! - **Placement optimization**: pairwise footprint spacing repair
//! - **Versioned patches**: closed operation set, `to = from + 1` contract
//! - **Store interface**: optimistic-concurrency application boundary

pub mod cache;
pub mod core;
pub mod geometry;
pub mod obstacles;
pub mod patch;
pub mod placement;
pub mod router;
pub mod store;

// Re-export main types
pub use crate::core::{
    BoardPatchCore, EngineError, EngineOptions, RoutingReport, RoutingStats, DEFAULT_MAX_NETS,
};
pub use cache::{CacheKey, SuggestionCache};
pub use geometry::{GeometryIndex, GeometrySnapshot, Net, Point, Rect};
pub use obstacles::{Obstacle, ObstacleSet};
pub use patch::{Patch, PatchError, PatchMetadata, PatchOp, PatchState, PatchSynthesizer};
pub use placement::{MoveDirective, PlacementOptimizer};
pub use router::{RouteOutcome, Router};
pub use store::{ApplyOutcome, ArtifactStore, InMemoryStore, StoreError};

/// Parse a board snapshot from JSON (convenience wrapper).
pub fn parse_snapshot(json: &str) -> Result<GeometrySnapshot, EngineError> {
    serde_json::from_str(json).map_err(|e| EngineError::Other(format!("parse error: {}", e)))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ApplyOutcome, ArtifactStore, BoardPatchCore, EngineError, EngineOptions, GeometrySnapshot,
        InMemoryStore, Patch, PatchOp, RoutingReport,
    };
}
