//! Versioned Patch Model
//!
//! A patch is an ordered, atomic set of operations transforming one board
//! version into the next. The version contract `to_version = from_version
//! + 1` is enforced at construction so an invalid patch can never be
//! submitted; applicability against a live artifact is a separate,
//! optimistic check the store repeats at application time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::ops::PatchOp;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("version contract violated: to_version {to} must equal from_version {from} + 1")]
    VersionContract { from: u64, to: u64 },

    #[error("version conflict: patch targets version {expected}, artifact is at {actual}")]
    VersionConflict { expected: u64, actual: u64 },
}

/// Who produced a patch and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchMetadata {
    pub author: String,
    /// Producing subsystem, e.g. "router" or "placement".
    pub source: String,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PatchMetadata {
    pub fn new(author: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            source: source.into(),
            explanation: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// Lifecycle of a patch relative to its target artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchState {
    Proposed,
    Accepted,
    Rejected,
}

/// An ordered, atomic set of edits against one artifact version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub artifact_id: String,
    pub from_version: u64,
    pub to_version: u64,
    /// Operations apply in list order. May be empty.
    pub ops: Vec<PatchOp>,
    pub metadata: PatchMetadata,
}

impl Patch {
    /// Build a patch against `from_version`; `to_version` is always the
    /// immediate successor.
    pub fn new(
        artifact_id: impl Into<String>,
        from_version: u64,
        ops: Vec<PatchOp>,
        metadata: PatchMetadata,
    ) -> Self {
        let artifact_id = artifact_id.into();
        debug!(
            artifact = %artifact_id,
            from_version,
            ops = ops.len(),
            "constructed patch"
        );
        Self {
            artifact_id,
            from_version,
            to_version: from_version + 1,
            ops,
            metadata,
        }
    }

    /// Build a patch from explicit versions, validating the version
    /// contract. Use for patches arriving from outside the engine.
    pub fn with_versions(
        artifact_id: impl Into<String>,
        from_version: u64,
        to_version: u64,
        ops: Vec<PatchOp>,
        metadata: PatchMetadata,
    ) -> Result<Self, PatchError> {
        if to_version != from_version + 1 {
            return Err(PatchError::VersionContract {
                from: from_version,
                to: to_version,
            });
        }
        Ok(Self::new(artifact_id, from_version, ops, metadata))
    }

    /// Re-check the version contract, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), PatchError> {
        if self.to_version != self.from_version + 1 {
            return Err(PatchError::VersionContract {
                from: self.from_version,
                to: self.to_version,
            });
        }
        Ok(())
    }

    /// Optimistic-concurrency guard: the patch applies only to the exact
    /// version it was generated from. On conflict the caller regenerates
    /// from a fresh snapshot; the engine does not rebase.
    pub fn check_applicable(&self, current_version: u64) -> Result<(), PatchError> {
        if current_version != self.from_version {
            return Err(PatchError::VersionConflict {
                expected: self.from_version,
                actual: current_version,
            });
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }
}
