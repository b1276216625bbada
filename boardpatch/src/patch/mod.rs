pub mod model;
pub mod ops;
pub mod synth;

// Re-export for convenience
pub use model::{Patch, PatchError, PatchMetadata, PatchState};
pub use ops::PatchOp;
pub use synth::{IdGenerator, PatchSynthesizer};
