//! vizij-face-api: shared vocabulary for the face animation crates (core, engine-agnostic)
//!
//! - `TargetKey`: what a curve or transition writes (AU, viseme index, raw morph)
//! - `TargetValueTable`: the single-owner per-frame value store
//! - `RigWriteBatch` / `RigSink`: renderer-facing output contract
//! - `math`: small quaternion/vector helpers on plain `[f32; N]` arrays

pub mod math;
pub mod sink;
pub mod table;
pub mod target;
pub mod write_ops;

pub use sink::{RecordingSink, RigSink};
pub use table::TargetValueTable;
pub use target::{ParseTargetKeyError, TargetKey};
pub use write_ops::{BonePose, BoneWrite, MorphWrite, RigWriteBatch};

/// Quaternion stored as (x, y, z, w).
pub type Quat = [f32; 4];

/// 3D vector.
pub type Vec3 = [f32; 3];
