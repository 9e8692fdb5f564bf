//! Vizij Rig Core (engine-agnostic)
//!
//! Turns AU / viseme channel values into concrete morph weights and bone poses:
//! - `profile`: the per-rig mapping document (AU → morphs, AU → bone bindings,
//!   bone naming rules, composite rotation axes, mix weights, viseme keys)
//! - `resolver`: lookups over a profile plus cached semantic-bone resolution
//! - `composite`: pitch/yaw/roll composition relative to cached base transforms
//! - `apply`: one pass over the value table producing a `RigWriteBatch`

pub mod apply;
pub mod composite;
pub mod error;
pub mod profile;
pub mod resolver;
pub mod scene;

pub use apply::RigApplier;
pub use composite::CompositeComposer;
pub use error::RigError;
pub use profile::{
    AxisConfig, AxisSource, BoneBinding, BoneChannel, BoneNodeRule, CompositeRotation, MorphSet,
    Profile,
};
pub use resolver::{BindReport, MappingResolver, ResolvedBone};
pub use scene::{MemoryScene, NodeSnapshot, RigScene};
