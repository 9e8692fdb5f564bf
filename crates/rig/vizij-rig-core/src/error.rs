//! Error types for profile loading and validation.

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum RigError {
    /// Profile JSON could not be parsed.
    #[error("profile parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A composite rotation axis names a translation channel.
    #[error("composite rotation for bone '{bone}' uses non-rotation channel on {axis} axis")]
    NonRotationAxis { bone: String, axis: &'static str },

    /// A composite rotation axis was declared with no contributing AUs.
    #[error("composite rotation for bone '{bone}' has an empty {axis} axis")]
    EmptyAxis { bone: String, axis: &'static str },

    /// A mix weight lies outside [0,1].
    #[error("mix weight for AU {au} must be within [0,1], got {weight}")]
    InvalidMixWeight { au: u32, weight: f32 },

    /// A bone binding carries a non-finite scale or limit.
    #[error("bone binding for AU {au} on '{bone}' has a non-finite value")]
    NonFiniteBinding { au: u32, bone: String },
}
