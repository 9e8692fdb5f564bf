//! Easing curves used by transitions and by producers that pre-bake eased keyframes.

pub mod easing;

pub use easing::Easing;
