//! Demo camera: mouse-follow eye looking at the origin.

/// Mouse-follow camera controller owning the GPU uniform.
pub mod controller;
/// Core camera struct and GPU uniform type.
pub mod core;
