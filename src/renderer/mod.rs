//! Scene geometry rendering.
//!
//! The demo draws its occluders flat black into the scene color and depth
//! buffers that the god-ray effect then reads.

pub(crate) mod pipeline_util;
pub mod solid;
