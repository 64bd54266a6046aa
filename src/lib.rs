// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Screen-space god-ray (light shaft) post-processing built on wgpu.
//!
//! The effect turns the scene depth buffer into an occlusion mask, smears
//! that mask radially toward the light's screen position over three
//! ping-pong blur passes, and adds the inverted result onto the scene
//! color. A fake-sun pass paints a soft glow at the light position for
//! scenes where the light itself has no geometry.
//!
//! # Key entry points
//!
//! - [`effect::GodraysEffect`] - the four-stage pass sequencer
//! - [`effect::kernels`] - the per-pixel math, runnable on the CPU
//! - [`effect::reference`] - a CPU execution of the whole pipeline
//! - [`engine::GodraysEngine`] - a small demo renderer driving the effect
//! - [`options::Options`] - TOML-backed runtime configuration
//!
//! # Frame order
//!
//! fake sun → solid occluders (color + depth) → depth mask → radial blur
//! ×3 → combine.

pub mod camera;
pub mod effect;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod options;
pub mod renderer;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::GodraysEngine;
pub use error::GodraysError;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
