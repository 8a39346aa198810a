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
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
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

//! Sliced dynamic cross-correlation matrix (DCCM) pipeline.
//!
//! Loads time-sliced residue-residue correlation matrices from a packed
//! binary format and turns every slice into a colored, threshold-filtered
//! point cloud that can be re-filtered and paged through interactively.
//!
//! # Key entry points
//!
//! - [`format::decode`] / [`format::encode`] - the packed wire format
//! - [`dataset::DccmDataset`] - symmetric-matrix addressing over the
//!   packed upper triangles
//! - [`slice::SliceVisual`] - filter + color + metadata for one slice
//! - [`engine::DatasetManager`] - load, display, re-filter, swap, dispose
//! - [`options::Options`] - TOML presets and the parameter-panel schema
//!
//! # Architecture
//!
//! Fetch and decode run on one background loader thread; everything else
//! happens on the caller's thread. The manager is pumped once per frame,
//! installs the newest finished load, and talks to the scene graph only
//! through [`renderer::PointCloudRenderer`]. Filter edits rebuild slices
//! from cached matrices and replace vertex buffers in place.

pub mod dataset;
pub mod engine;
pub mod error;
pub mod format;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod slice;
pub mod source;
pub mod util;

pub use error::DccmError;
