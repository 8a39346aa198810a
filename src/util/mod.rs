//! Shared utilities.
//!
//! Correlation-to-color mapping and frame pacing for the event loop.

pub mod correlation_color;
pub mod frame_timing;
