//! Slice → point-cloud construction.
//!
//! One [`SliceVisual`] per time slice. It caches the reconstructed square
//! matrix so filter edits only re-run the dead-zone filter and the color
//! mapping, never the decode or the matrix reconstruction.

mod visual;

use serde::Serialize;

use crate::options::{FilterParameters, LayoutOptions, Options};
use crate::renderer::PointStyle;
use crate::util::correlation_color::CorrelationRamp;

pub use visual::SliceVisual;

/// Source of one rendered point, for hover inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointMetadata {
    /// Row residue index.
    pub residue_i: usize,
    /// Column residue index.
    pub residue_j: usize,
    /// Correlation value at `(residue_i, residue_j)`.
    pub value: f32,
}

/// How prominently a slice is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceEmphasis {
    /// Full point size: nothing is selected, or this slice is.
    Full,
    /// Another slice is selected; this one stays visible, shrunk.
    Dimmed,
    /// Another slice is selected and unselected layers are hidden.
    Hidden,
}

impl SliceEmphasis {
    /// Emphasis of slice `slice_index` under `filter`.
    #[must_use]
    pub fn for_slice(filter: &FilterParameters, slice_index: usize) -> Self {
        match filter.selection() {
            None => Self::Full,
            Some(s) if s == slice_index => Self::Full,
            Some(_) if filter.show_unselected_layers => Self::Dimmed,
            Some(_) => Self::Hidden,
        }
    }

    /// Renderer style for this emphasis.
    #[must_use]
    pub fn point_style(self, layout: &LayoutOptions) -> PointStyle {
        match self {
            Self::Full => PointStyle {
                size: layout.point_size,
                visible: true,
            },
            Self::Dimmed => PointStyle {
                size: layout.dimmed_point_size,
                visible: true,
            },
            Self::Hidden => PointStyle {
                size: layout.dimmed_point_size,
                visible: false,
            },
        }
    }
}

/// Presentation inputs shared by every slice build.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceStyle {
    /// Grid placement.
    pub layout: LayoutOptions,
    /// Value → color mapping.
    pub ramp: CorrelationRamp,
}

impl Default for SliceStyle {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            ramp: CorrelationRamp::default(),
        }
    }
}

impl SliceStyle {
    /// Style described by the layout and color sections of `options`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self {
            layout: options.layout.clone(),
            ramp: options.colors.ramp(),
        }
    }
}
