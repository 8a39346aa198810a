use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Dead-zone thresholds and slice selection.
///
/// Values are immutable snapshots: a change produces a new value that is
/// handed to the lifecycle manager in one explicit rebuild call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "DCCM Settings", inline)]
#[serde(default)]
pub struct FilterParameters {
    /// Values above `-negative_threshold` (and below the positive
    /// threshold) are hidden.
    #[schemars(
        title = "Negative Threshold",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.05)
    )]
    pub negative_threshold: f32,
    /// Values below `positive_threshold` (and above the negative
    /// threshold) are hidden.
    #[schemars(
        title = "Positive Threshold",
        range(min = 0.0, max = 1.0),
        extend("step" = 0.05)
    )]
    pub positive_threshold: f32,
    /// Slice to emphasize, or -1 for all slices.
    #[schemars(title = "Selected Slice", range(min = -1), extend("step" = 1))]
    pub selected_slice: i32,
    /// Keep non-selected slices visible at a reduced point size.
    #[schemars(title = "Show Unselected Layers")]
    pub show_unselected_layers: bool,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            negative_threshold: 0.4,
            positive_threshold: 0.4,
            selected_slice: -1,
            show_unselected_layers: true,
        }
    }
}

impl FilterParameters {
    /// Whether `value` falls inside the open band
    /// `(-negative_threshold, positive_threshold)` and is hidden.
    #[must_use]
    pub fn is_dropped(&self, value: f32) -> bool {
        value > -self.negative_threshold && value < self.positive_threshold
    }

    /// Selected slice index, `None` when all slices are shown.
    #[must_use]
    pub fn selection(&self) -> Option<usize> {
        usize::try_from(self.selected_slice).ok()
    }

    /// Copy with new thresholds.
    #[must_use]
    pub fn with_thresholds(self, negative: f32, positive: f32) -> Self {
        Self {
            negative_threshold: negative,
            positive_threshold: positive,
            ..self
        }
    }

    /// Copy selecting `slice` (`None` shows all).
    #[must_use]
    pub fn with_selection(self, slice: Option<usize>) -> Self {
        Self {
            selected_slice: slice.map_or(-1, |s| s as i32),
            ..self
        }
    }

    /// Copy whose selection is valid for `num_slices`; an out-of-range
    /// selection falls back to showing all slices.
    #[must_use]
    pub fn fitted_to(self, num_slices: usize) -> Self {
        match self.selection() {
            Some(s) if s >= num_slices => self.with_selection(None),
            _ if self.selected_slice < -1 => self.with_selection(None),
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_is_open_and_asymmetric() {
        let f = FilterParameters::default().with_thresholds(0.2, 0.5);
        assert!(f.is_dropped(0.0));
        assert!(f.is_dropped(0.49));
        assert!(!f.is_dropped(0.5));
        assert!(f.is_dropped(-0.19));
        assert!(!f.is_dropped(-0.2));
        assert!(!f.is_dropped(-0.3));
    }

    #[test]
    fn zero_thresholds_keep_everything_but_nothing_is_inside() {
        let f = FilterParameters::default().with_thresholds(0.0, 0.0);
        assert!(!f.is_dropped(0.0));
        assert!(!f.is_dropped(-0.01));
    }

    #[test]
    fn selection_round_trip() {
        let f = FilterParameters::default();
        assert_eq!(f.selection(), None);
        let f = f.with_selection(Some(3));
        assert_eq!(f.selected_slice, 3);
        assert_eq!(f.selection(), Some(3));
    }

    #[test]
    fn fitted_resets_out_of_range_selection() {
        let f = FilterParameters::default().with_selection(Some(7));
        assert_eq!(f.fitted_to(8).selection(), Some(7));
        assert_eq!(f.fitted_to(7).selection(), None);
        let bogus = FilterParameters {
            selected_slice: -5,
            ..FilterParameters::default()
        };
        assert_eq!(bogus.fitted_to(3).selected_slice, -1);
    }
}
