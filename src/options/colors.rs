use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::correlation_color::{CorrelationRamp, DEFAULT_SKEW};

/// Color mapping options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Colors", inline)]
#[serde(default)]
pub struct ColorOptions {
    /// Shift of the blend parameter; both ends saturate at `±(1 - skew)`.
    #[schemars(title = "Gradient Skew", range(min = 0.0, max = 0.5), extend("step" = 0.05))]
    pub correlation_skew: f32,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            correlation_skew: DEFAULT_SKEW,
        }
    }
}

impl ColorOptions {
    /// Ramp configured by these options.
    #[must_use]
    pub fn ramp(&self) -> CorrelationRamp {
        CorrelationRamp::new(self.correlation_skew)
    }
}
