use crate::error::{NormalizeError, Result};
use crate::preprocessing::{Color, ColorMatchPolicy, ColorMetric};
use serde::{Deserialize, Serialize};

/// Background of the screenshots this pipeline was tuned on
pub const DEFAULT_BACKGROUND: Color = Color::new(19, 18, 24);

/// Largest accepted padding on any side, in pixels
pub const MAX_PADDING: u32 = 10_000;

/// Normalization configuration
///
/// Every field is optional when deserialized; missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct NormalizeConfig {
    /// Color whose first column marks the start of the region of interest
    pub marker_color: Color,
    pub marker_tolerance: f64,
    pub marker_metric: ColorMetric,
    /// Color turned transparent
    pub background_color: Color,
    pub background_tolerance: f64,
    pub background_metric: ColorMetric,
    pub left_padding: u32,
    pub box_padding_h: u32,
    pub box_padding_v: u32,
    /// Trim background columns and re-center the content
    pub recenter: bool,
    /// Paint all visible pixels with `ink_color` before encoding
    pub flatten_foreground: bool,
    pub ink_color: Color,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            marker_color: Color::WHITE,
            marker_tolerance: 10.0,
            marker_metric: ColorMetric::Chebyshev,
            background_color: DEFAULT_BACKGROUND,
            background_tolerance: 10.0,
            background_metric: ColorMetric::Chebyshev,
            left_padding: 20,
            box_padding_h: 30,
            box_padding_v: 10,
            recenter: false,
            flatten_foreground: false,
            ink_color: Color::BLACK,
        }
    }
}

impl NormalizeConfig {
    /// Parse a JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| NormalizeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("markerTolerance", self.marker_tolerance),
            ("backgroundTolerance", self.background_tolerance),
        ] {
            if !value.is_finite() {
                return Err(NormalizeError::InvalidConfig(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [
            ("leftPadding", self.left_padding),
            ("boxPaddingH", self.box_padding_h),
            ("boxPaddingV", self.box_padding_v),
        ] {
            if value > MAX_PADDING {
                return Err(NormalizeError::InvalidConfig(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_PADDING, value
                )));
            }
        }
        Ok(())
    }

    pub fn marker_policy(&self) -> ColorMatchPolicy {
        ColorMatchPolicy::new(self.marker_color, self.marker_tolerance, self.marker_metric)
    }

    pub fn background_policy(&self) -> ColorMatchPolicy {
        ColorMatchPolicy::new(
            self.background_color,
            self.background_tolerance,
            self.background_metric,
        )
    }
}
