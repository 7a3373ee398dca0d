use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An RGB comparison target. Never stored as pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse `#rrggbb` or `rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected #rrggbb, got {:?}", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("invalid color {:?}: {}", s, e))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Distance rule used to compare a pixel against a target color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMetric {
    /// Every channel within tolerance: `max(|dr|, |dg|, |db|) <= t`
    #[default]
    Chebyshev,
    /// Straight-line RGB distance: `sqrt(dr² + dg² + db²) <= t`
    Euclidean,
}

impl ColorMetric {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chebyshev" => Some(Self::Chebyshev),
            "euclidean" => Some(Self::Euclidean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chebyshev => "chebyshev",
            Self::Euclidean => "euclidean",
        }
    }
}

/// Target color plus tolerance and metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatchPolicy {
    pub color: Color,
    pub tolerance: f64,
    pub metric: ColorMetric,
}

impl ColorMatchPolicy {
    pub fn new(color: Color, tolerance: f64, metric: ColorMetric) -> Self {
        Self {
            color,
            tolerance,
            metric,
        }
    }

    /// Whether the RGB part of `pixel` matches. Alpha is not considered.
    /// A negative tolerance matches nothing.
    pub fn matches(&self, pixel: &[u8]) -> bool {
        if self.tolerance < 0.0 {
            return false;
        }
        let dr = (pixel[0] as i32 - self.color.r as i32).abs();
        let dg = (pixel[1] as i32 - self.color.g as i32).abs();
        let db = (pixel[2] as i32 - self.color.b as i32).abs();

        match self.metric {
            ColorMetric::Chebyshev => dr.max(dg).max(db) as f64 <= self.tolerance,
            ColorMetric::Euclidean => {
                let squared = (dr * dr + dg * dg + db * db) as f64;
                squared <= self.tolerance * self.tolerance
            }
        }
    }
}
