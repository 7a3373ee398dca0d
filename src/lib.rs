//! Image normalization for OCR input
//!
//! Crops a screenshot to its region of interest, strips a known background
//! color to transparency and re-pads the result to a canonical layout.

pub mod config;
pub mod error;
pub mod preprocessing;

pub use config::NormalizeConfig;
pub use error::{NormalizeError, Result};
pub use preprocessing::{
    BoundingBox, Color, ColorMatchPolicy, ColorMetric, NormalizeOutput, Pipeline, PixelGrid,
    RemovalStats, Stage, StepTiming,
};
