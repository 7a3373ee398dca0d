//! Image normalization pipeline for OCR input
//!
//! Decodes an image, crops away the left margin up to a marker color, turns the
//! background transparent and pads the content to a canonical layout.

pub mod color;
pub mod grid;
pub mod pipeline;
pub mod steps;

pub use color::{Color, ColorMatchPolicy, ColorMetric};
pub use grid::{BoundingBox, PixelGrid};
pub use pipeline::{NormalizeOutput, Pipeline, Stage, StepTiming};
pub use steps::background::RemovalStats;
