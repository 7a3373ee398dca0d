use crate::config::NormalizeConfig;
use crate::error::{NormalizeError, Result};
use serde::Serialize;
use std::time::Instant;

use super::steps::{self, background::RemovalStats};
use super::PixelGrid;

/// Pipeline states, in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Decoded,
    MarkerFound,
    Cropped,
    BackgroundRemoved,
    LeftPadded,
    BoxPadded,
    Flattened,
    Encoded,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decoded => "decoded",
            Self::MarkerFound => "marker_found",
            Self::Cropped => "cropped",
            Self::BackgroundRemoved => "background_removed",
            Self::LeftPadded => "left_padded",
            Self::BoxPadded => "box_padded",
            Self::Flattened => "flattened",
            Self::Encoded => "encoded",
        }
    }
}

/// Timing information for a single step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeOutput {
    /// Encoded PNG (not serialized)
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Column where the marker color first appeared in the input
    pub marker_column: u32,
    pub removal: RemovalStats,
    pub total_time_ms: u64,
    pub steps: Vec<StepTiming>,
    /// Grid produced by each stage, when capture is enabled (not serialized)
    #[serde(skip)]
    pub intermediates: Vec<(Stage, PixelGrid)>,
}

/// Stateless normalization pipeline
///
/// Holds only configuration, so one instance can serve concurrent callers.
#[derive(Debug)]
pub struct Pipeline {
    config: NormalizeConfig,
    capture_intermediates: bool,
}

impl Pipeline {
    pub fn new(config: NormalizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            capture_intermediates: false,
        })
    }

    /// Keep a copy of every intermediate grid in the output
    pub fn capture_intermediates(mut self, enabled: bool) -> Self {
        self.capture_intermediates = enabled;
        self
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Run every stage on `bytes`; the first failing stage aborts the run
    pub fn process(&self, bytes: &[u8]) -> Result<NormalizeOutput> {
        let start = Instant::now();
        let mut timings = Vec::new();
        let mut intermediates = Vec::new();
        let config = &self.config;

        let step_start = Instant::now();
        let grid = steps::codec::decode(bytes)?;
        self.record(Stage::Decoded, step_start, &grid, &mut timings, &mut intermediates);
        tracing::debug!(width = grid.width(), height = grid.height(), "Decoded image");

        let step_start = Instant::now();
        let marker = config.marker_policy();
        let marker_column = steps::scan::find_marker_column(&grid, &marker).ok_or(
            NormalizeError::NoMarkerFound {
                marker: marker.color,
                tolerance: marker.tolerance,
                width: grid.width(),
                height: grid.height(),
            },
        )?;
        timings.push(StepTiming {
            name: Stage::MarkerFound.as_str().to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        tracing::debug!(marker_column, "Found marker column");

        let grid = self.run_step(Stage::Cropped, grid, &mut timings, &mut intermediates, |g| {
            steps::crop::crop_columns(&g, marker_column)
        })?;

        let mut removal = RemovalStats::default();
        let grid = self.run_step(
            Stage::BackgroundRemoved,
            grid,
            &mut timings,
            &mut intermediates,
            |g| {
                let (out, stats) = steps::background::remove_background(
                    &g,
                    &config.background_policy(),
                    config.recenter,
                )?;
                removal = stats;
                Ok(out)
            },
        )?;
        tracing::debug!(
            total = removal.total_pixels,
            background = removal.background_pixels,
            preserved = removal.preserved_pixels,
            original_width = removal.original_width,
            output_width = removal.output_width,
            "Background removal stats ({:.2}% preserved)",
            removal.preserved_percent()
        );

        let grid = self.run_step(Stage::LeftPadded, grid, &mut timings, &mut intermediates, |g| {
            steps::pad::pad_left(&g, config.left_padding)
        })?;

        let mut grid = self.run_step(Stage::BoxPadded, grid, &mut timings, &mut intermediates, |g| {
            steps::pad::pad_around_content(&g, config.box_padding_h, config.box_padding_v)
        })?;

        if config.flatten_foreground {
            grid = self.run_step(Stage::Flattened, grid, &mut timings, &mut intermediates, |g| {
                Ok(steps::flatten::flatten_foreground(&g, config.ink_color))
            })?;
        }

        let step_start = Instant::now();
        let encoded = steps::codec::encode(&grid)?;
        timings.push(StepTiming {
            name: Stage::Encoded.as_str().to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });

        Ok(NormalizeOutput {
            bytes: encoded,
            width: grid.width(),
            height: grid.height(),
            marker_column,
            removal,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
            intermediates,
        })
    }

    fn run_step<F>(
        &self,
        stage: Stage,
        grid: PixelGrid,
        timings: &mut Vec<StepTiming>,
        intermediates: &mut Vec<(Stage, PixelGrid)>,
        step_fn: F,
    ) -> Result<PixelGrid>
    where
        F: FnOnce(PixelGrid) -> Result<PixelGrid>,
    {
        let step_start = Instant::now();
        let result = step_fn(grid)?;
        self.record(stage, step_start, &result, timings, intermediates);
        Ok(result)
    }

    fn record(
        &self,
        stage: Stage,
        step_start: Instant,
        grid: &PixelGrid,
        timings: &mut Vec<StepTiming>,
        intermediates: &mut Vec<(Stage, PixelGrid)>,
    ) {
        timings.push(StepTiming {
            name: stage.as_str().to_string(),
            time_ms: step_start.elapsed().as_millis() as u64,
        });
        if self.capture_intermediates {
            intermediates.push((stage, grid.clone()));
        }
    }
}
