use thiserror::Error;

use crate::preprocessing::Color;

pub type Result<T> = std::result::Result<T, NormalizeError>;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Pixel buffer of {len} bytes does not match a {width}x{height} RGBA image")]
    DimensionMismatch { width: u32, height: u32, len: usize },

    #[error("No column matches marker {marker} (tolerance {tolerance}) in {width}x{height} image")]
    NoMarkerFound {
        marker: Color,
        tolerance: f64,
        width: u32,
        height: u32,
    },

    #[error("No content left to keep after {stage} ({width}x{height} image)")]
    EmptyContent {
        stage: &'static str,
        width: u32,
        height: u32,
    },

    #[error("Crop region {region} is outside {width}x{height} image")]
    CropOutOfBounds {
        region: String,
        width: u32,
        height: u32,
    },

    #[error("Image too large: {width}x{height} (max: {max_pixels} pixels)")]
    ImageTooLarge {
        width: u64,
        height: u64,
        max_pixels: u64,
    },

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NormalizeError {
    /// Stable machine-readable code for logs and callers
    pub fn code(&self) -> &'static str {
        match self {
            NormalizeError::Decode(_) | NormalizeError::DimensionMismatch { .. } => "DECODE_ERROR",
            NormalizeError::NoMarkerFound { .. } => "NO_MARKER_FOUND",
            NormalizeError::EmptyContent { .. } => "EMPTY_CONTENT",
            NormalizeError::CropOutOfBounds { .. } => "CROP_OUT_OF_BOUNDS",
            NormalizeError::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",
            NormalizeError::Encode(_) => "ENCODE_ERROR",
            NormalizeError::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }

    /// True for errors caused by the input bytes rather than configuration
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            NormalizeError::Decode(_) | NormalizeError::DimensionMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_is_decode_class() {
        let err = NormalizeError::DimensionMismatch {
            width: 2,
            height: 2,
            len: 3,
        };
        assert!(err.is_decode_error());
        assert_eq!(err.code(), "DECODE_ERROR");
    }

    #[test]
    fn test_no_marker_message_names_marker() {
        let err = NormalizeError::NoMarkerFound {
            marker: Color::WHITE,
            tolerance: 10.0,
            width: 4,
            height: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("#ffffff"), "unexpected message: {}", msg);
        assert!(msg.contains("4x3"));
        assert_eq!(err.code(), "NO_MARKER_FOUND");
    }

    #[test]
    fn test_only_input_errors_are_decode_class() {
        assert!(NormalizeError::Decode("bad header".to_string()).is_decode_error());
        let others = [
            NormalizeError::EmptyContent {
                stage: "box padding",
                width: 1,
                height: 1,
            },
            NormalizeError::ImageTooLarge {
                width: 1 << 33,
                height: 1,
                max_pixels: 100,
            },
            NormalizeError::Encode("x".to_string()),
            NormalizeError::InvalidConfig("x".to_string()),
        ];
        for err in others {
            assert!(!err.is_decode_error(), "{}", err.code());
        }
    }
}
