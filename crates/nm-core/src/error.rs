//! Error types shared by the view and configuration layers.

/// A view transform could not be built.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ViewError {
    #[error("scale factor must be finite and > 0, got {0}")]
    InvalidScale(f64),
    #[error("view origin must be finite, got ({0}, {1})")]
    InvalidOrigin(f64, f64),
}

/// Editor configuration is unreadable or inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("zoom range [{min}, {max}] is empty or non-positive")]
    ZoomRange { min: f64, max: f64 },
    #[error("initial scale {0} lies outside the zoom range")]
    InitialScale(f64),
    #[error("wheel rate must be > 0, got {0}")]
    WheelRate(f64),
    #[error("canvas size must be > 0, got {width}x{height}")]
    CanvasSize { width: f64, height: f64 },
}
