//! Error types for the fallible edges of the crate.
//!
//! Interaction itself never fails: unknown ids, sub-threshold gestures and a
//! missing text layer all degrade to no-ops. Errors only arise when the host
//! hands over configuration or JSON that cannot be used.

/// Error returned when building or validating a [`crate::config::ViewerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be parsed into a configuration.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// `min_scale` is not positive or exceeds `max_scale`.
    #[error("invalid scale range: min {min} max {max}")]
    InvalidScaleRange { min: f64, max: f64 },

    /// `zoom_step` must be a positive finite number.
    #[error("invalid zoom step: {0}")]
    InvalidZoomStep(f64),

    /// A numeric field is NaN or infinite.
    #[error("non-finite value for {field}")]
    NonFinite { field: &'static str },

    /// A threshold is negative.
    #[error("negative threshold for {field}: {value}")]
    NegativeThreshold { field: &'static str, value: f64 },

    /// Pages are numbered from 1.
    #[error("page number must be at least 1")]
    InvalidPage,
}

/// Error returned when loading or running a replay script.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid replay script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config in replay script: {0}")]
    Config(#[from] ConfigError),
}
