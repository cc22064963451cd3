//! Error types for configuration resolution and text normalization.
//!
//! None of these ever reach a caller of [`TextProcessor::process`]: they are
//! contained, logged, and surfaced only through the diagnostics attached to a
//! [`NormalizationResult`].
//!
//! [`TextProcessor::process`]: crate::pipeline::TextProcessor::process
//! [`NormalizationResult`]: crate::pipeline::NormalizationResult

use std::path::PathBuf;

use thiserror::Error;

use crate::normalize::Category;

/// Failures while loading or merging configuration layers.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON. The whole layer is skipped.
    #[error("malformed config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A single key was rejected; the previous value for it is kept.
    #[error("invalid value for `{key}`: {reason}")]
    Value { key: String, reason: String },
}

/// Failures inside the normalization pipeline.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// One normalizer failed on one span; that span is spoken verbatim.
    #[error("{category} normalizer failed on {span:?}: {reason}")]
    NormalizerFailure {
        category: Category,
        span: String,
        reason: String,
    },

    /// Segmentation did not tile the input. The request falls back to raw text.
    #[error("segmentation gap or overlap at byte {offset}")]
    TokenizationGap { offset: usize },
}
