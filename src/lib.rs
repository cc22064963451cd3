//! # tts-normalize
//!
//! Text normalization front end for a text-to-speech engine: turns raw
//! user text into text a synthesizer can speak naturally.
//!
//! ## Quick start
//!
//! ```
//! use tts_normalize::{EffectiveConfiguration, TextProcessor};
//!
//! let processor = TextProcessor::new();
//! let result = processor.process("Buy TSLA for $5.", &EffectiveConfiguration::default());
//! assert_eq!(result.text, "Buy T-S-L-A for five dollars.");
//! ```
//!
//! With a shared, hot-reloaded configuration:
//!
//! ```no_run
//! use std::sync::Arc;
//! use tts_normalize::{ConfigResolver, ConfigSources, TextProcessor};
//!
//! let resolver = Arc::new(ConfigResolver::new(ConfigSources {
//!     base: Some("config/settings.json".into()),
//!     env_prefix: Some("TTS_NORMALIZE".to_string()),
//!     ..Default::default()
//! }));
//! let _watcher = resolver.watch().unwrap();
//!
//! let config = resolver.snapshot();
//! let text = TextProcessor::new().process("See you at 3:30 pm.", &config).text;
//! ```
//!
//! ## Pipeline
//! 1. **Segmentation**: the input is tiled into typed spans (URL, date,
//!    currency, number, word, punctuation, ...).  Literal spans are never
//!    split.
//! 2. **Normalization**: nine stages run in a fixed order: URL, date,
//!    currency, number, contraction, proper noun, acronym, homograph,
//!    symbol.  The first stage to rewrite a span settles it.
//! 3. **Reassembly**: spans are joined and whitespace/pauses cleaned up.
//! 4. **Chunking**: [`split_sentences`] cuts the result into sentences
//!    with an intonation hint each.

pub mod config;
pub mod error;
pub mod normalize;
pub mod numbers;
pub mod pipeline;
pub mod resolver;
pub mod rules;
pub mod segment;
pub mod tables;

// ─── Re-exports for convenience ─────────────────────────────────────────────

pub use config::EffectiveConfiguration;
pub use error::{ConfigError, NormalizeError};
pub use normalize::{Category, Normalize, Outcome};
pub use pipeline::{Change, NormalizationResult, StageFailure, TextProcessor};
pub use resolver::{ConfigResolver, ConfigSources, ConfigWatcher};
pub use segment::{segment, split_sentences, Intonation, Sentence, SpanTag, TextSpan};
