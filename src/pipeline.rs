//! The unified text processor.
//!
//! ```text
//! input ─► segment ─► coverage check ─► stages (fixed order) ─► reassemble ─► cleanup
//! ```
//!
//! Every span is settled by the first stage that rewrites it; later stages
//! never see a rewritten span.  Stage errors and panics are contained to the
//! span they happened on, which is then spoken verbatim.  A segmentation
//! that does not tile the input falls back to the raw text.

use std::panic::{catch_unwind, AssertUnwindSafe};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::EffectiveConfiguration;
use crate::error::NormalizeError;
use crate::normalize::{default_stages, Category, Normalize, Outcome, SpanContext};
use crate::segment::{check_coverage, segment, split_sentences, Sentence, TextSpan};

// ─────────────────────────────────────────────────────────────────────────────
// Result types
// ─────────────────────────────────────────────────────────────────────────────

/// One applied rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub category: Category,
    pub original: String,
    pub replacement: String,
    pub rule_id: &'static str,
    /// Byte offset of `original` in the input.
    pub start: usize,
}

/// A contained failure.  `category` is `None` for segmentation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub category: Option<Category>,
    pub span: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct NormalizationResult {
    pub text: String,
    /// Ordered by position in the input.
    pub changes: Vec<Change>,
    pub failures: Vec<StageFailure>,
}

impl NormalizationResult {
    fn passthrough(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    /// Chunk the normalized text for the synthesizer.
    pub fn sentences(&self, max_chars: usize) -> Vec<Sentence> {
        split_sentences(&self.text, max_chars)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cleanup
// ─────────────────────────────────────────────────────────────────────────────

static RE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.;:!?…])").unwrap());
static RE_REPEATED_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",(?:\s*,)+").unwrap());
static RE_PAUSE_BEFORE_STOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;:]+\s*([.!?…])").unwrap());
static RE_LEADING_PAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s,;:]+").unwrap());

fn cleanup(text: &str, config: &EffectiveConfiguration) -> String {
    let mut text = if config.text_processing.collapse_whitespace {
        RE_SPACES.replace_all(text, " ").into_owned()
    } else {
        text.to_string()
    };
    text = RE_SPACE_BEFORE_PUNCT.replace_all(&text, "$1").into_owned();
    text = RE_REPEATED_COMMA.replace_all(&text, ",").into_owned();
    text = RE_PAUSE_BEFORE_STOP.replace_all(&text, "$1").into_owned();
    text = RE_LEADING_PAUSE.replace(&text, "").into_owned();
    text.trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// TextProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Runs the normalizers over a text in pipeline order.
///
/// Holds no per-request state; share one instance across threads.
pub struct TextProcessor {
    stages: Vec<Box<dyn Normalize>>,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    /// All built-in normalizers.
    pub fn new() -> Self {
        Self {
            stages: default_stages(),
        }
    }

    /// Replace the stage for `stage.category()`, or append it if absent.
    pub fn with_stage(mut self, stage: Box<dyn Normalize>) -> Self {
        let category = stage.category();
        match self.stages.iter_mut().find(|s| s.category() == category) {
            Some(slot) => *slot = stage,
            None => self.stages.push(stage),
        }
        self
    }

    pub fn categories(&self) -> Vec<Category> {
        self.stages.iter().map(|s| s.category()).collect()
    }

    pub fn process(&self, text: &str, config: &EffectiveConfiguration) -> NormalizationResult {
        if !config.text_processing.enabled || text.is_empty() {
            return NormalizationResult::passthrough(text);
        }

        let spans = segment(text);
        if let Err(e) = check_coverage(text, &spans) {
            warn!(error = %e, "segmentation failed, speaking raw text");
            let mut result = NormalizationResult::passthrough(text);
            result.failures.push(StageFailure {
                category: None,
                span: text.to_string(),
                reason: e.to_string(),
            });
            return result;
        }

        let mut rendered: Vec<Option<String>> = vec![None; spans.len()];
        let mut settled = vec![false; spans.len()];
        let mut changes = Vec::new();
        let mut failures = Vec::new();

        for stage in &self.stages {
            let category = stage.category();
            if !config.is_enabled(category) {
                continue;
            }
            for (index, span) in spans.iter().enumerate() {
                if settled[index] || !category.accepts(span.tag) {
                    continue;
                }
                let context = SpanContext::new(&spans, index);
                match run_stage(stage.as_ref(), span, config, &context) {
                    Ok(Outcome::Unchanged) => {}
                    Ok(Outcome::Rewritten { text, rule_id }) => {
                        changes.push(Change {
                            category,
                            original: span.text.to_string(),
                            replacement: text.clone(),
                            rule_id,
                            start: span.start,
                        });
                        rendered[index] = Some(text);
                        settled[index] = true;
                    }
                    Err(e) => {
                        warn!(category = %category, span = span.text, error = %e, "normalizer failed, keeping span");
                        failures.push(StageFailure {
                            category: Some(category),
                            span: span.text.to_string(),
                            reason: e.to_string(),
                        });
                        settled[index] = true;
                    }
                }
            }
        }

        let joined: String = spans
            .iter()
            .zip(&rendered)
            .map(|(span, out)| out.as_deref().unwrap_or(span.text))
            .collect();
        changes.sort_by_key(|c: &Change| c.start);
        debug!(spans = spans.len(), changes = changes.len(), failures = failures.len(), "normalized");

        NormalizationResult {
            text: cleanup(&joined, config),
            changes,
            failures,
        }
    }
}

/// Run one stage on one span, turning a panic into a [`NormalizeError`].
fn run_stage(
    stage: &dyn Normalize,
    span: &TextSpan<'_>,
    config: &EffectiveConfiguration,
    context: &SpanContext<'_>,
) -> Result<Outcome, NormalizeError> {
    catch_unwind(AssertUnwindSafe(|| stage.normalize(span, config, context))).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string());
        Err(NormalizeError::NormalizerFailure {
            category: stage.category(),
            span: span.text.to_string(),
            reason,
        })
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Intonation;

    fn normalize(text: &str) -> String {
        TextProcessor::new().process(text, &EffectiveConfiguration::default()).text
    }

    fn in_order(haystack: &str, needles: &[&str]) -> bool {
        let mut from = 0;
        for needle in needles {
            match haystack[from..].find(needle) {
                Some(pos) => from += pos + needle.len(),
                None => return false,
            }
        }
        true
    }

    #[test]
    fn test_currency_sentence() {
        assert_eq!(
            normalize("It costs $5,681.52."),
            "It costs five thousand, six hundred eighty-one dollars and fifty-two cents."
        );
    }

    #[test]
    fn test_dates() {
        let out = normalize("The date 12/18/2013 was fine.");
        assert!(in_order(&out, &["December", "eighteenth", "two thousand thirteen"]), "{out}");
        let out = normalize("Released 2023-05-12.");
        assert!(in_order(&out, &["May", "twelfth", "twenty twenty-three"]), "{out}");
    }

    #[test]
    fn test_urls() {
        let out = normalize("Visit https://www.google.com today.");
        let lower = out.to_lowercase();
        assert!(!lower.contains("h t t p s") && !lower.contains("slash slash"));
        assert!(in_order(&lower, &["www", "dot", "google", "dot", "com"]));

        let out = normalize("Go to https://www.somesite.com/somepage.");
        assert_eq!(out.matches("forward slash").count(), 1);
        assert!(out.find("forward slash") > out.find("com"));
        assert!(out.ends_with("some page."));
    }

    #[test]
    fn test_acronym_and_title() {
        assert_eq!(normalize("Buy TSLA now."), "Buy T-S-L-A now.");
        assert_eq!(normalize("Dr. Smith is here."), "Doctor Smith is here.");
    }

    #[test]
    fn test_contractions() {
        assert_eq!(normalize("It wasn't me."), "It wasn't me.");

        let mut config = EffectiveConfiguration::default();
        config.contraction_processing.expand_contractions = true;
        let out = TextProcessor::new().process("They're here.", &config).text;
        assert_eq!(out, "They are here.");
    }

    #[test]
    fn test_symbols_and_ranges() {
        assert_eq!(normalize("See pages 10-20 (twice)."), "See pages ten to twenty, twice.");
        assert_eq!(normalize("Tom & Jerry?"), "Tom and Jerry?");
    }

    #[test]
    fn test_change_log() {
        let result = TextProcessor::new().process("Buy TSLA for $5.", &EffectiveConfiguration::default());
        let summary: Vec<(Category, &str, &str)> = result
            .changes
            .iter()
            .map(|c| (c.category, c.original.as_str(), c.rule_id))
            .collect();
        assert_eq!(
            summary,
            vec![(Category::Acronym, "TSLA", "spell"), (Category::Currency, "$5", "amount-words")]
        );
        assert!(result.failures.is_empty());

        let result = TextProcessor::new().process("hello world.", &EffectiveConfiguration::default());
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_master_switch_and_category_toggle() {
        let mut config = EffectiveConfiguration::default();
        config.text_processing.enabled = false;
        let result = TextProcessor::new().process("Pay $5  now", &config);
        assert_eq!(result.text, "Pay $5  now");

        let mut config = EffectiveConfiguration::default();
        config.number_processing.enabled = false;
        let out = TextProcessor::new().process("I have 42 cats.", &config).text;
        assert_eq!(out, "I have 42 cats.");
    }

    struct FailingCurrency;

    impl Normalize for FailingCurrency {
        fn category(&self) -> Category {
            Category::Currency
        }

        fn normalize(
            &self,
            span: &TextSpan<'_>,
            _: &EffectiveConfiguration,
            _: &SpanContext<'_>,
        ) -> Result<Outcome, NormalizeError> {
            Err(NormalizeError::NormalizerFailure {
                category: Category::Currency,
                span: span.text.to_string(),
                reason: "injected".to_string(),
            })
        }
    }

    struct PanickingNumber;

    impl Normalize for PanickingNumber {
        fn category(&self) -> Category {
            Category::Number
        }

        fn normalize(
            &self,
            _: &TextSpan<'_>,
            _: &EffectiveConfiguration,
            _: &SpanContext<'_>,
        ) -> Result<Outcome, NormalizeError> {
            panic!("number stage exploded")
        }
    }

    #[test]
    fn test_failing_stage_is_contained() {
        let processor = TextProcessor::new().with_stage(Box::new(FailingCurrency));
        let result = processor.process("Pay $5 on 12/18/2013 for TSLA.", &EffectiveConfiguration::default());
        assert!(result.text.contains("$5"));
        assert!(result.text.contains("December eighteenth"));
        assert!(result.text.contains("T-S-L-A"));
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].category, Some(Category::Currency));
        assert_eq!(result.failures[0].span, "$5");
        assert!(result.changes.iter().all(|c| c.category != Category::Currency));
    }

    #[test]
    fn test_panicking_stage_is_contained() {
        let processor = TextProcessor::new().with_stage(Box::new(PanickingNumber));
        let result = processor.process("I owe $5 to 3 people.", &EffectiveConfiguration::default());
        assert_eq!(result.text, "I owe five dollars to 3 people.");
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].reason.contains("exploded"));
        assert_eq!(processor.categories().len(), 9);
    }

    #[test]
    fn test_idempotent() {
        let processor = TextProcessor::new();
        let config = EffectiveConfiguration::default();
        for input in [
            "It costs $5,681.52.",
            "Meet me at 3:30 pm on 12/18/2013!",
            "Buy TSLA & NASA stock (maybe).",
            "Visit https://www.google.com/somepage today.",
            "Send me your resume ASAP.",
            "We ran 5km in the 1990s, about 3/4 of it uphill.",
        ] {
            let once = processor.process(input, &config).text;
            let twice = processor.process(&once, &config).text;
            assert_eq!(once, twice, "input: {input}");
        }
    }

    #[test]
    fn test_markup_eras_and_scientific_notation() {
        let processor = TextProcessor::new();
        let config = EffectiveConfiguration::default();
        assert_eq!(processor.process("<b>bold</b> text", &config).text, "bold text");
        assert_eq!(
            processor.process("The value is 1e10.", &config).text,
            "The value is one times ten to the ten."
        );
        assert_eq!(processor.process("The AD 1066 AD", &config).text, "The A D ten sixty-six A D");
    }

    #[test]
    fn test_number_words_are_stable() {
        let processor = TextProcessor::new();
        let config = EffectiveConfiguration::default();
        let text = "five thousand, six hundred eighty-one";
        let result = processor.process(text, &config);
        assert_eq!(result.text, text);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn test_sentences_carry_intonation() {
        let result = TextProcessor::new().process("Is it $5? Yes!", &EffectiveConfiguration::default());
        let sentences = result.sentences(400);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Is it five dollars?");
        assert_eq!(sentences[0].intonation, Intonation::Question);
        assert_eq!(sentences[1].intonation, Intonation::Exclamation);
    }
}
