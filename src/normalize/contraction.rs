//! Contractions.
//!
//! Contracted forms are kept by default; the synthesizer says "wasn't" more
//! naturally than "was not".  Expansion is opt-in via
//! `contraction_processing.expand_contractions` and works on the contracted
//! word only, so an already-expanded phrase is never touched again.

use crate::config::EffectiveConfiguration;
use crate::error::NormalizeError;
use crate::normalize::{match_case, Category, Normalize, Outcome, SpanContext};
use crate::rules::{NormalizationRule, RuleInput, RulePattern, RuleSet};
use crate::segment::TextSpan;
use crate::tables::{contains_ci, CONTRACTION_SUFFIXES, IRREGULAR_CONTRACTIONS, IS_CONTRACTION_STEMS};

fn straight(word: &str) -> String {
    word.replace('’', "'")
}

fn has_apostrophe(word: &str) -> bool {
    word.contains(['\'', '’'])
}

fn expanding(config: &EffectiveConfiguration) -> bool {
    config.contraction_processing.expand_contractions
}

fn render_irregular(input: &RuleInput<'_>) -> Option<String> {
    let word = straight(input.text).to_lowercase();
    IRREGULAR_CONTRACTIONS
        .iter()
        .find(|(short, _)| *short == word)
        .map(|(_, long)| match_case(input.text, long))
}

/// "it's" → "it is"; possessives ("John's") are left alone.
fn render_pronoun_is(input: &RuleInput<'_>) -> Option<String> {
    let word = straight(input.text);
    let stem = word.strip_suffix("'s").or_else(|| word.strip_suffix("'S"))?;
    contains_ci(IS_CONTRACTION_STEMS, stem).then(|| match_case(input.text, &format!("{} is", stem)))
}

fn render_suffix(input: &RuleInput<'_>) -> Option<String> {
    let word = straight(input.text);
    let lower = word.to_lowercase();
    let (suffix, expansion) = CONTRACTION_SUFFIXES.iter().find(|(suffix, _)| lower.ends_with(suffix))?;
    let stem = &word[..word.len() - suffix.len()];
    if stem.is_empty() || stem.contains('\'') {
        return None;
    }
    Some(match_case(input.text, &format!("{}{}", stem, expansion)))
}

fn render_apostrophe(input: &RuleInput<'_>) -> Option<String> {
    input.text.contains('’').then(|| straight(input.text))
}

pub struct ContractionProcessor {
    rules: RuleSet,
}

impl ContractionProcessor {
    pub fn new() -> Self {
        let c = Category::Contraction;
        let contracted = || RulePattern::Predicate(has_apostrophe);
        Self {
            rules: RuleSet::new(
                c,
                vec![
                    NormalizationRule::new("irregular", c, 0, contracted(), render_irregular).when(expanding),
                    NormalizationRule::new("pronoun-is", c, 10, contracted(), render_pronoun_is).when(expanding),
                    NormalizationRule::new("suffix", c, 20, contracted(), render_suffix).when(expanding),
                    NormalizationRule::new("apostrophe", c, 90, contracted(), render_apostrophe)
                        .when(|c| c.contraction_processing.normalize_apostrophes),
                ],
            ),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for ContractionProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for ContractionProcessor {
    fn category(&self) -> Category {
        Category::Contraction
    }

    fn normalize(
        &self,
        span: &TextSpan<'_>,
        config: &EffectiveConfiguration,
        context: &SpanContext<'_>,
    ) -> Result<Outcome, NormalizeError> {
        self.rules.apply(span.text, config, context)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
