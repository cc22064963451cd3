//! Homograph disambiguation.
//!
//! Each homograph has a small fixed set of senses.  A [`HomographStrategy`]
//! picks one from the surrounding words; [`ContextHeuristic`] is the
//! built-in one.  The chosen sense is emitted as a phoneme link
//! (`[resume](/rɪˈzuːm/)`), which the segmenter passes through on a second
//! run, or as a plain respelling.

use crate::config::{EffectiveConfiguration, PronunciationRendering};
use crate::error::NormalizeError;
use crate::normalize::{Category, Normalize, Outcome, SpanContext};
use crate::segment::TextSpan;
use crate::tables::{
    contains_ci, homograph, HomographEntry, Pos, COPULAS, DETERMINERS, MODALS, PAST_AUXILIARIES, SUBJECT_PRONOUNS,
};

/// Picks a sense for one occurrence of a homograph.
pub trait HomographStrategy: Send + Sync {
    /// Recorded as the rule id of every rewrite this strategy makes.
    fn id(&self) -> &'static str;

    /// Index into `entry.senses`.  Out-of-range answers fall back to the
    /// entry's default sense.
    fn choose(&self, entry: &HomographEntry, context: &SpanContext<'_>) -> usize;
}

const OBJECT_PRONOUNS: &[&str] = &["me", "him", "her", "us", "them", "it", "you"];

/// Opens a sentence and is followed by a plain lowercase word.  A number,
/// a name or an identifier after it ("Record 42", "Use v1.2") reads as a
/// noun phrase instead.
fn looks_imperative(context: &SpanContext<'_>) -> bool {
    context.at_sentence_start()
        && context.next_word().is_some_and(|w| {
            w.chars().next().is_some_and(char::is_lowercase) && w.chars().all(char::is_alphabetic)
        })
}

/// Local function-word cues, checked in order:
///
/// 1. determiner before → noun (or adjective)
/// 2. copula before → adjective; auxiliary before → past participle
/// 3. modal or "to" before → verb
/// 4. subject pronoun before → verb
/// 5. determiner or object pronoun after → verb
/// 6. sentence start followed by a plain lowercase word → verb (imperative)
/// 7. otherwise the entry's default sense
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextHeuristic;

impl HomographStrategy for ContextHeuristic {
    fn id(&self) -> &'static str {
        "context-heuristic"
    }

    fn choose(&self, entry: &HomographEntry, context: &SpanContext<'_>) -> usize {
        let prev = context.prev_word();
        let next = context.next_word();
        let prev_in = |list: &[&str]| prev.is_some_and(|w| contains_ci(list, w));
        let verb = || entry.sense_for(Pos::Verb);

        let choice = if prev_in(DETERMINERS) {
            entry.sense_for(Pos::Noun).or_else(|| entry.sense_for(Pos::Adjective))
        } else if prev_in(COPULAS) && entry.sense_for(Pos::Adjective).is_some() {
            entry.sense_for(Pos::Adjective)
        } else if prev_in(PAST_AUXILIARIES) && entry.sense_for(Pos::Past).is_some() {
            entry.sense_for(Pos::Past)
        } else if prev_in(MODALS) || prev_in(SUBJECT_PRONOUNS) {
            verb()
        } else if next.is_some_and(|w| contains_ci(DETERMINERS, w) || contains_ci(OBJECT_PRONOUNS, w)) {
            verb()
        } else if looks_imperative(context) {
            verb()
        } else {
            None
        };
        choice.unwrap_or(entry.default)
    }
}

pub struct HomographResolver {
    strategy: Box<dyn HomographStrategy>,
}

impl HomographResolver {
    pub fn new() -> Self {
        Self::with_strategy(ContextHeuristic)
    }

    pub fn with_strategy(strategy: impl HomographStrategy + 'static) -> Self {
        Self {
            strategy: Box::new(strategy),
        }
    }
}

impl Default for HomographResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for HomographResolver {
    fn category(&self) -> Category {
        Category::Homograph
    }

    fn normalize(
        &self,
        span: &TextSpan<'_>,
        config: &EffectiveConfiguration,
        context: &SpanContext<'_>,
    ) -> Result<Outcome, NormalizeError> {
        let Some(entry) = homograph(span.text) else {
            return Ok(Outcome::Unchanged);
        };
        let index = self.strategy.choose(entry, context);
        let sense = entry
            .senses
            .get(index)
            .or_else(|| entry.senses.get(entry.default))
            .ok_or_else(|| NormalizeError::NormalizerFailure {
                category: Category::Homograph,
                span: span.text.to_string(),
                reason: format!("no sense {} for {:?}", index, entry.word),
            })?;
        let text = match config.homograph_processing.rendering {
            PronunciationRendering::PhonemeLink => format!("[{}](/{}/)", span.text, sense.ipa),
            PronunciationRendering::Respelling => sense.respelling.to_string(),
        };
        Ok(Outcome::rewritten(text, self.strategy.id()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tests::{render, run_on};

    fn say(text: &str, target: &str) -> String {
        render(&HomographResolver::new(), text, target, &EffectiveConfiguration::default())
    }

    #[test]
    fn test_resume_noun_and_verb() {
        assert_eq!(say("Send me your resume today.", "resume"), "[resume](/ˈrɛzəmeɪ/)");
        assert_eq!(say("We will resume the meeting.", "resume"), "[resume](/rɪˈzuːm/)");
        assert_eq!(say("Resume the download.", "Resume"), "[Resume](/rɪˈzuːm/)");
    }

    #[test]
    fn test_read_past_and_present() {
        assert_eq!(say("I have read it.", "read"), "[read](/ɹɛd/)");
        assert_eq!(say("Please read it.", "read"), "[read](/ɹiːd/)");
    }

    #[test]
    fn test_adjective_senses() {
        assert_eq!(say("They live here.", "live"), "[live](/lɪv/)");
        assert_eq!(say("It was a live show.", "live"), "[live](/laɪv/)");
        assert_eq!(say("The shop is close by.", "close"), "[close](/kloʊs/)");
        assert_eq!(say("Close the door.", "Close"), "[Close](/kloʊz/)");
    }

    #[test]
    fn test_sentence_start_needs_a_verb_like_continuation() {
        assert_eq!(say("Record carefully.", "Record"), "[Record](/ɹɪˈkɔɹd/)");
        assert_eq!(say("Record 42 was lost.", "Record"), "[Record](/ˈɹɛkɚd/)");
        assert_eq!(say("Project Apollo flew.", "Project"), "[Project](/ˈpɹɑdʒɛkt/)");
        assert_eq!(say("Object v2 is stale.", "Object"), "[Object](/ˈɑbdʒɛkt/)");
    }

    #[test]
    fn test_ambiguous_context_uses_default() {
        let entry = homograph("record").unwrap();
        let out = say("sales, record numbers", "record");
        assert_eq!(out, format!("[record](/{}/)", entry.senses[entry.default].ipa));
    }

    #[test]
    fn test_respelling_rendering() {
        let mut config = EffectiveConfiguration::default();
        config.homograph_processing.rendering = PronunciationRendering::Respelling;
        let out = render(&HomographResolver::new(), "my resume", "resume", &config);
        assert_eq!(out, "REZ-oo-may");
    }

    #[test]
    fn test_non_homograph_unchanged() {
        let outcome = run_on(&HomographResolver::new(), "the table", "table", &EffectiveConfiguration::default());
        assert_eq!(outcome, Outcome::Unchanged);
    }

    struct AlwaysSecond;

    impl HomographStrategy for AlwaysSecond {
        fn id(&self) -> &'static str {
            "always-second"
        }

        fn choose(&self, _: &HomographEntry, _: &SpanContext<'_>) -> usize {
            1
        }
    }

    #[test]
    fn test_pluggable_strategy() {
        let resolver = HomographResolver::with_strategy(AlwaysSecond);
        let outcome = run_on(&resolver, "We will resume.", "resume", &EffectiveConfiguration::default());
        assert_eq!(outcome.rule_id(), Some("always-second"));
        assert_eq!(outcome.text(), Some("[resume](/ˈrɛzəmeɪ/)"));
    }
}
