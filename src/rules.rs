//! Ordered rewrite rules.
//!
//! Every normalizer keeps its rules in a [`RuleSet`]: a list of
//! [`NormalizationRule`]s sorted by priority (lower first) with declaration
//! order breaking ties.  The first rule whose pattern matches the whole span
//! and whose renderer produces text wins.  Ordering is data, so it can be
//! inspected with [`RuleSet::ids`] and tested directly.

use fancy_regex::Regex;
use once_cell::sync::Lazy;

use crate::config::EffectiveConfiguration;
use crate::error::NormalizeError;
use crate::normalize::{Category, Outcome, SpanContext};

/// What a rule matches against the span text.
pub enum RulePattern {
    /// Every span.
    Any,
    /// Exact text, ASCII case-insensitive.
    Literal(&'static str),
    /// Regex that must cover the whole span.  Capture groups reach the renderer.
    Regex(&'static Lazy<Regex>),
    Predicate(fn(&str) -> bool),
}

/// Everything a renderer can look at.
pub struct RuleInput<'a> {
    pub text: &'a str,
    /// Group 0 is the whole span; unmatched groups are `None`.
    pub groups: Vec<Option<&'a str>>,
    pub config: &'a EffectiveConfiguration,
    pub context: &'a SpanContext<'a>,
}

impl<'a> RuleInput<'a> {
    /// Capture group `i`, or `""` when it did not participate.
    pub fn group(&self, i: usize) -> &'a str {
        self.groups.get(i).copied().flatten().unwrap_or("")
    }
}

/// Produces the replacement, or `None` to let the next rule try.
pub type Render = fn(&RuleInput<'_>) -> Option<String>;

pub struct NormalizationRule {
    pub id: &'static str,
    pub category: Category,
    pub priority: i32,
    pub pattern: RulePattern,
    pub render: Render,
    /// Extra configuration gate on top of the category's `enabled` flag.
    pub enabled: Option<fn(&EffectiveConfiguration) -> bool>,
}

impl NormalizationRule {
    pub fn new(id: &'static str, category: Category, priority: i32, pattern: RulePattern, render: Render) -> Self {
        Self {
            id,
            category,
            priority,
            pattern,
            render,
            enabled: None,
        }
    }

    pub fn when(mut self, gate: fn(&EffectiveConfiguration) -> bool) -> Self {
        self.enabled = Some(gate);
        self
    }

    fn is_enabled(&self, config: &EffectiveConfiguration) -> bool {
        self.enabled.map_or(true, |gate| gate(config))
    }

    /// Capture groups when the pattern covers `text`, else `None`.
    fn matches<'t>(&self, text: &'t str) -> Result<Option<Vec<Option<&'t str>>>, NormalizeError> {
        let whole = || Some(vec![Some(text)]);
        Ok(match &self.pattern {
            RulePattern::Any => whole(),
            RulePattern::Literal(lit) => text.eq_ignore_ascii_case(lit).then(whole).flatten(),
            RulePattern::Predicate(pred) => pred(text).then(whole).flatten(),
            RulePattern::Regex(re) => {
                let captures = re.captures(text).map_err(|e| NormalizeError::NormalizerFailure {
                    category: self.category,
                    span: text.to_string(),
                    reason: format!("rule {}: {}", self.id, e),
                })?;
                captures
                    .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0 && m.end() == text.len()))
                    .map(|caps| caps.iter().map(|m| m.map(|m| m.as_str())).collect())
            }
        })
    }
}

pub struct RuleSet {
    category: Category,
    rules: Vec<NormalizationRule>,
}

impl RuleSet {
    /// Sort `rules` by priority; the sort is stable so equal priorities keep
    /// declaration order.
    pub fn new(category: Category, mut rules: Vec<NormalizationRule>) -> Self {
        debug_assert!(rules.iter().all(|r| r.category == category));
        rules.sort_by_key(|r| r.priority);
        Self { category, rules }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Rule ids in evaluation order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id).collect()
    }

    /// Run the first enabled rule that matches and renders.
    pub fn apply(
        &self,
        text: &str,
        config: &EffectiveConfiguration,
        context: &SpanContext<'_>,
    ) -> Result<Outcome, NormalizeError> {
        for rule in &self.rules {
            if !rule.is_enabled(config) {
                continue;
            }
            let Some(groups) = rule.matches(text)? else {
                continue;
            };
            let input = RuleInput {
                text,
                groups,
                config,
                context,
            };
            if let Some(replacement) = (rule.render)(&input) {
                return Ok(Outcome::rewritten(replacement, rule.id));
            }
        }
        Ok(Outcome::Unchanged)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;

    static RE_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d)(\d+)?$").unwrap());

    fn shout(_: &RuleInput<'_>) -> Option<String> {
        Some("LOUD".to_string())
    }
    fn quiet(_: &RuleInput<'_>) -> Option<String> {
        Some("quiet".to_string())
    }
    fn decline(_: &RuleInput<'_>) -> Option<String> {
        None
    }
    fn first_digit(input: &RuleInput<'_>) -> Option<String> {
        Some(format!("{}+{}", input.group(1), input.group(2)))
    }

    fn run(set: &RuleSet, text: &str, config: &EffectiveConfiguration) -> Outcome {
        let spans = segment(text);
        let context = SpanContext::new(&spans, 0);
        set.apply(text, config, &context).unwrap()
    }

    #[test]
    fn test_priority_then_declaration_order() {
        let set = RuleSet::new(
            Category::Symbol,
            vec![
                NormalizationRule::new("late", Category::Symbol, 10, RulePattern::Any, shout),
                NormalizationRule::new("first-declared", Category::Symbol, 0, RulePattern::Any, quiet),
                NormalizationRule::new("second-declared", Category::Symbol, 0, RulePattern::Any, shout),
            ],
        );
        assert_eq!(set.ids(), vec!["first-declared", "second-declared", "late"]);
        let config = EffectiveConfiguration::default();
        assert_eq!(run(&set, "x", &config).rule_id(), Some("first-declared"));
    }

    #[test]
    fn test_declining_renderer_falls_through() {
        let set = RuleSet::new(
            Category::Symbol,
            vec![
                NormalizationRule::new("decline", Category::Symbol, 0, RulePattern::Literal("ok"), decline),
                NormalizationRule::new("fallback", Category::Symbol, 1, RulePattern::Any, quiet),
            ],
        );
        let config = EffectiveConfiguration::default();
        assert_eq!(run(&set, "OK", &config).rule_id(), Some("fallback"));
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let set = RuleSet::new(
            Category::Symbol,
            vec![
                NormalizationRule::new("gated", Category::Symbol, 0, RulePattern::Any, shout)
                    .when(|c| c.symbol_processing.ranges),
            ],
        );
        let mut config = EffectiveConfiguration::default();
        assert!(run(&set, "x", &config).is_rewritten());
        config.symbol_processing.ranges = false;
        assert!(!run(&set, "x", &config).is_rewritten());
    }

    #[test]
    fn test_regex_must_cover_span_and_exposes_groups() {
        let set = RuleSet::new(
            Category::Number,
            vec![NormalizationRule::new("digits", Category::Number, 0, RulePattern::Regex(&RE_DIGITS), first_digit)],
        );
        let config = EffectiveConfiguration::default();
        match run(&set, "123", &config) {
            Outcome::Rewritten { text, .. } => assert_eq!(text, "1+23"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!run(&set, "12a", &config).is_rewritten());
    }
}
