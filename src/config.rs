//! Effective configuration: the merged, immutable snapshot every normalizer
//! reads from.
//!
//! The on-disk format is a JSON tree with one top-level section per
//! normalizer category.  Every section carries an `enabled` flag plus its
//! own parameters; absent keys take the built-in defaults below.
//!
//! ```json
//! {
//!   "currency_processing": { "style": "decimal-words" },
//!   "contraction_processing": { "expand_contractions": true }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::ConfigError;
use crate::normalize::Category;

// ─────────────────────────────────────────────────────────────────────────────
// Enumerated options
// ─────────────────────────────────────────────────────────────────────────────

/// How currency amounts are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurrencyStyle {
    /// "five dollars and fifty-two cents"
    #[default]
    Words,
    /// "five point five two dollars"
    DecimalWords,
}

/// Spoken order of a rendered date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateStyle {
    /// "December eighteenth, two thousand thirteen"
    #[default]
    MonthDayYear,
    /// "the eighteenth of December, two thousand thirteen"
    DayMonthYear,
}

/// Field order assumed for ambiguous numeric dates such as `05/06/19`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrlVerbosity {
    /// Domain, port, path and query string.
    Full,
    /// Domain, port and path.
    #[default]
    Standard,
    /// Domain only.
    DomainOnly,
}

/// What to do with known abbreviations such as "ASAP".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbbreviationPolicy {
    #[default]
    Spell,
    Expand,
}

/// Output form for a resolved pronunciation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PronunciationRendering {
    /// `[word](/ipa/)`, consumed by the phonemizer as-is.
    #[default]
    PhonemeLink,
    /// Plain-text respelling such as "REZ-oo-may".
    Respelling,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextProcessing {
    /// Master switch: when off, input is returned untouched.
    pub enabled: bool,
    pub collapse_whitespace: bool,
    /// Upper bound for one synthesizer chunk in [`crate::segment::split_sentences`].
    pub max_sentence_chars: usize,
}

impl Default for TextProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            collapse_whitespace: true,
            max_sentence_chars: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumberProcessing {
    pub enabled: bool,
    /// Read 4-digit years as pairs ("nineteen ninety-nine").
    pub years_as_pairs: bool,
    /// Spell "007" digit by digit instead of "seven".
    pub leading_zeros_as_digits: bool,
    /// Integers longer than this are read digit by digit.
    pub max_cardinal_digits: usize,
}

impl Default for NumberProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            years_as_pairs: true,
            leading_zeros_as_digits: true,
            max_cardinal_digits: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrencyProcessing {
    pub enabled: bool,
    pub style: CurrencyStyle,
    /// Spoken for a leading `~`.
    pub approximation_word: String,
}

impl Default for CurrencyProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            style: CurrencyStyle::default(),
            approximation_word: "about".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateProcessing {
    pub enabled: bool,
    pub style: DateStyle,
    pub field_order: FieldOrder,
    /// Two-digit years below the pivot are 20xx, the rest 19xx.
    pub two_digit_year_pivot: u32,
    pub times: bool,
}

impl Default for DateProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            style: DateStyle::default(),
            field_order: FieldOrder::default(),
            two_digit_year_pivot: 50,
            times: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlProcessing {
    pub enabled: bool,
    pub verbosity: UrlVerbosity,
    /// Split "somepage" / "somePage" / "some-page" into separate words.
    pub split_path_words: bool,
    pub speak_www: bool,
    pub emails: bool,
}

impl Default for UrlProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            verbosity: UrlVerbosity::default(),
            split_path_words: true,
            speak_www: true,
            emails: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractionProcessing {
    pub enabled: bool,
    pub expand_contractions: bool,
    /// Rewrite curly apostrophes (’) to ASCII even when not expanding.
    pub normalize_apostrophes: bool,
}

impl Default for ContractionProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            expand_contractions: false,
            normalize_apostrophes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SymbolProcessing {
    pub enabled: bool,
    pub strip_markdown: bool,
    /// Emitted for dashes and brackets.
    pub pause: String,
    /// Read "10-20" as "ten to twenty".
    pub ranges: bool,
    /// Per-symbol replacement; an empty string means silence.
    pub overrides: BTreeMap<String, String>,
}

impl Default for SymbolProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            strip_markdown: true,
            pause: ",".to_string(),
            ranges: true,
            overrides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcronymProcessing {
    pub enabled: bool,
    pub max_length: usize,
    pub letter_separator: String,
    pub abbreviation_policy: AbbreviationPolicy,
    /// Extra all-caps words read as words, on top of the built-in list.
    pub spoken_as_word: Vec<String>,
    /// Expand "Dr", "Mr", "etc", "vs" and friends.
    pub expand_titles: bool,
}

impl Default for AcronymProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            max_length: 5,
            letter_separator: "-".to_string(),
            abbreviation_policy: AbbreviationPolicy::default(),
            spoken_as_word: Vec::new(),
            expand_titles: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomographProcessing {
    pub enabled: bool,
    pub rendering: PronunciationRendering,
}

impl Default for HomographProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            rendering: PronunciationRendering::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProperNounProcessing {
    pub enabled: bool,
    pub use_builtin: bool,
    /// Word → `/ipa/` (rendered as a phoneme link) or a plain respelling.
    pub pronunciations: BTreeMap<String, String>,
}

impl Default for ProperNounProcessing {
    fn default() -> Self {
        Self {
            enabled: true,
            use_builtin: true,
            pronunciations: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HotReload {
    pub enabled: bool,
    pub poll_interval_ms: u64,
    /// A change must be quiet this long before it is applied.
    pub debounce_ms: u64,
}

impl Default for HotReload {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 500,
            debounce_ms: 2000,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EffectiveConfiguration
// ─────────────────────────────────────────────────────────────────────────────

/// Every toggle the pipeline reads, resolved from all configuration layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectiveConfiguration {
    pub text_processing: TextProcessing,
    pub number_processing: NumberProcessing,
    pub currency_processing: CurrencyProcessing,
    pub date_processing: DateProcessing,
    pub url_processing: UrlProcessing,
    pub contraction_processing: ContractionProcessing,
    pub symbol_processing: SymbolProcessing,
    pub acronym_processing: AcronymProcessing,
    pub homograph_processing: HomographProcessing,
    pub proper_noun_processing: ProperNounProcessing,
    pub hot_reload: HotReload,
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    key: &str,
    value: T,
    range: std::ops::RangeInclusive<T>,
) -> Result<(), String> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} = {} is outside {}..={}",
            key,
            value,
            range.start(),
            range.end()
        ))
    }
}

impl EffectiveConfiguration {
    /// Range checks that the type system cannot express.
    pub fn validate(&self) -> Result<(), String> {
        check_range(
            "text_processing.max_sentence_chars",
            self.text_processing.max_sentence_chars,
            20..=5000,
        )?;
        check_range(
            "number_processing.max_cardinal_digits",
            self.number_processing.max_cardinal_digits,
            1..=18,
        )?;
        check_range(
            "date_processing.two_digit_year_pivot",
            self.date_processing.two_digit_year_pivot,
            0..=99,
        )?;
        check_range(
            "acronym_processing.max_length",
            self.acronym_processing.max_length,
            2..=10,
        )?;
        check_range(
            "hot_reload.poll_interval_ms",
            self.hot_reload.poll_interval_ms,
            10..=60_000,
        )?;
        check_range("hot_reload.debounce_ms", self.hot_reload.debounce_ms, 0..=60_000)?;
        if self.currency_processing.approximation_word.trim().is_empty() {
            return Err("currency_processing.approximation_word must not be empty".to_string());
        }
        Ok(())
    }

    /// Decode a full configuration tree and validate it.
    pub fn decode(tree: &Value) -> Result<Self, String> {
        let config: Self = serde_json::from_value(tree.clone()).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// This configuration as a JSON tree, the starting point for layering.
    pub fn to_tree(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Per-category `enabled` flag.
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Url => self.url_processing.enabled,
            Category::Date => self.date_processing.enabled,
            Category::Currency => self.currency_processing.enabled,
            Category::Number => self.number_processing.enabled,
            Category::Contraction => self.contraction_processing.enabled,
            Category::ProperNoun => self.proper_noun_processing.enabled,
            Category::Acronym => self.acronym_processing.enabled,
            Category::Homograph => self.homograph_processing.enabled,
            Category::Symbol => self.symbol_processing.enabled,
        }
    }

    /// Apply a partial tree on top of this snapshot (per-request overrides).
    ///
    /// Rejected keys keep their current value and are returned alongside.
    pub fn with_overrides(&self, overlay: &Value) -> (Self, Vec<ConfigError>) {
        let mut tree = self.to_tree();
        let errors = apply_layer(&mut tree, overlay);
        match Self::decode(&tree) {
            Ok(config) => (config, errors),
            Err(_) => (self.clone(), errors),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layer merging
// ─────────────────────────────────────────────────────────────────────────────

/// Recursive merge: objects merge key by key, anything else is replaced.
pub fn deep_merge(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Deep-merge `layer` into `tree`, validating every leaf as it lands.
///
/// A leaf whose new value would make the tree fail to decode or validate is
/// rejected: the key keeps whatever `tree` held before and a
/// [`ConfigError::Value`] is returned for it.  Valid sibling keys still apply.
pub fn apply_layer(tree: &mut Value, layer: &Value) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    apply_at(tree, layer, &mut path, &mut errors);
    errors
}

fn apply_at(root: &mut Value, overlay: &Value, path: &mut Vec<String>, errors: &mut Vec<ConfigError>) {
    let target_is_object = matches!(lookup(root, path), Some(Value::Object(_)));
    if let (true, Value::Object(entries)) = (target_is_object, overlay) {
        for (key, value) in entries {
            path.push(key.clone());
            apply_at(root, value, path, errors);
            path.pop();
        }
        return;
    }

    let mut candidate = root.clone();
    set_path(&mut candidate, path, overlay.clone());
    match EffectiveConfiguration::decode(&candidate) {
        Ok(_) => *root = candidate,
        Err(reason) => {
            let key = if path.is_empty() {
                "<root>".to_string()
            } else {
                path.join(".")
            };
            warn!(key = %key, reason = %reason, "rejecting configuration value");
            errors.push(ConfigError::Value { key, reason });
        }
    }
}

fn lookup<'a>(root: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(root, |node, key| node.as_object()?.get(key))
}

fn set_path(root: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };
    let mut node = root;
    for key in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else { return };
        node = map.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()));
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert(last.clone(), value);
    }
}

/// Parse a `section.key=value` assignment into a one-leaf tree.
///
/// The value is read as JSON when it parses (`true`, `12`, `"x"`), otherwise
/// it is taken as a plain string.
pub fn assignment_to_tree(assignment: &str) -> Result<Value, ConfigError> {
    let (key, raw) = assignment.split_once('=').ok_or_else(|| ConfigError::Value {
        key: assignment.to_string(),
        reason: "expected section.key=value".to_string(),
    })?;
    let path: Vec<String> = key
        .trim()
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if path.is_empty() {
        return Err(ConfigError::Value {
            key: key.to_string(),
            reason: "empty key".to_string(),
        });
    }
    let mut tree = Value::Object(Map::new());
    set_path(&mut tree, &path, parse_scalar(raw));
    Ok(tree)
}

pub(crate) fn parse_scalar(raw: &str) -> Value {
    serde_json::from_str(raw.trim()).unwrap_or_else(|_| Value::String(raw.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_keeps_unset_keys() {
        let mut base = json!({"a": {"x": 1, "y": 2}});
        deep_merge(&mut base, &json!({"a": {"x": 99}}));
        assert_eq!(base, json!({"a": {"x": 99, "y": 2}}));
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let mut base = json!({"list": [1, 2, 3], "s": "a"});
        deep_merge(&mut base, &json!({"list": [9]}));
        assert_eq!(base, json!({"list": [9], "s": "a"}));
    }

    #[test]
    fn test_defaults_validate() {
        let config = EffectiveConfiguration::default();
        assert!(config.validate().is_ok());
        assert!(!config.contraction_processing.expand_contractions);
        assert_eq!(config.currency_processing.style, CurrencyStyle::Words);
        assert_eq!(config.hot_reload.debounce_ms, 2000);
    }

    #[test]
    fn test_enum_values_are_kebab_case() {
        let tree = json!({"currency_processing": {"style": "decimal-words"}});
        let mut base = EffectiveConfiguration::default().to_tree();
        let errors = apply_layer(&mut base, &tree);
        assert!(errors.is_empty());
        let config = EffectiveConfiguration::decode(&base).unwrap();
        assert_eq!(config.currency_processing.style, CurrencyStyle::DecimalWords);
    }

    #[test]
    fn test_bad_key_keeps_previous_value_and_siblings_apply() {
        let mut tree = EffectiveConfiguration::default().to_tree();
        let layer = json!({
            "acronym_processing": { "max_length": 99, "letter_separator": " " },
            "number_processing": { "enabled": "yes" }
        });
        let errors = apply_layer(&mut tree, &layer);
        assert_eq!(errors.len(), 2);

        let config = EffectiveConfiguration::decode(&tree).unwrap();
        assert_eq!(config.acronym_processing.max_length, 5);
        assert_eq!(config.acronym_processing.letter_separator, " ");
        assert!(config.number_processing.enabled);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut tree = EffectiveConfiguration::default().to_tree();
        let errors = apply_layer(&mut tree, &json!({"url_processing": {"bogus": 1}}));
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ConfigError::Value { key, .. } => assert_eq!(key, "url_processing.bogus"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_entries_merge() {
        let mut tree = EffectiveConfiguration::default().to_tree();
        apply_layer(&mut tree, &json!({"symbol_processing": {"overrides": {"#": "hash"}}}));
        apply_layer(&mut tree, &json!({"symbol_processing": {"overrides": {"@": ""}}}));
        let config = EffectiveConfiguration::decode(&tree).unwrap();
        assert_eq!(config.symbol_processing.overrides.len(), 2);
        assert_eq!(config.symbol_processing.overrides["@"], "");
    }

    #[test]
    fn test_with_overrides() {
        let base = EffectiveConfiguration::default();
        let (config, errors) = base.with_overrides(&json!({
            "contraction_processing": {"expand_contractions": true},
            "date_processing": {"two_digit_year_pivot": 500}
        }));
        assert_eq!(errors.len(), 1);
        assert!(config.contraction_processing.expand_contractions);
        assert_eq!(config.date_processing.two_digit_year_pivot, 50);
    }

    #[test]
    fn test_assignment_to_tree() {
        let tree = assignment_to_tree("currency_processing.style=decimal-words").unwrap();
        assert_eq!(tree, json!({"currency_processing": {"style": "decimal-words"}}));
        let tree = assignment_to_tree("hot_reload.debounce_ms=100").unwrap();
        assert_eq!(tree, json!({"hot_reload": {"debounce_ms": 100}}));
        assert!(assignment_to_tree("no-equals-sign").is_err());
    }
}
