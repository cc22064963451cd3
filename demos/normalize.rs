//! Normalize a piece of text and show what changed.
//!
//! Usage:
//!   cargo run --example normalize
//!   cargo run --example normalize -- --text "Buy TSLA for $5 on 12/18/2013."
//!   cargo run --example normalize -- --config config/settings.json \
//!       --set contraction_processing.expand_contractions=true --sentences

use std::path::PathBuf;

use serde_json::{Map, Value};
use tts_normalize::config::{assignment_to_tree, deep_merge};
use tts_normalize::{ConfigResolver, ConfigSources, TextProcessor};

fn main() -> anyhow::Result<()> {
    // ── Parse simple CLI arguments ───────────────────────────────────────────
    let mut args = std::env::args().skip(1);

    let mut text = "Dr. Smith paid $5,681.52 on 12/18/2013 for TSLA, see https://www.somesite.com/somepage.".to_string();
    let mut config_path: Option<PathBuf> = None;
    let mut overrides = Value::Object(Map::new());
    let mut sentences = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--text"      => { if let Some(v) = args.next() { text = v; } }
            "--config"    => { if let Some(v) = args.next() { config_path = Some(v.into()); } }
            "--set"       => { if let Some(v) = args.next() { deep_merge(&mut overrides, &assignment_to_tree(&v)?); } }
            "--sentences" => { sentences = true; }
            "--help"      => {
                println!("Usage: normalize [--text TEXT] [--config FILE] [--set SECTION.KEY=VALUE]... [--sentences]");
                return Ok(());
            }
            _ => {}
        }
    }

    // ── Resolve configuration ────────────────────────────────────────────────
    let resolver = ConfigResolver::new(ConfigSources {
        base: config_path,
        cli: Some(overrides),
        ..Default::default()
    });
    let config = resolver.snapshot();

    // ── Normalize ────────────────────────────────────────────────────────────
    let result = TextProcessor::new().process(&text, &config);

    println!("Input  : {}", text);
    println!("Output : {}", result.text);
    println!();
    for change in &result.changes {
        println!(
            "  {:>4}  {:<12} {:<20} {:?} -> {:?}",
            change.start,
            change.category.as_str(),
            change.rule_id,
            change.original,
            change.replacement
        );
    }
    for failure in &result.failures {
        println!("  failed {:?}: {}", failure.span, failure.reason);
    }

    if sentences {
        println!();
        for sentence in result.sentences(config.text_processing.max_sentence_chars) {
            println!("  [{:?}] {}", sentence.intonation, sentence.text);
        }
    }
    Ok(())
}
