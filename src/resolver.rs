//! Layered configuration resolution and hot reload.
//!
//! Layers are merged lowest to highest:
//!
//! 1. built-in defaults
//! 2. base settings file
//! 3. user override file
//! 4. environment variables (`<PREFIX>__<SECTION>__<KEY>=<value>`)
//! 5. CLI `--set section.key=value` assignments
//!
//! The resolved [`EffectiveConfiguration`] is published through an
//! [`ArcSwap`].  Readers take a snapshot once per request and keep it until
//! they are done; the watcher thread is the only writer.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use arc_swap::ArcSwap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::{apply_layer, deep_merge, parse_scalar, EffectiveConfiguration};
use crate::error::ConfigError;

// ─────────────────────────────────────────────────────────────────────────────
// Layers
// ─────────────────────────────────────────────────────────────────────────────

/// One configuration source.  `tree` is `None` when the source is absent.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
    pub name: String,
    pub tree: Option<Value>,
}

impl ConfigLayer {
    pub fn new(name: impl Into<String>, tree: Option<Value>) -> Self {
        Self {
            name: name.into(),
            tree,
        }
    }
}

/// Merge `layers` over the built-in defaults.
///
/// Always yields a usable configuration; rejected keys are reported in the
/// returned list and keep the value from the layer below.
pub fn resolve(layers: &[ConfigLayer]) -> (EffectiveConfiguration, Vec<ConfigError>) {
    let mut tree = EffectiveConfiguration::default().to_tree();
    let mut errors = Vec::new();
    for layer in layers {
        match &layer.tree {
            Some(overlay) => {
                let rejected = apply_layer(&mut tree, overlay);
                if !rejected.is_empty() {
                    debug!(layer = %layer.name, rejected = rejected.len(), "layer applied with rejections");
                }
                errors.extend(rejected);
            }
            None => debug!(layer = %layer.name, "layer absent, skipped"),
        }
    }
    let config = EffectiveConfiguration::decode(&tree).unwrap_or_default();
    (config, errors)
}

/// Read one JSON layer from disk.
///
/// A missing file is not an error and yields `Ok(None)`.
pub fn load_layer(path: &Path) -> Result<Option<Value>, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found, skipping");
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(tree))
}

/// Build a layer from `<PREFIX>__<SECTION>__<KEY>` variables.
///
/// Keys are lower-cased; values parse as JSON when possible, else as strings.
pub fn env_layer<I>(prefix: &str, vars: I) -> Option<Value>
where
    I: IntoIterator<Item = (String, String)>,
{
    let marker = format!("{}__", prefix);
    let mut tree = Value::Object(Map::new());
    let mut found = false;
    for (key, raw) in vars {
        let Some(rest) = key.strip_prefix(&marker) else {
            continue;
        };
        let path: Vec<String> = rest
            .split("__")
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect();
        let Some((leaf, parents)) = path.split_last() else {
            continue;
        };
        let mut single = Map::new();
        single.insert(leaf.clone(), parse_scalar(&raw));
        let branch = parents
            .iter()
            .rev()
            .fold(Value::Object(single), |child, key| {
                let mut map = Map::new();
                map.insert(key.clone(), child);
                Value::Object(map)
            });
        deep_merge(&mut tree, &branch);
        found = true;
    }
    found.then_some(tree)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sources
// ─────────────────────────────────────────────────────────────────────────────

/// Where the resolver reads its layers from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub base: Option<PathBuf>,
    pub user_override: Option<PathBuf>,
    /// Environment variable prefix; `None` disables the environment layer.
    pub env_prefix: Option<String>,
    /// Already-merged CLI assignments.
    pub cli: Option<Value>,
}

impl ConfigSources {
    /// Load every source into layers, lowest first.
    ///
    /// Unreadable or malformed files are logged and skipped so the next
    /// lower layer stays in effect.
    pub fn load(&self) -> (Vec<ConfigLayer>, Vec<ConfigError>) {
        let mut layers = Vec::new();
        let mut errors = Vec::new();

        for (name, path) in [("base", &self.base), ("user_override", &self.user_override)] {
            let Some(path) = path else { continue };
            match load_layer(path) {
                Ok(tree) => layers.push(ConfigLayer::new(name, tree)),
                Err(e) => {
                    warn!(layer = name, "{}", e);
                    errors.push(e);
                }
            }
        }

        if let Some(prefix) = &self.env_prefix {
            layers.push(ConfigLayer::new("env", env_layer(prefix, std::env::vars())));
        }
        layers.push(ConfigLayer::new("cli", self.cli.clone()));
        (layers, errors)
    }

    /// Files the watcher polls.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.base
            .iter()
            .chain(self.user_override.iter())
            .cloned()
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ConfigResolver
// ─────────────────────────────────────────────────────────────────────────────

/// Owns the shared configuration snapshot.
pub struct ConfigResolver {
    sources: ConfigSources,
    current: ArcSwap<EffectiveConfiguration>,
    generation: AtomicU64,
}

impl ConfigResolver {
    /// Resolve `sources` once.  Problems are logged; the resolver always
    /// starts with some valid configuration.
    pub fn new(sources: ConfigSources) -> Self {
        let (layers, mut errors) = sources.load();
        let (config, rejected) = resolve(&layers);
        errors.extend(rejected);
        if !errors.is_empty() {
            warn!(count = errors.len(), "configuration resolved with errors");
        }
        Self {
            sources,
            current: ArcSwap::from_pointee(config),
            generation: AtomicU64::new(0),
        }
    }

    /// The current snapshot.  Cheap; hold it for the duration of a request.
    pub fn snapshot(&self) -> Arc<EffectiveConfiguration> {
        self.current.load_full()
    }

    /// Number of reloads applied so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn sources(&self) -> &ConfigSources {
        &self.sources
    }

    /// Re-read every layer and publish the result atomically.
    pub fn reload(&self) -> Vec<ConfigError> {
        let (layers, mut errors) = self.sources.load();
        let (config, rejected) = resolve(&layers);
        errors.extend(rejected);
        self.current.store(Arc::new(config));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, errors = errors.len(), "configuration reloaded");
        errors
    }

    /// Start the file watcher driven by the `hot_reload` settings.
    ///
    /// The poll and debounce intervals are re-read from the current
    /// snapshot on every tick, so a reload that changes them applies to the
    /// running watcher.  Returns `Ok(None)` when hot reload is disabled.
    pub fn watch(self: &Arc<Self>) -> std::io::Result<Option<ConfigWatcher>> {
        if !self.snapshot().hot_reload.enabled {
            debug!("hot reload disabled");
            return Ok(None);
        }
        self.spawn_watcher(WatchTiming::Live).map(Some)
    }

    /// Start the file watcher with fixed timing that later reloads do not
    /// change.
    pub fn watch_with(self: &Arc<Self>, poll: Duration, debounce: Duration) -> std::io::Result<ConfigWatcher> {
        self.spawn_watcher(WatchTiming::Fixed { poll, debounce })
    }

    fn spawn_watcher(self: &Arc<Self>, timing: WatchTiming) -> std::io::Result<ConfigWatcher> {
        let resolver = Arc::clone(self);
        let paths = self.sources.watched_paths();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("config-watcher".to_string())
            .spawn(move || {
                let (mut poll, mut debounce) = timing.intervals(&resolver);
                info!(files = paths.len(), ?poll, ?debounce, "config watcher started");
                let mut applied = fingerprint(&paths);
                let mut pending: Option<(Vec<Fingerprint>, Instant)> = None;

                loop {
                    match stop_rx.recv_timeout(poll) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    let seen = fingerprint(&paths);
                    if seen == applied {
                        pending = None;
                        continue;
                    }
                    let unchanged = matches!(&pending, Some((candidate, _)) if *candidate == seen);
                    if !unchanged {
                        debug!("config change detected, waiting for it to settle");
                        pending = Some((seen, Instant::now()));
                    }
                    if let Some((candidate, since)) = &pending {
                        if since.elapsed() >= debounce {
                            applied = candidate.clone();
                            pending = None;
                            resolver.reload();

                            let next = timing.intervals(&resolver);
                            if next != (poll, debounce) {
                                (poll, debounce) = next;
                                info!(?poll, ?debounce, "config watcher timing changed");
                            }
                        }
                    }
                }
                info!("config watcher stopped");
            })?;

        Ok(ConfigWatcher {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }
}

/// Where a watcher takes its poll and debounce intervals from.
#[derive(Debug, Clone, Copy)]
enum WatchTiming {
    Fixed { poll: Duration, debounce: Duration },
    /// Follow `hot_reload` in the current snapshot.
    Live,
}

impl WatchTiming {
    fn intervals(self, resolver: &ConfigResolver) -> (Duration, Duration) {
        match self {
            Self::Fixed { poll, debounce } => (poll, debounce),
            Self::Live => {
                let snapshot = resolver.snapshot();
                let settings = &snapshot.hot_reload;
                (
                    Duration::from_millis(settings.poll_interval_ms),
                    Duration::from_millis(settings.debounce_ms),
                )
            }
        }
    }
}

type Fingerprint = Option<(SystemTime, u64)>;

fn fingerprint(paths: &[PathBuf]) -> Vec<Fingerprint> {
    paths
        .iter()
        .map(|p| {
            let meta = std::fs::metadata(p).ok()?;
            Some((meta.modified().ok()?, meta.len()))
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// ConfigWatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to the background watcher.  Dropping it stops the thread.
pub struct ConfigWatcher {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ConfigWatcher {
    /// Stop polling and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("config watcher thread panicked");
            }
        }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
