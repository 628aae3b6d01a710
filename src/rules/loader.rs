use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use super::config::RulesConfig;
use super::document::rules_from_str;

/// File name probed in each candidate location
pub const RULES_FILE_NAME: &str = "scoring-rules.yaml";

/// Get the per-user config directory path (~/.config/pipeline-heat/)
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pipeline-heat"))
}

/// Candidate rule document locations, in probe order:
/// `./scoring-rules.yaml`, `./config/scoring-rules.yaml`,
/// then `~/.config/pipeline-heat/scoring-rules.yaml`.
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(RULES_FILE_NAME),
        Path::new("config").join(RULES_FILE_NAME),
    ];
    if let Some(dir) = get_config_dir() {
        candidates.push(dir.join(RULES_FILE_NAME));
    }
    candidates
}

/// Where the cached rule set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesSource {
    File(PathBuf),
    Defaults,
    Override,
}

struct Cached {
    rules: Arc<RulesConfig>,
    source: RulesSource,
}

/// Resolves, parses and caches the rule set.
///
/// The first successful `load()` is cached for the loader's lifetime. Two
/// callers racing on an empty cache may both read the document; the results
/// are identical and the first store wins.
pub struct RulesLoader {
    candidates: Vec<PathBuf>,
    cache: RwLock<Option<Cached>>,
}

impl RulesLoader {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            cache: RwLock::new(None),
        }
    }

    pub fn with_default_candidates() -> Self {
        Self::new(default_candidates())
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Load the rule set, probing candidates on first use.
    ///
    /// Falls back to `RulesConfig::default()` when no candidate exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the first existing candidate:
    /// - cannot be read
    /// - fails to parse (the error names the offending line)
    /// - maps to an invalid rule set
    ///
    /// Failures are not cached; the next call probes again.
    pub fn load(&self) -> Result<Arc<RulesConfig>> {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return Ok(Arc::clone(&cached.rules));
        }

        let (rules, source) = self.resolve()?;
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let cached = cache.get_or_insert_with(|| Cached {
            rules: Arc::new(rules),
            source,
        });
        Ok(Arc::clone(&cached.rules))
    }

    /// Source of the cached rule set, if one has been loaded.
    pub fn source(&self) -> Option<RulesSource> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| cached.source.clone())
    }

    /// Replace the cached rule set, or clear it with `None` so the next
    /// `load()` probes the candidates again. Intended for test harnesses.
    pub fn override_rules(&self, rules: Option<RulesConfig>) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = rules.map(|rules| Cached {
            rules: Arc::new(rules),
            source: RulesSource::Override,
        });
    }

    fn resolve(&self) -> Result<(RulesConfig, RulesSource)> {
        match self.candidates.iter().find(|path| path.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading scoring rules");
                let rules = load_rules_file(path).inspect_err(|e| {
                    let error = format!("{:#}", e);
                    tracing::warn!(path = %path.display(), error = %error, "rule document rejected");
                })?;
                Ok((rules, RulesSource::File(path.clone())))
            }
            None => {
                tracing::debug!(
                    candidates = self.candidates.len(),
                    "no rule document found, using built-in defaults"
                );
                Ok((RulesConfig::default(), RulesSource::Defaults))
            }
        }
    }
}

impl Default for RulesLoader {
    fn default() -> Self {
        Self::with_default_candidates()
    }
}

/// Read, parse and validate a single rule document.
pub fn load_rules_file(path: &Path) -> Result<RulesConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule document at {}", path.display()))?;

    rules_from_str(&content)
        .with_context(|| format!("Invalid rule document {}", path.display()))
}
