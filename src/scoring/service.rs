use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::engine::{compute_at, ScoreResult};
use crate::entity::EntitySnapshot;
use crate::rules::{Heat, RulesConfig, RulesLoader};

/// Scores entities against one rule set.
///
/// The rule set is resolved once (usually at startup) and shared; the service
/// holds no other state, so it can be cloned freely across threads.
#[derive(Debug, Clone)]
pub struct ScoringService {
    rules: Arc<RulesConfig>,
}

impl ScoringService {
    pub fn new(rules: Arc<RulesConfig>) -> Self {
        Self { rules }
    }

    /// Build a service from whatever rule set the loader resolves.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error when a rule document exists but is invalid.
    pub fn from_loader(loader: &RulesLoader) -> Result<Self> {
        Ok(Self::new(loader.load()?))
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Full, side-effect-free breakdown of how the entity's score is derived.
    pub fn explain(&self, entity: &EntitySnapshot) -> ScoreResult {
        self.explain_at(entity, Utc::now())
    }

    pub fn explain_at(&self, entity: &EntitySnapshot, now: DateTime<Utc>) -> ScoreResult {
        compute_at(entity, &self.rules, now)
    }

    /// Heat bucket for the entity, for the caller to persist on its own record.
    pub fn recalculate(&self, entity: &EntitySnapshot) -> Heat {
        self.recalculate_at(entity, Utc::now())
    }

    pub fn recalculate_at(&self, entity: &EntitySnapshot, now: DateTime<Utc>) -> Heat {
        self.explain_at(entity, now).heat
    }
}

impl Default for ScoringService {
    fn default() -> Self {
        Self::new(Arc::new(RulesConfig::default()))
    }
}
