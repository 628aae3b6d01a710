use chrono::{DateTime, Utc};
use serde::Serialize;

use super::decay::decay_factor;
use super::heat::heat_for_score;
use crate::entity::EntitySnapshot;
use crate::rules::{Heat, RulesConfig};

/// Lowest and highest score a result can carry
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Clamp,
    StageBase,
    Referral,
    Outreach,
    Application,
}

/// One signed contribution (or clamp event) in a score explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub category: Category,
    pub label: String, // e.g. "stage APPLIED", "POSITIVE via EMAIL", "stage-cap"
    pub delta: f64,    // Score change caused by this entry
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: f64,
    pub heat: Heat,
    pub decay_factor: f64,
    pub breakdown: Vec<BreakdownEntry>,
}

impl ScoreResult {
    /// Sum of the deltas recorded for one category.
    pub fn total_for(&self, category: Category) -> f64 {
        self.breakdown
            .iter()
            .filter(|entry| entry.category == category)
            .map(|entry| entry.delta)
            .sum()
    }
}

/// Score an entity against the current wall clock.
pub fn compute(entity: &EntitySnapshot, rules: &RulesConfig) -> ScoreResult {
    compute_at(entity, rules, Utc::now())
}

/// Score an entity as of `now`.
///
/// Never fails: weights missing from the rule set contribute 0, and the final
/// score is clamped into `[0, 100]` whatever the weights add up to.
pub fn compute_at(entity: &EntitySnapshot, rules: &RulesConfig, now: DateTime<Utc>) -> ScoreResult {
    if entity.archived {
        return ScoreResult {
            score: MIN_SCORE,
            heat: Heat::Cold,
            decay_factor: 1.0,
            breakdown: vec![entry(Category::Clamp, "archived".to_string(), 0.0)],
        };
    }

    let mut breakdown = Vec::new();

    // Stage base
    let mut score = rules.stage_base.weight(entity.stage);
    breakdown.push(entry(
        Category::StageBase,
        format!("stage {}", entity.stage),
        score,
    ));

    // Referral floor, recorded only when it raises the score
    if let Some(kind) = entity.strong_referral() {
        if rules.referral_bonus > score {
            breakdown.push(entry(
                Category::Referral,
                format!("referral floor ({})", kind),
                rules.referral_bonus - score,
            ));
            score = rules.referral_bonus;
        }
    }

    let idle_days = entity.idle_days(now);
    let decay = decay_factor(idle_days, &rules.decay);

    // Outreach: only the most recent attempt counts
    if let Some(outreach) = entity.latest_outreach() {
        let strength = outreach
            .contact_strength
            .map(|s| rules.contact_strength_weight.weight(s))
            .unwrap_or(0.0);
        let raw = rules.outreach_outcome_weight.weight(outreach.outcome)
            + rules.channel_weight.weight(outreach.channel)
            + outreach.personalization_score / rules.personalization_divisor
            + strength;
        let delta = raw * decay;
        score += delta;
        breakdown.push(entry(
            Category::Outreach,
            format!(
                "{} via {} ({:.0}d idle, x{:.2})",
                outreach.outcome, outreach.channel, idle_days, decay
            ),
            delta,
        ));
    }

    // Application, undecayed
    if let Some(application) = entity.latest_application() {
        let delta = application.tailoring_score / rules.tailoring_divisor;
        score += delta;
        breakdown.push(entry(
            Category::Application,
            format!("application (tailoring {:.0})", application.tailoring_score),
            delta,
        ));
    }

    // Stage cap, then the absolute range
    if let Some(cap) = rules.caps.per_stage.get(entity.stage) {
        if score > cap {
            breakdown.push(entry(Category::Clamp, "stage-cap".to_string(), cap - score));
            score = cap;
        }
    }
    let clamped = clamp_score(score);
    if clamped != score {
        let delta = if score.is_finite() { clamped - score } else { 0.0 };
        breakdown.push(entry(Category::Clamp, "range".to_string(), delta));
    }

    let heat = heat_for_score(clamped, &rules.heat_buckets);
    tracing::debug!(
        stage = %entity.stage,
        score = clamped,
        heat = heat.as_u8(),
        decay_factor = decay,
        "computed score"
    );

    ScoreResult {
        score: clamped,
        heat,
        decay_factor: decay,
        breakdown,
    }
}

/// Clamp into `[0, 100]`; NaN collapses to 0.
fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

fn entry(category: Category, label: String, delta: f64) -> BreakdownEntry {
    BreakdownEntry {
        category,
        label,
        delta,
    }
}
