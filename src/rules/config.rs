use serde::{Deserialize, Serialize};

use super::table::WeightTable;
use crate::entity::{Channel, ContactStrength, Outcome, Stage};

/// Discrete priority bucket derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Heat {
    Cold = 0,
    Cool = 1,
    Warm = 2,
    Hot = 3,
}

impl Heat {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Heat::Cold => "cold",
            Heat::Cool => "cool",
            Heat::Warm => "warm",
            Heat::Hot => "hot",
        }
    }
}

impl From<Heat> for u8 {
    fn from(heat: Heat) -> u8 {
        heat.as_u8()
    }
}

impl TryFrom<u8> for Heat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Heat::Cold),
            1 => Ok(Heat::Cool),
            2 => Ok(Heat::Warm),
            3 => Ok(Heat::Hot),
            other => Err(format!("heat must be between 0 and 3, got {}", other)),
        }
    }
}

/// Upper bounds applied after all contributions are summed.
#[derive(Debug, Clone, PartialEq)]
pub struct Caps {
    /// Score ceiling for archived items. Archived items short-circuit to 0, so
    /// this only documents the ceiling a rule set expects.
    pub archived_score: f64,
    pub per_stage: WeightTable<Stage>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayConfig {
    pub half_life_days: f64,
    pub minimum_factor: f64,
    pub maximum_days: f64,
}

/// Upper score bound mapped to a heat value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatBucket {
    pub max_score: f64,
    pub heat: Heat,
}

/// All scoring weights and thresholds.
///
/// Example document:
/// ```yaml
/// stageBase:
///   APPLIED: 35
///   INTERVIEW: 60
/// referralBonus: 45
/// decay:
///   halfLifeDays: 7
///   minimumFactor: 0.25
///   maximumDays: 60
/// heatBuckets:
///   - maxScore: 49
///     heat: 1
///   - maxScore: 100
///     heat: 3
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RulesConfig {
    pub caps: Caps,
    pub stage_base: WeightTable<Stage>,
    pub referral_bonus: f64,
    pub outreach_outcome_weight: WeightTable<Outcome>,
    pub contact_strength_weight: WeightTable<ContactStrength>,
    pub channel_weight: WeightTable<Channel>,
    pub personalization_divisor: f64,
    pub tailoring_divisor: f64,
    pub decay: DecayConfig,
    /// Ascending by `max_score`; the last entry covers 100.
    pub heat_buckets: Vec<HeatBucket>,
}

impl Default for Caps {
    fn default() -> Self {
        Self {
            archived_score: 0.0,
            per_stage: [(Stage::Rejected, 10.0), (Stage::Withdrawn, 10.0)]
                .into_iter()
                .collect(),
        }
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            half_life_days: 7.0,
            minimum_factor: 0.25,
            maximum_days: 60.0,
        }
    }
}

/// Default buckets: `[24 -> 0, 49 -> 1, 74 -> 2, 100 -> 3]`.
pub fn default_heat_buckets() -> Vec<HeatBucket> {
    vec![
        HeatBucket { max_score: 24.0, heat: Heat::Cold },
        HeatBucket { max_score: 49.0, heat: Heat::Cool },
        HeatBucket { max_score: 74.0, heat: Heat::Warm },
        HeatBucket { max_score: 100.0, heat: Heat::Hot },
    ]
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            caps: Caps::default(),
            stage_base: [
                (Stage::Prospect, 10.0),
                (Stage::Applied, 35.0),
                (Stage::Screening, 45.0),
                (Stage::Interview, 60.0),
                (Stage::Offer, 80.0),
                (Stage::Accepted, 90.0),
                (Stage::Rejected, 0.0),
                (Stage::Withdrawn, 0.0),
            ]
            .into_iter()
            .collect(),
            referral_bonus: 45.0,
            outreach_outcome_weight: [
                (Outcome::Pending, 5.0),
                (Outcome::NoResponse, 0.0),
                (Outcome::Neutral, 10.0),
                (Outcome::Positive, 30.0),
                (Outcome::Negative, -20.0),
            ]
            .into_iter()
            .collect(),
            contact_strength_weight: [
                (ContactStrength::Weak, 5.0),
                (ContactStrength::Medium, 10.0),
                (ContactStrength::Strong, 20.0),
            ]
            .into_iter()
            .collect(),
            channel_weight: [
                (Channel::Email, 12.0),
                (Channel::LinkedIn, 8.0),
                (Channel::Phone, 15.0),
                (Channel::InPerson, 20.0),
                (Channel::Other, 4.0),
            ]
            .into_iter()
            .collect(),
            personalization_divisor: 5.0,
            tailoring_divisor: 10.0,
            decay: DecayConfig::default(),
            heat_buckets: default_heat_buckets(),
        }
    }
}
