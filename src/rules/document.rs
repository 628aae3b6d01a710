use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::config::{Caps, DecayConfig, Heat, HeatBucket, RulesConfig};
use super::parser::{self, Node};
use super::table::WeightTable;
use super::validation::validate_rules;
use crate::entity::RuleKey;

/// Rule document as written on disk. Every section is optional; an absent
/// section keeps the compiled-in default for that section.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RulesDocument {
    caps: Option<CapsDocument>,
    stage_base: Option<BTreeMap<String, f64>>,
    referral_bonus: Option<f64>,
    outreach_outcome_weight: Option<BTreeMap<String, f64>>,
    contact_strength_weight: Option<BTreeMap<String, f64>>,
    channel_weight: Option<BTreeMap<String, f64>>,
    personalization_divisor: Option<f64>,
    tailoring_divisor: Option<f64>,
    decay: Option<DecayDocument>,
    heat_buckets: Option<Vec<HeatBucketDocument>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CapsDocument {
    archived_score: Option<f64>,
    per_stage: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DecayDocument {
    half_life_days: Option<f64>,
    minimum_factor: Option<f64>,
    maximum_days: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeatBucketDocument {
    max_score: f64,
    heat: Heat,
}

/// Parse and validate a rule document.
pub fn rules_from_str(text: &str) -> Result<RulesConfig> {
    let tree = parser::parse(text).context("Failed to parse rule document")?;
    rules_from_tree(&tree)
}

/// Map a parsed tree onto a validated `RulesConfig`.
pub fn rules_from_tree(tree: &Node) -> Result<RulesConfig> {
    rules_from_value(tree.to_json())
}

/// Map any JSON-shaped value onto a validated `RulesConfig`.
pub fn rules_from_value(value: serde_json::Value) -> Result<RulesConfig> {
    let document: RulesDocument =
        serde_json::from_value(value).context("Rule document has the wrong shape")?;
    let rules = document.into_rules();

    if let Err(errors) = validate_rules(&rules) {
        bail!("Invalid rule document:\n  - {}", errors.join("\n  - "));
    }
    Ok(rules)
}

impl RulesDocument {
    fn into_rules(self) -> RulesConfig {
        let defaults = RulesConfig::default();

        let caps = match self.caps {
            Some(caps) => Caps {
                archived_score: caps.archived_score.unwrap_or(defaults.caps.archived_score),
                per_stage: caps
                    .per_stage
                    .map(|m| table("caps.perStage", m))
                    .unwrap_or(defaults.caps.per_stage),
            },
            None => defaults.caps,
        };

        let decay = match self.decay {
            Some(decay) => DecayConfig {
                half_life_days: decay.half_life_days.unwrap_or(defaults.decay.half_life_days),
                minimum_factor: decay.minimum_factor.unwrap_or(defaults.decay.minimum_factor),
                maximum_days: decay.maximum_days.unwrap_or(defaults.decay.maximum_days),
            },
            None => defaults.decay,
        };

        let heat_buckets = match self.heat_buckets {
            Some(buckets) => buckets
                .into_iter()
                .map(|b| HeatBucket {
                    max_score: b.max_score,
                    heat: b.heat,
                })
                .collect(),
            None => defaults.heat_buckets,
        };

        RulesConfig {
            caps,
            stage_base: self
                .stage_base
                .map(|m| table("stageBase", m))
                .unwrap_or(defaults.stage_base),
            referral_bonus: self.referral_bonus.unwrap_or(defaults.referral_bonus),
            outreach_outcome_weight: self
                .outreach_outcome_weight
                .map(|m| table("outreachOutcomeWeight", m))
                .unwrap_or(defaults.outreach_outcome_weight),
            contact_strength_weight: self
                .contact_strength_weight
                .map(|m| table("contactStrengthWeight", m))
                .unwrap_or(defaults.contact_strength_weight),
            channel_weight: self
                .channel_weight
                .map(|m| table("channelWeight", m))
                .unwrap_or(defaults.channel_weight),
            personalization_divisor: self
                .personalization_divisor
                .unwrap_or(defaults.personalization_divisor),
            tailoring_divisor: self.tailoring_divisor.unwrap_or(defaults.tailoring_divisor),
            decay,
            heat_buckets,
        }
    }
}

/// Build an enum-keyed table from a document section, skipping unknown keys.
fn table<K: RuleKey>(section: &str, entries: BTreeMap<String, f64>) -> WeightTable<K> {
    let mut table = WeightTable::new();
    for (key, value) in entries {
        match K::from_key(&key) {
            Some(k) => table.set(k, value),
            None => tracing::warn!(section, key = %key, "ignoring unknown key in rule document"),
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Channel, ContactStrength, Outcome, Stage};

    #[test]
    fn test_empty_document_uses_defaults() {
        let rules = rules_from_str("").unwrap();
        assert_eq!(rules, RulesConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let doc = r#"
referralBonus: 50
decay:
  halfLifeDays: 14
stageBase:
  APPLIED: 40
"#;
        let rules = rules_from_str(doc).unwrap();
        assert_eq!(rules.referral_bonus, 50.0);
        assert_eq!(rules.decay.half_life_days, 14.0);
        // Other decay fields keep their defaults
        assert_eq!(rules.decay.minimum_factor, 0.25);
        // A present section replaces the whole table
        assert_eq!(rules.stage_base.weight(Stage::Applied), 40.0);
        assert_eq!(rules.stage_base.get(Stage::Offer), None);
        // Absent sections keep defaults
        assert_eq!(rules.channel_weight.weight(Channel::Email), 12.0);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let doc = r#"
owner: recruiting-team
channelWeight:
  EMAIL: 3
  CARRIER_PIGEON: 99
contactStrengthWeight:
  strong: 7
"#;
        let rules = rules_from_str(doc).unwrap();
        assert_eq!(rules.channel_weight.weight(Channel::Email), 3.0);
        assert_eq!(rules.channel_weight.iter().count(), 1);
        assert_eq!(
            rules.contact_strength_weight.weight(ContactStrength::Strong),
            7.0
        );
    }

    #[test]
    fn test_heat_buckets_section() {
        let doc = r#"
heatBuckets:
  - maxScore: 33
    heat: 0
  - maxScore: 66
    heat: 2
  - maxScore: 100
    heat: 3
"#;
        let rules = rules_from_str(doc).unwrap();
        assert_eq!(
            rules.heat_buckets,
            vec![
                HeatBucket { max_score: 33.0, heat: Heat::Cold },
                HeatBucket { max_score: 66.0, heat: Heat::Warm },
                HeatBucket { max_score: 100.0, heat: Heat::Hot },
            ]
        );
    }

    #[test]
    fn test_gap_in_buckets_rejected() {
        let doc = r#"
heatBuckets:
  - maxScore: 24
    heat: 0
  - maxScore: 74
    heat: 2
"#;
        let err = rules_from_str(doc).unwrap_err();
        assert!(format!("{:#}", err).contains("must cover 100"));
    }

    #[test]
    fn test_heat_out_of_range_rejected() {
        let doc = "heatBuckets:\n  - maxScore: 100\n    heat: 7\n";
        assert!(rules_from_str(doc).is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        let doc = "referralBonus: lots\n";
        let err = rules_from_str(doc).unwrap_err();
        assert!(err.to_string().contains("wrong shape"));
    }

    #[test]
    fn test_parse_error_carries_line() {
        let doc = "stageBase:\n  APPLIED: 35\n  - 40\n";
        let err = rules_from_str(doc).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("line 3"), "{}", message);
    }

    #[test]
    fn test_negative_outcome_weight() {
        let doc = "outreachOutcomeWeight:\n  NEGATIVE: -25\n  POSITIVE: 30\n";
        let rules = rules_from_str(doc).unwrap();
        assert_eq!(rules.outreach_outcome_weight.weight(Outcome::Negative), -25.0);
    }
}
