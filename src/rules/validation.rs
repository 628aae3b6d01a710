use super::config::RulesConfig;
use super::table::WeightTable;
use crate::entity::RuleKey;

/// Validate a rule set before any entity is scored.
/// Returns all validation errors at once (not just the first).
pub fn validate_rules(rules: &RulesConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    // Heat buckets must partition [0, 100]
    if rules.heat_buckets.is_empty() {
        errors.push("heatBuckets: at least one bucket is required".to_string());
    }
    for (i, bucket) in rules.heat_buckets.iter().enumerate() {
        if !bucket.max_score.is_finite() {
            errors.push(format!("heatBuckets[{}].maxScore: must be a finite number", i));
            continue;
        }
        if i == 0 && bucket.max_score < 0.0 {
            errors.push(format!(
                "heatBuckets[0].maxScore: {} leaves no room for scores from 0",
                bucket.max_score
            ));
        }
        if i > 0 {
            let previous = rules.heat_buckets[i - 1].max_score;
            if bucket.max_score <= previous {
                errors.push(format!(
                    "heatBuckets[{}].maxScore: {} must be greater than the previous bucket's {}",
                    i, bucket.max_score, previous
                ));
            }
        }
    }
    if let Some(last) = rules.heat_buckets.last() {
        if last.max_score < 100.0 {
            errors.push(format!(
                "heatBuckets[{}].maxScore: last bucket must cover 100, got {}",
                rules.heat_buckets.len() - 1,
                last.max_score
            ));
        }
    }

    // Divisors
    check_positive(&mut errors, "personalizationDivisor", rules.personalization_divisor);
    check_positive(&mut errors, "tailoringDivisor", rules.tailoring_divisor);

    // Decay
    check_positive(&mut errors, "decay.halfLifeDays", rules.decay.half_life_days);
    let min_factor = rules.decay.minimum_factor;
    if !(0.0..=1.0).contains(&min_factor) {
        errors.push(format!(
            "decay.minimumFactor: must be between 0 and 1, got {}",
            min_factor
        ));
    }
    let max_days = rules.decay.maximum_days;
    if max_days.is_nan() || max_days < 0.0 {
        errors.push(format!(
            "decay.maximumDays: must be non-negative, got {}",
            max_days
        ));
    }

    // Weights
    check_finite(&mut errors, "referralBonus", rules.referral_bonus);
    check_table(&mut errors, "stageBase", &rules.stage_base);
    check_table(&mut errors, "outreachOutcomeWeight", &rules.outreach_outcome_weight);
    check_table(&mut errors, "contactStrengthWeight", &rules.contact_strength_weight);
    check_table(&mut errors, "channelWeight", &rules.channel_weight);

    // Caps
    check_cap(&mut errors, "caps.archivedScore".to_string(), rules.caps.archived_score);
    for (stage, cap) in rules.caps.per_stage.iter() {
        check_cap(&mut errors, format!("caps.perStage.{}", stage.as_str()), cap);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_positive(errors: &mut Vec<String>, path: &str, value: f64) {
    // NaN fails too
    if !(value > 0.0 && value.is_finite()) {
        errors.push(format!("{}: must be a positive number, got {}", path, value));
    }
}

fn check_finite(errors: &mut Vec<String>, path: &str, value: f64) {
    if !value.is_finite() {
        errors.push(format!("{}: must be a finite number, got {}", path, value));
    }
}

fn check_table<K: RuleKey>(errors: &mut Vec<String>, path: &str, table: &WeightTable<K>) {
    for (key, value) in table.iter() {
        check_finite(errors, &format!("{}.{}", path, key.as_str()), value);
    }
}

fn check_cap(errors: &mut Vec<String>, path: String, value: f64) {
    if !(0.0..=100.0).contains(&value) {
        errors.push(format!("{}: must be between 0 and 100, got {}", path, value));
    }
}
