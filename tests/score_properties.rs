use chrono::{DateTime, Duration, Utc};
use pipeline_heat::rules::{DecayConfig, HeatBucket};
use pipeline_heat::scoring::{compute_at, decay_factor, heat_for_score};
use pipeline_heat::{
    ApplicationRecord, Channel, ContactStrength, EntitySnapshot, Heat, Outcome, OutreachRecord,
    ReferralKind, ReferralRecord, RuleKey, RulesConfig, ScoringService, Stage,
};
use proptest::prelude::*;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-06-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn arb_key<K: RuleKey + 'static>() -> impl Strategy<Value = K> {
    prop::sample::select(K::ALL.to_vec())
}

fn arb_outreach() -> impl Strategy<Value = OutreachRecord> {
    (
        0i64..200,
        arb_key::<Channel>(),
        arb_key::<Outcome>(),
        0.0f64..=100.0,
        prop::option::of(arb_key::<ContactStrength>()),
    )
        .prop_map(|(days_ago, channel, outcome, personalization_score, contact_strength)| {
            OutreachRecord {
                sent_at: now() - Duration::days(days_ago),
                channel,
                outcome,
                personalization_score,
                contact_strength,
            }
        })
}

fn arb_application() -> impl Strategy<Value = ApplicationRecord> {
    (0i64..200, 0.0f64..=100.0).prop_map(|(days_ago, tailoring_score)| ApplicationRecord {
        date_sent: now() - Duration::days(days_ago),
        tailoring_score,
    })
}

fn arb_entity() -> impl Strategy<Value = EntitySnapshot> {
    (
        arb_key::<Stage>(),
        any::<bool>(),
        0i64..365,
        prop::option::of(-10i64..365),
        prop::collection::vec(arb_outreach(), 0..4),
        prop::collection::vec(arb_application(), 0..3),
        prop::collection::vec(arb_key::<ReferralKind>(), 0..3),
    )
        .prop_map(
            |(stage, archived, idle, touch, outreach, applications, referrals)| EntitySnapshot {
                stage,
                archived,
                created_at: now() - Duration::days(idle + 30),
                updated_at: now() - Duration::days(idle),
                last_touch_at: touch.map(|d| now() - Duration::days(d)),
                outreach,
                applications,
                referrals: referrals
                    .into_iter()
                    .map(|kind| ReferralRecord { kind })
                    .collect(),
            },
        )
}

/// Any float, including huge, infinite and NaN weights.
fn arb_weight() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1000.0f64..1000.0,
        Just(f64::MAX),
        Just(f64::MIN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(f64::NAN),
    ]
}

fn arb_adversarial_rules() -> impl Strategy<Value = RulesConfig> {
    (
        prop::collection::vec(arb_weight(), Stage::ALL.len()),
        prop::collection::vec(arb_weight(), Outcome::ALL.len()),
        prop::collection::vec(arb_weight(), Channel::ALL.len()),
        arb_weight(),
        arb_weight(),
        arb_weight(),
    )
        .prop_map(|(stages, outcomes, channels, bonus, p_div, t_div)| {
            let mut rules = RulesConfig::default();
            rules.stage_base = Stage::ALL.iter().copied().zip(stages).collect();
            rules.outreach_outcome_weight = Outcome::ALL.iter().copied().zip(outcomes).collect();
            rules.channel_weight = Channel::ALL.iter().copied().zip(channels).collect();
            rules.referral_bonus = bonus;
            rules.personalization_divisor = p_div;
            rules.tailoring_divisor = t_div;
            rules
        })
}

proptest! {
    #[test]
    fn archived_entities_score_zero(mut entity in arb_entity()) {
        entity.archived = true;
        let result = compute_at(&entity, &RulesConfig::default(), now());
        prop_assert_eq!(result.score, 0.0);
        prop_assert_eq!(result.heat, Heat::Cold);
    }

    #[test]
    fn referral_floors_score_before_outreach(
        mut entity in arb_entity(),
        bonus in 0.0f64..100.0,
    ) {
        entity.archived = false;
        entity.referrals.push(ReferralRecord { kind: ReferralKind::Referral });
        let rules = RulesConfig { referral_bonus: bonus, ..RulesConfig::default() };
        let result = compute_at(&entity, &rules, now());

        // Stage base plus any referral lift is the score right after the floor
        let floored: f64 = result
            .breakdown
            .iter()
            .take_while(|e| matches!(
                e.category,
                pipeline_heat::Category::StageBase | pipeline_heat::Category::Referral
            ))
            .map(|e| e.delta)
            .sum();
        prop_assert!(floored >= bonus - 1e-9);
    }

    #[test]
    fn decay_is_non_increasing_and_floored(
        a in 0.0f64..400.0,
        b in 0.0f64..400.0,
        half_life in 0.1f64..60.0,
        minimum in 0.0f64..=1.0,
        maximum in 0.0f64..200.0,
    ) {
        let cfg = DecayConfig {
            half_life_days: half_life,
            minimum_factor: minimum,
            maximum_days: maximum,
        };
        let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
        let f_earlier = decay_factor(earlier, &cfg);
        let f_later = decay_factor(later, &cfg);
        prop_assert!(f_later <= f_earlier);
        prop_assert!(f_later >= minimum);
        prop_assert!(f_earlier >= minimum);
    }

    #[test]
    fn score_stays_in_range_for_adversarial_rules(
        entity in arb_entity(),
        rules in arb_adversarial_rules(),
    ) {
        let result = compute_at(&entity, &rules, now());
        prop_assert!((0.0..=100.0).contains(&result.score), "score {}", result.score);
    }

    #[test]
    fn threshold_scores_stay_in_their_bucket(index in 0usize..4) {
        let rules = RulesConfig::default();
        let bucket: HeatBucket = rules.heat_buckets[index];
        prop_assert_eq!(heat_for_score(bucket.max_score, &rules.heat_buckets), bucket.heat);
    }

    #[test]
    fn recalculate_matches_explain(entity in arb_entity()) {
        let service = ScoringService::default();
        let explained = service.explain_at(&entity, now());
        prop_assert_eq!(service.recalculate_at(&entity, now()), explained.heat);
    }
}

#[test]
fn applied_with_no_signals_is_cool() {
    let entity = EntitySnapshot::new(Stage::Applied, now() - Duration::days(3));
    let result = compute_at(&entity, &RulesConfig::default(), now());
    assert_eq!(result.score, 35.0);
    assert_eq!(result.heat, Heat::Cool);
}

#[test]
fn applied_with_referral_is_floored() {
    let mut entity = EntitySnapshot::new(Stage::Applied, now() - Duration::days(3));
    entity.referrals = vec![ReferralRecord {
        kind: ReferralKind::Referral,
    }];
    let result = compute_at(&entity, &RulesConfig::default(), now());
    assert_eq!(result.score, 45.0);
    assert_eq!(result.heat, Heat::Cool);
}

#[test]
fn three_week_old_outreach_hits_the_decay_floor() {
    let sent_at = now() - Duration::days(21);
    let mut entity = EntitySnapshot::new(Stage::Applied, sent_at);
    entity.outreach = vec![OutreachRecord {
        sent_at,
        channel: Channel::Email,
        outcome: Outcome::Positive,
        personalization_score: 80.0,
        contact_strength: Some(ContactStrength::Strong),
    }];
    let result = compute_at(&entity, &RulesConfig::default(), now());

    assert_eq!(result.decay_factor, 0.25);
    assert!((result.score - 54.5).abs() < 1e-9);
    assert_eq!(result.heat, Heat::Warm);
}
