//! Time-decayed priority scoring for pipeline items.
//!
//! A [`ScoringService`] turns an [`EntitySnapshot`] (stage, referrals, outreach
//! and applications) into a bounded score, a heat bucket and a breakdown of
//! how the score was derived. Rules come from an indented YAML-style document
//! resolved by [`RulesLoader`], or from the built-in defaults.
//!
//! ```
//! use chrono::Utc;
//! use pipeline_heat::{EntitySnapshot, Heat, ScoringService, Stage};
//!
//! let service = ScoringService::default();
//! let entity = EntitySnapshot::new(Stage::Applied, Utc::now());
//! let result = service.explain(&entity);
//! assert_eq!(result.score, 35.0);
//! assert_eq!(result.heat, Heat::Cool);
//! ```

pub mod entity;
pub mod output;
pub mod rules;
pub mod scoring;

pub use entity::{
    ApplicationRecord, Channel, ContactStrength, EntitySnapshot, Outcome, OutreachRecord,
    ReferralKind, ReferralRecord, RuleKey, Stage,
};
pub use rules::{Heat, RulesConfig, RulesLoader, RulesSource};
pub use scoring::{BreakdownEntry, Category, ScoreResult, ScoringService};
