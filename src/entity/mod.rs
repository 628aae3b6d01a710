mod keys;
pub mod types;

pub use keys::RuleKey;
pub use types::{
    ApplicationRecord, Channel, ContactStrength, EntitySnapshot, Outcome, OutreachRecord,
    ReferralKind, ReferralRecord, Stage,
};
