use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::keys::rule_key;

rule_key! {
    /// Pipeline phase of a tracked opportunity.
    pub enum Stage {
        Prospect => "PROSPECT",
        Applied => "APPLIED",
        Screening => "SCREENING",
        Interview => "INTERVIEW",
        Offer => "OFFER",
        Accepted => "ACCEPTED",
        Rejected => "REJECTED",
        Withdrawn => "WITHDRAWN",
    }
}

rule_key! {
    /// How an outreach attempt turned out.
    pub enum Outcome {
        Pending => "PENDING",
        NoResponse => "NO_RESPONSE",
        Neutral => "NEUTRAL",
        Positive => "POSITIVE",
        Negative => "NEGATIVE",
    }
}

rule_key! {
    /// Medium an outreach attempt was sent through.
    pub enum Channel {
        Email => "EMAIL",
        LinkedIn => "LINKEDIN",
        Phone => "PHONE",
        InPerson => "IN_PERSON",
        Other => "OTHER",
    }
}

rule_key! {
    /// How well the sender knows the contact.
    pub enum ContactStrength {
        Weak => "WEAK",
        Medium => "MEDIUM",
        Strong => "STRONG",
    }
}

rule_key! {
    /// Kind of recorded introduction or vouching event.
    pub enum ReferralKind {
        Referral => "REFERRAL",
        CvSent => "CV_SENT",
        Introduction => "INTRODUCTION",
        Mention => "MENTION",
    }
}

impl ReferralKind {
    /// Strong referrals floor the score at the configured referral bonus.
    pub fn is_strong(self) -> bool {
        matches!(self, ReferralKind::Referral | ReferralKind::CvSent)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachRecord {
    pub sent_at: DateTime<Utc>,
    pub channel: Channel,
    pub outcome: Outcome,
    pub personalization_score: f64, // 0-100
    #[serde(default)]
    pub contact_strength: Option<ContactStrength>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub date_sent: DateTime<Utc>,
    pub tailoring_score: f64, // 0-100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralRecord {
    pub kind: ReferralKind,
}

/// Read-only view of a pipeline item, assembled by the caller from its own storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub stage: Stage,
    #[serde(default)]
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_touch_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub outreach: Vec<OutreachRecord>,
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
    #[serde(default)]
    pub referrals: Vec<ReferralRecord>,
}

impl EntitySnapshot {
    /// Snapshot with no history, created and last updated at `at`.
    pub fn new(stage: Stage, at: DateTime<Utc>) -> Self {
        Self {
            stage,
            archived: false,
            created_at: at,
            updated_at: at,
            last_touch_at: None,
            outreach: Vec::new(),
            applications: Vec::new(),
            referrals: Vec::new(),
        }
    }

    /// Most recent outreach attempt by `sent_at`
    pub fn latest_outreach(&self) -> Option<&OutreachRecord> {
        self.outreach.iter().max_by_key(|o| o.sent_at)
    }

    /// Most recent application by `date_sent`
    pub fn latest_application(&self) -> Option<&ApplicationRecord> {
        self.applications.iter().max_by_key(|a| a.date_sent)
    }

    /// First strong referral on record, if any
    pub fn strong_referral(&self) -> Option<ReferralKind> {
        self.referrals
            .iter()
            .map(|r| r.kind)
            .find(|kind| kind.is_strong())
    }

    /// Instant the item was last active: the latest of `last_touch_at`,
    /// `updated_at` and the newest outreach, falling back to `created_at`.
    pub fn reference_time(&self) -> DateTime<Utc> {
        [
            self.last_touch_at,
            Some(self.updated_at),
            self.latest_outreach().map(|o| o.sent_at),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(self.created_at)
    }

    /// Days elapsed between the reference time and `now`, never negative.
    pub fn idle_days(&self, now: DateTime<Utc>) -> f64 {
        let secs = (now - self.reference_time()).num_seconds().max(0);
        secs as f64 / 86_400.0
    }
}
