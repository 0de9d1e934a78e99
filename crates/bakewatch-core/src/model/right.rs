// ── Baking rights ──

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Right kind. Only `Baking` is consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RightKind {
    Baking,
    Other(String),
}

impl From<&str> for RightKind {
    fn from(raw: &str) -> Self {
        match raw {
            "baking" => Self::Baking,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Outcome of a past right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RightStatus {
    Realized,
    MissedBaking,
    MissedEndorsing,
    Future,
    Other(String),
}

impl From<&str> for RightStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "realized" => Self::Realized,
            "missed_baking" => Self::MissedBaking,
            "missed_endorsing" => Self::MissedEndorsing,
            "future" => Self::Future,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl RightStatus {
    /// Both missed variants count as a miss.
    pub fn is_missed(&self) -> bool {
        matches!(self, Self::MissedBaking | Self::MissedEndorsing)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Realized => "Baked",
            Self::MissedBaking | Self::MissedEndorsing => "Missed",
            Self::Future => "Future",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for RightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A chance to produce the block at `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Right {
    pub cycle: i64,
    pub level: i64,
    pub timestamp: DateTime<Utc>,
    pub kind: RightKind,
    /// 0 = primary, 1+ = fallback. Absent rounds never pass the filter.
    pub round: Option<u32>,
    /// Only populated for past rights.
    pub status: Option<RightStatus>,
}

impl Right {
    pub fn is_baking(&self) -> bool {
        self.kind == RightKind::Baking
    }

    pub fn is_realized(&self) -> bool {
        self.status == Some(RightStatus::Realized)
    }

    pub fn is_missed(&self) -> bool {
        self.status.as_ref().is_some_and(RightStatus::is_missed)
    }

    /// Time remaining until this right's slot (negative once passed).
    pub fn time_until(&self, now: DateTime<Utc>) -> TimeDelta {
        self.timestamp - now
    }

    /// Time elapsed since this right's slot.
    pub fn elapsed_since(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.timestamp
    }

    /// Block explorer page for this right's level.
    pub fn explorer_url(&self) -> String {
        format!("https://tzkt.io/{}", self.level)
    }
}
