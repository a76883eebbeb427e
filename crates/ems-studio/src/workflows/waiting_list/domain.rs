use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::roster::{ClientId, StudioId};

/// Identifier wrapper for queued requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaitingListEntryId(pub String);

impl fmt::Display for WaitingListEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Queue position of a client request.
///
/// ```text
/// pending ──approve──► approved ──notify──► notified ──book──► booked
///    │                    │  └──────────────book──────────────────┘
///    └──reject──► cancelled ◄──reject──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitingListStatus {
    Pending,
    Approved,
    Notified,
    Booked,
    Cancelled,
}

impl WaitingListStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Notified => "notified",
            Self::Booked => "booked",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved)
                | (Self::Approved, Self::Notified)
                | (Self::Approved, Self::Booked)
                | (Self::Notified, Self::Booked)
                | (Self::Pending, Self::Cancelled)
                | (Self::Approved, Self::Cancelled)
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Booked | Self::Cancelled)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "notified" => Some(Self::Notified),
            "booked" => Some(Self::Booked),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for WaitingListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Queue row, mutated in place by staff actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingListEntry {
    pub id: WaitingListEntryId,
    pub client_id: ClientId,
    pub studio_id: StudioId,
    pub status: WaitingListStatus,
    /// Lower number means served first.
    pub priority: i32,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_slot: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
    pub booked_at: Option<DateTime<Utc>>,
    pub sequence: u64,
}

/// Client request for a session slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingListRequest {
    pub client_id: ClientId,
    pub studio_id: StudioId,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub preferred_slot: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Optional narrowing applied to queue listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueFilter {
    pub studio_id: Option<StudioId>,
    pub status: Option<WaitingListStatus>,
}

impl QueueFilter {
    pub fn matches(&self, entry: &WaitingListEntry) -> bool {
        self.studio_id
            .as_ref()
            .map_or(true, |studio_id| &entry.studio_id == studio_id)
            && self.status.map_or(true, |status| entry.status == status)
    }
}
