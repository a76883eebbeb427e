use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::roster::{ClientId, CoachId, StudioId};
use crate::workflows::waiting_list::WaitingListEntryId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

/// Booked training slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub client_id: ClientId,
    pub coach_id: CoachId,
    pub room_id: RoomId,
    pub studio_id: StudioId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiting_list_entry_id: Option<WaitingListEntryId>,
}

impl Session {
    /// Half-open interval overlap: back-to-back sessions do not clash.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// Caller supplied values for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRequest {
    pub client_id: ClientId,
    pub coach_id: CoachId,
    pub room_id: RoomId,
    pub studio_id: StudioId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub waiting_list_entry_id: Option<WaitingListEntryId>,
}
