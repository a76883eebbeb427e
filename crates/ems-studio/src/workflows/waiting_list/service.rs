use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    QueueFilter, WaitingListEntry, WaitingListEntryId, WaitingListRequest, WaitingListStatus,
};
use super::repository::{ClientNotification, NotificationError, Notifier, WaitingListRepository};
use crate::workflows::repository::{IdSequence, RepositoryError};

pub const DEFAULT_PRIORITY: i32 = 0;
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const SLOT_AVAILABLE_TEMPLATE: &str = "waiting_list_slot_available";

static ENTRY_SEQUENCE: IdSequence = IdSequence::new("wle");

/// Service enforcing the waiting-list approval workflow.
pub struct WaitingListService<W, N> {
    repository: Arc<W>,
    notifier: Arc<N>,
    page_size: usize,
}

impl<W, N> WaitingListService<W, N>
where
    W: WaitingListRepository + 'static,
    N: Notifier + 'static,
{
    pub fn new(repository: Arc<W>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            notifier,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Queue a new client request in the `pending` state.
    pub fn request(
        &self,
        request: WaitingListRequest,
    ) -> Result<WaitingListEntry, WaitingListError> {
        let sequence = ENTRY_SEQUENCE.next_value();
        let entry = WaitingListEntry {
            id: WaitingListEntryId(ENTRY_SEQUENCE.format(sequence)),
            client_id: request.client_id,
            studio_id: request.studio_id,
            status: WaitingListStatus::Pending,
            priority: request.priority.unwrap_or(DEFAULT_PRIORITY),
            preferred_date: request.preferred_date,
            preferred_slot: request.preferred_slot,
            notes: request.notes,
            created_at: Utc::now(),
            notified_at: None,
            booked_at: None,
            sequence,
        };

        let stored = self.repository.insert(entry)?;
        info!(
            entry_id = %stored.id,
            client_id = %stored.client_id,
            studio_id = %stored.studio_id,
            "waiting list request queued"
        );
        Ok(stored)
    }

    pub fn approve(&self, id: &WaitingListEntryId) -> Result<WaitingListEntry, WaitingListError> {
        let entry = self.get(id)?;
        let entry = advance(entry, WaitingListStatus::Approved)?;
        self.persist(entry)
    }

    /// Cancel a pending or approved entry. Rejecting an already cancelled
    /// entry leaves it untouched.
    pub fn reject(&self, id: &WaitingListEntryId) -> Result<WaitingListEntry, WaitingListError> {
        let entry = self.get(id)?;
        if entry.status == WaitingListStatus::Cancelled {
            return Ok(entry);
        }
        let entry = advance(entry, WaitingListStatus::Cancelled)?;
        self.persist(entry)
    }

    /// Tell the client a slot is available. The notification is sent before
    /// the status moves so a failed send leaves the entry approved.
    pub fn notify(&self, id: &WaitingListEntryId) -> Result<WaitingListEntry, WaitingListError> {
        let entry = self.get(id)?;
        let mut entry = advance(entry, WaitingListStatus::Notified)?;

        let mut details = BTreeMap::new();
        details.insert("studio_id".to_string(), entry.studio_id.0.clone());
        if let Some(date) = entry.preferred_date {
            details.insert("preferred_date".to_string(), date.to_string());
        }
        if let Some(slot) = &entry.preferred_slot {
            details.insert("preferred_slot".to_string(), slot.clone());
        }
        self.notifier.notify(ClientNotification {
            template: SLOT_AVAILABLE_TEMPLATE.to_string(),
            client_id: entry.client_id.clone(),
            entry_id: entry.id.clone(),
            details,
        })?;

        entry.notified_at = Some(Utc::now());
        self.persist(entry)
    }

    /// Close an approved or notified entry after the caller booked a session.
    pub fn mark_as_booked(
        &self,
        id: &WaitingListEntryId,
    ) -> Result<WaitingListEntry, WaitingListError> {
        let entry = self.get(id)?;
        let mut entry = advance(entry, WaitingListStatus::Booked)?;
        entry.booked_at = Some(Utc::now());
        self.persist(entry)
    }

    /// Re-rank an entry. Siblings sharing the same priority are not renumbered.
    pub fn update_priority(
        &self,
        id: &WaitingListEntryId,
        priority: i32,
    ) -> Result<WaitingListEntry, WaitingListError> {
        let mut entry = self.get(id)?;
        entry.priority = priority;
        self.repository.update(entry.clone())?;
        info!(entry_id = %id, priority, "waiting list priority updated");
        Ok(entry)
    }

    pub fn delete(&self, id: &WaitingListEntryId) -> Result<(), WaitingListError> {
        self.repository.delete(id)?;
        info!(entry_id = %id, "waiting list entry deleted");
        Ok(())
    }

    pub fn get(&self, id: &WaitingListEntryId) -> Result<WaitingListEntry, WaitingListError> {
        let entry = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(entry)
    }

    /// Queue view ordered by priority, then arrival.
    pub fn list(&self, filter: &QueueFilter) -> Result<Vec<WaitingListEntry>, WaitingListError> {
        let mut entries: Vec<_> = self
            .repository
            .all()?
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect();
        entries.sort_by_key(|entry| (entry.priority, entry.sequence));
        entries.truncate(self.page_size);
        Ok(entries)
    }

    fn persist(&self, entry: WaitingListEntry) -> Result<WaitingListEntry, WaitingListError> {
        self.repository.update(entry.clone())?;
        info!(entry_id = %entry.id, status = entry.status.label(), "waiting list entry updated");
        Ok(entry)
    }
}

fn advance(
    mut entry: WaitingListEntry,
    next: WaitingListStatus,
) -> Result<WaitingListEntry, WaitingListError> {
    if !entry.status.can_transition_to(next) {
        warn!(
            entry_id = %entry.id,
            from = entry.status.label(),
            to = next.label(),
            "rejected waiting list transition"
        );
        return Err(WaitingListError::InvalidTransition {
            from: entry.status,
            to: next,
        });
    }
    entry.status = next;
    Ok(entry)
}

/// Error raised by the waiting-list service.
#[derive(Debug, thiserror::Error)]
pub enum WaitingListError {
    #[error("cannot move waiting list entry from {from} to {to}")]
    InvalidTransition {
        from: WaitingListStatus,
        to: WaitingListStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl WaitingListError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            WaitingListError::InvalidTransition { .. } => StatusCode::CONFLICT,
            WaitingListError::Repository(err) => err.status_code(),
            WaitingListError::Notification(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
