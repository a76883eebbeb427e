use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{WaitingListEntry, WaitingListEntryId};
use crate::workflows::repository::RepositoryError;
use crate::workflows::roster::ClientId;

/// Storage abstraction for queue rows.
pub trait WaitingListRepository: Send + Sync {
    fn insert(&self, entry: WaitingListEntry) -> Result<WaitingListEntry, RepositoryError>;
    fn update(&self, entry: WaitingListEntry) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &WaitingListEntryId) -> Result<Option<WaitingListEntry>, RepositoryError>;
    fn delete(&self, id: &WaitingListEntryId) -> Result<(), RepositoryError>;
    fn all(&self) -> Result<Vec<WaitingListEntry>, RepositoryError>;
}

/// Outbound client messaging hook (SMS, e-mail or push adapters).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: ClientNotification) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientNotification {
    pub template: String,
    pub client_id: ClientId,
    pub entry_id: WaitingListEntryId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
