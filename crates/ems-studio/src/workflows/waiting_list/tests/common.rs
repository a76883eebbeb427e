use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::repository::RepositoryError;
use crate::workflows::roster::{ClientId, StudioId};
use crate::workflows::waiting_list::domain::{
    WaitingListEntry, WaitingListEntryId, WaitingListRequest,
};
use crate::workflows::waiting_list::repository::{
    ClientNotification, NotificationError, Notifier, WaitingListRepository,
};
use crate::workflows::waiting_list::service::WaitingListService;

pub(super) fn request(client: &str, studio: &str, priority: Option<i32>) -> WaitingListRequest {
    WaitingListRequest {
        client_id: ClientId(client.to_string()),
        studio_id: StudioId(studio.to_string()),
        priority,
        preferred_date: NaiveDate::from_ymd_opt(2025, 4, 2),
        preferred_slot: Some("18:00-18:30".to_string()),
        notes: None,
    }
}

pub(super) fn build_service() -> (
    WaitingListService<MemoryQueue, MemoryNotifier>,
    Arc<MemoryQueue>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryQueue::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = WaitingListService::new(repository.clone(), notifier.clone());
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryQueue {
    entries: Arc<Mutex<HashMap<WaitingListEntryId, WaitingListEntry>>>,
}

impl WaitingListRepository for MemoryQueue {
    fn insert(&self, entry: WaitingListEntry) -> Result<WaitingListEntry, RepositoryError> {
        let mut guard = self.entries.lock().expect("queue mutex poisoned");
        if guard.contains_key(&entry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    fn update(&self, entry: WaitingListEntry) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("queue mutex poisoned");
        guard.insert(entry.id.clone(), entry);
        Ok(())
    }

    fn fetch(&self, id: &WaitingListEntryId) -> Result<Option<WaitingListEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("queue mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &WaitingListEntryId) -> Result<(), RepositoryError> {
        let mut guard = self.entries.lock().expect("queue mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<WaitingListEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("queue mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<ClientNotification>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<ClientNotification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: ClientNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl Notifier for OfflineNotifier {
    fn notify(&self, _notification: ClientNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("sms gateway offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
