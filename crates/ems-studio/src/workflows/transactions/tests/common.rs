use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::workflows::repository::RepositoryError;
use crate::workflows::transactions::domain::{
    NewTransaction, PaymentMethod, TransactionId, TransactionRecord, TransactionType,
};
use crate::workflows::transactions::repository::TransactionRepository;
use crate::workflows::transactions::service::TransactionLedgerService;

pub(super) fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date")
}

pub(super) fn new_transaction(
    kind: TransactionType,
    amount: Decimal,
    method: Option<PaymentMethod>,
    occurred_on: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        kind,
        category: "front_desk".to_string(),
        amount,
        description: format!("{} entry", kind.label()),
        payment_method: method,
        occurred_on,
        reference: None,
    }
}

pub(super) fn build_service() -> (
    TransactionLedgerService<MemoryTransactions>,
    Arc<MemoryTransactions>,
) {
    let repository = Arc::new(MemoryTransactions::default());
    let service = TransactionLedgerService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryTransactions {
    records: Arc<Mutex<HashMap<TransactionId, TransactionRecord>>>,
}

impl TransactionRepository for MemoryTransactions {
    fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: TransactionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &TransactionId) -> Result<Option<TransactionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableTransactions;

impl TransactionRepository for UnavailableTransactions {
    fn insert(&self, _record: TransactionRecord) -> Result<TransactionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: TransactionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &TransactionId) -> Result<Option<TransactionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
