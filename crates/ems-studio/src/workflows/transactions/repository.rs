use super::domain::{TransactionId, TransactionRecord};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for the append-only cash-flow ledger.
pub trait TransactionRepository: Send + Sync {
    fn insert(&self, record: TransactionRecord) -> Result<TransactionRecord, RepositoryError>;
    fn update(&self, record: TransactionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &TransactionId) -> Result<Option<TransactionRecord>, RepositoryError>;
    /// Full scan; callers order and window the rows themselves.
    fn all(&self) -> Result<Vec<TransactionRecord>, RepositoryError>;
}
