//! Append-only cash-flow ledger: income, expenses and refunds with a
//! read-time running balance, pending-payment confirmation and CSV import.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use domain::{
    NewTransaction, PaymentMethod, TransactionId, TransactionRecord, TransactionStatus,
    TransactionType,
};
pub use import::{TransactionCsvImporter, TransactionImportError};
pub use repository::TransactionRepository;
pub use router::transaction_router;
pub use service::{
    TransactionLedgerError, TransactionLedgerService, DEFAULT_SUMMARY_WINDOW_DAYS,
    MAX_TRANSACTION_AMOUNT, PACKAGE_SALE_CATEGORY,
};
pub use summary::{LedgerOverflow, LedgerRow, LedgerSummary, LedgerWindow};
