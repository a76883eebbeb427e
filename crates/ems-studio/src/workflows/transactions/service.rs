use std::sync::Arc;

use axum::http::StatusCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::domain::{
    NewTransaction, PaymentMethod, TransactionId, TransactionRecord, TransactionStatus,
    TransactionType,
};
use super::repository::TransactionRepository;
use super::summary::{
    with_running_balance, LedgerOverflow, LedgerRow, LedgerSummary, LedgerWindow,
};
use crate::workflows::packages::{PackageSale, SaleError, SaleReceipt, SaleRecorder};
use crate::workflows::repository::{IdSequence, RepositoryError};

pub const DEFAULT_SUMMARY_WINDOW_DAYS: u32 = 30;
pub const PACKAGE_SALE_CATEGORY: &str = "package_sale";
/// Largest amount a single row may carry (one billion).
pub const MAX_TRANSACTION_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

static TRANSACTION_SEQUENCE: IdSequence = IdSequence::new("txn");

/// Service owning the cash-flow ledger rules.
pub struct TransactionLedgerService<T> {
    repository: Arc<T>,
    summary_window_days: u32,
}

impl<T> TransactionLedgerService<T>
where
    T: TransactionRepository + 'static,
{
    pub fn new(repository: Arc<T>) -> Self {
        Self {
            repository,
            summary_window_days: DEFAULT_SUMMARY_WINDOW_DAYS,
        }
    }

    pub fn with_summary_window(mut self, days: u32) -> Self {
        self.summary_window_days = days;
        self
    }

    /// Window used when a summary request carries no explicit range.
    pub fn default_window(&self, today: NaiveDate) -> LedgerWindow {
        LedgerWindow::trailing(today, self.summary_window_days)
    }

    /// Append a row. Rows without a payment method wait for confirmation.
    pub fn create(
        &self,
        transaction: NewTransaction,
    ) -> Result<TransactionRecord, TransactionLedgerError> {
        validate(&transaction)?;
        let record = build_record(transaction);
        let stored = self.repository.insert(record)?;

        info!(
            transaction_id = %stored.id,
            kind = stored.kind.label(),
            status = stored.status.label(),
            amount = %stored.amount,
            "transaction recorded"
        );
        Ok(stored)
    }

    /// Settle a pending row, stamping how it was paid.
    pub fn confirm_payment(
        &self,
        id: &TransactionId,
        method: PaymentMethod,
    ) -> Result<TransactionRecord, TransactionLedgerError> {
        let mut record = self.get(id)?;
        if !record.status.can_transition_to(TransactionStatus::Paid) {
            return Err(TransactionLedgerError::AlreadyPaid(id.clone()));
        }

        record.status = TransactionStatus::Paid;
        record.payment_method = Some(method);
        self.repository.update(record.clone())?;

        info!(transaction_id = %id, method = method.label(), "payment confirmed");
        Ok(record)
    }

    pub fn get(&self, id: &TransactionId) -> Result<TransactionRecord, TransactionLedgerError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Chronological rows inside `window`. Balances accumulate over the whole
    /// history so the first row in the window carries the brought-forward total.
    pub fn ledger(&self, window: &LedgerWindow) -> Result<Vec<LedgerRow>, TransactionLedgerError> {
        let rows = with_running_balance(self.repository.all()?)?;
        Ok(rows
            .into_iter()
            .filter(|row| window.contains(row.record.occurred_on))
            .collect())
    }

    pub fn summary(&self, window: &LedgerWindow) -> Result<LedgerSummary, TransactionLedgerError> {
        let records = self.repository.all()?;
        let summary = LedgerSummary::from_records(
            records
                .iter()
                .filter(|record| window.contains(record.occurred_on)),
        )?;
        debug!(
            transactions = summary.transaction_count,
            net = %summary.net,
            "ledger summary computed"
        );
        Ok(summary)
    }

    /// Append a batch after validating every row up front.
    pub fn import(
        &self,
        transactions: Vec<NewTransaction>,
    ) -> Result<Vec<TransactionRecord>, TransactionLedgerError> {
        for transaction in &transactions {
            validate(transaction)?;
        }

        let mut stored = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            stored.push(self.repository.insert(build_record(transaction))?);
        }

        info!(imported = stored.len(), "transactions imported");
        Ok(stored)
    }
}

fn validate(transaction: &NewTransaction) -> Result<(), TransactionLedgerError> {
    if transaction.amount <= Decimal::ZERO {
        return Err(TransactionLedgerError::InvalidAmount);
    }
    if transaction.amount > MAX_TRANSACTION_AMOUNT {
        return Err(TransactionLedgerError::AmountTooLarge(transaction.amount));
    }
    if transaction.category.trim().is_empty() {
        return Err(TransactionLedgerError::MissingCategory);
    }
    Ok(())
}

fn build_record(transaction: NewTransaction) -> TransactionRecord {
    let sequence = TRANSACTION_SEQUENCE.next_value();
    let status = if transaction.payment_method.is_some() {
        TransactionStatus::Paid
    } else {
        TransactionStatus::Pending
    };

    TransactionRecord {
        id: TransactionId(TRANSACTION_SEQUENCE.format(sequence)),
        kind: transaction.kind,
        category: transaction.category.trim().to_string(),
        amount: transaction.amount,
        description: transaction.description,
        status,
        payment_method: transaction.payment_method,
        occurred_on: transaction.occurred_on,
        reference: transaction.reference,
        sequence,
    }
}

impl<T> SaleRecorder for TransactionLedgerService<T>
where
    T: TransactionRepository + 'static,
{
    fn record_sale(&self, sale: PackageSale) -> Result<SaleReceipt, SaleError> {
        let record = self
            .create(NewTransaction {
                kind: TransactionType::Income,
                category: PACKAGE_SALE_CATEGORY.to_string(),
                amount: sale.amount,
                description: format!("{} for client {}", sale.package_name, sale.client_id.0),
                payment_method: sale.payment_method,
                occurred_on: sale.sold_on,
                reference: Some(sale.client_package_id.0),
            })
            .map_err(|err| SaleError::Ledger(err.to_string()))?;

        Ok(SaleReceipt {
            transaction_id: record.id,
            settled: record.status == TransactionStatus::Paid,
        })
    }
}

/// Error raised by the transaction ledger service.
#[derive(Debug, thiserror::Error)]
pub enum TransactionLedgerError {
    #[error("transaction amount must be positive")]
    InvalidAmount,
    #[error("transaction amount {0} exceeds the limit of {}", MAX_TRANSACTION_AMOUNT)]
    AmountTooLarge(Decimal),
    #[error("transaction category is required")]
    MissingCategory,
    #[error("transaction {0} is already paid")]
    AlreadyPaid(TransactionId),
    #[error(transparent)]
    Overflow(#[from] LedgerOverflow),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TransactionLedgerError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            TransactionLedgerError::InvalidAmount
            | TransactionLedgerError::AmountTooLarge(_)
            | TransactionLedgerError::MissingCategory => StatusCode::UNPROCESSABLE_ENTITY,
            TransactionLedgerError::AlreadyPaid(_) => StatusCode::CONFLICT,
            TransactionLedgerError::Overflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TransactionLedgerError::Repository(err) => err.status_code(),
        }
    }
}
