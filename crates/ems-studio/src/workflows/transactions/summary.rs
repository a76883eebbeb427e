use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{TransactionRecord, TransactionStatus, TransactionType};

/// Inclusive date range applied to ledger reads. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerWindow {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl LedgerWindow {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// The last `days` calendar days, `today` included.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let from = today
            .checked_sub_signed(Duration::days(i64::from(days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN);
        Self::between(from, today)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Aggregated totals over a fetched window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub refund: Decimal,
    pub net: Decimal,
    pub pending: Decimal,
    pub pending_count: usize,
    pub transaction_count: usize,
}

/// Raised when a total leaves the representable decimal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ledger totals exceed the supported amount range")]
pub struct LedgerOverflow;

fn checked_sum(total: Decimal, amount: Decimal) -> Result<Decimal, LedgerOverflow> {
    total.checked_add(amount).ok_or(LedgerOverflow)
}

impl LedgerSummary {
    pub fn from_records<'a, I>(records: I) -> Result<Self, LedgerOverflow>
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut summary = Self::default();
        for record in records {
            let bucket = match record.kind {
                TransactionType::Income => &mut summary.income,
                TransactionType::Expense => &mut summary.expense,
                TransactionType::Refund => &mut summary.refund,
            };
            *bucket = checked_sum(*bucket, record.amount)?;
            if record.status == TransactionStatus::Pending {
                summary.pending = checked_sum(summary.pending, record.amount)?;
                summary.pending_count += 1;
            }
            summary.transaction_count += 1;
        }
        summary.net = summary
            .income
            .checked_sub(summary.expense)
            .and_then(|net| net.checked_sub(summary.refund))
            .ok_or(LedgerOverflow)?;
        Ok(summary)
    }
}

/// Ledger row decorated with the cumulative balance up to and including it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRow {
    #[serde(flatten)]
    pub record: TransactionRecord,
    pub running_balance: Decimal,
}

/// Orders rows chronologically and accumulates the signed amounts.
pub fn with_running_balance(
    mut records: Vec<TransactionRecord>,
) -> Result<Vec<LedgerRow>, LedgerOverflow> {
    records.sort_by_key(|record| (record.occurred_on, record.sequence));

    let mut balance = Decimal::ZERO;
    records
        .into_iter()
        .map(|record| -> Result<LedgerRow, LedgerOverflow> {
            balance = checked_sum(balance, record.signed_amount())?;
            Ok(LedgerRow {
                record,
                running_balance: balance,
            })
        })
        .collect()
}
