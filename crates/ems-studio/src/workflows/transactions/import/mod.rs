mod normalizer;
mod parser;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use super::domain::{NewTransaction, PaymentMethod, TransactionType};
use normalizer::AmountRejection;
use parser::CashBookRow;

#[derive(Debug)]
pub enum TransactionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: usize, reason: String },
}

impl std::fmt::Display for TransactionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionImportError::Io(err) => write!(f, "failed to read cash book export: {}", err),
            TransactionImportError::Csv(err) => write!(f, "invalid cash book CSV data: {}", err),
            TransactionImportError::InvalidRow { line, reason } => {
                write!(f, "invalid cash book row on line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for TransactionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransactionImportError::Io(err) => Some(err),
            TransactionImportError::Csv(err) => Some(err),
            TransactionImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for TransactionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TransactionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `Date,Type,Category,Amount,Description,Payment Method` exports into
/// ledger rows. A single malformed row rejects the whole file.
pub struct TransactionCsvImporter;

impl TransactionCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NewTransaction>, TransactionImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<NewTransaction>, TransactionImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .enumerate()
            // Line 1 is the header row.
            .map(|(index, row)| convert_row(row, index + 2))
            .collect()
    }
}

fn convert_row(row: CashBookRow, line: usize) -> Result<NewTransaction, TransactionImportError> {
    let invalid = |reason: String| TransactionImportError::InvalidRow { line, reason };

    let occurred_on = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
        .map_err(|err| invalid(format!("date '{}' is not YYYY-MM-DD ({err})", row.date)))?;
    let kind = TransactionType::parse(&row.kind)
        .ok_or_else(|| invalid(format!("unknown transaction type '{}'", row.kind)))?;
    let amount = normalizer::normalize_amount(&row.amount)
        .map_err(|rejection| match rejection {
            AmountRejection::AmbiguousComma => invalid(format!(
                "amount '{}' must use '.' as the decimal separator",
                row.amount
            )),
            AmountRejection::UnexpectedCharacter(ch) => invalid(format!(
                "amount '{}' contains unexpected character '{ch}'",
                row.amount
            )),
        })
        .and_then(|normalized| {
            Decimal::from_str(&normalized)
                .map_err(|_| invalid(format!("amount '{}' is not a number", row.amount)))
        })?;
    let payment_method = row
        .payment_method
        .as_deref()
        .map(|raw| {
            PaymentMethod::parse(raw).ok_or_else(|| invalid(format!("unknown payment method '{raw}'")))
        })
        .transpose()?;
    let category = normalizer::normalize_category(&row.category);
    if category.is_empty() {
        return Err(invalid("category is required".to_string()));
    }

    Ok(NewTransaction {
        kind,
        category,
        amount,
        description: row.description,
        payment_method,
        occurred_on,
        reference: None,
    })
}
