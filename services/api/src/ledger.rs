use crate::infra::{parse_date, InMemoryTransactionRepository};
use chrono::NaiveDate;
use clap::Args;
use ems_studio::error::AppError;
use ems_studio::workflows::transactions::{
    LedgerRow, LedgerSummary, LedgerWindow, NewTransaction, TransactionCsvImporter,
    TransactionLedgerError, TransactionLedgerService,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct LedgerSummaryArgs {
    /// Cash book export with Date,Type,Category,Amount,Description,Payment Method columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// First day included in the report (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Last day included in the report (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) to: Option<NaiveDate>,
}

pub(crate) struct LedgerReport {
    pub(crate) window: LedgerWindow,
    pub(crate) rows: Vec<LedgerRow>,
    pub(crate) summary: LedgerSummary,
}

pub(crate) fn run_ledger_summary(args: LedgerSummaryArgs) -> Result<(), AppError> {
    let transactions = TransactionCsvImporter::from_path(&args.csv)?;
    let window = LedgerWindow {
        from: args.from,
        to: args.to,
    };
    let report = build_report(transactions, window)?;
    print!("{}", render_report(&report));
    Ok(())
}

/// Loads the export into a scratch ledger. Without a range the whole file is
/// reported.
pub(crate) fn build_report(
    transactions: Vec<NewTransaction>,
    window: LedgerWindow,
) -> Result<LedgerReport, TransactionLedgerError> {
    let ledger = TransactionLedgerService::new(Arc::new(InMemoryTransactionRepository::default()));
    ledger.import(transactions)?;
    Ok(LedgerReport {
        rows: ledger.ledger(&window)?,
        summary: ledger.summary(&window)?,
        window,
    })
}

pub(crate) fn render_report(report: &LedgerReport) -> String {
    let mut out = String::new();
    let bound = |day: Option<NaiveDate>| day.map_or_else(|| "*".to_string(), |d| d.to_string());
    let _ = writeln!(
        out,
        "Cash-flow ledger {} .. {}",
        bound(report.window.from),
        bound(report.window.to)
    );
    for row in &report.rows {
        let record = &row.record;
        let _ = writeln!(
            out,
            "  {} {:<7} {:<16} {:>10} {:<7} balance {:>10}",
            record.occurred_on,
            record.kind.label(),
            record.category,
            record.amount,
            record.status.label(),
            row.running_balance
        );
    }

    let summary = &report.summary;
    let _ = writeln!(out, "Summary ({} transactions)", summary.transaction_count);
    let _ = writeln!(out, "- income  {}", summary.income);
    let _ = writeln!(out, "- expense {}", summary.expense);
    let _ = writeln!(out, "- refund  {}", summary.refund);
    let _ = writeln!(out, "- net     {}", summary.net);
    if summary.pending_count > 0 {
        let _ = writeln!(
            out,
            "- pending {} across {} unpaid rows",
            summary.pending, summary.pending_count
        );
    }
    out
}
