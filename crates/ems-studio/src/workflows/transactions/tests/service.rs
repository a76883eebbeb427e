use super::common::*;
use crate::workflows::packages::{ClientPackageId, PackageSale, SaleRecorder};
use crate::workflows::repository::RepositoryError;
use crate::workflows::roster::ClientId;
use crate::workflows::transactions::domain::{
    PaymentMethod, TransactionId, TransactionStatus, TransactionType,
};
use crate::workflows::transactions::repository::TransactionRepository;
use crate::workflows::transactions::service::{
    TransactionLedgerError, TransactionLedgerService, MAX_TRANSACTION_AMOUNT,
    PACKAGE_SALE_CATEGORY,
};
use crate::workflows::transactions::summary::LedgerWindow;
use axum::http::StatusCode;
use rust_decimal_macros::dec;
use std::sync::Arc;

#[test]
fn create_marks_rows_without_method_as_pending() {
    let (service, _) = build_service();

    let paid = service
        .create(new_transaction(
            TransactionType::Income,
            dec!(80),
            Some(PaymentMethod::Cash),
            day(1),
        ))
        .expect("paid row recorded");
    let pending = service
        .create(new_transaction(TransactionType::Income, dec!(40), None, day(1)))
        .expect("pending row recorded");

    assert_eq!(paid.status, TransactionStatus::Paid);
    assert_eq!(pending.status, TransactionStatus::Pending);
    assert!(pending.payment_method.is_none());
}

#[test]
fn create_rejects_non_positive_amounts_and_blank_categories() {
    let (service, repository) = build_service();

    match service.create(new_transaction(TransactionType::Expense, dec!(0), None, day(1))) {
        Err(TransactionLedgerError::InvalidAmount) => {}
        other => panic!("expected invalid amount, got {other:?}"),
    }

    let mut blank = new_transaction(TransactionType::Expense, dec!(5), None, day(1));
    blank.category = "   ".to_string();
    match service.create(blank) {
        Err(TransactionLedgerError::MissingCategory) => {}
        other => panic!("expected missing category, got {other:?}"),
    }

    assert!(repository.all().expect("scan").is_empty());
}

#[test]
fn create_caps_amounts_so_totals_stay_computable() {
    let (service, repository) = build_service();
    let huge = dec!(50000000000000000000000000000);

    for _ in 0..2 {
        let error = service
            .create(new_transaction(TransactionType::Income, huge, None, day(1)))
            .expect_err("oversized amount rejected");
        assert!(matches!(error, TransactionLedgerError::AmountTooLarge(_)));
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
    assert!(repository.all().expect("scan").is_empty());

    for _ in 0..2 {
        service
            .create(new_transaction(
                TransactionType::Income,
                MAX_TRANSACTION_AMOUNT,
                Some(PaymentMethod::BankTransfer),
                day(1),
            ))
            .expect("amount at the limit accepted");
    }
    let summary = service
        .summary(&LedgerWindow::default())
        .expect("summary computes");
    assert_eq!(summary.income, dec!(2000000000));
    let rows = service
        .ledger(&LedgerWindow::default())
        .expect("ledger computes");
    assert_eq!(rows[1].running_balance, dec!(2000000000));
}

#[test]
fn confirm_payment_settles_pending_rows_once() {
    let (service, repository) = build_service();
    let pending = service
        .create(new_transaction(TransactionType::Income, dec!(120), None, day(2)))
        .expect("pending row recorded");

    let confirmed = service
        .confirm_payment(&pending.id, PaymentMethod::Card)
        .expect("confirmation succeeds");
    assert_eq!(confirmed.status, TransactionStatus::Paid);
    assert_eq!(confirmed.payment_method, Some(PaymentMethod::Card));

    let stored = repository
        .fetch(&pending.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.status, TransactionStatus::Paid);

    match service.confirm_payment(&pending.id, PaymentMethod::Cash) {
        Err(TransactionLedgerError::AlreadyPaid(id)) => assert_eq!(id, pending.id),
        other => panic!("expected already paid, got {other:?}"),
    }
}

#[test]
fn confirm_payment_propagates_not_found() {
    let (service, _) = build_service();

    match service.confirm_payment(&TransactionId("missing".to_string()), PaymentMethod::Cash) {
        Err(TransactionLedgerError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn summary_over_window_nets_outflows() {
    let (service, _) = build_service();
    for (kind, amount) in [
        (TransactionType::Income, dec!(100)),
        (TransactionType::Expense, dec!(30)),
        (TransactionType::Refund, dec!(10)),
    ] {
        service
            .create(new_transaction(kind, amount, Some(PaymentMethod::Cash), day(10)))
            .expect("row recorded");
    }
    service
        .create(new_transaction(
            TransactionType::Income,
            dec!(500),
            Some(PaymentMethod::Cash),
            day(25),
        ))
        .expect("out of window row recorded");

    let summary = service
        .summary(&LedgerWindow::between(day(1), day(15)))
        .expect("summary computed");
    assert_eq!(summary.net, dec!(60));
    assert_eq!(summary.transaction_count, 3);

    let everything = service
        .summary(&LedgerWindow::default())
        .expect("summary computed");
    assert_eq!(everything.net, dec!(560));
}

#[test]
fn ledger_carries_brought_forward_balance_into_window() {
    let (service, _) = build_service();
    service
        .create(new_transaction(
            TransactionType::Income,
            dec!(200),
            Some(PaymentMethod::Card),
            day(1),
        ))
        .expect("row recorded");
    service
        .create(new_transaction(
            TransactionType::Expense,
            dec!(50),
            Some(PaymentMethod::Card),
            day(5),
        ))
        .expect("row recorded");

    let rows = service
        .ledger(&LedgerWindow::between(day(3), day(31)))
        .expect("ledger read");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].running_balance, dec!(150));
}

#[test]
fn import_validates_every_row_before_appending() {
    let (service, repository) = build_service();
    let batch = vec![
        new_transaction(TransactionType::Income, dec!(10), None, day(1)),
        new_transaction(TransactionType::Income, dec!(-1), None, day(1)),
    ];

    assert!(matches!(
        service.import(batch),
        Err(TransactionLedgerError::InvalidAmount)
    ));
    assert!(repository.all().expect("scan").is_empty());
}

#[test]
fn package_sales_are_recorded_as_income() {
    let (service, repository) = build_service();

    let receipt = service
        .record_sale(PackageSale {
            client_id: ClientId("client-1".to_string()),
            client_package_id: ClientPackageId("cpk-test".to_string()),
            package_name: "10 EMS sessions".to_string(),
            amount: dec!(450),
            payment_method: None,
            sold_on: day(3),
        })
        .expect("sale recorded");

    assert!(!receipt.settled);
    let stored = repository
        .fetch(&receipt.transaction_id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.kind, TransactionType::Income);
    assert_eq!(stored.category, PACKAGE_SALE_CATEGORY);
    assert_eq!(stored.reference.as_deref(), Some("cpk-test"));
}

#[test]
fn repository_outages_surface_as_errors() {
    let service = TransactionLedgerService::new(Arc::new(UnavailableTransactions));

    match service.summary(&LedgerWindow::default()) {
        Err(TransactionLedgerError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
}
