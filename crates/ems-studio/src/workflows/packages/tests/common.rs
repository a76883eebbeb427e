use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::workflows::packages::domain::{
    ClientPackage, ClientPackageId, NewPackage, Package, PackageId,
};
use crate::workflows::packages::repository::{
    PackageRepository, PackageSale, SaleError, SaleReceipt, SaleRecorder,
};
use crate::workflows::packages::service::{AssignPackage, PackageLedgerService};
use crate::workflows::repository::RepositoryError;
use crate::workflows::roster::ClientId;
use crate::workflows::transactions::{PaymentMethod, TransactionId};

pub(super) fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub(super) fn new_package(name: &str, sessions: u32, price: Decimal) -> NewPackage {
    NewPackage {
        name: name.to_string(),
        total_sessions: sessions,
        price,
        validity_days: 90,
    }
}

pub(super) fn assignment(package_id: &PackageId, method: Option<PaymentMethod>) -> AssignPackage {
    AssignPackage {
        client_id: ClientId("client-1".to_string()),
        package_id: package_id.clone(),
        payment_method: method,
        purchase_date: day(1, 10),
    }
}

pub(super) type TestService = PackageLedgerService<MemoryPackages, RecordingSales>;

pub(super) fn build_service() -> (TestService, Arc<MemoryPackages>, Arc<RecordingSales>) {
    let repository = Arc::new(MemoryPackages::default());
    let sales = Arc::new(RecordingSales::default());
    let service = PackageLedgerService::new(repository.clone(), sales.clone());
    (service, repository, sales)
}

#[derive(Default, Clone)]
pub(super) struct MemoryPackages {
    packages: Arc<Mutex<HashMap<PackageId, Package>>>,
    cycles: Arc<Mutex<HashMap<ClientPackageId, ClientPackage>>>,
}

impl PackageRepository for MemoryPackages {
    fn insert_package(&self, package: Package) -> Result<Package, RepositoryError> {
        let mut guard = self.packages.lock().expect("package mutex poisoned");
        if guard.contains_key(&package.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(package.id.clone(), package.clone());
        Ok(package)
    }

    fn update_package(&self, package: Package) -> Result<(), RepositoryError> {
        let mut guard = self.packages.lock().expect("package mutex poisoned");
        guard.insert(package.id.clone(), package);
        Ok(())
    }

    fn fetch_package(&self, id: &PackageId) -> Result<Option<Package>, RepositoryError> {
        let guard = self.packages.lock().expect("package mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn packages(&self) -> Result<Vec<Package>, RepositoryError> {
        let guard = self.packages.lock().expect("package mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_client_package(
        &self,
        client_package: ClientPackage,
    ) -> Result<ClientPackage, RepositoryError> {
        let mut guard = self.cycles.lock().expect("cycle mutex poisoned");
        if guard.contains_key(&client_package.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(client_package.id.clone(), client_package.clone());
        Ok(client_package)
    }

    fn update_client_package(&self, client_package: ClientPackage) -> Result<(), RepositoryError> {
        let mut guard = self.cycles.lock().expect("cycle mutex poisoned");
        guard.insert(client_package.id.clone(), client_package);
        Ok(())
    }

    fn fetch_client_package(
        &self,
        id: &ClientPackageId,
    ) -> Result<Option<ClientPackage>, RepositoryError> {
        let guard = self.cycles.lock().expect("cycle mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn client_packages_for(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<ClientPackage>, RepositoryError> {
        let guard = self.cycles.lock().expect("cycle mutex poisoned");
        Ok(guard
            .values()
            .filter(|cycle| &cycle.client_id == client_id)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct RecordingSales {
    sales: Arc<Mutex<Vec<PackageSale>>>,
}

impl RecordingSales {
    pub(super) fn sales(&self) -> Vec<PackageSale> {
        self.sales.lock().expect("sales mutex poisoned").clone()
    }
}

impl SaleRecorder for RecordingSales {
    fn record_sale(&self, sale: PackageSale) -> Result<SaleReceipt, SaleError> {
        let mut guard = self.sales.lock().expect("sales mutex poisoned");
        let settled = sale.payment_method.is_some();
        guard.push(sale);
        Ok(SaleReceipt {
            transaction_id: TransactionId(format!("txn-test-{}", guard.len())),
            settled,
        })
    }
}

pub(super) struct ClosedLedger;

impl SaleRecorder for ClosedLedger {
    fn record_sale(&self, _sale: PackageSale) -> Result<SaleReceipt, SaleError> {
        Err(SaleError::Ledger("ledger closed for audit".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
