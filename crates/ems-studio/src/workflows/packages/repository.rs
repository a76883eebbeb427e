use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{ClientPackage, ClientPackageId, Package, PackageId};
use crate::workflows::repository::RepositoryError;
use crate::workflows::roster::ClientId;
use crate::workflows::transactions::{PaymentMethod, TransactionId};

/// Storage for package templates and client cycles.
pub trait PackageRepository: Send + Sync {
    fn insert_package(&self, package: Package) -> Result<Package, RepositoryError>;
    fn update_package(&self, package: Package) -> Result<(), RepositoryError>;
    fn fetch_package(&self, id: &PackageId) -> Result<Option<Package>, RepositoryError>;
    fn packages(&self) -> Result<Vec<Package>, RepositoryError>;

    fn insert_client_package(
        &self,
        client_package: ClientPackage,
    ) -> Result<ClientPackage, RepositoryError>;
    fn update_client_package(&self, client_package: ClientPackage) -> Result<(), RepositoryError>;
    fn fetch_client_package(
        &self,
        id: &ClientPackageId,
    ) -> Result<Option<ClientPackage>, RepositoryError>;
    fn client_packages_for(&self, client_id: &ClientId)
        -> Result<Vec<ClientPackage>, RepositoryError>;
}

/// Sale handed to the cash-flow ledger when a cycle is sold or renewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSale {
    pub client_id: ClientId,
    pub client_package_id: ClientPackageId,
    pub package_name: String,
    pub amount: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub sold_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleReceipt {
    pub transaction_id: TransactionId,
    /// `false` when the sale still waits for payment confirmation.
    pub settled: bool,
}

/// Outbound seam to whatever books package revenue.
pub trait SaleRecorder: Send + Sync {
    fn record_sale(&self, sale: PackageSale) -> Result<SaleReceipt, SaleError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    #[error("failed to record package sale: {0}")]
    Ledger(String),
}
