use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::domain::{
    ClientPackage, ClientPackageId, ClientPackageStatus, NewPackage, Package, PackageId,
    SessionAdjustment,
};
use super::repository::{PackageRepository, PackageSale, SaleError, SaleRecorder};
use crate::workflows::repository::{IdSequence, RepositoryError};
use crate::workflows::roster::ClientId;
use crate::workflows::transactions::{PaymentMethod, MAX_TRANSACTION_AMOUNT};

static PACKAGE_SEQUENCE: IdSequence = IdSequence::new("pkg");
static CLIENT_PACKAGE_SEQUENCE: IdSequence = IdSequence::new("cpk");

/// Sale of a package to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignPackage {
    pub client_id: ClientId,
    pub package_id: PackageId,
    pub payment_method: Option<PaymentMethod>,
    pub purchase_date: NaiveDate,
}

/// Start of a new cycle. Without `package_id` the current package is resold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenewPackage {
    pub package_id: Option<PackageId>,
    pub payment_method: Option<PaymentMethod>,
    pub purchase_date: NaiveDate,
}

/// Service owning the session-credit ledger.
pub struct PackageLedgerService<R, S> {
    repository: Arc<R>,
    sales: Arc<S>,
}

impl<R, S> PackageLedgerService<R, S>
where
    R: PackageRepository + 'static,
    S: SaleRecorder + 'static,
{
    pub fn new(repository: Arc<R>, sales: Arc<S>) -> Self {
        Self { repository, sales }
    }

    pub fn create_package(&self, package: NewPackage) -> Result<Package, PackageLedgerError> {
        let name = package.name.trim();
        if name.is_empty() {
            return Err(PackageLedgerError::InvalidPackage("name is required"));
        }
        if package.total_sessions == 0 {
            return Err(PackageLedgerError::InvalidPackage(
                "total sessions must be positive",
            ));
        }
        if package.validity_days == 0 {
            return Err(PackageLedgerError::InvalidPackage(
                "validity days must be positive",
            ));
        }
        if package.price < Decimal::ZERO {
            return Err(PackageLedgerError::InvalidPackage("price cannot be negative"));
        }
        if package.price > MAX_TRANSACTION_AMOUNT {
            return Err(PackageLedgerError::InvalidPackage(
                "price exceeds the ledger amount limit",
            ));
        }

        let stored = self.repository.insert_package(Package {
            id: PackageId(PACKAGE_SEQUENCE.next_id()),
            name: name.to_string(),
            total_sessions: package.total_sessions,
            price: package.price,
            validity_days: package.validity_days,
            is_active: true,
        })?;
        info!(package_id = %stored.id, sessions = stored.total_sessions, "package created");
        Ok(stored)
    }

    pub fn deactivate_package(&self, id: &PackageId) -> Result<Package, PackageLedgerError> {
        let mut package = self.package(id)?;
        package.is_active = false;
        self.repository.update_package(package.clone())?;
        info!(package_id = %id, "package deactivated");
        Ok(package)
    }

    pub fn list_packages(&self) -> Result<Vec<Package>, PackageLedgerError> {
        let mut packages = self.repository.packages()?;
        packages.sort_by(|left, right| left.id.0.cmp(&right.id.0));
        Ok(packages)
    }

    /// Sell a package: books the revenue, then opens a fresh cycle.
    pub fn assign(&self, request: AssignPackage) -> Result<ClientPackage, PackageLedgerError> {
        let package = self.sellable(&request.package_id)?;
        let stored = self.open_cycle(
            &package,
            request.client_id,
            request.payment_method,
            request.purchase_date,
            None,
        )?;
        info!(
            client_package_id = %stored.id,
            client_id = %stored.client_id,
            package_id = %stored.package_id,
            "package assigned"
        );
        Ok(stored)
    }

    /// Debit one session from a usable cycle.
    pub fn use_session(
        &self,
        id: &ClientPackageId,
        today: NaiveDate,
    ) -> Result<ClientPackage, PackageLedgerError> {
        let mut cycle = self.client_package(id)?;
        if !cycle.is_usable(today) {
            let status = match cycle.effective_status(today) {
                ClientPackageStatus::Active => ClientPackageStatus::Depleted,
                status => status,
            };
            warn!(client_package_id = %id, status = status.label(), "session use rejected");
            return Err(PackageLedgerError::DepletedOrExpired {
                id: id.clone(),
                status,
            });
        }

        cycle.sessions_remaining -= 1;
        cycle.sessions_used += 1;
        if cycle.sessions_remaining == 0 {
            cycle.status = ClientPackageStatus::Depleted;
        }
        self.repository.update_client_package(cycle.clone())?;

        info!(
            client_package_id = %id,
            remaining = cycle.sessions_remaining,
            "session used"
        );
        Ok(cycle)
    }

    /// Close the current cycle and open a new one, optionally on another package.
    pub fn renew(
        &self,
        id: &ClientPackageId,
        request: RenewPackage,
    ) -> Result<ClientPackage, PackageLedgerError> {
        let mut current = self.client_package(id)?;
        if current.status == ClientPackageStatus::Renewed {
            return Err(PackageLedgerError::AlreadyRenewed(id.clone()));
        }

        let package_id = request
            .package_id
            .unwrap_or_else(|| current.package_id.clone());
        let package = self.sellable(&package_id)?;
        let renewed = self.open_cycle(
            &package,
            current.client_id.clone(),
            request.payment_method,
            request.purchase_date,
            Some(current.id.clone()),
        )?;

        current.status = ClientPackageStatus::Renewed;
        self.repository.update_client_package(current)?;

        info!(
            client_package_id = %renewed.id,
            renewed_from = %id,
            package_id = %renewed.package_id,
            "package renewed"
        );
        Ok(renewed)
    }

    /// Staff correction of the remaining balance, kept in the row's history.
    pub fn adjust_sessions(
        &self,
        id: &ClientPackageId,
        delta: i32,
        reason: &str,
    ) -> Result<ClientPackage, PackageLedgerError> {
        let reason = reason.trim();
        if delta == 0 {
            return Err(PackageLedgerError::InvalidAdjustment(
                "delta must be non-zero".to_string(),
            ));
        }
        if reason.is_empty() {
            return Err(PackageLedgerError::InvalidAdjustment(
                "a reason is required".to_string(),
            ));
        }

        let mut cycle = self.client_package(id)?;
        if cycle.status == ClientPackageStatus::Renewed {
            return Err(PackageLedgerError::InvalidAdjustment(format!(
                "client package {id} was renewed"
            )));
        }
        let remaining = i64::from(cycle.sessions_remaining) + i64::from(delta);
        let remaining = u32::try_from(remaining).map_err(|_| {
            PackageLedgerError::InvalidAdjustment(format!(
                "adjustment of {delta} would leave {remaining} sessions"
            ))
        })?;

        cycle.sessions_remaining = remaining;
        cycle.status = match (cycle.status, remaining) {
            (ClientPackageStatus::Active, 0) => ClientPackageStatus::Depleted,
            (ClientPackageStatus::Depleted, remaining) if remaining > 0 => {
                ClientPackageStatus::Active
            }
            (status, _) => status,
        };
        cycle.adjustments.push(SessionAdjustment {
            delta,
            reason: reason.to_string(),
            recorded_at: Utc::now(),
        });
        self.repository.update_client_package(cycle.clone())?;

        info!(client_package_id = %id, delta, remaining, "sessions adjusted");
        Ok(cycle)
    }

    /// Cycle as seen on `today`.
    pub fn get(
        &self,
        id: &ClientPackageId,
        today: NaiveDate,
    ) -> Result<ClientPackage, PackageLedgerError> {
        Ok(self.client_package(id)?.as_of(today))
    }

    /// Every cycle a client bought, oldest purchase first.
    pub fn list_for_client(
        &self,
        client_id: &ClientId,
        today: NaiveDate,
    ) -> Result<Vec<ClientPackage>, PackageLedgerError> {
        let mut cycles: Vec<_> = self
            .repository
            .client_packages_for(client_id)?
            .into_iter()
            .map(|cycle| cycle.as_of(today))
            .collect();
        cycles.sort_by(|left, right| {
            (left.purchase_date, &left.id.0).cmp(&(right.purchase_date, &right.id.0))
        });
        Ok(cycles)
    }

    fn open_cycle(
        &self,
        package: &Package,
        client_id: ClientId,
        payment_method: Option<PaymentMethod>,
        purchase_date: NaiveDate,
        renewed_from: Option<ClientPackageId>,
    ) -> Result<ClientPackage, PackageLedgerError> {
        let id = ClientPackageId(CLIENT_PACKAGE_SEQUENCE.next_id());
        let receipt = self.sales.record_sale(PackageSale {
            client_id: client_id.clone(),
            client_package_id: id.clone(),
            package_name: package.name.clone(),
            amount: package.price,
            payment_method,
            sold_on: purchase_date,
        })?;
        if !receipt.settled {
            info!(
                client_package_id = %id,
                transaction_id = %receipt.transaction_id,
                "package sale awaiting payment"
            );
        }

        let cycle = ClientPackage {
            id,
            client_id,
            package_id: package.id.clone(),
            sessions_used: 0,
            sessions_remaining: package.total_sessions,
            status: ClientPackageStatus::Active,
            purchase_date,
            expiry_date: package.expiry_for(purchase_date),
            payment_method,
            renewed_from,
            sale_transaction_id: Some(receipt.transaction_id),
            adjustments: Vec::new(),
        };
        Ok(self.repository.insert_client_package(cycle)?)
    }

    fn sellable(&self, id: &PackageId) -> Result<Package, PackageLedgerError> {
        let package = self.package(id)?;
        if !package.is_active {
            return Err(PackageLedgerError::PackageInactive(id.clone()));
        }
        Ok(package)
    }

    fn package(&self, id: &PackageId) -> Result<Package, PackageLedgerError> {
        let package = self
            .repository
            .fetch_package(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(package)
    }

    fn client_package(&self, id: &ClientPackageId) -> Result<ClientPackage, PackageLedgerError> {
        let cycle = self
            .repository
            .fetch_client_package(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(cycle)
    }
}

/// Error raised by the package ledger service.
#[derive(Debug, thiserror::Error)]
pub enum PackageLedgerError {
    #[error("invalid package: {0}")]
    InvalidPackage(&'static str),
    #[error("package {0} is no longer sold")]
    PackageInactive(PackageId),
    #[error("client package {id} is {status}")]
    DepletedOrExpired {
        id: ClientPackageId,
        status: ClientPackageStatus,
    },
    #[error("invalid session adjustment: {0}")]
    InvalidAdjustment(String),
    #[error("client package {0} was already renewed")]
    AlreadyRenewed(ClientPackageId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Sale(#[from] SaleError),
}

impl PackageLedgerError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            PackageLedgerError::InvalidPackage(_) | PackageLedgerError::InvalidAdjustment(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            PackageLedgerError::PackageInactive(_)
            | PackageLedgerError::DepletedOrExpired { .. }
            | PackageLedgerError::AlreadyRenewed(_) => StatusCode::CONFLICT,
            PackageLedgerError::Repository(err) => err.status_code(),
            PackageLedgerError::Sale(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
