//! Package catalog and the per-client session-credit ledger: assignment,
//! session use, renewal cycles and staff adjustments.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ClientPackage, ClientPackageId, ClientPackageStatus, NewPackage, Package, PackageId,
    SessionAdjustment,
};
pub use repository::{PackageRepository, PackageSale, SaleError, SaleReceipt, SaleRecorder};
pub use router::package_router;
pub use service::{AssignPackage, PackageLedgerError, PackageLedgerService, RenewPackage};
