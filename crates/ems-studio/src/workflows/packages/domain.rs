use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflows::roster::ClientId;
use crate::workflows::transactions::{PaymentMethod, TransactionId};

/// Identifier of a sellable package template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub String);

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one purchase or renewal cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientPackageId(pub String);

impl fmt::Display for ClientPackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sellable session bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub total_sessions: u32,
    pub price: Decimal,
    pub validity_days: u32,
    pub is_active: bool,
}

impl Package {
    /// Last day a cycle bought on `purchase_date` may be used.
    pub fn expiry_for(&self, purchase_date: NaiveDate) -> NaiveDate {
        purchase_date
            .checked_add_days(Days::new(u64::from(self.validity_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPackage {
    pub name: String,
    pub total_sessions: u32,
    pub price: Decimal,
    pub validity_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientPackageStatus {
    Active,
    Expired,
    Depleted,
    Renewed,
}

impl ClientPackageStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Depleted => "depleted",
            Self::Renewed => "renewed",
        }
    }
}

impl fmt::Display for ClientPackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Manual correction applied by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAdjustment {
    pub delta: i32,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

/// One purchase or renewal cycle of a package for a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPackage {
    pub id: ClientPackageId,
    pub client_id: ClientId,
    pub package_id: PackageId,
    pub sessions_used: u32,
    pub sessions_remaining: u32,
    pub status: ClientPackageStatus,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renewed_from: Option<ClientPackageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_transaction_id: Option<TransactionId>,
    #[serde(default)]
    pub adjustments: Vec<SessionAdjustment>,
}

impl ClientPackage {
    /// Status as seen on `today`. Expiry is never stored; an active cycle
    /// past its expiry date reads as expired.
    pub fn effective_status(&self, today: NaiveDate) -> ClientPackageStatus {
        match self.status {
            ClientPackageStatus::Active if today > self.expiry_date => ClientPackageStatus::Expired,
            status => status,
        }
    }

    pub fn is_usable(&self, today: NaiveDate) -> bool {
        self.effective_status(today) == ClientPackageStatus::Active
            && self.sessions_remaining > 0
    }

    /// Copy of the row with its effective status applied, for read views.
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.status = self.effective_status(today);
        self
    }
}
