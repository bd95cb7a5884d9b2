//! Billing account models
//!
//! Accounts are the billing entities orders are charged to. An account is
//! either owned by one facility or unaffiliated (usable at every facility).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, FacilityId};

/// Summary of a billing account.
///
/// # Examples
///
/// ```
/// use facility_org::AccountSummary;
///
/// let account = AccountSummary::new("12345-67890", "Lab supplies", "chart_string");
/// assert!(account.facility_id.is_none());
/// assert!(account.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    /// Unique identifier
    pub id: AccountId,

    /// Account number as printed on statements
    pub account_number: String,

    /// Free-form description
    pub description: String,

    /// Payment source type (e.g. "chart_string", "credit_card", "purchase_order")
    pub account_type: String,

    /// Owning facility; `None` for accounts usable across facilities
    pub facility_id: Option<FacilityId>,

    /// When the account stops accepting charges
    pub expires_at: Option<DateTime<Utc>>,

    /// When the account was suspended
    pub suspended_at: Option<DateTime<Utc>>,
}

impl AccountSummary {
    /// Creates a new unaffiliated account.
    pub fn new(
        account_number: impl Into<String>,
        description: impl Into<String>,
        account_type: impl Into<String>,
    ) -> Self {
        Self {
            id: AccountId::generate(),
            account_number: account_number.into(),
            description: description.into(),
            account_type: account_type.into(),
            facility_id: None,
            expires_at: None,
            suspended_at: None,
        }
    }

    /// Restrict the account to a single facility.
    pub fn for_facility(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(facility_id);
        self
    }

    /// Set the expiration time.
    pub fn with_expiration(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check if the account is suspended.
    pub fn is_suspended(&self) -> bool {
        self.suspended_at.is_some()
    }

    /// Check if the account is neither suspended nor expired.
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Check if the account is neither suspended nor expired at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_suspended() && self.expires_at.map(|at| at > now).unwrap_or(true)
    }

    /// Suspend the account.
    pub fn suspend(&mut self) {
        self.suspended_at = Some(Utc::now());
    }

    /// Lift a suspension.
    pub fn unsuspend(&mut self) {
        self.suspended_at = None;
    }
}
