//! Membership domain models
//!
//! Memberships link a user to a facility or to a billing account with a role.
//! They are loaded by the surrounding application and folded into an
//! [`Actor`](crate::Actor) snapshot before any authorization decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AccountId, FacilityId, UserId};
use crate::roles::{AccountRole, FacilityRole};

/// Facility membership linking a user to a facility with a role.
///
/// # Examples
///
/// ```
/// use facility_org::{FacilityId, FacilityMembership, FacilityRole, UserId};
///
/// let membership = FacilityMembership::new(FacilityId::generate(), UserId::generate(), FacilityRole::Operator);
/// assert_eq!(membership.role, FacilityRole::Operator);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacilityMembership {
    /// Facility ID
    pub facility_id: FacilityId,

    /// User ID
    pub user_id: UserId,

    /// Role within the facility
    pub role: FacilityRole,

    /// When the role was granted
    pub granted_at: DateTime<Utc>,
}

impl FacilityMembership {
    /// Creates a new facility membership granted now.
    pub fn new(facility_id: FacilityId, user_id: UserId, role: FacilityRole) -> Self {
        Self {
            facility_id,
            user_id,
            role,
            granted_at: Utc::now(),
        }
    }
}

/// Account membership linking a user to a billing account.
///
/// Removed memberships are soft-deleted: `deleted_at` is set and the
/// membership no longer confers any role.
///
/// # Examples
///
/// ```
/// use facility_org::{AccountId, AccountMembership, AccountRole, UserId};
///
/// let mut membership = AccountMembership::new(AccountId::generate(), UserId::generate(), AccountRole::Owner);
/// assert!(membership.is_active());
///
/// membership.remove();
/// assert!(!membership.is_active());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountMembership {
    /// Account ID
    pub account_id: AccountId,

    /// User ID
    pub user_id: UserId,

    /// Role on the account
    pub role: AccountRole,

    /// When the user was added to the account
    pub created_at: DateTime<Utc>,

    /// When the user was removed from the account
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AccountMembership {
    /// Creates a new active account membership.
    pub fn new(account_id: AccountId, user_id: UserId, role: AccountRole) -> Self {
        Self {
            account_id,
            user_id,
            role,
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    /// Check if the membership is still in effect.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Check if this membership makes the user an account administrator.
    pub fn is_administrator(&self) -> bool {
        self.is_active() && self.role.is_administrator()
    }

    /// Soft-delete the membership.
    pub fn remove(&mut self) {
        self.deleted_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removed_owner_is_not_administrator() {
        let mut membership =
            AccountMembership::new(AccountId::generate(), UserId::generate(), AccountRole::Owner);
        assert!(membership.is_administrator());

        membership.remove();
        assert!(!membership.is_administrator());
        assert!(membership.deleted_at.is_some());
    }

    #[test]
    fn test_purchaser_is_not_administrator() {
        let membership =
            AccountMembership::new(AccountId::generate(), UserId::generate(), AccountRole::Purchaser);
        assert!(membership.is_active());
        assert!(!membership.is_administrator());
    }
}
