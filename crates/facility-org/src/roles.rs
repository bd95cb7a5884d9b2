//! Role definitions
//!
//! This module defines the three role scopes an actor can hold: global roles,
//! facility-scoped roles and account-scoped roles.

use serde::{Deserialize, Serialize};

/// System-wide role held by an actor.
///
/// Global roles are not tied to a facility or account:
/// - **Administrator**: unrestricted access to everything
/// - **BillingAdministrator**: manages orders, journals and accounts across
///   every facility the actor can manage
///
/// # Examples
///
/// ```
/// use facility_org::GlobalRole;
///
/// assert_eq!(GlobalRole::parse("billing_administrator"), Some(GlobalRole::BillingAdministrator));
/// assert_eq!(GlobalRole::Administrator.as_str(), "administrator");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    /// Unrestricted access
    Administrator,

    /// Cross-facility billing access
    BillingAdministrator,
}

impl GlobalRole {
    /// Parse role from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "administrator" | "admin" => Some(Self::Administrator),
            "billing_administrator" | "billing_admin" => Some(Self::BillingAdministrator),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::BillingAdministrator => "billing_administrator",
        }
    }
}

/// Role held within a single facility.
///
/// Variants are declared in ascending privilege order, which is also the
/// order in which their grants are applied when building an ability:
/// Operator < Director < Manager
///
/// Roles do not imply one another. An actor that is both operator and
/// manager of a facility holds two memberships.
///
/// # Examples
///
/// ```
/// use facility_org::FacilityRole;
///
/// assert!(FacilityRole::Operator < FacilityRole::Manager);
/// assert_eq!(FacilityRole::parse("facility_director"), Some(FacilityRole::Director));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FacilityRole {
    /// Day-to-day staff: orders, reservations, products
    Operator = 1,

    /// Facility director: survey activation
    Director = 2,

    /// Facility manager: pricing, billing, accounts
    Manager = 3,
}

impl FacilityRole {
    /// All facility roles in ascending privilege order.
    pub fn all() -> &'static [FacilityRole] {
        &[
            FacilityRole::Operator,
            FacilityRole::Director,
            FacilityRole::Manager,
        ]
    }

    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Returns
    ///
    /// `Some(FacilityRole)` if valid, `None` otherwise
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "operator" | "staff" | "senior_staff" => Some(Self::Operator),
            "director" | "facility_director" => Some(Self::Director),
            "manager" | "facility_administrator" => Some(Self::Manager),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Director => "director",
            Self::Manager => "manager",
        }
    }

    /// Get a human-readable display name for the role.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Operator => "Facility Staff",
            Self::Director => "Facility Director",
            Self::Manager => "Facility Administrator",
        }
    }
}

/// Role held on a billing account.
///
/// Owners and business administrators administer the account; purchasers
/// may only place orders against it.
///
/// # Examples
///
/// ```
/// use facility_org::AccountRole;
///
/// assert!(AccountRole::Owner.is_administrator());
/// assert!(AccountRole::BusinessAdministrator.is_administrator());
/// assert!(!AccountRole::Purchaser.is_administrator());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Can place orders against the account
    Purchaser = 1,

    /// Administers the account on the owner's behalf
    BusinessAdministrator = 2,

    /// Account owner
    Owner = 3,
}

impl AccountRole {
    /// Check if this role administers the account.
    ///
    /// # Returns
    ///
    /// `true` for Owner and BusinessAdministrator
    pub fn is_administrator(&self) -> bool {
        *self >= AccountRole::BusinessAdministrator
    }

    /// Parse role from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(' ', "_").as_str() {
            "purchaser" => Some(Self::Purchaser),
            "business_administrator" | "business_admin" => Some(Self::BusinessAdministrator),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Get string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Purchaser => "purchaser",
            Self::BusinessAdministrator => "business_administrator",
            Self::Owner => "owner",
        }
    }
}

impl Default for AccountRole {
    fn default() -> Self {
        Self::Purchaser
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_role_ordering() {
        assert!(FacilityRole::Operator < FacilityRole::Director);
        assert!(FacilityRole::Director < FacilityRole::Manager);

        let mut roles = vec![FacilityRole::Manager, FacilityRole::Operator, FacilityRole::Director];
        roles.sort();
        assert_eq!(roles, FacilityRole::all());
    }

    #[test]
    fn test_facility_role_parsing() {
        assert_eq!(FacilityRole::parse("staff"), Some(FacilityRole::Operator));
        assert_eq!(FacilityRole::parse("Senior_Staff"), Some(FacilityRole::Operator));
        assert_eq!(FacilityRole::parse("FACILITY_ADMINISTRATOR"), Some(FacilityRole::Manager));
        assert_eq!(FacilityRole::parse("janitor"), None);
    }

    #[test]
    fn test_account_role_parsing() {
        assert_eq!(AccountRole::parse("Business Administrator"), Some(AccountRole::BusinessAdministrator));
        assert_eq!(AccountRole::parse("owner"), Some(AccountRole::Owner));
        assert_eq!(AccountRole::parse("viewer"), None);
        assert_eq!(AccountRole::default(), AccountRole::Purchaser);
    }

    #[test]
    fn test_global_role_round_trip() {
        for role in [GlobalRole::Administrator, GlobalRole::BillingAdministrator] {
            assert_eq!(GlobalRole::parse(role.as_str()), Some(role));
        }
    }
}
