//! Actor snapshots and role classification
//!
//! An [`Actor`] is an immutable snapshot of a user's role memberships, built
//! by the surrounding application before an authorization check. All role
//! queries are answered from the snapshot alone; nothing here performs I/O.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ids::{AccountId, FacilityId, UserId};
use crate::membership::{AccountMembership, FacilityMembership};
use crate::roles::{FacilityRole, GlobalRole};

/// Immutable snapshot of the user requesting authorization.
///
/// Snapshots are assembled with the `with_*` builder methods (or
/// [`Actor::from_memberships`]) and are read-only afterwards, so one snapshot
/// can be shared across threads for every decision made in a request.
///
/// # Examples
///
/// ```
/// use facility_org::{Actor, FacilityId, FacilityRole, UserId};
///
/// let facility = FacilityId::generate();
/// let actor = Actor::new(UserId::generate(), "Ada Lovelace")
///     .with_facility_role(facility, FacilityRole::Operator);
///
/// assert!(actor.is_operator_of(facility));
/// assert!(!actor.is_manager_of(facility));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    /// User ID
    pub id: UserId,

    /// Display name
    pub full_name: String,

    /// System-wide roles
    #[serde(default)]
    global_roles: BTreeSet<GlobalRole>,

    /// Facility-scoped roles keyed by facility
    #[serde(default)]
    facility_roles: BTreeMap<FacilityId, BTreeSet<FacilityRole>>,

    /// Accounts the user administers (owner or business administrator)
    #[serde(default)]
    administered_accounts: BTreeSet<AccountId>,
}

impl Actor {
    /// Creates a snapshot with no roles.
    pub fn new(id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            global_roles: BTreeSet::new(),
            facility_roles: BTreeMap::new(),
            administered_accounts: BTreeSet::new(),
        }
    }

    /// Builds a snapshot from loaded membership records.
    ///
    /// Memberships belonging to other users and inactive account memberships
    /// are ignored; account memberships only contribute when they carry an
    /// administrator role.
    pub fn from_memberships<'a>(
        id: UserId,
        full_name: impl Into<String>,
        global_roles: impl IntoIterator<Item = GlobalRole>,
        facility_memberships: impl IntoIterator<Item = &'a FacilityMembership>,
        account_memberships: impl IntoIterator<Item = &'a AccountMembership>,
    ) -> Self {
        let mut actor = Self::new(id, full_name);
        actor.global_roles.extend(global_roles);

        for membership in facility_memberships {
            if membership.user_id == id {
                actor = actor.with_facility_role(membership.facility_id, membership.role);
            }
        }

        actor.administered_accounts.extend(
            account_memberships
                .into_iter()
                .filter(|m| m.user_id == id && m.is_administrator())
                .map(|m| m.account_id),
        );

        actor
    }

    /// Add a global role.
    pub fn with_global_role(mut self, role: GlobalRole) -> Self {
        self.global_roles.insert(role);
        self
    }

    /// Add a role within a facility.
    pub fn with_facility_role(mut self, facility_id: FacilityId, role: FacilityRole) -> Self {
        self.facility_roles.entry(facility_id).or_default().insert(role);
        self
    }

    /// Mark the user as administrator of an account.
    pub fn with_administered_account(mut self, account_id: AccountId) -> Self {
        self.administered_accounts.insert(account_id);
        self
    }

    // Role classification

    /// Check if the user is a global administrator.
    pub fn is_global_administrator(&self) -> bool {
        self.global_roles.contains(&GlobalRole::Administrator)
    }

    /// Check if the user is a billing administrator.
    pub fn is_billing_administrator(&self) -> bool {
        self.global_roles.contains(&GlobalRole::BillingAdministrator)
    }

    /// Check if the user holds `role` in the given facility.
    pub fn has_facility_role(&self, facility_id: FacilityId, role: FacilityRole) -> bool {
        self.facility_roles
            .get(&facility_id)
            .map(|roles| roles.contains(&role))
            .unwrap_or(false)
    }

    /// Check if the user is an operator (staff) of the facility.
    pub fn is_operator_of(&self, facility_id: FacilityId) -> bool {
        self.has_facility_role(facility_id, FacilityRole::Operator)
    }

    /// Check if the user is the director of the facility.
    pub fn is_facility_director_of(&self, facility_id: FacilityId) -> bool {
        self.has_facility_role(facility_id, FacilityRole::Director)
    }

    /// Check if the user is a manager of the facility.
    pub fn is_manager_of(&self, facility_id: FacilityId) -> bool {
        self.has_facility_role(facility_id, FacilityRole::Manager)
    }

    /// Check if the user administers the account.
    pub fn is_account_administrator_of(&self, account_id: AccountId) -> bool {
        self.administered_accounts.contains(&account_id)
    }

    /// Facilities where the user holds `role`.
    pub fn facility_ids_with_role(&self, role: FacilityRole) -> BTreeSet<FacilityId> {
        self.facility_roles
            .iter()
            .filter(|(_, roles)| roles.contains(&role))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Facilities where the user holds any facility role.
    pub fn facility_ids(&self) -> BTreeSet<FacilityId> {
        self.facility_roles
            .iter()
            .filter(|(_, roles)| !roles.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Accounts the user administers.
    pub fn administered_account_ids(&self) -> &BTreeSet<AccountId> {
        &self.administered_accounts
    }

    /// Global roles held by the user.
    pub fn global_roles(&self) -> &BTreeSet<GlobalRole> {
        &self.global_roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::AccountRole;

    #[test]
    fn test_actor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Actor>();
    }

    #[test]
    fn test_empty_actor_has_no_roles() {
        let actor = Actor::new(UserId::generate(), "Nobody");
        let facility = FacilityId::generate();

        assert!(!actor.is_global_administrator());
        assert!(!actor.is_billing_administrator());
        assert!(!actor.is_operator_of(facility));
        assert!(!actor.is_facility_director_of(facility));
        assert!(!actor.is_manager_of(facility));
        assert!(!actor.is_account_administrator_of(AccountId::generate()));
        assert!(actor.facility_ids().is_empty());
    }

    #[test]
    fn test_roles_do_not_imply_each_other() {
        let facility = FacilityId::generate();
        let actor = Actor::new(UserId::generate(), "Manager")
            .with_facility_role(facility, FacilityRole::Manager);

        assert!(actor.is_manager_of(facility));
        assert!(!actor.is_operator_of(facility));
        assert!(!actor.is_facility_director_of(facility));
    }

    #[test]
    fn test_roles_are_facility_scoped() {
        let mine = FacilityId::generate();
        let other = FacilityId::generate();
        let actor = Actor::new(UserId::generate(), "Staff")
            .with_facility_role(mine, FacilityRole::Operator);

        assert!(actor.is_operator_of(mine));
        assert!(!actor.is_operator_of(other));
        assert_eq!(actor.facility_ids_with_role(FacilityRole::Operator).len(), 1);
        assert!(actor.facility_ids_with_role(FacilityRole::Manager).is_empty());
    }

    #[test]
    fn test_from_memberships_filters_foreign_and_inactive_records() {
        let user = UserId::generate();
        let stranger = UserId::generate();
        let facility = FacilityId::generate();
        let owned = AccountId::generate();
        let removed = AccountId::generate();
        let purchased = AccountId::generate();

        let facility_memberships = vec![
            FacilityMembership::new(facility, user, FacilityRole::Director),
            FacilityMembership::new(FacilityId::generate(), stranger, FacilityRole::Manager),
        ];

        let mut removed_membership = AccountMembership::new(removed, user, AccountRole::Owner);
        removed_membership.remove();
        let account_memberships = vec![
            AccountMembership::new(owned, user, AccountRole::BusinessAdministrator),
            removed_membership,
            AccountMembership::new(purchased, user, AccountRole::Purchaser),
        ];

        let actor = Actor::from_memberships(
            user,
            "Director",
            [GlobalRole::BillingAdministrator],
            &facility_memberships,
            &account_memberships,
        );

        assert!(actor.is_billing_administrator());
        assert!(actor.is_facility_director_of(facility));
        assert_eq!(actor.facility_ids().len(), 1);
        assert!(actor.is_account_administrator_of(owned));
        assert!(!actor.is_account_administrator_of(removed));
        assert!(!actor.is_account_administrator_of(purchased));
    }
}
