//! Facility scope resolution for list and search screens
//!
//! List screens do not ask "may I see this record?" one record at a time.
//! They ask for the set of facilities the actor may operate over and hand it
//! to the query layer as a filter. An empty scope filters everything out.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::account::AccountSummary;
use crate::actor::Actor;
use crate::facility::FacilityContext;
use crate::ids::{AccountId, FacilityId};

/// Facilities where the actor holds any operator, director or manager role.
///
/// Global roles do not widen this set; callers that need cross-facility
/// visibility check [`Actor::is_global_administrator`] and
/// [`Actor::is_billing_administrator`] themselves.
pub fn manageable_facility_ids(actor: &Actor) -> BTreeSet<FacilityId> {
    actor.facility_ids()
}

/// Records that belong to a facility.
pub trait FacilityScoped {
    /// The owning facility, `None` for unaffiliated records.
    fn facility_id(&self) -> Option<FacilityId>;
}

impl FacilityScoped for AccountSummary {
    fn facility_id(&self) -> Option<FacilityId> {
        self.facility_id
    }
}

/// A concrete set of facility identifiers used to filter list queries.
///
/// # Examples
///
/// ```
/// use facility_org::{Actor, FacilityScope, UserId};
///
/// let nobody = Actor::new(UserId::generate(), "Nobody");
/// let scope = FacilityScope::for_actor(&nobody);
/// assert!(scope.is_empty());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FacilityScope(BTreeSet<FacilityId>);

impl FacilityScope {
    /// The actor's manageable facilities.
    pub fn for_actor(actor: &Actor) -> Self {
        Self(manageable_facility_ids(actor))
    }

    /// A scope covering exactly one facility.
    pub fn single(facility_id: FacilityId) -> Self {
        Self(BTreeSet::from([facility_id]))
    }

    /// Check if the facility is in scope.
    pub fn contains(&self, facility_id: FacilityId) -> bool {
        self.0.contains(&facility_id)
    }

    /// Check if the scope covers no facility at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the facility identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &FacilityId> {
        self.0.iter()
    }

    /// Check if a record is visible. Unaffiliated records are never in scope.
    pub fn includes<T: FacilityScoped + ?Sized>(&self, record: &T) -> bool {
        record.facility_id().map(|id| self.contains(id)).unwrap_or(false)
    }

    /// Keep only records in scope.
    pub fn retain_visible<T: FacilityScoped>(&self, records: Vec<T>) -> Vec<T> {
        records.into_iter().filter(|r| self.includes(r)).collect()
    }

    /// Consume the scope, returning the identifier set.
    pub fn into_inner(self) -> BTreeSet<FacilityId> {
        self.0
    }
}

impl From<BTreeSet<FacilityId>> for FacilityScope {
    fn from(ids: BTreeSet<FacilityId>) -> Self {
        Self(ids)
    }
}

/// Filter for the facility account index.
///
/// A facility's account index lists accounts that have orders in that
/// facility. The cross-facility index lists accounts with orders anywhere that
/// are not owned by any single facility, and is only available to actors with
/// cross-facility visibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "facility_id")]
pub enum AccountListing {
    /// Matches no account
    Nothing,

    /// Accounts with at least one order in the facility
    WithOrdersFor(FacilityId),

    /// Unaffiliated accounts with orders in any facility
    CrossFacilityUnaffiliated,
}

impl AccountListing {
    /// Decide which accounts the actor may list in the given facility context.
    pub fn resolve(actor: &Actor, context: FacilityContext) -> Self {
        let cross_facility_visibility =
            actor.is_global_administrator() || actor.is_billing_administrator();

        match context {
            FacilityContext::CrossFacility if cross_facility_visibility => {
                AccountListing::CrossFacilityUnaffiliated
            }
            FacilityContext::CrossFacility => AccountListing::Nothing,
            FacilityContext::Single(id)
                if cross_facility_visibility || actor.facility_ids().contains(&id) =>
            {
                AccountListing::WithOrdersFor(id)
            }
            FacilityContext::Single(_) => AccountListing::Nothing,
        }
    }

    /// Evaluate the filter against an account and the facilities it has
    /// orders in.
    pub fn matches(&self, account: &AccountSummary, order_facility_ids: &BTreeSet<FacilityId>) -> bool {
        match self {
            AccountListing::Nothing => false,
            AccountListing::WithOrdersFor(id) => order_facility_ids.contains(id),
            AccountListing::CrossFacilityUnaffiliated => {
                account.facility_id.is_none() && !order_facility_ids.is_empty()
            }
        }
    }
}

/// Order detail lifecycle state, as far as billing is concerned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChargeState {
    /// Ordered, not yet started
    New,
    /// Work in progress
    InProcess,
    /// Work finished, charge owed
    Complete,
    /// Cancelled, nothing owed
    Canceled,
    /// Paid and reconciled
    Reconciled,
}

/// A priced order detail, pre-resolved by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderDetailCharge {
    /// Facility that fulfilled the order
    pub facility_id: FacilityId,

    /// Account the order is charged to
    pub account_id: AccountId,

    /// Current state
    pub state: ChargeState,

    /// Total in cents
    pub total_cents: i64,
}

impl FacilityScoped for OrderDetailCharge {
    fn facility_id(&self) -> Option<FacilityId> {
        Some(self.facility_id)
    }
}

/// Sum completed charges per account, restricted to facilities in scope.
/// Balances saturate at the `i64` bounds.
///
/// # Examples
///
/// ```
/// use facility_org::{accounts_receivable, AccountId, ChargeState, FacilityId, FacilityScope, OrderDetailCharge};
///
/// let facility = FacilityId::generate();
/// let account = AccountId::generate();
/// let charges = vec![
///     OrderDetailCharge { facility_id: facility, account_id: account, state: ChargeState::Complete, total_cents: 1250 },
///     OrderDetailCharge { facility_id: facility, account_id: account, state: ChargeState::New, total_cents: 999 },
/// ];
///
/// let balances = accounts_receivable(&FacilityScope::single(facility), &charges);
/// assert_eq!(balances[&account], 1250);
/// ```
pub fn accounts_receivable<'a>(
    scope: &FacilityScope,
    charges: impl IntoIterator<Item = &'a OrderDetailCharge>,
) -> BTreeMap<AccountId, i64> {
    let mut balances = BTreeMap::new();
    for charge in charges {
        if charge.state == ChargeState::Complete && scope.includes(charge) {
            let balance: &mut i64 = balances.entry(charge.account_id).or_insert(0);
            *balance = balance.saturating_add(charge.total_cents);
        }
    }
    balances
}
