//! Ability building and authorization decisions
//!
//! An [`Ability`] is the grant set for one actor, one contextual resource and
//! one calling subsystem. It is built fresh for every check; role membership
//! can change between requests, so nothing is cached.
//!
//! Rules are appended in a fixed order:
//!
//! 1. global administrators get everything and nothing else is added
//! 2. facility listing, for actors with any facility role
//! 3. billing grants, on the billing tab or for billing administrators
//! 4. facility grants per role in ascending privilege order
//!    (operator, director, manager), or account-administrator grants
//!
//! The order matters: the operator `cannot show_problems` rule is revoked
//! again by the manager `can show_problems` rule appended after it.

use facility_org::{manageable_facility_ids, AccountId, Actor, FacilityId, FacilityRole};
use facility_rbac::{
    Condition, Decision, GrantRule, GrantSet, Relation, RelationPath, ResourceRef, ResourceType,
    ScopePredicate, Verb,
};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

use crate::context::ContextHint;
use crate::error::{AuthError, AuthResult};

/// Resources facility operators fully manage.
const OPERATOR_MANAGED: &[ResourceType] = &[
    ResourceType::AccountPriceGroupMember,
    ResourceType::Service,
    ResourceType::BundleProduct,
    ResourceType::Bundle,
    ResourceType::OrderDetail,
    ResourceType::Order,
    ResourceType::Reservation,
    ResourceType::Instrument,
    ResourceType::Item,
    ResourceType::ProductUser,
    ResourceType::Product,
    ResourceType::ProductAccessory,
    ResourceType::UserPriceGroupMember,
];

/// Resources facility operators may only browse.
const OPERATOR_INDEXED: &[ResourceType] = &[
    ResourceType::InstrumentPricePolicy,
    ResourceType::ItemPricePolicy,
    ResourceType::ScheduleRule,
    ResourceType::ServicePricePolicy,
];

/// Resources facility managers fully manage.
const MANAGER_MANAGED: &[ResourceType] = &[
    ResourceType::AccountUser,
    ResourceType::Account,
    ResourceType::FacilityAccount,
    ResourceType::Journal,
    ResourceType::Statement,
    ResourceType::FileUpload,
    ResourceType::InstrumentPricePolicy,
    ResourceType::ItemPricePolicy,
    ResourceType::OrderStatus,
    ResourceType::PriceGroup,
    ResourceType::Reports,
    ResourceType::ScheduleRule,
    ResourceType::ServicePricePolicy,
    ResourceType::PriceGroupProduct,
    ResourceType::ProductAccessGroup,
];

/// Statement verbs granted to account administrators.
const ACCOUNT_ADMINISTRATOR_STATEMENT_VERBS: [Verb; 8] = [
    Verb::Show,
    Verb::Suspend,
    Verb::Unsuspend,
    Verb::UserSearch,
    Verb::UserAccounts,
    Verb::Statements,
    Verb::ShowStatement,
    Verb::Index,
];

/// The grant set of one actor in one context, ready to answer queries.
///
/// # Examples
///
/// ```
/// use facility_auth::{Ability, ContextHint};
/// use facility_org::{Actor, FacilityId, FacilityRole, UserId};
/// use facility_rbac::{ResourceRef, ResourceType, Verb};
///
/// let facility = FacilityId::generate();
/// let actor = Actor::new(UserId::generate(), "Staff")
///     .with_facility_role(facility, FacilityRole::Operator);
///
/// let ability = Ability::new(&actor, Some(&ResourceRef::facility(facility)), ContextHint::Other);
/// assert!(ability.can(Verb::Update, &ResourceRef::Class(ResourceType::Reservation)));
/// assert!(!ability.can(Verb::ShowProblems, &ResourceRef::Class(ResourceType::Order)));
/// ```
#[derive(Debug, Clone)]
pub struct Ability {
    grants: GrantSet,
}

impl Ability {
    /// Build the ability for an actor around an optional contextual resource.
    pub fn new(actor: &Actor, resource: Option<&ResourceRef>, hint: ContextHint) -> Self {
        Self {
            grants: build_grant_set(actor, resource, hint),
        }
    }

    /// The underlying grant set.
    pub fn grants(&self) -> &GrantSet {
        &self.grants
    }

    /// Evaluate a query.
    pub fn evaluate(&self, verb: Verb, target: &ResourceRef) -> Decision {
        self.grants.evaluate(verb, target)
    }

    /// Check if the query is allowed.
    pub fn can(&self, verb: Verb, target: &ResourceRef) -> bool {
        self.evaluate(verb, target).is_allowed()
    }

    /// Check if the query is denied.
    pub fn cannot(&self, verb: Verb, target: &ResourceRef) -> bool {
        !self.can(verb, target)
    }

    /// Class-level check by name. Unknown verbs or resource names are denied.
    pub fn can_str(&self, verb: &str, resource: &str) -> bool {
        match (Verb::parse(verb), ResourceType::parse(resource)) {
            (Some(verb), Some(resource)) => self.can(verb, &ResourceRef::Class(resource)),
            _ => false,
        }
    }

    /// Escalate a denial into [`AuthError::Forbidden`].
    pub fn authorize(&self, verb: Verb, target: &ResourceRef) -> AuthResult<()> {
        if self.can(verb, target) {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                verb: verb.to_string(),
                resource: target.to_string(),
            })
        }
    }
}

/// Decide a single query.
///
/// `resource` is the contextual resource the screen is about (a facility, an
/// account or the billing tab); `target` is what the verb is applied to.
#[instrument(
    level = "debug",
    skip_all,
    fields(actor_id = %actor.id, verb = %verb, target = %target, hint = hint.as_str())
)]
pub fn decide(
    actor: &Actor,
    verb: Verb,
    target: &ResourceRef,
    resource: Option<&ResourceRef>,
    hint: ContextHint,
) -> Decision {
    let decision = Ability::new(actor, resource, hint).evaluate(verb, target);
    debug!(decision = %decision, "authorization decided");
    decision
}

/// Facility ids the actor may operate over in list and search screens.
pub fn scope_facilities(actor: &Actor) -> BTreeSet<FacilityId> {
    manageable_facility_ids(actor)
}

/// Build the ordered grant set for an actor.
pub fn build_grant_set(actor: &Actor, resource: Option<&ResourceRef>, hint: ContextHint) -> GrantSet {
    let mut grants = GrantSet::new();

    if actor.is_global_administrator() {
        grants.push(GrantRule::can_everything());
        return grants;
    }

    let manageable = manageable_facility_ids(actor);

    if !manageable.is_empty() && hint == ContextHint::FacilityListing {
        grants.push(GrantRule::can(Verb::List, ResourceType::Facility));
    }

    let Some(resource) = resource else {
        debug!(actor_id = %actor.id, rules = grants.len(), "no contextual resource");
        return grants;
    };

    if resource.is_billing_tab() || actor.is_billing_administrator() {
        push_billing_grants(&mut grants, &manageable);
    }

    if let Some(instance) = resource.instance() {
        if let Some(facility_id) = instance.as_facility() {
            push_facility_grants(&mut grants, actor, facility_id, hint);
        } else if let Some(account_id) = instance.as_account() {
            push_account_grants(&mut grants, actor, account_id);
        }
    }

    debug!(actor_id = %actor.id, rules = grants.len(), "grant set built");
    grants
}

fn push_billing_grants(grants: &mut GrantSet, manageable: &BTreeSet<FacilityId>) {
    let facility_in = |hops: &[Relation]| {
        ScopePredicate::facility_in(RelationPath::new(hops.iter().copied()), manageable.clone())
    };

    grants.push(GrantRule::can(Verb::Manage, ResourceType::Order).scoped(facility_in(&[])));
    grants.push(
        GrantRule::can(Verb::Manage, ResourceType::OrderDetail).scoped(facility_in(&[Relation::Order])),
    );
    grants.push(
        GrantRule::can(Verb::Manage, ResourceType::Reservation)
            .scoped(facility_in(&[Relation::OrderDetail, Relation::Order])),
    );
    grants.push(GrantRule::can(Verb::Manage, ResourceType::Journal).scoped(facility_in(&[])));

    // multi-facility journals have no facility of their own
    grants.push(
        GrantRule::can(Verb::Manage, ResourceType::Journal).scoped(ScopePredicate::all_of([
            Condition::FacilityUnset,
            Condition::FacilityIn {
                path: RelationPath::new([Relation::JournalRows, Relation::OrderDetail, Relation::Order]),
                facility_ids: manageable.clone(),
            },
        ])),
    );

    grants.push(GrantRule::can(Verb::Manage, ResourceType::Account));
}

fn push_facility_grants(grants: &mut GrantSet, actor: &Actor, facility_id: FacilityId, hint: ContextHint) {
    let this_facility = || ScopePredicate::facility_in(RelationPath::own(), BTreeSet::from([facility_id]));

    grants.push(GrantRule::can(Verb::Complete, ResourceType::Surveyor));

    for role in FacilityRole::all() {
        if !actor.has_facility_role(facility_id, *role) {
            continue;
        }

        match role {
            FacilityRole::Operator => {
                grants.extend(manage_each(OPERATOR_MANAGED));
                if hint.allows_facility_user_management() {
                    grants.push(GrantRule::can(Verb::Manage, ResourceType::User));
                }
                grants.push(GrantRule::cannot(Verb::ShowProblems, ResourceType::Order));
                grants.push(
                    GrantRule::can([Verb::Schedule, Verb::Agenda, Verb::List], ResourceType::Facility)
                        .scoped(this_facility()),
                );
                grants.extend(
                    OPERATOR_INDEXED
                        .iter()
                        .map(|resource| GrantRule::can(Verb::Index, *resource)),
                );
            }
            FacilityRole::Director => {
                grants.push(GrantRule::can(
                    [Verb::Activate, Verb::Deactivate],
                    ResourceType::Surveyor,
                ));
            }
            FacilityRole::Manager => {
                grants.extend(manage_each(MANAGER_MANAGED));
                if hint.allows_facility_user_management() {
                    grants.push(GrantRule::can(Verb::Manage, ResourceType::User));
                }
                grants.push(
                    GrantRule::can([Verb::Update, Verb::Manage], ResourceType::Facility)
                        .scoped(this_facility()),
                );
                grants.push(GrantRule::can(Verb::ShowProblems, ResourceType::Order));
            }
        }
    }
}

fn push_account_grants(grants: &mut GrantSet, actor: &Actor, account_id: AccountId) {
    if !actor.is_account_administrator_of(account_id) {
        return;
    }

    let this_account = || ScopePredicate::account_in(BTreeSet::from([account_id]));

    grants.push(GrantRule::can(Verb::Manage, ResourceType::Account).scoped(this_account()));
    grants.push(GrantRule::can(Verb::Manage, ResourceType::AccountUser).scoped(this_account()));
    grants.push(
        GrantRule::can(ACCOUNT_ADMINISTRATOR_STATEMENT_VERBS, ResourceType::Statement)
            .scoped(this_account()),
    );
}

fn manage_each(resources: &'static [ResourceType]) -> impl Iterator<Item = GrantRule> {
    resources
        .iter()
        .map(|resource| GrantRule::can(Verb::Manage, *resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use facility_org::{GlobalRole, UserId};
    use facility_rbac::{Polarity, ResourceInstance};
    use uuid::Uuid;

    fn actor() -> Actor {
        Actor::new(UserId::generate(), "Test User")
    }

    fn class(resource: ResourceType) -> ResourceRef {
        ResourceRef::Class(resource)
    }

    fn order_in(facility: FacilityId) -> ResourceRef {
        ResourceInstance::new(ResourceType::Order, Uuid::now_v7())
            .in_facility(facility)
            .into()
    }

    #[test]
    fn test_global_administrator_gets_single_wildcard_rule() {
        let admin = actor().with_global_role(GlobalRole::Administrator);
        let grants = build_grant_set(&admin, None, ContextHint::Other);
        assert_eq!(grants.rules(), &[GrantRule::can_everything()]);
    }

    #[test]
    fn test_no_resource_yields_no_rules_outside_facility_listing() {
        let facility = FacilityId::generate();
        let staff = actor().with_facility_role(facility, FacilityRole::Operator);

        assert!(build_grant_set(&staff, None, ContextHint::Other).is_empty());

        let listing = build_grant_set(&staff, None, ContextHint::FacilityListing);
        assert_eq!(listing.rules(), &[GrantRule::can(Verb::List, ResourceType::Facility)]);
    }

    #[test]
    fn test_facility_listing_requires_a_facility_role() {
        let grants = build_grant_set(&actor(), None, ContextHint::FacilityListing);
        assert!(grants.is_empty());
    }

    #[test]
    fn test_any_facility_holder_may_complete_surveys() {
        let ability = Ability::new(
            &actor(),
            Some(&ResourceRef::facility(FacilityId::generate())),
            ContextHint::Other,
        );
        assert!(ability.can(Verb::Complete, &class(ResourceType::Surveyor)));
        assert!(ability.cannot(Verb::Activate, &class(ResourceType::Surveyor)));
        assert_eq!(ability.grants().len(), 1);
    }

    #[test]
    fn test_director_activates_surveys() {
        let facility = FacilityId::generate();
        let director = actor().with_facility_role(facility, FacilityRole::Director);
        let ability = Ability::new(&director, Some(&ResourceRef::facility(facility)), ContextHint::Other);

        assert!(ability.can(Verb::Activate, &class(ResourceType::Surveyor)));
        assert!(ability.can(Verb::Deactivate, &class(ResourceType::Surveyor)));
        assert!(ability.cannot(Verb::Manage, &class(ResourceType::Order)));
    }

    #[test]
    fn test_operator_grants() {
        let facility = FacilityId::generate();
        let staff = actor().with_facility_role(facility, FacilityRole::Operator);
        let ability = Ability::new(&staff, Some(&ResourceRef::facility(facility)), ContextHint::Other);

        for resource in OPERATOR_MANAGED {
            assert!(ability.can(Verb::Manage, &class(*resource)), "operator should manage {}", resource);
        }
        for resource in OPERATOR_INDEXED {
            assert!(ability.can(Verb::Index, &class(*resource)));
            assert!(ability.cannot(Verb::Update, &class(*resource)));
        }
        assert!(ability.can(Verb::Schedule, &class(ResourceType::Facility)));
        assert!(ability.can(Verb::Agenda, &class(ResourceType::Facility)));
        assert!(ability.cannot(Verb::Update, &class(ResourceType::Facility)));
        assert!(ability.cannot(Verb::ShowProblems, &class(ResourceType::Order)));
        assert!(ability.cannot(Verb::Manage, &class(ResourceType::Journal)));
    }

    #[test]
    fn test_manager_grants_come_after_operator_grants() {
        let facility = FacilityId::generate();
        let both = actor()
            .with_facility_role(facility, FacilityRole::Manager)
            .with_facility_role(facility, FacilityRole::Operator);
        let grants = build_grant_set(&both, Some(&ResourceRef::facility(facility)), ContextHint::Other);

        let deny = grants
            .rules()
            .iter()
            .position(|r| r.polarity == Polarity::Deny)
            .unwrap();
        let restore = grants
            .rules()
            .iter()
            .rposition(|r| r == &GrantRule::can(Verb::ShowProblems, ResourceType::Order))
            .unwrap();
        assert!(deny < restore);
        assert!(grants.can(Verb::ShowProblems, &class(ResourceType::Order)));
    }

    #[test]
    fn test_billing_tab_scopes_orders_to_manageable_facilities() {
        let mine = FacilityId::generate();
        let theirs = FacilityId::generate();
        let manager = actor().with_facility_role(mine, FacilityRole::Manager);
        let ability = Ability::new(&manager, Some(&ResourceRef::BillingTab), ContextHint::Billing);

        assert!(ability.can(Verb::Update, &order_in(mine)));
        assert!(ability.cannot(Verb::Update, &order_in(theirs)));
        assert!(ability.can(Verb::Manage, &class(ResourceType::Account)));
    }

    #[test]
    fn test_billing_administrator_without_facilities_sees_no_orders() {
        let billing = actor().with_global_role(GlobalRole::BillingAdministrator);
        let ability = Ability::new(&billing, Some(&ResourceRef::BillingTab), ContextHint::Billing);

        assert!(ability.cannot(Verb::Show, &order_in(FacilityId::generate())));
        assert!(ability.can(Verb::Manage, &ResourceRef::account(AccountId::generate(), None)));
    }

    #[test]
    fn test_multi_facility_journal_matches_any_row() {
        let mine = FacilityId::generate();
        let billing = actor()
            .with_global_role(GlobalRole::BillingAdministrator)
            .with_facility_role(mine, FacilityRole::Manager);
        let ability = Ability::new(&billing, Some(&ResourceRef::BillingTab), ContextHint::Billing);
        let rows = RelationPath::new([Relation::JournalRows, Relation::OrderDetail, Relation::Order]);

        let shared: ResourceRef = ResourceInstance::new(ResourceType::Journal, Uuid::now_v7())
            .with_related(rows.clone(), [FacilityId::generate(), mine])
            .into();
        assert!(ability.can(Verb::Update, &shared));

        let foreign: ResourceRef = ResourceInstance::new(ResourceType::Journal, Uuid::now_v7())
            .with_related(rows, [FacilityId::generate()])
            .into();
        assert!(ability.cannot(Verb::Update, &foreign));
    }

    #[test]
    fn test_account_administrator_statement_verbs() {
        let account = AccountId::generate();
        let owner = actor().with_administered_account(account);
        let ability = Ability::new(&owner, Some(&ResourceRef::account(account, None)), ContextHint::Other);

        for verb in ACCOUNT_ADMINISTRATOR_STATEMENT_VERBS {
            assert!(ability.can(verb, &class(ResourceType::Statement)));
        }
        assert!(ability.cannot(Verb::Create, &class(ResourceType::Statement)));
        assert!(ability.cannot(Verb::Destroy, &class(ResourceType::Statement)));
        assert!(ability.can(Verb::Manage, &class(ResourceType::AccountUser)));
    }

    #[test]
    fn test_can_str_denies_unknown_names() {
        let facility = FacilityId::generate();
        let staff = actor().with_facility_role(facility, FacilityRole::Operator);
        let ability = Ability::new(&staff, Some(&ResourceRef::facility(facility)), ContextHint::Other);

        assert!(ability.can_str("manage", "Order"));
        assert!(ability.can_str("index", "schedule_rules"));
        assert!(!ability.can_str("teleport", "Order"));
        assert!(!ability.can_str("manage", "Spaceship"));
    }

    #[test]
    fn test_authorize_escalates_denial() {
        let ability = Ability::new(&actor(), None, ContextHint::Other);
        let err = ability
            .authorize(Verb::Show, &class(ResourceType::Order))
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden { .. }));
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_scope_facilities_matches_role_union() {
        let (a, b) = (FacilityId::generate(), FacilityId::generate());
        let staff = actor()
            .with_facility_role(a, FacilityRole::Operator)
            .with_facility_role(b, FacilityRole::Director);
        assert_eq!(scope_facilities(&staff), BTreeSet::from([a, b]));
        assert!(scope_facilities(&actor()).is_empty());
    }

    #[test]
    fn test_context_grants_are_confined_to_the_context_resource() {
        let (a, b) = (AccountId::generate(), AccountId::generate());
        let owner = actor().with_administered_account(a).with_administered_account(b);
        let ability = Ability::new(&owner, Some(&ResourceRef::account(a, None)), ContextHint::Other);
        let statement = |account| -> ResourceRef {
            ResourceInstance::new(ResourceType::Statement, Uuid::now_v7())
                .for_account(account)
                .into()
        };

        assert!(ability.can(Verb::Manage, &ResourceRef::account(a, None)));
        assert!(ability.cannot(Verb::Manage, &ResourceRef::account(b, None)));
        assert!(ability.can(Verb::ShowStatement, &statement(a)));
        assert!(ability.cannot(Verb::ShowStatement, &statement(b)));

        let (f, g) = (FacilityId::generate(), FacilityId::generate());
        let manager = actor()
            .with_facility_role(f, FacilityRole::Operator)
            .with_facility_role(f, FacilityRole::Manager)
            .with_facility_role(g, FacilityRole::Manager);
        let ability = Ability::new(&manager, Some(&ResourceRef::facility(f)), ContextHint::Other);

        assert!(ability.can(Verb::Update, &ResourceRef::facility(f)));
        assert!(ability.cannot(Verb::Update, &ResourceRef::facility(g)));
        assert!(ability.cannot(Verb::Schedule, &ResourceRef::facility(g)));
        assert!(ability.can(Verb::Update, &class(ResourceType::Facility)));
    }

    #[test]
    fn test_ability_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ability>();
    }
}
