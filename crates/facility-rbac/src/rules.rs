//! # Grant Rules
//!
//! A grant rule allows or denies a set of verbs on a resource class, optionally
//! restricted by a scope predicate over the target instance's facility and
//! account links. Rules are plain data; evaluation order lives in
//! [`GrantSet`](crate::GrantSet).

use facility_org::{AccountId, FacilityId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::resources::{RelationPath, ResourceInstance, ResourceRef, ResourceType};
use crate::verbs::Verb;

/// Whether a matching rule grants or revokes access.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// `can`
    Allow,
    /// `cannot`
    Deny,
}

/// The verbs a rule applies to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerbSet {
    /// Every verb.
    All,
    /// Only the listed verbs (and what they imply).
    Only(BTreeSet<Verb>),
}

impl VerbSet {
    /// Check if the set grants `verb`, directly or through an implied verb.
    pub fn covers(&self, verb: Verb) -> bool {
        match self {
            VerbSet::All => true,
            VerbSet::Only(verbs) => verbs.iter().any(|v| v.covers(verb)),
        }
    }
}

impl From<Verb> for VerbSet {
    fn from(verb: Verb) -> Self {
        VerbSet::Only(BTreeSet::from([verb]))
    }
}

impl<const N: usize> From<[Verb; N]> for VerbSet {
    fn from(verbs: [Verb; N]) -> Self {
        VerbSet::Only(verbs.into_iter().collect())
    }
}

/// What a rule is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleSubject {
    /// Every resource, including sentinels.
    All,
    /// Every resource of one class.
    Class(ResourceType),
}

impl RuleSubject {
    /// Check if the subject covers a query target.
    ///
    /// Class subjects only cover class and instance targets of the same
    /// class; the `All` and `BillingTab` targets are only covered by `All`.
    pub fn matches(&self, target: &ResourceRef) -> bool {
        match self {
            RuleSubject::All => true,
            RuleSubject::Class(t) => target.resource_type() == Some(*t),
        }
    }
}

/// One condition on a target instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Condition {
    /// Some facility reached through `path` is in `facility_ids`.
    FacilityIn {
        /// Where to find the facility column
        path: RelationPath,
        /// Allowed facilities
        facility_ids: BTreeSet<FacilityId>,
    },

    /// The instance's own `facility_id` is unset.
    FacilityUnset,

    /// The instance's own `account_id` is in `account_ids`.
    AccountIn {
        /// Allowed accounts
        account_ids: BTreeSet<AccountId>,
    },
}

impl Condition {
    /// Evaluate the condition against an instance.
    ///
    /// Relation paths are existential: a journal whose rows span several
    /// facilities matches when any of those facilities is allowed.
    pub fn matches(&self, instance: &ResourceInstance) -> bool {
        match self {
            Condition::FacilityIn { path, facility_ids } => instance
                .facility_ids_at(path)
                .iter()
                .any(|id| facility_ids.contains(id)),
            Condition::FacilityUnset => instance.facility_id.is_none(),
            Condition::AccountIn { account_ids } => instance
                .account_id
                .map(|id| account_ids.contains(&id))
                .unwrap_or(false),
        }
    }
}

/// A conjunction of conditions restricting which instances a rule covers.
///
/// # Example
///
/// ```
/// use facility_org::FacilityId;
/// use facility_rbac::resources::{RelationPath, ResourceInstance, ResourceType};
/// use facility_rbac::rules::ScopePredicate;
/// use std::collections::BTreeSet;
/// use uuid::Uuid;
///
/// let facility = FacilityId::generate();
/// let scope = ScopePredicate::facility_in(RelationPath::own(), BTreeSet::from([facility]));
///
/// let order = ResourceInstance::new(ResourceType::Order, Uuid::now_v7()).in_facility(facility);
/// assert!(scope.matches(&order));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ScopePredicate(Vec<Condition>);

impl ScopePredicate {
    /// A predicate requiring every listed condition.
    pub fn all_of(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self(conditions.into_iter().collect())
    }

    /// `<path>.facility_id IN facility_ids`
    pub fn facility_in(path: RelationPath, facility_ids: BTreeSet<FacilityId>) -> Self {
        Self(vec![Condition::FacilityIn { path, facility_ids }])
    }

    /// `account_id IN account_ids`
    pub fn account_in(account_ids: BTreeSet<AccountId>) -> Self {
        Self(vec![Condition::AccountIn { account_ids }])
    }

    /// Evaluate every condition against an instance.
    pub fn matches(&self, instance: &ResourceInstance) -> bool {
        self.0.iter().all(|c| c.matches(instance))
    }

    /// The conditions of this predicate.
    pub fn conditions(&self) -> &[Condition] {
        &self.0
    }
}

/// A single allow or deny rule.
///
/// # Example
///
/// ```
/// use facility_rbac::{GrantRule, ResourceRef, ResourceType, Verb};
///
/// let rule = GrantRule::can(Verb::Manage, ResourceType::Order);
/// assert!(rule.applies_to(Verb::Update, &ResourceRef::Class(ResourceType::Order)));
/// assert!(!rule.applies_to(Verb::Update, &ResourceRef::Class(ResourceType::Journal)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GrantRule {
    /// Verbs covered by the rule
    pub verbs: VerbSet,

    /// Resource covered by the rule
    pub subject: RuleSubject,

    /// Instance restriction, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopePredicate>,

    /// Grant or revoke
    pub polarity: Polarity,
}

impl GrantRule {
    /// Allow every verb on every resource.
    pub fn can_everything() -> Self {
        Self {
            verbs: VerbSet::All,
            subject: RuleSubject::All,
            scope: None,
            polarity: Polarity::Allow,
        }
    }

    /// Allow `verbs` on `resource`.
    pub fn can(verbs: impl Into<VerbSet>, resource: ResourceType) -> Self {
        Self {
            verbs: verbs.into(),
            subject: RuleSubject::Class(resource),
            scope: None,
            polarity: Polarity::Allow,
        }
    }

    /// Deny `verbs` on `resource`.
    pub fn cannot(verbs: impl Into<VerbSet>, resource: ResourceType) -> Self {
        Self {
            polarity: Polarity::Deny,
            ..Self::can(verbs, resource)
        }
    }

    /// Restrict the rule to instances matching `scope`.
    pub fn scoped(mut self, scope: ScopePredicate) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Check if the rule applies to a query.
    ///
    /// Scope predicates are evaluated for instance targets only. A class
    /// target ("may I manage orders at all?") is covered by a scoped rule.
    pub fn applies_to(&self, verb: Verb, target: &ResourceRef) -> bool {
        if !self.verbs.covers(verb) || !self.subject.matches(target) {
            return false;
        }

        match (&self.scope, target) {
            (Some(scope), ResourceRef::Instance(instance)) => scope.matches(instance),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Relation;
    use uuid::Uuid;

    fn reservation_in(facility: FacilityId) -> ResourceInstance {
        ResourceInstance::new(ResourceType::Reservation, Uuid::now_v7())
            .with_related(RelationPath::new([Relation::OrderDetail, Relation::Order]), [facility])
    }

    #[test]
    fn test_verb_set_covers_implied_verbs() {
        let set = VerbSet::from([Verb::Read, Verb::Update]);
        assert!(set.covers(Verb::Show));
        assert!(set.covers(Verb::Edit));
        assert!(!set.covers(Verb::Destroy));
        assert!(VerbSet::All.covers(Verb::StartStop));
    }

    #[test]
    fn test_class_subject_does_not_cover_sentinels() {
        let subject = RuleSubject::Class(ResourceType::Order);
        assert!(!subject.matches(&ResourceRef::All));
        assert!(!subject.matches(&ResourceRef::BillingTab));
        assert!(RuleSubject::All.matches(&ResourceRef::BillingTab));
    }

    #[test]
    fn test_two_level_relation_scope() {
        let mine = FacilityId::generate();
        let theirs = FacilityId::generate();
        let rule = GrantRule::can(Verb::Manage, ResourceType::Reservation).scoped(
            ScopePredicate::facility_in(
                RelationPath::new([Relation::OrderDetail, Relation::Order]),
                BTreeSet::from([mine]),
            ),
        );

        assert!(rule.applies_to(Verb::Show, &reservation_in(mine).into()));
        assert!(!rule.applies_to(Verb::Show, &reservation_in(theirs).into()));
    }

    #[test]
    fn test_unresolved_path_does_not_match() {
        let facility = FacilityId::generate();
        let rule = GrantRule::can(Verb::Manage, ResourceType::Reservation).scoped(
            ScopePredicate::facility_in(
                RelationPath::new([Relation::OrderDetail, Relation::Order]),
                BTreeSet::from([facility]),
            ),
        );
        let bare = ResourceInstance::new(ResourceType::Reservation, Uuid::now_v7()).in_facility(facility);
        assert!(!rule.applies_to(Verb::Show, &bare.into()));
    }

    #[test]
    fn test_scoped_rule_covers_class_query() {
        let rule = GrantRule::can(Verb::Manage, ResourceType::Order)
            .scoped(ScopePredicate::facility_in(RelationPath::own(), BTreeSet::new()));
        assert!(rule.applies_to(Verb::Index, &ResourceRef::Class(ResourceType::Order)));

        let order = ResourceInstance::new(ResourceType::Order, Uuid::now_v7()).in_facility(FacilityId::generate());
        assert!(!rule.applies_to(Verb::Index, &order.into()));
    }

    #[test]
    fn test_conjunctive_conditions() {
        let facility = FacilityId::generate();
        let rows = RelationPath::new([Relation::JournalRows, Relation::OrderDetail, Relation::Order]);
        let scope = ScopePredicate::all_of([
            Condition::FacilityUnset,
            Condition::FacilityIn {
                path: rows.clone(),
                facility_ids: BTreeSet::from([facility]),
            },
        ]);

        let multi = ResourceInstance::new(ResourceType::Journal, Uuid::now_v7())
            .with_related(rows.clone(), [facility, FacilityId::generate()]);
        assert!(scope.matches(&multi));

        let single = multi.clone().in_facility(facility);
        assert!(!scope.matches(&single));
    }

    #[test]
    fn test_account_condition() {
        let account = AccountId::generate();
        let scope = ScopePredicate::account_in(BTreeSet::from([account]));
        let statement = ResourceInstance::new(ResourceType::Statement, Uuid::now_v7());

        assert!(!scope.matches(&statement));
        assert!(scope.matches(&statement.clone().for_account(account)));
        assert!(!scope.matches(&statement.for_account(AccountId::generate())));
    }

    #[test]
    fn test_cannot_keeps_verbs_and_subject() {
        let rule = GrantRule::cannot(Verb::ShowProblems, ResourceType::Order);
        assert_eq!(rule.polarity, Polarity::Deny);
        assert_eq!(rule.subject, RuleSubject::Class(ResourceType::Order));
        assert!(rule.applies_to(Verb::ShowProblems, &ResourceRef::Class(ResourceType::Order)));
        assert!(!rule.applies_to(Verb::Show, &ResourceRef::Class(ResourceType::Order)));
    }
}
