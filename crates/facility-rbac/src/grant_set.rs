//! # Grant Sets
//!
//! An ordered list of grant rules and the decision engine that evaluates it.
//!
//! Evaluation is last-match-wins: every rule that applies to the query is
//! considered in append order and the polarity of the final one decides. A
//! `cannot` appended after a `can` therefore revokes it, and a later `can`
//! restores it again. When nothing applies the answer is [`Decision::Deny`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resources::ResourceRef;
use crate::rules::{GrantRule, Polarity};
use crate::verbs::Verb;

/// Outcome of an authorization query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The operation is permitted.
    Allow,
    /// The operation is not permitted.
    Deny,
}

impl Decision {
    /// Check if the decision permits the operation.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<Polarity> for Decision {
    fn from(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Allow => Decision::Allow,
            Polarity::Deny => Decision::Deny,
        }
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("allow"),
            Decision::Deny => f.write_str("deny"),
        }
    }
}

/// Ordered rules produced for one actor and one contextual resource.
///
/// # Example
///
/// ```
/// use facility_rbac::{Decision, GrantRule, GrantSet, ResourceRef, ResourceType, Verb};
///
/// let mut set = GrantSet::new();
/// set.push(GrantRule::can(Verb::Manage, ResourceType::Order));
/// set.push(GrantRule::cannot(Verb::ShowProblems, ResourceType::Order));
///
/// let orders = ResourceRef::Class(ResourceType::Order);
/// assert_eq!(set.evaluate(Verb::Update, &orders), Decision::Allow);
/// assert_eq!(set.evaluate(Verb::ShowProblems, &orders), Decision::Deny);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct GrantSet {
    rules: Vec<GrantRule>,
}

impl GrantSet {
    /// Create a new empty grant set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Later rules take precedence over earlier ones.
    pub fn push(&mut self, rule: GrantRule) {
        self.rules.push(rule);
    }

    /// Append several rules in order.
    pub fn extend<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = GrantRule>,
    {
        self.rules.extend(rules);
    }

    /// The rules in append order.
    pub fn rules(&self) -> &[GrantRule] {
        &self.rules
    }

    /// Get the count of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rule that decides a query, with its position, if any applies.
    pub fn deciding_rule(&self, verb: Verb, target: &ResourceRef) -> Option<(usize, &GrantRule)> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.applies_to(verb, target))
            .last()
    }

    /// Evaluate a query against the set.
    pub fn evaluate(&self, verb: Verb, target: &ResourceRef) -> Decision {
        self.deciding_rule(verb, target)
            .map(|(_, rule)| rule.polarity.into())
            .unwrap_or(Decision::Deny)
    }

    /// Shorthand for `evaluate(..).is_allowed()`.
    pub fn can(&self, verb: Verb, target: &ResourceRef) -> bool {
        self.evaluate(verb, target).is_allowed()
    }
}

impl FromIterator<GrantRule> for GrantSet {
    fn from_iter<T: IntoIterator<Item = GrantRule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
