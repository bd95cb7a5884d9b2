//! # Facility RBAC
//!
//! This crate provides the rule model and decision engine for facility
//! authorization.
//!
//! ## Overview
//!
//! The facility-rbac crate handles:
//! - **Verbs**: operations that can be requested on resources
//! - **Resources**: resource classes, instances and relation paths
//! - **Rules**: allow/deny rules with optional scope predicates
//! - **Grant Sets**: ordered rule lists evaluated last-match-wins
//!
//! ## Architecture
//!
//! ```text
//! GrantRule = Polarity + VerbSet + RuleSubject [+ ScopePredicate]
//!
//! Examples:
//!   can    manage        order        where facility_id IN {..}
//!   can    manage        reservation  where order_detail.order.facility_id IN {..}
//!   cannot show_problems order
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use facility_rbac::{Decision, GrantRule, GrantSet, ResourceRef, ResourceType, Verb};
//!
//! let mut set = GrantSet::new();
//! set.push(GrantRule::can(Verb::Manage, ResourceType::Order));
//! set.push(GrantRule::cannot(Verb::ShowProblems, ResourceType::Order));
//!
//! let orders = ResourceRef::Class(ResourceType::Order);
//! assert_eq!(set.evaluate(Verb::Edit, &orders), Decision::Allow);
//! assert_eq!(set.evaluate(Verb::ShowProblems, &orders), Decision::Deny);
//! ```
//!
//! ## Verb Implications
//!
//! Some verbs imply others:
//! - `Manage` implies all verbs
//! - `Read` implies `Index` and `Show`
//! - `Create` implies `New`, `Update` implies `Edit`

pub mod grant_set;
pub mod resources;
pub mod rules;
pub mod verbs;

// Re-export main types for convenience
pub use grant_set::{Decision, GrantSet};
pub use resources::{Relation, RelationPath, ResourceInstance, ResourceRef, ResourceType};
pub use rules::{Condition, GrantRule, Polarity, RuleSubject, ScopePredicate, VerbSet};
pub use verbs::Verb;
