//! # Facility Authorization
//!
//! This crate answers "may this actor perform this verb on this resource?"
//! for the core-facility platform.
//!
//! ## Overview
//!
//! The facility-auth crate handles:
//! - **Abilities**: building the ordered grant set for an actor and deciding queries
//! - **Context hints**: which subsystem is asking, threaded through every decision
//! - **Secure rooms**: card-reader scan handling and account disambiguation
//! - **Configuration**: device credentials and tablet settings from the environment
//!
//! ## Usage
//!
//! ```rust
//! use facility_auth::{decide, ContextHint};
//! use facility_org::{Actor, FacilityId, FacilityRole, UserId};
//! use facility_rbac::{Decision, ResourceRef, ResourceType, Verb};
//!
//! let facility = FacilityId::generate();
//! let manager = Actor::new(UserId::generate(), "Facility Manager")
//!     .with_facility_role(facility, FacilityRole::Operator)
//!     .with_facility_role(facility, FacilityRole::Manager);
//!
//! let decision = decide(
//!     &manager,
//!     Verb::ShowProblems,
//!     &ResourceRef::Class(ResourceType::Order),
//!     Some(&ResourceRef::facility(facility)),
//!     ContextHint::Other,
//! );
//! assert_eq!(decision, Decision::Allow);
//! ```
//!
//! ## Cross-Crate Integration
//!
//! This crate builds on:
//! - `facility-org`: actors, roles, facilities and accounts
//! - `facility-rbac`: verbs, resources, rules and grant-set evaluation

pub mod ability;
pub mod config;
pub mod context;
pub mod error;
pub mod secure_rooms;

// Re-export main types
pub use ability::{build_grant_set, decide, scope_facilities, Ability};
pub use config::{AuthzConfig, ConfigError, SecureRoomsApiConfig, DEFAULT_TABLET_IDENTIFIER};
pub use context::ContextHint;
pub use error::{AuthError, AuthResult};
pub use secure_rooms::{
    resolve_accounts_for_actor, AccountPresenter, CardReader, ScanDirectory, ScanOutcome,
    ScanReply, ScanRequest, ScanResponse, ScanService, NO_ACCOUNTS_REASON,
};
