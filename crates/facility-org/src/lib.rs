//! # Facility Organization Model
//!
//! This crate provides the organizational model the facility authorization
//! engine reasons about: facilities, billing accounts, role memberships and
//! the immutable actor snapshot built from them.
//!
//! ## Overview
//!
//! The facility-org crate handles:
//! - **Identifiers**: `UserId`, `FacilityId`, `AccountId` newtypes
//! - **Roles**: global, facility-scoped and account-scoped roles
//! - **Memberships**: user-facility and user-account relationships
//! - **Actor**: the read-only snapshot answering role-classification queries
//! - **Scope**: facility sets and filters for list/search screens
//!
//! ## Architecture
//!
//! ```text
//! User
//!   ├─ GlobalRole (administrator, billing administrator)
//!   ├─ FacilityMembership ─→ Facility   (operator, director, manager)
//!   └─ AccountMembership  ─→ Account    (owner, business admin, purchaser)
//!
//! Actor snapshot = User + all of the above, frozen for one request
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use facility_org::{Actor, FacilityId, FacilityRole, FacilityScope, UserId};
//!
//! let imaging = FacilityId::generate();
//! let actor = Actor::new(UserId::generate(), "Grace Hopper")
//!     .with_facility_role(imaging, FacilityRole::Manager);
//!
//! assert!(actor.is_manager_of(imaging));
//! assert!(FacilityScope::for_actor(&actor).contains(imaging));
//! ```
//!
//! ## Integration
//!
//! This crate is designed to work with:
//! - `facility-rbac`: grant rules and the decision engine
//! - `facility-auth`: ability building from an actor snapshot

pub mod account;
pub mod actor;
pub mod facility;
pub mod ids;
pub mod membership;
pub mod roles;
pub mod scope;

// Re-export main types for convenience
pub use account::AccountSummary;
pub use actor::Actor;
pub use facility::{Facility, FacilityContext, CROSS_FACILITY_URL_NAME};
pub use ids::{AccountId, FacilityId, UserId};
pub use membership::{AccountMembership, FacilityMembership};
pub use roles::{AccountRole, FacilityRole, GlobalRole};
pub use scope::{
    accounts_receivable, manageable_facility_ids, AccountListing, ChargeState, FacilityScope,
    FacilityScoped, OrderDetailCharge,
};
