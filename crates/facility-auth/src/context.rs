//! Calling-subsystem hints
//!
//! The same resource class can be governed differently depending on which
//! screen is asking. The caller states which one it is with a
//! [`ContextHint`] on every decision instead of the engine guessing.

use serde::{Deserialize, Serialize};

/// The subsystem requesting an authorization decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContextHint {
    /// The facility directory listing.
    FacilityListing,

    /// User management inside a facility.
    FacilityUserManagement,

    /// System-wide user management.
    GlobalUserManagement,

    /// Facility account screens.
    FacilityAccounts,

    /// The billing tab (journals, statements, transactions).
    Billing,

    /// The instrument kiosk view.
    Kiosk,

    /// The secure-room card reader API.
    SecureRoomsApi,

    /// Anything else.
    #[default]
    Other,
}

impl ContextHint {
    /// Get the string representation of the hint.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextHint::FacilityListing => "facility_listing",
            ContextHint::FacilityUserManagement => "facility_user_management",
            ContextHint::GlobalUserManagement => "global_user_management",
            ContextHint::FacilityAccounts => "facility_accounts",
            ContextHint::Billing => "billing",
            ContextHint::Kiosk => "kiosk",
            ContextHint::SecureRoomsApi => "secure_rooms_api",
            ContextHint::Other => "other",
        }
    }

    /// Parse a hint; unknown names map to [`ContextHint::Other`].
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "facility_listing" | "facilities" => ContextHint::FacilityListing,
            "facility_user_management" | "facility_users" => ContextHint::FacilityUserManagement,
            "global_user_management" | "users" => ContextHint::GlobalUserManagement,
            "facility_accounts" => ContextHint::FacilityAccounts,
            "billing" => ContextHint::Billing,
            "kiosk" | "kiosk_reservations" => ContextHint::Kiosk,
            "secure_rooms_api" | "scans" => ContextHint::SecureRoomsApi,
            _ => ContextHint::Other,
        }
    }

    /// Check if facility staff may manage users from this subsystem.
    pub fn allows_facility_user_management(&self) -> bool {
        matches!(self, ContextHint::FacilityUserManagement)
    }
}
