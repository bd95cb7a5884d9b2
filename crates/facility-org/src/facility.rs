//! Facility domain models
//!
//! A facility is the organizational unit that partitions the system. Besides
//! real facilities there is one pseudo facility, the cross-facility view
//! ("all facilities"), used by billing screens that aggregate across units.

use serde::{Deserialize, Serialize};

use crate::ids::FacilityId;

/// URL name reserved for the cross-facility view.
pub const CROSS_FACILITY_URL_NAME: &str = "all";

/// A facility as seen by the authorization layer.
///
/// # Examples
///
/// ```
/// use facility_org::{Facility, FacilityContext};
///
/// let facility = Facility::new("Imaging Core", "imaging");
/// assert_eq!(facility.context(), FacilityContext::Single(facility.id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facility {
    /// Unique identifier
    pub id: FacilityId,

    /// Human-readable name
    pub name: String,

    /// URL-friendly name (unique)
    pub url_name: String,

    /// Whether the facility accepts new orders
    pub is_active: bool,
}

impl Facility {
    /// Creates a new active facility.
    pub fn new(name: impl Into<String>, url_name: impl Into<String>) -> Self {
        Self {
            id: FacilityId::generate(),
            name: name.into(),
            url_name: url_name.into(),
            is_active: true,
        }
    }

    /// The facility context this facility selects.
    pub fn context(&self) -> FacilityContext {
        FacilityContext::Single(self.id)
    }
}

/// Which facility a screen or list query is operating in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "kind", content = "facility_id")]
pub enum FacilityContext {
    /// A single, concrete facility
    Single(FacilityId),

    /// The cross-facility ("all facilities") view
    CrossFacility,
}

impl FacilityContext {
    /// Resolve a context from a URL name, given a lookup for real facilities.
    ///
    /// Returns `None` when the name is neither the cross-facility name nor a
    /// known facility.
    pub fn from_url_name<F>(url_name: &str, lookup: F) -> Option<Self>
    where
        F: FnOnce(&str) -> Option<FacilityId>,
    {
        if url_name == CROSS_FACILITY_URL_NAME {
            Some(FacilityContext::CrossFacility)
        } else {
            lookup(url_name).map(FacilityContext::Single)
        }
    }

    /// Check if this is the cross-facility view.
    pub fn is_cross_facility(&self) -> bool {
        matches!(self, FacilityContext::CrossFacility)
    }

    /// The concrete facility, if any.
    pub fn facility_id(&self) -> Option<FacilityId> {
        match self {
            FacilityContext::Single(id) => Some(*id),
            FacilityContext::CrossFacility => None,
        }
    }
}
