//! Identifier newtypes
//!
//! Type-safe wrappers around UUIDs so that a facility id can never be passed
//! where an account id is expected. All id types serialize transparently as
//! UUID strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new ID from a UUID.
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a new time-ordered ID.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }

            /// Get the inner UUID value.
            pub fn into_inner(self) -> Uuid {
                self.0
            }

            /// Get a reference to the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id_type!(UserId, "Unique identifier for a user (an actor).");
define_id_type!(FacilityId, "Unique identifier for a facility.");
define_id_type!(AccountId, "Unique identifier for a billing account.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trips_through_uuid() {
        let raw = Uuid::now_v7();
        let id = FacilityId::new(raw);
        assert_eq!(id.into_inner(), raw);
        assert_eq!(Uuid::from(id), raw);
        assert_eq!(id.to_string(), raw.to_string());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let raw = Uuid::now_v7();
        let json = serde_json::to_string(&AccountId::new(raw)).unwrap();
        assert_eq!(json, format!("\"{}\"", raw));
    }
}
