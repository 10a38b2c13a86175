//! Typed record identifiers.
//!
//! All records use integer primary keys assigned by the database. The
//! newtypes keep a job id from being passed where a user id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Get the raw database key.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

record_id!(
    /// Identifier of a user account.
    UserId
);
record_id!(
    /// Identifier of a job posting.
    JobId
);
record_id!(
    /// Identifier of an application.
    ApplicationId
);
record_id!(
    /// Identifier of a profile row.
    ProfileId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_plain_integers() {
        assert_eq!(serde_json::to_string(&JobId(42)).unwrap(), "42");
        let id: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(id, UserId(7));
    }

    #[test]
    fn test_id_from_str() {
        assert_eq!(" 12 ".parse::<ApplicationId>().unwrap(), ApplicationId(12));
        assert!("abc".parse::<ApplicationId>().is_err());
    }
}
