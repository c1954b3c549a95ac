//! Identifier types used throughout cardstash.
//!
//! Owner and entity ids come from external systems (chat user ids, game
//! character ids) and double as path components in the cache layout, so
//! they are validated on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn validate(raw: &str) -> crate::Result<()> {
    let invalid = raw.is_empty()
        || raw.trim() != raw
        || raw.contains(['/', '\\', '\0'])
        || raw == "."
        || raw.contains("..");
    if invalid {
        return Err(crate::Error::InvalidId(raw.to_string()));
    }
    Ok(())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses an identifier, rejecting values that are not path-safe.
            pub fn parse(s: impl Into<String>) -> crate::Result<Self> {
                let s = s.into();
                validate(&s)?;
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = crate::Error;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identity that scopes one cache directory and one set of snapshot
    /// bindings (e.g. a chat user id).
    OwnerId
}

string_id! {
    /// Identifier of a tracked entity (e.g. a character id).
    EntityId
}
