use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifiers are authored strings (`earth_initiate_stonecunning`),
/// so the newtype wraps a `String` rather than a generated UUID.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(AbilityId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn set_lookup_by_str() {
        let mut set = BTreeSet::new();
        set.insert(AbilityId::new("fire_initiate_kindle"));
        assert!(set.contains("fire_initiate_kindle"));
        assert!(!set.contains("fire_adept_blaze"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AbilityId::from("water_cantrip_shape_water");
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, "\"water_cantrip_shape_water\"");
    }
}
