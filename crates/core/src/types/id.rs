//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `u32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_u32()`, `checked_next()`
/// - `Display`, `FromStr`, `From<u32>` and `Into<u32>` implementations
///
/// IDs are ordered, so a `BTreeMap` keyed by an ID iterates in creation order
/// when IDs are allocated with `checked_next()`.
///
/// # Example
///
/// ```rust
/// # use farm2hand_core::define_id;
/// define_id!(CrateId);
/// define_id!(CrateLabelId);
///
/// let crate_id = CrateId::new(1);
/// assert_eq!(crate_id.checked_next(), Some(CrateId::new(2)));
/// assert_eq!("7".parse::<CrateId>().unwrap(), CrateId::new(7));
///
/// // These are different types, so this won't compile:
/// // let _: CrateLabelId = crate_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a new ID from a u32 value.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the underlying u32 value.
            #[must_use]
            pub const fn as_u32(&self) -> u32 {
                self.0
            }

            /// The ID allocated after this one, or `None` once the ID
            /// space is used up.
            #[must_use]
            pub const fn checked_next(self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(next) => Some(Self(next)),
                    None => None,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<u32>().map(Self)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(ContactId);
define_id!(MessageId);

/// Human-readable order reference such as `ORD001`.
///
/// Orders arrive from the marketplace already numbered, so unlike the
/// numeric IDs this is an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Create an order number.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Get the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderNumber {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_parse() {
        let id = ProductId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(" 42 ".parse::<ProductId>().unwrap(), id);
        assert!("abc".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_id_checked_next_stops_at_max() {
        assert_eq!(ContactId::new(1).checked_next(), Some(ContactId::new(2)));
        assert_eq!(ContactId::new(u32::MAX).checked_next(), None);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&MessageId::new(5)).unwrap();
        assert_eq!(json, "5");
    }

    #[test]
    fn test_order_number_ordering() {
        let mut numbers = vec![OrderNumber::from("ORD003"), OrderNumber::from("ORD001")];
        numbers.sort();
        assert_eq!(numbers.first().unwrap().as_str(), "ORD001");
    }
}
