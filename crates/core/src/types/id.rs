//! Newtype IDs for type-safe entity references.
//!
//! Backend documents are keyed by MongoDB `ObjectId` strings and shop
//! products by slugs, so every ID wraps a `String`. Use the `define_id!`
//! macro to keep IDs from different entities apart.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `Display`, and `From<&str>` / `From<String>`
///
/// # Example
///
/// ```rust
/// # use taponn_core::define_id;
/// define_id!(CardId);
/// define_id!(TeamId);
///
/// let card = CardId::new("65f0c2a1e4b0a1b2c3d4e5f6");
/// assert_eq!(card.as_str(), "65f0c2a1e4b0a1b2c3d4e5f6");
///
/// // Different types, so this won't compile:
/// // let _: TeamId = card;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(ProfileId);
define_id!(UserId);
define_id!(OrderId);
define_id!(QrCodeId);
