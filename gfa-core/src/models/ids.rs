//! Strongly-typed identifiers for networks, regions and facilities.
//!
//! These are codes assigned by the market operator (e.g. `NEM`, `NSW1`), so
//! they wrap a `String` rather than a generated id. Ordering is lexicographic,
//! which is what every stage uses as its canonical iteration order.

macro_rules! string_id {
    ($struct:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        pub struct $struct(String);

        impl $struct {
            /// Construct an identifier from its code
            pub fn new(code: impl Into<String>) -> Self {
                Self(code.into())
            }

            /// The underlying code
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $struct {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $struct {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$struct> for String {
            fn from(value: $struct) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $struct {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(NetworkId, "The code of an interconnected grid, e.g. `NEM`");
string_id!(
    RegionId,
    "The code of a region (a pricing or dispatch partition) of a network, e.g. `NSW1`"
);
string_id!(
    FacilityCode,
    "The code of a metered facility, either a generator or an interconnector"
);
