//! String-backed identifiers for SB3-named entities.
//!
//! SB3 keys blocks, variables, lists, and broadcasts by opaque string ids
//! assigned by the Scratch editor. These newtypes wrap `Arc<str>` so a
//! parsed id can be cloned freely (shared with every block reference to
//! it) without re-allocating the string.

use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub Arc<str>);

        impl $name {
            /// Borrow the underlying string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(v: &str) -> Self {
                Self(Arc::from(v))
            }
        }

        impl From<String> for $name {
            fn from(v: String) -> Self {
                Self(Arc::from(v.as_str()))
            }
        }

        impl From<Arc<str>> for $name {
            fn from(v: Arc<str>) -> Self {
                Self(v)
            }
        }
    };
}

string_id!(BlockId, "Identifies a block as assigned by the Scratch editor (SB3 source id).");
string_id!(VariableId, "Identifies a scalar or list variable within a target.");
string_id!(ListId, "Identifies a list variable within a target.");
string_id!(BroadcastId, "Identifies a broadcast message channel.");
string_id!(
    ProcCode,
    "Identifies a custom block (procedure) by its `proccode` signature, e.g. `move %n steps`."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_cheap_and_equal() {
        let a = VariableId::from("counter");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "counter");
    }

    #[test]
    fn display_matches_source_string() {
        let id = BroadcastId::from("go");
        assert_eq!(format!("{id}"), "go");
    }
}
