use serde::{Deserialize, Serialize};

/// A PostgreSQL log sequence number in its textual `X/X` form.
///
/// The status surface only ever displays LSNs, so this stays a thin
/// wrapper instead of a parsed 64-bit position.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Lsn(pub String);

impl Lsn {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Lsn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for Lsn {
    fn from(value: &str) -> Self {
        Lsn(value.to_string())
    }
}
