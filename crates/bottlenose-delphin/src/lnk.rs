//! Surface alignment of predications and nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A character span into the input string, written `<from:to>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lnk {
    pub from: i64,
    pub to: i64,
}

impl Lnk {
    pub const fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// The `{"from": .., "to": ..}` object used by every JSON projection.
    pub fn to_json(self) -> serde_json::Value {
        serde_json::json!({ "from": self.from, "to": self.to })
    }
}

impl fmt::Display for Lnk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.from, self.to)
    }
}
