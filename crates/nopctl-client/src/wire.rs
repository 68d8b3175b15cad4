//! Wire body for the `/instrumentation` endpoint.
//!
//! Both directions carry the same shape:
//! `{"functions": [{"name": <string>, "active": <bool>}, ...]}`.
//! GET returns the full current table; PUT carries the full desired table
//! and the server echoes the full resulting table back.

use nopctl_core::FunctionTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionList {
    pub functions: Vec<FunctionEntry>,
}

impl FunctionList {
    #[must_use]
    pub fn from_table(table: &FunctionTable) -> Self {
        Self {
            functions: table
                .iter()
                .map(|(name, active)| FunctionEntry {
                    name: name.clone(),
                    active: *active,
                })
                .collect(),
        }
    }

    /// Collapse into a table. Names are unique server-side; if a response
    /// ever repeats one, the last occurrence wins.
    #[must_use]
    pub fn into_table(self) -> FunctionTable {
        self.functions
            .into_iter()
            .map(|entry| (entry.name, entry.active))
            .collect()
    }
}
