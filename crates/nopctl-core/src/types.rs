//! Shared table types for the instrumentation function list.

use std::collections::BTreeMap;

/// The client-side mirror of the server's function table.
///
/// Keys are function names (unique by construction), values are the
/// instrumentation status: `true` for active, `false` for nopped. The map
/// is ordered, so iteration yields the alphabetical display order.
pub type FunctionTable = BTreeMap<String, bool>;

/// A decorated list row: one function with its status and local selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRow {
    pub name: String,
    pub active: bool,
    pub selected: bool,
}

impl FunctionRow {
    /// Status suffix as shown in list output.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.active {
            "(active)"
        } else {
            "(nopped)"
        }
    }
}
