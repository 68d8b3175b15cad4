//! Filtered, order-preserving navigation over the function table.
//!
//! The walker owns a copy of the remote mirror (pushed by the driving
//! loop; it never writes back through it), the active filter, and the
//! selection set. Navigation and focus only ever land on entries matching
//! the filter; raw indexed reads are unaffected by it.

use std::collections::BTreeSet;

use crate::filter::FunctionFilter;
use crate::types::{FunctionRow, FunctionTable};

/// Callback fired exactly once per `notify_change` call.
pub type ChangeCallback = Box<dyn FnMut()>;

pub struct FunctionWalker {
    table: FunctionTable,
    /// Alphabetical name list; display and navigation order. Recomputed on
    /// every `notify_change`.
    names: Vec<String>,
    filter: FunctionFilter,
    selected: BTreeSet<String>,
    focus: Option<usize>,
    on_change: Option<ChangeCallback>,
}

impl Default for FunctionWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionWalker {
    #[must_use]
    pub fn new() -> Self {
        Self::with_filter(FunctionFilter::default())
    }

    #[must_use]
    pub fn with_filter(filter: FunctionFilter) -> Self {
        Self {
            table: FunctionTable::new(),
            names: Vec::new(),
            filter,
            selected: BTreeSet::new(),
            focus: None,
            on_change: None,
        }
    }

    /// Register the single change callback. Replaces any prior one.
    pub fn on_change(&mut self, callback: ChangeCallback) {
        self.on_change = Some(callback);
    }

    /// Replace the mirror copy. Selection is kept as-is; a selected name
    /// that left the table simply stops displaying. Follow with
    /// `notify_change`.
    pub fn set_table(&mut self, table: FunctionTable) {
        self.table = table;
    }

    /// Replace the active filter. Follow with `notify_change`.
    pub fn set_filter(&mut self, filter: FunctionFilter) {
        self.filter = filter;
    }

    #[must_use]
    pub fn filter(&self) -> &FunctionFilter {
        &self.filter
    }

    /// Number of entries in the table, matching or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Decorated record for the i-th sorted name, independent of whether it
    /// currently matches the filter.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<FunctionRow> {
        let name = self.names.get(index)?;
        let active = *self.table.get(name)?;
        Some(FunctionRow {
            name: name.clone(),
            active,
            selected: self.selected.contains(name),
        })
    }

    #[must_use]
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    #[must_use]
    pub fn focused_row(&self) -> Option<FunctionRow> {
        self.row(self.focus?)
    }

    /// Nearest matching index strictly after `position`; `None` is the
    /// end-of-sequence condition.
    #[must_use]
    pub fn next(&self, position: usize) -> Option<usize> {
        self.first_matching_forward(position.checked_add(1)?)
    }

    /// Nearest matching index strictly before `position`; `None` is the
    /// end-of-sequence condition.
    #[must_use]
    pub fn prev(&self, position: usize) -> Option<usize> {
        self.first_matching_backward(position.checked_sub(1)?)
    }

    /// Move the cursor, then re-validate it against the filter.
    pub fn set_focus(&mut self, position: usize) {
        self.focus = Some(position);
        self.notify_change();
    }

    /// Re-validate focus after any change to the filter, the mirror, or the
    /// selection. The owning driver must call this after every such change.
    ///
    /// A defined focus is kept on the nearest matching index at-or-before
    /// the current one, falling back to the nearest at-or-after, and to
    /// `None` only when nothing matches. The registered change callback
    /// fires exactly once per call, whether or not focus moved.
    pub fn notify_change(&mut self) {
        self.names = self.table.keys().cloned().collect();
        self.focus = match self.focus {
            None => self.first_matching_forward(0),
            Some(current) => self
                .first_matching_backward(current)
                .or_else(|| self.first_matching_forward(current)),
        };
        if let Some(callback) = self.on_change.as_mut() {
            callback();
        }
    }

    /// `(rank, total)`: how many entries match the filter, and the 1-based
    /// ordinal of the focused entry among them. `(None, 0)` exactly when
    /// nothing matches.
    #[must_use]
    pub fn position(&self) -> (Option<usize>, usize) {
        let mut total = 0;
        let mut rank = None;
        for index in 0..self.names.len() {
            if self.matches_index(index) {
                total += 1;
                if Some(index) == self.focus {
                    rank = Some(total);
                }
            }
        }
        (rank, total)
    }

    #[must_use]
    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// Flip one name's selection membership.
    pub fn toggle_selected(&mut self, name: &str) {
        if !self.selected.remove(name) {
            self.selected.insert(name.to_owned());
        }
        self.notify_change();
    }

    /// Select every name currently matching the filter. The selection axis
    /// is evaluated as "don't care" so the predicate cannot depend on the
    /// selection state being rewritten.
    pub fn select_all(&mut self) {
        for (name, active) in &self.table {
            if self.filter.matches(name, Some(*active), None) {
                self.selected.insert(name.clone());
            }
        }
        self.notify_change();
    }

    /// Deselect every name currently matching the filter.
    pub fn clear_selection(&mut self) {
        let mut remaining = BTreeSet::new();
        for name in &self.selected {
            let matched = match self.table.get(name) {
                Some(active) => self.filter.matches(name, Some(*active), None),
                // Not in the table any more; keep the selection bit.
                None => false,
            };
            if !matched {
                remaining.insert(name.clone());
            }
        }
        self.selected = remaining;
        self.notify_change();
    }

    fn matches_index(&self, index: usize) -> bool {
        let Some(name) = self.names.get(index) else {
            return false;
        };
        let Some(active) = self.table.get(name) else {
            return false;
        };
        self.filter
            .matches(name, Some(*active), Some(self.selected.contains(name)))
    }

    fn first_matching_forward(&self, start: usize) -> Option<usize> {
        (start..self.names.len()).find(|&index| self.matches_index(index))
    }

    fn first_matching_backward(&self, start: usize) -> Option<usize> {
        if self.names.is_empty() {
            return None;
        }
        let start = start.min(self.names.len() - 1);
        (0..=start).rev().find(|&index| self.matches_index(index))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::FunctionWalker;
    use crate::filter::FunctionFilter;
    use crate::types::FunctionTable;

    fn table(entries: &[(&str, bool)]) -> FunctionTable {
        entries
            .iter()
            .map(|(name, active)| ((*name).to_owned(), *active))
            .collect()
    }

    fn walker(entries: &[(&str, bool)]) -> FunctionWalker {
        let mut walker = FunctionWalker::new();
        walker.set_table(table(entries));
        walker.notify_change();
        walker
    }

    fn apply(walker: &mut FunctionWalker, filter: &str) {
        walker.set_filter(filter.parse::<FunctionFilter>().unwrap());
        walker.notify_change();
    }

    #[test]
    fn names_are_walked_in_alphabetical_order() {
        let walker = walker(&[("zeta", true), ("alpha", false), ("mid", true)]);
        assert_eq!(walker.len(), 3);
        assert_eq!(walker.row(0).unwrap().name, "alpha");
        assert_eq!(walker.row(1).unwrap().name, "mid");
        assert_eq!(walker.row(2).unwrap().name, "zeta");
    }

    #[test]
    fn indexed_reads_ignore_the_filter() {
        let mut walker = walker(&[("do_fork", true), ("schedule", false)]);
        apply(&mut walker, "do_");
        let row = walker.row(1).unwrap();
        assert_eq!(row.name, "schedule");
        assert!(!row.active);
    }

    #[test]
    fn initial_focus_lands_on_first_match() {
        let mut walker = walker(&[("alpha", false), ("beta", true), ("gamma", true)]);
        assert_eq!(walker.focus(), Some(0));

        apply(&mut walker, "active:");
        assert_eq!(walker.focus(), Some(1));
    }

    #[test]
    fn next_and_prev_skip_non_matching_entries() {
        let mut walker = walker(&[
            ("a_fn", true),
            ("b_fn", false),
            ("c_fn", true),
            ("d_fn", false),
            ("e_fn", true),
        ]);
        apply(&mut walker, "active:");

        assert_eq!(walker.next(0), Some(2));
        assert_eq!(walker.next(2), Some(4));
        assert_eq!(walker.next(4), None);
        assert_eq!(walker.prev(4), Some(2));
        assert_eq!(walker.prev(2), Some(0));
        assert_eq!(walker.prev(0), None);
    }

    #[test]
    fn focus_falls_back_to_preceding_match_then_following() {
        let mut walker = walker(&[("apple", true), ("banana", false), ("cherry", true)]);
        walker.set_focus(1);
        assert_eq!(walker.focus(), Some(1));

        // banana no longer matches; the nearest preceding match wins.
        apply(&mut walker, "active:");
        assert_eq!(walker.focus(), Some(0));

        walker.set_focus(0);
        apply(&mut walker, "cher");
        // No match at or before 0; fall forward.
        assert_eq!(walker.focus(), Some(2));

        apply(&mut walker, "nomatch");
        assert_eq!(walker.focus(), None);
        assert_eq!(walker.position(), (None, 0));

        // Matches reappear; focus recovers from the front.
        apply(&mut walker, "");
        assert_eq!(walker.focus(), Some(0));
    }

    #[test]
    fn focus_survives_table_shrink() {
        let mut walker = walker(&[("a", true), ("b", true), ("c", true)]);
        walker.set_focus(2);

        walker.set_table(table(&[("a", true)]));
        walker.notify_change();
        assert_eq!(walker.focus(), Some(0));
    }

    #[test]
    fn position_reports_rank_among_matches() {
        let mut walker = walker(&[
            ("a_fn", true),
            ("b_fn", false),
            ("c_fn", true),
            ("d_fn", true),
        ]);
        apply(&mut walker, "active:");
        walker.set_focus(2);
        assert_eq!(walker.position(), (Some(2), 3));

        walker.set_focus(3);
        assert_eq!(walker.position(), (Some(3), 3));
    }

    #[test]
    fn select_all_only_touches_matching_entries() {
        let mut walker = walker(&[("a_fn", true), ("b_fn", false), ("c_fn", true)]);
        apply(&mut walker, "active:");
        walker.select_all();

        assert!(walker.is_selected("a_fn"));
        assert!(!walker.is_selected("b_fn"));
        assert!(walker.is_selected("c_fn"));

        // A later filter change does not alter selection membership.
        apply(&mut walker, "nopped:");
        assert!(walker.is_selected("a_fn"));
        assert!(walker.is_selected("c_fn"));
    }

    #[test]
    fn select_all_is_insensitive_to_current_selection_state() {
        let mut walker = walker(&[("a_fn", true), ("b_fn", true)]);
        apply(&mut walker, "unselected:");
        walker.toggle_selected("a_fn");

        // "unselected:" with the axis evaluated as don't-care still selects
        // every matching name rather than racing its own updates.
        walker.select_all();
        assert!(walker.is_selected("a_fn"));
        assert!(walker.is_selected("b_fn"));
    }

    #[test]
    fn clear_selection_respects_the_filter() {
        let mut walker = walker(&[("a_fn", true), ("b_fn", false)]);
        walker.select_all();
        assert_eq!(walker.selected().len(), 2);

        apply(&mut walker, "active:");
        walker.clear_selection();
        assert!(!walker.is_selected("a_fn"));
        assert!(walker.is_selected("b_fn"));
    }

    #[test]
    fn selection_outlives_table_refresh() {
        let mut walker = walker(&[("gone_fn", true), ("kept_fn", true)]);
        walker.select_all();

        walker.set_table(table(&[("kept_fn", false)]));
        walker.notify_change();

        // Still a member, even though it no longer displays.
        assert!(walker.is_selected("gone_fn"));
        assert!(walker.row(0).unwrap().selected);
    }

    #[test]
    fn toggle_selected_flips_membership() {
        let mut walker = walker(&[("main", true)]);
        walker.toggle_selected("main");
        assert!(walker.is_selected("main"));
        walker.toggle_selected("main");
        assert!(!walker.is_selected("main"));
    }

    #[test]
    fn change_callback_fires_exactly_once_per_notify() {
        let mut walker = walker(&[("main", true)]);
        let count = Rc::new(Cell::new(0_u32));
        let seen = Rc::clone(&count);
        walker.on_change(Box::new(move || seen.set(seen.get() + 1)));

        walker.notify_change();
        assert_eq!(count.get(), 1);

        walker.toggle_selected("main");
        assert_eq!(count.get(), 2);

        walker.select_all();
        walker.clear_selection();
        assert_eq!(count.get(), 4);

        walker.set_focus(0);
        assert_eq!(count.get(), 5);
    }
}
