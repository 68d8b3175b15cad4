//! Function list filter mini-language.
//!
//! A filter string is `segment* pattern`, where each segment is one of
//! `active:`, `nopped:`, `selected:`, `unselected:` and the trailing
//! pattern is a regex matched against the start of the function name.
//! Examples:
//!   `active:`              currently active functions
//!   `active:do_.*`         active functions whose name starts with `do_`
//!   `nopped:selected:`     nopped functions that are selected
//!   `nopped:unselected:main` nopped, unselected, name starting with `main`
//! The empty string matches everything.

use std::str::FromStr;

use regex::Regex;

/// Instrumentation-status predicate of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Nopped,
}

impl StatusFilter {
    fn admits(self, active: bool) -> bool {
        match self {
            Self::Active => active,
            Self::Nopped => !active,
        }
    }
}

/// Local-selection predicate of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFilter {
    Selected,
    Unselected,
}

impl SelectionFilter {
    fn admits(self, selected: bool) -> bool {
        match self {
            Self::Selected => selected,
            Self::Unselected => !selected,
        }
    }
}

/// Malformed filter string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterParseError {
    #[error("duplicate status segment {0:?}")]
    DuplicateStatus(String),
    #[error("duplicate selection segment {0:?}")]
    DuplicateSelection(String),
    #[error("unrecognized filter segment {0:?}")]
    UnknownSegment(String),
    #[error("invalid name pattern: {0}")]
    InvalidPattern(String),
}

/// A parsed filter: predicates over status, selection, and name prefix.
///
/// The default filter has no predicates and matches every entry.
#[derive(Debug, Clone, Default)]
pub struct FunctionFilter {
    status: Option<StatusFilter>,
    selection: Option<SelectionFilter>,
    pattern: Option<Regex>,
}

impl FromStr for FunctionFilter {
    type Err = FilterParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut pieces: Vec<&str> = input.split(':').collect();
        let raw_pattern = pieces.pop().unwrap_or("");

        let mut status = None;
        let mut selection = None;
        for segment in pieces {
            match segment {
                "active" | "nopped" => {
                    if status.is_some() {
                        return Err(FilterParseError::DuplicateStatus(segment.to_owned()));
                    }
                    status = Some(if segment == "active" {
                        StatusFilter::Active
                    } else {
                        StatusFilter::Nopped
                    });
                }
                "selected" | "unselected" => {
                    if selection.is_some() {
                        return Err(FilterParseError::DuplicateSelection(segment.to_owned()));
                    }
                    selection = Some(if segment == "selected" {
                        SelectionFilter::Selected
                    } else {
                        SelectionFilter::Unselected
                    });
                }
                other => return Err(FilterParseError::UnknownSegment(other.to_owned())),
            }
        }

        // Anchor at the start of the name: a match must begin at position
        // zero but need not consume the whole string.
        let pattern = Regex::new(&format!("^(?:{raw_pattern})"))
            .map_err(|err| FilterParseError::InvalidPattern(err.to_string()))?;

        Ok(Self {
            status,
            selection,
            pattern: Some(pattern),
        })
    }
}

impl FunctionFilter {
    #[must_use]
    pub fn status(&self) -> Option<StatusFilter> {
        self.status
    }

    #[must_use]
    pub fn selection(&self) -> Option<SelectionFilter> {
        self.selection
    }

    /// Apply the filter to one entry.
    ///
    /// `None` on either optional axis means "don't care": the matching
    /// predicate is skipped rather than failed. All three axes must pass.
    #[must_use]
    pub fn matches(&self, name: &str, active: Option<bool>, selected: Option<bool>) -> bool {
        if let (Some(status), Some(active)) = (self.status, active) {
            if !status.admits(active) {
                return false;
            }
        }
        if let (Some(selection), Some(selected)) = (self.selection, selected) {
            if !selection.admits(selected) {
                return false;
            }
        }
        match &self.pattern {
            Some(pattern) => pattern.is_match(name),
            None => true,
        }
    }

    /// Name-only check, used by the activate/deactivate path where status
    /// and selection must not be re-evaluated.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.matches(name, None, None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::{FilterParseError, FunctionFilter, SelectionFilter, StatusFilter};

    fn parse(input: &str) -> FunctionFilter {
        input.parse().unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = parse("");
        assert!(filter.matches("main", Some(true), Some(false)));
        assert!(filter.matches("do_fork", Some(false), Some(true)));
        assert!(filter.matches("", None, None));
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = FunctionFilter::default();
        assert!(filter.matches("anything", Some(false), Some(false)));
    }

    #[test]
    fn segments_parse_into_predicates() {
        let filter = parse("active:selected:do_");
        assert_eq!(filter.status(), Some(StatusFilter::Active));
        assert_eq!(filter.selection(), Some(SelectionFilter::Selected));

        assert!(filter.matches("do_fork", Some(true), Some(true)));
        assert!(!filter.matches("do_fork", Some(false), Some(true)));
        assert!(!filter.matches("do_fork", Some(true), Some(false)));
        assert!(!filter.matches("schedule", Some(true), Some(true)));
    }

    #[test]
    fn segment_order_between_categories_is_insignificant() {
        let filter = parse("selected:nopped:");
        assert_eq!(filter.status(), Some(StatusFilter::Nopped));
        assert_eq!(filter.selection(), Some(SelectionFilter::Selected));
    }

    #[test]
    fn nopped_filter_ignores_selection_when_absent() {
        let filter = parse("nopped:main");
        assert!(filter.matches("main", Some(false), Some(true)));
        assert!(filter.matches("main_loop", Some(false), Some(false)));
        assert!(!filter.matches("main", Some(true), Some(false)));
        assert!(!filter.matches("do_main", Some(false), Some(false)));
    }

    #[test]
    fn name_match_is_a_prefix_test_not_full_string() {
        let filter = parse("do_");
        assert!(filter.matches("do_fork", None, None));
        assert!(!filter.matches("redo_fork", None, None));

        // Anchoring survives patterns with alternation.
        let filter = parse("do_|sys_");
        assert!(filter.matches("sys_read", None, None));
        assert!(!filter.matches("write_sys_", None, None));
    }

    #[test]
    fn omitted_axes_are_skipped_not_failed() {
        let filter = parse("active:selected:");
        assert!(filter.matches("anything", None, None));
        assert!(filter.matches("anything", Some(true), None));
        assert!(!filter.matches("anything", Some(false), None));
        assert!(filter.matches_name("anything"));
    }

    #[test]
    fn duplicate_status_category_is_rejected() {
        assert!(matches!(
            "active:nopped:".parse::<FunctionFilter>(),
            Err(FilterParseError::DuplicateStatus(_))
        ));
        assert!(matches!(
            "nopped:nopped:".parse::<FunctionFilter>(),
            Err(FilterParseError::DuplicateStatus(_))
        ));
    }

    #[test]
    fn duplicate_selection_category_is_rejected() {
        assert!(matches!(
            "selected:unselected:".parse::<FunctionFilter>(),
            Err(FilterParseError::DuplicateSelection(_))
        ));
    }

    #[test]
    fn unknown_segment_is_rejected() {
        let err = "bogus:main".parse::<FunctionFilter>().unwrap_err();
        assert_eq!(err, FilterParseError::UnknownSegment("bogus".to_owned()));
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        assert!(matches!(
            "active:(".parse::<FunctionFilter>(),
            Err(FilterParseError::InvalidPattern(_))
        ));
    }

    #[test]
    fn reparsing_yields_an_agreeing_predicate() {
        let first = parse("active:unselected:do_.*");
        let second = parse("active:unselected:do_.*");
        let triples = [
            ("do_fork", Some(true), Some(false)),
            ("do_fork", Some(true), Some(true)),
            ("do_fork", Some(false), Some(false)),
            ("other", Some(true), Some(false)),
            ("do_", None, None),
        ];
        for (name, active, selected) in triples {
            assert_eq!(
                first.matches(name, active, selected),
                second.matches(name, active, selected),
                "disagreement on {name:?}"
            );
        }
    }
}
