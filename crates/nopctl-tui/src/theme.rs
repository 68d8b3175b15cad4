//! Style roles for the function list and the filter edit line.
//!
//! Active functions render bold, the focused row flips the foreground to
//! green, and selected rows get a blue background; the filter line turns
//! red while it holds an unparseable filter.

use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

/// Style for one function row.
#[must_use]
pub fn function_row_style(active: bool, selected: bool, focused: bool) -> RowStyle {
    let fg = if focused { Color::Green } else { Color::White };
    let bg = match (selected, focused) {
        (true, true) => Color::Blue,
        (true, false) => Color::DarkBlue,
        (false, _) => Color::Black,
    };
    RowStyle {
        fg,
        bg,
        bold: active,
    }
}

/// Style for the filter edit line.
#[must_use]
pub fn edit_style(error: bool) -> RowStyle {
    RowStyle {
        fg: Color::White,
        bg: if error { Color::DarkRed } else { Color::Black },
        bold: false,
    }
}

/// Style for the title and status lines.
#[must_use]
pub fn chrome_style() -> RowStyle {
    RowStyle {
        fg: Color::White,
        bg: Color::Black,
        bold: false,
    }
}
