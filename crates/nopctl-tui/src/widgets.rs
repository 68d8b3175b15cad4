//! Focusable panes of the UI.
//!
//! Selectability is an explicit `enabled` flag behind `is_selectable()`;
//! exactly one pane is enabled at a time, and the app flips the flags when
//! it switches input modes.

/// Shared seam for anything that can own keyboard focus.
pub trait Focusable {
    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Whether the pane may take focus right now.
    fn is_selectable(&self) -> bool {
        self.enabled()
    }
}

/// The function list pane.
#[derive(Debug)]
pub struct ListPane {
    enabled: bool,
}

impl Default for ListPane {
    fn default() -> Self {
        // The list owns input until the filter line is activated.
        Self { enabled: true }
    }
}

impl Focusable for ListPane {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// The filter edit line.
#[derive(Debug, Default)]
pub struct FilterEdit {
    enabled: bool,
    text: String,
    error: bool,
}

impl FilterEdit {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// True while the line holds a filter that failed to parse.
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn set_error(&mut self, error: bool) {
        self.error = error;
    }

    pub fn insert(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.error = false;
    }
}

impl Focusable for FilterEdit {
    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
