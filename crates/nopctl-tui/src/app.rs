//! Pure state machine for the interactive UI.
//!
//! `App::update` consumes one key event and returns a `Command` for the
//! runtime to execute; network effects never happen in here. The runtime
//! pushes fresh mirrors back in through `set_table` after every refresh or
//! write round trip.

use std::cell::Cell;
use std::rc::Rc;

use nopctl_core::{FunctionFilter, FunctionRow, FunctionTable, FunctionWalker};

use crate::keymap::{self, KeyEvent, Mode, UiAction};
use crate::widgets::{FilterEdit, Focusable, ListPane};

/// Effect requested by the state machine, executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    /// Re-fetch the function table.
    Refresh,
    /// Write this partial (name -> desired status) through the cache.
    Write(FunctionTable),
}

/// One row as the painter sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub row: FunctionRow,
    pub focused: bool,
}

pub struct App {
    walker: FunctionWalker,
    list_pane: ListPane,
    filter_edit: FilterEdit,
    mode: Mode,
    status: String,
    scroll: usize,
    quitting: bool,
    dirty: Rc<Cell<bool>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        let dirty = Rc::new(Cell::new(true));
        let mut walker = FunctionWalker::new();
        let flag = Rc::clone(&dirty);
        walker.on_change(Box::new(move || flag.set(true)));
        Self {
            walker,
            list_pane: ListPane::default(),
            filter_edit: FilterEdit::default(),
            mode: Mode::List,
            status: String::new(),
            scroll: 0,
            quitting: false,
            dirty,
        }
    }

    /// Replace the walker's mirror copy after a cache round trip.
    pub fn set_table(&mut self, table: FunctionTable) {
        self.walker.set_table(table);
        self.walker.notify_change();
    }

    pub fn update(&mut self, event: KeyEvent) -> Command {
        let Some(action) = keymap::resolve(self.mode, event) else {
            return Command::None;
        };
        self.apply(action)
    }

    pub fn apply(&mut self, action: UiAction) -> Command {
        match action {
            UiAction::Quit => {
                self.quitting = true;
                Command::Quit
            }
            UiAction::FocusUp => {
                if let Some(focus) = self.walker.focus() {
                    if let Some(previous) = self.walker.prev(focus) {
                        self.walker.set_focus(previous);
                    }
                }
                Command::None
            }
            UiAction::FocusDown => {
                if let Some(focus) = self.walker.focus() {
                    if let Some(following) = self.walker.next(focus) {
                        self.walker.set_focus(following);
                    }
                }
                Command::None
            }
            UiAction::ToggleSelect => {
                if let Some(row) = self.walker.focused_row() {
                    self.walker.toggle_selected(&row.name);
                }
                Command::None
            }
            UiAction::BeginFilterEdit => {
                self.enter_edit();
                Command::None
            }
            UiAction::SelectAll => {
                self.walker.select_all();
                Command::None
            }
            UiAction::ClearSelection => {
                self.walker.clear_selection();
                Command::None
            }
            UiAction::ActivateSelected => Command::Write(self.partial_for(true)),
            UiAction::DeactivateSelected => Command::Write(self.partial_for(false)),
            UiAction::Refresh => Command::Refresh,
            UiAction::EditInsert(ch) => {
                self.filter_edit.insert(ch);
                self.dirty.set(true);
                Command::None
            }
            UiAction::EditBackspace => {
                self.filter_edit.backspace();
                self.dirty.set(true);
                Command::None
            }
            UiAction::EditApply => {
                match self.filter_edit.text().parse::<FunctionFilter>() {
                    Ok(filter) => {
                        self.filter_edit.set_error(false);
                        self.walker.set_filter(filter);
                        self.walker.notify_change();
                        self.leave_edit();
                    }
                    Err(err) => {
                        // Stay in the edit line so the filter can be fixed.
                        self.filter_edit.set_error(true);
                        self.report_error(err.to_string());
                    }
                }
                Command::None
            }
            UiAction::EditClear => {
                self.filter_edit.clear();
                self.walker.set_filter(FunctionFilter::default());
                self.walker.notify_change();
                self.leave_edit();
                Command::None
            }
        }
    }

    /// Desired status for every selected name that passes the name axis of
    /// the active filter. Status and selection are deliberately not
    /// re-evaluated here; the selection already captured the operator's
    /// intent.
    fn partial_for(&self, active: bool) -> FunctionTable {
        self.walker
            .selected()
            .iter()
            .filter(|name| self.walker.filter().matches_name(name))
            .map(|name| (name.clone(), active))
            .collect()
    }

    fn enter_edit(&mut self) {
        self.mode = Mode::FilterEdit;
        self.list_pane.set_enabled(false);
        self.filter_edit.set_enabled(true);
        self.dirty.set(true);
    }

    fn leave_edit(&mut self) {
        self.mode = Mode::List;
        self.filter_edit.set_enabled(false);
        self.list_pane.set_enabled(true);
        self.dirty.set(true);
    }

    pub fn report_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.dirty.set(true);
    }

    pub fn report_error(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.dirty.set(true);
    }

    #[must_use]
    pub fn quitting(&self) -> bool {
        self.quitting
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn walker(&self) -> &FunctionWalker {
        &self.walker
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn filter_text(&self) -> &str {
        self.filter_edit.text()
    }

    #[must_use]
    pub fn filter_has_error(&self) -> bool {
        self.filter_edit.has_error()
    }

    #[must_use]
    pub fn list_selectable(&self) -> bool {
        self.list_pane.is_selectable()
    }

    #[must_use]
    pub fn edit_selectable(&self) -> bool {
        self.filter_edit.is_selectable()
    }

    /// `Item <rank> of <total>` over the entries matching the filter.
    #[must_use]
    pub fn title(&self) -> String {
        let (rank, total) = self.walker.position();
        format!("Item {} of {}", rank.unwrap_or(0), total)
    }

    /// Rows for a viewport of `height` lines, scrolled so the focused row
    /// stays visible.
    pub fn visible_rows(&mut self, height: usize) -> Vec<RowView> {
        if height == 0 {
            return Vec::new();
        }
        if let Some(focus) = self.walker.focus() {
            if focus < self.scroll {
                self.scroll = focus;
            } else if focus >= self.scroll + height {
                self.scroll = focus + 1 - height;
            }
        }
        if self.scroll + height > self.walker.len() {
            self.scroll = self.walker.len().saturating_sub(height);
        }

        let focus = self.walker.focus();
        (self.scroll..self.walker.len().min(self.scroll + height))
            .filter_map(|index| {
                self.walker.row(index).map(|row| RowView {
                    row,
                    focused: focus == Some(index),
                })
            })
            .collect()
    }

    /// True once something has changed since the last repaint.
    pub fn take_dirty(&mut self) -> bool {
        self.dirty.replace(false)
    }

    /// Force a repaint on the next loop turn (terminal resize).
    pub fn request_repaint(&mut self) {
        self.dirty.set(true);
    }

    #[must_use]
    pub fn help_text() -> &'static str {
        concat!(
            "'f' or '/'\n",
            "  to search, format is\n",
            "    [op1]:[op2]:[regex]\n",
            "    The options are\n",
            "      [active:nopped] for the status of the functions\n",
            "      [selected:unselected] for the current selection\n",
            "    press enter to apply filter\n",
            "    press esc to clear filter\n",
            "\n",
            "'s'\n",
            "  to select all filtered\n",
            "\n",
            "'c'\n",
            "  to clear all filtered selection\n",
            "\n",
            "'a/d'\n",
            "  to activate/deactivate the selected functions\n",
            "\n",
            "'r'\n",
            "  to refresh the function list\n",
            "\n",
            "'q'/'Ctrl+c'\n",
            "  to quit",
        )
    }
}
