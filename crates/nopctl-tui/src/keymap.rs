//! Key bindings, resolved per input mode.

/// Which pane owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    FilterEdit,
}

/// Terminal-agnostic key token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyEvent {
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    #[must_use]
    pub const fn ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }
}

/// One user-level action, already routed for the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Quit,
    FocusUp,
    FocusDown,
    ToggleSelect,
    BeginFilterEdit,
    SelectAll,
    ClearSelection,
    ActivateSelected,
    DeactivateSelected,
    Refresh,
    EditInsert(char),
    EditBackspace,
    EditApply,
    EditClear,
}

/// Resolve a key event against the active mode. `None` means the key is
/// unbound and ignored.
#[must_use]
pub fn resolve(mode: Mode, event: KeyEvent) -> Option<UiAction> {
    if event.ctrl {
        return match event.key {
            Key::Char('c') => Some(UiAction::Quit),
            _ => None,
        };
    }

    match mode {
        Mode::List => match event.key {
            Key::Char('q') => Some(UiAction::Quit),
            Key::Char('f' | '/') => Some(UiAction::BeginFilterEdit),
            Key::Char('s') => Some(UiAction::SelectAll),
            Key::Char('c') => Some(UiAction::ClearSelection),
            Key::Char('a') => Some(UiAction::ActivateSelected),
            Key::Char('d') => Some(UiAction::DeactivateSelected),
            Key::Char('r') => Some(UiAction::Refresh),
            Key::Char(' ') | Key::Enter => Some(UiAction::ToggleSelect),
            Key::Up => Some(UiAction::FocusUp),
            Key::Down => Some(UiAction::FocusDown),
            _ => None,
        },
        Mode::FilterEdit => match event.key {
            Key::Enter => Some(UiAction::EditApply),
            Key::Escape => Some(UiAction::EditClear),
            Key::Backspace => Some(UiAction::EditBackspace),
            Key::Char(ch) => Some(UiAction::EditInsert(ch)),
            _ => None,
        },
    }
}
