//! nopctl-tui: interactive terminal surface for the instrumentation list.
//!
//! `app` is the pure state machine (key event in, command out), `runtime`
//! owns the terminal and the cache and executes the commands. `keymap`,
//! `theme`, and `widgets` are the small pieces the two share.

pub mod app;
pub mod keymap;
pub mod runtime;
pub mod theme;
pub mod widgets;

pub use app::{App, Command, RowView};
pub use runtime::run;

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "nopctl-tui"
}
