//! Crossterm event loop and painter.
//!
//! The runtime owns the cache and the terminal; the app state machine
//! stays pure. One input event is dispatched at a time and every cache
//! call blocks, so no two requests are ever in flight together.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, Event as TerminalEvent, KeyCode as TerminalKeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use nopctl_client::RemoteCache;

use crate::app::{App, Command};
use crate::keymap::{Key, KeyEvent};
use crate::theme::{self, RowStyle};

/// Share of the width given to the function list; the rest is help text.
const LIST_WIDTH_PERCENT: usize = 60;

/// Connect and run the interactive UI until the operator quits.
pub fn run(port: i64) -> Result<(), String> {
    let mut cache = RemoteCache::new();
    cache
        .connect(port)
        .map_err(|err| format!("connect: {err}"))?;
    run_loop(cache)
}

/// Run the UI over an already-connected cache.
pub fn run_loop(mut cache: RemoteCache) -> Result<(), String> {
    let mut session =
        TerminalSession::enter().map_err(|err| format!("enter tui terminal mode: {err}"))?;
    let mut app = App::new();
    let table = cache.read().map_err(|err| err.to_string())?.clone();
    app.set_table(table);

    loop {
        if app.take_dirty() {
            let (width, height) =
                terminal::size().map_err(|err| format!("read terminal size: {err}"))?;
            paint(&mut session.stdout, &mut app, width, height)
                .map_err(|err| format!("render frame: {err}"))?;
        }

        let event = event::read().map_err(|err| format!("read terminal event: {err}"))?;
        match event {
            TerminalEvent::Resize(_, _) => app.request_repaint(),
            other => {
                if let Some(key) = map_terminal_event(other) {
                    let command = app.update(key);
                    dispatch(command, &mut app, &mut cache);
                }
            }
        }

        if app.quitting() {
            break;
        }
    }

    Ok(())
}

/// Execute one command against the cache. Failures are reported in the
/// status line and the loop keeps serving events; nothing is retried.
fn dispatch(command: Command, app: &mut App, cache: &mut RemoteCache) {
    match command {
        Command::None | Command::Quit => {}
        Command::Refresh => match cache.refresh() {
            Ok(()) => {
                push_table(app, cache);
                app.report_status("Function list refreshed");
            }
            Err(err) => app.report_error(err.to_string()),
        },
        Command::Write(partial) => {
            let count = partial.len();
            match cache.write(&partial) {
                Ok(()) => {
                    push_table(app, cache);
                    app.report_status(format!("Updated {count} function(s)"));
                }
                Err(err) => app.report_error(err.to_string()),
            }
        }
    }
}

fn push_table(app: &mut App, cache: &RemoteCache) {
    if let Ok(table) = cache.read() {
        app.set_table(table.clone());
    }
}

fn map_terminal_event(event: TerminalEvent) -> Option<KeyEvent> {
    let TerminalEvent::Key(key_event) = event else {
        return None;
    };
    if !matches!(key_event.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }

    let key = match key_event.code {
        TerminalKeyCode::Char(ch) => Key::Char(ch),
        TerminalKeyCode::Enter => Key::Enter,
        TerminalKeyCode::Esc => Key::Escape,
        TerminalKeyCode::Backspace => Key::Backspace,
        TerminalKeyCode::Up => Key::Up,
        TerminalKeyCode::Down => Key::Down,
        _ => return None,
    };

    Some(KeyEvent {
        key,
        ctrl: key_event.modifiers.contains(KeyModifiers::CONTROL),
    })
}

fn paint<W: Write>(out: &mut W, app: &mut App, width: u16, height: u16) -> io::Result<()> {
    let width = usize::from(width);
    let height = usize::from(height);
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    if width == 0 || height < 4 {
        return out.flush();
    }

    let list_width = (width * LIST_WIDTH_PERCENT / 100).max(1);
    let list_height = height - 3;

    queue_line(
        out,
        0,
        &format!("nopctl | {}", app.title()),
        width,
        theme::chrome_style(),
    )?;

    let rows = app.visible_rows(list_height);
    for (offset, view) in rows.iter().enumerate() {
        let style =
            theme::function_row_style(view.row.active, view.row.selected, view.focused);
        let text = format!(" {} {}", view.row.name, view.row.status_label());
        queue_line(out, offset + 1, &text, list_width, style)?;
    }

    for (offset, line) in App::help_text().lines().enumerate() {
        if offset >= list_height {
            break;
        }
        queue_text(
            out,
            list_width + 1,
            offset + 1,
            line,
            width.saturating_sub(list_width + 1),
            theme::chrome_style(),
        )?;
    }

    let cursor = if app.edit_selectable() { "_" } else { "" };
    queue_line(
        out,
        height - 2,
        &format!("filter> {}{cursor}", app.filter_text()),
        width,
        theme::edit_style(app.filter_has_error()),
    )?;
    queue_line(out, height - 1, app.status(), width, theme::chrome_style())?;

    queue!(out, SetAttribute(Attribute::Reset))?;
    out.flush()
}

fn queue_line<W: Write>(
    out: &mut W,
    row: usize,
    text: &str,
    width: usize,
    style: RowStyle,
) -> io::Result<()> {
    queue_text(out, 0, row, text, width, style)
}

fn queue_text<W: Write>(
    out: &mut W,
    column: usize,
    row: usize,
    text: &str,
    width: usize,
    style: RowStyle,
) -> io::Result<()> {
    let mut line: String = text.chars().take(width).collect();
    let padding = width.saturating_sub(line.chars().count());
    line.extend(std::iter::repeat(' ').take(padding));

    queue!(
        out,
        MoveTo(to_u16(column), to_u16(row)),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(style.fg),
        SetBackgroundColor(style.bg),
    )?;
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(out, Print(line))
}

fn to_u16(value: usize) -> u16 {
    value.min(usize::from(u16::MAX)) as u16
}

struct TerminalSession {
    stdout: io::Stdout,
}

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        Ok(Self { stdout })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            SetAttribute(Attribute::Reset),
            LeaveAlternateScreen,
            Show,
            MoveTo(0, 0)
        );
        let _ = terminal::disable_raw_mode();
    }
}
