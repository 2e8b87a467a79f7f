//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  There are two modes: normal
//! navigation, and search entry (started with `/`).
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_normal`] that calls it.
//! 3. Update the help text in `ui::draw_status_bar`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.searching {
        handle_search(app, key.code);
    } else {
        handle_normal(app, key.code);
    }
}

fn handle_normal(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') => app.activate(),
        KeyCode::Char('o') => app.open_selected(),
        KeyCode::Char('J') => app.move_section(1),
        KeyCode::Char('K') => app.move_section(-1),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('l') => app.cycle_language(),
        KeyCode::Char('r') => app.reload = true,
        _ => {}
    }
}

fn handle_search(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.cancel_search(),
        KeyCode::Enter => app.finish_search(),
        KeyCode::Backspace => app.pop_search(),
        KeyCode::Char(c) => app.push_search(c),
        _ => {}
    }
}
