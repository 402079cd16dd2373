//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`] (or [`handle_reader_key`] when
//! it only applies inside the reader).
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm below that calls it.
//! 3. Update the hint line in `ui::draw_status_bar`.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.reader.is_some() {
        handle_reader_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_category(now),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_category(now),
        KeyCode::Enter => app.open_reader(),
        KeyCode::Char('f') => app.open_featured(),
        KeyCode::Char('n') => app.next_featured(now),
        KeyCode::Char(c @ '1'..='3') => app.jump_featured(c as usize - '1' as usize, now),
        KeyCode::Char('b') => app.toggle_bookmark_selected(),
        KeyCode::Char('o') => app.open_link(),
        KeyCode::Char('r') => app.reload(),
        _ => {}
    }
}

fn handle_reader_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => app.close_reader(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_reader_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_reader_up(),
        KeyCode::Char('b') => app.toggle_bookmark_selected(),
        KeyCode::Char('o') => app.open_link(),
        _ => {}
    }
}
