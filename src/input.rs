use anyhow::{Context, Result};
use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub async fn handle_key_event(app: &mut App, key: event::KeyEvent) -> Result<()> {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return Ok(());
  }

  match app.mode {
    AppMode::Query => handle_query_key(app, key),
    AppMode::Browse => handle_browse_key(app, key).await.context("Failed to handle browse key event")?,
  }
  Ok(())
}

async fn handle_browse_key(app: &mut App, key: event::KeyEvent) -> Result<()> {
  match key.code {
    KeyCode::Char('q') | KeyCode::Esc => {
      app.should_quit = true;
    }
    KeyCode::Enter => {
      app.clear_error();
      app.open_selected();
    }
    KeyCode::Down | KeyCode::Char('j') => app.select_next(),
    KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
    KeyCode::Right | KeyCode::Char('l') => app.next_page(),
    KeyCode::Left | KeyCode::Char('h') => app.prev_page(),
    KeyCode::Backspace | KeyCode::Char('b') => app.back(),
    KeyCode::Char('f') => app.forward(),
    KeyCode::Tab => app.toggle_focus(),
    KeyCode::Char('g') => app.navigate(crate::router::ViewState::home()),
    KeyCode::Char('c') => app.open_category(),
    KeyCode::Char(':') | KeyCode::Char('/') => app.start_query(),
    KeyCode::Char('r') => {
      app.clear_error();
      app.trigger_load();
    }
    KeyCode::Char('p') => app.play_current().await,
    KeyCode::Char('s') => {
      if app.player.is_playing() {
        app.player.stop().await.context("Failed to stop playback")?;
      }
    }
    KeyCode::Char(' ') => {
      if app.player.is_playing()
        && let Err(e) = app.player.toggle_pause().await
      {
        app.set_error(format!("Pause error: {}", e));
      }
    }
    _ => {}
  }
  Ok(())
}

fn handle_query_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.submit_query();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.query_input, app.query_cursor);
      app.query_input.insert(byte_idx, c);
      app.query_cursor += 1;
    }
    KeyCode::Backspace => {
      if app.query_cursor > 0 {
        app.query_cursor -= 1;
        let byte_idx = char_to_byte_index(&app.query_input, app.query_cursor);
        app.query_input.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.query_cursor < app.query_input.chars().count() {
        let byte_idx = char_to_byte_index(&app.query_input, app.query_cursor);
        app.query_input.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.query_cursor = app.query_cursor.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.query_cursor < app.query_input.chars().count() {
        app.query_cursor += 1;
      }
    }
    KeyCode::Home => {
      app.query_cursor = 0;
    }
    KeyCode::End => {
      app.query_cursor = app.query_input.chars().count();
    }
    KeyCode::Esc => {
      app.mode = AppMode::Browse;
    }
    _ => {}
  }
}
