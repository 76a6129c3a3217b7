use std::{sync::mpsc, time::Duration};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::Backend};

use crate::{model::Record, ui};

mod state;

pub use state::{App, InputMode};

/// Outcome of a key press for the event loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Vec<Record>>,
) -> Result<()> {
    loop {
        for records in rx.try_iter() {
            app.ingest(records);
        }

        if app.force_redraw {
            terminal.clear().ok();
            app.force_redraw = false;
        }

        terminal
            .draw(|f| ui::render(f, app))
            .context("drawing frame")?;

        if event::poll(Duration::from_millis(100)).context("polling for events")? {
            match event::read().context("reading event")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(app, key) == Flow::Quit {
                        break;
                    }
                }
                Event::Resize(_, _) => app.force_redraw = true,
                _ => {}
            }
        }
    }

    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    if matches!(app.input_mode, InputMode::FilterInput) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char('u') if ctrl => app.clear_filter(),
            KeyCode::Char(c) if !ctrl => app.push_filter_char(c),
            _ => {}
        }
        return Flow::Continue;
    }

    if app.show_help {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => app.show_help = false,
            KeyCode::Char('q') => return Flow::Quit,
            _ => {}
        }
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('l') if ctrl => app.force_redraw = true,
        KeyCode::Char('d') if ctrl => app.page_down(),
        KeyCode::Char('u') if ctrl => app.page_up(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Char('h') | KeyCode::Left => app.column_left(),
        KeyCode::Char('l') | KeyCode::Right => app.column_right(),
        KeyCode::Char('s') | KeyCode::Enter => app.sort_selected_column(),
        KeyCode::Char('/') => app.input_mode = InputMode::FilterInput,
        _ => {}
    }
    Flow::Continue
}
