use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyModifiers};
use std::io;

use crate::Direction;
use crate::Event;
use crate::Navigation;

/// Editable filter text plus the view offsets the keyboard controls.
#[derive(Debug, Default)]
pub struct Prompt {
    pub pattern: String,
    /// Cursor position in characters.
    pub cursor_pos: usize,
    pub scroll: usize,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The pattern changed and the filter must be reapplied.
    Edited,
    /// Only the cursor or the scroll offset moved.
    Moved,
    ToggleMode,
    Accept,
    Exit,
}

fn map_key(key: KeyEvent) -> Option<Event> {
    let KeyEvent {
        code, modifiers, ..
    } = key;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('d') => Some(Event::Exit),
            KeyCode::Char('u') => Some(Event::Clear),
            _ => None,
        };
    }

    match code {
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::ALT) => Some(Event::Key(c)),
        KeyCode::Backspace | KeyCode::Delete => Some(Event::Backspace),
        KeyCode::Enter => Some(Event::Enter),
        KeyCode::Esc => Some(Event::Exit),
        KeyCode::Tab => Some(Event::ToggleMode),
        KeyCode::Left => Some(Event::Direction(Direction::Left)),
        KeyCode::Right => Some(Event::Direction(Direction::Right)),
        KeyCode::PageUp => Some(Event::Navigation(Navigation::PageUp)),
        KeyCode::PageDown => Some(Event::Navigation(Navigation::PageDown)),
        KeyCode::Home => Some(Event::Navigation(Navigation::Home)),
        KeyCode::End => Some(Event::Navigation(Navigation::End)),
        _ => None,
    }
}

/// Blocks until the next event this program reacts to.
pub fn next_event() -> io::Result<Event> {
    loop {
        match event::read()? {
            TermEvent::Key(key) => {
                if let Some(event) = map_key(key) {
                    return Ok(event);
                }
            }
            TermEvent::Resize(..) => return Ok(Event::Resize),
            _ => {}
        }
    }
}

fn byte_offset(pattern: &str, cursor_pos: usize) -> usize {
    pattern
        .char_indices()
        .nth(cursor_pos)
        .map_or(pattern.len(), |(offset, _)| offset)
}

pub fn handle_input(event: Event, prompt: &mut Prompt) -> Outcome {
    let len = prompt.pattern.chars().count();

    match event {
        Event::Key(c) => {
            let at = byte_offset(&prompt.pattern, prompt.cursor_pos);
            prompt.pattern.insert(at, c);
            prompt.cursor_pos = (prompt.cursor_pos + 1).min(len + 1);
            Outcome::Edited
        }
        Event::Direction(d) => {
            match d {
                Direction::Left => {
                    prompt.cursor_pos = prompt.cursor_pos.saturating_sub(1);
                }
                Direction::Right => {
                    prompt.cursor_pos = (prompt.cursor_pos + 1).min(len);
                }
            };
            Outcome::Moved
        }
        Event::Navigation(n) => {
            match n {
                Navigation::PageUp => {
                    prompt.scroll = prompt.scroll.saturating_sub(5);
                }
                Navigation::PageDown => {
                    prompt.scroll += 5;
                }
                Navigation::Home => {
                    prompt.cursor_pos = 0;
                }
                Navigation::End => {
                    prompt.cursor_pos = len;
                }
            };
            Outcome::Moved
        }
        Event::Backspace => {
            if prompt.cursor_pos == 0 || len == 0 {
                return Outcome::Moved;
            }
            let one_before = (prompt.cursor_pos - 1).min(len - 1);
            let at = byte_offset(&prompt.pattern, one_before);
            prompt.pattern.remove(at);
            prompt.cursor_pos = one_before;
            Outcome::Edited
        }
        Event::Clear => {
            prompt.pattern.clear();
            prompt.cursor_pos = 0;
            Outcome::Edited
        }
        Event::ToggleMode => Outcome::ToggleMode,
        Event::Resize => Outcome::Moved,
        Event::Enter => Outcome::Accept,
        Event::Exit => Outcome::Exit,
    }
}
