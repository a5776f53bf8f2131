use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::clock::TickOutcome;
use crate::game::GameState;
use crate::runtime::GameEvent;

/// What the event loop should do after an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Redraw,
    Quit,
}

/// Presentation-side wrapper around the game. It only reads game state and
/// talks to the game through its commands.
#[derive(Debug)]
pub struct App {
    pub game: GameState,
}

impl App {
    pub fn new(game: GameState) -> Self {
        Self { game }
    }

    pub fn handle_event(&mut self, event: GameEvent) -> Control {
        match event {
            GameEvent::Key(key) => self.handle_key(key),
            GameEvent::Tick(session) => match self.game.deliver_tick(session) {
                TickOutcome::Ignored => Control::Continue,
                TickOutcome::Ticked(_) | TickOutcome::Expired => Control::Redraw,
            },
            GameEvent::Resize => Control::Redraw,
            GameEvent::Frame => Control::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Control {
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != KeyEventKind::Press {
            return Control::Continue;
        }

        match key.code {
            KeyCode::Esc => Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
            KeyCode::Enter if self.game.is_game_over() => {
                self.game.new_game();
                Control::Redraw
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                match self.game.guess_letter(c.to_ascii_lowercase()) {
                    Ok(_) => Control::Redraw,
                    Err(e) => {
                        log::debug!("ignoring key {c:?}: {e}");
                        Control::Continue
                    }
                }
            }
            _ => Control::Continue,
        }
    }
}
