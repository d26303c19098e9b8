use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// Which screen is receiving keys; letters mean different things on each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Typing the player name
    TextEntry,
    /// Reading the story
    Story,
    /// Steering the snake
    Playing,
    /// Looking at the result screen
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Type(char),
    Erase,
    Confirm,
    ScrollUp,
    ScrollDown,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent, context: InputContext) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if key.code == KeyCode::Esc {
            return KeyAction::Quit;
        }

        match context {
            InputContext::TextEntry => Self::text_entry(key),
            InputContext::Story => match key.code {
                KeyCode::Enter => KeyAction::Confirm,
                KeyCode::Up => KeyAction::ScrollUp,
                KeyCode::Down => KeyAction::ScrollDown,
                KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
                _ => KeyAction::None,
            },
            InputContext::Playing => Self::movement(key),
            InputContext::Finished => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,
                _ => KeyAction::None,
            },
        }
    }

    fn text_entry(key: KeyEvent) -> KeyAction {
        match key.code {
            KeyCode::Enter => KeyAction::Confirm,
            KeyCode::Backspace => KeyAction::Erase,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyAction::Type(c)
            }
            _ => KeyAction::None,
        }
    }

    fn movement(key: KeyEvent) -> KeyAction {
        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::Right),

            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up), InputContext::Playing),
            KeyAction::Turn(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down), InputContext::Playing),
            KeyAction::Turn(Direction::Down)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left), InputContext::Playing),
            KeyAction::Turn(Direction::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right), InputContext::Playing),
            KeyAction::Turn(Direction::Right)
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w')), InputContext::Playing),
            KeyAction::Turn(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a')), InputContext::Playing),
            KeyAction::Turn(Direction::Left)
        );

        let s_upper = KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(s_upper, InputContext::Playing),
            KeyAction::Turn(Direction::Down)
        );
    }

    #[test]
    fn test_letters_are_text_while_typing_name() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w')), InputContext::TextEntry),
            KeyAction::Type('w')
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('q')), InputContext::TextEntry),
            KeyAction::Type('q')
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Backspace), InputContext::TextEntry),
            KeyAction::Erase
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter), InputContext::TextEntry),
            KeyAction::Confirm
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up), InputContext::TextEntry),
            KeyAction::None
        );
    }

    #[test]
    fn test_story_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up), InputContext::Story),
            KeyAction::ScrollUp
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down), InputContext::Story),
            KeyAction::ScrollDown
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter), InputContext::Story),
            KeyAction::Confirm
        );
    }

    #[test]
    fn test_no_restart_when_finished() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter), InputContext::Finished),
            KeyAction::None
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('r')), InputContext::Finished),
            KeyAction::None
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('q')), InputContext::Finished),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_quit_keys_everywhere() {
        let handler = InputHandler::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        for context in [
            InputContext::TextEntry,
            InputContext::Story,
            InputContext::Playing,
            InputContext::Finished,
        ] {
            assert_eq!(handler.handle_key_event(press(KeyCode::Esc), context), KeyAction::Quit);
            assert_eq!(handler.handle_key_event(ctrl_c, context), KeyAction::Quit);
        }
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('x')), InputContext::Playing),
            KeyAction::None
        );
    }
}
