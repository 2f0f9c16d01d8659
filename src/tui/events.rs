//! Event Handling - Keyboard input processing

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::{Panel, ViewState};

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Draft text changed
    Edit,
    Submit,
    NextPanel,
    ScrollUp,
    ScrollDown,
    None,
}

/// Handle keyboard events
pub fn handle_key_event(key: KeyEvent, state: &mut ViewState) -> Action {
    if key.kind == KeyEventKind::Release {
        return Action::None;
    }

    // Global keybindings
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => return Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Action::Quit,
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => {
            state.focus = state.focus.next();
            return Action::NextPanel;
        }
        // Enter and Ctrl+Enter both submit; many terminals cannot tell them apart
        (_, KeyCode::Enter) => {
            return if state.can_submit && !state.loading {
                Action::Submit
            } else {
                Action::None
            };
        }
        _ => {}
    }

    match state.focus {
        Panel::Input => edit_input(key, state),
        Panel::History => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                state.scroll_history(-1);
                Action::ScrollUp
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.scroll_history(1);
                Action::ScrollDown
            }
            _ => Action::None,
        },
    }
}

fn edit_input(key: KeyEvent, state: &mut ViewState) -> Action {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.input.clear();
            Action::Edit
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.input.push(c);
            Action::Edit
        }
        KeyCode::Backspace => {
            if state.input.pop().is_some() {
                Action::Edit
            } else {
                Action::None
            }
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_actions() {
        let mut state = ViewState::default();
        assert_eq!(handle_key_event(key(KeyCode::Esc), &mut state), Action::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, &mut state), Action::Quit);
    }

    #[test]
    fn test_typing_edits_input() {
        let mut state = ViewState::default();
        for c in "héllo".chars() {
            assert_eq!(handle_key_event(key(KeyCode::Char(c)), &mut state), Action::Edit);
        }
        assert_eq!(state.input, "héllo");

        handle_key_event(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.input, "héll");

        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        handle_key_event(ctrl_u, &mut state);
        assert!(state.input.is_empty());
        assert_eq!(handle_key_event(key(KeyCode::Backspace), &mut state), Action::None);
    }

    #[test]
    fn test_enter_respects_gate() {
        let mut state = ViewState::default();
        assert_eq!(handle_key_event(key(KeyCode::Enter), &mut state), Action::None);

        state.can_submit = true;
        assert_eq!(handle_key_event(key(KeyCode::Enter), &mut state), Action::Submit);

        let ctrl_enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_enter, &mut state), Action::Submit);

        state.loading = true;
        assert_eq!(handle_key_event(key(KeyCode::Enter), &mut state), Action::None);
    }

    #[test]
    fn test_tab_switches_panel_and_history_scrolls() {
        let mut state = ViewState::default();
        assert_eq!(handle_key_event(key(KeyCode::Tab), &mut state), Action::NextPanel);
        assert_eq!(state.focus, Panel::History);

        // Letters scroll instead of typing while the history has focus
        assert_eq!(
            handle_key_event(key(KeyCode::Char('j')), &mut state),
            Action::ScrollDown
        );
        assert!(state.input.is_empty());
    }
}
