//! Event handling for the terminal form.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use super::app::{App, Focus};

/// Handle keyboard events.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows terminals also report key releases
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('p') => app.predict(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Down | KeyCode::Tab => app.focus_next(),
        KeyCode::Up | KeyCode::BackTab => app.focus_previous(),
        KeyCode::Enter => match app.focus {
            Focus::PredictButton => app.predict(),
            Focus::Field(_) => app.focus_next(),
        },
        KeyCode::Char('r') => app.reset_field(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }
}

/// Poll for events with a timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tree::{DecisionTree, TreeNode, TreeRegressor};
    use crate::models::PredictorGateway;
    use crate::tui::app::Outcome;

    fn test_app() -> App {
        let tree = DecisionTree {
            nodes: vec![TreeNode::Leaf { value: 45.0 }],
        };
        let model = TreeRegressor::new("constant", 9, vec![tree]).unwrap();
        App::new(
            PredictorGateway::with_model(Box::new(model)),
            Duration::from_secs(5),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_enter_walks_to_predict_button() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('7'));
        for _ in 0..9 {
            press(&mut app, KeyCode::Enter);
        }
        assert_eq!(app.focus, Focus::PredictButton);
        assert!(app.outcome.is_none());

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.outcome, Some(Outcome::Report(_))));
        assert_eq!(app.fields[0], "7");
    }

    #[test]
    fn test_ctrl_p_predicts_from_field() {
        let mut app = test_app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL),
        );
        assert!(matches!(app.outcome, Some(Outcome::Report(_))));
        assert_eq!(app.focus, Focus::Field(0));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = test_app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
