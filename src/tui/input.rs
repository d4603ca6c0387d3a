use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::picker::Picker;

/// Blocks for the next key press. Returns `true` once the picker is finished.
pub fn handle_events(picker: &mut Picker) -> std::io::Result<bool> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            handle_key_event(picker, key);
        }
    }
    Ok(picker.is_finished())
}

pub fn handle_key_event(picker: &mut Picker, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        picker.cancel();
        return;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => picker.move_up(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => picker.move_down(),
        KeyCode::Home | KeyCode::Char('g') => picker.move_first(),
        KeyCode::End | KeyCode::Char('G') => picker.move_last(),
        KeyCode::Enter => picker.confirm(),
        KeyCode::Esc | KeyCode::Char('q') => picker.cancel(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(picker: &mut Picker, code: KeyCode) {
        handle_key_event(picker, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn picker() -> Picker {
        Picker::new("Choose", vec!["a".into(), "b".into(), "c".into()])
    }

    #[test]
    fn test_arrow_keys_and_enter() {
        let mut picker = picker();
        press(&mut picker, KeyCode::Down);
        press(&mut picker, KeyCode::Down);
        press(&mut picker, KeyCode::Up);
        press(&mut picker, KeyCode::Enter);
        assert_eq!(picker.chosen(), Some(1));
    }

    #[test]
    fn test_vim_keys() {
        let mut picker = picker();
        press(&mut picker, KeyCode::Char('G'));
        assert_eq!(picker.selected, 2);
        press(&mut picker, KeyCode::Char('k'));
        assert_eq!(picker.selected, 1);
        press(&mut picker, KeyCode::Char('g'));
        assert_eq!(picker.selected, 0);
    }

    #[test]
    fn test_escape_cancels() {
        let mut picker = picker();
        press(&mut picker, KeyCode::Esc);
        assert!(picker.is_finished());
        assert_eq!(picker.chosen(), None);
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let mut picker = picker();
        handle_key_event(
            &mut picker,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(picker.is_finished());
        assert_eq!(picker.chosen(), None);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut picker = picker();
        press(&mut picker, KeyCode::Char('x'));
        assert!(!picker.is_finished());
        assert_eq!(picker.selected, 0);
    }
}
