use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    RotateLeft,
    RotateRight,
    ZoomIn,
    ZoomOut,
    /// Zero-based catalog position.
    SelectIndex(usize),
    Quit,
}

pub fn key_action(key: PhysicalKey) -> Option<KeyAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let action = match code {
        KeyCode::Escape => KeyAction::Quit,
        KeyCode::ArrowLeft => KeyAction::RotateLeft,
        KeyCode::ArrowRight => KeyAction::RotateRight,
        KeyCode::Equal | KeyCode::NumpadAdd | KeyCode::ArrowUp => KeyAction::ZoomIn,
        KeyCode::Minus | KeyCode::NumpadSubtract | KeyCode::ArrowDown => KeyAction::ZoomOut,
        KeyCode::Digit1 => KeyAction::SelectIndex(0),
        KeyCode::Digit2 => KeyAction::SelectIndex(1),
        KeyCode::Digit3 => KeyAction::SelectIndex(2),
        KeyCode::Digit4 => KeyAction::SelectIndex(3),
        KeyCode::Digit5 => KeyAction::SelectIndex(4),
        KeyCode::Digit6 => KeyAction::SelectIndex(5),
        KeyCode::Digit7 => KeyAction::SelectIndex(6),
        KeyCode::Digit8 => KeyAction::SelectIndex(7),
        KeyCode::Digit9 => KeyAction::SelectIndex(8),
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::{key_action, KeyAction};
    use winit::keyboard::{KeyCode, NativeKeyCode, PhysicalKey};

    #[test]
    fn arrows_and_digits_map_to_actions() {
        assert_eq!(
            key_action(PhysicalKey::Code(KeyCode::ArrowLeft)),
            Some(KeyAction::RotateLeft)
        );
        assert_eq!(
            key_action(PhysicalKey::Code(KeyCode::Minus)),
            Some(KeyAction::ZoomOut)
        );
        assert_eq!(
            key_action(PhysicalKey::Code(KeyCode::Digit3)),
            Some(KeyAction::SelectIndex(2))
        );
        assert_eq!(key_action(PhysicalKey::Code(KeyCode::KeyQ)), None);
        assert_eq!(
            key_action(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            None
        );
    }
}
