//! Keyboard mapping

/// What a key edge asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start advancing
    MoveBegin,
    /// Stop advancing (eased)
    MoveEnd,
    /// Replace a finished round with a fresh one
    Restart,
}

/// Map a `KeyboardEvent.key` value and its edge to a command
pub fn key_command(key: &str, pressed: bool) -> Option<Command> {
    match (key, pressed) {
        ("ArrowUp", true) => Some(Command::MoveBegin),
        ("ArrowUp", false) => Some(Command::MoveEnd),
        ("Enter" | "r" | "R", true) => Some(Command::Restart),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_key_edges() {
        assert_eq!(key_command("ArrowUp", true), Some(Command::MoveBegin));
        assert_eq!(key_command("ArrowUp", false), Some(Command::MoveEnd));
    }

    #[test]
    fn test_restart_on_press_only() {
        assert_eq!(key_command("Enter", true), Some(Command::Restart));
        assert_eq!(key_command("r", true), Some(Command::Restart));
        assert_eq!(key_command("R", false), None);
    }

    #[test]
    fn test_other_keys_ignored() {
        for key in ["ArrowDown", "ArrowLeft", " ", "w", "Escape"] {
            assert_eq!(key_command(key, true), None);
            assert_eq!(key_command(key, false), None);
        }
    }
}
