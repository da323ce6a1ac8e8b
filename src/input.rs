/// Player commands a single input byte can map to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Fire,
}

pub struct InputDispatcher;

impl InputDispatcher {
    /// WASD in either case moves, space fires. Everything else is ignored.
    pub fn command_for(byte: u8) -> Option<Command> {
        match byte {
            b'a' | b'A' => Some(Command::MoveLeft),
            b'd' | b'D' => Some(Command::MoveRight),
            b'w' | b'W' => Some(Command::MoveUp),
            b's' | b'S' => Some(Command::MoveDown),
            b' ' => Some(Command::Fire),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_cases_map_to_movement() {
        for (lower, command) in [
            (b'a', Command::MoveLeft),
            (b'd', Command::MoveRight),
            (b'w', Command::MoveUp),
            (b's', Command::MoveDown),
        ] {
            assert_eq!(InputDispatcher::command_for(lower), Some(command));
            assert_eq!(
                InputDispatcher::command_for(lower.to_ascii_uppercase()),
                Some(command)
            );
        }
        assert_eq!(InputDispatcher::command_for(b' '), Some(Command::Fire));
    }

    #[test]
    fn other_bytes_are_ignored() {
        for byte in [b'q', b'\r', b'x', 0u8, 0xff] {
            assert_eq!(InputDispatcher::command_for(byte), None);
        }
    }
}
