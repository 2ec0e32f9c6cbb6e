use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const SOCKET_PATH: &str = "/tmp/vloader.sock";

/// Line-based commands accepted by the loader's control socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Command {
    Start,
    Stop,
    Toggle,
    #[strum(to_string = "slower", serialize = "slow-down")]
    Slower,
    #[strum(to_string = "faster", serialize = "speed-up")]
    Faster,
    Status,
}

impl Command {
    /// Whether the server answers this command with a line.
    pub fn expects_reply(&self) -> bool {
        matches!(self, Self::Status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_command_parsing() {
        let cases = vec![
            ("start", Command::Start),
            ("STOP", Command::Stop),
            ("Toggle", Command::Toggle),
            ("slower", Command::Slower),
            ("slow-down", Command::Slower),
            ("speed-up", Command::Faster),
            ("status", Command::Status),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>().unwrap(), expected);
        }
        assert!("jump".parse::<Command>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for command in Command::iter() {
            assert_eq!(command.to_string().parse::<Command>().unwrap(), command);
        }
    }
}
