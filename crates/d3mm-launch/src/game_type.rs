//! How the engine is being started.

/// Which flavor of session a launch produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GameType {
    /// Single-player game session.
    #[default]
    Game,
    /// The engine's setup executable.
    Setup,
    /// Network client connecting to a remote server.
    Client,
    /// Network server hosting a game.
    Server,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Game => "Game",
            GameType::Setup => "Setup",
            GameType::Client => "Client",
            GameType::Server => "Server",
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            value if value.eq_ignore_ascii_case("game") => Ok(GameType::Game),
            value if value.eq_ignore_ascii_case("setup") => Ok(GameType::Setup),
            value if value.eq_ignore_ascii_case("client") => Ok(GameType::Client),
            value if value.eq_ignore_ascii_case("server") => Ok(GameType::Server),
            _ => Err(format!("unknown game type '{value}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case() {
        assert_eq!("SETUP".parse::<GameType>().unwrap(), GameType::Setup);
        assert_eq!("client".parse::<GameType>().unwrap(), GameType::Client);
        assert!("spectator".parse::<GameType>().is_err());
    }

    #[test]
    fn display_round_trip() {
        for game_type in [GameType::Game, GameType::Setup, GameType::Client, GameType::Server] {
            assert_eq!(game_type.to_string().parse::<GameType>().unwrap(), game_type);
        }
    }
}
