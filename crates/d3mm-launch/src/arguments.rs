//! Parsed command-line values consumed by the orchestrator.
//!
//! The terminal shell owns the interactive surface; the orchestrator only
//! reads the parsed values. `-h` selects a def file here, so clap's
//! automatic help shorthand is disabled and help hangs off `--help`.

use crate::game_type::GameType;
use clap::Parser;

/// Launch-relevant command-line values.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "duke3d-mod-manager", disable_help_flag = true)]
pub struct LaunchArguments {
    /// Select a mod by search query.
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,

    /// Select a random mod.
    #[arg(short = 'r', long = "random")]
    pub random: bool,

    /// Launch without any mod.
    #[arg(short = 'n', long = "no-mod")]
    pub no_mod: bool,

    /// Explicit group file, repeatable.
    #[arg(short = 'g', long = "group")]
    pub group: Vec<String>,

    /// Explicit con script file.
    #[arg(short = 'x', long = "con")]
    pub con: Option<String>,

    /// Explicit def file.
    #[arg(short = 'h', long = "def")]
    pub def: Option<String>,

    /// User map to load.
    #[arg(long = "map")]
    pub map: Option<String>,

    /// Session type.
    #[arg(short = 't', long = "type", value_enum, default_value_t = GameType::Game)]
    pub game_type: GameType,

    /// Game version override by id or name.
    #[arg(short = 'v', long = "game-version")]
    pub game_version: Option<String>,

    /// Server address for client sessions.
    #[arg(long = "ip")]
    pub ip: Option<String>,

    /// Server port override.
    #[arg(long = "port")]
    pub port: Option<u16>,

    /// Run in local mode; no remote catalog updates or downloads.
    #[arg(long = "local")]
    pub local: bool,

    /// Hash mod files that do not have a hash yet.
    #[arg(long = "hash-new")]
    pub hash_new: bool,

    /// Rehash every mod file.
    #[arg(long = "hash-all")]
    pub hash_all: bool,

    /// Verbose diagnostics.
    #[arg(long = "verbose")]
    pub verbose: bool,

    /// Print help.
    #[arg(long = "help", action = clap::ArgAction::Help)]
    help: Option<bool>,

    /// Arguments after `--` are passed through to the engine untouched.
    #[arg(last = true)]
    pub passthrough: Vec<String>,
}

impl LaunchArguments {
    /// The pass-through arguments as a single engine-ready string.
    pub fn passthrough_string(&self) -> Option<String> {
        if self.passthrough.is_empty() {
            None
        } else {
            Some(self.passthrough.join(" "))
        }
    }

    /// True when explicit group/con/def files override the catalog
    /// selection.
    pub fn has_custom_mod_files(&self) -> bool {
        !self.group.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_documented_surface() {
        let arguments = LaunchArguments::parse_from([
            "duke3d-mod-manager",
            "-s",
            "Duke It Out in D.C.",
            "-t",
            "client",
            "-v",
            "atomic",
            "--ip",
            "198.51.100.7",
            "--port",
            "31337",
            "--local",
            "--verbose",
            "--",
            "/m",
            "/ns",
        ]);

        assert_eq!(arguments.search.as_deref(), Some("Duke It Out in D.C."));
        assert_eq!(arguments.game_type, GameType::Client);
        assert_eq!(arguments.game_version.as_deref(), Some("atomic"));
        assert_eq!(arguments.ip.as_deref(), Some("198.51.100.7"));
        assert_eq!(arguments.port, Some(31337));
        assert!(arguments.local);
        assert!(arguments.verbose);
        assert_eq!(arguments.passthrough_string().as_deref(), Some("/m /ns"));
    }

    #[test]
    fn short_h_selects_a_def_file() {
        let arguments = LaunchArguments::parse_from([
            "duke3d-mod-manager",
            "-g",
            "EXAMPLE.GRP",
            "-g",
            "EXTRA.GRP",
            "-x",
            "GAME.CON",
            "-h",
            "custom.def",
        ]);

        assert_eq!(arguments.group, vec!["EXAMPLE.GRP", "EXTRA.GRP"]);
        assert_eq!(arguments.con.as_deref(), Some("GAME.CON"));
        assert_eq!(arguments.def.as_deref(), Some("custom.def"));
        assert!(arguments.has_custom_mod_files());
    }

    #[test]
    fn defaults_are_inert() {
        let arguments = LaunchArguments::parse_from(["duke3d-mod-manager"]);

        assert_eq!(arguments.game_type, GameType::Game);
        assert!(!arguments.has_custom_mod_files());
        assert!(arguments.passthrough_string().is_none());
        assert!(!arguments.random && !arguments.no_mod);
        assert!(!arguments.hash_new && !arguments.hash_all);
    }
}
