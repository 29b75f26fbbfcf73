//! DOSBox launch scripts and the `$TOKEN$` substitution language.
//!
//! A script is a list of DOSBox shell lines. Before execution each line
//! has its `$KEY$` placeholders replaced from a string-keyed multimap;
//! multi-valued keys join with single spaces, and unknown placeholders
//! are left untouched. Each non-empty substituted line becomes one
//! `-c "<line>"` argument on the DOSBox command, with unescaped double
//! quotes escaped.

use std::io;
use std::path::Path;

/// An ordered, string-keyed multimap of substitution values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptArguments {
    arguments: Vec<(String, Vec<String>)>,
}

impl ScriptArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `key`; repeated keys accumulate values.
    pub fn add_argument(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.arguments.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, values)) => values.push(value),
            None => self.arguments.push((key, vec![value])),
        }
    }

    pub fn has_argument(&self, key: &str) -> bool {
        self.arguments.iter().any(|(existing, _)| existing == key)
    }

    pub fn values(&self, key: &str) -> &[String] {
        self.arguments
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// All values of `key` joined with single spaces.
    pub fn value_string(&self, key: &str) -> Option<String> {
        self.arguments
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, values)| values.join(" "))
    }

    /// Replace every `$KEY$` token in `line`. Unknown keys survive
    /// verbatim, dollars included.
    pub fn apply(&self, line: &str) -> String {
        let mut output = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(start) = rest.find('$') {
            output.push_str(&rest[..start]);
            let after_dollar = &rest[start + 1..];

            match after_dollar.find('$') {
                Some(end) => {
                    let key = &after_dollar[..end];

                    match self.value_string(key) {
                        Some(value) => output.push_str(&value),
                        None => {
                            output.push('$');
                            output.push_str(key);
                            output.push('$');
                        }
                    }

                    rest = &after_dollar[end + 1..];
                }
                None => {
                    output.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        output.push_str(rest);
        output
    }
}

/// Escape every double quote that is not already backslash-escaped.
pub fn escape_unescaped_quotes(line: &str) -> String {
    let mut output = String::with_capacity(line.len());
    let mut previous: Option<char> = None;

    for character in line.chars() {
        if character == '"' && previous != Some('\\') {
            output.push('\\');
        }

        output.push(character);
        previous = Some(character);
    }

    output
}

/// One DOSBox script: its lines, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text
                .lines()
                .map(|line| line.trim_end_matches('\r').to_string())
                .collect(),
        }
    }

    pub fn load_from(path: &Path) -> io::Result<Self> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

// ----------------------------------------------------------------------
// Built-in script templates
// ----------------------------------------------------------------------

/// Script template for a plain game session.
pub const DEFAULT_GAME_SCRIPT: &str = "\
mount c $GAMEPATH$
c:
$COMMAND$
exit
";

/// Script template for the engine's setup program.
pub const DEFAULT_SETUP_SCRIPT: &str = "\
mount c $GAMEPATH$
c:
$COMMAND$
exit
";

/// Script template for a network client session.
pub const DEFAULT_CLIENT_SCRIPT: &str = "\
mount c $GAMEPATH$
c:
config -set ipx true
ipxnet connect $IP$ $PORT$
$COMMAND$
exit
";

/// Script template for a network server session.
pub const DEFAULT_SERVER_SCRIPT: &str = "\
mount c $GAMEPATH$
c:
config -set ipx true
ipxnet startserver $PORT$
$COMMAND$
exit
";

/// Write any missing built-in script template into the DOSBox data
/// directory. Existing files are never overwritten.
pub fn ensure_default_scripts(settings: &crate::Settings) -> io::Result<()> {
    let directory = settings.dosbox_data_directory_path();
    std::fs::create_dir_all(&directory)?;

    let scripts = [
        (&settings.dosbox_game_script_file_name, DEFAULT_GAME_SCRIPT),
        (&settings.dosbox_setup_script_file_name, DEFAULT_SETUP_SCRIPT),
        (&settings.dosbox_client_script_file_name, DEFAULT_CLIENT_SCRIPT),
        (&settings.dosbox_server_script_file_name, DEFAULT_SERVER_SCRIPT),
    ];

    for (file_name, template) in scripts {
        let path = directory.join(file_name);

        if !path.exists() {
            std::fs::write(&path, template)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_valued_keys_join_with_spaces() {
        let mut arguments = ScriptArguments::new();
        arguments.add_argument("GROUP", "EXAMPLE.GRP");
        arguments.add_argument("GROUP", "EXTRA.GRP");

        assert_eq!(
            arguments.value_string("GROUP").as_deref(),
            Some("EXAMPLE.GRP EXTRA.GRP")
        );
        assert_eq!(arguments.values("GROUP").len(), 2);
    }

    #[test]
    fn substitution_replaces_known_and_keeps_unknown() {
        let mut arguments = ScriptArguments::new();
        arguments.add_argument("GAMEPATH", "/games/duke3d");

        assert_eq!(
            arguments.apply("mount c $GAMEPATH$"),
            "mount c /games/duke3d"
        );
        assert_eq!(arguments.apply("echo $UNSET$"), "echo $UNSET$");
        assert_eq!(arguments.apply("lone $dollar"), "lone $dollar");
        assert_eq!(arguments.apply("no tokens"), "no tokens");
    }

    #[test]
    fn substitution_handles_adjacent_tokens() {
        let mut arguments = ScriptArguments::new();
        arguments.add_argument("A", "one");
        arguments.add_argument("B", "two");

        assert_eq!(arguments.apply("$A$$B$"), "onetwo");
    }

    #[test]
    fn quote_escaping_skips_already_escaped() {
        assert_eq!(escape_unescaped_quotes(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_unescaped_quotes(r#"say \"hi\""#), r#"say \"hi\""#);
        assert_eq!(escape_unescaped_quotes(r#""lead"#), r#"\"lead"#);
        assert_eq!(escape_unescaped_quotes("none"), "none");
    }

    #[test]
    fn script_lines_preserve_order() {
        let script = Script::parse("mount c $GAMEPATH$\r\nc:\n$COMMAND$\nexit\n");
        assert_eq!(
            script.lines(),
            ["mount c $GAMEPATH$", "c:", "$COMMAND$", "exit"]
        );
    }

    #[test]
    fn ensure_writes_missing_templates_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = crate::Settings::default();
        settings.data_directory_path = dir.path().to_path_buf();

        ensure_default_scripts(&settings).unwrap();

        let game_script = settings
            .dosbox_data_directory_path()
            .join(&settings.dosbox_game_script_file_name);
        assert!(game_script.is_file());

        // A customized script survives a second ensure pass.
        std::fs::write(&game_script, "custom").unwrap();
        ensure_default_scripts(&settings).unwrap();
        assert_eq!(std::fs::read_to_string(&game_script).unwrap(), "custom");
    }
}
