use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// One parsed command line: positional args, bare `--flags`, and
/// `--key=value` options (last write wins per key).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub args: Vec<String>,
    pub flags: Vec<String>,
    pub options: HashMap<String, String>,
}

// Alternatives, longest match first per position:
//   --name="value with spaces" | --name=value  -> option
//   --name                                     -> flag
//   "quoted phrase"                            -> one arg, quotes stripped
//   anything-non-space                         -> one arg
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"--(\w+)(="(.*?)"|=(\S+))?|"(.*?)"|(\S+)"#).expect("token regex")
});

/// Tokenize a raw command line in a single regex sweep.
///
/// Best effort: characters that match no alternative are skipped silently,
/// and malformed sequences degrade to plain tokens rather than erroring.
/// Empty input yields an empty `ParsedCommand`.
pub fn tokenize(line: &str) -> ParsedCommand {
    let mut parsed = ParsedCommand::default();

    for caps in TOKEN_RE.captures_iter(line) {
        if let Some(arg) = caps.get(6).or_else(|| caps.get(5)) {
            parsed.args.push(arg.as_str().to_string());
        } else if let Some(name) = caps.get(1) {
            if caps.get(2).is_none() {
                parsed.flags.push(name.as_str().to_string());
            } else {
                let value = caps
                    .get(3)
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                parsed
                    .options
                    .insert(name.as_str().to_string(), value.to_string());
            }
        }
    }

    parsed
}

/// Split a prefixed message into `(command word, parsed remainder)`.
///
/// Returns `None` when the message does not carry the prefix or holds nothing
/// after it. The command word keeps its original casing; the dispatcher
/// normalizes on lookup.
pub fn split_command(content: &str, prefix: &str) -> Option<(String, ParsedCommand)> {
    let rest = content.strip_prefix(prefix)?.trim();
    let mut words = rest.splitn(2, char::is_whitespace);

    let command = words.next().unwrap_or("");
    if command.is_empty() {
        return None;
    }

    Some((command.to_string(), tokenize(words.next().unwrap_or(""))))
}
