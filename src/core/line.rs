//! # Line Parser
//!
//! Turns one raw line of the backend's `out` file into a [`Message`].
//!
//! ```text
//! 2024-01-01 10:00:00 <alice> hello world
//! └──date──┘ └─time─┘ └nick─┘ └──body───┘
//! ```
//!
//! The first three fields are whitespace-delimited tokens. The body is
//! everything after the single separator that follows the nick, kept verbatim
//! (embedded and leading whitespace included). A line without a nick token is
//! malformed and yields `None`; a line without a body yields an empty body.

/// Marker shown in the nick column for action-style messages.
pub const ACTION_NICK: &str = "*";

/// Prefix the backend writes in front of action bodies (CTCP `ACTION`).
pub const DEFAULT_ACTION_PREFIX: &str = "\u{1}ACTION ";

/// One parsed transcript record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub date: String,
    pub time: String,
    pub nick: String,
    pub body: String,
}

/// Parser settings that depend on the backend's wire convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    /// Sentinel that opens an action body. Its first character is also the
    /// trailing delimiter stripped from the end of the body.
    pub action_prefix: String,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self {
            action_prefix: DEFAULT_ACTION_PREFIX.to_string(),
        }
    }
}

impl LineFormat {
    pub fn new(action_prefix: impl Into<String>) -> Self {
        Self {
            action_prefix: action_prefix.into(),
        }
    }

    /// Parse a single line. Trailing `\n` / `\r\n` is tolerated.
    pub fn parse(&self, raw: &str) -> Option<Message> {
        let line = raw.trim_end_matches(['\n', '\r']);

        let (date, rest) = next_token(line)?;
        let (time, rest) = next_token(rest)?;
        let (nick, rest) = next_token(rest)?;
        // Exactly one separator is consumed after the nick.
        let body = rest
            .strip_prefix([' ', '\t'])
            .unwrap_or(rest);

        let nick = strip_brackets(nick);

        if let Some(action) = self.strip_action(body) {
            return Some(Message {
                date: date.to_string(),
                time: time.to_string(),
                nick: ACTION_NICK.to_string(),
                body: format!("{nick} {action}"),
            });
        }

        Some(Message {
            date: date.to_string(),
            time: time.to_string(),
            nick: nick.to_string(),
            body: body.to_string(),
        })
    }

    fn strip_action<'a>(&self, body: &'a str) -> Option<&'a str> {
        if self.action_prefix.is_empty() {
            return None;
        }
        let inner = body.strip_prefix(self.action_prefix.as_str())?;
        let delimiter = self.action_prefix.chars().next()?;
        Some(inner.strip_suffix(delimiter).unwrap_or(inner))
    }
}

/// Parse with the default action sentinel.
pub fn parse_line(raw: &str) -> Option<Message> {
    LineFormat::default().parse(raw)
}

/// Strip exactly one leading `<` and one trailing `>` when both are present.
pub fn strip_brackets(nick: &str) -> &str {
    nick.strip_prefix('<')
        .and_then(|n| n.strip_suffix('>'))
        .unwrap_or(nick)
}

/// Split off the next whitespace-delimited token, skipping leading runs of
/// separators. Returns the token and the text right after it.
fn next_token(text: &str) -> Option<(&str, &str)> {
    let start = text.trim_start_matches([' ', '\t']);
    if start.is_empty() {
        return None;
    }
    match start.find([' ', '\t']) {
        Some(end) => Some((&start[..end], &start[end..])),
        None => Some((start, "")),
    }
}
