//! Event types and parsing.

use std::fmt;

/// Prefix of the deep-link payload carried by referral links.
pub const REFERRAL_PREFIX: &str = "ref_";

/// The user an event came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    /// Opaque platform user identifier.
    pub id: u64,

    /// Name to address the user by.
    pub display_name: String,
}

impl UserRef {
    /// Creates a new user reference.
    #[must_use]
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// Tags carried by inline callback buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackTag {
    /// Show (or refresh) the stats screen.
    Stats,

    /// Show the help screen.
    Help,

    /// Show the referral screen.
    Referral,

    /// Anything the bot never issued.
    Unknown(String),
}

impl CallbackTag {
    /// Parses raw callback data.
    #[must_use]
    pub fn parse(data: &str) -> Self {
        match data {
            "stats" => Self::Stats,
            "help" => Self::Help,
            "referral" => Self::Referral,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Returns the callback data sent with the button.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stats => "stats",
            Self::Help => "help",
            Self::Referral => "referral",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for CallbackTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/start`, optionally with the referrer decoded from a `ref_<id>` payload.
    Start { referred_by: Option<u64> },

    /// `/game`
    Game,

    /// `/stats`
    Stats,

    /// `/help`
    Help,

    /// An inline callback button was pressed.
    ButtonPress(CallbackTag),
}

impl EventKind {
    /// Parses a slash command from a message text.
    ///
    /// Accepts an optional `@botname` suffix and is case-insensitive.
    /// Returns `None` if the message is not a known command.
    #[must_use]
    pub fn parse_command(text: &str) -> Option<Self> {
        let text = text.trim();
        let after_slash = text.strip_prefix('/')?;

        let (cmd, args) = match after_slash.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (after_slash, ""),
        };

        // "/start@secco_tap_bot" in group chats
        let cmd = cmd.split_once('@').map_or(cmd, |(name, _)| name);

        match cmd.to_lowercase().as_str() {
            "start" => Some(Self::Start {
                referred_by: args
                    .split_whitespace()
                    .next()
                    .and_then(parse_referral_payload),
            }),
            "game" => Some(Self::Game),
            "stats" => Some(Self::Stats),
            "help" => Some(Self::Help),
            _ => None,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Start { .. } => "start",
            Self::Game => "game",
            Self::Stats => "stats",
            Self::Help => "help",
            Self::ButtonPress(tag) => tag.as_str(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start {
                referred_by: Some(id),
            } => write!(f, "/start {REFERRAL_PREFIX}{id}"),
            Self::ButtonPress(tag) => write!(f, "button:{tag}"),
            other => write!(f, "/{}", other.name()),
        }
    }
}

/// A normalized inbound user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Who sent it.
    pub user: UserRef,

    /// What they did.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub const fn new(user: UserRef, kind: EventKind) -> Self {
        Self { user, kind }
    }
}

/// Builds the referral deep link for a user: `<bot_link>?start=ref_<id>`.
#[must_use]
pub fn referral_link(bot_link: &str, user_id: u64) -> String {
    format!("{bot_link}?start={REFERRAL_PREFIX}{user_id}")
}

/// Decodes a `ref_<id>` deep-link payload.
#[must_use]
pub fn parse_referral_payload(payload: &str) -> Option<u64> {
    let id = payload.strip_prefix(REFERRAL_PREFIX)?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// Commands shown in the platform menu and in the help text.
#[must_use]
pub const fn all_commands() -> [(&'static str, &'static str); 4] {
    [
        ("start", "Welcome message"),
        ("game", "Launch the game"),
        ("stats", "View your statistics"),
        ("help", "Show this help"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(EventKind::parse_command("/game"), Some(EventKind::Game));
        assert_eq!(EventKind::parse_command("/stats"), Some(EventKind::Stats));
        assert_eq!(EventKind::parse_command("/help"), Some(EventKind::Help));
        assert_eq!(
            EventKind::parse_command("/start"),
            Some(EventKind::Start { referred_by: None })
        );
    }

    #[test]
    fn test_parse_with_bot_suffix() {
        assert_eq!(
            EventKind::parse_command("/stats@secco_tap_bot"),
            Some(EventKind::Stats)
        );
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(EventKind::parse_command("/HELP"), Some(EventKind::Help));
        assert_eq!(EventKind::parse_command("/Game"), Some(EventKind::Game));
    }

    #[test]
    fn test_parse_with_extra_whitespace() {
        assert_eq!(EventKind::parse_command("  /game  "), Some(EventKind::Game));
    }

    #[test]
    fn test_parse_start_with_referral() {
        assert_eq!(
            EventKind::parse_command("/start ref_42"),
            Some(EventKind::Start {
                referred_by: Some(42)
            })
        );
    }

    #[test]
    fn test_parse_start_with_other_payload() {
        assert_eq!(
            EventKind::parse_command("/start promo"),
            Some(EventKind::Start { referred_by: None })
        );
        assert_eq!(
            EventKind::parse_command("/start ref_abc"),
            Some(EventKind::Start { referred_by: None })
        );
    }

    #[test]
    fn test_parse_not_a_command() {
        assert_eq!(EventKind::parse_command("hello"), None);
        assert_eq!(EventKind::parse_command("/unknown"), None);
        assert_eq!(EventKind::parse_command(""), None);
        assert_eq!(EventKind::parse_command("/"), None);
    }

    #[test]
    fn test_callback_tag_parse() {
        assert_eq!(CallbackTag::parse("stats"), CallbackTag::Stats);
        assert_eq!(CallbackTag::parse("help"), CallbackTag::Help);
        assert_eq!(CallbackTag::parse("referral"), CallbackTag::Referral);
        assert_eq!(
            CallbackTag::parse("unknown_tag"),
            CallbackTag::Unknown("unknown_tag".to_owned())
        );
    }

    #[test]
    fn test_callback_tag_as_str() {
        for tag in [CallbackTag::Stats, CallbackTag::Help, CallbackTag::Referral] {
            assert_eq!(CallbackTag::parse(tag.as_str()), tag);
        }
    }

    #[test]
    fn test_referral_link_format() {
        assert_eq!(
            referral_link("https://t.me/secco_tap_bot", 42),
            "https://t.me/secco_tap_bot?start=ref_42"
        );
    }

    #[test]
    fn test_parse_referral_payload() {
        assert_eq!(parse_referral_payload("ref_42"), Some(42));
        assert_eq!(parse_referral_payload("ref_"), None);
        assert_eq!(parse_referral_payload("42"), None);
        assert_eq!(parse_referral_payload("ref_-1"), None);
        assert_eq!(parse_referral_payload("ref_+42"), None);
        assert_eq!(parse_referral_payload("ref_ 42"), None);
    }

    #[test]
    fn test_referral_payload_reverses_link() {
        for id in [0, 42, u64::MAX] {
            let link = referral_link("https://t.me/secco_tap_bot", id);
            let (_, payload) = link.split_once("?start=").unwrap();
            assert_eq!(parse_referral_payload(payload), Some(id));
        }
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::Game.to_string(), "/game");
        assert_eq!(
            EventKind::Start {
                referred_by: Some(7)
            }
            .to_string(),
            "/start ref_7"
        );
        assert_eq!(
            EventKind::ButtonPress(CallbackTag::Referral).to_string(),
            "button:referral"
        );
    }
}
