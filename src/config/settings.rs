//! Application settings and Telegram configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default public link of the bot, used to build referral deep links.
pub const DEFAULT_BOT_LINK: &str = "https://t.me/secco_tap_bot";

/// Default community channel shown on the help screen.
pub const DEFAULT_COMMUNITY_URL: &str = "https://t.me/secco_community";

/// Telegram Bot API configuration.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token issued by `@BotFather`.
    pub bot_token: String,
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub fn new(bot_token: String) -> Self {
        Self { bot_token }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `TG_BOT_TOKEN` to be set.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(std::env::var("TG_BOT_TOKEN").ok().as_deref())
    }

    /// Builds the configuration from the raw `TG_BOT_TOKEN` value.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing or blank.
    pub fn from_value(bot_token: Option<&str>) -> Result<Self, ConfigError> {
        let bot_token = bot_token
            .ok_or(ConfigError::MissingEnvVar("TG_BOT_TOKEN"))?
            .trim();

        if bot_token.is_empty() {
            return Err(ConfigError::EmptyToken);
        }

        Ok(Self::new(bot_token.to_owned()))
    }
}

// The token must never reach the logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .finish()
    }
}

/// Links the bot hands out in its responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Deployed game web app, opened as an embedded Web App.
    pub web_app_url: Url,

    /// Community channel linked from the help screen.
    pub community_url: Url,

    /// Public bot link; referral links are `<bot_link>?start=ref_<id>`.
    pub bot_link: Url,
}

impl GameConfig {
    /// Creates game configuration from environment variables.
    ///
    /// `GAME_WEB_APP_URL` is required; `COMMUNITY_URL` and `BOT_LINK` fall
    /// back to the public SECCO links.
    ///
    /// # Errors
    ///
    /// Returns an error if the web app URL is missing or any URL is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_optional_values(
            std::env::var("GAME_WEB_APP_URL").ok().as_deref(),
            std::env::var("COMMUNITY_URL").ok().as_deref(),
            std::env::var("BOT_LINK").ok().as_deref(),
        )
    }

    /// Like [`GameConfig::from_values`], but the web app URL may be absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the web app URL is missing or any URL is invalid.
    pub fn from_optional_values(
        web_app_url: Option<&str>,
        community_url: Option<&str>,
        bot_link: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let web_app_url = web_app_url.ok_or(ConfigError::MissingEnvVar("GAME_WEB_APP_URL"))?;
        Self::from_values(web_app_url, community_url, bot_link)
    }

    /// Builds the configuration from raw values, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if any URL is invalid, the web app is not HTTPS, or
    /// the bot link cannot take a `?start=` parameter.
    pub fn from_values(
        web_app_url: &str,
        community_url: Option<&str>,
        bot_link: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let web_app_url = parse_url("GAME_WEB_APP_URL", web_app_url)?;
        // Telegram only opens Web Apps over HTTPS.
        if web_app_url.scheme() != "https" {
            return Err(ConfigError::InsecureWebApp(web_app_url.to_string()));
        }

        Ok(Self {
            web_app_url,
            community_url: parse_url(
                "COMMUNITY_URL",
                community_url.unwrap_or(DEFAULT_COMMUNITY_URL),
            )?,
            bot_link: parse_bot_link(bot_link.unwrap_or(DEFAULT_BOT_LINK))?,
        })
    }
}

/// Parses the public bot link, dropping a trailing `/`.
///
/// The link must be a bare `https://t.me/<bot>`-style address so that
/// appending `?start=ref_<id>` yields a valid deep link.
fn parse_bot_link(value: &str) -> Result<Url, ConfigError> {
    let mut link = parse_url("BOT_LINK", value)?;
    let invalid = |reason| ConfigError::InvalidBotLink {
        link: value.trim().to_owned(),
        reason,
    };

    if link.query().is_some() {
        return Err(invalid("must not carry a query"));
    }
    if link.fragment().is_some() {
        return Err(invalid("must not carry a fragment"));
    }

    let path = link.path().trim_end_matches('/').to_owned();
    if path.is_empty() {
        return Err(invalid("must name the bot in its path"));
    }
    link.set_path(&path);

    Ok(link)
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Whether to register the command menu with Telegram on startup.
    #[serde(default = "default_register_commands")]
    pub register_commands: bool,
}

fn default_register_commands() -> bool {
    true
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            register_commands: default_register_commands(),
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            register_commands: std::env::var("REGISTER_COMMANDS")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or_else(default_register_commands),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_url(var: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { var, source })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("TG_BOT_TOKEN is set but empty")]
    EmptyToken,

    #[error("Invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },

    #[error("Game web app must be served over https: {0}")]
    InsecureWebApp(String),

    #[error("BOT_LINK {link} {reason}")]
    InvalidBotLink { link: String, reason: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_URL: &str = "https://dmitrycoinsec.github.io/secco-tap-game/";

    #[test]
    fn test_default_settings() {
        let settings = BotSettings::default();
        assert!(settings.register_commands);
    }

    #[test]
    fn test_game_config_defaults() {
        let config = GameConfig::from_values(GAME_URL, None, None).unwrap();
        assert_eq!(config.web_app_url.as_str(), GAME_URL);
        assert_eq!(config.community_url.as_str(), DEFAULT_COMMUNITY_URL);
        assert_eq!(config.bot_link.as_str(), DEFAULT_BOT_LINK);
    }

    #[test]
    fn test_game_config_overrides() {
        let config = GameConfig::from_values(
            GAME_URL,
            Some("https://t.me/other_channel"),
            Some("https://t.me/other_bot"),
        )
        .unwrap();
        assert_eq!(config.community_url.as_str(), "https://t.me/other_channel");
        assert_eq!(config.bot_link.as_str(), "https://t.me/other_bot");
    }

    #[test]
    fn test_game_config_invalid_url() {
        let err = GameConfig::from_values("not a url", None, None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUrl {
                var: "GAME_WEB_APP_URL",
                ..
            }
        ));
    }

    #[test]
    fn test_game_config_rejects_plain_http() {
        let err = GameConfig::from_values("http://example.com/game", None, None).unwrap_err();
        assert!(matches!(err, ConfigError::InsecureWebApp(_)));
    }

    #[test]
    fn test_game_config_trims_bot_link_slash() {
        let config =
            GameConfig::from_values(GAME_URL, None, Some("https://t.me/secco_tap_bot/")).unwrap();
        assert_eq!(config.bot_link.as_str(), "https://t.me/secco_tap_bot");
    }

    #[test]
    fn test_game_config_rejects_malformed_bot_link() {
        for link in [
            "https://t.me/secco_tap_bot?x=1&y=2",
            "https://t.me/secco_tap_bot#top",
            "https://t.me",
            "https://t.me/",
        ] {
            let err = GameConfig::from_values(GAME_URL, None, Some(link)).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidBotLink { .. }),
                "{link} should be rejected, got {err}"
            );
        }
    }

    #[test]
    fn test_game_config_missing_web_app() {
        let err = GameConfig::from_optional_values(None, None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("GAME_WEB_APP_URL")));
    }

    #[test]
    fn test_game_config_optional_values_present() {
        let config = GameConfig::from_optional_values(Some(GAME_URL), None, None).unwrap();
        assert_eq!(config.web_app_url.as_str(), GAME_URL);
    }

    #[test]
    fn test_telegram_config_missing_token() {
        let err = TelegramConfig::from_value(None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar("TG_BOT_TOKEN")));
    }

    #[test]
    fn test_telegram_config_blank_token() {
        let err = TelegramConfig::from_value(Some("   ")).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyToken));
    }

    #[test]
    fn test_telegram_config_trims_token() {
        let config = TelegramConfig::from_value(Some(" 123:abc \n")).unwrap();
        assert_eq!(config.bot_token, "123:abc");
    }

    #[test]
    fn test_telegram_config_debug_redacts_token() {
        let config = TelegramConfig::new("123:secret".to_owned());
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" OFF "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
