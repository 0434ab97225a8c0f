//! Command router: maps events to response templates.

use tracing::{debug, info, warn};
use url::Url;

use super::response::{Action, Delivery, Response};
use super::types::{CallbackTag, Event, EventKind, UserRef, all_commands, referral_link};
use crate::config::GameConfig;

const SHARE_ENDPOINT: &str = "https://t.me/share/url";
const SHARE_TEXT: &str = "🎮 Join me in SECCO Tap Game! Earn crypto by tapping! 🚀";
const SUPPORT_CONTACT: &str = "@secco_support";

/// Turns inbound events into responses.
///
/// Routing is a pure function of the event and the configured links; the
/// caller is responsible for delivering the result.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    game: GameConfig,
}

impl CommandRouter {
    /// Creates a router handing out the given links.
    #[must_use]
    pub const fn new(game: GameConfig) -> Self {
        Self { game }
    }

    /// Routes an event.
    ///
    /// Returns `None` for callback tags the bot never issued.
    pub fn route(&self, event: &Event) -> Option<Response> {
        debug!("Routing {} from user {}", event.kind, event.user.id);

        let response = match &event.kind {
            EventKind::Start { referred_by } => {
                if let Some(referrer) = referred_by {
                    info!("User {} arrived via referral from {}", event.user.id, referrer);
                }
                self.welcome(&event.user)
            }
            EventKind::Game => self.game(),
            EventKind::Stats | EventKind::ButtonPress(CallbackTag::Stats) => self.stats(),
            EventKind::Help | EventKind::ButtonPress(CallbackTag::Help) => self.help(),
            EventKind::ButtonPress(CallbackTag::Referral) => self.referral(event.user.id),
            EventKind::ButtonPress(CallbackTag::Unknown(tag)) => {
                warn!("Ignoring unknown callback tag {:?} from user {}", tag, event.user.id);
                return None;
            }
        };

        Some(response)
    }

    fn play_button(&self, label: &str) -> Action {
        Action::game(label, self.game.web_app_url.clone())
    }

    fn welcome(&self, user: &UserRef) -> Response {
        let name = html_escape::encode_text(&user.display_name);
        let text = format!(
            "🚀 <b>Welcome to SECCO Tap Game, {name}!</b>\n\
             \n\
             💎 The ultimate DeFi mining simulator!\n\
             ⚡ Tap to earn SECCO tokens\n\
             🔥 Upgrade your mining power\n\
             📈 Compete with friends\n\
             \n\
             <b>BlackRock is the past — CoinSecurities begins a new era of investing!</b>\n\
             \n\
             Ready to start mining? 👇"
        );

        Response::new(text)
            .button(self.play_button("🎮 Play SECCO Tap Game"))
            .button(Action::callback("📊 My Stats", CallbackTag::Stats))
            .button(Action::callback("👥 Invite Friends", CallbackTag::Referral))
            .button(Action::callback("ℹ️ Help", CallbackTag::Help))
    }

    fn game(&self) -> Response {
        Response::new(
            "🎮 <b>SECCO Tap Game</b>\n\
             \n\
             Tap the button below to start mining SECCO tokens!",
        )
        .button(self.play_button("🎮 Launch Game"))
    }

    // Placeholder figures; the bot keeps no per-user state.
    fn stats(&self) -> Response {
        Response::new(
            "📊 <b>Your SECCO Mining Stats</b>\n\
             \n\
             💰 <b>Balance:</b> 1,250 SECCO\n\
             🎯 <b>Total Taps:</b> 5,420\n\
             📈 <b>Total Earned:</b> 3,750 SECCO\n\
             ⚡ <b>Mining Power:</b> 15 per tap\n\
             🏆 <b>Level:</b> 8\n\
             👑 <b>Rank:</b> Trader\n\
             \n\
             🔥 <b>Daily Leaderboard:</b> #127\n\
             📅 <b>Days Active:</b> 12",
        )
        .button(self.play_button("🎮 Continue Mining"))
        .button(Action::callback("🔄 Refresh Stats", CallbackTag::Stats))
    }

    fn help(&self) -> Response {
        let mut text = String::from(
            "❓ <b>SECCO Tap Game Help</b>\n\
             \n\
             <b>How to Play:</b>\n\
             🎯 Tap the SECCO logo to earn tokens\n\
             ⚡ Each tap costs 1 energy\n\
             🔋 Energy regenerates over time\n\
             ⬆️ Buy upgrades to earn more per tap\n\
             \n\
             <b>Upgrades Available:</b>\n\
             💎 <b>Enhanced Mining</b> - More tokens per tap\n\
             ⚡ <b>Auto Staking</b> - Passive income per second\n\
             🔋 <b>Energy Boost</b> - Increase max energy\n\
             🚀 <b>DeFi Multiplier</b> - 2x earnings temporarily\n\
             \n\
             <b>Commands:</b>\n",
        );
        text.extend(
            all_commands()
                .into_iter()
                .map(|(name, description)| format!("/{name} - {description}\n")),
        );
        text.push_str("\n<b>Need Support?</b>\nContact: ");
        text.push_str(SUPPORT_CONTACT);

        Response::new(text)
            .button(self.play_button("🎮 Play Now"))
            .button(Action::link("📱 Join Community", self.game.community_url.clone()))
    }

    fn referral(&self, user_id: u64) -> Response {
        let link = referral_link(self.game.bot_link.as_str(), user_id);
        let text = format!(
            "👥 <b>Invite Friends &amp; Earn Bonuses!</b>\n\
             \n\
             🎁 <b>Referral Rewards:</b>\n\
             • Friend joins: +100 SECCO for both\n\
             • Friend reaches level 5: +500 SECCO bonus\n\
             • Friend reaches level 10: +1000 SECCO bonus\n\
             \n\
             📎 <b>Your Referral Link:</b>\n\
             <code>{link}</code>\n\
             \n\
             📊 <b>Your Referral Stats:</b>\n\
             • Friends invited: 5\n\
             • Total bonus earned: 2,300 SECCO\n\
             • Active referrals: 3\n\
             \n\
             Share your link and start earning! 🚀"
        );

        let mut response = Response::new(text);
        match share_url(&link) {
            Ok(share) => response = response.button(Action::link("📤 Share Link", share)),
            Err(e) => warn!("Could not build share link for user {}: {}", user_id, e),
        }

        response
            .button(self.play_button("🎮 Back to Game"))
            .with_delivery(Delivery::EditSource)
    }
}

fn share_url(link: &str) -> Result<Url, url::ParseError> {
    Url::parse_with_params(SHARE_ENDPOINT, &[("url", link), ("text", SHARE_TEXT)])
}
