//! Offline preview of the bot's responses.
//!
//! Renders what the bot would answer to a command or button press, without
//! a Telegram connection, so message copy and keyboards can be reviewed.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use secco_tap_bot::commands::{
    ActionKind, CallbackTag, CommandRouter, Event, EventKind, Response, UserRef,
};
use secco_tap_bot::config::GameConfig;

/// Event to preview.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preview {
    Start,
    Game,
    Stats,
    Help,
    Referral,
    /// Every event above, in order.
    All,
}

/// Response previewer.
#[derive(Parser, Debug)]
#[command(name = "preview_responses")]
#[command(about = "Prints the SECCO Tap Bot responses without connecting to Telegram")]
#[command(version)]
struct Args {
    /// Which response to render.
    #[arg(value_enum, default_value = "all")]
    event: Preview,

    /// Raw callback data to simulate instead of a named event.
    #[arg(long, conflicts_with = "event")]
    callback: Option<String>,

    /// Game web app URL (falls back to GAME_WEB_APP_URL).
    #[arg(long, env = "GAME_WEB_APP_URL")]
    web_app_url: String,

    /// Community link (falls back to COMMUNITY_URL, then the default).
    #[arg(long, env = "COMMUNITY_URL")]
    community_url: Option<String>,

    /// Public bot link (falls back to BOT_LINK, then the default).
    #[arg(long, env = "BOT_LINK")]
    bot_link: Option<String>,

    /// Simulated user id.
    #[arg(long, default_value_t = 42)]
    user_id: u64,

    /// Simulated display name.
    #[arg(long, default_value = "Ada")]
    name: String,

    /// Print responses as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env is fine; values can come from flags.
        if !e.not_found() {
            eprintln!("⚠ Could not load .env: {e}");
        }
    }

    let args = Args::parse();

    let game = match GameConfig::from_values(
        &args.web_app_url,
        args.community_url.as_deref(),
        args.bot_link.as_deref(),
    ) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("✗ Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let router = CommandRouter::new(game);
    let user = UserRef::new(args.user_id, args.name.clone());

    let kinds = match &args.callback {
        Some(data) => vec![EventKind::ButtonPress(CallbackTag::parse(data))],
        None => event_kinds(args.event),
    };

    for kind in kinds {
        let event = Event::new(user.clone(), kind);
        let response = router.route(&event);

        if args.json {
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("✗ Failed to serialize response: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            print_text(&event.kind, response.as_ref());
        }
    }

    ExitCode::SUCCESS
}

fn event_kinds(preview: Preview) -> Vec<EventKind> {
    match preview {
        Preview::Start => vec![EventKind::Start { referred_by: None }],
        Preview::Game => vec![EventKind::Game],
        Preview::Stats => vec![EventKind::Stats],
        Preview::Help => vec![EventKind::Help],
        Preview::Referral => vec![EventKind::ButtonPress(CallbackTag::Referral)],
        Preview::All => [
            Preview::Start,
            Preview::Game,
            Preview::Stats,
            Preview::Help,
            Preview::Referral,
        ]
        .into_iter()
        .flat_map(event_kinds)
        .collect(),
    }
}

fn print_text(kind: &EventKind, response: Option<&Response>) {
    println!("=== {kind} ===");

    let Some(response) = response else {
        println!("(no response)\n");
        return;
    };

    println!("{}\n", response.text);
    for (i, row) in response.rows.iter().enumerate() {
        for action in row {
            let target = match &action.kind {
                ActionKind::OpenExternalLink { url } => format!("link {url}"),
                ActionKind::InvokeCallback { tag } => format!("callback \"{tag}\""),
                ActionKind::OpenGameSurface { url } => format!("web app {url}"),
            };
            println!("  [{}] {} → {}", i + 1, action.label, target);
        }
    }
    println!("  delivery: {:?}\n", response.delivery);
}
