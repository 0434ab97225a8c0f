//! Rendering of response keyboards as Telegram inline markup.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};

use crate::commands::{Action, ActionKind, Response};

/// Builds the inline keyboard for a response, one markup row per action row.
pub fn keyboard(response: &Response) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        response
            .rows
            .iter()
            .map(|row| row.iter().map(button).collect::<Vec<_>>()),
    )
}

fn button(action: &Action) -> InlineKeyboardButton {
    let label = action.label.clone();
    match &action.kind {
        ActionKind::OpenExternalLink { url } => InlineKeyboardButton::url(label, url.clone()),
        ActionKind::InvokeCallback { tag } => InlineKeyboardButton::callback(label, tag.as_str()),
        ActionKind::OpenGameSurface { url } => {
            InlineKeyboardButton::web_app(label, WebAppInfo { url: url.clone() })
        }
    }
}

#[cfg(test)]
mod tests {
    use teloxide::types::InlineKeyboardButtonKind;
    use url::Url;

    use super::*;
    use crate::commands::CallbackTag;

    #[test]
    fn test_keyboard_mirrors_rows() {
        let game = Url::parse("https://example.com/game").unwrap();
        let community = Url::parse("https://t.me/secco_community").unwrap();
        let response = Response::new("text")
            .button(Action::game("Play", game.clone()))
            .button(Action::callback("Stats", CallbackTag::Stats))
            .button(Action::link("Join", community.clone()));

        let markup = keyboard(&response);
        assert_eq!(markup.inline_keyboard.len(), 3);
        assert!(markup.inline_keyboard.iter().all(|row| row.len() == 1));

        let play = &markup.inline_keyboard[0][0];
        assert_eq!(play.text, "Play");
        assert!(matches!(&play.kind, InlineKeyboardButtonKind::WebApp(info) if info.url == game));

        let stats = &markup.inline_keyboard[1][0];
        assert!(matches!(&stats.kind, InlineKeyboardButtonKind::CallbackData(data) if data == "stats"));

        let join = &markup.inline_keyboard[2][0];
        assert!(matches!(&join.kind, InlineKeyboardButtonKind::Url(url) if *url == community));
    }
}
