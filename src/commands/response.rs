//! Outbound response templates.

use serde::Serialize;
use url::Url;

use super::types::CallbackTag;

/// What a button does when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionKind {
    /// Opens a URL outside the chat.
    OpenExternalLink { url: Url },

    /// Sends the press back to the bot as a new event.
    InvokeCallback {
        #[serde(serialize_with = "serialize_tag")]
        tag: CallbackTag,
    },

    /// Opens the game as an embedded Web App.
    OpenGameSurface { url: Url },
}

fn serialize_tag<S: serde::Serializer>(tag: &CallbackTag, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(tag.as_str())
}

/// A labelled button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Button caption.
    pub label: String,

    /// Button behaviour.
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl Action {
    /// A button opening an external link.
    #[must_use]
    pub fn link(label: impl Into<String>, url: Url) -> Self {
        Self {
            label: label.into(),
            kind: ActionKind::OpenExternalLink { url },
        }
    }

    /// A button sending a callback tag back to the bot.
    #[must_use]
    pub fn callback(label: impl Into<String>, tag: CallbackTag) -> Self {
        Self {
            label: label.into(),
            kind: ActionKind::InvokeCallback { tag },
        }
    }

    /// A button opening the game web app.
    #[must_use]
    pub fn game(label: impl Into<String>, url: Url) -> Self {
        Self {
            label: label.into(),
            kind: ActionKind::OpenGameSurface { url },
        }
    }
}

/// One horizontal group of buttons.
pub type ActionRow = Vec<Action>;

/// How the transport should deliver a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Post a new message in the chat.
    #[default]
    Send,

    /// Replace the message whose button was pressed, if there is one.
    EditSource,
}

/// Message text plus its inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// HTML-formatted message body.
    pub text: String,

    /// Keyboard rows, top to bottom.
    pub rows: Vec<ActionRow>,

    /// Delivery hint for the transport.
    pub delivery: Delivery,
}

impl Response {
    /// Creates a response delivered as a new message.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rows: Vec::new(),
            delivery: Delivery::Send,
        }
    }

    /// Appends a row holding a single button.
    #[must_use]
    pub fn button(mut self, action: Action) -> Self {
        self.rows.push(vec![action]);
        self
    }

    /// Sets the delivery hint.
    #[must_use]
    pub const fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    /// Iterates over every action in row order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.rows.iter().flatten()
    }
}
