//! Command routing module.
//!
//! Turns slash commands and inline button presses into response
//! templates: message text plus rows of action buttons.

mod response;
mod router;
mod types;

pub use response::{Action, ActionKind, ActionRow, Delivery, Response};
pub use router::CommandRouter;
pub use types::{
    CallbackTag, Event, EventKind, REFERRAL_PREFIX, UserRef, all_commands, parse_referral_payload,
    referral_link,
};
