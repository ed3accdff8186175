//! The step's configuration surface. The runner passes each declared input
//! to the process as an `INPUT_`-prefixed environment variable.

use crate::notify::{Color, Notification};
use crate::slack::channel::{ChannelId, ChannelName};
use crate::slack::message::MessageId;
use std::fmt;
use url::Url;

/// The recognised inputs, decoded. Whitespace-trimmed; an empty value is
/// treated the same as an absent one.
#[derive(Clone, Debug)]
pub struct Inputs {
    /// A channel name to resolve. Ignored when `channel_id` is supplied.
    pub channel: Option<ChannelName>,
    /// An explicit channel ID, bypassing resolution.
    pub channel_id: Option<ChannelId>,
    /// Free-text status label shown in the message.
    pub status: String,
    pub color: Option<Color>,
    /// An optional deep link appended to the message body.
    pub url: Option<Url>,
    /// When present, the message to edit instead of posting a new one.
    pub message_id: Option<MessageId>,
}

impl Inputs {
    pub fn from_env() -> Result<Self, InputError> {
        Self::resolve(|var| std::env::var(var).ok())
    }

    /// Build the inputs from any variable lookup. Tests supply a map where
    /// production supplies [std::env::var].
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, InputError> {
        let input = |name: &str| {
            lookup(&env_key(name))
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let url = match input("url") {
            None => None,
            Some(raw) => match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(e) => return Err(InputError::MalformedUrl(raw, e)),
            },
        };

        Ok(Inputs {
            channel: input("channel").map(ChannelName),
            channel_id: input("channel_id").map(ChannelId),
            status: input("status").unwrap_or_default(),
            color: input("color").map(Color::from),
            url,
            message_id: input("message_id").map(MessageId),
        })
    }

    /// The payload-relevant slice of the inputs.
    pub fn notification(&self) -> Notification {
        Notification {
            status: self.status.clone(),
            color: self.color.clone(),
            link: self.url.clone(),
            initiator: None,
        }
    }
}

/// The environment variable the runner maps an input name to.
fn env_key(name: &str) -> String {
    format!("INPUT_{}", name.to_ascii_uppercase())
}

/// What can go wrong decoding an input.
#[derive(Debug)]
pub enum InputError {
    MalformedUrl(String, url::ParseError),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            InputError::MalformedUrl(raw, e) => {
                format!("Input 'url' is not a valid URL ({}): {}", raw, e)
            }
        };

        write!(f, "{}", x)
    }
}
