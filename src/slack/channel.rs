//! Resolve Slack channel names to the channel IDs the rest of the API
//! expects.

use super::{api::*, auth::SlackAccessToken, error::SlackError};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use std::fmt;

/// Channel names as are visible in the Slack UI, with or without the leading
/// hash.
///
/// ```
/// let with =    ChannelName("#ci-alerts".into());
/// let without = ChannelName("ci-alerts".into());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChannelName(pub String);

impl ChannelName {
    /// Strip any leading `#` or `@` so that consumers can supply the name as
    /// rendered in the Slack UI. Channel names themselves can't contain
    /// either character.
    pub fn normalised(&self) -> ChannelName {
        ChannelName(self.0.trim_start_matches(&['#', '@'][..]).into())
    }
}

/// Format without the surrounding newtype wrapper.
///
/// ```
/// let x = ChannelName("fp".into());
/// assert_eq!(format!("{}", x), "fp");
/// ```
impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Because channel names can change, channels are generally referred to by
/// their underlying ID. This can be found in the UI by copying a link to the
/// channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelId(pub String);

/// The metadata we care about per-channel within [ListResponse].
#[derive(Deserialize)]
struct ChannelMeta {
    id: ChannelId,
    name: ChannelName,
}

/// Both kinds of non-DM conversation, requested in a single listing.
const CHANNEL_TYPES: &str = "public_channel,private_channel";

/// <https://api.slack.com/methods/conversations.list#args>
#[derive(Serialize)]
struct ListRequest {
    /// Maximum supported is 1000, but a limit of 200 is "recommended".
    limit: u16,
    types: &'static str,
    cursor: Option<String>,
}

/// <https://api.slack.com/methods/conversations.list#examples>
#[derive(Deserialize)]
struct ListResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_true")]
    ok: bool,
    channels: Vec<ChannelMeta>,
    response_metadata: PaginationMeta,
}

/// The metadata attached to a [ListResponse], enabling pagination. Slack
/// signals the final page with an empty cursor rather than omitting it.
#[serde_as]
#[derive(Deserialize)]
struct PaginationMeta {
    #[serde_as(as = "NoneAsEmptyString")]
    next_cursor: Option<String>,
}

/// The channel directory as a lazy sequence of pages. Each call to [Self::next]
/// fetches one page, so a caller that stops early never pays for the rest of
/// the listing.
struct ChannelPages<'a> {
    client: &'a SlackClient,
    token: &'a SlackAccessToken,
    cursor: Option<String>,
    done: bool,
}

impl<'a> ChannelPages<'a> {
    fn new(client: &'a SlackClient, token: &'a SlackAccessToken) -> Self {
        ChannelPages {
            client,
            token,
            cursor: None,
            done: false,
        }
    }

    async fn next(&mut self) -> Result<Option<Vec<ChannelMeta>>, SlackError> {
        if self.done {
            return Ok(None);
        }

        let res: APIResult<ListResponse> = self
            .client
            .get("/conversations.list", self.token)
            .query(&ListRequest {
                limit: 200,
                types: CHANNEL_TYPES,
                cursor: self.cursor.take(),
            })
            .send()
            .await?
            .json()
            .await?;

        match res {
            APIResult::Ok(page) => {
                self.cursor = page.response_metadata.next_cursor;
                self.done = self.cursor.is_none();
                Ok(Some(page.channels))
            }
            APIResult::Err(res) => Err(SlackError::APIResponseError(res.error)),
        }
    }
}

impl SlackClient {
    /// Get the channel ID associated with a channel name, enabling onward
    /// calls to Slack's API.
    ///
    /// Pages of the directory are fetched one at a time and the walk stops at
    /// the first exact name match; only an unknown channel costs the full
    /// listing. Nothing is cached, a process posts at most one message.
    pub async fn resolve_channel_id(
        &self,
        channel_name: &ChannelName,
        token: &SlackAccessToken,
    ) -> Result<ChannelId, SlackError> {
        let wanted = channel_name.normalised();

        let mut pages = ChannelPages::new(self, token);
        while let Some(channels) = pages.next().await? {
            if let Some(found) = channels.into_iter().find(|c| c.name == wanted) {
                return Ok(found.id);
            }
        }

        Err(SlackError::UnknownChannel(channel_name.clone()))
    }
}
