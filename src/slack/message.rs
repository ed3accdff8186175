//! Create or edit the status message in a given Slack channel.

use super::{api::*, auth::SlackAccessToken, block::Block, channel::ChannelId, error::SlackError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque handle to a posted message — Slack's message timestamp — which
/// can be supplied later to edit that message in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One attachment, the unit Slack colours with a sidebar. The blocks inside
/// carry the actual content; `fallback` is what notifications render.
///
/// <https://api.slack.com/reference/messaging/attachments>
#[derive(Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub fallback: String,
    pub blocks: Vec<Block>,
}

/// <https://api.slack.com/methods/chat.postMessage#args>, and with `ts` set,
/// <https://api.slack.com/methods/chat.update#args>.
#[derive(Serialize)]
struct MessageRequest<'a> {
    channel: &'a ChannelId,
    #[serde(skip_serializing_if = "Option::is_none")]
    ts: Option<&'a MessageId>,
    attachments: Vec<Attachment>,
}

/// <https://api.slack.com/methods/chat.postMessage#examples>
#[derive(Deserialize)]
struct MessageResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_true")]
    ok: bool,
    ts: MessageId,
}

impl SlackClient {
    /// Deliver an attachment to a channel: post a fresh message, or, given
    /// the id of an earlier one, overwrite that message in place. Either way
    /// the server's message id is returned for any later edit to target.
    pub async fn dispatch(
        &self,
        channel: &ChannelId,
        attachment: Attachment,
        prior: Option<&MessageId>,
        token: &SlackAccessToken,
    ) -> Result<MessageId, SlackError> {
        let method = match prior {
            Some(_) => "/chat.update",
            None => "/chat.postMessage",
        };

        let res: APIResult<MessageResponse> = self
            .post(method, token)
            .json(&MessageRequest {
                channel,
                ts: prior,
                attachments: vec![attachment],
            })
            .send()
            .await?
            .json()
            .await?;

        match res {
            APIResult::Ok(res) => Ok(res.ts),
            APIResult::Err(res) => Err(SlackError::APIResponseError(res.error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn token() -> SlackAccessToken {
        SlackAccessToken("xoxb-test".into())
    }

    fn attachment() -> Attachment {
        Attachment {
            color: None,
            fallback: "acme/rocket CI success".into(),
            blocks: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_posts_without_prior_id() {
        let mut srv = mockito::Server::new_async().await;

        let msg_res = r#"{
            "ok": true,
            "ts": "1503435956.000247"
        }"#;

        // An exact body match doubles as a check that no `ts` is sent.
        let msg_mock = srv
            .mock("POST", "/chat.postMessage")
            .match_body(Matcher::Json(json!({
                "channel": "C999",
                "attachments": [{
                    "fallback": "acme/rocket CI success",
                    "blocks": []
                }]
            })))
            .with_body(msg_res)
            .expect(1)
            .create_async()
            .await;

        let client = SlackClient::new(srv.url());
        let id = client
            .dispatch(&ChannelId("C999".into()), attachment(), None, &token())
            .await
            .unwrap();

        msg_mock.assert_async().await;
        assert_eq!(id, MessageId("1503435956.000247".into()));
    }

    #[tokio::test]
    async fn test_updates_with_prior_id() {
        let mut srv = mockito::Server::new_async().await;

        let msg_res = r#"{
            "ok": true,
            "ts": "1503435956.000247"
        }"#;

        let msg_mock = srv
            .mock("POST", "/chat.update")
            .match_body(Matcher::Json(json!({
                "channel": "C999",
                "ts": "1503435956.000247",
                "attachments": [{
                    "fallback": "acme/rocket CI success",
                    "blocks": []
                }]
            })))
            .with_body(msg_res)
            .expect(1)
            .create_async()
            .await;

        let client = SlackClient::new(srv.url());
        let prior = MessageId("1503435956.000247".into());
        let id = client
            .dispatch(&ChannelId("C999".into()), attachment(), Some(&prior), &token())
            .await
            .unwrap();

        msg_mock.assert_async().await;
        assert_eq!(id, prior);
    }

    #[tokio::test]
    async fn test_api_error() {
        let mut srv = mockito::Server::new_async().await;

        let msg_res = r#"{
            "ok": false,
            "error": "channel_not_found"
        }"#;

        let msg_mock = srv
            .mock("POST", "/chat.postMessage")
            .with_body(msg_res)
            .expect(1)
            .create_async()
            .await;

        let client = SlackClient::new(srv.url());
        let res = client
            .dispatch(&ChannelId("bogus".into()), attachment(), None, &token())
            .await;

        msg_mock.assert_async().await;
        assert!(matches!(
            res,
            Err(SlackError::APIResponseError(e)) if e == "channel_not_found",
        ));
    }
}
