//! The messenger of the gods.
//!
//! Runs as a single step inside a workflow: reads the step's inputs and the
//! run's ambient context from the environment, posts (or edits in place) a
//! status message in the configured Slack channel, and publishes the
//! message's id so that later invocations can keep updating the same
//! message as the run progresses.

use chrono::Utc;
use dotenvy::dotenv;
use error::Failure;
use github::context::ActionContext;
use github::inputs::Inputs;
use github::step;
use slack::api::{SlackClient, API_BASE};
use slack::auth::SlackAccessToken;
use slack::message::MessageId;
use std::env;
use std::process::ExitCode;
use tracing::{error, info, warn};

mod de;
mod error;
mod github;
mod notify;
mod slack;

/// Application entrypoint. Initialises tracing, runs the one notification
/// flow, and reports the outcome to the runner.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    // Populates the environment for local runs; in CI the runner provides
    // everything.
    let _ = dotenv();

    match execute().await {
        Ok(id) => {
            info!("Message delivered: {}", id);

            match step::set_output("message_id", &id.0) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => fail(&Failure::WriteOutput(e)),
            }
        }
        Err(e) => fail(&e),
    }
}

/// The single reporting site for every fail state.
fn fail(e: &Failure) -> ExitCode {
    let msg = e.to_string();

    error!("{}", msg);
    step::set_failed(&msg);

    ExitCode::FAILURE
}

/// Assemble the flow's dependencies from the environment and run it.
async fn execute() -> Result<MessageId, Failure> {
    let inputs = Inputs::from_env()?;
    let context = ActionContext::from_env()?;

    let token = match env::var("SLACK_BOT_TOKEN") {
        Ok(t) => SlackAccessToken(t),
        Err(_) => {
            // Not fatal here; Slack will reject the request downstream.
            warn!("No $SLACK_BOT_TOKEN environment variable found");
            SlackAccessToken(String::new())
        }
    };

    let client = SlackClient::new(API_BASE.into());

    run(&client, &token, &inputs, &context).await
}

/// Resolve the destination, build the payload, and deliver it.
///
/// The channel invariant is checked before anything touches the network:
/// an explicit `channel_id` bypasses resolution, a `channel` name is looked
/// up in the directory, and neither is an immediate failure.
async fn run(
    client: &SlackClient,
    token: &SlackAccessToken,
    inputs: &Inputs,
    context: &ActionContext,
) -> Result<MessageId, Failure> {
    let channel_id = match (&inputs.channel_id, &inputs.channel) {
        (Some(id), _) => id.clone(),
        (None, Some(name)) => client.resolve_channel_id(name, token).await?,
        (None, None) => return Err(Failure::MissingChannel),
    };

    let attachment = notify::build_attachment(&inputs.notification(), context, Utc::now());

    let id = client
        .dispatch(&channel_id, attachment, inputs.message_id.as_ref(), token)
        .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::context::{Repository, RunId};
    use crate::notify::Color;
    use crate::slack::channel::{ChannelId, ChannelName};
    use mockito::Matcher;

    fn token() -> SlackAccessToken {
        SlackAccessToken("xoxb-test".into())
    }

    fn context() -> ActionContext {
        ActionContext {
            repository: Repository {
                owner: "acme".into(),
                repo: "rocket".into(),
            },
            workflow: "CI".into(),
            actor: "octocat".into(),
            run_id: RunId("42".into()),
        }
    }

    fn inputs() -> Inputs {
        Inputs {
            channel: Some(ChannelName("#alerts".into())),
            channel_id: None,
            status: "success".into(),
            color: Some(Color::Success),
            url: None,
            message_id: None,
        }
    }

    #[tokio::test]
    async fn test_posts_new_message() {
        let mut srv = mockito::Server::new_async().await;

        let list_res = r#"{
            "ok": true,
            "channels": [{"id": "C999", "name": "alerts"}],
            "response_metadata": {
                "next_cursor": ""
            }
        }"#;

        let msg_res = r#"{
            "ok": true,
            "ts": "1503435956.000247"
        }"#;

        let list_mock = srv
            .mock("GET", "/conversations.list")
            .match_query(Matcher::Any)
            .with_body(list_res)
            .expect(1)
            .create_async()
            .await;

        let msg_mock = srv
            .mock("POST", "/chat.postMessage")
            .match_body(Matcher::PartialJsonString(
                r##"{"channel": "C999", "attachments": [{"color": "#5db689"}]}"##.to_string(),
            ))
            .with_body(msg_res)
            .expect(1)
            .create_async()
            .await;

        let client = SlackClient::new(srv.url());
        let id = run(&client, &token(), &inputs(), &context()).await.unwrap();

        list_mock.assert_async().await;
        msg_mock.assert_async().await;

        assert_eq!(id, MessageId("1503435956.000247".into()));
    }

    #[tokio::test]
    async fn test_updates_existing_message() {
        let mut srv = mockito::Server::new_async().await;

        let msg_res = r#"{
            "ok": true,
            "ts": "1503435956.000247"
        }"#;

        // An explicit channel_id means the directory is never listed; no
        // conversations.list mock exists to answer it.
        let msg_mock = srv
            .mock("POST", "/chat.update")
            .match_body(Matcher::PartialJsonString(
                r#"{"channel": "C123", "ts": "1503435956.000247"}"#.to_string(),
            ))
            .with_body(msg_res)
            .expect(1)
            .create_async()
            .await;

        let mut inputs = inputs();
        inputs.channel = None;
        inputs.channel_id = Some(ChannelId("C123".into()));
        inputs.message_id = Some(MessageId("1503435956.000247".into()));

        let client = SlackClient::new(srv.url());
        let id = run(&client, &token(), &inputs, &context()).await.unwrap();

        msg_mock.assert_async().await;

        assert_eq!(id, MessageId("1503435956.000247".into()));
    }

    #[tokio::test]
    async fn test_missing_channel_fails_before_any_request() {
        // No mock server at all: a network attempt would error differently
        // than the expected fail state.
        let client = SlackClient::new("http://127.0.0.1:1".into());

        let mut inputs = inputs();
        inputs.channel = None;
        inputs.channel_id = None;

        let res = run(&client, &token(), &inputs, &context()).await;

        assert!(matches!(res, Err(Failure::MissingChannel)));
    }

    #[tokio::test]
    async fn test_unresolvable_channel() {
        let mut srv = mockito::Server::new_async().await;

        let list_res = r#"{
            "ok": true,
            "channels": [],
            "response_metadata": {
                "next_cursor": ""
            }
        }"#;

        let list_mock = srv
            .mock("GET", "/conversations.list")
            .match_query(Matcher::Any)
            .with_body(list_res)
            .expect(1)
            .create_async()
            .await;

        let client = SlackClient::new(srv.url());
        let res = run(&client, &token(), &inputs(), &context()).await;

        list_mock.assert_async().await;

        assert!(matches!(
            res,
            Err(Failure::Slack(slack::error::SlackError::UnknownChannel(_))),
        ));
    }
}
