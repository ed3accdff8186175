//! Type definitions and helpers for the Slack Web API.

use super::auth::*;
use serde::Deserialize;

/// The base URL of the Slack API. Tests substitute a mock server.
pub const API_BASE: &str = "https://slack.com/api";

/// A client for the Slack Web API, holding a connection pool internally as
/// per [reqwest::Client].
pub struct SlackClient {
    base_url: String,
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new(base_url: String) -> Self {
        SlackClient {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Create a GET request to any Slack API method, handling authentication.
    pub(super) fn get(&self, path: &str, token: &SlackAccessToken) -> reqwest::RequestBuilder {
        self.http
            .get(self.base_url.clone() + path)
            .header(reqwest::header::AUTHORIZATION, to_auth_header_val(token))
    }

    /// Create a POST request to any Slack API method, handling authentication.
    pub(super) fn post(&self, path: &str, token: &SlackAccessToken) -> reqwest::RequestBuilder {
        self.http
            .post(self.base_url.clone() + path)
            .header(reqwest::header::AUTHORIZATION, to_auth_header_val(token))
    }
}

/// Slack's API returns a common "untagged" response, representing whether a
/// request was successful.
///
/// ```json
/// {
///     "ok": true,
///     "ts": "1503435956.000247"
/// }
/// ```
///
/// ```json
/// {
///     "ok": false,
///     "error": "invalid_auth"
/// }
/// ```
#[derive(Deserialize)]
#[serde(untagged)]
pub enum APIResult<T> {
    Ok(T),
    Err(ErrorResponse),
}

/// The universal response in case of an unsuccessful request.
// The `ok` field is checked here, and should be checked on responses too,
// primarily to ensure appropriate deserialization behaviour in case of an
// otherwise empty successful response.
//
// Ideally we'd be able to use `ok` as a tag, rather than defining `APIResult`
// as untagged. See:
//   <https://github.com/serde-rs/serde/issues/745#issuecomment-294314786>
#[derive(Deserialize)]
pub struct ErrorResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_false")]
    ok: bool,
    pub error: String,
}
