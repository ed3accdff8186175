use serde::ser::SerializeStruct;
use serde::{ser, Serialize};
use url::Url;

/// Slack's block API is its most modern, and allows us to mix rich formatting
/// with images and separators. This is our limited subset thereof.
///
/// <https://api.slack.com/reference/block-kit/blocks>
pub enum Block {
    /// A muted strip of small elements, rendered above the main content.
    Context(Vec<ContextElement>),
    Divider,
    /// "mrkdwn" is Slack's alternative to Markdown.
    ///
    /// <https://api.slack.com/reference/surfaces/formatting#basics>
    Section(String),
}

/// The elements permitted inside a [Block::Context].
pub enum ContextElement {
    Image { url: Url, alt: String },
    Mrkdwn(String),
}

// This won't scale to other block types but for now is simpler than a more
// custom serialisation implementation.
#[derive(Serialize)]
struct RawTextBlock<'a> {
    #[serde(rename = "type")]
    typ: &'static str,
    text: &'a String,
}

impl ser::Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            Block::Context(elements) => {
                let mut state = serializer.serialize_struct("Block", 2)?;
                state.serialize_field("type", "context")?;
                state.serialize_field("elements", elements)?;
                state.end()
            }

            Block::Divider => {
                let mut state = serializer.serialize_struct("Block", 1)?;
                state.serialize_field("type", "divider")?;
                state.end()
            }

            Block::Section(x) => {
                let mut state = serializer.serialize_struct("Block", 2)?;
                state.serialize_field("type", "section")?;

                let inner = RawTextBlock {
                    typ: "mrkdwn",
                    text: x,
                };
                state.serialize_field("text", &inner)?;
                state.end()
            }
        }
    }
}

impl ser::Serialize for ContextElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            ContextElement::Image { url, alt } => {
                let mut state = serializer.serialize_struct("ContextElement", 3)?;
                state.serialize_field("type", "image")?;
                state.serialize_field("image_url", url)?;
                state.serialize_field("alt_text", alt)?;
                state.end()
            }

            // Unlike sections, context elements carry their text inline
            // rather than in a nested text object.
            ContextElement::Mrkdwn(x) => {
                let mut state = serializer.serialize_struct("ContextElement", 2)?;
                state.serialize_field("type", "mrkdwn")?;
                state.serialize_field("text", x)?;
                state.end()
            }
        }
    }
}
