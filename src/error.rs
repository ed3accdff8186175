use crate::github::context::ContextError;
use crate::github::inputs::InputError;
use crate::slack::error::SlackError;
use std::fmt;
use std::io;

/// Sum type representing every possible unexceptional fail state. All of
/// them surface identically: one failure annotation and a non-zero exit.
#[derive(Debug)]
pub enum Failure {
    /// Neither `channel` nor `channel_id` was supplied.
    MissingChannel,
    Input(InputError),
    Context(ContextError),
    Slack(SlackError),
    WriteOutput(io::Error),
}

impl From<InputError> for Failure {
    fn from(e: InputError) -> Self {
        Failure::Input(e)
    }
}

impl From<ContextError> for Failure {
    fn from(e: ContextError) -> Self {
        Failure::Context(e)
    }
}

impl From<SlackError> for Failure {
    fn from(e: SlackError) -> Self {
        Failure::Slack(e)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            Failure::MissingChannel => {
                "Either a 'channel' or a 'channel_id' input must be supplied.".into()
            }
            Failure::Input(e) => e.to_string(),
            Failure::Context(e) => e.to_string(),
            Failure::Slack(e) => e.to_string(),
            Failure::WriteOutput(e) => format!("Failed to write the step output: {}", e),
        };

        write!(f, "{}", x)
    }
}
