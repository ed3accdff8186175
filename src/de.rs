use serde::de::{Deserialize, Deserializer, Error};

/// Accept only a literal `true`. Slack includes an `ok` field on every
/// response; insisting upon its value here is what allows [crate::slack]'s
/// untagged response enums to pick the right variant.
pub fn only_true<'a, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'a>,
{
    match bool::deserialize(deserializer)? {
        true => Ok(true),
        false => Err(Error::custom("invalid bool: false")),
    }
}

/// Accept only a literal `false`. The counterpart to [only_true] for the
/// error shape.
pub fn only_false<'a, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'a>,
{
    match bool::deserialize(deserializer)? {
        false => Ok(false),
        true => Err(Error::custom("invalid bool: true")),
    }
}
