use super::raw_types::RawMessage;
use crate::error::MalformedInputError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The property holding the reference name used when looking up the completion handler bean.
pub const COMPLETION_HANDLER_REF_NAME: &str = "camel.k.completionHandler.ref";
/// The default name of the completion handler bean.
pub const COMPLETION_HANDLER_REF_DEFAULT_NAME: &str = "defaultCompletionHandler";
/// The prefix used for the completion handler bean properties.
pub const COMPLETION_HANDLER_APP_PROPERTIES_PREFIX: &str = "camel.beans.defaultCompletionHandler";
/// The property holding the resolved uri of a sink completion handler.
pub const COMPLETION_HANDLER_DEAD_LETTER_URI: &str = "camel.beans.defaultCompletionHandler.deadLetterUri";

pub const NO_COMPLETION_HANDLER_BUILDER: &str = "#class:org.apache.camel.builder.NoCompletionHandlerBuilder";
pub const DEFAULT_COMPLETION_HANDLER_BUILDER: &str = "#class:org.apache.camel.builder.DefaultCompletionHandlerBuilder";
pub const DEAD_LETTER_CHANNEL_BUILDER: &str = "#class:org.apache.camel.builder.DeadLetterChannelBuilder";

/// An unstructured object for a completion handler, e.g.
/// `{"sink": {"endpoint": {"uri": "log:dead"}}}`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(transparent)]
pub struct CompletionHandlerSpec(pub RawMessage);

/// An unstructured object for completion handler parameters.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(transparent)]
pub struct CompletionHandlerParameters(pub RawMessage);

/// The kind of completion handler, which is also the key it is declared under.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompletionHandlerType {
    /// Registers the default bean without any handling logic.
    None,
    /// Logs the completed exchange.
    Log,
    /// Forwards the exchange to a further sink, like a dead letter channel.
    Sink,
}

impl CompletionHandlerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionHandlerType::None => "none",
            CompletionHandlerType::Log => "log",
            CompletionHandlerType::Sink => "sink",
        }
    }
}

impl fmt::Display for CompletionHandlerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompletionHandlerType {
    type Err = MalformedInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(CompletionHandlerType::None),
            "log" => Ok(CompletionHandlerType::Log),
            "sink" => Ok(CompletionHandlerType::Sink),
            other => Err(MalformedInputError::UnknownType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dead_letter_uri_is_under_prefix() {
        assert_eq!(
            COMPLETION_HANDLER_DEAD_LETTER_URI,
            format!("{}.deadLetterUri", COMPLETION_HANDLER_APP_PROPERTIES_PREFIX)
        );
    }

    #[test]
    fn type_parses_from_key() {
        for t in [CompletionHandlerType::None, CompletionHandlerType::Log, CompletionHandlerType::Sink] {
            assert_eq!(t.as_str().parse::<CompletionHandlerType>().unwrap(), t);
        }
        assert!("deadLetter".parse::<CompletionHandlerType>().is_err());
    }
}
