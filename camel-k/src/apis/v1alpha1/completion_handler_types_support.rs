//! The completion handler variants.
//!
//! Each variant builds its configuration from the one beneath it:
//! `none` registers the default bean, `log` swaps in the default builder and
//! adds its parameters, `sink` swaps in the dead letter channel builder.
use super::completion_handler_types::*;
use super::endpoint_types::Endpoint;
use crate::error::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Application properties derived from a completion handler, before stringification.
pub type Properties = BTreeMap<String, Value>;

/// Ignores any completion event, only the default bean is registered.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
pub struct CompletionHandlerNone {}

impl CompletionHandlerNone {
    pub fn configuration(&self) -> Result<Properties, Error> {
        Ok(Properties::from([
            (COMPLETION_HANDLER_APP_PROPERTIES_PREFIX.to_string(), Value::from(NO_COMPLETION_HANDLER_BUILDER)),
            (COMPLETION_HANDLER_REF_NAME.to_string(), Value::from(COMPLETION_HANDLER_REF_DEFAULT_NAME)),
        ]))
    }
}

/// The default (log) completion handler.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
pub struct CompletionHandlerLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<CompletionHandlerParameters>,
}

impl CompletionHandlerLog {
    pub fn configuration(&self) -> Result<Properties, Error> {
        let mut properties = CompletionHandlerNone::default().configuration()?;
        properties.insert(
            COMPLETION_HANDLER_APP_PROPERTIES_PREFIX.to_string(),
            Value::from(DEFAULT_COMPLETION_HANDLER_BUILDER),
        );

        if let Some(parameters) = &self.parameters {
            for (key, value) in parameters.0.as_flat_map()? {
                properties.insert(format!("{}.{}", COMPLETION_HANDLER_APP_PROPERTIES_PREFIX, key), value);
            }
        }

        Ok(properties)
    }
}

/// Forwards the exchange to a further endpoint, like a dead letter channel.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
pub struct CompletionHandlerSink {
    #[serde(flatten)]
    pub log: CompletionHandlerLog,
    #[serde(deserialize_with = "super::raw_types::deserialize_object")]
    pub endpoint: Endpoint,
}

impl CompletionHandlerSink {
    /// The endpoint is left unresolved here, the caller translates it.
    pub fn configuration(&self) -> Result<Properties, Error> {
        let mut properties = self.log.configuration()?;
        properties.insert(
            COMPLETION_HANDLER_APP_PROPERTIES_PREFIX.to_string(),
            Value::from(DEAD_LETTER_CHANNEL_BUILDER),
        );
        Ok(properties)
    }
}

/// A decoded completion handler.
#[derive(Clone, Debug, PartialEq)]
pub enum CompletionHandler {
    None(CompletionHandlerNone),
    Log(CompletionHandlerLog),
    Sink(CompletionHandlerSink),
}

impl CompletionHandler {
    pub fn type_(&self) -> CompletionHandlerType {
        match self {
            CompletionHandler::None(_) => CompletionHandlerType::None,
            CompletionHandler::Log(_) => CompletionHandlerType::Log,
            CompletionHandler::Sink(_) => CompletionHandlerType::Sink,
        }
    }

    /// Only a sink handler has an endpoint.
    pub fn endpoint(&self) -> Option<&Endpoint> {
        match self {
            CompletionHandler::Sink(sink) => Some(&sink.endpoint),
            _ => None,
        }
    }

    pub fn configuration(&self) -> Result<Properties, Error> {
        match self {
            CompletionHandler::None(none) => none.configuration(),
            CompletionHandler::Log(log) => log.configuration(),
            CompletionHandler::Sink(sink) => sink.configuration(),
        }
    }
}
