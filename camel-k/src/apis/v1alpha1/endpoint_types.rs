use super::raw_types::{property_value, RawMessage};
use crate::error::MalformedInputError;
use k8s_openapi::api::core::v1::ObjectReference;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Endpoint represents a source/sink external entity, addressed either by a
/// reference to a cluster resource or by a literal Camel URI.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Ref can be used to declare a Kubernetes resource as source/sink endpoint
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<ObjectReference>,
    /// URI can be used to specify the (Camel) endpoint explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Properties are a key value representation of endpoint properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<EndpointProperties>,
}

impl Endpoint {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Endpoint {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }
}

/// An unstructured object for endpoint properties
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(transparent)]
pub struct EndpointProperties(pub RawMessage);

impl EndpointProperties {
    pub fn get_properties(&self) -> Result<BTreeMap<String, String>, MalformedInputError> {
        Ok(self.0
            .as_flat_map()?
            .iter()
            .map(|(key, value)| (key.clone(), property_value(value)))
            .collect())
    }
}

/// The role an endpoint plays in a binding.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointType {
    CompletionHandler,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::CompletionHandler => "completion-handler",
        }
    }
}
