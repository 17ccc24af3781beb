use camel_k::apis::{
    v1::IntegrationSpec,
    v1alpha1::{CompletionHandlerSpec, Endpoint},
};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// KameletBinding connects a source to a sink, optionally through a list of
/// steps, and is materialized as an `Integration`.
#[derive(CustomResource, Serialize, Deserialize, Debug, Clone, Default, JsonSchema)]
#[kube(
    kind = "KameletBinding",
    group = "camel.apache.org",
    version = "v1alpha1",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct KameletBindingSpec {
    /// Integration is an optional integration used to specify custom parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration: Option<IntegrationSpec>,
    /// Source is the starting point of the integration defined by this binding
    #[serde(default)]
    pub source: Endpoint,
    /// Sink is the destination of the integration defined by this binding
    #[serde(default)]
    pub sink: Endpoint,
    /// CompletionHandler is an optional handler called upon exchange completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_handler: Option<CompletionHandlerSpec>,
    /// Steps contains an optional list of intermediate steps that are executed between the Source and the Sink
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Endpoint>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deserialize_binding_with_completion_handler() {
        let binding: KameletBinding = serde_yaml::from_str(r#"
apiVersion: camel.apache.org/v1alpha1
kind: KameletBinding
metadata:
  name: timer-to-log
  namespace: default
spec:
  source:
    uri: timer:tick
  sink:
    uri: log:info
  completionHandler:
    log:
      parameters:
        showHeaders: true
"#).unwrap();
        let handler = binding.spec.completion_handler.expect("completion handler is set");
        assert!(handler.0.0.get("log").is_some());
        assert_eq!(binding.spec.sink.uri.as_deref(), Some("log:info"));
    }
}
