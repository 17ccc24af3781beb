use super::{Binding, BindingContext, BindingProvider, EndpointContext};
use crate::apis::v1alpha1::Endpoint;
use crate::error::TranslationError;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::Api;

const KAMELET_GROUP: &str = "camel.apache.org";
const KAMELET_KIND: &str = "Kamelet";

/// Checks whether a Kamelet exists before it gets bound.
#[async_trait::async_trait]
pub trait KameletLookup: Send + Sync {
    async fn kamelet_exists(&self, namespace: &str, name: &str) -> Result<bool, TranslationError>;
}

/// Looks Kamelets up in the cluster.
pub struct KubeKameletLookup {
    client: kube::Client,
}

impl KubeKameletLookup {
    pub fn new(client: kube::Client) -> Self {
        KubeKameletLookup { client }
    }
}

#[async_trait::async_trait]
impl KameletLookup for KubeKameletLookup {
    async fn kamelet_exists(&self, namespace: &str, name: &str) -> Result<bool, TranslationError> {
        let resource = ApiResource::from_gvk(&GroupVersionKind::gvk(KAMELET_GROUP, "v1alpha1", KAMELET_KIND));
        let api: Api<DynamicObject> = Api::namespaced_with(self.client.clone(), namespace, &resource);

        match api.get(name).await {
            Ok(_) => Ok(true),
            Err(kube::Error::Api(response)) if response.code == 404 => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// Binds references to Kamelets as `kamelet:<name>/<id>` uris, passing the
/// endpoint properties as Kamelet properties.
pub struct KameletBindingProvider<L> {
    lookup: L,
}

impl<L: KameletLookup> KameletBindingProvider<L> {
    pub fn new(lookup: L) -> Self {
        KameletBindingProvider { lookup }
    }
}

#[async_trait::async_trait]
impl<L: KameletLookup> BindingProvider for KameletBindingProvider<L> {
    fn id(&self) -> &'static str {
        "kamelet"
    }

    fn order(&self) -> u16 {
        10
    }

    async fn translate(
        &self,
        ctx: &BindingContext,
        endpoint_ctx: &EndpointContext,
        endpoint: &Endpoint,
    ) -> Result<Option<Binding>, TranslationError> {
        let reference = match &endpoint.ref_ {
            Some(reference) => reference,
            None => return Ok(None),
        };
        let is_kamelet = reference.kind.as_deref() == Some(KAMELET_KIND)
            && reference.api_version
                .as_deref()
                .map_or(false, |v| v.starts_with(&format!("{KAMELET_GROUP}/")));
        if !is_kamelet {
            return Ok(None);
        }

        let name = reference.name.as_deref().ok_or(TranslationError::ReferenceMustHaveName)?;
        let namespace = reference.namespace.as_deref().unwrap_or(ctx.namespace.as_str());
        if !self.lookup.kamelet_exists(namespace, name).await? {
            return Err(TranslationError::ReferenceNotFound {
                kind: KAMELET_KIND.to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
        }

        let id = endpoint_ctx.id();
        let mut binding = Binding {
            uri: format!("kamelet:{name}/{id}"),
            application_properties: None,
        };
        if let Some(properties) = &endpoint.properties {
            let application_properties = binding.application_properties_mut();
            for (key, value) in properties.get_properties()? {
                application_properties.insert(format!("camel.kamelet.{name}.{id}.{key}"), value);
            }
        }

        Ok(Some(binding))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::apis::v1alpha1::{EndpointProperties, EndpointType, RawMessage};
    use k8s_openapi::api::core::v1::ObjectReference;
    use serde_json::json;
    use std::collections::BTreeSet;

    struct Known(BTreeSet<(&'static str, &'static str)>);

    #[async_trait::async_trait]
    impl KameletLookup for Known {
        async fn kamelet_exists(&self, namespace: &str, name: &str) -> Result<bool, TranslationError> {
            Ok(self.0.iter().any(|(ns, n)| *ns == namespace && *n == name))
        }
    }

    fn provider() -> KameletBindingProvider<Known> {
        KameletBindingProvider::new(Known(BTreeSet::from([("default", "log-sink")])))
    }

    fn kamelet_endpoint(name: &str) -> Endpoint {
        Endpoint {
            ref_: Some(ObjectReference {
                kind: Some("Kamelet".into()),
                api_version: Some("camel.apache.org/v1alpha1".into()),
                name: Some(name.into()),
                ..Default::default()
            }),
            properties: Some(EndpointProperties(RawMessage(json!({"showHeaders": true})))),
            ..Default::default()
        }
    }

    fn ctx() -> BindingContext {
        BindingContext { namespace: "default".into() }
    }

    #[async_std::test]
    async fn kamelet_reference_translates() {
        let binding = provider()
            .translate(&ctx(), &EndpointContext::new(EndpointType::CompletionHandler), &kamelet_endpoint("log-sink"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(binding.uri, "kamelet:log-sink/completion-handler");
        let properties = binding.application_properties.unwrap();
        assert_eq!(
            properties.get("camel.kamelet.log-sink.completion-handler.showHeaders").map(String::as_str),
            Some("true")
        );
    }

    #[async_std::test]
    async fn missing_kamelet_is_not_found() {
        let err = provider()
            .translate(&ctx(), &EndpointContext::new(EndpointType::CompletionHandler), &kamelet_endpoint("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::ReferenceNotFound { ref name, .. } if name == "missing"));
    }

    #[async_std::test]
    async fn other_references_are_skipped() {
        let endpoint = Endpoint::from_uri("log:info");
        let binding = provider()
            .translate(&ctx(), &EndpointContext::new(EndpointType::CompletionHandler), &endpoint)
            .await
            .unwrap();
        assert!(binding.is_none());
    }
}
