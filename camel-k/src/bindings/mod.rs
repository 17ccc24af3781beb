//! Translation of binding endpoints into Camel URIs and application properties.
mod camel_uri;
mod kamelet;

pub use camel_uri::CamelUriBindingProvider;
pub use kamelet::{KameletBindingProvider, KameletLookup, KubeKameletLookup};

use crate::apis::v1alpha1::{Endpoint, EndpointType};
use crate::error::TranslationError;
use std::collections::BTreeMap;

/// The result of translating an endpoint, plus any application properties
/// derived for it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Binding {
    /// The resolved Camel URI, empty when nothing was resolved.
    pub uri: String,
    pub application_properties: Option<BTreeMap<String, String>>,
}

impl Binding {
    pub fn application_properties_mut(&mut self) -> &mut BTreeMap<String, String> {
        self.application_properties.get_or_insert_with(BTreeMap::new)
    }
}

/// Where a translation takes place.
#[derive(Clone, Debug, Default)]
pub struct BindingContext {
    /// Namespace of the resource declaring the endpoint, used for references without one.
    pub namespace: String,
}

/// What the translated endpoint is used for.
#[derive(Clone, Debug)]
pub struct EndpointContext {
    pub type_: EndpointType,
}

impl EndpointContext {
    pub fn new(type_: EndpointType) -> Self {
        EndpointContext { type_ }
    }

    /// The id identifying the endpoint within the binding.
    pub fn id(&self) -> String {
        self.type_.as_str().to_string()
    }
}

/// Translates endpoints of a kind it recognizes, returning `None` for the others.
#[async_trait::async_trait]
pub trait BindingProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Providers with a lower order are asked first.
    fn order(&self) -> u16;

    async fn translate(
        &self,
        ctx: &BindingContext,
        endpoint_ctx: &EndpointContext,
        endpoint: &Endpoint,
    ) -> Result<Option<Binding>, TranslationError>;
}

/// An ordered list of [`BindingProvider`]s.
#[derive(Default)]
pub struct BindingTranslator {
    providers: Vec<Box<dyn BindingProvider>>,
}

impl BindingTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The providers used by the operator: Kamelet references looked up through
    /// the cluster, then plain Camel URIs.
    pub fn with_kube(client: kube::Client) -> Self {
        BindingTranslator::new()
            .with_provider(KameletBindingProvider::new(KubeKameletLookup::new(client)))
            .with_provider(CamelUriBindingProvider)
    }

    pub fn with_provider(mut self, provider: impl BindingProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self.providers.sort_by_key(|p| p.order());
        self
    }

    pub async fn translate(
        &self,
        ctx: &BindingContext,
        endpoint_ctx: &EndpointContext,
        endpoint: &Endpoint,
    ) -> Result<Binding, TranslationError> {
        if endpoint.ref_.is_none() && endpoint.uri.is_none() {
            return Err(TranslationError::EmptyEndpoint);
        }

        for provider in &self.providers {
            if let Some(binding) = provider.translate(ctx, endpoint_ctx, endpoint).await? {
                tracing::debug!(provider = provider.id(), uri = %binding.uri, "translated {} endpoint", endpoint_ctx.id());
                return Ok(binding);
            }
        }

        Err(TranslationError::UnsupportedEndpoint(describe(endpoint)))
    }
}

fn describe(endpoint: &Endpoint) -> String {
    match (&endpoint.ref_, &endpoint.uri) {
        (Some(reference), _) => format!(
            "{}/{}",
            reference.kind.as_deref().unwrap_or("unknown"),
            reference.name.as_deref().unwrap_or_default()
        ),
        (None, Some(uri)) => uri.clone(),
        (None, None) => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use k8s_openapi::api::core::v1::ObjectReference;

    #[test]
    fn endpoint_ids() {
        assert_eq!(EndpointContext::new(EndpointType::CompletionHandler).id(), "completion-handler");
    }

    #[async_std::test]
    async fn empty_endpoint_is_rejected() {
        let translator = BindingTranslator::new().with_provider(CamelUriBindingProvider);
        let err = translator
            .translate(
                &BindingContext::default(),
                &EndpointContext::new(EndpointType::CompletionHandler),
                &Endpoint::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::EmptyEndpoint));
    }

    #[async_std::test]
    async fn unknown_reference_is_unsupported() {
        let translator = BindingTranslator::new().with_provider(CamelUriBindingProvider);
        let endpoint = Endpoint {
            ref_: Some(ObjectReference {
                kind: Some("Broker".into()),
                name: Some("default".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = translator
            .translate(
                &BindingContext::default(),
                &EndpointContext::new(EndpointType::CompletionHandler),
                &endpoint,
            )
            .await
            .unwrap_err();
        match err {
            TranslationError::UnsupportedEndpoint(what) => assert_eq!(what, "Broker/default"),
            other => panic!("unexpected error {other}"),
        }
    }
}
