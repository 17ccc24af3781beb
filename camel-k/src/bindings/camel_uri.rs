use super::{Binding, BindingContext, BindingProvider, EndpointContext};
use crate::apis::v1alpha1::Endpoint;
use crate::error::TranslationError;
use url::form_urlencoded;

/// Uses the endpoint uri as it is, appending the endpoint properties as query parameters.
pub struct CamelUriBindingProvider;

#[async_trait::async_trait]
impl BindingProvider for CamelUriBindingProvider {
    fn id(&self) -> &'static str {
        "camel-uri"
    }

    fn order(&self) -> u16 {
        100
    }

    async fn translate(
        &self,
        _ctx: &BindingContext,
        _endpoint_ctx: &EndpointContext,
        endpoint: &Endpoint,
    ) -> Result<Option<Binding>, TranslationError> {
        let uri = match (&endpoint.ref_, &endpoint.uri) {
            (None, Some(uri)) => uri,
            _ => return Ok(None),
        };

        let properties = match &endpoint.properties {
            Some(properties) => properties.get_properties()?,
            None => Default::default(),
        };

        Ok(Some(Binding {
            uri: append_parameters(uri, properties.iter()),
            application_properties: None,
        }))
    }
}

fn append_parameters<'a>(uri: &str, parameters: impl Iterator<Item = (&'a String, &'a String)>) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(parameters)
        .finish();

    if query.is_empty() {
        uri.to_string()
    } else if uri.contains('?') {
        format!("{uri}&{query}")
    } else {
        format!("{uri}?{query}")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::apis::v1alpha1::{EndpointProperties, EndpointType, RawMessage};
    use serde_json::json;

    fn endpoint_ctx() -> EndpointContext {
        EndpointContext::new(EndpointType::CompletionHandler)
    }

    #[async_std::test]
    async fn uri_is_kept() {
        let binding = CamelUriBindingProvider
            .translate(&BindingContext::default(), &endpoint_ctx(), &Endpoint::from_uri("log:completed"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(binding.uri, "log:completed");
        assert_eq!(binding.application_properties, None);
    }

    #[async_std::test]
    async fn properties_become_sorted_query() {
        let endpoint = Endpoint {
            uri: Some("log:completed?level=WARN".into()),
            properties: Some(EndpointProperties(RawMessage(json!({"showHeaders": true, "multiline": "a b"})))),
            ..Default::default()
        };
        let binding = CamelUriBindingProvider
            .translate(&BindingContext::default(), &endpoint_ctx(), &endpoint)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(binding.uri, "log:completed?level=WARN&multiline=a+b&showHeaders=true");
    }
}
