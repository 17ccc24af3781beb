use crate::apis::v1alpha1::KameletBinding;
use camel_k::apis::v1::IntegrationSpec;
use camel_k::apis::v1alpha1::{
    from_object, property_value, CompletionHandler, CompletionHandlerSpec, CompletionHandlerType,
    EndpointType, RawMessage, COMPLETION_HANDLER_APP_PROPERTIES_PREFIX, COMPLETION_HANDLER_DEAD_LETTER_URI,
    COMPLETION_HANDLER_REF_NAME,
};
use camel_k::bindings::{Binding, BindingContext, BindingTranslator, EndpointContext};
use camel_k::error::{Error, MalformedInputError};
use kube::ResourceExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Decodes a completion handler declaration.
///
/// The declaration is an object with a single key naming the handler type,
/// e.g. `{"sink": {"endpoint": {"uri": "log:dead"}}}`. An empty object means
/// no handler. The key selects the variant, so a `log` declaration never
/// reports itself as a sink.
pub fn parse_completion_handler(raw: &RawMessage) -> Result<Option<CompletionHandler>, Error> {
    let handlers = raw.as_object()?;
    if handlers.len() > 1 {
        return Err(Error::Multiplicity { count: handlers.len() });
    }

    let (key, value) = match handlers.iter().next() {
        Some(handler) => handler,
        None => return Ok(None),
    };
    tracing::debug!(completion_handler = %key, "parsing completion handler");

    let handler = match key.parse::<CompletionHandlerType>()? {
        CompletionHandlerType::None => CompletionHandler::None(decode(value)?),
        CompletionHandlerType::Log => CompletionHandler::Log(decode(value)?),
        CompletionHandlerType::Sink => CompletionHandler::Sink(decode(value)?),
    };
    Ok(Some(handler))
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, MalformedInputError> {
    match value {
        // `{"none": null}` declares a handler without settings
        Value::Null => from_object(&Value::Object(Map::new())),
        value => from_object(value),
    }
}

/// Whether an application property belongs to the completion handler bean.
fn is_completion_handler_property(key: &str) -> bool {
    key == COMPLETION_HANDLER_REF_NAME
        || key
            .strip_prefix(COMPLETION_HANDLER_APP_PROPERTIES_PREFIX)
            .map_or(false, |rest| rest.is_empty() || rest.starts_with('.'))
}

/// Copies the completion handler configuration into the binding application properties.
///
/// A sink handler also gets the binding uri as its dead letter uri.
pub fn set_completion_handler_configuration(
    binding: &mut Binding,
    completion_handler: &CompletionHandler,
) -> Result<(), Error> {
    let properties = completion_handler.configuration()?;

    let application_properties = binding.application_properties.get_or_insert_with(BTreeMap::new);
    for (key, value) in &properties {
        tracing::trace!(property = %key, "setting completion handler property");
        application_properties.insert(key.clone(), property_value(value));
    }
    if completion_handler.type_() == CompletionHandlerType::Sink && !binding.uri.is_empty() {
        application_properties.insert(COMPLETION_HANDLER_DEAD_LETTER_URI.to_string(), binding.uri.clone());
    }

    Ok(())
}

/// Builds the binding carrying the completion handler properties, if a handler is declared.
///
/// The endpoint of a sink handler is translated first, so references (e.g. to
/// Kamelets) become concrete uris.
pub async fn maybe_completion_handler(
    spec: Option<&CompletionHandlerSpec>,
    ctx: &BindingContext,
    translator: &BindingTranslator,
) -> Result<Option<Binding>, Error> {
    let spec = match spec {
        Some(spec) => spec,
        None => return Ok(None),
    };
    let completion_handler = match parse_completion_handler(&spec.0)
        .map_err(|e| e.context("could not parse completion handler"))?
    {
        Some(completion_handler) => completion_handler,
        None => return Ok(None),
    };

    let mut binding = match completion_handler.endpoint() {
        Some(endpoint) => translator
            .translate(ctx, &EndpointContext::new(EndpointType::CompletionHandler), endpoint)
            .await
            .map_err(|e| Error::from(e).context("could not determine completion handler URI"))?,
        None => Binding {
            application_properties: Some(BTreeMap::new()),
            ..Default::default()
        },
    };

    set_completion_handler_configuration(&mut binding, &completion_handler)
        .map_err(|e| e.context("could not set integration completion handler"))?;

    tracing::debug!(
        completion_handler = %completion_handler.type_(),
        uri = %binding.uri,
        "configured completion handler"
    );
    Ok(Some(binding))
}

/// Writes the completion handler properties of the binding into the integration configuration.
///
/// Completion handler properties left by an earlier reconciliation are dropped
/// first, so a reused integration only carries the current handler. Nothing is
/// written or dropped when any step fails.
pub async fn configure_completion_handler(
    kamelet_binding: &KameletBinding,
    translator: &BindingTranslator,
    integration: &mut IntegrationSpec,
) -> Result<(), Error> {
    let ctx = BindingContext {
        namespace: kamelet_binding.namespace().unwrap_or_else(|| "default".into()),
    };
    let binding = maybe_completion_handler(
        kamelet_binding.spec.completion_handler.as_ref(),
        &ctx,
        translator,
    ).await?;

    integration.retain_configuration_properties(|key| !is_completion_handler_property(key));
    if let Some(binding) = binding {
        for (key, value) in binding.application_properties.iter().flatten() {
            integration.add_configuration_property(key, value);
        }
    }
    Ok(())
}
