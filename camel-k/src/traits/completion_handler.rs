use super::{Environment, Trait};
use crate::apis::v1::{Integration, IntegrationPhase, Language, SourceSpec, SourceType};
use crate::apis::v1alpha1::{COMPLETION_HANDLER_DEAD_LETTER_URI, COMPLETION_HANDLER_REF_NAME};
use crate::error::Error;
use std::collections::BTreeMap;

/// Name of the source carrying the completion handler flow.
pub const COMPLETION_HANDLER_SOURCE_NAME: &str = "camel-k-embedded-completion-handler.yaml";

/// Uris with this scheme are resolved by the Kamelet runtime, they bring no component dependency.
const KAMELET_SCHEME_PREFIX: &str = "kamelet:";

/// The `completion-handler` trait injects the completion handler source into
/// the integration runtime.
///
/// It must run before the dependency trait so the sink component dependencies
/// are picked up.
#[derive(Clone, Debug, Default)]
pub struct CompletionHandlerTrait {
    pub enabled: Option<bool>,
    /// The completion handler ref name, provided or found in the application properties.
    pub ref_: Option<String>,
}

impl CompletionHandlerTrait {
    pub fn for_integration(integration: &Integration) -> Self {
        let spec = integration.spec.traits
            .as_ref()
            .and_then(|t| t.completion_handler.as_ref());
        CompletionHandlerTrait {
            enabled: spec.and_then(|s| s.enabled),
            ref_: spec.and_then(|s| s.ref_.clone()),
        }
    }

    fn add_completion_handler_dependencies(&self, env: &mut Environment, uri: &str) {
        let catalog = env.catalog;
        let (component, scheme) = catalog.decode_component(uri);
        let component = match component {
            Some(component) => component,
            None => {
                tracing::debug!(uri, "no catalog component for completion handler uri");
                return;
            }
        };

        let status = env.integration.status_mut();
        status.add_dependency(component.dependency_id());
        if let Some(scheme) = scheme {
            for dependency in component.producer_dependency_ids(&scheme.id) {
                status.add_dependency(dependency);
            }
        }
    }

    fn add_completion_handler_as_source(&self, env: &mut Environment, ref_: &str) -> Result<(), Error> {
        let flow = vec![BTreeMap::from([
            ("completion-handler", BTreeMap::from([("ref", ref_)])),
        ])];
        let content = serde_yaml::to_string(&flow)?;

        env.integration.status_mut().add_or_replace_generated_source(SourceSpec {
            name: COMPLETION_HANDLER_SOURCE_NAME.to_string(),
            content,
            language: Language::Yaml,
            type_: SourceType::CompletionHandler,
        });
        Ok(())
    }
}

impl Trait for CompletionHandlerTrait {
    fn id(&self) -> &'static str {
        "completion-handler"
    }

    fn order(&self) -> u32 {
        470
    }

    fn is_platform_trait(&self) -> bool {
        true
    }

    fn configure(&mut self, env: &Environment) -> Result<bool, Error> {
        if self.enabled == Some(false) {
            return Ok(false);
        }
        if !env.integration.in_phase(IntegrationPhase::Initialization) && !env.integration.in_running_phases() {
            return Ok(false);
        }

        if self.ref_.as_deref().map_or(true, str::is_empty) {
            self.ref_ = env.integration.spec
                .get_configuration_property(COMPLETION_HANDLER_REF_NAME)
                .filter(|r| !r.is_empty())
                .map(str::to_string);
        }

        Ok(self.ref_.is_some())
    }

    fn apply(&mut self, env: &mut Environment) -> Result<(), Error> {
        if !env.integration.in_phase(IntegrationPhase::Initialization) {
            return Ok(());
        }
        let ref_ = match self.ref_.clone() {
            Some(ref_) => ref_,
            None => return Ok(()),
        };

        // A uri configured directly needs its component dependency discovered
        let dead_letter_uri = env.integration.spec
            .get_configuration_property(COMPLETION_HANDLER_DEAD_LETTER_URI)
            .filter(|uri| !uri.is_empty() && !uri.starts_with(KAMELET_SCHEME_PREFIX))
            .map(str::to_string);
        if let Some(uri) = dead_letter_uri {
            self.add_completion_handler_dependencies(env, &uri);
        }

        tracing::debug!(completion_handler_ref = %ref_, "adding completion handler source");
        self.add_completion_handler_as_source(env, &ref_)
    }
}
