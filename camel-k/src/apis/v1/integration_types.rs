use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The configuration type of an application property entry.
pub const CONFIGURATION_TYPE_PROPERTY: &str = "property";

/// Integration is the Schema for the integrations API.
#[derive(CustomResource, Serialize, Deserialize, Default, Debug, Clone, JsonSchema)]
#[kube(
    kind = "Integration",
    group = "camel.apache.org",
    version = "v1",
    status = "IntegrationStatus",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configuration: Vec<ConfigurationSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<IntegrationTraits>,
}

impl IntegrationSpec {
    /// Looks up an application property from the `property` configuration entries.
    pub fn get_configuration_property(&self, property: &str) -> Option<&str> {
        self.configuration
            .iter()
            .filter(|conf| conf.type_ == CONFIGURATION_TYPE_PROPERTY)
            .find_map(|conf| conf.value
                .strip_prefix(property)
                .and_then(|rest| rest.strip_prefix('=')))
    }

    /// Sets an application property, replacing an existing entry for the same key.
    pub fn add_configuration_property(&mut self, property: &str, value: &str) {
        let entry = ConfigurationSpec::property(property, value);
        let existing = self.configuration
            .iter_mut()
            .filter(|conf| conf.type_ == CONFIGURATION_TYPE_PROPERTY)
            .find(|conf| conf.value
                .strip_prefix(property)
                .map_or(false, |rest| rest.starts_with('=')));

        match existing {
            Some(conf) => *conf = entry,
            None => self.configuration.push(entry),
        }
    }

    /// Drops every application property whose key does not satisfy `keep`.
    pub fn retain_configuration_properties(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.configuration.retain(|conf| match conf.property_key() {
            Some(key) => keep(key),
            None => true,
        });
    }
}

/// A configuration entry, for application properties the value is `key=value`.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
pub struct ConfigurationSpec {
    #[serde(rename = "type")]
    pub type_: String,
    pub value: String,
}

impl ConfigurationSpec {
    pub fn property(key: &str, value: &str) -> Self {
        ConfigurationSpec {
            type_: CONFIGURATION_TYPE_PROPERTY.to_string(),
            value: format!("{key}={value}"),
        }
    }

    /// The key of a `property` entry, `None` for any other configuration type.
    pub fn property_key(&self) -> Option<&str> {
        if self.type_ != CONFIGURATION_TYPE_PROPERTY {
            return None;
        }
        self.value.split_once('=').map(|(key, _)| key)
    }
}

/// Trait configuration carried on the integration.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct IntegrationTraits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_handler: Option<CompletionHandlerTraitSpec>,
}

/// Configures the `completion-handler` trait.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
pub struct CompletionHandlerTraitSpec {
    /// Can be used to enable or disable the trait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// The completion handler ref name, found in the application properties when unset.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
}

/// A source file of the integration, either user provided or generated.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    pub name: String,
    pub content: String,
    pub language: Language,
    #[serde(rename = "type", default)]
    pub type_: SourceType,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Yaml,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    Default,
    CompletionHandler,
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::Default
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, JsonSchema, PartialEq, Eq)]
pub enum IntegrationPhase {
    #[serde(rename = "")]
    None,
    Initialization,
    #[serde(rename = "Waiting For Platform")]
    WaitingForPlatform,
    #[serde(rename = "Building Kit")]
    BuildingKit,
    Deploying,
    Running,
    Error,
}

impl Default for IntegrationPhase {
    fn default() -> Self {
        IntegrationPhase::None
    }
}

impl IntegrationPhase {
    /// Phases in which the integration has already been deployed.
    pub fn is_running(&self) -> bool {
        matches!(self, IntegrationPhase::Deploying | IntegrationPhase::Running | IntegrationPhase::Error)
    }
}

/// The observed state of an [`Integration`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStatus {
    #[serde(default)]
    pub phase: IntegrationPhase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generated_sources: Vec<SourceSpec>,
}

impl IntegrationStatus {
    /// Adds the dependency unless it is already present.
    pub fn add_dependency(&mut self, dependency: impl Into<String>) {
        let dependency = dependency.into();
        if !self.dependencies.contains(&dependency) {
            self.dependencies.push(dependency);
        }
    }

    /// Replaces the generated source with the same name, or appends it.
    pub fn add_or_replace_generated_source(&mut self, source: SourceSpec) {
        match self.generated_sources.iter_mut().find(|s| s.name == source.name) {
            Some(existing) => *existing = source,
            None => self.generated_sources.push(source),
        }
    }
}

impl Integration {
    pub fn phase(&self) -> IntegrationPhase {
        self.status.as_ref().map(|s| s.phase).unwrap_or_default()
    }

    pub fn in_phase(&self, phase: IntegrationPhase) -> bool {
        self.phase() == phase
    }

    pub fn in_running_phases(&self) -> bool {
        self.phase().is_running()
    }

    pub fn status_mut(&mut self) -> &mut IntegrationStatus {
        self.status.get_or_insert_with(IntegrationStatus::default)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_configuration_property_matches_whole_key() {
        let spec = IntegrationSpec {
            configuration: vec![
                ConfigurationSpec::property("camel.k.completionHandler.refName", "other"),
                ConfigurationSpec { type_: "env".into(), value: "camel.k.completionHandler.ref=env".into() },
                ConfigurationSpec::property("camel.k.completionHandler.ref", "myHandler"),
            ],
            ..Default::default()
        };
        assert_eq!(spec.get_configuration_property("camel.k.completionHandler.ref"), Some("myHandler"));
        assert_eq!(spec.get_configuration_property("camel.k"), None);
    }

    #[test]
    fn add_configuration_property_replaces() {
        let mut spec = IntegrationSpec::default();
        spec.add_configuration_property("a.b", "1");
        spec.add_configuration_property("a.bc", "2");
        spec.add_configuration_property("a.b", "3");
        assert_eq!(spec.configuration, vec![
            ConfigurationSpec::property("a.b", "3"),
            ConfigurationSpec::property("a.bc", "2"),
        ]);
    }

    #[test]
    fn value_may_contain_equals() {
        let mut spec = IntegrationSpec::default();
        spec.add_configuration_property("uri", "http://host?a=b");
        assert_eq!(spec.get_configuration_property("uri"), Some("http://host?a=b"));
    }

    #[test]
    fn retain_only_touches_properties() {
        let mut spec = IntegrationSpec::default();
        spec.add_configuration_property("a.b", "1");
        spec.add_configuration_property("a.c", "2");
        spec.add_configuration_property("d", "3");
        spec.configuration.push(ConfigurationSpec { type_: "env".into(), value: "a.e=4".into() });

        spec.retain_configuration_properties(|key| !key.starts_with("a."));
        assert_eq!(spec.get_configuration_property("a.b"), None);
        assert_eq!(spec.get_configuration_property("a.c"), None);
        assert_eq!(spec.get_configuration_property("d"), Some("3"));
        assert_eq!(spec.configuration.len(), 2);
        assert_eq!(spec.configuration[1].property_key(), None);
    }

    #[test]
    fn generated_sources_are_upserted_by_name() {
        let source = |content: &str| SourceSpec {
            name: "generated.yaml".into(),
            content: content.into(),
            language: Language::Yaml,
            type_: SourceType::CompletionHandler,
        };
        let mut status = IntegrationStatus::default();
        status.add_or_replace_generated_source(source("first"));
        status.add_or_replace_generated_source(source("second"));
        assert_eq!(status.generated_sources, vec![source("second")]);
    }

    #[test]
    fn status_deserializes() {
        let status: IntegrationStatus = serde_json::from_value(json!({
            "phase": "Building Kit",
            "dependencies": ["camel:log"],
            "generatedSources": [{
                "name": "camel-k-embedded-completion-handler.yaml",
                "content": "- completion-handler:\n    ref: defaultCompletionHandler\n",
                "language": "yaml",
                "type": "completion-handler"
            }]
        })).unwrap();
        assert_eq!(status.phase, IntegrationPhase::BuildingKit);
        assert!(!status.phase.is_running());
        assert_eq!(status.generated_sources[0].type_, SourceType::CompletionHandler);
    }
}
