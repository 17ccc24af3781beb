//! The subset of the Camel catalog used to discover the dependencies of an endpoint uri.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const CAMEL_GROUP_ID: &str = "org.apache.camel";

/// Resolves the component serving an endpoint uri.
pub trait CamelCatalog {
    /// Returns the artifact providing the scheme of `uri`, and the scheme itself.
    fn decode_component(&self, uri: &str) -> (Option<&CamelArtifact>, Option<&CamelScheme>);
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MavenArtifact {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl MavenArtifact {
    pub fn dependency_id(&self) -> String {
        match &self.version {
            Some(version) => format!("mvn:{}:{}:{}", self.group_id, self.artifact_id, version),
            None => format!("mvn:{}:{}", self.group_id, self.artifact_id),
        }
    }
}

/// A catalog entry: the artifact and the uri schemes it serves.
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CamelArtifact {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub schemes: Vec<CamelScheme>,
}

impl CamelArtifact {
    /// Camel components are identified as `camel:<name>`, anything else by its maven coordinates.
    pub fn dependency_id(&self) -> String {
        match self.artifact_id.strip_prefix("camel-") {
            Some(name) if self.group_id == CAMEL_GROUP_ID => format!("camel:{name}"),
            _ => format!("mvn:{}:{}", self.group_id, self.artifact_id),
        }
    }

    /// Extra dependencies needed when producing to the given scheme.
    pub fn producer_dependency_ids(&self, scheme_id: &str) -> Vec<String> {
        self.schemes
            .iter()
            .filter(|s| s.id == scheme_id)
            .flat_map(|s| s.producer.dependencies.iter())
            .map(MavenArtifact::dependency_id)
            .collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CamelScheme {
    pub id: String,
    #[serde(default)]
    pub producer: CamelSchemeScope,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema, PartialEq)]
pub struct CamelSchemeScope {
    #[serde(default)]
    pub dependencies: Vec<MavenArtifact>,
}

/// A catalog held in memory, usually loaded from the runtime catalog yaml.
#[derive(Serialize, Deserialize, Clone, Debug, Default, JsonSchema)]
pub struct RuntimeCatalog {
    #[serde(default)]
    pub artifacts: Vec<CamelArtifact>,
}

impl RuntimeCatalog {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}

impl CamelCatalog for RuntimeCatalog {
    fn decode_component(&self, uri: &str) -> (Option<&CamelArtifact>, Option<&CamelScheme>) {
        let scheme_id = match uri.split_once(':') {
            Some((scheme, _)) if !scheme.is_empty() => scheme,
            _ => return (None, None),
        };

        self.artifacts
            .iter()
            .find_map(|artifact| artifact.schemes
                .iter()
                .find(|s| s.id == scheme_id)
                .map(|scheme| (Some(artifact), Some(scheme))))
            .unwrap_or((None, None))
    }
}
