//! Component domain model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Pipeline stage a component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Preprocessing,
    Feature,
    Transformation,
    Model,
    Postprocessing,
    Monitoring,
    Explainability,
    /// Any type string the catalog uses that is not a known stage
    #[serde(other)]
    Unclassified,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Preprocessing => "preprocessing",
            ComponentType::Feature => "feature",
            ComponentType::Transformation => "transformation",
            ComponentType::Model => "model",
            ComponentType::Postprocessing => "postprocessing",
            ComponentType::Monitoring => "monitoring",
            ComponentType::Explainability => "explainability",
            ComponentType::Unclassified => "unclassified",
        }
    }

    /// Canonical stage bucket, `None` for unclassified components
    pub fn bucket(&self) -> Option<StageBucket> {
        match self {
            ComponentType::Preprocessing
            | ComponentType::Feature
            | ComponentType::Transformation => Some(StageBucket::Preparation),
            ComponentType::Model => Some(StageBucket::Model),
            ComponentType::Postprocessing => Some(StageBucket::Postprocessing),
            ComponentType::Monitoring | ComponentType::Explainability => {
                Some(StageBucket::Observation)
            }
            ComponentType::Unclassified => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical position group used when restructuring a pipeline
///
/// Variants are declared in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageBucket {
    /// preprocessing, feature and transformation components
    Preparation,
    Model,
    Postprocessing,
    /// monitoring and explainability components
    Observation,
}

impl StageBucket {
    pub const ORDER: [StageBucket; 4] = [
        StageBucket::Preparation,
        StageBucket::Model,
        StageBucket::Postprocessing,
        StageBucket::Observation,
    ];
}

/// Runtime requirements of a component
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentRequirements {
    /// Package requirements, in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Environments the component can run in
    #[serde(default)]
    pub environments: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cpu: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ram: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_gpu: Option<String>,
}

/// The persona credited with authoring a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub name: String,
    pub role: String,
    pub quote: String,
}

/// A selectable pipeline component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Unique catalog key
    pub id: String,

    /// Display name
    pub name: String,

    /// Pipeline stage
    #[serde(rename = "type")]
    pub component_type: ComponentType,

    pub description: String,

    /// Opaque code text shown to users
    #[serde(default)]
    pub code_snippet: String,

    #[serde(default)]
    pub requirements: ComponentRequirements,

    pub agent: AgentProfile,
}

/// The slice of a component shown to the LLM during selection
#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary<'a> {
    pub id: &'a str,
    pub name: &'a str,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub description: &'a str,
}

impl Component {
    pub fn is_type(&self, component_type: ComponentType) -> bool {
        self.component_type == component_type
    }

    pub fn summary(&self) -> ComponentSummary<'_> {
        ComponentSummary {
            id: &self.id,
            name: &self.name,
            component_type: self.component_type,
            description: &self.description,
        }
    }

    /// Flatten the component into a plain key/value record for transport
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("id".to_string(), Value::String(self.id.clone()));
        record.insert("name".to_string(), Value::String(self.name.clone()));
        record.insert(
            "type".to_string(),
            Value::String(self.component_type.as_str().to_string()),
        );
        record.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        record.insert(
            "requirements".to_string(),
            serde_json::to_value(&self.requirements).unwrap_or(Value::Null),
        );
        record.insert(
            "agent".to_string(),
            serde_json::to_value(&self.agent).unwrap_or(Value::Null),
        );
        record.insert(
            "code_snippet".to_string(),
            Value::String(self.code_snippet.clone()),
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "id": "standard_scaler",
            "name": "Standard Scaler",
            "type": "preprocessing",
            "description": "Normalizes numeric features.",
            "code_snippet": "from sklearn.preprocessing import StandardScaler",
            "requirements": {
                "dependencies": ["scikit-learn>=1.0.0"],
                "environments": ["Python 3.7+"]
            },
            "agent": {
                "name": "DataCleanerGPT",
                "role": "Data Preprocessing Expert",
                "quote": "Clean data is my jam!"
            }
        }"#
    }

    #[test]
    fn test_component_deserializes() {
        let component: Component = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(component.id, "standard_scaler");
        assert_eq!(component.component_type, ComponentType::Preprocessing);
        assert!(component.requirements.environments.contains("Python 3.7+"));
        assert!(component.requirements.min_gpu.is_none());
    }

    #[test]
    fn test_unknown_type_is_unclassified() {
        let json = sample_json().replace("\"preprocessing\"", "\"ensembling\"");
        let component: Component = serde_json::from_str(&json).unwrap();
        assert_eq!(component.component_type, ComponentType::Unclassified);
        assert_eq!(component.component_type.bucket(), None);
    }

    #[test]
    fn test_buckets_follow_pipeline_order() {
        assert_eq!(ComponentType::Feature.bucket(), Some(StageBucket::Preparation));
        assert_eq!(ComponentType::Explainability.bucket(), Some(StageBucket::Observation));
        assert!(StageBucket::Preparation < StageBucket::Model);
        assert!(StageBucket::Postprocessing < StageBucket::Observation);
    }

    #[test]
    fn test_record_is_flat() {
        let component: Component = serde_json::from_str(sample_json()).unwrap();
        let record = component.to_record();
        assert_eq!(record["id"], "standard_scaler");
        assert_eq!(record["type"], "preprocessing");
        assert_eq!(record["agent"]["name"], "DataCleanerGPT");
        assert_eq!(record["requirements"]["environments"][0], "Python 3.7+");
    }
}
