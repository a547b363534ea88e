use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::metadata::ObjectMeta;

/// A scalable workload (deployment, replica set, ...) as far as autoscaling cares.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: WorkloadSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    #[serde(default)]
    pub replicas: Option<u32>,
    #[serde(default)]
    pub template: Option<PodTemplateSpec>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PodTemplateSpec {
    #[serde(default)]
    pub metadata: Option<ObjectMeta>,
    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<Container>,
}

// --- Containers ---

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub resources: ResourceRequirements,
}

/// Compute resources keyed by resource name (`cpu`, `memory`), values are quantities.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub limits: BTreeMap<String, String>,
}

// --- Impl ---

impl Workload {
    /// Containers of the pod template, empty when the workload has no template.
    pub fn containers(&self) -> &[Container] {
        self.spec
            .template
            .as_ref()
            .map(|t| t.spec.containers.as_slice())
            .unwrap_or_default()
    }
}

impl ResourceRequirements {
    pub fn request(&self, resource: &str) -> Option<&str> {
        self.requests.get(resource).map(String::as_str)
    }

    pub fn limit(&self, resource: &str) -> Option<&str> {
        self.limits.get(resource).map(String::as_str)
    }
}
