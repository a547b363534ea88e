use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::metadata::ObjectMeta;

pub const HPA_API_VERSION: &str = "autoscaling/v1";
pub const HPA_KIND: &str = "HorizontalPodAutoscaler";

/// API version written into the scale target reference of new autoscalers.
pub const SCALE_TARGET_API_VERSION: &str = "extensions/v1beta1";
pub const SCALE_SUBRESOURCE: &str = "scale";

// --- Core ---

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalPodAutoscaler {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: HPASpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HPAStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Desired state
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HPASpec {
    pub scale_target_ref: ScaleTargetRef,
    #[serde(default)]
    pub min_replicas: Option<u32>,
    #[serde(default)]
    pub max_replicas: u32,
    /// Serialized as `null` when unset so the apiserver applies its own default.
    #[serde(default, rename = "targetCPUUtilizationPercentage")]
    pub target_cpu_utilization_percentage: Option<u32>,
}

/// Pointer from the autoscaler to the workload it scales.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTargetRef {
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subresource: Option<String>,
}

/// Actual state
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HPAStatus {
    #[serde(default)]
    pub current_replicas: u32,
    #[serde(default)]
    pub desired_replicas: u32,
    #[serde(default, rename = "currentCPUUtilizationPercentage")]
    pub current_cpu_utilization_percentage: Option<u32>,
    #[serde(default)]
    pub last_scale_time: Option<DateTime<Utc>>,
}

// --- Impl ---

impl HorizontalPodAutoscaler {
    pub fn new(metadata: ObjectMeta, spec: HPASpec) -> Self {
        HorizontalPodAutoscaler {
            api_version: HPA_API_VERSION.to_string(),
            kind: HPA_KIND.to_string(),
            metadata,
            spec,
            status: None,
            extra: Map::new(),
        }
    }
}

impl ScaleTargetRef {
    /// Reference to a workload through its `scale` subresource.
    pub fn scale(kind: impl Into<String>, name: impl Into<String>) -> Self {
        ScaleTargetRef {
            kind: kind.into(),
            name: name.into(),
            api_version: Some(SCALE_TARGET_API_VERSION.to_string()),
            subresource: Some(SCALE_SUBRESOURCE.to_string()),
        }
    }
}
