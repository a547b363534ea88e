use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::metadata::ObjectMeta;

pub const CONTAINER_LIMIT_TYPE: &str = "Container";

/// Project level policy bounding and defaulting compute resources.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LimitRange {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: LimitRangeSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LimitRangeSpec {
    #[serde(default)]
    pub limits: Vec<LimitRangeItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitRangeItem {
    #[serde(rename = "type")]
    pub limit_type: String,
    /// Default limit, also used as the request when no `defaultRequest` is set.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_request: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub max: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub min: BTreeMap<String, String>,
}

impl LimitRange {
    /// Limit items applying to individual containers.
    pub fn container_limits(&self) -> impl Iterator<Item = &LimitRangeItem> {
        self.spec
            .limits
            .iter()
            .filter(|item| item.limit_type == CONTAINER_LIMIT_TYPE)
    }
}
