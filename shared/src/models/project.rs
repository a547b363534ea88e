use serde::{Deserialize, Serialize};

use crate::models::metadata::ObjectMeta;

pub const DISPLAY_NAME_ANNOTATION: &str = "openshift.io/display-name";
pub const RESOURCE_OVERRIDE_ANNOTATION: &str =
    "quota.openshift.io/cluster-resource-override-enabled";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Project {
    pub metadata: ObjectMeta,
}

impl Project {
    /// Display name annotation, falling back to the project name.
    pub fn display_name(&self) -> &str {
        self.metadata
            .annotation(DISPLAY_NAME_ANNOTATION)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.metadata.name)
    }

    /// Whether requests are computed from limits by the cluster resource override.
    pub fn resource_override_enabled(&self) -> bool {
        self.metadata.annotation(RESOURCE_OVERRIDE_ANNOTATION) == Some("true")
    }
}
