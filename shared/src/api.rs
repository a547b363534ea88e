use std::fmt;

use serde::{Deserialize, Serialize};

// ============================= RESOURCE GROUPS

pub const HPA_RESOURCE: &str = "horizontalpodautoscalers";
pub const AUTOSCALING_GROUP: &str = "autoscaling";
pub const LIMIT_RANGE_RESOURCE: &str = "limitranges";

/// Addresses a resource type on the apiserver. An empty group is the core group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ResourceGroup {
    pub resource: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl ResourceGroup {
    pub fn new(resource: impl Into<String>, group: impl Into<String>) -> Self {
        ResourceGroup {
            resource: resource.into(),
            group: group.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// `autoscaling/v1` horizontal pod autoscalers, the only version the form edits.
    pub fn autoscalers() -> Self {
        ResourceGroup::new(HPA_RESOURCE, AUTOSCALING_GROUP).with_version("v1")
    }

    pub fn limit_ranges() -> Self {
        ResourceGroup::new(LIMIT_RANGE_RESOURCE, "")
    }

    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }

    /// Explicit version, or the preferred version of the group.
    pub fn version(&self) -> &str {
        self.version
            .as_deref()
            .unwrap_or_else(|| preferred_version(&self.group))
    }
}

impl fmt::Display for ResourceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_core() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Lowercase plural resource name for a kind, e.g. `ReplicaSet` -> `replicasets`.
pub fn kind_to_resource(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if lower.ends_with('s') {
        format!("{}es", lower)
    } else if let Some(stem) = lower.strip_suffix('y') {
        format!("{}ies", stem)
    } else {
        format!("{}s", lower)
    }
}

pub fn preferred_version(group: &str) -> &'static str {
    match group {
        "extensions" => "v1beta1",
        _ => "v1",
    }
}

/// Namespace the requests of one form are scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub project: String,
}

// ============================= VERBS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Update,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Create => write!(f, "create"),
            Verb::Update => write!(f, "update"),
        }
    }
}

// ============================= RESPONSES

#[derive(Deserialize, Serialize, Debug)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Failure body returned by the apiserver.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Status {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
}

// ============================= ACCESS REVIEW

pub const ACCESS_REVIEW_API_VERSION: &str = "authorization.k8s.io/v1";

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SelfSubjectAccessReview {
    pub api_version: String,
    pub kind: String,
    pub spec: AccessReviewSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccessReviewStatus>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AccessReviewSpec {
    pub resource_attributes: ResourceAttributes,
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct ResourceAttributes {
    pub namespace: String,
    pub verb: String,
    pub group: String,
    pub resource: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct AccessReviewStatus {
    #[serde(default)]
    pub allowed: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

impl SelfSubjectAccessReview {
    pub fn new(resource: &ResourceGroup, verb: Verb, namespace: &str) -> Self {
        SelfSubjectAccessReview {
            api_version: ACCESS_REVIEW_API_VERSION.to_string(),
            kind: "SelfSubjectAccessReview".to_string(),
            spec: AccessReviewSpec {
                resource_attributes: ResourceAttributes {
                    namespace: namespace.to_string(),
                    verb: verb.to_string(),
                    group: resource.group.clone(),
                    resource: resource.resource.clone(),
                },
            },
            status: None,
        }
    }

    pub fn allowed(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.allowed)
    }
}
