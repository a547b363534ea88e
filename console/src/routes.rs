//! Route parameters of the autoscale page and the kinds it accepts.

use std::{fmt, str::FromStr};

use shared::api::{ResourceGroup, kind_to_resource};

use crate::{errors::FormError, state::is_dns_subdomain};

/// Parameters the page was routed with. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteParams {
    pub project: String,
    pub kind: Option<String>,
    pub name: Option<String>,
    pub group: Option<String>,
}

/// Kinds an autoscaler can be created for, plus the autoscaler itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Deployment,
    DeploymentConfig,
    HorizontalPodAutoscaler,
    ReplicaSet,
    ReplicationController,
}

impl TargetKind {
    pub const ALL: [TargetKind; 5] = [
        TargetKind::Deployment,
        TargetKind::DeploymentConfig,
        TargetKind::HorizontalPodAutoscaler,
        TargetKind::ReplicaSet,
        TargetKind::ReplicationController,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Deployment => "Deployment",
            TargetKind::DeploymentConfig => "DeploymentConfig",
            TargetKind::HorizontalPodAutoscaler => "HorizontalPodAutoscaler",
            TargetKind::ReplicaSet => "ReplicaSet",
            TargetKind::ReplicationController => "ReplicationController",
        }
    }

    /// Editing an existing autoscaler rather than creating one for a workload.
    pub fn is_autoscaler(&self) -> bool {
        matches!(self, TargetKind::HorizontalPodAutoscaler)
    }

    /// API group serving the kind when the route does not name one.
    pub fn default_group(&self) -> &'static str {
        match self {
            TargetKind::Deployment | TargetKind::ReplicaSet => "apps",
            TargetKind::DeploymentConfig => "apps.openshift.io",
            TargetKind::HorizontalPodAutoscaler => "autoscaling",
            TargetKind::ReplicationController => "",
        }
    }

    /// Resource to fetch for this kind, honoring a group from the route.
    pub fn resource_group(&self, group: Option<&str>) -> ResourceGroup {
        if self.is_autoscaler() {
            return ResourceGroup::autoscalers();
        }
        let group = group.unwrap_or_else(|| self.default_group());
        ResourceGroup::new(kind_to_resource(self.as_str()), group)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = FormError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        TargetKind::ALL
            .into_iter()
            .find(|k| k.as_str() == kind)
            .ok_or_else(|| FormError::UnsupportedKind(kind.to_string()))
    }
}

impl RouteParams {
    pub fn new(project: impl Into<String>, kind: &str, name: &str) -> Self {
        RouteParams {
            project: project.into(),
            kind: Some(kind.to_string()),
            name: Some(name.to_string()),
            group: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref().filter(|g| !g.is_empty())
    }

    /// Checks kind and name are present, the kind is supported and the
    /// project and name are valid object names.
    pub fn validate(&self) -> Result<(TargetKind, &str), FormError> {
        let kind = self.kind.as_deref().filter(|k| !k.is_empty());
        let name = self.name.as_deref().filter(|n| !n.is_empty());
        let (Some(kind), Some(name)) = (kind, name) else {
            return Err(FormError::MissingParameter);
        };
        let kind = kind.parse()?;
        for routed in [self.project.as_str(), name] {
            if !is_dns_subdomain(routed) {
                return Err(FormError::InvalidName(routed.to_string()));
            }
        }
        Ok((kind, name))
    }
}
