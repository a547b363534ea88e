//! # Collaborators
//!
//! Everything the autoscaler form talks to, behind traits so the controller
//! can be driven against a real apiserver or in-memory doubles.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde_json::Value;
use shared::{
    api::{RequestContext, ResourceGroup, Verb},
    models::Project,
};

use crate::errors::ApiError;

/// Resolves a project name into its descriptor and the context requests run in.
#[async_trait]
pub trait ProjectResolver: Send + Sync {
    async fn get(&self, project: &str) -> Result<(Project, RequestContext), ApiError>;
}

#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Whether the caller may perform `verb` on `resource` in `project`.
    async fn can_i(
        &self,
        resource: &ResourceGroup,
        verb: Verb,
        project: &str,
    ) -> Result<bool, ApiError>;
}

/// Generic access to namespaced resources, as raw JSON objects.
#[async_trait]
pub trait DataService: Send + Sync {
    async fn get(
        &self,
        resource: &ResourceGroup,
        name: &str,
        context: &RequestContext,
    ) -> Result<Value, ApiError>;

    /// Lists a resource type, indexed by `metadata.name`.
    async fn list(
        &self,
        resource: &ResourceGroup,
        context: &RequestContext,
    ) -> Result<BTreeMap<String, Value>, ApiError>;

    async fn create(
        &self,
        resource: &ResourceGroup,
        object: &Value,
        context: &RequestContext,
    ) -> Result<Value, ApiError>;

    async fn update(
        &self,
        resource: &ResourceGroup,
        name: &str,
        object: &Value,
        context: &RequestContext,
    ) -> Result<Value, ApiError>;
}

#[async_trait]
pub trait MetricsProbe: Send + Sync {
    /// Whether a metrics backend answers, autoscaling is inert without one.
    async fn is_available(&self) -> Result<bool, ApiError>;
}

/// Category tag of an error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    AccessDenied,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::AccessDenied => "access_denied",
        }
    }
}

pub trait Navigator: Send + Sync {
    fn to_error_page(&self, message: &str, category: Option<ErrorCategory>);

    /// Leave the form, returning to whatever page opened it.
    fn back(&self);
}

/// The full set of collaborators handed to the controller.
#[derive(Clone)]
pub struct Services {
    pub projects: Arc<dyn ProjectResolver>,
    pub authorizer: Arc<dyn Authorizer>,
    pub data: Arc<dyn DataService>,
    pub metrics: Arc<dyn MetricsProbe>,
    pub navigator: Arc<dyn Navigator>,
}

impl Services {
    /// Uses one backend for every apiserver facing role.
    pub fn from_backend<B>(backend: Arc<B>, navigator: Arc<dyn Navigator>) -> Self
    where
        B: ProjectResolver + Authorizer + DataService + MetricsProbe + 'static,
    {
        Services {
            projects: backend.clone(),
            authorizer: backend.clone(),
            data: backend.clone(),
            metrics: backend,
            navigator,
        }
    }
}
