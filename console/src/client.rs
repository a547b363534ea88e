//! # REST Client
//!
//! Talks to a Kubernetes style apiserver over HTTP. Implements every
//! apiserver facing collaborator of the form: projects, access reviews,
//! generic resource access and the metrics probe.

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    api::{ListResponse, RequestContext, ResourceGroup, SelfSubjectAccessReview, Status, Verb},
    models::Project,
};

use crate::{
    config::Config,
    errors::ApiError,
    services::{Authorizer, DataService, MetricsProbe, ProjectResolver},
};

const PROJECT_GROUP: &str = "project.openshift.io";
const AUTHORIZATION_GROUP: &str = "authorization.k8s.io";

#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    metrics_url: Option<String>,
}

impl RestClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ApiError::InvalidPath(format!("{}: {}", config.api_url, e)))?;

        Ok(RestClient {
            http,
            base_url,
            token: config.token.clone(),
            metrics_url: config.metrics_url.clone(),
        })
    }

    /// Namespaced URL of a resource collection, or of one object when `name` is set.
    ///
    /// Core resources live under `/api/<version>`, grouped ones under
    /// `/apis/<group>/<version>`.
    pub fn resource_url(
        &self,
        resource: &ResourceGroup,
        context: &RequestContext,
        name: Option<&str>,
    ) -> Result<Url, ApiError> {
        let mut segments = if resource.is_core() {
            vec!["api", resource.version()]
        } else {
            vec!["apis", resource.group.as_str(), resource.version()]
        };
        segments.extend([
            "namespaces",
            context.project.as_str(),
            resource.resource.as_str(),
        ]);
        segments.extend(name);
        self.endpoint(&segments)
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    ///
    /// Empty and dot segments are refused so a name can never step out of
    /// its collection.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        let mut path = url
            .path_segments_mut()
            .map_err(|_| ApiError::InvalidPath(self.base_url.to_string()))?;
        path.pop_if_empty();
        for segment in segments {
            if matches!(*segment, "" | "." | "..") {
                return Err(ApiError::InvalidPath(format!(
                    "invalid path segment {:?}",
                    segment
                )));
            }
            path.push(segment);
        }
        drop(path);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and decodes a successful body.
    ///
    /// Failures keep the `Status` body when the apiserver sent one.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let resp = request.send().await.map_err(|error| {
            tracing::warn!(%error, "Apiserver request failed");
            ApiError::Transport(error.to_string())
        })?;

        let code = resp.status();
        if !code.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let status = serde_json::from_str::<Status>(&body).ok();
            tracing::debug!(code=%code, "Apiserver rejected request");
            return Err(ApiError::Http {
                code: code.as_u16(),
                status,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProjectResolver for RestClient {
    async fn get(&self, project: &str) -> Result<(Project, RequestContext), ApiError> {
        let url = self.endpoint(&["apis", PROJECT_GROUP, "v1", "projects", project])?;
        let project: Project = self.send(self.request(Method::GET, url)).await?;
        let context = RequestContext {
            project: project.metadata.name.clone(),
        };
        Ok((project, context))
    }
}

#[async_trait]
impl Authorizer for RestClient {
    async fn can_i(
        &self,
        resource: &ResourceGroup,
        verb: Verb,
        project: &str,
    ) -> Result<bool, ApiError> {
        let url = self.endpoint(&["apis", AUTHORIZATION_GROUP, "v1", "selfsubjectaccessreviews"])?;
        let review = SelfSubjectAccessReview::new(resource, verb, project);
        let review: SelfSubjectAccessReview = self
            .send(self.request(Method::POST, url).json(&review))
            .await?;

        tracing::debug!(%resource, %verb, %project, allowed=review.allowed(), "Access review");
        Ok(review.allowed())
    }
}

#[async_trait]
impl DataService for RestClient {
    async fn get(
        &self,
        resource: &ResourceGroup,
        name: &str,
        context: &RequestContext,
    ) -> Result<Value, ApiError> {
        let url = self.resource_url(resource, context, Some(name))?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn list(
        &self,
        resource: &ResourceGroup,
        context: &RequestContext,
    ) -> Result<BTreeMap<String, Value>, ApiError> {
        let url = self.resource_url(resource, context, None)?;
        let list: ListResponse<Value> = self.send(self.request(Method::GET, url)).await?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|item| {
                let name = item.pointer("/metadata/name")?.as_str()?.to_string();
                Some((name, item))
            })
            .collect())
    }

    async fn create(
        &self,
        resource: &ResourceGroup,
        object: &Value,
        context: &RequestContext,
    ) -> Result<Value, ApiError> {
        let url = self.resource_url(resource, context, None)?;
        self.send(self.request(Method::POST, url).json(object))
            .await
    }

    async fn update(
        &self,
        resource: &ResourceGroup,
        name: &str,
        object: &Value,
        context: &RequestContext,
    ) -> Result<Value, ApiError> {
        let url = self.resource_url(resource, context, Some(name))?;
        self.send(self.request(Method::PUT, url).json(object))
            .await
    }
}

#[async_trait]
impl MetricsProbe for RestClient {
    async fn is_available(&self) -> Result<bool, ApiError> {
        let Some(url) = &self.metrics_url else {
            return Ok(false);
        };
        // metrics may be served by another host, the apiserver token stays home
        let resp = self.http.get(url).send().await?;
        Ok(resp.status().is_success())
    }
}
