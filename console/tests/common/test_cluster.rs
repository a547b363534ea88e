//! In-memory apiserver and navigator for driving the autoscale form in tests.
//! Records every call and can be told to fail or stall individual operations.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::lock::Mutex;
use hpa_console::errors::ApiError;
use hpa_console::services::{
    Authorizer, DataService, ErrorCategory, MetricsProbe, Navigator, ProjectResolver,
};
use serde_json::Value;
use shared::api::{RequestContext, ResourceGroup, Status, Verb};
use shared::models::Project;
use tokio::sync::Notify;

#[derive(Clone)]
pub struct TestCluster {
    objects: Arc<DashMap<String, Value>>,
    pub project: Project,
    pub allow: bool,
    pub metrics_available: bool,
    pub fail_project: bool,
    pub fail_get: bool,
    pub fail_list: bool,
    /// Switchable while a form is running, to fail a save and then retry it
    pub fail_create: Arc<AtomicBool>,
    pub fail_update: Arc<AtomicBool>,
    /// When set, `get` waits for a notification before answering
    pub hold_get: Option<Arc<Notify>>,

    pub calls: Arc<Mutex<Vec<String>>>,
    pub created: Arc<Mutex<Vec<Value>>>,
    pub updated: Arc<Mutex<Vec<(String, Value)>>>,
}

impl TestCluster {
    pub fn new(project: &str) -> Self {
        let mut p = Project::default();
        p.metadata.name = project.to_string();
        Self {
            objects: Arc::new(DashMap::new()),
            project: p,
            allow: true,
            metrics_available: true,
            fail_project: false,
            fail_get: false,
            fail_list: false,
            fail_create: Arc::new(AtomicBool::new(false)),
            fail_update: Arc::new(AtomicBool::new(false)),
            hold_get: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            updated: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Stores an object under its resource and `metadata.name`.
    pub fn put(&self, resource: &str, object: Value) {
        let name = object["metadata"]["name"].as_str().unwrap_or_default().to_string();
        self.objects.insert(format!("{}/{}", resource, name), object);
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }

    fn forced(code: u16) -> ApiError {
        ApiError::Http {
            code,
            status: Some(Status {
                message: Some("Forced error".into()),
                code: Some(code),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl ProjectResolver for TestCluster {
    async fn get(&self, project: &str) -> Result<(Project, RequestContext), ApiError> {
        self.record(format!("project {}", project)).await;
        if self.fail_project {
            return Err(Self::forced(404));
        }
        let context = RequestContext {
            project: project.to_string(),
        };
        Ok((self.project.clone(), context))
    }
}

#[async_trait]
impl Authorizer for TestCluster {
    async fn can_i(
        &self,
        resource: &ResourceGroup,
        verb: Verb,
        project: &str,
    ) -> Result<bool, ApiError> {
        self.record(format!("can_i {} {} {}", verb, resource, project)).await;
        Ok(self.allow)
    }
}

#[async_trait]
impl DataService for TestCluster {
    async fn get(
        &self,
        resource: &ResourceGroup,
        name: &str,
        _context: &RequestContext,
    ) -> Result<Value, ApiError> {
        self.record(format!("get {}/{}", resource, name)).await;
        if let Some(gate) = &self.hold_get {
            gate.notified().await;
        }
        if self.fail_get {
            return Err(Self::forced(500));
        }
        self.objects
            .get(&format!("{}/{}", resource.resource, name))
            .map(|entry| entry.value().clone())
            .ok_or(ApiError::Http {
                code: 404,
                status: None,
            })
    }

    async fn list(
        &self,
        resource: &ResourceGroup,
        _context: &RequestContext,
    ) -> Result<BTreeMap<String, Value>, ApiError> {
        self.record(format!("list {}", resource)).await;
        if self.fail_list {
            return Err(Self::forced(403));
        }
        let prefix = format!("{}/", resource.resource);
        Ok(self
            .objects
            .iter()
            .filter_map(|entry| {
                let name = entry.key().strip_prefix(&prefix)?;
                Some((name.to_string(), entry.value().clone()))
            })
            .collect())
    }

    async fn create(
        &self,
        resource: &ResourceGroup,
        object: &Value,
        _context: &RequestContext,
    ) -> Result<Value, ApiError> {
        self.record(format!("create {}", resource)).await;
        self.created.lock().await.push(object.clone());
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::forced(422));
        }
        Ok(object.clone())
    }

    async fn update(
        &self,
        resource: &ResourceGroup,
        name: &str,
        object: &Value,
        _context: &RequestContext,
    ) -> Result<Value, ApiError> {
        self.record(format!("update {}/{}", resource, name)).await;
        self.updated
            .lock()
            .await
            .push((name.to_string(), object.clone()));
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(Self::forced(409));
        }
        Ok(object.clone())
    }
}

#[async_trait]
impl MetricsProbe for TestCluster {
    async fn is_available(&self) -> Result<bool, ApiError> {
        self.record("metrics".to_string()).await;
        Ok(self.metrics_available)
    }
}

/// Records where the form navigated to.
#[derive(Debug, Default)]
pub struct TestNavigator {
    pub error_pages: StdMutex<Vec<(String, Option<ErrorCategory>)>>,
    pub back_calls: StdMutex<usize>,
}

impl TestNavigator {
    pub fn error_pages(&self) -> Vec<(String, Option<ErrorCategory>)> {
        self.error_pages.lock().unwrap().clone()
    }

    pub fn back_calls(&self) -> usize {
        *self.back_calls.lock().unwrap()
    }
}

impl Navigator for TestNavigator {
    fn to_error_page(&self, message: &str, category: Option<ErrorCategory>) {
        self.error_pages
            .lock()
            .unwrap()
            .push((message.to_string(), category));
    }

    fn back(&self) {
        *self.back_calls.lock().unwrap() += 1;
    }
}
