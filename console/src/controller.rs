//! # Autoscale Form Controller
//!
//! Drives the create-or-edit autoscaler page:
//! - validates the route and resolves the project
//! - checks the caller may create (or update) autoscalers there
//! - loads the workload, or the autoscaler being edited, into the form
//! - submits the form as a create or an update and navigates back
//!
//! Every collaborator call is raced against the controller's cancellation
//! token, so nothing touches the form once the page is torn down.

use std::{collections::BTreeMap, future::Future};

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    api::{RequestContext, ResourceGroup, Verb},
    models::{HPASpec, HorizontalPodAutoscaler, LimitRange, ObjectMeta, Project, ScaleTargetRef, Workload},
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    breadcrumbs::{NavigationContext, breadcrumbs},
    config::Config,
    errors::{ApiError, FormError},
    hpa::has_cpu_request,
    routes::{RouteParams, TargetKind},
    services::{ErrorCategory, Services},
    state::{FormState, LIMIT_RANGE_ALERT, SaveAction},
};

const SUBPAGE: &str = "Autoscale";

/// Settings of the form that do not come from the route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSettings {
    /// CPU target submitted when the user leaves the field empty
    pub default_target_cpu: Option<u32>,
}

impl From<&Config> for FormSettings {
    fn from(config: &Config) -> Self {
        FormSettings {
            default_target_cpu: config.default_target_cpu,
        }
    }
}

/// Tears a form down from outside the task driving it.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    project: String,
    cancel: CancellationToken,
}

impl TeardownHandle {
    /// Abandons the page: pending and later requests resolve to
    /// [`FormError::Cancelled`] without touching the form.
    pub fn teardown(&self) {
        tracing::debug!(project=%self.project, "Autoscale form torn down");
        self.cancel.cancel();
    }
}

pub struct AutoscaleFormController {
    params: RouteParams,
    services: Services,
    state: watch::Sender<FormState>,
    cancel: CancellationToken,
    context: Option<RequestContext>,
    /// Autoscaler as loaded, updates are applied on a copy of it
    autoscaler: Option<HorizontalPodAutoscaler>,
}

impl AutoscaleFormController {
    pub fn new(params: RouteParams, services: Services, settings: FormSettings) -> Self {
        let initial = match params.validate() {
            Ok((kind, name)) => FormState::for_route(kind, name, settings.default_target_cpu),
            Err(_) => FormState::default(),
        };
        let (state, _) = watch::channel(initial);

        AutoscaleFormController {
            params,
            services,
            state,
            cancel: CancellationToken::new(),
            context: None,
            autoscaler: None,
        }
    }

    /// Receiver notified on every change of the form.
    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Snapshot of the current form.
    pub fn state(&self) -> FormState {
        self.state.borrow().clone()
    }

    /// Applies a user edit to the form.
    pub fn update(&self, edit: impl FnOnce(&mut FormState)) {
        self.state.send_modify(edit);
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        TeardownHandle {
            project: self.params.project.clone(),
            cancel: self.cancel.clone(),
        }
    }

    /// See [`TeardownHandle::teardown`].
    pub fn teardown(&self) {
        self.teardown_handle().teardown();
    }

    /// Runs `fut` unless the form is torn down first.
    async fn guard<T>(&self, fut: impl Future<Output = T>) -> Result<T, FormError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(FormError::Cancelled),
            out = fut => Ok(out),
        }
    }

    fn fail(&self, err: FormError, category: Option<ErrorCategory>) -> FormError {
        tracing::warn!(error=%err, "Leaving autoscale form");
        self.services.navigator.to_error_page(&err.to_string(), category);
        err
    }

    // ============================= LOAD

    /// Validates the route and populates the form from the apiserver.
    ///
    /// Route, project and permission failures navigate to the error page.
    /// A target that cannot be fetched leaves an inline alert and no save
    /// action bound.
    pub async fn load(&mut self) -> Result<(), FormError> {
        if self.cancel.is_cancelled() {
            return Err(FormError::Cancelled);
        }
        let (kind, name) = match self.params.validate() {
            Ok((kind, name)) => (kind, name.to_string()),
            Err(err) => return Err(self.fail(err, None)),
        };
        let project_name = self.params.project.clone();
        tracing::info!(project=%project_name, %kind, %name, "Loading autoscale form");

        let services = self.services.clone();
        let (metrics, resolved) = tokio::join!(
            self.guard(services.metrics.is_available()),
            self.guard(services.projects.get(&project_name)),
        );

        let available = metrics?.unwrap_or_else(|error| {
            tracing::debug!(%error, "Metrics probe failed");
            false
        });
        self.state.send_modify(|s| s.metrics_warning = !available);

        let (project, context) = match resolved? {
            Ok(resolved) => resolved,
            Err(err) => return Err(self.fail(FormError::Project(project_name, err), None)),
        };
        self.state.send_modify(|s| s.project = Some(project.clone()));

        let verb = if kind.is_autoscaler() {
            Verb::Update
        } else {
            Verb::Create
        };
        let allowed = self
            .guard(
                services
                    .authorizer
                    .can_i(&ResourceGroup::autoscalers(), verb, &project_name),
            )
            .await?
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "Access review failed, treating as denied");
                false
            });
        if !allowed {
            let err = FormError::Forbidden {
                verb: verb.to_string(),
                project: project_name,
            };
            return Err(self.fail(err, Some(ErrorCategory::AccessDenied)));
        }
        self.context = Some(context.clone());

        let resource = kind.resource_group(self.params.group());
        let object = match self.guard(services.data.get(&resource, &name, &context)).await? {
            Ok(object) => object,
            Err(err) => return Err(self.fail_load(kind, &name, err)),
        };

        if kind.is_autoscaler() {
            let hpa: HorizontalPodAutoscaler = match decode(object) {
                Ok(hpa) => hpa,
                Err(err) => return Err(self.fail_load(kind, &name, err)),
            };
            self.populate_autoscaler(&hpa, &project);
            self.autoscaler = Some(hpa);
        } else {
            let workload: Workload = match decode(object) {
                Ok(workload) => workload,
                Err(err) => return Err(self.fail_load(kind, &name, err)),
            };
            self.populate_workload(kind, &workload, &project);
            self.check_cpu_request(&workload, &project, &context).await?;
        }

        Ok(())
    }

    fn fail_load(&self, kind: TargetKind, name: &str, err: ApiError) -> FormError {
        tracing::warn!(%kind, %name, error=%err, "Failed to load autoscale target");
        let message = format!("An error occurred loading {} \"{}\".", kind, name);
        self.state
            .send_modify(|s| s.fail_load(message, err.details()));
        FormError::Load(err)
    }

    fn populate_autoscaler(&self, hpa: &HorizontalPodAutoscaler, project: &Project) {
        let target = &hpa.spec.scale_target_ref;
        // autoscalers have no page of their own, the trail goes through the target
        let trail = breadcrumbs(&NavigationContext {
            kind: &target.kind,
            name: &target.name,
            project,
            subpage: Some(SUBPAGE),
            include_project: true,
        });

        self.state.send_modify(|s| {
            s.populate_labels(&hpa.metadata.labels);
            s.populate_from_autoscaler(hpa);
            s.breadcrumbs = trail;
            s.save_action = Some(SaveAction::Update);
        });
    }

    fn populate_workload(&self, kind: TargetKind, workload: &Workload, project: &Project) {
        let object_kind = if workload.kind.is_empty() {
            kind.as_str()
        } else {
            workload.kind.as_str()
        };
        let trail = breadcrumbs(&NavigationContext {
            kind: object_kind,
            name: &workload.metadata.name,
            project,
            subpage: Some(SUBPAGE),
            include_project: true,
        });

        self.state.send_modify(|s| {
            s.populate_labels(&workload.metadata.labels);
            s.breadcrumbs = trail;
            s.save_action = Some(SaveAction::Create);
        });
    }

    /// Warns when some container would have no CPU request to scale against.
    async fn check_cpu_request(
        &self,
        workload: &Workload,
        project: &Project,
        context: &RequestContext,
    ) -> Result<(), FormError> {
        let listed = self
            .guard(self.services.data.list(&ResourceGroup::limit_ranges(), context))
            .await?;

        let limit_ranges = match listed.and_then(decode_all::<LimitRange>) {
            Ok(limit_ranges) => limit_ranges,
            Err(err) => {
                tracing::warn!(error=%err, "Failed to list limit ranges");
                self.state.send_modify(|s| {
                    s.warn(
                        LIMIT_RANGE_ALERT,
                        "Could not check the project's default CPU request.".to_string(),
                        err.details(),
                    )
                });
                return Ok(());
            }
        };

        let has_request = has_cpu_request(workload.containers(), &limit_ranges, project);
        tracing::debug!(has_request, limit_ranges = limit_ranges.len(), "Checked CPU requests");
        self.state
            .send_modify(|s| s.show_cpu_request_warning = !has_request);
        Ok(())
    }

    // ============================= SAVE

    /// Autoscaler the bound save action would submit, without submitting it.
    pub fn preview(&self) -> Result<HorizontalPodAutoscaler, FormError> {
        let state = self.state.borrow();
        let action = state.save_action.ok_or(FormError::NotReady)?;
        state.validate(action)?;

        match action {
            SaveAction::Create => Ok(self.new_autoscaler(&state)),
            SaveAction::Update => {
                let loaded = self.autoscaler.as_ref().ok_or(FormError::NotReady)?;
                Ok(updated_autoscaler(loaded, &state))
            }
        }
    }

    fn new_autoscaler(&self, state: &FormState) -> HorizontalPodAutoscaler {
        let (kind, name) = (
            self.params.kind.clone().unwrap_or_default(),
            self.params.name.clone().unwrap_or_default(),
        );
        HorizontalPodAutoscaler::new(
            ObjectMeta {
                name: state.name.clone(),
                labels: state.compacted_labels(),
                ..Default::default()
            },
            HPASpec {
                scale_target_ref: ScaleTargetRef::scale(kind, name),
                min_replicas: state.min_replicas,
                max_replicas: state.max_replicas.unwrap_or_default(),
                target_cpu_utilization_percentage: state.effective_target_cpu(),
            },
        )
    }

    /// Submits the form with the bound save action.
    ///
    /// Inputs stay disabled while the request is pending. On success the form
    /// is marked done and the navigator goes back; on failure inputs are
    /// re-enabled and the error is shown inline.
    pub async fn save(&mut self) -> Result<(), FormError> {
        if self.cancel.is_cancelled() {
            return Err(FormError::Cancelled);
        }
        let hpa = self.preview()?;
        let context = self.context.clone().ok_or(FormError::NotReady)?;
        let action = self.state.borrow().save_action.ok_or(FormError::NotReady)?;
        let body = serde_json::to_value(&hpa).map_err(|e| FormError::Save(e.into()))?;
        let resource = ResourceGroup::autoscalers();
        let name = hpa.metadata.name.clone();

        self.state.send_modify(FormState::begin_save);
        tracing::info!(%name, ?action, project=%context.project, "Saving autoscaler");

        let data = self.services.data.clone();
        let result = match action {
            SaveAction::Create => self.guard(data.create(&resource, &body, &context)).await?,
            SaveAction::Update => {
                self.guard(data.update(&resource, &name, &body, &context))
                    .await?
            }
        };

        match result {
            Ok(_) => {
                self.state.send_modify(FormState::finish_save);
                self.services.navigator.back();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%name, error=%err, "Failed to save autoscaler");
                let message = match action {
                    SaveAction::Create => {
                        "An error occurred creating the horizontal pod autoscaler.".to_string()
                    }
                    SaveAction::Update => format!(
                        "An error occurred updating horizontal pod autoscaler \"{}\".",
                        name
                    ),
                };
                self.state
                    .send_modify(|s| s.fail_save(message, err.details()));
                Err(FormError::Save(err))
            }
        }
    }
}

/// Copy of a loaded autoscaler carrying the form's labels and bounds.
fn updated_autoscaler(loaded: &HorizontalPodAutoscaler, state: &FormState) -> HorizontalPodAutoscaler {
    let mut hpa = loaded.clone();
    hpa.metadata.labels = state.compacted_labels();
    hpa.spec.min_replicas = state.min_replicas;
    hpa.spec.max_replicas = state.max_replicas.unwrap_or_default();
    hpa.spec.target_cpu_utilization_percentage = state.effective_target_cpu();
    hpa
}

fn decode<T: DeserializeOwned>(object: Value) -> Result<T, ApiError> {
    serde_json::from_value(object).map_err(ApiError::from)
}

fn decode_all<T: DeserializeOwned>(
    objects: BTreeMap<String, Value>,
) -> Result<BTreeMap<String, T>, ApiError> {
    objects
        .into_iter()
        .map(|(name, object)| Ok((name, decode(object)?)))
        .collect()
}
