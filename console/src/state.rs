//! # Form State
//!
//! Everything the autoscale page renders. The controller owns the only
//! writer and mutates it through the transitions below; views hold a
//! `watch` receiver and re-render on change.

use std::collections::BTreeMap;

use shared::{
    keyvalue::{Entry, compact_entries, entries_from_map, map_entries},
    models::{HorizontalPodAutoscaler, Project},
};

use crate::{breadcrumbs::Breadcrumb, errors::FormError, routes::TargetKind};

/// Alert raised by a failed create or update.
pub const SAVE_ALERT: &str = "autoscaling";
/// Alert raised when the target resource cannot be loaded.
pub const LOAD_ALERT: &str = "load";
/// Alert raised when limit ranges cannot be listed.
pub const LIMIT_RANGE_ALERT: &str = "limitranges";

const MAX_NAME_LEN: usize = 253;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub alert_type: AlertType,
    pub message: String,
    pub details: String,
}

/// What submitting the form does, bound once the target is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Create,
    Update,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub target_kind: Option<String>,
    pub target_name: Option<String>,
    /// Name of the autoscaler
    pub name: String,
    pub min_replicas: Option<u32>,
    pub max_replicas: Option<u32>,
    pub target_cpu: Option<u32>,
    pub default_target_cpu: Option<u32>,
    pub labels: Vec<Entry>,

    pub disable_inputs: bool,
    pub metrics_warning: bool,
    pub show_cpu_request_warning: bool,
    pub alerts: BTreeMap<String, Alert>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub save_action: Option<SaveAction>,
    pub done_editing: bool,
    pub project: Option<Project>,
}

impl FormState {
    /// Initial state for a validated route.
    ///
    /// Editing an existing autoscaler starts disabled with an unknown target
    /// until the object is loaded.
    pub fn for_route(kind: TargetKind, name: &str, default_target_cpu: Option<u32>) -> Self {
        let mut state = FormState {
            name: name.to_string(),
            default_target_cpu,
            ..Default::default()
        };
        if kind.is_autoscaler() {
            state.disable_inputs = true;
        } else {
            state.target_kind = Some(kind.as_str().to_string());
            state.target_name = Some(name.to_string());
        }
        state
    }

    // --- User edits ---

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_min_replicas(&mut self, min: Option<u32>) {
        self.min_replicas = min;
    }

    pub fn set_max_replicas(&mut self, max: Option<u32>) {
        self.max_replicas = max;
    }

    pub fn set_target_cpu(&mut self, cpu: Option<u32>) {
        self.target_cpu = cpu;
    }

    pub fn set_labels(&mut self, labels: Vec<Entry>) {
        self.labels = labels;
    }

    /// Appends a label row. Of rows sharing a name, the last one is submitted.
    pub fn add_label(&mut self, entry: Entry) {
        self.labels.push(entry);
    }

    pub fn remove_label(&mut self, index: usize) -> Option<Entry> {
        (index < self.labels.len()).then(|| self.labels.remove(index))
    }

    pub fn dismiss_alert(&mut self, key: &str) {
        self.alerts.remove(key);
    }

    // --- Population ---

    pub fn populate_labels(&mut self, labels: &BTreeMap<String, String>) {
        self.labels = entries_from_map(labels);
    }

    pub fn populate_from_autoscaler(&mut self, hpa: &HorizontalPodAutoscaler) {
        let spec = &hpa.spec;
        self.target_kind = Some(spec.scale_target_ref.kind.clone());
        self.target_name = Some(spec.scale_target_ref.name.clone());
        self.min_replicas = spec.min_replicas;
        self.max_replicas = Some(spec.max_replicas);
        self.target_cpu = spec.target_cpu_utilization_percentage;
        self.disable_inputs = false;
    }

    pub fn fail_load(&mut self, message: String, details: String) {
        self.alerts.insert(
            LOAD_ALERT.to_string(),
            Alert {
                alert_type: AlertType::Error,
                message,
                details,
            },
        );
    }

    pub fn warn(&mut self, key: &str, message: String, details: String) {
        self.alerts.insert(
            key.to_string(),
            Alert {
                alert_type: AlertType::Warning,
                message,
                details,
            },
        );
    }

    // --- Submission ---

    pub fn begin_save(&mut self) {
        self.disable_inputs = true;
    }

    pub fn finish_save(&mut self) {
        self.alerts.remove(SAVE_ALERT);
        self.done_editing = true;
    }

    pub fn fail_save(&mut self, message: String, details: String) {
        self.disable_inputs = false;
        self.alerts.insert(
            SAVE_ALERT.to_string(),
            Alert {
                alert_type: AlertType::Error,
                message,
                details,
            },
        );
    }

    // --- Derived values ---

    /// Label rows with a name and a value, as a map.
    pub fn compacted_labels(&self) -> BTreeMap<String, String> {
        map_entries(&compact_entries(&self.labels))
    }

    /// CPU target from the form, else the default, else unset.
    pub fn effective_target_cpu(&self) -> Option<u32> {
        self.target_cpu.or(self.default_target_cpu)
    }

    /// Checks the values before they are submitted.
    pub fn validate(&self, action: SaveAction) -> Result<(), FormError> {
        if action == SaveAction::Create && !is_dns_subdomain(&self.name) {
            return Err(FormError::Invalid(format!(
                "name \"{}\" must consist of lower case alphanumeric characters, '-' or '.', \
                 and must start and end with an alphanumeric character",
                self.name
            )));
        }
        if self.min_replicas == Some(0) {
            return Err(FormError::Invalid("min pods must be at least 1".into()));
        }
        let max = match self.max_replicas {
            None => return Err(FormError::Invalid("max pods is required".into())),
            Some(0) => return Err(FormError::Invalid("max pods must be at least 1".into())),
            Some(max) => max,
        };
        match self.min_replicas {
            Some(min) if max < min => {
                return Err(FormError::Invalid(format!(
                    "max pods ({}) must be greater than or equal to min pods ({})",
                    max, min
                )));
            }
            _ => {}
        }
        if self.target_cpu.is_some_and(|cpu| !(1..=100).contains(&cpu)) {
            return Err(FormError::Invalid(
                "CPU request target must be between 1 and 100".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn is_dns_subdomain(name: &str) -> bool {
    let valid_char = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name.chars().all(|c| valid_char(c) || c == '-' || c == '.')
        && name.starts_with(valid_char)
        && name.ends_with(valid_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{HPASpec, ObjectMeta, ScaleTargetRef};

    fn valid_state() -> FormState {
        let mut state = FormState::for_route(TargetKind::Deployment, "web", Some(80));
        state.set_min_replicas(Some(1));
        state.set_max_replicas(Some(4));
        state
    }

    #[test]
    fn test_initial_state_for_workload() {
        let state = FormState::for_route(TargetKind::ReplicaSet, "web-1", None);
        assert!(!state.disable_inputs);
        assert_eq!(state.target_kind.as_deref(), Some("ReplicaSet"));
        assert_eq!(state.target_name.as_deref(), Some("web-1"));
        assert_eq!(state.name, "web-1");
        assert_eq!(state.save_action, None);
    }

    #[test]
    fn test_initial_state_for_autoscaler() {
        let state = FormState::for_route(TargetKind::HorizontalPodAutoscaler, "web", None);
        assert!(state.disable_inputs);
        assert_eq!(state.target_kind, None);
        assert_eq!(state.target_name, None);
    }

    #[test]
    fn test_populate_from_autoscaler_enables_inputs() {
        let mut state = FormState::for_route(TargetKind::HorizontalPodAutoscaler, "web", None);
        let hpa = HorizontalPodAutoscaler::new(
            ObjectMeta::named("web"),
            HPASpec {
                scale_target_ref: ScaleTargetRef::scale("DeploymentConfig", "frontend"),
                min_replicas: Some(2),
                max_replicas: 7,
                target_cpu_utilization_percentage: Some(60),
            },
        );

        state.populate_from_autoscaler(&hpa);

        assert!(!state.disable_inputs);
        assert_eq!(state.target_kind.as_deref(), Some("DeploymentConfig"));
        assert_eq!(state.target_name.as_deref(), Some("frontend"));
        assert_eq!((state.min_replicas, state.max_replicas, state.target_cpu), (Some(2), Some(7), Some(60)));
    }

    #[test]
    fn test_effective_cpu_falls_back_to_default() {
        let mut state = valid_state();
        assert_eq!(state.effective_target_cpu(), Some(80));
        state.set_target_cpu(Some(50));
        assert_eq!(state.effective_target_cpu(), Some(50));
        state.default_target_cpu = None;
        state.set_target_cpu(None);
        assert_eq!(state.effective_target_cpu(), None);
    }

    #[test]
    fn test_label_editing() {
        let mut state = valid_state();
        state.add_label(Entry::new("app", "web"));
        state.add_label(Entry::new("tier", ""));
        state.add_label(Entry::new("app", "api"));

        assert_eq!(state.labels.len(), 3);
        assert_eq!(
            state.compacted_labels(),
            BTreeMap::from([("app".to_string(), "api".to_string())])
        );
        assert_eq!(state.remove_label(1), Some(Entry::new("tier", "")));
        assert_eq!(state.remove_label(5), None);
    }

    #[test]
    fn test_save_transitions() {
        let mut state = valid_state();
        state.begin_save();
        assert!(state.disable_inputs);

        state.fail_save("An error occurred".into(), "Status: 500".into());
        assert!(!state.disable_inputs);
        assert_eq!(state.alerts[SAVE_ALERT].alert_type, AlertType::Error);

        state.begin_save();
        state.finish_save();
        assert!(state.done_editing);
        assert!(state.alerts.is_empty());
    }

    #[test]
    fn test_validate() {
        assert_eq!(valid_state().validate(SaveAction::Create), Ok(()));

        let mut state = valid_state();
        state.set_name("Web_App");
        assert!(matches!(state.validate(SaveAction::Create), Err(FormError::Invalid(_))));
        // names of existing autoscalers are not edited
        assert_eq!(state.validate(SaveAction::Update), Ok(()));

        let mut state = valid_state();
        state.set_max_replicas(None);
        assert!(state.validate(SaveAction::Create).is_err());

        let mut state = valid_state();
        state.set_min_replicas(Some(5));
        assert!(state.validate(SaveAction::Create).is_err());

        let mut state = valid_state();
        state.set_min_replicas(Some(0));
        assert!(state.validate(SaveAction::Create).is_err());

        let mut state = valid_state();
        state.set_target_cpu(Some(101));
        assert!(state.validate(SaveAction::Create).is_err());
    }

    #[test]
    fn test_dns_subdomain() {
        assert!(is_dns_subdomain("web-1.frontend"));
        assert!(!is_dns_subdomain("-web"));
        assert!(!is_dns_subdomain("web."));
        assert!(!is_dns_subdomain(""));
        assert!(!is_dns_subdomain(&"a".repeat(254)));
    }
}
