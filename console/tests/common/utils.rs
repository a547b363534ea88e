use std::sync::Arc;
use std::time::Duration;

use hpa_console::controller::{AutoscaleFormController, FormSettings};
use hpa_console::routes::RouteParams;
use hpa_console::services::Services;
use serde_json::{Value, json};

use super::test_cluster::{TestCluster, TestNavigator};

pub fn start_form(
    cluster: TestCluster,
    params: RouteParams,
) -> (AutoscaleFormController, Arc<TestCluster>, Arc<TestNavigator>) {
    let cluster = Arc::new(cluster);
    let navigator = Arc::new(TestNavigator::default());
    let services = Services::from_backend(cluster.clone(), navigator.clone());
    let settings = FormSettings {
        default_target_cpu: Some(80),
    };
    (
        AutoscaleFormController::new(params, services, settings),
        cluster,
        navigator,
    )
}

pub fn deployment(name: &str, labels: Value, containers: Value) -> Value {
    json!({
        "apiVersion": "apps/v1",
        "kind": "Deployment",
        "metadata": { "name": name, "labels": labels },
        "spec": {
            "replicas": 1,
            "template": { "spec": { "containers": containers } }
        }
    })
}

pub fn autoscaler(name: &str, target_kind: &str, target_name: &str) -> Value {
    json!({
        "apiVersion": "autoscaling/v1",
        "kind": "HorizontalPodAutoscaler",
        "metadata": {
            "name": name,
            "resourceVersion": "7",
            "labels": { "app": "web" }
        },
        "spec": {
            "scaleTargetRef": { "kind": target_kind, "name": target_name, "apiVersion": "apps/v1" },
            "minReplicas": 2,
            "maxReplicas": 5,
            "targetCPUUtilizationPercentage": 70
        }
    })
}

pub fn limit_range(name: &str, default_request_cpu: &str) -> Value {
    json!({
        "metadata": { "name": name },
        "spec": {
            "limits": [
                { "type": "Container", "defaultRequest": { "cpu": default_request_cpu } }
            ]
        }
    })
}

/// Waits until the cluster saw a call starting with `prefix`.
pub async fn wait_for_call(cluster: &TestCluster, prefix: &str) {
    for _ in 0..200 {
        if cluster.calls().await.iter().any(|c| c.starts_with(prefix)) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("no call starting with {:?}", prefix);
}
