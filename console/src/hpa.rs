//! CPU request check
//!
//! CPU utilization is measured against the container's CPU request, so an
//! autoscaler is blind for any container that has none. A request can come
//! from the container itself or be defaulted by a project limit range.

use std::collections::BTreeMap;

use shared::models::{Container, LimitRange, LimitRangeItem, Project};

const CPU: &str = "cpu";

/// Whether every container ends up with a CPU request.
///
/// With cluster resource override enabled on the project, requests are derived
/// from limits, so a CPU limit is what has to be present instead.
pub fn has_cpu_request(
    containers: &[Container],
    limit_ranges: &BTreeMap<String, LimitRange>,
    project: &Project,
) -> bool {
    if project.resource_override_enabled() {
        let default_limit = has_default(limit_ranges, |item| &item.default);
        return containers
            .iter()
            .all(|c| default_limit || c.resources.limit(CPU).is_some());
    }

    let default_request = has_default(limit_ranges, |item| &item.default_request)
        || has_default(limit_ranges, |item| &item.default);
    containers
        .iter()
        .all(|c| default_request || c.resources.request(CPU).is_some())
}

fn has_default<F>(limit_ranges: &BTreeMap<String, LimitRange>, field: F) -> bool
where
    F: Fn(&LimitRangeItem) -> &BTreeMap<String, String>,
{
    limit_ranges
        .values()
        .flat_map(|lr| lr.container_limits())
        .any(|item| field(item).contains_key(CPU))
}
