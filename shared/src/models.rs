pub mod hpa;
pub mod limitrange;
pub mod metadata;
pub mod project;
pub mod workload;

pub use hpa::{HPASpec, HPAStatus, HorizontalPodAutoscaler, ScaleTargetRef};
pub use limitrange::{LimitRange, LimitRangeItem, LimitRangeSpec};
pub use metadata::ObjectMeta;
pub use project::Project;
pub use workload::{Container, PodSpec, PodTemplateSpec, ResourceRequirements, Workload, WorkloadSpec};
