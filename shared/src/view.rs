use std::borrow::Cow;

use chrono::Utc;
use tabled::Tabled;

use crate::models::HorizontalPodAutoscaler;

impl Tabled for HorizontalPodAutoscaler {
    const LENGTH: usize = 7;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        let spec = &self.spec;
        let current_cpu = self
            .status
            .as_ref()
            .and_then(|s| s.current_cpu_utilization_percentage)
            .map(|c| format!("{}%", c))
            .unwrap_or_else(|| "<unknown>".to_string());
        let target_cpu = spec
            .target_cpu_utilization_percentage
            .map(|c| format!("{}%", c))
            .unwrap_or_else(|| "<default>".to_string());

        vec![
            Cow::Borrowed(self.metadata.name.as_str()),
            Cow::Owned(format!(
                "{}/{}",
                spec.scale_target_ref.kind, spec.scale_target_ref.name
            )),
            Cow::Owned(format!("{}/{}", current_cpu, target_cpu)),
            Cow::Owned(spec.min_replicas.unwrap_or(1).to_string()),
            Cow::Owned(spec.max_replicas.to_string()),
            Cow::Owned(
                self.status
                    .as_ref()
                    .map(|s| s.current_replicas.to_string())
                    .unwrap_or_else(|| "0".to_string()),
            ),
            Cow::Owned(
                self.metadata
                    .creation_timestamp
                    .map(|created| {
                        human_duration(
                            Utc::now()
                                .signed_duration_since(created)
                                .to_std()
                                .unwrap_or_default(),
                        )
                    })
                    .unwrap_or_else(|| "<new>".to_string()),
            ),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            Cow::Borrowed("NAME"),
            Cow::Borrowed("REFERENCE"),
            Cow::Borrowed("TARGETS"),
            Cow::Borrowed("MINPODS"),
            Cow::Borrowed("MAXPODS"),
            Cow::Borrowed("REPLICAS"),
            Cow::Borrowed("AGE"),
        ]
    }
}

fn human_duration(dur: std::time::Duration) -> String {
    let secs = dur.as_secs();
    match secs {
        0..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86400),
    }
}
