use std::env;

const HPA_API_URL: &str = "http://localhost:8443";
const HPA_DEFAULT_TARGET_CPU: u32 = 80;
const HPA_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the apiserver, without trailing slash
    pub api_url: String,
    pub token: Option<String>,
    /// Metrics endpoint probed before showing the form, `None` means no metrics
    pub metrics_url: Option<String>,
    pub default_target_cpu: Option<u32>,
    pub request_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: HPA_API_URL.to_string(),
            token: None,
            metrics_url: None,
            default_target_cpu: Some(HPA_DEFAULT_TARGET_CPU),
            request_timeout: HPA_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = env::var("HPA_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| HPA_API_URL.to_string());

        let token = env::var("HPA_API_TOKEN").ok().filter(|t| !t.is_empty());

        let metrics_url = env::var("HPA_METRICS_URL").ok().filter(|u| !u.is_empty());

        // 0 disables the fallback target
        let default_target_cpu = env::var("HPA_DEFAULT_TARGET_CPU")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .map(|cpu| (cpu > 0).then_some(cpu))
            .unwrap_or(Some(HPA_DEFAULT_TARGET_CPU));

        let request_timeout = env::var("HPA_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(HPA_REQUEST_TIMEOUT_SECS);

        Self {
            api_url,
            token,
            metrics_url,
            default_target_cpu,
            request_timeout,
        }
    }
}
