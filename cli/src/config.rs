use clap::Args;
use hpa_console::config::Config;

/// Connection flags, each overriding its environment variable.
#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Apiserver URL [env: HPA_API_URL]
    #[arg(long, global = true)]
    pub server: Option<String>,
    /// Bearer token [env: HPA_API_TOKEN]
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// Metrics endpoint probed before editing [env: HPA_METRICS_URL]
    #[arg(long, global = true)]
    pub metrics_url: Option<String>,
}

pub fn load_config(args: &ConnectionArgs) -> Config {
    let mut config = Config::from_env();

    if let Some(server) = &args.server {
        config.api_url = server.trim_end_matches('/').to_string();
    }
    if let Some(token) = &args.token {
        config.token = Some(token.clone());
    }
    if let Some(url) = &args.metrics_url {
        config.metrics_url = Some(url.clone());
    }

    tracing::debug!(api_url=%config.api_url, metrics=config.metrics_url.is_some(), "Loaded config");
    config
}
