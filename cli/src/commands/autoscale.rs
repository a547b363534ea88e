//! CLI `autoscale` command: routes the arguments into the autoscale form,
//! fills it from flags and submits it.

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use hpa_console::{
    client::RestClient,
    config::Config,
    controller::{AutoscaleFormController, FormSettings},
    routes::RouteParams,
    services::Services,
    state::FormState,
};
use shared::{keyvalue::Entry, models::HorizontalPodAutoscaler};
use tabled::{Table, settings::Style};

use super::TerminalNavigator;

#[derive(Parser, Debug)]
pub struct AutoscaleArgs {
    /// Project (namespace) of the workload
    #[arg(short = 'p', long)]
    pub project: String,
    /// Deployment, DeploymentConfig, ReplicaSet, ReplicationController or HorizontalPodAutoscaler
    #[arg(short = 'k', long)]
    pub kind: String,
    /// Name of the workload, or of the autoscaler when editing one
    #[arg(short = 'n', long)]
    pub name: String,
    /// API group of the workload, defaults to the kind's group
    #[arg(short = 'g', long)]
    pub group: Option<String>,
    /// Name of the new autoscaler, defaults to the workload name
    #[arg(long = "hpa-name")]
    pub hpa_name: Option<String>,
    /// Minimum number of pods
    #[arg(long)]
    pub min: Option<u32>,
    /// Maximum number of pods
    #[arg(long)]
    pub max: Option<u32>,
    /// Target CPU utilization in percent of the CPU request
    #[arg(long)]
    pub cpu: Option<u32>,
    /// Label to set as key=value, `key=` removes it
    #[arg(short = 'l', long = "label", value_parser = parse_label)]
    pub labels: Vec<Entry>,
    /// Print the autoscaler instead of submitting it
    #[arg(long)]
    pub dry_run: bool,
    /// Output format of the autoscaler
    #[arg(short = 'o', long, value_enum, default_value_t = Output::Table)]
    pub output: Output,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum Output {
    Table,
    Json,
    Yaml,
}

fn parse_label(raw: &str) -> Result<Entry, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("label '{}' must look like key=value", raw))?;
    if name.is_empty() {
        return Err(format!("label '{}' has no key", raw));
    }
    Ok(Entry::new(name, value))
}

#[tokio::main]
pub async fn handle(config: &Config, args: &AutoscaleArgs) -> Result<(), String> {
    let client = RestClient::new(config).map_err(|e| e.to_string())?;
    let services = Services::from_backend(Arc::new(client), TerminalNavigator::shared());

    let mut params = RouteParams::new(&args.project, &args.kind, &args.name);
    params.group = args.group.clone();
    let mut form = AutoscaleFormController::new(params, services, FormSettings::from(config));

    // Ctrl-C abandons the form like closing the page would
    let teardown = form.teardown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            teardown.teardown();
        }
    });

    let loaded = form.load().await;
    let state = form.state();
    report_alerts(&state);
    loaded.map_err(|e| e.to_string())?;

    if state.metrics_warning {
        eprintln!("warning: metrics are not configured, the autoscaler will not be able to scale");
    }
    if state.show_cpu_request_warning {
        eprintln!(
            "warning: {} {} has containers without a CPU request, CPU utilization cannot be measured",
            state.target_kind.as_deref().unwrap_or_default(),
            state.target_name.as_deref().unwrap_or_default()
        );
    }

    form.update(|s| apply_flags(s, args));
    let hpa = form.preview().map_err(|e| e.to_string())?;

    if args.dry_run {
        return print_autoscaler(&hpa, args.output);
    }

    let saved = form.save().await;
    report_alerts(&form.state());
    saved.map_err(|e| e.to_string())?;

    print_autoscaler(&hpa, args.output)
}

fn apply_flags(state: &mut FormState, args: &AutoscaleArgs) {
    if let Some(name) = &args.hpa_name {
        state.set_name(name.clone());
    }
    if args.min.is_some() {
        state.set_min_replicas(args.min);
    }
    if args.max.is_some() {
        state.set_max_replicas(args.max);
    }
    if args.cpu.is_some() {
        state.set_target_cpu(args.cpu);
    }
    for label in &args.labels {
        state.labels.retain(|row| row.name != label.name);
        if !label.value.is_empty() {
            state.add_label(label.clone());
        }
    }
}

fn report_alerts(state: &FormState) {
    for alert in state.alerts.values() {
        if alert.details.is_empty() {
            eprintln!("{}", alert.message);
        } else {
            eprintln!("{} {}", alert.message, alert.details);
        }
    }
}

fn print_autoscaler(hpa: &HorizontalPodAutoscaler, output: Output) -> Result<(), String> {
    match output {
        Output::Table => {
            let mut table = Table::new([hpa.clone()]);
            table.with(Style::blank());
            println!("{}", table);
        }
        Output::Json => {
            let json = serde_json::to_string_pretty(hpa).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        Output::Yaml => {
            let yaml = serde_yaml::to_string(hpa).map_err(|e| e.to_string())?;
            print!("{}", yaml);
        }
    }
    Ok(())
}
