use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

/// CLI tool to create and edit horizontal pod autoscalers for cluster workloads.
#[derive(Parser, Debug)]
#[command(name = "hpactl", version, about, long_about = None)]
struct HpaCtl {
    #[command(flatten)]
    connection: config::ConnectionArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an autoscaler for a workload, or edit an existing one
    Autoscale(commands::autoscale::AutoscaleArgs),
    /// List the autoscalers of a project
    Get(commands::get::GetArgs),
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = HpaCtl::parse();
    let config = config::load_config(&cli.connection);

    let result = match cli.command {
        Commands::Autoscale(args) => commands::autoscale::handle(&config, &args),
        Commands::Get(args) => commands::get::handle(&config, &args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
