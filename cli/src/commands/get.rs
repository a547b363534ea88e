use clap::Parser;
use hpa_console::{client::RestClient, config::Config, services::DataService};
use shared::{
    api::{RequestContext, ResourceGroup},
    models::HorizontalPodAutoscaler,
};
use tabled::{Table, settings::Style};

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Project (namespace) to list autoscalers in
    #[arg(short = 'p', long)]
    pub project: String,
}

#[tokio::main]
pub async fn handle(config: &Config, args: &GetArgs) -> Result<(), String> {
    let client = RestClient::new(config).map_err(|e| e.to_string())?;
    let context = RequestContext {
        project: args.project.clone(),
    };

    let listed = client
        .list(&ResourceGroup::autoscalers(), &context)
        .await
        .map_err(|e| format!("Failed to list autoscalers: {}", e))?;

    let autoscalers = listed
        .into_values()
        .map(serde_json::from_value::<HorizontalPodAutoscaler>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Failed to parse autoscalers: {}", e))?;

    if autoscalers.is_empty() {
        println!("No autoscalers found in project {}.", args.project);
        return Ok(());
    }

    let mut table = Table::new(autoscalers);
    table.with(Style::blank());
    println!("{}", table);
    Ok(())
}
