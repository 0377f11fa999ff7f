use crate::report::{run_alerts, run_assess, AlertsArgs, AssessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use groundwater_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Groundwater Crisis Scoring",
    about = "Serve or query groundwater crisis assessments for Indian states and districts",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single location and print the assessment
    Assess(AssessArgs),
    /// Print the High and Critical locations for a level type
    Alerts(AlertsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args).await,
        Command::Alerts(args) => run_alerts(args).await,
    }
}
