use crate::demo::{run_demo, run_leads_list, DemoArgs, LeadsListArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use suburb_leads::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Suburb Leads Service",
    about = "Run the suburb insight lead service and inspect captured leads from the command line",
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
    /// Inspect captured leads
    Leads {
        #[command(subcommand)]
        command: LeadsCommand,
    },
    /// Run an end-to-end demo: match agents for a suburb and capture a sample lead
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LeadsCommand {
    /// List stored leads with optional filters
    List(LeadsListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured SQLite database path
    #[arg(long)]
    pub(crate) database: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Leads {
            command: LeadsCommand::List(args),
        } => run_leads_list(args),
        Command::Demo(args) => run_demo(args),
    }
}
