use crate::demo::{run_consolidate, run_demo, run_policy, ConsolidateArgs, PolicyArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruitment_eval::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Evaluation",
    about = "Run the jury evaluation service or consolidate score sheets from the command line",
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
    /// Print the threshold policy table, or the row for one job family
    Policy(PolicyArgs),
    /// Consolidate a candidate from a jury score sheet and technical results
    Consolidate(ConsolidateArgs),
    /// Walk a demo session through the simulation gate and consolidation
    Demo,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Register the demo session and candidates at startup
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Policy(args) => run_policy(args),
        Command::Consolidate(args) => run_consolidate(args),
        Command::Demo => run_demo(),
    }
}
