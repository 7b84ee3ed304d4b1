use clap::{Args, Parser, Subcommand};
use kudos::error::AppError;

use crate::demo::{run_demo, run_winners_report, DemoArgs, WinnersReportArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Recognition Leaderboard",
    about = "Run and demonstrate the employee recognition leaderboard from the command line",
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
    /// Inspect winner cohorts without starting the server
    Winners {
        #[command(subcommand)]
        command: WinnersCommand,
    },
    /// Run an end-to-end CLI demo: seed data, score, rank, and announce
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum WinnersCommand {
    /// Print the prior-month winner cohort for a given date
    Report(WinnersReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start with an empty board instead of the seeded sample data
    #[arg(long)]
    pub(crate) no_seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Winners {
            command: WinnersCommand::Report(args),
        } => run_winners_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
