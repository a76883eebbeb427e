use crate::demo::{run_demo, DemoArgs};
use crate::ledger::{run_ledger_summary, LedgerSummaryArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ems_studio::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "EMS Studio Back Office",
    about = "Run the EMS studio back office API or inspect ledgers from the command line",
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
    /// Offline cash-flow reports
    Ledger {
        #[command(subcommand)]
        command: LedgerCommand,
    },
    /// Walk through package sales, the waiting list and the cash-flow ledger
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LedgerCommand {
    /// Summarise a cash book CSV export with running balances
    Summary(LedgerSummaryArgs),
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
        Command::Ledger {
            command: LedgerCommand::Summary(args),
        } => run_ledger_summary(args),
        Command::Demo(args) => run_demo(args),
    }
}
