use crate::demo::{run_demo, DemoArgs};
use crate::infra::seed_demo_data;
use crate::server;
use clap::{Args, Parser, Subcommand};
use vendorhub::error::AppError;
use vendorhub::workflows::procurement::MemoryStore;

#[derive(Parser, Debug)]
#[command(
    name = "VendorHub API",
    about = "Run and demonstrate the VendorHub procurement marketplace from the command line",
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
    /// Populate an in-memory store with the demo fixtures and print a summary
    Seed,
    /// Run the RFQ -> bid -> order lifecycle end to end and print each step
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start with the demo fixtures (3 vendors, 1 client, 1 admin, catalog)
    #[arg(long)]
    pub(crate) seed_demo_data: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Seed => {
            let store = MemoryStore::default();
            let summary = seed_demo_data(&store)?;
            println!(
                "Seeded {} vendors, client {}, admin {}, {} equipment items (in-memory store)",
                summary.vendors, summary.client, summary.admin, summary.equipment
            );
            Ok(())
        }
        Command::Demo(args) => run_demo(args),
    }
}
