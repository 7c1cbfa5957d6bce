use crate::demo::{run_browse, run_demo, BrowseArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use laundromat_market::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Laundromat Marketplace",
    about = "Browse, filter and compare laundromat listings from the command line or over HTTP",
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
    /// Load listings from an endpoint or export and print the filtered view
    Browse(BrowseArgs),
    /// Walk through filtering, sorting, favorites and comparison using demo listings
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
    /// Override MARKETPLACE_LISTINGS_URL
    #[arg(long)]
    pub(crate) listings_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Browse(args) => run_browse(args).await,
        Command::Demo(args) => run_demo(args),
    }
}
