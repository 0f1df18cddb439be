use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backend;
mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use output::OutputFormat;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("zobject=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_flag(cli.json);

    match &cli.command {
        Commands::Convert(args) => commands::convert::run(args, format).await,
        Commands::Scaffold(args) => commands::scaffold::run(args, format).await,
        Commands::Validate(args) => commands::validate::run(args, format).await,
        Commands::Submit(args) => commands::submit::run(args, format).await,
        Commands::Show(args) => commands::show::run(args, format).await,
    }
}
