// RiceLens CLI entry point

use clap::Parser;
use ricelens_cli::{
    output,
    router::{Cli, CommandRouter},
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = CommandRouter::route(&cli).await {
        output::print_error(&e.user_message());
        if cli.verbose {
            eprintln!("\n{}", e.technical_details());
        }
        std::process::exit(1);
    }
}
