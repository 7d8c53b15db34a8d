//! PlainWiki server entry point.

use clap::Parser;
use plainwiki_server::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = plainwiki_server::run(cli.into_config()).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
