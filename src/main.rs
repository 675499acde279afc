use clap::Parser;
use snooscrape::cli::Config;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    snooscrape::cli::run(config).await
}
