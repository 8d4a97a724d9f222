use clap::Parser;
use tubescore::cli::Config;

#[tokio::main]
async fn main() {
    let config = Config::parse();
    tubescore::cli::run(config).await
}
