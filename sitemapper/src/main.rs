use colored::Colorize;
use sitemapper::{command_argument_builder, handle_crawl};
use tracing::Level;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    let quiet = matches.get_flag("quiet");

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if quiet { Level::WARN } else { Level::INFO })
        .init();

    if let Err(e) = handle_crawl(&matches).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
