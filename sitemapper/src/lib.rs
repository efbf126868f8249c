pub mod commands;
pub mod handlers;

pub use commands::command_argument_builder;
pub use handlers::{
    CrawlSettings, expand_output_path, handle_crawl, normalize_seed, run_crawl,
    settings_from_matches,
};
