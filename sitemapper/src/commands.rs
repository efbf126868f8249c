use clap::{arg, value_parser};
use std::path::PathBuf;

pub const DEFAULT_URL: &str = "https://example.com";

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemapper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemapper")
        .about("Crawl a website and generate a site map of its same-domain pages")
        .styles(CLAP_STYLING)
        .arg(
            arg!([URL])
                .required(false)
                .help("The site to crawl; https:// is assumed when no scheme is given")
                .default_value(DEFAULT_URL),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Export the site map to this file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Export format: json or xml")
                .default_value("json"),
        )
        .arg(
            arg!(-d --"depth" <DEPTH>)
                .required(false)
                .help("Maximum crawl depth (links followed from the seed)")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("10"),
        )
        .arg(
            arg!(-c --"concurrency" <NUM_WORKERS>)
                .required(false)
                .help("The number of async workers fetching pages concurrently")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("10"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-request timeout in seconds")
                .value_parser(value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(--"ignore-robots")
                .required(false)
                .help("Skip the robots.txt check before crawling")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-q --"quiet")
                .required(false)
                .help("Suppress the progress spinner and informational logging")
                .action(clap::ArgAction::SetTrue),
        )
}
