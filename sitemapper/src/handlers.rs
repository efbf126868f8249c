use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use sitemapper_core::crawl::{CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, execute_crawl};
use sitemapper_core::report::{ExportFormat, export_sitemap, generate_crawl_report};
use sitemapper_scanner::crawler::DEFAULT_TIMEOUT_SECS;
use sitemapper_scanner::fetch::HttpFetcher;
use sitemapper_scanner::{RobotsPolicy, StopHandle};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::info;

use crate::commands::DEFAULT_URL;

/// Everything the crawl command needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub options: CrawlOptions,
    pub output: Option<PathBuf>,
    pub format: String,
    pub ignore_robots: bool,
}

/// Prefix `https://` when the seed has no http(s) scheme.
pub fn normalize_seed(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Expand a leading `~` in the export path.
pub fn expand_output_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).into_owned())
}

pub fn settings_from_matches(matches: &ArgMatches) -> CrawlSettings {
    let url = matches
        .get_one::<String>("URL")
        .map(String::as_str)
        .unwrap_or(DEFAULT_URL);

    let options = CrawlOptions {
        url: normalize_seed(url),
        max_depth: *matches.get_one::<i64>("depth").unwrap_or(&DEFAULT_MAX_DEPTH),
        concurrency: *matches
            .get_one::<i64>("concurrency")
            .unwrap_or(&DEFAULT_CONCURRENCY),
        timeout_secs: *matches
            .get_one::<u64>("timeout")
            .unwrap_or(&DEFAULT_TIMEOUT_SECS),
        show_progress_bars: !matches.get_flag("quiet"),
        ..CrawlOptions::default()
    };

    CrawlSettings {
        options,
        output: matches
            .get_one::<PathBuf>("output")
            .map(|p| expand_output_path(p)),
        format: matches
            .get_one::<String>("format")
            .cloned()
            .unwrap_or_else(|| "json".to_string()),
        ignore_robots: matches.get_flag("ignore-robots"),
    }
}

/// Crawl, write the report to `out`, and export the site map when asked to.
pub async fn run_crawl<W: Write>(settings: CrawlSettings, out: &mut W, stop: StopHandle) -> Result<()> {
    let CrawlSettings {
        options,
        output,
        format,
        ignore_robots,
    } = settings;

    // Reject a bad export format before spending time on the crawl.
    if output.is_some() {
        ExportFormat::from_str(&format)?;
    }

    if !ignore_robots {
        let fetcher = HttpFetcher::new(&options.user_agent, Duration::from_secs(options.timeout_secs))?;
        let policy = RobotsPolicy::new(fetcher);
        if !policy.is_allowed(&options.url, &options.user_agent).await {
            bail!("crawling {} is not allowed by robots.txt", options.url);
        }
    }

    let site = options.url.clone();
    info!(
        "Crawling {} (depth {}, concurrency {})",
        site, options.max_depth, options.concurrency
    );

    let start = Instant::now();
    let result = execute_crawl(options, None, Some(stop)).await?;
    let report = generate_crawl_report(&site, &result, start.elapsed());
    write!(out, "{}", report)?;

    if let Some(path) = output {
        export_sitemap(&result.root, &path, &format)
            .with_context(|| format!("Error exporting site map to {}", path.display()))?;
        writeln!(out, "\n{} Site map exported to {}", "✓".green().bold(), path.display())?;
    }

    Ok(())
}

pub async fn handle_crawl(matches: &ArgMatches) -> Result<()> {
    let settings = settings_from_matches(matches);

    let stop = StopHandle::new();
    let stop_on_ctrl_c = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("{} Stopping crawl; finishing pages in flight", "!".yellow().bold());
            stop_on_ctrl_c.stop();
        }
    });

    run_crawl(settings, &mut std::io::stdout(), stop).await
}
