// Site map export, outline printing and the crawl summary

use crate::error::{ReportError, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use sitemapper_scanner::{CrawlResult, SiteMapNode};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Xml,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "xml" => Ok(ExportFormat::Xml),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Serialize the whole tree with two-space indentation.
pub fn serialize_sitemap(root: &SiteMapNode, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(root)?),
        ExportFormat::Xml => {
            let mut xml = String::new();
            let mut serializer = quick_xml::se::Serializer::with_root(&mut xml, Some("sitemap"))
                .map_err(|e| ReportError::Xml(e.to_string()))?;
            serializer.indent(' ', 2);
            root.serialize(serializer)
                .map_err(|e| ReportError::Xml(e.to_string()))?;
            Ok(xml)
        }
    }
}

/// Write the site map to `path` in the named format ("json" or "xml").
/// The format is checked before anything touches the filesystem.
pub fn export_sitemap(root: &SiteMapNode, path: impl AsRef<Path>, format: &str) -> Result<()> {
    let format = ExportFormat::from_str(format)?;
    let data = serialize_sitemap(root, format)?;
    fs::write(path.as_ref(), data)?;
    info!(
        "Exported {} nodes as {} to {}",
        root.node_count(),
        format.as_str(),
        path.as_ref().display()
    );
    Ok(())
}

/// Indented outline: `- url`, two spaces per level below `root`.
pub fn print_sitemap<W: Write>(root: &SiteMapNode, out: &mut W) -> io::Result<()> {
    for node in root.iter() {
        let level = node.depth.saturating_sub(root.depth);
        writeln!(out, "{}- {}", "  ".repeat(level), node.url)?;
    }
    Ok(())
}

pub fn render_sitemap(root: &SiteMapNode) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = print_sitemap(root, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

/// Compact single-line rendering, for debug logs.
pub fn debug_dump(node: &SiteMapNode) -> String {
    let children: Vec<String> = node.children.iter().map(debug_dump).collect();
    format!(
        "{{URL: {}, Depth: {}, Children: [{}]}}",
        node.url,
        node.depth,
        children.join(", ")
    )
}

fn colored_status(status_code: u16) -> String {
    let code = status_code.to_string();
    match status_code {
        100..=199 => code.white().to_string(),
        200..=299 => code.green().to_string(),
        300..=399 => code.cyan().to_string(),
        400..=499 => code.yellow().to_string(),
        500..=599 => code.red().to_string(),
        _ => code,
    }
}

/// Generate the crawl summary followed by the site map outline
pub fn generate_crawl_report(site: &str, result: &CrawlResult, elapsed: Duration) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "Crawling took {:?}", elapsed);
    let _ = writeln!(report, "[{}] Site: {}\n", "✓".green().bold(), site);
    let _ = writeln!(report, "Status: {}", colored_status(result.status_code));
    let _ = writeln!(report, "Response Time: {}ms", result.response_time_ms);
    let _ = writeln!(
        report,
        "Pages: {} (max depth reached: {})\n",
        result.pages_found(),
        result.root.max_depth()
    );
    report.push_str("Site Map:\n\n");
    report.push_str(&render_sitemap(&result.root));
    report
}
