pub mod crawl;
pub mod error;
pub mod report;

pub use crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
pub use error::ReportError;
pub use report::{ExportFormat, export_sitemap, generate_crawl_report, print_sitemap};
