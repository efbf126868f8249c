pub mod crawler;
pub mod error;
pub mod fetch;
pub mod frontier;
pub mod links;
pub mod registry;
pub mod result;
pub mod robots;
pub mod sitemap;

pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use frontier::StopHandle;
pub use registry::VisitedRegistry;
pub use result::CrawlResult;
pub use robots::RobotsPolicy;
pub use sitemap::SiteMapNode;
