pub mod budget;
pub mod crawler;
pub mod error;
pub mod http;
pub mod navigator;
pub mod result;

pub use budget::{BudgetProfile, CrawlBudget, CrawlLimits, CrawlStrategy, resolve_budget};
pub use crawler::{FrontierCrawler, ProgressCallback, frontier_cap};
pub use error::ScanError;
pub use http::{HttpBrowser, HttpNavigator};
pub use navigator::{Browser, GotoOptions, Locator, Navigator, ScreenshotOptions, WaitUntil};
pub use result::PageToScan;
