pub mod crawler;
pub mod pager;
pub mod web;


pub use crawler::PageFetcher;
pub use pager::{PagePlan, PaginationSummary, StopReason, collect_alerts};
pub use web::HttpFetcher;
