// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling, one level at a time
// - Stays on the origin (scheme + host) of each fetched page
// - Configurable level limit and per-level concurrency
// - Every page is fetched at most once
//
// Submodules:
// - fetch: the Fetch trait and its reqwest implementation
// - origin: turning hrefs into same-origin absolute URLs
// - queue: the BFS loop itself
// =============================================================================

mod fetch;
mod origin;
mod queue;

pub use fetch::HttpFetcher;
pub use origin::HrefPolicy;
pub use queue::{CrawlConfig, Crawler};
