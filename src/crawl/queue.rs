// src/crawl/queue.rs
// =============================================================================
// This module implements website crawling with a level-by-level breadth-first
// approach.
//
// How it works:
// 1. Level 0 is just the starting URL
// 2. Every not-yet-visited URL of the current level is marked visited and
//    fetched (several at once, up to `concurrency`)
// 3. Links on each page are resolved and limited to the page's origin
// 4. Newly discovered URLs become the next level
// 5. Repeat until the level budget is spent or a level finds nothing new
//
// A page that fails to download or parse simply contributes no links.
// Nothing that happens to a single page stops the crawl.
//
// Rust concepts:
// - HashSet: visited URLs and the two level queues (O(1) lookup)
// - Generics: Crawler<F> works with any Fetch implementation
// - Streams: buffer_unordered() bounds how many fetches run at once
// =============================================================================

use std::collections::HashSet;
use std::mem;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, trace, warn};

use super::fetch::Fetch;
use super::origin::{same_origin_urls, HrefPolicy};
use crate::link;

/// Settings for one crawl.
#[derive(Debug, Clone, Copy)]
pub struct CrawlConfig {
    /// Last BFS level to fetch; level 0 is the start URL itself
    pub max_level: usize,
    /// How many pages of one level may be fetched at the same time
    pub concurrency: usize,
    pub href_policy: HrefPolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_level: 3,
            concurrency: 8,
            href_policy: HrefPolicy::Prefix,
        }
    }
}

// The BFS state of a single crawl
//
// Invariants:
// - a URL is inserted into `visited` at most once
// - `next` never holds a URL that is already in `visited`
#[derive(Debug, Default)]
struct Frontier {
    visited: HashSet<String>,
    current: HashSet<String>,
    next: HashSet<String>,
}

impl Frontier {
    fn new(start_url: &str) -> Self {
        Self {
            current: HashSet::from([start_url.to_string()]),
            ..Self::default()
        }
    }

    // Drains the current level and marks its unvisited URLs as visited
    //
    // Returns the URLs that still need fetching.
    fn start_level(&mut self) -> Vec<String> {
        let mut batch = Vec::new();
        for url in self.current.drain() {
            if self.visited.insert(url.clone()) {
                batch.push(url);
            }
        }
        batch
    }

    fn discover(&mut self, url: String) {
        if !self.visited.contains(&url) {
            self.next.insert(url);
        }
    }

    // Moves the next level into place; false if it is empty
    fn advance(&mut self) -> bool {
        self.current = mem::take(&mut self.next);
        !self.current.is_empty()
    }

    fn into_visited(self) -> Vec<String> {
        self.visited.into_iter().collect()
    }
}

// Crawls a single origin with any Fetch implementation
#[derive(Debug)]
pub struct Crawler<F> {
    fetcher: F,
    config: CrawlConfig,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    // Crawls breadth-first from `start_url`
    //
    // Returns every URL that was visited, in no particular order. Each URL
    // appears once, including pages that failed to load.
    //
    // Example:
    //   max_level=0: only the starting page
    //   max_level=1: starting page + the pages it links to
    //   max_level=2: ... + the pages those link to
    pub async fn crawl(&self, start_url: &str) -> Vec<String> {
        let concurrency = self.config.concurrency.max(1);
        let mut frontier = Frontier::new(start_url);

        for level in 0..=self.config.max_level {
            let batch = frontier.start_level();
            info!(level, pages = batch.len(), "crawling level");

            // Fetch the whole level first; only this loop touches the frontier
            let discovered: Vec<Vec<String>> = stream::iter(batch)
                .map(|url| self.visit(url))
                .buffer_unordered(concurrency)
                .collect()
                .await;

            for url in discovered.into_iter().flatten() {
                frontier.discover(url);
            }

            if !frontier.advance() {
                debug!(level, "no new pages found, stopping early");
                break;
            }
        }

        frontier.into_visited()
    }

    // Fetches one page and returns the same-origin URLs it links to
    async fn visit(&self, url: String) -> Vec<String> {
        debug!(url = %url, "fetching page");

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "failed to fetch page");
                return Vec::new();
            }
        };

        let links = match link::parse(&page.body) {
            Ok(links) => links,
            Err(e) => {
                warn!(url = %url, error = %e, "failed to parse page");
                return Vec::new();
            }
        };

        for link in &links {
            trace!(url = %url, href = %link.href, text = %link.text, "found link");
        }

        let urls = same_origin_urls(&links, &page.final_url, self.config.href_policy);
        debug!(url = %url, found = links.len(), kept = urls.len(), "extracted links");
        urls
    }
}
