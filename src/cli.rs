// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). Most options can also be
// set through an environment variable (the `env = "..."` part), which is
// handy in CI where passing flags is awkward.
//
// Subcommands:
// - sitemap: crawl a site and print every page reached
// - links:   print the links found in a local HTML file
// =============================================================================

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::crawl::{CrawlConfig, HrefPolicy};
use crate::output::{LinkFormat, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-builder",
    version,
    about = "Crawl a website breadth-first and print its sitemap",
    long_about = "sitemap-builder starts at one URL, follows the links that stay on the same \
                  origin (scheme + host) up to a maximum number of hops, and prints every page \
                  it reached as plain lines, JSON, or an XML sitemap. It can also list the \
                  links of a single HTML file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website and print its sitemap
    ///
    /// Example: sitemap-builder sitemap --url https://example.com -L 2
    Sitemap(SitemapArgs),

    /// Print the href and text of every link in an HTML file
    ///
    /// Example: sitemap-builder links --file page.html --format json
    Links(LinksArgs),
}

#[derive(Args, Debug)]
pub struct SitemapArgs {
    /// The URL that you want to build a sitemap for
    #[arg(long, env = "SITEMAP_URL", default_value = "https://gophercises.com")]
    pub url: String,

    /// The maximum number of links deep to traverse
    ///
    /// Level 0 = just the starting page
    /// Level 1 = starting page + all pages it links to
    /// etc.
    #[arg(short = 'L', long, env = "SITEMAP_MAX_LEVEL", default_value_t = 3)]
    pub max_level: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    pub format: OutputFormat,

    /// How many pages of one level to fetch at the same time
    #[arg(long, env = "SITEMAP_CONCURRENCY", default_value = "8")]
    pub concurrency: NonZeroUsize,

    /// Per-request timeout in seconds
    #[arg(long, env = "SITEMAP_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Redirects to follow before giving up on a page
    #[arg(long, default_value_t = 10)]
    pub max_redirects: usize,

    /// Largest page body to download, in bytes
    #[arg(long, env = "SITEMAP_MAX_BODY_BYTES", default_value_t = 10 * 1024 * 1024)]
    pub max_body_bytes: usize,

    /// Resolve relative links like a browser does ("../x", "page.html")
    ///
    /// By default only "/x", "./x" and absolute http(s) links are followed.
    #[arg(long)]
    pub standard_resolution: bool,
}

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// An HTML file to be parsed
    #[arg(long, default_value = "examples/ex1.html")]
    pub file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = LinkFormat::Lines)]
    pub format: LinkFormat,
}

impl SitemapArgs {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            max_level: self.max_level,
            concurrency: self.concurrency.get(),
            href_policy: if self.standard_resolution {
                HrefPolicy::Standard
            } else {
                HrefPolicy::Prefix
            },
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
