// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the result to stdout in the requested format
// 5. Exit with proper code (0 = success, 2 = error)
//
// Logs and progress go to stderr so stdout only ever holds the result,
// which means `sitemap-builder sitemap > sitemap.xml` just works.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - breadth-first crawling
mod link; // src/link/ - link extraction from HTML
mod output; // src/output.rs - lines / XML / JSON rendering

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use cli::{Cli, Commands, LinksArgs, SitemapArgs};
use crawl::{Crawler, HttpFetcher};
use link::Link;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(2);
    }
}

// Logs at `info` unless RUST_LOG says otherwise
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Each branch handles a different command (sitemap, links)
    match cli.command {
        Commands::Sitemap(args) => handle_sitemap(&args).await,
        Commands::Links(args) => handle_links(&args),
    }
}

// Handles the 'sitemap' subcommand
async fn handle_sitemap(args: &SitemapArgs) -> Result<()> {
    // Only the scheme matters here; the crawler uses the URL exactly as given
    let start = Url::parse(&args.url).with_context(|| format!("invalid URL '{}'", args.url))?;
    if start.scheme() != "http" && start.scheme() != "https" {
        bail!("unsupported URL scheme '{}': expected http or https", start.scheme());
    }

    let config = args.crawl_config();
    info!(url = %args.url, max_level = config.max_level, "building sitemap");

    let fetcher = HttpFetcher::new(args.timeout(), args.max_redirects, args.max_body_bytes)
        .context("failed to create HTTP client")?;
    let crawler = Crawler::new(fetcher, config);

    let pages = crawler.crawl(&args.url).await;
    info!(pages = pages.len(), "crawl finished");

    let rendered = output::render(&pages, args.format)?;
    print!("{}", rendered);

    Ok(())
}

// Handles the 'links' subcommand
fn handle_links(args: &LinksArgs) -> Result<()> {
    let links = read_links(&args.file)?;
    info!(file = %args.file.display(), links = links.len(), "parsed file");

    let rendered = output::render_links(&links, args.format)?;
    print!("{}", rendered);

    Ok(())
}

fn read_links(path: &Path) -> Result<Vec<Link>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let links = link::parse_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_links_from_file() {
        let path = std::env::temp_dir().join(format!("sitemap-builder-{}.html", std::process::id()));
        fs::write(
            &path,
            r#"<html><body>
                <a href="/dog"><span>Something in a span</span> Text not in a span <b>Bold text!</b></a>
                <a href="https://example.com/cat">Cat</a>
            </body></html>"#,
        )
        .unwrap();

        let links = read_links(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(
            links,
            vec![
                Link {
                    href: "/dog".to_string(),
                    text: "Something in a span Text not in a span Bold text!".to_string(),
                },
                Link {
                    href: "https://example.com/cat".to_string(),
                    text: "Cat".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_error_is_exported() {
        let result: Result<Vec<Link>, link::ParseError> = link::parse(b"<a href='/x'>x</a>");
        assert_eq!(result.unwrap().len(), 1);
    }

    #[test]
    fn test_read_links_missing_file() {
        let path = std::env::temp_dir().join("sitemap-builder-does-not-exist.html");
        let error = read_links(&path).unwrap_err();
        assert!(error.to_string().contains("failed to open"));
    }
}
