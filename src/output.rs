// src/output.rs
// =============================================================================
// This module turns results into text for stdout.
//
// Crawled URLs (`sitemap` command):
// - lines: one URL per line
// - xml:   a sitemap document (https://www.sitemaps.org/protocol.html)
// - json:  {"count": N, "urls": [...]}
//
// URLs are sorted first so the same site always produces the same output
// (the crawler returns them in no particular order).
//
// Extracted links (`links` command), kept in document order:
// - lines: "href<TAB>text" per link
// - json:  [{"href": ..., "text": ...}, ...]
// =============================================================================

use anyhow::Result;
use clap::ValueEnum;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;

use crate::link::Link;

const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Serialize)]
struct JsonSitemap<'a> {
    count: usize,
    urls: &'a [String],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One URL per line
    Lines,
    /// XML sitemap
    #[default]
    Xml,
    /// JSON object with the page count and URLs
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LinkFormat {
    /// One "href<TAB>text" pair per line
    #[default]
    Lines,
    /// JSON array of {href, text} objects
    Json,
}

// Renders `urls` in the requested format, ending with a newline
pub fn render(urls: &[String], format: OutputFormat) -> Result<String> {
    let mut urls = urls.to_vec();
    urls.sort();

    match format {
        OutputFormat::Lines => Ok(render_lines(&urls)),
        OutputFormat::Xml => render_xml(&urls),
        OutputFormat::Json => render_json(&urls),
    }
}

fn render_lines(urls: &[String]) -> String {
    urls.iter().map(|url| format!("{}\n", url)).collect()
}

// <?xml version="1.0" encoding="UTF-8"?>
// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//   <url>
//     <loc>https://example.com/</loc>
//   </url>
// </urlset>
fn render_xml(urls: &[String]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_XMLNS)]),
    ))?;

    for url in urls {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        writer.write_event(Event::Start(BytesStart::new("loc")))?;
        // BytesText::new escapes &, < and > for us
        writer.write_event(Event::Text(BytesText::new(url)))?;
        writer.write_event(Event::End(BytesEnd::new("loc")))?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

fn render_json(urls: &[String]) -> Result<String> {
    let sitemap = JsonSitemap {
        count: urls.len(),
        urls,
    };
    let mut json = serde_json::to_string_pretty(&sitemap)?;
    json.push('\n');
    Ok(json)
}

// Renders extracted links in the requested format, ending with a newline
pub fn render_links(links: &[Link], format: LinkFormat) -> Result<String> {
    match format {
        LinkFormat::Lines => Ok(links
            .iter()
            .map(|link| format!("{}\t{}\n", link.href, link.text))
            .collect()),
        LinkFormat::Json => {
            let mut json = serde_json::to_string_pretty(links)?;
            json.push('\n');
            Ok(json)
        }
    }
}
