// src/link/parse.rs
// =============================================================================
// This module extracts anchor links from HTML documents.
//
// We use the `scraper` crate to build the document tree:
// - It is built on html5ever (Mozilla's HTML parser)
// - Parsing is permissive: unclosed tags, missing <html>/<body>, stray end
//   tags etc. are repaired the same way a browser would
//
// Instead of a CSS selector we walk the tree ourselves, because we need every
// <a> element (with or without href) and the text of everything inside it.
// The walk uses an explicit stack, so deeply nested markup can't overflow the
// native call stack.
//
// Rust concepts:
// - Iterators: PreOrder implements Iterator so we can use filter/map on it
// - Lifetimes: NodeRef<'a, Node> borrows from the parsed document
// - Statics: one immutable Extractor shared by every call
// =============================================================================

use std::io::Read;

use ego_tree::NodeRef;
use scraper::{Html, Node};
use serde::Serialize;
use thiserror::Error;

/// An anchor found in a document.
///
/// `href` is the raw attribute value (not resolved against anything) and
/// `text` is the anchor's visible text with whitespace collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum ParseError {
    /// The HTML input could not be read.
    #[error("failed to read HTML input: {0}")]
    Read(#[from] std::io::Error),
}

// Which element counts as a link and which attribute holds its target.
//
// Built once (see DEFAULT_EXTRACTOR) and passed by reference into every
// extraction; nothing in here changes after start-up.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    anchor_tag: &'static str,
    href_attr: &'static str,
}

static DEFAULT_EXTRACTOR: Extractor = Extractor::new();

impl Extractor {
    pub const fn new() -> Self {
        Self {
            anchor_tag: "a",
            href_attr: "href",
        }
    }

    // Extracts every anchor in `html`, in document order
    //
    // Anchors nested inside other anchors are reported on their own as well;
    // their text also counts towards the outer anchor's text.
    pub fn extract(&self, html: &str) -> Vec<Link> {
        let document = Html::parse_document(html);

        PreOrder::new(document.tree.root())
            .filter(|node| self.is_anchor(node))
            .map(|node| self.build_link(node))
            .collect()
    }

    fn is_anchor(&self, node: &NodeRef<'_, Node>) -> bool {
        match node.value() {
            Node::Element(element) => element.name() == self.anchor_tag,
            _ => false,
        }
    }

    fn build_link(&self, node: NodeRef<'_, Node>) -> Link {
        // html5ever already drops duplicate attributes, keeping the first one
        let href = match node.value() {
            Node::Element(element) => element.attr(self.href_attr).unwrap_or_default(),
            _ => "",
        };

        Link {
            href: href.to_string(),
            text: text_of(node),
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

// Parses HTML bytes and returns every anchor in document order
//
// Invalid UTF-8 is replaced rather than rejected, so for a byte slice this
// only fails if the underlying read does.
//
// Example:
//   html = b"<a href='/docs'>Docs</a>"
//   result = [Link { href: "/docs", text: "Docs" }]
pub fn parse(html: &[u8]) -> Result<Vec<Link>, ParseError> {
    parse_reader(html)
}

// Same as parse(), but reads the document from any reader first
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Vec<Link>, ParseError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let html = String::from_utf8_lossy(&bytes);
    Ok(DEFAULT_EXTRACTOR.extract(&html))
}

// Concatenates all text below `node` and collapses whitespace runs
//
// Comments, doctypes and other non-text nodes contribute nothing.
fn text_of(node: NodeRef<'_, Node>) -> String {
    let mut raw = String::new();
    for descendant in PreOrder::new(node) {
        if let Node::Text(text) = descendant.value() {
            raw.push_str(text);
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Depth-first, pre-order walk over a document subtree
//
// A node is yielded before its children, children left to right. Pending
// nodes live on a heap-allocated stack instead of the call stack.
struct PreOrder<'a> {
    stack: Vec<NodeRef<'a, Node>>,
}

impl<'a> PreOrder<'a> {
    fn new(root: NodeRef<'a, Node>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = NodeRef<'a, Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Push children last-to-first so the first child is popped next
        let mut child = node.last_child();
        while let Some(current) = child {
            self.stack.push(current);
            child = current.prev_sibling();
        }

        Some(node)
    }
}
