// src/link/mod.rs
// =============================================================================
// This module turns HTML into a list of links.
//
// Submodules:
// - parse: walks the HTML document tree and builds one Link per <a> element
//
// The crawler uses `parse()` on fetched bodies; the `links` command uses
// `parse_reader()` on a file.
// =============================================================================

mod parse;

pub use parse::{parse, parse_reader, Link, ParseError};
