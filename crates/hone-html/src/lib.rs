//! hone HTML - HTML5 parsing
//!
//! Parses markup into [`hone_dom::Document`] trees, including declarative
//! shadow roots (`<template shadowrootmode>`), so fixtures with shadow
//! boundaries can be written as plain HTML.

mod parser;

pub use parser::HtmlParser;

use hone_dom::Document;

/// Parse an HTML string into a document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
