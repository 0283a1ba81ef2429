//! HTML5 parser implementation
//!
//! Uses html5ever's built-in RcDom and converts to our DOM format, which
//! is simpler and more reliable than implementing TreeSink directly.

use hone_dom::{Document, NodeId, ShadowMode};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        tracing::debug!("Parsing HTML document ({} bytes)", html.len());

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .expect("reading from an in-memory buffer cannot fail");

        let mut document = Document::new();
        self.convert_node(&dom.document, &mut document, NodeId::ROOT);

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Convert an RcDom node into the arena document
    fn convert_node(&self, handle: &Handle, doc: &mut Document, parent: NodeId) {
        match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, doc, parent);
                }
            }
            RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => {}
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !text.trim().is_empty() {
                    let id = doc.create_text(&text);
                    doc.append_child(parent, id);
                }
            }
            RcNodeData::Comment { contents } => {
                let id = doc.tree_mut().create_comment(&contents.to_string());
                doc.append_child(parent, id);
            }
            RcNodeData::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                // A declarative shadow root template attaches its contents
                // to the parent element instead of becoming a node itself.
                if name.local.as_ref() == "template" {
                    let mode = attrs
                        .borrow()
                        .iter()
                        .find(|a| a.name.local.as_ref() == "shadowrootmode")
                        .map(|a| match a.value.as_ref() {
                            "closed" => ShadowMode::Closed,
                            _ => ShadowMode::Open,
                        });
                    if let Some(mode) = mode {
                        if doc.is_element(parent) {
                            let shadow = doc.attach_shadow(parent, mode);
                            if let Some(contents) = template_contents.borrow().as_ref() {
                                for child in contents.children.borrow().iter() {
                                    self.convert_node(child, doc, shadow);
                                }
                            }
                            return;
                        }
                    }
                }

                let id = doc.create_element(name.local.as_ref());
                for attr in attrs.borrow().iter() {
                    doc.set_attribute(id, attr.name.local.as_ref(), &attr.value);
                }
                doc.append_child(parent, id);

                for child in handle.children.borrow().iter() {
                    self.convert_node(child, doc, id);
                }
            }
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
