//! Recursive selector synthesis.
//!
//! One level at a time: describe the element by its id or extracted
//! features, disambiguate against siblings with `:nth-child`, check
//! uniqueness with a scoped query, and walk to the parent until the
//! selector is unique and deep enough. Chains are joined with `" > "`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use hone_dom::{Document, NodeId, Selector};

use crate::escape::{escape_ident, EscapeError};
use crate::features::element_features;

/// Ids that change between page loads are worse than no id at all
static VOLATILE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"player_uid_").expect("valid pattern"));

/// Options threaded through the recursive walk. Each recursion step
/// derives a fresh value; nothing is mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectorOptions {
    /// How many features to describe the target element with
    pub feature_count: usize,
    /// How many ancestor levels to include even once unique
    pub min_depth: i32,
    /// Walk all the way to the root element
    pub to_root: bool,
    /// Treat the selector as already unique
    pub is_unique: bool,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            feature_count: 2,
            min_depth: 1,
            to_root: false,
            is_unique: false,
        }
    }
}

/// Selector generation context: the document and the matching it needs.
/// Construct once per document; every call only reads.
pub struct SelectorEngine<'a> {
    doc: &'a Document,
}

impl<'a> SelectorEngine<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &Document {
        self.doc
    }

    /// Build the selector chain for one element within `root` (the
    /// document node or a shadow root node)
    pub(crate) fn generate(
        &self,
        element: NodeId,
        options: &SelectorOptions,
        root: NodeId,
        child_parts: Vec<String>,
    ) -> Result<String, EscapeError> {
        let mut is_unique = options.is_unique;
        let mut add_parent = false;

        let selector = match self.id_selector(element, root)? {
            Some(id_selector) => {
                is_unique = true;
                id_selector
            }
            None => {
                let mut selector =
                    element_features(self.doc, element, options.feature_count)?.concat();
                selector.push_str(&self.nth_child_suffix(element, &selector));
                is_unique = options.is_unique || self.count_matches(root, &selector) == 1;

                // for the odd page where even the root element is ambiguous
                if !is_unique && self.is_document_root_element(element, root) {
                    selector.push_str(":root");
                }
                add_parent = options.min_depth != 0 || !is_unique;
                selector
            }
        };

        tracing::trace!(
            "level fragment `{}` (unique: {}, depth left: {})",
            selector,
            is_unique,
            options.min_depth
        );

        let mut parts = Vec::with_capacity(child_parts.len() + 1);
        parts.push(selector);
        parts.extend(child_parts);

        if let Some(parent) = self.doc.parent_element(element) {
            if options.to_root || add_parent {
                let next = SelectorOptions {
                    feature_count: 1,
                    min_depth: options.min_depth - 1,
                    to_root: options.to_root,
                    is_unique,
                };
                return self.generate(parent, &next, root, parts);
            }
        }
        Ok(parts.join(" > "))
    }

    /// `#id` when the element has a stable id resolving to exactly one
    /// match within `root`
    fn id_selector(&self, element: NodeId, root: NodeId) -> Result<Option<String>, EscapeError> {
        let Some(id) = self.doc.attribute(element, "id").filter(|v| !v.is_empty()) else {
            return Ok(None);
        };
        if VOLATILE_ID.is_match(id) {
            return Ok(None);
        }
        let selector = format!("#{}", escape_ident(id)?);
        if self.count_matches(root, &selector) == 1 {
            Ok(Some(selector))
        } else {
            Ok(None)
        }
    }

    /// `:nth-child(n)` when any sibling element also matches `selector`.
    /// An empty fragment matches every sibling, so the positional
    /// disambiguator still kicks in.
    fn nth_child_suffix(&self, element: NodeId, selector: &str) -> String {
        let siblings = self.doc.sibling_elements(element);
        let parsed = Selector::parse(selector).ok();
        let collides = siblings.iter().any(|&sibling| {
            sibling != element
                && match &parsed {
                    Some(sel) => self.doc.matches(sibling, sel),
                    None => selector.is_empty(),
                }
        });
        if !collides {
            return String::new();
        }
        match siblings.iter().position(|&s| s == element) {
            Some(index) => format!(":nth-child({})", index + 1),
            None => String::new(),
        }
    }

    fn count_matches(&self, root: NodeId, selector: &str) -> usize {
        match Selector::parse(selector) {
            Ok(sel) => self.doc.query_all(root, &sel).len(),
            Err(err) => {
                tracing::debug!("uniqueness probe skipped for `{}`: {}", selector, err);
                0
            }
        }
    }

    /// The `:root` fallback only ever applies to the top-level document's
    /// root element, never inside shadow trees
    fn is_document_root_element(&self, element: NodeId, root: NodeId) -> bool {
        !self.doc.is_shadow_root(root)
            && root == self.doc.root()
            && self.doc.document_element() == Some(element)
    }
}
