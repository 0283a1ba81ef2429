//! hone selector - unique CSS selector synthesis
//!
//! Given an element in a [`hone_dom::Document`], build a short, readable
//! CSS selector that matches it as uniquely as possible, the way a
//! developer would write one by hand: ids first, then ARIA roles, custom
//! element names, distinctive classes and file-reference attributes, with
//! positional `:nth-child` only as a tie-breaker.
//!
//! Elements inside shadow trees get one selector per boundary, outermost
//! first, since standard selectors cannot pierce a shadow root.

mod escape;
mod features;
mod generator;
mod uri;

pub use escape::{escape_ident, EscapeError};
pub use generator::{SelectorEngine, SelectorOptions};
pub use uri::{encode_uri, friendly_uri_end, parse_uri, FriendlyUriOptions, UriPieces};

use std::fmt;

use hone_dom::{Document, NodeId};

/// Result of selector synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueSelector {
    /// Element lives in the top-level document
    Single(String),
    /// One selector per shadow boundary, outermost first; each selector
    /// resolves within the root the previous one pierced into
    ShadowPath(Vec<String>),
}

impl UniqueSelector {
    /// All selector parts, outermost first
    pub fn parts(&self) -> &[String] {
        match self {
            Self::Single(s) => std::slice::from_ref(s),
            Self::ShadowPath(parts) => parts,
        }
    }

    /// Consume into the parts vector
    pub fn into_parts(self) -> Vec<String> {
        match self {
            Self::Single(s) => vec![s],
            Self::ShadowPath(parts) => parts,
        }
    }

    /// Whether the target sat behind at least one shadow boundary
    pub fn is_shadow_path(&self) -> bool {
        matches!(self, Self::ShadowPath(_))
    }
}

impl fmt::Display for UniqueSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(s) => f.write_str(s),
            Self::ShadowPath(parts) => f.write_str(&parts.join(", ")),
        }
    }
}

impl<'a> SelectorEngine<'a> {
    /// Get a unique CSS selector for `element`.
    ///
    /// Returns [`UniqueSelector::Single`] for elements in the main
    /// document and [`UniqueSelector::ShadowPath`] for elements inside
    /// (possibly nested) shadow trees. A handle that does not refer to an
    /// element yields an empty `Single` immediately. The only error is a
    /// NUL character in an id, class, or attribute value the selector
    /// would embed.
    pub fn create_unique_selector(
        &self,
        element: NodeId,
        options: &SelectorOptions,
    ) -> Result<UniqueSelector, EscapeError> {
        let doc = self.document();
        if !doc.is_element(element) {
            return Ok(UniqueSelector::Single(String::new()));
        }

        let root = doc.containing_root(element);
        if !doc.is_shadow_root(root) {
            let selector = self.generate(element, options, root, Vec::new())?;
            return Ok(UniqueSelector::Single(selector));
        }

        // one (element, root) pair per shadow boundary, climbing out
        let mut boundaries = Vec::new();
        let mut current = element;
        let mut current_root = root;
        while doc.is_shadow_root(current_root) {
            boundaries.push((current, current_root));
            let Some(host) = doc.shadow_host(current_root) else {
                break;
            };
            current = host;
            current_root = doc.containing_root(host);
        }
        boundaries.push((current, current_root));
        boundaries.reverse();

        tracing::debug!("element sits behind {} shadow boundaries", boundaries.len() - 1);

        let parts = boundaries
            .into_iter()
            .map(|(el, r)| self.generate(el, options, r, Vec::new()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UniqueSelector::ShadowPath(parts))
    }
}

/// One-shot convenience wrapper around [`SelectorEngine`]
pub fn create_unique_selector(
    doc: &Document,
    element: NodeId,
    options: &SelectorOptions,
) -> Result<UniqueSelector, EscapeError> {
    SelectorEngine::new(doc).create_unique_selector(element, options)
}
