//! Document - high-level facade over the arena tree.

use crate::node::{Node, NodeData, ShadowMode};
use crate::{DomTree, NodeId};

/// A document: one arena holding the main tree plus any shadow trees.
/// Shadow roots are parentless nodes, so ordinary parent/child walks and
/// queries never cross a boundary; [`Document::containing_root`] and
/// [`Document::shadow_host`] are the only ways across.
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
}

impl Document {
    /// Create a new document holding only the document node
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let root = tree.push(Node::document());
        debug_assert_eq!(root, NodeId::ROOT);
        Self { tree }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Root element of the document (the `<html>` element of a parsed page)
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.child_elements(NodeId::ROOT).first().copied()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // --- building ---

    /// Create an element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.append_child(parent, child);
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.tree.get_mut(element).and_then(Node::as_element_mut) {
            elem.set_attr(name, value);
        }
    }

    /// Attach a shadow root to `host` and return its id. Returns the
    /// existing root if one is already attached.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowMode) -> NodeId {
        if let Some(existing) = self.tree.element(host).map(|e| e.shadow_root) {
            if existing.is_valid() {
                return existing;
            }
        }
        let shadow = self.tree.create_shadow_root(host, mode);
        if let Some(elem) = self.tree.get_mut(host).and_then(Node::as_element_mut) {
            elem.shadow_root = shadow;
        }
        shadow
    }

    // --- read side used by the selector engine ---

    /// Check that `id` refers to an element node
    pub fn is_element(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(Node::is_element)
    }

    /// Check that `id` refers to a shadow root node
    pub fn is_shadow_root(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(Node::is_shadow_root)
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.element(id).map(|e| e.name.as_str())
    }

    /// Attribute value, if the attribute is present
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.element(id).and_then(|e| e.attr(name))
    }

    /// Attribute presence (an empty value still counts)
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.tree.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Cached id attribute of an element
    pub fn id_attr(&self, id: NodeId) -> Option<&str> {
        self.tree.element(id).and_then(|e| e.id.as_deref())
    }

    /// Class list of an element (empty for non-elements)
    pub fn classes(&self, id: NodeId) -> &[String] {
        self.tree.element(id).map_or(&[], |e| e.classes.as_slice())
    }

    /// Parent node of any kind (element, document, shadow root)
    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.tree.parent(id);
        parent.is_valid().then_some(parent)
    }

    /// Parent, only if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent_node(id).filter(|&p| self.is_element(p))
    }

    /// Element children of `id`
    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.child_elements(id)
    }

    /// Element children of the parent of `id` (including `id` itself);
    /// empty when `id` has no parent
    pub fn sibling_elements(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent_node(id) {
            Some(parent) => self.tree.child_elements(parent),
            None => Vec::new(),
        }
    }

    /// 1-based position of `id` among its parent's element children
    pub fn sibling_index(&self, id: NodeId) -> Option<usize> {
        self.sibling_elements(id)
            .iter()
            .position(|&s| s == id)
            .map(|i| i + 1)
    }

    /// Topmost ancestor of `id`: the document node, a shadow root node, or
    /// (for detached subtrees) whatever parentless node the walk ends on
    pub fn containing_root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent_node(current) {
            current = parent;
        }
        current
    }

    /// Host element of a shadow root node
    pub fn shadow_host(&self, id: NodeId) -> Option<NodeId> {
        match self.tree.get(id).map(|n| &n.data) {
            Some(&NodeData::ShadowRoot { host, .. }) => Some(host),
            _ => None,
        }
    }

    /// Attached shadow root of an element, if any
    pub fn shadow_root_of(&self, host: NodeId) -> Option<NodeId> {
        self.tree
            .element(host)
            .map(|e| e.shadow_root)
            .filter(|r| r.is_valid())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_doc() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(NodeId::ROOT, html);
        doc.append_child(html, body);
        (doc, html, body)
    }

    #[test]
    fn test_document_element() {
        let (doc, html, body) = small_doc();
        assert_eq!(doc.document_element(), Some(html));
        assert_eq!(doc.parent_element(body), Some(html));
        assert_eq!(doc.parent_element(html), None);
        assert_eq!(doc.containing_root(body), NodeId::ROOT);
    }

    #[test]
    fn test_sibling_index() {
        let (mut doc, _, body) = small_doc();
        let a = doc.create_element("p");
        let b = doc.create_element("p");
        let text = doc.create_text("x");
        doc.append_child(body, a);
        doc.append_child(body, text);
        doc.append_child(body, b);

        assert_eq!(doc.sibling_index(a), Some(1));
        assert_eq!(doc.sibling_index(b), Some(2));
    }

    #[test]
    fn test_shadow_boundary() {
        let (mut doc, _, body) = small_doc();
        let host = doc.create_element("div");
        doc.append_child(body, host);
        let shadow = doc.attach_shadow(host, ShadowMode::Open);
        let inner = doc.create_element("span");
        doc.append_child(shadow, inner);

        assert!(doc.is_shadow_root(shadow));
        assert_eq!(doc.containing_root(inner), shadow);
        assert_eq!(doc.shadow_host(shadow), Some(host));
        assert_eq!(doc.shadow_root_of(host), Some(shadow));
        assert_eq!(doc.parent_element(inner), None);
        // attaching twice keeps the first root
        assert_eq!(doc.attach_shadow(host, ShadowMode::Open), shadow);
    }
}
