//! Per-element feature extraction.
//!
//! Walks a fixed priority list of feature rules - the traits a developer
//! would recognize an element by - and collects at most `feature_count`
//! selector fragments for one element.

use hone_dom::{Document, NodeId};

use crate::escape::{escape_ident, EscapeError};
use crate::uri::{encode_uri, friendly_uri_end, FriendlyUriOptions};

/// Tag names too generic to identify an element on their own
const COMMON_TAGS: &[&str] = &[
    "div", "span", "p", "b", "i", "u", "strong", "em", "h2", "h3",
];

/// Substrings flagging state/utility classes that change too often to be
/// worth putting in a selector
const STATE_CLASS_MARKERS: &[&str] = &[
    "focus", "hover", "hidden", "visible", "dirty", "touched", "valid", "disable", "enable",
    "active", "col-",
];

/// Read-only snapshot of one element, computed fresh per extraction
pub(crate) struct FeatureSet {
    node_name: String,
    is_custom: bool,
    is_common: bool,
    distinct_classes: Vec<String>,
}

fn feature_set(doc: &Document, element: NodeId) -> FeatureSet {
    let node_name = doc.tag_name(element).unwrap_or_default().to_string();
    FeatureSet {
        is_custom: node_name.contains('-'),
        is_common: COMMON_TAGS.contains(&node_name.as_str()),
        distinct_classes: distinct_class_list(doc, element),
        node_name,
    }
}

fn is_stable_class_name(class: &str) -> bool {
    !STATE_CLASS_MARKERS.iter().any(|m| class.contains(m))
}

/// Classes on `element` that none of its sibling elements carry, with
/// state/utility classes filtered out first
fn distinct_class_list(doc: &Document, element: NodeId) -> Vec<String> {
    let classes = doc.classes(element);
    if classes.is_empty() {
        return Vec::new();
    }

    let mut distinct: Vec<String> = classes
        .iter()
        .filter(|c| is_stable_class_name(c))
        .cloned()
        .collect();

    for sibling in doc.sibling_elements(element) {
        if sibling == element {
            continue;
        }
        let sibling_classes = doc.classes(sibling);
        distinct.retain(|c| !sibling_classes.contains(c));
    }
    distinct
}

type FeatureRule = fn(&Document, NodeId, &FeatureSet) -> Result<Option<String>, EscapeError>;

/// Feature rules from most to least recognizable
const RULES: &[FeatureRule] = &[
    custom_element_name,
    aria_role,
    uncommon_tag,
    name_attribute,
    distinct_classes,
    file_reference,
    common_tag,
];

fn custom_element_name(
    _doc: &Document,
    _element: NodeId,
    set: &FeatureSet,
) -> Result<Option<String>, EscapeError> {
    Ok(set.is_custom.then(|| set.node_name.clone()))
}

fn aria_role(
    doc: &Document,
    element: NodeId,
    _set: &FeatureSet,
) -> Result<Option<String>, EscapeError> {
    match doc.attribute(element, "role") {
        Some(role) => Ok(Some(format!("[role=\"{}\"]", escape_ident(role)?))),
        None => Ok(None),
    }
}

fn uncommon_tag(
    doc: &Document,
    element: NodeId,
    set: &FeatureSet,
) -> Result<Option<String>, EscapeError> {
    if set.is_common || set.is_custom {
        return Ok(None);
    }
    let mut fragment = escape_ident(&set.node_name)?;
    if set.node_name == "input" {
        if let Some(input_type) = doc.attribute(element, "type") {
            fragment.push_str(&format!("[type=\"{input_type}\"]"));
        }
    }
    Ok(Some(fragment))
}

fn name_attribute(
    doc: &Document,
    element: NodeId,
    _set: &FeatureSet,
) -> Result<Option<String>, EscapeError> {
    if doc.has_attribute(element, "id") {
        return Ok(None);
    }
    match doc.attribute(element, "name").filter(|n| !n.is_empty()) {
        Some(name) => Ok(Some(format!("[name=\"{}\"]", escape_ident(name)?))),
        None => Ok(None),
    }
}

fn distinct_classes(
    _doc: &Document,
    _element: NodeId,
    set: &FeatureSet,
) -> Result<Option<String>, EscapeError> {
    // three or more distinct classes is noise, not identity
    if set.distinct_classes.is_empty() || set.distinct_classes.len() >= 3 {
        return Ok(None);
    }
    let mut fragment = String::new();
    for class in &set.distinct_classes {
        fragment.push('.');
        fragment.push_str(&escape_ident(class)?);
    }
    Ok(Some(fragment))
}

fn file_reference(
    doc: &Document,
    element: NodeId,
    _set: &FeatureSet,
) -> Result<Option<String>, EscapeError> {
    let attr = if doc.has_attribute(element, "href") {
        "href"
    } else if doc.has_attribute(element, "src") {
        "src"
    } else {
        return Ok(None);
    };

    let value = doc.attribute(element, attr).unwrap_or_default();
    let tail = friendly_uri_end(value, &FriendlyUriOptions::default());
    Ok(tail.map(|t| format!("[{attr}$=\"{}\"]", encode_uri(&t))))
}

fn common_tag(
    _doc: &Document,
    _element: NodeId,
    set: &FeatureSet,
) -> Result<Option<String>, EscapeError> {
    Ok(set.is_common.then(|| set.node_name.clone()))
}

/// Collect up to `feature_count` selector fragments for `element`.
///
/// A fragment starting with a lowercase letter is a bare tag name and
/// leads the list; attribute/class/role fragments trail it, so the
/// concatenation reads `tag.class[attr]`.
pub(crate) fn element_features(
    doc: &Document,
    element: NodeId,
    feature_count: usize,
) -> Result<Vec<String>, EscapeError> {
    let set = feature_set(doc, element);
    let mut features: Vec<String> = Vec::new();

    for rule in RULES {
        if features.len() == feature_count {
            break;
        }
        if let Some(fragment) = rule(doc, element, &set)? {
            if fragment
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_lowercase())
            {
                features.insert(0, fragment);
            } else {
                features.push(fragment);
            }
        }
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_body() -> (Document, NodeId) {
        let mut doc = Document::new();
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(hone_dom::NodeId::ROOT, html);
        doc.append_child(html, body);
        (doc, body)
    }

    #[test]
    fn test_custom_element_wins() {
        let (mut doc, body) = doc_with_body();
        let el = doc.create_element("fancy-widget");
        doc.set_attribute(el, "role", "button");
        doc.append_child(body, el);

        let features = element_features(&doc, el, 2).unwrap();
        assert_eq!(features, vec!["fancy-widget", "[role=\"button\"]"]);
    }

    #[test]
    fn test_input_type_suffix() {
        let (mut doc, body) = doc_with_body();
        let el = doc.create_element("input");
        doc.set_attribute(el, "type", "email");
        doc.append_child(body, el);

        let features = element_features(&doc, el, 1).unwrap();
        assert_eq!(features, vec!["input[type=\"email\"]"]);
    }

    #[test]
    fn test_name_requires_absent_id() {
        let (mut doc, body) = doc_with_body();
        let named = doc.create_element("select");
        doc.set_attribute(named, "name", "country");
        doc.append_child(body, named);

        let features = element_features(&doc, named, 2).unwrap();
        assert_eq!(features, vec!["select", "[name=\"country\"]"]);

        // an id attribute - even an empty one - suppresses the name rule
        let with_id = doc.create_element("select");
        doc.set_attribute(with_id, "name", "city");
        doc.set_attribute(with_id, "id", "");
        doc.append_child(body, with_id);

        let features = element_features(&doc, with_id, 2).unwrap();
        assert_eq!(features, vec!["select"]);
    }

    #[test]
    fn test_distinct_classes_vs_siblings() {
        let (mut doc, body) = doc_with_body();
        let a = doc.create_element("div");
        doc.set_attribute(a, "class", "card featured");
        let b = doc.create_element("div");
        doc.set_attribute(b, "class", "card");
        doc.append_child(body, a);
        doc.append_child(body, b);

        assert_eq!(distinct_class_list(&doc, a), vec!["featured"]);
        let features = element_features(&doc, a, 2).unwrap();
        assert_eq!(features, vec!["div", ".featured"]);
    }

    #[test]
    fn test_state_classes_filtered() {
        let (mut doc, body) = doc_with_body();
        let el = doc.create_element("div");
        doc.set_attribute(el, "class", "is-active ng-touched menu");
        doc.append_child(body, el);

        assert_eq!(distinct_class_list(&doc, el), vec!["menu"]);
    }

    #[test]
    fn test_too_many_distinct_classes_disqualify() {
        let (mut doc, body) = doc_with_body();
        let el = doc.create_element("div");
        doc.set_attribute(el, "class", "one two three");
        doc.append_child(body, el);

        let features = element_features(&doc, el, 2).unwrap();
        assert_eq!(features, vec!["div"]);
    }

    #[test]
    fn test_file_reference() {
        let (mut doc, body) = doc_with_body();
        let el = doc.create_element("a");
        doc.set_attribute(el, "href", "/files/report.pdf");
        doc.append_child(body, el);

        let features = element_features(&doc, el, 2).unwrap();
        assert_eq!(features, vec!["a", "[href$=\"report.pdf\"]"]);
    }

    #[test]
    fn test_feature_count_zero() {
        let (mut doc, body) = doc_with_body();
        let el = doc.create_element("div");
        doc.append_child(body, el);

        assert!(element_features(&doc, el, 0).unwrap().is_empty());
    }
}
