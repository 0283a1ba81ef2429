//! End-to-end selector synthesis over parsed documents.

use hone_dom::{NodeId, Selector};
use hone_selector::{create_unique_selector, SelectorOptions, UniqueSelector};

fn find(doc: &hone_dom::Document, selector: &str) -> NodeId {
    doc.query_first(doc.root(), &Selector::parse(selector).unwrap())
        .expect("fixture element")
}

#[test]
fn test_page_unique_id_short_circuits() {
    let doc = hone_html::parse(
        r#"<body><form><button id="submit-btn">Send</button></form></body>"#,
    );
    let button = find(&doc, "#submit-btn");

    let selector = create_unique_selector(&doc, button, &SelectorOptions::default()).unwrap();
    assert_eq!(selector, UniqueSelector::Single("#submit-btn".to_string()));
}

#[test]
fn test_identical_siblings_get_nth_child() {
    let doc = hone_html::parse(
        r#"<body><ul>
            <li class="item">A</li>
            <li class="item">B</li>
            <li class="item">C</li>
        </ul></body>"#,
    );
    let second = doc.query_all(doc.root(), &Selector::parse("li").unwrap())[1];

    let selector = create_unique_selector(&doc, second, &SelectorOptions::default()).unwrap();
    let UniqueSelector::Single(selector) = selector else {
        panic!("expected a single selector");
    };
    assert!(selector.contains(":nth-child(2)"), "got `{selector}`");
    assert_eq!(selector, "ul > li:nth-child(2)");

    // the chain resolves back to the clicked element alone
    let parsed = Selector::parse(&selector).unwrap();
    assert_eq!(doc.query_all(doc.root(), &parsed), vec![second]);
}

#[test]
fn test_distinct_class_identifies_button() {
    let doc = hone_html::parse(
        r#"<body><div>
            <button class="btn">One</button>
            <button class="btn">Two</button>
            <button id="" class="btn btn-primary">Three</button>
        </div></body>"#,
    );
    let target = find(&doc, ".btn-primary");

    // unique among its siblings already, so no nth-child and - at depth
    // zero - no ancestor chain either
    let shallow = SelectorOptions {
        min_depth: 0,
        ..Default::default()
    };
    let selector = create_unique_selector(&doc, target, &shallow).unwrap();
    assert_eq!(
        selector,
        UniqueSelector::Single("button.btn-primary".to_string())
    );

    // default depth prepends one ancestor level
    let selector = create_unique_selector(&doc, target, &SelectorOptions::default()).unwrap();
    assert_eq!(
        selector,
        UniqueSelector::Single("div > button.btn-primary".to_string())
    );
}

#[test]
fn test_shadow_boundary_yields_two_parts() {
    let doc = hone_html::parse(
        r#"<body><div id="host">
            <template shadowrootmode="open"><button class="btn">In</button></template>
        </div></body>"#,
    );
    let host = find(&doc, "#host");
    let shadow = doc.shadow_root_of(host).unwrap();
    let target = doc.query_all(shadow, &Selector::parse("button").unwrap())[0];

    let selector = create_unique_selector(&doc, target, &SelectorOptions::default()).unwrap();
    let parts = selector.parts().to_vec();
    assert_eq!(parts.len(), 2);

    // the outer part resolves the host in the main document
    let outer = Selector::parse(&parts[0]).unwrap();
    assert_eq!(doc.query_all(doc.root(), &outer), vec![host]);
    // the inner part resolves the target within that host's shadow root
    let inner = Selector::parse(&parts[1]).unwrap();
    assert_eq!(doc.query_all(shadow, &inner), vec![target]);

    assert!(selector.is_shadow_path());
    assert_eq!(selector.to_string(), "#host, button");
}

#[test]
fn test_escaped_id_round_trips() {
    let doc = hone_html::parse(r#"<body><div id="3d">model</div></body>"#);
    let target = doc.query_all(doc.root(), &Selector::parse("div").unwrap())[0];

    let selector = create_unique_selector(&doc, target, &SelectorOptions::default()).unwrap();
    let UniqueSelector::Single(selector) = selector else {
        panic!("expected a single selector");
    };
    assert_eq!(selector, "#\\33 d");

    let parsed = Selector::parse(&selector).unwrap();
    assert_eq!(doc.query_all(doc.root(), &parsed), vec![target]);
}

#[test]
fn test_role_feature() {
    let doc = hone_html::parse(
        r#"<body><div role="banner">top</div><div>other</div></body>"#,
    );
    let target = find(&doc, "[role]");

    let selector = create_unique_selector(&doc, target, &SelectorOptions::default()).unwrap();
    assert_eq!(
        selector,
        UniqueSelector::Single("body > div[role=\"banner\"]".to_string())
    );
}

#[test]
fn test_file_reference_feature() {
    let doc = hone_html::parse(
        r#"<body><nav>
            <a class="link" href="/docs/report.pdf">Report</a>
            <a class="link" href="/docs/12345678">Item</a>
        </nav></body>"#,
    );
    let anchors = doc.query_all(doc.root(), &Selector::parse("a").unwrap());

    let with_file = create_unique_selector(&doc, anchors[0], &SelectorOptions::default()).unwrap();
    assert!(
        with_file.to_string().contains("[href$=\"report.pdf\"]"),
        "got `{with_file}`"
    );

    // the numeric href is rejected by the shortener, leaving position
    let numeric = create_unique_selector(&doc, anchors[1], &SelectorOptions::default()).unwrap();
    assert!(
        numeric.to_string().contains("a:nth-child(2)"),
        "got `{numeric}`"
    );
}
