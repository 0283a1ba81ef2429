//! Drive a full pick: start signal, hover, click, clipboard, notice.
//!
//! Run with `cargo run -p hone-inspector --example pick`.

use hone_dom::Selector;
use hone_inspector::{inspect_channel, InspectorConfig, InspectorSession, MemoryClipboard};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"
<body>
    <nav>
        <a class="nav-link" href="/docs/guide.html">Guide</a>
        <a class="nav-link" href="/docs/report.pdf">Report</a>
    </nav>
    <main>
        <button class="btn">Cancel</button>
        <button class="btn btn-primary">Save</button>
    </main>
</body>
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let doc = hone_html::parse(PAGE);
    let target = doc
        .query_first(doc.root(), &Selector::parse(".btn-primary")?)
        .expect("fixture element");

    let (trigger, listener) = inspect_channel();
    let mut session = InspectorSession::new(&doc, InspectorConfig::default(), MemoryClipboard::new());

    // the control surface fires the one-shot signal...
    trigger.start();

    smol::block_on(async {
        // ...and the page-side listener starts inspecting once it arrives
        if listener.wait().await {
            session.start();
            session.hover(target);
            let outcome = session.click(target);
            println!("{}", outcome.notice);
            if let Some(selector) = outcome.selector {
                println!("selector: {selector}");
            }
        }
    });

    Ok(())
}
