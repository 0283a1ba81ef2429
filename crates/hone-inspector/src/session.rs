//! Inspection session: start signal, hover highlight, click interception.

use std::fmt;

use hone_dom::{Document, NodeId, Selector};
use hone_selector::{SelectorEngine, SelectorOptions};

use crate::clipboard::Clipboard;
use crate::config::InspectorConfig;

/// Stylesheet applied to the floating highlight element
pub const INSPECTOR_STYLE: &str = ".inspector-element { position: absolute; pointer-events: none; border: 2px solid tomato; transition: all 200ms; background-color: rgba(180, 187, 105, 0.2); }";

/// Control-surface side of the one-shot "start inspection" signal
pub struct InspectTrigger {
    tx: smol::channel::Sender<()>,
}

/// Page side of the one-shot "start inspection" signal
pub struct InspectListener {
    rx: smol::channel::Receiver<()>,
}

/// Build the start-inspection channel. The payload is a bare signal, so
/// any process-boundary transport could stand in for it.
pub fn inspect_channel() -> (InspectTrigger, InspectListener) {
    let (tx, rx) = smol::channel::bounded(1);
    (InspectTrigger { tx }, InspectListener { rx })
}

impl InspectTrigger {
    /// Fire the signal; false when the listener is gone or a signal is
    /// already pending
    pub fn start(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }
}

impl InspectListener {
    /// Wait for the signal; false when the trigger side was dropped
    pub async fn wait(&self) -> bool {
        self.rx.recv().await.is_ok()
    }
}

/// User-facing outcome of one pick. The two cases are exhaustive: the
/// selector either reached the clipboard or it did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Copied,
    CopyFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copied => f.write_str("The unique CSS selector successfully copied to clipboard"),
            Self::CopyFailed => {
                f.write_str("The unique CSS selector could not be copied to clipboard")
            }
        }
    }
}

/// What happened to an intercepted click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    /// The selector that was delivered, if synthesis succeeded
    pub selector: Option<String>,
    /// Notice to surface to the user
    pub notice: Notice,
    /// Whether the click's default action was suppressed
    pub default_suppressed: bool,
}

/// One inspection over one document: highlight on hover, pick on click
pub struct InspectorSession<'a, C: Clipboard> {
    doc: &'a Document,
    config: InspectorConfig,
    clipboard: C,
    hovered: Option<NodeId>,
    active: bool,
}

impl<'a, C: Clipboard> InspectorSession<'a, C> {
    pub fn new(doc: &'a Document, config: InspectorConfig, clipboard: C) -> Self {
        Self {
            doc,
            config,
            clipboard,
            hovered: None,
            active: false,
        }
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Currently highlighted element
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Begin inspecting
    pub fn start(&mut self) {
        tracing::info!("inspection started");
        self.active = true;
    }

    /// Stop inspecting and drop the highlight
    pub fn stop(&mut self) {
        tracing::info!("inspection stopped");
        self.active = false;
        self.hovered = None;
    }

    /// Move the highlight to `element`; ignored while inactive, when
    /// highlighting is disabled, or when the element matches an exclude
    /// selector
    pub fn hover(&mut self, element: NodeId) -> bool {
        if !self.active
            || !self.config.create_inspector
            || !self.doc.is_element(element)
            || self.is_excluded(element)
        {
            return false;
        }
        self.hovered = Some(element);
        true
    }

    /// Intercept a click on `element`: synthesize the selector, deliver it
    /// to the clipboard, and end the session
    pub fn click(&mut self, element: NodeId) -> ClickOutcome {
        let engine = SelectorEngine::new(self.doc);
        let selector = engine
            .create_unique_selector(element, &self.config.selector)
            .map(|s| s.to_string());

        let (selector, notice) = match selector {
            Ok(text) => match self.clipboard.write_text(&text) {
                Ok(()) => {
                    tracing::info!("copied selector `{}`", text);
                    (Some(text), Notice::Copied)
                }
                Err(err) => {
                    tracing::warn!("clipboard write failed: {}", err);
                    (Some(text), Notice::CopyFailed)
                }
            },
            Err(err) => {
                tracing::warn!("selector synthesis failed: {}", err);
                (None, Notice::CopyFailed)
            }
        };

        self.stop();
        ClickOutcome {
            selector,
            notice,
            default_suppressed: self.config.block_redirection,
        }
    }

    fn is_excluded(&self, element: NodeId) -> bool {
        self.config
            .excludes
            .iter()
            .filter_map(|text| Selector::parse(text).ok())
            .any(|selector| self.doc.matches(element, &selector))
    }

    /// Convenience for the selector options in play
    pub fn selector_options(&self) -> &SelectorOptions {
        &self.config.selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    fn fixture() -> hone_dom::Document {
        hone_html::parse(
            r#"<body>
                <button id="submit-btn">Send</button>
                <div class="overlay">x</div>
            </body>"#,
        )
    }

    fn find(doc: &Document, selector: &str) -> NodeId {
        doc.query_first(doc.root(), &Selector::parse(selector).unwrap())
            .unwrap()
    }

    #[test]
    fn test_click_copies_selector_and_stops() {
        let doc = fixture();
        let button = find(&doc, "#submit-btn");
        let mut session =
            InspectorSession::new(&doc, InspectorConfig::default(), MemoryClipboard::new());

        session.start();
        assert!(session.is_active());

        let outcome = session.click(button);
        assert_eq!(outcome.selector.as_deref(), Some("#submit-btn"));
        assert_eq!(outcome.notice, Notice::Copied);
        assert!(outcome.default_suppressed);
        assert!(!session.is_active());
        assert_eq!(session.clipboard().contents(), Some("#submit-btn"));
    }

    #[test]
    fn test_excluded_elements_are_not_highlighted() {
        let doc = fixture();
        let overlay = find(&doc, ".overlay");
        let button = find(&doc, "#submit-btn");

        let config = InspectorConfig {
            excludes: vec![".overlay".to_string()],
            ..Default::default()
        };
        let mut session = InspectorSession::new(&doc, config, MemoryClipboard::new());
        session.start();

        assert!(!session.hover(overlay));
        assert_eq!(session.hovered(), None);
        assert!(session.hover(button));
        assert_eq!(session.hovered(), Some(button));
    }

    #[test]
    fn test_hover_inactive_session_is_ignored() {
        let doc = fixture();
        let button = find(&doc, "#submit-btn");
        let mut session =
            InspectorSession::new(&doc, InspectorConfig::default(), MemoryClipboard::new());

        assert!(!session.hover(button));
    }

    #[test]
    fn test_failing_clipboard_reports_copy_failed() {
        struct BrokenClipboard;
        impl Clipboard for BrokenClipboard {
            fn write_text(&mut self, _text: &str) -> Result<(), crate::ClipboardError> {
                Err(crate::ClipboardError::Unavailable)
            }
        }

        let doc = fixture();
        let button = find(&doc, "#submit-btn");
        let mut session = InspectorSession::new(&doc, InspectorConfig::default(), BrokenClipboard);
        session.start();

        let outcome = session.click(button);
        assert_eq!(outcome.notice, Notice::CopyFailed);
        assert_eq!(
            outcome.notice.to_string(),
            "The unique CSS selector could not be copied to clipboard"
        );
    }

    #[test]
    fn test_start_signal_is_one_shot() {
        let (trigger, listener) = inspect_channel();
        assert!(trigger.start());
        // a second signal has nowhere to go until the first is consumed
        assert!(!trigger.start());
        assert!(smol::block_on(listener.wait()));
    }
}
