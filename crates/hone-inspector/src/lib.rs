//! hone inspector - element-picking session glue
//!
//! The thin layer between a control surface and the selector engine: a
//! one-shot "start inspection" signal, hover highlighting, click
//! interception that synthesizes a selector and delivers it to a
//! clipboard, and the two exhaustive user-facing outcome notices.

mod clipboard;
mod config;
mod session;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
pub use config::InspectorConfig;
pub use session::{
    inspect_channel, ClickOutcome, InspectListener, InspectTrigger, InspectorSession, Notice,
    INSPECTOR_STYLE,
};
