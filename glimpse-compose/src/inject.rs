//! Script injector: builds the console-bridge and select-mode-bridge
//! payloads and places them at the very start of the document's head so
//! capture is active before any user code runs.

use crate::composer::{find_ci, insert_at, ComposedDocument};
use regex::Regex;
use std::sync::OnceLock;

/// Wraps the sandbox's console entry points and global error handlers,
/// forwarding entries over the bridge channel while still invoking the
/// originals.
pub const CONSOLE_BRIDGE_JS: &str = include_str!("console_bridge.js");

/// Overlay rectangles plus pointer/click listeners reporting hover and
/// selection of instrumented elements. Only installed in select mode.
pub const SELECT_BRIDGE_JS: &str = include_str!("select_bridge.js");

/// The concatenated bridge payload as a single `<script>` element.
pub fn bridge_payload(select_mode: bool) -> String {
    let mut js = String::from(CONSOLE_BRIDGE_JS);
    if select_mode {
        js.push('\n');
        js.push_str(SELECT_BRIDGE_JS);
    }
    format!("<script>\n{}</script>\n", js)
}

/// Installs the bridge scripts into a composed document. Placeholder
/// documents carry no user code and are returned untouched.
///
/// The payload lands immediately after the opening `<head>` tag; documents
/// without a head get it prepended so it still runs first.
pub fn install_bridges(doc: &ComposedDocument, select_mode: bool) -> String {
    if !doc.kind.is_executable() {
        return doc.html.clone();
    }
    let payload = bridge_payload(select_mode);
    if let Some(m) = head_open_scanner().find(&doc.html) {
        if let Some(close) = doc.html[m.start()..].find('>') {
            return insert_at(&doc.html, m.start() + close + 1, &payload);
        }
    }
    if let Some(at) = find_ci(&doc.html, "<html") {
        // No head: drop the payload right after the <html ...> open tag.
        if let Some(close) = doc.html[at..].find('>') {
            return insert_at(&doc.html, at + close + 1, &payload);
        }
    }
    format!("{}{}", payload, doc.html)
}

/// Matches `<head>` / `<head ...>` but not `<header>`.
fn head_open_scanner() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<head[\s>]").unwrap())
}
