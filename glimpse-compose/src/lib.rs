//! # Glimpse document synthesis
//!
//! Pure side of the Glimpse live preview engine: turns a map of virtual
//! project files into a single renderable HTML document.
//!
//! - [`compose`] resolves the primary markup/stylesheet/script among known
//!   filename aliases and inlines them into one document, degrading to
//!   placeholder documents when the inputs are incomplete — it never fails.
//! - [`instrument::annotate`] tags opening markup elements with their owning
//!   file and 1-based source line so rendered elements can be traced back
//!   to source.
//! - [`inject::install_bridges`] prepends the console/select-mode bridge
//!   scripts that report runtime diagnostics and element picks to the host.
//!
//! ## Example
//! ```
//! use glimpse_compose::{compose, FileMap};
//!
//! let mut files = FileMap::new();
//! files.insert("index.html", "<html><head></head><body><h1>Hi</h1></body></html>");
//! files.insert("style.css", "h1 { color: red }");
//!
//! let doc = compose(&files, false);
//! assert!(doc.html.contains("color: red"));
//! ```

pub mod composer;
pub mod filemap;
pub mod inject;
pub mod instrument;

pub use composer::{
    compose, ComposedDocument, DocumentKind, FRAMEWORK_EXTENSIONS, MARKUP_ALIASES, SCRIPT_ALIASES,
    STYLE_ALIASES,
};
pub use filemap::FileMap;
pub use inject::{install_bridges, CONSOLE_BRIDGE_JS, SELECT_BRIDGE_JS};
pub use instrument::{annotate, ATTR_FILE, ATTR_LINE, ATTR_TAG};
