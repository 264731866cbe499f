//! Document composer: FileMap → one renderable HTML document.
//!
//! Pure and total. Malformed or incomplete file sets degrade to placeholder
//! documents instead of returning errors, so the preview surface always has
//! something to show.

use crate::filemap::FileMap;
use crate::instrument;
use std::fmt::Write;

/// Primary markup aliases, highest priority first.
pub const MARKUP_ALIASES: &[&str] = &["index.html", "index.htm"];

/// Primary stylesheet aliases, highest priority first.
pub const STYLE_ALIASES: &[&str] = &["style.css", "styles.css", "main.css"];

/// Primary script aliases, highest priority first.
pub const SCRIPT_ALIASES: &[&str] = &["script.js", "main.js", "app.js", "index.js"];

/// Extensions of component-framework sources that need a build step before
/// they can run. Their presence without markup produces a placeholder.
pub const FRAMEWORK_EXTENSIONS: &[&str] = &[".jsx", ".tsx", ".vue", ".svelte"];

/// How a composed document was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// Assembled around a markup file found in the FileMap.
    Markup,
    /// Synthesized boilerplate embedding a stylesheet and/or script.
    Boilerplate,
    /// Static placeholder: framework sources present but no runnable entry.
    FrameworkPlaceholder,
    /// Static placeholder: nothing renderable in the FileMap.
    Empty,
}

impl DocumentKind {
    /// Placeholders carry no user code and receive no bridge scripts.
    pub fn is_executable(self) -> bool {
        matches!(self, DocumentKind::Markup | DocumentKind::Boilerplate)
    }
}

/// Immutable output of [`compose`] for a given (FileMap, instrument) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument {
    pub html: String,
    pub kind: DocumentKind,
}

/// Composes a renderable document from the file map.
///
/// Resolution order: primary markup, then stylesheet, then script, each by
/// the first alias match in priority order. The stylesheet/script are
/// inlined only when the markup does not already reference any alias of
/// that kind by name. With `instrument` set, opening tags in the markup are
/// annotated with source-trace attributes before assembly.
///
/// Deterministic and side-effect-free: identical inputs yield
/// byte-identical documents.
pub fn compose(files: &FileMap, instrument: bool) -> ComposedDocument {
    let markup = first_alias(files, MARKUP_ALIASES);
    let style = first_alias(files, STYLE_ALIASES);
    let script = first_alias(files, SCRIPT_ALIASES);

    if let Some((path, source)) = markup {
        return ComposedDocument {
            html: compose_markup(path, source, style, script, instrument),
            kind: DocumentKind::Markup,
        };
    }

    if let Some(path) = framework_source(files) {
        return ComposedDocument {
            html: framework_placeholder(path),
            kind: DocumentKind::FrameworkPlaceholder,
        };
    }

    if style.is_some() || script.is_some() {
        return ComposedDocument {
            html: boilerplate(style.map(|(_, c)| c), script.map(|(_, c)| c)),
            kind: DocumentKind::Boilerplate,
        };
    }

    ComposedDocument {
        html: empty_placeholder(),
        kind: DocumentKind::Empty,
    }
}

fn first_alias<'a>(
    files: &'a FileMap,
    aliases: &'static [&'static str],
) -> Option<(&'static str, &'a str)> {
    aliases
        .iter()
        .find_map(|alias| files.get(alias).map(|content| (*alias, content)))
}

/// First framework source path in deterministic (FileMap) order.
fn framework_source(files: &FileMap) -> Option<&str> {
    files.paths().find(|path| {
        FRAMEWORK_EXTENSIONS
            .iter()
            .any(|ext| path.to_ascii_lowercase().ends_with(ext))
    })
}

fn compose_markup(
    path: &str,
    source: &str,
    style: Option<(&str, &str)>,
    script: Option<(&str, &str)>,
    instrument: bool,
) -> String {
    // Reference checks run against the author's markup, not the
    // instrumented copy, so added attributes can never suppress injection.
    let inject_style = style.is_some() && !references_any(source, STYLE_ALIASES);
    let inject_script = script.is_some() && !references_any(source, SCRIPT_ALIASES);

    let mut html = if instrument {
        instrument::annotate(source, path)
    } else {
        source.to_string()
    };

    if inject_style {
        if let Some((_, css)) = style {
            html = insert_style(&html, css);
        }
    }
    if inject_script {
        if let Some((_, js)) = script {
            html = insert_script(&html, js);
        }
    }
    html
}

/// True when the markup mentions any of the aliases by name (for example a
/// `<link href="style.css">` or `<script src="main.js">`).
fn references_any(markup: &str, aliases: &[&str]) -> bool {
    let lower = markup.to_ascii_lowercase();
    aliases.iter().any(|alias| lower.contains(alias))
}

/// Inline `<style>` goes before `</head>`, else before `<body`, else at the
/// front of the document.
fn insert_style(html: &str, css: &str) -> String {
    let block = format!("<style>\n{}\n</style>\n", css);
    if let Some(at) = find_ci(html, "</head>") {
        insert_at(html, at, &block)
    } else if let Some(at) = find_ci(html, "<body") {
        insert_at(html, at, &block)
    } else {
        format!("{}{}", block, html)
    }
}

/// Inline `<script>` goes before `</body>`, else is appended.
fn insert_script(html: &str, js: &str) -> String {
    let block = format!("<script>\n{}\n</script>\n", js);
    if let Some(at) = find_ci(html, "</body>") {
        insert_at(html, at, &block)
    } else {
        format!("{}{}", html, block)
    }
}

/// Case-insensitive substring search. ASCII lowering keeps byte offsets
/// valid in the original string.
pub(crate) fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(needle)
}

pub(crate) fn insert_at(original: &str, at: usize, insertion: &str) -> String {
    let mut out = String::with_capacity(original.len() + insertion.len());
    out.push_str(&original[..at]);
    out.push_str(insertion);
    out.push_str(&original[at..]);
    out
}

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Shared look for synthesized and placeholder documents.
const BASE_STYLES: &str = "html,body{margin:0;min-height:100vh;font-family:system-ui,sans-serif;}\
.glimpse-placeholder{display:flex;flex-direction:column;align-items:center;justify-content:center;\
min-height:100vh;background:#09090b;color:#e4e4e7;text-align:center;padding:2rem;}\
.glimpse-placeholder h1{font-size:1.25rem;font-weight:600;color:#f4f4f5;margin:0 0 0.5rem;}\
.glimpse-placeholder p{font-size:0.9rem;color:#a1a1aa;max-width:28rem;margin:0.25rem 0;}\
.glimpse-placeholder code{font-family:monospace;background:#27272a;color:#fbbf24;\
padding:0.15em 0.4em;border-radius:4px;}";

/// Minimal runnable document wrapping a stylesheet and/or script that
/// arrived without markup. The generic root containers give scripts
/// something to mount onto.
fn boilerplate(css: Option<&str>, js: Option<&str>) -> String {
    let mut head_extra = String::new();
    if let Some(css) = css {
        let _ = write!(head_extra, "<style>\n{}\n</style>\n", css);
    }
    let mut body_extra = String::new();
    if let Some(js) = js {
        let _ = write!(body_extra, "<script>\n{}\n</script>\n", js);
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Preview</title>
{}</head>
<body>
<div id="root"></div>
<main id="app"></main>
{}</body>
</html>
"#,
        head_extra, body_extra
    )
}

/// Static explainer shown when only framework sources exist. Never attempts
/// to execute them.
fn framework_placeholder(path: &str) -> String {
    placeholder_document(
        "Build step required",
        &format!(
            "<p><code>{}</code> is a component-framework source and needs a compiled \
entry file before it can be previewed.</p>\
<p>Add an <code>index.html</code> to see a live preview.</p>",
            escape_html(path)
        ),
    )
}

fn empty_placeholder() -> String {
    placeholder_document(
        "Nothing to preview yet",
        "<p>Add an <code>index.html</code>, a stylesheet, or a script and the \
preview will appear here.</p>",
    )
}

fn placeholder_document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body>
<div class="glimpse-placeholder">
<h1>{}</h1>
{}
</div>
</body>
</html>
"#,
        escape_html(title),
        BASE_STYLES,
        escape_html(title),
        body
    )
}
