//! Source-trace instrumentation: annotates opening tags with the owning
//! file and 1-based line number so the select-mode bridge can map rendered
//! elements back to their source.
//!
//! Granularity is the physical line — sibling tags opened on one line share
//! a line number.

use crate::composer::escape_html;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Attribute carrying the 1-based source line.
pub const ATTR_LINE: &str = "data-line";
/// Attribute carrying the owning virtual file path.
pub const ATTR_FILE: &str = "data-file";
/// Attribute carrying the lowercased tag name.
pub const ATTR_TAG: &str = "data-tag";

/// Tags that never receive trace attributes: non-visual, void layout
/// plumbing, or elements whose attributes the bridge must not disturb.
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "title", "head", "doctype", "html", "br", "hr", "img",
    "input",
];

/// Matches an opening (or self-closing) tag: name, attribute run, optional
/// trailing slash. Closing tags (`</div>`), comments, and doctypes start
/// with a non-letter after `<` and never match.
fn tag_scanner() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([a-zA-Z][a-zA-Z0-9-]*)([^>]*?)(/?)>").unwrap())
}

/// Annotates every non-skipped opening tag in `markup` with
/// `data-line`/`data-file`/`data-tag`. Purely additive: line count,
/// existing attributes, and self-closing syntax are preserved, so the
/// visible rendering is unchanged.
pub fn annotate(markup: &str, path: &str) -> String {
    let escaped_path = escape_html(path);
    let mut lines = Vec::new();
    for (idx, line) in markup.split('\n').enumerate() {
        lines.push(annotate_line(line, idx + 1, &escaped_path));
    }
    lines.join("\n")
}

fn annotate_line(line: &str, line_no: usize, escaped_path: &str) -> String {
    tag_scanner()
        .replace_all(line, |caps: &Captures| {
            let name = &caps[1];
            let attrs = &caps[2];
            let slash = &caps[3];
            let lower = name.to_ascii_lowercase();
            if SKIPPED_TAGS.contains(&lower.as_str()) {
                return caps[0].to_string();
            }
            format!(
                "<{}{} {}=\"{}\" {}=\"{}\" {}=\"{}\"{}>",
                name, attrs, ATTR_LINE, line_no, ATTR_FILE, escaped_path, ATTR_TAG, lower, slash
            )
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn annotates_plain_tag() {
        let out = annotate("<div>", "index.html");
        assert_eq!(
            out,
            "<div data-line=\"1\" data-file=\"index.html\" data-tag=\"div\">"
        );
    }

    #[test]
    fn preserves_existing_attributes_and_self_closing() {
        let out = annotate(r#"<section class="a" id="s"/>"#, "page.html");
        assert_eq!(
            out,
            r#"<section class="a" id="s" data-line="1" data-file="page.html" data-tag="section"/>"#
        );
    }

    #[test]
    fn skips_denylisted_and_closing_tags() {
        let src = "<script src=\"x.js\"></script>\n<img src=\"a.png\">\n</div>";
        assert_eq!(annotate(src, "index.html"), src);
    }

    #[test]
    fn line_numbers_are_one_indexed_per_physical_line() {
        let src = "<main>\n<p>one</p>\n<p>two</p><span>same line</span>\n</main>";
        let out = annotate(src, "index.html");
        let lines: Vec<_> = out.split('\n').collect();
        assert!(lines[0].contains("data-line=\"1\""));
        assert!(lines[1].contains("data-line=\"2\""));
        // Sibling tags on one physical line share the line number.
        assert_eq!(lines[2].matches("data-line=\"3\"").count(), 2);
    }
}
