use glimpse_compose::{
    compose, install_bridges, ComposedDocument, DocumentKind, FileMap, CONSOLE_BRIDGE_JS,
};
use pretty_assertions::assert_eq;

fn files(entries: &[(&str, &str)]) -> FileMap {
    entries.iter().copied().collect()
}

// Markup-only FileMap passes through untouched: nothing to inject.
#[test]
fn markup_only_is_unchanged() {
    let map = files(&[("index.html", "<html><body><h1>Hi</h1></body></html>")]);
    let doc = compose(&map, false);
    assert_eq!(doc.kind, DocumentKind::Markup);
    assert_eq!(doc.html, "<html><body><h1>Hi</h1></body></html>");
}

#[test]
fn composing_identical_inputs_is_idempotent() {
    let map = files(&[
        ("index.html", "<html><head></head><body><p>x</p></body></html>"),
        ("style.css", "p { color: blue }"),
        ("script.js", "console.log('hi');"),
    ]);
    let a = compose(&map, true);
    let b = compose(&map, true);
    assert_eq!(a, b);
}

#[test]
fn style_alias_precedence() {
    let map = files(&[
        ("index.html", "<html><head></head><body></body></html>"),
        ("styles.css", "body { color: green }"),
        ("style.css", "body { color: red }"),
    ]);
    let doc = compose(&map, false);
    assert!(doc.html.contains("color: red"));
    assert!(!doc.html.contains("color: green"));
}

#[test]
fn script_alias_precedence() {
    let map = files(&[
        ("index.html", "<html><body></body></html>"),
        ("index.js", "var last = 1;"),
        ("main.js", "var second = 1;"),
        ("script.js", "var first = 1;"),
    ]);
    let doc = compose(&map, false);
    assert!(doc.html.contains("var first"));
    assert!(!doc.html.contains("var second"));
    assert!(!doc.html.contains("var last"));
}

#[test]
fn markup_alias_precedence() {
    let map = files(&[
        ("index.htm", "<html><body>htm</body></html>"),
        ("index.html", "<html><body>html</body></html>"),
    ]);
    let doc = compose(&map, false);
    assert!(doc.html.contains(">html<"));
}

// Markup that already names a stylesheet alias gets no second style block.
#[test]
fn injection_avoided_when_stylesheet_referenced() {
    let markup = r#"<html><head><link rel="stylesheet" href="style.css"></head><body></body></html>"#;
    let map = files(&[("index.html", markup), ("style.css", "body{color:red}")]);
    let doc = compose(&map, false);
    assert_eq!(doc.html, markup);
}

#[test]
fn injection_avoided_when_any_script_alias_referenced() {
    let markup = r#"<html><body><script src="app.js"></script></body></html>"#;
    let map = files(&[("index.html", markup), ("script.js", "var x = 1;")]);
    let doc = compose(&map, false);
    assert_eq!(doc.html, markup);
}

#[test]
fn style_lands_before_head_close_and_script_before_body_close() {
    let map = files(&[
        ("index.html", "<html><head><title>t</title></head><body><p>x</p></body></html>"),
        ("style.css", "p{margin:0}"),
        ("script.js", "console.log(1);"),
    ]);
    let doc = compose(&map, false);
    let style_at = doc.html.find("<style>").unwrap();
    let head_close = doc.html.find("</head>").unwrap();
    assert!(style_at < head_close);
    let script_at = doc.html.find("<script>").unwrap();
    let body_close = doc.html.find("</body>").unwrap();
    assert!(script_at < body_close && script_at > head_close);
}

#[test]
fn style_falls_back_to_before_body_without_head() {
    let map = files(&[
        ("index.html", "<html><body><p>x</p></body></html>"),
        ("style.css", "p{margin:0}"),
    ]);
    let doc = compose(&map, false);
    assert!(doc.html.find("<style>").unwrap() < doc.html.find("<body>").unwrap());
}

// Stylesheet alone synthesizes boilerplate with generic root containers,
// not the framework placeholder.
#[test]
fn stylesheet_only_synthesizes_boilerplate() {
    let map = files(&[("style.css", "body{color:red}")]);
    let doc = compose(&map, false);
    assert_eq!(doc.kind, DocumentKind::Boilerplate);
    assert!(doc.html.contains("body{color:red}"));
    assert!(doc.html.contains("id=\"root\""));
    assert!(doc.html.contains("id=\"app\""));
}

#[test]
fn script_only_synthesizes_boilerplate() {
    let map = files(&[("main.js", "document.title = 'x';")]);
    let doc = compose(&map, false);
    assert_eq!(doc.kind, DocumentKind::Boilerplate);
    assert!(doc.html.contains("document.title = 'x';"));
}

// Framework sources without markup degrade to a placeholder; no execution.
#[test]
fn framework_sources_produce_placeholder() {
    let map = files(&[("App.tsx", "export default function App() {}")]);
    let doc = compose(&map, false);
    assert_eq!(doc.kind, DocumentKind::FrameworkPlaceholder);
    assert!(doc.html.contains("App.tsx"));
    assert!(!doc.html.contains("export default"));
}

#[test]
fn empty_filemap_produces_empty_placeholder() {
    let doc = compose(&FileMap::new(), false);
    assert_eq!(doc.kind, DocumentKind::Empty);
    assert!(doc.html.contains("Nothing to preview"));
}

#[test]
fn unknown_files_alone_produce_empty_placeholder() {
    let map = files(&[("notes.txt", "remember the milk")]);
    let doc = compose(&map, false);
    assert_eq!(doc.kind, DocumentKind::Empty);
}

// Bridge installation is a separate stage: the payload opens the head and
// precedes any user script.
#[test]
fn bridges_land_at_start_of_head() {
    let map = files(&[
        ("index.html", "<html><head><title>t</title></head><body></body></html>"),
        ("script.js", "console.log(1);"),
    ]);
    let doc = compose(&map, false);
    let html = install_bridges(&doc, false);
    let head_at = html.find("<head>").unwrap();
    let bridge_at = html.find("logKind").unwrap();
    let title_at = html.find("<title>").unwrap();
    assert!(head_at < bridge_at && bridge_at < title_at);
}

#[test]
fn select_bridge_only_in_select_mode() {
    let doc = ComposedDocument {
        html: "<html><head></head><body></body></html>".to_string(),
        kind: DocumentKind::Markup,
    };
    let plain = install_bridges(&doc, false);
    let select = install_bridges(&doc, true);
    assert!(plain.contains("logKind"));
    assert!(!plain.contains("element-select"));
    assert!(select.contains("element-select"));
}

#[test]
fn bridges_prepended_when_no_head_exists() {
    let doc = ComposedDocument {
        html: "<p>bare fragment</p>".to_string(),
        kind: DocumentKind::Markup,
    };
    let html = install_bridges(&doc, false);
    assert!(html.starts_with("<script>"));
    assert!(html.ends_with("<p>bare fragment</p>"));
}

#[test]
fn placeholders_receive_no_bridges() {
    let doc = compose(&FileMap::new(), false);
    let html = install_bridges(&doc, true);
    assert_eq!(html, doc.html);
}

#[test]
fn console_bridge_covers_all_log_kinds() {
    for kind in ["log", "error", "warn", "info"] {
        assert!(CONSOLE_BRIDGE_JS.contains(kind), "missing kind {}", kind);
    }
    assert!(CONSOLE_BRIDGE_JS.contains("unhandledrejection"));
}
