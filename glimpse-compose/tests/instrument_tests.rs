use glimpse_compose::{annotate, compose, FileMap};
use pretty_assertions::assert_eq;

const TEN_LINE_DOC: &str = "<html>
<head>
<title>Ten</title>
</head>
<body>
<main class=\"wrap\">
<h1>Title</h1>
<p>Some <em>text</em> here</p>
</main>
</body>";

/// Strips tags, leaving only the visible text of a document.
fn visible_text(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[test]
fn instrumentation_preserves_line_count_and_visible_text() {
    let out = annotate(TEN_LINE_DOC, "index.html");
    assert_eq!(out.split('\n').count(), TEN_LINE_DOC.split('\n').count());
    assert_eq!(visible_text(&out), visible_text(TEN_LINE_DOC));
}

#[test]
fn instrumentation_is_purely_additive() {
    let out = annotate(TEN_LINE_DOC, "index.html");
    // Deleting the trace attributes restores the original byte for byte.
    let re = regex::Regex::new(
        r#" data-line="\d+" data-file="[^"]*" data-tag="[a-z0-9-]+""#,
    )
    .unwrap();
    assert_eq!(re.replace_all(&out, ""), TEN_LINE_DOC);
}

#[test]
fn annotated_tags_carry_owning_path_and_line() {
    let out = annotate(TEN_LINE_DOC, "pages/index.html");
    assert!(out.contains("<main class=\"wrap\" data-line=\"6\" data-file=\"pages/index.html\" data-tag=\"main\">"));
    assert!(out.contains("<h1 data-line=\"7\""));
    assert!(out.contains("<em data-line=\"8\""));
}

#[test]
fn head_section_tags_are_skipped() {
    let out = annotate(TEN_LINE_DOC, "index.html");
    assert!(out.contains("<head>\n"));
    assert!(out.contains("<title>Ten</title>"));
    assert!(!out.contains("<title data-line"));
    assert!(!out.contains("<html data-line"));
}

#[test]
fn compose_instruments_only_when_flag_set() {
    let map: FileMap = [("index.html", "<html><body><div>x</div></body></html>")]
        .into_iter()
        .collect();
    let plain = compose(&map, false);
    let instrumented = compose(&map, true);
    assert!(!plain.html.contains("data-line"));
    assert!(instrumented.html.contains("data-line=\"1\""));
    assert!(instrumented.html.contains("data-file=\"index.html\""));
    assert!(instrumented.html.contains("data-tag=\"div\""));
}
