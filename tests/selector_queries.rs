//! End-to-end selector queries against built documents.
//!
//! These exercise the whole pipeline — parse, compile, traverse, collect —
//! through the public API only.

#![allow(clippy::unwrap_used)]

use selectoxide::select::{self, escape_css_identifier, unescape_css_identifier};
use selectoxide::tree::NodeKind;
use selectoxide::{Document, NodeId, SelectorError};

/// A page-like fixture:
///
/// <html>
///   <body>
///     <div class="header"><p id="lead">Intro</p><p>More</p></div>
///     <div class="content">
///       <ul><li>1</li><li>2</li><li>3</li><li>4</li><li>5</li></ul>
///       <a href="https://example.com/a.png" class="ext">Out</a>
///       <a href="/local">Here</a>
///     </div>
///   </body>
/// </html>
fn page() -> Document {
    let mut doc = Document::new();
    let html = doc.append_element(doc.root(), "html", &[]);
    let body = doc.append_element(html, "body", &[]);

    let header = doc.append_element(body, "div", &[("class", "header")]);
    let lead = doc.append_element(header, "p", &[("id", "lead")]);
    doc.append_text(lead, "Intro");
    let more = doc.append_element(header, "p", &[]);
    doc.append_text(more, "More");

    let content = doc.append_element(body, "div", &[("class", "content")]);
    let ul = doc.append_element(content, "ul", &[]);
    for n in 1..=5 {
        let li = doc.append_element(ul, "li", &[]);
        doc.append_text(li, &n.to_string());
    }
    let ext = doc.append_element(
        content,
        "a",
        &[("href", "https://example.com/a.png"), ("class", "ext")],
    );
    doc.append_text(ext, "Out");
    let local = doc.append_element(content, "a", &[("href", "/local")]);
    doc.append_text(local, "Here");
    doc
}

fn texts(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|&n| doc.text(n)).collect()
}

#[test]
fn test_class_child_and_first_child() {
    let doc = page();
    let hits = select::select(&doc, "div.header > p:first-child").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(doc.attr(hits[0], "id"), Some("lead"));
}

#[test]
fn test_nth_child_odd_positions() {
    let doc = page();
    let hits = select::select(&doc, "li:nth-child(2n+1)").unwrap();
    assert_eq!(texts(&doc, &hits), vec!["1", "3", "5"]);
    // and the keyword spelling agrees
    let odd = select::select(&doc, "li:nth-child(odd)").unwrap();
    assert_eq!(hits, odd);
}

#[test]
fn test_nth_last_child() {
    let doc = page();
    let hits = select::select(&doc, "li:nth-last-child(2)").unwrap();
    assert_eq!(texts(&doc, &hits), vec!["4"]);
}

#[test]
fn test_not_excludes_class() {
    let doc = page();
    let hits = select::select(&doc, "a:not(.ext)").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(doc.attr(hits[0], "href"), Some("/local"));
}

#[test]
fn test_attribute_operators_end_to_end() {
    let doc = page();
    assert_eq!(select::select(&doc, "[href^=https]").unwrap().len(), 1);
    assert_eq!(select::select(&doc, "[href$=.png]").unwrap().len(), 1);
    assert_eq!(select::select(&doc, "[href*=example]").unwrap().len(), 1);
    assert_eq!(select::select(&doc, "a[href!=/local]").unwrap().len(), 1);
    assert_eq!(
        select::select(&doc, "[href~=^https?://]").unwrap().len(),
        1
    );
    assert_eq!(select::select(&doc, "a[href=\"/local\"]").unwrap().len(), 1);
}

#[test]
fn test_has_direct_child_vs_descendant() {
    // <div><b>x</b></div> and <div><span><b>y</b></span></div>
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "root", &[]);
    let first = doc.append_element(root, "div", &[]);
    let b1 = doc.append_element(first, "b", &[]);
    doc.append_text(b1, "x");
    let second = doc.append_element(root, "div", &[]);
    let span = doc.append_element(second, "span", &[]);
    let b2 = doc.append_element(span, "b", &[]);
    doc.append_text(b2, "y");

    let descendant = select::select(&doc, "div:has(b)").unwrap();
    assert_eq!(descendant, vec![first, second]);

    let direct = select::select(&doc, "div:has(> b)").unwrap();
    assert_eq!(direct, vec![first]);
}

#[test]
fn test_is_list() {
    let doc = page();
    let hits = select::select(&doc, ":is(p, li):contains(3)").unwrap();
    assert_eq!(texts(&doc, &hits), vec!["3"]);
}

#[test]
fn test_selector_group_returns_document_order() {
    let doc = page();
    // written in reverse of document order; results are still preorder
    let hits = select::select(&doc, "a, li, p").unwrap();
    let names: Vec<_> = hits
        .iter()
        .map(|&n| doc.tag_name(n).unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["p", "p", "li", "li", "li", "li", "li", "a", "a"]);
}

#[test]
fn test_sibling_combinators_end_to_end() {
    let doc = page();
    let adjacent = select::select(&doc, "div.header + div").unwrap();
    assert_eq!(adjacent.len(), 1);
    assert_eq!(doc.attr(adjacent[0], "class"), Some("content"));

    let general = select::select(&doc, "ul ~ a").unwrap();
    assert_eq!(general.len(), 2);
}

#[test]
fn test_leading_combinator_anchors_at_document() {
    let doc = page();
    let hits = select::select(&doc, "> html").unwrap();
    assert_eq!(hits.len(), 1);
    // body is not a direct child of the document
    assert!(select::select(&doc, "> body").unwrap().is_empty());
}

#[test]
fn test_root_pseudo() {
    let doc = page();
    let hits = select::select(&doc, ":root").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(doc.tag_name(hits[0]), Some("html"));
}

#[test]
fn test_index_pseudos() {
    let doc = page();
    assert_eq!(texts(&doc, &select::select(&doc, "li:eq(0)").unwrap()), vec!["1"]);
    assert_eq!(
        texts(&doc, &select::select(&doc, "li:lt(2)").unwrap()),
        vec!["1", "2"]
    );
    assert_eq!(
        texts(&doc, &select::select(&doc, "li:gt(2)").unwrap()),
        vec!["4", "5"]
    );
}

#[test]
fn test_contains_variants() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "root", &[]);
    let p = doc.append_element(root, "p", &[]);
    doc.append_text(p, "Hello ");
    let b = doc.append_element(p, "b", &[]);
    doc.append_text(b, "there");

    // normalized + case-insensitive, across descendants
    assert_eq!(select::select(&doc, "p:contains(hello there)").unwrap(), vec![p]);
    // own text excludes the <b> contents
    assert!(select::select(&doc, "p:containsOwn(there)").unwrap().is_empty());
    assert_eq!(select::select(&doc, "p:containsOwn(hello)").unwrap(), vec![p]);
    // whole text is raw and case-sensitive
    assert_eq!(
        select::select(&doc, "p:containsWholeText(Hello t)").unwrap(),
        vec![p]
    );
    assert!(select::select(&doc, "p:containsWholeText(hello t)")
        .unwrap()
        .is_empty());
}

#[test]
fn test_matches_regex_on_text() {
    let doc = page();
    let hits = select::select(&doc, "li:matches(^[0-9]$)").unwrap();
    assert_eq!(hits.len(), 5);
    let hits = select::select(&doc, "a:matches((?i)OUT)").unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn test_node_type_selection() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "feed", &[]);
    let comment = doc.create_node(NodeKind::Comment {
        content: " generator: hand ".to_string(),
    });
    doc.append_child(root, comment);
    let entry = doc.append_element(root, "entry", &[]);
    let cdata = doc.create_node(NodeKind::CData {
        content: "<b>raw</b>".to_string(),
    });
    doc.append_child(entry, cdata);
    let script = doc.append_element(root, "script", &[]);
    let data = doc.create_node(NodeKind::Data {
        content: "let x = 1;".to_string(),
    });
    doc.append_child(script, data);

    assert_eq!(select::select(&doc, "::comment").unwrap(), vec![comment]);
    assert_eq!(select::select(&doc, "::cdata").unwrap(), vec![cdata]);
    assert_eq!(select::select(&doc, "::data").unwrap(), vec![data]);
    // ::text includes CDATA sections
    assert_eq!(select::select(&doc, "::text").unwrap(), vec![cdata]);
    // scoped by an element ancestor
    assert_eq!(
        select::select(&doc, "entry ::leafnode").unwrap(),
        vec![cdata]
    );
    // with a value predicate
    assert_eq!(
        select::select(&doc, "::comment:contains(generator)").unwrap(),
        vec![comment]
    );
}

#[test]
fn test_contains_data() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "page", &[]);
    let script = doc.append_element(root, "script", &[]);
    let data = doc.create_node(NodeKind::Data {
        content: "alert('Hi')".to_string(),
    });
    doc.append_child(script, data);

    assert_eq!(
        select::select(&doc, "script:containsData(alert)").unwrap(),
        vec![script]
    );
}

#[test]
fn test_namespace_selectors() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "rdf", &[]);
    let title = doc.append_element(root, "dc:title", &[]);
    doc.append_text(title, "Name");
    let plain = doc.append_element(root, "title", &[]);
    doc.append_text(plain, "Plain");

    assert_eq!(select::select(&doc, "dc|title").unwrap(), vec![title]);
    assert_eq!(select::select(&doc, "title").unwrap(), vec![plain]);
    assert_eq!(
        select::select(&doc, "*|title").unwrap(),
        vec![title, plain]
    );
    assert_eq!(select::select(&doc, "dc|*").unwrap(), vec![title]);
}

#[test]
fn test_multi_root_overlap_dedups_by_identity() {
    let doc = page();
    let divs = select::select(&doc, "div").unwrap();
    let body = select::select_first(&doc, "body").unwrap().unwrap();
    // body contains both divs, so each <a> is reachable twice
    let mut roots = vec![body];
    roots.extend(&divs);
    let hits = select::select_in(&doc, "a", &roots).unwrap();
    assert_eq!(hits.len(), 2);
}

#[test]
fn test_structural_of_type() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "r", &[]);
    let h = doc.append_element(root, "h1", &[]);
    doc.append_text(h, "head");
    let p1 = doc.append_element(root, "p", &[]);
    doc.append_text(p1, "one");
    let p2 = doc.append_element(root, "p", &[]);
    doc.append_text(p2, "two");

    assert_eq!(select::select(&doc, "p:first-of-type").unwrap(), vec![p1]);
    assert_eq!(select::select(&doc, "p:last-of-type").unwrap(), vec![p2]);
    assert_eq!(select::select(&doc, "h1:only-of-type").unwrap(), vec![h]);
    assert!(select::select(&doc, "p:only-of-type").unwrap().is_empty());
}

#[test]
fn test_empty_and_blank() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "r", &[]);
    let empty = doc.append_element(root, "hr", &[]);
    let ws_only = doc.append_element(root, "pre", &[]);
    doc.append_text(ws_only, "  \n  ");
    let full = doc.append_element(root, "p", &[]);
    doc.append_text(full, "text");

    let hits = select::select(&doc, "r > :empty").unwrap();
    assert_eq!(hits, vec![empty, ws_only]);
    assert!(!hits.contains(&full));

    // :blank on a leaf's own value
    let blanks = select::select(&doc, "::text:blank").unwrap();
    assert_eq!(blanks.len(), 1);
    assert_eq!(doc.parent(blanks[0]), Some(ws_only));
}

#[test]
fn test_escaped_identifier_queries() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "r", &[]);
    let odd = doc.append_element(root, "div", &[("id", "i.d"), ("class", "1st")]);

    let id_query = format!("#{}", escape_css_identifier("i.d"));
    assert_eq!(select::select(&doc, &id_query).unwrap(), vec![odd]);

    let class_query = format!(".{}", escape_css_identifier("1st"));
    assert_eq!(select::select(&doc, &class_query).unwrap(), vec![odd]);
}

#[test]
fn test_id_lookup_ignores_case() {
    let mut doc = Document::new();
    let root = doc.append_element(doc.root(), "r", &[]);
    let main = doc.append_element(root, "div", &[("id", "Main")]);

    assert_eq!(select::select(&doc, "#main").unwrap(), vec![main]);
    assert_eq!(select::select(&doc, "#MAIN").unwrap(), vec![main]);
}

#[test]
fn test_nth_child_with_extreme_constant() {
    let doc = page();
    // a valid formula whose offset sits at the i32 boundary must not panic
    let hits = select::select(&doc, "li:nth-child(n-2147483648)").unwrap();
    assert_eq!(hits.len(), 5);
    assert!(select::select(&doc, "li:nth-child(-n-2147483648)")
        .unwrap()
        .is_empty());
}

#[test]
fn test_escape_round_trip() {
    for ident in ["plain", "1st", "-4x", "-", "i.d", "with space", "日本"] {
        assert_eq!(
            unescape_css_identifier(&escape_css_identifier(ident)).unwrap(),
            ident
        );
    }
}

#[test]
fn test_parse_errors_are_reported_not_partial() {
    let doc = page();
    for bad in ["[unclosed", "p:has(", "p::", "p:nth-child(2x)", "{", "p:matches([)"] {
        let err = select::select(&doc, bad);
        assert!(err.is_err(), "expected parse failure for {bad:?}");
    }
    assert!(matches!(
        select::select(&doc, "\t \n"),
        Err(SelectorError::EmptyQuery)
    ));
}

#[test]
fn test_evaluator_reuse_across_documents() {
    let eval = select::evaluator_of("div:has(p)").unwrap();
    let doc1 = page();
    assert_eq!(select::select_with(&doc1, &eval).len(), 1);

    let mut doc2 = Document::new();
    let root = doc2.append_element(doc2.root(), "root", &[]);
    let div = doc2.append_element(root, "div", &[]);
    doc2.append_element(div, "p", &[]);
    assert_eq!(select::select_with(&doc2, &eval), vec![div]);
    // and the first document again, unchanged results
    assert_eq!(select::select_with(&doc1, &eval).len(), 1);
}
