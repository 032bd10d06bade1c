//! Tests for DOM tree mutation, lookup, and fragment serialization.

use beautifier_dom::{DomTree, NodeId};

/// Helper: a page whose body holds `<pre>text</pre>`.
fn page_with_pre(text: &str) -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::html_document();
    let body = tree.body().expect("body");
    let pre = tree.create_element("pre");
    let content = tree.create_text(text);
    tree.append_child(body, pre);
    tree.append_child(pre, content);
    (tree, body, pre)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    tree.append_child(NodeId::ROOT, parent);

    let a = tree.create_element("a");
    let b = tree.create_element("b");
    let c = tree.create_element("c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_remove_child_of_other_parent_is_ignored() {
    let mut tree = DomTree::new();
    let left = tree.create_element("div");
    let right = tree.create_element("div");
    tree.append_child(NodeId::ROOT, left);
    tree.append_child(NodeId::ROOT, right);
    let child = tree.create_element("span");
    tree.append_child(left, child);

    tree.remove_child(right, child);

    assert_eq!(tree.children(left), &[child]);
}

// ========== take_children / re-attach ==========

#[test]
fn test_take_children_detaches_and_preserves_order() {
    let (mut tree, body, pre) = page_with_pre("{}");
    let hr = tree.create_element("hr");
    tree.append_child(body, hr);

    let taken = tree.take_children(body);

    assert_eq!(taken, vec![pre, hr]);
    assert!(tree.children(body).is_empty());
    assert_eq!(tree.parent(pre), None);
    assert_eq!(tree.next_sibling(pre), None);
    assert!(!tree.is_connected(pre));
}

#[test]
fn test_reattached_children_serialize_identically() {
    let (mut tree, body, _) = page_with_pre("[1, 2]");
    let before = tree.inner_html(body);

    for child in tree.take_children(body) {
        tree.append_child(body, child);
    }

    assert_eq!(tree.inner_html(body), before);
}

// ========== lookup ==========

#[test]
fn test_get_element_by_id() {
    let (mut tree, body, pre) = page_with_pre("{}");
    tree.set_attribute(pre, "id", "payload");

    assert_eq!(tree.get_element_by_id("payload"), Some(pre));
    assert_eq!(tree.get_element_by_id("missing"), None);
    assert_eq!(tree.get_element_by_id(""), None);

    tree.remove_child(body, pre);
    assert_eq!(tree.get_element_by_id("payload"), None);
}

#[test]
fn test_first_element_by_tag_finds_nested() {
    let mut tree = DomTree::html_document();
    let body = tree.body().expect("body");
    let div = tree.create_element("div");
    let first = tree.create_element("pre");
    let second = tree.create_element("PRE");
    tree.append_child(body, div);
    tree.append_child(div, first);
    tree.append_child(body, second);

    assert_eq!(tree.first_element_by_tag(body, "pre"), Some(first));
}

// ========== text content ==========

#[test]
fn test_text_content_concatenates_descendants_only() {
    let mut tree = DomTree::html_document();
    let body = tree.body().expect("body");
    let p = tree.create_element("p");
    let hello = tree.create_text("hello ");
    let b = tree.create_element("b");
    let world = tree.create_text("world");
    let note = tree.create_comment("ignored");
    tree.append_child(body, p);
    tree.append_child(p, hello);
    tree.append_child(p, b);
    tree.append_child(b, world);
    tree.append_child(body, note);

    assert_eq!(tree.text_content(body), "hello world");
}

#[test]
fn test_set_text_content_replaces_children() {
    let (mut tree, body, _) = page_with_pre("old");
    tree.set_text_content(body, "new");
    assert_eq!(tree.children(body).len(), 1);
    assert_eq!(tree.text_content(body), "new");

    tree.set_text_content(body, "");
    assert!(tree.children(body).is_empty());
}

// ========== serialization ==========

#[test]
fn test_inner_html_escapes_text_and_attributes() {
    let mut tree = DomTree::html_document();
    let body = tree.body().expect("body");
    let span = tree.create_element("span");
    tree.set_attribute(span, "title", "a \"quoted\" <value>");
    let text = tree.create_text("<b>&</b>");
    tree.append_child(body, span);
    tree.append_child(span, text);

    assert_eq!(
        tree.inner_html(body),
        "<span title=\"a &quot;quoted&quot; <value>\">&lt;b&gt;&amp;&lt;/b&gt;</span>"
    );
}

#[test]
fn test_void_and_raw_text_elements() {
    let mut tree = DomTree::html_document();
    let head = tree.head().expect("head");
    let style = tree.create_element("style");
    let css = tree.create_text(".a > .b { color: red; }");
    let meta = tree.create_element("meta");
    tree.append_child(head, style);
    tree.append_child(style, css);
    tree.append_child(head, meta);

    assert_eq!(
        tree.inner_html(head),
        "<style>.a > .b { color: red; }</style><meta>"
    );
}

#[test]
fn test_outer_html_of_document() {
    let (tree, _, _) = page_with_pre("{\"a\":1}");
    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        "<html><head></head><body><pre>{\"a\":1}</pre></body></html>"
    );
}
