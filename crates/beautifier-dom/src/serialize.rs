//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)

use crate::{DomTree, NodeId, NodeType};

/// "If current node is an area, base, basefont, bgsound, br, col, embed,
/// frame, hr, img, input, keygen, link, meta, param, source, track or wbr
/// element, then continue on to the next child node at this point."
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element ... then append the value of current
/// node's data literally."
const RAW_TEXT_PARENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

pub(crate) fn serialize_children(tree: &DomTree, id: NodeId, out: &mut String) {
    for &child in tree.children(id) {
        serialize_node(tree, child, out);
    }
}

pub(crate) fn serialize_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => serialize_children(tree, id, out),
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.tag_name);
            for (name, value) in &data.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&data.tag_name.as_str()) {
                return;
            }
            serialize_children(tree, id, out);
            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
        NodeType::Text(text) => {
            let raw = node
                .parent
                .and_then(|p| tree.as_element(p))
                .is_some_and(|p| RAW_TEXT_PARENTS.contains(&p.tag_name.as_str()));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeType::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the "&" character by the string "&amp;".
/// Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;". If the algorithm was invoked in the attribute mode,
/// replace any occurrences of the """ character by the string "&quot;".
/// If the algorithm was not invoked in the attribute mode, replace any
/// occurrences of the "<" character by the string "&lt;", and any
/// occurrences of the ">" character by the string "&gt;"."
#[must_use]
fn escape_text(text: &str) -> String {
    escape(text, false)
}

/// Attribute-mode variant of [`escape_text`].
#[must_use]
fn escape_attribute(value: &str) -> String {
    escape(value, true)
}

fn escape(input: &str, attribute_mode: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_mode() {
        assert_eq!(escape_text("a < b && \"c\" > d"), "a &lt; b &amp;&amp; \"c\" &gt; d");
    }

    #[test]
    fn test_escape_attribute_mode() {
        assert_eq!(escape_attribute("say \"<hi>\" & go"), "say &quot;<hi>&quot; &amp; go");
    }
}
