//! Sniffing page content for a JSON payload.
//!
//! Browsers show a `application/json` response as a document whose body is a
//! single `<pre>` holding the raw text. Some hosts instead put the text
//! straight into the body. Both shapes are accepted; anything else is left
//! alone.

use thiserror::Error;

use crate::dom::Dom;

/// Why an injection left the page untouched.
///
/// None of these are failures: most pages a content script runs on are not
/// JSON at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The document has no body element.
    #[error("document has no body")]
    NoBody,
    /// The candidate text is empty after trimming.
    #[error("no text content")]
    EmptySource,
    /// The text is not wrapped in `{...}` or `[...]`.
    #[error("text is not bracket delimited")]
    NotBracketed,
    /// Strict parsing failed.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    /// The document is valid JSON but not an object or array.
    #[error("top-level JSON value is not an object or array")]
    ScalarDocument,
    /// The page already carries a beautified view.
    #[error("beautifier already applied")]
    AlreadyRendered,
}

/// Whitespace as trimmed by `String.prototype.trim`: Unicode white space plus
/// the byte order mark.
fn is_trim_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Trim leading and trailing white space and byte order marks.
#[must_use]
pub fn trim_source(text: &str) -> &str {
    text.trim_matches(is_trim_char)
}

/// Extract the JSON candidate from the page.
///
/// The first `<pre>` in the body wins when it has any text at all; otherwise
/// the whole body text is used. The result is trimmed.
///
/// # Errors
///
/// [`SkipReason::NoBody`] if the document has no body.
pub fn source_text<D: Dom>(dom: &D) -> Result<String, SkipReason> {
    let body = dom.body().ok_or(SkipReason::NoBody)?;
    let pre_text = dom
        .first_element_by_tag(&body, "pre")
        .map(|pre| dom.text_content(&pre))
        .filter(|text| !text.is_empty());
    let text = pre_text.unwrap_or_else(|| dom.text_content(&body));
    Ok(trim_source(&text).to_string())
}

/// Cheap shape filter run before attempting a parse.
///
/// # Errors
///
/// [`SkipReason::EmptySource`] for empty text, [`SkipReason::NotBracketed`]
/// when the text does not start and end with a matching bracket pair.
pub fn check_shape(text: &str) -> Result<(), SkipReason> {
    if text.is_empty() {
        return Err(SkipReason::EmptySource);
    }
    let object = text.starts_with('{') && text.ends_with('}');
    let array = text.starts_with('[') && text.ends_with(']');
    if object || array {
        Ok(())
    } else {
        Err(SkipReason::NotBracketed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beautifier_dom::DomTree;

    fn page(build: impl FnOnce(&mut DomTree, beautifier_dom::NodeId)) -> DomTree {
        let mut tree = DomTree::html_document();
        let body = tree.body().unwrap();
        build(&mut tree, body);
        tree
    }

    #[test]
    fn test_prefers_first_pre() {
        let tree = page(|t, body| {
            let intro = t.create_text("ignored ");
            let pre = t.create_element("pre");
            let text = t.create_text("  {\"a\": 1}\n");
            let second = t.create_element("pre");
            let other = t.create_text("[2]");
            t.append_child(body, intro);
            t.append_child(body, pre);
            t.append_child(pre, text);
            t.append_child(body, second);
            t.append_child(second, other);
        });
        assert_eq!(source_text(&tree).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_falls_back_to_body_text() {
        let tree = page(|t, body| {
            let pre = t.create_element("pre");
            let text = t.create_text("\u{feff}[1, 2]  ");
            t.append_child(body, pre);
            t.append_child(body, text);
        });
        assert_eq!(source_text(&tree).unwrap(), "[1, 2]");
    }

    #[test]
    fn test_whitespace_only_pre_is_used_and_empty() {
        let tree = page(|t, body| {
            let pre = t.create_element("pre");
            let blank = t.create_text("   ");
            let text = t.create_text("{}");
            t.append_child(body, pre);
            t.append_child(pre, blank);
            t.append_child(body, text);
        });
        assert_eq!(source_text(&tree).unwrap(), "");
    }

    #[test]
    fn test_missing_body() {
        assert_eq!(source_text(&DomTree::new()), Err(SkipReason::NoBody));
    }

    #[test]
    fn test_shape_filter() {
        assert_eq!(check_shape(""), Err(SkipReason::EmptySource));
        assert_eq!(check_shape("hello"), Err(SkipReason::NotBracketed));
        assert_eq!(check_shape("{]"), Err(SkipReason::NotBracketed));
        assert_eq!(check_shape("[}"), Err(SkipReason::NotBracketed));
        assert_eq!(check_shape("\"{}\""), Err(SkipReason::NotBracketed));
        assert!(check_shape("{invalid}").is_ok());
        assert!(check_shape("[]").is_ok());
    }
}
