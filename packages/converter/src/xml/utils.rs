//! XML utility functions for navigating and extracting data from DOM trees.
//!
//! All lookups compare local names, so `cbc:ID`, `efbc:ID`, and an
//! unprefixed `ID` all match the tag `"ID"`.

use roxmltree::Node;
use unicode_normalization::UnicodeNormalization;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ted_ocds_converter::xml::get_tag_name;
///
/// let xml = r#"<cn:ContractNotice xmlns:cn="urn:cn"><x/></cn:ContractNotice>"#;
/// let doc = Document::parse(xml).unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "ContractNotice");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ted_ocds_converter::xml::find_child;
///
/// let xml = r#"<root><child1/><child2/></root>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child(root, "child1").is_some());
/// assert!(find_child(root, "missing").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find all child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find the first descendant matching a slash-separated path of tag names.
///
/// Each step takes the first matching child.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ted_ocds_converter::xml::find_by_path;
///
/// let xml = r#"<Party><PartyName><Name>City</Name></PartyName></Party>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let name = find_by_path(doc.root_element(), "PartyName/Name");
/// assert_eq!(name.and_then(|n| n.text()), Some("City"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    let mut current = node;
    for part in path.split('/') {
        current = find_child(current, part)?;
    }
    Some(current)
}

/// Find every descendant matching a slash-separated path of tag names.
///
/// Unlike [`find_by_path`], each step fans out over all matching children.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use ted_ocds_converter::xml::find_all_by_path;
///
/// let xml = r#"<r><Lot><ID>1</ID></Lot><Lot><ID>2</ID><ID>3</ID></Lot></r>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// assert_eq!(find_all_by_path(doc.root_element(), "Lot/ID").len(), 3);
/// ```
pub fn find_all_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    let mut current = vec![node];
    for part in path.split('/') {
        current = current
            .into_iter()
            .flat_map(|n| {
                n.children()
                    .filter(move |child| child.is_element() && get_tag_name(*child) == part)
            })
            .collect();
        if current.is_empty() {
            break;
        }
    }
    current
}

/// Get the text content of a node, trimmed and NFC-normalized.
///
/// Returns an empty string if the node has no text.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().nfc().collect())
        .unwrap_or_default()
}

/// Get the non-empty text at a path below `node`.
pub fn text_at(node: Node<'_, '_>, path: &str) -> Option<String> {
    find_by_path(node, path)
        .map(get_text)
        .filter(|s| !s.is_empty())
}

/// Check if a node has a specific tag name.
pub fn has_tag(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element() && get_tag_name(node) == tag
}

/// Check whether an attribute has the given value.
pub fn attribute_eq(node: Node<'_, '_>, name: &str, value: &str) -> bool {
    node.attribute(name) == Some(value)
}
