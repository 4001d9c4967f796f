//! Navigation helpers for eForms UBL notices.

use roxmltree::Node;
use serde_json::{Map, Number, Value};

use super::utils::{
    attribute_eq, find_all_by_path, find_by_path, find_child, find_children, get_text, text_at,
};

/// Path from the notice root to the eForms extension element.
const EXTENSION_PATH: &str = "UBLExtensions/UBLExtension/ExtensionContent/EformsExtension";

/// The `efext:EformsExtension` element of a notice.
pub fn eforms_extension<'a, 'input>(root: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    find_by_path(root, EXTENSION_PATH)
}

/// The `efac:NoticeResult` element of a result notice.
pub fn notice_result<'a, 'input>(root: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    eforms_extension(root).and_then(|ext| find_child(ext, "NoticeResult"))
}

/// Notice identifier (`cbc:ID[@schemeName="notice-id"]`).
pub fn notice_id(root: Node<'_, '_>) -> Option<String> {
    find_children(root, "ID")
        .find(|id| attribute_eq(*id, "schemeName", "notice-id"))
        .map(get_text)
        .filter(|s| !s.is_empty())
}

/// Procedure identifier (`cbc:ContractFolderID`).
pub fn procedure_id(root: Node<'_, '_>) -> Option<String> {
    text_at(root, "ContractFolderID")
}

/// `cac:ProcurementProjectLot` elements whose ID uses the given scheme
/// (`"Lot"` or `"LotsGroup"`).
pub fn project_lots<'a, 'input>(root: Node<'a, 'input>, scheme: &str) -> Vec<Node<'a, 'input>> {
    find_children(root, "ProcurementProjectLot")
        .filter(|lot| find_child(*lot, "ID").is_some_and(|id| attribute_eq(id, "schemeName", scheme)))
        .collect()
}

/// Identifier of an element from its `ID` child.
pub fn element_id(node: Node<'_, '_>) -> Option<String> {
    text_at(node, "ID")
}

/// Identifier of the nearest ancestor (or the node itself) with an `ID` child.
pub fn owner_id(node: Node<'_, '_>) -> Option<String> {
    node.ancestors()
        .filter(|n| n.is_element())
        .find_map(element_id)
}

/// Child elements of `parent` whose `ID` equals `id`.
pub fn with_id<'a, 'input>(
    parent: Node<'a, 'input>,
    tag: &'a str,
    id: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    find_children(parent, tag).filter(move |n| element_id(*n).as_deref() == Some(id))
}

/// Organization ids of the tenderers behind a lot tender, resolved through
/// `efac:TenderingParty` in the notice result.
pub fn lot_tender_organizations(result: Node<'_, '_>, lot_tender_id: &str) -> Vec<String> {
    let party_ids: Vec<String> = with_id(result, "LotTender", lot_tender_id)
        .filter_map(|tender| text_at(tender, "TenderingParty/ID"))
        .collect();

    let mut organizations = Vec::new();
    for party_id in &party_ids {
        for party in with_id(result, "TenderingParty", party_id) {
            for tenderer in find_all_by_path(party, "Tenderer/ID") {
                let id = get_text(tenderer);
                if !id.is_empty() && !organizations.contains(&id) {
                    organizations.push(id);
                }
            }
        }
    }
    organizations
}

/// OCDS value object (`amount`, `currency`) from an amount element.
///
/// The amount keeps its decimal rendering. Returns `None` when the text is
/// not a number.
pub fn amount(node: Node<'_, '_>) -> Option<Value> {
    let text = get_text(node);
    let number: Number = text.parse().ok()?;

    let mut value = Map::new();
    value.insert("amount".to_string(), Value::Number(number));
    if let Some(currency) = node.attribute("currencyID") {
        value.insert("currency".to_string(), Value::String(currency.to_string()));
    }
    Some(Value::Object(value))
}

/// OCDS value object at a path below `node`.
pub fn amount_at(node: Node<'_, '_>, path: &str) -> Option<Value> {
    find_by_path(node, path).and_then(amount)
}
