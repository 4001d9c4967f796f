//! Unpublished-field producer.

use roxmltree::Node;
use serde_json::json;
use ted_ocds_release::Fragment;

use super::notice::xs_timestamp;
use crate::error::Result;
use crate::producer::{entities, FragmentProducer, ProducerContext};
use crate::xml::eforms::owner_id;
use crate::xml::{has_tag, text_at};

/// Scheme of the non-publication justification codes.
const JUSTIFICATION_SCHEME: &str = "eu-non-publication-justification";

/// Withheld information from `efac:FieldsPrivacy` anywhere in the notice.
///
/// Entries are identified as `<field code>-<owner id>`, where the owner is
/// the nearest enclosing element with an identifier (a lot result, a lot
/// tender, ...).
pub struct UnpublishedFields;

impl FragmentProducer for UnpublishedFields {
    fn name(&self) -> &'static str {
        "UnpublishedFields"
    }

    fn business_term(&self) -> &'static str {
        "BT-195 / BT-197"
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let withheld = entities(
            root.descendants()
                .filter(|n| has_tag(*n, "FieldsPrivacy"))
                .filter_map(|privacy| {
                    let field = text_at(privacy, "FieldIdentifierCode")?;
                    let id = match privacy.parent().and_then(owner_id) {
                        Some(owner) => format!("{field}-{owner}"),
                        None => field.clone(),
                    };
                    let justification = text_at(privacy, "ReasonCode").map(|code| {
                        json!([{"scheme": JUSTIFICATION_SCHEME, "id": code}])
                    });

                    Some(json!({
                        "id": id,
                        "field": field,
                        "rationale": text_at(privacy, "ReasonDescription"),
                        "rationaleClassifications": justification,
                        "availabilityDate": text_at(privacy, "PublicationDate")
                            .and_then(|d| xs_timestamp(&d, None)),
                    }))
                }),
        );

        Ok((!withheld.is_empty()).then_some(Fragment::WithheldInformation(withheld)))
    }
}
