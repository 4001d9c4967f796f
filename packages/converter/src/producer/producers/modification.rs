//! Contract modification producer.

use roxmltree::Node;
use serde_json::json;
use ted_ocds_release::Fragment;

use crate::error::Result;
use crate::producer::{entities, FragmentProducer, ProducerContext};
use crate::types::NoticeType;
use crate::xml::eforms::{eforms_extension, notice_id};
use crate::xml::{find_all_by_path, find_children, get_text, text_at};

/// Scheme of the modification justification codes.
const MODIFICATION_SCHEME: &str = "eu-modification-justification";

/// Amendments on each contract named as a changed section of a
/// modification notice.
pub struct ModificationReason;

impl FragmentProducer for ModificationReason {
    fn name(&self) -> &'static str {
        "ModificationReason"
    }

    fn business_term(&self) -> &'static str {
        "BT-200 / BT-202"
    }

    fn applies_to(&self, notice_type: NoticeType) -> bool {
        notice_type == NoticeType::ContractAwardNoticeModification
    }

    fn produce(&self, root: Node<'_, '_>, context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let Some(extension) = eforms_extension(root) else {
            return Ok(None);
        };
        let notice = notice_id(root);

        let mut contracts = Vec::new();
        for modification in find_children(extension, "ContractModification") {
            let sections: Vec<String> =
                find_all_by_path(modification, "Change/ChangedSection/ChangedSectionIdentifier")
                    .into_iter()
                    .map(get_text)
                    .filter(|s| !s.is_empty())
                    .collect();
            if sections.is_empty() {
                continue;
            }

            let sequence = context.ids.next_id("amendments");
            let amendment_id = match &notice {
                Some(notice) => format!("{notice}-{sequence}"),
                None => sequence,
            };
            let amendment = json!({
                "id": amendment_id,
                "description": text_at(modification, "Change/ChangeDescription"),
                "rationale": text_at(modification, "ChangeReason/ReasonDescription"),
                "rationaleClassifications": text_at(modification, "ChangeReason/ReasonCode")
                    .map(|code| json!([{"scheme": MODIFICATION_SCHEME, "id": code}])),
            });

            for section in sections {
                contracts.push(json!({"id": section, "amendments": [amendment.clone()]}));
            }
        }

        let contracts = entities(contracts);
        Ok((!contracts.is_empty()).then_some(Fragment::Contracts(contracts)))
    }
}
