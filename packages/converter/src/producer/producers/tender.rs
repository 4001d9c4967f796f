//! Tender producers: lots, lot groups, documents, items, and submission
//! terms.

use roxmltree::Node;
use serde_json::{json, Value};
use ted_ocds_release::Fragment;

use crate::error::Result;
use crate::producer::{entities, entity, FragmentProducer, ProducerContext};
use crate::xml::eforms::{amount_at, element_id, project_lots};
use crate::xml::{attribute_eq, find_all_by_path, find_by_path, find_children, get_text, text_at};

/// Lots with title, description, estimated value, and main category.
pub struct Lots;

impl FragmentProducer for Lots {
    fn name(&self) -> &'static str {
        "Lots"
    }

    fn business_term(&self) -> &'static str {
        "BT-137 / BT-21"
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let lots = entities(project_lots(root, "Lot").into_iter().filter_map(|lot| {
            let id = element_id(lot)?;
            let project = find_by_path(lot, "ProcurementProject");
            Some(json!({
                "id": id,
                "title": project.and_then(|p| text_at(p, "Name")),
                "description": project.and_then(|p| text_at(p, "Description")),
                "mainProcurementCategory": project.and_then(|p| text_at(p, "ProcurementTypeCode")),
                "value": project.and_then(|p| amount_at(p, "RequestedTenderTotal/EstimatedOverallContractAmount")),
            }))
        }));

        Ok((!lots.is_empty()).then_some(Fragment::Lots(lots)))
    }
}

/// Lot groups and the lots they bundle.
pub struct LotGroups;

impl FragmentProducer for LotGroups {
    fn name(&self) -> &'static str {
        "LotGroups"
    }

    fn business_term(&self) -> &'static str {
        "BT-330 / BT-1375"
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let mut groups: Vec<Value> =
            find_all_by_path(root, "TenderingTerms/LotDistribution/LotsGroup")
                .into_iter()
                .filter_map(|group| {
                    let id = text_at(group, "LotsGroupID")?;
                    let related: Vec<String> =
                        find_all_by_path(group, "ProcurementProjectLotReference/ID")
                            .into_iter()
                            .map(get_text)
                            .collect();
                    Some(json!({"id": id, "relatedLots": related}))
                })
                .collect();

        // Group titles and maximum values live on the group's own
        // ProcurementProjectLot; the engine merges them by id.
        for group in project_lots(root, "LotsGroup") {
            let Some(id) = element_id(group) else {
                continue;
            };
            groups.push(json!({
                "id": id,
                "title": text_at(group, "ProcurementProject/Name"),
                "maximumValue": amount_at(group, "TenderingProcess/FrameworkAgreement/MaximumValueAmount"),
            }));
        }

        let groups = entities(groups);
        Ok((!groups.is_empty()).then_some(Fragment::LotGroups(groups)))
    }
}

/// Procurement documents referenced from each lot's tendering terms.
pub struct ProcurementDocuments;

impl FragmentProducer for ProcurementDocuments {
    fn name(&self) -> &'static str {
        "ProcurementDocuments"
    }

    fn business_term(&self) -> &'static str {
        "OPT-140 / BT-15"
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let mut documents = Vec::new();
        for lot in project_lots(root, "Lot") {
            let lot_id = element_id(lot);
            for reference in find_all_by_path(lot, "TenderingTerms/CallForTendersDocumentReference") {
                let Some(id) = element_id(reference) else {
                    continue;
                };
                documents.push(json!({
                    "id": id,
                    "documentType": "biddingDocuments",
                    "url": text_at(reference, "Attachment/ExternalReference/URI"),
                    "language": text_at(reference, "LanguageID").map(|l| l.to_lowercase()),
                    "relatedLots": lot_id.as_ref().map(|l| vec![l]),
                }));
            }
        }

        let documents = entities(documents);
        Ok((!documents.is_empty()).then_some(Fragment::Documents(documents)))
    }
}

/// One item per lot carrying the lot's CPV classifications.
///
/// Items get sequential ids in lot order.
pub struct LotClassifications;

impl FragmentProducer for LotClassifications {
    fn name(&self) -> &'static str {
        "LotClassifications"
    }

    fn business_term(&self) -> &'static str {
        "BT-262"
    }

    fn produce(&self, root: Node<'_, '_>, context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let mut items = Vec::new();
        for lot in project_lots(root, "Lot") {
            let Some(project) = find_by_path(lot, "ProcurementProject") else {
                continue;
            };
            let Some(main) = find_by_path(project, "MainCommodityClassification/ItemClassificationCode")
                .and_then(classification)
            else {
                continue;
            };

            let additional: Vec<Value> = find_all_by_path(
                project,
                "AdditionalCommodityClassification/ItemClassificationCode",
            )
            .into_iter()
            .filter_map(classification)
            .collect();

            items.push(json!({
                "id": context.ids.next_id("items"),
                "relatedLot": element_id(lot),
                "classification": main,
                "additionalClassifications": additional,
            }));
        }

        let items = entities(items);
        Ok((!items.is_empty()).then_some(Fragment::Items(items)))
    }
}

fn classification(code: Node<'_, '_>) -> Option<Value> {
    let id = get_text(code);
    if id.is_empty() {
        return None;
    }
    let scheme = code.attribute("listName").unwrap_or("cpv").to_uppercase();
    Some(json!({"scheme": scheme, "id": id}))
}

/// Justifications for not using electronic submission, appended to
/// `tender.submissionMethodDetails`.
pub struct SubmissionNotes;

/// `listName` of the process justification explaining why electronic
/// submission is not used.
const NO_ESUBMISSION: &str = "no-esubmission";

impl FragmentProducer for SubmissionNotes {
    fn name(&self) -> &'static str {
        "SubmissionNotes"
    }

    fn business_term(&self) -> &'static str {
        "BT-19"
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let mut notes: Vec<String> = Vec::new();
        for lot in project_lots(root, "Lot") {
            for justification in find_all_by_path(lot, "TenderingProcess/ProcessJustification") {
                let is_submission = find_children(justification, "ProcessReasonCode")
                    .any(|code| attribute_eq(code, "listName", NO_ESUBMISSION));
                if !is_submission {
                    continue;
                }
                if let Some(reason) = text_at(justification, "ProcessReason") {
                    if !notes.contains(&reason) {
                        notes.push(reason);
                    }
                }
            }
        }

        if notes.is_empty() {
            return Ok(None);
        }
        Ok(Some(Fragment::Tender(entity(json!({
            "submissionMethodDetails": notes.join(" "),
        })))))
    }
}
