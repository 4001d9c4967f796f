//! Result producers: awards, contracts, bids, and submission statistics.

use roxmltree::Node;
use serde_json::{json, Number, Value};
use ted_ocds_release::Fragment;

use super::notice::xs_timestamp;
use super::parties::WINNER_SELECTED;
use crate::error::Result;
use crate::producer::{entities, FragmentProducer, ProducerContext};
use crate::types::NoticeType;
use crate::xml::eforms::{amount_at, element_id, lot_tender_organizations, notice_result};
use crate::xml::{find_all_by_path, find_children, get_text, text_at};

fn is_result_notice(notice_type: NoticeType) -> bool {
    matches!(
        notice_type,
        NoticeType::ContractAwardNotice | NoticeType::ContractAwardNoticeModification
    )
}

/// OCDS award status for an eForms winner selection status.
fn award_status(code: &str) -> Option<&'static str> {
    match code {
        WINNER_SELECTED => Some("active"),
        "clos-nw" => Some("unsuccessful"),
        "open-nw" => Some("pending"),
        _ => None,
    }
}

/// Awards from lot results, with status, related lot, and suppliers.
pub struct LotResults;

impl FragmentProducer for LotResults {
    fn name(&self) -> &'static str {
        "LotResults"
    }

    fn business_term(&self) -> &'static str {
        "OPT-322 / BT-142"
    }

    fn applies_to(&self, notice_type: NoticeType) -> bool {
        is_result_notice(notice_type)
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let Some(result) = notice_result(root) else {
            return Ok(None);
        };

        let awards = entities(find_children(result, "LotResult").filter_map(|lot_result| {
            let id = element_id(lot_result)?;
            let code = text_at(lot_result, "TenderResultCode");
            let status = code.as_deref().and_then(award_status);

            let suppliers: Vec<Value> = if code.as_deref() == Some(WINNER_SELECTED) {
                find_all_by_path(lot_result, "LotTender/ID")
                    .into_iter()
                    .map(get_text)
                    .flat_map(|tender| lot_tender_organizations(result, &tender))
                    .map(|org| json!({"id": org}))
                    .collect()
            } else {
                Vec::new()
            };

            let related: Vec<String> = find_all_by_path(lot_result, "TenderLot/ID")
                .into_iter()
                .map(get_text)
                .collect();

            Some(json!({
                "id": id,
                "status": status,
                "relatedLots": related,
                "suppliers": suppliers,
            }))
        }));

        Ok((!awards.is_empty()).then_some(Fragment::Awards(awards)))
    }
}

/// Contracts from settled contracts, linked to the award whose lot result
/// references them.
pub struct SettledContracts;

impl FragmentProducer for SettledContracts {
    fn name(&self) -> &'static str {
        "SettledContracts"
    }

    fn business_term(&self) -> &'static str {
        "OPT-316 / BT-145"
    }

    fn applies_to(&self, notice_type: NoticeType) -> bool {
        is_result_notice(notice_type)
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let Some(result) = notice_result(root) else {
            return Ok(None);
        };

        let contracts = entities(find_children(result, "SettledContract").filter_map(|contract| {
            let id = element_id(contract)?;
            let award = find_children(result, "LotResult")
                .find(|lot_result| {
                    find_all_by_path(*lot_result, "SettledContract/ID")
                        .into_iter()
                        .any(|c| get_text(c) == id)
                })
                .and_then(element_id);

            Some(json!({
                "id": id,
                "awardID": award,
                "title": text_at(contract, "Title"),
                "dateSigned": text_at(contract, "IssueDate").and_then(|d| xs_timestamp(&d, None)),
            }))
        }));

        Ok((!contracts.is_empty()).then_some(Fragment::Contracts(contracts)))
    }
}

/// Bid details from lot tenders: value, lot, and tendering organizations.
pub struct LotTenders;

impl FragmentProducer for LotTenders {
    fn name(&self) -> &'static str {
        "LotTenders"
    }

    fn business_term(&self) -> &'static str {
        "OPT-321 / BT-720"
    }

    fn applies_to(&self, notice_type: NoticeType) -> bool {
        is_result_notice(notice_type)
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let Some(result) = notice_result(root) else {
            return Ok(None);
        };

        let bids = entities(find_children(result, "LotTender").filter_map(|tender| {
            let id = element_id(tender)?;
            let tenderers: Vec<Value> = lot_tender_organizations(result, &id)
                .into_iter()
                .map(|org| json!({"id": org}))
                .collect();

            Some(json!({
                "id": id,
                "value": amount_at(tender, "LegalMonetaryTotal/PayableAmount"),
                "relatedLots": text_at(tender, "TenderLot/ID").map(|lot| vec![lot]),
                "tenderers": tenderers,
            }))
        }));

        Ok((!bids.is_empty()).then_some(Fragment::Bids(bids)))
    }
}

/// Statistics on received submissions per lot.
///
/// Statistics have no identifier in the notice; ids come from the
/// context's sequence.
pub struct ReceivedSubmissions;

impl FragmentProducer for ReceivedSubmissions {
    fn name(&self) -> &'static str {
        "ReceivedSubmissions"
    }

    fn business_term(&self) -> &'static str {
        "BT-759 / BT-760"
    }

    fn applies_to(&self, notice_type: NoticeType) -> bool {
        is_result_notice(notice_type)
    }

    fn produce(&self, root: Node<'_, '_>, context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let Some(result) = notice_result(root) else {
            return Ok(None);
        };

        let mut statistics = Vec::new();
        for lot_result in find_children(result, "LotResult") {
            let lot = text_at(lot_result, "TenderLot/ID");
            for stats in find_children(lot_result, "ReceivedSubmissionsStatistics") {
                let Some(value) = text_at(stats, "StatisticsNumeric")
                    .and_then(|v| v.parse::<Number>().ok())
                else {
                    tracing::debug!(file = %context.file_name, "Skipping statistic without a numeric value");
                    continue;
                };
                statistics.push(json!({
                    "id": context.ids.next_id("statistics"),
                    "value": value,
                    "measure": text_at(stats, "StatisticsCode"),
                    "relatedLot": lot,
                }));
            }
        }

        let statistics = entities(statistics);
        Ok((!statistics.is_empty()).then_some(Fragment::Statistics(statistics)))
    }
}
