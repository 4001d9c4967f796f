//! Notice-level producers: identifiers, dates, and release tags.

use chrono::DateTime;
use roxmltree::Node;
use serde_json::json;
use ted_ocds_release::Fragment;

use crate::error::{ConverterError, Result};
use crate::producer::{entity, FragmentProducer, ProducerContext};
use crate::types::NoticeType;
use crate::xml::eforms::{notice_id, procedure_id};
use crate::xml::text_at;

/// Release `id`, `ocid`, and `tender.id` from the notice and procedure
/// identifiers.
pub struct NoticeIdentifier;

impl FragmentProducer for NoticeIdentifier {
    fn name(&self) -> &'static str {
        "NoticeIdentifier"
    }

    fn business_term(&self) -> &'static str {
        "BT-701 / BT-04"
    }

    fn produce(&self, root: Node<'_, '_>, context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let notice = notice_id(root);
        let procedure = procedure_id(root);
        if notice.is_none() && procedure.is_none() {
            return Ok(None);
        }

        let ocid = procedure.as_deref().map(|id| context.ocid(id));
        Ok(Some(Fragment::Release(entity(json!({
            "id": notice,
            "ocid": ocid,
            "tender": {"id": procedure},
        })))))
    }
}

/// Release `date` from the notice's issue date and time.
pub struct IssueDate;

impl FragmentProducer for IssueDate {
    fn name(&self) -> &'static str {
        "IssueDate"
    }

    fn business_term(&self) -> &'static str {
        "BT-05"
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let Some(date) = text_at(root, "IssueDate") else {
            return Ok(None);
        };
        let time = text_at(root, "IssueTime");

        let timestamp = xs_timestamp(&date, time.as_deref()).ok_or_else(|| {
            ConverterError::producer(
                self.business_term(),
                format!("invalid issue date '{date}' / time '{}'", time.as_deref().unwrap_or("")),
            )
        })?;

        Ok(Some(Fragment::Release(entity(json!({"date": timestamp})))))
    }
}

/// Combine an xs:date and optional xs:time into an RFC 3339 timestamp.
///
/// Either part may carry a zone offset (`+01:00` or `Z`); the time's
/// offset wins, and a missing offset means UTC. A missing time means
/// midnight.
pub(super) fn xs_timestamp(date: &str, time: Option<&str>) -> Option<String> {
    let day = date.get(..10)?;
    let date_zone = date.get(10..).unwrap_or("");

    let (clock, time_zone) = match time {
        Some(time) => (time.get(..8)?, time.get(8..).unwrap_or("")),
        None => ("00:00:00", ""),
    };

    let zone = [time_zone, date_zone]
        .into_iter()
        .find(|z| !z.is_empty())
        .unwrap_or("Z");

    DateTime::parse_from_rfc3339(&format!("{day}T{clock}{zone}"))
        .ok()
        .map(|dt| dt.to_rfc3339())
}

/// Release `tag` and `initiationType` from the notice type.
pub struct ReleaseTag;

impl FragmentProducer for ReleaseTag {
    fn name(&self) -> &'static str {
        "ReleaseTag"
    }

    fn business_term(&self) -> &'static str {
        "notice type"
    }

    fn produce(&self, _root: Node<'_, '_>, context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let tags: &[&str] = match context.notice_type {
            NoticeType::PriorInformationNotice => &["planning"],
            NoticeType::ContractNotice => &["tender"],
            NoticeType::ContractAwardNotice => &["award", "contract"],
            NoticeType::ContractAwardNoticeModification => &["contractAmendment"],
            NoticeType::Unknown => return Ok(None),
        };

        Ok(Some(Fragment::Release(entity(json!({
            "tag": tags,
            "initiationType": "tender",
        })))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;
    use serde_json::Value;

    fn run(producer: &dyn FragmentProducer, xml: &str, notice_type: NoticeType) -> Option<Value> {
        let doc = Document::parse(xml).unwrap();
        let mut context = ProducerContext::new(notice_type, "test.xml", "ocds-0c46vo");
        producer
            .produce(doc.root_element(), &mut context)
            .unwrap()
            .map(|fragment| match fragment {
                Fragment::Release(fields) => Value::Object(fields),
                other => panic!("unexpected fragment {other:?}"),
            })
    }

    #[test]
    fn test_notice_identifier() {
        let xml = r#"<ContractNotice xmlns:cbc="urn:cbc">
            <cbc:ID schemeName="notice-id">N-1</cbc:ID>
            <cbc:ContractFolderID>P-1</cbc:ContractFolderID>
        </ContractNotice>"#;

        assert_eq!(
            run(&NoticeIdentifier, xml, NoticeType::ContractNotice),
            Some(json!({"id": "N-1", "ocid": "ocds-0c46vo-P-1", "tender": {"id": "P-1"}}))
        );
    }

    #[test]
    fn test_notice_identifier_absent() {
        assert_eq!(
            run(&NoticeIdentifier, "<ContractNotice/>", NoticeType::ContractNotice),
            None
        );
    }

    #[test]
    fn test_issue_date_with_time() {
        let xml = r#"<ContractNotice>
            <IssueDate>2019-11-26+01:00</IssueDate>
            <IssueTime>13:38:54+01:00</IssueTime>
        </ContractNotice>"#;

        assert_eq!(
            run(&IssueDate, xml, NoticeType::ContractNotice),
            Some(json!({"date": "2019-11-26T13:38:54+01:00"}))
        );
    }

    #[test]
    fn test_xs_timestamp_zones() {
        assert_eq!(
            xs_timestamp("2019-11-26Z", None).as_deref(),
            Some("2019-11-26T00:00:00+00:00")
        );
        assert_eq!(
            xs_timestamp("2019-11-26+02:00", Some("08:15:00")).as_deref(),
            Some("2019-11-26T08:15:00+02:00")
        );
        assert_eq!(xs_timestamp("26/11/2019", None), None);
    }

    #[test]
    fn test_issue_date_invalid() {
        let doc = Document::parse("<ContractNotice><IssueDate>yesterday</IssueDate></ContractNotice>").unwrap();
        let mut context = ProducerContext::new(NoticeType::ContractNotice, "test.xml", "ocds-0c46vo");
        let err = IssueDate.produce(doc.root_element(), &mut context).unwrap_err();
        assert!(err.to_string().contains("BT-05"));
    }

    #[test]
    fn test_release_tag_by_type() {
        assert_eq!(
            run(&ReleaseTag, "<x/>", NoticeType::ContractAwardNotice),
            Some(json!({"tag": ["award", "contract"], "initiationType": "tender"}))
        );
        assert_eq!(
            run(&ReleaseTag, "<x/>", NoticeType::ContractAwardNoticeModification),
            Some(json!({"tag": ["contractAmendment"], "initiationType": "tender"}))
        );
        assert_eq!(run(&ReleaseTag, "<x/>", NoticeType::Unknown), None);
    }
}
