//! Organization and party-role producers.

use roxmltree::Node;
use serde_json::{json, Value};
use ted_ocds_release::Fragment;

use crate::error::Result;
use crate::producer::{entities, entity, FragmentProducer, ProducerContext};
use crate::types::NoticeType;
use crate::xml::eforms::{eforms_extension, lot_tender_organizations, notice_result};
use crate::xml::{find_all_by_path, find_children, get_text, text_at};

/// Parties from `efac:Organizations`: names, legal identifiers, addresses,
/// and contact points.
pub struct Organizations;

impl FragmentProducer for Organizations {
    fn name(&self) -> &'static str {
        "Organizations"
    }

    fn business_term(&self) -> &'static str {
        "OPT-200 / BT-500"
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let Some(extension) = eforms_extension(root) else {
            return Ok(None);
        };

        let parties = entities(
            find_all_by_path(extension, "Organizations/Organization/Company")
                .into_iter()
                .filter_map(company_party),
        );

        Ok((!parties.is_empty()).then_some(Fragment::Parties(parties)))
    }
}

fn company_party(company: Node<'_, '_>) -> Option<Value> {
    let id = text_at(company, "PartyIdentification/ID")?;
    let name = text_at(company, "PartyName/Name");

    Some(json!({
        "id": id,
        "name": name,
        "identifier": {
            "id": text_at(company, "PartyLegalEntity/CompanyID"),
            "legalName": name,
        },
        "address": {
            "streetAddress": text_at(company, "PostalAddress/StreetName"),
            "locality": text_at(company, "PostalAddress/CityName"),
            "postalCode": text_at(company, "PostalAddress/PostalZone"),
            "region": text_at(company, "PostalAddress/CountrySubentityCode"),
            "country": text_at(company, "PostalAddress/Country/IdentificationCode"),
        },
        "contactPoint": {
            "name": text_at(company, "Contact/Name"),
            "email": text_at(company, "Contact/ElectronicMail"),
            "telephone": text_at(company, "Contact/Telephone"),
            "url": text_at(company, "WebsiteURI"),
        },
    }))
}

/// Buyer role for each contracting party, and the release `buyer`.
pub struct Buyer;

impl FragmentProducer for Buyer {
    fn name(&self) -> &'static str {
        "Buyer"
    }

    fn business_term(&self) -> &'static str {
        "OPT-300"
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let buyers: Vec<String> = find_children(root, "ContractingParty")
            .filter_map(|party| text_at(party, "Party/PartyIdentification/ID"))
            .collect();

        let Some(first) = buyers.first() else {
            return Ok(None);
        };

        let parties: Vec<Value> = buyers
            .iter()
            .map(|id| json!({"id": id, "roles": ["buyer"]}))
            .collect();

        Ok(Some(Fragment::Release(entity(json!({
            "buyer": {"id": first},
            "parties": parties,
        })))))
    }
}

/// Tenderer role for every tendering organization, plus supplier for the
/// organizations behind winning tenders.
pub struct Tenderers;

impl FragmentProducer for Tenderers {
    fn name(&self) -> &'static str {
        "Tenderers"
    }

    fn business_term(&self) -> &'static str {
        "OPT-210 / OPT-300"
    }

    fn applies_to(&self, notice_type: NoticeType) -> bool {
        matches!(
            notice_type,
            NoticeType::ContractAwardNotice | NoticeType::ContractAwardNoticeModification
        )
    }

    fn produce(&self, root: Node<'_, '_>, _context: &mut ProducerContext) -> Result<Option<Fragment>> {
        let Some(result) = notice_result(root) else {
            return Ok(None);
        };

        let mut parties: Vec<Value> = find_all_by_path(result, "TenderingParty/Tenderer/ID")
            .into_iter()
            .map(get_text)
            .map(|id| json!({"id": id, "roles": ["tenderer"]}))
            .collect();

        for lot_result in find_children(result, "LotResult") {
            if text_at(lot_result, "TenderResultCode").as_deref() != Some(WINNER_SELECTED) {
                continue;
            }
            for tender_id in find_all_by_path(lot_result, "LotTender/ID").into_iter().map(get_text) {
                for org in lot_tender_organizations(result, &tender_id) {
                    parties.push(json!({"id": org, "roles": ["supplier"]}));
                }
            }
        }

        let parties = entities(parties);
        Ok((!parties.is_empty()).then_some(Fragment::Parties(parties)))
    }
}

/// `TenderResultCode` of a lot result with a selected winner.
pub(super) const WINNER_SELECTED: &str = "selec-w";

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const EXT_OPEN: &str = r#"<UBLExtensions><UBLExtension><ExtensionContent><EformsExtension>"#;
    const EXT_CLOSE: &str = r#"</EformsExtension></ExtensionContent></UBLExtension></UBLExtensions>"#;

    fn produce(producer: &dyn FragmentProducer, xml: &str) -> Option<Fragment> {
        let doc = Document::parse(xml).unwrap();
        let mut context = ProducerContext::new(NoticeType::ContractAwardNotice, "t.xml", "ocds-0c46vo");
        producer.produce(doc.root_element(), &mut context).unwrap()
    }

    fn party_values(fragment: Option<Fragment>) -> Vec<Value> {
        match fragment {
            Some(Fragment::Parties(parties)) => parties.into_iter().map(Value::Object).collect(),
            other => panic!("expected parties, got {other:?}"),
        }
    }

    #[test]
    fn test_organizations() {
        let xml = format!(
            r#"<ContractNotice>{EXT_OPEN}<Organizations><Organization><Company>
                <PartyIdentification><ID>ORG-0001</ID></PartyIdentification>
                <PartyName><Name>City of Ghent</Name></PartyName>
                <PostalAddress>
                    <CityName>Ghent</CityName>
                    <Country><IdentificationCode>BEL</IdentificationCode></Country>
                </PostalAddress>
                <PartyLegalEntity><CompanyID>BE0207451227</CompanyID></PartyLegalEntity>
                <Contact><ElectronicMail>procurement@example.be</ElectronicMail></Contact>
            </Company></Organization></Organizations>{EXT_CLOSE}</ContractNotice>"#
        );

        assert_eq!(
            party_values(produce(&Organizations, &xml)),
            vec![json!({
                "id": "ORG-0001",
                "name": "City of Ghent",
                "identifier": {"id": "BE0207451227", "legalName": "City of Ghent"},
                "address": {"locality": "Ghent", "country": "BEL"},
                "contactPoint": {"email": "procurement@example.be"}
            })]
        );
    }

    #[test]
    fn test_organizations_absent() {
        assert!(produce(&Organizations, "<ContractNotice/>").is_none());
    }

    #[test]
    fn test_buyer() {
        let xml = r#"<ContractNotice>
            <ContractingParty><Party><PartyIdentification><ID>ORG-0001</ID></PartyIdentification></Party></ContractingParty>
            <ContractingParty><Party><PartyIdentification><ID>ORG-0002</ID></PartyIdentification></Party></ContractingParty>
        </ContractNotice>"#;

        let Some(Fragment::Release(fields)) = produce(&Buyer, xml) else {
            panic!("expected release fragment");
        };
        assert_eq!(
            Value::Object(fields),
            json!({
                "buyer": {"id": "ORG-0001"},
                "parties": [
                    {"id": "ORG-0001", "roles": ["buyer"]},
                    {"id": "ORG-0002", "roles": ["buyer"]}
                ]
            })
        );
    }

    #[test]
    fn test_tenderers_and_suppliers() {
        let xml = format!(
            r#"<ContractAwardNotice>{EXT_OPEN}<NoticeResult>
                <LotResult><ID>RES-0001</ID><TenderResultCode>selec-w</TenderResultCode>
                    <LotTender><ID>TEN-0001</ID></LotTender></LotResult>
                <LotResult><ID>RES-0002</ID><TenderResultCode>clos-nw</TenderResultCode>
                    <LotTender><ID>TEN-0002</ID></LotTender></LotResult>
                <LotTender><ID>TEN-0001</ID><TenderingParty><ID>TPA-0001</ID></TenderingParty></LotTender>
                <LotTender><ID>TEN-0002</ID><TenderingParty><ID>TPA-0002</ID></TenderingParty></LotTender>
                <TenderingParty><ID>TPA-0001</ID><Tenderer><ID>ORG-0003</ID></Tenderer></TenderingParty>
                <TenderingParty><ID>TPA-0002</ID><Tenderer><ID>ORG-0004</ID></Tenderer></TenderingParty>
            </NoticeResult>{EXT_CLOSE}</ContractAwardNotice>"#
        );

        assert!(Tenderers.applies_to(NoticeType::ContractAwardNotice));
        assert!(!Tenderers.applies_to(NoticeType::ContractNotice));
        assert_eq!(
            party_values(produce(&Tenderers, &xml)),
            vec![
                json!({"id": "ORG-0003", "roles": ["tenderer"]}),
                json!({"id": "ORG-0004", "roles": ["tenderer"]}),
                json!({"id": "ORG-0003", "roles": ["supplier"]}),
            ]
        );
    }
}
