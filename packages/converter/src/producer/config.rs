//! Registry configuration for eForms notices.

use super::core::ProducerRegistry;
use super::producers::{
    Buyer, IssueDate, LotClassifications, LotGroups, LotResults, LotTenders, Lots,
    ModificationReason, NoticeIdentifier, Organizations, ProcurementDocuments,
    ReceivedSubmissions, ReleaseTag, SettledContracts, SubmissionNotes, Tenderers,
    UnpublishedFields,
};

/// Create a producer registry configured for eForms notices.
///
/// Organizations are registered before any producer that assigns party
/// roles, so a party's details are in place when its roles arrive.
#[must_use]
pub fn create_default_registry() -> ProducerRegistry {
    let mut registry = ProducerRegistry::new();

    // Notice level
    registry.register(NoticeIdentifier);
    registry.register(IssueDate);
    registry.register(ReleaseTag);

    // Parties
    registry.register(Organizations);
    registry.register(Buyer);

    // Tender
    registry.register(Lots);
    registry.register(LotGroups);
    registry.register(ProcurementDocuments);
    registry.register(LotClassifications);
    registry.register(SubmissionNotes);

    // Results
    registry.register(LotResults);
    registry.register(SettledContracts);
    registry.register(Tenderers);
    registry.register(LotTenders);
    registry.register(ReceivedSubmissions);

    registry.register(UnpublishedFields);
    registry.register(ModificationReason);

    registry
}
