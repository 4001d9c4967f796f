//! Producer implementations, grouped by the part of the notice they read.

mod disclosure;
mod modification;
mod notice;
mod parties;
mod results;
mod tender;

pub use disclosure::UnpublishedFields;
pub use modification::ModificationReason;
pub use notice::{IssueDate, NoticeIdentifier, ReleaseTag};
pub use parties::{Buyer, Organizations, Tenderers};
pub use results::{LotResults, LotTenders, ReceivedSubmissions, SettledContracts};
pub use tender::{LotClassifications, LotGroups, Lots, ProcurementDocuments, SubmissionNotes};
