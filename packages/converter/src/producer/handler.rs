//! Fragment producer trait definition.

use roxmltree::Node;
use ted_ocds_release::Fragment;

use super::types::ProducerContext;
use crate::error::Result;
use crate::types::NoticeType;

/// Trait for business-term producers.
///
/// Producers are read-only over the parsed notice and never see each
/// other's fragments, so the producers of one notice may run in parallel.
pub trait FragmentProducer: Send + Sync {
    /// Registry name of the producer (e.g. "Organizations").
    fn name(&self) -> &'static str;

    /// Business terms the producer covers (e.g. "OPT-200 / BT-500").
    fn business_term(&self) -> &'static str;

    /// Check if the producer runs for a notice type.
    ///
    /// Default implementation runs for every known notice type.
    fn applies_to(&self, notice_type: NoticeType) -> bool {
        notice_type.is_known()
    }

    /// Read the business term from the notice root.
    ///
    /// Returns `Ok(None)` when the term is absent from the notice.
    ///
    /// # Errors
    /// Returns `Producer` when the term is present but cannot be
    /// interpreted.
    fn produce(&self, root: Node<'_, '_>, context: &mut ProducerContext) -> Result<Option<Fragment>>;
}
