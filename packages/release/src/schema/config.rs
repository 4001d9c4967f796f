//! Schema configuration for OCDS releases built from procurement notices.

use super::registry::SchemaRegistry;
use super::types::{CollectionSpec, MergePolicy};

/// Create the schema registry for OCDS 1.1 releases.
///
/// Entity collections and their identity keys:
///
/// ```text
/// parties                          id
/// ├── details.classifications      id
/// └── beneficialOwners             id
/// buyer                            (object)
/// tender
/// ├── lots                         id
/// ├── lotGroups                    id
/// ├── documents                    id
/// ├── items                        id | relatedLot
/// └── amendments                   id
/// awards                           id
/// contracts                        id
/// └── amendments                   id
/// statistics                       id
/// withheldInformation              id | field
/// bids.details                     id
/// ```
///
/// `tender.submissionMethodDetails` accumulates text across fragments and
/// `tag` is replaced by each notice rather than unioned.
#[must_use]
pub fn create_ocds_schema() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    registry.register(CollectionSpec::new("parties"));
    registry.register(CollectionSpec::new("parties.details.classifications"));
    registry.register(CollectionSpec::new("parties.beneficialOwners"));

    registry.register(CollectionSpec::new("tender.lots"));
    registry.register(CollectionSpec::new("tender.lotGroups"));
    registry.register(CollectionSpec::new("tender.documents"));
    registry.register(CollectionSpec::new("tender.items").with_identity_keys(["id", "relatedLot"]));
    registry.register(CollectionSpec::new("tender.amendments"));

    registry.register(CollectionSpec::new("awards"));
    registry.register(CollectionSpec::new("contracts"));
    registry.register(CollectionSpec::new("contracts.amendments"));

    registry.register(CollectionSpec::new("statistics"));
    // Withheld information is keyed by id, but some producers only know the
    // field code of the withheld business term.
    registry.register(
        CollectionSpec::new("withheldInformation").with_identity_keys(["id", "field"]),
    );
    registry.register(CollectionSpec::new("bids.details"));

    registry.set_policy("tender.submissionMethodDetails", MergePolicy::append_text(" "));
    registry.set_policy("tag", MergePolicy::Replace);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ocds_schema() {
        let registry = create_ocds_schema();

        assert!(registry.is_collection("parties"));
        assert!(registry.is_collection("tender.lots"));
        assert!(registry.is_collection("bids.details"));
        assert!(!registry.is_collection("tender"));

        let items = registry.collection("tender.items").unwrap();
        assert_eq!(items.identity_keys, vec!["id", "relatedLot"]);

        let withheld = registry.collection("withheldInformation").unwrap();
        assert_eq!(withheld.identity_keys, vec!["id", "field"]);
        assert!(!withheld.mint_ids);
    }

    #[test]
    fn test_ocds_schema_policies() {
        let registry = create_ocds_schema();

        assert_eq!(
            registry.policy("tender.submissionMethodDetails"),
            &MergePolicy::append_text(" ")
        );
        assert_eq!(registry.policy("tag"), &MergePolicy::Replace);
        assert_eq!(registry.policy("tender.title"), &MergePolicy::Merge);
    }
}
