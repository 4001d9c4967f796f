//! Fragments: partial releases produced by one business term each.

use serde_json::{Map, Value};

use crate::error::{MergeError, Result};
use crate::path::FieldPath;
use crate::release::{value_kind, Release};

/// One member of an entity collection.
pub type Entity = Map<String, Value>;

/// A release-shaped partial document addressed at one release location.
///
/// Collection variants carry the entities for that collection; the
/// object variants carry the fields of the object at their path.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Release-level fields (`id`, `ocid`, `date`, `tag`, ...).
    Release(Map<String, Value>),
    /// Fields of the `tender` object.
    Tender(Map<String, Value>),
    /// Fields of the `buyer` reference.
    Buyer(Map<String, Value>),
    Parties(Vec<Entity>),
    Lots(Vec<Entity>),
    LotGroups(Vec<Entity>),
    Documents(Vec<Entity>),
    Items(Vec<Entity>),
    Awards(Vec<Entity>),
    Contracts(Vec<Entity>),
    Statistics(Vec<Entity>),
    WithheldInformation(Vec<Entity>),
    Bids(Vec<Entity>),
}

impl Fragment {
    /// Dotted release path this fragment is addressed at.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::Release(_) => "",
            Self::Tender(_) => "tender",
            Self::Buyer(_) => "buyer",
            Self::Parties(_) => "parties",
            Self::Lots(_) => "tender.lots",
            Self::LotGroups(_) => "tender.lotGroups",
            Self::Documents(_) => "tender.documents",
            Self::Items(_) => "tender.items",
            Self::Awards(_) => "awards",
            Self::Contracts(_) => "contracts",
            Self::Statistics(_) => "statistics",
            Self::WithheldInformation(_) => "withheldInformation",
            Self::Bids(_) => "bids.details",
        }
    }

    /// Check whether the fragment carries nothing to merge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Release(fields) | Self::Tender(fields) | Self::Buyer(fields) => fields.is_empty(),
            Self::Parties(entities)
            | Self::Lots(entities)
            | Self::LotGroups(entities)
            | Self::Documents(entities)
            | Self::Items(entities)
            | Self::Awards(entities)
            | Self::Contracts(entities)
            | Self::Statistics(entities)
            | Self::WithheldInformation(entities)
            | Self::Bids(entities) => entities.is_empty(),
        }
    }

    /// Number of entities or fields carried.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Release(fields) | Self::Tender(fields) | Self::Buyer(fields) => fields.len(),
            Self::Parties(entities)
            | Self::Lots(entities)
            | Self::LotGroups(entities)
            | Self::Documents(entities)
            | Self::Items(entities)
            | Self::Awards(entities)
            | Self::Contracts(entities)
            | Self::Statistics(entities)
            | Self::WithheldInformation(entities)
            | Self::Bids(entities) => entities.len(),
        }
    }

    fn into_payload(self) -> Value {
        match self {
            Self::Release(fields) | Self::Tender(fields) | Self::Buyer(fields) => {
                Value::Object(fields)
            }
            Self::Parties(entities)
            | Self::Lots(entities)
            | Self::LotGroups(entities)
            | Self::Documents(entities)
            | Self::Items(entities)
            | Self::Awards(entities)
            | Self::Contracts(entities)
            | Self::Statistics(entities)
            | Self::WithheldInformation(entities)
            | Self::Bids(entities) => {
                Value::Array(entities.into_iter().map(Value::Object).collect())
            }
        }
    }
}

/// Anything the merge engine can fold into a release.
pub trait Mergeable {
    /// Release location the value is addressed at, for logging and errors.
    fn target(&self) -> FieldPath;

    /// Convert into a release-shaped partial document rooted at the release.
    ///
    /// # Errors
    /// Returns `MalformedFragment` when the value cannot be shaped as a
    /// release (e.g. a raw JSON fragment that is not an object).
    fn into_partial(self) -> Result<Map<String, Value>>;
}

impl Mergeable for Fragment {
    fn target(&self) -> FieldPath {
        FieldPath::new(self.path())
    }

    fn into_partial(self) -> Result<Map<String, Value>> {
        let path = self.path();
        let payload = self.into_payload();
        if path.is_empty() {
            return match payload {
                Value::Object(fields) => Ok(fields),
                other => Err(MergeError::malformed(
                    FieldPath::root(),
                    format!("release fragment must be an object, found {}", value_kind(&other)),
                )),
            };
        }

        // Nest the payload under its path, innermost segment first.
        let mut value = payload;
        for segment in path.rsplit('.') {
            let mut wrapper = Map::new();
            wrapper.insert(segment.to_string(), value);
            value = Value::Object(wrapper);
        }
        match value {
            Value::Object(fields) => Ok(fields),
            _ => Ok(Map::new()),
        }
    }
}

impl Mergeable for Value {
    fn target(&self) -> FieldPath {
        FieldPath::root()
    }

    fn into_partial(self) -> Result<Map<String, Value>> {
        match self {
            Value::Object(fields) => Ok(fields),
            other => Err(MergeError::malformed(
                FieldPath::root(),
                format!("fragment must be an object, found {}", value_kind(&other)),
            )),
        }
    }
}

impl Mergeable for Map<String, Value> {
    fn target(&self) -> FieldPath {
        FieldPath::root()
    }

    fn into_partial(self) -> Result<Map<String, Value>> {
        Ok(self)
    }
}

impl Mergeable for Release {
    fn target(&self) -> FieldPath {
        FieldPath::root()
    }

    fn into_partial(self) -> Result<Map<String, Value>> {
        Ok(self.into_map())
    }
}
