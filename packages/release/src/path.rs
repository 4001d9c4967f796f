//! Dotted field paths into a release document.

use std::fmt;

/// Location of a field in the release schema.
///
/// Entity positions are elided: every member of `tender.lots` shares the
/// path `tender.lots`, and a lot's value amount lives at
/// `tender.lots.value.amount`. Schema configuration is keyed by these paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(String);

impl FieldPath {
    /// The release root.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Create a path from a dotted string such as `"tender.lots"`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Path of a child field.
    ///
    /// # Examples
    /// ```
    /// use ted_ocds_release::FieldPath;
    ///
    /// let lots = FieldPath::root().child("tender").child("lots");
    /// assert_eq!(lots.as_str(), "tender.lots");
    /// ```
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path's segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<release>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_from_root() {
        assert_eq!(FieldPath::root().child("parties").as_str(), "parties");
    }

    #[test]
    fn test_segments() {
        let path = FieldPath::new("bids.details.value");
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments, vec!["bids", "details", "value"]);
        assert_eq!(FieldPath::root().segments().count(), 0);
    }

    #[test]
    fn test_display_root() {
        assert_eq!(FieldPath::root().to_string(), "<release>");
        assert_eq!(FieldPath::new("awards").to_string(), "awards");
    }
}
