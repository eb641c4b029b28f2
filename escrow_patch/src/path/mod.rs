//! Dotted UI paths, candidate resolution and leaf assignment on nested records

mod resolver;
mod writer;

use std::borrow::Borrow;
use std::fmt::Display;
use std::ops::Deref;
use std::str::FromStr;

use error_stack::Report;
use serde::Serialize;

use crate::constants::PATH_SEPARATOR;
use crate::error::{Error, Result};

pub use resolver::{lookup, resolve, resolve_str};
pub use writer::assign;

/// A validated dotted path into a nested record, e.g. `propertyDetails.bedrooms`
///
/// Segments are non-empty. Numeric segments address array elements when the
/// traversed value is an array and object keys otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// Parse a dotted path, rejecting empty paths and empty segments
    pub fn parse(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Report::new(Error::invalid("field path", "path is empty")));
        }
        if path.split(PATH_SEPARATOR).any(str::is_empty) {
            return Err(Report::new(Error::invalid(
                "field path",
                format!("'{path}' contains an empty segment"),
            )));
        }
        Ok(Self(path.to_string()))
    }

    /// Build a path from already validated segments
    fn from_segments<'a>(segments: impl Iterator<Item = &'a str>) -> Option<Self> {
        let joined = itertools::join(segments, ".");
        (!joined.is_empty()).then_some(Self(joined))
    }

    /// The path as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the path segments from the root
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.0.split(PATH_SEPARATOR)
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// First segment, the top-level section of the record
    pub fn root(&self) -> &str {
        self.segments().next().unwrap_or_default()
    }

    /// Last segment, the leaf key
    pub fn leaf(&self) -> &str {
        self.segments().next_back().unwrap_or_default()
    }

    /// The remainder of this path below `root`, if the path starts with it
    ///
    /// `checklists.house.emd` stripped of `checklists` is `house.emd`.
    /// Returns `None` when the root differs or nothing remains.
    pub fn strip_root(&self, root: &str) -> Option<Self> {
        let mut segments = self.segments();
        if segments.next()? != root {
            return None;
        }
        Self::from_segments(segments)
    }
}

impl Deref for FieldPath {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for FieldPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for FieldPath {
    type Err = Report<Error>;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse(".a").is_err());
        assert!(FieldPath::parse("a.").is_err());
        assert!(FieldPath::parse("propertyDetails.bedrooms").is_ok());
    }

    #[test]
    fn test_root_leaf_and_depth() {
        let path: FieldPath = "checklists.house.emd".parse().unwrap();
        assert_eq!(path.root(), "checklists");
        assert_eq!(path.leaf(), "emd");
        assert_eq!(path.depth(), 3);

        let single: FieldPath = "purchasePrice".parse().unwrap();
        assert_eq!(single.root(), "purchasePrice");
        assert_eq!(single.leaf(), "purchasePrice");
    }

    #[test]
    fn test_strip_root() {
        let path: FieldPath = "checklists.house.emd".parse().unwrap();
        assert_eq!(
            path.strip_root("checklists").map(|p| p.to_string()),
            Some("house.emd".to_string())
        );
        assert!(path.strip_root("people").is_none());

        let bare: FieldPath = "checklists".parse().unwrap();
        assert!(bare.strip_root("checklists").is_none());
    }
}
