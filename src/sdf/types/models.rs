//! Core data structures for SDF records and index keys.
//!
//! This module defines the values handed across the crate's seams:
//! - [`Record`]: one fully parsed SDF entry
//! - [`KeyKind`]: the category of a lookup key
//! - [`FormatWarning`]: a recoverable anomaly found while indexing

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::config::{tags, IndexConfig};

/// One logical entry of an SDF file.
///
/// Produced by the scanner either during a full pass or by re-parsing a single
/// record at its canonical offset. Both paths yield value-equal records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// The first line of the record (the molfile title line).
    pub id: String,
    /// The molfile header line naming the program/source.
    pub source: String,
    /// Free-text comment lines preceding the counts line, joined by spaces.
    pub comment: String,
    /// Verbatim structure body, counts line through the structure terminator.
    /// Empty for records produced in index mode.
    pub structure_block: String,
    /// Values of recognized name tags (including the synonym tag).
    pub name_fields: BTreeMap<String, String>,
    /// Values of recognized annotation tags.
    pub annotation_fields: BTreeMap<String, String>,
}

impl Record {
    pub fn name(&self, tag: &str) -> Option<&str> {
        self.name_fields.get(tag).map(String::as_str)
    }

    pub fn annotation(&self, tag: &str) -> Option<&str> {
        self.annotation_fields.get(tag).map(String::as_str)
    }

    /// Value of the default `COMMON_NAME` tag.
    ///
    /// See [`IndexConfig::common_name`](super::config::IndexConfig::common_name)
    /// for records read under other tags.
    pub fn common_name(&self) -> Option<&str> {
        self.name(tags::COMMON_NAME)
    }

    pub fn inchi(&self) -> Option<&str> {
        self.name(tags::INCHI)
    }

    /// Raw synonyms under the default `SYNONYMS` tag and `;` delimiter.
    pub fn synonyms(&self) -> Vec<&str> {
        IndexConfig::default_ref().synonyms(self)
    }

    /// Display title under the default tags.
    ///
    /// Use [`IndexConfig::title`](super::config::IndexConfig::title) for other layouts.
    pub fn title(&self) -> String {
        IndexConfig::default_ref().title(self)
    }
}

/// A named category of lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyKind {
    /// The record id (first line of each record). Unique.
    Id,
    /// A configured name field, identified by its index label (e.g. `commname`). Unique.
    Name(String),
    /// The normalized synonym set. Multi-valued.
    Synonym,
}

impl KeyKind {
    pub fn name(label: impl Into<String>) -> Self {
        KeyKind::Name(label.into())
    }

    /// Whether a key of this kind maps to exactly one offset (last write wins).
    pub fn is_unique(&self) -> bool {
        !matches!(self, KeyKind::Synonym)
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyKind::Id => write!(f, "id"),
            KeyKind::Name(label) => write!(f, "{}", label),
            KeyKind::Synonym => write!(f, "synonym"),
        }
    }
}

impl From<&str> for KeyKind {
    fn from(s: &str) -> Self {
        match s {
            "id" | "mainkey" => KeyKind::Id,
            "synonym" => KeyKind::Synonym,
            label => KeyKind::Name(label.to_string()),
        }
    }
}

impl FromStr for KeyKind {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(KeyKind::from(s))
    }
}

/// What went wrong with a skipped record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The stream ended before the structure terminator.
    MissingStructureEnd,
    /// A record terminator appeared before the structure terminator.
    UnexpectedRecordEnd,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WarningKind::MissingStructureEnd => write!(f, "end of input before structure terminator"),
            WarningKind::UnexpectedRecordEnd => write!(f, "record terminator inside structure block"),
        }
    }
}

/// A recoverable anomaly: the record starting at `offset` was not indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatWarning {
    pub offset: u64,
    pub id: Option<String>,
    pub kind: WarningKind,
}

impl fmt::Display for FormatWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "record `{}` at byte {}: {}", id, self.offset, self.kind),
            None => write!(f, "record at byte {}: {}", self.offset, self.kind),
        }
    }
}
