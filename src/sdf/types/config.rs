//! Reader configuration: format markers, indexed tags and text encoding.
//!
//! The defaults follow the LipidMaps SDF export. Other databases only need a
//! different [`IndexConfig`], the state machine itself has no tokens baked in.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use encoding_rs::Encoding;

use super::models::Record;
use crate::sdf::synonyms::SynonymNormalizer;
use crate::sdf::utils;

/// Tag labels used by the default configuration.
pub mod tags {
    pub const PUBCHEM_CID: &str = "PUBCHEM_CID";
    pub const CHEBI_ID: &str = "CHEBI_ID";
    pub const SYNONYMS: &str = "SYNONYMS";
    pub const INCHI: &str = "INCHI";
    pub const INCHIKEY: &str = "INCHIKEY";
    pub const COMMON_NAME: &str = "COMMON_NAME";
    pub const SYSTEMATIC_NAME: &str = "SYSTEMATIC_NAME";
    pub const EXACT_MASS: &str = "EXACT_MASS";
    pub const FORMULA: &str = "FORMULA";
}

/// Default name tags and the index label each one is served under.
pub const DEFAULT_NAMES: &[(&str, &str)] = &[
    (tags::PUBCHEM_CID, "pubchem"),
    (tags::CHEBI_ID, "chebi"),
    (tags::INCHI, "inchi"),
    (tags::INCHIKEY, "inchikey"),
    (tags::COMMON_NAME, "commname"),
    (tags::SYSTEMATIC_NAME, "sysname"),
];

pub const DEFAULT_ANNOTATIONS: &[&str] = &[tags::EXACT_MASS, tags::FORMULA];

/// Line tokens delimiting the sections of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatMarkers {
    /// Prefix of a data tag line, e.g. `> <` in `> <COMMON_NAME>`.
    pub tag_open: String,
    /// Closes the label on a tag line.
    pub tag_close: String,
    /// Last line of the structure (molfile) block.
    pub structure_end: String,
    /// Line separating records.
    pub record_end: String,
}

impl Default for FormatMarkers {
    fn default() -> Self {
        Self {
            tag_open: "> <".to_string(),
            tag_close: ">".to_string(),
            structure_end: "M  END".to_string(),
            record_end: "$$$$".to_string(),
        }
    }
}

impl FormatMarkers {
    pub fn is_record_end(&self, trimmed: &str) -> bool {
        trimmed == self.record_end
    }

    pub fn is_structure_end(&self, trimmed: &str) -> bool {
        trimmed == self.structure_end
    }

    /// Extracts the label of a tag line, or `None` if the line is not a tag line.
    ///
    /// The label runs from the open marker to the first close marker (or the
    /// end of the line), so trailers like `> <NAME> (12)` are tolerated.
    pub fn tag_label<'a>(&self, trimmed: &'a str) -> Option<&'a str> {
        let rest = trimmed.strip_prefix(self.tag_open.as_str())?;
        let label = match rest.find(self.tag_close.as_str()) {
            Some(end) if !self.tag_close.is_empty() => &rest[..end],
            _ => rest,
        };
        Some(label.trim())
    }
}

/// Everything the reader needs to know before the indexing pass.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Name tags to index, mapped to the label of their [`KeyKind::Name`](super::models::KeyKind::Name).
    pub names: BTreeMap<String, String>,
    /// Tags retrieved with each record but not indexed.
    pub annotations: BTreeSet<String>,
    /// Tag holding the delimiter-separated synonym list.
    pub synonym_tag: Option<String>,
    /// Tag whose value also seeds the synonym index (e.g. `COMMON_NAME`).
    pub common_name_tag: Option<String>,
    pub markers: FormatMarkers,
    /// Per-line text encoding. Must be ASCII compatible.
    pub encoding: &'static Encoding,
    pub normalizer: SynonymNormalizer,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_NAMES
                .iter()
                .map(|(tag, label)| (tag.to_string(), label.to_string()))
                .collect(),
            annotations: DEFAULT_ANNOTATIONS.iter().map(|t| t.to_string()).collect(),
            synonym_tag: Some(tags::SYNONYMS.to_string()),
            common_name_tag: Some(tags::COMMON_NAME.to_string()),
            markers: FormatMarkers::default(),
            encoding: encoding_rs::UTF_8,
            normalizer: SynonymNormalizer::default(),
        }
    }
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared instance of the default configuration.
    pub(crate) fn default_ref() -> &'static IndexConfig {
        static DEFAULT: OnceLock<IndexConfig> = OnceLock::new();
        DEFAULT.get_or_init(IndexConfig::default)
    }

    /// Adds (or relabels) an indexed name tag.
    pub fn with_name(mut self, tag: impl Into<String>, label: impl Into<String>) -> Self {
        self.names.insert(tag.into(), label.into());
        self
    }

    pub fn with_annotation(mut self, tag: impl Into<String>) -> Self {
        self.annotations.insert(tag.into());
        self
    }

    pub fn with_synonym_tag(mut self, tag: Option<&str>) -> Self {
        self.synonym_tag = tag.map(str::to_string);
        self
    }

    pub fn with_common_name_tag(mut self, tag: Option<&str>) -> Self {
        self.common_name_tag = tag.map(str::to_string);
        self
    }

    pub fn with_markers(mut self, markers: FormatMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Selects the text encoding by its WHATWG label (e.g. `"latin1"`).
    pub fn with_encoding(mut self, label: &str) -> Self {
        self.encoding = utils::parse_encoding(label);
        self
    }

    pub fn with_normalizer(mut self, normalizer: SynonymNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Whether values of `tag` are kept in [`Record::name_fields`](super::models::Record::name_fields).
    pub fn is_name_tag(&self, tag: &str) -> bool {
        self.names.contains_key(tag) || self.synonym_tag.as_deref() == Some(tag)
    }

    pub fn is_annotation_tag(&self, tag: &str) -> bool {
        self.annotations.contains(tag)
    }

    /// Value of the configured common-name tag in `record`.
    pub fn common_name<'r>(&self, record: &'r Record) -> Option<&'r str> {
        record.name(self.common_name_tag.as_deref()?)
    }

    /// Raw synonyms of `record`, split on the normalizer's delimiter and trimmed.
    pub fn synonyms<'r>(&self, record: &'r Record) -> Vec<&'r str> {
        let Some(raw) = self.synonym_tag.as_deref().and_then(|tag| record.name(tag)) else {
            return Vec::new();
        };
        raw.split(self.normalizer.delimiter())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Display title of `record` under this configuration.
    ///
    /// Common name, synonyms and systematic name joined by `|`.
    pub fn title(&self, record: &Record) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(self.common_name(record).map(str::trim));
        parts.extend(self.synonyms(record));
        parts.extend(record.name(tags::SYSTEMATIC_NAME).map(str::trim));
        parts.join("|")
    }
}
