//! Core SDF reader module

pub mod convert;
pub mod format;
pub mod index;
pub mod iter;
pub mod reader;
pub mod synonyms;
pub mod types;
mod utils;

pub use convert::{Conversion, InputPreference, StructureConverter, StructureInput};
pub use index::IndexStore;
pub use iter::RecordIterator;
pub use reader::SdfReader;
pub use synonyms::{SynonymNormalizer, SynonymPatterns};
pub use types::config::{tags, FormatMarkers, IndexConfig};
pub use types::error::{Result, SdfError};
pub use types::models::{FormatWarning, KeyKind, Record, WarningKind};
