//! # sdf-reader
//!
//! An indexed, random-access reader for SDF (structure-data) chemical files.
//!
//! Opening a file scans it once and records the byte offset of every record
//! under its id, its configured name fields and a normalized synonym set.
//! Records are then re-parsed on demand by seeking straight to their offset.
//! The default configuration targets the LipidMaps SDF export.
pub mod sdf;

// Re-export the main types for convenience
pub use sdf::{
    IndexConfig,
    KeyKind,
    Record,
    SdfError,
    SdfReader,
    FormatMarkers,
    FormatWarning,
    SynonymNormalizer,
    Result,
};
