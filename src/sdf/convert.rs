//! Hand-off to an external structure toolkit.
//!
//! The reader does not interpret structures. A downstream toolkit implements
//! [`StructureConverter`] and receives either the record's InChI or its
//! molfile text.

use super::format::writer;
use super::types::models::Record;

/// Which representation to hand to the converter when both are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputPreference {
    /// Use the InChI name field, falling back to the molfile when it is missing.
    #[default]
    InChI,
    /// Always use the molfile built from the structure block.
    Molfile,
}

/// The textual structure passed to a converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureInput<'a> {
    InChI(&'a str),
    Molfile(String),
}

impl<'a> StructureInput<'a> {
    pub fn for_record(record: &'a Record, preference: InputPreference) -> Self {
        match (preference, record.inchi()) {
            (InputPreference::InChI, Some(inchi)) if !inchi.is_empty() => StructureInput::InChI(inchi),
            _ => StructureInput::Molfile(writer::molfile(record)),
        }
    }
}

/// A chemistry toolkit turning structure text into its own molecule type.
pub trait StructureConverter {
    type Molecule;
    type Error;

    fn convert(&self, input: StructureInput<'_>) -> std::result::Result<Self::Molecule, Self::Error>;
}

/// A retrieved record and the outcome of converting it.
#[derive(Debug)]
pub struct Conversion<M, E> {
    pub record: Record,
    pub molecule: std::result::Result<M, E>,
}
