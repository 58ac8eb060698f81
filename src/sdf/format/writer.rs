//! Serializing records back to molfile and SDF text.

use std::io::Write;

use crate::sdf::types::config::{FormatMarkers, IndexConfig};
use crate::sdf::types::error::Result;
use crate::sdf::types::models::Record;

/// Molfile text of a record: id, indented source, comment, structure block.
pub fn molfile(record: &Record) -> String {
    format!(
        "{}\n  {}\n{}\n{}",
        record.id, record.source, record.comment, record.structure_block
    )
}

/// File name used when exporting `record` found under `key`.
///
/// The common name is read from the tag `config` names. Path separators
/// become `.` and spaces in the common name become `..`.
pub fn molfile_name(key: &str, record: &Record, config: &IndexConfig) -> String {
    let common = config
        .common_name(record)
        .map(|name| name.replace('/', ".").replace(' ', ".."))
        .unwrap_or_default();
    format!("{}_{}_{}.mol", key.replace('/', "."), common, record.id)
}

/// Writes `record` as one complete SDF entry, record terminator included.
///
/// Re-scanning the output with the same markers and tags yields a record
/// equal to `record`, provided it was read in full mode.
pub fn write_record<W: Write>(out: &mut W, record: &Record, markers: &FormatMarkers) -> Result<()> {
    write!(out, "{}", molfile(record))?;
    if !record.structure_block.is_empty() && !record.structure_block.ends_with('\n') {
        writeln!(out)?;
    }
    for (tag, value) in record.name_fields.iter().chain(&record.annotation_fields) {
        writeln!(out, "{}{}{}", markers.tag_open, tag, markers.tag_close)?;
        writeln!(out, "{}", value)?;
        writeln!(out)?;
    }
    writeln!(out, "{}", markers.record_end)?;
    Ok(())
}

/// Serializes a sequence of records into an SDF document.
pub fn write_records<'a, W: Write>(
    out: &mut W,
    records: impl IntoIterator<Item = &'a Record>,
    markers: &FormatMarkers,
) -> Result<()> {
    for record in records {
        write_record(out, record, markers)?;
    }
    Ok(())
}
