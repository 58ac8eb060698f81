//! # Record Scanner
//!
//! A line-driven state machine recognizing the sections of an SDF record:
//!
//! ```text
//! AwaitStart ─ id line ─▶ StructureHeader ─ source line ─▶ StructureCounts
//!     ▲                                                        │ first line starting with a digit
//!     │                                                        ▼
//!     │  record end       AwaitFieldTag ◀─ structure end ── StructureBody
//!     └──────────────────── ▲       │ tag line
//!                           │       ▼
//!                           └─ FieldValue
//! ```
//!
//! The per-record accumulator is created when an id line is seen and
//! consumed when the record is emitted, so nothing leaks from one record into
//! the next. A record whose terminator is missing ends where the next one
//! begins: a plain line right after the structure end or after a blank line
//! in the field block is taken as the next record's id. The same machine serves the indexing pass ([`ScanMode::Index`],
//! structure lines skipped) and single-record re-parsing ([`ScanMode::Full`]).

use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::mem;

use log::{debug, trace};

use super::lines::{Line, LineSource};
use crate::sdf::types::config::IndexConfig;
use crate::sdf::types::error::{Result, SdfError};
use crate::sdf::types::models::{FormatWarning, Record, WarningKind};

/// How much of each record the scanner materializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Skip structure lines; only ids and field values are kept.
    Index,
    /// Keep everything, including the verbatim structure block.
    Full,
}

/// A completed record together with its canonical offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRecord {
    pub offset: u64,
    pub record: Record,
}

/// What the scanner produces for each record it walks over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Record(ScannedRecord),
    Malformed(FormatWarning),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitStart,
    StructureHeader,
    StructureCounts,
    StructureBody,
    AwaitFieldTag,
    FieldValue,
}

/// Fields of the record currently being scanned.
#[derive(Debug, Default)]
struct Accumulator {
    offset: u64,
    id: String,
    source: String,
    comment: Vec<String>,
    structure: String,
    names: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
    pending_tag: Option<String>,
}

impl Accumulator {
    fn start(offset: u64, id: &str) -> Self {
        Self {
            offset,
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn into_scanned(self) -> ScannedRecord {
        ScannedRecord {
            offset: self.offset,
            record: Record {
                id: self.id,
                source: self.source,
                comment: self.comment.join(" "),
                structure_block: self.structure,
                name_fields: self.names,
                annotation_fields: self.annotations,
            },
        }
    }

    fn warning(self, kind: WarningKind) -> FormatWarning {
        FormatWarning {
            offset: self.offset,
            id: Some(self.id),
            kind,
        }
    }
}

/// Streaming scanner over a [`LineSource`].
///
/// Yields one [`ScanEvent`] per record, starting wherever the source is
/// currently positioned. An I/O error is yielded once and ends the scan.
pub struct RecordScanner<'a, R> {
    source: &'a mut LineSource<R>,
    config: &'a IndexConfig,
    mode: ScanMode,
    state: State,
    current: Accumulator,
    /// Field block is at a break (structure end or blank line) where an id may start.
    at_break: bool,
    done: bool,
}

impl<'a, R: Read + Seek> RecordScanner<'a, R> {
    pub fn new(source: &'a mut LineSource<R>, config: &'a IndexConfig, mode: ScanMode) -> Self {
        Self {
            source,
            config,
            mode,
            state: State::AwaitStart,
            current: Accumulator::default(),
            at_break: false,
            done: false,
        }
    }

    fn take_current(&mut self) -> Accumulator {
        self.state = State::AwaitStart;
        mem::take(&mut self.current)
    }

    fn emit_record(&mut self) -> ScanEvent {
        let scanned = self.take_current().into_scanned();
        trace!("Record `{}` complete at byte {}", scanned.record.id, scanned.offset);
        ScanEvent::Record(scanned)
    }

    fn emit_malformed(&mut self, kind: WarningKind) -> ScanEvent {
        let warning = self.take_current().warning(kind);
        debug!("Skipping malformed {}", warning);
        ScanEvent::Malformed(warning)
    }

    fn store_field(&mut self, tag: String, value: String) {
        if self.config.is_name_tag(&tag) {
            self.current.names.insert(tag, value);
        } else if self.config.is_annotation_tag(&tag) {
            self.current.annotations.insert(tag, value);
        } else {
            trace!("Dropping unrecognized tag <{}>", tag);
        }
    }

    fn flush_pending_tag(&mut self) {
        if let Some(tag) = self.current.pending_tag.take() {
            self.store_field(tag, String::new());
        }
    }

    fn push_structure_line(&mut self, line: &Line) {
        if self.mode == ScanMode::Full {
            self.current.structure.push_str(&line.text);
            self.current.structure.push_str(line.ending);
        }
        if self.config.markers.is_structure_end(line.trimmed()) {
            self.state = State::AwaitFieldTag;
            self.at_break = true;
        }
    }

    /// Field-block handling shared by `AwaitFieldTag` and an interrupted `FieldValue`.
    fn field_line(&mut self, line: &Line) -> Option<ScanEvent> {
        let trimmed = line.trimmed();
        let config = self.config;
        let markers = &config.markers;
        if markers.is_record_end(trimmed) {
            return Some(self.emit_record());
        }
        if let Some(label) = markers.tag_label(trimmed) {
            self.current.pending_tag = Some(label.to_string());
            self.state = State::FieldValue;
            self.at_break = false;
        } else if trimmed.is_empty() {
            self.at_break = true;
        } else if self.at_break {
            debug!(
                "Record `{}` has no terminator, `{}` at byte {} starts the next one",
                self.current.id, trimmed, line.offset
            );
            let event = self.emit_record();
            self.current = Accumulator::start(line.offset, trimmed);
            self.state = State::StructureHeader;
            return Some(event);
        }
        // Anything else is a continuation of a multi-line value and is ignored.
        None
    }

    /// Feeds one line through the state machine.
    fn advance(&mut self, line: Line) -> Option<ScanEvent> {
        let trimmed = line.trimmed();
        let config = self.config;
        let markers = &config.markers;

        match self.state {
            State::AwaitStart => {
                if !trimmed.is_empty() && !markers.is_record_end(trimmed) {
                    self.current = Accumulator::start(line.offset, trimmed);
                    self.state = State::StructureHeader;
                }
                None
            }
            State::StructureHeader => {
                if markers.is_record_end(trimmed) {
                    return Some(self.emit_malformed(WarningKind::UnexpectedRecordEnd));
                }
                self.current.source = trimmed.to_string();
                self.state = State::StructureCounts;
                None
            }
            State::StructureCounts => {
                if markers.is_record_end(trimmed) {
                    return Some(self.emit_malformed(WarningKind::UnexpectedRecordEnd));
                }
                if trimmed.starts_with(|c: char| c.is_ascii_digit()) {
                    self.state = State::StructureBody;
                    self.push_structure_line(&line);
                } else if !trimmed.is_empty() {
                    self.current.comment.push(trimmed.to_string());
                }
                None
            }
            State::StructureBody => {
                if markers.is_record_end(trimmed) {
                    return Some(self.emit_malformed(WarningKind::UnexpectedRecordEnd));
                }
                self.push_structure_line(&line);
                None
            }
            State::AwaitFieldTag => self.field_line(&line),
            State::FieldValue => {
                if trimmed.is_empty() {
                    return None;
                }
                if markers.is_record_end(trimmed) || markers.tag_label(trimmed).is_some() {
                    self.flush_pending_tag();
                    return self.field_line(&line);
                }
                if let Some(tag) = self.current.pending_tag.take() {
                    self.store_field(tag, trimmed.to_string());
                }
                self.state = State::AwaitFieldTag;
                self.at_break = false;
                None
            }
        }
    }

    /// Closes whatever record is open when the input runs out.
    fn finish(&mut self) -> Option<ScanEvent> {
        match self.state {
            State::AwaitStart => None,
            State::StructureHeader | State::StructureCounts | State::StructureBody => {
                Some(self.emit_malformed(WarningKind::MissingStructureEnd))
            }
            State::AwaitFieldTag | State::FieldValue => {
                self.flush_pending_tag();
                Some(self.emit_record())
            }
        }
    }
}

impl<'a, R: Read + Seek> Iterator for RecordScanner<'a, R> {
    type Item = Result<ScanEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.source.next_line() {
                Ok(Some(line)) => {
                    if let Some(event) = self.advance(line) {
                        return Some(Ok(event));
                    }
                }
                Ok(None) => {
                    self.done = true;
                    return self.finish().map(Ok);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Single-record mode: seeks to `offset` and fully parses exactly one record.
pub fn read_one<R: Read + Seek>(
    source: &mut LineSource<R>,
    config: &IndexConfig,
    offset: u64,
) -> Result<ScannedRecord> {
    source.seek(offset)?;
    match RecordScanner::new(source, config, ScanMode::Full).next() {
        Some(Ok(ScanEvent::Record(scanned))) => Ok(scanned),
        Some(Ok(ScanEvent::Malformed(warning))) => Err(SdfError::MalformedRecord {
            offset,
            reason: warning.kind.to_string(),
        }),
        Some(Err(e)) => Err(e),
        None => Err(SdfError::RecordNotFound { offset }),
    }
}
