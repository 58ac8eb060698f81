//! Lazy iteration over indexed records.
//!
//! # Example
//! ```no_run
//! # use sdf_reader::{IndexConfig, SdfReader};
//! # let reader = SdfReader::open("structures.sdf", IndexConfig::default()).unwrap();
//! for record in reader.iter_records() {
//!     let record = record.unwrap();
//!     println!("{}: {}", record.id, record.title());
//! }
//! ```

use std::io::{Read, Seek};
use std::vec::IntoIter;

use super::reader::SdfReader;
use super::types::error::Result;
use super::types::models::Record;

/// Iterator re-parsing every indexed record in first-seen order.
///
/// Holds its own snapshot of offsets, so several iterators over the same
/// reader are independent. Each step seeks and scans one record under the
/// reader's lock.
///
/// Created by [`SdfReader::iter_records()`](crate::SdfReader::iter_records).
pub struct RecordIterator<'a, R> {
    reader: &'a SdfReader<R>,
    offsets: IntoIter<u64>,
}

impl<'a, R: Read + Seek> RecordIterator<'a, R> {
    pub(super) fn new(reader: &'a SdfReader<R>, offsets: Vec<u64>) -> Self {
        Self {
            reader,
            offsets: offsets.into_iter(),
        }
    }

    /// Pairs each record with the offset it was read from.
    pub fn with_offsets(self) -> impl Iterator<Item = Result<(u64, Record)>> + 'a {
        let reader = self.reader;
        self.offsets
            .map(move |offset| reader.read_record(offset).map(|record| (offset, record)))
    }
}

impl<'a, R: Read + Seek> Iterator for RecordIterator<'a, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offsets.next()?;
        Some(self.reader.read_record(offset))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.offsets.size_hint()
    }
}

impl<'a, R: Read + Seek> ExactSizeIterator for RecordIterator<'a, R> {}
