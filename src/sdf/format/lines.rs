//! Byte-exact line source over a seekable stream.
//!
//! Lines are read as raw bytes and decoded one at a time, so the offsets the
//! scanner records are measured before decoding and stay exact for
//! multi-byte encodings.

use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use encoding_rs::Encoding;
use log::trace;

use crate::sdf::types::error::Result;
use crate::sdf::utils;

/// One decoded line and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Decoded text without the line terminator.
    pub text: String,
    /// The terminator exactly as found: `"\n"`, `"\r\n"` or `""` at end of input.
    pub ending: &'static str,
    /// Byte offset of the first byte of the line.
    pub offset: u64,
    /// Number of raw bytes consumed, terminator included.
    pub len: u64,
}

impl Line {
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Sequential line reader with random repositioning.
///
/// Not meant to be shared between logical readers: every `seek` moves the one
/// cursor. [`SdfReader`](crate::sdf::reader::SdfReader) keeps it behind a lock.
#[derive(Debug)]
pub struct LineSource<R> {
    inner: BufReader<R>,
    encoding: &'static Encoding,
    position: u64,
    end: u64,
    buf: Vec<u8>,
}

impl<R: Read + Seek> LineSource<R> {
    /// Wraps `inner`, measuring its length and rewinding it to the start.
    pub fn new(inner: R, encoding: &'static Encoding) -> Result<Self> {
        let mut inner = BufReader::new(inner);
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        trace!("Line source opened: {} bytes, encoding={}", end, encoding.name());
        Ok(Self {
            inner,
            encoding,
            position: 0,
            end,
            buf: Vec::new(),
        })
    }

    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    /// Offset one past the last byte of the stream.
    pub fn len(&self) -> u64 {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.end
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Reads the next line, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<Line>> {
        self.buf.clear();
        let consumed = self.inner.read_until(b'\n', &mut self.buf)?;
        if consumed == 0 {
            return Ok(None);
        }

        let offset = self.position;
        self.position += consumed as u64;

        let (content, ending) = utils::split_line_ending(&self.buf);
        let ending = match ending {
            b"\r\n" => "\r\n",
            b"\n" => "\n",
            _ => "",
        };
        let text = if offset == 0 {
            self.encoding.decode_with_bom_removal(content).0
        } else {
            self.encoding.decode_without_bom_handling(content).0
        };

        Ok(Some(Line {
            text: text.into_owned(),
            ending,
            offset,
            len: consumed as u64,
        }))
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}
