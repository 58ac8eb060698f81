//! Text format layer for SDF files.
//!
//! This module bridges raw file I/O and the high-level
//! [`SdfReader`](crate::sdf::reader::SdfReader).
//!
//! # Module Organization
//!
//! - [`lines`]: byte-exact line source over a seekable stream
//! - [`scanner`]: the record state machine (index mode and single-record mode)
//! - [`writer`]: serializes records back to molfile/SDF text
//!
//! # Record Layout
//!
//! ```text
//! ┌──────────────────────┐
//! │ id line              │ ← canonical offset points here
//! │ source line          │
//! │ comment line(s)      │
//! ├──────────────────────┤
//! │ counts line          │
//! │ atom/bond block      │ ← structure block (verbatim)
//! │ M  END               │
//! ├──────────────────────┤
//! │ > <TAG>              │
//! │ value                │ ← name / annotation fields
//! │ ...                  │
//! ├──────────────────────┤
//! │ $$$$                 │
//! └──────────────────────┘
//! ```

pub mod lines;
pub mod scanner;
pub mod writer;
