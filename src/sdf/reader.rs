use std::fs::{self, File};
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{debug, info, warn};

use super::convert::{Conversion, InputPreference, StructureConverter, StructureInput};
use super::format::lines::LineSource;
use super::format::scanner::{self, RecordScanner, ScanEvent, ScanMode};
use super::format::writer;
use super::index::IndexStore;
use super::iter::RecordIterator;
use super::types::config::IndexConfig;
use super::types::error::{Result, SdfError};
use super::types::models::{FormatWarning, KeyKind, Record};

/// Indexed random-access reader for SDF files.
///
/// Opening a reader scans the whole source once and builds an [`IndexStore`]
/// of byte offsets. Lookups then seek straight to the matching records and
/// re-parse only those.
///
/// The underlying handle sits behind a mutex: every seek-then-scan sequence
/// runs under the lock, so a shared `&SdfReader` can serve several threads.
#[derive(Debug)]
pub struct SdfReader<R = File> {
    source: Mutex<LineSource<R>>,
    name: String,
    config: IndexConfig,
    index: IndexStore,
    warnings: Vec<FormatWarning>,
}

impl SdfReader<File> {
    /// Opens and indexes an SDF file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read. Malformed
    /// records are not errors: they are skipped and listed in [`warnings`](Self::warnings).
    pub fn open(path: impl AsRef<Path>, config: IndexConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening SDF file: {}", path.display());
        let file = File::open(path)?;
        Self::build(file, path.display().to_string(), config)
    }
}

impl<R: Read + Seek> SdfReader<R> {
    /// Indexes any seekable byte source (an in-memory buffer, a socket-backed cache, ...).
    pub fn from_reader(inner: R, config: IndexConfig) -> Result<Self> {
        Self::build(inner, "<reader>".to_string(), config)
    }

    fn build(inner: R, name: String, config: IndexConfig) -> Result<Self> {
        let mut source = LineSource::new(inner, config.encoding)?;
        let (index, warnings) = index_source(&mut source, &config)?;

        info!("Indexed {} records from `{}`", index.len(), name);
        if !warnings.is_empty() {
            warn!("Skipped {} malformed records in `{}`", warnings.len(), name);
        }

        Ok(Self {
            source: Mutex::new(source),
            name,
            config,
            index,
            warnings,
        })
    }

    fn lock_source(&self) -> Result<MutexGuard<'_, LineSource<R>>> {
        self.source.lock().map_err(|_| SdfError::LockPoisoned)
    }

    /// Re-parses the record starting at `offset` (single-record mode).
    pub fn read_record(&self, offset: u64) -> Result<Record> {
        let mut source = self.lock_source()?;
        scanner::read_one(&mut *source, &self.config, offset).map(|scanned| scanned.record)
    }

    /// Retrieves every record matching `key` under `kind`.
    ///
    /// Returns an empty vector for unknown keys or kinds.
    pub fn get(&self, key: &str, kind: &KeyKind) -> Result<Vec<Record>> {
        let offsets = self.index.lookup(kind, key);
        debug!("Lookup {}={:?}: {} offsets", kind, key, offsets.len());
        offsets
            .into_iter()
            .map(|offset| self.read_record(offset))
            .collect()
    }

    /// Retrieves the first record (in file order) matching `key`.
    pub fn get_first(&self, key: &str, kind: &KeyKind) -> Result<Option<Record>> {
        match self.index.lookup(kind, key).first() {
            Some(&offset) => self.read_record(offset).map(Some),
            None => Ok(None),
        }
    }

    /// Returns a fresh lazy iterator over all indexed records in first-seen order.
    pub fn iter_records(&self) -> RecordIterator<'_, R> {
        RecordIterator::new(self, self.index.all_offsets())
    }

    /// Writes every record matching `key` as a molfile into `dir`.
    ///
    /// Files are named `{key}_{common name}_{id}.mol`. Returns the written paths.
    pub fn export_molfiles(
        &self,
        key: &str,
        kind: &KeyKind,
        dir: impl AsRef<Path>,
    ) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut written = Vec::new();
        for record in self.get(key, kind)? {
            let path = dir.join(writer::molfile_name(key, &record, &self.config));
            fs::write(&path, writer::molfile(&record))?;
            debug!("Wrote molfile {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Hands every record matching `key` to a structure converter.
    ///
    /// A failed conversion is reported in its [`Conversion`] and never
    /// affects the index or the other records.
    pub fn molecules<C: StructureConverter>(
        &self,
        key: &str,
        kind: &KeyKind,
        converter: &C,
        preference: InputPreference,
    ) -> Result<Vec<Conversion<C::Molecule, C::Error>>> {
        let records = self.get(key, kind)?;
        Ok(records
            .into_iter()
            .map(|record| {
                let molecule = converter.convert(StructureInput::for_record(&record, preference));
                Conversion { record, molecule }
            })
            .collect())
    }

    /// Releases the reader and returns the underlying source.
    pub fn into_inner(self) -> Result<R> {
        self.source
            .into_inner()
            .map(LineSource::into_inner)
            .map_err(|_| SdfError::LockPoisoned)
    }
}

impl<R> SdfReader<R> {
    /// Number of distinct record ids in the primary index.
    pub fn record_count(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &IndexStore {
        &self.index
    }

    pub fn contains(&self, key: &str, kind: &KeyKind) -> bool {
        self.index.contains(kind, key)
    }

    /// Malformed records skipped while indexing.
    pub fn warnings(&self) -> &[FormatWarning] {
        &self.warnings
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Path of the indexed file, or `<reader>` for in-memory sources.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<'a, R: Read + Seek> IntoIterator for &'a SdfReader<R> {
    type Item = Result<Record>;
    type IntoIter = RecordIterator<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_records()
    }
}

/// Index-mode pass over the whole source.
fn index_source<R: Read + Seek>(
    source: &mut LineSource<R>,
    config: &IndexConfig,
) -> Result<(IndexStore, Vec<FormatWarning>)> {
    source.seek(0)?;

    let mut index = IndexStore::new();
    index.register(KeyKind::Id);
    for label in config.names.values() {
        index.register(KeyKind::name(label.as_str()));
    }
    if config.synonym_tag.is_some() || config.common_name_tag.is_some() {
        index.register(KeyKind::Synonym);
    }

    let mut warnings = Vec::new();
    for event in RecordScanner::new(source, config, ScanMode::Index) {
        match event? {
            ScanEvent::Record(scanned) => index.add_record(&scanned, config),
            ScanEvent::Malformed(warning) => {
                warn!("Skipping malformed {}", warning);
                warnings.push(warning);
            }
        }
    }

    Ok((index, warnings))
}
