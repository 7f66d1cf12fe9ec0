//! The config store
//!
//! A [`Store`] owns every entry of one file plus an error log. Data problems
//! (bad lines, unknown ids, type mismatches) never surface as `Err`: they are
//! recorded in the log and the call falls back to a no-op or zero value.
//! Methods that may record take `&mut self`.
//!
//! A store is not synchronized; callers sharing one across threads must
//! serialize access themselves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::domain::{decode_hex, is_valid_id, ConfigValue, Entry, Point, Rect, TypeTag};

use super::diagnostics::Diagnostics;
use super::error::{ConfigError, Severity};
use super::format;
use super::fs::{FileProvider, OsFs};
use super::options::{ComponentErrors, HexPrefix, StoreOptions};

/// Typed entries for one config file
#[derive(Debug)]
pub struct Store<F: FileProvider = OsFs> {
    path: PathBuf,
    header: String,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    diagnostics: Diagnostics,
    options: StoreOptions,
    /// Set once a load read the file; a later unreadable file is then an error
    seen_on_disk: bool,
    fs: F,
}

impl Default for Store<OsFs> {
    fn default() -> Self {
        Self::with_provider(OsFs, PathBuf::new(), "", StoreOptions::default())
    }
}

impl Store<OsFs> {
    /// Opens the store at `path`, loading it if the file is readable
    pub fn new(path: impl Into<PathBuf>, header: impl Into<String>) -> Self {
        Self::with_options(path, header, StoreOptions::default())
    }

    pub fn with_options(
        path: impl Into<PathBuf>,
        header: impl Into<String>,
        options: StoreOptions,
    ) -> Self {
        Self::with_provider(OsFs, path, header, options)
    }
}

impl<F: FileProvider> Store<F> {
    /// Opens a store backed by `fs` and loads it
    pub fn with_provider(
        fs: F,
        path: impl Into<PathBuf>,
        header: impl Into<String>,
        options: StoreOptions,
    ) -> Self {
        let mut store = Self {
            path: path.into(),
            header: header.into(),
            entries: Vec::new(),
            index: HashMap::new(),
            diagnostics: Diagnostics::new(),
            options,
            seen_on_disk: false,
            fs,
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    fn has_path(&self) -> bool {
        !self.path.as_os_str().is_empty()
    }

    /// True if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if a path is set and the file exists and is readable
    pub fn can_load(&self) -> bool {
        self.has_path() && self.fs.can_read(&self.path)
    }

    /// True if a path is set and the file could be written
    pub fn can_write(&self) -> bool {
        self.has_path() && self.fs.can_write(&self.path)
    }

    /// Reads the file, replacing the in-memory entries
    ///
    /// With no path, or a file that is not there, nothing changes. An
    /// unreadable file is only an error once it has been loaded before.
    pub fn load(&mut self) {
        if !self.has_path() {
            return;
        }

        if !self.fs.can_read(&self.path) {
            if self.seen_on_disk {
                self.record(ConfigError::Unreadable(self.path.clone()));
            } else {
                debug!(path = %self.path.display(), "config file not present, nothing loaded");
            }
            return;
        }

        let bytes = match self.fs.read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "config file read failed");
                self.record(ConfigError::Unreadable(self.path.clone()));
                return;
            }
        };
        self.seen_on_disk = true;

        self.entries.clear();
        self.index.clear();

        let doc = format::parse_bytes(&bytes);
        if let Some(header) = doc.header {
            self.header = header;
        }
        let parse_errors = doc.errors.len();
        for err in doc.errors {
            self.record(err);
        }
        for entry in doc.entries {
            self.add(entry, false);
        }

        debug!(
            path = %self.path.display(),
            entries = self.entries.len(),
            errors = parse_errors,
            "loaded config"
        );
    }

    /// Writes header and entries to the file
    ///
    /// Does nothing without a path. A failed write records a Fatal error.
    pub fn write(&mut self) {
        if !self.has_path() {
            return;
        }

        let text = format::render(&self.header, &self.entries, self.options.write_comments);
        match self.fs.write_replace(&self.path, &text) {
            Ok(()) => {
                self.seen_on_disk = true;
                debug!(
                    path = %self.path.display(),
                    entries = self.entries.len(),
                    "wrote config"
                );
            }
            Err(source) => self.record(ConfigError::Unwritable {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// True if an entry with this exact id exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    /// First entry in insertion order
    pub fn first(&self) -> Option<&Entry> {
        self.entries.first()
    }

    /// All entries in insertion order
    pub fn entries(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Inserts an entry
    ///
    /// If the id is taken the entry is rejected with an error, unless
    /// `replace` is set: then value, type and comment are copied onto the
    /// existing entry in place. A replacement whose text does not decode
    /// under its type is rejected. Returns whether the store changed.
    pub fn add(&mut self, entry: Entry, replace: bool) -> bool {
        if !is_valid_id(entry.id()) {
            self.record(ConfigError::InvalidId(entry.id().to_string()));
            return false;
        }

        match self.index.get(entry.id()).copied() {
            None => {
                self.index.insert(entry.id().to_string(), self.entries.len());
                self.entries.push(entry);
                true
            }
            Some(pos) if replace => {
                if !entry.is_well_formed() {
                    self.record(ConfigError::InvalidReplacement {
                        id: entry.id().to_string(),
                        tag: entry.tag(),
                        value: entry.value().to_string(),
                    });
                    return false;
                }
                self.entries[pos].replace_with(entry);
                true
            }
            Some(_) => {
                self.record(ConfigError::Duplicate(entry.id().to_string()));
                false
            }
        }
    }

    pub fn add_value<T: ConfigValue>(&mut self, id: &str, comment: &str, value: &T, replace: bool) -> bool {
        self.add(Entry::new(id, comment, value), replace)
    }

    pub fn add_int(&mut self, id: &str, comment: &str, value: i64, replace: bool) -> bool {
        self.add_value(id, comment, &value, replace)
    }

    pub fn add_float(&mut self, id: &str, comment: &str, value: f32, replace: bool) -> bool {
        self.add_value(id, comment, &value, replace)
    }

    pub fn add_bool(&mut self, id: &str, comment: &str, value: bool, replace: bool) -> bool {
        self.add_value(id, comment, &value, replace)
    }

    pub fn add_string(&mut self, id: &str, comment: &str, value: &str, replace: bool) -> bool {
        self.add_value(id, comment, &value.to_string(), replace)
    }

    pub fn add_point(&mut self, id: &str, comment: &str, value: Point, replace: bool) -> bool {
        self.add_value(id, comment, &value, replace)
    }

    pub fn add_rect(&mut self, id: &str, comment: &str, value: Rect, replace: bool) -> bool {
        self.add_value(id, comment, &value, replace)
    }

    /// Removes an entry, keeping the order of the rest
    pub fn remove(&mut self, id: &str) -> Option<Entry> {
        let Some(pos) = self.index.remove(id) else {
            self.record(ConfigError::Missing(id.to_string()));
            return None;
        };

        let removed = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    fn position_of(&self, id: &str, tag: TypeTag) -> Result<usize, ConfigError> {
        let pos = *self
            .index
            .get(id)
            .ok_or_else(|| ConfigError::Missing(id.to_string()))?;

        let stored = self.entries[pos].tag();
        if stored != tag {
            return Err(ConfigError::TypeMismatch {
                id: id.to_string(),
                stored,
                requested: tag,
            });
        }
        Ok(pos)
    }

    /// Reads a value without touching the error log
    pub fn try_get<T: ConfigValue>(&self, id: &str) -> Result<T, ConfigError> {
        let pos = self.position_of(id, T::TAG)?;
        T::decode(self.entries[pos].value()).map_err(|failures| ConfigError::Conversion {
            id: id.to_string(),
            tag: T::TAG,
            failures,
        })
    }

    /// Reads a value, recording an error and returning the zero value on failure
    pub fn get<T: ConfigValue>(&mut self, id: &str) -> T {
        match self.try_get(id) {
            Ok(value) => value,
            Err(err) => {
                self.record(err);
                T::default()
            }
        }
    }

    /// Like [`Store::get`] but never records anything
    pub fn get_silent<T: ConfigValue>(&self, id: &str) -> T {
        self.try_get(id).unwrap_or_default()
    }

    pub fn get_int(&mut self, id: &str) -> i64 {
        self.get(id)
    }

    pub fn get_float(&mut self, id: &str) -> f32 {
        self.get(id)
    }

    pub fn get_bool(&mut self, id: &str) -> bool {
        self.get(id)
    }

    pub fn get_string(&mut self, id: &str) -> String {
        self.get(id)
    }

    pub fn get_point(&mut self, id: &str) -> Point {
        self.get(id)
    }

    pub fn get_rect(&mut self, id: &str) -> Rect {
        self.get(id)
    }

    /// Reads a string entry holding `0x`-prefixed hexadecimal
    ///
    /// A missing prefix yields `Ok(0)` under [`HexPrefix::Lenient`].
    pub fn try_hex(&self, id: &str) -> Result<i64, ConfigError> {
        let pos = self.position_of(id, TypeTag::String)?;
        match decode_hex(self.entries[pos].value()) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => match self.options.hex_prefix {
                HexPrefix::Lenient => Ok(0),
                HexPrefix::Strict => Err(ConfigError::MissingHexPrefix(id.to_string())),
            },
            Err(failure) => Err(ConfigError::Conversion {
                id: id.to_string(),
                tag: TypeTag::String,
                failures: vec![failure],
            }),
        }
    }

    pub fn get_hex(&mut self, id: &str) -> i64 {
        match self.try_hex(id) {
            Ok(value) => value,
            Err(err) => {
                self.record(err);
                0
            }
        }
    }

    /// Overwrites an existing entry of the same type
    ///
    /// Unknown ids and type mismatches are recorded and leave the store
    /// unchanged; the type is never coerced.
    pub fn set<T: ConfigValue>(&mut self, id: &str, value: T) -> bool {
        match self.position_of(id, T::TAG) {
            Ok(pos) => {
                self.entries[pos].set(&value);
                true
            }
            Err(err) => {
                self.record(err);
                false
            }
        }
    }

    pub fn set_int(&mut self, id: &str, value: i64) -> bool {
        self.set(id, value)
    }

    pub fn set_float(&mut self, id: &str, value: f32) -> bool {
        self.set(id, value)
    }

    pub fn set_bool(&mut self, id: &str, value: bool) -> bool {
        self.set(id, value)
    }

    pub fn set_string(&mut self, id: &str, value: &str) -> bool {
        self.set(id, value.to_string())
    }

    pub fn set_point(&mut self, id: &str, value: Point) -> bool {
        self.set(id, value)
    }

    pub fn set_rect(&mut self, id: &str, value: Rect) -> bool {
        self.set(id, value)
    }

    /// Sets an entry from text, interpreted as the entry's current type
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        let Some(&pos) = self.index.get(id) else {
            self.record(ConfigError::Missing(id.to_string()));
            return false;
        };

        let tag = self.entries[pos].tag();
        match tag.canonicalize(text) {
            Ok(value) => {
                self.entries[pos].set_encoded(tag, value);
                true
            }
            Err(failures) => {
                self.record(ConfigError::Conversion {
                    id: id.to_string(),
                    tag,
                    failures,
                });
                false
            }
        }
    }

    /// Adds an error to the log
    pub fn record(&mut self, err: ConfigError) {
        let errors = match self.options.component_errors {
            ComponentErrors::PerComponent => err.split_components(),
            ComponentErrors::Aggregate => vec![err],
        };

        for err in errors {
            let severity = err.severity();
            match severity {
                Severity::Fatal => warn!(path = %self.path.display(), error = %err, "fatal config error"),
                Severity::Normal => trace!(path = %self.path.display(), error = %err, "config error"),
            }
            self.diagnostics.record(err.to_string(), severity);
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn has_fatal_errors(&self) -> bool {
        self.diagnostics.has_fatal()
    }

    /// Human-readable summary of the first few errors
    pub fn error_message(&self) -> String {
        self.diagnostics.render(
            &self.path.display().to_string(),
            self.options.max_reported_errors,
        )
    }
}
