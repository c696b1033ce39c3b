//! The record store.
//!
//! A [`RecordSet`] reads records in this order:
//! 1. the lookahead pulled by [`RecordSet::peek`]
//! 2. the record handed back by [`RecordSet::stash`]
//! 3. the replay left behind by a non-destructive scan
//! 4. the resource
//!
//! End of stream is `Ok(None)`.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::mem;
use std::path::Path;

use super::config::StoreConfig;
use super::cursor::CursorState;
use super::echo::{EchoBuffer, ReplayReader};
use super::errors::{StoreError, StoreResult};
use super::resource::{Closer, Resource};
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::record::{Record, RowReader, RowWriter};
use crate::schema::{Headers, SchemaError};

/// A schema plus a forward-only stream of records over one resource.
pub struct RecordSet {
    headers: Headers,
    config: StoreConfig,
    reader: RowReader<Box<dyn Read>>,
    writer: RowWriter<Box<dyn Write>>,
    closer: Option<Box<dyn Closer>>,
    cursor: CursorState,
    replay: Option<ReplayReader>,
}

impl RecordSet {
    /// Empty in-memory store with default configuration and no headers.
    pub fn new() -> Self {
        Self::assemble(Resource::memory(), Headers::default(), StoreConfig::default())
    }

    /// Empty in-memory store.
    ///
    /// Fails when `config` does not validate.
    pub fn with_config(config: StoreConfig) -> StoreResult<Self> {
        Self::from_resource(Resource::memory(), Headers::default(), config)
    }

    /// Store over `resource` whose contents are records only, no headers
    /// line.
    pub fn from_resource(
        resource: Resource,
        headers: Headers,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self::assemble(resource, headers, config))
    }

    /// Builds the store from a config that has already been validated.
    fn assemble(resource: Resource, headers: Headers, config: StoreConfig) -> Self {
        let dialect = config.dialect();
        let (reader, writer, closer) = resource.into_parts();
        Self {
            headers,
            config,
            reader: RowReader::new(reader, dialect),
            writer: RowWriter::new(writer, dialect),
            closer,
            cursor: CursorState::Idle,
            replay: None,
        }
    }

    /// Opens a store whose first line is the headers row, with default
    /// configuration.
    pub fn open(resource: Resource) -> StoreResult<Self> {
        Self::open_with_config(resource, StoreConfig::default())
    }

    /// Opens a store whose first line is the headers row.
    ///
    /// The first data row is read ahead so that a file whose rows disagree
    /// with its headers is rejected here rather than on first use.
    pub fn open_with_config(resource: Resource, config: StoreConfig) -> StoreResult<Self> {
        let mut set = Self::from_resource(resource, Headers::default(), config)?;

        let header = set
            .reader
            .read_row()
            .map_err(|e| StoreError::codec("read headers", e))?
            .ok_or_else(|| SchemaError::unreadable("missing headers line"))?;
        set.headers = Headers::from_fields(header.into_values());

        // The first data row, not the headers row, fixes the row width.
        set.reader.set_expected_fields(None);
        if let Some(first) = set
            .reader
            .read_row()
            .map_err(|e| StoreError::codec("read", e))?
        {
            if first.len() != set.headers.len() {
                return Err(SchemaError::field_count(set.headers.len(), first.len()).into());
            }
            set.cursor = CursorState::Lookahead(first);
        }

        log_event_with_fields(
            Event::StoreOpened,
            &[("fields", &set.headers.len().to_string())],
        );
        Ok(set)
    }

    /// Opens the file at `path` for reading and appending.
    pub fn open_path(path: &Path, config: StoreConfig) -> StoreResult<Self> {
        let resource = Resource::open_file(path).map_err(|e| StoreError::io("open", e))?;
        Self::open_with_config(resource, config)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn set_headers(&mut self, headers: Headers) {
        self.headers = headers;
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Imports a JSON field dictionary into the headers.
    pub fn set_dictionary(&mut self, blob: &[u8]) -> StoreResult<()> {
        match self.headers.set_dictionary(blob) {
            Ok(()) => {
                let entries = self.headers.dictionary().map_or(0, |d| d.len());
                log_event_with_fields(
                    Event::DictionaryAttached,
                    &[("entries", &entries.to_string())],
                );
                Ok(())
            }
            Err(e) => {
                log_event_with_fields(Event::DictionaryRejected, &[("reason", e.message())]);
                Err(e.into())
            }
        }
    }

    /// Next record, or `None` at end of stream.
    pub fn read(&mut self) -> StoreResult<Option<Record>> {
        let (pending, next) = mem::take(&mut self.cursor).take();
        self.cursor = next;
        if pending.is_some() {
            return Ok(pending);
        }
        self.read_source()
    }

    /// Next record without consuming it.
    pub fn peek(&mut self) -> StoreResult<Option<&Record>> {
        if self.cursor.is_idle() {
            if let Some(rec) = self.read_source()? {
                self.cursor = CursorState::Lookahead(rec);
            }
        }
        Ok(self.cursor.front())
    }

    /// Makes `rec` the next record returned by `read`, after any pending
    /// lookahead. Replaces a previous stash.
    pub fn stash(&mut self, rec: Record) {
        self.cursor = mem::take(&mut self.cursor).stash(rec);
    }

    /// Buffers `rec` for writing. Call [`RecordSet::flush`] to push it to
    /// the resource.
    pub fn write(&mut self, rec: &Record) -> StoreResult<()> {
        self.writer
            .write_record(rec)
            .map_err(|e| StoreError::io("write", e))
    }

    /// Pushes buffered writes to the resource.
    pub fn flush(&mut self) -> StoreResult<()> {
        self.writer.flush().map_err(|e| StoreError::io("flush", e))
    }

    /// Flushes, runs the closer if there is one and releases the resource.
    ///
    /// Afterwards reads return `None` and writes are discarded. Closing again
    /// does nothing.
    pub fn close(&mut self) -> StoreResult<()> {
        let flushed = self.flush();

        let dialect = self.config.dialect();
        self.reader = RowReader::new(Box::new(io::empty()), dialect);
        self.writer = RowWriter::new(Box::new(io::sink()), dialect);
        self.cursor = CursorState::Idle;
        self.replay = None;

        let closed = match self.closer.take() {
            Some(closer) => {
                let result = closer.close().map_err(|e| StoreError::io("close", e));
                log_event_with_fields(Event::StoreClosed, &[("fields", &self.headers.len().to_string())]);
                result
            }
            None => Ok(()),
        };

        flushed?;
        closed
    }

    /// Writes the headers row then every remaining record to `w`.
    ///
    /// Returns the number of records written. The store is drained.
    pub fn write_to<W: Write>(&mut self, w: W) -> StoreResult<usize> {
        let scope = ObservationScope::new("SAVE");
        match self.write_all_to(w) {
            Ok(n) => {
                scope.complete_with_fields(&[("records", &n.to_string())]);
                Ok(n)
            }
            Err(e) => {
                scope.fail(&e.to_string());
                Err(e)
            }
        }
    }

    /// Creates or truncates `path` and writes the store to it.
    pub fn save(&mut self, path: &Path) -> StoreResult<usize> {
        let mut file = File::create(path).map_err(|e| StoreError::io("save", e))?;
        let n = self.write_to(&mut file)?;
        file.sync_all().map_err(|e| StoreError::io("save", e))?;
        Ok(n)
    }

    /// Iterator over the remaining records.
    pub fn records(&mut self) -> Records<'_> {
        Records {
            set: self,
            error: None,
        }
    }

    fn write_all_to<W: Write>(&mut self, w: W) -> StoreResult<usize> {
        let threshold = self.config.flush_threshold;
        let mut out = RowWriter::new(w, self.config.dialect());
        out.write_row(self.headers.fields())
            .map_err(|e| StoreError::io("save", e))?;

        let mut n = 0usize;
        while let Some(rec) = self.read()? {
            out.write_record(&rec)
                .map_err(|e| StoreError::io("save", e))?;
            n += 1;
            if n % threshold == 0 {
                out.flush().map_err(|e| StoreError::io("save", e))?;
            }
        }
        out.flush().map_err(|e| StoreError::io("save", e))?;
        Ok(n)
    }

    fn read_source(&mut self) -> StoreResult<Option<Record>> {
        if let Some(replay) = self.replay.as_mut() {
            match replay
                .read_row()
                .map_err(|e| StoreError::codec("replay", e))?
            {
                Some(rec) => return Ok(Some(rec)),
                None => self.replay = None,
            }
        }
        self.reader
            .read_row()
            .map_err(|e| StoreError::codec("read", e))
    }

    /// Empty store sharing this store's headers and configuration.
    pub(crate) fn derived(&self, headers: Headers) -> RecordSet {
        RecordSet::assemble(Resource::memory(), headers, self.config.clone())
    }

    /// Reads to end of stream, handing each record to `visit`, and then
    /// rewinds so the store yields the same records again.
    ///
    /// On error the records consumed so far are still put back in front of
    /// whatever was not read.
    pub(crate) fn scan_echoed<F>(&mut self, mut visit: F) -> StoreResult<usize>
    where
        F: FnMut(&Record) -> StoreResult<()>,
    {
        let mut echo = EchoBuffer::new(self.config.dialect());
        let scanned = self.echo_loop(&mut echo, &mut visit);
        let restored = self.restore(echo);
        let n = scanned?;
        restored?;
        Ok(n)
    }

    fn echo_loop<F>(&mut self, echo: &mut EchoBuffer, visit: &mut F) -> StoreResult<usize>
    where
        F: FnMut(&Record) -> StoreResult<()>,
    {
        while let Some(rec) = self.read()? {
            echo.record(&rec)?;
            visit(&rec)?;
        }
        Ok(echo.len())
    }

    fn restore(&mut self, mut echo: EchoBuffer) -> StoreResult<()> {
        // Whatever is still pending follows the echoed records.
        loop {
            let (pending, next) = mem::take(&mut self.cursor).take();
            self.cursor = next;
            match pending {
                Some(rec) => echo.record(&rec)?,
                None => break,
            }
        }
        if let Some(mut old) = self.replay.take() {
            while let Some(rec) = old
                .read_row()
                .map_err(|e| StoreError::codec("replay", e))?
            {
                echo.record(&rec)?;
            }
        }
        self.replay = echo.into_replay()?;
        Ok(())
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSet")
            .field("headers", &self.headers)
            .field("config", &self.config)
            .field("cursor", &self.cursor)
            .field("replaying", &self.replay.is_some())
            .finish_non_exhaustive()
    }
}

/// Iterator over the records of a store.
///
/// Stops on the first error; check [`Records::error`] afterwards.
pub struct Records<'a> {
    set: &'a mut RecordSet,
    error: Option<StoreError>,
}

impl Records<'_> {
    /// Returns the error if iteration failed.
    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    /// Consumes the iterator and returns the error if any.
    pub fn into_error(self) -> Option<StoreError> {
        self.error
    }
}

impl Iterator for Records<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() {
            return None;
        }

        match self.set.read() {
            Ok(Some(rec)) => Some(rec),
            Ok(None) => None,
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}
