//! Replay buffer for non-destructive scans.
//!
//! Every record a scan consumes is encoded into an [`EchoBuffer`]. When the
//! scan ends the buffer becomes the store's replay source, so the store
//! reads back exactly what the scan took from it.

use std::io::Cursor;

use super::errors::{StoreError, StoreResult};
use crate::record::{Dialect, Record, RowReader, RowWriter};

/// Row reader over a finished echo buffer.
pub type ReplayReader = RowReader<Cursor<Vec<u8>>>;

pub struct EchoBuffer {
    writer: RowWriter<Vec<u8>>,
    dialect: Dialect,
    count: usize,
}

impl EchoBuffer {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            writer: RowWriter::new(Vec::new(), dialect),
            dialect,
            count: 0,
        }
    }

    /// Appends one consumed record.
    pub fn record(&mut self, rec: &Record) -> StoreResult<()> {
        self.writer
            .write_record(rec)
            .map_err(|e| StoreError::io("echo", e))?;
        self.count += 1;
        Ok(())
    }

    /// Records echoed so far.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Turns the buffer into a reader. `None` when nothing was echoed.
    pub fn into_replay(self) -> StoreResult<Option<ReplayReader>> {
        if self.count == 0 {
            return Ok(None);
        }
        let bytes = self
            .writer
            .into_inner()
            .map_err(|e| StoreError::io("echo", e))?;
        Ok(Some(RowReader::new(Cursor::new(bytes), self.dialect)))
    }
}
