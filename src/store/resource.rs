//! Byte-level backing of a record store.
//!
//! A [`Resource`] is a reader half, a writer half and an optional
//! [`Closer`]. Stores never inspect what is behind the halves; anything that
//! must happen on close is handed over explicitly as a closer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::rc::Rc;

/// Release action run once when a store is closed.
pub trait Closer {
    fn close(self: Box<Self>) -> io::Result<()>;
}

impl<F> Closer for F
where
    F: FnOnce() -> io::Result<()>,
{
    fn close(self: Box<Self>) -> io::Result<()> {
        (*self)()
    }
}

/// In-memory FIFO: bytes written at the back are read from the front.
///
/// Clones share the same buffer, so one clone can serve as the reader half
/// and another as the writer half.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer(Rc<RefCell<VecDeque<u8>>>);

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer preloaded with `bytes`.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self(Rc::new(RefCell::new(bytes.as_ref().iter().copied().collect())))
    }

    /// Bytes written but not yet read.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl Read for MemoryBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

impl Write for MemoryBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Syncs a file to disk when its store closes.
struct FileCloser(File);

impl Closer for FileCloser {
    fn close(self: Box<Self>) -> io::Result<()> {
        self.0.sync_all()
    }
}

/// Reader half, writer half and optional closer of a store.
pub struct Resource {
    reader: Box<dyn Read>,
    writer: Box<dyn Write>,
    closer: Option<Box<dyn Closer>>,
}

impl Resource {
    pub fn new<R, W>(reader: R, writer: W) -> Self
    where
        R: Read + 'static,
        W: Write + 'static,
    {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
            closer: None,
        }
    }

    /// Attaches the action to run when the owning store closes.
    pub fn with_closer(mut self, closer: impl Closer + 'static) -> Self {
        self.closer = Some(Box::new(closer));
        self
    }

    /// Empty in-memory resource.
    pub fn memory() -> Self {
        Self::memory_from(MemoryBuffer::new())
    }

    /// In-memory resource over `buffer`. The caller may keep a clone of the
    /// buffer to inspect what the store writes.
    pub fn memory_from(buffer: MemoryBuffer) -> Self {
        Self::new(buffer.clone(), buffer)
    }

    /// In-memory resource preloaded with `bytes`.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self::memory_from(MemoryBuffer::from_bytes(bytes))
    }

    /// Read-only resource; writes are discarded.
    pub fn reader_only<R: Read + 'static>(reader: R) -> Self {
        Self::new(reader, io::sink())
    }

    /// Existing file: reads from the start, writes append at the end.
    /// Closing syncs the file.
    pub fn open_file(path: &Path) -> io::Result<Self> {
        let reader = File::open(path)?;
        let writer = OpenOptions::new().append(true).open(path)?;
        let sync = writer.try_clone()?;
        Ok(Self::new(reader, writer).with_closer(FileCloser(sync)))
    }

    /// Existing file opened for reading only; writes are discarded.
    pub fn open_read_only(path: &Path) -> io::Result<Self> {
        Ok(Self::reader_only(File::open(path)?))
    }

    /// New or truncated file opened for writing and reading back.
    pub fn create_file(path: &Path) -> io::Result<Self> {
        let writer = File::create(path)?;
        let reader = File::open(path)?;
        let sync = writer.try_clone()?;
        Ok(Self::new(reader, writer).with_closer(FileCloser(sync)))
    }

    pub(crate) fn into_parts(self) -> (Box<dyn Read>, Box<dyn Write>, Option<Box<dyn Closer>>) {
        (self.reader, self.writer, self.closer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    #[test]
    fn test_memory_buffer_is_fifo() {
        let mut buf = MemoryBuffer::new();
        buf.write_all(b"first\n").unwrap();
        buf.write_all(b"second\n").unwrap();

        let mut head = [0u8; 6];
        buf.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"first\n");
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn test_memory_clones_share_bytes() {
        let buf = MemoryBuffer::new();
        let mut writer = buf.clone();
        let mut reader = buf.clone();
        writer.write_all(b"abc").unwrap();

        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "abc");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_closure_closer_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let res = Resource::memory().with_closer(move || {
            seen.set(seen.get() + 1);
            Ok::<(), io::Error>(())
        });
        let (_, _, closer) = res.into_parts();
        closer.unwrap().close().unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_file_resource_appends_and_reads_from_start() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("positions.csv");
        std::fs::write(&path, "MMSI,LAT\n").unwrap();

        let res = Resource::open_file(&path).unwrap();
        let (mut reader, mut writer, closer) = res.into_parts();
        writer.write_all(b"1,2.0\n").unwrap();

        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "MMSI,LAT\n1,2.0\n");
        assert!(closer.unwrap().close().is_ok());
    }

    #[test]
    fn test_create_file_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents\n").unwrap();

        let res = Resource::create_file(&path).unwrap();
        let (mut reader, mut writer, closer) = res.into_parts();
        writer.write_all(b"MMSI\n7\n").unwrap();
        writer.flush().unwrap();

        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "MMSI\n7\n");
        assert!(closer.unwrap().close().is_ok());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "MMSI\n7\n");
    }
}
