//! Handles to single archive entries.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use super::Archive;
use crate::error::ArchiveResult;

/// Shared read handle. Holds a snapshot of the entry taken when it was opened.
pub struct FileReader<'a> {
    archive: &'a Archive,
    name: String,
    cursor: Cursor<Vec<u8>>,
}

impl<'a> FileReader<'a> {
    pub(super) fn new(archive: &'a Archive, name: String, data: Vec<u8>) -> Self {
        Self {
            archive,
            name,
            cursor: Cursor::new(data),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data(&self) -> &[u8] {
        self.cursor.get_ref()
    }
}

impl Read for FileReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for FileReader<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Drop for FileReader<'_> {
    fn drop(&mut self) {
        self.archive.release_reader(&self.name);
    }
}

/// Exclusive write handle. Contents are committed by [`FileWriter::close`]; dropping the
/// handle without closing it discards the writes.
pub struct FileWriter<'a> {
    archive: &'a Archive,
    name: String,
    cursor: Cursor<Vec<u8>>,
    closed: bool,
}

impl<'a> FileWriter<'a> {
    pub(super) fn new(archive: &'a Archive, name: String, data: Vec<u8>) -> Self {
        Self {
            archive,
            name,
            cursor: Cursor::new(data),
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_len(&mut self, len: usize) {
        self.cursor.get_mut().resize(len, 0);
        if self.cursor.position() > len as u64 {
            self.cursor.set_position(len as u64);
        }
    }

    /// Hands the contents to the archive according to its save mode.
    pub fn close(mut self) -> ArchiveResult<()> {
        self.closed = true;
        let data = std::mem::take(self.cursor.get_mut());
        self.archive.commit(&self.name, data)
    }
}

impl Read for FileWriter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Write for FileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FileWriter<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Drop for FileWriter<'_> {
    fn drop(&mut self) {
        if !self.closed {
            log::warn!("{}: write handle dropped without close, discarding", self.name);
            self.archive.discard_writer(&self.name);
        }
    }
}
