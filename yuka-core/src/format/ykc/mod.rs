//! YKC archives: a 24-byte header, a NUL-terminated name blob, file data, and a 20-byte-per-entry
//! index, all located through offsets so regions may appear in any order.

mod file;
mod header;

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use yuka_nls::{Decoder, TextDecoder};

pub use file::{FileReader, FileWriter};
pub use header::{IndexEntry, YkcHeader, INDEX_ENTRY_LEN, YKC_HEADER_LEN, YKC_SIGNATURE};

use crate::config::YukaConfig;
use crate::error::{ArchiveError, ArchiveResult};

/// How writes reach the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    ReadOnly,
    /// Writes stay in memory; [`Archive::flush`] rewrites the whole archive and swaps it in.
    Explicit,
    /// Writes go to disk immediately, in place when the entry is the last region of the file.
    Flush,
    /// Append-only; the index is only written by [`Archive::flush`].
    Immediate,
}

struct ArchiveFile {
    name: String,
    entry: IndexEntry,
    /// Pending contents (Explicit mode).
    new_data: Option<Vec<u8>>,
    /// Created through a handle that has not been closed yet; not on disk in any form.
    pending: bool,
    readers: usize,
    writer: bool,
}

impl ArchiveFile {
    fn loaded(name: String, entry: IndexEntry) -> Self {
        Self {
            name,
            entry,
            new_data: None,
            pending: false,
            readers: 0,
            writer: false,
        }
    }

    fn busy(&self) -> bool {
        self.writer || self.readers > 0
    }

    fn data_end(&self) -> u64 {
        u64::from(self.entry.data_offset) + u64::from(self.entry.data_length)
    }
}

struct Inner {
    path: PathBuf,
    file: File,
    header: YkcHeader,
    files: Vec<ArchiveFile>,
    dirty: bool,
}

pub struct Archive {
    mode: SaveMode,
    decoder: Decoder,
    inner: Mutex<Inner>,
}

fn open_backing(path: &Path, mode: SaveMode) -> ArchiveResult<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(mode != SaveMode::ReadOnly)
        .open(path)?;
    Ok(file)
}

fn to_u32(value: u64) -> ArchiveResult<u32> {
    u32::try_from(value)
        .map_err(|_| ArchiveError::Corrupt(format!("offset {value:#X} does not fit in 32 bits")))
}

fn load_index(file: &mut File, decoder: &Decoder) -> ArchiveResult<(YkcHeader, Vec<ArchiveFile>)> {
    let len = file.metadata()?.len();
    let mut rdr = BufReader::new(file);
    rdr.seek(SeekFrom::Start(0))?;
    let header = YkcHeader::read(&mut rdr)?;

    let index_end = u64::from(header.index_offset) + u64::from(header.index_length);
    if index_end > len {
        return Err(ArchiveError::Corrupt(format!(
            "index ends at {index_end:#X}, file is {len:#X} bytes"
        )));
    }

    rdr.seek(SeekFrom::Start(header.index_offset.into()))?;
    let mut entries = Vec::with_capacity(header.entry_count() as usize);
    for _ in 0..header.entry_count() {
        entries.push(IndexEntry::read(&mut rdr)?);
    }

    let mut files: Vec<ArchiveFile> = Vec::with_capacity(entries.len());
    for entry in entries {
        let name_end = u64::from(entry.name_offset) + u64::from(entry.name_length);
        let data_end = u64::from(entry.data_offset) + u64::from(entry.data_length);
        if name_end > len || data_end > len || entry.name_length == 0 {
            return Err(ArchiveError::Corrupt(format!(
                "entry at name offset {:#X} points outside the file",
                entry.name_offset
            )));
        }
        let mut raw = vec![0u8; entry.name_length as usize];
        rdr.seek(SeekFrom::Start(entry.name_offset.into()))?;
        rdr.read_exact(&mut raw)?;
        let name = decoder.decode_cstr(&raw).into_owned();

        match files.iter_mut().find(|f| f.name == name) {
            Some(existing) => {
                log::warn!("{name}: listed twice in the index, keeping the later entry");
                existing.entry = entry;
            }
            None => files.push(ArchiveFile::loaded(name, entry)),
        }
    }
    Ok((header, files))
}

impl Inner {
    fn find(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name == name)
    }

    fn stream_len(&mut self) -> ArchiveResult<u64> {
        Ok(self.file.seek(SeekFrom::End(0))?)
    }

    fn read_region(&mut self, offset: u32, length: u32) -> ArchiveResult<Vec<u8>> {
        let mut buf = vec![0u8; length as usize];
        self.file.seek(SeekFrom::Start(offset.into()))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn read_contents(&mut self, index: usize) -> ArchiveResult<Vec<u8>> {
        if let Some(data) = &self.files[index].new_data {
            return Ok(data.clone());
        }
        let entry = self.files[index].entry;
        if self.files[index].pending {
            return Ok(Vec::new());
        }
        self.read_region(entry.data_offset, entry.data_length)
    }

    /// Appends `bytes` at end of stream and returns their offset.
    fn append(&mut self, bytes: &[u8]) -> ArchiveResult<u32> {
        let offset = self.stream_len()?;
        to_u32(offset + bytes.len() as u64)?;
        self.file.write_all(bytes)?;
        to_u32(offset)
    }

    fn append_name(&mut self, index: usize, decoder: &Decoder) -> ArchiveResult<()> {
        let raw = decoder.encode_cstr(&self.files[index].name)?;
        let offset = self.append(&raw)?;
        let entry = &mut self.files[index].entry;
        entry.name_offset = offset;
        entry.name_length = raw.len() as u32;
        Ok(())
    }

    fn write_header(&mut self) -> ArchiveResult<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.header.write(&mut self.file)?;
        Ok(())
    }

    fn index_bytes(&self) -> ArchiveResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.files.len() * INDEX_ENTRY_LEN as usize);
        for f in self.files.iter().filter(|f| !f.pending) {
            f.entry.write(&mut out)?;
        }
        Ok(out)
    }

    /// Writes the index at end of stream, over the old index when that is the last region.
    fn write_index(&mut self) -> ArchiveResult<()> {
        let index = self.index_bytes()?;
        let len = self.stream_len()?;
        let old_end = u64::from(self.header.index_offset) + u64::from(self.header.index_length);
        let offset = if self.header.index_length > 0 && old_end == len {
            let offset = self.header.index_offset;
            self.file.seek(SeekFrom::Start(offset.into()))?;
            self.file.write_all(&index)?;
            self.file.set_len(u64::from(offset) + index.len() as u64)?;
            offset
        } else {
            self.append(&index)?
        };
        self.header.index_offset = offset;
        self.header.index_length = index.len() as u32;
        self.write_header()?;
        self.file.flush()?;
        Ok(())
    }

    /// Writes header, names, data and index to a temporary file, then swaps it in.
    fn rewrite(&mut self, mode: SaveMode, decoder: &Decoder) -> ArchiveResult<()> {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = self.path.with_file_name(format!("{file_name}.tmp"));

        let live: Vec<usize> = (0..self.files.len())
            .filter(|i| !self.files[*i].pending)
            .collect();

        let mut names = Vec::new();
        let mut entries = Vec::with_capacity(live.len());
        for &i in &live {
            let raw = decoder.encode_cstr(&self.files[i].name)?;
            let name_offset = to_u32(u64::from(YKC_HEADER_LEN) + names.len() as u64)?;
            names.extend_from_slice(&raw);
            let data_length = match &self.files[i].new_data {
                Some(data) => data.len() as u32,
                None => self.files[i].entry.data_length,
            };
            entries.push(IndexEntry {
                name_offset,
                name_length: raw.len() as u32,
                data_offset: 0,
                data_length,
                unknown: self.files[i].entry.unknown,
            });
        }

        let mut cursor = u64::from(YKC_HEADER_LEN) + names.len() as u64;
        for entry in &mut entries {
            entry.data_offset = to_u32(cursor)?;
            cursor += u64::from(entry.data_length);
        }
        let header = YkcHeader {
            index_offset: to_u32(cursor)?,
            index_length: entries.len() as u32 * INDEX_ENTRY_LEN,
            unknown: self.header.unknown,
            ..YkcHeader::default()
        };

        {
            let mut out = BufWriter::new(File::create(&tmp_path)?);
            header.write(&mut out)?;
            out.write_all(&names)?;
            for &i in &live {
                let data = self.read_contents(i)?;
                out.write_all(&data)?;
            }
            for entry in &entries {
                entry.write(&mut out)?;
            }
            out.flush()?;
            out.get_ref().sync_all()?;
        }

        fs::rename(&tmp_path, &self.path)?;
        self.file = open_backing(&self.path, mode)?;
        let (header, mut reloaded) = load_index(&mut self.file, decoder)?;

        // open handles and not-yet-closed creations survive the swap
        for old in self.files.drain(..) {
            if old.pending {
                reloaded.push(old);
            } else if let Some(f) = reloaded.iter_mut().find(|f| f.name == old.name) {
                f.readers = old.readers;
                f.writer = old.writer;
            }
        }
        self.header = header;
        self.files = reloaded;
        self.dirty = false;
        log::debug!(
            "rewrote {} ({} files, {} bytes)",
            self.path.display(),
            self.files.len(),
            u64::from(header.index_offset) + u64::from(header.index_length)
        );
        Ok(())
    }
}

impl Archive {
    pub fn open(path: impl AsRef<Path>, mode: SaveMode, config: &YukaConfig) -> ArchiveResult<Self> {
        let path = path.as_ref().to_path_buf();
        let decoder = Decoder::new(config.nls);
        let mut file = open_backing(&path, mode)?;
        let (header, files) = load_index(&mut file, &decoder)?;
        log::debug!("opened {} with {} files ({:?})", path.display(), files.len(), mode);
        Ok(Self {
            mode,
            decoder,
            inner: Mutex::new(Inner {
                path,
                file,
                header,
                files,
                dirty: false,
            }),
        })
    }

    /// Creates (or truncates) `path` as an archive with no files.
    pub fn create(path: impl AsRef<Path>, mode: SaveMode, config: &YukaConfig) -> ArchiveResult<Self> {
        if mode == SaveMode::ReadOnly {
            return Err(ArchiveError::ReadOnly);
        }
        let mut file = File::create(path.as_ref())?;
        YkcHeader::default().write(&mut file)?;
        file.sync_all()?;
        drop(file);
        Self::open(path, mode, config)
    }

    pub fn mode(&self) -> SaveMode {
        self.mode
    }

    pub fn path(&self) -> PathBuf {
        self.inner.lock().path.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().files.iter().filter(|f| !f.pending).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there are changes that [`Archive::flush`] has not written yet.
    pub fn is_dirty(&self) -> bool {
        self.inner.lock().dirty
    }

    pub fn contains(&self, name: &str) -> bool {
        let inner = self.inner.lock();
        inner.find(name).map_or(false, |i| !inner.files[i].pending)
    }

    /// Names of the files matching a glob pattern such as `*.yks`, in index order.
    pub fn get_files(&self, pattern: &str) -> ArchiveResult<Vec<String>> {
        let pattern = glob::Pattern::new(pattern)?;
        let inner = self.inner.lock();
        Ok(inner
            .files
            .iter()
            .filter(|f| !f.pending && pattern.matches(&f.name))
            .map(|f| f.name.clone())
            .collect())
    }

    /// Opens a shared read handle, or `None` while the file is open for writing.
    pub fn open_file(&self, name: &str) -> ArchiveResult<Option<FileReader<'_>>> {
        let mut inner = self.inner.lock();
        let index = inner
            .find(name)
            .filter(|i| !inner.files[*i].pending)
            .ok_or_else(|| ArchiveError::NotFound(name.to_string()))?;
        if inner.files[index].writer {
            return Ok(None);
        }
        let data = inner.read_contents(index)?;
        inner.files[index].readers += 1;
        Ok(Some(FileReader::new(self, name.to_string(), data)))
    }

    /// Opens an exclusive write handle on an existing file, preloaded with its contents.
    /// `None` when any other handle is open.
    pub fn open_file_mut(&self, name: &str) -> ArchiveResult<Option<FileWriter<'_>>> {
        self.check_writable()?;
        let mut inner = self.inner.lock();
        let index = inner
            .find(name)
            .filter(|i| !inner.files[*i].pending)
            .ok_or_else(|| ArchiveError::NotFound(name.to_string()))?;
        if inner.files[index].busy() {
            return Ok(None);
        }
        let data = inner.read_contents(index)?;
        inner.files[index].writer = true;
        Ok(Some(FileWriter::new(self, name.to_string(), data)))
    }

    /// Opens an exclusive, empty write handle, creating the file on close if it is new.
    /// `None` when any other handle is open.
    pub fn create_file(&self, name: &str) -> ArchiveResult<Option<FileWriter<'_>>> {
        self.check_writable()?;
        let mut inner = self.inner.lock();
        match inner.find(name) {
            Some(index) => {
                if inner.files[index].busy() {
                    return Ok(None);
                }
                inner.files[index].writer = true;
            }
            None => inner.files.push(ArchiveFile {
                name: name.to_string(),
                entry: IndexEntry::default(),
                new_data: None,
                pending: true,
                readers: 0,
                writer: true,
            }),
        }
        Ok(Some(FileWriter::new(self, name.to_string(), Vec::new())))
    }

    /// Removes a file from the index. `false` if it does not exist or has open handles.
    /// Its bytes stay in the backing file until the next full rewrite.
    pub fn delete_file(&self, name: &str) -> ArchiveResult<bool> {
        self.check_writable()?;
        let mut inner = self.inner.lock();
        let Some(index) = inner.find(name) else {
            return Ok(false);
        };
        if inner.files[index].busy() || inner.files[index].pending {
            return Ok(false);
        }
        inner.files.remove(index);
        inner.dirty = true;
        Ok(true)
    }

    pub fn read_all(&self, name: &str) -> ArchiveResult<Vec<u8>> {
        match self.open_file(name)? {
            Some(reader) => Ok(reader.data().to_vec()),
            None => Err(ArchiveError::Busy(name.to_string())),
        }
    }

    /// Replaces or creates `name` in one step. `false` if the file is busy.
    pub fn write_all(&self, name: &str, data: &[u8]) -> ArchiveResult<bool> {
        match self.create_file(name)? {
            Some(mut writer) => {
                writer.write_all(data)?;
                writer.close()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Persists buffered changes: a full rewrite in Explicit mode, the index otherwise.
    pub fn flush(&self) -> ArchiveResult<()> {
        let mut inner = self.inner.lock();
        if !inner.dirty {
            return Ok(());
        }
        match self.mode {
            SaveMode::ReadOnly => Ok(()),
            SaveMode::Explicit => inner.rewrite(self.mode, &self.decoder),
            SaveMode::Flush | SaveMode::Immediate => {
                inner.write_index()?;
                inner.dirty = false;
                Ok(())
            }
        }
    }

    /// Rewrites the archive without orphaned or deleted regions.
    pub fn compact(&self) -> ArchiveResult<()> {
        self.check_writable()?;
        if self.mode == SaveMode::Immediate {
            log::warn!("compaction is not available in immediate mode, only flushing the index");
            return self.flush();
        }
        self.inner.lock().rewrite(self.mode, &self.decoder)
    }

    /// Closes the backing file. Unflushed changes are dropped.
    pub fn close(self) -> ArchiveResult<()> {
        let inner = self.inner.into_inner();
        if self.mode != SaveMode::ReadOnly {
            inner.file.sync_all()?;
        }
        Ok(())
    }

    fn check_writable(&self) -> ArchiveResult<()> {
        if self.mode == SaveMode::ReadOnly {
            return Err(ArchiveError::ReadOnly);
        }
        Ok(())
    }

    fn release_reader(&self, name: &str) {
        let mut inner = self.inner.lock();
        if let Some(index) = inner.find(name) {
            let f = &mut inner.files[index];
            f.readers = f.readers.saturating_sub(1);
        }
    }

    fn discard_writer(&self, name: &str) {
        let mut inner = self.inner.lock();
        if let Some(index) = inner.find(name) {
            if inner.files[index].pending {
                inner.files.remove(index);
            } else {
                inner.files[index].writer = false;
            }
        }
    }

    /// Stores the contents of a closed write handle.
    fn commit(&self, name: &str, data: Vec<u8>) -> ArchiveResult<()> {
        let mut inner = self.inner.lock();
        let index = inner
            .find(name)
            .ok_or_else(|| ArchiveError::NotFound(name.to_string()))?;
        inner.files[index].writer = false;

        let result = match self.mode {
            SaveMode::ReadOnly => Err(ArchiveError::ReadOnly),
            SaveMode::Explicit => {
                let f = &mut inner.files[index];
                f.entry.data_length = data.len() as u32;
                f.new_data = Some(data);
                Ok(())
            }
            SaveMode::Flush => Self::commit_flush(&mut inner, index, &data, &self.decoder),
            SaveMode::Immediate => Self::commit_append(&mut inner, index, &data, &self.decoder),
        };
        match result {
            Ok(()) => {
                inner.files[index].pending = false;
                inner.dirty = true;
                Ok(())
            }
            Err(e) => {
                if inner.files[index].pending {
                    inner.files.remove(index);
                }
                Err(e)
            }
        }
    }

    fn commit_flush(
        inner: &mut Inner,
        index: usize,
        data: &[u8],
        decoder: &Decoder,
    ) -> ArchiveResult<()> {
        let len = inner.stream_len()?;
        let f = &inner.files[index];
        let in_place = !f.pending && f.entry.data_length > 0 && f.data_end() == len;
        if in_place {
            let offset = f.entry.data_offset;
            inner.file.seek(SeekFrom::Start(offset.into()))?;
            inner.file.write_all(data)?;
            inner.file.set_len(u64::from(offset) + data.len() as u64)?;
        } else {
            if inner.files[index].pending {
                inner.append_name(index, decoder)?;
            }
            inner.files[index].entry.data_offset = inner.append(data)?;
        }
        inner.files[index].entry.data_length = data.len() as u32;
        Ok(())
    }

    fn commit_append(
        inner: &mut Inner,
        index: usize,
        data: &[u8],
        decoder: &Decoder,
    ) -> ArchiveResult<()> {
        inner.append_name(index, decoder)?;
        inner.files[index].entry.data_offset = inner.append(data)?;
        inner.files[index].entry.data_length = data.len() as u32;
        Ok(())
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if self.dirty {
            log::warn!("{}: dropped with unflushed changes", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn config() -> YukaConfig {
        YukaConfig::default()
    }

    #[test]
    fn handles_are_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ykc");
        let archive = Archive::create(&path, SaveMode::Explicit, &config()).unwrap();
        assert!(archive.write_all("a.txt", b"abc").unwrap());

        let r1 = archive.open_file("a.txt").unwrap().unwrap();
        let r2 = archive.open_file("a.txt").unwrap().unwrap();
        assert!(archive.open_file_mut("a.txt").unwrap().is_none());
        drop(r1);
        assert!(archive.create_file("a.txt").unwrap().is_none());
        drop(r2);

        let mut w = archive.open_file_mut("a.txt").unwrap().unwrap();
        assert!(archive.open_file("a.txt").unwrap().is_none());
        assert!(archive.open_file_mut("a.txt").unwrap().is_none());
        assert!(!archive.delete_file("a.txt").unwrap());
        w.seek(SeekFrom::End(0)).unwrap();
        w.write_all(b"def").unwrap();
        w.close().unwrap();

        let mut text = String::new();
        archive
            .open_file("a.txt")
            .unwrap()
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "abcdef");
    }

    #[test]
    fn writer_can_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ykc");
        let archive = Archive::create(&path, SaveMode::Explicit, &config()).unwrap();
        assert!(archive.write_all("a.txt", b"abcdef").unwrap());

        let mut w = archive.open_file_mut("a.txt").unwrap().unwrap();
        w.seek(SeekFrom::End(0)).unwrap();
        w.set_len(2);
        assert_eq!(w.len(), 2);
        w.write_all(b"Z").unwrap();
        w.close().unwrap();

        let reader = archive.open_file("a.txt").unwrap().unwrap();
        assert_eq!(reader.name(), "a.txt");
        assert_eq!(reader.data(), b"abZ");
        drop(reader);
        assert_eq!(archive.read_all("a.txt").unwrap(), b"abZ");
    }

    #[test]
    fn dropped_writer_discards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ykc");
        let archive = Archive::create(&path, SaveMode::Explicit, &config()).unwrap();
        {
            let mut w = archive.create_file("gone.txt").unwrap().unwrap();
            w.write_all(b"x").unwrap();
        }
        assert!(!archive.contains("gone.txt"));
        assert!(!archive.is_dirty());
        assert!(archive.create_file("gone.txt").unwrap().is_some());
    }

    #[test]
    fn read_only_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ykc");
        Archive::create(&path, SaveMode::Explicit, &config())
            .unwrap()
            .close()
            .unwrap();
        let archive = Archive::open(&path, SaveMode::ReadOnly, &config()).unwrap();
        assert!(matches!(
            archive.create_file("a.txt"),
            Err(ArchiveError::ReadOnly)
        ));
        assert!(matches!(
            archive.delete_file("a.txt"),
            Err(ArchiveError::ReadOnly)
        ));
        assert!(matches!(
            archive.open_file("a.txt"),
            Err(ArchiveError::NotFound(_))
        ));
        assert!(matches!(
            Archive::create(&path, SaveMode::ReadOnly, &config()),
            Err(ArchiveError::ReadOnly)
        ));
    }

    #[test]
    fn delete_is_reclaimed_by_compaction() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ykc");
        let archive = Archive::create(&path, SaveMode::Flush, &config()).unwrap();
        archive.write_all("keep.txt", b"keep").unwrap();
        archive.write_all("drop.txt", &[7u8; 4096]).unwrap();
        archive.flush().unwrap();
        let before = fs::metadata(&path).unwrap().len();

        assert!(archive.delete_file("drop.txt").unwrap());
        assert!(!archive.delete_file("drop.txt").unwrap());
        archive.compact().unwrap();
        let after = fs::metadata(&path).unwrap().len();
        assert!(after + 4096 <= before);
        assert_eq!(archive.get_files("*").unwrap(), ["keep.txt"]);
        assert_eq!(archive.read_all("keep.txt").unwrap(), b"keep");
    }

    #[test]
    fn shift_jis_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ykc");
        let archive = Archive::create(&path, SaveMode::Explicit, &config()).unwrap();
        archive.write_all("\u{30c6}\u{30b9}\u{30c8}.yks", b"x").unwrap();
        archive.flush().unwrap();
        archive.close().unwrap();

        let archive = Archive::open(&path, SaveMode::ReadOnly, &config()).unwrap();
        assert_eq!(archive.get_files("*.yks").unwrap(), ["\u{30c6}\u{30b9}\u{30c8}.yks"]);
    }

    #[test]
    fn bad_pattern_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.ykc");
        let archive = Archive::create(&path, SaveMode::Explicit, &config()).unwrap();
        assert!(matches!(
            archive.get_files("[a"),
            Err(ArchiveError::Pattern(_))
        ));
    }
}
