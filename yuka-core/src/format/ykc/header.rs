use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ArchiveError, ArchiveResult};

pub const YKC_SIGNATURE: &[u8; 6] = b"YKC001";
pub const YKC_HEADER_LEN: u32 = 24;
pub const YKC_VERSION: u16 = 0;
pub const INDEX_ENTRY_LEN: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YkcHeader {
    pub version: u16,
    pub header_size: u32,
    pub unknown: u32,
    pub index_offset: u32,
    /// In bytes, 20 per entry.
    pub index_length: u32,
}

impl Default for YkcHeader {
    /// Header of an archive with no files.
    fn default() -> Self {
        Self {
            version: YKC_VERSION,
            header_size: YKC_HEADER_LEN,
            unknown: 0,
            index_offset: YKC_HEADER_LEN,
            index_length: 0,
        }
    }
}

impl YkcHeader {
    pub fn read(rdr: &mut impl Read) -> ArchiveResult<Self> {
        let mut signature = [0u8; 6];
        rdr.read_exact(&mut signature)?;
        if &signature != YKC_SIGNATURE {
            return Err(ArchiveError::BadSignature);
        }
        let header = Self {
            version: rdr.read_u16::<LittleEndian>()?,
            header_size: rdr.read_u32::<LittleEndian>()?,
            unknown: rdr.read_u32::<LittleEndian>()?,
            index_offset: rdr.read_u32::<LittleEndian>()?,
            index_length: rdr.read_u32::<LittleEndian>()?,
        };
        if header.version != YKC_VERSION {
            return Err(ArchiveError::UnsupportedVersion(header.version));
        }
        if header.header_size != YKC_HEADER_LEN {
            return Err(ArchiveError::BadHeaderSize(header.header_size));
        }
        if header.index_length % INDEX_ENTRY_LEN != 0 {
            return Err(ArchiveError::Corrupt(format!(
                "index length {} is not a multiple of {INDEX_ENTRY_LEN}",
                header.index_length
            )));
        }
        Ok(header)
    }

    pub fn write(&self, w: &mut impl Write) -> ArchiveResult<()> {
        w.write_all(YKC_SIGNATURE)?;
        w.write_u16::<LittleEndian>(self.version)?;
        w.write_u32::<LittleEndian>(self.header_size)?;
        w.write_u32::<LittleEndian>(self.unknown)?;
        w.write_u32::<LittleEndian>(self.index_offset)?;
        w.write_u32::<LittleEndian>(self.index_length)?;
        Ok(())
    }

    pub fn entry_count(&self) -> u32 {
        self.index_length / INDEX_ENTRY_LEN
    }
}

/// One 20-byte index record. `name_length` counts the NUL terminator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexEntry {
    pub name_offset: u32,
    pub name_length: u32,
    pub data_offset: u32,
    pub data_length: u32,
    pub unknown: u32,
}

impl IndexEntry {
    pub fn read(rdr: &mut impl Read) -> ArchiveResult<Self> {
        Ok(Self {
            name_offset: rdr.read_u32::<LittleEndian>()?,
            name_length: rdr.read_u32::<LittleEndian>()?,
            data_offset: rdr.read_u32::<LittleEndian>()?,
            data_length: rdr.read_u32::<LittleEndian>()?,
            unknown: rdr.read_u32::<LittleEndian>()?,
        })
    }

    pub fn write(&self, w: &mut impl Write) -> ArchiveResult<()> {
        w.write_u32::<LittleEndian>(self.name_offset)?;
        w.write_u32::<LittleEndian>(self.name_length)?;
        w.write_u32::<LittleEndian>(self.data_offset)?;
        w.write_u32::<LittleEndian>(self.data_length)?;
        w.write_u32::<LittleEndian>(self.unknown)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn empty_archive_header() {
        let mut out = Vec::new();
        YkcHeader::default().write(&mut out).unwrap();
        assert_eq!(out.len(), YKC_HEADER_LEN as usize);
        assert_eq!(&out[..6], b"YKC001");
        let header = YkcHeader::read(&mut Cursor::new(&out)).unwrap();
        assert_eq!(header.index_offset, 24);
        assert_eq!(header.entry_count(), 0);
    }

    #[test]
    fn rejects_other_versions_and_sizes() {
        let mut out = Vec::new();
        YkcHeader {
            version: 2,
            ..Default::default()
        }
        .write(&mut out)
        .unwrap();
        assert!(matches!(
            YkcHeader::read(&mut Cursor::new(&out)),
            Err(ArchiveError::UnsupportedVersion(2))
        ));

        let mut out = Vec::new();
        YkcHeader {
            header_size: 32,
            ..Default::default()
        }
        .write(&mut out)
        .unwrap();
        assert!(matches!(
            YkcHeader::read(&mut Cursor::new(&out)),
            Err(ArchiveError::BadHeaderSize(32))
        ));
    }
}
