use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ScriptError, ScriptResult};

pub const YKS_SIGNATURE: &[u8; 6] = b"YKS001";
pub const YKS_HEADER_LEN: usize = 48;

/// The fixed 48-byte header of a compiled script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YksHeader {
    /// 1 when the data sector is XOR-obfuscated.
    pub encryption: i16,
    pub header_length: i32,
    pub unknown1: u32,
    pub instr_offset: u32,
    /// Number of 32-bit code words.
    pub instr_count: u32,
    pub index_offset: u32,
    /// Number of 16-byte element records.
    pub index_count: u32,
    pub data_offset: u32,
    pub data_length: u32,
    pub max_locals: u32,
    pub unknown2: u32,
}

impl YksHeader {
    pub fn read(bytes: &[u8]) -> ScriptResult<Self> {
        if bytes.len() < YKS_HEADER_LEN {
            return Err(ScriptError::BadHeader(format!(
                "file is {} bytes, shorter than the header",
                bytes.len()
            )));
        }
        let mut rdr = Cursor::new(bytes);
        let mut signature = [0u8; 6];
        rdr.read_exact(&mut signature)?;
        if &signature != YKS_SIGNATURE {
            return Err(ScriptError::BadSignature);
        }

        let header = Self {
            encryption: rdr.read_i16::<LittleEndian>()?,
            header_length: rdr.read_i32::<LittleEndian>()?,
            unknown1: rdr.read_u32::<LittleEndian>()?,
            instr_offset: rdr.read_u32::<LittleEndian>()?,
            instr_count: rdr.read_u32::<LittleEndian>()?,
            index_offset: rdr.read_u32::<LittleEndian>()?,
            index_count: rdr.read_u32::<LittleEndian>()?,
            data_offset: rdr.read_u32::<LittleEndian>()?,
            data_length: rdr.read_u32::<LittleEndian>()?,
            max_locals: rdr.read_u32::<LittleEndian>()?,
            unknown2: rdr.read_u32::<LittleEndian>()?,
        };

        if header.header_length != YKS_HEADER_LEN as i32 {
            return Err(ScriptError::BadHeader(format!(
                "header length {} (expected {})",
                header.header_length, YKS_HEADER_LEN
            )));
        }
        if header.encryption != 0 && header.encryption != 1 {
            return Err(ScriptError::BadHeader(format!(
                "encryption flag {}",
                header.encryption
            )));
        }
        if header.unknown1 != 0 || header.unknown2 != 0 {
            log::debug!(
                "non-zero unknown header words: {:#X} {:#X}",
                header.unknown1,
                header.unknown2
            );
        }

        Ok(header)
    }

    pub fn write(&self, out: &mut Vec<u8>) -> ScriptResult<()> {
        out.extend_from_slice(YKS_SIGNATURE);
        out.write_i16::<LittleEndian>(self.encryption)?;
        out.write_i32::<LittleEndian>(self.header_length)?;
        out.write_u32::<LittleEndian>(self.unknown1)?;
        out.write_u32::<LittleEndian>(self.instr_offset)?;
        out.write_u32::<LittleEndian>(self.instr_count)?;
        out.write_u32::<LittleEndian>(self.index_offset)?;
        out.write_u32::<LittleEndian>(self.index_count)?;
        out.write_u32::<LittleEndian>(self.data_offset)?;
        out.write_u32::<LittleEndian>(self.data_length)?;
        out.write_u32::<LittleEndian>(self.max_locals)?;
        out.write_u32::<LittleEndian>(self.unknown2)?;
        Ok(())
    }

    pub fn is_encrypted(&self) -> bool {
        self.encryption == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_48_bytes() {
        let header = YksHeader {
            encryption: 1,
            header_length: YKS_HEADER_LEN as i32,
            instr_offset: 48,
            instr_count: 3,
            ..Default::default()
        };
        let mut out = Vec::new();
        header.write(&mut out).unwrap();
        assert_eq!(out.len(), YKS_HEADER_LEN);
        assert_eq!(YksHeader::read(&out).unwrap(), header);
    }

    #[test]
    fn rejects_wrong_header_length() {
        let header = YksHeader {
            header_length: 32,
            ..Default::default()
        };
        let mut out = Vec::new();
        header.write(&mut out).unwrap();
        assert!(matches!(YksHeader::read(&out), Err(ScriptError::BadHeader(_))));
    }

    #[test]
    fn rejects_wrong_signature() {
        let mut out = vec![0u8; YKS_HEADER_LEN];
        out[..6].copy_from_slice(b"YKC001");
        assert!(matches!(YksHeader::read(&out), Err(ScriptError::BadSignature)));
    }
}
