//! The data sector: a flat blob of raw `i32` values and NUL-terminated strings addressed by
//! byte offset. Optionally XOR-obfuscated with a single-byte key.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use byteorder::{ByteOrder, LittleEndian};
use yuka_nls::{Decoder, TextDecoder};

use crate::error::{ScriptError, ScriptResult};

/// Read side of the data sector. Lookups are memoized by offset.
pub struct DataReader {
    buffer: Vec<u8>,
    decoder: Decoder,
    ints: RefCell<HashMap<u32, i32>>,
    strings: RefCell<HashMap<u32, Rc<str>>>,
}

impl DataReader {
    pub fn new(mut buffer: Vec<u8>, key: Option<u8>, decoder: Decoder) -> Self {
        if let Some(key) = key {
            xor_in_place(&mut buffer, key);
        }
        Self {
            buffer,
            decoder,
            ints: RefCell::new(HashMap::new()),
            strings: RefCell::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn get_integer(&self, offset: u32) -> ScriptResult<i32> {
        if let Some(v) = self.ints.borrow().get(&offset) {
            return Ok(*v);
        }
        let start = offset as usize;
        let end = start.checked_add(4).filter(|end| *end <= self.buffer.len());
        let Some(end) = end else {
            return Err(ScriptError::OutOfRange {
                offset: start,
                len: self.buffer.len(),
            });
        };
        let v = LittleEndian::read_i32(&self.buffer[start..end]);
        self.ints.borrow_mut().insert(offset, v);
        Ok(v)
    }

    pub fn get_string(&self, offset: u32) -> ScriptResult<Rc<str>> {
        if let Some(s) = self.strings.borrow().get(&offset) {
            return Ok(s.clone());
        }
        let start = offset as usize;
        if start >= self.buffer.len() {
            return Err(ScriptError::OutOfRange {
                offset: start,
                len: self.buffer.len(),
            });
        }
        let rest = &self.buffer[start..];
        let Some(nul) = rest.iter().position(|&b| b == 0) else {
            return Err(ScriptError::Corrupt(format!(
                "unterminated string at data offset 0x{start:X}"
            )));
        };
        let s: Rc<str> = Rc::from(self.decoder.decode(&rest[..nul]).as_ref());
        self.strings.borrow_mut().insert(offset, s.clone());
        Ok(s)
    }
}

/// Write side of the data sector. Identical values share one offset.
pub struct DataWriter {
    buffer: Vec<u8>,
    decoder: Decoder,
    ints: HashMap<i32, u32>,
    strings: HashMap<String, u32>,
}

impl DataWriter {
    pub fn new(decoder: Decoder) -> Self {
        Self {
            buffer: Vec::new(),
            decoder,
            ints: HashMap::new(),
            strings: HashMap::new(),
        }
    }

    pub fn write_integer(&mut self, value: i32) -> u32 {
        if let Some(offset) = self.ints.get(&value) {
            return *offset;
        }
        let offset = self.buffer.len() as u32;
        let mut raw = [0u8; 4];
        LittleEndian::write_i32(&mut raw, value);
        self.buffer.extend_from_slice(&raw);
        self.ints.insert(value, offset);
        offset
    }

    pub fn write_string(&mut self, value: &str) -> ScriptResult<u32> {
        if let Some(offset) = self.strings.get(value) {
            return Ok(*offset);
        }
        let offset = self.buffer.len() as u32;
        let raw = self.decoder.encode_cstr(value)?;
        self.buffer.extend_from_slice(&raw);
        self.strings.insert(value.to_string(), offset);
        Ok(offset)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copies the sector into `sink`, XORed with `key` when given.
    pub fn write_to<W: Write>(&self, sink: W, key: Option<u8>) -> io::Result<()> {
        match key {
            Some(key) => XorWriter::new(sink, key).write_all(&self.buffer),
            None => {
                let mut sink = sink;
                sink.write_all(&self.buffer)
            }
        }
    }
}

fn xor_in_place(buffer: &mut [u8], key: u8) {
    for b in buffer.iter_mut() {
        *b ^= key;
    }
}

/// Wraps a sink and XORs every byte passing through it.
pub struct XorWriter<W> {
    inner: W,
    key: u8,
}

impl<W: Write> XorWriter<W> {
    pub fn new(inner: W, key: u8) -> Self {
        Self { inner, key }
    }
}

impl<W: Write> Write for XorWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut scrambled = buf.to_vec();
        xor_in_place(&mut scrambled, self.key);
        self.inner.write(&scrambled)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
