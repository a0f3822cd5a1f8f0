//! Data elements: the typed symbol table that code words index into.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{ScriptError, ScriptResult};

pub const ELEMENT_RECORD_SIZE: usize = 16;

pub const TAG_FUNC: u32 = 0;
pub const TAG_CTRL: u32 = 1;
pub const TAG_CINT: u32 = 4;
pub const TAG_CSTR: u32 = 5;
pub const TAG_SSTR: u32 = 8;
pub const TAG_VINT: u32 = 9;
pub const TAG_VSTR: u32 = 10;
pub const TAG_VLOC: u32 = 11;

/// `Ctrl` link field value for an unlinked label.
pub const LINK_NONE: u32 = 0xFFFF_FFFF;
/// `Ctrl` link field value for operator symbols.
pub const LINK_OPERATOR: u32 = 0xFFFF_FFFE;

pub const BLOCK_OPEN: &str = "{";
pub const BLOCK_CLOSE: &str = "}";
pub const ELSE_LABEL: &str = "else";
pub const ASSIGN_FUNC: &str = "=";
pub const IF_FUNC: &str = "if";

pub const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "==", "!=", "<", "<=", ">", ">=", "&&", "||", "&", "|", "^",
];

pub fn is_operator(name: &str) -> bool {
    OPERATORS.contains(&name)
}

/// Index of an element inside an [`ElementTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl ElementId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An integer constant, optionally flagged as a pointer (`&N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptInt {
    pub value: i32,
    pub pointer: bool,
}

impl ScriptInt {
    pub fn plain(value: i32) -> Self {
        Self {
            value,
            pointer: false,
        }
    }

    pub fn pointer(value: i32) -> Self {
        Self {
            value,
            pointer: true,
        }
    }
}

impl fmt::Display for ScriptInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer {
            write!(f, "&{}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// A label or control marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ctrl {
    pub name: String,
    /// Co-referenced marker: block start <-> end, or itself for unique labels.
    pub link: Option<ElementId>,
    /// Display id, assigned sequentially when the marker is created or read.
    pub id: u32,
    /// Code position (in words) of the marker's label instruction.
    pub label_offset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataElement {
    Func { name: String },
    Ctrl(Ctrl),
    CInt(ScriptInt),
    CStr { value: String },
    SStr { flag_type: String },
    VInt { flag_type: String, flag_id: ScriptInt },
    VStr { flag_type: String, flag_id: ScriptInt },
    VLoc { id: u32 },
}

impl DataElement {
    pub fn tag(&self) -> u32 {
        match self {
            DataElement::Func { .. } => TAG_FUNC,
            DataElement::Ctrl(_) => TAG_CTRL,
            DataElement::CInt(_) => TAG_CINT,
            DataElement::CStr { .. } => TAG_CSTR,
            DataElement::SStr { .. } => TAG_SSTR,
            DataElement::VInt { .. } => TAG_VINT,
            DataElement::VStr { .. } => TAG_VSTR,
            DataElement::VLoc { .. } => TAG_VLOC,
        }
    }

    /// Whether a code word naming this element is a `Target` instruction.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            DataElement::SStr { .. }
                | DataElement::VInt { .. }
                | DataElement::VStr { .. }
                | DataElement::VLoc { .. }
                | DataElement::CInt(_)
        )
    }

    pub fn as_ctrl(&self) -> Option<&Ctrl> {
        match self {
            DataElement::Ctrl(c) => Some(c),
            _ => None,
        }
    }

    pub fn func_name(&self) -> Option<&str> {
        match self {
            DataElement::Func { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for DataElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataElement::Func { name } => write!(f, "Func({name})"),
            DataElement::Ctrl(c) => write!(f, "Ctrl({})#{}", c.name, c.id),
            DataElement::CInt(v) => write!(f, "CInt({v})"),
            DataElement::CStr { value } => write!(f, "CStr({value:?})"),
            DataElement::SStr { flag_type } => write!(f, "SStr({flag_type})"),
            DataElement::VInt { flag_type, flag_id } => write!(f, "VInt({flag_type}:{flag_id})"),
            DataElement::VStr { flag_type, flag_id } => write!(f, "VStr({flag_type}:{flag_id})"),
            DataElement::VLoc { id } => write!(f, "VLoc({id})"),
        }
    }
}

/// Arena holding every element of one script; instructions refer to it by [`ElementId`].
#[derive(Debug, Clone, Default)]
pub struct ElementTable {
    elements: Vec<DataElement>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: DataElement) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(element);
        id
    }

    pub fn get(&self, id: ElementId) -> Option<&DataElement> {
        self.elements.get(id.index())
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut DataElement> {
        self.elements.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &DataElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    /// Looks up an element that must exist; a dangling id is corrupt input.
    pub fn expect(&self, id: ElementId) -> ScriptResult<&DataElement> {
        self.get(id)
            .ok_or_else(|| ScriptError::Corrupt(format!("dangling element id {}", id.0)))
    }

    pub fn ctrl(&self, id: ElementId) -> Option<&Ctrl> {
        self.get(id).and_then(DataElement::as_ctrl)
    }

    pub fn ctrl_mut(&mut self, id: ElementId) -> Option<&mut Ctrl> {
        match self.get_mut(id) {
            Some(DataElement::Ctrl(c)) => Some(c),
            _ => None,
        }
    }

    /// Links two markers to each other.
    pub fn link_pair(&mut self, a: ElementId, b: ElementId) {
        if let Some(c) = self.ctrl_mut(a) {
            c.link = Some(b);
        }
        if let Some(c) = self.ctrl_mut(b) {
            c.link = Some(a);
        }
    }
}

/// Raw on-disk form of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRecord {
    pub tag: u32,
    pub field1: u32,
    pub field2: u32,
    pub field3: u32,
}

impl ElementRecord {
    pub fn read(raw: &[u8]) -> Self {
        Self {
            tag: LittleEndian::read_u32(&raw[0..4]),
            field1: LittleEndian::read_u32(&raw[4..8]),
            field2: LittleEndian::read_u32(&raw[8..12]),
            field3: LittleEndian::read_u32(&raw[12..16]),
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        let mut raw = [0u8; ELEMENT_RECORD_SIZE];
        LittleEndian::write_u32(&mut raw[0..4], self.tag);
        LittleEndian::write_u32(&mut raw[4..8], self.field1);
        LittleEndian::write_u32(&mut raw[8..12], self.field2);
        LittleEndian::write_u32(&mut raw[12..16], self.field3);
        out.extend_from_slice(&raw);
    }
}

/// The four indexed variable families and their id limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    GlobalFlag,
    Flag,
    GlobalString,
    String,
}

impl FlagKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "GlobalFlag" => Some(FlagKind::GlobalFlag),
            "Flag" => Some(FlagKind::Flag),
            "GlobalString" => Some(FlagKind::GlobalString),
            "String" => Some(FlagKind::String),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FlagKind::GlobalFlag => "GlobalFlag",
            FlagKind::Flag => "Flag",
            FlagKind::GlobalString => "GlobalString",
            FlagKind::String => "String",
        }
    }

    /// `VInt` families hold integers, `VStr` families hold strings.
    pub fn is_int(self) -> bool {
        matches!(self, FlagKind::GlobalFlag | FlagKind::Flag)
    }

    pub fn limit(self) -> i32 {
        match self {
            FlagKind::GlobalFlag | FlagKind::GlobalString => 10_000,
            FlagKind::Flag | FlagKind::String => 65_536,
        }
    }

    pub fn in_range(self, id: i32) -> bool {
        (0..self.limit()).contains(&id)
    }
}

impl fmt::Display for FlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout_is_little_endian() {
        let rec = ElementRecord {
            tag: TAG_VINT,
            field1: 0x10,
            field2: 1,
            field3: 0x20,
        };
        let mut out = Vec::new();
        rec.write(&mut out);
        assert_eq!(out.len(), ELEMENT_RECORD_SIZE);
        assert_eq!(&out[..4], &[9, 0, 0, 0]);
        assert_eq!(ElementRecord::read(&out), rec);
    }

    #[test]
    fn flag_limits() {
        assert!(FlagKind::GlobalFlag.in_range(9_999));
        assert!(!FlagKind::GlobalFlag.in_range(10_000));
        assert!(FlagKind::String.in_range(65_535));
        assert!(!FlagKind::String.in_range(65_536));
        assert!(!FlagKind::Flag.in_range(-1));
    }

    #[test]
    fn link_pair_is_bidirectional() {
        let mut t = ElementTable::new();
        let ctrl = |name: &str| {
            DataElement::Ctrl(Ctrl {
                name: name.to_string(),
                link: None,
                id: 0,
                label_offset: 0,
            })
        };
        let open = t.push(ctrl(BLOCK_OPEN));
        let close = t.push(ctrl(BLOCK_CLOSE));
        t.link_pair(open, close);
        assert_eq!(t.ctrl(open).unwrap().link, Some(close));
        assert_eq!(t.ctrl(close).unwrap().link, Some(open));
    }
}
