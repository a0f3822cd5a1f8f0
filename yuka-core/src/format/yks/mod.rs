//! YKS compiled scripts.
//!
//! Layout: a 48-byte [`YksHeader`], a flat stream of 32-bit code words, a table of 16-byte
//! element records, and a data sector holding the integers and strings the records point at.
//!
//! Code words are indices into the element table. A word naming a `Func` starts a call and
//! is followed by an argument count and that many argument indices; a `Ctrl` word is a label;
//! any assignable element is an assignment target for the following `=` call.

mod assemble;
pub mod data_sector;
mod disassemble;
pub mod element;
mod header;
mod instruction;

pub use assemble::Assembler;
pub use disassemble::Disassembler;
pub use element::{Ctrl, DataElement, ElementId, ElementTable, FlagKind, ScriptInt};
pub use header::{YksHeader, YKS_HEADER_LEN, YKS_SIGNATURE};
pub use instruction::{Instruction, InstructionList};

pub fn is_yks(bytes: &[u8]) -> bool {
    bytes.starts_with(YKS_SIGNATURE)
}

#[cfg(test)]
mod tests {
    use super::element::*;
    use super::*;
    use crate::config::{YukaConfig, YukaConfigBuilder};
    use crate::error::ScriptError;

    fn ctrl(name: &str) -> DataElement {
        DataElement::Ctrl(Ctrl {
            name: name.to_string(),
            link: None,
            id: 0,
            label_offset: 0,
        })
    }

    /// `:top` / `StrOut("hi", Flag:3)` / `{ }` / `GlobalFlag:1 = 2 + 3`
    fn sample() -> InstructionList {
        let mut list = InstructionList::new();
        let e = &mut list.elements;
        let top = e.push(ctrl("top"));
        e.link_pair(top, top);
        let str_out = e.push(DataElement::Func {
            name: "StrOut".into(),
        });
        let hi = e.push(DataElement::CStr { value: "hi".into() });
        let flag = e.push(DataElement::VInt {
            flag_type: "Flag".into(),
            flag_id: ScriptInt::plain(3),
        });
        let open = e.push(ctrl(BLOCK_OPEN));
        let close = e.push(ctrl(BLOCK_CLOSE));
        e.link_pair(open, close);
        let gflag = e.push(DataElement::VInt {
            flag_type: "GlobalFlag".into(),
            flag_id: ScriptInt::plain(1),
        });
        let assign = e.push(DataElement::Func { name: "=".into() });
        let two = e.push(DataElement::CInt(ScriptInt::plain(2)));
        let plus = e.push(ctrl("+"));
        let three = e.push(DataElement::CInt(ScriptInt::plain(3)));
        list.instructions = vec![
            Instruction::Label(top),
            Instruction::Call {
                function: str_out,
                arguments: vec![hi, flag],
            },
            Instruction::Label(open),
            Instruction::Label(close),
            Instruction::Target(gflag),
            Instruction::Call {
                function: assign,
                arguments: vec![two, plus, three],
            },
        ];
        list
    }

    #[test]
    fn disassembles_what_was_assembled() {
        let config = YukaConfig::default();
        let mut list = sample();
        let bytes = Assembler::new(&config).assemble(&mut list).unwrap();
        assert!(is_yks(&bytes));

        let back = Disassembler::new(&config).disassemble(&bytes).unwrap();
        assert_eq!(back.instructions.len(), list.instructions.len());
        assert_eq!(back.max_locals, 0);

        let Instruction::Call { function, arguments } = &back.instructions[1] else {
            panic!("expected a call");
        };
        assert_eq!(back.elements.get(*function).unwrap().func_name(), Some("StrOut"));
        assert_eq!(
            back.elements.get(arguments[0]),
            Some(&DataElement::CStr { value: "hi".into() })
        );

        // unique label links to itself, braces link to each other, operators stay unlinked
        let Instruction::Label(top) = back.instructions[0] else {
            panic!("expected a label");
        };
        assert_eq!(back.elements.ctrl(top).unwrap().link, Some(top));
        let (Instruction::Label(open), Instruction::Label(close)) =
            (&back.instructions[2], &back.instructions[3])
        else {
            panic!("expected braces");
        };
        assert_eq!(back.elements.ctrl(*open).unwrap().link, Some(*close));
        assert_eq!(back.elements.ctrl(*close).unwrap().link, Some(*open));
        assert_eq!(back.elements.ctrl(*close).unwrap().label_offset, 6);
        let Instruction::Call { arguments, .. } = &back.instructions[5] else {
            panic!("expected a call");
        };
        assert_eq!(back.elements.ctrl(arguments[1]).unwrap().link, None);
    }

    #[test]
    fn reassembly_is_byte_identical() {
        let config = YukaConfig::default();
        let mut list = sample();
        let first = Assembler::new(&config).assemble(&mut list).unwrap();
        let mut back = Disassembler::new(&config).disassemble(&first).unwrap();
        let second = Assembler::new(&config).assemble(&mut back).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn header_tracks_encryption() {
        let plain = YukaConfigBuilder::new().with_encryption(false).get();
        let mut list = sample();
        let bytes = Assembler::new(&plain).assemble(&mut list).unwrap();
        let header = YksHeader::read(&bytes).unwrap();
        assert_eq!(header.encryption, 0);
        let data = &bytes[header.data_offset as usize..];
        assert!(data.windows(6).any(|w| w == b"StrOut"));

        let encrypted = YukaConfig::default();
        let bytes = Assembler::new(&encrypted).assemble(&mut list).unwrap();
        let header = YksHeader::read(&bytes).unwrap();
        assert_eq!(header.encryption, 1);
        let data = &bytes[header.data_offset as usize..];
        assert!(!data.windows(6).any(|w| w == b"StrOut"));
    }

    #[test]
    fn duplicate_values_share_a_slot() {
        let config = YukaConfig::default();
        let mut list = InstructionList::new();
        let f1 = list.elements.push(DataElement::Func { name: "A".into() });
        let f2 = list.elements.push(DataElement::Func { name: "A".into() });
        list.instructions = vec![
            Instruction::Call {
                function: f1,
                arguments: vec![],
            },
            Instruction::Call {
                function: f2,
                arguments: vec![],
            },
        ];
        let bytes = Assembler::new(&config).assemble(&mut list).unwrap();
        let header = YksHeader::read(&bytes).unwrap();
        assert_eq!(header.index_count, 1);
        assert_eq!(header.instr_count, 4);
    }

    #[test]
    fn invalid_element_type_is_fatal() {
        let config = YukaConfig::default();
        let mut list = sample();
        let mut bytes = Assembler::new(&config).assemble(&mut list).unwrap();
        let header = YksHeader::read(&bytes).unwrap();
        let at = header.index_offset as usize;
        bytes[at..at + 4].copy_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            Disassembler::new(&config).disassemble(&bytes),
            Err(ScriptError::InvalidElementType { index: 0, tag: 7 })
        ));
    }

    #[test]
    fn locals_beyond_pool_are_rejected() {
        let config = YukaConfig::default();
        let mut list = InstructionList::new();
        let loc = list.elements.push(DataElement::VLoc { id: 2 });
        let assign = list.elements.push(DataElement::Func { name: "=".into() });
        list.instructions = vec![
            Instruction::Target(loc),
            Instruction::Call {
                function: assign,
                arguments: vec![],
            },
        ];
        list.max_locals = 2;
        assert!(matches!(
            Assembler::new(&config).assemble(&mut list),
            Err(ScriptError::Invalid(_))
        ));
    }

    #[test]
    fn dangling_link_stays_unlinked() {
        let config = YukaConfigBuilder::new().with_encryption(false).get();
        let mut list = sample();
        let mut bytes = Assembler::new(&config).assemble(&mut list).unwrap();
        let header = YksHeader::read(&bytes).unwrap();
        // slot 0 is `:top`; point its link at a huge code position
        let link_field = header.index_offset as usize + 8;
        let link_off = u32::from_le_bytes(bytes[link_field..link_field + 4].try_into().unwrap());
        let at = (header.data_offset + link_off) as usize;
        bytes[at..at + 4].copy_from_slice(&9999i32.to_le_bytes());
        let back = Disassembler::new(&config).disassemble(&bytes).unwrap();
        let Instruction::Label(top) = back.instructions[0] else {
            panic!("expected a label");
        };
        assert_eq!(back.elements.ctrl(top).unwrap().link, None);
    }
}
