use byteorder::{ByteOrder, LittleEndian};
use yuka_nls::Decoder;

use super::data_sector::DataReader;
use super::element::*;
use super::header::YksHeader;
use super::instruction::{Instruction, InstructionList};
use crate::config::YukaConfig;
use crate::error::{ScriptError, ScriptResult};

/// Turns a compiled script back into an [`InstructionList`].
pub struct Disassembler<'a> {
    config: &'a YukaConfig,
    next_label_id: u32,
}

fn section<'b>(bytes: &'b [u8], offset: u32, len: usize) -> ScriptResult<&'b [u8]> {
    let start = offset as usize;
    match start.checked_add(len) {
        Some(end) if end <= bytes.len() => Ok(&bytes[start..end]),
        _ => Err(ScriptError::OutOfRange {
            offset: start,
            len: bytes.len(),
        }),
    }
}

impl<'a> Disassembler<'a> {
    pub fn new(config: &'a YukaConfig) -> Self {
        Self {
            config,
            next_label_id: 0,
        }
    }

    pub fn disassemble(&mut self, bytes: &[u8]) -> ScriptResult<InstructionList> {
        let header = YksHeader::read(bytes)?;

        let code_raw = section(bytes, header.instr_offset, header.instr_count as usize * 4)?;
        let code: Vec<u32> = code_raw.chunks_exact(4).map(LittleEndian::read_u32).collect();

        let index_raw = section(
            bytes,
            header.index_offset,
            header.index_count as usize * ELEMENT_RECORD_SIZE,
        )?;
        let records: Vec<ElementRecord> = index_raw
            .chunks_exact(ELEMENT_RECORD_SIZE)
            .map(ElementRecord::read)
            .collect();

        let data_raw = section(bytes, header.data_offset, header.data_length as usize)?;
        let key = header.is_encrypted().then_some(self.config.script_key);
        let data = DataReader::new(data_raw.to_vec(), key, Decoder::new(self.config.nls));

        let mut elements = ElementTable::new();
        for (index, record) in records.iter().enumerate() {
            let element = self.read_element(index, record, &data)?;
            elements.push(element);
        }

        self.resolve_links(&mut elements, &records, &code, &data);

        let instructions = Self::walk_code(&code, &elements)?;

        log::debug!(
            "disassembled {} instructions, {} elements, {} data bytes",
            instructions.len(),
            elements.len(),
            data.len()
        );

        Ok(InstructionList {
            elements,
            instructions,
            max_locals: header.max_locals,
        })
    }

    fn read_element(
        &mut self,
        index: usize,
        rec: &ElementRecord,
        data: &DataReader,
    ) -> ScriptResult<DataElement> {
        let element = match rec.tag {
            TAG_FUNC => DataElement::Func {
                name: data.get_string(rec.field1)?.to_string(),
            },
            TAG_CTRL => {
                let id = self.next_label_id;
                self.next_label_id += 1;
                DataElement::Ctrl(Ctrl {
                    name: data.get_string(rec.field1)?.to_string(),
                    link: None,
                    id,
                    label_offset: rec.field3,
                })
            }
            TAG_CINT => DataElement::CInt(ScriptInt {
                value: data.get_integer(rec.field2)?,
                pointer: rec.field1 != 0,
            }),
            TAG_CSTR => DataElement::CStr {
                value: data.get_string(rec.field2)?.to_string(),
            },
            TAG_SSTR => DataElement::SStr {
                flag_type: data.get_string(rec.field1)?.to_string(),
            },
            TAG_VINT => DataElement::VInt {
                flag_type: data.get_string(rec.field1)?.to_string(),
                flag_id: ScriptInt {
                    value: data.get_integer(rec.field3)?,
                    pointer: rec.field2 != 0,
                },
            },
            TAG_VSTR => DataElement::VStr {
                flag_type: data.get_string(rec.field1)?.to_string(),
                flag_id: ScriptInt {
                    value: data.get_integer(rec.field3)?,
                    pointer: rec.field2 != 0,
                },
            },
            TAG_VLOC => DataElement::VLoc { id: rec.field3 },
            tag => return Err(ScriptError::InvalidElementType { index, tag }),
        };
        Ok(element)
    }

    /// Best effort: anything that does not land on a `Ctrl` in the code stream stays unlinked.
    fn resolve_links(
        &self,
        elements: &mut ElementTable,
        records: &[ElementRecord],
        code: &[u32],
        data: &DataReader,
    ) {
        for (index, record) in records.iter().enumerate() {
            if record.tag != TAG_CTRL || record.field2 == LINK_NONE || record.field2 == LINK_OPERATOR
            {
                continue;
            }
            let target = data
                .get_integer(record.field2)
                .ok()
                .and_then(|pos| usize::try_from(pos).ok())
                .and_then(|pos| code.get(pos))
                .map(|slot| ElementId(*slot))
                .filter(|slot| elements.ctrl(*slot).is_some());

            match target {
                Some(linked) => {
                    if let Some(c) = elements.ctrl_mut(ElementId(index as u32)) {
                        c.link = Some(linked);
                    }
                }
                None => log::debug!("label element {} has an unresolvable link", index),
            }
        }
    }

    fn walk_code(code: &[u32], elements: &ElementTable) -> ScriptResult<Vec<Instruction>> {
        let element_at = |pos: usize| -> ScriptResult<ElementId> {
            let slot = *code
                .get(pos)
                .ok_or_else(|| ScriptError::Corrupt(format!("truncated code at word {pos}")))?;
            if slot as usize >= elements.len() {
                return Err(ScriptError::Corrupt(format!(
                    "code word {pos} references element {slot} of {}",
                    elements.len()
                )));
            }
            Ok(ElementId(slot))
        };

        let mut instructions = Vec::new();
        let mut pos = 0usize;
        while pos < code.len() {
            let id = element_at(pos)?;
            let element = elements.expect(id)?;
            match element {
                DataElement::Func { .. } => {
                    let argc = *code.get(pos + 1).ok_or_else(|| {
                        ScriptError::Corrupt(format!("call at word {pos} has no argument count"))
                    })? as usize;
                    if pos + 2 + argc > code.len() {
                        return Err(ScriptError::Corrupt(format!(
                            "call at word {pos} overruns the code stream ({argc} arguments)"
                        )));
                    }
                    let arguments = (0..argc)
                        .map(|i| element_at(pos + 2 + i))
                        .collect::<ScriptResult<Vec<_>>>()?;
                    instructions.push(Instruction::Call {
                        function: id,
                        arguments,
                    });
                    pos += 2 + argc;
                }
                DataElement::Ctrl(_) => {
                    instructions.push(Instruction::Label(id));
                    pos += 1;
                }
                e if e.is_assignable() => {
                    instructions.push(Instruction::Target(id));
                    pos += 1;
                }
                other => {
                    return Err(ScriptError::Corrupt(format!(
                        "{other} cannot start an instruction (word {pos})"
                    )));
                }
            }
        }
        Ok(instructions)
    }
}
