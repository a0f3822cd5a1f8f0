use std::collections::HashMap;

use yuka_nls::Decoder;

use super::data_sector::DataWriter;
use super::element::*;
use super::header::{YksHeader, YKS_HEADER_LEN};
use super::instruction::{Instruction, InstructionList};
use crate::config::YukaConfig;
use crate::error::{ScriptError, ScriptResult};

/// Identity used to give each distinct element one index slot.
/// Markers are distinct per instance; every other element is compared by value.
#[derive(Debug, PartialEq, Eq, Hash)]
enum SlotKey<'l> {
    Marker(ElementId),
    Value(&'l DataElement),
}

struct Linearized<'l> {
    code: Vec<u32>,
    /// slot -> element id, in first-seen order.
    slots: Vec<ElementId>,
    slot_of: HashMap<SlotKey<'l>, u32>,
    /// element id -> code position of its label instruction.
    label_pos: HashMap<ElementId, u32>,
    /// slot -> code position of the last call through it.
    last_call: HashMap<u32, u32>,
}

impl<'l> Linearized<'l> {
    fn slot(&mut self, list: &'l InstructionList, id: ElementId) -> ScriptResult<u32> {
        let element = list.elements.expect(id)?;
        let key = match element {
            DataElement::Ctrl(_) => SlotKey::Marker(id),
            other => SlotKey::Value(other),
        };
        if let Some(slot) = self.slot_of.get(&key) {
            return Ok(*slot);
        }
        let slot = self.slots.len() as u32;
        self.slots.push(id);
        self.slot_of.insert(key, slot);
        Ok(slot)
    }
}

/// Turns an [`InstructionList`] into a compiled script.
pub struct Assembler<'a> {
    config: &'a YukaConfig,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a YukaConfig) -> Self {
        Self { config }
    }

    /// Assembles `list`, recording each emitted marker's code position in its element.
    pub fn assemble(&self, list: &mut InstructionList) -> ScriptResult<Vec<u8>> {
        self.check_locals(list)?;

        let (code, slots, label_pos, last_call) = {
            let lin = Self::linearize(list)?;
            (lin.code, lin.slots, lin.label_pos, lin.last_call)
        };

        for (id, pos) in &label_pos {
            if let Some(c) = list.elements.ctrl_mut(*id) {
                c.label_offset = *pos;
            }
        }

        let mut data = DataWriter::new(Decoder::new(self.config.nls));
        let mut index = Vec::with_capacity(slots.len() * ELEMENT_RECORD_SIZE);
        for (slot, id) in slots.iter().enumerate() {
            let element = list.elements.expect(*id)?;
            let record = Self::record(element, slot as u32, &label_pos, &last_call, &mut data)?;
            record.write(&mut index);
        }

        let encrypt = self.config.encrypt_scripts;
        let instr_offset = YKS_HEADER_LEN as u32;
        let index_offset = instr_offset + code.len() as u32 * 4;
        let data_offset = index_offset + index.len() as u32;
        let header = YksHeader {
            encryption: i16::from(encrypt),
            header_length: YKS_HEADER_LEN as i32,
            unknown1: 0,
            instr_offset,
            instr_count: code.len() as u32,
            index_offset,
            index_count: slots.len() as u32,
            data_offset,
            data_length: data.len() as u32,
            max_locals: list.max_locals,
            unknown2: 0,
        };

        let mut out = Vec::with_capacity(data_offset as usize + data.len());
        header.write(&mut out)?;
        for word in &code {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.extend_from_slice(&index);
        data.write_to(&mut out, encrypt.then_some(self.config.script_key))?;

        log::debug!(
            "assembled {} code words, {} elements, {} data bytes",
            code.len(),
            slots.len(),
            data.len()
        );
        Ok(out)
    }

    fn check_locals(&self, list: &InstructionList) -> ScriptResult<()> {
        for (_, element) in list.elements.iter() {
            if let DataElement::VLoc { id } = element {
                if *id >= list.max_locals {
                    return Err(ScriptError::Invalid(format!(
                        "local {} exceeds max_locals {}",
                        id, list.max_locals
                    )));
                }
            }
        }
        Ok(())
    }

    fn linearize(list: &InstructionList) -> ScriptResult<Linearized<'_>> {
        let mut lin = Linearized {
            code: Vec::new(),
            slots: Vec::new(),
            slot_of: HashMap::new(),
            label_pos: HashMap::new(),
            last_call: HashMap::new(),
        };

        for inst in &list.instructions {
            let pos = lin.code.len() as u32;
            match inst {
                Instruction::Call {
                    function,
                    arguments,
                } => {
                    if list.elements.expect(*function)?.func_name().is_none() {
                        return Err(ScriptError::Invalid(format!(
                            "call through non-function element {}",
                            function.0
                        )));
                    }
                    let slot = lin.slot(list, *function)?;
                    lin.last_call.insert(slot, pos);
                    lin.code.push(slot);
                    lin.code.push(arguments.len() as u32);
                    for arg in arguments {
                        let arg_slot = lin.slot(list, *arg)?;
                        lin.code.push(arg_slot);
                    }
                }
                Instruction::Label(id) => {
                    if list.elements.ctrl(*id).is_none() {
                        return Err(ScriptError::Invalid(format!(
                            "label through non-marker element {}",
                            id.0
                        )));
                    }
                    let slot = lin.slot(list, *id)?;
                    lin.label_pos.entry(*id).or_insert(pos);
                    lin.code.push(slot);
                }
                Instruction::Target(id) => {
                    if !list.elements.expect(*id)?.is_assignable() {
                        return Err(ScriptError::Invalid(format!(
                            "assignment to non-assignable element {}",
                            id.0
                        )));
                    }
                    let slot = lin.slot(list, *id)?;
                    lin.code.push(slot);
                }
            }
        }
        Ok(lin)
    }

    fn record(
        element: &DataElement,
        slot: u32,
        label_pos: &HashMap<ElementId, u32>,
        last_call: &HashMap<u32, u32>,
        data: &mut DataWriter,
    ) -> ScriptResult<ElementRecord> {
        let record = match element {
            DataElement::Func { name } => ElementRecord {
                tag: TAG_FUNC,
                field1: data.write_string(name)?,
                field2: last_call.get(&slot).copied().unwrap_or(0),
                field3: 0,
            },
            DataElement::Ctrl(ctrl) => {
                let name_offset = data.write_string(&ctrl.name)?;
                let link = match ctrl.link.and_then(|l| label_pos.get(&l)) {
                    Some(pos) => data.write_integer(*pos as i32),
                    None if is_operator(&ctrl.name) => LINK_OPERATOR,
                    None => LINK_NONE,
                };
                ElementRecord {
                    tag: TAG_CTRL,
                    field1: name_offset,
                    field2: link,
                    field3: ctrl.label_offset,
                }
            }
            DataElement::CInt(v) => ElementRecord {
                tag: TAG_CINT,
                field1: u32::from(v.pointer),
                field2: data.write_integer(v.value),
                field3: 0,
            },
            DataElement::CStr { value } => ElementRecord {
                tag: TAG_CSTR,
                field1: 0,
                field2: data.write_string(value)?,
                field3: 0,
            },
            DataElement::SStr { flag_type } => ElementRecord {
                tag: TAG_SSTR,
                field1: data.write_string(flag_type)?,
                field2: 0,
                field3: 0,
            },
            DataElement::VInt { flag_type, flag_id } | DataElement::VStr { flag_type, flag_id } => {
                ElementRecord {
                    tag: element.tag(),
                    field1: data.write_string(flag_type)?,
                    field2: u32::from(flag_id.pointer),
                    field3: data.write_integer(flag_id.value),
                }
            }
            DataElement::VLoc { id } => ElementRecord {
                tag: TAG_VLOC,
                field1: 0,
                field2: 0,
                field3: *id,
            },
        };
        Ok(record)
    }
}
