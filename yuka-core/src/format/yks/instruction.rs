use std::fmt::Write as _;

use itertools::Itertools;

use super::element::{DataElement, ElementId, ElementTable};

/// One structured instruction of the flat code stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Call {
        function: ElementId,
        arguments: Vec<ElementId>,
    },
    Label(ElementId),
    /// The next `=` call stores its result here.
    Target(ElementId),
}

impl Instruction {
    /// Width of the instruction in code words.
    pub fn width(&self) -> usize {
        match self {
            Instruction::Call { arguments, .. } => 2 + arguments.len(),
            Instruction::Label(_) | Instruction::Target(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstructionList {
    pub elements: ElementTable,
    pub instructions: Vec<Instruction>,
    /// Size of the local register pool.
    pub max_locals: u32,
}

impl InstructionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&DataElement> {
        self.elements.get(id)
    }

    fn describe(&self, id: ElementId) -> String {
        match self.elements.get(id) {
            Some(e) => e.to_string(),
            None => format!("<dangling {}>", id.0),
        }
    }

    /// Human readable dump, one instruction per line, prefixed by its code position.
    pub fn listing(&self) -> String {
        let mut out = String::new();
        let mut pos = 0usize;
        let _ = writeln!(out, "; max_locals = {}", self.max_locals);
        for inst in &self.instructions {
            let line = match inst {
                Instruction::Call {
                    function,
                    arguments,
                } => {
                    let args = arguments.iter().map(|a| self.describe(*a)).join(", ");
                    format!("call   {} [{}]", self.describe(*function), args)
                }
                Instruction::Label(id) => match self.elements.ctrl(*id) {
                    Some(c) => {
                        let link = match c.link.and_then(|l| self.elements.ctrl(l)) {
                            Some(l) => format!(" -> #{}", l.id),
                            None => String::new(),
                        };
                        format!("label  {} @{}{}", self.describe(*id), c.label_offset, link)
                    }
                    None => format!("label  {}", self.describe(*id)),
                },
                Instruction::Target(id) => format!("target {}", self.describe(*id)),
            };
            let _ = writeln!(out, "{:08}  {}", pos, line);
            pos += inst.width();
        }
        out
    }
}
