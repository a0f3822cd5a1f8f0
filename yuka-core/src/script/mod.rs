//! Statement-level view of YKS scripts: compiler, decompiler and text printer.

pub mod ast;
mod compiler;
mod decompiler;
pub mod printer;
mod string_table;

pub use ast::*;
pub use compiler::Compiler;
pub use decompiler::Decompiler;
pub use printer::print_statements;
pub use string_table::{StringEntry, StringTable};

use crate::config::YukaConfig;
use crate::error::ScriptResult;
use crate::format::yks::{Assembler, Disassembler};

/// A decompiled script together with the strings moved out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub statements: Vec<Statement>,
    pub strings: StringTable,
}

impl Script {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            statements,
            strings: StringTable::new(),
        }
    }

    /// Disassembles and decompiles a compiled script.
    pub fn from_bytes(bytes: &[u8], config: &YukaConfig) -> ScriptResult<Self> {
        let list = Disassembler::new(config).disassemble(bytes)?;
        let mut strings = StringTable::new();
        let statements = Decompiler::new(config)?.decompile(&list, Some(&mut strings))?;
        Ok(Self {
            statements,
            strings,
        })
    }

    /// Compiles and assembles the script.
    pub fn to_bytes(&self, config: &YukaConfig) -> ScriptResult<Vec<u8>> {
        let mut list = Compiler::new(config)
            .with_strings(&self.strings)
            .compile(&self.statements)?;
        Assembler::new(config).assemble(&mut list)
    }

    pub fn to_text(&self) -> String {
        print_statements(&self.statements)
    }
}
