use std::collections::HashMap;

use super::ast::*;
use super::StringTable;
use crate::config::YukaConfig;
use crate::error::{ScriptError, ScriptResult};
use crate::format::yks::element::{
    is_operator, Ctrl, DataElement, ElementId, ScriptInt, ASSIGN_FUNC, BLOCK_CLOSE, BLOCK_OPEN,
    ELSE_LABEL, IF_FUNC,
};
use crate::format::yks::{Instruction, InstructionList};

/// Builds elements on demand, handing out one element per distinct value.
#[derive(Default)]
struct DataSet {
    list: InstructionList,
    values: HashMap<DataElement, ElementId>,
    operators: HashMap<String, ElementId>,
    labels: HashMap<String, ElementId>,
    next_label_id: u32,
}

impl DataSet {
    fn value(&mut self, element: DataElement) -> ElementId {
        if let Some(id) = self.values.get(&element) {
            return *id;
        }
        let id = self.list.elements.push(element.clone());
        self.values.insert(element, id);
        id
    }

    fn func(&mut self, name: &str) -> ElementId {
        self.value(DataElement::Func {
            name: name.to_string(),
        })
    }

    fn local(&mut self, id: u32) -> ElementId {
        self.value(DataElement::VLoc { id })
    }

    fn new_ctrl(&mut self, name: &str) -> ElementId {
        let id = self.next_label_id;
        self.next_label_id += 1;
        self.list.elements.push(DataElement::Ctrl(Ctrl {
            name: name.to_string(),
            link: None,
            id,
            label_offset: 0,
        }))
    }

    fn operator(&mut self, op: &str) -> ScriptResult<ElementId> {
        if !is_operator(op) {
            return Err(ScriptError::Invalid(format!("unknown operator {op:?}")));
        }
        if let Some(id) = self.operators.get(op) {
            return Ok(*id);
        }
        let id = self.new_ctrl(op);
        self.operators.insert(op.to_string(), id);
        Ok(id)
    }

    fn label(&mut self, name: &str) -> ScriptResult<ElementId> {
        if name == BLOCK_OPEN || name == BLOCK_CLOSE || is_operator(name) {
            return Err(ScriptError::Invalid(format!("{name:?} cannot be a label name")));
        }
        if let Some(id) = self.labels.get(name) {
            return Ok(*id);
        }
        let id = self.new_ctrl(name);
        self.labels.insert(name.to_string(), id);
        Ok(id)
    }

    fn emit(&mut self, inst: Instruction) {
        self.list.instructions.push(inst);
    }
}

/// First-fit pool of local registers.
#[derive(Default)]
struct LocalPool {
    used: Vec<bool>,
}

impl LocalPool {
    fn alloc(&mut self) -> u32 {
        match self.used.iter().position(|u| !u) {
            Some(free) => {
                self.used[free] = true;
                free as u32
            }
            None => {
                self.used.push(true);
                (self.used.len() - 1) as u32
            }
        }
    }

    fn free(&mut self, id: u32) {
        if let Some(slot) = self.used.get_mut(id as usize) {
            *slot = false;
        }
    }

    fn in_use(&self) -> usize {
        self.used.iter().filter(|u| **u).count()
    }

    fn high_water(&self) -> u32 {
        self.used.len() as u32
    }
}

/// Compiles a statement tree into an [`InstructionList`].
pub struct Compiler<'a> {
    config: &'a YukaConfig,
    data: DataSet,
    locals: LocalPool,
    strings: Option<&'a StringTable>,
}

impl<'a> Compiler<'a> {
    pub fn new(config: &'a YukaConfig) -> Self {
        Self {
            config,
            data: DataSet::default(),
            locals: LocalPool::default(),
            strings: None,
        }
    }

    /// Resolves externalized string literals through `strings`.
    pub fn with_strings(mut self, strings: &'a StringTable) -> Self {
        self.strings = Some(strings);
        self
    }

    pub fn compile(mut self, statements: &[Statement]) -> ScriptResult<InstructionList> {
        log::debug!(
            "compiling {} statements ({:?})",
            statements.len(),
            self.config.nls
        );
        self.statements(statements)?;
        let mut list = self.data.list;
        list.max_locals = self.locals.high_water();
        Ok(list)
    }

    fn statements(&mut self, statements: &[Statement]) -> ScriptResult<()> {
        for (i, statement) in statements.iter().enumerate() {
            check_neighbours(statement, statements.get(i + 1))?;
            self.statement(statement)?;
            if self.locals.in_use() != 0 {
                return Err(ScriptError::Internal(format!(
                    "{} locals still live after {:?}",
                    self.locals.in_use(),
                    statement
                )));
            }
        }
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> ScriptResult<()> {
        match statement {
            Statement::Block(body) => self.block(body),
            Statement::Assignment { target, value } => self.assignment(target, value),
            Statement::Call(call) => {
                let inst = self.call(call)?;
                self.data.emit(inst);
                Ok(())
            }
            Statement::BodyFunction { call, body } => {
                if call.name == IF_FUNC {
                    return Err(ScriptError::Invalid(
                        "`if` with a body must be an if statement".into(),
                    ));
                }
                let inst = self.call(call)?;
                self.data.emit(inst);
                self.block(body)
            }
            Statement::If {
                condition,
                body,
                else_body,
            } => {
                let arguments = self.operand_list(condition)?;
                self.release(&arguments);
                let function = self.data.func(IF_FUNC);
                self.data.emit(Instruction::Call {
                    function,
                    arguments,
                });
                self.block(body)?;
                if let Some(else_body) = else_body {
                    let marker = self.data.new_ctrl(ELSE_LABEL);
                    self.data.emit(Instruction::Label(marker));
                    self.block(else_body)?;
                }
                Ok(())
            }
            Statement::JumpLabel(name) => {
                let marker = self.data.label(name)?;
                self.data.list.elements.link_pair(marker, marker);
                self.data.emit(Instruction::Label(marker));
                Ok(())
            }
        }
    }

    fn block(&mut self, body: &[Statement]) -> ScriptResult<()> {
        let open = self.data.new_ctrl(BLOCK_OPEN);
        let close = self.data.new_ctrl(BLOCK_CLOSE);
        self.data.list.elements.link_pair(open, close);
        self.data.emit(Instruction::Label(open));
        self.statements(body)?;
        self.data.emit(Instruction::Label(close));
        Ok(())
    }

    fn assignment(&mut self, target: &AssignTarget, value: &Expression) -> ScriptResult<()> {
        let target = self.target(target)?;
        let assign = self.data.func(ASSIGN_FUNC);
        match value {
            Expression::Call(call) => {
                let inst = self.call(call)?;
                self.data.emit(Instruction::Target(target));
                self.data.emit(Instruction::Call {
                    function: assign,
                    arguments: vec![],
                });
                self.data.emit(inst);
            }
            other => {
                let arguments = self.operand_list(other)?;
                self.release(&arguments);
                self.data.emit(Instruction::Target(target));
                self.data.emit(Instruction::Call {
                    function: assign,
                    arguments,
                });
            }
        }
        Ok(())
    }

    /// Compiles the arguments and returns the call instruction without emitting it.
    fn call(&mut self, call: &FunctionCall) -> ScriptResult<Instruction> {
        if call.name == ASSIGN_FUNC {
            return Err(ScriptError::Invalid("`=` cannot be called directly".into()));
        }
        let mut arguments = Vec::with_capacity(call.arguments.len());
        for arg in &call.arguments {
            let id = match arg {
                Expression::LabelRef(name) => self.data.label(name)?,
                Expression::Operator(_) | Expression::Call(_) => self.to_local(arg)?,
                simple => self.simple(simple)?,
            };
            arguments.push(id);
        }
        self.release(&arguments);
        Ok(Instruction::Call {
            function: self.data.func(&call.name),
            arguments,
        })
    }

    /// Flattens an expression into the interleaved operand/operator list of a `=` call.
    fn operand_list(&mut self, expr: &Expression) -> ScriptResult<Vec<ElementId>> {
        let Expression::Operator(op) = expr else {
            return self.operand(expr);
        };
        if op.ops.is_empty() {
            return Err(ScriptError::Invalid(
                "operator expression without an operator".into(),
            ));
        }
        if op.operands.len() != op.ops.len() + 1 {
            return Err(ScriptError::Invalid(format!(
                "{} operands for {} operators",
                op.operands.len(),
                op.ops.len()
            )));
        }
        let mut list = Vec::with_capacity(op.operands.len() * 2);
        for (i, operand) in op.operands.iter().enumerate() {
            if i > 0 {
                list.push(self.data.operator(&op.ops[i - 1])?);
            }
            list.extend(self.operand(operand)?);
        }
        Ok(list)
    }

    /// One operand of an operator list: a single element, or a sign marker followed by one.
    fn operand(&mut self, expr: &Expression) -> ScriptResult<Vec<ElementId>> {
        match expr {
            Expression::Operator(op) => match op.as_unary() {
                Some((sign, x)) if !matches!(x, Expression::LabelRef(_)) => {
                    let marker = self.data.operator(sign)?;
                    let value = match x {
                        Expression::Operator(_) | Expression::Call(_) => self.to_local(x)?,
                        simple => self.simple(simple)?,
                    };
                    Ok(vec![marker, value])
                }
                _ => Ok(vec![self.to_local(expr)?]),
            },
            Expression::Call(_) => Ok(vec![self.to_local(expr)?]),
            Expression::LabelRef(name) => Err(ScriptError::Invalid(format!(
                "label :{name} cannot be an operand"
            ))),
            simple => Ok(vec![self.simple(simple)?]),
        }
    }

    /// Evaluates `expr` into a fresh local and returns that local.
    fn to_local(&mut self, expr: &Expression) -> ScriptResult<ElementId> {
        let assign = self.data.func(ASSIGN_FUNC);
        match expr {
            Expression::Call(call) => {
                let inst = self.call(call)?;
                let local = self.alloc_local();
                self.data.emit(Instruction::Target(local));
                self.data.emit(Instruction::Call {
                    function: assign,
                    arguments: vec![],
                });
                self.data.emit(inst);
                Ok(local)
            }
            other => {
                let arguments = self.operand_list(other)?;
                self.release(&arguments);
                let local = self.alloc_local();
                self.data.emit(Instruction::Target(local));
                self.data.emit(Instruction::Call {
                    function: assign,
                    arguments,
                });
                Ok(local)
            }
        }
    }

    fn alloc_local(&mut self) -> ElementId {
        let id = self.locals.alloc();
        self.data.local(id)
    }

    /// Frees every local referenced by `ids`.
    fn release(&mut self, ids: &[ElementId]) {
        for id in ids {
            if let Some(DataElement::VLoc { id }) = self.data.list.elements.get(*id) {
                let local = *id;
                self.locals.free(local);
            }
        }
    }

    fn simple(&mut self, expr: &Expression) -> ScriptResult<ElementId> {
        let element = match expr {
            Expression::Integer(v) => DataElement::CInt(ScriptInt::plain(*v)),
            Expression::Pointer(v) => DataElement::CInt(ScriptInt::pointer(*v)),
            Expression::String(literal) => DataElement::CStr {
                value: self.resolve_string(literal)?,
            },
            Expression::Variable(var) => variable_element(var, false)?,
            Expression::VariablePointer { kind, id } => {
                variable_element(&Variable::Flag { kind: *kind, id: *id }, true)?
            }
            other => {
                return Err(ScriptError::Internal(format!(
                    "{other:?} is not a simple value"
                )))
            }
        };
        Ok(self.data.value(element))
    }

    fn target(&mut self, target: &AssignTarget) -> ScriptResult<ElementId> {
        let element = match target {
            AssignTarget::Variable(var) => variable_element(var, false)?,
            AssignTarget::VariablePointer { kind, id } => {
                variable_element(&Variable::Flag { kind: *kind, id: *id }, true)?
            }
            AssignTarget::Pointer(v) => DataElement::CInt(ScriptInt::pointer(*v)),
        };
        Ok(self.data.value(element))
    }

    fn resolve_string(&self, literal: &StringLiteral) -> ScriptResult<String> {
        match literal {
            StringLiteral::Plain(text) => Ok(text.clone()),
            StringLiteral::External(key) => {
                let table = self.strings.ok_or_else(|| {
                    ScriptError::Unsupported(format!(
                        "externalized string @{key} without a string table"
                    ))
                })?;
                match table.get(key) {
                    Some(text) => Ok(text.to_string()),
                    None => {
                        log::warn!("missing string table entry @{key}, keeping the key");
                        Ok(key.clone())
                    }
                }
            }
        }
    }
}

/// Rejects statement pairs whose code would read back as a different statement.
fn check_neighbours(statement: &Statement, next: Option<&Statement>) -> ScriptResult<()> {
    match (statement, next) {
        (Statement::Call(call), Some(Statement::Block(_))) => Err(ScriptError::Invalid(format!(
            "call to {} directly followed by a block",
            call.name
        ))),
        (
            Statement::If {
                else_body: None, ..
            },
            Some(Statement::JumpLabel(name)),
        ) if name == ELSE_LABEL => Err(ScriptError::Invalid(format!(
            "label :{ELSE_LABEL} directly after an if statement"
        ))),
        _ => Ok(()),
    }
}

fn variable_element(var: &Variable, pointer: bool) -> ScriptResult<DataElement> {
    match var {
        Variable::Special(name) => Ok(DataElement::SStr {
            flag_type: name.clone(),
        }),
        Variable::Flag { kind, id } => {
            if !kind.in_range(*id) {
                return Err(ScriptError::Invalid(format!(
                    "{kind}:{id} is out of range (limit {})",
                    kind.limit()
                )));
            }
            let flag_id = ScriptInt { value: *id, pointer };
            let flag_type = kind.name().to_string();
            Ok(if kind.is_int() {
                DataElement::VInt { flag_type, flag_id }
            } else {
                DataElement::VStr { flag_type, flag_id }
            })
        }
    }
}
