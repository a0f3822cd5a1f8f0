use std::collections::HashMap;

use super::ast::*;
use super::StringTable;
use crate::config::{ExternalizeRules, YukaConfig};
use crate::error::{ScriptError, ScriptResult};
use crate::format::yks::element::{
    is_operator, DataElement, ElementId, ASSIGN_FUNC, BLOCK_CLOSE, BLOCK_OPEN, ELSE_LABEL, IF_FUNC,
};
use crate::format::yks::{FlagKind, Instruction, InstructionList};

/// Deepest block nesting accepted from compiled code.
const MAX_BLOCK_DEPTH: usize = 64;

enum LocalState {
    Assigned(Expression),
    Consumed,
}

/// Rebuilds a statement tree from an [`InstructionList`].
pub struct Decompiler {
    rules: Option<ExternalizeRules>,
}

/// Cursor state for one decompilation.
struct Walk<'l, 's> {
    list: &'l InstructionList,
    pos: usize,
    depth: usize,
    locals: HashMap<u32, LocalState>,
    rules: Option<&'l ExternalizeRules>,
    strings: Option<&'s mut StringTable>,
}

impl Decompiler {
    pub fn new(config: &YukaConfig) -> ScriptResult<Self> {
        let rules = match &config.externalize {
            Some(ext) => Some(ext.compile()?),
            None => None,
        };
        Ok(Self { rules })
    }

    /// Decompiles `list`. Externalized strings are added to `strings`, which must be given
    /// when externalization is configured.
    pub fn decompile(
        &self,
        list: &InstructionList,
        strings: Option<&mut StringTable>,
    ) -> ScriptResult<Vec<Statement>> {
        if self.rules.is_some() && strings.is_none() {
            return Err(ScriptError::Unsupported(
                "string externalization is configured but no string table was given".into(),
            ));
        }
        let mut walk = Walk {
            list,
            pos: 0,
            depth: 0,
            locals: HashMap::new(),
            rules: self.rules.as_ref(),
            strings,
        };
        let statements = walk.block(true)?;
        let dangling = walk
            .locals
            .values()
            .filter(|s| matches!(s, LocalState::Assigned(_)))
            .count();
        if dangling > 0 {
            log::warn!("{dangling} locals were assigned but never used");
        }
        Ok(statements)
    }
}

impl<'l, 's> Walk<'l, 's> {
    fn peek(&self) -> Option<&'l Instruction> {
        self.list.instructions.get(self.pos)
    }

    fn next(&mut self) -> Option<&'l Instruction> {
        let inst = self.list.instructions.get(self.pos);
        if inst.is_some() {
            self.pos += 1;
        }
        inst
    }

    fn element(&self, id: ElementId) -> ScriptResult<&'l DataElement> {
        self.list.elements.expect(id)
    }

    fn label_name(&self, inst: Option<&Instruction>) -> Option<&'l str> {
        match inst {
            Some(Instruction::Label(id)) => self.list.elements.ctrl(*id).map(|c| c.name.as_str()),
            _ => None,
        }
    }

    /// Reads statements up to the matching `}` (consumed), or to the end at top level.
    fn block(&mut self, top: bool) -> ScriptResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            let Some(inst) = self.next() else {
                if top {
                    return Ok(statements);
                }
                return Err(ScriptError::Corrupt("unterminated block".into()));
            };
            match inst {
                Instruction::Label(id) => {
                    let ctrl = self
                        .list
                        .elements
                        .ctrl(*id)
                        .ok_or_else(|| ScriptError::Corrupt(format!("label {} is not a marker", id.0)))?;
                    match ctrl.name.as_str() {
                        BLOCK_CLOSE if top => {
                            return Err(ScriptError::Corrupt(format!(
                                "unbalanced `}}` at instruction {}",
                                self.pos - 1
                            )));
                        }
                        BLOCK_CLOSE => return Ok(statements),
                        BLOCK_OPEN => statements.push(Statement::Block(self.nested()?)),
                        name => statements.push(Statement::JumpLabel(name.to_string())),
                    }
                }
                Instruction::Target(id) => {
                    if let Some(statement) = self.assignment(*id)? {
                        statements.push(statement);
                    }
                }
                Instruction::Call {
                    function,
                    arguments,
                } => {
                    let name = self.func_name(*function)?;
                    if name == ASSIGN_FUNC {
                        return Err(ScriptError::Corrupt(format!(
                            "`=` without a target at instruction {}",
                            self.pos - 1
                        )));
                    }
                    statements.push(self.call_statement(name, arguments)?);
                }
            }
        }
    }

    /// Reads the body of a block whose `{` was just consumed.
    fn nested(&mut self) -> ScriptResult<Vec<Statement>> {
        if self.depth >= MAX_BLOCK_DEPTH {
            return Err(ScriptError::Corrupt(format!(
                "blocks nested deeper than {MAX_BLOCK_DEPTH} at instruction {}",
                self.pos - 1
            )));
        }
        self.depth += 1;
        let body = self.block(false);
        self.depth -= 1;
        body
    }

    fn func_name(&self, function: ElementId) -> ScriptResult<&'l str> {
        self.element(function)?
            .func_name()
            .ok_or_else(|| ScriptError::Corrupt(format!("call through element {}", function.0)))
    }

    fn call_statement(&mut self, name: &'l str, arguments: &[ElementId]) -> ScriptResult<Statement> {
        if self.label_name(self.peek()) != Some(BLOCK_OPEN) {
            let call = self.call(name, arguments)?;
            return Ok(Statement::Call(call));
        }

        if name == IF_FUNC {
            if arguments.is_empty() {
                return Err(ScriptError::Corrupt("`if` without a condition".into()));
            }
            let condition = self.operator_list(arguments)?;
            self.next();
            let body = self.nested()?;
            let else_body = if self.label_name(self.peek()) == Some(ELSE_LABEL) {
                self.next();
                if self.label_name(self.peek()) == Some(BLOCK_OPEN) {
                    self.next();
                    Some(self.nested()?)
                } else {
                    log::warn!(
                        "`else` without a body at instruction {}, using an empty block",
                        self.pos - 1
                    );
                    Some(Vec::new())
                }
            } else {
                None
            };
            return Ok(Statement::If {
                condition,
                body,
                else_body,
            });
        }

        let call = self.call(name, arguments)?;
        self.next();
        let body = self.nested()?;
        Ok(Statement::BodyFunction { call, body })
    }

    /// Handles `Target` + `=`; returns `None` when the target is a local.
    fn assignment(&mut self, target: ElementId) -> ScriptResult<Option<Statement>> {
        let at = self.pos - 1;
        let target_element = self.element(target)?;
        let arguments = match self.next() {
            Some(Instruction::Call {
                function,
                arguments,
            }) if self.list.elements.get(*function).and_then(DataElement::func_name)
                == Some(ASSIGN_FUNC) =>
            {
                arguments
            }
            _ => {
                return Err(ScriptError::Corrupt(format!(
                    "target at instruction {at} is not followed by `=`"
                )))
            }
        };

        let value = if arguments.is_empty() {
            match self.next() {
                Some(Instruction::Call {
                    function,
                    arguments,
                }) => {
                    let name = self.func_name(*function)?;
                    Expression::Call(self.call(name, arguments)?)
                }
                _ => {
                    return Err(ScriptError::Corrupt(format!(
                        "`=` at instruction {} is not followed by a call",
                        at + 1
                    )))
                }
            }
        } else {
            self.operator_list(arguments)?
        };

        if let DataElement::VLoc { id } = target_element {
            if *id >= self.list.max_locals {
                return Err(ScriptError::Corrupt(format!(
                    "local {id} exceeds max_locals {}",
                    self.list.max_locals
                )));
            }
            if let Some(LocalState::Assigned(_)) = self.locals.get(id) {
                log::warn!("local {id} overwritten before use at instruction {at}");
            }
            self.locals.insert(*id, LocalState::Assigned(value));
            return Ok(None);
        }

        let target = assign_target(target_element)?;
        Ok(Some(Statement::Assignment { target, value }))
    }

    fn call(&mut self, name: &str, arguments: &[ElementId]) -> ScriptResult<FunctionCall> {
        let mut args = Vec::with_capacity(arguments.len());
        for id in arguments {
            let element = self.element(*id)?;
            let arg = match element {
                DataElement::Ctrl(c) if is_operator(&c.name) => {
                    return Err(ScriptError::Corrupt(format!(
                        "operator {} as an argument of {name}",
                        c.name
                    )))
                }
                DataElement::Ctrl(c) => Expression::LabelRef(c.name.clone()),
                DataElement::CStr { value } => self.string_argument(name, value)?,
                other => self.value(other)?,
            };
            args.push(arg);
        }
        Ok(FunctionCall::new(name, args))
    }

    fn string_argument(&mut self, function: &str, text: &str) -> ScriptResult<Expression> {
        if let (Some(rules), Some(strings)) = (self.rules, self.strings.as_deref_mut()) {
            if rules.wants(function, text) {
                let key = strings.insert(&rules.key_prefix, text);
                return Ok(Expression::String(StringLiteral::External(key)));
            }
        }
        Ok(Expression::string(text))
    }

    /// Parses `operand (op operand)*`, where an operator in operand position is a sign.
    fn operator_list(&mut self, arguments: &[ElementId]) -> ScriptResult<Expression> {
        let mut operands = Vec::new();
        let mut ops = Vec::new();
        let mut iter = arguments.iter();
        loop {
            let Some(id) = iter.next() else {
                return Err(ScriptError::Corrupt("operator list ends without an operand".into()));
            };
            let operand = match self.element(*id)? {
                DataElement::Ctrl(sign) if is_operator(&sign.name) => {
                    let value = match iter.next() {
                        Some(next) => self.operand(*next)?,
                        None => {
                            return Err(ScriptError::Corrupt(format!(
                                "sign {} without an operand",
                                sign.name
                            )))
                        }
                    };
                    Expression::Operator(OperatorExpr::binary(
                        Expression::Integer(0),
                        sign.name.clone(),
                        value,
                    ))
                }
                _ => self.operand(*id)?,
            };
            operands.push(operand);

            let Some(op) = iter.next() else {
                break;
            };
            match self.element(*op)? {
                DataElement::Ctrl(c) if is_operator(&c.name) => ops.push(c.name.clone()),
                other => {
                    return Err(ScriptError::Corrupt(format!(
                        "expected an operator, found {other}"
                    )))
                }
            }
        }

        if ops.is_empty() {
            if let Some(single) = operands.pop() {
                return Ok(single);
            }
        }
        Ok(Expression::Operator(OperatorExpr { operands, ops }))
    }

    fn operand(&mut self, id: ElementId) -> ScriptResult<Expression> {
        match self.element(id)? {
            DataElement::Ctrl(c) => Err(ScriptError::Corrupt(format!(
                "marker {} where an operand was expected",
                c.name
            ))),
            other => self.value(other),
        }
    }

    fn value(&mut self, element: &DataElement) -> ScriptResult<Expression> {
        let expr = match element {
            DataElement::CInt(v) if v.pointer => Expression::Pointer(v.value),
            DataElement::CInt(v) => Expression::Integer(v.value),
            DataElement::CStr { value } => Expression::string(value.as_str()),
            DataElement::SStr { flag_type } => {
                Expression::Variable(Variable::Special(flag_type.clone()))
            }
            DataElement::VInt { .. } | DataElement::VStr { .. } => match assign_target(element)? {
                AssignTarget::Variable(var) => Expression::Variable(var),
                AssignTarget::VariablePointer { kind, id } => {
                    Expression::VariablePointer { kind, id }
                }
                AssignTarget::Pointer(v) => Expression::Pointer(v),
            },
            DataElement::VLoc { id } => self.take_local(*id)?,
            other => {
                return Err(ScriptError::Corrupt(format!(
                    "{other} cannot be used as a value"
                )))
            }
        };
        Ok(expr)
    }

    fn take_local(&mut self, id: u32) -> ScriptResult<Expression> {
        match self.locals.insert(id, LocalState::Consumed) {
            Some(LocalState::Assigned(expr)) => Ok(expr),
            Some(LocalState::Consumed) => Err(ScriptError::Corrupt(format!(
                "repeated use of the same local variable ({id})"
            ))),
            None => {
                self.locals.remove(&id);
                Err(ScriptError::Corrupt(format!(
                    "local {id} used before assignment"
                )))
            }
        }
    }
}

/// Validates an element in assignment-target position.
fn assign_target(element: &DataElement) -> ScriptResult<AssignTarget> {
    match element {
        DataElement::SStr { flag_type } => Ok(AssignTarget::Variable(Variable::Special(
            flag_type.clone(),
        ))),
        DataElement::CInt(v) if v.pointer => Ok(AssignTarget::Pointer(v.value)),
        DataElement::VInt { flag_type, flag_id } | DataElement::VStr { flag_type, flag_id } => {
            let kind = FlagKind::from_name(flag_type)
                .ok_or_else(|| ScriptError::Corrupt(format!("unknown variable kind {flag_type}")))?;
            let is_int = matches!(element, DataElement::VInt { .. });
            if kind.is_int() != is_int {
                return Err(ScriptError::Corrupt(format!("{element} has the wrong element type")));
            }
            if !kind.in_range(flag_id.value) {
                return Err(ScriptError::Corrupt(format!(
                    "{kind} id {} is out of range (limit {})",
                    flag_id.value,
                    kind.limit()
                )));
            }
            Ok(if flag_id.pointer {
                AssignTarget::VariablePointer {
                    kind,
                    id: flag_id.value,
                }
            } else {
                AssignTarget::Variable(Variable::Flag {
                    kind,
                    id: flag_id.value,
                })
            })
        }
        other => Err(ScriptError::Corrupt(format!("{other} is not assignable"))),
    }
}
