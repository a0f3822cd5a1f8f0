//! Statement tree produced by the decompiler and consumed by the compiler.

use crate::format::yks::FlagKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Block(Vec<Statement>),
    Assignment {
        target: AssignTarget,
        value: Expression,
    },
    Call(FunctionCall),
    /// A call owning the block that follows it, e.g. `Loop(3) { ... }`.
    BodyFunction {
        call: FunctionCall,
        body: Vec<Statement>,
    },
    If {
        condition: Expression,
        body: Vec<Statement>,
        else_body: Option<Vec<Statement>>,
    },
    JumpLabel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expression>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringLiteral {
    Plain(String),
    /// Key into the script's [`StringTable`](super::StringTable).
    External(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Engine-reserved string slot, `$Name`.
    Special(String),
    Flag { kind: FlagKind, id: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Integer(i32),
    Pointer(i32),
    String(StringLiteral),
    Variable(Variable),
    /// `Flag:&5`: the flag whose id is stored in flag 5.
    VariablePointer { kind: FlagKind, id: i32 },
    Operator(OperatorExpr),
    Call(FunctionCall),
    LabelRef(String),
}

/// `operands[0] ops[0] operands[1] ...`, evaluated left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorExpr {
    pub operands: Vec<Expression>,
    pub ops: Vec<String>,
}

impl OperatorExpr {
    pub fn binary(lhs: Expression, op: impl Into<String>, rhs: Expression) -> Self {
        Self {
            operands: vec![lhs, rhs],
            ops: vec![op.into()],
        }
    }

    /// `(0 op x)`, the shape a sign marker decodes to.
    pub fn as_unary(&self) -> Option<(&str, &Expression)> {
        match (self.operands.as_slice(), self.ops.as_slice()) {
            ([Expression::Integer(0), x], [op]) => Some((op.as_str(), x)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignTarget {
    Variable(Variable),
    VariablePointer { kind: FlagKind, id: i32 },
    /// `&5 = ...`
    Pointer(i32),
}

impl Expression {
    pub fn flag(kind: FlagKind, id: i32) -> Self {
        Expression::Variable(Variable::Flag { kind, id })
    }

    pub fn string(text: impl Into<String>) -> Self {
        Expression::String(StringLiteral::Plain(text.into()))
    }

    pub fn call(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::Call(FunctionCall::new(name, arguments))
    }
}
