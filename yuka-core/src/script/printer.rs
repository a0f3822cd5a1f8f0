//! Text form of a statement tree.

use std::fmt::{self, Write as _};

use itertools::Itertools;

use super::ast::*;

const INDENT: &str = "    ";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Special(name) => write!(f, "${name}"),
            Variable::Flag { kind, id } => write!(f, "{kind}:{id}"),
        }
    }
}

impl fmt::Display for AssignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignTarget::Variable(var) => write!(f, "{var}"),
            AssignTarget::VariablePointer { kind, id } => write!(f, "{kind}:&{id}"),
            AssignTarget::Pointer(v) => write!(f, "&{v}"),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arguments.iter().join(", "))
    }
}

impl fmt::Display for OperatorExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, operand) in self.operands.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.ops[i - 1])?;
            }
            match operand {
                Expression::Operator(nested) => write!(f, "({nested})")?,
                other => write!(f, "{other}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Integer(v) => write!(f, "{v}"),
            Expression::Pointer(v) => write!(f, "&{v}"),
            Expression::String(StringLiteral::Plain(text)) => f.write_str(&escape(text)),
            Expression::String(StringLiteral::External(key)) => write!(f, "@{key}"),
            Expression::Variable(var) => write!(f, "{var}"),
            Expression::VariablePointer { kind, id } => write!(f, "{kind}:&{id}"),
            Expression::Operator(op) => write!(f, "{op}"),
            Expression::Call(call) => write!(f, "{call}"),
            Expression::LabelRef(name) => write!(f, ":{name}"),
        }
    }
}

struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn line(&mut self, text: impl fmt::Display) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        let _ = writeln!(self.out, "{text}");
    }

    fn body(&mut self, statements: &[Statement]) {
        self.depth += 1;
        self.statements(statements);
        self.depth -= 1;
    }

    fn statements(&mut self, statements: &[Statement]) {
        for s in statements {
            self.statement(s);
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Block(body) => {
                self.line("{");
                self.body(body);
                self.line("}");
            }
            Statement::Assignment { target, value } => self.line(format_args!("{target} = {value};")),
            Statement::Call(call) => self.line(format_args!("{call};")),
            Statement::BodyFunction { call, body } => {
                self.line(format_args!("{call} {{"));
                self.body(body);
                self.line("}");
            }
            Statement::If {
                condition,
                body,
                else_body,
            } => {
                self.line(format_args!("if ({condition}) {{"));
                self.body(body);
                match else_body {
                    Some(else_body) => {
                        self.line("} else {");
                        self.body(else_body);
                        self.line("}");
                    }
                    None => self.line("}"),
                }
            }
            Statement::JumpLabel(name) => self.line(format_args!(":{name}")),
        }
    }
}

/// Renders statements one per line with four-space indentation.
pub fn print_statements(statements: &[Statement]) -> String {
    let mut printer = Printer {
        out: String::new(),
        depth: 0,
    };
    printer.statements(statements);
    printer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::yks::FlagKind;

    #[test]
    fn prints_nested_program() {
        let statements = vec![
            Statement::JumpLabel("top".into()),
            Statement::Assignment {
                target: AssignTarget::Variable(Variable::Flag {
                    kind: FlagKind::Flag,
                    id: 5,
                }),
                value: Expression::Operator(OperatorExpr::binary(
                    Expression::call("A", vec![]),
                    "+",
                    Expression::Operator(OperatorExpr::binary(
                        Expression::Integer(0),
                        "-",
                        Expression::Integer(3),
                    )),
                )),
            },
            Statement::If {
                condition: Expression::flag(FlagKind::GlobalFlag, 1),
                body: vec![Statement::Call(FunctionCall::new(
                    "StrOut",
                    vec![
                        Expression::string("say \"hi\"\n"),
                        Expression::String(StringLiteral::External("T0".into())),
                    ],
                ))],
                else_body: Some(vec![Statement::Call(FunctionCall::new(
                    "Goto",
                    vec![Expression::LabelRef("top".into())],
                ))]),
            },
            Statement::Assignment {
                target: AssignTarget::VariablePointer {
                    kind: FlagKind::String,
                    id: 2,
                },
                value: Expression::Variable(Variable::Special("Name".into())),
            },
        ];
        let expected = "\
:top
Flag:5 = A() + (0 - 3);
if (GlobalFlag:1) {
    StrOut(\"say \\\"hi\\\"\\n\", @T0);
} else {
    Goto(:top);
}
String:&2 = $Name;
";
        assert_eq!(print_statements(&statements), expected);
    }
}
