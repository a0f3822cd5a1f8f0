use anyhow::Result;
use pretty_assertions::assert_eq;

use yuka_core::format::yks::{Assembler, Disassembler, FlagKind, Instruction, YksHeader};
use yuka_core::script::{
    AssignTarget, Compiler, Decompiler, Expression, FunctionCall, OperatorExpr, Statement,
    StringLiteral, Variable,
};
use yuka_core::{ExternalizeConfig, Script, YukaConfig, YukaConfigBuilder};

fn sample_script() -> Vec<Statement> {
    let flag = |kind, id| Expression::flag(kind, id);
    vec![
        Statement::JumpLabel("chapter1".into()),
        Statement::Call(FunctionCall::new(
            "SetName",
            vec![Expression::string("\u{30e6}\u{30ab}")],
        )),
        Statement::Call(FunctionCall::new(
            "StrOut",
            vec![Expression::string("It was a quiet morning.\n")],
        )),
        Statement::Assignment {
            target: AssignTarget::Variable(Variable::Flag {
                kind: FlagKind::Flag,
                id: 5,
            }),
            value: Expression::Operator(OperatorExpr::binary(
                Expression::call("A", vec![]),
                "+",
                Expression::Integer(3),
            )),
        },
        Statement::If {
            condition: Expression::Operator(OperatorExpr {
                operands: vec![
                    flag(FlagKind::Flag, 5),
                    Expression::Integer(4),
                    Expression::Operator(OperatorExpr::binary(
                        flag(FlagKind::GlobalFlag, 9),
                        "%",
                        Expression::Integer(2),
                    )),
                ],
                ops: vec![">".into(), "&&".into()],
            }),
            body: vec![
                Statement::Assignment {
                    target: AssignTarget::Variable(Variable::Flag {
                        kind: FlagKind::GlobalString,
                        id: 2,
                    }),
                    value: Expression::call(
                        "Format",
                        vec![
                            Expression::string("%d"),
                            Expression::call("Max", vec![flag(FlagKind::Flag, 5), Expression::Integer(10)]),
                        ],
                    ),
                },
                Statement::Call(FunctionCall::new(
                    "Goto",
                    vec![Expression::LabelRef("chapter1".into())],
                )),
            ],
            else_body: Some(vec![Statement::BodyFunction {
                call: FunctionCall::new("Choice", vec![Expression::string("Stay")]),
                body: vec![Statement::Assignment {
                    target: AssignTarget::Pointer(40),
                    value: Expression::Operator(OperatorExpr::binary(
                        Expression::Integer(0),
                        "-",
                        Expression::VariablePointer {
                            kind: FlagKind::Flag,
                            id: 6,
                        },
                    )),
                }],
            }]),
        },
        Statement::Block(vec![Statement::Call(FunctionCall::new("Wait", vec![]))]),
    ]
}

#[test]
fn statements_survive_the_binary_form() -> Result<()> {
    let config = YukaConfig::default();
    let statements = sample_script();

    let mut list = Compiler::new(&config).compile(&statements)?;
    let bytes = Assembler::new(&config).assemble(&mut list)?;
    let back = Disassembler::new(&config).disassemble(&bytes)?;
    let decompiled = Decompiler::new(&config)?.decompile(&back, None)?;

    assert_eq!(decompiled, statements);
    Ok(())
}

#[test]
fn reassembling_is_byte_identical() -> Result<()> {
    let config = YukaConfig::default();
    let mut list = Compiler::new(&config).compile(&sample_script())?;
    let first = Assembler::new(&config).assemble(&mut list)?;

    let mut back = Disassembler::new(&config).disassemble(&first)?;
    let second = Assembler::new(&config).assemble(&mut back)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn concrete_assignment_instructions() -> Result<()> {
    let config = YukaConfig::default();
    let statements = vec![Statement::Assignment {
        target: AssignTarget::Variable(Variable::Flag {
            kind: FlagKind::Flag,
            id: 5,
        }),
        value: Expression::Operator(OperatorExpr::binary(
            Expression::call("A", vec![]),
            "+",
            Expression::Integer(3),
        )),
    }];
    let mut list = Compiler::new(&config).compile(&statements)?;
    let bytes = Assembler::new(&config).assemble(&mut list)?;

    let header = YksHeader::read(&bytes)?;
    assert_eq!(header.max_locals, 1);
    // T L0 | = 0 | A 0 | T Flag:5 | = 3 L0 + 3
    assert_eq!(header.instr_count, 1 + 2 + 2 + 1 + 5);

    let back = Disassembler::new(&config).disassemble(&bytes)?;
    assert!(matches!(back.instructions[0], Instruction::Target(_)));
    assert!(matches!(back.instructions[3], Instruction::Target(_)));

    let script = Script::from_bytes(&bytes, &config)?;
    assert_eq!(script.to_text(), "Flag:5 = A() + 3;\n");
    Ok(())
}

#[test]
fn unencrypted_scripts_roundtrip() -> Result<()> {
    let config = YukaConfigBuilder::new().with_encryption(false).get();
    let script = Script::new(sample_script());
    let bytes = script.to_bytes(&config)?;
    assert_eq!(YksHeader::read(&bytes)?.encryption, 0);
    assert_eq!(Script::from_bytes(&bytes, &config)?, script);
    Ok(())
}

#[test]
fn externalized_strings_roundtrip_through_the_table() -> Result<()> {
    let config = YukaConfigBuilder::new()
        .with_externalize(ExternalizeConfig::default())
        .get();
    let bytes = Script::new(sample_script()).to_bytes(&config)?;

    let mut script = Script::from_bytes(&bytes, &config)?;
    assert_eq!(script.strings.len(), 2);
    assert_eq!(script.strings.get("T1"), Some("It was a quiet morning.\n"));
    assert_eq!(
        script.statements[2],
        Statement::Call(FunctionCall::new(
            "StrOut",
            vec![Expression::String(StringLiteral::External("T1".into()))]
        ))
    );

    // a translator edits the table, the script text stays untouched
    script.strings.set("T1", "Der Morgen war ruhig.\n");
    let plain = YukaConfig::default();
    let translated = Script::from_bytes(&script.to_bytes(&config)?, &plain)?;
    assert_eq!(
        translated.statements[2],
        Statement::Call(FunctionCall::new(
            "StrOut",
            vec![Expression::string("Der Morgen war ruhig.\n")]
        ))
    );
    Ok(())
}

#[test]
fn printed_form() -> Result<()> {
    let config = YukaConfig::default();
    let bytes = Script::new(sample_script()).to_bytes(&config)?;
    let text = Script::from_bytes(&bytes, &config)?.to_text();
    let expected = "\
:chapter1
SetName(\"\u{30e6}\u{30ab}\");
StrOut(\"It was a quiet morning.\\n\");
Flag:5 = A() + 3;
if (Flag:5 > 4 && (GlobalFlag:9 % 2)) {
    GlobalString:2 = Format(\"%d\", Max(Flag:5, 10));
    Goto(:chapter1);
} else {
    Choice(\"Stay\") {
        &40 = 0 - Flag:&6;
    }
}
{
    Wait();
}
";
    assert_eq!(text, expected);
    Ok(())
}
