use kat_rust::lexer::{tokenize, Position, VarType};
use kat_rust::parser::{
    parse, BinaryOp, ExprKind, Expression, LiteralValue, OutputItem, ParserError, Program, Statement,
    StatementKind,
};

fn parse_source(source: &str) -> Result<Program, ParserError> {
    let tokens = tokenize(source).expect("source should tokenize");
    parse(tokens)
}

fn statements(source: &str) -> Vec<StatementKind> {
    parse_source(source)
        .expect("source should parse")
        .statements
        .into_iter()
        .map(|s| s.kind)
        .collect()
}

#[test]
fn declaration_and_output_scenario() {
    let program = parse_source("intbox x = 5; out << x;").unwrap();

    let expected = Program {
        statements: vec![
            Statement::new(
                StatementKind::VarDecl {
                    name: "x".to_string(),
                    var_type: VarType::Int,
                    initializer: Expression::literal(LiteralValue::Integer(5), Position::new(1, 12)),
                },
                Position::new(1, 1),
            ),
            Statement::new(
                StatementKind::Output(OutputItem::Value(Expression::variable(
                    "x",
                    VarType::Int,
                    Position::new(1, 22),
                ))),
                Position::new(1, 22),
            ),
        ],
    };
    assert_eq!(program, expected);
}

#[test]
fn empty_source_is_an_empty_program() {
    assert_eq!(parse_source("// nothing here\n").unwrap(), Program::default());
}

#[test]
fn references_before_declaration_are_rejected() {
    assert_eq!(
        parse_source("x = 5;").unwrap_err(),
        ParserError::UndeclaredVariable("x".to_string(), Position::new(1, 1))
    );
    assert_eq!(
        parse_source("out << y;").unwrap_err(),
        ParserError::UndeclaredVariable("y".to_string(), Position::new(1, 8))
    );
    assert_eq!(
        parse_source("out << x; intbox x = 1;").unwrap_err(),
        ParserError::UndeclaredVariable("x".to_string(), Position::new(1, 8))
    );
    assert!(matches!(
        parse_source("intbox a = 0; in >> a >> b;").unwrap_err(),
        ParserError::UndeclaredVariable(name, _) if name == "b"
    ));
    assert!(matches!(
        parse_source("if (flag) { }").unwrap_err(),
        ParserError::UndeclaredVariable(name, _) if name == "flag"
    ));
}

#[test]
fn initializer_cannot_refer_to_the_variable_being_declared() {
    assert_eq!(
        parse_source("intbox x = x;").unwrap_err(),
        ParserError::UndeclaredVariable("x".to_string(), Position::new(1, 12))
    );
}

#[test]
fn duplicate_declarations_are_rejected() {
    assert_eq!(
        parse_source("intbox x = 1; floatbox x = 2.0;").unwrap_err(),
        ParserError::DuplicateDeclaration("x".to_string(), Position::new(1, 24))
    );
    assert!(matches!(
        parse_source("intbox x = 1; if (x) { intbox x = 2; }").unwrap_err(),
        ParserError::DuplicateDeclaration(name, _) if name == "x"
    ));
}

#[test]
fn declarations_in_blocks_stay_visible() {
    let program = parse_source("intbox x = 1; if (x) { intbox y = 2; } out << y;").unwrap();
    assert_eq!(program.statements.len(), 3);
}

#[test]
fn self_referencing_assignment_becomes_arithmetic() {
    let stmts = statements("intbox x = 1; x = x + 5;");
    match &stmts[1] {
        StatementKind::Arithmetic { name, op, operand } => {
            assert_eq!(name, "x");
            assert_eq!(*op, BinaryOp::Add);
            assert_eq!(operand.kind, ExprKind::Literal(LiteralValue::Integer(5)));
        }
        other => panic!("expected arithmetic statement, got {other:?}"),
    }
}

#[test]
fn other_assignments_stay_plain() {
    let stmts = statements("intbox x = 1; intbox y = 2; y = x + 5; x = x + 1 + 2; x = x < 2;");
    assert!(matches!(&stmts[2], StatementKind::Assign { name, .. } if name == "y"));
    assert!(matches!(&stmts[3], StatementKind::Assign { name, .. } if name == "x"));
    assert!(matches!(&stmts[4], StatementKind::Assign { name, .. } if name == "x"));
}

#[test]
fn binary_operators_associate_left_without_precedence() {
    let stmts = statements("intbox a = 1 + 2 * 3;");
    let StatementKind::VarDecl { initializer, .. } = &stmts[0] else {
        panic!("expected declaration");
    };

    let ExprKind::Binary { left, op, right } = &initializer.kind else {
        panic!("expected binary expression");
    };
    assert_eq!(*op, BinaryOp::Mul);
    assert_eq!(right.kind, ExprKind::Literal(LiteralValue::Integer(3)));
    assert!(matches!(
        &left.kind,
        ExprKind::Binary { op: BinaryOp::Add, .. }
    ));
}

#[test]
fn output_chain_yields_one_statement_per_item() {
    let stmts = statements("intbox x = 1; out << x << endl << \"hi\";");
    assert_eq!(stmts.len(), 4);
    assert!(matches!(&stmts[1], StatementKind::Output(OutputItem::Value(e)) if e.kind == ExprKind::Variable("x".to_string())));
    assert_eq!(stmts[2], StatementKind::Output(OutputItem::Endl));
    assert!(matches!(
        &stmts[3],
        StatementKind::Output(OutputItem::Value(e)) if e.kind == ExprKind::Literal(LiteralValue::String("hi".to_string()))
    ));
}

#[test]
fn input_chain_yields_one_statement_per_name() {
    let stmts = statements("intbox a = 0; intbox b = 0; in >> a >> b;");
    assert_eq!(
        &stmts[2..],
        &[
            StatementKind::Input { name: "a".to_string() },
            StatementKind::Input { name: "b".to_string() },
        ]
    );
}

#[test]
fn if_with_else_block() {
    let stmts = statements("intbox x = 1; if (x > 0) { out << x; } else { x = 0; }");
    let StatementKind::If {
        condition,
        then_block,
        else_block,
    } = &stmts[1]
    else {
        panic!("expected if statement");
    };

    assert_eq!(condition.expr_type, VarType::Bool);
    assert_eq!(then_block.len(), 1);
    assert_eq!(else_block.as_ref().map(Vec::len), Some(1));
}

#[test]
fn if_without_else_and_else_if_chains() {
    let stmts = statements("intbox x = 1; if (x) { } if (x == 1) { } else if (x == 2) { } else { }");

    assert!(matches!(&stmts[1], StatementKind::If { else_block: None, .. }));

    let StatementKind::If { else_block: Some(else_stmts), .. } = &stmts[2] else {
        panic!("expected if/else");
    };
    assert_eq!(else_stmts.len(), 1);
    assert!(matches!(
        &else_stmts[0].kind,
        StatementKind::If { else_block: Some(inner), .. } if inner.is_empty()
    ));
}

#[test]
fn grammar_violations_report_what_was_expected() {
    let err = parse_source("intbox x = 5 out << x;").unwrap_err();
    assert_eq!(
        err,
        ParserError::UnexpectedToken {
            expected: "';'".to_string(),
            found: "keyword 'out'".to_string(),
            pos: Position::new(1, 14),
        }
    );
    assert_eq!(err.position(), Some(Position::new(1, 14)));
    assert_eq!(err.to_string(), "Expected ';' but found keyword 'out' at 1:14");
    assert!(matches!(
        parse_source("intbox x = 1; out x;").unwrap_err(),
        ParserError::UnexpectedToken { expected, .. } if expected == "'<<'"
    ));
    assert!(matches!(
        parse_source("}").unwrap_err(),
        ParserError::UnexpectedToken { expected, .. } if expected == "statement"
    ));
    assert!(matches!(
        parse_source("start").unwrap_err(),
        ParserError::UnexpectedToken { .. }
    ));
    assert!(matches!(
        parse_source("intbox x = 1; if x { }").unwrap_err(),
        ParserError::UnexpectedToken { expected, .. } if expected == "'('"
    ));
}

#[test]
fn truncated_input_reports_end_of_input() {
    let err = parse_source("intbox x = 5").unwrap_err();
    assert_eq!(err, ParserError::UnexpectedEof("';'".to_string()));
    assert_eq!(err.position(), None);
    assert_eq!(err.to_string(), "Expected ';' but reached end of input");

    assert_eq!(
        parse_source("intbox x = 1; if (x) { out << x;").unwrap_err(),
        ParserError::UnexpectedEof("'}'".to_string())
    );
    assert_eq!(
        parse_source("intbox x =").unwrap_err(),
        ParserError::UnexpectedEof("expression".to_string())
    );
}

#[test]
fn type_mismatches_are_rejected() {
    assert_eq!(
        parse_source("intbox x = \"hi\";").unwrap_err(),
        ParserError::TypeMismatch {
            expected: "intbox".to_string(),
            found: "stringbox".to_string(),
            pos: Position::new(1, 12),
        }
    );
    assert!(matches!(
        parse_source("intbox i = 1.5;").unwrap_err(),
        ParserError::TypeMismatch { .. }
    ));
    assert!(matches!(
        parse_source("stringbox s = \"a\"; if (s) { }").unwrap_err(),
        ParserError::TypeMismatch { .. }
    ));
    assert!(matches!(
        parse_source("floatbox f = 1.0; intbox i = 2; out << f + i;").unwrap_err(),
        ParserError::TypeMismatch { .. }
    ));
    assert!(matches!(
        parse_source("floatbox f = 1.0; f = f % 2.0;").unwrap_err(),
        ParserError::TypeMismatch { .. }
    ));
}

#[test]
fn compatible_types_are_accepted() {
    assert!(parse_source("floatbox f = 1;").is_ok());
    assert!(parse_source("charbox c = 'a'; intbox i = c + 1; boolbox b = i > 2;").is_ok());
    assert!(parse_source("stringbox s = \"a\"; stringbox t = s; out << t;").is_ok());
}

#[test]
fn integer_literals_must_fit_in_32_bits() {
    assert_eq!(
        parse_source("intbox x = 2147483648;").unwrap_err(),
        ParserError::InvalidLiteral("2147483648".to_string(), Position::new(1, 12))
    );
    assert!(parse_source("intbox x = 2147483647;").is_ok());
}

#[test]
fn float_literals_must_be_finite() {
    let huge = format!("1{}.0", "0".repeat(400));
    assert_eq!(
        parse_source(&format!("floatbox f = {huge};")).unwrap_err(),
        ParserError::InvalidLiteral(huge, Position::new(1, 14))
    );
    let largest = format!("17976931348623157{}.0", "0".repeat(292));
    assert!(parse_source(&format!("floatbox f = {largest};")).is_ok());
}

#[test]
fn assembler_names_cannot_be_declared() {
    let err = parse_source("intbox eax = 1; out << eax;").unwrap_err();
    assert_eq!(err, ParserError::ReservedName("eax".to_string(), Position::new(1, 8)));
    assert_eq!(err.position(), Some(Position::new(1, 8)));

    for name in ["_start", "print_int", "read_float", "RSP", "r10d", "xmm3", "section", "dd", "mov"] {
        assert!(
            matches!(
                parse_source(&format!("intbox {name} = 1;")).unwrap_err(),
                ParserError::ReservedName(reserved, _) if reserved == name
            ),
            "{name}"
        );
    }
}

#[test]
fn names_resembling_registers_are_allowed() {
    assert!(parse_source("intbox eax2 = 1; intbox r16 = 2; intbox Print_int = 3; out << eax2;").is_ok());
}
