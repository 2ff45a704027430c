//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable declarations and re-assignments
//! - Function declarations and blocks
//! - Operator precedence and parentheses
//! - Scope resolution
//! - Malformed input

use crate::{
    ast::ast::{Expr, Program, Stmt},
    errors::errors::{Error, ErrorImpl, ErrorTip},
    evaluator::{evaluator::evaluate, number::Number},
    lexer::tokens::TokenKind,
};

use super::{
    lookups::{is_binary_operator, precedence, LOWEST_PREC, UNARY_PREC},
    parser::{parse, Parser},
};

fn parse_source(source: &str) -> (Parser, Result<Program, Error>) {
    parse(source.to_string(), Some("test.vt".to_string()))
}

fn parse_ok(source: &str) -> Program {
    let (_, result) = parse_source(source);
    result.unwrap()
}

fn parse_err(source: &str) -> Error {
    let (_, result) = parse_source(source);
    result.unwrap_err()
}

fn expression(program: &Program, index: usize) -> &Expr {
    match &program.statements[index] {
        Stmt::Expression(stmt) => &stmt.expression,
        other => panic!("expected an expression statement, got {}", other),
    }
}

fn tree(source: &str) -> String {
    expression(&parse_ok(source), 0).to_string()
}

fn value(source: &str) -> Number {
    evaluate(expression(&parse_ok(source), 0)).unwrap()
}

#[test]
fn test_parse_variable_declaration() {
    let program = parse_ok("let x <- 42;");

    assert_eq!(program.len(), 1);
    match &program.statements[0] {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.identifier, "x");
            assert!(!decl.is_constant);
            assert_eq!(decl.value.to_string(), "42");
        }
        other => panic!("expected a declaration, got {}", other),
    }
}

#[test]
fn test_parse_const_declaration() {
    let program = parse_ok("const PI := 3.14;");

    assert!(program.statements[0].is_constant());
    assert_eq!(program.statements[0].to_string(), "const PI <- 3.14;");
}

#[test]
fn test_declaration_requires_identifier() {
    let error = parse_err("let 5 <- 1;");

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_position().0, 4);
}

#[test]
fn test_declaration_requires_assignment() {
    let error = parse_err("let x 5;");

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_position().0, 6);
}

#[test]
fn test_precedence_trees() {
    assert_eq!(tree("1+2*3-4;"), "((1 + (2 * 3)) - 4)");
    assert_eq!(tree("1+2+4-5;"), "(((1 + 2) + 4) - 5)");
    assert_eq!(tree("27-6/3*5/2;"), "(27 - (((6 / 3) * 5) / 2))");
    assert_eq!(tree("1 || 2 && 3 = 4 + 5 * 6;"), "(1 || (2 && (3 = (4 + (5 * 6)))))");
    assert_eq!(tree("1 * 2 + 3 < 4 && 5 || 6;"), "(((((1 * 2) + 3) < 4) && 5) || 6)");
}

#[test]
fn test_precedence_values() {
    assert_eq!(value("1+2+4-5;"), Number::Int(2));
    assert_eq!(value("1+2+4*5;"), Number::Int(23));
    assert_eq!(value("1+2*4+5;"), Number::Int(14));
    assert_eq!(value("27-6/3+5;"), Number::Int(30));
    assert_eq!(value("27-6/3*5;"), Number::Int(17));
    assert_eq!(value("27-6/3*5/2;"), Number::Int(22));
}

#[test]
fn test_prefix_operator_after_binary_operator() {
    assert_eq!(tree("3+-1;"), "(3 + -1)");
    assert_eq!(value("3+-1;"), Number::Int(2));
    assert_eq!(tree("-2*-3;"), "(-2 * -3)");
}

#[test]
fn test_prefix_chains() {
    assert_eq!(tree("--1;"), "--1");
    assert_eq!(value("--1;"), Number::Int(1));
    assert_eq!(value("-!0;"), Number::Int(-1));
    assert_eq!(tree("-(1+2)*3;"), "(-(1 + 2) * 3)");
    assert_eq!(value("2*-(3+4);"), Number::Int(-14));
}

#[test]
fn test_binary_operators_sit_between_lowest_and_unary_bands() {
    for kind in [
        TokenKind::Or,
        TokenKind::And,
        TokenKind::Equals,
        TokenKind::Plus,
        TokenKind::Star,
        TokenKind::AndNot,
    ] {
        assert!(is_binary_operator(kind), "{}", kind);
        assert!(precedence(kind) > LOWEST_PREC && precedence(kind) < UNARY_PREC);
    }

    for kind in [TokenKind::Not, TokenKind::Assignment, TokenKind::Semicolon, TokenKind::CloseParen] {
        assert!(!is_binary_operator(kind), "{}", kind);
        assert_eq!(precedence(kind), LOWEST_PREC);
    }
}

#[test]
fn test_deep_tree_prints() {
    let depth = 100_000;
    let printed = tree(&format!("{}1{};", "(".repeat(depth), ")".repeat(depth)));
    assert_eq!(printed, "1");

    let printed = tree(&format!("1{};", "+1".repeat(depth)));
    // Every node adds `(`, ` + ` and `)` around its operands
    assert_eq!(printed.len(), 6 * depth + 1);
    assert!(printed.starts_with("(((") && printed.ends_with(" + 1)"));
}

#[test]
fn test_parentheses() {
    assert_eq!(tree("(2+1)*(4+5);"), "((2 + 1) * (4 + 5))");
    assert_eq!(value("(2+1)*(4+5);"), Number::Int(27));
    assert_eq!(value("((2+1))*(4+5);"), Number::Int(27));
    assert_eq!(value("((2+1)*3);"), Number::Int(9));
    assert_eq!(value("(((((7)))));"), Number::Int(7));
    assert_eq!(value("2*((3+4)*(5-(1+1)));"), Number::Int(42));
}

#[test]
fn test_mixed_chain_with_parentheses() {
    assert_eq!(value("8+4+2-4-(3*5)*(3-7);"), Number::Int(70));
}

#[test]
fn test_paren_is_kept_in_tree() {
    let program = parse_ok("(1+2);");

    assert!(matches!(expression(&program, 0), Expr::Paren(_)));
}

#[test]
fn test_bare_operand_is_wrapped_in_implicit_plus() {
    let program = parse_ok("5;");

    match expression(&program, 0) {
        Expr::Unary(unary) => {
            assert!(unary.implicit);
            assert_eq!(unary.operator.value, "+");
            assert!(matches!(*unary.operand, Expr::Literal(_)));
        }
        other => panic!("expected an implicit unary, got {:?}", other),
    }
}

#[test]
fn test_unmatched_parens() {
    assert_eq!(parse_err("(1+2;").get_error_name(), "UnmatchedParen");
    assert_eq!(parse_err("1+2);").get_error_name(), "UnmatchedParen");
    assert_eq!(parse_err("(1+2));").get_error_name(), "UnmatchedParen");
    assert_eq!(parse_err("1);").get_error_name(), "UnmatchedParen");
    assert_eq!(parse_err("((1)").get_error_name(), "UnmatchedParen");
}

#[test]
fn test_empty_parens() {
    assert_eq!(parse_err("();").get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_missing_operand() {
    let error = parse_err("1 + * 2;");

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_position().0, 4);
}

#[test]
fn test_missing_operator() {
    assert!(parse_err("1 2;").get_error_name().starts_with("UnexpectedToken"));
    assert!(parse_err("(1 2);").get_error_name().starts_with("UnexpectedToken"));
}

#[test]
fn test_end_of_input_terminates() {
    assert!(parse_source("1 +").1.is_err());
    assert!(parse_source("(((").1.is_err());
    assert!(parse_source("let x <-").1.is_err());
    assert!(parse_source("{ let x <- 1;").1.is_err());
    assert!(parse_source("func f() {").1.is_err());
}

#[test]
fn test_last_statement_may_omit_semicolon() {
    let program = parse_ok("let x <- 1; x + 1");

    assert_eq!(program.len(), 2);
}

#[test]
fn test_empty_statements_are_skipped() {
    let program = parse_ok(";; 1; ;");

    assert_eq!(program.len(), 1);
}

#[test]
fn test_illegal_character() {
    let error = parse_err("let a <- #;");

    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::UnrecognisedToken {
            token: String::from("#")
        }
    );
    assert_eq!(error.get_position().0, 9);
}

#[test]
fn test_number_too_large() {
    let error = parse_err("99999999999999999999;");

    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_declarations_resolve_in_order() {
    let source = "let test <- 1; let two <- 1+2; let three <- test+two+1; three <- 3; three;";
    let program = parse_ok(source);

    let values: Vec<_> = program
        .iter()
        .filter_map(Stmt::bound_value)
        .map(|value| evaluate(&value).unwrap())
        .collect();
    assert_eq!(
        values,
        vec![Number::Int(1), Number::Int(3), Number::Int(5), Number::Int(3)]
    );

    assert_eq!(evaluate(expression(&program, 4)).unwrap(), Number::Int(3));
}

#[test]
fn test_reassignment_is_a_declaration() {
    let (parser, result) = parse_source("let a <- 1; a := 2;");
    let program = result.unwrap();

    assert_eq!(program.statements[1].to_string(), "let a <- 2;");
    let bound = parser.scopes().lookup("a").and_then(Stmt::bound_value).unwrap();
    assert_eq!(bound.to_string(), "2");
}

#[test]
fn test_const_reassignment_fails() {
    let error = parse_err("const x <- 1; x <- 2;");
    assert_eq!(
        error.get_internal_error(),
        &ErrorImpl::ConstReassignment {
            variable: String::from("x")
        }
    );
    assert_eq!(error.get_position().0, 14);

    let error = parse_err("const x <- 1; let x <- 2;");
    assert_eq!(error.get_error_name(), "ConstReassignment");

    let error = parse_err("const x <- 1; const x <- 2;");
    assert_eq!(error.get_error_name(), "ConstReassignment");
}

#[test]
fn test_let_may_be_redeclared() {
    assert!(parse_source("let x <- 1; let x <- 2; const x <- 3;").1.is_ok());
}

#[test]
fn test_const_may_be_shadowed_in_child_scope() {
    let (parser, result) = parse_source("const x <- 1; { let x <- 2; return x; }");
    let program = result.unwrap();

    match &program.statements[1] {
        Stmt::Block(block) => match &block.body[1] {
            Stmt::Return(ret) => {
                let value = ret.value.as_ref().unwrap();
                assert_eq!(evaluate(value).unwrap(), Number::Int(2));
            }
            other => panic!("expected a return, got {}", other),
        },
        other => panic!("expected a block, got {}", other),
    }

    assert!(parser.scopes().lookup("x").unwrap().is_constant());
}

#[test]
fn test_block_scope_does_not_leak() {
    let (parser, result) = parse_source("{ let inner <- 1; } inner;");
    let program = result.unwrap();

    assert_eq!(parser.scopes().depth(), 1);
    assert!(parser.scopes().lookup("inner").is_none());

    let error = evaluate(expression(&program, 1)).unwrap_err();
    assert_eq!(error.get_error_name(), "VariableNotDeclared");
}

#[test]
fn test_block_sees_outer_bindings() {
    let program = parse_ok("let outer <- 6; { return outer * 7; }");

    match &program.statements[1] {
        Stmt::Block(block) => match &block.body[0] {
            Stmt::Return(ret) => {
                assert_eq!(evaluate(ret.value.as_ref().unwrap()).unwrap(), Number::Int(42));
            }
            other => panic!("expected a return, got {}", other),
        },
        other => panic!("expected a block, got {}", other),
    }
}

#[test]
fn test_parse_function_declaration() {
    let (parser, result) = parse_source("func answer() { let local <- 42; return local; }");
    let program = result.unwrap();

    assert_eq!(
        program.statements[0].to_string(),
        "func answer() { let local <- 42; return local; }"
    );
    assert!(matches!(parser.scopes().lookup("answer"), Some(Stmt::FnDecl(_))));
    assert!(parser.scopes().lookup("local").is_none());
}

#[test]
fn test_function_requires_name_and_empty_parens() {
    assert_eq!(parse_err("func () {}").get_error_name(), "UnexpectedTokenDetailed");
    assert!(parse_source("func f(a) {}").1.is_err());
}

#[test]
fn test_discard_is_never_declared() {
    let (parser, result) = parse_source("let _ <- 5; const _ <- 6; const _ <- 7;");

    assert!(result.is_ok());
    assert!(parser.scopes().lookup("_").is_none());
    assert!(parser.scopes().current().is_empty());
}

#[test]
fn test_return_statement() {
    let program = parse_ok("return 1 + 2; return;");

    assert_eq!(program.statements[0].to_string(), "return (1 + 2);");
    assert_eq!(program.statements[1].to_string(), "return;");
}

#[test]
fn test_unknown_statement() {
    let error = parse_err("if 1 { }");

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().0, 0);
}

#[test]
fn test_stray_closing_brace() {
    let error = parse_err("let a <- 1; }");

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    assert_eq!(error.get_position().0, 12);
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("no statement starts with it")),
        ErrorTip::None => panic!("expected a suggestion"),
    }
}

#[test]
fn test_literal_round_trip() {
    for source in ["42;", "3.25;", "true;", "false;", "0;"] {
        let program = parse_ok(source);
        let original = expression(&program, 0);

        let text = match original {
            Expr::Unary(unary) => match unary.operand.as_ref() {
                Expr::Literal(literal) => literal.value.clone(),
                other => panic!("expected a literal, got {:?}", other),
            },
            other => panic!("expected an implicit unary, got {:?}", other),
        };

        let reparsed = parse_ok(&text);
        assert_eq!(
            evaluate(expression(&reparsed, 0)).unwrap(),
            evaluate(original).unwrap()
        );
    }
}

#[test]
fn test_program_span() {
    let program = parse_ok("1; 2;");

    assert_eq!(program.span.start.0, 0);
    assert_eq!(program.span.end.0, 5);
    assert_eq!(*program.span.end.1, "test.vt");
}
