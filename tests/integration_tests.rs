//! Integration tests for the public pipeline.
//!
//! These tests drive source text through tokenization, parsing and evaluation
//! using only the crate's public API, and check the parser against an
//! independent evaluator on randomly generated expressions.

use rand::{rngs::StdRng, Rng, SeedableRng};
use vtwin::{
    ast::ast::Stmt,
    evaluator::{
        evaluator::{evaluate, run_program},
        number::Number,
    },
    get_line_at_position,
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::parser::parse,
};

fn evaluate_source(source: &str) -> Number {
    let (_, program) = parse(source.to_string(), Some("random.vt".to_string()));
    let program = program.unwrap_or_else(|error| panic!("{:?} failed to parse: {}", source, error));

    match &program.statements[0] {
        Stmt::Expression(stmt) => evaluate(&stmt.expression)
            .unwrap_or_else(|error| panic!("{:?} failed to evaluate: {}", source, error)),
        other => panic!("expected an expression statement, got {}", other),
    }
}

#[test]
fn test_program_pipeline() {
    let source = r#"
        // bindings are resolved as they are parsed
        let width <- 6;
        const height := 7;
        let area <- width * height;

        {
            let width <- 100;
            return width + area;
        }

        func unused() { return 1; }

        area - (width + height) * 2;
    "#;

    let tokens = tokenize(source.to_string(), Some("main.vt".to_string())).unwrap();
    assert_eq!(tokens.last().map(|token| token.kind), Some(TokenKind::EOF));

    let (parser, program) = parse(source.to_string(), Some("main.vt".to_string()));
    let program = program.unwrap();
    assert_eq!(program.len(), 6);
    assert_eq!(parser.scopes().depth(), 1);

    let values: Vec<_> = run_program(&program)
        .unwrap()
        .into_iter()
        .map(|outcome| outcome.value)
        .collect();

    assert_eq!(
        values,
        vec![
            Some(Number::Int(6)),
            Some(Number::Int(7)),
            Some(Number::Int(42)),
            Some(Number::Int(142)),
            None,
            Some(Number::Int(16)),
        ]
    );
}

#[test]
fn test_error_points_at_source_line() {
    let source = "let a <- 1;\nlet b <- (a + 2;\n";

    let (_, program) = parse(source.to_string(), Some("main.vt".to_string()));
    let error = program.unwrap_err();
    assert_eq!(error.get_error_name(), "UnmatchedParen");
    assert_eq!(*error.get_position().1, "main.vt");

    let (line, text, column) = get_line_at_position(source, error.get_position().0).unwrap();
    assert_eq!(line, 2);
    assert_eq!(text, "let b <- (a + 2;\n");
    assert_eq!(column, 15);
}

#[test]
fn test_runtime_error_stops_program() {
    let (_, program) = parse("let a <- 1; let b <- a / 0; let c <- 3;".to_string(), None);
    let error = run_program(&program.unwrap()).unwrap_err();

    assert_eq!(error.get_error_name(), "DivisionByZero");
    assert_eq!(error.get_position().0, 23);
    assert_eq!(*error.get_position().1, "shell");
}

/// Expression tree built directly by the generator, evaluated without the parser.
enum Oracle {
    Num(i64),
    Neg(i64),
    Bin(char, Box<Oracle>, Box<Oracle>),
}

impl Oracle {
    fn generate(rng: &mut StdRng, depth: u32) -> Oracle {
        if depth == 0 || rng.gen_bool(0.25) {
            let value = rng.gen_range(0..=20);
            return if rng.gen_bool(0.1) {
                Oracle::Neg(value)
            } else {
                Oracle::Num(value)
            };
        }

        let operator = ['+', '-', '*', '/'][rng.gen_range(0..4)];
        let left = Oracle::generate(rng, depth - 1);
        let mut right = Oracle::generate(rng, depth - 1);
        while operator == '/' && right.value() == 0 {
            right = Oracle::generate(rng, depth - 1);
        }

        Oracle::Bin(operator, Box::new(left), Box::new(right))
    }

    fn value(&self) -> i64 {
        match self {
            Oracle::Num(value) => *value,
            Oracle::Neg(value) => -value,
            Oracle::Bin(operator, left, right) => {
                let (left, right) = (left.value(), right.value());
                match operator {
                    '+' => left.wrapping_add(right),
                    '-' => left.wrapping_sub(right),
                    '*' => left.wrapping_mul(right),
                    _ => left.wrapping_div(right),
                }
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Oracle::Bin('+' | '-', _, _) => 1,
            Oracle::Bin(_, _, _) => 2,
            _ => 3,
        }
    }

    /// Infix text with the parentheses the tree needs, plus some it doesn't.
    fn render(&self, rng: &mut StdRng, out: &mut String) {
        match self {
            Oracle::Num(value) => out.push_str(&value.to_string()),
            Oracle::Neg(value) => out.push_str(&format!("-{}", value)),
            Oracle::Bin(operator, left, right) => {
                let precedence = self.precedence();

                let wrap_left = left.precedence() < precedence || rng.gen_bool(0.15);
                Oracle::render_operand(left, wrap_left, rng, out);

                out.push_str(if rng.gen_bool(0.5) { " " } else { "" });
                out.push(*operator);
                out.push_str(if rng.gen_bool(0.5) { " " } else { "" });

                let wrap_right = right.precedence() <= precedence || rng.gen_bool(0.15);
                Oracle::render_operand(right, wrap_right, rng, out);
            }
        }
    }

    fn render_operand(operand: &Oracle, wrap: bool, rng: &mut StdRng, out: &mut String) {
        if !wrap {
            operand.render(rng, out);
            return;
        }

        let depth = if rng.gen_bool(0.2) { 2 } else { 1 };
        out.push_str(&"(".repeat(depth));
        operand.render(rng, out);
        out.push_str(&")".repeat(depth));
    }
}

#[test]
fn test_random_expressions_match_oracle() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..2000 {
        let depth = rng.gen_range(1..=5);
        let oracle = Oracle::generate(&mut rng, depth);

        let mut source = String::new();
        oracle.render(&mut rng, &mut source);
        source.push(';');

        assert_eq!(
            evaluate_source(&source),
            Number::Int(oracle.value()),
            "mismatch for {}",
            source
        );
    }
}

#[test]
fn test_required_expressions() {
    let cases = [
        ("1+2+4-5;", 2),
        ("1+2+4*5;", 23),
        ("1+2*4+5;", 14),
        ("(2+1)*(4+5);", 27),
        ("((2+1))*(4+5);", 27),
        ("27-6/3+5;", 30),
        ("27-6/3*5;", 17),
        ("27-6/3*5/2;", 22),
        ("3+-1;", 2),
        ("8+4+2-4-(3*5)*(3-7);", 70),
    ];

    for (source, expected) in cases {
        assert_eq!(evaluate_source(source), Number::Int(expected), "{}", source);
    }
}

#[test]
fn test_large_inputs_run_to_completion() {
    let terms = 200_000;
    let chain = format!("let total <- 1{}; total - 1;", "+1".repeat(terms - 1));

    let (_, program) = parse(chain, None);
    let values: Vec<_> = run_program(&program.unwrap())
        .unwrap()
        .into_iter()
        .map(|outcome| outcome.value)
        .collect();
    assert_eq!(values, vec![Some(Number::Int(200_000)), Some(Number::Int(199_999))]);

    let nested = format!("{}0{};", "1+(".repeat(50_000), ")".repeat(50_000));
    assert_eq!(evaluate_source(&nested), Number::Int(50_000));
}
