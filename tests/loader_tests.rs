// Loading program files in both formats and running them

mod common;

use calcflow::engine::{ExecError, Instruction};
use calcflow::parser::json::{render_error, render_results};
use calcflow::parser::{parse_program, Format, ParseError};
use common::{results, run_observed};
use std::fs;
use std::path::Path;
use std::time::Duration;

fn load(path: &str) -> Vec<Instruction> {
    let path = Path::new(path);
    let source = fs::read_to_string(path).expect("Failed to read demo file");
    parse_program(&source, Format::from_path(path)).expect("Parsing failed")
}

#[test]
fn test_text_demo() {
    let program = load("demos/pricing.calc");
    assert_eq!(program.len(), 10);

    let (outcome, computed) = run_observed(&program, Duration::ZERO);
    assert_eq!(
        outcome,
        Ok(results(&[("subtotal", 132), ("total", 132), ("tax", -132)]))
    );
    assert!(!computed.names().contains(&"unused_bonus".to_string()));
    assert_eq!(computed.count(), 6);
}

#[test]
fn test_json_demo_matches_text_demo() {
    let text = load("demos/pricing.calc");
    let json = load("demos/pricing.json");
    assert_eq!(text, json);
}

#[test]
fn test_cycle_demo() {
    let program = load("demos/cycle.calc");
    let (outcome, computed) = run_observed(&program, Duration::ZERO);
    assert!(matches!(outcome, Err(ExecError::CyclicDependency(_, _))));
    assert_eq!(computed.count(), 0);
}

#[test]
fn test_format_from_extension() {
    assert_eq!(Format::from_path(Path::new("a/b.json")), Format::Json);
    assert_eq!(Format::from_path(Path::new("a/b.JSON")), Format::Json);
    assert_eq!(Format::from_path(Path::new("a/b.calc")), Format::Text);
    assert_eq!(Format::from_path(Path::new("noext")), Format::Text);
}

#[test]
fn test_errors_report_location() {
    match parse_program("x = 1 + 2\ny = 3 / 4\n", Format::Text).unwrap_err() {
        ParseError::Lex(err) => {
            assert_eq!(err.location.line, 2);
            assert_eq!(err.location.column, 7);
        }
        other => panic!("expected a lexer error, got {:?}", other),
    }

    match parse_program("x = 1 +\nprint x\n", Format::Text).unwrap_err() {
        ParseError::Syntax { location, .. } => assert_eq!(location.line, 1),
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_json_rejects_bad_operands() {
    for operand in ["1.5", "true", "null", "{}", "[1]", "9223372036854775808"] {
        let body = format!(
            r#"{{"instructions":[{{"type":"calc","op":"+","var":"x","left":{},"right":1}}]}}"#,
            operand
        );
        assert!(
            matches!(parse_program(&body, Format::Json), Err(ParseError::Json(_))),
            "accepted operand {}",
            operand
        );
    }
}

#[test]
fn test_json_rejects_empty_and_unknown() {
    assert!(matches!(
        parse_program(r#"{"instructions":[]}"#, Format::Json),
        Err(ParseError::Invalid(_))
    ));
    assert!(parse_program(
        r#"{"instructions":[{"type":"calc","op":"/","var":"x","left":1,"right":1}]}"#,
        Format::Json
    )
    .is_err());
    assert!(parse_program(r#"{"instructions":[{"type":"jump"}]}"#, Format::Json).is_err());
}

#[test]
fn test_response_bodies() {
    let body = render_results(&results(&[("x", 12), ("w", 0)]));
    assert_eq!(body, r#"{"items":[{"var":"x","value":12},{"var":"w","value":0}]}"#);

    let body = render_error(&ExecError::UndefinedVariable("missing".to_string()));
    assert_eq!(body, r#"{"message":"variable 'missing' is never calculated"}"#);

    let body = render_error(&ExecError::Internal("worker panicked".to_string()));
    assert_eq!(body, r#"{"message":"Internal server error"}"#);
}
