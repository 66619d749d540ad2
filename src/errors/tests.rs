//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position::new(10, 1, 11),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.kind(), ErrorKind::Lexical);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: "expression".to_string(),
            found: "}".to_string(),
        },
        Position::new(42, 3, 7),
    );

    assert_eq!(error.get_position().offset, 42);
    assert_eq!(error.get_position().line, 3);
    assert_eq!(error.kind(), ErrorKind::Parse);
}

#[test]
fn test_validation_error_has_null_position() {
    let error = Error::validation(ErrorImpl::DuplicateOperator {
        symbol: "+".to_string(),
    });

    assert!(error.get_position().is_null());
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(error.get_error_name(), "DuplicateOperator");
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMatchError {
            variable: "x".to_string(),
            expected: "integer".to_string(),
            received: "string".to_string(),
        },
        Position::new(0, 1, 1),
    );

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(error.kind(), ErrorKind::TypeInference);
}

#[test]
fn test_runtime_error_kinds() {
    let undefined = ErrorImpl::UndefinedIdentifier {
        name: "y".to_string(),
    };
    let not_callable = ErrorImpl::NotCallable {
        name: "x".to_string(),
    };
    let arity = ErrorImpl::ArityMismatch {
        name: "f".to_string(),
        expected: 2,
        received: 3,
    };

    assert_eq!(undefined.kind(), ErrorKind::Runtime);
    assert_eq!(not_callable.kind(), ErrorKind::Runtime);
    assert_eq!(arity.kind(), ErrorKind::Runtime);
}

#[test]
fn test_unsupported_construct_kind() {
    let error = Error::new(
        ErrorImpl::UnsupportedConstruct {
            construct: "nested function declaration".to_string(),
            target: "java".to_string(),
        },
        Position::new(4, 1, 5),
    );

    assert_eq!(error.kind(), ErrorKind::UnsupportedConstruct);
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position::new(0, 1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: "`)`".to_string(),
            found: "}".to_string(),
        },
        Position::new(0, 1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("`}`")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_mentions_kind_and_position() {
    let error = Error::new(
        ErrorImpl::DivisionByZero,
        Position::new(12, 2, 5),
    );

    assert_eq!(error.to_string(), "RuntimeError: division by zero (at 2:5)");
}
