use crate::errors::errors::{ErrorImpl, ErrorKind};

use super::{
    fixtures::calculator,
    specification::{
        Associativity, BuiltinFunction, CommentSyntax, DataType, LanguageKind, Operator, Specification,
    },
    template::{NativeFunction, NativeOp, OperatorTemplate, TemplateForm},
};

#[test]
fn test_fixture_is_valid() {
    assert!(calculator(LanguageKind::Interpreted).validate().is_ok());
    assert!(calculator(LanguageKind::Compiled).with_target("java").validate().is_ok());
}

#[test]
fn test_duplicate_operator_rejected() {
    let spec = calculator(LanguageKind::Interpreted).with_operator(Operator::new(
        "+",
        3,
        Associativity::Left,
        "arithmetic",
        "a + b",
    ));

    let err = spec.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(err.get_impl(), ErrorImpl::DuplicateOperator { symbol } if symbol == "+"));
    assert!(err.get_position().is_null());
}

#[test]
fn test_duplicate_keyword_rejected() {
    let spec = calculator(LanguageKind::Interpreted).with_keyword("if", "control");
    let err = spec.validate().unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::DuplicateKeyword { word } if word == "if"));
}

#[test]
fn test_negative_precedence_rejected() {
    let spec = Specification::new("Neg", LanguageKind::Interpreted).with_operator(Operator::new(
        "+",
        -1,
        Associativity::Left,
        "arithmetic",
        "a + b",
    ));
    let err = spec.validate().unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::InvalidPrecedence { precedence: -1, .. }));
}

#[test]
fn test_invalid_operator_symbols() {
    for symbol in ["", "a b", "(", ";", "2x", "if", "//"] {
        let spec = Specification::new("Ops", LanguageKind::Interpreted).with_operator(
            Operator::new(symbol, 1, Associativity::Left, "arithmetic", "a + b"),
        );
        let err = spec.validate().unwrap_err();
        assert!(
            matches!(err.get_impl(), ErrorImpl::InvalidOperatorSymbol { .. }),
            "symbol {:?} gave {:?}",
            symbol,
            err
        );
    }
}

#[test]
fn test_empty_name_and_targets() {
    let err = Specification::new("  ", LanguageKind::Interpreted).validate().unwrap_err();
    assert_eq!(err.get_impl(), &ErrorImpl::EmptyLanguageName);

    let err = Specification::new("X", LanguageKind::Compiled)
        .with_target("cobol")
        .validate()
        .unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::UnsupportedTarget { target } if target == "cobol"));

    let mut spec = Specification::new("X", LanguageKind::Compiled);
    spec.target_language = None;
    assert_eq!(spec.validate().unwrap_err().get_impl(), &ErrorImpl::MissingTarget);

    // Interpreted languages ignore the target entirely.
    let spec = Specification::new("X", LanguageKind::Interpreted).with_target("cobol");
    assert!(spec.validate().is_ok());
}

#[test]
fn test_comment_markers() {
    let spec = Specification::new("C", LanguageKind::Interpreted).with_comments(CommentSyntax {
        single_line: Some(String::from("#")),
        multi_line_start: Some(String::from("/*")),
        multi_line_end: None,
    });
    assert!(matches!(
        spec.validate().unwrap_err().get_impl(),
        ErrorImpl::InvalidCommentSyntax { .. }
    ));

    let spec = Specification::new("C", LanguageKind::Interpreted).with_comments(CommentSyntax {
        single_line: Some(String::from("rem")),
        multi_line_start: None,
        multi_line_end: None,
    });
    assert!(spec.validate().is_err());

    let spec = Specification::new("C", LanguageKind::Interpreted).with_comments(CommentSyntax::none());
    assert!(spec.validate().is_ok());
}

#[test]
fn test_unresolved_builtin() {
    let spec = Specification::new("B", LanguageKind::Interpreted).with_builtin(BuiltinFunction::new(
        "launch",
        vec![],
        DataType::Void,
        "os.system('rm')",
    ));
    let err = spec.validate().unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::UnresolvedBuiltin { name, .. } if name == "launch"));
}

#[test]
fn test_builtin_resolution() {
    let by_call = BuiltinFunction::new("root", vec![], DataType::Float, "return math.sqrt(x)");
    assert_eq!(NativeFunction::resolve(&by_call), Some(NativeFunction::Sqrt));

    let by_name = BuiltinFunction::new("upper", vec![], DataType::String, "s.toUpperCase");
    assert_eq!(NativeFunction::resolve(&by_name), Some(NativeFunction::Upper));
}

#[test]
fn test_operator_templates() {
    let add = OperatorTemplate::parse("+", "a + b", false).unwrap();
    assert_eq!(add.op, NativeOp::Add);
    assert_eq!(add.form, TemplateForm::Infix(String::from("+")));
    assert!(!add.swapped);
    assert_eq!(add.render("x", "1"), "x + 1");

    let power = OperatorTemplate::parse("^", "pow(left, right)", false).unwrap();
    assert_eq!(power.op, NativeOp::Pow);
    assert_eq!(power.render("2", "3"), "pow(2, 3)");

    let reversed = OperatorTemplate::parse("<-", "b - a", false).unwrap();
    assert!(reversed.swapped);
    assert_eq!(reversed.render("x", "y"), "y - x");

    let not = OperatorTemplate::parse("!", "not a", true).unwrap();
    assert_eq!(not.op, NativeOp::Not);
    assert_eq!(not.render("ok", ""), "not ok");

    let neg = OperatorTemplate::parse("~", "-a", true).unwrap();
    assert_eq!(neg.render("x", ""), "-x");
}

#[test]
fn test_malformed_templates() {
    for template in ["a + b + c", "a + c", "eval(a, b)", "a", "import os"] {
        let err = OperatorTemplate::parse("?", template, false).unwrap_err();
        assert!(
            matches!(err.get_impl(), ErrorImpl::InvalidTemplate { .. }),
            "template {:?}",
            template
        );
    }
    assert!(OperatorTemplate::parse("~", "a + b", true).is_err());
}

#[test]
fn test_json_wire_format() {
    let source = r#"{
        "name": "Tiny",
        "language_type": "interpreted",
        "operators": [
            {"symbol": "+", "precedence": 10, "associativity": "left",
             "operation_type": "arithmetic", "implementation": "a + b"}
        ],
        "keywords": [{"word": "if", "category": "control"}],
        "builtin_functions": [
            {"name": "len", "parameters": [{"name": "s", "type": "string"}],
             "return_type": "integer", "implementation": "len(s)"}
        ],
        "syntax_rules": {"ignored": true}
    }"#;

    let spec = Specification::from_json_str(source).unwrap();
    assert_eq!(spec.version, "1.0.0");
    assert_eq!(spec.target_language.as_deref(), Some("python"));
    assert_eq!(spec.comment_syntax, CommentSyntax::default());
    assert_eq!(spec.operators[0].template, "a + b");
    assert_eq!(spec.builtin_functions[0].parameters[0].data_type, DataType::String);
    assert!(spec.validate().is_ok());

    let again = Specification::from_json_str(&spec.to_json_string().unwrap()).unwrap();
    assert_eq!(again, spec);
}

#[test]
fn test_yaml_wire_format() {
    let source = "
name: Tiny
language_type: compiled
target_language: cpp
operators:
  - symbol: '*'
    precedence: 20
    associativity: left
    implementation: a * b
";
    let spec = Specification::from_yaml_str(source).unwrap();
    assert_eq!(spec.language_kind, LanguageKind::Compiled);
    assert!(spec.validate().is_ok());
}
