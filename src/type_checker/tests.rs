use crate::{
    ast::ast::{Program, Stmt},
    errors::errors::{Error, ErrorImpl, ErrorKind},
    lexer::builder::LexerBuilder,
    parser::builder::ParserBuilder,
    spec::{
        fixtures::calculator,
        rules::OperatorRules,
        specification::{DataType, LanguageKind},
    },
};

use super::type_checker::{binary_result, infer, TypeTable};
use crate::spec::template::NativeOp;

fn parse(source: &str) -> Program {
    let spec = calculator(LanguageKind::Compiled);
    let lexer = LexerBuilder::new(&spec).build().unwrap();
    let parser = ParserBuilder::new(&spec, &lexer).build().unwrap();
    parser.parse(lexer.tokenize(source).unwrap()).unwrap()
}

fn check(source: &str) -> Result<TypeTable, Error> {
    let spec = calculator(LanguageKind::Compiled);
    let rules = OperatorRules::from_spec(&spec)?;
    infer(&spec, &rules, &parse(source))
}

#[test]
fn test_literal_and_operator_types() {
    let table = check(
        "
        a = 1
        b = 2.5
        c = \"hi\"
        d = a < 3
        e = a + b
        f = c + c
        g = a / 2
        h = !d
        i = a ** 2
        ",
    )
    .unwrap();

    let expected = [
        ("a", DataType::Integer),
        ("b", DataType::Float),
        ("c", DataType::String),
        ("d", DataType::Boolean),
        ("e", DataType::Float),
        ("f", DataType::String),
        ("g", DataType::Integer),
        ("h", DataType::Boolean),
        ("i", DataType::Integer),
    ];
    for (name, data_type) in expected {
        assert_eq!(table.globals.get(name), Some(Some(data_type)), "{}", name);
    }
}

#[test]
fn test_first_assignment_wins() {
    let err = check("x = 1\nx = \"one\"").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TypeInference);
    assert_eq!(err.get_position().line, 2);
    assert!(matches!(
        err.get_impl(),
        ErrorImpl::TypeMatchError { variable, expected, received }
            if variable == "x" && expected == "integer" && received == "string"
    ));

    let table = check("x = 1\nx = x + 1").unwrap();
    assert_eq!(table.globals.variables, vec![(String::from("x"), Some(DataType::Integer))]);
}

#[test]
fn test_parameters_follow_first_call() {
    let table = check(
        "
        function scale(v, by) { return v * by }
        r = scale(2.0, 3.0)
        ",
    )
    .unwrap();

    let scale = table.function("scale").unwrap();
    assert_eq!(
        scale.parameters,
        vec![
            (String::from("v"), Some(DataType::Float)),
            (String::from("by"), Some(DataType::Float)),
        ]
    );
    assert_eq!(scale.return_type, Some(DataType::Float));
    assert_eq!(table.globals.get("r"), Some(Some(DataType::Float)));

    let err = check(
        "
        function twice(v) { return v + v }
        twice(1)
        twice(\"a\")
        ",
    )
    .unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::ArgumentTypeMatchError { function, .. } if function == "twice"));
}

#[test]
fn test_recursive_function() {
    let table = check(
        "
        function fact(n) {
            if n <= 1 { return 1 }
            return n * fact(n - 1)
        }
        print(fact(5))
        ",
    )
    .unwrap();

    let fact = table.function("fact").unwrap();
    assert_eq!(fact.parameters[0].1, Some(DataType::Integer));
    assert_eq!(fact.return_type, Some(DataType::Integer));
}

#[test]
fn test_return_types() {
    let table = check("function greet() { print(\"hi\") }\ngreet()").unwrap();
    assert_eq!(table.function("greet").unwrap().return_type, Some(DataType::Void));

    let err = check(
        "
        function pick(flag) {
            if flag { return 1 }
            return \"one\"
        }
        pick(true)
        ",
    )
    .unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::ReturnTypeMatchError { function, .. } if function == "pick"));
}

#[test]
fn test_uncalled_function_gets_placeholders() {
    let table = check("function id(v) { return v }").unwrap();

    let id = table.function("id").unwrap();
    assert_eq!(id.parameters, vec![(String::from("v"), None)]);
    assert_eq!(id.return_type, None);
}

#[test]
fn test_uninferable() {
    let err = check("y = missing + 1").unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::UninferableType { name } if name == "missing"));

    let err = check("function noop() { }\nv = noop()").unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::UninferableType { name } if name == "v"));

    let err = check("v = nowhere(1)").unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::UninferableType { name } if name == "nowhere"));
}

#[test]
fn test_duplicate_function() {
    let err = check("function f() { }\nfunction f() { }").unwrap_err();

    assert_eq!(err.get_position().line, 2);
    assert!(matches!(err.get_impl(), ErrorImpl::FunctionAlreadyDeclared { function } if function == "f"));
}

#[test]
fn test_conditions_must_be_boolean() {
    let err = check("x = 1\nwhile x { x = x - 1 }").unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::TypeMatchError { variable, .. } if variable == "condition"));
}

#[test]
fn test_captures_and_outer_writes() {
    let table = check(
        "
        count = 0
        function bump(by) {
            step = by
            count = count + step
        }
        bump(2)
        ",
    )
    .unwrap();

    let bump = table.function("bump").unwrap();
    assert_eq!(bump.locals.get("step"), Some(Some(DataType::Integer)));
    assert!(bump.global_writes.contains("count"));
    assert!(bump.captures.contains("count"));
    assert!(!bump.captures.contains("step"));
    assert!(table.globals.get("step").is_none());
}

#[test]
fn test_nested_functions() {
    let table = check(
        "
        function outer(v) {
            total = v
            function inner(w) { total = total + w }
            inner(1)
            return total
        }
        print(outer(1))
        ",
    )
    .unwrap();

    let inner = table.function("inner").unwrap();
    assert_eq!(inner.parent.as_deref(), Some("outer"));
    assert!(inner.nonlocal_writes.contains("total"));
    assert_eq!(table.function_order, vec!["outer", "inner"]);
}

#[test]
fn test_expression_types_are_recorded() {
    let program = parse("x = 1 + 2.0\nprint(str(x))");
    let spec = calculator(LanguageKind::Compiled);
    let rules = OperatorRules::from_spec(&spec).unwrap();
    let table = infer(&spec, &rules, &program).unwrap();

    match &program.body[0] {
        Stmt::Assignment(stmt) => assert_eq!(table.expr_type(&stmt.value), Some(DataType::Float)),
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_binary_result_table() {
    use DataType::*;

    assert_eq!(binary_result(NativeOp::Add, Some(Integer), Some(Integer)), Some(Integer));
    assert_eq!(binary_result(NativeOp::Add, Some(String), Some(String)), Some(String));
    assert_eq!(binary_result(NativeOp::Add, Some(String), Some(Float)), None);
    assert_eq!(binary_result(NativeOp::Sub, Some(Integer), Some(Float)), Some(Float));
    assert_eq!(binary_result(NativeOp::Mul, None, Some(Float)), None);
    assert_eq!(binary_result(NativeOp::Lt, None, None), Some(Boolean));
    assert_eq!(binary_result(NativeOp::Concat, Some(Integer), Some(Integer)), Some(String));
    assert_eq!(binary_result(NativeOp::Max, Some(Boolean), Some(Integer)), None);
}

#[test]
fn test_block_variables_stay_in_their_block() {
    let err = check("x = 1\nif x < 2 { y = 1 }\nprint(y)").unwrap_err();
    assert_eq!(err.get_position().line, 3);
    assert!(matches!(err.get_impl(), ErrorImpl::UninferableType { name } if name == "y"));

    let err = check("n = 0\nwhile n < 2 { step = 1\nn = n + step }\nn = step").unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::UninferableType { name } if name == "step"));

    let table = check("x = 1\nif x < 2 { y = 1\nx = x + y }\nprint(x)").unwrap();
    assert!(table.globals.get("y").is_none());
}

#[test]
fn test_sibling_blocks_declare_independently() {
    let program = parse("{ v = 1 }\n{ v = \"one\"\nprint(v) }");
    let spec = calculator(LanguageKind::Compiled);
    let rules = OperatorRules::from_spec(&spec).unwrap();
    let table = infer(&spec, &rules, &program).unwrap();

    let declared: Vec<_> = program
        .body
        .iter()
        .map(|stmt| match stmt {
            Stmt::Block(block) => match &block.body[0] {
                Stmt::Assignment(assignment) => table.declared_type(&assignment.span),
                other => panic!("expected an assignment, found {:?}", other),
            },
            other => panic!("expected a block, found {:?}", other),
        })
        .collect();

    assert_eq!(
        declared,
        vec![Some(Some(DataType::Integer)), Some(Some(DataType::String))]
    );
}

#[test]
fn test_functions_see_only_enclosing_blocks() {
    let err = check(
        "
        function show() { print(hidden) }
        { hidden = 1
          show() }
        ",
    )
    .unwrap_err();
    assert!(matches!(err.get_impl(), ErrorImpl::UninferableType { name } if name == "hidden"));
}
