use super::specification::{
    Associativity, BuiltinFunction, DataType, LanguageKind, Operator, Parameter, Specification,
};

/// A small calculator-style language used throughout the unit tests.
pub fn calculator(kind: LanguageKind) -> Specification {
    let left = Associativity::Left;

    Specification::new("Calc", kind)
        .with_keyword("if", "control")
        .with_keyword("else", "control")
        .with_keyword("while", "control")
        .with_keyword("function", "declaration")
        .with_keyword("return", "control")
        .with_operator(Operator::new("or", 1, left, "logical", "a or b"))
        .with_operator(Operator::new("and", 2, left, "logical", "a and b"))
        .with_operator(Operator::new("==", 5, left, "comparison", "a == b"))
        .with_operator(Operator::new("!=", 5, left, "comparison", "a != b"))
        .with_operator(Operator::new("<", 6, left, "comparison", "a < b"))
        .with_operator(Operator::new("<=", 6, left, "comparison", "a <= b"))
        .with_operator(Operator::new(">", 6, left, "comparison", "a > b"))
        .with_operator(Operator::new(">=", 6, left, "comparison", "a >= b"))
        .with_operator(Operator::new("+", 10, left, "arithmetic", "a + b"))
        .with_operator(Operator::new("-", 10, left, "arithmetic", "a - b"))
        .with_operator(Operator::new("*", 20, left, "arithmetic", "a * b"))
        .with_operator(Operator::new("/", 20, left, "arithmetic", "a / b"))
        .with_operator(Operator::new("%", 20, left, "arithmetic", "a % b"))
        .with_operator(Operator::new(
            "**",
            30,
            Associativity::Right,
            "arithmetic",
            "pow(a, b)",
        ))
        .with_operator(Operator::new("!", 40, left, "unary", "not a"))
        .with_builtin(BuiltinFunction::new(
            "sqrt",
            vec![Parameter::new("x", DataType::Float)],
            DataType::Float,
            "math.sqrt(x)",
        ))
        .with_builtin(BuiltinFunction::new(
            "len",
            vec![Parameter::new("s", DataType::String)],
            DataType::Integer,
            "len(s)",
        ))
        .with_builtin(BuiltinFunction::new(
            "str",
            vec![Parameter::new("v", DataType::Integer)],
            DataType::String,
            "str(v)",
        ))
}
