use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryExpr, CallExpr, Literal, PrefixExpr},
    },
    errors::errors::Error,
    spec::{
        rules::OperatorRule,
        specification::DataType,
        template::{NativeFunction, NativeOp},
    },
    type_checker::type_checker::Slot,
    Position,
};

use super::{compiler::Compiler, targets::TargetLanguage};

/// Renders `expression` in target syntax. Nested operations are parenthesized
/// so the target's own precedence rules never change the tree's meaning.
pub fn gen_expression(compiler: &mut Compiler, expression: &Expr) -> Result<String, Error> {
    match expression {
        Expr::Literal(literal) => Ok(gen_literal(compiler.target, &literal.value)),
        Expr::Symbol(symbol) => Ok(symbol.name.clone()),
        Expr::Binary(binary) => gen_binary(compiler, binary),
        Expr::Prefix(prefix) => gen_prefix(compiler, prefix),
        Expr::Call(call) => gen_call(compiler, call),
    }
}

fn gen_operand(compiler: &mut Compiler, expression: &Expr) -> Result<String, Error> {
    let rendered = gen_expression(compiler, expression)?;
    match expression {
        Expr::Binary(_) | Expr::Prefix(_) => Ok(format!("({})", rendered)),
        _ => Ok(rendered),
    }
}

fn gen_literal(target: TargetLanguage, literal: &Literal) -> String {
    match literal {
        Literal::Integer(value) => {
            let small = i32::try_from(*value).is_ok();
            match target {
                TargetLanguage::Java if !small => format!("{}L", value),
                TargetLanguage::Cpp if !small => format!("{}LL", value),
                _ => value.to_string(),
            }
        }
        Literal::Float(value) => format!("{:?}", value),
        Literal::String(value) => {
            let quoted = quote(target, value);
            if target == TargetLanguage::Cpp {
                format!("std::string({})", quoted)
            } else {
                quoted
            }
        }
        Literal::Boolean(value) => match (target, value) {
            (TargetLanguage::Python, true) => String::from("True"),
            (TargetLanguage::Python, false) => String::from("False"),
            (_, value) => value.to_string(),
        },
    }
}

/// A double-quoted string literal valid in every target.
fn quote(target: TargetLanguage, value: &str) -> String {
    let mut out = String::from("\"");
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => match target {
                TargetLanguage::Cpp => out.push_str(&format!("\\{:03o}", c as u32)),
                _ => out.push_str(&format!("\\u{:04x}", c as u32)),
            },
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Converts a rendered operand to the target's string type.
fn to_text(compiler: &Compiler, rendered: String, slot: Slot, position: Position) -> Result<String, Error> {
    if slot == Some(DataType::String) {
        return Ok(rendered);
    }
    match compiler.target {
        TargetLanguage::Python => Ok(format!("str({})", rendered)),
        TargetLanguage::JavaScript => Ok(format!("String({})", rendered)),
        TargetLanguage::Java => Ok(format!("String.valueOf({})", rendered)),
        TargetLanguage::Cpp => match slot {
            Some(DataType::Integer | DataType::Float) => Ok(format!("std::to_string({})", rendered)),
            Some(DataType::Boolean) => Ok(format!("std::string({} ? \"true\" : \"false\")", rendered)),
            _ => Err(compiler.unsupported(
                String::from("string conversion of a value of unknown type"),
                position,
            )),
        },
    }
}

fn is_string(slot: Slot) -> bool {
    slot == Some(DataType::String)
}

fn is_float(slot: Slot) -> bool {
    slot == Some(DataType::Float)
}

/// Integer division truncating toward zero, as the other targets and the
/// interpreter divide.
const PYTHON_TRUNC_DIV: &str = "\
def _trunc_div(a, b):
    q = abs(a) // abs(b)
    return q if (a < 0) == (b < 0) else -q
";

/// Remainder taking the sign of the dividend.
const PYTHON_TRUNC_MOD: &str = "\
def _trunc_mod(a, b):
    return a - b * _trunc_div(a, b)
";

/// Renders a native binary operation over already-rendered operands.
fn gen_native_binary(
    compiler: &mut Compiler,
    op: NativeOp,
    (left, left_type): (String, Slot),
    (right, right_type): (String, Slot),
    result: Slot,
    position: Position,
) -> Result<String, Error> {
    use TargetLanguage::*;

    let target = compiler.target;
    let infix = |token: &str| format!("{} {} {}", left, token, right);

    let rendered = match op {
        NativeOp::Add => infix("+"),
        NativeOp::Sub => infix("-"),
        NativeOp::Mul => infix("*"),
        NativeOp::Div => match target {
            Python if result == Some(DataType::Integer) => {
                compiler.require_helper(PYTHON_TRUNC_DIV);
                format!("_trunc_div({}, {})", left, right)
            }
            JavaScript if result == Some(DataType::Integer) => format!("Math.trunc({} / {})", left, right),
            _ => infix("/"),
        },
        NativeOp::Mod => match target {
            Cpp if is_float(left_type) || is_float(right_type) => {
                format!("std::fmod({}, {})", left, right)
            }
            Python if is_float(left_type) || is_float(right_type) => {
                compiler.require_import("math");
                format!("math.fmod({}, {})", left, right)
            }
            Python if result == Some(DataType::Integer) => {
                compiler.require_helper(PYTHON_TRUNC_DIV);
                compiler.require_helper(PYTHON_TRUNC_MOD);
                format!("_trunc_mod({}, {})", left, right)
            }
            _ => infix("%"),
        },
        NativeOp::Pow => match target {
            Python | JavaScript => infix("**"),
            Java if result == Some(DataType::Integer) => {
                format!("(long) Math.pow({}, {})", left, right)
            }
            Java => format!("Math.pow({}, {})", left, right),
            Cpp if result == Some(DataType::Integer) => {
                format!("static_cast<int64_t>(std::pow({}, {}))", left, right)
            }
            Cpp => format!("std::pow({}, {})", left, right),
        },
        NativeOp::Eq | NativeOp::Ne => {
            let equal = op == NativeOp::Eq;
            match target {
                JavaScript => infix(if equal { "===" } else { "!==" }),
                Java if is_string(left_type) || is_string(right_type) => {
                    let call = format!("{}.equals({})", left, right);
                    if equal {
                        call
                    } else {
                        format!("!{}", call)
                    }
                }
                _ => infix(if equal { "==" } else { "!=" }),
            }
        }
        NativeOp::Lt | NativeOp::Le | NativeOp::Gt | NativeOp::Ge => {
            let token = match op {
                NativeOp::Lt => "<",
                NativeOp::Le => "<=",
                NativeOp::Gt => ">",
                _ => ">=",
            };
            if target == Java && (is_string(left_type) || is_string(right_type)) {
                format!("{}.compareTo({}) {} 0", left, right, token)
            } else {
                infix(token)
            }
        }
        NativeOp::And => match target {
            Python => infix("and"),
            _ => infix("&&"),
        },
        NativeOp::Or => match target {
            Python => infix("or"),
            _ => infix("||"),
        },
        NativeOp::Min | NativeOp::Max => {
            let name = op.name();
            match target {
                Python => format!("{}({}, {})", name, left, right),
                JavaScript | Java => format!("Math.{}({}, {})", name, left, right),
                Cpp => format!("std::{}({}, {})", name, left, right),
            }
        }
        NativeOp::Concat => {
            let left = to_text(compiler, left, left_type, position)?;
            let right = to_text(compiler, right, right_type, position)?;
            format!("{} + {}", left, right)
        }
        NativeOp::Neg | NativeOp::Not => {
            return Err(compiler.unsupported(format!("`{}` between two operands", op), position))
        }
    };

    Ok(rendered)
}

fn gen_binary(compiler: &mut Compiler, binary: &BinaryExpr) -> Result<String, Error> {
    let position = binary.span.start;
    let Some(rule) = compiler.definition.rules.binary(&binary.operator).cloned() else {
        return Err(compiler.unsupported(format!("operator `{}`", binary.operator), position));
    };

    let left = (
        gen_operand(compiler, &binary.left)?,
        compiler.types.expr_type(&binary.left),
    );
    let right = (
        gen_operand(compiler, &binary.right)?,
        compiler.types.expr_type(&binary.right),
    );
    let (left, right) = if rule.swapped {
        (right, left)
    } else {
        (left, right)
    };

    let result = compiler.types.type_at(&binary.span);
    gen_native_binary(compiler, rule.op, left, right, result, position)
}

fn gen_prefix(compiler: &mut Compiler, prefix: &PrefixExpr) -> Result<String, Error> {
    let position = prefix.span.start;
    let Some(rule) = compiler.definition.rules.prefix(&prefix.operator).cloned() else {
        return Err(compiler.unsupported(format!("prefix operator `{}`", prefix.operator), position));
    };

    let operand = gen_operand(compiler, &prefix.operand)?;
    match (rule.op, compiler.target) {
        (NativeOp::Neg, _) => Ok(format!("-{}", operand)),
        (NativeOp::Not, TargetLanguage::Python) => Ok(format!("not {}", operand)),
        (NativeOp::Not, _) => Ok(format!("!{}", operand)),
        (op, _) => Err(compiler.unsupported(format!("`{}` as a prefix operation", op), position)),
    }
}

fn gen_call(compiler: &mut Compiler, call: &CallExpr) -> Result<String, Error> {
    if compiler.types.function(&call.name).is_some() {
        let mut arguments = vec![];
        for argument in &call.arguments {
            arguments.push(gen_expression(compiler, argument)?);
        }
        return Ok(format!("{}({})", call.name, arguments.join(", ")));
    }

    match compiler.definition.builtins.get(&call.name).copied() {
        Some(native) => gen_builtin(compiler, native, call),
        None => Err(compiler.unsupported(
            format!("call to unknown function `{}`", call.name),
            call.span.start,
        )),
    }
}

/// Prints whole floats with a trailing `.0`, as Python and Java do.
const JAVASCRIPT_FLOAT_TEXT: &str = "\
function _float_text(x) {
    return Number.isInteger(x) ? x.toFixed(1) : String(x);
}
";

const CPP_FLOAT_TEXT: &str = "\
std::string _float_text(double x) {
    char buffer[32];
    auto result = std::to_chars(buffer, buffer + sizeof buffer, x);
    std::string text(buffer, result.ptr);
    if (text.find_first_of(\".en\") == std::string::npos) {
        text += \".0\";
    }
    return text;
}
";

/// Shortest round-trip rendering for a printed float on targets whose console
/// output would drop the fraction of a whole number.
fn float_text(compiler: &mut Compiler, rendered: String, slot: Slot) -> String {
    if !is_float(slot) {
        return rendered;
    }
    match compiler.target {
        TargetLanguage::JavaScript => {
            compiler.require_helper(JAVASCRIPT_FLOAT_TEXT);
            format!("_float_text({})", rendered)
        }
        TargetLanguage::Cpp => {
            compiler.require_import("charconv");
            compiler.require_helper(CPP_FLOAT_TEXT);
            format!("_float_text({})", rendered)
        }
        TargetLanguage::Python | TargetLanguage::Java => rendered,
    }
}

fn gen_builtin(compiler: &mut Compiler, native: NativeFunction, call: &CallExpr) -> Result<String, Error> {
    use TargetLanguage::*;

    let position = call.span.start;
    let target = compiler.target;

    let mut arguments: Vec<(String, Slot)> = vec![];
    for argument in &call.arguments {
        let rendered = match (native, target) {
            (NativeFunction::Print, Cpp) => gen_operand(compiler, argument)?,
            _ => gen_expression(compiler, argument)?,
        };
        arguments.push((rendered, compiler.types.expr_type(argument)));
    }

    let arity = |expected: usize| {
        if arguments.len() == expected {
            Ok(())
        } else {
            Err(compiler.unsupported(
                format!("`{}` with {} arguments", call.name, arguments.len()),
                position,
            ))
        }
    };

    let rendered = match native {
        NativeFunction::Print => {
            let mut texts = vec![];
            for (text, slot) in &arguments {
                texts.push(float_text(compiler, text.clone(), *slot));
            }
            match target {
                Python => format!("print({})", texts.join(", ")),
                JavaScript => format!("console.log({})", texts.join(", ")),
                Java => match arguments.as_slice() {
                    [] => String::from("System.out.println()"),
                    [(single, _)] => format!("System.out.println({})", single),
                    _ => {
                        let mut parts = vec![];
                        for (text, slot) in &arguments {
                            parts.push(to_text(compiler, text.clone(), *slot, position)?);
                        }
                        format!("System.out.println({})", parts.join(" + \" \" + "))
                    }
                },
                Cpp => {
                    let mut line = String::from("std::cout");
                    for (index, text) in texts.iter().enumerate() {
                        if index > 0 {
                            line.push_str(" << \" \"");
                        }
                        line.push_str(&format!(" << {}", text));
                    }
                    line.push_str(" << std::endl");
                    line
                }
            }
        }
        NativeFunction::Sqrt | NativeFunction::Floor | NativeFunction::Ceil | NativeFunction::Abs => {
            arity(1)?;
            let value = &arguments[0].0;
            let name = native.name();
            match (target, native) {
                (Python, NativeFunction::Abs) => format!("abs({})", value),
                (Python, _) => {
                    compiler.require_import("math");
                    format!("math.{}({})", name, value)
                }
                (JavaScript | Java, _) => format!("Math.{}({})", name, value),
                (Cpp, _) => format!("std::{}({})", name, value),
            }
        }
        NativeFunction::Len => {
            arity(1)?;
            let value = &arguments[0].0;
            match target {
                Python => format!("len({})", value),
                JavaScript => format!("{}.length", value),
                Java => format!("{}.length()", value),
                Cpp => format!("static_cast<int64_t>({}.size())", value),
            }
        }
        NativeFunction::Str => {
            arity(1)?;
            let (value, slot) = arguments[0].clone();
            to_text(compiler, value, slot, position)?
        }
        NativeFunction::Int | NativeFunction::Float => {
            arity(1)?;
            let (value, slot) = &arguments[0];
            let integer = native == NativeFunction::Int;
            match (target, integer, is_string(*slot)) {
                (Python, true, _) => format!("int({})", value),
                (Python, false, _) => format!("float({})", value),
                (JavaScript, true, _) => format!("Math.trunc(Number({}))", value),
                (JavaScript, false, _) => format!("Number({})", value),
                (Java, true, true) => format!("Long.parseLong({})", value),
                (Java, true, false) => format!("(long) ({})", value),
                (Java, false, true) => format!("Double.parseDouble({})", value),
                (Java, false, false) => format!("(double) ({})", value),
                (Cpp, true, true) => format!("std::stoll({})", value),
                (Cpp, true, false) => format!("static_cast<int64_t>({})", value),
                (Cpp, false, true) => format!("std::stod({})", value),
                (Cpp, false, false) => format!("static_cast<double>({})", value),
            }
        }
        NativeFunction::Upper | NativeFunction::Lower => {
            arity(1)?;
            let value = &arguments[0].0;
            let upper = native == NativeFunction::Upper;
            match target {
                Python => format!("{}.{}()", value, if upper { "upper" } else { "lower" }),
                JavaScript | Java => format!(
                    "{}.{}()",
                    value,
                    if upper { "toUpperCase" } else { "toLowerCase" }
                ),
                Cpp => {
                    return Err(compiler.unsupported(format!("builtin `{}`", call.name), position))
                }
            }
        }
        NativeFunction::Min | NativeFunction::Max | NativeFunction::Pow | NativeFunction::Concat => {
            arity(2)?;
            let op = match native {
                NativeFunction::Min => NativeOp::Min,
                NativeFunction::Max => NativeOp::Max,
                NativeFunction::Pow => NativeOp::Pow,
                _ => NativeOp::Concat,
            };
            let result = compiler.types.type_at(&call.span);
            let mut pair = arguments.into_iter();
            match (pair.next(), pair.next()) {
                (Some(left), Some(right)) => {
                    gen_native_binary(compiler, op, left, right, result, position)?
                }
                _ => return Err(compiler.unsupported(format!("builtin `{}`", call.name), position)),
            }
        }
        NativeFunction::Range => {
            let texts: Vec<&str> = arguments.iter().map(|(text, _)| text.as_str()).collect();
            match (target, texts.as_slice()) {
                (Python, [_] | [_, _]) => format!("list(range({}))", texts.join(", ")),
                (JavaScript, [end]) => format!("Array.from({{ length: {} }}, (_, i) => i)", end),
                (JavaScript, [start, end]) => format!(
                    "Array.from({{ length: ({1}) - ({0}) }}, (_, i) => ({0}) + i)",
                    start, end
                ),
                _ => {
                    return Err(compiler.unsupported(format!("builtin `{}`", call.name), position))
                }
            }
        }
    };

    Ok(rendered)
}

/// How a binary rule renders over operands `a` and `b` of unknown type.
pub(crate) fn sample_binary(compiler: &mut Compiler, rule: &OperatorRule) -> Result<String, Error> {
    let a = (String::from("a"), None);
    let b = (String::from("b"), None);
    let (left, right) = if rule.swapped { (b, a) } else { (a, b) };
    gen_native_binary(compiler, rule.op, left, right, None, Position::null())
}
