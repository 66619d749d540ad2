//! Operator and builtin micro-templates.
//!
//! Operator implementations are written as tiny expressions over two named
//! operand holes (`a + b`, `pow(a, b)`, `b - a`) or, for unary operators, one
//! hole (`-a`, `not a`). A template is parsed once at generation time into a
//! closed set of native operations; it is never evaluated as code.
//!
//! Builtin implementations are resolved the same way: the first call form in
//! the implementation text (or the builtin's own name) selects a native function.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::errors::{Error, ErrorImpl};

use super::specification::BuiltinFunction;

/// Accepted hole pairs, left operand first.
const HOLE_PAIRS: [(&str, &str); 4] = [("a", "b"), ("left", "right"), ("x", "y"), ("lhs", "rhs")];

lazy_static! {
    static ref CALL_FORM: Regex = Regex::new(r"([A-Za-z_][A-Za-z0-9_\.]*)\s*\(").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Min,
    Max,
    Concat,
    Neg,
    Not,
}

impl NativeOp {
    pub fn name(&self) -> &'static str {
        match self {
            NativeOp::Add => "add",
            NativeOp::Sub => "sub",
            NativeOp::Mul => "mul",
            NativeOp::Div => "div",
            NativeOp::Mod => "mod",
            NativeOp::Pow => "pow",
            NativeOp::Eq => "eq",
            NativeOp::Ne => "ne",
            NativeOp::Lt => "lt",
            NativeOp::Le => "le",
            NativeOp::Gt => "gt",
            NativeOp::Ge => "ge",
            NativeOp::And => "and",
            NativeOp::Or => "or",
            NativeOp::Min => "min",
            NativeOp::Max => "max",
            NativeOp::Concat => "concat",
            NativeOp::Neg => "neg",
            NativeOp::Not => "not",
        }
    }

    pub fn is_unary(&self) -> bool {
        matches!(self, NativeOp::Neg | NativeOp::Not)
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            NativeOp::Eq | NativeOp::Ne | NativeOp::Lt | NativeOp::Le | NativeOp::Gt | NativeOp::Ge
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, NativeOp::And | NativeOp::Or | NativeOp::Not)
    }

    fn from_infix(token: &str) -> Option<Self> {
        match token {
            "+" => Some(NativeOp::Add),
            "-" => Some(NativeOp::Sub),
            "*" => Some(NativeOp::Mul),
            "/" => Some(NativeOp::Div),
            "%" | "mod" => Some(NativeOp::Mod),
            "**" | "^" => Some(NativeOp::Pow),
            "==" => Some(NativeOp::Eq),
            "!=" | "<>" | "~=" => Some(NativeOp::Ne),
            "<" => Some(NativeOp::Lt),
            "<=" => Some(NativeOp::Le),
            ">" => Some(NativeOp::Gt),
            ">=" => Some(NativeOp::Ge),
            "&&" | "and" => Some(NativeOp::And),
            "||" | "or" => Some(NativeOp::Or),
            "++" | ".." => Some(NativeOp::Concat),
            _ => None,
        }
    }

    fn from_call(function: &str) -> Option<Self> {
        match function {
            "pow" => Some(NativeOp::Pow),
            "mod" => Some(NativeOp::Mod),
            "min" => Some(NativeOp::Min),
            "max" => Some(NativeOp::Max),
            "concat" => Some(NativeOp::Concat),
            _ => None,
        }
    }

    fn from_prefix(token: &str) -> Option<Self> {
        match token {
            "-" | "neg" => Some(NativeOp::Neg),
            "!" | "not" => Some(NativeOp::Not),
            _ => None,
        }
    }
}

impl Display for NativeOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateForm {
    /// `a OP b`
    Infix(String),
    /// `NAME(a, b)`
    Call(String),
    /// `OP a`
    Prefix(String),
    /// `NAME(a)`
    PrefixCall(String),
}

/// A parsed operator template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorTemplate {
    pub op: NativeOp,
    pub form: TemplateForm,
    /// The template names the right operand first (`b - a`).
    pub swapped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Word(String),
    Symbol(String),
    Open,
    Close,
    Comma,
}

fn scan(template: &str) -> Vec<Piece> {
    let chars: Vec<char> = template.chars().collect();
    let mut pieces = vec![];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            pieces.push(Piece::Word(chars[start..i].iter().collect()));
        } else if c == '(' {
            pieces.push(Piece::Open);
            i += 1;
        } else if c == ')' {
            pieces.push(Piece::Close);
            i += 1;
        } else if c == ',' {
            pieces.push(Piece::Comma);
            i += 1;
        } else {
            let start = i;
            while i < chars.len()
                && !chars[i].is_whitespace()
                && !chars[i].is_ascii_alphanumeric()
                && !matches!(chars[i], '_' | '(' | ')' | ',')
            {
                i += 1;
            }
            pieces.push(Piece::Symbol(chars[start..i].iter().collect()));
        }
    }

    pieces
}

fn hole_order(first: &str, second: &str) -> Option<bool> {
    for (left, right) in HOLE_PAIRS {
        if first == left && second == right {
            return Some(false);
        }
        if first == right && second == left {
            return Some(true);
        }
    }
    None
}

fn is_hole(name: &str) -> bool {
    HOLE_PAIRS
        .iter()
        .any(|(left, right)| *left == name || *right == name)
}

impl OperatorTemplate {
    /// Parses `template` for the operator `owner`. Unary operators take one hole,
    /// every other operator exactly two.
    pub fn parse(owner: &str, template: &str, unary: bool) -> Result<Self, Error> {
        let invalid = |reason: &str| {
            Error::validation(ErrorImpl::InvalidTemplate {
                owner: owner.to_string(),
                template: template.to_string(),
                reason: reason.to_string(),
            })
        };

        let pieces = scan(template);

        if unary {
            let (token, hole, form) = match pieces.as_slice() {
                [Piece::Symbol(token), Piece::Word(hole)] => {
                    (token.clone(), hole.clone(), TemplateForm::Prefix(token.clone()))
                }
                [Piece::Word(token), Piece::Word(hole)] => {
                    (token.clone(), hole.clone(), TemplateForm::Prefix(token.clone()))
                }
                [Piece::Word(function), Piece::Open, Piece::Word(hole), Piece::Close] => (
                    function.clone(),
                    hole.clone(),
                    TemplateForm::PrefixCall(function.clone()),
                ),
                _ => {
                    return Err(invalid(
                        "unary templates take the form `OP a` or `name(a)` with exactly one operand hole",
                    ))
                }
            };
            if !is_hole(&hole) {
                return Err(invalid("the operand hole must be named `a`"));
            }
            let op = NativeOp::from_prefix(&token)
                .ok_or_else(|| invalid(&format!("`{}` is not a known prefix operation", token)))?;
            return Ok(OperatorTemplate {
                op,
                form,
                swapped: false,
            });
        }

        let (token, first, second, form) = match pieces.as_slice() {
            [Piece::Word(first), Piece::Symbol(token), Piece::Word(second)]
            | [Piece::Word(first), Piece::Word(token), Piece::Word(second)] => (
                token.clone(),
                first.clone(),
                second.clone(),
                TemplateForm::Infix(token.clone()),
            ),
            [Piece::Word(function), Piece::Open, Piece::Word(first), Piece::Comma, Piece::Word(second), Piece::Close] => {
                (
                    function.clone(),
                    first.clone(),
                    second.clone(),
                    TemplateForm::Call(function.clone()),
                )
            }
            _ => {
                return Err(invalid(
                    "binary templates take the form `a OP b` or `name(a, b)` with exactly two operand holes",
                ))
            }
        };

        let swapped = hole_order(&first, &second)
            .ok_or_else(|| invalid("the operand holes must be named `a` and `b`"))?;

        let op = match &form {
            TemplateForm::Call(function) => NativeOp::from_call(function),
            _ => NativeOp::from_infix(&token),
        }
        .ok_or_else(|| invalid(&format!("`{}` is not a known binary operation", token)))?;

        Ok(OperatorTemplate { op, form, swapped })
    }

    /// Renders the template back with the holes replaced by `left`/`right`.
    pub fn render(&self, left: &str, right: &str) -> String {
        let (first, second) = if self.swapped {
            (right, left)
        } else {
            (left, right)
        };
        match &self.form {
            TemplateForm::Infix(token) => format!("{} {} {}", first, token, second),
            TemplateForm::Call(function) => format!("{}({}, {})", function, first, second),
            TemplateForm::Prefix(token) if token.chars().all(|c| c.is_ascii_alphabetic()) => {
                format!("{} {}", token, left)
            }
            TemplateForm::Prefix(token) => format!("{}{}", token, left),
            TemplateForm::PrefixCall(function) => format!("{}({})", function, left),
        }
    }
}

/// Native behaviours a builtin implementation may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeFunction {
    Print,
    Sqrt,
    Abs,
    Len,
    Str,
    Int,
    Float,
    Upper,
    Lower,
    Floor,
    Ceil,
    Min,
    Max,
    Pow,
    Range,
    Concat,
}

impl NativeFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" | "println" | "log" => Some(NativeFunction::Print),
            "sqrt" => Some(NativeFunction::Sqrt),
            "abs" => Some(NativeFunction::Abs),
            "len" | "length" => Some(NativeFunction::Len),
            "str" | "to_string" | "string" => Some(NativeFunction::Str),
            "int" | "to_int" => Some(NativeFunction::Int),
            "float" | "to_float" => Some(NativeFunction::Float),
            "upper" | "to_upper" => Some(NativeFunction::Upper),
            "lower" | "to_lower" => Some(NativeFunction::Lower),
            "floor" => Some(NativeFunction::Floor),
            "ceil" => Some(NativeFunction::Ceil),
            "min" => Some(NativeFunction::Min),
            "max" => Some(NativeFunction::Max),
            "pow" => Some(NativeFunction::Pow),
            "range" => Some(NativeFunction::Range),
            "concat" => Some(NativeFunction::Concat),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NativeFunction::Print => "print",
            NativeFunction::Sqrt => "sqrt",
            NativeFunction::Abs => "abs",
            NativeFunction::Len => "len",
            NativeFunction::Str => "str",
            NativeFunction::Int => "int",
            NativeFunction::Float => "float",
            NativeFunction::Upper => "upper",
            NativeFunction::Lower => "lower",
            NativeFunction::Floor => "floor",
            NativeFunction::Ceil => "ceil",
            NativeFunction::Min => "min",
            NativeFunction::Max => "max",
            NativeFunction::Pow => "pow",
            NativeFunction::Range => "range",
            NativeFunction::Concat => "concat",
        }
    }

    /// Resolves the native behaviour of a declared builtin.
    pub fn resolve(builtin: &BuiltinFunction) -> Option<Self> {
        let from_call = CALL_FORM
            .captures_iter(&builtin.implementation)
            .filter_map(|captures| {
                let path = captures.get(1)?.as_str();
                NativeFunction::from_name(path.rsplit('.').next().unwrap_or(path))
            })
            .next();

        from_call.or_else(|| NativeFunction::from_name(&builtin.name))
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
