use std::{cell::RefCell, fmt::Display, rc::Rc};

use crate::{
    ast::statements::FnDeclStmt,
    spec::{specification::DataType, template::NativeFunction},
};

use super::environment::Environment;

/// A user function together with the scope it was declared in.
pub struct Closure {
    pub decl: Rc<FnDeclStmt>,
    pub env: Rc<RefCell<Environment>>,
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.decl.name)
            .field("parameters", &self.decl.parameters)
            .finish()
    }
}

/// A builtin bound in the outermost scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinBinding {
    pub name: String,
    pub native: NativeFunction,
    /// `None` for variadic builtins.
    pub arity: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Array(Vec<Value>),
    Function(Rc<Closure>),
    Builtin(Rc<BuiltinBinding>),
    Void,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => DataType::Integer.name(),
            Value::Float(_) => DataType::Float.name(),
            Value::String(_) => DataType::String.name(),
            Value::Boolean(_) => DataType::Boolean.name(),
            Value::Array(_) => DataType::Array.name(),
            Value::Function(_) | Value::Builtin(_) => "function",
            Value::Void => DataType::Void.name(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }
}

/// Equality as the `==` family of operators sees it. Integers and floats
/// compare numerically; values of different kinds are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Void, Value::Void) => true,
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{:?}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match value {
                        Value::String(text) => write!(f, "{:?}", text)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                write!(f, "]")
            }
            Value::Function(closure) => write!(f, "<function {}>", closure.decl.name),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Value::Void => write!(f, "void"),
        }
    }
}
