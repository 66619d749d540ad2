//! Evaluation of the native operations operator rules resolve to.

use crate::{
    errors::errors::ErrorImpl,
    spec::{rules::OperatorRule, template::NativeOp},
};

use super::value::Value;

impl OperatorRule {
    pub fn apply_binary(&self, left: Value, right: Value) -> Result<Value, ErrorImpl> {
        let (left, right) = if self.swapped {
            (right, left)
        } else {
            (left, right)
        };
        binary(&self.symbol, self.op, left, right)
    }

    pub fn apply_unary(&self, operand: Value) -> Result<Value, ErrorImpl> {
        unary(&self.symbol, self.op, operand)
    }
}

fn invalid(symbol: &str, left: &Value, right: &Value) -> ErrorImpl {
    ErrorImpl::InvalidOperands {
        operator: symbol.to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

fn overflow(symbol: &str) -> ErrorImpl {
    ErrorImpl::IntegerOverflow {
        operator: symbol.to_string(),
    }
}

fn numbers(symbol: &str, left: &Value, right: &Value) -> Result<(f64, f64), ErrorImpl> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(invalid(symbol, left, right)),
    }
}

/// Applies a binary native operation. Integer pairs stay integers (checked),
/// any float operand makes the result a float. Nothing else is coerced.
pub fn binary(symbol: &str, op: NativeOp, left: Value, right: Value) -> Result<Value, ErrorImpl> {
    use Value::{Array, Boolean, Float, Integer};

    match op {
        NativeOp::Add => match (&left, &right) {
            (Integer(a), Integer(b)) => a.checked_add(*b).map(Integer).ok_or_else(|| overflow(symbol)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            (Array(a), Array(b)) => Ok(Array(a.iter().chain(b.iter()).cloned().collect())),
            _ => numbers(symbol, &left, &right).map(|(a, b)| Float(a + b)),
        },
        NativeOp::Sub => match (&left, &right) {
            (Integer(a), Integer(b)) => a.checked_sub(*b).map(Integer).ok_or_else(|| overflow(symbol)),
            _ => numbers(symbol, &left, &right).map(|(a, b)| Float(a - b)),
        },
        NativeOp::Mul => match (&left, &right) {
            (Integer(a), Integer(b)) => a.checked_mul(*b).map(Integer).ok_or_else(|| overflow(symbol)),
            _ => numbers(symbol, &left, &right).map(|(a, b)| Float(a * b)),
        },
        NativeOp::Div => match (&left, &right) {
            (Integer(_), Integer(0)) => Err(ErrorImpl::DivisionByZero),
            (Integer(a), Integer(b)) => a.checked_div(*b).map(Integer).ok_or_else(|| overflow(symbol)),
            _ => {
                let (a, b) = numbers(symbol, &left, &right)?;
                if b == 0.0 {
                    return Err(ErrorImpl::DivisionByZero);
                }
                Ok(Float(a / b))
            }
        },
        NativeOp::Mod => match (&left, &right) {
            (Integer(_), Integer(0)) => Err(ErrorImpl::DivisionByZero),
            (Integer(a), Integer(b)) => a.checked_rem(*b).map(Integer).ok_or_else(|| overflow(symbol)),
            _ => {
                let (a, b) = numbers(symbol, &left, &right)?;
                if b == 0.0 {
                    return Err(ErrorImpl::DivisionByZero);
                }
                Ok(Float(a % b))
            }
        },
        NativeOp::Pow => match (&left, &right) {
            (Integer(a), Integer(b)) if *b >= 0 => u32::try_from(*b)
                .ok()
                .and_then(|exponent| a.checked_pow(exponent))
                .map(Integer)
                .ok_or_else(|| overflow(symbol)),
            _ => numbers(symbol, &left, &right).map(|(a, b)| Float(a.powf(b))),
        },
        NativeOp::Eq => Ok(Boolean(left == right)),
        NativeOp::Ne => Ok(Boolean(left != right)),
        NativeOp::Lt | NativeOp::Le | NativeOp::Gt | NativeOp::Ge => {
            let ordering = match (&left, &right) {
                (Integer(a), Integer(b)) => a.partial_cmp(b),
                (Value::String(a), Value::String(b)) => a.partial_cmp(b),
                _ => {
                    let (a, b) = numbers(symbol, &left, &right)?;
                    a.partial_cmp(&b)
                }
            };
            let Some(ordering) = ordering else {
                return Ok(Boolean(false));
            };
            Ok(Boolean(match op {
                NativeOp::Lt => ordering.is_lt(),
                NativeOp::Le => ordering.is_le(),
                NativeOp::Gt => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }
        NativeOp::And | NativeOp::Or => match (&left, &right) {
            (Boolean(a), Boolean(b)) => Ok(Boolean(if op == NativeOp::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(invalid(symbol, &left, &right)),
        },
        NativeOp::Min | NativeOp::Max => {
            let pick_left = match (&left, &right) {
                (Integer(a), Integer(b)) => (a <= b) == (op == NativeOp::Min),
                _ => {
                    let (a, b) = numbers(symbol, &left, &right)?;
                    (a <= b) == (op == NativeOp::Min)
                }
            };
            Ok(if pick_left { left } else { right })
        }
        NativeOp::Concat => match (left, right) {
            (Array(a), Array(b)) => Ok(Array(a.into_iter().chain(b).collect())),
            (left, right) => Ok(Value::String(format!("{}{}", left, right))),
        },
        NativeOp::Neg | NativeOp::Not => unary(symbol, op, left),
    }
}

pub fn unary(symbol: &str, op: NativeOp, operand: Value) -> Result<Value, ErrorImpl> {
    match (op, &operand) {
        (NativeOp::Neg, Value::Integer(value)) => value
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| overflow(symbol)),
        (NativeOp::Neg, Value::Float(value)) => Ok(Value::Float(-value)),
        (NativeOp::Not, Value::Boolean(value)) => Ok(Value::Boolean(!value)),
        _ => Err(ErrorImpl::InvalidOperand {
            operator: symbol.to_string(),
            operand: operand.type_name().to_string(),
        }),
    }
}
