use crate::{errors::errors::ErrorImpl, spec::template::NativeOp, spec::template::NativeFunction};

use super::{dispatch::binary, value::Value};

/// Longest array `range` may build.
pub const MAX_RANGE: i64 = 1_000_000;

fn bad(name: &str, message: String) -> ErrorImpl {
    ErrorImpl::InvalidArgument {
        function: name.to_string(),
        message,
    }
}

fn single<'v>(name: &str, args: &'v [Value]) -> Result<&'v Value, ErrorImpl> {
    match args {
        [value] => Ok(value),
        _ => Err(ErrorImpl::ArityMismatch {
            name: name.to_string(),
            expected: 1,
            received: args.len(),
        }),
    }
}

fn float_to_int(name: &str, value: f64) -> Result<Value, ErrorImpl> {
    if value.is_finite() && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Ok(Value::Integer(value as i64))
    } else {
        Err(bad(name, format!("{} does not fit in an integer", value)))
    }
}

/// Runs the native behaviour of a builtin. `print` writes through `emit`.
pub fn call_native(
    native: NativeFunction,
    name: &str,
    args: Vec<Value>,
    emit: &mut dyn FnMut(&str),
) -> Result<Value, ErrorImpl> {
    match native {
        NativeFunction::Print => {
            let line = args
                .iter()
                .map(Value::to_string)
                .collect::<Vec<String>>()
                .join(" ");
            emit(&line);
            Ok(Value::Void)
        }
        NativeFunction::Sqrt => match single(name, &args)?.as_number() {
            Some(value) if value >= 0.0 => Ok(Value::Float(value.sqrt())),
            Some(value) => Err(bad(name, format!("cannot take the square root of {}", value))),
            None => Err(bad(name, format!("expected a number, received {}", args[0].type_name()))),
        },
        NativeFunction::Abs => match single(name, &args)? {
            Value::Integer(value) => value
                .checked_abs()
                .map(Value::Integer)
                .ok_or_else(|| ErrorImpl::IntegerOverflow {
                    operator: name.to_string(),
                }),
            Value::Float(value) => Ok(Value::Float(value.abs())),
            other => Err(bad(name, format!("expected a number, received {}", other.type_name()))),
        },
        NativeFunction::Len => match single(name, &args)? {
            Value::String(text) => Ok(Value::Integer(text.chars().count() as i64)),
            Value::Array(values) => Ok(Value::Integer(values.len() as i64)),
            other => Err(bad(name, format!("{} has no length", other.type_name()))),
        },
        NativeFunction::Str => Ok(Value::String(single(name, &args)?.to_string())),
        NativeFunction::Int => match single(name, &args)? {
            Value::Integer(value) => Ok(Value::Integer(*value)),
            Value::Float(value) => float_to_int(name, value.trunc()),
            Value::Boolean(value) => Ok(Value::Integer(*value as i64)),
            Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| bad(name, format!("{:?} is not an integer", text))),
            other => Err(bad(name, format!("cannot convert {} to an integer", other.type_name()))),
        },
        NativeFunction::Float => match single(name, &args)? {
            Value::String(text) => text
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| bad(name, format!("{:?} is not a number", text))),
            other => other
                .as_number()
                .map(Value::Float)
                .ok_or_else(|| bad(name, format!("cannot convert {} to a float", other.type_name()))),
        },
        NativeFunction::Upper | NativeFunction::Lower => match single(name, &args)? {
            Value::String(text) if native == NativeFunction::Upper => {
                Ok(Value::String(text.to_uppercase()))
            }
            Value::String(text) => Ok(Value::String(text.to_lowercase())),
            other => Err(bad(name, format!("expected a string, received {}", other.type_name()))),
        },
        NativeFunction::Floor | NativeFunction::Ceil => match single(name, &args)? {
            Value::Integer(value) => Ok(Value::Integer(*value)),
            Value::Float(value) if native == NativeFunction::Floor => float_to_int(name, value.floor()),
            Value::Float(value) => float_to_int(name, value.ceil()),
            other => Err(bad(name, format!("expected a number, received {}", other.type_name()))),
        },
        NativeFunction::Min | NativeFunction::Max => {
            let op = if native == NativeFunction::Min {
                NativeOp::Min
            } else {
                NativeOp::Max
            };
            let values = match args.as_slice() {
                [Value::Array(values)] => values.clone(),
                _ => args,
            };
            let mut values = values.into_iter();
            let first = values
                .next()
                .ok_or_else(|| bad(name, String::from("needs at least one value")))?;
            values.try_fold(first, |best, value| binary(name, op, best, value))
        }
        NativeFunction::Pow => match <[Value; 2]>::try_from(args) {
            Ok([base, exponent]) => binary(name, NativeOp::Pow, base, exponent),
            Err(args) => Err(ErrorImpl::ArityMismatch {
                name: name.to_string(),
                expected: 2,
                received: args.len(),
            }),
        },
        NativeFunction::Range => {
            let (start, end) = match args.as_slice() {
                [Value::Integer(end)] => (0, *end),
                [Value::Integer(start), Value::Integer(end)] => (*start, *end),
                _ => return Err(bad(name, String::from("expected one or two integers"))),
            };
            if end.saturating_sub(start) > MAX_RANGE {
                return Err(bad(name, format!("ranges are limited to {} values", MAX_RANGE)));
            }
            Ok(Value::Array((start..end).map(Value::Integer).collect()))
        }
        NativeFunction::Concat => Ok(Value::String(
            args.iter().map(Value::to_string).collect::<String>(),
        )),
    }
}
