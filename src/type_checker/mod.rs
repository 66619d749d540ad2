//! Static type inference for compiled languages.
//!
//! Runs between parsing and code emission. Every variable, parameter and
//! function result gets an abstract [`DataType`](crate::spec::specification::DataType)
//! or the neutral placeholder when it cannot be known statically.

pub mod type_checker;

#[cfg(test)]
mod tests;
