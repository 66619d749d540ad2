//! Source-to-source compilation.
//!
//! A compiled language is translated in two passes over the AST: type
//! inference ([`crate::type_checker`]) and emission into the target's syntax.
//! The target decides the primitive type mapping, operator spelling, console
//! idiom and entry-point convention.

pub mod builder;
pub mod compiler;
pub mod expr;
pub mod stmt;
pub mod targets;

#[cfg(test)]
mod tests;
