//! Parser for generated languages.
//!
//! The statement grammar is a fixed skeleton (assignment, expression statement,
//! conditional, loop, function declaration, return, block). Expressions use
//! precedence climbing driven entirely by the specification's operator table,
//! so a change of precedence or associativity only re-derives that table.
//!
//! Parsing is fail-fast: the first unexpected token aborts with a positioned error.

pub mod builder;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
