//! Abstract syntax tree shared by the interpreter and every compile target.

pub mod ast;
pub mod expressions;
pub mod statements;
