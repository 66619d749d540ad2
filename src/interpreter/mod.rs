//! Tree-walking interpreter backend for interpreted languages.

pub mod builder;
pub mod dispatch;
pub mod environment;
pub mod interpreter;
pub mod natives;
pub mod value;
