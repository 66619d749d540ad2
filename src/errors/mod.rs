//! Error types and error handling for the generation pipeline.
//!
//! This module defines the single structured error returned by every pass:
//!
//! - Error structures with source position information
//! - Specific error variants for validation, lexing, parsing, type inference,
//!   emission and evaluation
//! - The taxonomy (`ErrorKind`) each variant belongs to
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
