//! Lexical analysis for generated languages.
//!
//! The tokenizer is not hand-written: [`builder::LexerBuilder`] derives an ordered
//! list of regex rules from a specification's comment markers, keywords and
//! operators, and [`lexer::LexerDefinition::tokenize`] runs them.
//!
//! - Keyword reclassification of identifier matches
//! - Longest-symbol-first operator matching
//! - Token position tracking for error reporting
//! - Comment and whitespace skipping

pub mod builder;
pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
