#![allow(clippy::module_inception)]

use std::fmt::Display;

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod generator;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod spec;
pub mod type_checker;

extern crate regex;

pub use generator::{
    artifact::{write_artifacts, Artifact, ArtifactRole},
    pipeline::{generate, Backend, Toolchain},
};
pub use spec::specification::Specification;

/// A location in program source: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32) -> Self {
        Position {
            offset,
            line,
            column,
        }
    }

    /// Used for errors that do not originate from program source (e.g. validation).
    pub fn null() -> Self {
        Position {
            offset: 0,
            line: 0,
            column: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.line == 0
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "<specification>")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Returns the 1-based line number, the line text and the offset within that line
/// for a byte offset into `content`.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // Offset sits at the very end of the input (EOF token).
    let last = content.split_inclusive('\n').last().unwrap_or("");
    let line_number = if content.ends_with('\n') || content.is_empty() {
        line_number
    } else {
        line_number - 1
    };
    let line_pos = if content.ends_with('\n') { 0 } else { last.len() };
    let line_text = if content.ends_with('\n') {
        String::new()
    } else {
        last.to_string()
    };
    Some((line_number, line_text, line_pos))
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let content = "Hello, world!\nsecond\nthird\nTesting { }\n";
        let (line_number, line, line_pos) = super::get_line_at_position(content, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(content, 35).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_at_end_of_input() {
        let (line_number, line, line_pos) = super::get_line_at_position("x = 1", 5).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "x = 1");
        assert_eq!(line_pos, 5);

        assert!(super::get_line_at_position("x", 10).is_none());
    }
}
