use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

/// Words the fixed statement skeleton reacts to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SkeletonWord {
    If,
    Else,
    While,
    Function,
    Return,
    True,
    False,
}

lazy_static! {
    /// Always reserved, whether or not the specification declares them.
    pub static ref SKELETON_LOOKUP: HashMap<&'static str, SkeletonWord> = {
        let mut map = HashMap::new();
        map.insert("if", SkeletonWord::If);
        map.insert("else", SkeletonWord::Else);
        map.insert("while", SkeletonWord::While);
        map.insert("function", SkeletonWord::Function);
        map.insert("return", SkeletonWord::Return);
        map.insert("true", SkeletonWord::True);
        map.insert("false", SkeletonWord::False);
        map
    };
}

/// Order in which skeleton words are listed in the tokenizer definition.
pub const SKELETON_WORDS: [&str; 7] = ["if", "else", "while", "function", "return", "true", "false"];

/// Declared keywords that also introduce a function declaration.
pub const FUNCTION_ALIASES: [&str; 3] = ["fn", "def", "func"];

/// Structural punctuation, tried after operators.
pub const PUNCTUATION: [(&str, TokenKind); 10] = [
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("{", TokenKind::OpenCurly),
    ("}", TokenKind::CloseCurly),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (":", TokenKind::Colon),
    ("=", TokenKind::Assignment),
];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Integer,
    Float,
    String,
    Identifier,
    Keyword,
    Operator,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Comma,
    Semicolon,
    Colon,
    Assignment, // =
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::EOF => write!(f, "end of input"),
            TokenKind::String => write!(f, "\"{}\"", self.value),
            _ => write!(f, "{}", self.value),
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// True when this token is the operator or assignment punctuation spelled `text`.
    pub fn is_symbol(&self, text: &str) -> bool {
        self.is_one_of_many(&[TokenKind::Operator, TokenKind::Assignment]) && self.value == text
    }

    pub fn skeleton_word(&self) -> Option<SkeletonWord> {
        if self.kind == TokenKind::Keyword {
            if FUNCTION_ALIASES.contains(&self.value.as_str()) {
                return Some(SkeletonWord::Function);
            }
            SKELETON_LOOKUP.get(self.value.as_str()).copied()
        } else {
            None
        }
    }

    pub fn debug(&self) -> String {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Integer,
            TokenKind::Float,
            TokenKind::Keyword,
            TokenKind::Operator,
        ]) {
            format!("{} ({}) @ {}", self.kind, self.value, self.span.start)
        } else {
            format!("{} () @ {}", self.kind, self.span.start)
        }
    }
}
