use std::{collections::HashSet, fmt::Debug};

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    spec::specification::CommentSyntax,
    Position, Span, MK_TOKEN,
};

use super::tokens::{Token, TokenKind};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

/// One tokenizer rule: a start-anchored regex and what to do with its match.
#[derive(Clone)]
pub struct RegexPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub handler: RegexHandler,
}

impl Debug for RegexPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexPattern")
            .field("name", &self.name)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

/// A tokenizer derived from a specification.
///
/// Rules are tried in order at each position and the first match wins; the
/// order encodes the priority (skip, word, number, string, operator, punctuation).
#[derive(Debug, Clone)]
pub struct LexerDefinition {
    pub language: String,
    pub version: String,
    pub patterns: Vec<RegexPattern>,
    /// Declared keywords in specification order, followed by skeleton words.
    pub keywords: Vec<String>,
    /// Operator symbols, longest first.
    pub operators: Vec<String>,
    pub comments: CommentSyntax,
    pub(crate) keyword_set: HashSet<String>,
    pub(crate) word_operators: HashSet<String>,
}

impl LexerDefinition {
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keyword_set.contains(word)
    }

    pub fn is_word_operator(&self, word: &str) -> bool {
        self.word_operators.contains(word)
    }

    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, Error> {
        let mut lex = Lexer::new(self, source);

        while !lex.at_eof() {
            let mut matched = false;

            for pattern in self.patterns.iter() {
                let match_here = pattern.regex.find(lex.remainder());

                if let Some(found) = match_here {
                    if found.start() == 0 && found.end() > found.start() {
                        (pattern.handler)(&mut lex, &pattern.regex)?;
                        matched = true;
                        break;
                    }
                }
            }

            if !matched {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken {
                        token: lex.at().to_string(),
                    },
                    lex.position(),
                ));
            }
        }

        let end = lex.position();
        lex.push(MK_TOKEN!(
            TokenKind::EOF,
            String::from("EOF"),
            Span { start: end, end }
        ));
        Ok(lex.tokens)
    }
}

/// Scanning state for one tokenize call.
pub struct Lexer<'a> {
    definition: &'a LexerDefinition,
    tokens: Vec<Token>,
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(definition: &'a LexerDefinition, source: &'a str) -> Lexer<'a> {
        Lexer {
            definition,
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn definition(&self) -> &'a LexerDefinition {
        self.definition
    }

    /// Advances `n` bytes, keeping line and column in step.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for c in self.source[self.pos..end].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos as u32, self.line, self.column)
    }

    fn matched(&self, regex: &Regex) -> &'a str {
        regex
            .find(self.remainder())
            .map(|found| found.as_str())
            .unwrap_or("")
    }

    /// Pushes a token covering the next `text.len()` bytes.
    fn push_matched(&mut self, kind: TokenKind, text: &str, value: String) {
        let start = self.position();
        self.advance_n(text.len());
        let end = self.position();
        self.push(MK_TOKEN!(kind, value, Span { start, end }));
    }
}

pub(crate) fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
    Ok(())
}

pub(crate) fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let definition = lexer.definition();

    let kind = if definition.is_keyword(value) {
        TokenKind::Keyword
    } else if definition.is_word_operator(value) {
        TokenKind::Operator
    } else {
        TokenKind::Identifier
    };

    lexer.push_matched(kind, value, value.to_string());
    Ok(())
}

pub(crate) fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    let kind = if matched.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    lexer.push_matched(kind, matched, matched.to_string());
    Ok(())
}

pub(crate) fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    let string_literal = &matched[1..matched.len() - 1];

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                for _ in 0..2 {
                    match chars.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            // Unknown escapes keep their backslash
            _ => result.push(ch),
        }
    }

    lexer.push_matched(TokenKind::String, matched, result);
    Ok(())
}

pub(crate) fn operator_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    lexer.push_matched(TokenKind::Operator, matched, matched.to_string());
    Ok(())
}

pub(crate) fn unterminated_string_handler(lexer: &mut Lexer, _regex: &Regex) -> Result<(), Error> {
    Err(Error::new(ErrorImpl::UnterminatedString, lexer.position()))
}

pub(crate) fn unterminated_comment_handler(
    lexer: &mut Lexer,
    _regex: &Regex,
) -> Result<(), Error> {
    Err(Error::new(ErrorImpl::UnterminatedComment, lexer.position()))
}
