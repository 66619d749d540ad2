//! Parser state and the token cursor.
//!
//! Statements follow a fixed skeleton dispatched through a lookup table keyed by
//! skeleton word; expressions are parsed by precedence climbing over the
//! [`OperatorTable`] derived from the specification.

use std::collections::HashMap;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{SkeletonWord, Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{create_stmt_lookups, OperatorTable, StmtHandler, StmtLookup},
    stmt::parse_stmt,
};

/// Deepest nesting of statements, groupings and operator chains accepted.
/// Every later stage walks the tree recursively, so this also bounds their
/// stack use.
pub const MAX_NESTING: usize = 128;

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    table: &'a OperatorTable,
    stmt_lookup: StmtLookup,
    /// How many function bodies enclose the current token.
    pub(crate) function_depth: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, table: &'a OperatorTable) -> Self {
        let mut tokens = tokens;
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end)
                .unwrap_or_else(|| Position::new(0, 1, 1));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span { start: end, end },
            });
        }

        Parser {
            tokens,
            pos: 0,
            table,
            stmt_lookup: HashMap::new(),
            function_depth: 0,
            nesting: 0,
        }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// The token after the current one, or EOF.
    pub fn peek(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// Advances to the next token and returns the previous one.
    pub fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    pub fn expect(&mut self, expected_kind: TokenKind, expected: &str) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(self.unexpected(expected));
        }
        Ok(self.advance())
    }

    /// Builds the fail-fast error for the current token.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
            },
            token.span.start,
        )
    }

    /// Consumes one optional `;` terminator.
    pub fn skip_terminator(&mut self) {
        if self.current_token_kind() == TokenKind::Semicolon {
            self.advance();
        }
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn table(&self) -> &'a OperatorTable {
        self.table
    }

    pub fn get_stmt_handler(&self, word: SkeletonWord) -> Option<StmtHandler> {
        self.stmt_lookup.get(&word).copied()
    }

    pub fn stmt(&mut self, word: SkeletonWord, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(word, stmt_fn);
    }

    /// Enters one more level of nesting, failing once [`MAX_NESTING`] is reached.
    pub fn dive(&mut self) -> Result<(), Error> {
        if self.nesting >= MAX_NESTING {
            return Err(Error::new(
                ErrorImpl::NestingTooDeep { limit: MAX_NESTING },
                self.get_position(),
            ));
        }
        self.nesting += 1;
        Ok(())
    }

    pub fn surface(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    pub fn get_position(&self) -> Position {
        self.current_token().span.start
    }

    /// End of the most recently consumed token.
    pub fn previous_end(&self) -> Position {
        if self.pos == 0 {
            return self.current_token().span.start;
        }
        self.tokens[self.pos - 1].span.end
    }
}

/// Parses a token stream into a [`Program`], stopping at the first error.
pub fn parse(tokens: Vec<Token>, table: &OperatorTable) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, table);
    create_stmt_lookups(&mut parser);

    let start = parser.get_position();
    let mut body = vec![];

    while parser.has_tokens() {
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
            continue;
        }
        body.push(parse_stmt(&mut parser)?);
    }

    Ok(Program {
        body,
        span: Span {
            start,
            end: parser.get_position(),
        },
    })
}
