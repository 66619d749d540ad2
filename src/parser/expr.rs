use crate::{
    ast::{
        ast::Expr,
        expressions::{BinaryExpr, CallExpr, Literal, LiteralExpr, PrefixExpr, SymbolExpr},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{SkeletonWord, TokenKind},
    Span,
};

use super::parser::Parser;

/// Precedence climbing: parses an operand, then folds in every following binary
/// operator whose precedence is at least `min_precedence`.
pub fn parse_expr(parser: &mut Parser, min_precedence: i64) -> Result<Expr, Error> {
    parser.dive()?;
    let expr = parse_binary_chain(parser, min_precedence);
    parser.surface();
    expr
}

fn parse_binary_chain(parser: &mut Parser, min_precedence: i64) -> Result<Expr, Error> {
    let mut left = parse_prefix_expr(parser)?;
    // Each fold deepens the left spine of the tree by one.
    let mut folds = 0;

    loop {
        let token = parser.current_token();
        if token.kind != TokenKind::Operator {
            break;
        }
        let power = match parser.table().binary(&token.value) {
            Some(power) if power.precedence >= min_precedence => power,
            _ => break,
        };

        parser.dive()?;
        folds += 1;

        let operator = parser.advance().value;
        let right = parse_expr(parser, power.right_threshold())?;

        left = Expr::Binary(BinaryExpr {
            span: Span {
                start: left.get_span().start,
                end: right.get_span().end,
            },
            operator,
            left: Box::new(left),
            right: Box::new(right),
        });
    }

    for _ in 0..folds {
        parser.surface();
    }
    Ok(left)
}

/// A prefix operator applies to the operand immediately after it, so
/// `-a * b` is `(-a) * b`.
pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token();
    if token.kind == TokenKind::Operator && parser.table().is_prefix(&token.value) {
        let operator_token = parser.advance();
        parser.dive()?;
        let operand = parse_prefix_expr(parser)?;
        parser.surface();

        return Ok(Expr::Prefix(PrefixExpr {
            span: Span {
                start: operator_token.span.start,
                end: operand.get_span().end,
            },
            operator: operator_token.value,
            operand: Box::new(operand),
        }));
    }

    parse_primary_expr(parser)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Integer => {
            let value = token.value.parse::<i64>().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.span.start,
                )
            })?;
            parser.advance();
            Ok(literal(Literal::Integer(value), token.span))
        }
        TokenKind::Float => {
            let value = token.value.parse::<f64>().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.span.start,
                )
            })?;
            parser.advance();
            Ok(literal(Literal::Float(value), token.span))
        }
        TokenKind::String => {
            parser.advance();
            Ok(literal(Literal::String(token.value), token.span))
        }
        TokenKind::Keyword => match token.skeleton_word() {
            Some(SkeletonWord::True) => {
                parser.advance();
                Ok(literal(Literal::Boolean(true), token.span))
            }
            Some(SkeletonWord::False) => {
                parser.advance();
                Ok(literal(Literal::Boolean(false), token.span))
            }
            // Declared keywords such as `print` may still be called.
            None if parser.peek().kind == TokenKind::OpenParen => parse_call_expr(parser),
            _ => Err(parser.unexpected("an expression")),
        },
        TokenKind::Identifier => {
            if parser.peek().kind == TokenKind::OpenParen {
                return parse_call_expr(parser);
            }
            parser.advance();
            Ok(Expr::Symbol(SymbolExpr {
                name: token.value,
                span: token.span,
            }))
        }
        TokenKind::OpenParen => parse_grouping_expr(parser),
        _ => Err(parser.unexpected("an expression")),
    }
}

fn literal(value: Literal, span: Span) -> Expr {
    Expr::Literal(LiteralExpr { value, span })
}

pub fn parse_call_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let name_token = parser.advance();
    parser.expect(TokenKind::OpenParen, "`(`")?;

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, 0)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma, "`,` or `)`")?;
        }
    }
    let close = parser.expect(TokenKind::CloseParen, "`)`")?;

    Ok(Expr::Call(CallExpr {
        name: name_token.value,
        arguments,
        span: Span {
            start: name_token.span.start,
            end: close.span.end,
        },
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen, "`(`")?;
    let expr = parse_expr(parser, 0)?;
    parser.expect(TokenKind::CloseParen, "`)`")?;

    Ok(expr)
}
