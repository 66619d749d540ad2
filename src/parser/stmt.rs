use std::rc::Rc;

use crate::{
    ast::{
        ast::Stmt,
        statements::{
            AssignmentStmt, BlockStmt, ExpressionStmt, FnDeclStmt, IfStmt, ReturnStmt, WhileStmt,
        },
    },
    errors::errors::Error,
    lexer::tokens::{SkeletonWord, TokenKind},
    Span,
};

use super::{expr::parse_expr, parser::Parser};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.dive()?;
    let stmt = dispatch_stmt(parser);
    parser.surface();
    stmt
}

fn dispatch_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let kind = parser.current_token_kind();

    if let Some(word) = parser.current_token().skeleton_word() {
        if let Some(handler) = parser.get_stmt_handler(word) {
            return handler(parser);
        }
        if word == SkeletonWord::Else {
            return Err(parser.unexpected("a statement"));
        }
    }

    if kind == TokenKind::OpenCurly {
        return Ok(Stmt::Block(parse_block(parser)?));
    }

    if kind == TokenKind::Identifier && parser.peek().is_symbol("=") {
        return parse_assignment_stmt(parser);
    }

    let expression = parse_expr(parser, 0)?;
    parser.skip_terminator();

    Ok(Stmt::Expression(ExpressionStmt {
        span: *expression.get_span(),
        expression,
    }))
}

pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly, "`{`")?.span.start;
    let mut body = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        match parser.current_token_kind() {
            TokenKind::EOF => return Err(parser.unexpected("`}`")),
            TokenKind::Semicolon => {
                parser.advance();
            }
            _ => body.push(parse_stmt(parser)?),
        }
    }
    let end = parser.advance().span.end;

    Ok(BlockStmt {
        body,
        span: Span { start, end },
    })
}

pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let identifier = parser.expect(TokenKind::Identifier, "an identifier")?;
    parser.advance();
    let value = parse_expr(parser, 0)?;
    parser.skip_terminator();

    Ok(Stmt::Assignment(AssignmentStmt {
        span: Span {
            start: identifier.span.start,
            end: value.get_span().end,
        },
        identifier: identifier.value,
        value,
    }))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let condition = parse_expr(parser, 0)?;
    let then_body = parse_block(parser)?;

    let else_body = if parser.current_token().skeleton_word() == Some(SkeletonWord::Else) {
        parser.advance();
        if parser.current_token().skeleton_word() == Some(SkeletonWord::If) {
            Some(Box::new(parse_if_stmt(parser)?))
        } else {
            Some(Box::new(Stmt::Block(parse_block(parser)?)))
        }
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        span: Span {
            start,
            end: parser.previous_end(),
        },
        condition,
        then_body,
        else_body,
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let condition = parse_expr(parser, 0)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While(WhileStmt {
        span: Span {
            start,
            end: body.span.end,
        },
        condition,
        body,
    }))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start;
    let name = parser.expect(TokenKind::Identifier, "a function name")?.value;

    parser.expect(TokenKind::OpenParen, "`(`")?;
    let mut parameters: Vec<String> = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let parameter = parser.expect(TokenKind::Identifier, "a parameter name")?.value;
        parameters.push(parameter);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma, "`,` or `)`")?;
        }
    }
    parser.expect(TokenKind::CloseParen, "`)`")?;

    parser.function_depth += 1;
    let body = parse_block(parser);
    parser.function_depth -= 1;
    let body = body?;

    Ok(Stmt::FnDecl(Rc::new(FnDeclStmt {
        span: Span {
            start,
            end: body.span.end,
        },
        name,
        parameters,
        body,
    })))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.function_depth == 0 {
        return Err(parser.unexpected("a statement (`return` is only valid inside a function)"));
    }

    let token = parser.advance();
    let value = match parser.current_token_kind() {
        TokenKind::Semicolon | TokenKind::CloseCurly | TokenKind::EOF => None,
        _ => Some(parse_expr(parser, 0)?),
    };
    parser.skip_terminator();

    Ok(Stmt::Return(ReturnStmt {
        span: Span {
            start: token.span.start,
            end: parser.previous_end(),
        },
        value,
    }))
}
