use std::{fmt::Display, rc::Rc};

use crate::Span;

use super::{
    expressions::{BinaryExpr, CallExpr, LiteralExpr, PrefixExpr, SymbolExpr},
    statements::{
        AssignmentStmt, BlockStmt, ExpressionStmt, FnDeclStmt, IfStmt, ReturnStmt, WhileStmt,
    },
};

/// Statement nodes. The set is fixed: specifications never add statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStmt),
    Assignment(AssignmentStmt),
    Expression(ExpressionStmt),
    If(IfStmt),
    While(WhileStmt),
    /// Shared so that closures created at runtime can hold on to their body.
    FnDecl(Rc<FnDeclStmt>),
    Return(ReturnStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Block(stmt) => &stmt.span,
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
        }
    }
}

/// Expression nodes. Operator nodes carry the symbol exactly as declared.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Symbol(SymbolExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Call(CallExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
        }
    }
}

/// Renders the expression as an s-expression, e.g. `(+ a (* b c))`.
impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Literal(expr) => write!(f, "{}", expr.value),
            Expr::Symbol(expr) => write!(f, "{}", expr.name),
            Expr::Binary(expr) => write!(f, "({} {} {})", expr.operator, expr.left, expr.right),
            Expr::Prefix(expr) => write!(f, "({} {})", expr.operator, expr.operand),
            Expr::Call(expr) => {
                write!(f, "(call {}", expr.name)?;
                for argument in &expr.arguments {
                    write!(f, " {}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// The root of a parse: top-level statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    /// Top-level function declarations in source order.
    pub fn functions(&self) -> impl Iterator<Item = &Rc<FnDeclStmt>> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::FnDecl(decl) => Some(decl),
            _ => None,
        })
    }
}
