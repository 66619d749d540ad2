use std::fmt::Write;

use crate::{
    ast::ast::Program,
    errors::errors::Error,
    generator::artifact::{Artifact, ArtifactRole},
    lexer::{lexer::LexerDefinition, tokens::Token},
    spec::specification::{GrammarRule, Specification},
};

use super::{lookups::OperatorTable, parser::parse};

/// The fixed statement skeleton, in EBNF.
const SKELETON: [(&str, &str); 13] = [
    ("program", "{ statement } EOF"),
    (
        "statement",
        "if_stmt | while_stmt | function_decl | return_stmt | block | assignment | expression_stmt",
    ),
    ("block", "\"{\" { statement } \"}\""),
    ("assignment", "IDENTIFIER \"=\" expression [ \";\" ]"),
    ("expression_stmt", "expression [ \";\" ]"),
    ("if_stmt", "\"if\" expression block [ \"else\" ( if_stmt | block ) ]"),
    ("while_stmt", "\"while\" expression block"),
    (
        "function_decl",
        "\"function\" IDENTIFIER \"(\" [ IDENTIFIER { \",\" IDENTIFIER } ] \")\" block",
    ),
    ("return_stmt", "\"return\" [ expression ] [ \";\" ]"),
    ("expression", "prefix_expr { BINARY_OPERATOR expression }  (* precedence climbing *)"),
    ("prefix_expr", "PREFIX_OPERATOR prefix_expr | primary"),
    ("primary", "INTEGER | FLOAT | STRING | \"true\" | \"false\" | call | IDENTIFIER | \"(\" expression \")\""),
    ("call", "IDENTIFIER \"(\" [ expression { \",\" expression } ] \")\""),
];

const AST_NODES: [(&str, &str); 13] = [
    ("Program", "body: [Stmt]"),
    ("Block", "body: [Stmt]"),
    ("Assignment", "identifier: String, value: Expr"),
    ("ExpressionStatement", "expression: Expr"),
    ("If", "condition: Expr, then_body: Block, else_body: Block | If | none"),
    ("While", "condition: Expr, body: Block"),
    ("FunctionDeclaration", "name: String, parameters: [String], body: Block"),
    ("Return", "value: Expr | none"),
    ("BinaryOp", "symbol: String, left: Expr, right: Expr"),
    ("UnaryOp", "symbol: String, operand: Expr"),
    ("Call", "name: String, arguments: [Expr]"),
    ("Literal", "kind: integer | float | string | boolean, value"),
    ("Identifier", "name: String"),
];

/// Derives a [`ParserDefinition`] from a specification and its tokenizer.
pub struct ParserBuilder<'a> {
    spec: &'a Specification,
    lexer: &'a LexerDefinition,
}

impl<'a> ParserBuilder<'a> {
    pub fn new(spec: &'a Specification, lexer: &'a LexerDefinition) -> Self {
        ParserBuilder { spec, lexer }
    }

    pub fn build(&self) -> Result<ParserDefinition, Error> {
        Ok(ParserDefinition {
            language: self.lexer.language.clone(),
            table: OperatorTable::from_spec(self.spec)?,
            grammar_rules: self.spec.grammar_rules.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParserDefinition {
    pub language: String,
    pub table: OperatorTable,
    /// Carried for the grammar artifact only.
    pub grammar_rules: Vec<GrammarRule>,
}

impl ParserDefinition {
    pub fn parse(&self, tokens: Vec<Token>) -> Result<Program, Error> {
        parse(tokens, &self.table)
    }

    fn render_parser(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# parser for {}", self.language);
        let _ = writeln!(out, "# statements: fixed recursive-descent skeleton");
        let _ = writeln!(out, "# expressions: precedence climbing over the table below");
        let _ = writeln!(out);
        for (name, production) in SKELETON {
            let _ = writeln!(out, "{} = {} ;", name, production);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[binary operators]  # symbol precedence associativity rhs-threshold");
        for (symbol, power) in self.table.binary_by_precedence() {
            let _ = writeln!(
                out,
                "{} {} {} {}",
                symbol,
                power.precedence,
                power.associativity,
                power.right_threshold()
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[prefix operators]");
        for symbol in self.table.prefix_symbols() {
            let _ = writeln!(out, "{}", symbol);
        }

        out
    }

    fn render_ast(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# ast nodes for {}", self.language);
        for (node, fields) in AST_NODES {
            let _ = writeln!(out, "{} {{ {} }}", node, fields);
        }

        out
    }

    fn render_grammar(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "(* grammar of {} *)", self.language);
        if !self.grammar_rules.is_empty() {
            let _ = writeln!(out, "(* authored rules, descriptive only *)");
            for rule in &self.grammar_rules {
                if let Some(description) = &rule.description {
                    let _ = writeln!(out, "(* {} *)", description);
                }
                let _ = writeln!(out, "{} = {} ;", rule.name, rule.pattern);
            }
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "(* statement skeleton *)");
        for (name, production) in SKELETON {
            let _ = writeln!(out, "{} = {} ;", name, production);
        }

        out
    }

    pub fn artifacts(&self) -> Vec<Artifact> {
        vec![
            Artifact::new(ArtifactRole::ParserDefinition, "parser.def", self.render_parser()),
            Artifact::new(ArtifactRole::AstDefinition, "ast.def", self.render_ast()),
            Artifact::new(ArtifactRole::Grammar, "grammar.ebnf", self.render_grammar()),
        ]
    }
}
