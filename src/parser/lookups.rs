use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    ast::ast::Stmt,
    errors::errors::Error,
    lexer::tokens::SkeletonWord,
    spec::{
        rules::OperatorRules,
        specification::{Associativity, Specification},
    },
};

use super::{parser::Parser, stmt::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingPower {
    pub precedence: i64,
    pub associativity: Associativity,
}

impl BindingPower {
    /// Minimum threshold for the right-hand side of this operator.
    pub fn right_threshold(&self) -> i64 {
        match self.associativity {
            Associativity::Left => self.precedence.saturating_add(1),
            Associativity::Right => self.precedence,
        }
    }
}

/// Binding powers of every declared operator, keyed by symbol.
///
/// Binary symbols drive the precedence climber. Prefix symbols are the operators
/// classified `unary` plus any binary operator whose template is a subtraction,
/// which doubles as negation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorTable {
    binary: BTreeMap<String, BindingPower>,
    prefix: BTreeSet<String>,
}

impl OperatorTable {
    pub fn from_spec(spec: &Specification) -> Result<Self, Error> {
        let rules = OperatorRules::from_spec(spec)?;
        let mut table = OperatorTable::default();

        for operator in &spec.operators {
            if rules.prefix(&operator.symbol).is_some() {
                table.prefix.insert(operator.symbol.clone());
            }
            if rules.binary(&operator.symbol).is_some() {
                table.binary.insert(
                    operator.symbol.clone(),
                    BindingPower {
                        precedence: operator.precedence,
                        associativity: operator.associativity,
                    },
                );
            }
        }

        Ok(table)
    }

    pub fn binary(&self, symbol: &str) -> Option<BindingPower> {
        self.binary.get(symbol).copied()
    }

    pub fn is_prefix(&self, symbol: &str) -> bool {
        self.prefix.contains(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.binary.contains_key(symbol) || self.prefix.contains(symbol)
    }

    /// Binary operators, tightest binding first, then by symbol.
    pub fn binary_by_precedence(&self) -> Vec<(&str, BindingPower)> {
        let mut entries: Vec<(&str, BindingPower)> = self
            .binary
            .iter()
            .map(|(symbol, power)| (symbol.as_str(), *power))
            .collect();
        entries.sort_by(|a, b| b.1.precedence.cmp(&a.1.precedence).then(a.0.cmp(b.0)));
        entries
    }

    pub fn prefix_symbols(&self) -> impl Iterator<Item = &str> {
        self.prefix.iter().map(String::as_str)
    }
}

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;
pub type StmtLookup = HashMap<SkeletonWord, StmtHandler>;

pub fn create_stmt_lookups(parser: &mut Parser) {
    parser.stmt(SkeletonWord::If, parse_if_stmt);
    parser.stmt(SkeletonWord::While, parse_while_stmt);
    parser.stmt(SkeletonWord::Function, parse_fn_decl_stmt);
    parser.stmt(SkeletonWord::Return, parse_return_stmt);
}
