//! Operator rules resolved from templates, shared by every backend.

use std::collections::BTreeMap;

use crate::errors::errors::Error;

use super::{
    specification::Specification,
    template::{NativeOp, OperatorTemplate},
};

/// The resolved meaning of one operator symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRule {
    pub symbol: String,
    pub op: NativeOp,
    pub swapped: bool,
    pub template: OperatorTemplate,
}

/// Binary and prefix rules keyed by symbol. Built fresh for every generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorRules {
    binary: BTreeMap<String, OperatorRule>,
    prefix: BTreeMap<String, OperatorRule>,
}

impl OperatorRules {
    pub fn from_spec(spec: &Specification) -> Result<Self, Error> {
        let mut rules = OperatorRules::default();

        for operator in &spec.operators {
            let template =
                OperatorTemplate::parse(&operator.symbol, &operator.template, operator.is_unary())?;
            let rule = OperatorRule {
                symbol: operator.symbol.clone(),
                op: template.op,
                swapped: template.swapped,
                template,
            };

            if operator.is_unary() {
                rules.prefix.insert(operator.symbol.clone(), rule);
                continue;
            }

            // A subtraction may also be written as prefix negation.
            if rule.op == NativeOp::Sub && !rule.swapped {
                let negation = OperatorRule {
                    op: NativeOp::Neg,
                    ..rule.clone()
                };
                rules.prefix.insert(operator.symbol.clone(), negation);
            }
            rules.binary.insert(operator.symbol.clone(), rule);
        }

        Ok(rules)
    }

    pub fn binary(&self, symbol: &str) -> Option<&OperatorRule> {
        self.binary.get(symbol)
    }

    pub fn prefix(&self, symbol: &str) -> Option<&OperatorRule> {
        self.prefix.get(symbol)
    }

    pub fn binary_rules(&self) -> impl Iterator<Item = &OperatorRule> {
        self.binary.values()
    }

    pub fn prefix_rules(&self) -> impl Iterator<Item = &OperatorRule> {
        self.prefix.values()
    }
}
