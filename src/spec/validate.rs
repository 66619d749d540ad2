use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    compiler::targets::TargetLanguage,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{PUNCTUATION, SKELETON_LOOKUP},
};

use super::{
    specification::{LanguageKind, Specification},
    template::{NativeFunction, OperatorTemplate},
};

lazy_static! {
    pub static ref IDENTIFIER_SHAPE: Regex = Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

impl Specification {
    /// Checks every invariant the generators rely on. Runs before any builder.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::validation(ErrorImpl::EmptyLanguageName));
        }

        self.validate_comments()?;
        self.validate_keywords()?;
        self.validate_operators()?;
        self.validate_builtins()?;

        if self.language_kind == LanguageKind::Compiled {
            self.target()?;
        }

        Ok(())
    }

    /// Resolves the declared compile target.
    pub fn target(&self) -> Result<TargetLanguage, Error> {
        let name = self
            .target_language
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| Error::validation(ErrorImpl::MissingTarget))?;

        TargetLanguage::from_name(name).ok_or_else(|| {
            Error::validation(ErrorImpl::UnsupportedTarget {
                target: name.to_string(),
            })
        })
    }

    fn validate_comments(&self) -> Result<(), Error> {
        let comments = &self.comment_syntax;
        let start = comments.multi_line_start.as_deref().unwrap_or("");
        let end = comments.multi_line_end.as_deref().unwrap_or("");

        if start.is_empty() != end.is_empty() {
            return Err(Error::validation(ErrorImpl::InvalidCommentSyntax {
                reason: String::from("multi-line comments need both a start and an end marker"),
            }));
        }

        for marker in [comments.single(), comments.multi_line().map(|(start, _)| start)]
            .into_iter()
            .flatten()
        {
            if marker.chars().any(char::is_whitespace) || marker.contains('"') {
                return Err(Error::validation(ErrorImpl::InvalidCommentSyntax {
                    reason: format!("comment marker `{}` cannot contain whitespace or quotes", marker),
                }));
            }
            if IDENTIFIER_SHAPE.is_match(marker) || marker.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(Error::validation(ErrorImpl::InvalidCommentSyntax {
                    reason: format!("comment marker `{}` would swallow identifiers or numbers", marker),
                }));
            }
        }

        Ok(())
    }

    fn validate_keywords(&self) -> Result<(), Error> {
        let mut seen = HashSet::new();

        for keyword in &self.keywords {
            if !IDENTIFIER_SHAPE.is_match(&keyword.word) {
                return Err(Error::validation(ErrorImpl::InvalidKeyword {
                    word: keyword.word.clone(),
                }));
            }
            if !seen.insert(keyword.word.as_str()) {
                return Err(Error::validation(ErrorImpl::DuplicateKeyword {
                    word: keyword.word.clone(),
                }));
            }
        }

        Ok(())
    }

    fn validate_operators(&self) -> Result<(), Error> {
        let mut seen = HashSet::new();
        let keywords: HashSet<&str> = self.keywords.iter().map(|k| k.word.as_str()).collect();

        for operator in &self.operators {
            let symbol = operator.symbol.as_str();
            let invalid = |reason: &str| {
                Error::validation(ErrorImpl::InvalidOperatorSymbol {
                    symbol: symbol.to_string(),
                    reason: reason.to_string(),
                })
            };

            if !seen.insert(symbol) {
                return Err(Error::validation(ErrorImpl::DuplicateOperator {
                    symbol: symbol.to_string(),
                }));
            }
            if operator.precedence < 0 {
                return Err(Error::validation(ErrorImpl::InvalidPrecedence {
                    symbol: symbol.to_string(),
                    precedence: operator.precedence,
                }));
            }
            if symbol.is_empty() {
                return Err(invalid("the symbol is empty"));
            }
            if symbol.chars().any(char::is_whitespace) || symbol.contains('"') {
                return Err(invalid("symbols cannot contain whitespace or quotes"));
            }
            if PUNCTUATION.iter().any(|(text, _)| *text == symbol && *text != "=") {
                return Err(invalid("the symbol is structural punctuation"));
            }
            if symbol.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
                if !IDENTIFIER_SHAPE.is_match(symbol) {
                    return Err(invalid(
                        "symbols starting with a letter, digit or underscore must be whole words",
                    ));
                }
                if keywords.contains(symbol) || SKELETON_LOOKUP.contains_key(symbol) {
                    return Err(invalid("the symbol is also a keyword"));
                }
            }
            let comments = &self.comment_syntax;
            let shadowed = [comments.single(), comments.multi_line().map(|(start, _)| start)]
                .into_iter()
                .flatten()
                .any(|marker| symbol.starts_with(marker));
            if shadowed {
                return Err(invalid("the symbol starts with a comment marker"));
            }

            OperatorTemplate::parse(symbol, &operator.template, operator.is_unary())?;
        }

        Ok(())
    }

    fn validate_builtins(&self) -> Result<(), Error> {
        let mut seen = HashSet::new();

        for builtin in &self.builtin_functions {
            if !seen.insert(builtin.name.as_str()) {
                return Err(Error::validation(ErrorImpl::DuplicateBuiltin {
                    name: builtin.name.clone(),
                }));
            }
            if NativeFunction::resolve(builtin).is_none() {
                return Err(Error::validation(ErrorImpl::UnresolvedBuiltin {
                    name: builtin.name.clone(),
                    implementation: builtin.implementation.clone(),
                }));
            }
        }

        Ok(())
    }
}
