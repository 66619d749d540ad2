use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {internal_error} (at {position})")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    kind: ErrorKind,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            kind: error_impl.kind(),
            internal_error: error_impl,
            position,
        }
    }

    /// Shorthand for errors raised while checking the specification itself.
    pub fn validation(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::EmptyLanguageName => "EmptyLanguageName",
            ErrorImpl::DuplicateOperator { .. } => "DuplicateOperator",
            ErrorImpl::DuplicateKeyword { .. } => "DuplicateKeyword",
            ErrorImpl::DuplicateBuiltin { .. } => "DuplicateBuiltin",
            ErrorImpl::InvalidPrecedence { .. } => "InvalidPrecedence",
            ErrorImpl::InvalidOperatorSymbol { .. } => "InvalidOperatorSymbol",
            ErrorImpl::InvalidKeyword { .. } => "InvalidKeyword",
            ErrorImpl::InvalidTemplate { .. } => "InvalidTemplate",
            ErrorImpl::UnresolvedBuiltin { .. } => "UnresolvedBuiltin",
            ErrorImpl::InvalidCommentSyntax { .. } => "InvalidCommentSyntax",
            ErrorImpl::MissingTarget => "MissingTarget",
            ErrorImpl::UnsupportedTarget { .. } => "UnsupportedTarget",
            ErrorImpl::BackendMismatch { .. } => "BackendMismatch",
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::UnterminatedComment => "UnterminatedComment",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ReturnTypeMatchError { .. } => "ReturnTypeMatchError",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::UninferableType { .. } => "UninferableType",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::UnsupportedConstruct { .. } => "UnsupportedConstruct",
            ErrorImpl::UndefinedIdentifier { .. } => "UndefinedIdentifier",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::InvalidArgument { .. } => "InvalidArgument",
            ErrorImpl::ConditionNotBoolean { .. } => "ConditionNotBoolean",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::IntegerOverflow { .. } => "IntegerOverflow",
            ErrorImpl::RecursionLimit { .. } => "RecursionLimit",
            ErrorImpl::EvaluationTooDeep { .. } => "EvaluationTooDeep",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::EmptyLanguageName => {
                ErrorTip::Suggestion(String::from("Give the language a non-empty name"))
            }
            ErrorImpl::DuplicateOperator { symbol } => {
                ErrorTip::Suggestion(format!("Operator `{}` is defined more than once", symbol))
            }
            ErrorImpl::DuplicateKeyword { word } => {
                ErrorTip::Suggestion(format!("Keyword `{}` is defined more than once", word))
            }
            ErrorImpl::DuplicateBuiltin { name } => {
                ErrorTip::Suggestion(format!("Builtin `{}` is defined more than once", name))
            }
            ErrorImpl::InvalidPrecedence { symbol, .. } => ErrorTip::Suggestion(format!(
                "Operator `{}` needs a precedence of zero or more",
                symbol
            )),
            ErrorImpl::InvalidOperatorSymbol { symbol, reason } => {
                ErrorTip::Suggestion(format!("Operator `{}` cannot be used: {}", symbol, reason))
            }
            ErrorImpl::InvalidKeyword { word } => ErrorTip::Suggestion(format!(
                "Keyword `{}` must start with a letter or underscore and contain only letters, digits and underscores",
                word
            )),
            ErrorImpl::InvalidTemplate { owner, reason, .. } => {
                ErrorTip::Suggestion(format!("Template of `{}` is invalid: {}", owner, reason))
            }
            ErrorImpl::UnresolvedBuiltin { name, .. } => ErrorTip::Suggestion(format!(
                "Builtin `{}` does not name a native behaviour, write its implementation as a call such as `sqrt(x)`",
                name
            )),
            ErrorImpl::InvalidCommentSyntax { reason } => ErrorTip::Suggestion(reason.clone()),
            ErrorImpl::MissingTarget => ErrorTip::Suggestion(String::from(
                "Compiled languages need a target language",
            )),
            ErrorImpl::UnsupportedTarget { target } => ErrorTip::Suggestion(format!(
                "Target `{}` is not supported, use python, javascript, java or cpp",
                target
            )),
            ErrorImpl::BackendMismatch { requested, .. } => ErrorTip::Suggestion(format!(
                "This language was not generated with a {} backend",
                requested
            )),
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("Close the string literal with `\"`"))
            }
            ErrorImpl::UnterminatedComment => {
                ErrorTip::Suggestion(String::from("Close the multi-line comment"))
            }
            ErrorImpl::UnexpectedToken { expected, found } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, expected {}",
                found, expected
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::NestingTooDeep { limit } => ErrorTip::Suggestion(format!(
                "Expressions and blocks may nest at most {} levels, split this one up",
                limit
            )),
            ErrorImpl::TypeMatchError {
                variable,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Variable `{}` was first assigned a `{}`, it cannot later hold a `{}`",
                variable, expected, received
            )),
            ErrorImpl::ReturnTypeMatchError {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` returns `{}` elsewhere, received `{}`",
                function, expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Function `{}` expected argument type `{}`, received `{}`",
                function, expected, received
            )),
            ErrorImpl::UninferableType { name } => ErrorTip::Suggestion(format!(
                "The type of `{}` cannot be inferred here",
                name
            )),
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::UnsupportedConstruct { construct, target } => ErrorTip::Suggestion(
                format!("{} cannot be rendered for target `{}`", construct, target),
            ),
            ErrorImpl::UndefinedIdentifier { name } => {
                ErrorTip::Suggestion(format!("`{}` is not defined", name))
            }
            ErrorImpl::NotCallable { name } => {
                ErrorTip::Suggestion(format!("`{}` is not a function", name))
            }
            ErrorImpl::ArityMismatch {
                name,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expected {} arguments, received {}",
                name, expected, received
            )),
            ErrorImpl::InvalidOperands {
                operator,
                left,
                right,
            } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot combine `{}` and `{}`",
                operator, left, right
            )),
            ErrorImpl::InvalidOperand { operator, operand } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}`",
                operator, operand
            )),
            ErrorImpl::InvalidArgument { function, message } => {
                ErrorTip::Suggestion(format!("`{}`: {}", function, message))
            }
            ErrorImpl::ConditionNotBoolean { found } => ErrorTip::Suggestion(format!(
                "Conditions must be boolean, received `{}`",
                found
            )),
            ErrorImpl::DivisionByZero => ErrorTip::None,
            ErrorImpl::IntegerOverflow { operator } => ErrorTip::Suggestion(format!(
                "The result of `{}` does not fit in a 64-bit integer",
                operator
            )),
            ErrorImpl::RecursionLimit { limit } => ErrorTip::Suggestion(format!(
                "Calls nested deeper than {} frames",
                limit
            )),
            ErrorImpl::EvaluationTooDeep { limit } => ErrorTip::Suggestion(format!(
                "Evaluation nested deeper than {} expressions and statements",
                limit
            )),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

/// The pass an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Lexical,
    Parse,
    TypeInference,
    UnsupportedConstruct,
    Runtime,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Lexical => "LexicalError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::TypeInference => "TypeInferenceError",
            ErrorKind::UnsupportedConstruct => "UnsupportedConstructError",
            ErrorKind::Runtime => "RuntimeError",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Specification validation
    #[error("language name is empty")]
    EmptyLanguageName,
    #[error("duplicate operator symbol {symbol:?}")]
    DuplicateOperator { symbol: String },
    #[error("duplicate keyword {word:?}")]
    DuplicateKeyword { word: String },
    #[error("duplicate builtin function {name:?}")]
    DuplicateBuiltin { name: String },
    #[error("operator {symbol:?} has negative precedence {precedence}")]
    InvalidPrecedence { symbol: String, precedence: i64 },
    #[error("invalid operator symbol {symbol:?}: {reason}")]
    InvalidOperatorSymbol { symbol: String, reason: String },
    #[error("invalid keyword {word:?}")]
    InvalidKeyword { word: String },
    #[error("invalid template {template:?} for {owner:?}: {reason}")]
    InvalidTemplate {
        owner: String,
        template: String,
        reason: String,
    },
    #[error("builtin {name:?} has no native implementation for {implementation:?}")]
    UnresolvedBuiltin {
        name: String,
        implementation: String,
    },
    #[error("invalid comment syntax: {reason}")]
    InvalidCommentSyntax { reason: String },
    #[error("compiled language has no target language")]
    MissingTarget,
    #[error("unsupported target language {target:?}")]
    UnsupportedTarget { target: String },
    #[error("requested the {requested} backend, but the language is {available}")]
    BackendMismatch {
        requested: String,
        available: String,
    },

    // Lexing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,

    // Parsing
    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken { expected: String, found: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    // Type inference
    #[error("variable {variable:?} is {expected}, cannot assign {received}")]
    TypeMatchError {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("function {function:?} returns {expected}, cannot also return {received}")]
    ReturnTypeMatchError {
        function: String,
        expected: String,
        received: String,
    },
    #[error("argument types do not match for {function:?}: expected {expected:?}, received {received:?}")]
    ArgumentTypeMatchError {
        function: String,
        expected: String,
        received: String,
    },
    #[error("no inferable type for {name:?}")]
    UninferableType { name: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },

    // Emission
    #[error("{construct} has no rendering for target {target}")]
    UnsupportedConstruct { construct: String, target: String },

    // Evaluation
    #[error("undefined identifier {name:?}")]
    UndefinedIdentifier { name: String },
    #[error("{name:?} is not callable")]
    NotCallable { name: String },
    #[error("{name:?} expected {expected} arguments, received {received}")]
    ArityMismatch {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("operator {operator:?} cannot be applied to {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("operator {operator:?} cannot be applied to {operand}")]
    InvalidOperand { operator: String, operand: String },
    #[error("invalid argument to {function:?}: {message}")]
    InvalidArgument { function: String, message: String },
    #[error("condition evaluated to {found}, expected boolean")]
    ConditionNotBoolean { found: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in {operator:?}")]
    IntegerOverflow { operator: String },
    #[error("recursion deeper than {limit} calls")]
    RecursionLimit { limit: usize },
    #[error("evaluation nested deeper than {limit} levels")]
    EvaluationTooDeep { limit: usize },
}

impl ErrorImpl {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorImpl::EmptyLanguageName
            | ErrorImpl::DuplicateOperator { .. }
            | ErrorImpl::DuplicateKeyword { .. }
            | ErrorImpl::DuplicateBuiltin { .. }
            | ErrorImpl::InvalidPrecedence { .. }
            | ErrorImpl::InvalidOperatorSymbol { .. }
            | ErrorImpl::InvalidKeyword { .. }
            | ErrorImpl::InvalidTemplate { .. }
            | ErrorImpl::UnresolvedBuiltin { .. }
            | ErrorImpl::InvalidCommentSyntax { .. }
            | ErrorImpl::MissingTarget
            | ErrorImpl::UnsupportedTarget { .. }
            | ErrorImpl::BackendMismatch { .. } => ErrorKind::Validation,
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnterminatedComment => ErrorKind::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::NestingTooDeep { .. } => ErrorKind::Parse,
            ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::ReturnTypeMatchError { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. }
            | ErrorImpl::UninferableType { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. } => ErrorKind::TypeInference,
            ErrorImpl::UnsupportedConstruct { .. } => ErrorKind::UnsupportedConstruct,
            ErrorImpl::UndefinedIdentifier { .. }
            | ErrorImpl::NotCallable { .. }
            | ErrorImpl::ArityMismatch { .. }
            | ErrorImpl::InvalidOperands { .. }
            | ErrorImpl::InvalidOperand { .. }
            | ErrorImpl::InvalidArgument { .. }
            | ErrorImpl::ConditionNotBoolean { .. }
            | ErrorImpl::DivisionByZero
            | ErrorImpl::IntegerOverflow { .. }
            | ErrorImpl::RecursionLimit { .. }
            | ErrorImpl::EvaluationTooDeep { .. } => ErrorKind::Runtime,
        }
    }
}
