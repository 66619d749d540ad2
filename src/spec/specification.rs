use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Whether the generated toolchain evaluates programs or translates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    Interpreted,
    Compiled,
}

impl Display for LanguageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LanguageKind::Interpreted => write!(f, "interpreted"),
            LanguageKind::Compiled => write!(f, "compiled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Associativity {
    Left,
    Right,
}

impl Display for Associativity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Associativity::Left => write!(f, "left"),
            Associativity::Right => write!(f, "right"),
        }
    }
}

/// The abstract type domain. Each compile target maps these to its own primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Integer,
    Float,
    String,
    Boolean,
    Array,
    Object,
    Void,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Array => "array",
            DataType::Object => "object",
            DataType::Void => "void",
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operator {
    pub symbol: String,
    pub precedence: i64,
    pub associativity: Associativity,
    /// e.g. "arithmetic", "comparison", "logical". `unary` marks a prefix-only operator.
    #[serde(rename = "operation_type", alias = "classification", default)]
    pub classification: String,
    #[serde(rename = "implementation", alias = "template")]
    pub template: String,
}

impl Operator {
    pub fn new(
        symbol: &str,
        precedence: i64,
        associativity: Associativity,
        classification: &str,
        template: &str,
    ) -> Self {
        Operator {
            symbol: symbol.to_string(),
            precedence,
            associativity,
            classification: classification.to_string(),
            template: template.to_string(),
        }
    }

    pub fn is_unary(&self) -> bool {
        self.classification.eq_ignore_ascii_case("unary")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub word: String,
    /// Informational only, never changes the grammar.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl Keyword {
    pub fn new(word: &str, category: &str) -> Self {
        Keyword {
            word: word.to_string(),
            category: category.to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl Parameter {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Parameter {
            name: name.to_string(),
            data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltinFunction {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: DataType,
    pub implementation: String,
    #[serde(default)]
    pub description: String,
}

impl BuiltinFunction {
    pub fn new(
        name: &str,
        parameters: Vec<Parameter>,
        return_type: DataType,
        implementation: &str,
    ) -> Self {
        BuiltinFunction {
            name: name.to_string(),
            parameters,
            return_type,
            implementation: implementation.to_string(),
            description: String::new(),
        }
    }
}

/// A production authored in the visual grammar editor. Descriptive only: the
/// generated parser's statement skeleton never changes because of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarRule {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSyntax {
    #[serde(default)]
    pub single_line: Option<String>,
    #[serde(default)]
    pub multi_line_start: Option<String>,
    #[serde(default)]
    pub multi_line_end: Option<String>,
}

impl Default for CommentSyntax {
    fn default() -> Self {
        CommentSyntax {
            single_line: Some(String::from("//")),
            multi_line_start: Some(String::from("/*")),
            multi_line_end: Some(String::from("*/")),
        }
    }
}

impl CommentSyntax {
    pub fn none() -> Self {
        CommentSyntax {
            single_line: None,
            multi_line_start: None,
            multi_line_end: None,
        }
    }

    /// Both markers of a multi-line comment, when the language has one.
    pub fn multi_line(&self) -> Option<(&str, &str)> {
        match (&self.multi_line_start, &self.multi_line_end) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some((start.as_str(), end.as_str()))
            }
            _ => None,
        }
    }

    pub fn single(&self) -> Option<&str> {
        self.single_line.as_deref().filter(|marker| !marker.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "language_type", alias = "language_kind")]
    pub language_kind: LanguageKind,
    #[serde(default = "default_target")]
    pub target_language: Option<String>,
    #[serde(default = "default_extension")]
    pub file_extension: String,
    #[serde(default)]
    pub comment_syntax: CommentSyntax,
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub builtin_functions: Vec<BuiltinFunction>,
    #[serde(default)]
    pub data_types: Vec<DataType>,
    #[serde(default)]
    pub grammar_rules: Vec<GrammarRule>,
    #[serde(default)]
    pub author: Option<String>,
}

fn default_version() -> String {
    String::from("1.0.0")
}

fn default_target() -> Option<String> {
    Some(String::from("python"))
}

fn default_extension() -> String {
    String::from(".prog")
}

impl Specification {
    pub fn new(name: &str, language_kind: LanguageKind) -> Self {
        Specification {
            name: name.to_string(),
            version: default_version(),
            description: String::new(),
            language_kind,
            target_language: default_target(),
            file_extension: default_extension(),
            comment_syntax: CommentSyntax::default(),
            operators: vec![],
            keywords: vec![],
            builtin_functions: vec![],
            data_types: vec![],
            grammar_rules: vec![],
            author: None,
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operators.push(operator);
        self
    }

    pub fn with_keyword(mut self, word: &str, category: &str) -> Self {
        self.keywords.push(Keyword::new(word, category));
        self
    }

    pub fn with_builtin(mut self, builtin: BuiltinFunction) -> Self {
        self.builtin_functions.push(builtin);
        self
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target_language = Some(target.to_string());
        self
    }

    pub fn with_comments(mut self, comment_syntax: CommentSyntax) -> Self {
        self.comment_syntax = comment_syntax;
        self
    }

    pub fn operator(&self, symbol: &str) -> Option<&Operator> {
        self.operators.iter().find(|operator| operator.symbol == symbol)
    }

    pub fn builtin(&self, name: &str) -> Option<&BuiltinFunction> {
        self.builtin_functions.iter().find(|builtin| builtin.name == name)
    }
}
