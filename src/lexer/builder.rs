use std::{collections::HashSet, fmt::Write};

use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    generator::artifact::{Artifact, ArtifactRole},
    spec::{specification::Specification, validate::IDENTIFIER_SHAPE},
    Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::{
    lexer::{
        number_handler, operator_handler, skip_handler, string_handler, symbol_handler,
        unterminated_comment_handler, unterminated_string_handler, Lexer, LexerDefinition,
        RegexHandler, RegexPattern,
    },
    tokens::{Token, TokenKind, SKELETON_WORDS},
};

/// Derives a [`LexerDefinition`] from a specification.
pub struct LexerBuilder<'a> {
    spec: &'a Specification,
}

fn pattern(name: &'static str, source: &str, handler: RegexHandler) -> Result<RegexPattern, Error> {
    let regex = Regex::new(source).map_err(|err| {
        Error::validation(ErrorImpl::InvalidOperatorSymbol {
            symbol: source.to_string(),
            reason: format!("cannot build the `{}` rule: {}", name, err),
        })
    })?;

    Ok(RegexPattern {
        name,
        regex,
        handler,
    })
}

impl<'a> LexerBuilder<'a> {
    pub fn new(spec: &'a Specification) -> Self {
        LexerBuilder { spec }
    }

    pub fn build(&self) -> Result<LexerDefinition, Error> {
        let mut keywords: Vec<String> = vec![];
        for word in self
            .spec
            .keywords
            .iter()
            .map(|keyword| keyword.word.as_str())
            .chain(SKELETON_WORDS)
        {
            if !keywords.iter().any(|known| known == word) {
                keywords.push(word.to_string());
            }
        }

        // Stable sort keeps declaration order between symbols of equal length.
        let mut operators: Vec<String> = self
            .spec
            .operators
            .iter()
            .map(|operator| operator.symbol.clone())
            .collect();
        operators.sort_by(|a, b| b.len().cmp(&a.len()));

        let word_operators: HashSet<String> = operators
            .iter()
            .filter(|symbol| IDENTIFIER_SHAPE.is_match(symbol))
            .cloned()
            .collect();

        let comments = self.spec.comment_syntax.clone();
        let mut patterns = vec![pattern("whitespace", r"^\s+", skip_handler)?];

        if let Some((start, end)) = comments.multi_line() {
            patterns.push(pattern(
                "block comment",
                &format!(r"^{}(?s:.*?){}", regex::escape(start), regex::escape(end)),
                skip_handler,
            )?);
            patterns.push(pattern(
                "unterminated block comment",
                &format!("^{}", regex::escape(start)),
                unterminated_comment_handler,
            )?);
        }
        if let Some(marker) = comments.single() {
            patterns.push(pattern(
                "line comment",
                &format!(r"^{}[^\n]*", regex::escape(marker)),
                skip_handler,
            )?);
        }

        patterns.push(pattern("word", "^[A-Za-z_][A-Za-z0-9_]*", symbol_handler)?);
        patterns.push(pattern("number", r"^[0-9]+(\.[0-9]+)?", number_handler)?);
        patterns.push(pattern("string", r#"^"(?s:[^"\\]|\\.)*""#, string_handler)?);
        patterns.push(pattern("unterminated string", "^\"", unterminated_string_handler)?);

        let symbolic: Vec<String> = operators
            .iter()
            .filter(|symbol| !word_operators.contains(*symbol))
            .map(|symbol| regex::escape(symbol))
            .collect();
        if !symbolic.is_empty() {
            patterns.push(pattern(
                "operator",
                &format!("^(?:{})", symbolic.join("|")),
                operator_handler,
            )?);
        }

        patterns.extend([
            pattern("(", r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "("))?,
            pattern(")", r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")"))?,
            pattern("{", r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{"))?,
            pattern("}", r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}"))?,
            pattern("[", r"^\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "["))?,
            pattern("]", r"^\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]"))?,
            pattern(",", "^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ","))?,
            pattern(";", "^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";"))?,
            pattern(":", "^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":"))?,
            pattern("=", "^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "="))?,
        ]);

        Ok(LexerDefinition {
            language: self.spec.name.clone(),
            version: self.spec.version.clone(),
            patterns,
            keyword_set: keywords.iter().cloned().collect(),
            keywords,
            operators,
            comments,
            word_operators,
        })
    }
}

impl LexerDefinition {
    /// Renders the tokenizer definition: rules in priority order, then the
    /// reserved words and operator symbols exactly as declared.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "# tokenizer for {} {}", self.language, self.version);
        let _ = writeln!(out, "# rules are tried in order; the first match at a position wins");
        let _ = writeln!(out);
        let _ = writeln!(out, "[rules]");
        for pattern in &self.patterns {
            let _ = writeln!(out, "{:<28} {}", pattern.name, pattern.regex.as_str());
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[keywords]");
        for keyword in &self.keywords {
            let _ = writeln!(out, "{}", keyword);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "[operators]  # longest first");
        for operator in &self.operators {
            let _ = writeln!(out, "{}", operator);
        }

        if !self.word_operators.is_empty() {
            let mut words: Vec<&String> = self.word_operators.iter().collect();
            words.sort();
            let _ = writeln!(out);
            let _ = writeln!(out, "[word operators]");
            for word in words {
                let _ = writeln!(out, "{}", word);
            }
        }

        out
    }

    pub fn artifact(&self) -> Artifact {
        Artifact::new(ArtifactRole::TokenizerDefinition, "tokenizer.def", self.render())
    }
}
