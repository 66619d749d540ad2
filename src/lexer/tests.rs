use crate::{
    errors::errors::{ErrorImpl, ErrorKind},
    spec::{
        fixtures::calculator,
        specification::{Associativity, CommentSyntax, LanguageKind, Operator, Specification},
    },
};

use super::{builder::LexerBuilder, lexer::LexerDefinition, tokens::TokenKind};

fn calc_lexer() -> LexerDefinition {
    LexerBuilder::new(&calculator(LanguageKind::Interpreted))
        .build()
        .unwrap()
}

fn kinds(source: &str) -> Vec<TokenKind> {
    calc_lexer()
        .tokenize(source)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_keywords_and_identifiers() {
    let tokens = calc_lexer().tokenize("if iffy while _w3 true").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Keyword);
    assert_eq!(tokens[0].value, "if");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "iffy");
    assert_eq!(tokens[2].kind, TokenKind::Keyword);
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].kind, TokenKind::Keyword);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_word_operators() {
    let tokens = calc_lexer().tokenize("a and b or android").unwrap();

    assert_eq!(tokens[1].kind, TokenKind::Operator);
    assert_eq!(tokens[1].value, "and");
    assert_eq!(tokens[3].kind, TokenKind::Operator);
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
}

#[test]
fn test_numbers() {
    let tokens = calc_lexer().tokenize("42 3.14 0").unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    // A trailing dot is not part of the number and "." is not an operator here.
    assert!(calc_lexer().tokenize("7.").is_err());
}

#[test]
fn test_strings() {
    let tokens = calc_lexer()
        .tokenize(r#""hello" "a\tb\n" "say \"hi\"" "\x41""#)
        .unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "a\tb\n");
    assert_eq!(tokens[2].value, "say \"hi\"");
    assert_eq!(tokens[3].value, "A");
}

#[test]
fn test_unterminated_string() {
    let err = calc_lexer().tokenize("x = \"open").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Lexical);
    assert_eq!(err.get_impl(), &ErrorImpl::UnterminatedString);
    assert_eq!(err.get_position().column, 5);
}

#[test]
fn test_longest_match() {
    let spec = Specification::new("Eq", LanguageKind::Interpreted)
        .with_operator(Operator::new("=", 1, Associativity::Right, "assignment", "a + b"))
        .with_operator(Operator::new("==", 5, Associativity::Left, "comparison", "a == b"));
    let lexer = LexerBuilder::new(&spec).build().unwrap();

    let tokens = lexer.tokenize("a == b").unwrap();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].kind, TokenKind::Operator);
    assert_eq!(tokens[1].value, "==");

    let tokens = lexer.tokenize("a = b").unwrap();
    assert_eq!(tokens[1].value, "=");
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("f(a, b); { } [ ] : ="),
        vec![
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::Semicolon,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Colon,
            TokenKind::Assignment,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments() {
    assert_eq!(
        kinds("a // trailing\n/* block\n comment */ b"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EOF]
    );

    let err = calc_lexer().tokenize("a /* never closed").unwrap_err();
    assert_eq!(err.get_impl(), &ErrorImpl::UnterminatedComment);
}

#[test]
fn test_custom_comment_markers() {
    let spec = Specification::new("Hash", LanguageKind::Interpreted)
        .with_operator(Operator::new("/", 20, Associativity::Left, "arithmetic", "a / b"))
        .with_comments(CommentSyntax {
            single_line: Some(String::from("#")),
            multi_line_start: None,
            multi_line_end: None,
        });
    let lexer = LexerBuilder::new(&spec).build().unwrap();

    let tokens = lexer.tokenize("a / b # c / d").unwrap();
    assert_eq!(tokens.len(), 4);
}

#[test]
fn test_unrecognised_character() {
    let err = calc_lexer().tokenize("x = 1\ny = $").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Lexical);
    assert!(matches!(err.get_impl(), ErrorImpl::UnrecognisedToken { token } if token == "$"));
    assert_eq!(err.get_position().line, 2);
    assert_eq!(err.get_position().column, 5);
    assert_eq!(err.get_position().offset, 10);
}

#[test]
fn test_positions() {
    let tokens = calc_lexer().tokenize("a\n  bb").unwrap();

    assert_eq!(tokens[1].span.start.line, 2);
    assert_eq!(tokens[1].span.start.column, 3);
    assert_eq!(tokens[1].span.end.column, 5);
}

#[test]
fn test_definition_fidelity() {
    let spec = calculator(LanguageKind::Interpreted);
    let rendered = LexerBuilder::new(&spec).build().unwrap().render();

    for keyword in &spec.keywords {
        assert!(rendered.contains(&keyword.word));
    }
    for operator in &spec.operators {
        assert!(rendered.lines().any(|line| line == operator.symbol));
    }
}

#[test]
fn test_operators_longest_first() {
    let lexer = calc_lexer();
    let lengths: Vec<usize> = lexer.operators.iter().map(String::len).collect();
    let mut sorted = lengths.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(lengths, sorted);
}
