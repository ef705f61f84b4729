//! Tokenizer behaviour seen through the public grammar API
//!
//! Token types are registered on a grammar, compiled by a `Tokenizer` and run over
//! short inputs. Each case lists the expected tokens as `NAME:text`.

use grammar_parser::{Grammar, TokenizeError, Tokenizer};
use rstest::rstest;

/// A small keyword/identifier/number language with ignored whitespace
fn keyword_grammar() -> Grammar<()> {
    let mut g = Grammar::new();
    g.register_ignored("WS", r"\s+").unwrap();
    g.register_token("IF", r"if\b").unwrap();
    g.register_token("IDENT", r"[a-z]+").unwrap();
    g.register_token("NUM", r"\d+").unwrap();
    g.register_token("ARROW", "->").unwrap();
    g.register_token("MINUS", "-").unwrap();
    g
}

fn lex(input: &str, case_insensitive: bool) -> Result<Vec<String>, TokenizeError> {
    let g = keyword_grammar();
    let tokenizer = Tokenizer::new(g.token_types(), case_insensitive).unwrap();
    let tokens = tokenizer.tokenize(input)?;
    Ok(tokens
        .iter()
        .map(|t| format!("{}:{}", t.type_name(), t.text()))
        .collect())
}

#[rstest]
#[case::keyword("if", &["IF:if"])]
#[case::keyword_prefix_is_ident("iffy", &["IDENT:iffy"])]
#[case::ignored_whitespace("  if   x  ", &["IF:if", "IDENT:x"])]
#[case::longer_operator_first("x->1", &["IDENT:x", "ARROW:->", "NUM:1"])]
#[case::single_minus("x - 1", &["IDENT:x", "MINUS:-", "NUM:1"])]
#[case::empty("", &[])]
#[case::only_ignored(" \t\n", &[])]
fn test_token_priority(#[case] input: &str, #[case] expected: &[&str]) {
    let tokens = lex(input, false).unwrap();
    assert_eq!(tokens, expected);
}

#[rstest]
#[case("x ? y", 2, "? y")]
#[case("IF", 0, "IF")]
#[case("a1+", 2, "+")]
fn test_unmatched_input(#[case] input: &str, #[case] offset: usize, #[case] remaining: &str) {
    assert_eq!(
        lex(input, false).unwrap_err(),
        TokenizeError::Unmatched {
            offset,
            remaining: remaining.to_string(),
        }
    );
}

#[test]
fn test_case_insensitive_matching() {
    assert_eq!(lex("IF Foo", true).unwrap(), vec!["IF:IF", "IDENT:Foo"]);
    assert!(lex("IF Foo", false).is_err());
}

#[test]
fn test_first_match_wins_over_longest() {
    // A short pattern registered first shadows a longer one registered later
    let mut g = Grammar::<()>::new();
    g.register_token("A", "a").unwrap();
    g.register_token("AA", "aa").unwrap();
    let tokenizer = Tokenizer::new(g.token_types(), false).unwrap();
    let names: Vec<_> = tokenizer
        .tokenize("aaa")
        .unwrap()
        .iter()
        .map(|t| t.type_name().to_string())
        .collect();
    assert_eq!(names, vec!["A", "A", "A"]);
}

#[test]
fn test_spans_point_into_input() {
    let g = keyword_grammar();
    let tokenizer = Tokenizer::new(g.token_types(), false).unwrap();
    let input = "if  abc -> 42";
    for token in tokenizer.tokenize(input).unwrap() {
        assert_eq!(&input[token.span()], token.text());
    }
}

#[test]
fn test_invalid_pattern_is_rejected_at_registration() {
    let mut g = Grammar::<()>::new();
    let err = g.register_token("BAD", "(unclosed").unwrap_err();
    assert!(err.to_string().contains("BAD"));
}
