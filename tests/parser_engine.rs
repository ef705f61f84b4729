//! End-to-end parsing: tokenize, enumerate, keep only full parses

use std::sync::Arc;

use grammar_parser::{Grammar, ParseError, Parser, ParserConfig, TraceLog};

fn number(g: &mut Grammar<i64>) -> grammar_parser::NodeId {
    g.token_with("NUM", r"\d+", |t| t.text().parse().unwrap_or_default())
        .unwrap()
}

#[test]
fn test_sum_of_two_numbers() {
    let mut g = Grammar::new();
    let num = number(&mut g);
    let plus = g.token_with("PLUS", r"\+", |_| 0).unwrap();
    let sum = g.sequence_with([num, plus, num], |v| v[0] + v[2]);
    g.set_root(sum).unwrap();

    let parser = Parser::new(g, ParserConfig::default()).unwrap();
    assert_eq!(parser.parse("2+3").unwrap().collect::<Vec<_>>(), vec![5]);
    assert!(parser.parse("2+").unwrap().next().is_none());
    assert!(parser.parse("").unwrap().next().is_none());
}

#[test]
fn test_alternation_picks_the_reading_that_consumes_everything() {
    let mut g = Grammar::new();
    let num = number(&mut g);
    let plus = g.token_with("PLUS", r"\+", |_| 0).unwrap();
    let sum = g.sequence_with([num, plus, num], |v| v[0] + v[2]);
    let expr = g.alternation([num, sum]);
    g.set_root(expr).unwrap();

    let parser = Parser::new(g, ParserConfig::default()).unwrap();
    assert_eq!(parser.parse("2").unwrap().collect::<Vec<_>>(), vec![2]);
    assert_eq!(parser.parse("2+3").unwrap().collect::<Vec<_>>(), vec![5]);
}

/// `s := run run` where `run := A run | ε`; each value is `10 * first + second`
fn split_grammar() -> Grammar<i64> {
    let mut g = Grammar::new();
    let a = g.token_with("A", "a", |_| 1).unwrap();
    let run = g.alternation([]);
    let more = g.sequence_with([a, run], |v| v[0] + v[1]);
    let done = g.empty_with(|| 0);
    g.set_children(run, [more, done]).unwrap();
    let split = g.sequence_with([run, run], |v| 10 * v[0] + v[1]);
    g.set_root(split).unwrap();
    g
}

#[test]
fn test_every_full_parse_of_an_ambiguous_grammar() {
    let parser = Parser::new(split_grammar(), ParserConfig::default()).unwrap();
    let splits: Vec<i64> = parser.parse("aaa").unwrap().collect();
    assert_eq!(splits, vec![30, 21, 12, 3]);
}

#[test]
fn test_partial_parses_are_discarded() {
    let log = Arc::new(TraceLog::new());
    let parser = Parser::new(split_grammar(), ParserConfig::default())
        .unwrap()
        .with_tracer(Arc::clone(&log));
    assert_eq!(parser.parse("aaa").unwrap().count(), 4);

    let lines = log.lines();
    let accepted: Vec<_> = lines.iter().filter(|l| l.starts_with("accept ")).collect();
    let discarded: Vec<_> = lines.iter().filter(|l| l.starts_with("discard ")).collect();
    assert_eq!(accepted.len(), 4);
    assert_eq!(
        discarded,
        vec![
            "discard 20, unparsed: A(\"a\")",
            "discard 11, unparsed: A(\"a\")",
            "discard 10, unparsed: A(\"a\") A(\"a\")",
            "discard 2, unparsed: A(\"a\")",
            "discard 1, unparsed: A(\"a\") A(\"a\")",
            "discard 0, unparsed: A(\"a\") A(\"a\") A(\"a\")",
        ]
    );
}

#[test]
fn test_results_are_produced_on_demand() {
    let parser = Parser::new(split_grammar(), ParserConfig::default()).unwrap();
    let mut parses = parser.parse("aa").unwrap();
    assert_eq!(parses.next(), Some(20));
    assert_eq!(parses.tokens().len(), 2);
    assert_eq!(parses.collect::<Vec<_>>(), vec![11, 2]);
}

#[test]
fn test_tokens_are_traced_before_parsing() {
    let log = Arc::new(TraceLog::new());
    let parser = Parser::new(split_grammar(), ParserConfig::default())
        .unwrap()
        .with_tracer(Arc::clone(&log));
    let _ = parser.parse("a").unwrap().next();
    let lines = log.lines();
    assert_eq!(lines[0], "token A(\"a\")");
    assert!(lines[1].ends_with("enter"));
}

#[test]
fn test_no_root_node() {
    let g = Grammar::<i64>::new();
    let parser = Parser::new(g, ParserConfig::default()).unwrap();
    assert_eq!(parser.parse("").unwrap_err(), ParseError::NoRootNode);
}

#[test]
fn test_untokenizable_input_has_no_parses() {
    let parser = Parser::new(split_grammar(), ParserConfig::default()).unwrap();
    let parses = parser.parse("ab").unwrap();
    assert!(!parses.tokenized());
    assert!(parses.tokens().is_empty());
    assert_eq!(parses.count(), 0);
    assert!(parser.tokenize("ab").is_err());
}

#[test]
fn test_case_insensitive_config() {
    let parser = Parser::new(
        split_grammar(),
        ParserConfig::default().case_insensitive(true),
    )
    .unwrap();
    assert_eq!(parser.parse("Aa").unwrap().count(), 3);
}
