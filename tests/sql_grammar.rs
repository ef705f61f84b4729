//! The bundled `SELECT` grammar, end to end
//!
//! Statements are rendered back to normalised SQL, which brackets every nested
//! operator expression, so the snapshots show how the input was grouped.

use grammar_parser::sql::{self, SelectStatement};
use grammar_parser::ParserConfig;
use insta::assert_snapshot;

fn parse_one(input: &str) -> SelectStatement {
    let mut statements = sql::parse(input).unwrap();
    assert_eq!(statements.len(), 1, "expected one reading of {input:?}");
    statements.remove(0)
}

#[test]
fn test_simple_select() {
    let stmt = parse_one("SELECT a FROM t");
    assert_snapshot!(stmt.to_string(), @"SELECT a FROM t");
    assert!(stmt.condition.is_none());
}

#[test]
fn test_lists_and_aliases() {
    let stmt = parse_one("SELECT t.id key, name AS n FROM things t, other AS o");
    assert_snapshot!(stmt.to_string(), @"SELECT t.id AS key, name AS n FROM things AS t, other AS o");
    assert_eq!(stmt.items.len(), 2);
    assert_eq!(stmt.relations.len(), 2);
}

#[test]
fn test_arithmetic_precedence() {
    let stmt = parse_one("SELECT a + b * c - d FROM t");
    assert_snapshot!(stmt.to_string(), @"SELECT a + (b * c) - d FROM t");
}

#[test]
fn test_negation_and_parentheses() {
    let stmt = parse_one("SELECT -(a + 1) * 2 FROM t");
    assert_snapshot!(stmt.to_string(), @"SELECT -(a + 1) * 2 FROM t");
}

#[test]
fn test_logical_precedence() {
    let stmt = parse_one("SELECT a, b AS c FROM t WHERE a = 1 AND b < 2 OR NOT c");
    assert_snapshot!(stmt.to_string(), @"SELECT a, b AS c FROM t WHERE ((a = 1) AND (b < 2)) OR NOT c");
}

#[test]
fn test_two_character_operators() {
    let stmt = parse_one("SELECT x FROM t WHERE x <= 1 OR x >= 2 OR x <> 3");
    assert_snapshot!(stmt.to_string(), @"SELECT x FROM t WHERE (x <= 1) OR (x >= 2) OR (x <> 3)");
}

#[test]
fn test_string_literals() {
    let stmt = parse_one("SELECT name FROM people WHERE name <> 'O''Brien'");
    assert_snapshot!(stmt.to_string(), @"SELECT name FROM people WHERE name <> 'O''Brien'");
}

#[test]
fn test_keywords_in_any_case() {
    let stmt = parse_one("select A from T where x >= 2.5");
    assert_snapshot!(stmt.to_string(), @"SELECT A FROM T WHERE x >= 2.5");
}

#[test]
fn test_case_sensitive_parser_rejects_lowercase_keywords() {
    let parser = sql::parser(ParserConfig::default()).unwrap();
    assert_eq!(parser.parse("select a from t").unwrap().count(), 0);
    assert_eq!(parser.parse("SELECT a FROM t").unwrap().count(), 1);
}

#[test]
fn test_malformed_statements_have_no_reading() {
    assert!(sql::parse("SELECT FROM t").unwrap().is_empty());
    assert!(sql::parse("SELECT a FROM").unwrap().is_empty());
    assert!(sql::parse("SELECT a FROM t WHERE").unwrap().is_empty());
    assert!(sql::parse("SELECT a FROM t;").unwrap().is_empty());
}

#[test]
fn test_statement_serializes_to_json() {
    let stmt = parse_one("SELECT a FROM t WHERE a = 1");
    let value = serde_json::to_value(&stmt).unwrap();
    assert_eq!(value["items"][0]["expr"]["attr"]["field"], "a");
    assert!(value["items"][0]["alias"].is_null());
    assert_eq!(value["relations"][0]["name"], "t");
    assert_eq!(value["condition"]["compare"]["op"], "eq");
    assert_eq!(value["condition"]["compare"]["right"]["literal"]["number"], 1.0);
}
