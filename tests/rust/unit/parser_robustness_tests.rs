//! Robustness tests for the TinyTalk rule parser: odd whitespace, commas,
//! malformed clauses and literal edge cases, all through `parse_rule`.

use test_case::test_case;
use tinytalk::tinytalk_parser::ast::{Condition, Consequence};
use tinytalk::tinytalk_parser::parse_rule;

#[test_case("when [#aruco id x y] create [#vessel id: id, x: x, y: y]" ; "commas as separators")]
#[test_case("when [#aruco id x y] create [#vessel id: id x: x y: y]" ; "spaces as separators")]
#[test_case("when\t[#aruco\tid]\tcreate\t[#vessel]" ; "tabs as separators")]
#[test_case("when\n[#aruco id]\ncreate\n[#vessel]" ; "newlines as separators")]
#[test_case("when [ #aruco id ] create [ #vessel ]" ; "padded brackets")]
#[test_case("when,[#aruco,id],create,[#vessel]" ; "commas everywhere")]
fn parses_with_any_separator(rule_text: &str) {
    assert!(
        parse_rule(rule_text).is_ok(),
        "should parse: {:?}",
        rule_text
    );
}

#[test_case("" ; "empty input")]
#[test_case("when" ; "bare when")]
#[test_case("when []" ; "empty brackets")]
#[test_case("when [#a]" ; "premise without write")]
#[test_case("create [#a]" ; "write without premise")]
#[test_case("when [#a] create []" ; "create without tags")]
#[test_case("when [#a] create [#b" ; "unclosed create")]
#[test_case("when [#a create [#b]" ; "unclosed match")]
#[test_case("when [#a] update [x: 1]" ; "update without alias")]
#[test_case("when [#a] update b []" ; "update without data")]
#[test_case("when [#a] create [#b]; " ; "dangling separator")]
#[test_case("when [#a]; create [#b]" ; "semicolon between premise and write")]
#[test_case("when [#A] create [#b]" ; "uppercase tag")]
#[test_case("when [#a x where] create [#b]" ; "where without condition")]
#[test_case("when [#a x where x] create [#b]" ; "where without comparison")]
#[test_case("when [#a] create [#b] trailing" ; "trailing garbage")]
fn rejects_malformed_rules(rule_text: &str) {
    assert!(
        parse_rule(rule_text).is_err(),
        "should reject: {:?}",
        rule_text
    );
}

#[test_case("as" ; "as_word")]
#[test_case("where" ; "where_word")]
#[test_case("true" ; "true_word")]
#[test_case("false" ; "false_word")]
fn rejects_reserved_words_as_attribute_names(word: &str) {
    let rule_text = format!("when [#a {}] create [#b]", word);
    assert!(
        parse_rule(&rule_text).is_err(),
        "reserved word {:?} must not name an attribute",
        word
    );
}

#[test]
fn reserved_word_prefixes_are_ordinary_names() {
    let rule = parse_rule("when [#a astray wherever truthy falsehood] create [#b]")
        .expect("prefixed names should parse");
    let attrs = &rule.premise[0].attrs;
    assert_eq!(attrs.len(), 4);
    assert!(attrs.contains_key("astray"));
    assert!(attrs.contains_key("wherever"));
}

#[test_case("0" ; "zero")]
#[test_case("-0.5" ; "negative fraction")]
#[test_case("+12" ; "explicit positive")]
#[test_case("1.5e10" ; "exponent")]
#[test_case("2.5E-3" ; "negative exponent")]
fn numeric_literals_parse_inside_rules(literal: &str) {
    let rule_text = format!("when [#a x where x is {}] create [#b]", literal);
    assert!(parse_rule(&rule_text).is_ok(), "literal {:?}", literal);
}

#[test]
fn numeric_literal_round_trips_exactly() {
    for value in [0.0, -1.0, 0.1, 1.0 / 3.0, 1.5e10, 2.5e-3, 123456.789] {
        let rule_text = format!("when [#a x where x is {}] create [#b]", value);
        let rule = parse_rule(&rule_text).expect("rule should parse");
        let Condition::Cond(expr) = &rule.premise[0].attrs["x"] else {
            panic!("expected condition");
        };
        let printed = format!("{:?}", expr);
        assert!(
            printed.contains(&format!("{:?}", value)),
            "expected {} in {}",
            value,
            printed
        );
    }
}

#[test]
fn string_literals_keep_their_quotes() {
    let rule = parse_rule("when [#a] create [#b src: \"epicwin.gif\"]").expect("parses");
    let Consequence::Create { attrs, .. } = &rule.consequents[0] else {
        panic!("expected create");
    };
    let printed = format!("{:?}", attrs["src"]);
    assert!(printed.contains("\\\"epicwin.gif\\\""), "got {}", printed);
}

#[test]
fn deep_parentheses_nest() {
    let rule = parse_rule("when [#a x where ((x * (2 + 1))) > (0)] create [#b]").expect("parses");
    assert!(matches!(rule.premise[0].attrs["x"], Condition::Cond(_)));
}

#[test]
fn many_clauses_and_writes() {
    let rule = parse_rule(
        "when [#a] as one-of; [#b] as two-of; [#c] as three-of \
         create [#d]; update one-of [hit: true]; update two-of [hit: true]",
    )
    .expect("parses");
    assert_eq!(rule.premise.len(), 3);
    assert_eq!(rule.consequents.len(), 3);
}

#[test]
fn pronoun_chains() {
    let rule = parse_rule("when [#a] as me/my/mine update mine [x: 1]").expect("parses");
    assert_eq!(rule.premise[0].aliases, vec!["me", "my", "mine"]);
}
