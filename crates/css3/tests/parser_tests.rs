use css3::component::ComponentValue;
use css3::parser::Parser;
use css3::rule::Rule;
use css3::token::Token;
use css3::{parse_stylesheet, Span};

#[test]
fn stylesheet_balances_nested_blocks_and_functions() {
    let sheet = parse_stylesheet(
        "Button { background: linear-gradient(-90deg, rgba(255, 0, 0, 0), blue, #FFFF00, #00F); }",
    );
    assert!(sheet.parsing_errors.is_empty());
    assert_eq!(sheet.rules.len(), 1);
    let Rule::Qualified(rule) = &sheet.rules[0] else {
        panic!("expected a qualified rule");
    };
    assert_eq!(rule.block.associated, '{');
    // The gradient's outer function and its nested rgba() call must both
    // have closed cleanly for this to resolve to a single Function value.
    let function_count = rule
        .block
        .values
        .iter()
        .filter(|v| matches!(v, ComponentValue::Function(_)))
        .count();
    assert_eq!(function_count, 1);
}

#[test]
fn at_rule_terminated_by_eof_is_still_returned_but_flagged() {
    let sheet = parse_stylesheet("@import url(a.css)");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.parsing_errors.len(), 1, "EOF before ';' or a block is a parse error");
}

#[test]
fn reconsume_replays_the_pushed_back_item() {
    let mut parser = Parser::new("a b");
    let first = parser.next_item().unwrap().unwrap();
    parser.reconsume(first.clone());
    let replayed = parser.next_item().unwrap().unwrap();
    assert_eq!(first, replayed);
}

#[test]
fn debug_mode_attaches_spans_and_default_mode_does_not() {
    use css3::options::ParserOptions;
    use css3::stylesheet::parse_stylesheet_with_options;

    let without_debug = parse_stylesheet("a { color: red; }");
    let Rule::Qualified(rule) = &without_debug.rules[0] else {
        panic!("expected a qualified rule");
    };
    assert_eq!(rule.position, None);

    let with_debug = parse_stylesheet_with_options("a { color: red; }", ParserOptions { debug: true });
    let Rule::Qualified(rule) = &with_debug.rules[0] else {
        panic!("expected a qualified rule");
    };
    assert!(rule.position.is_some());
    let span: Span = rule.position.unwrap();
    assert_eq!(span.start.line, 1);
}

#[test]
fn cdo_cdc_are_discarded_at_top_level() {
    let sheet = parse_stylesheet("<!-- a { color: red; } -->");
    assert_eq!(sheet.rules.len(), 1);
}

#[test]
fn unknown_delim_survives_as_a_component_value() {
    let sheet = parse_stylesheet("a { color: red ~ blue; }");
    let Rule::Qualified(rule) = &sheet.rules[0] else {
        panic!("expected a qualified rule");
    };
    let has_lone_tilde = rule
        .block
        .values
        .iter()
        .any(|v| matches!(v, ComponentValue::Token(Token::Delim('~'))));
    assert!(has_lone_tilde);
}
