//! [§ 4.3 CSS Stylesheet Layer](https://www.w3.org/TR/css-syntax-3/) - the
//! second pass that reinterprets the generic rule tree from
//! [`crate::parser`] as CSS style rules, declarations, and dispatched
//! at-rules.

use crate::component::ComponentValue;
use crate::error::CssResult;
use crate::handlers::{split_on_top_level_commas, HandlerRegistry};
use crate::options::ParserOptions;
use crate::parser::Parser;
use crate::position::Span;
use crate::rule::{AtRule, Rule};
use crate::stringify::stringify_all;
use crate::token::Token;

/// The result of [`crate::parse_stylesheet`]: the generic CSS Syntax 3
/// rule tree, with no CSS-specific interpretation applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// Top-level rules, in source order.
    pub rules: Vec<Rule>,
    /// Human-readable messages for every recoverable parse anomaly.
    pub parsing_errors: Vec<String>,
}

/// The result of [`crate::parse_css_stylesheet`]: qualified rules
/// reinterpreted as [`StyleRule`]s, and at-rules dispatched through the
/// handler registry.
#[derive(Debug, Clone, PartialEq)]
pub struct CssStylesheet {
    /// Top-level rules, in source order.
    pub rules: Vec<CssRule>,
    /// Human-readable messages for every recoverable parse anomaly.
    pub parsing_errors: Vec<String>,
}

/// A single rule in a [`CssStylesheet`].
#[derive(Debug, Clone, PartialEq)]
pub enum CssRule {
    /// A qualified rule reinterpreted as selectors plus declarations.
    Style(StyleRule),
    /// Produced by the built-in `@import` handler.
    Import(ImportRule),
    /// Produced by the built-in `@keyframes` handler.
    Keyframes(KeyframesRule),
}

/// A style rule: a selector list plus its declaration block.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// Comma-separated selector groups, stringified and trimmed. Selectors
    /// are kept as plain strings; this crate does not parse them into a
    /// structured selector AST.
    pub selectors: Vec<String>,
    /// The block's contents, parsed as a declaration list.
    pub declarations: Vec<DeclarationItem>,
    /// Recorded only when the parser runs with [`ParserOptions::debug`].
    pub position: Option<Span>,
}

/// One entry of a declaration list: either a property/value pair, or a
/// nested at-rule (declaration lists may contain at-rules, e.g. for
/// forward-compatibility with CSS nesting).
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationItem {
    /// A single `property: value[ !important];` declaration.
    Declaration(Decl),
    /// An at-rule nested inside a declaration list.
    AtRule(AtRule),
}

/// A single CSS declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    /// The declared property name, exactly as written (not lowercased).
    pub property: String,
    /// The value, stringified from its component values and trimmed.
    pub value: String,
    /// Whether the declaration ended in `!important`.
    pub important: bool,
    /// Recorded only when the parser runs with [`ParserOptions::debug`].
    pub position: Option<Span>,
}

/// Produced by the built-in `@import` handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRule {
    /// The stringified, trimmed prelude - typically a quoted string or a
    /// `url(...)` token, optionally followed by media-query fragments kept
    /// verbatim.
    pub import: String,
    /// Recorded only when the parser runs with [`ParserOptions::debug`].
    pub position: Option<Span>,
}

/// Produced by the built-in `@keyframes` handler.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesRule {
    /// The animation name.
    pub name: String,
    /// One entry per qualified rule found in the `@keyframes` block.
    pub keyframes: Vec<Keyframe>,
}

/// A single keyframe inside a `@keyframes` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// The comma-separated selector list (e.g. `["0%"]`, `["from"]`,
    /// `["50%", "75%"]`), stringified and trimmed.
    pub values: Vec<String>,
    /// The keyframe's declarations.
    pub declarations: Vec<DeclarationItem>,
}

/// Parse `text` into the generic CSS Syntax 3 rule tree, with default
/// options.
#[must_use]
pub fn parse_stylesheet(text: &str) -> Stylesheet {
    parse_stylesheet_with_options(text, ParserOptions::default())
}

/// Parse `text` into the generic CSS Syntax 3 rule tree.
#[must_use]
pub fn parse_stylesheet_with_options(text: &str, options: ParserOptions) -> Stylesheet {
    let mut parser = Parser::new_with_options(text, options);
    let rules = match parser.consume_list_of_rules(true) {
        Ok(rules) => rules,
        Err(err) => {
            parser.push_error(err.to_string());
            Vec::new()
        }
    };
    Stylesheet {
        rules,
        parsing_errors: parser.take_errors(),
    }
}

/// Parse `text` as a CSS stylesheet, applying the built-in `@import` and
/// `@keyframes` handlers, with default options.
#[must_use]
pub fn parse_css_stylesheet(text: &str) -> CssStylesheet {
    parse_css_stylesheet_with_options(text, ParserOptions::default())
}

/// Parse `text` as a CSS stylesheet, applying the built-in `@import` and
/// `@keyframes` handlers.
#[must_use]
pub fn parse_css_stylesheet_with_options(text: &str, options: ParserOptions) -> CssStylesheet {
    let mut stylesheet_parser = CssStylesheetParser::new_with_options(text, options);
    stylesheet_parser.parse()
}

/// A [`Parser`] paired with an [`HandlerRegistry`] for CSS-stylesheet-mode
/// parsing. Exposes [`CssStylesheetParser::register_at_rule_handler`] for
/// callers that want to add or override at-rule handlers before parsing.
pub struct CssStylesheetParser {
    parser: Parser,
    registry: HandlerRegistry,
}

impl CssStylesheetParser {
    /// Construct a stylesheet parser over `text` with default options and
    /// the built-in `@import`/`@keyframes` handlers pre-registered.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::new_with_options(text, ParserOptions::default())
    }

    /// Construct a stylesheet parser over `text` with explicit options.
    #[must_use]
    pub fn new_with_options(text: &str, options: ParserOptions) -> Self {
        Self {
            parser: Parser::new_with_options(text, options),
            registry: HandlerRegistry::with_builtins(),
        }
    }

    /// Install (or override) the handler for `keyword`.
    pub fn register_at_rule_handler(
        &mut self,
        keyword: impl Into<String>,
        handler: crate::handlers::AtRuleHandler,
    ) {
        self.registry.register(keyword, handler);
    }

    /// Run the two-pass CSS stylesheet parse described in
    /// [`crate::stylesheet`]'s module docs.
    #[must_use]
    pub fn parse(&mut self) -> CssStylesheet {
        let generic_rules = match self.parser.consume_list_of_rules(true) {
            Ok(rules) => rules,
            Err(err) => {
                self.parser.push_error(err.to_string());
                Vec::new()
            }
        };

        let mut rules = Vec::new();
        for rule in generic_rules {
            match rule {
                Rule::Qualified(qualified) => match interpret_as_style_rule(&mut self.parser, qualified) {
                    Ok(style_rule) => rules.push(CssRule::Style(style_rule)),
                    Err(err) => self.parser.push_error(err.to_string()),
                },
                Rule::At(at_rule) => {
                    let Some(handler) = self.registry.get(&at_rule.name) else {
                        continue;
                    };
                    match handler(&mut self.parser, at_rule) {
                        Ok(Some(css_rule)) => rules.push(css_rule),
                        Ok(None) => {}
                        Err(err) => self.parser.push_error(err.to_string()),
                    }
                }
            }
        }

        CssStylesheet {
            rules,
            parsing_errors: self.parser.take_errors(),
        }
    }
}

fn interpret_as_style_rule(parser: &mut Parser, qualified: crate::rule::QualifiedRule) -> CssResult<StyleRule> {
    let selectors = split_on_top_level_commas(&qualified.prelude)
        .into_iter()
        .map(|group| stringify_all(&group).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let declarations = {
        let mut sub = parser.push_substream(qualified.block.values);
        consume_list_of_declarations(&mut sub)?
    };

    Ok(StyleRule {
        selectors,
        declarations,
        position: qualified.position,
    })
}

/// [§ 4.3 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/):
/// loop until the (sub-)stream is exhausted, skipping whitespace and stray
/// `;`, dispatching `@`-rules to [`Parser::consume_at_rule`], and routing
/// runs of tokens starting with an ident into [`consume_declaration`].
pub(crate) fn consume_list_of_declarations(parser: &mut Parser) -> CssResult<Vec<DeclarationItem>> {
    let mut declarations = Vec::new();
    loop {
        match parser.next_item()? {
            None => return Ok(declarations),
            Some(ComponentValue::Token(Token::Whitespace | Token::Semicolon)) => {}
            Some(ComponentValue::Token(Token::AtKeyword { value })) => {
                declarations.push(DeclarationItem::AtRule(parser.consume_at_rule(value)?));
            }
            Some(ComponentValue::Token(Token::Ident { value })) => {
                let mut buffer = vec![ComponentValue::Token(Token::Ident { value })];
                loop {
                    match parser.next_item()? {
                        None | Some(ComponentValue::Token(Token::Semicolon)) => break,
                        Some(item) => buffer.push(item),
                    }
                }
                match consume_declaration(buffer) {
                    Some(decl) => declarations.push(DeclarationItem::Declaration(decl)),
                    None => parser.push_error("declaration missing ':' after property name"),
                }
            }
            Some(_) => {
                parser.push_error("unexpected token in declaration list; discarded until next ';'");
                while !matches!(
                    parser.next_item()?,
                    None | Some(ComponentValue::Token(Token::Semicolon))
                ) {}
            }
        }
    }
}

/// [§ 4.3 Consume a declaration](https://www.w3.org/TR/css-syntax-3/):
/// `buffer` starts with the property `Ident` and runs up to (but not
/// including) the terminating `;`/EOF.
fn consume_declaration(buffer: Vec<ComponentValue>) -> Option<Decl> {
    let mut items = buffer.into_iter();
    let ComponentValue::Token(Token::Ident { value: property }) = items.next()? else {
        return None;
    };

    let mut rest: Vec<ComponentValue> = items.collect();
    let mut index = 0;
    while matches!(rest.get(index), Some(v) if v.is_whitespace()) {
        index += 1;
    }
    if !matches!(rest.get(index), Some(ComponentValue::Token(Token::Colon))) {
        return None;
    }
    rest.drain(..=index);

    while matches!(rest.last(), Some(v) if v.is_whitespace()) {
        rest.pop();
    }

    let important = strip_important(&mut rest);

    while matches!(rest.last(), Some(v) if v.is_whitespace()) {
        rest.pop();
    }

    Some(Decl {
        property,
        value: stringify_all(&rest).trim().to_string(),
        important,
        position: None,
    })
}

/// Strip a trailing `! important` (case-insensitive, whitespace-tolerant)
/// from a declaration's value tokens, returning whether one was found.
fn strip_important(tokens: &mut Vec<ComponentValue>) -> bool {
    let mut index = tokens.len();
    while matches!(tokens.get(index.wrapping_sub(1)), Some(v) if v.is_whitespace()) {
        index -= 1;
    }
    let Some(ComponentValue::Token(Token::Ident { value })) = tokens.get(index.wrapping_sub(1)) else {
        return false;
    };
    if !value.eq_ignore_ascii_case("important") {
        return false;
    }
    let important_index = index - 1;

    let mut index = important_index;
    while matches!(tokens.get(index.wrapping_sub(1)), Some(v) if v.is_whitespace()) {
        index -= 1;
    }
    if !matches!(tokens.get(index.wrapping_sub(1)), Some(ComponentValue::Token(Token::Delim('!')))) {
        return false;
    }
    let bang_index = index - 1;

    tokens.truncate(bang_index);
    true
}
