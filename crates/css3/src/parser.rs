//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing) - the syntax
//! parser layer.
//!
//! Wraps [`Tokenizer`] with a *reconsume-by-argument* discipline: where the
//! algorithms below say "reconsume the current input token", the item is
//! instead threaded through as a plain argument, or pushed back onto
//! [`Parser::pending`] for the handful of spots where that reads more
//! naturally.
//!
//! The unit this parser actually streams is [`ComponentValue`], not raw
//! [`Token`]: every `{`, `[`, `(`, or function-opening token is resolved
//! into its full, balanced [`ComponentValue`] the moment it is produced.
//! This lets a sub-stream simply be a `Vec<ComponentValue>` - the exact
//! shape a `SimpleBlock`'s `values` already have - with no
//! re-tokenization step.

use std::ops::{Deref, DerefMut};

use crate::component::{ComponentValue, FunctionValue, SimpleBlock};
use crate::error::{CssError, CssResult};
use crate::options::ParserOptions;
use crate::position::{Position, Span};
use crate::rule::{AtRule, QualifiedRule, Rule};
use crate::token::Token;
use crate::tokenizer::Tokenizer;

/// Where a [`Parser`] currently draws its component values from.
enum Source {
    /// The live tokenizer over the original source text; tokens are
    /// resolved into component values as they're produced.
    Cursor,
    /// A fixed, already-resolved sequence - installed by
    /// [`Parser::push_substream`] so declaration-list and keyframes parsing
    /// can run over a rule's block contents without disturbing the main
    /// cursor.
    Slice { items: Vec<ComponentValue>, index: usize },
}

/// The syntax-parser layer: turns a token stream into a generic tree of
/// [`Rule`]s.
pub struct Parser {
    tokenizer: Tokenizer,
    sources: Vec<Source>,
    pending: Option<ComponentValue>,
    options: ParserOptions,
    /// Human-readable messages for every recoverable anomaly encountered -
    /// merged into `Stylesheet::parsing_errors` / `CssStylesheet::parsing_errors`
    /// by the caller.
    errors: Vec<String>,
}

impl Parser {
    /// Construct a parser over `text` with default options.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::new_with_options(text, ParserOptions::default())
    }

    /// Construct a parser over `text` with explicit options.
    #[must_use]
    pub fn new_with_options(text: &str, options: ParserOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(text),
            sources: vec![Source::Cursor],
            pending: None,
            options,
            errors: Vec::new(),
        }
    }

    /// The configuration this parser was built with.
    #[must_use]
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Drain the parser's accumulated recoverable-anomaly messages.
    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    /// Record a recoverable anomaly.
    pub(crate) fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// [§ 5.1 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// Consume every rule in the token stream. `top_level` controls
    /// whether CDO/CDC are discarded (top level) or treated as the seed of
    /// a qualified rule (nested - e.g. the inner rule list of `@keyframes`).
    ///
    /// # Errors
    ///
    /// Propagates `Err(CssError::UnsupportedUrlEscape)` from the tokenizer.
    pub fn consume_list_of_rules(&mut self, top_level: bool) -> CssResult<Vec<Rule>> {
        let mut rules = Vec::new();
        loop {
            let Some(item) = self.next_item()? else {
                return Ok(rules);
            };
            match item {
                ComponentValue::Token(Token::Whitespace) => {}
                ComponentValue::Token(Token::Cdo | Token::Cdc) if top_level => {}
                ComponentValue::Token(Token::AtKeyword { value }) => {
                    rules.push(Rule::At(self.consume_at_rule(value)?));
                }
                other => match self.consume_qualified_rule(other)? {
                    Some(rule) => rules.push(Rule::Qualified(rule)),
                    None => self.push_error("qualified rule ended before a block was found"),
                },
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// # Errors
    ///
    /// Propagates `Err(CssError::UnsupportedUrlEscape)` from the tokenizer.
    pub fn consume_at_rule(&mut self, name: String) -> CssResult<AtRule> {
        let start = self.start_position();
        let mut prelude = Vec::new();
        loop {
            match self.next_item()? {
                None => {
                    self.push_error(format!("at-rule @{name} ended at end of input"));
                    return Ok(AtRule {
                        name,
                        prelude,
                        block: None,
                        position: self.span(start),
                    });
                }
                Some(ComponentValue::Token(Token::Semicolon)) => {
                    return Ok(AtRule {
                        name,
                        prelude,
                        block: None,
                        position: self.span(start),
                    });
                }
                Some(ComponentValue::Block(block)) if block.associated == '{' => {
                    return Ok(AtRule {
                        name,
                        prelude,
                        block: Some(block),
                        position: self.span(start),
                    });
                }
                Some(item) => prelude.push(item),
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// `seed` is the first input item - it was already produced by the
    /// caller's `consume_list_of_rules` dispatch.
    ///
    /// # Errors
    ///
    /// Propagates `Err(CssError::UnsupportedUrlEscape)` from the tokenizer.
    pub fn consume_qualified_rule(&mut self, seed: ComponentValue) -> CssResult<Option<QualifiedRule>> {
        let start = self.start_position();
        let mut prelude = Vec::new();
        let mut next = Some(seed);
        loop {
            let item = match next.take() {
                Some(item) => item,
                None => match self.next_item()? {
                    Some(item) => item,
                    None => return Ok(None),
                },
            };
            match item {
                ComponentValue::Block(block) if block.associated == '{' => {
                    return Ok(Some(QualifiedRule {
                        prelude,
                        block,
                        position: self.span(start),
                    }));
                }
                other => prelude.push(other),
            }
        }
    }

    /// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    ///
    /// Resolves a single raw token from the cursor into its full component
    /// value, recursing into [`Parser::consume_simple_block`] /
    /// [`Parser::consume_function`] as needed.
    fn resolve(&mut self, token: Token) -> CssResult<ComponentValue> {
        match token {
            Token::OpenBrace => Ok(ComponentValue::Block(self.consume_simple_block('{')?)),
            Token::OpenBracket => Ok(ComponentValue::Block(self.consume_simple_block('[')?)),
            Token::OpenParen => Ok(ComponentValue::Block(self.consume_simple_block('(')?)),
            Token::Function { value } => Ok(ComponentValue::Function(self.consume_function(value)?)),
            other => Ok(ComponentValue::Token(other)),
        }
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// # Errors
    ///
    /// Propagates `Err(CssError::UnsupportedUrlEscape)` from the tokenizer.
    pub fn consume_simple_block(&mut self, opener: char) -> CssResult<SimpleBlock> {
        let closer = matching_closer(opener);
        let mut values = Vec::new();
        loop {
            match self.next_item()? {
                None => {
                    return Ok(SimpleBlock {
                        associated: opener,
                        values,
                    });
                }
                Some(ComponentValue::Token(token)) if is_closer(&token, closer) => {
                    return Ok(SimpleBlock {
                        associated: opener,
                        values,
                    });
                }
                Some(item) => values.push(item),
            }
        }
    }

    /// [§ 5.4.9 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    ///
    /// # Errors
    ///
    /// Propagates `Err(CssError::UnsupportedUrlEscape)` from the tokenizer.
    pub fn consume_function(&mut self, name: String) -> CssResult<FunctionValue> {
        let mut components = Vec::new();
        loop {
            match self.next_item()? {
                None | Some(ComponentValue::Token(Token::CloseParen)) => {
                    return Ok(FunctionValue { name, components });
                }
                Some(item) => components.push(item),
            }
        }
    }

    /// The next component value, drawing from whichever source is on top
    /// of the sub-stream stack, or the single pushed-back item if
    /// `reconsume` was just called.
    ///
    /// # Errors
    ///
    /// Propagates `Err(CssError::UnsupportedUrlEscape)` from the tokenizer.
    pub fn next_item(&mut self) -> CssResult<Option<ComponentValue>> {
        if let Some(item) = self.pending.take() {
            return Ok(Some(item));
        }
        let drawing_from_cursor = matches!(self.sources.last(), Some(Source::Cursor));
        if drawing_from_cursor {
            match self.tokenizer.next_token()? {
                None => Ok(None),
                Some(token) => Ok(Some(self.resolve(token)?)),
            }
        } else {
            let source = self
                .sources
                .last_mut()
                .expect("sub-stream stack is never empty while a substream frame exists");
            let Source::Slice { items, index } = source else {
                unreachable!("checked above")
            };
            let item = items.get(*index).cloned();
            if item.is_some() {
                *index += 1;
            }
            Ok(item)
        }
    }

    /// Push `item` back so the next call to [`Parser::next_item`] returns
    /// it again. Only one item of lookahead is ever needed by this crate's
    /// algorithms.
    pub fn reconsume(&mut self, item: ComponentValue) {
        debug_assert!(self.pending.is_none(), "at most one item of reconsume is ever needed");
        self.pending = Some(item);
    }

    /// The source position of the item most recently returned by
    /// [`Parser::next_item`].
    ///
    /// # Errors
    ///
    /// Returns `Err(CssError::PositionUnavailable)` while a sub-stream is
    /// active - a slice of already-parsed values has no position in the
    /// original source text.
    pub fn position(&self) -> CssResult<Position> {
        if matches!(self.sources.last(), Some(Source::Cursor)) {
            Ok(self.tokenizer.start())
        } else {
            Err(CssError::PositionUnavailable)
        }
    }

    fn start_position(&self) -> Option<Position> {
        self.options.debug.then(|| self.position().ok()).flatten()
    }

    fn span(&self, start: Option<Position>) -> Option<Span> {
        let start = start?;
        let end = if matches!(self.sources.last(), Some(Source::Cursor)) {
            self.tokenizer.end()
        } else {
            start
        };
        Some(Span::new(start, end))
    }

    /// Replace the token source with `items` for the duration of the
    /// returned guard. Restores the previous source when the guard is
    /// dropped, even if the caller returns early or unwinds.
    pub fn push_substream(&mut self, items: Vec<ComponentValue>) -> SubstreamGuard<'_> {
        self.sources.push(Source::Slice { items, index: 0 });
        SubstreamGuard { parser: self }
    }
}

/// RAII guard returned by [`Parser::push_substream`]. Derefs to [`Parser`]
/// so callers drive the sub-stream through the guard directly.
pub struct SubstreamGuard<'a> {
    parser: &'a mut Parser,
}

impl Deref for SubstreamGuard<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        self.parser
    }
}

impl DerefMut for SubstreamGuard<'_> {
    fn deref_mut(&mut self) -> &mut Parser {
        self.parser
    }
}

impl Drop for SubstreamGuard<'_> {
    fn drop(&mut self) {
        let _ = self.parser.sources.pop();
    }
}

fn matching_closer(opener: char) -> char {
    match opener {
        '{' => '}',
        '[' => ']',
        '(' => ')',
        _ => unreachable!("consume_simple_block is only called with {{, [, or ("),
    }
}

fn is_closer(token: &Token, closer: char) -> bool {
    matches!(
        (token, closer),
        (Token::CloseBrace, '}') | (Token::CloseBracket, ']') | (Token::CloseParen, ')')
    )
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::component::ComponentValue;
    use crate::rule::Rule;
    use crate::token::Token;

    #[test]
    fn qualified_rule_with_simple_block() {
        let mut parser = Parser::new("a { color: red; }");
        let rules = parser.consume_list_of_rules(true).unwrap();
        assert_eq!(rules.len(), 1);
        let Rule::Qualified(rule) = &rules[0] else {
            panic!("expected a qualified rule");
        };
        assert_eq!(rule.block.associated, '{');
        assert!(matches!(
            rule.prelude.first(),
            Some(ComponentValue::Token(Token::Ident { value })) if value == "a"
        ));
    }

    #[test]
    fn at_rule_without_block_terminates_on_semicolon() {
        let mut parser = Parser::new("@import url(a.css);");
        let rules = parser.consume_list_of_rules(true).unwrap();
        assert_eq!(rules.len(), 1);
        let Rule::At(rule) = &rules[0] else {
            panic!("expected an at-rule");
        };
        assert_eq!(rule.name, "import");
        assert!(rule.block.is_none());
    }

    #[test]
    fn nested_blocks_balance() {
        let mut parser = Parser::new("a { background: url(nested.png); width: calc(1px + 2px); }");
        let rules = parser.consume_list_of_rules(true).unwrap();
        assert_eq!(rules.len(), 1);
        let Rule::Qualified(rule) = &rules[0] else {
            panic!("expected a qualified rule");
        };
        let has_function = rule.block.values.iter().any(|v| matches!(v, ComponentValue::Function(_)));
        assert!(has_function);
    }

    #[test]
    fn unterminated_qualified_rule_is_discarded() {
        let mut parser = Parser::new("a, b");
        let rules = parser.consume_list_of_rules(true).unwrap();
        assert!(rules.is_empty());
        assert_eq!(parser.take_errors().len(), 1);
    }

    #[test]
    fn substream_restores_on_drop() {
        let mut parser = Parser::new("a b c");
        {
            let mut guard = parser.push_substream(vec![ComponentValue::Token(Token::Ident { value: "x".into() })]);
            assert_eq!(
                guard.next_item().unwrap(),
                Some(ComponentValue::Token(Token::Ident { value: "x".into() }))
            );
            assert_eq!(guard.next_item().unwrap(), None);
        }
        assert_eq!(
            parser.next_item().unwrap(),
            Some(ComponentValue::Token(Token::Ident { value: "a".into() }))
        );
    }

    #[test]
    fn position_unavailable_inside_substream() {
        let mut parser = Parser::new("a");
        let guard = parser.push_substream(vec![]);
        assert!(guard.position().is_err());
    }
}
