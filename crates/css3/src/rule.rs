//! Generic rules per [§ 3 Tokenizing and Parsing CSS](https://www.w3.org/TR/css-syntax-3/#rule-defs).
//!
//! These are the syntax-parser layer's output: "qualified rule" and
//! "at-rule" with no opinion yet about what the prelude or block mean. The
//! stylesheet layer ([`crate::stylesheet`]) reinterprets them.

use crate::component::{ComponentValue, SimpleBlock};
use crate::position::Span;

/// A rule produced by [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules):
/// either an at-rule or a qualified rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    At(AtRule),
    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    Qualified(QualifiedRule),
}

/// "An at-rule has a name, a prelude consisting of a list of component
/// values, and an optional block consisting of a simple block."
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword's name, not including the leading `@`.
    pub name: String,
    /// Component values between the name and the block (or terminating
    /// `;`).
    pub prelude: Vec<ComponentValue>,
    /// The `{...}` block, if the rule was terminated by one rather than by
    /// `;` or EOF.
    pub block: Option<SimpleBlock>,
    /// Where the at-keyword began, when [`crate::ParserOptions::debug`] is
    /// enabled and a span was available to record.
    pub position: Option<Span>,
}

/// "A qualified rule has a prelude consisting of a list of component
/// values, and a block consisting of a simple block."
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRule {
    /// Component values before the block - for a style rule this is the
    /// unparsed selector list.
    pub prelude: Vec<ComponentValue>,
    /// The rule's `{...}` block.
    pub block: SimpleBlock,
    /// Where the prelude began, when [`crate::ParserOptions::debug`] is
    /// enabled and a span was available to record.
    pub position: Option<Span>,
}
