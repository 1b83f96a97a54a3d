//! The at-rule-handler registry, per [§ 4.3 CSS Stylesheet Layer](https://www.w3.org/TR/css-syntax-3/)'s
//! extension protocol: at-rules are dispatched to a handler keyed by name
//! rather than hard-coded into the parser.

use std::collections::HashMap;

use crate::component::ComponentValue;
use crate::error::CssResult;
use crate::parser::Parser;
use crate::rule::{AtRule, Rule};
use crate::stringify::stringify_all;
use crate::stylesheet::{CssRule, ImportRule, Keyframe, KeyframesRule};

/// A handler for one at-rule keyword, producing a stylesheet-layer
/// [`CssRule`] (or `None` if the at-rule turned out not to be well-formed
/// enough to represent).
pub type AtRuleHandler = Box<dyn Fn(&mut Parser, AtRule) -> CssResult<Option<CssRule>>>;

/// Maps at-rule keywords (e.g. `"import"`, `"keyframes"`) to the handler
/// that interprets them.
pub struct HandlerRegistry {
    handlers: HashMap<String, AtRuleHandler>,
}

impl HandlerRegistry {
    /// An empty registry with no handlers installed.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry pre-populated with the built-in `@import` and
    /// `@keyframes` handlers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("import", Box::new(handle_import));
        registry.register("keyframes", Box::new(handle_keyframes));
        registry
    }

    /// Install `handler` for `keyword`. A handler already registered for
    /// that keyword is replaced; the replacement is noted through
    /// [`css3_common::diagnostics::note_once`] since it is easy to do by
    /// accident and worth a developer-facing nudge, without being part of
    /// the data this crate returns to callers.
    pub fn register(&mut self, keyword: impl Into<String>, handler: AtRuleHandler) {
        let keyword = keyword.into();
        if self.handlers.insert(keyword.clone(), handler).is_some() {
            css3_common::diagnostics::note_once("css3", &format!("at-rule handler for @{keyword} was overwritten"));
        }
    }

    /// Look up the handler registered for `keyword`, if any.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&AtRuleHandler> {
        self.handlers.get(keyword)
    }
}

/// [§ 4.3 `@import` handler](https://www.w3.org/TR/css-syntax-3/): stringify
/// and trim the prelude into the imported URL/string. Media-query
/// fragments in the prelude are kept verbatim as part of that string - a
/// known simplification, since full media-query parsing is out of scope.
fn handle_import(parser: &mut Parser, at_rule: AtRule) -> CssResult<Option<CssRule>> {
    let import = stringify_all(&at_rule.prelude).trim().to_string();
    if import.is_empty() {
        parser.push_error("@import rule had an empty prelude");
        return Ok(None);
    }
    Ok(Some(CssRule::Import(ImportRule {
        import,
        position: at_rule.position,
    })))
}

/// [§ 4.3 `@keyframes` handler](https://www.w3.org/TR/css-syntax-3/):
/// stringify the prelude into the animation name, then parse each
/// qualified rule inside the block as one keyframe.
fn handle_keyframes(parser: &mut Parser, at_rule: AtRule) -> CssResult<Option<CssRule>> {
    let name = stringify_all(&at_rule.prelude).trim().to_string();
    let Some(block) = at_rule.block else {
        parser.push_error("@keyframes rule had no block");
        return Ok(None);
    };

    let inner_rules = {
        let mut sub = parser.push_substream(block.values);
        sub.consume_list_of_rules(false)?
    };

    let mut keyframes = Vec::new();
    for rule in inner_rules {
        let Rule::Qualified(qualified) = rule else {
            parser.push_error("@keyframes block contained a non-qualified rule; discarded");
            continue;
        };
        let values = split_on_top_level_commas(&qualified.prelude)
            .into_iter()
            .map(|group| stringify_all(&group).trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let declarations = {
            let mut sub = parser.push_substream(qualified.block.values);
            crate::stylesheet::consume_list_of_declarations(&mut sub)?
        };
        keyframes.push(Keyframe { values, declarations });
    }

    Ok(Some(CssRule::Keyframes(KeyframesRule { name, keyframes })))
}

/// Split a component-value slice on commas that are not nested inside a
/// block or function, per the selector-list splitting used for both
/// `StyleRule::selectors` and `@keyframes` keyframe selectors.
pub(crate) fn split_on_top_level_commas(values: &[ComponentValue]) -> Vec<Vec<ComponentValue>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    for value in values {
        if matches!(value, ComponentValue::Token(crate::token::Token::Comma)) {
            groups.push(std::mem::take(&mut current));
        } else {
            current.push(value.clone());
        }
    }
    groups.push(current);
    groups
}
