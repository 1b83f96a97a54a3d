//! [§ 4.4 Token stringification](https://www.w3.org/TR/css-syntax-3/) -
//! flattening a component-value subtree back into source text.
//!
//! Used to produce selector strings and declaration value strings for the
//! CSS stylesheet layer, which only needs selectors and values as text, not
//! as structured trees.

use crate::component::ComponentValue;
use crate::token::{MatchOp, Token};

/// Render a single token back to the source text it represents.
#[must_use]
pub fn stringify_token(token: &Token) -> String {
    match token {
        Token::Whitespace => " ".to_string(),
        Token::OpenParen => "(".to_string(),
        Token::CloseParen => ")".to_string(),
        Token::OpenBrace => "{".to_string(),
        Token::CloseBrace => "}".to_string(),
        Token::OpenBracket => "[".to_string(),
        Token::CloseBracket => "]".to_string(),
        Token::Colon => ":".to_string(),
        Token::Semicolon => ";".to_string(),
        Token::Comma => ",".to_string(),
        Token::MatchOp(op) => op.as_str().to_string(),
        Token::Cdo => "<!--".to_string(),
        Token::Cdc => "-->".to_string(),
        Token::Delim(c) => c.to_string(),
        Token::String { value } => format!("\"{value}\""),
        Token::Number { source } | Token::Percentage { source } | Token::Dimension { source } => source.clone(),
        Token::Ident { value } => value.clone(),
        Token::Url { value } => format!("url({value})"),
        Token::Function { value } => format!("{value}("),
        Token::AtKeyword { value } => format!("@{value}"),
        Token::Hash { value } => format!("#{value}"),
        Token::UnicodeRange { start, end } if start == end => format!("U+{start:04X}"),
        Token::UnicodeRange { start, end } => format!("U+{start:04X}-{end:04X}"),
    }
}

/// Render a component value (a token, function, or simple block) back to
/// source text.
#[must_use]
pub fn stringify_component(value: &ComponentValue) -> String {
    match value {
        ComponentValue::Token(token) => stringify_token(token),
        ComponentValue::Function(function) => {
            let args: String = function.components.iter().map(stringify_component).collect();
            format!("{}({args})", function.name)
        }
        ComponentValue::Block(block) => {
            let inner: String = block.values.iter().map(stringify_component).collect();
            let closer = match block.associated {
                '{' => '}',
                '[' => ']',
                '(' => ')',
                other => other,
            };
            format!("{}{inner}{closer}", block.associated)
        }
    }
}

/// Stringify a whole slice of component values and collapse CSS
/// whitespace runs down to a single space, matching the tokenizer's own
/// whitespace collapsing.
#[must_use]
pub fn stringify_all(values: &[ComponentValue]) -> String {
    let mut out = String::new();
    let mut last_was_space = false;
    for value in values {
        let piece = stringify_component(value);
        if piece == " " {
            if !last_was_space && !out.is_empty() {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push_str(&piece);
            last_was_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{stringify_all, stringify_component};
    use crate::component::{ComponentValue, FunctionValue, SimpleBlock};
    use crate::token::Token;

    #[test]
    fn stringifies_plain_tokens() {
        let value = ComponentValue::Token(Token::Ident { value: "red".into() });
        assert_eq!(stringify_component(&value), "red");
    }

    #[test]
    fn stringifies_function() {
        let value = ComponentValue::Function(FunctionValue {
            name: "rgba".into(),
            components: vec![
                ComponentValue::Token(Token::Number { source: "255".into() }),
                ComponentValue::Token(Token::Comma),
            ],
        });
        assert_eq!(stringify_component(&value), "rgba(255,)");
    }

    #[test]
    fn stringifies_block_with_matching_closer() {
        let value = ComponentValue::Block(SimpleBlock {
            associated: '[',
            values: vec![ComponentValue::Token(Token::Ident { value: "href".into() })],
        });
        assert_eq!(stringify_component(&value), "[href]");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let values = vec![
            ComponentValue::Token(Token::Ident { value: "a".into() }),
            ComponentValue::Token(Token::Whitespace),
            ComponentValue::Token(Token::Whitespace),
            ComponentValue::Token(Token::Ident { value: "b".into() }),
        ];
        assert_eq!(stringify_all(&values), "a b");
    }
}
