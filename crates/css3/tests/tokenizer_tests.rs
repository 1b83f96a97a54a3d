use css3::token::Token;
use css3::tokenize;

#[test]
fn basic_rule() {
    let tokens = tokenize("Button { background: red; }");
    assert_eq!(
        tokens,
        vec![
            Token::Ident { value: "Button".into() },
            Token::Whitespace,
            Token::OpenBrace,
            Token::Whitespace,
            Token::Ident {
                value: "background".into()
            },
            Token::Colon,
            Token::Whitespace,
            Token::Ident { value: "red".into() },
            Token::Semicolon,
            Token::Whitespace,
            Token::CloseBrace,
        ]
    );
}

#[test]
fn import_url() {
    let tokens = tokenize("@import url(~/app.css); Button { color: orange; }");
    assert_eq!(
        tokens,
        vec![
            Token::AtKeyword { value: "import".into() },
            Token::Whitespace,
            Token::Url {
                value: "~/app.css".into()
            },
            Token::Semicolon,
            Token::Whitespace,
            Token::Ident { value: "Button".into() },
            Token::Whitespace,
            Token::OpenBrace,
            Token::Whitespace,
            Token::Ident { value: "color".into() },
            Token::Colon,
            Token::Whitespace,
            Token::Ident { value: "orange".into() },
            Token::Semicolon,
            Token::Whitespace,
            Token::CloseBrace,
        ]
    );
}

#[test]
fn numeric_forms() {
    let tokens: Vec<Token> = tokenize("Button { width: .0; height: 100%; font-size: 10em; }")
        .into_iter()
        .filter(|t| !t.is_whitespace())
        .collect();
    assert!(tokens.contains(&Token::Number { source: ".0".into() }));
    assert!(tokens.contains(&Token::Percentage {
        source: "100%".into()
    }));
    assert!(tokens.contains(&Token::Dimension {
        source: "10em".into()
    }));
}

#[test]
fn unicode_range() {
    let tokens: Vec<Token> = tokenize("unicode-range: U+0025-00FF, U+4??;")
        .into_iter()
        .filter(|t| !t.is_whitespace())
        .collect();
    assert_eq!(
        tokens,
        vec![
            Token::Ident {
                value: "unicode-range".into()
            },
            Token::Colon,
            Token::UnicodeRange {
                start: 0x0025,
                end: 0x00FF
            },
            Token::Comma,
            Token::UnicodeRange {
                start: 0x0400,
                end: 0x04FF
            },
            Token::Semicolon,
        ]
    );
}

#[test]
fn escapes_decode_to_the_literal_character() {
    let tokens = tokenize(r"\42utton { color: red; }");
    assert_eq!(
        tokens[0],
        Token::Ident {
            value: "Button".into()
        }
    );
}

#[test]
fn round_trip_reconstructs_source_modulo_whitespace() {
    let source = "a{color:red;background:url(x.png)}";
    let tokens = tokenize(source);
    let reconstructed: String = tokens
        .iter()
        .map(|t| match t {
            Token::Ident { value } | Token::Hash { value } | Token::Function { value } => value.clone(),
            Token::Url { value } => format!("url({value})"),
            Token::Whitespace => " ".to_string(),
            Token::OpenBrace => "{".into(),
            Token::CloseBrace => "}".into(),
            Token::Colon => ":".into(),
            Token::Semicolon => ";".into(),
            Token::Number { source } | Token::Percentage { source } | Token::Dimension { source } => source.clone(),
            other => format!("{other:?}"),
        })
        .collect();
    assert_eq!(reconstructed, source);
}
