//! Lexer for CSS gradient strings using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

fn number_with_suffix(slice: &str, suffix: &str) -> Option<f64> {
    slice.strip_suffix(suffix)?.parse::<f64>().ok()
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Gradient functions
    #[token("linear-gradient")]
    Linear,
    #[token("radial-gradient")]
    Radial,
    #[token("conic-gradient")]
    Conic,

    // Header keywords
    #[token("to")]
    To,
    #[token("at")]
    At,
    #[token("from")]
    From,
    #[token("circle")]
    Circle,
    #[token("ellipse")]
    Ellipse,

    // Position keywords
    #[token("left")]
    Left,
    #[token("right")]
    Right,
    #[token("top")]
    Top,
    #[token("bottom")]
    Bottom,
    #[token("center")]
    Center,

    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,

    // Literals
    #[regex(r"-?([0-9]*\.)?[0-9]+deg", |lex| number_with_suffix(lex.slice(), "deg"))]
    Degrees(f64),

    #[regex(r"-?([0-9]*\.)?[0-9]+%", |lex| number_with_suffix(lex.slice(), "%"))]
    Percent(f64),

    #[regex(r"-?([0-9]*\.)?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r"#[0-9a-fA-F]{3,8}", |lex| lex.slice().to_string())]
    HexColor(String),

    /// A whole color function such as `rgba(0, 0, 0, 0.5)`, commas included
    #[regex(r"(rgb|rgba|hsl|hsla)\([^)]*\)", |lex| lex.slice().to_string())]
    ColorFunction(String),

    #[regex(r"[a-zA-Z][a-zA-Z-]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    /// Input the lexer could not recognise
    #[regex(r"[^ \t\n\r(),]", |lex| lex.slice().to_string(), priority = 0)]
    Invalid(String),
}

/// Lex input string into tokens with spans.
///
/// Unrecognised input becomes [`Token::Invalid`] so the parser reports it
/// instead of silently skipping it.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    let mut lexer = Token::lexer(input).spanned();
    std::iter::from_fn(move || {
        let (tok, span) = lexer.next()?;
        let tok = tok.unwrap_or_else(|_| Token::Invalid(input[span.clone()].to_string()));
        Some((tok, span))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keywords() {
        let tokens: Vec<_> = lex("linear-gradient radial-gradient conic-gradient")
            .map(|(t, _)| t)
            .collect();
        assert_eq!(tokens, vec![Token::Linear, Token::Radial, Token::Conic]);
    }

    #[test]
    fn test_units() {
        let tokens: Vec<_> = lex("90deg 50% 0 -12.5deg .5%").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Degrees(90.0),
                Token::Percent(50.0),
                Token::Number(0.0),
                Token::Degrees(-12.5),
                Token::Percent(0.5),
            ]
        );
    }

    #[test]
    fn test_color_tokens() {
        let tokens: Vec<_> = lex("#fff rgba(0, 0, 0, 0.5) steelblue")
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                Token::HexColor("#fff".to_string()),
                Token::ColorFunction("rgba(0, 0, 0, 0.5)".to_string()),
                Token::Ident("steelblue".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_beat_identifiers() {
        let tokens: Vec<_> = lex("to right at center").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![Token::To, Token::Right, Token::At, Token::Center]
        );
    }

    #[test]
    fn test_invalid_input_is_kept() {
        let tokens: Vec<_> = lex("red ; blue").map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("red".to_string()),
                Token::Invalid(";".to_string()),
                Token::Ident("blue".to_string()),
            ]
        );
    }

    #[test]
    fn test_complete_gradient() {
        let tokens: Vec<_> = lex("linear-gradient(90deg, red, white 50%, blue)")
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                Token::Linear,
                Token::ParenOpen,
                Token::Degrees(90.0),
                Token::Comma,
                Token::Ident("red".to_string()),
                Token::Comma,
                Token::Ident("white".to_string()),
                Token::Percent(50.0),
                Token::Comma,
                Token::Ident("blue".to_string()),
                Token::ParenClose,
            ]
        );
    }
}
