//! Error types for gradient parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::color::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let ParseError::Syntax {
            span,
            message,
            expected,
        } = self;

        let expected_str = if expected.is_empty() {
            String::new()
        } else {
            format!("\nExpected: {}", expected.join(", "))
        };

        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(message)
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(format!("{}{}", message, expected_str))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { .. } => match err.found() {
                Some(Token::Invalid(s)) => format!("Unrecognised input '{}'", s),
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Linear => "'linear-gradient'".to_string(),
        Token::Radial => "'radial-gradient'".to_string(),
        Token::Conic => "'conic-gradient'".to_string(),
        Token::Degrees(d) => format!("angle {}deg", d),
        Token::Percent(p) => format!("percentage {}%", p),
        Token::Number(n) => format!("number {}", n),
        Token::HexColor(c) => format!("color {}", c),
        Token::ColorFunction(c) => format!("color {}", c),
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::Invalid(s) => format!("'{}'", s),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
        Token::To => "keyword 'to'".to_string(),
        Token::At => "keyword 'at'".to_string(),
        Token::From => "keyword 'from'".to_string(),
        Token::Circle => "keyword 'circle'".to_string(),
        Token::Ellipse => "keyword 'ellipse'".to_string(),
        Token::Left => "keyword 'left'".to_string(),
        Token::Right => "keyword 'right'".to_string(),
        Token::Top => "keyword 'top'".to_string(),
        Token::Bottom => "keyword 'bottom'".to_string(),
        Token::Center => "keyword 'center'".to_string(),
    }
}
