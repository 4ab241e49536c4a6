//! Gradient parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::color::gradient::{
    infer_positions, Gradient, GradientPosition, GradientStop, RadialShape,
};
use crate::color::lexer::{lex, Token};

/// A stop as written: color plus optional percentage
#[derive(Debug, Clone)]
struct RawStop {
    color: String,
    percent: Option<f64>,
}

/// Everything before the first color stop
#[derive(Debug, Clone)]
enum Header {
    Linear(f64),
    Radial(RadialShape, GradientPosition),
    Conic(f64, GradientPosition),
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// One component of an `at <x> <y>` position
#[derive(Debug, Clone, Copy)]
enum PositionPart {
    X(f64),
    Y(f64),
    Either(f64),
}

impl PositionPart {
    fn value(self) -> f64 {
        match self {
            PositionPart::X(v) | PositionPart::Y(v) | PositionPart::Either(v) => v,
        }
    }
}

/// Angle of a `to <side> [<side>]` direction
fn side_angle(first: Side, second: Option<Side>) -> f64 {
    let single = |side: Side| match side {
        Side::Top => 0.0,
        Side::Right => 90.0,
        Side::Bottom => 180.0,
        Side::Left => 270.0,
    };
    match (first, second) {
        (Side::Top, Some(Side::Right)) | (Side::Right, Some(Side::Top)) => 45.0,
        (Side::Bottom, Some(Side::Right)) | (Side::Right, Some(Side::Bottom)) => 135.0,
        (Side::Bottom, Some(Side::Left)) | (Side::Left, Some(Side::Bottom)) => 225.0,
        (Side::Top, Some(Side::Left)) | (Side::Left, Some(Side::Top)) => 315.0,
        (side, _) => single(side),
    }
}

fn resolve_position(first: PositionPart, second: Option<PositionPart>) -> GradientPosition {
    match (first, second) {
        (PositionPart::Y(y), None) => GradientPosition { x: 50.0, y },
        (first, None) => GradientPosition {
            x: first.value(),
            y: 50.0,
        },
        // `top left` is as valid as `left top`
        (PositionPart::Y(y), Some(second)) | (second @ PositionPart::X(_), Some(PositionPart::Y(y)))
            if !matches!(second, PositionPart::Y(_)) =>
        {
            GradientPosition {
                x: second.value(),
                y,
            }
        }
        (first, Some(second)) => GradientPosition {
            x: first.value(),
            y: second.value(),
        },
    }
}

fn build_gradient(header: Option<Header>, raw: Vec<RawStop>) -> Gradient {
    let explicit: Vec<Option<f64>> = raw
        .iter()
        .map(|s| s.percent.map(|p| (p / 100.0).clamp(0.0, 1.0)))
        .collect();
    let positions = infer_positions(&explicit);
    let stops: Vec<GradientStop> = raw
        .into_iter()
        .zip(positions)
        .enumerate()
        .map(|(i, (stop, position))| GradientStop::new(format!("stop-{}", i), stop.color, position))
        .collect();

    match header {
        Some(Header::Radial(shape, position)) => Gradient::Radial {
            shape,
            position,
            stops,
        },
        Some(Header::Conic(angle, position)) => Gradient::Conic {
            angle,
            position,
            stops,
        },
        Some(Header::Linear(angle)) => Gradient::Linear { angle, stops },
        None => Gradient::Linear {
            angle: 180.0,
            stops,
        },
    }
}

/// Parse a CSS gradient, reporting every syntax error
pub fn parse_gradient_strict(input: &str) -> Result<Gradient, Vec<crate::ParseError>> {
    let len = input.len();

    let token_iter = lex(input).map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    gradient_parser()
        .parse(token_stream)
        .into_result()
        .map(|(header, stops)| build_gradient(header, stops))
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn gradient_parser<'a, I>(
) -> impl Parser<'a, I, (Option<Header>, Vec<RawStop>), extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let color = select! {
        Token::HexColor(s) => s,
        Token::ColorFunction(s) => s,
        Token::Ident(s) => s,
    }
    .labelled("color");

    let percent = select! {
        Token::Percent(p) => p,
    };

    // Unitless numbers are only valid CSS for 0, but accept them as degrees
    let angle = select! {
        Token::Degrees(d) => d,
        Token::Number(n) => n,
    }
    .labelled("angle");

    let stop = color
        .then(percent.or_not())
        .map(|(color, percent)| RawStop { color, percent });

    let stops = stop
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>();

    let side = select! {
        Token::Left => Side::Left,
        Token::Right => Side::Right,
        Token::Top => Side::Top,
        Token::Bottom => Side::Bottom,
    };

    let to_side = just(Token::To)
        .ignore_then(side.clone().then(side.or_not()))
        .map(|(first, second)| side_angle(first, second));

    let position_part = select! {
        Token::Percent(p) => PositionPart::Either(p),
        Token::Number(n) => PositionPart::Either(n),
        Token::Left => PositionPart::X(0.0),
        Token::Right => PositionPart::X(100.0),
        Token::Top => PositionPart::Y(0.0),
        Token::Bottom => PositionPart::Y(100.0),
        Token::Center => PositionPart::Either(50.0),
    };

    let at_position = just(Token::At)
        .ignore_then(position_part.clone().then(position_part.or_not()))
        .map(|(first, second)| resolve_position(first, second));

    let shape = select! {
        Token::Circle => RadialShape::Circle,
        Token::Ellipse => RadialShape::Ellipse,
    };

    let linear_header = choice((angle.clone(), to_side)).map(Header::Linear);

    let radial_header = choice((
        shape
            .then(at_position.clone().or_not())
            .map(|(shape, position)| Header::Radial(shape, position.unwrap_or_default())),
        at_position
            .clone()
            .map(|position| Header::Radial(RadialShape::default(), position)),
    ));

    let conic_header = choice((
        just(Token::From)
            .ignore_then(angle)
            .then(at_position.clone().or_not())
            .map(|(angle, position)| Header::Conic(angle, position.unwrap_or_default())),
        at_position.map(|position| Header::Conic(0.0, position)),
    ));

    let linear = just(Token::Linear).ignore_then(
        linear_header
            .then_ignore(just(Token::Comma))
            .or_not()
            .then(stops.clone())
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
    );

    // Radial and conic headers default their geometry when omitted
    let radial = just(Token::Radial).ignore_then(
        radial_header
            .then_ignore(just(Token::Comma))
            .or_not()
            .map(|h| Some(h.unwrap_or(Header::Radial(RadialShape::default(), GradientPosition::default()))))
            .then(stops.clone())
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
    );

    let conic = just(Token::Conic).ignore_then(
        conic_header
            .then_ignore(just(Token::Comma))
            .or_not()
            .map(|h| Some(h.unwrap_or(Header::Conic(0.0, GradientPosition::default()))))
            .then(stops)
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
    );

    choice((linear, radial, conic)).then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops_of(g: &Gradient) -> Vec<(String, f64)> {
        g.stops()
            .iter()
            .map(|s| (s.color.clone(), s.position))
            .collect()
    }

    #[test]
    fn test_two_stops_without_positions() {
        let g = parse_gradient_strict("linear-gradient(90deg, red, blue)").unwrap();
        assert!(matches!(g, Gradient::Linear { angle, .. } if angle == 90.0));
        assert_eq!(
            stops_of(&g),
            vec![("red".to_string(), 0.0), ("blue".to_string(), 1.0)]
        );
    }

    #[test]
    fn test_inference_around_explicit_stop() {
        let g = parse_gradient_strict("linear-gradient(90deg, red, white 50%, blue)").unwrap();
        assert_eq!(
            stops_of(&g),
            vec![
                ("red".to_string(), 0.0),
                ("white".to_string(), 0.5),
                ("blue".to_string(), 1.0)
            ]
        );
    }

    #[test]
    fn test_linear_without_header_points_down() {
        let g = parse_gradient_strict("linear-gradient(#fff, #000)").unwrap();
        assert!(matches!(g, Gradient::Linear { angle, .. } if angle == 180.0));
    }

    #[test]
    fn test_to_side_keywords() {
        let g = parse_gradient_strict("linear-gradient(to right, red, blue)").unwrap();
        assert!(matches!(g, Gradient::Linear { angle, .. } if angle == 90.0));
        let g = parse_gradient_strict("linear-gradient(to top left, red, blue)").unwrap();
        assert!(matches!(g, Gradient::Linear { angle, .. } if angle == 315.0));
    }

    #[test]
    fn test_color_functions_keep_inner_commas() {
        let g = parse_gradient_strict(
            "linear-gradient(180deg, rgba(255, 0, 0, 0.5) 10%, rgb(0,0,255) 90%)",
        )
        .unwrap();
        assert_eq!(
            stops_of(&g),
            vec![
                ("rgba(255, 0, 0, 0.5)".to_string(), 0.1),
                ("rgb(0,0,255)".to_string(), 0.9)
            ]
        );
    }

    #[test]
    fn test_radial_header_forms() {
        let g = parse_gradient_strict("radial-gradient(circle at 30% 40%, red, blue)").unwrap();
        match g {
            Gradient::Radial {
                shape, position, ..
            } => {
                assert_eq!(shape, RadialShape::Circle);
                assert_eq!(position, GradientPosition { x: 30.0, y: 40.0 });
            }
            other => panic!("expected radial, got {:?}", other),
        }

        let g = parse_gradient_strict("radial-gradient(at top, red, blue)").unwrap();
        assert!(matches!(
            g,
            Gradient::Radial { shape: RadialShape::Ellipse, position, .. }
                if position == GradientPosition { x: 50.0, y: 0.0 }
        ));

        let g = parse_gradient_strict("radial-gradient(red, blue)").unwrap();
        assert!(matches!(
            g,
            Gradient::Radial { position, .. } if position == GradientPosition::default()
        ));
    }

    #[test]
    fn test_conic_header() {
        let g = parse_gradient_strict("conic-gradient(from 45deg at 25% 75%, red, blue)").unwrap();
        assert!(matches!(
            g,
            Gradient::Conic { angle, position, .. }
                if angle == 45.0 && position == GradientPosition { x: 25.0, y: 75.0 }
        ));
    }

    #[test]
    fn test_position_keywords_in_either_order() {
        let a = resolve_position(PositionPart::X(0.0), Some(PositionPart::Y(100.0)));
        let b = resolve_position(PositionPart::Y(100.0), Some(PositionPart::X(0.0)));
        assert_eq!(a, GradientPosition { x: 0.0, y: 100.0 });
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_non_gradients() {
        assert!(parse_gradient_strict("red").is_err());
        assert!(parse_gradient_strict("linear-gradient(90deg)").is_err());
        assert!(parse_gradient_strict("linear-gradient(90deg, red, blue").is_err());
        assert!(parse_gradient_strict("linear-gradient(90deg, red; blue)").is_err());
    }

    #[test]
    fn test_error_has_span() {
        let errs = parse_gradient_strict("linear-gradient(90deg, red, ;)").unwrap_err();
        let crate::ParseError::Syntax { span, .. } = &errs[0];
        assert_eq!(span.start, 28);
    }
}
