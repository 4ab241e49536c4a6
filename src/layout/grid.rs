//! Grid track templates, line ranges and cell placement
//!
//! Track lists such as `"200px 1fr repeat(2, auto)"` are lexed with logos and
//! parsed with chumsky. Item placement follows CSS grid: explicit line ranges
//! first, then row-major auto-placement into free cells, adding implicit
//! `auto` rows when the explicit rows run out.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;
use logos::Logos;

use crate::model::format_number;

use super::types::PixelBounds;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
enum TrackToken {
    #[token("repeat")]
    Repeat,
    #[token("auto")]
    Auto,
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[regex(r"([0-9]*\.)?[0-9]+fr", |lex| lex.slice().trim_end_matches("fr").parse::<f64>().ok())]
    Fr(f64),
    #[regex(r"([0-9]*\.)?[0-9]+px", |lex| lex.slice().trim_end_matches("px").parse::<f64>().ok())]
    Px(f64),
    #[regex(r"([0-9]*\.)?[0-9]+%", |lex| lex.slice().trim_end_matches('%').parse::<f64>().ok())]
    Percent(f64),
    #[regex(r"([0-9]*\.)?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

/// One sizing function of a track list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Track {
    Fr(f64),
    Px(f64),
    Percent(f64),
    Auto,
}

fn track_list_parser<'a, I>() -> impl Parser<'a, I, Vec<Track>, extra::Err<Rich<'a, TrackToken>>>
where
    I: ValueInput<'a, Token = TrackToken, Span = SimpleSpan>,
{
    let track = select! {
        TrackToken::Fr(v) => Track::Fr(v),
        TrackToken::Px(v) => Track::Px(v),
        TrackToken::Number(v) => Track::Px(v),
        TrackToken::Percent(v) => Track::Percent(v),
        TrackToken::Auto => Track::Auto,
    }
    .labelled("track size");

    let count = select! {
        TrackToken::Number(n) if n >= 1.0 && n.fract() == 0.0 => n as usize,
    }
    .labelled("repeat count");

    let repeat = just(TrackToken::Repeat).ignore_then(
        count
            .then_ignore(just(TrackToken::Comma))
            .then(track.clone().repeated().at_least(1).collect::<Vec<_>>())
            .delimited_by(just(TrackToken::ParenOpen), just(TrackToken::ParenClose)),
    )
    .map(|(n, tracks)| tracks.repeat(n));

    choice((repeat, track.map(|t| vec![t])))
        .repeated()
        .collect::<Vec<Vec<Track>>>()
        .map(|groups| groups.into_iter().flatten().collect())
        .then_ignore(end())
}

/// Parse a `gridTemplateColumns` / `gridTemplateRows` value.
///
/// Returns `None` when the value is not a track list this engine understands.
pub fn parse_track_list(template: &str) -> Option<Vec<Track>> {
    let mut tokens = Vec::new();
    for (tok, span) in TrackToken::lexer(template).spanned() {
        tokens.push((tok.ok()?, SimpleSpan::from(span)));
    }
    let len = template.len();
    let stream = Stream::from_iter(tokens).map((len..len).into(), |(t, s): (_, _)| (t, s));
    track_list_parser().parse(stream).into_result().ok()
}

/// Rewrite a track list with its pixel tracks multiplied by `factor` and
/// rounded to whole pixels. Values that do not lex come back unchanged.
pub fn scale_track_list(template: &str, factor: f64) -> String {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    let mut prev = None;
    for (tok, span) in TrackToken::lexer(template).spanned() {
        let Ok(tok) = tok else {
            return template.to_string();
        };
        let scaled = match &tok {
            TrackToken::Px(v) => Some(format!("{}px", format_number((v * factor).round()))),
            // A number right after `(` is a repeat count
            TrackToken::Number(v) if prev != Some(TrackToken::ParenOpen) => {
                Some(format_number((v * factor).round()))
            }
            _ => None,
        };
        if let Some(text) = scaled {
            out.push_str(&template[last..span.start]);
            out.push_str(&text);
            last = span.end;
        }
        prev = Some(tok);
    }
    out.push_str(&template[last..]);
    out
}

/// One side of a `gridColumn` / `gridRow` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLine {
    Auto,
    /// 1-based line number; negative counts from the end
    Line(i32),
    Span(usize),
}

fn parse_grid_line(s: &str) -> Option<GridLine> {
    let s = s.trim();
    if s.is_empty() || s == "auto" {
        return Some(GridLine::Auto);
    }
    if let Some(n) = s.strip_prefix("span") {
        let n: usize = n.trim().parse().ok()?;
        return (n > 0).then_some(GridLine::Span(n));
    }
    let n: i32 = s.parse().ok()?;
    (n != 0).then_some(GridLine::Line(n))
}

/// Parse `"2"`, `"1 / 3"`, `"span 2"`, `"2 / span 3"`, `"1 / -1"` and the like.
/// Unparseable values are treated as `auto`.
pub fn parse_line_range(value: &str) -> (GridLine, GridLine) {
    let mut parts = value.splitn(2, '/');
    let start = parts.next().and_then(parse_grid_line);
    let end = match parts.next() {
        Some(end) => parse_grid_line(end),
        None => Some(GridLine::Auto),
    };
    match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            log::warn!("ignoring unparseable grid line range '{}'", value);
            (GridLine::Auto, GridLine::Auto)
        }
    }
}

/// A range resolved against the explicit grid: a fixed start (0-based) or
/// auto, plus a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Option<usize>,
    pub span: usize,
}

/// 1-based line index for a line number, negative numbers counting back
/// from the last explicit line
fn line_index(line: i32, tracks: usize) -> i64 {
    if line > 0 {
        line as i64
    } else {
        tracks as i64 + 2 + line as i64
    }
}

/// Resolve a line range against `tracks` explicit tracks.
///
/// Ranges reaching outside the explicit grid degrade to auto placement,
/// keeping their span.
pub fn resolve_range(range: (GridLine, GridLine), tracks: usize) -> Span {
    let lines = tracks as i64 + 1;
    let fixed = |start: i64, span: i64| -> Span {
        let span = span.max(1);
        if start >= 1 && start + span <= lines {
            Span {
                start: Some((start - 1) as usize),
                span: span as usize,
            }
        } else {
            log::warn!(
                "grid lines {}..{} fall outside the {} explicit tracks, using auto placement",
                start,
                start + span,
                tracks
            );
            Span {
                start: None,
                span: (span as usize).min(tracks.max(1)),
            }
        }
    };

    match range {
        (GridLine::Line(a), GridLine::Auto) => fixed(line_index(a, tracks), 1),
        (GridLine::Line(a), GridLine::Line(b)) => {
            let (a, b) = (line_index(a, tracks), line_index(b, tracks));
            fixed(a.min(b), (b - a).abs())
        }
        (GridLine::Line(a), GridLine::Span(s)) => fixed(line_index(a, tracks), s as i64),
        (GridLine::Span(s), GridLine::Line(b)) => {
            let b = line_index(b, tracks);
            fixed(b - s as i64, s as i64)
        }
        (GridLine::Auto, GridLine::Line(b)) => fixed(line_index(b, tracks) - 1, 1),
        (GridLine::Span(s), _) | (GridLine::Auto, GridLine::Span(s)) => Span {
            start: None,
            span: s.min(tracks.max(1)),
        },
        (GridLine::Auto, GridLine::Auto) => Span {
            start: None,
            span: 1,
        },
    }
}

/// Pixel sizes of a track list.
///
/// `contributions` holds `(track, size)` pairs for items spanning a single
/// track; `auto` tracks take the largest contribution when the list has `fr`
/// tracks, and otherwise share the leftover space like `1fr`.
pub fn size_tracks(tracks: &[Track], extent: f64, gap: f64, contributions: &[(usize, f64)]) -> Vec<f64> {
    if tracks.is_empty() {
        return vec![];
    }
    let available = (extent - gap * (tracks.len() - 1) as f64).max(0.0);
    let has_fr = tracks.iter().any(|t| matches!(t, Track::Fr(_)));

    let mut sizes: Vec<f64> = tracks
        .iter()
        .enumerate()
        .map(|(i, track)| match track {
            Track::Px(v) => *v,
            Track::Percent(p) => extent * p / 100.0,
            Track::Auto if has_fr => contributions
                .iter()
                .filter(|(t, _)| *t == i)
                .map(|(_, size)| *size)
                .fold(0.0, f64::max),
            Track::Auto | Track::Fr(_) => 0.0,
        })
        .collect();

    let leftover = (available - sizes.iter().sum::<f64>()).max(0.0);
    let flex_weight = |t: &Track| match t {
        Track::Fr(f) => *f,
        Track::Auto if !has_fr => 1.0,
        _ => 0.0,
    };
    let total: f64 = tracks.iter().map(flex_weight).sum();
    if total > 0.0 {
        for (size, track) in sizes.iter_mut().zip(tracks) {
            *size += leftover * flex_weight(track) / total;
        }
    }
    sizes
}

/// Row-major cell occupancy with a fixed column count and growing rows
#[derive(Debug, Default)]
pub struct Occupancy {
    columns: usize,
    cells: Vec<Vec<bool>>,
}

impl Occupancy {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            cells: vec![vec![false; columns]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    fn ensure_rows(&mut self, rows: usize) {
        while self.cells.len() < rows {
            self.cells.push(vec![false; self.columns]);
        }
    }

    fn is_free(&self, row: usize, col: usize, rows: usize, cols: usize) -> bool {
        if col + cols > self.columns {
            return false;
        }
        (row..row + rows).all(|r| {
            self.cells
                .get(r)
                .map_or(true, |cells| cells[col..col + cols].iter().all(|c| !c))
        })
    }

    fn occupy(&mut self, row: usize, col: usize, rows: usize, cols: usize) {
        self.ensure_rows(row + rows);
        for cells in &mut self.cells[row..row + rows] {
            for cell in &mut cells[col..col + cols] {
                *cell = true;
            }
        }
    }
}

/// A placed item: 0-based start cell and spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub row_span: usize,
    pub column_span: usize,
}

/// Place items in order. Fixed positions are honoured as given; auto
/// positions take the first free cells, scanning row-major from a cursor
/// that only moves forward.
pub fn place_items(items: &[(Span, Span)], columns: usize, explicit_rows: usize) -> (Vec<Cell>, usize) {
    let columns = columns.max(1);
    let mut grid = Occupancy::new(columns, explicit_rows);
    let mut cells = vec![None; items.len()];

    // Items with a fixed row and column claim their cells first
    for (i, (col, row)) in items.iter().enumerate() {
        if let (Some(c), Some(r)) = (col.start, row.start) {
            grid.occupy(r, c, row.span, col.span.min(columns - c));
            cells[i] = Some(Cell {
                row: r,
                column: c,
                row_span: row.span,
                column_span: col.span.min(columns - c),
            });
        }
    }

    let mut cursor = (0usize, 0usize);
    for (i, (col, row)) in items.iter().enumerate() {
        if cells[i].is_some() {
            continue;
        }
        let col_span = col.span.min(columns);
        let cell = match (col.start, row.start) {
            (Some(c), None) => {
                let c = c.min(columns - col_span);
                let r = (0..)
                    .find(|r| grid.is_free(*r, c, row.span, col_span))
                    .unwrap_or(grid.rows());
                Cell {
                    row: r,
                    column: c,
                    row_span: row.span,
                    column_span: col_span,
                }
            }
            (None, Some(r)) => {
                let c = (0..=columns - col_span)
                    .find(|c| grid.is_free(r, *c, row.span, col_span))
                    .unwrap_or(0);
                Cell {
                    row: r,
                    column: c,
                    row_span: row.span,
                    column_span: col_span,
                }
            }
            _ => {
                let (mut r, mut c) = cursor;
                while !grid.is_free(r, c, row.span, col_span) {
                    c += 1;
                    if c + col_span > columns {
                        c = 0;
                        r += 1;
                    }
                }
                cursor = (r, c + col_span);
                if cursor.1 >= columns {
                    cursor = (r + 1, 0);
                }
                Cell {
                    row: r,
                    column: c,
                    row_span: row.span,
                    column_span: col_span,
                }
            }
        };
        grid.occupy(cell.row, cell.column, cell.row_span, cell.column_span);
        cells[i] = Some(cell);
    }

    let rows = grid.rows().max(explicit_rows);
    (cells.into_iter().flatten().collect(), rows)
}

/// Offsets of each track start, given sizes and the gap between tracks
fn track_offsets(sizes: &[f64], gap: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(sizes.len());
    let mut cursor = 0.0;
    for size in sizes {
        offsets.push(cursor);
        cursor += size + gap;
    }
    offsets
}

/// Rectangle of a cell relative to the grid's content origin
pub fn cell_bounds(cell: &Cell, columns: &[f64], rows: &[f64], column_gap: f64, row_gap: f64) -> PixelBounds {
    let span_extent = |sizes: &[f64], start: usize, span: usize, gap: f64| -> (f64, f64) {
        let offsets = track_offsets(sizes, gap);
        let start = start.min(sizes.len().saturating_sub(1));
        let end = (start + span).min(sizes.len());
        let extent: f64 = sizes[start..end].iter().sum::<f64>() + gap * (end - start).saturating_sub(1) as f64;
        (offsets.get(start).copied().unwrap_or(0.0), extent)
    };
    if columns.is_empty() || rows.is_empty() {
        return PixelBounds::zero();
    }
    let (x, width) = span_extent(columns, cell.column, cell.column_span, column_gap);
    let (y, height) = span_extent(rows, cell.row, cell.row_span, row_gap);
    PixelBounds::new(x, y, width, height)
}
