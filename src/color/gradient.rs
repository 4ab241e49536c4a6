//! Gradient values, stop position inference and serialization

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::length::{format_number, round_to};

use super::Rgba;

/// One color stop; `position` is a fraction in `[0, 1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub id: String,
    pub color: String,
    pub position: f64,
}

impl GradientStop {
    pub fn new(id: impl Into<String>, color: impl Into<String>, position: f64) -> Self {
        Self {
            id: id.into(),
            color: color.into(),
            position: position.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadialShape {
    Circle,
    #[default]
    Ellipse,
}

impl fmt::Display for RadialShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RadialShape::Circle => write!(f, "circle"),
            RadialShape::Ellipse => write!(f, "ellipse"),
        }
    }
}

/// Gradient centre in percent of the painted box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for GradientPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
    Conic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Gradient {
    Linear {
        /// Degrees, 0 = towards the top, clockwise
        angle: f64,
        stops: Vec<GradientStop>,
    },
    Radial {
        shape: RadialShape,
        position: GradientPosition,
        stops: Vec<GradientStop>,
    },
    Conic {
        angle: f64,
        position: GradientPosition,
        stops: Vec<GradientStop>,
    },
}

/// Errors from editing a gradient's stops
#[derive(Debug, Error, PartialEq)]
pub enum GradientEditError {
    #[error("a gradient needs at least {min} stops")]
    TooFewStops { min: usize },
    #[error("no stop with id '{0}'")]
    UnknownStop(String),
}

/// Minimum number of stops the editor keeps on a gradient
pub const MIN_STOPS: usize = 2;

/// Fill in positions for stops written without one.
///
/// `explicit` holds fractions in source order. An unpositioned first stop sits
/// at 0 and an unpositioned last stop at 1; every other run of unpositioned
/// stops is spread evenly between its nearest positioned neighbours.
pub fn infer_positions(explicit: &[Option<f64>]) -> Vec<f64> {
    let n = explicit.len();
    if n == 0 {
        return vec![];
    }
    if n == 1 {
        return vec![explicit[0].unwrap_or(0.0)];
    }

    let mut known: Vec<Option<f64>> = explicit.to_vec();
    if known[0].is_none() {
        known[0] = Some(0.0);
    }
    if known[n - 1].is_none() {
        known[n - 1] = Some(1.0);
    }

    let mut positions = vec![0.0; n];
    let mut i = 0;
    while i < n {
        if let Some(p) = known[i] {
            positions[i] = p;
            i += 1;
            continue;
        }
        // Ends are always known, so a run has neighbours on both sides
        let before = positions[i - 1];
        let run_start = i;
        while known[i].is_none() {
            i += 1;
        }
        let after = known[i].unwrap_or(1.0);
        let count = i - run_start;
        let step = (after - before) / (count + 1) as f64;
        for k in 0..count {
            positions[run_start + k] = before + step * (k + 1) as f64;
        }
    }
    positions
}

impl Gradient {
    pub fn kind(&self) -> GradientKind {
        match self {
            Gradient::Linear { .. } => GradientKind::Linear,
            Gradient::Radial { .. } => GradientKind::Radial,
            Gradient::Conic { .. } => GradientKind::Conic,
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear { stops, .. }
            | Gradient::Radial { stops, .. }
            | Gradient::Conic { stops, .. } => stops,
        }
    }

    pub fn stops_mut(&mut self) -> &mut Vec<GradientStop> {
        match self {
            Gradient::Linear { stops, .. }
            | Gradient::Radial { stops, .. }
            | Gradient::Conic { stops, .. } => stops,
        }
    }

    /// Stops ordered by ascending position; ties keep their relative order
    pub fn sorted_stops(&self) -> Vec<&GradientStop> {
        let mut stops: Vec<&GradientStop> = self.stops().iter().collect();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        stops
    }

    /// A solid color standing in for the gradient, e.g. in swatches
    pub fn representative_color(&self) -> Option<&str> {
        self.stops().first().map(|s| s.color.as_str())
    }

    /// Same stops under another gradient kind, keeping whatever geometry
    /// the two kinds share
    pub fn convert_to(&self, kind: GradientKind) -> Gradient {
        let stops = self.stops().to_vec();
        let (angle, position) = match self {
            Gradient::Linear { angle, .. } => (*angle, GradientPosition::default()),
            Gradient::Radial { position, .. } => (180.0, *position),
            Gradient::Conic {
                angle, position, ..
            } => (*angle, *position),
        };
        match kind {
            GradientKind::Linear => Gradient::Linear { angle, stops },
            GradientKind::Radial => Gradient::Radial {
                shape: match self {
                    Gradient::Radial { shape, .. } => *shape,
                    _ => RadialShape::default(),
                },
                position,
                stops,
            },
            GradientKind::Conic => Gradient::Conic {
                angle: if matches!(self, Gradient::Radial { .. }) {
                    0.0
                } else {
                    angle
                },
                position,
                stops,
            },
        }
    }

    fn next_stop_id(&self) -> String {
        let mut n = self.stops().len();
        loop {
            let id = format!("stop-{}", n);
            if !self.stops().iter().any(|s| s.id == id) {
                return id;
            }
            n += 1;
        }
    }

    /// Insert a stop in the middle of the widest gap between neighbouring
    /// stops, colored halfway between them. Returns the new stop's id.
    pub fn add_stop(&mut self) -> String {
        let id = self.next_stop_id();
        let sorted: Vec<GradientStop> = self.sorted_stops().into_iter().cloned().collect();

        let stop = match sorted.len() {
            0 => GradientStop::new(id.clone(), "#000000", 0.0),
            1 => {
                let only = &sorted[0];
                let position = if only.position < 0.5 { 1.0 } else { 0.0 };
                GradientStop::new(id.clone(), only.color.clone(), position)
            }
            _ => {
                let (left, right) = sorted
                    .windows(2)
                    .map(|w| (&w[0], &w[1]))
                    .fold(None::<(&GradientStop, &GradientStop)>, |best, pair| match best {
                        Some(b) if b.1.position - b.0.position >= pair.1.position - pair.0.position => {
                            Some(b)
                        }
                        _ => Some(pair),
                    })
                    .unwrap_or((&sorted[0], &sorted[1]));
                let color = Rgba::parse(&left.color).lerp(&Rgba::parse(&right.color), 0.5);
                GradientStop::new(
                    id.clone(),
                    color.to_hex(),
                    round_to((left.position + right.position) / 2.0, 4),
                )
            }
        };
        self.stops_mut().push(stop);
        id
    }

    /// Remove a stop, refusing to go below [`MIN_STOPS`]
    pub fn remove_stop(&mut self, id: &str) -> Result<GradientStop, GradientEditError> {
        let index = self
            .stops()
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| GradientEditError::UnknownStop(id.to_string()))?;
        if self.stops().len() <= MIN_STOPS {
            return Err(GradientEditError::TooFewStops { min: MIN_STOPS });
        }
        Ok(self.stops_mut().remove(index))
    }

    /// Move a stop, clamping the new position into `[0, 1]`
    pub fn move_stop(&mut self, id: &str, position: f64) -> Result<(), GradientEditError> {
        let stop = self
            .stops_mut()
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| GradientEditError::UnknownStop(id.to_string()))?;
        stop.position = position.clamp(0.0, 1.0);
        Ok(())
    }

    /// Whether the gradient has enough stops to paint as a gradient
    pub fn is_paintable(&self) -> bool {
        self.stops().len() >= MIN_STOPS
    }
}

fn format_stops(stops: &[&GradientStop]) -> String {
    stops
        .iter()
        .map(|s| format!("{} {}%", s.color, format_number(s.position * 100.0)))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stops = format_stops(&self.sorted_stops());
        match self {
            Gradient::Linear { angle, .. } => {
                write!(f, "linear-gradient({}deg, {})", format_number(*angle), stops)
            }
            Gradient::Radial {
                shape, position, ..
            } => write!(
                f,
                "radial-gradient({} at {}% {}%, {})",
                shape,
                format_number(position.x),
                format_number(position.y),
                stops
            ),
            Gradient::Conic {
                angle, position, ..
            } => write!(
                f,
                "conic-gradient(from {}deg at {}% {}%, {})",
                format_number(*angle),
                format_number(position.x),
                format_number(position.y),
                stops
            ),
        }
    }
}

/// Serialize a gradient to CSS, stops sorted by position
pub fn serialize_gradient(gradient: &Gradient) -> String {
    gradient.to_string()
}
