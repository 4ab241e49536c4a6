//! Lengths stored as `"10%"` / `"20px"` strings in documents

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A length that is either absolute pixels or a percentage of a parent extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

/// Unit of a [`Length`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Percent,
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid length '{0}' (expected a number followed by 'px' or '%')")]
pub struct LengthParseError(pub String);

impl Length {
    pub fn px(value: f64) -> Self {
        Self::Px(value)
    }

    pub fn percent(value: f64) -> Self {
        Self::Percent(value)
    }

    pub fn zero() -> Self {
        Self::Px(0.0)
    }

    pub fn unit(&self) -> LengthUnit {
        match self {
            Self::Px(_) => LengthUnit::Px,
            Self::Percent(_) => LengthUnit::Percent,
        }
    }

    /// The raw number without its unit
    pub fn value(&self) -> f64 {
        match self {
            Self::Px(v) | Self::Percent(v) => *v,
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, Self::Percent(_))
    }

    /// Resolve to pixels against the extent a percentage refers to
    pub fn resolve(&self, extent: f64) -> f64 {
        match self {
            Self::Px(v) => *v,
            Self::Percent(p) => extent * p / 100.0,
        }
    }

    /// Express the same pixel distance in another unit.
    ///
    /// Percentages are rounded to 2 decimals and pixels to whole numbers, the
    /// precision the editor panel shows. A non-positive extent leaves
    /// percentage conversion undefined, so the value is returned unchanged.
    pub fn convert(&self, unit: LengthUnit, extent: f64) -> Length {
        if self.unit() == unit {
            return *self;
        }
        match unit {
            LengthUnit::Px => Length::Px(self.resolve(extent).round()),
            LengthUnit::Percent => {
                if extent <= 0.0 {
                    return *self;
                }
                Length::Percent(round_to(self.resolve(extent) / extent * 100.0, 2))
            }
        }
    }

    /// Multiply pixel lengths by `factor`, rounding to whole pixels.
    /// Percentages are resolution independent and stay untouched.
    pub fn scaled(&self, factor: f64) -> Length {
        match self {
            Self::Px(v) => Self::Px((v * factor).round()),
            Self::Percent(_) => *self,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Self::zero()
    }
}

/// Round to a number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let m = 10f64.powi(decimals);
    (value * m).round() / m
}

/// Format a number without a trailing `.0` for whole values
pub fn format_number(value: f64) -> String {
    let rounded = round_to(value, 2);
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{}px", format_number(*v)),
            Self::Percent(v) => write!(f, "{}%", format_number(*v)),
        }
    }
}

impl FromStr for Length {
    type Err = LengthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parse = |num: &str| {
            num.trim()
                .parse::<f64>()
                .map_err(|_| LengthParseError(s.to_string()))
        };
        if let Some(num) = trimmed.strip_suffix('%') {
            Ok(Length::Percent(parse(num)?))
        } else if let Some(num) = trimmed.strip_suffix("px") {
            Ok(Length::Px(parse(num)?))
        } else {
            // Unitless numbers are pixels, as in CSS-in-JS style objects
            Ok(Length::Px(parse(trimmed)?))
        }
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Text(String),
    Number(f64),
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match LengthRepr::deserialize(deserializer)? {
            LengthRepr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            LengthRepr::Number(n) => Ok(Length::Px(n)),
        }
    }
}
