use crate::error::ConfigViolation;
use derive_more::{Deref, From, Into};
use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CIRCLE_RADIUS: f64 = 5.0;
pub const DEFAULT_CIRCLES_COUNT: usize = 8;
pub const DEFAULT_GAP_PERCENTAGE: f64 = 30.0;
pub const DEFAULT_GAP_LOCATION: usize = 3;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid colour '{input}': {reason}")]
pub struct ColourParseError {
    input: String,
    reason: String,
}

/// Fill colour of the circles. Parsed from `#rgb`, `#rrggbb` or one of a few
/// names; serialized back as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, SerializeDisplay, DeserializeFromStr)]
pub struct Colour(Srgba<f64>);

impl Colour {
    pub const BLACK: Colour = Colour(Srgba::new(0.0, 0.0, 0.0, 1.0));
    pub const WHITE: Colour = Colour(Srgba::new(1.0, 1.0, 1.0, 1.0));

    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self(Srgba::new(red, green, blue, alpha))
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Colour {
    type Err = ColourParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "black" => return Ok(Self::BLACK),
            "white" => return Ok(Self::WHITE),
            "transparent" => return Ok(Self::new(0.0, 0.0, 0.0, 0.0)),
            _ => {}
        }

        let rgb = Srgb::<u8>::from_str(trimmed).map_err(|e| ColourParseError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let rgb: Srgb<f64> = rgb.into_format();
        Ok(Self::new(rgb.red, rgb.green, rgb.blue, 1.0))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rgb: Srgb<u8> = self.0.color.into_format();
        write!(f, "#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub circle_radius: f64,
    pub circle_colour: Colour,
    pub circles_count: usize,
    pub gap_percentage: f64,
    pub gap_location: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            circle_radius: DEFAULT_CIRCLE_RADIUS,
            circle_colour: Colour::BLACK,
            circles_count: DEFAULT_CIRCLES_COUNT,
            gap_percentage: DEFAULT_GAP_PERCENTAGE,
            gap_location: DEFAULT_GAP_LOCATION,
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<(), ConfigViolation> {
        if self.circles_count < 1 {
            return Err(ConfigViolation::NoCircles);
        }
        if !self.circle_radius.is_finite() || self.circle_radius <= 0.0 {
            return Err(ConfigViolation::Radius(self.circle_radius));
        }
        if !(0.0..=100.0).contains(&self.gap_percentage) {
            return Err(ConfigViolation::GapPercentage(self.gap_percentage));
        }
        if self.gap_location > self.circles_count {
            return Err(ConfigViolation::GapLocation {
                location: self.gap_location,
                count: self.circles_count,
            });
        }
        Ok(())
    }

    pub fn validated(self) -> Result<Self, ConfigViolation> {
        self.validate().map(|_| self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.circle_radius, 5.0);
        assert_eq!(config.circles_count, 8);
        assert_eq!(config.gap_percentage, 30.0);
        assert_eq!(config.gap_location, 3);
        assert_eq!(config.circle_colour, Colour::BLACK);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: LoaderConfig = serde_json::from_str(
            r##"{ "circles_count": 5, "circle_colour": "#ff8000" }"##,
        )
        .unwrap();
        assert_eq!(config.circles_count, 5);
        assert_eq!(config.gap_location, 3);
        assert_eq!(config.circle_colour.to_string(), "#ff8000");
    }

    #[test]
    fn test_colour_parsing() {
        let cases = vec![
            ("\"black\"", "#000000"),
            ("\"WHITE\"", "#ffffff"),
            ("\"#0f0\"", "#00ff00"),
            ("\"#3366cc\"", "#3366cc"),
        ];

        for (json, expected) in cases {
            let colour: Colour = serde_json::from_str(json).unwrap();
            assert_eq!(colour.to_string(), expected);
        }

        assert!("#zzzzzz".parse::<Colour>().is_err());
        assert!("not a colour".parse::<Colour>().is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let base = LoaderConfig::default();

        let cases = vec![
            (
                LoaderConfig {
                    circles_count: 0,
                    gap_location: 0,
                    ..base.clone()
                },
                ConfigViolation::NoCircles,
            ),
            (
                LoaderConfig {
                    circle_radius: -1.0,
                    ..base.clone()
                },
                ConfigViolation::Radius(-1.0),
            ),
            (
                LoaderConfig {
                    gap_percentage: 120.0,
                    ..base.clone()
                },
                ConfigViolation::GapPercentage(120.0),
            ),
            (
                LoaderConfig {
                    gap_location: 9,
                    ..base.clone()
                },
                ConfigViolation::GapLocation {
                    location: 9,
                    count: 8,
                },
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_gap_location_may_sit_on_last_boundary() {
        let config = LoaderConfig {
            gap_location: 8,
            ..LoaderConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
