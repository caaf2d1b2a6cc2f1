//! SVG lengths

use crate::Config;

/// Length units accepted in attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
    /// Unitless (user units)
    #[default]
    Number,
    Px,
    Em,
    Ex,
    In,
    Cm,
    Mm,
    Pt,
    Pc,
    Percent,
}

impl LengthUnit {
    /// Parse a unit suffix (empty = unitless)
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "" => Self::Number,
            "px" => Self::Px,
            "em" => Self::Em,
            "ex" => Self::Ex,
            "in" => Self::In,
            "cm" => Self::Cm,
            "mm" => Self::Mm,
            "pt" => Self::Pt,
            "pc" => Self::Pc,
            "%" => Self::Percent,
            _ => return None,
        })
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Number => "",
            Self::Px => "px",
            Self::Em => "em",
            Self::Ex => "ex",
            Self::In => "in",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::Percent => "%",
        }
    }

    /// User units per unit at 96 user units per inch; None for relative units
    pub fn user_units(self) -> Option<f32> {
        match self {
            Self::Number | Self::Px => Some(1.0),
            Self::In => Some(96.0),
            Self::Cm => Some(96.0 / 2.54),
            Self::Mm => Some(96.0 / 25.4),
            Self::Pt => Some(96.0 / 72.0),
            Self::Pc => Some(16.0),
            Self::Em | Self::Ex | Self::Percent => None,
        }
    }
}

/// A number with a unit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Unitless length
    pub fn number(value: f32) -> Self {
        Self { value, unit: LengthUnit::Number }
    }

    pub fn px(value: f32) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    pub fn percent(value: f32) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }

    /// Value in user units, if the unit is absolute
    pub fn to_user_units(&self) -> Option<f32> {
        self.unit.user_units().map(|factor| self.value * factor)
    }

    /// Sum of two lengths, expressed in `self`'s unit.
    ///
    /// Returns `None` when the units differ and either one is relative.
    pub fn add(&self, other: &Length) -> Option<Length> {
        if self.unit == other.unit {
            return Some(Length::new(self.value + other.value, self.unit));
        }
        let factor = self.unit.user_units()?;
        let sum = self.to_user_units()? + other.to_user_units()?;
        Some(Length::new(sum / factor, self.unit))
    }

    pub fn write(&self, out: &mut String, config: &Config) {
        config.write_number(out, self.value);
        out.push_str(self.unit.suffix());
    }
}
