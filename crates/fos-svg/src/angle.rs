//! Angles and marker orientation

use crate::Config;

/// Unit of an angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AngleUnit {
    /// Bare number, read as degrees
    #[default]
    Unspecified,
    Deg,
    Rad,
    Grad,
}

impl AngleUnit {
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Some(match suffix {
            "" => Self::Unspecified,
            "deg" => Self::Deg,
            "rad" => Self::Rad,
            "grad" => Self::Grad,
            _ => return None,
        })
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::Unspecified => "",
            Self::Deg => "deg",
            Self::Rad => "rad",
            Self::Grad => "grad",
        }
    }

    fn degrees_per_unit(self) -> f32 {
        match self {
            Self::Unspecified | Self::Deg => 1.0,
            Self::Rad => 180.0 / std::f32::consts::PI,
            Self::Grad => 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Angle {
    pub value: f32,
    pub unit: AngleUnit,
}

impl Angle {
    pub fn new(value: f32, unit: AngleUnit) -> Self {
        Self { value, unit }
    }

    pub fn deg(value: f32) -> Self {
        Self::new(value, AngleUnit::Deg)
    }

    pub fn to_degrees(&self) -> f32 {
        self.value * self.unit.degrees_per_unit()
    }

    /// Sum expressed in `self`'s unit
    pub fn add(&self, other: &Angle) -> Angle {
        if self.unit == other.unit {
            return Angle::new(self.value + other.value, self.unit);
        }
        let degrees = self.to_degrees() + other.to_degrees();
        Angle::new(degrees / self.unit.degrees_per_unit(), self.unit)
    }

    pub fn write(&self, out: &mut String, config: &Config) {
        config.write_number(out, self.value);
        out.push_str(self.unit.suffix());
    }
}

/// `orient` on `<marker>`: follow the path direction, or a fixed angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orient {
    Auto,
    Angle(Angle),
}

impl Orient {
    pub const AUTO_KEYWORD: &'static str = "auto";

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// The fixed angle; `auto` reads as an unspecified zero
    pub fn angle(&self) -> Angle {
        match self {
            Self::Auto => Angle::default(),
            Self::Angle(angle) => *angle,
        }
    }

    pub fn write(&self, out: &mut String, config: &Config) {
        match self {
            Self::Auto => out.push_str(Self::AUTO_KEYWORD),
            Self::Angle(angle) => angle.write(out, config),
        }
    }
}

impl Default for Orient {
    fn default() -> Self {
        Self::Angle(Angle::default())
    }
}
