//! Scalar attribute values
//!
//! A [`ValueCell`] holds one typed value plus a lazily computed string form.
//! Mutators clear the cached string; the next read rebuilds it.

use std::cell::RefCell;

use crate::error::{LiveError, LiveResult, ParseError};
use crate::{parser, Config, Length, Matrix, Orient};

/// Named code table for enumerated attributes.
///
/// Code 0 is reserved for "unknown" and can never be assigned.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumTable {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl EnumTable {
    /// `zoomAndPan`
    pub const ZOOM_AND_PAN: EnumTable = EnumTable {
        name: "zoomAndPan",
        values: &["", "disable", "magnify"],
    };

    /// `gradientUnits`, `patternUnits`, `clipPathUnits`, ...
    pub const UNITS: EnumTable = EnumTable {
        name: "units",
        values: &["", "userSpaceOnUse", "objectBoundingBox"],
    };

    /// `spreadMethod`
    pub const SPREAD_METHOD: EnumTable = EnumTable {
        name: "spreadMethod",
        values: &["", "pad", "reflect", "repeat"],
    };

    /// `lengthAdjust`
    pub const LENGTH_ADJUST: EnumTable = EnumTable {
        name: "lengthAdjust",
        values: &["", "spacing", "spacingAndGlyphs"],
    };

    /// Code for a keyword, if it is a known value
    pub fn code_of(&self, keyword: &str) -> Option<u16> {
        self.values
            .iter()
            .skip(1)
            .position(|v| *v == keyword)
            .map(|i| i as u16 + 1)
    }

    pub fn keyword(&self, code: u16) -> Option<&'static str> {
        match code {
            0 => None,
            _ => self.values.get(code as usize).copied(),
        }
    }

    pub fn is_valid(&self, code: u16) -> bool {
        self.keyword(code).is_some()
    }
}

/// Declared kind of a scalar attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    Number,
    Boolean,
    Matrix,
    Length,
    Enumeration(&'static EnumTable),
    /// `auto` or an angle (marker `orient`)
    Orient,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Matrix => "matrix",
            Self::Length => "length",
            Self::Enumeration(_) => "enumeration",
            Self::Orient => "orient",
        }
    }

    /// Reject values of another kind and out-of-range enumeration codes
    pub fn check(&self, value: &AttrValue) -> LiveResult<()> {
        match (self, value) {
            (Self::Number, AttrValue::Number(_))
            | (Self::Boolean, AttrValue::Boolean(_))
            | (Self::Matrix, AttrValue::Matrix(_))
            | (Self::Length, AttrValue::Length(_))
            | (Self::Orient, AttrValue::Orient(_)) => Ok(()),
            (Self::Enumeration(table), AttrValue::Enumeration(code)) => {
                if table.is_valid(*code) {
                    Ok(())
                } else {
                    Err(LiveError::InvalidEnumerationValue { name: table.name, code: *code })
                }
            }
            _ => Err(LiveError::TypeMismatch {
                expected: self.name(),
                found: value.kind_name(),
            }),
        }
    }

    /// Parse an attribute string into a value of this kind
    pub fn parse(&self, text: &str) -> Result<AttrValue, ParseError> {
        Ok(match self {
            Self::Number => AttrValue::Number(parser::parse_number(text)?),
            Self::Boolean => AttrValue::Boolean(parser::parse_boolean(text)?),
            Self::Matrix => AttrValue::Matrix(parser::parse_matrix(text)?),
            Self::Length => AttrValue::Length(parser::parse_length(text)?),
            Self::Orient => AttrValue::Orient(parser::parse_orient(text)?),
            Self::Enumeration(table) => {
                let keyword = text.trim();
                let code = table.code_of(keyword).ok_or_else(|| {
                    ParseError::new(0, format!("unknown {} value '{}'", table.name, keyword))
                })?;
                AttrValue::Enumeration(code)
            }
        })
    }

    /// Serialize a value already checked against this kind
    pub fn write(&self, value: &AttrValue, out: &mut String, config: &Config) {
        match value {
            AttrValue::Number(n) => config.write_number(out, *n),
            AttrValue::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            AttrValue::Matrix(m) => crate::Transform::Matrix(*m).write(out, config),
            AttrValue::Length(l) => l.write(out, config),
            AttrValue::Orient(o) => o.write(out, config),
            AttrValue::Enumeration(code) => {
                if let Self::Enumeration(table) = self {
                    out.push_str(table.keyword(*code).unwrap_or(""));
                }
            }
        }
    }
}

/// Scalar attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue {
    Number(f32),
    Boolean(bool),
    Matrix(Matrix),
    Enumeration(u16),
    Length(Length),
    Orient(Orient),
}

impl AttrValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Matrix(_) => "matrix",
            Self::Enumeration(_) => "enumeration",
            Self::Length(_) => "length",
            Self::Orient(_) => "orient",
        }
    }
}

/// One scalar value with its cached string form
#[derive(Debug)]
pub struct ValueCell {
    kind: ValueKind,
    value: AttrValue,
    cached: RefCell<Option<String>>,
    config: Config,
}

impl ValueCell {
    pub fn new(kind: ValueKind, value: AttrValue, config: Config) -> LiveResult<Self> {
        kind.check(&value)?;
        Ok(Self {
            kind,
            value,
            cached: RefCell::new(None),
            config,
        })
    }

    /// Parse a cell from an attribute string
    pub fn parse(kind: ValueKind, text: &str, config: Config) -> Result<Self, ParseError> {
        let value = kind.parse(text)?;
        Ok(Self {
            kind,
            value,
            // Not cached: the canonical form may differ from the input
            cached: RefCell::new(None),
            config,
        })
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn value(&self) -> AttrValue {
        self.value
    }

    /// Canonical string form, recomputed only after a mutation
    pub fn get_string(&self) -> String {
        if let Some(cached) = self.cached.borrow().as_ref() {
            return cached.clone();
        }
        let mut out = String::new();
        self.kind.write(&self.value, &mut out, &self.config);
        *self.cached.borrow_mut() = Some(out.clone());
        out
    }

    pub fn is_cached(&self) -> bool {
        self.cached.borrow().is_some()
    }

    /// Assign a new value; rejected values leave the cell unchanged
    pub fn set_value(&mut self, value: AttrValue) -> LiveResult<()> {
        self.kind.check(&value)?;
        self.value = value;
        *self.cached.get_mut() = None;
        Ok(())
    }

    /// Replace the value from a string; on failure the cell is unchanged
    pub fn set_from_str(&mut self, text: &str) -> Result<(), ParseError> {
        let value = self.kind.parse(text)?;
        self.value = value;
        *self.cached.get_mut() = None;
        Ok(())
    }
}
