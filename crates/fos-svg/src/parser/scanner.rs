//! Attribute string scanner
//!
//! Byte-level cursor over SVG microsyntax: numbers, lengths, identifiers
//! and `comma-wsp` separators.

use crate::error::ParseError;
use crate::{Angle, AngleUnit, Length, LengthUnit};

pub(crate) struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.pos, message)
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r' | 0x0C)) {
            self.pos += 1;
        }
    }

    /// Skip `wsp* ,? wsp*`; returns whether a comma was consumed
    pub fn skip_comma_whitespace(&mut self) -> bool {
        self.skip_whitespace();
        let comma = self.consume(b',');
        if comma {
            self.skip_whitespace();
        }
        comma
    }

    /// Step over the current byte
    pub fn bump(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    pub fn consume(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, byte: u8) -> Result<(), ParseError> {
        if self.consume(byte) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// `sign? (digits ('.' digits?)? | '.' digits) exponent?`
    pub fn number(&mut self) -> Result<f32, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut count = self.digits();
        if self.consume(b'.') {
            count += self.digits();
        }
        if count == 0 {
            self.pos = start;
            return Err(self.error("expected number"));
        }

        // An 'e' not followed by digits belongs to a unit such as "em"
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                self.pos = mark;
            }
        }

        let value = self.text[start..self.pos]
            .parse::<f32>()
            .map_err(|_| ParseError::new(start, "invalid number"))?;
        // Overflowing exponents parse as infinity, which has no attribute form
        if !value.is_finite() {
            return Err(ParseError::new(start, "number out of range"));
        }
        Ok(value)
    }

    /// ASCII letters
    pub fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(b'a'..=b'z' | b'A'..=b'Z')) {
            self.pos += 1;
        }
        &self.text[start..self.pos]
    }

    /// Number followed by an optional unit suffix
    pub fn length(&mut self) -> Result<Length, ParseError> {
        let value = self.number()?;
        let unit_start = self.pos;
        let suffix = if self.consume(b'%') { "%" } else { self.identifier() };
        let unit = LengthUnit::from_suffix(suffix)
            .ok_or_else(|| ParseError::new(unit_start, format!("unknown unit '{}'", suffix)))?;
        Ok(Length::new(value, unit))
    }

    /// Number followed by an optional `deg`, `rad` or `grad`
    pub fn angle(&mut self) -> Result<Angle, ParseError> {
        let value = self.number()?;
        let unit_start = self.pos;
        let suffix = self.identifier();
        let unit = AngleUnit::from_suffix(suffix)
            .ok_or_else(|| ParseError::new(unit_start, format!("unknown angle unit '{}'", suffix)))?;
        Ok(Angle::new(value, unit))
    }

    /// Arc flag: a single `0` or `1`, needing no separator after it
    pub fn flag(&mut self) -> Result<bool, ParseError> {
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected arc flag")),
        }
    }

    /// Separator between list entries; a trailing comma is an error
    pub fn list_separator(&mut self) -> Result<(), ParseError> {
        if self.skip_comma_whitespace() && self.at_end() {
            return Err(self.error("trailing comma"));
        }
        Ok(())
    }
}
