//! Attribute grammars
//!
//! List grammars report their items through the [`ListHandler`] callback
//! protocol: one `start_list`, any number of `item`, one `end_list`. The
//! handler decides when the staged items become visible.

mod path;
mod scanner;
mod transform;

pub use path::{NormalizedPathParser, PathSegListParser};
pub use transform::TransformListParser;

pub(crate) use scanner::Scanner;

use crate::error::ParseError;
use crate::list::{ItemValue, Point};
use crate::transform::consolidate;
use crate::{Length, Matrix, Orient};

/// Receives the items of a list as they are parsed
pub trait ListHandler {
    fn start_list(&mut self);

    /// A newly parsed item; returning an error aborts the parse
    fn item(&mut self, value: ItemValue) -> Result<(), ParseError>;

    fn end_list(&mut self);
}

/// Grammar for one list-valued attribute kind
pub trait ListParser {
    fn parse(&self, text: &str, handler: &mut dyn ListHandler) -> Result<(), ParseError>;
}

/// Whitespace/comma separated numbers
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberListParser;

impl ListParser for NumberListParser {
    fn parse(&self, text: &str, handler: &mut dyn ListHandler) -> Result<(), ParseError> {
        let mut s = Scanner::new(text);
        handler.start_list();
        s.skip_whitespace();
        while !s.at_end() {
            handler.item(ItemValue::Number(s.number()?))?;
            s.list_separator()?;
        }
        handler.end_list();
        Ok(())
    }
}

/// Whitespace/comma separated lengths
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthListParser;

impl ListParser for LengthListParser {
    fn parse(&self, text: &str, handler: &mut dyn ListHandler) -> Result<(), ParseError> {
        let mut s = Scanner::new(text);
        handler.start_list();
        s.skip_whitespace();
        while !s.at_end() {
            handler.item(ItemValue::Length(s.length()?))?;
            s.list_separator()?;
        }
        handler.end_list();
        Ok(())
    }
}

/// Coordinate pairs of a `points` attribute
#[derive(Debug, Clone, Copy, Default)]
pub struct PointsParser;

impl ListParser for PointsParser {
    fn parse(&self, text: &str, handler: &mut dyn ListHandler) -> Result<(), ParseError> {
        let mut s = Scanner::new(text);
        handler.start_list();
        s.skip_whitespace();
        while !s.at_end() {
            let x = s.number()?;
            s.skip_comma_whitespace();
            if s.at_end() {
                return Err(s.error("odd number of coordinates"));
            }
            let y = s.number()?;
            handler.item(ItemValue::Point(Point::new(x, y)))?;
            s.list_separator()?;
        }
        handler.end_list();
        Ok(())
    }
}

/// Parse a whole string with `f`, allowing surrounding whitespace only
fn parse_whole<'a, T>(
    text: &'a str,
    f: impl FnOnce(&mut Scanner<'a>) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    let mut s = Scanner::new(text);
    s.skip_whitespace();
    let value = f(&mut s)?;
    s.skip_whitespace();
    if !s.at_end() {
        return Err(s.error("unexpected trailing content"));
    }
    Ok(value)
}

pub fn parse_number(text: &str) -> Result<f32, ParseError> {
    parse_whole(text, Scanner::number)
}

pub fn parse_length(text: &str) -> Result<Length, ParseError> {
    parse_whole(text, Scanner::length)
}

pub fn parse_boolean(text: &str) -> Result<bool, ParseError> {
    match text.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(ParseError::new(0, format!("expected 'true' or 'false', found '{}'", other))),
    }
}

/// `auto` or an angle
pub fn parse_orient(text: &str) -> Result<Orient, ParseError> {
    if text.trim() == Orient::AUTO_KEYWORD {
        return Ok(Orient::Auto);
    }
    parse_whole(text, Scanner::angle).map(Orient::Angle)
}

/// A transform list collapsed into one matrix
pub fn parse_matrix(text: &str) -> Result<Matrix, ParseError> {
    let mut collector = Collector::default();
    TransformListParser.parse(text, &mut collector)?;
    let transforms: Vec<_> = collector
        .items
        .into_iter()
        .filter_map(|v| match v {
            ItemValue::Transform(t) => Some(t),
            _ => None,
        })
        .collect();
    Ok(consolidate(&transforms))
}

/// Handler that keeps every item it is given
#[derive(Debug, Default)]
pub struct Collector {
    pub items: Vec<ItemValue>,
}

impl ListHandler for Collector {
    fn start_list(&mut self) {
        self.items.clear();
    }

    fn item(&mut self, value: ItemValue) -> Result<(), ParseError> {
        self.items.push(value);
        Ok(())
    }

    fn end_list(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Angle, AngleUnit, LengthUnit};

    fn collect(parser: &dyn ListParser, text: &str) -> Result<Vec<ItemValue>, ParseError> {
        let mut collector = Collector::default();
        parser.parse(text, &mut collector)?;
        Ok(collector.items)
    }

    #[test]
    fn test_number_list() {
        let items = collect(&NumberListParser, " 1, 2.5 -3 ").unwrap();
        assert_eq!(
            items,
            vec![ItemValue::Number(1.0), ItemValue::Number(2.5), ItemValue::Number(-3.0)]
        );
        assert!(collect(&NumberListParser, "").unwrap().is_empty());
        assert!(collect(&NumberListParser, "1,").is_err());
        assert!(collect(&NumberListParser, "1,,2").is_err());
    }

    #[test]
    fn test_length_list() {
        let items = collect(&LengthListParser, "10px 5% 2").unwrap();
        assert_eq!(
            items,
            vec![
                ItemValue::Length(Length::px(10.0)),
                ItemValue::Length(Length::percent(5.0)),
                ItemValue::Length(Length::new(2.0, LengthUnit::Number)),
            ]
        );
    }

    #[test]
    fn test_points() {
        let items = collect(&PointsParser, "0,0 10,20\n30 40").unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], ItemValue::Point(Point::new(30.0, 40.0)));

        let err = collect(&PointsParser, "1,2 3").unwrap_err();
        assert_eq!(err.message, "odd number of coordinates");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_number(" 4.25 ").unwrap(), 4.25);
        assert!(parse_number("4 5").is_err());
        assert_eq!(parse_length("3mm").unwrap(), Length::new(3.0, LengthUnit::Mm));
        assert!(parse_boolean("yes").is_err());
        assert_eq!(parse_matrix("scale(2)").unwrap(), Matrix::scale(2.0, 2.0));
        assert!(parse_matrix("").unwrap().is_identity());
    }

    #[test]
    fn test_orient() {
        assert_eq!(parse_orient(" auto ").unwrap(), Orient::Auto);
        assert_eq!(parse_orient("45deg").unwrap(), Orient::Angle(Angle::deg(45.0)));
        assert_eq!(
            parse_orient("-10").unwrap(),
            Orient::Angle(Angle::new(-10.0, AngleUnit::Unspecified))
        );
        assert!(parse_orient("Auto").is_err());
        assert!(parse_orient("auto 5").is_err());
        assert!(parse_orient("").is_err());
    }

    #[test]
    fn test_handler_sees_bracketed_calls() {
        #[derive(Default)]
        struct Trace(Vec<&'static str>);

        impl ListHandler for Trace {
            fn start_list(&mut self) {
                self.0.push("start");
            }
            fn item(&mut self, _: ItemValue) -> Result<(), ParseError> {
                self.0.push("item");
                Ok(())
            }
            fn end_list(&mut self) {
                self.0.push("end");
            }
        }

        let mut trace = Trace::default();
        NumberListParser.parse("1 2", &mut trace).unwrap();
        assert_eq!(trace.0, vec!["start", "item", "item", "end"]);
    }
}
