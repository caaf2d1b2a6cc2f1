//! Transform list grammar
//!
//! `transform-list: wsp* (transform (comma-wsp+ transform)*)? wsp*`

use super::{ListHandler, ListParser, Scanner};
use crate::error::ParseError;
use crate::list::ItemValue;
use crate::Transform;

/// Longest argument list (`matrix`)
const MAX_ARGS: usize = 6;

/// `matrix(...) translate(...) scale(...) rotate(...) skewX(...) skewY(...)`
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformListParser;

impl ListParser for TransformListParser {
    fn parse(&self, text: &str, handler: &mut dyn ListHandler) -> Result<(), ParseError> {
        let mut s = Scanner::new(text);
        handler.start_list();
        s.skip_whitespace();
        while !s.at_end() {
            let transform = parse_transform(&mut s)?;
            handler.item(ItemValue::Transform(transform))?;
            s.list_separator()?;
        }
        handler.end_list();
        Ok(())
    }
}

fn parse_transform(s: &mut Scanner<'_>) -> Result<Transform, ParseError> {
    let start = s.position();
    let name = s.identifier();
    if name.is_empty() {
        return Err(s.error("expected transform name"));
    }
    s.skip_whitespace();
    s.expect(b'(')?;
    s.skip_whitespace();

    let mut args = [0.0f32; MAX_ARGS];
    let mut count = 0;
    while !s.consume(b')') {
        if count == MAX_ARGS {
            return Err(s.error(format!("too many arguments for {}", name)));
        }
        args[count] = s.number()?;
        count += 1;
        if s.skip_comma_whitespace() && s.peek() == Some(b')') {
            return Err(s.error("expected number after ','"));
        }
    }

    Transform::from_args(name, &args[..count]).ok_or_else(|| {
        ParseError::new(start, format!("invalid transform {}() with {} arguments", name, count))
    })
}
