//! Path data grammar
//!
//! `svg-path: wsp* (moveto (wsp* drawto)*)? wsp*`
//!
//! A command letter may be followed by several argument groups; each extra
//! group repeats the command, except after a moveto where it is a lineto.

use super::{ListHandler, ListParser, Scanner};
use crate::error::ParseError;
use crate::list::ItemValue;
use crate::path::{Normalizer, PathCommand, PathSeg};

/// Path segments as written in a `d` attribute
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSegListParser;

impl ListParser for PathSegListParser {
    fn parse(&self, text: &str, handler: &mut dyn ListHandler) -> Result<(), ParseError> {
        let mut s = Scanner::new(text);
        handler.start_list();
        s.skip_whitespace();

        let mut previous: Option<(PathCommand, bool)> = None;
        while !s.at_end() {
            let explicit = s.peek().and_then(PathCommand::from_letter);
            let (command, relative) = match (explicit, previous) {
                (Some(letter), _) => {
                    s.bump();
                    s.skip_whitespace();
                    letter
                }
                (None, Some((PathCommand::ClosePath, _)) | None) => {
                    return Err(s.error("expected path command"));
                }
                (None, Some((PathCommand::MoveTo, relative))) => (PathCommand::LineTo, relative),
                (None, Some(repeat)) => repeat,
            };
            if previous.is_none() && command != PathCommand::MoveTo {
                return Err(s.error("path must start with a moveto"));
            }

            let seg = segment(&mut s, command, relative)?;
            handler.item(ItemValue::PathSeg(seg))?;
            previous = Some((command, relative));

            if s.skip_comma_whitespace()
                && (s.at_end() || s.peek().and_then(PathCommand::from_letter).is_some())
            {
                return Err(s.error("unexpected ','"));
            }
        }
        handler.end_list();
        Ok(())
    }
}

fn segment(s: &mut Scanner<'_>, command: PathCommand, relative: bool) -> Result<PathSeg, ParseError> {
    let mut args = [0.0f32; 7];
    let arity = command.arity();
    for (i, arg) in args.iter_mut().take(arity).enumerate() {
        if i > 0 {
            s.skip_comma_whitespace();
        }
        *arg = if command == PathCommand::Arc && (i == 3 || i == 4) {
            if s.flag()? { 1.0 } else { 0.0 }
        } else {
            s.number()?
        };
    }
    PathSeg::new(command, relative, &args[..arity]).ok_or_else(|| s.error("invalid path segment"))
}

/// Path data rewritten to absolute `M`, `L`, `C` and `Z` segments
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedPathParser;

impl ListParser for NormalizedPathParser {
    fn parse(&self, text: &str, handler: &mut dyn ListHandler) -> Result<(), ParseError> {
        PathSegListParser.parse(text, &mut Normalizer::new(handler))
    }
}
