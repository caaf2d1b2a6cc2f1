//! fOS SVG - Live attribute values
//!
//! Keeps the typed, mutable model of an SVG attribute in sync with the
//! attribute string stored on its element, and layers animation overlays
//! on top without touching the persisted string.
//!
//! - [`ValueCell`] / [`ItemList`]: cached serialization of scalar and list values
//! - [`LiveValue`]: string ⇄ model synchronization for one attribute
//! - [`AnimatedLiveValue`]: animation overlay with additive composition
//! - [`SvgElement`]: attribute storage and the per-element live value registry

mod angle;
mod animated;
mod catalog;
mod config;
mod element;
mod error;
mod events;
mod generation;
mod length;
mod list;
mod live;
mod matrix;
pub mod parser;
mod path;
mod transform;
mod value;

pub use angle::{Angle, AngleUnit, Orient};
pub use animated::{AnimatableValue, AnimatedAttributeListener, AnimatedLiveValue};
pub use catalog::{effective_additive, TraitCatalog, TraitInfo, TraitTable, TraitType};
pub use config::Config;
pub use element::{AttributeStore, SvgElement};
pub use error::{LiveError, LiveResult, ParseError};
pub use events::AttrObserver;
pub use generation::Generation;
pub use length::{Length, LengthUnit};
pub use list::{ItemKind, ItemList, ItemValue, ListItem, ListKind, Point};
pub use live::{BaseValue, LiveValue, ModelKind, SyncState};
pub use matrix::Matrix;
pub use path::{Normalizer, PathCommand, PathSeg};
pub use transform::Transform;
pub use value::{AttrValue, EnumTable, ValueCell, ValueKind};

use std::fmt;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SVG namespace URI
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// XLink namespace URI
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Attribute identity: optional namespace URI plus local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrName {
    pub namespace: Option<Box<str>>,
    pub local: Box<str>,
}

impl AttrName {
    /// Attribute in no namespace
    pub fn local(local: &str) -> Self {
        Self { namespace: None, local: local.into() }
    }

    /// Namespaced attribute
    pub fn namespaced(namespace: &str, local: &str) -> Self {
        Self { namespace: Some(namespace.into()), local: local.into() }
    }

    /// Build from an optional namespace
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self { namespace: namespace.map(Into::into), local: local.into() }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(&self.local),
        }
    }
}
