//! Animated live values
//!
//! An [`AnimatedLiveValue`] wraps a [`LiveValue`] with an animation overlay.
//! The overlay never reaches the attribute string: readers of the base value
//! keep seeing the persisted model, readers of the current value see the
//! overlay, either replacing the base or composed onto it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::error::{LiveError, LiveResult};
use crate::{
    AttrName, AttrValue, BaseValue, ItemValue, Length, ListKind, LiveValue, Matrix, ModelKind,
    Orient, PathSeg, Point, Transform,
};

/// Value exchanged with the animation engine
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatableValue {
    Number(f32),
    Boolean(bool),
    Matrix(Matrix),
    Enumeration(u16),
    Length(Length),
    Orient(Orient),
    NumberList(Vec<f32>),
    LengthList(Vec<Length>),
    PointList(Vec<Point>),
    TransformList(Vec<Transform>),
    PathSegList(Vec<PathSeg>),
}

impl AnimatableValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Matrix(_) => "matrix",
            Self::Enumeration(_) => "enumeration",
            Self::Length(_) => "length",
            Self::Orient(_) => "orient",
            Self::NumberList(_) => ListKind::Numbers.name(),
            Self::LengthList(_) => ListKind::Lengths.name(),
            Self::PointList(_) => ListKind::Points.name(),
            Self::TransformList(_) => ListKind::Transforms.name(),
            Self::PathSegList(_) => ListKind::PathSegs.name(),
        }
    }

    /// Snapshot of a list's item values
    pub fn from_items(kind: ListKind, items: &[ItemValue]) -> Self {
        match kind {
            ListKind::Numbers => Self::NumberList(
                items.iter().filter_map(|v| match v {
                    ItemValue::Number(n) => Some(*n),
                    _ => None,
                }).collect(),
            ),
            ListKind::Lengths => Self::LengthList(
                items.iter().filter_map(|v| match v {
                    ItemValue::Length(l) => Some(*l),
                    _ => None,
                }).collect(),
            ),
            ListKind::Points => Self::PointList(
                items.iter().filter_map(|v| match v {
                    ItemValue::Point(p) => Some(*p),
                    _ => None,
                }).collect(),
            ),
            ListKind::Transforms => Self::TransformList(
                items.iter().filter_map(|v| match v {
                    ItemValue::Transform(t) => Some(*t),
                    _ => None,
                }).collect(),
            ),
            ListKind::PathSegs | ListKind::NormalizedPathSegs => Self::PathSegList(
                items.iter().filter_map(|v| match v {
                    ItemValue::PathSeg(seg) => Some(*seg),
                    _ => None,
                }).collect(),
            ),
        }
    }

    /// Whether this value can stand in for an attribute of `kind`
    pub fn check(&self, kind: ModelKind) -> LiveResult<()> {
        let scalar = match self {
            Self::Number(n) => Some(AttrValue::Number(*n)),
            Self::Boolean(b) => Some(AttrValue::Boolean(*b)),
            Self::Matrix(m) => Some(AttrValue::Matrix(*m)),
            Self::Enumeration(code) => Some(AttrValue::Enumeration(*code)),
            Self::Length(l) => Some(AttrValue::Length(*l)),
            Self::Orient(o) => Some(AttrValue::Orient(*o)),
            _ => None,
        };
        let matches = match (kind, scalar) {
            (ModelKind::Value(kind), Some(value)) => return kind.check(&value),
            (ModelKind::List(ListKind::Numbers), None) => matches!(self, Self::NumberList(_)),
            (ModelKind::List(ListKind::Lengths), None) => matches!(self, Self::LengthList(_)),
            (ModelKind::List(ListKind::Points), None) => matches!(self, Self::PointList(_)),
            (ModelKind::List(ListKind::Transforms), None) => matches!(self, Self::TransformList(_)),
            (ModelKind::List(ListKind::PathSegs | ListKind::NormalizedPathSegs), None) => {
                matches!(self, Self::PathSegList(_))
            }
            _ => false,
        };
        if matches {
            Ok(())
        } else {
            Err(LiveError::TypeMismatch {
                expected: kind.name(),
                found: self.kind_name(),
            })
        }
    }

    /// `self ⊕ overlay` for additive animation.
    ///
    /// Values without a sum (booleans, enumerations, `auto` orientation,
    /// lists of different lengths, paths with different commands, lengths
    /// in incompatible relative units) yield the overlay.
    pub fn compose(&self, overlay: &AnimatableValue) -> AnimatableValue {
        use AnimatableValue::*;

        match (self, overlay) {
            (Number(a), Number(b)) => Number(a + b),
            (Length(a), Length(b)) => Length(a.add(b).unwrap_or(*b)),
            (Matrix(a), Matrix(b)) => Matrix(a.multiply(b)),
            (Orient(crate::Orient::Angle(a)), Orient(crate::Orient::Angle(b))) => {
                Orient(crate::Orient::Angle(a.add(b)))
            }
            (NumberList(a), NumberList(b)) if a.len() == b.len() => {
                NumberList(a.iter().zip(b).map(|(a, b)| a + b).collect())
            }
            (LengthList(a), LengthList(b)) if a.len() == b.len() => {
                LengthList(a.iter().zip(b).map(|(a, b)| a.add(b).unwrap_or(*b)).collect())
            }
            (PointList(a), PointList(b)) if a.len() == b.len() => PointList(
                a.iter()
                    .zip(b)
                    .map(|(a, b)| Point::new(a.x + b.x, a.y + b.y))
                    .collect(),
            ),
            (PathSegList(a), PathSegList(b)) if a.len() == b.len() => a
                .iter()
                .zip(b)
                .map(|(a, b)| a.add(b))
                .collect::<Option<Vec<_>>>()
                .map_or_else(|| overlay.clone(), PathSegList),
            (TransformList(a), TransformList(b)) => {
                TransformList(a.iter().chain(b).copied().collect())
            }
            _ => overlay.clone(),
        }
    }
}

impl From<AttrValue> for AnimatableValue {
    fn from(value: AttrValue) -> Self {
        match value {
            AttrValue::Number(n) => Self::Number(n),
            AttrValue::Boolean(b) => Self::Boolean(b),
            AttrValue::Matrix(m) => Self::Matrix(m),
            AttrValue::Enumeration(code) => Self::Enumeration(code),
            AttrValue::Length(l) => Self::Length(l),
            AttrValue::Orient(o) => Self::Orient(o),
        }
    }
}

/// Receiver of overlay changes (e.g. a rendering cache)
pub trait AnimatedAttributeListener {
    fn animated_attribute_changed(&self, value: &AnimatedLiveValue) -> anyhow::Result<()>;
}

/// Live value with an animation overlay
pub struct AnimatedLiveValue {
    base: Rc<LiveValue>,
    overlay: RefCell<Option<AnimatableValue>>,
    additive: Cell<bool>,
    listeners: RefCell<Vec<Rc<dyn AnimatedAttributeListener>>>,
    notifying: Cell<bool>,
    /// A change arrived during notification; broadcast once more
    pending: Cell<bool>,
}

impl AnimatedLiveValue {
    pub fn new(base: Rc<LiveValue>) -> Self {
        Self {
            base,
            overlay: RefCell::new(None),
            additive: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
            notifying: Cell::new(false),
            pending: Cell::new(false),
        }
    }

    /// The persisted live value underneath the overlay
    pub fn base(&self) -> &Rc<LiveValue> {
        &self.base
    }

    pub fn name(&self) -> &AttrName {
        self.base.name()
    }

    /// Base value as the animation engine consumes it
    pub fn underlying_value(&self) -> LiveResult<AnimatableValue> {
        Ok(match self.base.base_value()? {
            BaseValue::Value(value) => value.into(),
            BaseValue::List(list) => AnimatableValue::from_items(list.kind(), &list.values()?),
        })
    }

    /// Value presented to readers: base, overlay, or base ⊕ overlay
    pub fn current_value(&self) -> LiveResult<AnimatableValue> {
        let overlay = self.overlay.borrow().clone();
        match overlay {
            None => self.underlying_value(),
            Some(overlay) if self.additive.get() => Ok(self.underlying_value()?.compose(&overlay)),
            Some(overlay) => Ok(overlay),
        }
    }

    pub fn is_animated(&self) -> bool {
        self.overlay.borrow().is_some()
    }

    pub fn is_additive(&self) -> bool {
        self.additive.get()
    }

    pub fn animated_value(&self) -> Option<AnimatableValue> {
        self.overlay.borrow().clone()
    }

    /// Install an overlay and notify listeners
    pub fn set_animated_value(&self, value: AnimatableValue, additive: bool) -> LiveResult<()> {
        value.check(self.base.kind())?;
        tracing::trace!("Animating {} (additive: {})", self.name(), additive);
        *self.overlay.borrow_mut() = Some(value);
        self.additive.set(additive);
        self.notify();
        Ok(())
    }

    /// Drop the overlay and notify listeners
    pub fn clear_animated_value(&self) {
        tracing::trace!("Clearing animation of {}", self.name());
        *self.overlay.borrow_mut() = None;
        self.additive.set(false);
        self.notify();
    }

    pub fn add_listener(&self, listener: Rc<dyn AnimatedAttributeListener>) {
        let mut listeners = self.listeners.borrow_mut();
        if !listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            listeners.push(listener);
        }
    }

    /// Returns whether the listener was registered
    pub fn remove_listener(&self, listener: &Rc<dyn AnimatedAttributeListener>) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| !Rc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn notify(&self) {
        if self.notifying.get() {
            self.pending.set(true);
            return;
        }
        self.notifying.set(true);
        loop {
            self.pending.set(false);
            let listeners = self.listeners.borrow().clone();
            for listener in &listeners {
                if let Err(e) = listener.animated_attribute_changed(self) {
                    tracing::warn!("Animation listener of {} failed: {:#}", self.name(), e);
                }
            }
            if !self.pending.get() {
                break;
            }
        }
        self.notifying.set(false);
    }
}

impl fmt::Debug for AnimatedLiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedLiveValue")
            .field("base", &self.base)
            .field("overlay", &*self.overlay.borrow())
            .field("additive", &self.additive.get())
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
