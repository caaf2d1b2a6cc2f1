//! List items
//!
//! A [`ListItem`] is a shared handle: the owning list and any caller that
//! fetched the item see the same value. The item keeps a weak back-reference
//! to its owning list so that a mutation can be pushed up to the attribute.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::{ItemList, ListShared};
use crate::error::{LiveError, LiveResult};
use crate::{Config, Length, PathSeg, Transform};

/// 2D point of a `points` list
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Variant stored in a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Number,
    Length,
    Point,
    Transform,
    PathSeg,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Length => "length",
            Self::Point => "point",
            Self::Transform => "transform",
            Self::PathSeg => "path segment",
        }
    }
}

/// Value held by a list item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemValue {
    Number(f32),
    Length(Length),
    Point(Point),
    Transform(Transform),
    PathSeg(PathSeg),
}

impl ItemValue {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Number(_) => ItemKind::Number,
            Self::Length(_) => ItemKind::Length,
            Self::Point(_) => ItemKind::Point,
            Self::Transform(_) => ItemKind::Transform,
            Self::PathSeg(_) => ItemKind::PathSeg,
        }
    }

    pub fn write(&self, out: &mut String, config: &Config) {
        match self {
            Self::Number(n) => config.write_number(out, *n),
            Self::Length(l) => l.write(out, config),
            Self::Point(p) => {
                config.write_number(out, p.x);
                out.push(config.coordinate_separator);
                config.write_number(out, p.y);
            }
            Self::Transform(t) => t.write(out, config),
            Self::PathSeg(seg) => seg.write(out, config),
        }
    }
}

pub(super) struct ItemInner {
    value: RefCell<ItemValue>,
    cached: RefCell<Option<String>>,
    owner: RefCell<Weak<ListShared>>,
    serializations: Cell<u64>,
}

/// Shared handle to one list item
#[derive(Clone)]
pub struct ListItem {
    pub(super) inner: Rc<ItemInner>,
}

impl ListItem {
    /// Create a detached item
    pub fn new(value: ItemValue) -> Self {
        Self {
            inner: Rc::new(ItemInner {
                value: RefCell::new(value),
                cached: RefCell::new(None),
                owner: RefCell::new(Weak::new()),
                serializations: Cell::new(0),
            }),
        }
    }

    pub fn value(&self) -> ItemValue {
        *self.inner.value.borrow()
    }

    pub fn kind(&self) -> ItemKind {
        self.inner.value.borrow().kind()
    }

    /// Replace the value; the kind cannot change.
    ///
    /// When attached, the owning list and its attribute are updated.
    pub fn set(&self, value: ItemValue) -> LiveResult<()> {
        let current = self.kind();
        if value.kind() != current {
            return Err(LiveError::TypeMismatch {
                expected: current.name(),
                found: value.kind().name(),
            });
        }

        // Pick up pending attribute changes first; a reparse detaches this item
        if let Some(list) = self.owner() {
            list.revalidate()?;
        }

        *self.inner.value.borrow_mut() = value;
        self.reset_attribute();
        Ok(())
    }

    /// Canonical string form, recomputed only after a mutation
    pub fn get_string(&self) -> String {
        let config = self
            .inner
            .owner
            .borrow()
            .upgrade()
            .map(|list| list.config)
            .unwrap_or_default();
        self.string_with(&config)
    }

    pub(super) fn string_with(&self, config: &Config) -> String {
        if let Some(cached) = self.inner.cached.borrow().as_ref() {
            return cached.clone();
        }
        let mut out = String::new();
        self.inner.value.borrow().write(&mut out, config);
        self.inner.serializations.set(self.inner.serializations.get() + 1);
        *self.inner.cached.borrow_mut() = Some(out.clone());
        out
    }

    pub fn is_cached(&self) -> bool {
        self.inner.cached.borrow().is_some()
    }

    /// Number of times the string form was recomputed
    pub fn serialization_count(&self) -> u64 {
        self.inner.serializations.get()
    }

    /// Owning list, if attached
    pub fn owner(&self) -> Option<ItemList> {
        self.inner
            .owner
            .borrow()
            .upgrade()
            .map(|shared| ItemList { shared })
    }

    pub fn is_attached(&self) -> bool {
        self.inner.owner.borrow().strong_count() > 0
    }

    /// Same underlying item
    pub fn ptr_eq(&self, other: &ListItem) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(super) fn owned_by(&self, list: &Rc<ListShared>) -> bool {
        std::ptr::eq(self.inner.owner.borrow().as_ptr(), Rc::as_ptr(list))
    }

    pub(super) fn attach(&self, list: &Rc<ListShared>) {
        *self.inner.owner.borrow_mut() = Rc::downgrade(list);
        // The new owner may format numbers differently
        *self.inner.cached.borrow_mut() = None;
    }

    pub(super) fn detach(&self) {
        *self.inner.owner.borrow_mut() = Weak::new();
    }

    /// Drop the cached string and notify the owning list, if any
    fn reset_attribute(&self) {
        *self.inner.cached.borrow_mut() = None;
        let owner = self.inner.owner.borrow().upgrade();
        if let Some(list) = owner {
            ListShared::item_changed(&list);
        }
    }
}

impl fmt::Debug for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListItem")
            .field("value", &*self.inner.value.borrow())
            .field("attached", &self.is_attached())
            .finish()
    }
}
