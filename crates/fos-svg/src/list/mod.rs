//! Item lists
//!
//! An [`ItemList`] owns an ordered sequence of [`ListItem`]s and caches the
//! joined string form. Item mutations clear the cache and are forwarded to
//! the owning live value, which writes the new string to the element.
//!
//! Rebuilding from a string goes through the [`ListHandler`] protocol: the
//! parser's items are staged and only committed once the whole string has
//! been accepted.

mod item;

pub use item::{ItemKind, ItemValue, ListItem, Point};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{LiveError, LiveResult, ParseError};
use crate::parser::{
    LengthListParser, ListHandler, ListParser, NormalizedPathParser, NumberListParser,
    PathSegListParser, PointsParser, TransformListParser,
};
use crate::transform::consolidate;
use crate::{Config, Matrix, Transform};

/// Grammar of a list-valued attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// e.g. `rotate` on text, `keyTimes`
    Numbers,
    /// e.g. `x`, `dx` on text
    Lengths,
    /// `points` on polyline/polygon
    Points,
    /// `transform`, `gradientTransform`
    Transforms,
    /// `d` on path, as written
    PathSegs,
    /// `d` on path, as absolute `M`, `L`, `C` and `Z` segments
    NormalizedPathSegs,
}

impl ListKind {
    pub fn item_kind(self) -> ItemKind {
        match self {
            Self::Numbers => ItemKind::Number,
            Self::Lengths => ItemKind::Length,
            Self::Points => ItemKind::Point,
            Self::Transforms => ItemKind::Transform,
            Self::PathSegs | Self::NormalizedPathSegs => ItemKind::PathSeg,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Numbers => "number list",
            Self::Lengths => "length list",
            Self::Points => "point list",
            Self::Transforms => "transform list",
            Self::PathSegs => "path segment list",
            Self::NormalizedPathSegs => "normalized path segment list",
        }
    }

    /// Separator written between items
    pub fn separator(self) -> &'static str {
        " "
    }

    /// Grammar parser for this kind
    pub fn parser(self) -> &'static dyn ListParser {
        match self {
            Self::Numbers => &NumberListParser,
            Self::Lengths => &LengthListParser,
            Self::Points => &PointsParser,
            Self::Transforms => &TransformListParser,
            Self::PathSegs => &PathSegListParser,
            Self::NormalizedPathSegs => &NormalizedPathParser,
        }
    }
}

/// Receiver of list change notifications (the live value)
pub(crate) trait ListOwner {
    /// Reparse pending attribute changes before the list is read or mutated
    fn revalidate(&self) -> LiveResult<()>;

    /// An item or the sequence changed
    fn list_changed(&self);
}

pub(crate) struct ListShared {
    kind: ListKind,
    pub(crate) config: Config,
    items: RefCell<Vec<ListItem>>,
    cached: RefCell<Option<String>>,
    serializations: Cell<u64>,
    owner: RefCell<Option<Weak<dyn ListOwner>>>,
}

impl ListShared {
    fn owner(&self) -> Option<Rc<dyn ListOwner>> {
        self.owner.borrow().as_ref().and_then(Weak::upgrade)
    }

    /// Called by an attached item after it changed
    pub(super) fn item_changed(this: &Rc<Self>) {
        ItemList { shared: Rc::clone(this) }.changed();
    }
}

/// Shared handle to an ordered list of items
#[derive(Clone)]
pub struct ItemList {
    shared: Rc<ListShared>,
}

impl ItemList {
    pub fn new(kind: ListKind) -> Self {
        Self::with_config(kind, Config::default())
    }

    pub fn with_config(kind: ListKind, config: Config) -> Self {
        Self {
            shared: Rc::new(ListShared {
                kind,
                config,
                items: RefCell::new(Vec::new()),
                cached: RefCell::new(None),
                serializations: Cell::new(0),
                owner: RefCell::new(None),
            }),
        }
    }

    /// Build a detached list from a string
    pub fn parse(kind: ListKind, text: &str, config: Config) -> LiveResult<Self> {
        let list = Self::with_config(kind, config);
        list.rebuild(text, kind.parser())
            .map_err(|e| LiveError::parse(text, e))?;
        Ok(list)
    }

    pub fn kind(&self) -> ListKind {
        self.shared.kind
    }

    /// Same underlying list
    pub fn ptr_eq(&self, other: &ItemList) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    pub fn len(&self) -> LiveResult<usize> {
        self.revalidate()?;
        Ok(self.shared.items.borrow().len())
    }

    pub fn is_empty(&self) -> LiveResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Joined string form, recomputed only after a change
    pub fn get_string(&self) -> LiveResult<String> {
        self.revalidate()?;
        Ok(self.serialize())
    }

    /// Whether the joined string is currently cached
    pub fn is_cached(&self) -> bool {
        self.shared.cached.borrow().is_some()
    }

    /// Number of times the joined string was recomputed
    pub fn serialization_count(&self) -> u64 {
        self.shared.serializations.get()
    }

    /// Snapshot of the current items
    pub fn items(&self) -> LiveResult<Vec<ListItem>> {
        self.revalidate()?;
        Ok(self.shared.items.borrow().clone())
    }

    /// Snapshot of the current item values
    pub fn values(&self) -> LiveResult<Vec<ItemValue>> {
        self.revalidate()?;
        Ok(self.values_unchecked())
    }

    pub fn clear(&self) -> LiveResult<()> {
        self.revalidate()?;
        let old = std::mem::take(&mut *self.shared.items.borrow_mut());
        for item in &old {
            item.detach();
        }
        self.changed();
        Ok(())
    }

    /// Clear the list and make `item` its only entry
    pub fn initialize(&self, item: ListItem) -> LiveResult<ListItem> {
        self.check_kind(&item)?;
        self.revalidate()?;
        self.release_from_owner(&item)?;
        let old = std::mem::replace(&mut *self.shared.items.borrow_mut(), vec![item.clone()]);
        for old_item in &old {
            old_item.detach();
        }
        item.attach(&self.shared);
        self.changed();
        Ok(item)
    }

    pub fn get_item(&self, index: usize) -> LiveResult<ListItem> {
        self.revalidate()?;
        let items = self.shared.items.borrow();
        items
            .get(index)
            .cloned()
            .ok_or(LiveError::IndexSize { index, len: items.len() })
    }

    /// Insert before `index`; an index past the end appends
    pub fn insert_item_before(&self, item: ListItem, index: usize) -> LiveResult<ListItem> {
        self.check_kind(&item)?;
        self.revalidate()?;
        self.release_from_owner(&item)?;
        {
            let mut items = self.shared.items.borrow_mut();
            let index = index.min(items.len());
            items.insert(index, item.clone());
        }
        item.attach(&self.shared);
        self.changed();
        Ok(item)
    }

    /// Replace the item at `index`, detaching the previous one.
    ///
    /// An item already in this list moves: it leaves its old slot and takes
    /// the place of the item that was at `index`.
    pub fn replace_item(&self, item: ListItem, index: usize) -> LiveResult<ListItem> {
        self.check_kind(&item)?;
        self.revalidate()?;
        self.check_index(index)?;

        let position = self.position_of(&item);
        if position == Some(index) {
            return Ok(item);
        }
        if position.is_none() {
            self.release_from_owner(&item)?;
        }

        let old = {
            let mut items = self.shared.items.borrow_mut();
            let mut index = index;
            if let Some(position) = position {
                items.remove(position);
                if position < index {
                    index -= 1;
                }
            }
            std::mem::replace(&mut items[index], item.clone())
        };
        old.detach();
        item.attach(&self.shared);
        self.changed();
        Ok(item)
    }

    pub fn remove_item(&self, index: usize) -> LiveResult<ListItem> {
        self.revalidate()?;
        self.check_index(index)?;
        let item = self.shared.items.borrow_mut().remove(index);
        item.detach();
        self.changed();
        Ok(item)
    }

    pub fn append_item(&self, item: ListItem) -> LiveResult<ListItem> {
        self.check_kind(&item)?;
        self.revalidate()?;
        self.release_from_owner(&item)?;
        self.shared.items.borrow_mut().push(item.clone());
        item.attach(&self.shared);
        self.changed();
        Ok(item)
    }

    /// Replace the contents from a string; on failure the list is unchanged
    pub fn set_value_as_string(&self, text: &str) -> LiveResult<()> {
        self.set_value_with(text, self.kind().parser())
    }

    /// Same as [`set_value_as_string`](Self::set_value_as_string) with an explicit grammar.
    ///
    /// Replaces the whole list, so a pending malformed attribute is not reparsed.
    pub fn set_value_with(&self, text: &str, parser: &dyn ListParser) -> LiveResult<()> {
        self.rebuild(text, parser)
            .map_err(|e| LiveError::parse(text, e))?;
        self.changed();
        Ok(())
    }

    /// Product of all transforms (identity when empty)
    pub fn to_matrix(&self) -> LiveResult<Matrix> {
        Ok(consolidate(&self.transforms()?))
    }

    /// Replace a transform list by a single `matrix(...)` item
    pub fn consolidate(&self) -> LiveResult<Option<ListItem>> {
        let transforms = self.transforms()?;
        if transforms.is_empty() {
            return Ok(None);
        }
        let item = ListItem::new(ItemValue::Transform(Transform::Matrix(consolidate(&transforms))));
        self.initialize(item).map(Some)
    }

    fn transforms(&self) -> LiveResult<Vec<Transform>> {
        if self.kind() != ListKind::Transforms {
            return Err(LiveError::TypeMismatch {
                expected: ListKind::Transforms.name(),
                found: self.kind().name(),
            });
        }
        Ok(self
            .values()?
            .into_iter()
            .filter_map(|v| match v {
                ItemValue::Transform(t) => Some(t),
                _ => None,
            })
            .collect())
    }

    pub(crate) fn set_owner(&self, owner: Weak<dyn ListOwner>) {
        *self.shared.owner.borrow_mut() = Some(owner);
    }

    /// Joined string without revalidating
    pub(crate) fn serialize(&self) -> String {
        if let Some(cached) = self.shared.cached.borrow().as_ref() {
            return cached.clone();
        }
        let config = self.shared.config;
        let separator = self.kind().separator();
        let mut out = String::new();
        for (i, item) in self.shared.items.borrow().iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(&item.string_with(&config));
        }
        self.shared.serializations.set(self.shared.serializations.get() + 1);
        *self.shared.cached.borrow_mut() = Some(out.clone());
        out
    }

    pub(crate) fn values_unchecked(&self) -> Vec<ItemValue> {
        self.shared.items.borrow().iter().map(ListItem::value).collect()
    }

    /// Parse `text` and swap the result in.
    ///
    /// Does not notify the owner: used by the owner itself when reparsing.
    pub(crate) fn rebuild(&self, text: &str, parser: &dyn ListParser) -> Result<(), ParseError> {
        let mut builder = ListBuilder::new(self.kind());
        parser.parse(text, &mut builder)?;
        let staged = builder.finish()?;

        let fresh: Vec<ListItem> = staged.into_iter().map(ListItem::new).collect();
        for item in &fresh {
            item.attach(&self.shared);
        }
        let old = std::mem::replace(&mut *self.shared.items.borrow_mut(), fresh);
        for item in &old {
            item.detach();
        }
        *self.shared.cached.borrow_mut() = None;
        Ok(())
    }

    /// Clear the cache and forward the change to the owner
    fn changed(&self) {
        *self.shared.cached.borrow_mut() = None;
        if let Some(owner) = self.shared.owner() {
            owner.list_changed();
        }
    }

    fn revalidate(&self) -> LiveResult<()> {
        match self.shared.owner() {
            Some(owner) => owner.revalidate(),
            None => Ok(()),
        }
    }

    fn check_kind(&self, item: &ListItem) -> LiveResult<()> {
        let expected = self.kind().item_kind();
        let found = item.kind();
        if expected == found {
            Ok(())
        } else {
            Err(LiveError::TypeMismatch {
                expected: expected.name(),
                found: found.name(),
            })
        }
    }

    fn position_of(&self, item: &ListItem) -> Option<usize> {
        self.shared.items.borrow().iter().position(|other| other.ptr_eq(item))
    }

    fn check_index(&self, index: usize) -> LiveResult<()> {
        let len = self.shared.items.borrow().len();
        if index < len {
            Ok(())
        } else {
            Err(LiveError::IndexSize { index, len })
        }
    }

    /// Remove `item` from whichever list currently owns it (this one included)
    fn release_from_owner(&self, item: &ListItem) -> LiveResult<()> {
        let Some(previous) = item.owner() else {
            return Ok(());
        };
        if !previous.ptr_eq(self) {
            previous.revalidate()?;
        }
        // The item may have been dropped from `previous` by the revalidation
        if !item.owned_by(&previous.shared) {
            return Ok(());
        }
        let removed = {
            let mut items = previous.shared.items.borrow_mut();
            let before = items.len();
            items.retain(|other| !other.ptr_eq(item));
            items.len() != before
        };
        item.detach();
        // Moving within this list: the caller reports the change once
        if removed && !previous.ptr_eq(self) {
            previous.changed();
        }
        Ok(())
    }
}

impl fmt::Debug for ItemList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemList")
            .field("kind", &self.shared.kind)
            .field("items", &*self.shared.items.borrow())
            .field("cached", &self.is_cached())
            .finish()
    }
}

/// Stages parser output until the whole string has been accepted
struct ListBuilder {
    kind: ListKind,
    items: Vec<ItemValue>,
    started: bool,
    ended: bool,
}

impl ListBuilder {
    fn new(kind: ListKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            started: false,
            ended: false,
        }
    }

    fn finish(self) -> Result<Vec<ItemValue>, ParseError> {
        if self.started && self.ended {
            Ok(self.items)
        } else {
            Err(ParseError::new(0, "parser did not complete the list"))
        }
    }
}

impl ListHandler for ListBuilder {
    fn start_list(&mut self) {
        self.started = true;
        self.ended = false;
        self.items.clear();
    }

    fn item(&mut self, value: ItemValue) -> Result<(), ParseError> {
        let expected = self.kind.item_kind();
        if value.kind() != expected {
            return Err(ParseError::new(
                0,
                format!("expected {} item, found {}", expected.name(), value.kind().name()),
            ));
        }
        self.items.push(value);
        Ok(())
    }

    fn end_list(&mut self) {
        self.ended = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathSeg;

    fn points(text: &str) -> ItemList {
        ItemList::parse(ListKind::Points, text, Config::default()).unwrap()
    }

    #[test]
    fn test_idempotent_caching() {
        let list = points("1,2 3,4 5,6");
        let first = list.get_string().unwrap();
        let second = list.get_string().unwrap();
        assert_eq!(first, "1,2 3,4 5,6");
        assert_eq!(first, second);
        assert_eq!(list.serialization_count(), 1);
    }

    #[test]
    fn test_item_mutation_invalidates_list() {
        let list = points("1,2 3,4 5,6");
        list.get_string().unwrap();
        let item = list.get_item(1).unwrap();

        item.set(ItemValue::Point(Point::new(30.0, 40.0))).unwrap();
        assert!(!list.is_cached());
        assert!(list.get_item(0).unwrap().is_cached());
        assert!(!item.is_cached());
        assert_eq!(list.get_string().unwrap(), "1,2 30,40 5,6");
        assert_eq!(list.serialization_count(), 2);
    }

    #[test]
    fn test_list_operations() {
        let list = ItemList::new(ListKind::Numbers);
        list.append_item(ListItem::new(ItemValue::Number(1.0))).unwrap();
        list.append_item(ListItem::new(ItemValue::Number(3.0))).unwrap();
        list.insert_item_before(ListItem::new(ItemValue::Number(2.0)), 1).unwrap();
        list.insert_item_before(ListItem::new(ItemValue::Number(4.0)), 99).unwrap();
        assert_eq!(list.get_string().unwrap(), "1 2 3 4");

        let removed = list.remove_item(0).unwrap();
        assert!(!removed.is_attached());
        list.replace_item(ListItem::new(ItemValue::Number(9.0)), 2).unwrap();
        assert_eq!(list.get_string().unwrap(), "2 3 9");

        let only = list.initialize(ListItem::new(ItemValue::Number(7.0))).unwrap();
        assert!(only.is_attached());
        assert_eq!(list.len().unwrap(), 1);

        list.clear().unwrap();
        assert!(list.is_empty().unwrap());
        assert!(!only.is_attached());
        assert_eq!(list.get_string().unwrap(), "");
    }

    #[test]
    fn test_index_errors() {
        let list = points("1,1");
        assert_eq!(list.get_item(1).unwrap_err(), LiveError::IndexSize { index: 1, len: 1 });
        assert!(list.remove_item(5).is_err());
        assert!(list.replace_item(ListItem::new(ItemValue::Point(Point::default())), 1).is_err());
        assert_eq!(list.len().unwrap(), 1);
    }

    #[test]
    fn test_wrong_item_kind_rejected() {
        let list = points("1,1");
        let err = list.append_item(ListItem::new(ItemValue::Number(1.0))).unwrap_err();
        assert_eq!(err, LiveError::TypeMismatch { expected: "point", found: "number" });
    }

    #[test]
    fn test_move_between_lists() {
        let a = points("1,1 2,2");
        let b = points("9,9");
        let moved = a.get_item(0).unwrap();

        b.append_item(moved.clone()).unwrap();

        assert_eq!(a.len().unwrap(), 1);
        assert_eq!(a.get_string().unwrap(), "2,2");
        assert_eq!(b.get_string().unwrap(), "9,9 1,1");
        assert!(moved.owner().unwrap().ptr_eq(&b));
        assert!(!a.items().unwrap().iter().any(|i| i.ptr_eq(&moved)));
    }

    #[test]
    fn test_reinsert_within_same_list() {
        let list = points("1,1 2,2 3,3");
        let first = list.get_item(0).unwrap();
        list.append_item(first).unwrap();
        assert_eq!(list.get_string().unwrap(), "2,2 3,3 1,1");
    }

    #[test]
    fn test_replace_within_same_list() {
        let list = points("1,1 2,2 3,3");
        let last = list.get_item(2).unwrap();

        // Replacing an item by itself is a no-op
        list.replace_item(last.clone(), 2).unwrap();
        assert_eq!(list.get_string().unwrap(), "1,1 2,2 3,3");
        assert!(last.is_attached());

        // Later item over an earlier slot
        list.replace_item(last.clone(), 0).unwrap();
        assert_eq!(list.get_string().unwrap(), "3,3 2,2");

        // Earlier item over a later slot
        let list = points("1,1 2,2 3,3");
        let first = list.get_item(0).unwrap();
        let replaced = list.get_item(2).unwrap();
        list.replace_item(first.clone(), 2).unwrap();
        assert_eq!(list.get_string().unwrap(), "2,2 1,1");
        assert!(first.is_attached());
        assert!(!replaced.is_attached());
    }

    #[test]
    fn test_rejected_replace_leaves_list_alone() {
        let list = points("1,1 2,2");
        let first = list.get_item(0).unwrap();
        list.get_string().unwrap();

        let err = list.replace_item(first.clone(), 2).unwrap_err();
        assert_eq!(err, LiveError::IndexSize { index: 2, len: 2 });
        assert!(first.is_attached());
        assert!(list.is_cached());
        assert_eq!(list.len().unwrap(), 2);
        assert_eq!(list.get_string().unwrap(), "1,1 2,2");
    }

    #[test]
    fn test_failed_rebuild_keeps_contents() {
        let list = points("1,2 3,4");
        let before = list.items().unwrap();

        let err = list.set_value_as_string("5,6 7").unwrap_err();
        assert!(matches!(err, LiveError::Parse { .. }));
        assert_eq!(list.get_string().unwrap(), "1,2 3,4");
        assert!(before.iter().all(ListItem::is_attached));
    }

    #[test]
    fn test_rebuild_detaches_old_items() {
        let list = points("1,2");
        let old = list.get_item(0).unwrap();
        list.set_value_as_string("3,4 5,6").unwrap();
        assert!(!old.is_attached());

        // Detached mutation leaves the list alone
        old.set(ItemValue::Point(Point::new(0.0, 0.0))).unwrap();
        assert_eq!(list.get_string().unwrap(), "3,4 5,6");
    }

    #[test]
    fn test_consolidate_transforms() {
        let list = ItemList::parse(ListKind::Transforms, "translate(10) scale(2)", Config::default()).unwrap();
        let matrix = list.to_matrix().unwrap();
        assert_eq!(matrix.transform_point(1.0, 1.0), (12.0, 2.0));

        list.consolidate().unwrap();
        assert_eq!(list.get_string().unwrap(), "matrix(2 0 0 2 10 0)");
        assert!(points("1,1").to_matrix().is_err());
    }

    #[test]
    fn test_path_segments() {
        let list = ItemList::parse(ListKind::PathSegs, "M0,0 l10 10 z", Config::default()).unwrap();
        assert_eq!(list.get_string().unwrap(), "M 0 0 l 10 10 z");

        list.get_item(1)
            .unwrap()
            .set(ItemValue::PathSeg(PathSeg::line_to(5.0, 5.0)))
            .unwrap();
        list.insert_item_before(ListItem::new(ItemValue::PathSeg(PathSeg::move_to(1.0, 1.0))), 0)
            .unwrap();
        assert_eq!(list.get_string().unwrap(), "M 1 1 M 0 0 L 5 5 z");

        let err = list.append_item(ListItem::new(ItemValue::Number(1.0))).unwrap_err();
        assert_eq!(err, LiveError::TypeMismatch { expected: "path segment", found: "number" });
    }

    #[test]
    fn test_normalized_path_segments() {
        let list = ItemList::parse(ListKind::NormalizedPathSegs, "m2 2 h3 v3 z", Config::default()).unwrap();
        assert_eq!(list.get_string().unwrap(), "M 2 2 L 5 2 L 5 5 Z");
    }
}
