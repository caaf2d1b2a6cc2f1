//! Live attribute values
//!
//! A [`LiveValue`] binds one attribute of one element to a typed model.
//!
//! - External writes only mark the model stale; the next structured read
//!   reparses (lazy pull).
//! - Model mutations are written back to the element immediately.
//! - Write-backs come back as `attr_modified` events; those are recognized
//!   as self-originated and ignored.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::element::AttributeStore;
use crate::error::{LiveError, LiveResult, ParseError};
use crate::events::AttrObserver;
use crate::list::ListOwner;
use crate::{AttrName, AttrValue, Config, ItemList, ListKind, ValueCell, ValueKind};

/// Synchronization state of a live value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Not yet bound to its attribute
    Unbound,
    /// Model and attribute string agree
    Synced,
    /// The attribute changed; the model is reparsed on the next read
    StaleFromAttribute,
    /// The model changed; a write-back is in progress
    StaleFromModel,
}

/// Declared shape of a live value's model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelKind {
    Value(ValueKind),
    List(ListKind),
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Value(kind) => kind.name(),
            Self::List(kind) => kind.name(),
        }
    }
}

/// Structured base value handed to readers
#[derive(Debug, Clone)]
pub enum BaseValue {
    Value(AttrValue),
    /// Shared handle: mutations through it are written back
    List(ItemList),
}

enum Model {
    Cell(ValueCell),
    List(ItemList),
}

impl Model {
    fn parse(kind: ModelKind, text: &str, config: Config) -> Result<Self, ParseError> {
        Ok(match kind {
            ModelKind::Value(kind) => Self::Cell(ValueCell::parse(kind, text, config)?),
            ModelKind::List(kind) => {
                let list = ItemList::with_config(kind, config);
                list.rebuild(text, kind.parser())?;
                Self::List(list)
            }
        })
    }

    fn serialize(&self) -> String {
        match self {
            Self::Cell(cell) => cell.get_string(),
            Self::List(list) => list.serialize(),
        }
    }

    fn snapshot(&self) -> BaseValue {
        match self {
            Self::Cell(cell) => BaseValue::Value(cell.value()),
            Self::List(list) => BaseValue::List(list.clone()),
        }
    }
}

/// Synchronization unit for one (element, namespace, local name)
pub struct LiveValue {
    store: Weak<dyn AttributeStore>,
    name: AttrName,
    kind: ModelKind,
    default_value: Box<str>,
    model: RefCell<Model>,
    state: Cell<SyncState>,
    /// Set while this value writes its own string back
    changing: Cell<bool>,
    reparses: Cell<u64>,
}

impl LiveValue {
    /// Bind a live value to `name` on `store`.
    ///
    /// Fails only if `default_value` itself does not parse. A malformed
    /// attribute string is reported by the first read instead.
    pub fn new(
        store: Weak<dyn AttributeStore>,
        name: AttrName,
        kind: ModelKind,
        default_value: &str,
        config: Config,
    ) -> LiveResult<Rc<Self>> {
        let model = Model::parse(kind, default_value, config)
            .map_err(|e| LiveError::parse(default_value, e))?;

        let live = Rc::new_cyclic(|weak: &Weak<LiveValue>| {
            if let Model::List(list) = &model {
                let owner: Weak<dyn ListOwner> = weak.clone();
                list.set_owner(owner);
            }
            LiveValue {
                store,
                name,
                kind,
                default_value: default_value.into(),
                model: RefCell::new(model),
                state: Cell::new(SyncState::Unbound),
                changing: Cell::new(false),
                reparses: Cell::new(0),
            }
        });

        live.bind();
        Ok(live)
    }

    pub fn name(&self) -> &AttrName {
        &self.name
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    pub fn state(&self) -> SyncState {
        self.state.get()
    }

    /// Number of reparses triggered by attribute changes after binding
    pub fn reparse_count(&self) -> u64 {
        self.reparses.get()
    }

    /// Owning element; `Detached` once it has been dropped
    pub fn element(&self) -> LiveResult<Rc<dyn AttributeStore>> {
        self.store.upgrade().ok_or(LiveError::Detached)
    }

    /// Current structured value, reparsing first if the attribute changed.
    ///
    /// On a malformed attribute the error is returned and the last valid
    /// model is kept (see [`last_valid_value`](Self::last_valid_value)).
    pub fn base_value(&self) -> LiveResult<BaseValue> {
        self.revalidate()?;
        Ok(self.model.borrow().snapshot())
    }

    /// Last successfully parsed or assigned model, without reparsing
    pub fn last_valid_value(&self) -> BaseValue {
        self.model.borrow().snapshot()
    }

    /// List model of a list-valued attribute
    pub fn base_list(&self) -> LiveResult<ItemList> {
        match self.base_value()? {
            BaseValue::List(list) => Ok(list),
            BaseValue::Value(value) => Err(LiveError::TypeMismatch {
                expected: "list",
                found: value.kind_name(),
            }),
        }
    }

    /// Canonical string of the current model
    pub fn base_string(&self) -> LiveResult<String> {
        self.revalidate()?;
        Ok(self.model.borrow().serialize())
    }

    /// Assign a scalar value and write it back to the attribute
    pub fn set_base_value(&self, value: AttrValue) -> LiveResult<()> {
        {
            let mut model = self.model.borrow_mut();
            match &mut *model {
                Model::Cell(cell) => cell.set_value(value)?,
                Model::List(list) => {
                    return Err(LiveError::TypeMismatch {
                        expected: list.kind().name(),
                        found: value.kind_name(),
                    });
                }
            }
        }
        self.model_changed();
        Ok(())
    }

    /// Initial sync: parse the attribute if present, else keep the default
    fn bind(&self) {
        self.state.set(SyncState::StaleFromAttribute);
        match self.revalidate() {
            Ok(()) => {
                tracing::debug!("Bound live value {} ({})", self.name, self.kind.name());
            }
            Err(e) => {
                tracing::warn!("Live value {} bound to malformed attribute: {}", self.name, e);
            }
        }
        // Only count reparses caused by later attribute changes
        self.reparses.set(0);
    }

    fn reparse(&self) -> LiveResult<()> {
        let text = self.element().ok().and_then(|store| store.attribute(&self.name));
        let text = text.as_deref().unwrap_or(&*self.default_value);

        // The list handle is cloned out so no model borrow is held while parsing
        let list = match &mut *self.model.borrow_mut() {
            Model::Cell(cell) => {
                cell.set_from_str(text).map_err(|e| LiveError::parse(text, e))?;
                None
            }
            Model::List(list) => Some(list.clone()),
        };
        if let Some(list) = list {
            list.rebuild(text, list.kind().parser())
                .map_err(|e| LiveError::parse(text, e))?;
        }

        self.reparses.set(self.reparses.get() + 1);
        tracing::debug!("Reparsed {} from attribute", self.name);
        Ok(())
    }

    fn reset_to_default(&self) {
        let list = match &mut *self.model.borrow_mut() {
            Model::Cell(cell) => {
                // The default parsed at construction, so it parses again
                if let Err(e) = cell.set_from_str(&self.default_value) {
                    tracing::warn!("Default value of {} no longer parses: {}", self.name, e);
                }
                None
            }
            Model::List(list) => Some(list.clone()),
        };
        if let Some(list) = list {
            if let Err(e) = list.rebuild(&self.default_value, list.kind().parser()) {
                tracing::warn!("Default value of {} no longer parses: {}", self.name, e);
            }
        }
        self.state.set(SyncState::Synced);
    }

    fn model_changed(&self) {
        self.state.set(SyncState::StaleFromModel);
        self.write_back();
    }

    /// Push the model's string to the element, ignoring the echo event
    fn write_back(&self) {
        let value = self.model.borrow().serialize();
        match self.element() {
            Ok(store) => {
                tracing::trace!("Writing back {}=\"{}\"", self.name, value);
                self.changing.set(true);
                store.set_attribute(&self.name, &value);
                self.changing.set(false);
            }
            Err(e) => {
                tracing::trace!("Keeping model of {} only: {}", self.name, e);
            }
        }
        self.state.set(SyncState::Synced);
    }

    fn attribute_changed(&self) {
        if self.changing.get() {
            tracing::trace!("Ignoring self-originated change of {}", self.name);
            return;
        }
        self.state.set(SyncState::StaleFromAttribute);
    }
}

impl ListOwner for LiveValue {
    fn revalidate(&self) -> LiveResult<()> {
        if self.state.get() != SyncState::StaleFromAttribute {
            return Ok(());
        }
        match self.reparse() {
            Ok(()) => {
                self.state.set(SyncState::Synced);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Keeping last valid value of {}: {}", self.name, e);
                Err(e)
            }
        }
    }

    fn list_changed(&self) {
        self.model_changed();
    }
}

impl AttrObserver for LiveValue {
    fn attr_added(&self, _value: &str) {
        self.attribute_changed();
    }

    fn attr_modified(&self, _old: &str, _new: &str) {
        self.attribute_changed();
    }

    fn attr_removed(&self, _old: &str) {
        if self.changing.get() {
            return;
        }
        self.reset_to_default();
    }
}

impl fmt::Debug for LiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveValue")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("state", &self.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Length, SvgElement};

    #[test]
    fn test_default_when_absent() {
        let element = SvgElement::new("rect");
        let width = element
            .live_value(AttrName::local("width"), ModelKind::Value(ValueKind::Length), "0")
            .unwrap();

        assert_eq!(width.state(), SyncState::Synced);
        assert!(matches!(
            width.base_value().unwrap(),
            BaseValue::Value(AttrValue::Length(l)) if l == Length::number(0.0)
        ));
        assert!(!element.has_attribute(&AttrName::local("width")));
    }

    #[test]
    fn test_external_write_is_lazy() {
        let element = SvgElement::new("rect");
        let name = AttrName::local("width");
        let width = element
            .live_value(name.clone(), ModelKind::Value(ValueKind::Length), "0")
            .unwrap();

        element.set_attribute(&name, "50%");
        assert_eq!(width.state(), SyncState::StaleFromAttribute);
        assert_eq!(width.reparse_count(), 0);

        assert_eq!(width.base_string().unwrap(), "50%");
        assert_eq!(width.state(), SyncState::Synced);
        assert_eq!(width.reparse_count(), 1);
    }

    #[test]
    fn test_bad_default_rejected() {
        let element = SvgElement::new("rect");
        let err = element
            .live_value(AttrName::local("width"), ModelKind::Value(ValueKind::Length), "wide")
            .unwrap_err();
        assert!(matches!(err, LiveError::Parse { .. }));
    }

    #[test]
    fn test_scalar_type_mismatch() {
        let element = SvgElement::new("svg");
        let value = element
            .live_value(AttrName::local("points"), ModelKind::List(ListKind::Points), "")
            .unwrap();
        let err = value.set_base_value(AttrValue::Number(1.0)).unwrap_err();
        assert!(matches!(err, LiveError::TypeMismatch { .. }));
        assert!(value.base_list().is_ok());
    }
}
