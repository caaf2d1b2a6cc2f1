//! SVG element attribute storage
//!
//! Stores raw attribute strings, owns the registry of live values (one per
//! attribute name, created on first structured access) and forwards every
//! attribute mutation to the registered live value.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{LiveError, LiveResult};
use crate::events::{AttrChange, AttrObserver};
use crate::{AnimatedLiveValue, AttrName, Config, Generation, LiveValue, ModelKind};

/// Raw attribute access needed by live values
pub trait AttributeStore {
    /// Current attribute string, if set
    fn attribute(&self, name: &AttrName) -> Option<String>;

    /// Set the attribute string, notifying any registered live value
    fn set_attribute(&self, name: &AttrName, value: &str);
}

/// Single attribute
#[derive(Debug, Clone)]
struct Attr {
    name: AttrName,
    value: String,
}

/// Registry entry: the live value bound to one attribute name
#[derive(Clone)]
enum LiveEntry {
    Plain(Rc<LiveValue>),
    Animated(Rc<AnimatedLiveValue>),
}

impl LiveEntry {
    fn live(&self) -> &Rc<LiveValue> {
        match self {
            Self::Plain(live) => live,
            Self::Animated(animated) => animated.base(),
        }
    }
}

/// An SVG element: attribute strings plus their live values
pub struct SvgElement {
    tag_name: Box<str>,
    config: Config,
    /// Attributes in insertion order
    attrs: RefCell<Vec<Attr>>,
    live: RefCell<HashMap<AttrName, LiveEntry>>,
    generation: Cell<Generation>,
    this: Weak<SvgElement>,
}

impl SvgElement {
    pub fn new(tag_name: &str) -> Rc<Self> {
        Self::with_config(tag_name, Config::default())
    }

    pub fn with_config(tag_name: &str, config: Config) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            tag_name: tag_name.into(),
            config,
            attrs: RefCell::new(Vec::new()),
            live: RefCell::new(HashMap::new()),
            generation: Cell::new(Generation::INITIAL),
            this: this.clone(),
        })
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Bumped on every attribute write, including live value write-backs
    pub fn generation(&self) -> Generation {
        self.generation.get()
    }

    pub fn get_attribute(&self, name: &AttrName) -> Option<String> {
        self.attrs
            .borrow()
            .iter()
            .find(|a| a.name == *name)
            .map(|a| a.value.clone())
    }

    pub fn has_attribute(&self, name: &AttrName) -> bool {
        self.attrs.borrow().iter().any(|a| a.name == *name)
    }

    /// Attribute names in insertion order
    pub fn attribute_names(&self) -> Vec<AttrName> {
        self.attrs.borrow().iter().map(|a| a.name.clone()).collect()
    }

    pub fn set_attribute(&self, name: &AttrName, value: &str) {
        let old = {
            let mut attrs = self.attrs.borrow_mut();
            match attrs.iter_mut().find(|a| a.name == *name) {
                Some(attr) => Some(std::mem::replace(&mut attr.value, value.to_string())),
                None => {
                    attrs.push(Attr { name: name.clone(), value: value.to_string() });
                    None
                }
            }
        };
        self.generation.set(self.generation.get().next());
        self.notify(name, old.as_deref(), Some(value));
    }

    pub fn remove_attribute(&self, name: &AttrName) -> Option<String> {
        let old = {
            let mut attrs = self.attrs.borrow_mut();
            let index = attrs.iter().position(|a| a.name == *name)?;
            attrs.remove(index).value
        };
        self.generation.set(self.generation.get().next());
        self.notify(name, Some(&old), None);
        Some(old)
    }

    /// Live value for `name`, created on first access
    pub fn live_value(
        &self,
        name: AttrName,
        kind: ModelKind,
        default_value: &str,
    ) -> LiveResult<Rc<LiveValue>> {
        if let Some(entry) = self.lookup(&name, kind)? {
            return Ok(Rc::clone(entry.live()));
        }
        let live = self.create(name.clone(), kind, default_value)?;
        self.live.borrow_mut().insert(name, LiveEntry::Plain(Rc::clone(&live)));
        Ok(live)
    }

    /// Animated live value for `name`, created on first access.
    ///
    /// Fails with `TypeMismatch` if `name` is already bound as a plain value.
    pub fn animated_value(
        &self,
        name: AttrName,
        kind: ModelKind,
        default_value: &str,
    ) -> LiveResult<Rc<AnimatedLiveValue>> {
        match self.lookup(&name, kind)? {
            Some(LiveEntry::Animated(animated)) => return Ok(animated),
            Some(LiveEntry::Plain(_)) => {
                return Err(LiveError::TypeMismatch {
                    expected: "animated value",
                    found: "plain value",
                });
            }
            None => {}
        }
        let animated = Rc::new(AnimatedLiveValue::new(self.create(name.clone(), kind, default_value)?));
        self.live
            .borrow_mut()
            .insert(name, LiveEntry::Animated(Rc::clone(&animated)));
        Ok(animated)
    }

    /// Number of live values created so far
    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    fn lookup(&self, name: &AttrName, kind: ModelKind) -> LiveResult<Option<LiveEntry>> {
        let Some(entry) = self.live.borrow().get(name).cloned() else {
            return Ok(None);
        };
        let existing = entry.live().kind();
        if existing != kind {
            return Err(LiveError::TypeMismatch {
                expected: kind.name(),
                found: existing.name(),
            });
        }
        Ok(Some(entry))
    }

    fn create(&self, name: AttrName, kind: ModelKind, default_value: &str) -> LiveResult<Rc<LiveValue>> {
        let store: Weak<dyn AttributeStore> = self.this.clone();
        LiveValue::new(store, name, kind, default_value, self.config)
    }

    /// Deliver a mutation to the registered live value, with no borrows held
    fn notify(&self, name: &AttrName, old: Option<&str>, new: Option<&str>) {
        let Some(change) = AttrChange::classify(old, new) else {
            return;
        };
        let observer = self.live.borrow().get(name).map(|entry| Rc::clone(entry.live()));
        if let Some(observer) = observer {
            tracing::trace!("{:?} {} on <{}>", change, name, self.tag_name);
            change.dispatch(&*observer, old, new);
        }
    }
}

impl AttributeStore for SvgElement {
    fn attribute(&self, name: &AttrName) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attribute(&self, name: &AttrName, value: &str) {
        SvgElement::set_attribute(self, name, value);
    }
}

impl fmt::Debug for SvgElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SvgElement")
            .field("tag_name", &self.tag_name)
            .field("attrs", &*self.attrs.borrow())
            .field("live", &self.live.borrow().len())
            .field("generation", &self.generation.get())
            .finish()
    }
}
