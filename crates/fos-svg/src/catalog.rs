//! Trait capability catalog
//!
//! Per-attribute metadata consulted by animation engines: which traits
//! (attributes) and properties exist, their value type, and whether they
//! may be animated or composed additively. Live values never consult it.

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{LiveError, LiveResult};
use crate::{AttrName, ListKind, ModelKind, ValueKind};

/// Value type of a trait or property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraitType {
    Number,
    Boolean,
    Length,
    Matrix,
    Enumeration,
    NumberList,
    LengthList,
    Points,
    TransformList,
    PathData,
    Orient,
}

impl From<ModelKind> for TraitType {
    fn from(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Value(ValueKind::Number) => Self::Number,
            ModelKind::Value(ValueKind::Boolean) => Self::Boolean,
            ModelKind::Value(ValueKind::Length) => Self::Length,
            ModelKind::Value(ValueKind::Matrix) => Self::Matrix,
            ModelKind::Value(ValueKind::Enumeration(_)) => Self::Enumeration,
            ModelKind::Value(ValueKind::Orient) => Self::Orient,
            ModelKind::List(ListKind::Numbers) => Self::NumberList,
            ModelKind::List(ListKind::Lengths) => Self::LengthList,
            ModelKind::List(ListKind::Points) => Self::Points,
            ModelKind::List(ListKind::Transforms) => Self::TransformList,
            ModelKind::List(ListKind::PathSegs | ListKind::NormalizedPathSegs) => Self::PathData,
        }
    }
}

/// Capabilities of one trait or property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitInfo {
    pub ty: TraitType,
    pub animatable: bool,
    pub additive: bool,
}

impl TraitInfo {
    pub const fn new(ty: TraitType, animatable: bool, additive: bool) -> Self {
        Self { ty, animatable, additive }
    }

    /// Animatable and additive
    pub const fn additive(ty: TraitType) -> Self {
        Self::new(ty, true, true)
    }

    /// Animatable by replacement only
    pub const fn replaced(ty: TraitType) -> Self {
        Self::new(ty, true, false)
    }

    pub const fn fixed(ty: TraitType) -> Self {
        Self::new(ty, false, false)
    }
}

/// Capability queries. Unknown names answer `false`; type queries fail.
pub trait TraitCatalog {
    fn trait_info(&self, name: &AttrName) -> Option<TraitInfo>;
    fn property_info(&self, name: &str) -> Option<TraitInfo>;

    fn has_trait(&self, name: &AttrName) -> bool {
        self.trait_info(name).is_some()
    }

    fn has_property(&self, name: &str) -> bool {
        self.property_info(name).is_some()
    }

    fn is_trait_animatable(&self, name: &AttrName) -> bool {
        self.trait_info(name).is_some_and(|info| info.animatable)
    }

    fn is_property_animatable(&self, name: &str) -> bool {
        self.property_info(name).is_some_and(|info| info.animatable)
    }

    fn is_trait_additive(&self, name: &AttrName) -> bool {
        self.trait_info(name).is_some_and(|info| info.additive)
    }

    fn is_property_additive(&self, name: &str) -> bool {
        self.property_info(name).is_some_and(|info| info.additive)
    }

    fn trait_type(&self, name: &AttrName) -> LiveResult<TraitType> {
        self.trait_info(name)
            .map(|info| info.ty)
            .ok_or_else(|| LiveError::UnsupportedTrait(name.to_string()))
    }

    fn property_type(&self, name: &str) -> LiveResult<TraitType> {
        self.property_info(name)
            .map(|info| info.ty)
            .ok_or_else(|| LiveError::UnsupportedTrait(name.to_string()))
    }
}

/// Additive flag an engine should pass for an animation of `name`:
/// what the animation requested, if the catalog allows it.
pub fn effective_additive(catalog: &dyn TraitCatalog, name: &AttrName, requested: bool) -> bool {
    requested && catalog.is_trait_additive(name)
}

/// Table-driven catalog; lookups fall back to the parent table
#[derive(Debug, Default)]
pub struct TraitTable {
    traits: HashMap<AttrName, TraitInfo>,
    properties: HashMap<Box<str>, TraitInfo>,
    parent: Option<Rc<TraitTable>>,
}

impl TraitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table that extends `parent`
    pub fn with_parent(parent: Rc<TraitTable>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn with_trait(mut self, name: AttrName, info: TraitInfo) -> Self {
        self.traits.insert(name, info);
        self
    }

    pub fn with_property(mut self, name: &str, info: TraitInfo) -> Self {
        self.properties.insert(name.into(), info);
        self
    }

    /// Attributes and presentation properties shared by most SVG elements
    pub fn svg_core() -> Self {
        use TraitType::*;

        let traits = [
            ("x", TraitInfo::additive(Length)),
            ("y", TraitInfo::additive(Length)),
            ("width", TraitInfo::additive(Length)),
            ("height", TraitInfo::additive(Length)),
            ("rx", TraitInfo::additive(Length)),
            ("ry", TraitInfo::additive(Length)),
            ("cx", TraitInfo::additive(Length)),
            ("cy", TraitInfo::additive(Length)),
            ("r", TraitInfo::additive(Length)),
            ("points", TraitInfo::additive(Points)),
            ("d", TraitInfo::additive(PathData)),
            ("orient", TraitInfo::additive(Orient)),
            ("transform", TraitInfo::additive(TransformList)),
            ("gradientTransform", TraitInfo::additive(TransformList)),
            ("rotate", TraitInfo::additive(NumberList)),
            ("pathLength", TraitInfo::additive(Number)),
            ("gradientUnits", TraitInfo::replaced(Enumeration)),
            ("spreadMethod", TraitInfo::replaced(Enumeration)),
            ("lengthAdjust", TraitInfo::replaced(Enumeration)),
            ("externalResourcesRequired", TraitInfo::fixed(Boolean)),
            ("zoomAndPan", TraitInfo::fixed(Enumeration)),
        ];
        let properties = [
            ("opacity", TraitInfo::additive(Number)),
            ("fill-opacity", TraitInfo::additive(Number)),
            ("stroke-opacity", TraitInfo::additive(Number)),
            ("stroke-width", TraitInfo::additive(Length)),
            ("stroke-miterlimit", TraitInfo::additive(Number)),
            ("font-size", TraitInfo::additive(Length)),
        ];

        let mut table = Self::new();
        for (name, info) in traits {
            table = table.with_trait(AttrName::local(name), info);
        }
        for (name, info) in properties {
            table = table.with_property(name, info);
        }
        table
    }
}

impl TraitCatalog for TraitTable {
    fn trait_info(&self, name: &AttrName) -> Option<TraitInfo> {
        self.traits
            .get(name)
            .copied()
            .or_else(|| self.parent.as_ref()?.trait_info(name))
    }

    fn property_info(&self, name: &str) -> Option<TraitInfo> {
        self.properties
            .get(name)
            .copied()
            .or_else(|| self.parent.as_ref()?.property_info(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_table() {
        let table = TraitTable::svg_core();
        let x = AttrName::local("x");

        assert!(table.has_trait(&x));
        assert!(table.is_trait_animatable(&x));
        assert!(table.is_trait_additive(&x));
        assert_eq!(table.trait_type(&x).unwrap(), TraitType::Length);

        let zoom = AttrName::local("zoomAndPan");
        assert!(!table.is_trait_animatable(&zoom));
        assert!(table.is_property_additive("opacity"));
    }

    #[test]
    fn test_unknown_names() {
        let table = TraitTable::svg_core();
        let bogus = AttrName::local("bogus");

        assert!(!table.has_trait(&bogus));
        assert!(!table.is_trait_additive(&bogus));
        assert!(!table.has_property("bogus"));
        assert_eq!(
            table.trait_type(&bogus).unwrap_err(),
            LiveError::UnsupportedTrait("bogus".into())
        );
        assert!(table.property_type("bogus").is_err());
    }

    #[test]
    fn test_parent_chain() {
        let core = Rc::new(TraitTable::svg_core());
        let text = TraitTable::with_parent(core)
            .with_trait(AttrName::local("dx"), TraitInfo::additive(TraitType::LengthList))
            .with_trait(AttrName::local("x"), TraitInfo::replaced(TraitType::LengthList));

        assert_eq!(text.trait_type(&AttrName::local("dx")).unwrap(), TraitType::LengthList);
        // Local entries shadow the parent
        assert_eq!(text.trait_type(&AttrName::local("x")).unwrap(), TraitType::LengthList);
        assert!(!text.is_trait_additive(&AttrName::local("x")));
        assert!(text.has_trait(&AttrName::local("points")));
    }

    #[test]
    fn test_effective_additive() {
        let table = TraitTable::svg_core();
        assert!(effective_additive(&table, &AttrName::local("points"), true));
        assert!(!effective_additive(&table, &AttrName::local("points"), false));
        assert!(!effective_additive(&table, &AttrName::local("gradientUnits"), true));
    }

    #[test]
    fn test_type_from_model_kind() {
        assert_eq!(TraitType::from(ModelKind::List(ListKind::Points)), TraitType::Points);
        assert_eq!(TraitType::from(ModelKind::Value(ValueKind::Matrix)), TraitType::Matrix);
        assert_eq!(
            TraitType::from(ModelKind::List(ListKind::NormalizedPathSegs)),
            TraitType::PathData
        );
        assert_eq!(TraitType::from(ModelKind::Value(ValueKind::Orient)), TraitType::Orient);
    }
}
