//! Animation overlay tests for fos-svg

use std::cell::Cell;
use std::rc::Rc;

use fos_svg::{
    effective_additive, Angle, AnimatableValue, AnimatedAttributeListener, AnimatedLiveValue,
    AttrName, ListKind, ModelKind, Orient, PathSeg, Point, SvgElement, TraitTable, Transform,
    ValueKind,
};

#[derive(Default)]
struct Counter {
    calls: Cell<u32>,
}

impl AnimatedAttributeListener for Counter {
    fn animated_attribute_changed(&self, _value: &AnimatedLiveValue) -> anyhow::Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

struct Failing;

impl AnimatedAttributeListener for Failing {
    fn animated_attribute_changed(&self, value: &AnimatedLiveValue) -> anyhow::Result<()> {
        anyhow::bail!("cache for {} unavailable", value.name())
    }
}

fn animated_points(points: &str) -> (Rc<SvgElement>, Rc<AnimatedLiveValue>) {
    let element = SvgElement::new("polyline");
    let name = AttrName::local("points");
    element.set_attribute(&name, points);
    let value = element
        .animated_value(name, ModelKind::List(ListKind::Points), "")
        .unwrap();
    (element, value)
}

#[test]
fn test_additive_point() {
    let (_element, points) = animated_points("2,3");
    let overlay = AnimatableValue::PointList(vec![Point::new(1.0, 1.0)]);

    points.set_animated_value(overlay.clone(), true).unwrap();
    assert_eq!(
        points.current_value().unwrap(),
        AnimatableValue::PointList(vec![Point::new(3.0, 4.0)])
    );

    points.set_animated_value(overlay.clone(), false).unwrap();
    assert_eq!(points.current_value().unwrap(), overlay);
}

#[test]
fn test_overlay_clearing() {
    let (element, points) = animated_points("2,3 4,5");
    let counter = Rc::new(Counter::default());
    points.add_listener(counter.clone());
    let generation = element.generation();

    points
        .set_animated_value(AnimatableValue::PointList(vec![Point::new(0.0, 0.0)]), false)
        .unwrap();
    points.clear_animated_value();

    assert_eq!(points.current_value().unwrap(), points.underlying_value().unwrap());
    assert_eq!(counter.calls.get(), 2);
    // Animation never writes the attribute
    assert_eq!(element.generation(), generation);
}

#[test]
fn test_failing_listener_does_not_block_others() {
    let (_element, points) = animated_points("0,0");
    let counter = Rc::new(Counter::default());
    points.add_listener(Rc::new(Failing));
    points.add_listener(counter.clone());

    points
        .set_animated_value(AnimatableValue::PointList(vec![Point::new(1.0, 1.0)]), false)
        .unwrap();

    assert_eq!(counter.calls.get(), 1);
    assert!(points.is_animated());
}

#[test]
fn test_base_edits_show_through_additive_overlay() {
    let (_element, points) = animated_points("2,3");
    points
        .set_animated_value(AnimatableValue::PointList(vec![Point::new(1.0, 1.0)]), true)
        .unwrap();

    let base = points.base().base_list().unwrap();
    base.set_value_as_string("10,10").unwrap();

    assert_eq!(
        points.current_value().unwrap(),
        AnimatableValue::PointList(vec![Point::new(11.0, 11.0)])
    );
}

#[test]
fn test_transform_overlay_uses_catalog() {
    let element = SvgElement::new("g");
    let name = AttrName::local("transform");
    element.set_attribute(&name, "translate(5)");
    let transform = element
        .animated_value(name.clone(), ModelKind::List(ListKind::Transforms), "")
        .unwrap();

    let catalog = TraitTable::svg_core();
    let additive = effective_additive(&catalog, &name, true);
    assert!(additive);

    transform
        .set_animated_value(
            AnimatableValue::TransformList(vec![Transform::rotate(90.0)]),
            additive,
        )
        .unwrap();
    assert_eq!(
        transform.current_value().unwrap(),
        AnimatableValue::TransformList(vec![
            Transform::Translate { tx: 5.0, ty: None },
            Transform::rotate(90.0),
        ])
    );
    assert_eq!(element.get_attribute(&name).as_deref(), Some("translate(5)"));
}

#[test]
fn test_orient_overlay() {
    let element = SvgElement::new("marker");
    let name = AttrName::local("orient");
    element.set_attribute(&name, "30deg");
    let orient = element
        .animated_value(name.clone(), ModelKind::Value(ValueKind::Orient), "0")
        .unwrap();

    let additive = effective_additive(&TraitTable::svg_core(), &name, true);
    orient
        .set_animated_value(AnimatableValue::Orient(Orient::Angle(Angle::deg(15.0))), additive)
        .unwrap();
    assert_eq!(
        orient.current_value().unwrap(),
        AnimatableValue::Orient(Orient::Angle(Angle::deg(45.0)))
    );

    // `auto` replaces the base even when additive
    orient.set_animated_value(AnimatableValue::Orient(Orient::Auto), true).unwrap();
    assert_eq!(orient.current_value().unwrap(), AnimatableValue::Orient(Orient::Auto));
    assert_eq!(element.get_attribute(&name).as_deref(), Some("30deg"));
}

#[test]
fn test_path_overlay() {
    let element = SvgElement::new("path");
    let name = AttrName::local("d");
    element.set_attribute(&name, "M0 0 L10 0");
    let d = element
        .animated_value(name, ModelKind::List(ListKind::PathSegs), "")
        .unwrap();

    let overlay = AnimatableValue::PathSegList(vec![PathSeg::move_to(0.0, 5.0), PathSeg::line_to(0.0, 5.0)]);
    d.set_animated_value(overlay.clone(), true).unwrap();
    assert_eq!(
        d.current_value().unwrap(),
        AnimatableValue::PathSegList(vec![PathSeg::move_to(0.0, 5.0), PathSeg::line_to(10.0, 5.0)])
    );

    let err = d.set_animated_value(AnimatableValue::PointList(vec![]), false).unwrap_err();
    assert!(matches!(err, fos_svg::LiveError::TypeMismatch { .. }));
    assert_eq!(d.current_value().unwrap(), d.underlying_value().unwrap().compose(&overlay));
}
