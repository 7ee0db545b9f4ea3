use super::*;
use crate::layout::node::{LayoutRequest, Placement};
use crate::layout::value::SizeSpec;

fn solved_arena() -> (LayoutArena, LayoutId) {
    let mut arena = LayoutArena::new(200.0, 100.0);
    let child = arena
        .add(
            arena.root(),
            LayoutRequest {
                width: SizeSpec::Abs(100.0),
                height: SizeSpec::Abs(40.0),
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    arena.solve().unwrap();
    (arena, child)
}

#[test]
fn percent_and_pixel_offsets_resolve_against_anchor() {
    let (arena, child) = solved_arena();
    // Child is centered: x0 = 50, y0 = 30.
    let half = LazyValue::new(child, Axis::X, &Value::from("50%")).unwrap();
    assert_eq!(half.eval(&arena).unwrap(), 100.0);

    let shifted = LazyValue::new(child, Axis::Y, &Value::from(10)).unwrap() + 5.0;
    assert_eq!(shifted.eval(&arena).unwrap(), 45.0);
}

#[test]
fn literal_points_pass_through_without_layout() {
    let arena = LayoutArena::new(10.0, 10.0);
    let p = LazyPoint::from((3.0, 4.0));
    assert_eq!(p.eval(&arena).unwrap(), Point::new(3.0, 4.0));
}

#[test]
fn evaluating_before_layout_is_rejected() {
    let mut arena = LayoutArena::new(200.0, 100.0);
    let child = arena
        .add(arena.root(), LayoutRequest::default(), Placement::Append)
        .unwrap();
    let lv = LazyValue::new(child, Axis::X, &Value::from(0)).unwrap();
    assert!(matches!(lv.eval(&arena), Err(DeckError::Layout(_))));
}

#[test]
fn mixed_points_shift_both_parts() {
    let (arena, child) = solved_arena();
    let p = LazyPoint::new(LazyValue::new(child, Axis::X, &Value::from("100%")).unwrap(), 7.0)
        .add(1.0, 1.0);
    assert_eq!(p.eval(&arena).unwrap(), Point::new(151.0, 8.0));
}

#[test]
fn free_percent_is_not_a_lazy_offset() {
    let arena = LayoutArena::new(10.0, 10.0);
    assert!(matches!(
        LazyValue::new(arena.root(), Axis::X, &Value::from("[50%]")),
        Err(DeckError::Configuration(_))
    ));
}
