use super::*;

fn req(width: SizeSpec, height: SizeSpec) -> LayoutRequest {
    LayoutRequest {
        width,
        height,
        ..LayoutRequest::default()
    }
}

fn contains(outer: Rect, inner: Rect) -> bool {
    const EPS: f64 = 1e-9;
    inner.x0 >= outer.x0 - EPS
        && inner.y0 >= outer.y0 - EPS
        && inner.x1 <= outer.x1 + EPS
        && inner.y1 <= outer.y1 + EPS
}

#[test]
fn percentage_width_ignores_siblings() {
    for siblings in 0..3 {
        let mut arena = LayoutArena::new(200.0, 100.0);
        let root = arena.root();
        for _ in 0..siblings {
            arena
                .add(root, req(SizeSpec::Abs(10.0), SizeSpec::Auto), Placement::Append)
                .unwrap();
        }
        let child = arena
            .add(root, req(SizeSpec::Percent(0.5), SizeSpec::Auto), Placement::Prepend)
            .unwrap();
        arena.solve().unwrap();
        assert_eq!(arena.rect(child).unwrap().width(), 100.0);
    }
}

#[test]
fn fill_children_split_remaining_space_evenly() {
    let mut arena = LayoutArena::new(500.0, 100.0);
    let parent = arena
        .add(
            arena.root(),
            LayoutRequest {
                width: SizeSpec::Abs(300.0),
                height: SizeSpec::Abs(50.0),
                horizontal: true,
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    let kids: Vec<_> = (0..3)
        .map(|_| {
            arena
                .add(parent, req(SizeSpec::Fill(1.0), SizeSpec::Fill(1.0)), Placement::Append)
                .unwrap()
        })
        .collect();
    arena.solve().unwrap();

    let parent_rect = arena.rect(parent).unwrap();
    let mut x = parent_rect.x0;
    for k in kids {
        let r = arena.rect(k).unwrap();
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
        assert_eq!(r.x0, x);
        x = r.x1;
        assert!(contains(parent_rect, r));
    }
}

#[test]
fn weighted_fill_respects_weights_after_fixed_siblings() {
    let mut arena = LayoutArena::new(600.0, 100.0);
    let parent = arena
        .add(
            arena.root(),
            LayoutRequest {
                width: SizeSpec::Abs(500.0),
                horizontal: true,
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    arena
        .add(parent, req(SizeSpec::Abs(100.0), SizeSpec::Auto), Placement::Append)
        .unwrap();
    let a = arena
        .add(parent, req(SizeSpec::Fill(1.0), SizeSpec::Auto), Placement::Append)
        .unwrap();
    let b = arena
        .add(parent, req(SizeSpec::Fill(3.0), SizeSpec::Auto), Placement::Append)
        .unwrap();
    arena.solve().unwrap();
    assert_eq!(arena.rect(a).unwrap().width(), 100.0);
    assert_eq!(arena.rect(b).unwrap().width(), 300.0);
}

#[test]
fn auto_parent_degenerates_fill_to_intrinsic() {
    let mut arena = LayoutArena::new(400.0, 300.0);
    let parent = arena
        .add(
            arena.root(),
            LayoutRequest {
                horizontal: true,
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    arena
        .add(parent, req(SizeSpec::Abs(50.0), SizeSpec::Abs(10.0)), Placement::Append)
        .unwrap();
    let fill = arena
        .add(parent, req(SizeSpec::Fill(1.0), SizeSpec::Auto), Placement::Append)
        .unwrap();
    arena.solve().unwrap();
    assert_eq!(arena.rect(parent).unwrap().width(), 50.0);
    assert_eq!(arena.rect(fill).unwrap().width(), 0.0);
}

#[test]
fn content_requests_grow_but_never_shrink() {
    let mut arena = LayoutArena::new(400.0, 300.0);
    let b = arena
        .add(arena.root(), LayoutRequest::default(), Placement::Append)
        .unwrap();
    arena.set_image_size_request(b, 80.0, 20.0);
    arena.ensure_width(b, 30.0);
    arena.ensure_height(b, 60.0);
    arena.solve().unwrap();
    let r = arena.rect(b).unwrap();
    assert_eq!((r.width(), r.height()), (80.0, 60.0));
    // Centered in the root by default.
    assert_eq!((r.x0, r.y0), (160.0, 120.0));
}

#[test]
fn vertical_flow_stacks_children_with_padding() {
    let mut arena = LayoutArena::new(100.0, 100.0);
    let parent = arena
        .add(
            arena.root(),
            LayoutRequest {
                padding: Edges::all(5.0),
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    let a = arena
        .add(parent, req(SizeSpec::Abs(20.0), SizeSpec::Abs(10.0)), Placement::Append)
        .unwrap();
    let b = arena
        .add(parent, req(SizeSpec::Abs(40.0), SizeSpec::Abs(30.0)), Placement::Append)
        .unwrap();
    arena.solve().unwrap();

    let p = arena.rect(parent).unwrap();
    assert_eq!((p.width(), p.height()), (50.0, 50.0));
    let (ra, rb) = (arena.rect(a).unwrap(), arena.rect(b).unwrap());
    assert_eq!(ra.y1, rb.y0);
    assert_eq!(ra.y0, p.y0 + 5.0);
    let inner = Edges::all(5.0).inset(p);
    assert!(contains(inner, ra) && contains(inner, rb));
}

#[test]
fn explicit_and_aligned_positions() {
    let mut arena = LayoutArena::new(200.0, 100.0);
    let root = arena.root();
    let abs = arena
        .add(
            root,
            LayoutRequest {
                x: PosSpec::Abs(10.0),
                y: PosSpec::Percent(0.5),
                width: SizeSpec::Abs(20.0),
                height: SizeSpec::Abs(20.0),
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    let aligned = arena
        .add(
            root,
            LayoutRequest {
                x: PosSpec::FreePercent(1.0),
                y: PosSpec::FreePercent(0.0),
                width: SizeSpec::Abs(50.0),
                height: SizeSpec::Abs(10.0),
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    arena.solve().unwrap();
    assert_eq!(arena.rect(abs).unwrap(), Rect::new(10.0, 50.0, 30.0, 70.0));
    assert_eq!(arena.rect(aligned).unwrap(), Rect::new(150.0, 0.0, 200.0, 10.0));
}

#[test]
fn relative_placement_changes_flow_order() {
    let mut arena = LayoutArena::new(100.0, 100.0);
    let root = arena.root();
    let a = arena
        .add(root, req(SizeSpec::Auto, SizeSpec::Abs(10.0)), Placement::Append)
        .unwrap();
    let b = arena
        .add(root, req(SizeSpec::Auto, SizeSpec::Abs(10.0)), Placement::Before(a))
        .unwrap();
    let c = arena
        .add(root, req(SizeSpec::Auto, SizeSpec::Abs(10.0)), Placement::After(b))
        .unwrap();
    arena.solve().unwrap();
    let ys: Vec<f64> = [b, c, a].iter().map(|&n| arena.rect(n).unwrap().y0).collect();
    assert_eq!(ys, vec![35.0, 45.0, 55.0]);

    let stranger = arena
        .add(a, LayoutRequest::default(), Placement::Append)
        .unwrap();
    assert!(matches!(
        arena.add(root, LayoutRequest::default(), Placement::After(stranger)),
        Err(DeckError::Ordering(_))
    ));
}

#[test]
fn oversized_padding_fails_fast() {
    let mut arena = LayoutArena::new(100.0, 100.0);
    arena
        .add(
            arena.root(),
            LayoutRequest {
                width: SizeSpec::Abs(10.0),
                height: SizeSpec::Abs(10.0),
                padding: Edges::all(8.0),
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    assert!(matches!(arena.solve(), Err(DeckError::Layout(_))));
}

#[test]
fn lazy_position_reads_earlier_sibling() {
    let mut arena = LayoutArena::new(200.0, 100.0);
    let root = arena.root();
    let first = arena
        .add(
            root,
            LayoutRequest {
                x: PosSpec::Abs(0.0),
                y: PosSpec::Abs(0.0),
                width: SizeSpec::Abs(40.0),
                height: SizeSpec::Abs(40.0),
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    let anchor = arena.x(first, "100%").unwrap();
    let second = arena
        .add(
            root,
            LayoutRequest {
                x: PosSpec::Lazy(anchor),
                y: PosSpec::Abs(0.0),
                width: SizeSpec::Abs(10.0),
                height: SizeSpec::Abs(10.0),
                ..LayoutRequest::default()
            },
            Placement::Append,
        )
        .unwrap();
    arena.solve().unwrap();
    assert_eq!(arena.rect(second).unwrap().x0, 40.0);
}

#[test]
fn solving_twice_is_stable() {
    let mut arena = LayoutArena::new(100.0, 100.0);
    let b = arena
        .add(arena.root(), req(SizeSpec::Percent(0.3), SizeSpec::Fill(1.0)), Placement::Append)
        .unwrap();
    arena.solve().unwrap();
    let first = arena.rect(b);
    arena.solve().unwrap();
    assert_eq!(first, arena.rect(b));
    assert!(arena.is_solved());
}
