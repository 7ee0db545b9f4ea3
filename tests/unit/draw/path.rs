use super::*;

fn layout() -> LayoutArena {
    LayoutArena::new(100.0, 100.0)
}

#[test]
fn literal_commands_serialize_to_path_data() {
    let cmds = vec![
        PathCommand::MoveTo((0, 0).into()),
        PathCommand::LineTo((10, 20).into()),
        PathCommand::Close,
    ];
    let els = eval_commands(&cmds, &layout()).unwrap();
    let d = to_svg_data(els);
    assert!(d.starts_with("M0,0"));
    assert!(d.contains("L10,20"));
    assert!(d.ends_with('Z'));
}

#[test]
fn end_segment_follows_last_command_kind() {
    let l = layout();
    let line = eval_commands(
        &[
            PathCommand::MoveTo((0, 0).into()),
            PathCommand::LineTo((10, 0).into()),
        ],
        &l,
    )
    .unwrap();
    assert_eq!(
        end_segment(&line),
        Some((Point::new(0.0, 0.0), Point::new(10.0, 0.0)))
    );

    let curve = eval_commands(
        &[
            PathCommand::MoveTo((0, 0).into()),
            PathCommand::CubicTo((1, 1).into(), (2, 3).into(), (4, 4).into()),
        ],
        &l,
    )
    .unwrap();
    assert_eq!(
        end_segment(&curve),
        Some((Point::new(2.0, 3.0), Point::new(4.0, 4.0)))
    );

    let closed = eval_commands(
        &[PathCommand::MoveTo((0, 0).into()), PathCommand::Close],
        &l,
    )
    .unwrap();
    assert_eq!(end_segment(&closed), None);
}

#[test]
fn end_point_can_be_replaced() {
    let mut els = eval_commands(
        &[
            PathCommand::MoveTo((0, 0).into()),
            PathCommand::QuadTo((5, 5).into(), (10, 0).into()),
        ],
        &layout(),
    )
    .unwrap();
    replace_end_point(&mut els, Point::new(8.0, 0.0));
    assert_eq!(els[1], PathEl::QuadTo(Point::new(5.0, 5.0), Point::new(8.0, 0.0)));
}
