use super::*;
use crate::draw::paint::Paint;

fn rect_cmd(color: &str) -> DrawCommand {
    DrawCommand::Rect {
        paint: Paint::fill(color),
        rx: None,
        ry: None,
    }
}

#[test]
fn z_level_dominates_document_order() {
    let (a, b, c) = (rect_cmd("a"), rect_cmd("b"), rect_cmd("c"));
    let r = Rect::new(0.0, 0.0, 1.0, 1.0);
    let mut items = vec![
        Drawable { z_level: 1, rect: r, visible: true, command: &b },
        Drawable { z_level: 0, rect: r, visible: true, command: &a },
        Drawable { z_level: 1, rect: r, visible: true, command: &c },
    ];
    paint_order(&mut items);
    let page = Page { width: 10.0, height: 10.0, bg_color: "white" };
    let svg = render_document(page, 1, &items, &LayoutArena::new(10.0, 10.0)).unwrap();
    let pa = svg.find("fill:a").unwrap();
    let pb = svg.find("fill:b").unwrap();
    let pc = svg.find("fill:c").unwrap();
    assert!(pa < pb && pb < pc);
}

#[test]
fn hidden_items_are_skipped_and_page_has_background() {
    let a = rect_cmd("a");
    let items = [Drawable {
        z_level: 0,
        rect: Rect::ZERO,
        visible: false,
        command: &a,
    }];
    let page = Page { width: 4.0, height: 3.0, bg_color: "#123" };
    let svg = render_document(page, 2, &items, &LayoutArena::new(4.0, 3.0)).unwrap();
    assert!(!svg.contains("fill:a"));
    assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(svg.contains(r##"<rect width="4" height="3" fill="#123"/>"##));
    assert!(svg.ends_with("</svg>"));
}
