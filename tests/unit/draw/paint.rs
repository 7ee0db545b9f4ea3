use super::*;

#[test]
fn style_string_lists_stroke_only_when_colored() {
    assert_eq!(Paint::default().style(), "fill:none;stroke:none");
    assert_eq!(
        Paint::stroke("red")
            .with_width(2.5)
            .with_dasharray("4 2")
            .with_fill("blue")
            .style(),
        "fill:blue;stroke:red;stroke-width:2.5;stroke-dasharray:4 2"
    );
    assert_eq!(
        Paint::fill("#eee").or_stroke("black").style(),
        "fill:#eee;stroke:black;stroke-width:1"
    );
}
