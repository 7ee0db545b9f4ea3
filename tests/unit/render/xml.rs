use super::*;

#[test]
fn nested_elements_and_empty_tags() {
    let mut w = SvgWriter::new();
    w.element("g");
    w.set("id", "a\"b");
    w.element("rect");
    w.set_num("x", 1.5);
    w.set_num("y", -0.0);
    w.close("rect");
    w.text("1 < 2");
    w.close("g");
    assert_eq!(
        w.finish().unwrap(),
        r#"<g id="a&quot;b"><rect x="1.5" y="0"/>1 &lt; 2</g>"#
    );
}

#[test]
fn raw_markup_is_verbatim() {
    let mut w = SvgWriter::new();
    w.element("g");
    w.raw_text("<svg/>");
    w.close("g");
    assert_eq!(w.finish().unwrap(), "<g><svg/></g>");
}

#[test]
fn misuse_is_reported_on_finish() {
    let mut w = SvgWriter::new();
    w.element("g");
    w.element("rect");
    w.close("g");
    assert!(matches!(w.finish(), Err(DeckError::Layout(_))));

    let mut unclosed = SvgWriter::new();
    unclosed.element("g");
    assert!(unclosed.finish().is_err());

    let mut late_attr = SvgWriter::new();
    late_attr.element("g");
    late_attr.text("x");
    late_attr.set("id", "y");
    late_attr.close("g");
    assert!(late_attr.finish().is_err());
}

#[test]
fn numbers_are_compact() {
    assert_eq!(fmt_num(3.0), "3");
    assert_eq!(fmt_num(-2.0), "-2");
    assert_eq!(fmt_num(0.25), "0.25");
}
