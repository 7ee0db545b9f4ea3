use super::*;
use crate::{render::xml::SvgWriter, text::metrics::ApproxTextMetrics, text::parse::parse_text};

fn base() -> TextStyle {
    TextStyle {
        font: Some("sans-serif".to_string()),
        size: Some(10.0),
        line_spacing: Some(1.2),
        color: Some("black".to_string()),
        align: Some(TextAlign::Left),
        ..TextStyle::default()
    }
}

fn lookup(name: &str) -> Option<TextStyle> {
    match name {
        "big" => Some(TextStyle::default().with_size(20.0)),
        "red" => Some(TextStyle::default().with_color("red")),
        _ => None,
    }
}

#[test]
fn lines_are_measured_with_metrics() {
    let tokens = parse_text("ab\nabcd", Some('~')).unwrap();
    let block = TextBlock::build(&tokens, &base(), lookup, &ApproxTextMetrics::default(), false);
    let (w, h) = block.size();
    assert!((w - 22.0).abs() < 1e-9);
    assert!((h - 24.0).abs() < 1e-9);
    assert!((block.lines[0].baseline - 9.0).abs() < 1e-9);
    assert!((block.lines[1].baseline - 21.0).abs() < 1e-9);
}

#[test]
fn larger_runs_grow_their_line() {
    let tokens = parse_text("a~big{b}", Some('~')).unwrap();
    let block = TextBlock::build(&tokens, &base(), lookup, &ApproxTextMetrics::default(), false);
    let (w, h) = block.size();
    assert!((w - (5.5 + 11.0)).abs() < 1e-9);
    assert!((h - 24.0).abs() < 1e-9);
    assert_eq!(block.lines[0].runs[1].style.size, Some(20.0));
}

#[test]
fn unknown_names_keep_enclosing_style() {
    let tokens = vec![
        Token::Begin("red".to_string()),
        Token::Begin("hl.nothing".to_string()),
        Token::Text("x".to_string()),
        Token::End,
        Token::End,
    ];
    let block = TextBlock::build(&tokens, &base(), lookup, &ApproxTextMetrics::default(), false);
    assert_eq!(block.lines[0].runs[0].style.color.as_deref(), Some("red"));
}

#[test]
fn draw_centers_block_and_scales_to_fit() {
    let tokens = parse_text("ab", None).unwrap();
    let block = TextBlock::build(&tokens, &base(), lookup, &ApproxTextMetrics::default(), true);
    let mut w = SvgWriter::new();
    block.draw(Rect::new(0.0, 0.0, 22.0, 100.0), &mut w);
    let svg = w.finish().unwrap();
    assert!(svg.contains("scale(2)"), "{svg}");
    assert!(svg.contains("text-anchor=\"start\""));
    assert!(svg.contains(">ab</tspan>"));

    let fixed = TextBlock::build(&tokens, &base(), lookup, &ApproxTextMetrics::default(), false);
    let mut w = SvgWriter::new();
    fixed.draw(Rect::new(0.0, 0.0, 31.0, 32.0), &mut w);
    let svg = w.finish().unwrap();
    assert!(svg.contains("translate(10, 10)"), "{svg}");
    assert!(!svg.contains("scale("));
}

#[test]
fn fitting_into_an_empty_box_collapses_the_text() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let tokens = parse_text("ab", None).unwrap();
    let block = TextBlock::build(&tokens, &base(), lookup, &ApproxTextMetrics::default(), true);
    let mut w = SvgWriter::new();
    block.draw(Rect::new(5.0, 5.0, 5.0, 5.0), &mut w);
    let svg = w.finish().unwrap();
    assert!(svg.contains("scale(0)"), "{svg}");
    assert!(svg.contains("translate(5, 5)"), "{svg}");
}
