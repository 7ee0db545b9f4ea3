use std::path::{Path, PathBuf};

use super::*;
use crate::{
    assets::image::OraConverter, assets::latex::LatexRenderer, deck::DeckConfig,
    foundation::core::Rect, text::highlight::Highlighter, text::style::default_styles,
};

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "slidebox_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn slide(w: f64, h: f64) -> Slide {
    let cfg = DeckConfig {
        width: w,
        height: h,
        ..DeckConfig::default()
    };
    Slide::new("s", &cfg, default_styles())
}

fn rect(s: &Slide, b: BoxId) -> Rect {
    s.box_rect(b).unwrap()
}

#[test]
fn padding_prefers_specific_sides() {
    let e = BoxOpts::new()
        .padding(1.0)
        .p_x(2.0)
        .p_left(3.0)
        .edges()
        .unwrap();
    assert_eq!((e.left, e.right, e.top, e.bottom), (3.0, 2.0, 1.0, 1.0));
    assert!(BoxOpts::new().p_y(-1.0).edges().is_err());
}

#[test]
fn shortcut_boxes_fill_their_parent() {
    let mut s = slide(200.0, 100.0);
    let root = s.root();
    let row = s
        .add_box(root, BoxOpts::new().width(120).height(60).horizontal())
        .unwrap();
    let over = s.overlay(row, BoxOpts::new()).unwrap();
    let strip = s.sbox(row, BoxOpts::new().width(30)).unwrap();
    let col = s.add_box(root, BoxOpts::new().width(80).height(20)).unwrap();
    let full = s.fbox(col, BoxOpts::new()).unwrap();
    s.layout().unwrap();

    assert_eq!(rect(&s, over), rect(&s, row));
    assert_eq!(rect(&s, strip).height(), 60.0);
    assert_eq!(rect(&s, strip).width(), 30.0);
    assert_eq!(rect(&s, full), rect(&s, col));
}

#[test]
fn fill_degenerates_inside_auto_sized_parent() {
    let mut s = slide(400.0, 300.0);
    let root = s.root();
    let parent = s.add_box(root, BoxOpts::new().horizontal()).unwrap();
    s.add_box(parent, BoxOpts::new().width(50).height(10)).unwrap();
    let filler = s.add_box(parent, BoxOpts::new().width("fill")).unwrap();
    s.layout().unwrap();
    assert_eq!(rect(&s, parent).width(), 50.0);
    assert_eq!(rect(&s, filler).width(), 0.0);
}

#[test]
fn items_forward_to_their_owner_box() {
    let mut s = slide(100.0, 100.0);
    let root = s.root();
    let b = s.add_box(root, BoxOpts::new().width(10).height(10)).unwrap();
    let item = s.rect(b, Paint::stroke("red"), None, None).unwrap();
    let child = s.add_box(item, BoxOpts::new()).unwrap();
    assert_eq!(s.parent(child), Some(b));
    assert_eq!(item.target_box(&s).unwrap(), b);
    assert!(s.get_style(item, "default", false).is_ok());
}

#[test]
fn lines_connect_lazy_points_of_other_boxes() {
    let mut s = slide(200.0, 100.0);
    let root = s.root();
    let row = s.add_box(root, BoxOpts::new().horizontal()).unwrap();
    let a = s.add_box(row, BoxOpts::new().width(40).height(40)).unwrap();
    let b = s.add_box(row, BoxOpts::new().width(40).height(40)).unwrap();
    let from = s.mid_point(a).unwrap();
    let to = s.p(b, 0, "50%").unwrap();
    let overlay = s.overlay(root, BoxOpts::new()).unwrap();
    s.line(overlay, vec![from, to], Paint::default(), None, None)
        .unwrap();

    assert!(matches!(
        s.line(overlay, vec![(0, 0).into()], Paint::default(), None, None),
        Err(DeckError::Configuration(_))
    ));

    let svg = s.render().unwrap().remove(0);
    assert!(
        svg.contains(r#"<polyline points="80,50 100,50" style="fill:none;stroke:black;stroke-width:1"/>"#),
        "{svg}"
    );
}

#[test]
fn empty_paths_add_nothing() {
    let mut s = slide(100.0, 100.0);
    let root = s.root();
    assert_eq!(s.path(root, vec![], Paint::default(), None).unwrap(), None);
    assert!(
        s.path(
            root,
            vec![PathCommand::LineTo((1, 1).into())],
            Paint::default(),
            None
        )
        .is_err()
    );
    let id = s
        .path(
            root,
            vec![
                PathCommand::MoveTo((0, 0).into()),
                PathCommand::LineTo((10, 0).into()),
            ],
            Paint::default(),
            Some(Arrow::default()),
        )
        .unwrap();
    assert!(id.is_some());
    let svg = s.render().unwrap().remove(0);
    assert!(svg.contains("<path d=\"M0,0"));
    assert!(svg.contains("<polygon"));
}

#[test]
fn text_requests_its_measured_size() {
    let ctx = BuildContext::new(temp_dir("text_ctx"));
    let mut s = slide(400.0, 300.0);
    let root = s.root();
    let b = s.add_box(root, BoxOpts::new()).unwrap();
    s.text(
        &ctx,
        b,
        "ab\n~bold{cd}",
        TextStyle::default().with_size(10.0),
        TextOpts::default(),
    )
    .unwrap();
    s.layout().unwrap();
    let r = rect(&s, b);
    // Two characters at 10px * 0.55, bold runs 5% wider; two lines of 12px.
    assert!((r.width() - 11.55).abs() < 1e-9, "{r:?}");
    assert!((r.height() - 24.0).abs() < 1e-9);

    let err = s
        .text(&ctx, b, "~nope{x}", "default", TextOpts::default())
        .unwrap_err();
    assert!(matches!(err, DeckError::StyleNotFound(_)));
    let err = s
        .text(&ctx, b, "x", "nope", TextOpts::default())
        .unwrap_err();
    assert!(matches!(err, DeckError::StyleNotFound(_)));
}

#[test]
fn scale_to_fit_text_requests_nothing() {
    let ctx = BuildContext::new(temp_dir("fit_ctx"));
    let mut s = slide(400.0, 300.0);
    let root = s.root();
    let b = s.add_box(root, BoxOpts::new()).unwrap();
    s.text(
        &ctx,
        b,
        "a long line of text",
        "default",
        TextOpts {
            scale_to_fit: true,
            ..TextOpts::default()
        },
    )
    .unwrap();
    s.layout().unwrap();
    assert_eq!(rect(&s, b).width(), 0.0);
}

struct KeywordHighlighter;

impl Highlighter for KeywordHighlighter {
    fn highlight(&self, text: &str, _language: &str) -> DeckResult<Vec<Token>> {
        let mut out = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push(Token::Newline(1));
            }
            match line.strip_prefix("fn") {
                Some(rest) => {
                    out.push(Token::Begin("hl.keyword".to_string()));
                    out.push(Token::Text("fn".to_string()));
                    out.push(Token::End);
                    if !rest.is_empty() {
                        out.push(Token::Text(rest.to_string()));
                    }
                }
                None if !line.is_empty() => out.push(Token::Text(line.to_string())),
                None => {}
            }
        }
        Ok(out)
    }
}

#[test]
fn code_merges_highlighting_with_inline_styles() {
    let ctx = BuildContext::new(temp_dir("code_ctx")).with_highlighter(KeywordHighlighter);
    let mut s = slide(800.0, 600.0);
    let root = s.root();
    let b = s.add_box(root, BoxOpts::new()).unwrap();
    s.code(
        &ctx,
        b,
        "rust",
        "\nfn ~emph{main}()\n\tx",
        CodeOpts {
            use_styles: true,
            line_numbers: true,
            ..CodeOpts::default()
        },
    )
    .unwrap();
    let svg = s.render().unwrap().remove(0);
    assert!(svg.contains(">fn</tspan>"), "{svg}");
    assert!(svg.contains("fill:#008000"));
    assert!(svg.contains("font-style:italic"));
    assert!(svg.contains(">3 </tspan>"));
    assert!(svg.contains(">    x</tspan>"));
    assert!(svg.contains("font-family:monospace"));
}

#[test]
fn plain_code_keeps_markup_literal() {
    let ctx = BuildContext::new(temp_dir("plain_code_ctx"));
    let mut s = slide(800.0, 600.0);
    let root = s.root();
    s.code(&ctx, root, "", "a ~b{c}", CodeOpts::default())
        .unwrap();
    let svg = s.render().unwrap().remove(0);
    assert!(svg.contains(">a ~b{c}</tspan>"), "{svg}");
}

fn write_png(path: &Path, w: u32, h: u32) {
    image::RgbaImage::new(w, h).save(path).unwrap();
}

#[test]
fn bitmap_images_fit_their_box() {
    let tmp = temp_dir("bitmap");
    std::fs::create_dir_all(&tmp).unwrap();
    let png = tmp.join("pic.png");
    write_png(&png, 40, 20);
    let name = png.to_string_lossy().to_string();

    let mut ctx = BuildContext::new(tmp.join("cache"));
    let mut s = slide(400.0, 300.0);
    let root = s.root();
    let b = s.add_box(root, BoxOpts::new().width(100)).unwrap();
    s.image(&mut ctx, b, &name, ImageOpts::default()).unwrap();
    s.layout().unwrap();
    assert_eq!(rect(&s, b).height(), 20.0);
    let svg = s.render_step(1).unwrap();
    assert!(svg.contains(r#"width="40" height="20""#), "{svg}");
    assert!(svg.contains("data:image/png;base64,"));

    assert!(matches!(
        s.image(&mut ctx, b, "pic.bmp", ImageOpts::default()),
        Err(DeckError::Configuration(_))
    ));
    assert!(matches!(
        s.image(&mut ctx, b, &tmp.join("gone.png").to_string_lossy(), ImageOpts::default()),
        Err(DeckError::Resource(_))
    ));
    std::fs::remove_dir_all(&tmp).ok();
}

const LAYERED: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"
     xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="10" height="10">
  <g inkscape:label="**1"><circle r="1"/></g>
  <g inkscape:label="**2"><rect width="1" height="1"/></g>
</svg>"#;

#[test]
fn svg_fragments_raise_the_step_count() {
    let tmp = temp_dir("svg_steps");
    std::fs::create_dir_all(&tmp).unwrap();
    let file = tmp.join("layers.svg");
    std::fs::write(&file, LAYERED).unwrap();
    let name = file.to_string_lossy().to_string();
    let mut ctx = BuildContext::new(tmp.join("cache"));

    let mut s = slide(100.0, 100.0);
    let root = s.root();
    s.image(&mut ctx, root, &name, ImageOpts::default()).unwrap();
    assert_eq!(s.max_step(), 2);
    s.image(
        &mut ctx,
        root,
        &name,
        ImageOpts {
            show_begin: 3,
            ..ImageOpts::default()
        },
    )
    .unwrap();
    assert_eq!(s.max_step(), 4);

    let mut whole = slide(100.0, 100.0);
    let root = whole.root();
    whole
        .image(
            &mut ctx,
            root,
            &name,
            ImageOpts {
                fragments: false,
                ..ImageOpts::default()
            },
        )
        .unwrap();
    assert_eq!(whole.max_step(), 1);
    let svg = whole.render().unwrap().remove(0);
    assert!(svg.contains("<circle") && svg.contains("<rect width=\"1\""));

    assert!(matches!(
        s.image(
            &mut ctx,
            root,
            &name,
            ImageOpts {
                show_begin: 0,
                ..ImageOpts::default()
            }
        ),
        Err(DeckError::Configuration(_))
    ));
    std::fs::remove_dir_all(&tmp).ok();
}

struct FixedOra;

impl OraConverter for FixedOra {
    fn convert(&self, _source: &Path) -> DeckResult<String> {
        Ok(LAYERED.to_string())
    }
}

#[test]
fn ora_images_go_through_the_converter() {
    let tmp = temp_dir("ora_image");
    std::fs::create_dir_all(&tmp).unwrap();
    let file = tmp.join("paint.ora");
    std::fs::write(&file, b"ora").unwrap();
    let mut ctx = BuildContext::new(tmp.join("cache")).with_ora_converter(FixedOra);
    let mut s = slide(100.0, 100.0);
    let root = s.root();
    s.image(&mut ctx, root, &file.to_string_lossy(), ImageOpts::default())
        .unwrap();
    assert_eq!(s.max_step(), 2);
    std::fs::remove_dir_all(&tmp).ok();
}

struct SquareLatex;

impl LatexRenderer for SquareLatex {
    fn render(&self, document: &str) -> DeckResult<String> {
        assert!(document.contains(r"\begin{document}"));
        Ok(r#"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="15"/>"#.to_string())
    }
}

#[test]
fn latex_requests_scaled_size() {
    let tmp = temp_dir("latex_item");
    let mut ctx = BuildContext::new(tmp.join("cache")).with_latex_renderer(SquareLatex);
    let mut s = slide(200.0, 100.0);
    let root = s.root();
    let b = s.add_box(root, BoxOpts::new()).unwrap();
    s.latex(&mut ctx, b, "$x$", 2.0, None, None).unwrap();
    s.layout().unwrap();
    assert_eq!(
        (rect(&s, b).width(), rect(&s, b).height()),
        (60.0, 30.0)
    );
    let svg = s.render_step(1).unwrap();
    assert!(svg.contains("translate(70, 35) scale(2)"), "{svg}");
    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn latex_scale_must_be_a_non_negative_number() {
    let tmp = temp_dir("latex_scale");
    let mut ctx = BuildContext::new(tmp.join("cache")).with_latex_renderer(SquareLatex);
    let mut s = slide(200.0, 100.0);
    let root = s.root();
    for bad in [f64::NAN, f64::INFINITY, -1.0] {
        let err = s.latex(&mut ctx, root, "$x$", bad, None, None).unwrap_err();
        assert!(matches!(err, DeckError::Configuration(_)), "{bad}: {err}");
    }
    s.latex(&mut ctx, root, "$x$", 0.0, None, None).unwrap();
    s.layout().unwrap();
    assert!(s.render_step(1).unwrap().contains("scale(0)"));
    std::fs::remove_dir_all(&tmp).ok();
}
