use std::sync::Arc;

use crate::{
    assets::image::{BitmapAsset, SvgAsset},
    draw::arrow::Arrow,
    draw::paint::Paint,
    draw::path::{PathCommand, end_segment, eval_commands, replace_end_point, to_svg_data},
    draw::text::TextBlock,
    foundation::core::{Point, Rect, Step},
    foundation::error::DeckResult,
    layout::lazy::LazyPoint,
    layout::node::LayoutArena,
    render::pass::RenderCtx,
    render::xml::fmt_num,
};

/// Which part of a vector image a step shows.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SvgSteps {
    /// Whole document from `show_begin` on.
    Whole,
    /// Fragment `step - show_begin + 1`.
    Fragments,
    /// Fragment picked from the list by `step - show_begin + 1`; `None` entries show nothing.
    Select(Vec<Option<Step>>),
}

/// Deferred drawing of one item, resolved against its owner box's final rectangle.
#[derive(Clone, Debug)]
pub(crate) enum DrawCommand {
    Rect {
        paint: Paint,
        rx: Option<f64>,
        ry: Option<f64>,
    },
    Polygon {
        points: Vec<LazyPoint>,
        paint: Paint,
    },
    Polyline {
        points: Vec<LazyPoint>,
        paint: Paint,
        start_arrow: Option<Arrow>,
        end_arrow: Option<Arrow>,
    },
    Path {
        commands: Vec<PathCommand>,
        paint: Paint,
        end_arrow: Option<Arrow>,
    },
    Bitmap {
        asset: Arc<BitmapAsset>,
        scale: Option<f64>,
        name: String,
    },
    Svg {
        asset: Arc<SvgAsset>,
        scale: Option<f64>,
        show_begin: Step,
        steps: SvgSteps,
        name: String,
    },
    Latex {
        asset: Arc<SvgAsset>,
        scale: f64,
    },
    Text(TextBlock),
}

impl DrawCommand {
    pub(crate) fn draw(
        &self,
        rect: Rect,
        layout: &LayoutArena,
        ctx: &mut RenderCtx<'_>,
    ) -> DeckResult<()> {
        match self {
            Self::Rect { paint, rx, ry } => {
                let xml = &mut *ctx.xml;
                xml.element("rect");
                xml.set_num("x", rect.x0);
                xml.set_num("y", rect.y0);
                xml.set_num("width", rect.width());
                xml.set_num("height", rect.height());
                if let Some(rx) = rx {
                    xml.set_num("rx", *rx);
                }
                if let Some(ry) = ry {
                    xml.set_num("ry", *ry);
                }
                paint.write(xml);
                xml.close("rect");
            }
            Self::Polygon { points, paint } => {
                let pts = eval_points(points, layout)?;
                ctx.xml.element("polygon");
                ctx.xml.set("points", &points_attr(&pts));
                paint.write(ctx.xml);
                ctx.xml.close("polygon");
            }
            Self::Polyline {
                points,
                paint,
                start_arrow,
                end_arrow,
            } => {
                let p = eval_points(points, layout)?;
                let n = p.len();
                let mut shaft = p.clone();
                if let Some(a) = start_arrow {
                    shaft[0] = a.move_end_point(p[1], p[0]);
                }
                if let Some(a) = end_arrow {
                    shaft[n - 1] = a.move_end_point(p[n - 2], p[n - 1]);
                }
                ctx.xml.element("polyline");
                ctx.xml.set("points", &points_attr(&shaft));
                Paint {
                    bg_color: None,
                    ..paint.clone()
                }
                .write(ctx.xml);
                ctx.xml.close("polyline");

                let color = paint.color.as_deref().unwrap_or("black");
                if let Some(a) = start_arrow {
                    a.render(ctx.xml, p[1], p[0], color);
                }
                if let Some(a) = end_arrow {
                    a.render(ctx.xml, p[n - 2], p[n - 1], color);
                }
            }
            Self::Path {
                commands,
                paint,
                end_arrow,
            } => {
                let mut els = eval_commands(commands, layout)?;
                let arrow = end_arrow.as_ref().zip(end_segment(&els));
                if let Some((a, (from, tip))) = &arrow {
                    replace_end_point(&mut els, a.move_end_point(*from, *tip));
                }
                ctx.xml.element("path");
                ctx.xml.set("d", &to_svg_data(els));
                paint.write(ctx.xml);
                ctx.xml.close("path");
                if let Some((a, (from, tip))) = arrow {
                    a.render(ctx.xml, from, tip, paint.color.as_deref().unwrap_or("black"));
                }
            }
            Self::Bitmap { asset, scale, name } => {
                let (w, h) = (f64::from(asset.width), f64::from(asset.height));
                let s = image_scale(*scale, rect, w, h, name);
                let (x, y) = centered(rect, w * s, h * s);
                ctx.xml.element("image");
                ctx.xml.set_num("x", x);
                ctx.xml.set_num("y", y);
                ctx.xml.set_num("width", w * s);
                ctx.xml.set_num("height", h * s);
                ctx.xml.set(
                    "xlink:href",
                    &format!("data:{};base64,{}", asset.mime, asset.base64),
                );
                ctx.xml.close("image");
            }
            Self::Svg {
                asset,
                scale,
                show_begin,
                steps,
                name,
            } => {
                let Some(data) = svg_data(asset, *show_begin, steps, ctx.step) else {
                    return Ok(());
                };
                let s = image_scale(*scale, rect, asset.width, asset.height, name);
                let (x, y) = centered(rect, asset.width * s, asset.height * s);
                embed_svg(ctx, x, y, s, &data);
            }
            Self::Latex { asset, scale } => {
                let (x, y) = centered(rect, asset.width * scale, asset.height * scale);
                embed_svg(ctx, x, y, *scale, &asset.full());
            }
            Self::Text(block) => block.draw(rect, ctx.xml),
        }
        Ok(())
    }
}

fn svg_data(asset: &SvgAsset, show_begin: Step, steps: &SvgSteps, step: Step) -> Option<Arc<str>> {
    if step < show_begin {
        return None;
    }
    let local = step - show_begin + 1;
    match steps {
        SvgSteps::Whole => Some(asset.full()),
        SvgSteps::Fragments => asset.fragment(local),
        SvgSteps::Select(list) => {
            let idx = usize::try_from(local).ok()?.checked_sub(1)?;
            let picked = (*list.get(idx)?)?;
            asset.fragment(picked)
        }
    }
}

fn embed_svg(ctx: &mut RenderCtx<'_>, x: f64, y: f64, scale: f64, data: &str) {
    ctx.xml.element("g");
    let mut transform = format!("translate({}, {})", fmt_num(x), fmt_num(y));
    if scale != 1.0 {
        transform.push_str(&format!(" scale({})", fmt_num(scale)));
    }
    ctx.xml.set("transform", &transform);
    ctx.xml.raw_text(data);
    ctx.xml.close("g");
}

/// Scale fitting a `width` x `height` image into `rect`, if the rectangle constrains it.
///
/// Both sides set: the smaller ratio. One side set: that side's ratio.
pub(crate) fn scaler(rect: Rect, width: f64, height: f64) -> Option<f64> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let sx = rect.width() / width;
    let sy = rect.height() / height;
    match (rect.width() > 0.0, rect.height() > 0.0) {
        (true, true) => Some(sx.min(sy)),
        (true, false) => Some(sx),
        (false, true) => Some(sy),
        (false, false) => None,
    }
}

fn image_scale(scale: Option<f64>, rect: Rect, width: f64, height: f64, name: &str) -> f64 {
    if let Some(s) = scale {
        return s;
    }
    scaler(rect, width, height).unwrap_or_else(|| {
        tracing::warn!(
            image = name,
            "scale of image is 0; set scale explicitly or give the parent box a size"
        );
        0.0
    })
}

fn centered(rect: Rect, width: f64, height: f64) -> (f64, f64) {
    (
        rect.x0 + (rect.width() - width) / 2.0,
        rect.y0 + (rect.height() - height) / 2.0,
    )
}

fn eval_points(points: &[LazyPoint], layout: &LayoutArena) -> DeckResult<Vec<Point>> {
    points.iter().map(|p| p.eval(layout)).collect()
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/draw/command.rs"]
mod tests;
