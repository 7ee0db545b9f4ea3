use kurbo::{BezPath, PathEl};

use crate::{
    foundation::core::Point,
    foundation::error::DeckResult,
    layout::lazy::LazyPoint,
    layout::node::LayoutArena,
};

/// One SVG path command whose points may be deferred.
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    /// `M`
    MoveTo(LazyPoint),
    /// `L`
    LineTo(LazyPoint),
    /// `Q`: control point, end point.
    QuadTo(LazyPoint, LazyPoint),
    /// `C`: two control points, end point.
    CubicTo(LazyPoint, LazyPoint, LazyPoint),
    /// `Z`
    Close,
}

impl PathCommand {
    fn eval(&self, layout: &LayoutArena) -> DeckResult<PathEl> {
        Ok(match self {
            Self::MoveTo(p) => PathEl::MoveTo(p.eval(layout)?),
            Self::LineTo(p) => PathEl::LineTo(p.eval(layout)?),
            Self::QuadTo(c, p) => PathEl::QuadTo(c.eval(layout)?, p.eval(layout)?),
            Self::CubicTo(c1, c2, p) => {
                PathEl::CurveTo(c1.eval(layout)?, c2.eval(layout)?, p.eval(layout)?)
            }
            Self::Close => PathEl::ClosePath,
        })
    }
}

pub(crate) fn eval_commands(
    commands: &[PathCommand],
    layout: &LayoutArena,
) -> DeckResult<Vec<PathEl>> {
    commands.iter().map(|c| c.eval(layout)).collect()
}

/// The last segment's direction as `(from, tip)`, if the path ends on a drawn point.
pub(crate) fn end_segment(els: &[PathEl]) -> Option<(Point, Point)> {
    let (last, rest) = els.split_last()?;
    match *last {
        PathEl::CurveTo(_, c2, p) => Some((c2, p)),
        PathEl::QuadTo(c, p) => Some((c, p)),
        PathEl::LineTo(p) => rest.iter().rev().find_map(end_point).map(|prev| (prev, p)),
        PathEl::MoveTo(_) | PathEl::ClosePath => None,
    }
}

fn end_point(el: &PathEl) -> Option<Point> {
    match *el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
            Some(p)
        }
        PathEl::ClosePath => None,
    }
}

pub(crate) fn replace_end_point(els: &mut [PathEl], new_end: Point) {
    if let Some(last) = els.last_mut() {
        match last {
            PathEl::MoveTo(p) | PathEl::LineTo(p) | PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => {
                *p = new_end;
            }
            PathEl::ClosePath => {}
        }
    }
}

pub(crate) fn to_svg_data(els: Vec<PathEl>) -> String {
    BezPath::from_vec(els).to_svg()
}

#[cfg(test)]
#[path = "../../tests/unit/draw/path.rs"]
mod tests;
