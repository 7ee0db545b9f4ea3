use crate::{
    foundation::core::{LayoutId, Point},
    foundation::error::{DeckError, DeckResult},
    layout::node::LayoutArena,
    layout::value::{PosSpec, Value, parse_pos},
};

/// Layout axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Anchor {
    Px(f64),
    Fraction(f64),
}

/// A coordinate deferred until the anchor box has its final rectangle.
///
/// Produced by [`crate::Slide::x`] / [`crate::Slide::y`]; shifting by a constant is supported via
/// `+` and `-`.
#[derive(Clone, Debug, PartialEq)]
pub struct LazyValue {
    anchor: LayoutId,
    axis: Axis,
    offset: Anchor,
    shift: f64,
}

impl LazyValue {
    pub(crate) fn new(anchor: LayoutId, axis: Axis, value: &Value) -> DeckResult<Self> {
        let offset = match parse_pos(Some(value))? {
            PosSpec::Abs(v) => Anchor::Px(v),
            PosSpec::Percent(p) => Anchor::Fraction(p),
            other => {
                return Err(DeckError::configuration(format!(
                    "unsupported lazy coordinate {other:?}; use a number or 'NN%'"
                )));
            }
        };
        Ok(Self {
            anchor,
            axis,
            offset,
            shift: 0.0,
        })
    }

    /// Layout node whose rectangle this value reads.
    pub fn anchor(&self) -> LayoutId {
        self.anchor
    }

    /// Axis the value is measured along.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Resolve against the anchor's final rectangle.
    pub fn eval(&self, layout: &LayoutArena) -> DeckResult<f64> {
        let rect = layout.rect(self.anchor).ok_or_else(|| {
            DeckError::layout(format!(
                "lazy value anchored to layout node {} evaluated before it was resolved",
                self.anchor.0
            ))
        })?;
        let (origin, extent) = match self.axis {
            Axis::X => (rect.x0, rect.width()),
            Axis::Y => (rect.y0, rect.height()),
        };
        let base = match self.offset {
            Anchor::Px(v) => origin + v,
            Anchor::Fraction(p) => origin + extent * p,
        };
        Ok(base + self.shift)
    }
}

impl std::ops::Add<f64> for LazyValue {
    type Output = LazyValue;

    fn add(mut self, rhs: f64) -> Self::Output {
        self.shift += rhs;
        self
    }
}

impl std::ops::Sub<f64> for LazyValue {
    type Output = LazyValue;

    fn sub(mut self, rhs: f64) -> Self::Output {
        self.shift -= rhs;
        self
    }
}

/// A literal or deferred coordinate.
#[derive(Clone, Debug, PartialEq)]
pub enum Coord {
    /// Already known.
    Fixed(f64),
    /// Known after layout.
    Lazy(LazyValue),
}

impl Coord {
    /// Evaluate; literals pass through without consulting the layout.
    pub fn eval(&self, layout: &LayoutArena) -> DeckResult<f64> {
        match self {
            Self::Fixed(v) => Ok(*v),
            Self::Lazy(lv) => lv.eval(layout),
        }
    }
}

impl From<f64> for Coord {
    fn from(v: f64) -> Self {
        Self::Fixed(v)
    }
}

impl From<i32> for Coord {
    fn from(v: i32) -> Self {
        Self::Fixed(f64::from(v))
    }
}

impl From<LazyValue> for Coord {
    fn from(v: LazyValue) -> Self {
        Self::Lazy(v)
    }
}

/// A pair of coordinates, each either literal or deferred.
#[derive(Clone, Debug, PartialEq)]
pub struct LazyPoint {
    /// Horizontal coordinate.
    pub x: Coord,
    /// Vertical coordinate.
    pub y: Coord,
}

impl LazyPoint {
    /// Combine two coordinates.
    pub fn new(x: impl Into<Coord>, y: impl Into<Coord>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Shift both coordinates by a constant offset.
    pub fn add(self, dx: f64, dy: f64) -> Self {
        let shift = |c: Coord, d: f64| match c {
            Coord::Fixed(v) => Coord::Fixed(v + d),
            Coord::Lazy(lv) => Coord::Lazy(lv + d),
        };
        Self {
            x: shift(self.x, dx),
            y: shift(self.y, dy),
        }
    }

    /// Resolve to a concrete point.
    pub fn eval(&self, layout: &LayoutArena) -> DeckResult<Point> {
        Ok(Point::new(self.x.eval(layout)?, self.y.eval(layout)?))
    }
}

impl From<(f64, f64)> for LazyPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(i32, i32)> for LazyPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for LazyPoint {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/lazy.rs"]
mod tests;
