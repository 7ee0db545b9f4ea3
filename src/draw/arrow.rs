use crate::{
    foundation::core::{Point, Vec2},
    render::xml::{XmlWriter, fmt_num},
};

/// Arrow head drawn at the end of a line or path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Arrow {
    /// Length of the head.
    pub size: f64,
    /// Opening angle in degrees.
    pub angle: f64,
    /// Draw the head as a stroked outline of this width instead of a filled triangle.
    pub stroke_width: Option<f64>,
    /// Depth of the notch at the back of the head, as a fraction of `size`.
    pub inner: Option<f64>,
}

impl Default for Arrow {
    fn default() -> Self {
        Self {
            size: 10.0,
            angle: 40.0,
            stroke_width: None,
            inner: None,
        }
    }
}

impl Arrow {
    /// Head of the given size with the default angle.
    pub fn new(size: f64) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    fn half_angle(&self) -> f64 {
        self.angle.to_radians() / 2.0
    }

    /// Where the shaft should end so it does not poke through the head at `tip`.
    pub(crate) fn move_end_point(&self, from: Point, tip: Point) -> Point {
        let dir = direction(from, tip);
        let shift = if self.stroke_width.is_some() {
            0.0
        } else {
            self.inner.unwrap_or(1.0) * self.size * self.half_angle().cos()
        };
        tip - dir * shift
    }

    pub(crate) fn render(&self, xml: &mut dyn XmlWriter, from: Point, tip: Point, color: &str) {
        let back = direction(from, tip) * -self.size;
        let a = self.half_angle();
        let mut points = vec![tip + rotate(back, a), tip, tip + rotate(back, -a)];
        if let Some(inner) = self.inner {
            points.push(tip + back * (inner * a.cos()));
        }
        let coords = points
            .iter()
            .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
            .collect::<Vec<_>>()
            .join(" ");

        match self.stroke_width {
            Some(w) => {
                xml.element("polyline");
                xml.set("points", &coords);
                xml.set(
                    "style",
                    &format!("fill:none;stroke:{color};stroke-width:{}", fmt_num(w)),
                );
                xml.close("polyline");
            }
            None => {
                xml.element("polygon");
                xml.set("points", &coords);
                xml.set("style", &format!("fill:{color};stroke:none"));
                xml.close("polygon");
            }
        }
    }
}

fn direction(from: Point, tip: Point) -> Vec2 {
    let v = tip - from;
    if v.hypot() == 0.0 {
        Vec2::ZERO
    } else {
        v.normalize()
    }
}

fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

#[cfg(test)]
#[path = "../../tests/unit/draw/arrow.rs"]
mod tests;
