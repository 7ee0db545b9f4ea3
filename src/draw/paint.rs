use crate::render::xml::{XmlWriter, fmt_num};

/// Stroke and fill of a shape.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Paint {
    /// Stroke color; no stroke when unset.
    pub color: Option<String>,
    /// Fill color; no fill when unset.
    pub bg_color: Option<String>,
    /// Stroke width in pixels.
    pub stroke_width: f64,
    /// SVG dash pattern of the stroke.
    pub stroke_dasharray: Option<String>,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: None,
            bg_color: None,
            stroke_width: 1.0,
            stroke_dasharray: None,
        }
    }
}

impl Paint {
    /// Stroke-only paint.
    pub fn stroke(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Fill-only paint.
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            bg_color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Builder: set the fill color.
    pub fn with_fill(mut self, color: impl Into<String>) -> Self {
        self.bg_color = Some(color.into());
        self
    }

    /// Builder: set the stroke width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    /// Builder: set the dash pattern.
    pub fn with_dasharray(mut self, pattern: impl Into<String>) -> Self {
        self.stroke_dasharray = Some(pattern.into());
        self
    }

    /// Same paint with `color` used when no stroke color is set.
    pub(crate) fn or_stroke(mut self, color: &str) -> Self {
        if self.color.is_none() {
            self.color = Some(color.to_string());
        }
        self
    }

    pub(crate) fn write(&self, xml: &mut dyn XmlWriter) {
        xml.set("style", &self.style());
    }

    fn style(&self) -> String {
        let mut parts = vec![format!(
            "fill:{}",
            self.bg_color.as_deref().unwrap_or("none")
        )];
        match &self.color {
            Some(c) => {
                parts.push(format!("stroke:{c}"));
                parts.push(format!("stroke-width:{}", fmt_num(self.stroke_width)));
                if let Some(d) = &self.stroke_dasharray {
                    parts.push(format!("stroke-dasharray:{d}"));
                }
            }
            None => parts.push("stroke:none".to_string()),
        }
        parts.join(";")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/paint.rs"]
mod tests;
