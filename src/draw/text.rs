use crate::{
    foundation::core::Rect,
    render::xml::{XmlWriter, fmt_num},
    text::metrics::TextMetrics,
    text::parse::{Token, token_lines},
    text::style::{TextAlign, TextStyle},
};

#[derive(Clone, Debug, PartialEq)]
struct StyledRun {
    text: String,
    style: TextStyle,
}

#[derive(Clone, Debug, PartialEq)]
struct TextLine {
    runs: Vec<StyledRun>,
    baseline: f64,
}

/// Text measured at authoring time, ready to draw without metrics.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextBlock {
    lines: Vec<TextLine>,
    align: TextAlign,
    width: f64,
    height: f64,
    scale_to_fit: bool,
}

impl TextBlock {
    /// Resolve run styles over `base` and measure every line.
    ///
    /// Style names `lookup` cannot resolve leave the run in its enclosing style.
    pub(crate) fn build(
        tokens: &[Token],
        base: &TextStyle,
        lookup: impl Fn(&str) -> Option<TextStyle>,
        metrics: &dyn TextMetrics,
        scale_to_fit: bool,
    ) -> Self {
        let base_line = base.size_or_default() * base.line_spacing_or_default();
        let mut lines = Vec::new();
        let mut width = 0.0f64;
        let mut top = 0.0f64;

        for line in token_lines(tokens) {
            let mut runs = Vec::with_capacity(line.len());
            let mut line_width = 0.0;
            let mut line_height = base_line;
            let mut ascent = metrics.ascent(base);
            for run in line {
                let mut style = base.clone();
                for name in &run.styles {
                    match lookup(name) {
                        Some(s) => style.update(&s),
                        None => tracing::debug!(style = %name, "unresolved run style, drawn unstyled"),
                    }
                }
                line_width += metrics.run_width(&run.text, &style);
                line_height =
                    line_height.max(style.size_or_default() * style.line_spacing_or_default());
                ascent = ascent.max(metrics.ascent(&style));
                runs.push(StyledRun {
                    text: run.text,
                    style,
                });
            }
            width = width.max(line_width);
            // Leading split evenly above and below the glyphs.
            let baseline = top + (line_height - base.size_or_default()).max(0.0) / 2.0 + ascent;
            lines.push(TextLine { runs, baseline });
            top += line_height;
        }

        Self {
            lines,
            align: base.align.unwrap_or_default(),
            width,
            height: top,
            scale_to_fit,
        }
    }

    pub(crate) fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub(crate) fn scale_to_fit(&self) -> bool {
        self.scale_to_fit
    }

    pub(crate) fn draw(&self, rect: Rect, xml: &mut dyn XmlWriter) {
        let scale = if self.scale_to_fit && self.width > 0.0 && self.height > 0.0 {
            let fit = (rect.width() / self.width).min(rect.height() / self.height);
            if fit <= 0.0 {
                tracing::warn!(
                    lines = self.lines.len(),
                    "scale of text is 0; give the parent box a size or disable scale_to_fit"
                );
            }
            fit
        } else {
            1.0
        };
        let ox = rect.x0 + (rect.width() - self.width * scale) / 2.0;
        let oy = rect.y0 + (rect.height() - self.height * scale) / 2.0;

        xml.element("g");
        let mut transform = format!("translate({}, {})", fmt_num(ox), fmt_num(oy));
        if scale != 1.0 {
            transform.push_str(&format!(" scale({})", fmt_num(scale)));
        }
        xml.set("transform", &transform);

        let (anchor, x) = match self.align {
            TextAlign::Left => ("start", 0.0),
            TextAlign::Middle => ("middle", self.width / 2.0),
            TextAlign::Right => ("end", self.width),
        };
        for line in self.lines.iter().filter(|l| !l.runs.is_empty()) {
            xml.element("text");
            xml.set_num("x", x);
            xml.set_num("y", line.baseline);
            xml.set("text-anchor", anchor);
            xml.set("xml:space", "preserve");
            for run in line.runs.iter().filter(|r| !r.text.is_empty()) {
                xml.element("tspan");
                xml.set("style", &font_style(&run.style));
                xml.text(&run.text);
                xml.close("tspan");
            }
            xml.close("text");
        }
        xml.close("g");
    }
}

fn font_style(s: &TextStyle) -> String {
    let mut parts = Vec::with_capacity(6);
    if let Some(font) = &s.font {
        parts.push(format!("font-family:{font}"));
    }
    parts.push(format!("font-size:{}px", fmt_num(s.size_or_default())));
    parts.push(format!("fill:{}", s.color.as_deref().unwrap_or("black")));
    if s.bold == Some(true) {
        parts.push("font-weight:bold".to_string());
    }
    if s.italic == Some(true) {
        parts.push("font-style:italic".to_string());
    }
    if s.underline == Some(true) {
        parts.push("text-decoration:underline".to_string());
    }
    parts.join(";")
}

#[cfg(test)]
#[path = "../../tests/unit/draw/text.rs"]
mod tests;
