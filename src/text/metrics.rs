use crate::text::style::TextStyle;

/// Font metrics collaborator used to size text boxes.
///
/// Shaping is delegated: implementations may wrap a real shaper; the crate only needs run
/// widths and the ascent used to place baselines.
pub trait TextMetrics {
    /// Advance width of `text` rendered with the fully resolved `style`.
    fn run_width(&self, text: &str, style: &TextStyle) -> f64;

    /// Distance from the top of a line box to its baseline.
    fn ascent(&self, style: &TextStyle) -> f64 {
        style.size_or_default() * 0.8
    }
}

/// Fixed per-character advance estimate.
#[derive(Clone, Copy, Debug)]
pub struct ApproxTextMetrics {
    /// Advance of one character as a fraction of the font size (proportional fonts).
    pub em_ratio: f64,
    /// Advance of one character as a fraction of the font size (monospace fonts).
    pub mono_em_ratio: f64,
}

impl Default for ApproxTextMetrics {
    fn default() -> Self {
        Self {
            em_ratio: 0.55,
            mono_em_ratio: 0.6,
        }
    }
}

impl TextMetrics for ApproxTextMetrics {
    fn run_width(&self, text: &str, style: &TextStyle) -> f64 {
        let mono = style
            .font
            .as_deref()
            .is_some_and(|f| f.to_ascii_lowercase().contains("mono"));
        let ratio = if mono { self.mono_em_ratio } else { self.em_ratio };
        let bold = if style.bold == Some(true) { 1.05 } else { 1.0 };
        text.chars().count() as f64 * style.size_or_default() * ratio * bold
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/metrics.rs"]
mod tests;
