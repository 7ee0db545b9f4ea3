use std::collections::BTreeMap;

/// Horizontal alignment of text lines inside their box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Flush left.
    Left,
    /// Centered.
    #[default]
    Middle,
    /// Flush right.
    Right,
}

/// Partial text style; unset fields are inherited when styles are layered.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font family name.
    pub font: Option<String>,
    /// Font size in pixels.
    pub size: Option<f64>,
    /// Line height as a multiple of `size`.
    pub line_spacing: Option<f64>,
    /// Fill color (any SVG color).
    pub color: Option<String>,
    /// Bold weight.
    pub bold: Option<bool>,
    /// Italic style.
    pub italic: Option<bool>,
    /// Underline decoration.
    pub underline: Option<bool>,
    /// Line alignment.
    pub align: Option<TextAlign>,
}

impl TextStyle {
    /// Overwrite fields that are set in `other`.
    pub fn update(&mut self, other: &TextStyle) {
        macro_rules! take {
            ($($f:ident),*) => {
                $(if other.$f.is_some() { self.$f = other.$f.clone(); })*
            };
        }
        take!(font, size, line_spacing, color, bold, italic, underline, align);
    }

    /// `self` layered with `other`.
    pub fn compose(&self, other: &TextStyle) -> TextStyle {
        let mut out = self.clone();
        out.update(other);
        out
    }

    pub(crate) fn size_or_default(&self) -> f64 {
        self.size.unwrap_or(DEFAULT_SIZE)
    }

    pub(crate) fn line_spacing_or_default(&self) -> f64 {
        self.line_spacing.unwrap_or(DEFAULT_LINE_SPACING)
    }

    /// Builder: set the font family.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Builder: set the font size.
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Builder: set the fill color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Builder: set alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }

    /// Builder: set bold.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Builder: set italic.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }
}

/// Style argument of text primitives: a name looked up through the box chain, or inline.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleRef {
    /// Named style.
    Named(String),
    /// Explicit style.
    Inline(TextStyle),
}

impl From<&str> for StyleRef {
    fn from(v: &str) -> Self {
        Self::Named(v.to_string())
    }
}

impl From<String> for StyleRef {
    fn from(v: String) -> Self {
        Self::Named(v)
    }
}

impl From<TextStyle> for StyleRef {
    fn from(v: TextStyle) -> Self {
        Self::Inline(v)
    }
}

pub(crate) const DEFAULT_SIZE: f64 = 32.0;
pub(crate) const DEFAULT_LINE_SPACING: f64 = 1.2;

/// Named styles of one box.
pub type StyleTable = BTreeMap<String, TextStyle>;

/// Styles every deck starts with.
pub fn default_styles() -> StyleTable {
    let mut t = StyleTable::new();
    t.insert(
        "default".to_string(),
        TextStyle {
            font: Some("sans-serif".to_string()),
            size: Some(DEFAULT_SIZE),
            line_spacing: Some(DEFAULT_LINE_SPACING),
            color: Some("black".to_string()),
            bold: Some(false),
            italic: Some(false),
            underline: Some(false),
            align: Some(TextAlign::Middle),
        },
    );
    t.insert("tt".to_string(), TextStyle::default().with_font("monospace"));
    t.insert("emph".to_string(), TextStyle::default().with_italic(true));
    t.insert("bold".to_string(), TextStyle::default().with_bold(true));
    t.insert(
        "code".to_string(),
        TextStyle::default()
            .with_font("monospace")
            .with_size(20.0)
            .with_align(TextAlign::Left),
    );
    t.insert(
        "line_number".to_string(),
        TextStyle::default().with_color("gray"),
    );
    for (class, color) in [
        ("keyword", "#008000"),
        ("string", "#ba2121"),
        ("comment", "#408080"),
        ("number", "#666666"),
        ("function", "#0000ff"),
        ("type", "#b00040"),
    ] {
        t.insert(
            format!("hl.{class}"),
            TextStyle::default().with_color(color),
        );
    }
    t
}

#[cfg(test)]
#[path = "../../tests/unit/text/style.rs"]
mod tests;
