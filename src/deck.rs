use crate::{
    foundation::core::Step,
    foundation::error::{DeckError, DeckResult},
    text::style::{StyleTable, TextStyle, default_styles},
    tree::slide::Slide,
};

/// Deck-wide settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Slide width in pixels.
    pub width: f64,
    /// Slide height in pixels.
    pub height: f64,
    /// Page background color.
    pub bg_color: String,
    /// Prefix of rendered slide file stems.
    pub name_prefix: String,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            bg_color: "white".to_string(),
            name_prefix: String::new(),
        }
    }
}

impl DeckConfig {
    /// Parse a JSON object; missing keys take their defaults.
    pub fn from_json_str(s: &str) -> DeckResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| DeckError::configuration(format!("invalid deck config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> DeckResult<()> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0)
        {
            return Err(DeckError::configuration(format!(
                "slide size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Handle of a slide inside a [`Deck`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SlideId(pub(crate) u32);

/// SVG documents of one slide, one per step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedSlide {
    /// Slide name.
    pub name: String,
    /// `name_prefix` followed by the slide's zero-padded position.
    pub file_stem: String,
    /// Document for step `i + 1` at index `i`.
    pub steps: Vec<String>,
}

impl RenderedSlide {
    /// Document shown at `step` (1-based).
    pub fn step(&self, step: Step) -> Option<&str> {
        let idx = usize::try_from(step).ok()?.checked_sub(1)?;
        self.steps.get(idx).map(String::as_str)
    }
}

/// An ordered collection of slides sharing configuration and base styles.
#[derive(Clone, Debug)]
pub struct Deck {
    config: DeckConfig,
    styles: StyleTable,
    slides: Vec<Slide>,
}

impl Deck {
    /// Empty deck.
    pub fn new(config: DeckConfig) -> DeckResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            styles: default_styles(),
            slides: Vec::new(),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    /// Define a base style for slides created afterwards.
    pub fn set_style(&mut self, name: impl Into<String>, style: TextStyle) {
        self.styles.insert(name.into(), style);
    }

    /// Override fields of a base style for slides created afterwards.
    pub fn update_style(&mut self, name: &str, style: &TextStyle) -> DeckResult<()> {
        let s = self
            .styles
            .get_mut(name)
            .ok_or_else(|| DeckError::style_not_found(format!("'{name}' in deck styles")))?;
        s.update(style);
        Ok(())
    }

    /// Append a slide.
    pub fn new_slide(&mut self, name: impl Into<String>) -> DeckResult<SlideId> {
        let id = SlideId(
            self.slides
                .len()
                .try_into()
                .map_err(|_| DeckError::configuration("too many slides"))?,
        );
        self.slides
            .push(Slide::new(name, &self.config, self.styles.clone()));
        Ok(id)
    }

    /// Slide by id.
    pub fn slide(&self, id: SlideId) -> DeckResult<&Slide> {
        self.slides
            .get(id.0 as usize)
            .ok_or_else(|| DeckError::configuration(format!("unknown slide {}", id.0)))
    }

    /// Mutable slide by id.
    pub fn slide_mut(&mut self, id: SlideId) -> DeckResult<&mut Slide> {
        self.slides
            .get_mut(id.0 as usize)
            .ok_or_else(|| DeckError::configuration(format!("unknown slide {}", id.0)))
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Lay out every slide once and draw all of its steps.
    ///
    /// Any failure aborts the whole build; no partial output is returned.
    #[tracing::instrument(skip(self), fields(slides = self.slides.len()))]
    pub fn render(&mut self) -> DeckResult<Vec<RenderedSlide>> {
        let width = self.slides.len().max(1).to_string().len().max(3);
        let prefix = &self.config.name_prefix;
        self.slides
            .iter_mut()
            .enumerate()
            .map(|(i, slide)| {
                let steps = slide.render()?;
                tracing::debug!(slide = %slide.name(), steps = steps.len(), "slide rendered");
                Ok(RenderedSlide {
                    name: slide.name().to_string(),
                    file_stem: format!("{prefix}{i:0width$}"),
                    steps,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/unit/deck/deck.rs"]
mod tests;
