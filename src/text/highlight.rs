use crate::{
    foundation::error::DeckResult,
    text::parse::{Token, parse_text},
};

/// Syntax-highlighting collaborator.
///
/// Returns a token stream over exactly the input text; style names it emits are resolved through
/// the box style chain (names that do not resolve render unstyled).
pub trait Highlighter {
    /// Classify `text` written in `language` into styled runs.
    fn highlight(&self, text: &str, language: &str) -> DeckResult<Vec<Token>>;
}

/// Highlighter that leaves text unstyled.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, text: &str, _language: &str) -> DeckResult<Vec<Token>> {
        parse_text(text, None)
    }
}
