//! slidebox builds slide decks as trees of nested, constraint-positioned boxes and renders them
//! to SVG, one document per reveal step.
//!
//! # Pipeline overview
//!
//! 1. **Author**: boxes and drawable items are added to a [`Slide`] through [`BoxLike`] targets;
//!    resources (images, typeset math) are loaded and measured immediately through a
//!    [`BuildContext`], so a bad asset fails the call that references it.
//! 2. **Layout**: each slide's [`LayoutArena`] is solved once: intrinsic sizes bottom-up, then
//!    rectangles top-down (explicit, percentage, fill and flow placement).
//! 3. **Draw**: for every step `1..=max_step`, items of visible boxes are painted ordered by
//!    z-level first and document order second.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: drawing the same step twice yields identical output.
//! - **No IO while drawing**: all file and process IO happens during authoring.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod deck;
mod draw;
mod foundation;
mod layout;
mod render;
mod show;
mod text;
mod tree;

pub use assets::cache::{
    AssetKind, CacheKey, CachedAsset, FsCache, MemCache, normalize_path_key,
};
pub use assets::context::BuildContext;
pub use assets::image::{
    BitmapAsset, ImageFormat, OraConverter, SvgAsset, image_format, svg_size_to_pixels,
};
pub use assets::latex::{
    CommandLatexRenderer, DEFAULT_LATEX_HEADER, DEFAULT_LATEX_TAIL, LatexRenderer,
    latex_document,
};
pub use deck::{Deck, DeckConfig, RenderedSlide, SlideId};
pub use draw::arrow::Arrow;
pub use draw::paint::Paint;
pub use draw::path::PathCommand;
pub use foundation::core::{BoxId, Edges, ItemId, LayoutId, Point, Rect, Step, Vec2};
pub use foundation::error::{DeckError, DeckResult};
pub use layout::lazy::{Axis, Coord, LazyPoint, LazyValue};
pub use layout::node::LayoutArena;
pub use layout::value::Value;
pub use render::pass::RenderCtx;
pub use render::xml::{SvgWriter, XmlWriter, fmt_num};
pub use show::info::{ShowInfo, ShowSelector};
pub use text::highlight::{Highlighter, PlainHighlighter};
pub use text::metrics::{ApproxTextMetrics, TextMetrics};
pub use text::parse::{
    Run, Token, add_line_numbers, parse_text, token_lines, tokens_merge,
    tokens_to_text_without_style,
};
pub use text::style::{StyleRef, StyleTable, TextAlign, TextStyle, default_styles};
pub use tree::boxlike::{BoxLike, BoxOpts, CodeOpts, ImageOpts, TextOpts};
pub use tree::slide::{Child, Slide};
