use crate::{
    assets::context::BuildContext,
    assets::image::{ImageFormat, image_format},
    assets::latex::latex_document,
    draw::arrow::Arrow,
    draw::command::{DrawCommand, SvgSteps},
    draw::paint::Paint,
    draw::path::PathCommand,
    draw::text::TextBlock,
    foundation::core::{BoxId, Edges, ItemId, Step},
    foundation::error::{DeckError, DeckResult},
    layout::lazy::{LazyPoint, LazyValue},
    layout::node::LayoutRequest,
    layout::value::{Value, parse_pos, parse_size},
    show::info::{ShowInfo, ShowSelector},
    text::parse::{
        Token, add_line_numbers, parse_text, tokens_merge, tokens_to_text_without_style,
    },
    text::style::{StyleRef, TextStyle},
    tree::slide::{Child, Insert, NewBox, Slide},
};

/// Anything authoring calls can target: a box, or an item (which forwards to its owning box).
pub trait BoxLike: Copy {
    /// Box that children and drawings are added to.
    fn target_box(self, slide: &Slide) -> DeckResult<BoxId>;
}

impl BoxLike for BoxId {
    fn target_box(self, slide: &Slide) -> DeckResult<BoxId> {
        slide.check_box(self)
    }
}

impl BoxLike for ItemId {
    fn target_box(self, slide: &Slide) -> DeckResult<BoxId> {
        slide.item_owner(self)
    }
}

/// Options of a new box.
///
/// Padding resolves most specific first: `p_left` over `p_x` over `padding`.
#[derive(Clone, Debug, Default)]
pub struct BoxOpts {
    /// Horizontal position.
    pub x: Option<Value>,
    /// Vertical position.
    pub y: Option<Value>,
    /// Width.
    pub width: Option<Value>,
    /// Height.
    pub height: Option<Value>,
    /// Steps the box is shown at.
    pub show: ShowSelector,
    /// Left padding.
    pub p_left: Option<f64>,
    /// Right padding.
    pub p_right: Option<f64>,
    /// Top padding.
    pub p_top: Option<f64>,
    /// Bottom padding.
    pub p_bottom: Option<f64>,
    /// Left and right padding.
    pub p_x: Option<f64>,
    /// Top and bottom padding.
    pub p_y: Option<f64>,
    /// Padding on every side.
    pub padding: Option<f64>,
    /// Lay children out left to right instead of top to bottom.
    pub horizontal: bool,
    /// Paint order key; inherited from the parent when unset.
    pub z_level: Option<i32>,
    /// Insert as the parent's first child.
    pub prepend: bool,
    /// Insert right after this sibling box or item.
    pub above: Option<Child>,
    /// Insert right before this sibling box or item.
    pub below: Option<Child>,
    /// Debug name used in error messages.
    pub name: Option<String>,
}

macro_rules! opt_setters {
    ($($(#[$doc:meta])* $field:ident: $ty:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $field(mut self, v: impl Into<$ty>) -> Self {
                self.$field = Some(v.into());
                self
            }
        )*
    };
}

impl BoxOpts {
    /// Default options: auto position and size, always shown.
    pub fn new() -> Self {
        Self::default()
    }

    opt_setters!(
        /// Set `x`.
        x: Value,
        /// Set `y`.
        y: Value,
        /// Set `width`.
        width: Value,
        /// Set `height`.
        height: Value,
        /// Set `p_left`.
        p_left: f64,
        /// Set `p_right`.
        p_right: f64,
        /// Set `p_top`.
        p_top: f64,
        /// Set `p_bottom`.
        p_bottom: f64,
        /// Set `p_x`.
        p_x: f64,
        /// Set `p_y`.
        p_y: f64,
        /// Set `padding`.
        padding: f64,
        /// Set `z_level`.
        z_level: i32,
        /// Set `above`.
        above: Child,
        /// Set `below`.
        below: Child,
        /// Set `name`.
        name: String,
    );

    /// Set `show`.
    pub fn show(mut self, v: impl Into<ShowSelector>) -> Self {
        self.show = v.into();
        self
    }

    /// Flow children horizontally.
    pub fn horizontal(mut self) -> Self {
        self.horizontal = true;
        self
    }

    /// Insert as the first child.
    pub fn prepend(mut self) -> Self {
        self.prepend = true;
        self
    }

    fn edges(&self) -> DeckResult<Edges> {
        let all = self.padding.unwrap_or(0.0);
        let e = Edges {
            left: self.p_left.or(self.p_x).unwrap_or(all),
            right: self.p_right.or(self.p_x).unwrap_or(all),
            top: self.p_top.or(self.p_y).unwrap_or(all),
            bottom: self.p_bottom.or(self.p_y).unwrap_or(all),
        };
        for v in [e.left, e.right, e.top, e.bottom] {
            if !v.is_finite() || v < 0.0 {
                return Err(DeckError::configuration(format!(
                    "padding must be a non-negative number, got {v}"
                )));
            }
        }
        Ok(e)
    }

    fn insert(&self) -> DeckResult<Insert> {
        match (self.prepend, self.above, self.below) {
            (false, None, None) => Ok(Insert::Append),
            (true, None, None) => Ok(Insert::Prepend),
            (false, Some(s), None) => Ok(Insert::Above(s)),
            (false, None, Some(s)) => Ok(Insert::Below(s)),
            _ => Err(DeckError::configuration(
                "at most one of prepend, above and below may be set",
            )),
        }
    }
}

/// Options of [`Slide::image`].
#[derive(Clone, Debug, PartialEq)]
pub struct ImageOpts {
    /// Fixed scale; fit to the box when unset.
    pub scale: Option<f64>,
    /// Reveal labelled fragments of vector images step by step.
    pub fragments: bool,
    /// Step at which the first fragment appears.
    pub show_begin: Step,
    /// Explicit fragment per step, starting at `show_begin`; `None` shows nothing at that step.
    pub select_steps: Option<Vec<Option<Step>>>,
}

impl Default for ImageOpts {
    fn default() -> Self {
        Self {
            scale: None,
            fragments: true,
            show_begin: 1,
            select_steps: None,
        }
    }
}

/// Options of [`Slide::text`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextOpts {
    /// Character starting inline style blocks (`~name{...}`); `None` disables markup.
    pub escape_char: Option<char>,
    /// Scale the text to fit its box instead of requesting space.
    pub scale_to_fit: bool,
}

impl Default for TextOpts {
    fn default() -> Self {
        Self {
            escape_char: Some('~'),
            scale_to_fit: false,
        }
    }
}

/// Options of [`Slide::code`].
#[derive(Clone, Debug, PartialEq)]
pub struct CodeOpts {
    /// Spaces per tab character.
    pub tabsize: usize,
    /// Prefix lines with numbers.
    pub line_numbers: bool,
    /// Style the snippet is drawn with.
    pub style: StyleRef,
    /// Evaluate inline style blocks inside the code.
    pub use_styles: bool,
    /// Character starting inline style blocks.
    pub escape_char: char,
    /// Scale the code to fit its box instead of requesting space.
    pub scale_to_fit: bool,
}

impl Default for CodeOpts {
    fn default() -> Self {
        Self {
            tabsize: 4,
            line_numbers: false,
            style: StyleRef::Named("code".to_string()),
            use_styles: false,
            escape_char: '~',
            scale_to_fit: false,
        }
    }
}

impl Slide {
    /// Create a child box of `parent`.
    pub fn add_box(&mut self, parent: impl BoxLike, opts: BoxOpts) -> DeckResult<BoxId> {
        let parent = parent.target_box(self)?;
        let request = LayoutRequest {
            x: parse_pos(opts.x.as_ref())?,
            y: parse_pos(opts.y.as_ref())?,
            width: parse_size(opts.width.as_ref())?,
            height: parse_size(opts.height.as_ref())?,
            padding: opts.edges()?,
            horizontal: opts.horizontal,
        };
        let show = ShowInfo::parse(&opts.show, self.max_step()).map_err(|e| match e {
            DeckError::Configuration(m) => {
                DeckError::configuration(format!("{m} (in {})", self.describe(parent)))
            }
            other => other,
        })?;
        let insert = opts.insert()?;
        self.insert_box(
            parent,
            NewBox {
                request,
                show,
                z_level: opts.z_level,
                insert,
                name: opts.name,
            },
        )
    }

    /// Box covering its parent: `x = 0`, `y = 0`, `100%` x `100%`.
    pub fn overlay(&mut self, parent: impl BoxLike, mut opts: BoxOpts) -> DeckResult<BoxId> {
        opts.x.get_or_insert(Value::Num(0.0));
        opts.y.get_or_insert(Value::Num(0.0));
        opts.width.get_or_insert_with(|| "100%".into());
        opts.height.get_or_insert_with(|| "100%".into());
        self.add_box(parent, opts)
    }

    /// Box filling its parent on both axes.
    pub fn fbox(&mut self, parent: impl BoxLike, mut opts: BoxOpts) -> DeckResult<BoxId> {
        opts.width.get_or_insert_with(|| "fill".into());
        opts.height.get_or_insert_with(|| "fill".into());
        self.add_box(parent, opts)
    }

    /// Box filling its parent across the parent's flow direction.
    pub fn sbox(&mut self, parent: impl BoxLike, mut opts: BoxOpts) -> DeckResult<BoxId> {
        let p = parent.target_box(self)?;
        if self.layout_arena().is_horizontal(self.box_layout(p)) {
            opts.height.get_or_insert_with(|| "fill".into());
        } else {
            opts.width.get_or_insert_with(|| "fill".into());
        }
        self.add_box(p, opts)
    }

    /// Rectangle around the box.
    pub fn rect(
        &mut self,
        target: impl BoxLike,
        paint: Paint,
        rx: Option<f64>,
        ry: Option<f64>,
    ) -> DeckResult<ItemId> {
        let b = target.target_box(self)?;
        self.push_item(b, DrawCommand::Rect { paint, rx, ry })
    }

    /// Closed polygon through `points`.
    pub fn polygon(
        &mut self,
        target: impl BoxLike,
        points: Vec<LazyPoint>,
        paint: Paint,
    ) -> DeckResult<ItemId> {
        let b = target.target_box(self)?;
        self.push_item(b, DrawCommand::Polygon { points, paint })
    }

    /// Polyline through at least two points, optionally with arrow heads.
    pub fn line(
        &mut self,
        target: impl BoxLike,
        points: Vec<LazyPoint>,
        paint: Paint,
        start_arrow: Option<Arrow>,
        end_arrow: Option<Arrow>,
    ) -> DeckResult<ItemId> {
        let b = target.target_box(self)?;
        if points.len() < 2 {
            return Err(DeckError::configuration(format!(
                "a line needs at least two points, got {} (in {})",
                points.len(),
                self.describe(b)
            )));
        }
        self.push_item(
            b,
            DrawCommand::Polyline {
                points,
                paint: paint.or_stroke("black"),
                start_arrow,
                end_arrow,
            },
        )
    }

    /// SVG path. An empty command list draws nothing and returns `None`.
    pub fn path(
        &mut self,
        target: impl BoxLike,
        commands: Vec<PathCommand>,
        paint: Paint,
        end_arrow: Option<Arrow>,
    ) -> DeckResult<Option<ItemId>> {
        let b = target.target_box(self)?;
        let Some(first) = commands.first() else {
            return Ok(None);
        };
        if !matches!(first, PathCommand::MoveTo(_)) {
            return Err(DeckError::configuration(format!(
                "a path must start with a move command (in {})",
                self.describe(b)
            )));
        }
        self.push_item(
            b,
            DrawCommand::Path {
                commands,
                paint: paint.or_stroke("black"),
                end_arrow,
            },
        )
        .map(Some)
    }

    /// Image from `filename` (`.svg`, `.ora`, `.png`, `.jpeg`, `.jpg`), centered in the box.
    ///
    /// Vector images may reveal labelled fragments over several steps, which raises the slide's
    /// step count to `show_begin - 1 + fragments`.
    #[tracing::instrument(skip(self, ctx, target, opts))]
    pub fn image(
        &mut self,
        ctx: &mut BuildContext,
        target: impl BoxLike,
        filename: &str,
        opts: ImageOpts,
    ) -> DeckResult<ItemId> {
        let b = target.target_box(self)?;
        if opts.show_begin == 0 {
            return Err(DeckError::configuration(format!(
                "show_begin of image '{filename}' must be at least 1"
            )));
        }
        if let Some(s) = opts.scale
            && (!s.is_finite() || s < 0.0)
        {
            return Err(DeckError::configuration(format!(
                "scale of image '{filename}' must be a non-negative number"
            )));
        }
        let request_scale = opts.scale.unwrap_or(1.0);
        let layout = self.box_layout(b);

        let svg = match image_format(filename)? {
            ImageFormat::Bitmap => {
                let asset = ctx.load_bitmap(filename)?;
                self.layout_mut().set_image_size_request(
                    layout,
                    f64::from(asset.width) * request_scale,
                    f64::from(asset.height) * request_scale,
                );
                return self.push_item(
                    b,
                    DrawCommand::Bitmap {
                        asset,
                        scale: opts.scale,
                        name: filename.to_string(),
                    },
                );
            }
            ImageFormat::Svg => ctx.load_svg(filename)?,
            ImageFormat::Ora => ctx.load_ora(filename)?,
        };

        self.layout_mut().set_image_size_request(
            layout,
            svg.width * request_scale,
            svg.height * request_scale,
        );
        let (image_steps, steps) = match opts.select_steps {
            Some(list) => {
                let n = Step::try_from(list.len()).map_err(|_| {
                    DeckError::configuration(format!("too many select_steps for '{filename}'"))
                })?;
                (n, SvgSteps::Select(list))
            }
            None if opts.fragments && svg.steps > 1 => (svg.steps, SvgSteps::Fragments),
            None => (1, SvgSteps::Whole),
        };
        self.ensure_steps((opts.show_begin - 1).saturating_add(image_steps));
        self.push_item(
            b,
            DrawCommand::Svg {
                asset: svg,
                scale: opts.scale,
                show_begin: opts.show_begin,
                steps,
                name: filename.to_string(),
            },
        )
    }

    /// Text with inline style markup, drawn in `style` layered over `"default"`.
    pub fn text(
        &mut self,
        ctx: &BuildContext,
        target: impl BoxLike,
        text: &str,
        style: impl Into<StyleRef>,
        opts: TextOpts,
    ) -> DeckResult<ItemId> {
        let b = target.target_box(self)?;
        let style = self.get_style(b, style, true)?;
        let tokens = parse_text(text, opts.escape_char)?;
        self.check_style_names(b, &tokens)?;
        self.push_text(ctx, b, &tokens, &style, opts.scale_to_fit)
    }

    /// Code snippet highlighted by the context's highlighter.
    ///
    /// An empty `language` skips highlighting.
    pub fn code(
        &mut self,
        ctx: &BuildContext,
        target: impl BoxLike,
        language: &str,
        text: &str,
        opts: CodeOpts,
    ) -> DeckResult<ItemId> {
        let b = target.target_box(self)?;
        let text = text.replace('\t', &" ".repeat(opts.tabsize));
        let escape = opts.use_styles.then_some(opts.escape_char);

        let mut tokens = if language.is_empty() {
            let t = parse_text(&text, escape)?;
            self.check_style_names(b, &t)?;
            t
        } else if opts.use_styles {
            // Highlighters may drop leading newlines, which would break the merge.
            let body = text.trim_start_matches('\n');
            let leading = text.len() - body.len();
            let styled = parse_text(body, escape)?;
            self.check_style_names(b, &styled)?;
            let plain = tokens_to_text_without_style(&styled);
            let highlighted = ctx.highlighter().highlight(&plain, language)?;
            let mut merged = tokens_merge(&highlighted, &styled)?;
            if leading > 0 {
                merged.insert(0, Token::Newline(leading));
            }
            merged
        } else {
            ctx.highlighter().highlight(&text, language)?
        };
        if opts.line_numbers {
            tokens = add_line_numbers(&tokens);
        }

        let style = self.get_style(b, opts.style, true)?;
        self.push_text(ctx, b, &tokens, &style, opts.scale_to_fit)
    }

    fn check_style_names(&self, b: BoxId, tokens: &[Token]) -> DeckResult<()> {
        for t in tokens {
            if let Token::Begin(name) = t {
                self.get_style(b, name.as_str(), false)?;
            }
        }
        Ok(())
    }

    fn push_text(
        &mut self,
        ctx: &BuildContext,
        b: BoxId,
        tokens: &[Token],
        style: &TextStyle,
        scale_to_fit: bool,
    ) -> DeckResult<ItemId> {
        let block = TextBlock::build(
            tokens,
            style,
            |name| self.lookup_style(b, name),
            ctx.metrics(),
            scale_to_fit,
        );
        if !block.scale_to_fit() {
            let (w, h) = block.size();
            let layout = self.box_layout(b);
            self.layout_mut().ensure_width(layout, w);
            self.layout_mut().ensure_height(layout, h);
        }
        self.push_item(b, DrawCommand::Text(block))
    }

    /// Typeset LaTeX `source` and draw it centered in the box.
    ///
    /// `header` and `tail` default to a standalone document preamble and its end.
    pub fn latex(
        &mut self,
        ctx: &mut BuildContext,
        target: impl BoxLike,
        source: &str,
        scale: f64,
        header: Option<&str>,
        tail: Option<&str>,
    ) -> DeckResult<ItemId> {
        let b = target.target_box(self)?;
        if !scale.is_finite() || scale < 0.0 {
            return Err(DeckError::configuration(format!(
                "latex scale must be a non-negative number, got {scale}"
            )));
        }
        let asset = ctx.render_latex(&latex_document(source, header, tail))?;
        let layout = self.box_layout(b);
        self.layout_mut().ensure_width(layout, asset.width * scale);
        self.layout_mut().ensure_height(layout, asset.height * scale);
        self.push_item(b, DrawCommand::Latex { asset, scale })
    }

    /// Coordinate relative to the left edge of the box: a number of pixels or `"NN%"` of its width.
    pub fn x(&self, target: impl BoxLike, value: impl Into<Value>) -> DeckResult<LazyValue> {
        let b = target.target_box(self)?;
        self.layout_arena().x(self.box_layout(b), value)
    }

    /// Coordinate relative to the top edge of the box.
    pub fn y(&self, target: impl BoxLike, value: impl Into<Value>) -> DeckResult<LazyValue> {
        let b = target.target_box(self)?;
        self.layout_arena().y(self.box_layout(b), value)
    }

    /// Point relative to the top-left corner of the box.
    pub fn p(
        &self,
        target: impl BoxLike,
        x: impl Into<Value>,
        y: impl Into<Value>,
    ) -> DeckResult<LazyPoint> {
        let b = target.target_box(self)?;
        self.layout_arena().point(self.box_layout(b), x, y)
    }

    /// Center of the box.
    pub fn mid_point(&self, target: impl BoxLike) -> DeckResult<LazyPoint> {
        self.p(target, "50%", "50%")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/boxlike.rs"]
mod tests;
