use crate::{
    deck::DeckConfig,
    draw::command::DrawCommand,
    foundation::core::{BoxId, ItemId, LayoutId, Rect, Step},
    foundation::error::{DeckError, DeckResult},
    layout::node::{LayoutArena, LayoutRequest, Placement},
    render::pass::{Drawable, Page, paint_order, render_document},
    show::info::ShowInfo,
    text::style::{StyleRef, StyleTable, TextStyle},
    tree::boxlike::BoxLike,
};

/// Entry in a box's child list: a nested box or a drawn item.
///
/// Used to position a new box relative to an existing sibling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Child {
    /// Nested box.
    Box(BoxId),
    /// Drawn item.
    Item(ItemId),
}

impl From<BoxId> for Child {
    fn from(v: BoxId) -> Self {
        Self::Box(v)
    }
}

impl From<ItemId> for Child {
    fn from(v: ItemId) -> Self {
        Self::Item(v)
    }
}

#[derive(Clone, Debug)]
struct BoxNode {
    parent: Option<BoxId>,
    layout: LayoutId,
    z_level: i32,
    show: ShowInfo,
    styles: StyleTable,
    name: Option<String>,
    children: Vec<Child>,
}

#[derive(Clone, Debug)]
struct ItemNode {
    owner: BoxId,
    command: DrawCommand,
}

/// Where a new box lands among its parent's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Insert {
    Append,
    Prepend,
    /// Right after the sibling (painted over it).
    Above(Child),
    /// Right before the sibling (painted under it).
    Below(Child),
}

/// Parameters of a new box node, already parsed.
#[derive(Clone, Debug)]
pub(crate) struct NewBox {
    pub(crate) request: LayoutRequest,
    pub(crate) show: ShowInfo,
    pub(crate) z_level: Option<i32>,
    pub(crate) insert: Insert,
    pub(crate) name: Option<String>,
}

/// One slide: a tree of boxes and items over a layout arena.
///
/// Authoring mutates the tree; [`Slide::layout`] solves geometry once; [`Slide::render_step`]
/// then draws any step without further mutation.
#[derive(Clone, Debug)]
pub struct Slide {
    name: String,
    width: f64,
    height: f64,
    bg_color: String,
    boxes: Vec<BoxNode>,
    items: Vec<ItemNode>,
    layout: LayoutArena,
    max_step: Step,
}

impl Slide {
    pub(crate) fn new(name: impl Into<String>, config: &DeckConfig, styles: StyleTable) -> Self {
        let layout = LayoutArena::new(config.width, config.height);
        let root = BoxNode {
            parent: None,
            layout: layout.root(),
            z_level: 0,
            show: ShowInfo::always(),
            styles,
            name: Some("root".to_string()),
            children: Vec::new(),
        };
        Self {
            name: name.into(),
            width: config.width,
            height: config.height,
            bg_color: config.bg_color.clone(),
            boxes: vec![root],
            items: Vec::new(),
            layout,
            max_step: 1,
        }
    }

    /// Slide name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Box covering the whole slide.
    pub fn root(&self) -> BoxId {
        BoxId(0)
    }

    /// Number of steps this slide renders.
    pub fn max_step(&self) -> Step {
        self.max_step
    }

    /// Raise the step count to at least `steps`. Never lowers it.
    pub fn ensure_steps(&mut self, steps: Step) {
        if steps > self.max_step {
            tracing::debug!(slide = %self.name, from = self.max_step, to = steps, "step count raised");
            self.max_step = steps;
        }
    }

    /// Geometry of this slide.
    pub fn layout_arena(&self) -> &LayoutArena {
        &self.layout
    }

    /// Resolved rectangle of the box `target` authors into; `None` before [`Slide::layout`].
    pub fn box_rect(&self, target: impl BoxLike) -> Option<Rect> {
        let b = target.target_box(self).ok()?;
        self.layout.rect(self.boxes[b.index()].layout)
    }

    /// Debug name of a box.
    pub fn box_name(&self, id: BoxId) -> Option<&str> {
        self.boxes.get(id.index()).and_then(|b| b.name.as_deref())
    }

    /// Parent of a box; `None` for the root.
    pub fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.boxes.get(id.index()).and_then(|b| b.parent)
    }

    /// Z-level the items of a box paint at.
    pub fn z_level(&self, id: BoxId) -> Option<i32> {
        self.boxes.get(id.index()).map(|b| b.z_level)
    }

    /// Whether the box `target` authors into is shown at `step`.
    ///
    /// A box is shown only when it and all its ancestors are.
    pub fn is_visible_at(&self, target: impl BoxLike, step: Step) -> bool {
        let Ok(mut b) = target.target_box(self) else {
            return false;
        };
        loop {
            let node = &self.boxes[b.index()];
            if !node.show.is_visible_at(step) {
                return false;
            }
            match node.parent {
                Some(p) => b = p,
                None => return true,
            }
        }
    }

    pub(crate) fn check_box(&self, id: BoxId) -> DeckResult<BoxId> {
        if id.index() < self.boxes.len() {
            Ok(id)
        } else {
            Err(DeckError::configuration(format!(
                "box {} does not belong to slide '{}'",
                id.0, self.name
            )))
        }
    }

    pub(crate) fn item_owner(&self, id: ItemId) -> DeckResult<BoxId> {
        self.items.get(id.index()).map(|i| i.owner).ok_or_else(|| {
            DeckError::configuration(format!(
                "item {} does not belong to slide '{}'",
                id.0, self.name
            ))
        })
    }

    pub(crate) fn box_layout(&self, id: BoxId) -> LayoutId {
        self.boxes[id.index()].layout
    }

    pub(crate) fn layout_mut(&mut self) -> &mut LayoutArena {
        &mut self.layout
    }

    pub(crate) fn describe(&self, id: BoxId) -> String {
        match self.box_name(id) {
            Some(n) => format!("box '{n}' of slide '{}'", self.name),
            None => format!("box {} of slide '{}'", id.0, self.name),
        }
    }

    pub(crate) fn insert_box(&mut self, parent: BoxId, new: NewBox) -> DeckResult<BoxId> {
        let parent = self.check_box(parent)?;
        let (child_at, placement) = match new.insert {
            Insert::Append => (self.boxes[parent.index()].children.len(), Placement::Append),
            Insert::Prepend => (0, Placement::Prepend),
            Insert::Above(s) => {
                let at = self.sibling_index(parent, s)? + 1;
                // Layout only knows boxes: anchor on the nearest box at or before the sibling.
                let placement = self.boxes[parent.index()].children[..at]
                    .iter()
                    .rev()
                    .find_map(|c| self.child_layout(*c))
                    .map_or(Placement::Prepend, Placement::After);
                (at, placement)
            }
            Insert::Below(s) => {
                let at = self.sibling_index(parent, s)?;
                let placement = self.boxes[parent.index()].children[at..]
                    .iter()
                    .find_map(|c| self.child_layout(*c))
                    .map_or(Placement::Append, Placement::Before);
                (at, placement)
            }
        };
        let layout = self
            .layout
            .add(self.box_layout(parent), new.request, placement)?;
        let id = BoxId(
            self.boxes
                .len()
                .try_into()
                .map_err(|_| DeckError::layout("box id overflow"))?,
        );
        let z_level = new
            .z_level
            .unwrap_or(self.boxes[parent.index()].z_level);
        self.ensure_steps(new.show.max_step());
        self.boxes.push(BoxNode {
            parent: Some(parent),
            layout,
            z_level,
            show: new.show,
            styles: StyleTable::new(),
            name: new.name,
            children: Vec::new(),
        });
        self.boxes[parent.index()]
            .children
            .insert(child_at, Child::Box(id));
        Ok(id)
    }

    fn sibling_index(&self, parent: BoxId, sibling: Child) -> DeckResult<usize> {
        self.boxes[parent.index()]
            .children
            .iter()
            .position(|c| *c == sibling)
            .ok_or_else(|| {
                let what = match sibling {
                    Child::Box(b) => format!("box {}", b.0),
                    Child::Item(i) => format!("item {}", i.0),
                };
                DeckError::ordering(format!(
                    "{what} is not a child of {}",
                    self.describe(parent)
                ))
            })
    }

    fn child_layout(&self, child: Child) -> Option<LayoutId> {
        match child {
            Child::Box(b) => Some(self.box_layout(b)),
            Child::Item(_) => None,
        }
    }

    pub(crate) fn push_item(&mut self, owner: BoxId, command: DrawCommand) -> DeckResult<ItemId> {
        let owner = self.check_box(owner)?;
        let id = ItemId(
            self.items
                .len()
                .try_into()
                .map_err(|_| DeckError::layout("item id overflow"))?,
        );
        self.items.push(ItemNode { owner, command });
        self.boxes[owner.index()].children.push(Child::Item(id));
        Ok(id)
    }

    fn find_style(&self, from: BoxId, name: &str) -> Option<&TextStyle> {
        let mut b = Some(from);
        while let Some(id) = b {
            let node = &self.boxes[id.index()];
            if let Some(s) = node.styles.get(name) {
                return Some(s);
            }
            b = node.parent;
        }
        None
    }

    pub(crate) fn lookup_style(&self, from: BoxId, name: &str) -> Option<TextStyle> {
        self.find_style(from, name).cloned()
    }

    /// Resolve a style for `target`.
    ///
    /// Names are looked up in the box's own table, then its parent's, up to the root. With
    /// `full_style` the result is layered over the resolved `"default"` style so every field is set.
    pub fn get_style(
        &self,
        target: impl BoxLike,
        style: impl Into<StyleRef>,
        full_style: bool,
    ) -> DeckResult<TextStyle> {
        let b = target.target_box(self)?;
        let style = match style.into() {
            StyleRef::Named(name) => self.find_style(b, &name).cloned().ok_or_else(|| {
                DeckError::style_not_found(format!("'{name}' in {}", self.describe(b)))
            })?,
            StyleRef::Inline(s) => s,
        };
        if !full_style {
            return Ok(style);
        }
        let base = self.find_style(b, "default").ok_or_else(|| {
            DeckError::style_not_found(format!("'default' in {}", self.describe(b)))
        })?;
        Ok(base.compose(&style))
    }

    /// Define style `name` on `target`'s box, optionally layered over the style named `base`.
    pub fn set_style(
        &mut self,
        target: impl BoxLike,
        name: impl Into<String>,
        style: TextStyle,
        base: Option<&str>,
    ) -> DeckResult<()> {
        let b = target.target_box(self)?;
        let style = match base {
            Some(base) => self.get_style(b, base, false)?.compose(&style),
            None => style,
        };
        self.boxes[b.index()].styles.insert(name.into(), style);
        Ok(())
    }

    /// Override fields of the style `name` visible from `target`, storing the result on its box.
    pub fn update_style(
        &mut self,
        target: impl BoxLike,
        name: &str,
        style: &TextStyle,
    ) -> DeckResult<()> {
        let b = target.target_box(self)?;
        let updated = self.get_style(b, name, false)?.compose(style);
        self.boxes[b.index()]
            .styles
            .insert(name.to_string(), updated);
        Ok(())
    }

    /// Solve the geometry of every box.
    #[tracing::instrument(skip(self), fields(slide = %self.name))]
    pub fn layout(&mut self) -> DeckResult<()> {
        self.layout.solve()
    }

    /// Draw `step` into an SVG document. Requires [`Slide::layout`].
    pub fn render_step(&self, step: Step) -> DeckResult<String> {
        if !self.layout.is_solved() {
            return Err(DeckError::layout(format!(
                "slide '{}' rendered before layout",
                self.name
            )));
        }
        if step == 0 {
            return Err(DeckError::configuration("steps start at 1"));
        }

        // Parents precede children in the arena.
        let mut visible = Vec::with_capacity(self.boxes.len());
        for node in &self.boxes {
            let parent_visible = node.parent.is_none_or(|p| visible[p.index()]);
            visible.push(parent_visible && node.show.is_visible_at(step));
        }

        let mut drawables = Vec::with_capacity(self.items.len());
        self.collect_drawables(self.root(), &visible, &mut drawables)?;
        paint_order(&mut drawables);
        let page = Page {
            width: self.width,
            height: self.height,
            bg_color: &self.bg_color,
        };
        render_document(page, step, &drawables, &self.layout)
    }

    fn collect_drawables<'a>(
        &'a self,
        b: BoxId,
        visible: &[bool],
        out: &mut Vec<Drawable<'a>>,
    ) -> DeckResult<()> {
        let node = &self.boxes[b.index()];
        for child in &node.children {
            match *child {
                Child::Box(c) => self.collect_drawables(c, visible, out)?,
                Child::Item(i) => {
                    let rect = self.layout.rect(node.layout).ok_or_else(|| {
                        DeckError::layout(format!("{} has no resolved rectangle", self.describe(b)))
                    })?;
                    out.push(Drawable {
                        z_level: node.z_level,
                        rect,
                        visible: visible[b.index()],
                        command: &self.items[i.index()].command,
                    });
                }
            }
        }
        Ok(())
    }

    /// Lay out and draw every step `1..=max_step`.
    pub fn render(&mut self) -> DeckResult<Vec<String>> {
        if !self.layout.is_solved() {
            self.layout()?;
        }
        (1..=self.max_step).map(|s| self.render_step(s)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/slide.rs"]
mod tests;
