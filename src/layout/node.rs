use crate::{
    foundation::core::{Edges, LayoutId, Rect},
    foundation::error::{DeckError, DeckResult},
    layout::lazy::{Axis, LazyPoint, LazyValue},
    layout::value::{PosSpec, SizeSpec, Value},
};

/// Geometry request of a new layout node.
#[derive(Clone, Debug, Default)]
pub(crate) struct LayoutRequest {
    pub(crate) x: PosSpec,
    pub(crate) y: PosSpec,
    pub(crate) width: SizeSpec,
    pub(crate) height: SizeSpec,
    pub(crate) padding: Edges,
    pub(crate) horizontal: bool,
}

/// Where a new node lands in its parent's flow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    Append,
    Prepend,
    After(LayoutId),
    Before(LayoutId),
}

#[derive(Clone, Debug)]
struct LayoutNode {
    children: Vec<LayoutId>,
    req: LayoutRequest,
    /// Minimum size requested by drawn content (images, typeset math, text).
    content: (f64, f64),
    rect: Option<Rect>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Size {
    w: f64,
    h: f64,
}

impl Size {
    fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.w,
            Axis::Y => self.h,
        }
    }
}

/// Arena of layout nodes for one slide.
///
/// Geometry is solved once, after authoring, in two passes:
///
/// 1. bottom-up: intrinsic sizes from children (sum along the flow axis, max across it) and
///    content requests
/// 2. top-down: each parent assigns its children's rectangles from explicit, percentage, fill or
///    intrinsic sizes and explicit, percentage or flow positions
#[derive(Clone, Debug)]
pub struct LayoutArena {
    nodes: Vec<LayoutNode>,
    solved: bool,
}

impl LayoutArena {
    /// Create an arena whose root covers `width` x `height` at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        let root = LayoutNode {
            children: Vec::new(),
            req: LayoutRequest {
                x: PosSpec::Abs(0.0),
                y: PosSpec::Abs(0.0),
                width: SizeSpec::Abs(width),
                height: SizeSpec::Abs(height),
                ..LayoutRequest::default()
            },
            content: (0.0, 0.0),
            rect: None,
        };
        Self {
            nodes: vec![root],
            solved: false,
        }
    }

    /// Root node.
    pub fn root(&self) -> LayoutId {
        LayoutId(0)
    }

    /// Resolved rectangle, available once [`LayoutArena::solve`] has run.
    pub fn rect(&self, id: LayoutId) -> Option<Rect> {
        self.nodes.get(id.index()).and_then(|n| n.rect)
    }

    /// Whether the most recent mutation has been followed by a solve.
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub(crate) fn is_horizontal(&self, id: LayoutId) -> bool {
        self.node(id).req.horizontal
    }

    pub(crate) fn add(
        &mut self,
        parent: LayoutId,
        req: LayoutRequest,
        placement: Placement,
    ) -> DeckResult<LayoutId> {
        let id = LayoutId(
            self.nodes
                .len()
                .try_into()
                .map_err(|_| DeckError::layout("layout node id overflow"))?,
        );
        let siblings = &self.nodes[parent.index()].children;
        let at = match placement {
            Placement::Append => siblings.len(),
            Placement::Prepend => 0,
            Placement::After(s) => sibling_position(siblings, s)? + 1,
            Placement::Before(s) => sibling_position(siblings, s)?,
        };
        self.nodes.push(LayoutNode {
            children: Vec::new(),
            req,
            content: (0.0, 0.0),
            rect: None,
        });
        self.nodes[parent.index()].children.insert(at, id);
        self.solved = false;
        Ok(id)
    }

    /// Raise the content-derived minimum width. Never shrinks.
    pub fn ensure_width(&mut self, id: LayoutId, width: f64) {
        let n = self.node_mut(id);
        n.content.0 = n.content.0.max(width);
        self.solved = false;
    }

    /// Raise the content-derived minimum height. Never shrinks.
    pub fn ensure_height(&mut self, id: LayoutId, height: f64) {
        let n = self.node_mut(id);
        n.content.1 = n.content.1.max(height);
        self.solved = false;
    }

    /// Size request of an image-bearing item.
    pub fn set_image_size_request(&mut self, id: LayoutId, width: f64, height: f64) {
        self.ensure_width(id, width);
        self.ensure_height(id, height);
    }

    pub(crate) fn x(&self, id: LayoutId, value: impl Into<Value>) -> DeckResult<LazyValue> {
        LazyValue::new(id, Axis::X, &value.into())
    }

    pub(crate) fn y(&self, id: LayoutId, value: impl Into<Value>) -> DeckResult<LazyValue> {
        LazyValue::new(id, Axis::Y, &value.into())
    }

    pub(crate) fn point(
        &self,
        id: LayoutId,
        x: impl Into<Value>,
        y: impl Into<Value>,
    ) -> DeckResult<LazyPoint> {
        Ok(LazyPoint::new(self.x(id, x)?, self.y(id, y)?))
    }

    /// Resolve every node's rectangle.
    #[tracing::instrument(skip(self), fields(nodes = self.nodes.len()))]
    pub fn solve(&mut self) -> DeckResult<()> {
        let mut intrinsic = vec![Size::default(); self.nodes.len()];
        self.measure(self.root(), &mut intrinsic);

        for n in &mut self.nodes {
            n.rect = None;
        }
        let root = self.root();
        let root_req = &self.node(root).req;
        let (w, h) = match (root_req.width, root_req.height) {
            (SizeSpec::Abs(w), SizeSpec::Abs(h)) => (w, h),
            _ => return Err(DeckError::layout("root layout node must have a fixed size")),
        };
        self.node_mut(root).rect = Some(Rect::new(0.0, 0.0, w, h));
        self.place(root, &intrinsic)?;
        self.solved = true;
        Ok(())
    }

    fn measure(&self, id: LayoutId, out: &mut [Size]) -> Size {
        let node = self.node(id);
        let flow_axis = flow_axis(node.req.horizontal);
        let mut flow = 0.0f64;
        let mut cross = 0.0f64;
        for &c in &node.children {
            let s = self.measure(c, out);
            let child = self.node(c);
            if !child_pos(child, flow_axis).is_auto() {
                continue;
            }
            flow += s.along(flow_axis);
            cross = cross.max(s.along(other(flow_axis)));
        }
        let (children_w, children_h) = match flow_axis {
            Axis::X => (flow, cross),
            Axis::Y => (cross, flow),
        };
        let pad = node.req.padding;
        let w = match node.req.width {
            SizeSpec::Abs(v) => v,
            _ => (children_w + pad.horizontal()).max(node.content.0),
        };
        let h = match node.req.height {
            SizeSpec::Abs(v) => v,
            _ => (children_h + pad.vertical()).max(node.content.1),
        };
        let size = Size { w, h };
        out[id.index()] = size;
        size
    }

    fn place(&mut self, id: LayoutId, intrinsic: &[Size]) -> DeckResult<()> {
        let node = self.node(id);
        let rect = node
            .rect
            .ok_or_else(|| DeckError::layout("parent placed before its own rectangle"))?;
        let inner = node.req.padding.inset(rect);
        if inner.width() < 0.0 || inner.height() < 0.0 {
            return Err(DeckError::layout(format!(
                "padding exceeds the size of layout node {} ({}x{})",
                id.0,
                rect.width(),
                rect.height()
            )));
        }
        let flow = flow_axis(node.req.horizontal);
        let cross = other(flow);
        let children = node.children.clone();

        let flow_sizes = self.flow_sizes(&children, flow, extent(inner, flow), intrinsic);
        let in_flow_total: f64 = children
            .iter()
            .zip(&flow_sizes)
            .filter(|(c, _)| child_pos(self.node(**c), flow).is_auto())
            .map(|(_, s)| *s)
            .sum();
        let mut cursor = start(inner, flow) + (extent(inner, flow) - in_flow_total).max(0.0) / 2.0;

        for (&c, &flow_size) in children.iter().zip(&flow_sizes) {
            let child = self.node(c);
            let cross_size = cross_size(
                child_size(child, cross),
                extent(inner, cross),
                intrinsic[c.index()].along(cross),
            );
            debug_assert!(flow_size >= 0.0 && cross_size >= 0.0);

            let flow_pos = match child_pos(child, flow) {
                PosSpec::Auto => {
                    let p = cursor;
                    cursor += flow_size;
                    p
                }
                spec => self.resolve_pos(spec, inner, flow, flow_size)?,
            };
            let cross_pos = self.resolve_pos(child_pos(child, cross), inner, cross, cross_size)?;

            let (x, y, w, h) = match flow {
                Axis::X => (flow_pos, cross_pos, flow_size, cross_size),
                Axis::Y => (cross_pos, flow_pos, cross_size, flow_size),
            };
            self.node_mut(c).rect = Some(Rect::new(x, y, x + w, y + h));
        }

        for c in children {
            self.place(c, intrinsic)?;
        }
        Ok(())
    }

    /// Flow-axis sizes: fixed and intrinsic first, then `[NN%]` of the remaining space, then fill
    /// shares of what is left.
    fn flow_sizes(
        &self,
        children: &[LayoutId],
        axis: Axis,
        extent: f64,
        intrinsic: &[Size],
    ) -> Vec<f64> {
        let mut sizes = vec![0.0f64; children.len()];
        let mut fixed = 0.0f64;
        for (i, &c) in children.iter().enumerate() {
            let child = self.node(c);
            let in_flow = child_pos(child, axis).is_auto();
            sizes[i] = match child_size(child, axis) {
                SizeSpec::Abs(v) => v,
                SizeSpec::Percent(p) => p * extent,
                SizeSpec::Auto => intrinsic[c.index()].along(axis),
                SizeSpec::FreePercent(p) if !in_flow => p * extent,
                SizeSpec::Fill(_) if !in_flow => extent,
                SizeSpec::FreePercent(_) | SizeSpec::Fill(_) => continue,
            };
            if in_flow {
                fixed += sizes[i];
            }
        }

        let remaining = (extent - fixed).max(0.0);
        let mut free_used = 0.0f64;
        let mut weights = 0.0f64;
        for (i, &c) in children.iter().enumerate() {
            let child = self.node(c);
            if !child_pos(child, axis).is_auto() {
                continue;
            }
            match child_size(child, axis) {
                SizeSpec::FreePercent(p) => {
                    sizes[i] = p * remaining;
                    free_used += sizes[i];
                }
                SizeSpec::Fill(w) => weights += w,
                _ => {}
            }
        }

        if weights > 0.0 {
            let left = (remaining - free_used).max(0.0);
            for (i, &c) in children.iter().enumerate() {
                let child = self.node(c);
                if let (true, SizeSpec::Fill(w)) =
                    (child_pos(child, axis).is_auto(), child_size(child, axis))
                {
                    sizes[i] = left * w / weights;
                }
            }
        }
        sizes
    }

    fn resolve_pos(&self, spec: &PosSpec, inner: Rect, axis: Axis, size: f64) -> DeckResult<f64> {
        let start = start(inner, axis);
        let extent = extent(inner, axis);
        Ok(match spec {
            PosSpec::Auto => start + (extent - size).max(0.0) / 2.0,
            PosSpec::Abs(v) => start + v,
            PosSpec::Percent(p) => start + p * extent,
            PosSpec::FreePercent(p) => start + p * (extent - size),
            PosSpec::Lazy(lv) => lv.eval(self)?,
        })
    }

    fn node(&self, id: LayoutId) -> &LayoutNode {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: LayoutId) -> &mut LayoutNode {
        &mut self.nodes[id.index()]
    }
}

fn sibling_position(siblings: &[LayoutId], s: LayoutId) -> DeckResult<usize> {
    siblings.iter().position(|&c| c == s).ok_or_else(|| {
        DeckError::ordering(format!(
            "layout node {} is not a child of the target parent",
            s.0
        ))
    })
}

fn flow_axis(horizontal: bool) -> Axis {
    if horizontal { Axis::X } else { Axis::Y }
}

fn other(axis: Axis) -> Axis {
    match axis {
        Axis::X => Axis::Y,
        Axis::Y => Axis::X,
    }
}

fn child_pos(node: &LayoutNode, axis: Axis) -> &PosSpec {
    match axis {
        Axis::X => &node.req.x,
        Axis::Y => &node.req.y,
    }
}

fn child_size(node: &LayoutNode, axis: Axis) -> SizeSpec {
    match axis {
        Axis::X => node.req.width,
        Axis::Y => node.req.height,
    }
}

fn cross_size(spec: SizeSpec, extent: f64, intrinsic: f64) -> f64 {
    match spec {
        SizeSpec::Abs(v) => v,
        SizeSpec::Percent(p) | SizeSpec::FreePercent(p) => p * extent,
        SizeSpec::Fill(_) => extent,
        SizeSpec::Auto => intrinsic,
    }
}

fn start(r: Rect, axis: Axis) -> f64 {
    match axis {
        Axis::X => r.x0,
        Axis::Y => r.y0,
    }
}

fn extent(r: Rect, axis: Axis) -> f64 {
    match axis {
        Axis::X => r.width(),
        Axis::Y => r.height(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/node.rs"]
mod tests;
