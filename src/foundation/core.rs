pub use kurbo::{Point, Rect, Vec2};

/// A 1-based position on a slide's reveal timeline.
pub type Step = u32;

/// Handle of a box inside a [`crate::Slide`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BoxId(pub(crate) u32);

impl BoxId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a leaf item inside a [`crate::Slide`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a layout node inside a [`crate::LayoutArena`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayoutId(pub(crate) u32);

impl LayoutId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Padding edges in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    /// Left padding.
    #[serde(default)]
    pub left: f64,
    /// Right padding.
    #[serde(default)]
    pub right: f64,
    /// Top padding.
    #[serde(default)]
    pub top: f64,
    /// Bottom padding.
    #[serde(default)]
    pub bottom: f64,
}

impl Edges {
    /// Same padding on all four sides.
    pub fn all(v: f64) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }

    pub(crate) fn horizontal(self) -> f64 {
        self.left + self.right
    }

    pub(crate) fn vertical(self) -> f64 {
        self.top + self.bottom
    }

    /// Shrink `rect` by these edges. The result may have negative extents.
    pub(crate) fn inset(self, rect: Rect) -> Rect {
        Rect {
            x0: rect.x0 + self.left,
            y0: rect.y0 + self.top,
            x1: rect.x1 - self.right,
            y1: rect.y1 - self.bottom,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
