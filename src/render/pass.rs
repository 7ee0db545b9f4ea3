use crate::{
    draw::command::DrawCommand,
    foundation::core::{Rect, Step},
    foundation::error::DeckResult,
    layout::node::LayoutArena,
    render::xml::{SvgWriter, XmlWriter},
};

/// What a draw command sees while the draw pass runs.
pub struct RenderCtx<'a> {
    /// Current step, starting at 1.
    pub step: Step,
    /// Output handle.
    pub xml: &'a mut dyn XmlWriter,
}

/// One item queued for the draw pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Drawable<'a> {
    pub(crate) z_level: i32,
    pub(crate) rect: Rect,
    pub(crate) visible: bool,
    pub(crate) command: &'a DrawCommand,
}

/// Page settings of one rendered document.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Page<'a> {
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) bg_color: &'a str,
}

/// Sort document-ordered drawables into paint order.
///
/// The sort is stable, so document order breaks ties between equal z-levels.
pub(crate) fn paint_order(drawables: &mut [Drawable<'_>]) {
    drawables.sort_by_key(|d| d.z_level);
}

/// Draw every visible item of `drawables` (already in paint order) into one SVG document.
#[tracing::instrument(skip(page, drawables, layout), fields(items = drawables.len()))]
pub(crate) fn render_document(
    page: Page<'_>,
    step: Step,
    drawables: &[Drawable<'_>],
    layout: &LayoutArena,
) -> DeckResult<String> {
    let mut writer = SvgWriter::new();
    writer.element("svg");
    writer.set("xmlns", "http://www.w3.org/2000/svg");
    writer.set("xmlns:xlink", "http://www.w3.org/1999/xlink");
    writer.set_num("width", page.width);
    writer.set_num("height", page.height);
    writer.set(
        "viewBox",
        &format!("0 0 {} {}", page.width, page.height),
    );

    writer.element("rect");
    writer.set_num("width", page.width);
    writer.set_num("height", page.height);
    writer.set("fill", page.bg_color);
    writer.close("rect");

    {
        let mut ctx = RenderCtx {
            step,
            xml: &mut writer,
        };
        for d in drawables.iter().filter(|d| d.visible) {
            d.command.draw(d.rect, layout, &mut ctx)?;
        }
    }

    writer.close("svg");
    writer.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/render/pass.rs"]
mod tests;
