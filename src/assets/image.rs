use std::{collections::HashMap, fmt::Write as _, path::Path, sync::Arc};

use base64::Engine as _;

use crate::{
    foundation::core::Step,
    foundation::error::{DeckError, DeckResult},
    show::info::{ShowInfo, ShowSelector},
};

const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Handling selected by an image file's extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    /// Vector document, possibly with fragments.
    Svg,
    /// Layered raster document converted to SVG.
    Ora,
    /// PNG or JPEG; single fragment.
    Bitmap,
}

/// Classify `filename` by extension.
pub fn image_format(filename: &str) -> DeckResult<ImageFormat> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("svg") => Ok(ImageFormat::Svg),
        Some("ora") => Ok(ImageFormat::Ora),
        Some("png" | "jpeg" | "jpg") => Ok(ImageFormat::Bitmap),
        _ => Err(DeckError::configuration(format!(
            "unrecognized image format of '{filename}' (expected .svg, .ora, .png, .jpeg or .jpg)"
        ))),
    }
}

/// Raster image prepared for embedding as a data URI.
#[derive(Clone, Debug)]
pub struct BitmapAsset {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// MIME type detected from content.
    pub mime: &'static str,
    /// Base64 of the original file bytes.
    pub base64: Arc<str>,
}

impl BitmapAsset {
    /// Read and probe `path`.
    pub fn load(path: &Path) -> DeckResult<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| DeckError::resource(format!("cannot read '{}': {e}", path.display())))?;
        Self::from_bytes(&bytes)
            .map_err(|e| DeckError::resource(format!("'{}': {e}", path.display())))
    }

    /// Probe encoded bytes for format and dimensions without decoding pixels.
    pub fn from_bytes(bytes: &[u8]) -> DeckResult<Self> {
        let reader = image::ImageReader::new(std::io::Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| DeckError::resource(format!("cannot probe image: {e}")))?;
        let format = reader
            .format()
            .ok_or_else(|| DeckError::resource("unknown raster image format"))?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| DeckError::resource(format!("cannot read image dimensions: {e}")))?;
        Ok(Self {
            width,
            height,
            mime: format.to_mime_type(),
            base64: base64::engine::general_purpose::STANDARD
                .encode(bytes)
                .into(),
        })
    }
}

/// Vector document prepared for drawing.
///
/// Fragments are groups labelled `**<selector>` (Inkscape `inkscape:label`); the document has as
/// many steps as the highest step any label needs.
#[derive(Clone, Debug)]
pub struct SvgAsset {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Number of fragment steps (at least 1).
    pub steps: Step,
    full: Arc<str>,
    /// One document per step at which some label flips, sorted by that step.
    fragments: Vec<(Step, Arc<str>)>,
}

impl SvgAsset {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> DeckResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DeckError::resource(format!("cannot read '{}': {e}", path.display())))?;
        Self::parse(&text).map_err(|e| match e {
            DeckError::Resource(msg) => {
                DeckError::resource(format!("'{}': {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Parse SVG text.
    pub fn parse(text: &str) -> DeckResult<Self> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, opts)
            .map_err(|e| DeckError::resource(format!("invalid svg document: {e}")))?;
        let root = doc.root_element();
        if root.tag_name().name() != "svg" {
            return Err(DeckError::resource("document root is not an <svg> element"));
        }
        let (width, height) = document_size(root)?;

        let mut labels = HashMap::new();
        let mut steps: Step = 1;
        for node in root.descendants().filter(|n| n.is_element()) {
            let Some(label) = node.attribute((INKSCAPE_NS, "label")) else {
                continue;
            };
            let Some((_, selector)) = label.split_once("**") else {
                continue;
            };
            let info = ShowInfo::parse(&ShowSelector::from(selector.trim()), steps)?;
            steps = steps.max(info.max_step());
            labels.insert(node.id(), info);
        }

        let full: Arc<str> = serialize(root, None, &labels).into();
        // Between two change points no label flips, so one document covers the whole run.
        let mut starts: Vec<Step> = labels.values().flat_map(ShowInfo::change_points).collect();
        starts.push(1);
        starts.sort_unstable();
        starts.dedup();
        let fragments = if labels.is_empty() {
            vec![(1, full.clone())]
        } else {
            starts
                .into_iter()
                .map(|s| (s, serialize(root, Some(s), &labels).into()))
                .collect()
        };
        Ok(Self {
            width,
            height,
            steps,
            full,
            fragments,
        })
    }

    /// Whole document, every layer included.
    pub fn full(&self) -> Arc<str> {
        self.full.clone()
    }

    /// Document as shown at fragment `step` (1-based); `None` for step 0.
    pub fn fragment(&self, step: Step) -> Option<Arc<str>> {
        if step == 0 {
            return None;
        }
        let idx = self.fragments.partition_point(|(start, _)| *start <= step);
        let (_, doc) = self.fragments.get(idx.checked_sub(1)?)?;
        Some(doc.clone())
    }
}

fn document_size(root: roxmltree::Node<'_, '_>) -> DeckResult<(f64, f64)> {
    let view_box: Option<Vec<f64>> = root.attribute("viewBox").map(|vb| {
        vb.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect()
    });
    let from_view_box = |i: usize| view_box.as_ref().filter(|v| v.len() == 4).map(|v| v[i]);

    let dim = |attr: &str, vb_idx: usize| -> DeckResult<f64> {
        match root.attribute(attr) {
            Some(v) if !v.trim().ends_with('%') => svg_size_to_pixels(v),
            _ => from_view_box(vb_idx).ok_or_else(|| {
                DeckError::resource(format!("svg document has no usable '{attr}'"))
            }),
        }
    };
    Ok((dim("width", 2)?, dim("height", 3)?))
}

/// Convert an SVG length (`"12"`, `"12px"`, `"10mm"`, `"1in"`, ...) to pixels.
pub fn svg_size_to_pixels(value: &str) -> DeckResult<f64> {
    let v = value.trim();
    let split = v
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(v.len());
    let (num, unit) = v.split_at(split);
    let num: f64 = num
        .trim()
        .parse()
        .map_err(|_| DeckError::resource(format!("invalid svg length '{value}'")))?;
    let factor = match unit {
        "" | "px" => 1.0,
        "pt" => 96.0 / 72.0,
        "pc" => 16.0,
        "mm" => 96.0 / 25.4,
        "cm" => 96.0 / 2.54,
        "in" => 96.0,
        _ => {
            return Err(DeckError::resource(format!(
                "unsupported svg length unit in '{value}'"
            )));
        }
    };
    Ok(num * factor)
}

fn serialize(
    root: roxmltree::Node<'_, '_>,
    step: Option<Step>,
    labels: &HashMap<roxmltree::NodeId, ShowInfo>,
) -> String {
    let mut out = String::new();
    write_node(&mut out, root, true, step, labels);
    out
}

fn write_node(
    out: &mut String,
    node: roxmltree::Node<'_, '_>,
    is_root: bool,
    step: Option<Step>,
    labels: &HashMap<roxmltree::NodeId, ShowInfo>,
) {
    if node.is_text() {
        if let Some(t) = node.text() {
            out.push_str(&quick_xml::escape::escape(t));
        }
        return;
    }
    if !node.is_element() {
        return;
    }
    if let (Some(step), Some(info)) = (step, labels.get(&node.id())) {
        if !info.is_visible_at(step) {
            return;
        }
    }

    let name = qualified(node, node.tag_name().namespace(), node.tag_name().name());
    let _ = write!(out, "<{name}");
    let parent = node.parent_element().filter(|_| !is_root);
    for ns in node.namespaces() {
        let inherited = parent.is_some_and(|p| {
            p.namespaces()
                .any(|pn| pn.name() == ns.name() && pn.uri() == ns.uri())
        });
        if !inherited {
            match ns.name() {
                Some("xml") => {}
                Some(prefix) => {
                    let _ = write!(out, " xmlns:{prefix}=\"{}\"", quick_xml::escape::escape(ns.uri()));
                }
                None => {
                    let _ = write!(out, " xmlns=\"{}\"", quick_xml::escape::escape(ns.uri()));
                }
            }
        }
    }
    let has_default = |n: roxmltree::Node<'_, '_>| n.namespaces().any(|ns| ns.name().is_none());
    if parent.is_some_and(has_default) && !has_default(node) {
        out.push_str(" xmlns=\"\"");
    }
    for attr in node.attributes() {
        let attr_name = qualified(node, attr.namespace(), attr.name());
        let _ = write!(
            out,
            " {attr_name}=\"{}\"",
            quick_xml::escape::escape(attr.value())
        );
    }
    if !node.has_children() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in node.children() {
        write_node(out, child, false, step, labels);
    }
    let _ = write!(out, "</{name}>");
}

fn qualified(node: roxmltree::Node<'_, '_>, ns: Option<&str>, local: &str) -> String {
    let prefix = match ns {
        Some(XML_NS) => Some("xml"),
        Some(uri) => node.lookup_prefix(uri).filter(|p| !p.is_empty()),
        None => None,
    };
    match prefix {
        Some(p) => format!("{p}:{local}"),
        None => local.to_string(),
    }
}

/// Converter from layered `.ora` documents to SVG text.
pub trait OraConverter {
    /// Produce an SVG document equivalent to the image at `source`.
    fn convert(&self, source: &Path) -> DeckResult<String>;
}

#[cfg(test)]
#[path = "../../tests/unit/assets/image.rs"]
mod tests;
