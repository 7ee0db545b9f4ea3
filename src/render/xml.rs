use crate::foundation::error::{DeckError, DeckResult};

/// Element-authoring handle given to draw commands.
///
/// Calls must nest: `element` opens a start tag, `set` adds attributes to the most recently
/// opened element while no content has been written into it, `close` ends the innermost element.
pub trait XmlWriter {
    /// Open element `name`.
    fn element(&mut self, name: &str);

    /// Attribute on the open start tag; the value is escaped.
    fn set(&mut self, name: &str, value: &str);

    /// Escaped character data.
    fn text(&mut self, text: &str);

    /// Pre-serialized markup, written verbatim.
    fn raw_text(&mut self, markup: &str);

    /// Close element `name`, which must be the innermost open element.
    fn close(&mut self, name: &str);

    /// Numeric attribute in compact form.
    fn set_num(&mut self, name: &str, value: f64) {
        self.set(name, &fmt_num(value));
    }
}

/// Format a coordinate without a trailing `.0` and without negative zero.
pub fn fmt_num(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// [`XmlWriter`] producing an SVG string.
#[derive(Debug, Default)]
pub struct SvgWriter {
    out: String,
    open: Vec<String>,
    in_start_tag: bool,
    misuse: Option<String>,
}

impl SvgWriter {
    /// Empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialized document, or an error if elements were left open or closed out of order.
    pub fn finish(self) -> DeckResult<String> {
        if let Some(m) = self.misuse {
            return Err(DeckError::layout(format!("malformed drawing output: {m}")));
        }
        if let Some(name) = self.open.last() {
            return Err(DeckError::layout(format!(
                "malformed drawing output: element <{name}> was not closed"
            )));
        }
        Ok(self.out)
    }

    fn end_start_tag(&mut self) {
        if self.in_start_tag {
            self.out.push('>');
            self.in_start_tag = false;
        }
    }

    fn misuse(&mut self, msg: String) {
        self.misuse.get_or_insert(msg);
    }
}

impl XmlWriter for SvgWriter {
    fn element(&mut self, name: &str) {
        self.end_start_tag();
        self.out.push('<');
        self.out.push_str(name);
        self.open.push(name.to_string());
        self.in_start_tag = true;
    }

    fn set(&mut self, name: &str, value: &str) {
        if !self.in_start_tag {
            self.misuse(format!("attribute '{name}' set outside of a start tag"));
            return;
        }
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&quick_xml::escape::escape(value));
        self.out.push('"');
    }

    fn text(&mut self, text: &str) {
        self.end_start_tag();
        self.out.push_str(&quick_xml::escape::escape(text));
    }

    fn raw_text(&mut self, markup: &str) {
        self.end_start_tag();
        self.out.push_str(markup);
    }

    fn close(&mut self, name: &str) {
        match self.open.pop() {
            Some(top) if top == name => {}
            Some(top) => {
                self.misuse(format!("closing <{name}> while <{top}> is open"));
                return;
            }
            None => {
                self.misuse(format!("closing <{name}> with no open element"));
                return;
            }
        }
        if self.in_start_tag {
            self.out.push_str("/>");
            self.in_start_tag = false;
        } else {
            self.out.push_str("</");
            self.out.push_str(name);
            self.out.push('>');
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/xml.rs"]
mod tests;
