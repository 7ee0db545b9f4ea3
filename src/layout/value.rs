use crate::{
    foundation::error::{DeckError, DeckResult},
    layout::lazy::LazyValue,
};

/// Raw authoring value for box positions and sizes.
///
/// Accepted forms:
/// - positions: number, `"NN"`, `"NN%"`, `"[NN%]"`, or a [`LazyValue`]
/// - sizes: number, `"NN"`, `"NN%"`, `"[NN%]"`, `"fill"`, `"fill(NN)"`
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Plain number in pixels.
    Num(f64),
    /// Textual form, parsed when the box is created.
    Text(String),
    /// Deferred coordinate anchored to another box.
    Lazy(LazyValue),
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Num(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<LazyValue> for Value {
    fn from(v: LazyValue) -> Self {
        Self::Lazy(v)
    }
}

/// Resolved position request of a layout node along one axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) enum PosSpec {
    /// Placed by the parent's flow.
    #[default]
    Auto,
    /// Offset in pixels from the parent's inner origin.
    Abs(f64),
    /// Fraction of the parent's inner extent.
    Percent(f64),
    /// Fraction of the parent's free space (inner extent minus own size).
    FreePercent(f64),
    /// Absolute coordinate taken from another box.
    Lazy(LazyValue),
}

impl PosSpec {
    pub(crate) fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

/// Resolved size request of a layout node along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) enum SizeSpec {
    /// Derived from content.
    #[default]
    Auto,
    /// Fixed size in pixels.
    Abs(f64),
    /// Fraction of the parent's inner extent.
    Percent(f64),
    /// Fraction of the parent's remaining space along the flow axis.
    FreePercent(f64),
    /// Weighted share of the parent's remaining space along the flow axis.
    Fill(f64),
}

impl SizeSpec {
    pub(crate) fn is_fill(self) -> bool {
        matches!(self, Self::Fill(_))
    }
}

pub(crate) fn parse_pos(value: Option<&Value>) -> DeckResult<PosSpec> {
    let Some(value) = value else {
        return Ok(PosSpec::Auto);
    };
    match value {
        Value::Num(v) => Ok(PosSpec::Abs(finite(*v, "position")?)),
        Value::Lazy(lv) => Ok(PosSpec::Lazy(lv.clone())),
        Value::Text(s) => match parse_numeric_text(s)? {
            Numeric::Abs(v) => Ok(PosSpec::Abs(v)),
            Numeric::Percent(p) => Ok(PosSpec::Percent(p)),
            Numeric::FreePercent(p) => Ok(PosSpec::FreePercent(p)),
        },
    }
}

pub(crate) fn parse_size(value: Option<&Value>) -> DeckResult<SizeSpec> {
    let Some(value) = value else {
        return Ok(SizeSpec::Auto);
    };
    let spec = match value {
        Value::Num(v) => SizeSpec::Abs(finite(*v, "size")?),
        Value::Lazy(_) => {
            return Err(DeckError::configuration(
                "lazy values cannot be used as box sizes",
            ));
        }
        Value::Text(s) => {
            let t = s.trim();
            if t == "fill" {
                SizeSpec::Fill(1.0)
            } else if let Some(inner) = t.strip_prefix("fill(").and_then(|r| r.strip_suffix(')'))
            {
                let weight: f64 = inner.trim().parse().map_err(|_| {
                    DeckError::configuration(format!("invalid fill weight in size '{s}'"))
                })?;
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(DeckError::configuration(format!(
                        "fill weight must be > 0 in size '{s}'"
                    )));
                }
                SizeSpec::Fill(weight)
            } else {
                match parse_numeric_text(t)? {
                    Numeric::Abs(v) => SizeSpec::Abs(v),
                    Numeric::Percent(p) => SizeSpec::Percent(p),
                    Numeric::FreePercent(p) => SizeSpec::FreePercent(p),
                }
            }
        }
    };
    match spec {
        SizeSpec::Abs(v) | SizeSpec::Percent(v) | SizeSpec::FreePercent(v) if v < 0.0 => Err(
            DeckError::configuration(format!("box size must not be negative: {value:?}")),
        ),
        _ => Ok(spec),
    }
}

enum Numeric {
    Abs(f64),
    Percent(f64),
    FreePercent(f64),
}

fn parse_numeric_text(s: &str) -> DeckResult<Numeric> {
    let t = s.trim();
    let bad = || DeckError::configuration(format!("invalid position/size value '{s}'"));
    if let Some(inner) = t.strip_prefix('[').and_then(|r| r.strip_suffix("%]")) {
        let p: f64 = inner.trim().parse().map_err(|_| bad())?;
        return Ok(Numeric::FreePercent(finite(p, s)? / 100.0));
    }
    if let Some(inner) = t.strip_suffix('%') {
        let p: f64 = inner.trim().parse().map_err(|_| bad())?;
        return Ok(Numeric::Percent(finite(p, s)? / 100.0));
    }
    let v: f64 = t.parse().map_err(|_| bad())?;
    Ok(Numeric::Abs(finite(v, s)?))
}

fn finite(v: f64, what: &str) -> DeckResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(DeckError::configuration(format!(
            "non-finite number in {what}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/value.rs"]
mod tests;
