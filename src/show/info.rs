use smallvec::SmallVec;

use crate::{
    foundation::core::Step,
    foundation::error::{DeckError, DeckResult},
};

/// Authoring-side fragment selector.
///
/// Grammar: `None | <int> | "<int>" | "<int>-<int>" | "<int>+" | "next" | "last"`, plus
/// comma-separated lists of the numeric forms (`"1,3-4,6+"`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ShowSelector {
    /// Visible at every step.
    #[default]
    Always,
    /// Visible at exactly this step.
    Step(Step),
    /// Textual selector, parsed against the slide's current step count.
    Text(String),
}

impl From<Step> for ShowSelector {
    fn from(v: Step) -> Self {
        Self::Step(v)
    }
}

impl From<&str> for ShowSelector {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ShowSelector {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<ShowSelector>> From<Option<T>> for ShowSelector {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Always, Into::into)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StepRange {
    first: Step,
    last: Step,
}

/// Immutable visibility predicate over the step axis.
///
/// Made of closed ranges plus an optional open-ended tail. "Always" is the tail starting at 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShowInfo {
    ranges: SmallVec<[StepRange; 2]>,
    open_from: Option<Step>,
}

impl Default for ShowInfo {
    fn default() -> Self {
        Self::always()
    }
}

impl ShowInfo {
    /// Visible at every step.
    pub fn always() -> Self {
        Self::from_step(1)
    }

    /// Visible from `step` onwards.
    pub fn from_step(step: Step) -> Self {
        Self {
            ranges: SmallVec::new(),
            open_from: Some(step.max(1)),
        }
    }

    /// Visible only at `step`.
    pub fn single(step: Step) -> Self {
        Self::range(step, step)
    }

    /// Visible for `first..=last`.
    pub fn range(first: Step, last: Step) -> Self {
        let mut ranges = SmallVec::new();
        ranges.push(StepRange { first, last });
        Self {
            ranges,
            open_from: None,
        }
    }

    /// Parse `selector`; `current_max_step` anchors `"next"` and `"last"`.
    pub fn parse(selector: &ShowSelector, current_max_step: Step) -> DeckResult<Self> {
        match selector {
            ShowSelector::Always => Ok(Self::always()),
            ShowSelector::Step(s) => {
                check_step(*s, &s.to_string())?;
                Ok(Self::single(*s))
            }
            ShowSelector::Text(text) => parse_text(text, current_max_step),
        }
    }

    /// Highest step this predicate needs the slide to have.
    ///
    /// An open tail contributes only its first step.
    pub fn max_step(&self) -> Step {
        let closed = self.ranges.iter().map(|r| r.last).max().unwrap_or(0);
        closed.max(self.open_from.unwrap_or(0))
    }

    /// Whether the predicate holds at `step`.
    pub fn is_visible_at(&self, step: Step) -> bool {
        self.open_from.is_some_and(|s| step >= s)
            || self
                .ranges
                .iter()
                .any(|r| r.first <= step && step <= r.last)
    }

    /// Steps at which visibility may flip, in no particular order.
    pub(crate) fn change_points(&self) -> impl Iterator<Item = Step> + '_ {
        self.ranges
            .iter()
            .flat_map(|r| [Some(r.first), r.last.checked_add(1)])
            .chain(std::iter::once(self.open_from))
            .flatten()
    }

    /// First step the predicate holds at.
    pub fn min_step(&self) -> Step {
        let closed = self.ranges.iter().map(|r| r.first).min();
        match (closed, self.open_from) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => 1,
        }
    }
}

fn parse_text(text: &str, current_max_step: Step) -> DeckResult<ShowInfo> {
    let t = text.trim();
    match t {
        "next" => {
            let step = current_max_step.checked_add(1).ok_or_else(|| {
                DeckError::configuration(format!(
                    "invalid show selector '{text}': no step follows {current_max_step}"
                ))
            })?;
            return Ok(ShowInfo::from_step(step));
        }
        "last" => return Ok(ShowInfo::single(current_max_step.max(1))),
        _ => {}
    }

    let mut out = ShowInfo {
        ranges: SmallVec::new(),
        open_from: None,
    };
    for part in t.split(',') {
        let part = part.trim();
        if let Some(start) = part.strip_suffix('+') {
            let s = parse_step(start, text)?;
            out.open_from = Some(out.open_from.map_or(s, |o| o.min(s)));
        } else if let Some((a, b)) = part.split_once('-') {
            let first = parse_step(a, text)?;
            let last = parse_step(b, text)?;
            if first > last {
                return Err(DeckError::configuration(format!(
                    "invalid show selector '{text}': range start is after its end"
                )));
            }
            out.ranges.push(StepRange { first, last });
        } else {
            let s = parse_step(part, text)?;
            out.ranges.push(StepRange { first: s, last: s });
        }
    }
    Ok(out)
}

fn parse_step(s: &str, whole: &str) -> DeckResult<Step> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DeckError::configuration(format!(
            "invalid show selector '{whole}'"
        )));
    }
    let v: Step = s
        .parse()
        .map_err(|_| DeckError::configuration(format!("invalid show selector '{whole}'")))?;
    check_step(v, whole)?;
    Ok(v)
}

fn check_step(step: Step, whole: &str) -> DeckResult<()> {
    if step == 0 {
        return Err(DeckError::configuration(format!(
            "invalid show selector '{whole}': steps start at 1"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/show/info.rs"]
mod tests;
