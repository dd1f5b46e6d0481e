use crate::units::Px;
use std::collections::HashMap;

/// Source of rendered text widths for a fixed font.
///
/// The layout engine never touches font files itself; it asks an implementation
/// of this trait for the width of every token it considers. Implementations
/// must be pure for the duration of one layout call: the same string always
/// measures to the same width.
pub trait TextMeasure {
    /// Width of `text` as it would appear when rendered.
    fn width(&self, text: &str) -> Px;
}

/// A cheap estimating measurer that assumes every character occupies a fixed
/// fraction of the font size. Good enough for demos and for sizing passes that
/// happen before a real font is available; poor for proportional faces.
#[derive(Debug, Clone)]
pub struct HeuristicMeasure {
    pub font_size: f64,
    pub char_width_factor: f64,
}

impl HeuristicMeasure {
    pub fn new(font_size: f64) -> HeuristicMeasure {
        HeuristicMeasure {
            font_size,
            char_width_factor: 0.6,
        }
    }
}

impl TextMeasure for HeuristicMeasure {
    fn width(&self, text: &str) -> Px {
        Px(text.chars().count() as f64 * self.font_size * self.char_width_factor)
    }
}

/// A measurer backed by an exact token-to-width table.
///
/// Unknown tokens fall back to summing per-character widths from the table, and
/// to 0 when even that fails. Useful when widths were captured from a browser
/// canvas once and replayed, and for deterministic tests.
#[derive(Debug, Clone, Default)]
pub struct TableMeasure {
    widths: HashMap<String, f64>,
}

impl TableMeasure {
    pub fn new<S: Into<String>>(widths: impl IntoIterator<Item = (S, f64)>) -> TableMeasure {
        TableMeasure {
            widths: widths.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn insert(&mut self, text: impl Into<String>, width: f64) {
        self.widths.insert(text.into(), width);
    }
}

impl TextMeasure for TableMeasure {
    fn width(&self, text: &str) -> Px {
        if let Some(w) = self.widths.get(text) {
            return Px(*w);
        }
        Px(text
            .chars()
            .map(|ch| {
                self.widths
                    .get(ch.to_string().as_str())
                    .copied()
                    .unwrap_or(0.0)
            })
            .sum())
    }
}

/// Wraps a plain width function into a [TextMeasure].
pub struct FnMeasure<F>(pub F);

impl<F> TextMeasure for FnMeasure<F>
where
    F: Fn(&str) -> Px,
{
    fn width(&self, text: &str) -> Px {
        (self.0)(text)
    }
}
