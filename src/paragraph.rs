use crate::hyphen::Hyphenate;
use crate::measure::TextMeasure;
use crate::units::Px;
use regex::Regex;

/// Penalty costs at or above this value forbid a break at that position.
pub const MAX_COST: f64 = 1000.0;

/// Penalty costs at or below this value force a break at that position.
pub const MIN_COST: f64 = -1000.0;

/// Sub-tokens shorter than this many characters are never offered to the
/// hyphenation policy.
pub const MIN_HYPHENATION_LEN: usize = 5;

/// One typesetting primitive of a paragraph.
///
/// `Box` is unbreakable fixed content; `Glue` is an elastic space and a
/// candidate breakpoint when it follows a `Box`; `Penalty` is an explicit
/// candidate breakpoint with a cost and optional rendered content (a hyphen).
#[derive(Debug, Clone, PartialEq)]
pub enum ParagraphUnit {
    Box {
        text: String,
        width: Px,
    },
    Glue {
        text: String,
        width: Px,
        /// Maximum amount by which this space can grow.
        stretch: Px,
        /// Maximum amount by which this space can shrink.
        shrink: Px,
    },
    Penalty {
        text: String,
        width: Px,
        /// The undesirability of breaking the line at this point, in
        /// `MIN_COST..=MAX_COST`.
        cost: f64,
        /// Hints the optimizer away from ending consecutive lines here
        /// (avoids stacked hyphens).
        flagged: bool,
    },
}

impl ParagraphUnit {
    pub fn text(&self) -> &str {
        match self {
            ParagraphUnit::Box { text, .. }
            | ParagraphUnit::Glue { text, .. }
            | ParagraphUnit::Penalty { text, .. } => text,
        }
    }

    pub fn width(&self) -> Px {
        match self {
            ParagraphUnit::Box { width, .. }
            | ParagraphUnit::Glue { width, .. }
            | ParagraphUnit::Penalty { width, .. } => *width,
        }
    }

    pub fn is_box(&self) -> bool {
        matches!(self, ParagraphUnit::Box { .. })
    }

    pub fn is_glue(&self) -> bool {
        matches!(self, ParagraphUnit::Glue { .. })
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self, ParagraphUnit::Penalty { .. })
    }
}

/// Desired line length policy: one target for every line, or per-line targets
/// where the last entry repeats for any further lines.
#[derive(Debug, Clone)]
pub enum LineLengths {
    Fixed(Px),
    PerLine(Vec<Px>),
}

impl From<Px> for LineLengths {
    fn from(len: Px) -> Self {
        LineLengths::Fixed(len)
    }
}

impl From<f64> for LineLengths {
    fn from(len: f64) -> Self {
        LineLengths::Fixed(Px(len))
    }
}

impl From<Vec<Px>> for LineLengths {
    fn from(lens: Vec<Px>) -> Self {
        LineLengths::PerLine(lens)
    }
}

impl From<Vec<f64>> for LineLengths {
    fn from(lens: Vec<f64>) -> Self {
        LineLengths::PerLine(lens.into_iter().map(Px).collect())
    }
}

/// The full unit sequence of one label plus its desired-line-length policy.
///
/// A paragraph is built once per `(text, font, targets)` tuple, consumed by the
/// optimizer and the layout pass in one synchronous call, and discarded.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub units: Vec<ParagraphUnit>,
    pub line_lengths: LineLengths,
    /// Width of the first glue in the sequence; 0 when the text had no spaces.
    pub space_width: Px,
}

impl Paragraph {
    pub fn new(units: Vec<ParagraphUnit>, line_lengths: impl Into<LineLengths>) -> Paragraph {
        let space_width = units
            .iter()
            .find_map(|unit| match unit {
                ParagraphUnit::Glue { width, .. } => Some(*width),
                _ => None,
            })
            .unwrap_or(Px::ZERO);

        Paragraph {
            units,
            line_lengths: line_lengths.into(),
            space_width,
        }
    }

    /// Desired length for line `i`. A per-line policy repeats its last entry
    /// for indices past its end.
    pub fn line_length(&self, i: usize) -> Px {
        match &self.line_lengths {
            LineLengths::Fixed(len) => *len,
            LineLengths::PerLine(lens) => lens
                .get(i)
                .or_else(|| lens.last())
                .copied()
                .unwrap_or(Px::ZERO),
        }
    }

    /// Compiles a set of separable punctuation characters into the sub-token
    /// splitting pattern: each match is either a shortest run ending in a
    /// separable character, or the whole remainder.
    pub fn separable_regex(separable: &[char]) -> Option<Regex> {
        if separable.is_empty() {
            return None;
        }
        let class: String = separable
            .iter()
            .map(|ch| regex::escape(&ch.to_string()))
            .collect();
        // The pattern is built from escaped single characters; it always compiles.
        Regex::new(&format!(".*?[{class}]|.+")).ok()
    }

    /// Tokenizes raw text into a unit sequence.
    ///
    /// Whitespace runs become glue at the measured space width with fixed
    /// elasticity (stretch = space/2, shrink = space/3). Non-whitespace chunks
    /// are further split by `separable` so punctuation-delimited sub-tokens can
    /// break mid-word at a cost-1 penalty; long sub-tokens are offered to the
    /// hyphenation policy and rejoin across flagged hyphen penalties costing
    /// `penalty_cost`. A zero-width, effectively infinitely stretchable glue is
    /// appended so the end of text is always an unpenalized final breakpoint.
    pub fn units_from_text(
        text: &str,
        measure: &dyn TextMeasure,
        hyphenate: Option<&dyn Hyphenate>,
        separable: Option<&Regex>,
        penalty_cost: f64,
    ) -> Vec<ParagraphUnit> {
        let mut units: Vec<ParagraphUnit> = Vec::new();

        let mut chunks: Vec<&str> = split_keeping_whitespace(text);
        if let Some(re) = separable {
            chunks = chunks
                .iter()
                .flat_map(|chunk| {
                    let pieces: Vec<&str> = re.find_iter(chunk).map(|m| m.as_str()).collect();
                    if pieces.is_empty() {
                        vec![*chunk]
                    } else {
                        pieces
                    }
                })
                .collect();
        }

        // every space is assumed to have the same default size; callers who
        // want more flexibility can assemble the unit sequence themselves
        let space_width = measure.width(" ");
        let hyphen_width = measure.width("-");
        let stretch = space_width / 2.0;
        let shrink = space_width / 3.0;

        for chunk in chunks {
            if chunk.starts_with(char::is_whitespace) {
                units.push(ParagraphUnit::Glue {
                    text: chunk.to_string(),
                    width: space_width,
                    stretch,
                    shrink,
                });
                continue;
            }

            // sub-tokens split apart by separable punctuation were not divided
            // by any glue; give the optimizer a cheap (but never free) way to
            // break between them
            if units.last().is_some_and(ParagraphUnit::is_box) {
                units.push(ParagraphUnit::Penalty {
                    text: String::new(),
                    width: Px::ZERO,
                    cost: 1.0,
                    flagged: false,
                });
            }

            let fragments = match hyphenate {
                Some(h) if chunk.chars().count() >= MIN_HYPHENATION_LEN => h.hyphenate(chunk),
                _ => Vec::new(),
            };

            if fragments.len() > 1 {
                let last = fragments.len() - 1;
                for (i, fragment) in fragments.into_iter().enumerate() {
                    units.push(ParagraphUnit::Box {
                        width: measure.width(&fragment),
                        text: fragment,
                    });
                    if i < last {
                        units.push(ParagraphUnit::Penalty {
                            text: "-".to_string(),
                            width: hyphen_width,
                            cost: penalty_cost,
                            flagged: true,
                        });
                    }
                }
            } else {
                units.push(ParagraphUnit::Box {
                    text: chunk.to_string(),
                    width: measure.width(chunk),
                });
            }
        }

        // finishing glue to space out the final line
        units.push(ParagraphUnit::Glue {
            text: String::new(),
            width: Px::ZERO,
            stretch: Px(10000.0),
            shrink: Px::ZERO,
        });

        units
    }

    /// Groups units into renderable lines at the chosen breakpoints.
    ///
    /// Penalties in the middle of a line are not rendered and are dropped; the
    /// breakpoint unit itself only survives when it is a penalty with visible
    /// text (a hyphen), in which case it terminates the line. Consecutive
    /// boxes merge into one to minimize draw calls.
    pub fn group_by_line(&self, breakpoints: &[usize]) -> Vec<Vec<ParagraphUnit>> {
        let mut breaks: Vec<usize> = breakpoints.to_vec();
        breaks.push(self.units.len() - 1);

        let mut lines = Vec::with_capacity(breaks.len());
        let mut start = 0usize;

        for end in breaks {
            let mut line: Vec<ParagraphUnit> = Vec::new();

            for unit in &self.units[start..end] {
                if unit.is_penalty() {
                    continue;
                }

                if let (
                    ParagraphUnit::Box { text, width },
                    Some(ParagraphUnit::Box {
                        text: last_text,
                        width: last_width,
                    }),
                ) = (unit, line.last_mut())
                {
                    last_text.push_str(text);
                    *last_width += *width;
                    continue;
                }

                line.push(unit.clone());
            }

            if let ParagraphUnit::Penalty { text, .. } = &self.units[end] {
                if !text.is_empty() {
                    line.push(self.units[end].clone());
                }
            }

            start = end + 1;
            lines.push(line);
        }

        lines
    }
}

/// Splits text into alternating runs of whitespace and non-whitespace,
/// preserving both.
fn split_keeping_whitespace(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut prev_is_ws: Option<bool> = None;

    for (i, ch) in text.char_indices() {
        let is_ws = ch.is_whitespace();
        match prev_is_ws {
            Some(prev) if prev != is_ws => {
                chunks.push(&text[start..i]);
                start = i;
                prev_is_ws = Some(is_ws);
            }
            None => prev_is_ws = Some(is_ws),
            _ => {}
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::HeuristicMeasure;
    use pretty_assertions::assert_eq;

    fn units(text: &str) -> Vec<ParagraphUnit> {
        let measure = HeuristicMeasure::new(16.0);
        let separable = Paragraph::separable_regex(&['{', '}', ':', ',', '\'', '"', '.', '/']);
        Paragraph::units_from_text(text, &measure, None, separable.as_ref(), MAX_COST)
    }

    #[test]
    fn whitespace_runs_are_preserved_by_the_splitter() {
        assert_eq!(
            split_keeping_whitespace("a  bc d"),
            vec!["a", "  ", "bc", " ", "d"]
        );
        assert_eq!(split_keeping_whitespace("  a"), vec!["  ", "a"]);
        assert_eq!(split_keeping_whitespace(""), Vec::<&str>::new());
    }

    #[test]
    fn empty_input_yields_only_the_sentinel() {
        let units = units("");
        assert_eq!(units.len(), 1);
        assert!(matches!(
            &units[0],
            ParagraphUnit::Glue { width, stretch, .. }
                if *width == Px::ZERO && *stretch == Px(10000.0)
        ));
    }

    #[test]
    fn separable_punctuation_splits_chunks_with_cheap_penalties() {
        let units = units("a{b:c d");
        let kinds: Vec<&str> = units
            .iter()
            .map(|u| match u {
                ParagraphUnit::Box { .. } => "box",
                ParagraphUnit::Glue { .. } => "glue",
                ParagraphUnit::Penalty { .. } => "penalty",
            })
            .collect();
        // a{ | b: | c, penalties between adjacent boxes, a real glue, d, sentinel
        assert_eq!(
            kinds,
            vec![
                "box", "penalty", "box", "penalty", "box", "glue", "box", "glue"
            ]
        );
        assert_eq!(units[0].text(), "a{");
        assert_eq!(units[2].text(), "b:");
        assert_eq!(units[4].text(), "c");
        assert!(matches!(
            &units[1],
            ParagraphUnit::Penalty { cost, flagged: false, width, .. }
                if *cost == 1.0 && *width == Px::ZERO
        ));
    }

    #[test]
    fn glue_elasticity_follows_the_space_width() {
        let units = units("x y");
        let glue = units.iter().find(|u| u.is_glue()).unwrap();
        if let ParagraphUnit::Glue {
            width,
            stretch,
            shrink,
            ..
        } = glue
        {
            assert_eq!(*stretch, *width / 2.0);
            assert_eq!(*shrink, *width / 3.0);
        }
    }

    #[test]
    fn short_words_are_never_hyphenated() {
        let measure = HeuristicMeasure::new(16.0);
        let hyphenator = crate::hyphen::FnHyphenator(|word: &str| {
            word.chars().map(|c| c.to_string()).collect()
        });
        let units =
            Paragraph::units_from_text("club", &measure, Some(&hyphenator), None, MAX_COST);
        // "club" is only 4 chars; it must stay one box
        assert_eq!(units.iter().filter(|u| u.is_box()).count(), 1);
        assert_eq!(units[0].text(), "club");
    }

    #[test]
    fn grouping_merges_boxes_and_keeps_terminal_hyphens() {
        let measure = HeuristicMeasure::new(16.0);
        let hyphenator = crate::hyphen::DictionaryHyphenator::new([(
            "football",
            vec!["foot", "ball"],
        )]);
        let units =
            Paragraph::units_from_text("football", &measure, Some(&hyphenator), None, MAX_COST);
        let paragraph = Paragraph::new(units, 1000.0);

        // no break: the boxes merge back into the full word
        let lines = paragraph.group_by_line(&[]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 1);
        assert_eq!(lines[0][0].text(), "football");

        // break at the hyphen penalty (index 1): the hyphen is rendered
        let lines = paragraph.group_by_line(&[1]);
        assert_eq!(lines.len(), 2);
        let texts: Vec<String> = lines
            .iter()
            .map(|line| line.iter().map(|u| u.text()).collect::<String>())
            .collect();
        assert_eq!(texts, vec!["foot-".to_string(), "ball".to_string()]);
    }

    #[test]
    fn per_line_lengths_repeat_the_last_entry() {
        let paragraph = Paragraph::new(units("a b"), vec![10.0, 20.0]);
        assert_eq!(paragraph.line_length(0), Px(10.0));
        assert_eq!(paragraph.line_length(1), Px(20.0));
        assert_eq!(paragraph.line_length(7), Px(20.0));
    }
}
