use crate::paragraph::{Paragraph, ParagraphUnit};
use crate::units::Px;
use std::collections::HashMap;
use tracing::trace;

/// Widths are normalized to 16px em units before scoring. Badness is cubic in
/// the adjustment ratio, so solutions depend on this exact scale.
const EM_PX: f64 = 16.0;

/// Divisor substituted for a line with zero stretchability that still needs to
/// stretch, keeping its badness finite so over-wide unbreakable tokens can be
/// ranked instead of rejected.
const ZERO_STRETCH_DIVISOR: f64 = 0.1;

/// Output of the optimizer: the chosen breakpoints (strictly increasing unit
/// indices) and the total demerits of the solution.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakSolution {
    pub breakpoints: Vec<usize>,
    pub demerits: f64,
}

/// Chooses the set of breakpoints that partitions a paragraph into lines while
/// minimizing total demerits, a score similar to the Knuth-Plass one with two
/// deviations: badness is `r^3` rather than `100·r^3` to keep magnitudes
/// small, and a line with no elastic give gets the finite
/// [ZERO_STRETCH_DIVISOR] instead of undefined badness, so a super-long token
/// with no glue can still be broken at its interior penalties.
///
/// One optimizer instance serves one `optimize` call; its memo tables are keyed
/// on `(start, end, n_previous_lines)` sub-ranges and are discarded with it.
pub struct BreakOptimizer<'a> {
    /// unit sequence with widths scaled to em units
    units: Vec<ParagraphUnit>,
    paragraph: &'a Paragraph,
    line_widths: HashMap<(usize, usize), Px>,
    line_demerits: HashMap<(usize, usize, usize), f64>,
    solutions: HashMap<(usize, usize, usize), BreakSolution>,
}

impl<'a> BreakOptimizer<'a> {
    pub fn new(paragraph: &'a Paragraph) -> BreakOptimizer<'a> {
        let units = paragraph
            .units
            .iter()
            .map(|unit| match unit.clone() {
                ParagraphUnit::Box { text, width } => ParagraphUnit::Box {
                    text,
                    width: width / EM_PX,
                },
                ParagraphUnit::Glue {
                    text,
                    width,
                    stretch,
                    shrink,
                } => ParagraphUnit::Glue {
                    text,
                    width: width / EM_PX,
                    stretch: stretch / EM_PX,
                    shrink: shrink / EM_PX,
                },
                ParagraphUnit::Penalty {
                    text,
                    width,
                    cost,
                    flagged,
                } => ParagraphUnit::Penalty {
                    text,
                    width: width / EM_PX,
                    cost,
                    flagged,
                },
            })
            .collect();

        BreakOptimizer {
            units,
            paragraph,
            line_widths: HashMap::new(),
            line_demerits: HashMap::new(),
            solutions: HashMap::new(),
        }
    }

    /// Optimize the whole paragraph.
    ///
    /// Breakpoints `[4, 8]` mean three lines covering unit ranges `[0, 4]`,
    /// `[5, 8]`, and `[9, last]`, each inclusive of its breakpoint unit.
    pub fn optimize(&mut self) -> BreakSolution {
        let solution = self.optimize_range(0, self.units.len() - 1, 0);
        trace!(
            breakpoints = ?solution.breakpoints,
            demerits = solution.demerits,
            units = self.units.len(),
            "optimized paragraph"
        );
        solution
    }

    /// Optimize the sub-range `[start, end]` (inclusive), where
    /// `n_previous_lines` lines precede it (their count shifts which desired
    /// line length each new line sees).
    fn optimize_range(&mut self, start: usize, end: usize, n_previous_lines: usize) -> BreakSolution {
        if let Some(solution) = self.solutions.get(&(start, end, n_previous_lines)) {
            return solution.clone();
        }

        // the sub-range fits in one line when it needs only to stretch (or fits
        // exactly); no need to break it up
        let fits = self
            .adjustment_ratio(start, end, n_previous_lines)
            .is_some_and(|r| r >= 0.0);

        let solution = if fits {
            BreakSolution {
                breakpoints: Vec::new(),
                demerits: self.line_demerits(start, end, n_previous_lines),
            }
        } else {
            let mut best = BreakSolution {
                breakpoints: Vec::new(),
                demerits: f64::INFINITY,
            };

            // work incrementally from right to left, considering only break
            // candidates (glue or penalty positions)
            for caret in (start + 1..end).rev() {
                if self.units[caret].is_box() {
                    continue;
                }

                let left = self.optimize_range(start, caret, n_previous_lines);
                // the left side renders as one line more than it has breakpoints
                let right_offset = n_previous_lines + left.breakpoints.len() + 1;
                let right = self.optimize_range(caret + 1, end, right_offset);

                if left.demerits + right.demerits < best.demerits {
                    let mut breakpoints = left.breakpoints;
                    breakpoints.push(caret);
                    breakpoints.extend_from_slice(&right.breakpoints);
                    best = BreakSolution {
                        demerits: left.demerits + right.demerits,
                        breakpoints,
                    };
                }
            }

            best
        };

        self.solutions
            .insert((start, end, n_previous_lines), solution.clone());
        solution
    }

    /// Natural width of `[start, end]` rendered as one line: boxes and glue at
    /// preferred width, plus the final unit's width if it is a penalty (its
    /// hyphen gets rendered when the line breaks there).
    fn line_width(&mut self, start: usize, end: usize) -> Px {
        if let Some(width) = self.line_widths.get(&(start, end)) {
            return *width;
        }

        let mut width: Px = self.units[start..end]
            .iter()
            .filter(|unit| !unit.is_penalty())
            .map(ParagraphUnit::width)
            .sum();
        if self.units[end].is_penalty() {
            width += self.units[end].width();
        }

        self.line_widths.insert((start, end), width);
        width
    }

    /// Total stretchability and shrinkability of the glue in `[start, end]`.
    fn line_elasticity(&self, start: usize, end: usize) -> (Px, Px) {
        let mut stretchability = Px::ZERO;
        let mut shrinkability = Px::ZERO;
        for unit in &self.units[start..=end] {
            if let ParagraphUnit::Glue {
                stretch, shrink, ..
            } = unit
            {
                stretchability += *stretch;
                shrinkability += *shrink;
            }
        }
        (stretchability, shrinkability)
    }

    /// Signed, elasticity-normalized deviation of the line's natural width
    /// from its target. `None` means the line cannot reach its target at all.
    fn adjustment_ratio(&mut self, start: usize, end: usize, line_number: usize) -> Option<f64> {
        let width = self.line_width(start, end);
        let desired = self.desired_line_length(line_number);

        if width == desired {
            return Some(0.0);
        }

        let (stretchability, shrinkability) = self.line_elasticity(start, end);
        if width < desired {
            if stretchability < Px::ZERO {
                return None;
            }
            if stretchability == Px::ZERO {
                return Some((desired - width).0 / ZERO_STRETCH_DIVISOR);
            }
            return Some((desired - width) / stretchability);
        }

        if shrinkability <= Px::ZERO {
            return None;
        }
        Some((desired - width) / shrinkability)
    }

    /// `r^3` for defined ratios of at least -1; negative infinity otherwise,
    /// meaning "this line must break here regardless of fit".
    fn badness(&mut self, start: usize, end: usize, line_number: usize) -> f64 {
        match self.adjustment_ratio(start, end, line_number) {
            Some(r) if r >= -1.0 => r.powi(3),
            _ => f64::NEG_INFINITY,
        }
    }

    /// Demerits of rendering `[start, end]` as the line numbered `line_number`.
    fn line_demerits(&mut self, start: usize, end: usize, line_number: usize) -> f64 {
        if let Some(demerits) = self.line_demerits.get(&(start, end, line_number)) {
            return *demerits;
        }

        let penalty = match &self.units[end] {
            ParagraphUnit::Penalty { cost, .. } => *cost,
            _ => 0.0,
        };
        let badness = self.badness(start, end, line_number);

        let demerits = if penalty >= 0.0 {
            (1.0 + badness + penalty).powi(2)
        } else if penalty == f64::NEG_INFINITY {
            (1.0 + badness).powi(2)
        } else {
            (1.0 + badness).powi(2) - penalty.powi(2)
        };

        self.line_demerits
            .insert((start, end, line_number), demerits);
        demerits
    }

    /// Score a caller-supplied solution over `[start, end]`: the sum of line
    /// demerits across the lines the breakpoints induce. Useful for comparing
    /// candidate solutions by hand.
    pub fn paragraph_demerits(
        &mut self,
        start: usize,
        end: usize,
        breakpoints: &[usize],
        n_previous_lines: usize,
    ) -> f64 {
        let mut caret = start;
        let mut demerits = 0.0;
        for (i, &breakpoint) in breakpoints.iter().enumerate() {
            demerits += self.line_demerits(caret, breakpoint, n_previous_lines + i);
            caret = breakpoint + 1;
        }
        demerits += self.line_demerits(caret, end, n_previous_lines + breakpoints.len());
        demerits
    }

    fn desired_line_length(&self, line_number: usize) -> Px {
        self.paragraph.line_length(line_number) / EM_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{FnMeasure, TextMeasure};
    use crate::paragraph::MAX_COST;
    use crate::units::Px;

    fn fixed_width_measure() -> impl TextMeasure {
        // every char 8px wide, spaces 4px
        FnMeasure(|text: &str| {
            Px(text
                .chars()
                .map(|ch| if ch == ' ' { 4.0 } else { 8.0 })
                .sum())
        })
    }

    fn paragraph(text: &str, lengths: impl Into<crate::paragraph::LineLengths>) -> Paragraph {
        let measure = fixed_width_measure();
        Paragraph::new(
            Paragraph::units_from_text(text, &measure, None, None, MAX_COST),
            lengths,
        )
    }

    #[test]
    fn a_fitting_line_needs_no_breakpoints() {
        let paragraph = paragraph("aa bb", 200.0);
        let solution = BreakOptimizer::new(&paragraph).optimize();
        assert!(solution.breakpoints.is_empty());
        assert!(solution.demerits.is_finite());
    }

    #[test]
    fn an_exactly_fitting_line_has_unit_demerits() {
        // 2 chars + space + 2 chars = 36px natural; the sentinel stretch makes
        // room, so force exact fit: desired == natural width
        let paragraph = paragraph("aa bb", 36.0);
        let mut optimizer = BreakOptimizer::new(&paragraph);
        let solution = optimizer.optimize();
        assert!(solution.breakpoints.is_empty());
        // adjustment ratio 0 => badness 0 => demerits (1 + 0 + 0)^2
        assert_eq!(solution.demerits, 1.0);
    }

    #[test]
    fn an_overfull_range_breaks_at_the_glue() {
        // each word 32px, space 4px; a 40px target can hold one word per line
        let paragraph = paragraph("aaaa bbbb", 40.0);
        let solution = BreakOptimizer::new(&paragraph).optimize();
        assert_eq!(solution.breakpoints, vec![1]);
    }

    #[test]
    fn identical_input_yields_identical_solutions() {
        let paragraph = paragraph("aaaa bbbb cccc dddd eeee", 80.0);
        let first = BreakOptimizer::new(&paragraph).optimize();
        let second = BreakOptimizer::new(&paragraph).optimize();
        assert_eq!(first, second);
    }

    #[test]
    fn scoring_a_supplied_solution_matches_the_optimum() {
        let paragraph = paragraph("aaaa bbbb", 40.0);
        let mut optimizer = BreakOptimizer::new(&paragraph);
        let solution = optimizer.optimize();
        let last = paragraph.units.len() - 1;
        let rescored = optimizer.paragraph_demerits(0, last, &solution.breakpoints, 0);
        assert_eq!(rescored, solution.demerits);
    }
}
