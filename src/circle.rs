use crate::error::LayoutError;
use crate::units::Px;
use std::collections::HashMap;
use tracing::trace;

/// Chord lengths available inside a circle of one candidate radius: one
/// horizontal line of text per chord, stacked at `line_height` intervals
/// symmetrically around the vertical center.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordLayout {
    /// Chord lengths ordered outermost-first: narrowest, widening to the
    /// central chord in the middle, then narrowing again.
    pub lines: Vec<Px>,
    /// The widest (central) chord.
    pub central_line: Px,
    /// Sum of all chords; non-decreasing in the radius.
    pub total_length: Px,
}

/// Finds the smallest circle that can hold a run of text once wrapped.
///
/// The fitter owns a radius-to-chords memo table for its lifetime; chord
/// geometry is a pure function of the line height, so the table never needs
/// invalidation.
pub struct CircleFitter {
    line_height: Px,
    layouts: HashMap<u32, ChordLayout>,
}

impl CircleFitter {
    pub fn new(line_height: Px) -> CircleFitter {
        CircleFitter {
            line_height,
            layouts: HashMap::new(),
        }
    }

    /// Chord lengths for a circle of `radius`, memoized.
    pub fn chord_layout(&mut self, radius: u32) -> &ChordLayout {
        if !self.layouts.contains_key(&radius) {
            let layout = self.build_layout(radius);
            self.layouts.insert(radius, layout);
        }
        &self.layouts[&radius]
    }

    fn build_layout(&self, radius: u32) -> ChordLayout {
        let n = self.half_line_count(radius);

        let mut lines: Vec<Px> = Vec::with_capacity(2 * n as usize + 1);
        for i in (1..=n).rev() {
            lines.push(self.chord(i, radius));
        }
        lines.push(self.central_chord(radius));
        for i in (0..n as usize).rev() {
            let mirrored = lines[i];
            lines.push(mirrored);
        }

        ChordLayout {
            central_line: lines[n as usize],
            total_length: lines.iter().copied().sum(),
            lines,
        }
    }

    /// Binary-search the smallest integer radius in `[0, max_radius]` whose
    /// total chord length reaches `text_width`, accepting a layout at most
    /// `acceptable_error` longer than needed.
    ///
    /// Fails with [LayoutError::RadiusNotFound] when even `max_radius` cannot
    /// hold the text.
    pub fn find_radius(
        &mut self,
        text_width: Px,
        max_radius: u32,
        acceptable_error: f64,
    ) -> Result<u32, LayoutError> {
        let (mut start, mut end) = (0u32, max_radius);
        let mut lower_bound: Option<u32> = None;

        for _ in 0..max_radius {
            if end - start == 1 {
                lower_bound = Some(end);
                break;
            }

            let radius = (start + end).div_ceil(2);
            let total = self.chord_layout(radius).total_length;

            if total < text_width {
                start = radius;
                continue;
            }
            if (total - text_width).0 > acceptable_error {
                end = radius;
                continue;
            }
            lower_bound = Some(radius);
            break;
        }

        // an interval collapse lands on a radius that was never probed; make
        // sure it actually holds the text before accepting it
        match lower_bound {
            Some(radius) if self.chord_layout(radius).total_length >= text_width => {
                trace!(radius, %text_width, "circle radius found");
                Ok(radius)
            }
            _ => {
                let achieved = self.chord_layout(max_radius).total_length;
                trace!(max_radius, %text_width, %achieved, "circle radius search failed");
                Err(LayoutError::RadiusNotFound {
                    text_width,
                    max_radius,
                    achieved,
                })
            }
        }
    }

    /// Number of chords that fit in one half of the circle, excluding the
    /// central chord.
    fn half_line_count(&self, radius: u32) -> u32 {
        let n = (radius as f64 - self.line_height.0 / 2.0) / self.line_height.0;
        if n >= 1.0 {
            n.floor() as u32
        } else {
            0
        }
    }

    /// Chord length at the `index`-th line height away from the center. The
    /// radicand is clamped at zero so degenerate radii yield empty chords
    /// rather than NaN (keeps `total_length` monotone).
    fn chord(&self, index: u32, radius: u32) -> Px {
        let offset = self.line_height.0 * index as f64;
        Px(((radius as f64).powi(2) - offset.powi(2)).max(0.0).sqrt() * 2.0)
    }

    /// The central chord sits half a line height off the exact center.
    fn central_chord(&self, radius: u32) -> Px {
        let offset = self.line_height.0 / 2.0;
        Px(((radius as f64).powi(2) - offset.powi(2)).max(0.0).sqrt() * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitter() -> CircleFitter {
        CircleFitter::new(Px(22.848))
    }

    #[test]
    fn chords_are_symmetric_and_centrally_widest() {
        let mut fitter = fitter();
        let layout = fitter.chord_layout(100).clone();

        let n = layout.lines.len();
        assert_eq!(n % 2, 1);
        for i in 0..n / 2 {
            assert_eq!(layout.lines[i], layout.lines[n - 1 - i]);
        }
        let central = layout.lines[n / 2];
        assert_eq!(central, layout.central_line);
        assert!(layout.lines.iter().all(|&line| line <= central));
    }

    #[test]
    fn total_length_is_monotone_in_the_radius() {
        let mut fitter = fitter();
        let mut previous = Px::ZERO;
        for radius in 0..=300 {
            let total = fitter.chord_layout(radius).total_length;
            assert!(
                total >= previous,
                "total length shrank between radius {} and {radius}",
                radius - 1
            );
            previous = total;
        }
    }

    #[test]
    fn degenerate_radii_have_zero_chords_not_nan() {
        let mut fitter = fitter();
        let layout = fitter.chord_layout(5).clone();
        assert_eq!(layout.lines, vec![Px::ZERO]);
        assert_eq!(layout.total_length, Px::ZERO);
    }

    #[test]
    fn found_radius_holds_the_text() {
        let mut fitter = fitter();
        let text_width = Px(800.0);
        let radius = fitter.find_radius(text_width, 1024, 10.0).unwrap();
        assert!(fitter.chord_layout(radius).total_length >= text_width);
        // minimality: one radius less no longer holds the text comfortably
        if radius > 0 {
            let below = fitter.chord_layout(radius - 1).total_length;
            assert!(below < fitter.chord_layout(radius).total_length);
        }
    }

    #[test]
    fn oversized_text_reports_radius_not_found() {
        let mut fitter = fitter();
        let result = fitter.find_radius(Px(5000.0), 10, 10.0);
        match result {
            Err(LayoutError::RadiusNotFound {
                max_radius,
                achieved,
                ..
            }) => {
                assert_eq!(max_radius, 10);
                assert_eq!(achieved, Px::ZERO);
            }
            other => panic!("expected RadiusNotFound, got {other:?}"),
        }
    }

    #[test]
    fn search_is_deterministic() {
        let mut a = fitter();
        let mut b = fitter();
        assert_eq!(
            a.find_radius(Px(312.5), 1024, 10.0).unwrap(),
            b.find_radius(Px(312.5), 1024, 10.0).unwrap()
        );
    }
}
