use crate::circle::{ChordLayout, CircleFitter};
use crate::error::LayoutError;
use crate::hyphen::Hyphenate;
use crate::layout::{layout_lines, Align, RenderParams, RenderedUnit};
use crate::measure::TextMeasure;
use crate::optimizer::BreakOptimizer;
use crate::paragraph::{LineLengths, Paragraph, MAX_COST};
use crate::units::Px;
use regex::Regex;

/// Punctuation that may split a token into separately breakable sub-tokens;
/// chosen so structured strings (JSON-ish values, URIs, qualified names) get
/// interior break opportunities.
pub const DEFAULT_SEPARABLE: [char; 8] = ['{', '}', ':', ',', '\'', '"', '.', '/'];

const DEFAULT_CSS_LINE_HEIGHT: f64 = 1.428;
pub const DEFAULT_MAX_RADIUS: u32 = 1024;
pub const DEFAULT_ACCEPTABLE_ERROR: f64 = 10.0;

/// Breathing room added around the text block inside its circle.
const CIRCLE_RADIUS_PADDING: u32 = 12;

/// A wrapped label: positioned text runs plus the bounding box they occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLabel {
    pub units: Vec<RenderedUnit>,
    pub width: Px,
    pub height: Px,
}

/// A label wrapped to fit a circle, with runs re-centered on the circle's
/// origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleLabel {
    pub units: Vec<RenderedUnit>,
    pub radius: Px,
}

/// The layout engine facade: owns the measurement and hyphenation policies,
/// the font configuration, and the circle fitter's memo table.
///
/// Both entry points are pure functions of their inputs plus the injected
/// callbacks; constructing one `WordWrap` per font configuration and reusing
/// it amortizes the separable pattern compilation and circle geometry.
pub struct WordWrap {
    measure: Box<dyn TextMeasure>,
    hyphenator: Option<Box<dyn Hyphenate>>,
    separable_pattern: Option<Regex>,
    circle: CircleFitter,

    pub font_size: Px,
    pub font_family: String,
    pub css_line_height: f64,
    /// Line advance in pixels (`font_size × css_line_height`), distinct from
    /// the unitless `css_line_height` multiplier.
    pub line_height: Px,
    pub space_width: Px,
}

impl WordWrap {
    pub fn new(
        measure: impl TextMeasure + 'static,
        font_size: impl Into<Px>,
        font_family: impl Into<String>,
    ) -> WordWrap {
        let font_size = font_size.into();
        let space_width = measure.width(" ");
        let line_height = font_size * DEFAULT_CSS_LINE_HEIGHT;

        WordWrap {
            measure: Box::new(measure),
            hyphenator: None,
            separable_pattern: Paragraph::separable_regex(&DEFAULT_SEPARABLE),
            circle: CircleFitter::new(line_height),
            font_size,
            font_family: font_family.into(),
            css_line_height: DEFAULT_CSS_LINE_HEIGHT,
            line_height,
            space_width,
        }
    }

    /// Supply a hyphenation policy; without one, words never break internally
    /// except at separable punctuation.
    pub fn with_hyphenator(mut self, hyphenator: impl Hyphenate + 'static) -> WordWrap {
        self.hyphenator = Some(Box::new(hyphenator));
        self
    }

    /// Override the CSS line-height multiplier. Resets the circle geometry
    /// cache, which depends on the pixel line height.
    pub fn with_css_line_height(mut self, css_line_height: f64) -> WordWrap {
        self.css_line_height = css_line_height;
        self.line_height = self.font_size * css_line_height;
        self.circle = CircleFitter::new(self.line_height);
        self
    }

    /// Override the separable punctuation set; an empty set disables sub-token
    /// splitting entirely.
    pub fn with_separable(mut self, separable: &[char]) -> WordWrap {
        self.separable_pattern = Paragraph::separable_regex(separable);
        self
    }

    /// Wrap `text` to the given per-line target lengths.
    ///
    /// Returns the positioned runs and the bounding box: `width` is the widest
    /// natural line, `height` covers one line height per produced line.
    pub fn wrap_text(
        &self,
        text: &str,
        desired_line_lengths: impl Into<LineLengths>,
        align: Align,
    ) -> WrappedLabel {
        let units = Paragraph::units_from_text(
            text,
            self.measure.as_ref(),
            self.hyphenator.as_deref(),
            self.separable_pattern.as_ref(),
            MAX_COST,
        );
        let paragraph = Paragraph::new(units, desired_line_lengths);

        let solution = BreakOptimizer::new(&paragraph).optimize();
        let lines = paragraph.group_by_line(&solution.breakpoints);
        let (units, natural_lengths) = layout_lines(
            &paragraph,
            &lines,
            &RenderParams {
                line_height: self.line_height,
                css_line_height: self.css_line_height,
                font_size: self.font_size,
                align,
                auto_length: true,
            },
        );

        let width = natural_lengths.iter().copied().fold(Px::ZERO, Px::max);
        let height = if units.is_empty() {
            Px::ZERO
        } else {
            self.line_height * (solution.breakpoints.len() as f64 + 1.0)
        };

        WrappedLabel {
            units,
            width,
            height,
        }
    }

    /// Wrap `text` inside the smallest circle of radius at most
    /// [DEFAULT_MAX_RADIUS] that can hold it.
    pub fn wrap_text_circle(&mut self, text: &str) -> Result<CircleLabel, LayoutError> {
        self.wrap_text_circle_within(text, DEFAULT_MAX_RADIUS, DEFAULT_ACCEPTABLE_ERROR)
    }

    /// Wrap `text` inside the smallest circle whose radius is at most
    /// `max_radius`, accepting a chord-length surplus of `acceptable_error`.
    ///
    /// The text block is centered on the circle's origin; the returned radius
    /// is derived from the actual wrapped width, not the search radius.
    pub fn wrap_text_circle_within(
        &mut self,
        text: &str,
        max_radius: u32,
        acceptable_error: f64,
    ) -> Result<CircleLabel, LayoutError> {
        let text_width = self.measure.width(text);
        let search_radius =
            self.circle
                .find_radius(text_width, max_radius, acceptable_error)?
                + CIRCLE_RADIUS_PADDING;

        // the outermost (narrowest) chords govern the wrap targets
        let targets: Vec<Px> = self
            .circle
            .chord_layout(search_radius)
            .lines
            .iter()
            .copied()
            .take(3)
            .collect();

        let wrapped = self.wrap_text(text, targets, Align::Center);
        let line_count = wrapped
            .units
            .iter()
            .map(|unit| unit.line_number)
            .max()
            .map_or(0, |last| last + 1);

        // center the block on the circle's origin
        let radius = wrapped.width / 2.0;
        let delta_x = -radius;
        let middle = if line_count % 2 == 1 {
            (line_count - 1) / 2
        } else {
            line_count / 2
        };
        let delta_y = -(self.line_height * middle as f64) - self.line_height / 2.0;

        let mut units = wrapped.units;
        for unit in &mut units {
            unit.x += delta_x;
            unit.y += delta_y;
        }

        Ok(CircleLabel { units, radius })
    }

    /// Chord geometry for a circle of the given radius, using this facade's
    /// line height. Lets callers draw the circle the text was fitted into.
    pub fn chord_layout(&mut self, radius: u32) -> &ChordLayout {
        self.circle.chord_layout(radius)
    }

    /// Rough width of a sentence of `n_words` average words; useful for sizing
    /// a node before exact layout.
    pub fn approximate_width(&self, n_words: usize) -> Px {
        self.measure.width("abcij ") * n_words as f64
    }

    /// Width of `text` under this facade's measurement policy.
    pub fn measure_text(&self, text: &str) -> Px {
        self.measure.width(text)
    }
}
