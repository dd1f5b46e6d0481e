use crate::paragraph::{Paragraph, ParagraphUnit};
use crate::units::Px;

/// Horizontal alignment of lines inside their desired length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    Center,
    Right,
    #[default]
    Justify,
}

/// Render-time parameters for the layout pass.
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Line advance in pixels (`font_size × css_line_height`).
    pub line_height: Px,
    /// CSS line-height multiplier; used to correct baselines for vertical
    /// centering within each line box.
    pub css_line_height: f64,
    pub font_size: Px,
    pub align: Align,
    /// Cap every line's desired length at the maximum natural length observed
    /// across all lines. This keeps a short last line from being justified out
    /// to an artificially wide global target; with non-uniform per-line
    /// targets it does not lengthen lines already below the cap.
    pub auto_length: bool,
}

/// A text run with its final geometry. Produced only by [layout_lines] and
/// never mutated afterward (the circle fitter translates whole runs, it does
/// not relayout them).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedUnit {
    pub text: String,
    pub x: Px,
    pub y: Px,
    pub line_number: usize,
    pub rendered_width: Px,
}

/// Computes geometry for grouped lines: glue redistribution (justification),
/// alignment offsets, and per-line baselines.
///
/// Returns the rendered units plus each line's natural length. Lines that need
/// no glue adjustment are emitted as a single merged run to minimize draw
/// calls; adjusted lines emit one run per unit with glue widened or narrowed
/// evenly.
pub fn layout_lines(
    paragraph: &Paragraph,
    lines: &[Vec<ParagraphUnit>],
    params: &RenderParams,
) -> (Vec<RenderedUnit>, Vec<Px>) {
    let natural_lengths: Vec<Px> = lines
        .iter()
        .map(|line| line.iter().map(ParagraphUnit::width).sum())
        .collect();

    let mut desired_lengths: Vec<Px> = (0..lines.len())
        .map(|i| paragraph.line_length(i))
        .collect();
    if params.auto_length {
        let max_natural = natural_lengths.iter().copied().fold(Px::ZERO, Px::max);
        for desired in &mut desired_lengths {
            *desired = desired.min(max_natural);
        }
    }

    let mut rendered: Vec<RenderedUnit> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let natural = natural_lengths[i];
        let desired = desired_lengths[i];
        let n_glues = line.iter().filter(|unit| unit.is_glue()).count();

        // a short line that is not justified keeps its glue at natural width;
        // otherwise the shortfall or excess is spread evenly over the glue
        let adjusted_glue_width = if natural < desired && params.align != Align::Justify {
            None
        } else if n_glues > 0 && natural != desired {
            Some((desired - natural).abs() / n_glues as f64 + paragraph.space_width)
        } else {
            None
        };

        // middle-anchored within the line box
        let y = params.line_height * (i as f64 + 1.0)
            - params.font_size * (params.css_line_height - 1.0) / 2.0;
        let mut x = match params.align {
            Align::Center => (desired - natural) / 2.0,
            Align::Right => desired - natural,
            Align::Left | Align::Justify => Px::ZERO,
        };

        match adjusted_glue_width {
            None => {
                if line.is_empty() {
                    continue;
                }
                let text: String = line.iter().map(ParagraphUnit::text).collect();
                rendered.push(RenderedUnit {
                    text,
                    x,
                    y,
                    line_number: i,
                    rendered_width: natural,
                });
            }
            Some(glue_width) => {
                for unit in line {
                    let rendered_width = if unit.is_glue() {
                        glue_width
                    } else {
                        unit.width()
                    };
                    rendered.push(RenderedUnit {
                        text: unit.text().to_string(),
                        x,
                        y,
                        line_number: i,
                        rendered_width,
                    });
                    x += rendered_width;
                }
            }
        }
    }

    (rendered, natural_lengths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::{FnMeasure, TextMeasure};
    use crate::paragraph::MAX_COST;
    use pretty_assertions::assert_eq;

    fn measure() -> impl TextMeasure {
        FnMeasure(|text: &str| {
            Px(text
                .chars()
                .map(|ch| if ch == ' ' { 4.0 } else { 8.0 })
                .sum())
        })
    }

    fn params(align: Align) -> RenderParams {
        RenderParams {
            line_height: Px(20.0),
            css_line_height: 1.25,
            font_size: Px(16.0),
            align,
            auto_length: false,
        }
    }

    fn two_line_paragraph(lengths: impl Into<crate::paragraph::LineLengths>) -> Paragraph {
        let m = measure();
        Paragraph::new(
            Paragraph::units_from_text("aa bb cc", &m, None, None, MAX_COST),
            lengths,
        )
    }

    #[test]
    fn short_unjustified_lines_render_as_one_merged_run() {
        let paragraph = two_line_paragraph(200.0);
        let lines = paragraph.group_by_line(&[]);
        let (rendered, natural) = layout_lines(&paragraph, &lines, &params(Align::Left));

        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].text, "aa bb cc");
        assert_eq!(rendered[0].x, Px::ZERO);
        assert_eq!(rendered[0].rendered_width, Px(56.0));
        assert_eq!(natural, vec![Px(56.0)]);
    }

    #[test]
    fn justify_distributes_the_shortfall_over_the_glue() {
        // natural 56, desired 68: 12px shortfall over 2 glues = 6px each on
        // top of the 4px space width
        let paragraph = two_line_paragraph(68.0);
        let lines = paragraph.group_by_line(&[]);
        let (rendered, _) = layout_lines(&paragraph, &lines, &params(Align::Justify));

        // per-unit path: box glue box glue box
        assert_eq!(rendered.len(), 5);
        let glue_widths: Vec<Px> = rendered
            .iter()
            .filter(|u| u.text == " ")
            .map(|u| u.rendered_width)
            .collect();
        assert_eq!(glue_widths, vec![Px(10.0), Px(10.0)]);
        // the line now spans the full desired length
        let last = rendered.last().unwrap();
        assert_eq!(last.x + last.rendered_width, Px(68.0));
    }

    #[test]
    fn center_and_right_offset_short_lines() {
        let paragraph = two_line_paragraph(100.0);
        let lines = paragraph.group_by_line(&[]);

        let (centered, _) = layout_lines(&paragraph, &lines, &params(Align::Center));
        assert_eq!(centered[0].x, Px((100.0 - 56.0) / 2.0));

        let (righted, _) = layout_lines(&paragraph, &lines, &params(Align::Right));
        assert_eq!(righted[0].x, Px(100.0 - 56.0));
    }

    #[test]
    fn baselines_advance_by_line_height_with_centering_correction() {
        let paragraph = two_line_paragraph(40.0);
        // "aa bb" / "cc": break at glue index 3
        let lines = paragraph.group_by_line(&[3]);
        let (rendered, _) = layout_lines(&paragraph, &lines, &params(Align::Left));

        let correction = 16.0 * (1.25 - 1.0) / 2.0;
        let first = rendered.iter().find(|u| u.line_number == 0).unwrap();
        let second = rendered.iter().find(|u| u.line_number == 1).unwrap();
        assert_eq!(first.y, Px(20.0 - correction));
        assert_eq!(second.y, Px(40.0 - correction));
    }

    #[test]
    fn auto_length_caps_desired_at_the_widest_natural_line() {
        // three one-word lines, global target 200; justify must not stretch
        // any line past the widest natural one
        let paragraph = two_line_paragraph(200.0);
        let lines = paragraph.group_by_line(&[1, 3]);
        let mut p = params(Align::Justify);
        p.auto_length = true;
        let (rendered, natural) = layout_lines(&paragraph, &lines, &p);

        let widest = natural.iter().copied().fold(Px::ZERO, Px::max);
        for unit in &rendered {
            assert!(unit.x + unit.rendered_width <= widest + Px(1e-9));
        }
    }

    #[test]
    fn empty_lines_render_nothing() {
        let m = measure();
        let paragraph = Paragraph::new(
            Paragraph::units_from_text("", &m, None, None, MAX_COST),
            50.0,
        );
        let lines = paragraph.group_by_line(&[]);
        let (rendered, natural) = layout_lines(&paragraph, &lines, &params(Align::Left));
        assert!(rendered.is_empty());
        assert_eq!(natural, vec![Px::ZERO]);
    }
}
