use label_layout::{Align, HeuristicMeasure, WordWrap};

fn main() {
    let wrap = WordWrap::new(HeuristicMeasure::new(16.0), 16.0, "sans-serif");

    let text = lipsum::lipsum(12);
    let label = wrap.wrap_text(&text, 180.0, Align::Justify);

    println!(
        "wrapped {:.1}x{:.1}px:",
        label.width.0, label.height.0
    );
    for unit in &label.units {
        println!(
            "  line {} @ ({:6.1}, {:6.1}) w={:6.1} {:?}",
            unit.line_number, unit.x.0, unit.y.0, unit.rendered_width.0, unit.text
        );
    }
}
