use label_layout::{HeuristicMeasure, WordWrap};

fn main() {
    let mut wrap = WordWrap::new(HeuristicMeasure::new(16.0), 16.0, "sans-serif");

    let text = "urban municipality of Germany";
    let label = wrap
        .wrap_text_circle(text)
        .expect("text fits inside the default maximum radius");

    println!("circle radius {:.1}px:", label.radius.0);
    for unit in &label.units {
        println!(
            "  line {} @ ({:6.1}, {:6.1}) w={:6.1} {:?}",
            unit.line_number, unit.x.0, unit.y.0, unit.rendered_width.0, unit.text
        );
    }
}
