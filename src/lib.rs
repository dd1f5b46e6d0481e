//! Optimal line breaking for short text labels inside diagram node shapes.
//!
//! Text is tokenized into boxes, glue, and penalties, broken with a memoized
//! Knuth-Plass-style optimizer, and laid out against per-line target lengths,
//! including target lengths derived from the chords of a minimal enclosing
//! circle. Width measurement and hyphenation are injected through the
//! [TextMeasure] and [Hyphenate] traits.

mod units;
pub use units::*;

mod error;
pub use error::*;

mod measure;
pub use measure::*;

mod font;
pub use font::*;

mod hyphen;
pub use hyphen::*;

mod paragraph;
pub use paragraph::*;

mod optimizer;
pub use optimizer::*;

mod layout;
pub use layout::*;

mod circle;
pub use circle::*;

mod wordwrap;
pub use wordwrap::*;
