use crate::units::Px;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LayoutError {
    /// No radius up to `max_radius` could hold the text within the requested
    /// tolerance. `achieved` is the total chord length available at `max_radius`.
    #[error(
        "text of width {text_width}px is too long to render in a circle with maximum radius {max_radius} (total chord length available: {achieved}px)"
    )]
    RadiusNotFound {
        text_width: Px,
        max_radius: u32,
        achieved: Px,
    },

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),
}
