use crate::error::LayoutError;
use crate::measure::TextMeasure;
use crate::units::Px;
use owned_ttf_parser::{AsFaceRef, OwnedFace};

/// A parsed font object. Fonts can be TTF or OTF fonts. The face is only used
/// for metrics (glyph advances and vertical extents); nothing is rasterized or
/// embedded anywhere.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, LayoutError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    /// Obtain the family name of the font, if the face carries one
    pub fn family(&self) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Px) -> Px {
        let scaling: Px = size / self.face.as_face_ref().units_per_em() as f64;
        scaling * self.face.as_face_ref().ascender() as f64
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Px) -> Px {
        let scaling: Px = size / self.face.as_face_ref().units_per_em() as f64;
        scaling * self.face.as_face_ref().descender() as f64
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: Px) -> Px {
        let scaling: Px = size / self.face.as_face_ref().units_per_em() as f64;
        let leading: Px = scaling * self.face.as_face_ref().line_gap() as f64;
        let ascent: Px = scaling * self.face.as_face_ref().ascender() as f64;
        let descent: Px = scaling * self.face.as_face_ref().descender() as f64;
        leading + ascent - descent
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    /// Calculate the width of a given string of text at the given font size by
    /// summing glyph horizontal advances. Characters without a glyph are skipped.
    pub fn width_of_text(&self, text: &str, size: Px) -> Px {
        let scaling = size / self.face.as_face_ref().units_per_em() as f64;
        text.chars()
            .filter_map(|ch| self.face.as_face_ref().glyph_index(ch))
            .map(|gid| {
                scaling
                    * self
                        .face
                        .as_face_ref()
                        .glyph_hor_advance(gid)
                        .unwrap_or_default() as f64
            })
            .sum()
    }
}

/// Adapts a [Font] at a fixed size into a [TextMeasure] the layout engine can use.
pub struct FontMeasure {
    pub font: Font,
    pub size: Px,
}

impl FontMeasure {
    pub fn new(font: Font, size: Px) -> FontMeasure {
        FontMeasure { font, size }
    }
}

impl TextMeasure for FontMeasure {
    fn width(&self, text: &str) -> Px {
        self.font.width_of_text(text, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_not_a_font() {
        let result = Font::load(vec![0u8; 16]);
        assert!(matches!(result, Err(LayoutError::FaceParsing(_))));
    }
}
