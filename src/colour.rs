use serde::Deserialize;

/// A colour, expressed in the RGB or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

/// The template palette
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    /// Purple used for captions, headers and table header cells
    pub const ACCENT: Colour = Colour::RGB {
        r: 117.0 / 255.0,
        g: 59.0 / 255.0,
        b: 189.0 / 255.0,
    };
    /// Dark grey used for body text
    pub const BODY: Colour = Colour::RGB {
        r: 89.0 / 255.0,
        g: 89.0 / 255.0,
        b: 89.0 / 255.0,
    };
}

/// The colour category a box draws its text in. Boxes name a role rather than a
/// colour so that the palette lives in one place.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColourRole {
    Accent,
    #[default]
    Body,
    /// Text drawn over an accent fill
    Inverse,
}

impl ColourRole {
    pub fn colour(self) -> Colour {
        match self {
            ColourRole::Accent => colours::ACCENT,
            ColourRole::Body => colours::BODY,
            ColourRole::Inverse => colours::WHITE,
        }
    }
}
