//! Colour palettes for the two themes.

use std::hash::{Hash, Hasher};

use crate::theme::Theme;

/// HSV color representation (hue 0-1, saturation 0-1, value 0-1).
pub type Hsv = [f32; 3];

/// RGB color representation (0-255 per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts HSV with a linear value channel to gamma-encoded sRGB. Hue wraps
    /// around and saturation is clamped to 0-1.
    pub fn from_hsv([h, s, v]: Hsv) -> Self {
        let sector = h.rem_euclid(1.0) * 6.0;
        let chroma = v * s.clamp(0.0, 1.0);
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r, g, b) = match sector as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = v - chroma;
        Self::new(encode_srgb(r + m), encode_srgb(g + m), encode_srgb(b + m))
    }
}

fn encode_srgb(linear: f32) -> u8 {
    let linear = linear.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

/// Hashes a string and produces a pleasing colour from that hash. `value` is picked
/// by the caller so the colour stays readable on either background.
pub fn string_to_hsv(s: &str, value: f32) -> Hsv {
    const DISTINCT_COLOURS: u64 = 36_000;

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    s.hash(&mut hasher);
    let hash = hasher.finish();
    let hue = (hash % DISTINCT_COLOURS) as f32 / DISTINCT_COLOURS as f32;

    [hue, 0.75, value]
}

macro_rules! palette_fields {
    ($(($field:ident, $light:expr, $dark:expr)),* $(,)?) => {
        /// Colours for every element of the interface.
        #[derive(Debug, Clone, PartialEq)]
        pub struct Palette {
            $(
                #[doc = concat!("HSV colour for ", stringify!($field))]
                pub $field: Hsv,
            )*
            /// Brightness used for colours derived from artist names.
            pub artist_value: f32,
        }
        impl Palette {
            pub fn light() -> Self {
                Self {
                    $($field: $light,)*
                    artist_value: 0.45,
                }
            }

            pub fn dark() -> Self {
                Self {
                    $($field: $dark,)*
                    artist_value: 0.85,
                }
            }
        }
    }
}

palette_fields![
    (background_hsv, [0.0, 0.0, 0.98], [0.65, 0.40, 0.06]),
    (text_hsv, [0.0, 0.0, 0.10], [0.0, 0.0, 0.92]),
    (muted_hsv, [0.0, 0.0, 0.45], [0.0, 0.0, 0.55]),
    (border_hsv, [0.0, 0.0, 0.70], [0.60, 0.20, 0.35]),
    (header_hsv, [0.58, 0.70, 0.45], [0.58, 0.60, 0.85]),
    (header_active_hsv, [0.08, 0.85, 0.80], [0.12, 0.80, 1.0]),
    (selection_hsv, [0.58, 0.15, 0.90], [0.62, 0.45, 0.25]),
    (accent_hsv, [0.55, 0.80, 0.65], [0.55, 0.70, 1.0]),
    (album_hsv, [0.58, 0.90, 0.50], [0.58, 0.60, 0.95]),
    (genre_hsv, [0.35, 0.60, 0.45], [0.35, 0.45, 0.80]),
    (year_hsv, [0.0, 0.0, 0.40], [0.0, 0.0, 0.60]),
    (error_hsv, [0.0, 0.80, 0.70], [0.0, 0.65, 1.0]),
];

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette::light(),
            Theme::Dark => Palette::dark(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_hsv_is_deterministic() {
        assert_eq!(string_to_hsv("Bowie", 0.5), string_to_hsv("Bowie", 0.5));
        assert_eq!(string_to_hsv("Bowie", 0.5)[2], 0.5);
    }

    #[test]
    fn test_from_hsv_primaries() {
        assert_eq!(Rgb::from_hsv([0.0, 0.0, 0.0]), Rgb::new(0, 0, 0));
        assert_eq!(Rgb::from_hsv([0.3, 0.0, 1.0]), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::from_hsv([0.0, 1.0, 1.0]), Rgb::new(255, 0, 0));
        assert_eq!(Rgb::from_hsv([0.5, 1.0, 1.0]), Rgb::new(0, 255, 255));
    }

    #[test]
    fn test_from_hsv_wraps_hue_and_clamps_saturation() {
        let cyan = Rgb::from_hsv([0.5, 1.0, 1.0]);
        assert_eq!(Rgb::from_hsv([1.5, 1.0, 1.0]), cyan);
        assert_eq!(Rgb::from_hsv([-0.5, 1.0, 1.0]), cyan);
        assert_eq!(Rgb::from_hsv([0.5, 3.0, 1.0]), cyan);
    }

    #[test]
    fn test_palettes_differ_in_background() {
        assert_ne!(
            Palette::for_theme(Theme::Light).background_hsv,
            Palette::for_theme(Theme::Dark).background_hsv
        );
    }
}
