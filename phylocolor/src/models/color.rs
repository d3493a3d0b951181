//! HCL colour values and their sRGB hex encoding
//!
//! HCL here is polar CIE-LUV under a D65 white point, the same model used
//! by common plotting toolkits, so hues are perceptually evenly spaced.

use std::fmt;

// D65 reference white
const WHITE_X: f64 = 95.047;
const WHITE_Y: f64 = 100.000;
const WHITE_Z: f64 = 108.883;

/// A colour in polar LUV coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HclColor {
    /// Hue angle in degrees, [0, 360)
    pub hue: f64,
    /// Chroma (0 = grey)
    pub chroma: f64,
    /// Luminance, [0, 100]
    pub luminance: f64,
}

impl HclColor {
    pub fn new(hue: f64, chroma: f64, luminance: f64) -> Self {
        Self {
            hue,
            chroma,
            luminance,
        }
    }

    /// Convert to sRGB, clamping out-of-gamut channels into [0, 1]
    pub fn to_srgb(self) -> [f64; 3] {
        let l = self.luminance;
        if l <= 0.0 {
            return [0.0, 0.0, 0.0];
        }

        let h = self.hue.to_radians();
        let u_star = self.chroma * h.cos();
        let v_star = self.chroma * h.sin();

        let y = WHITE_Y
            * if l > 7.999592 {
                ((l + 16.0) / 116.0).powi(3)
            } else {
                l / 903.3
            };

        // Achromatic: keep the three channels identical
        if self.chroma == 0.0 {
            let grey = encode_srgb(y / WHITE_Y);
            return [grey, grey, grey];
        }

        let t = WHITE_X + WHITE_Y + WHITE_Z;
        let xn = WHITE_X / t;
        let yn = WHITE_Y / t;
        let un = 2.0 * xn / (6.0 * yn - xn + 1.5);
        let vn = 4.5 * yn / (6.0 * yn - xn + 1.5);

        let u = u_star / (13.0 * l) + un;
        let v = v_star / (13.0 * l) + vn;
        let x = 9.0 * y * u / (4.0 * v);
        let z = -x / 3.0 - 5.0 * y + 3.0 * y / v;

        let r = 3.240479 * x - 1.537150 * y - 0.498535 * z;
        let g = -0.969256 * x + 1.875992 * y + 0.041556 * z;
        let b = 0.055648 * x - 0.204043 * y + 1.057311 * z;

        [
            encode_srgb(r / WHITE_Y),
            encode_srgb(g / WHITE_Y),
            encode_srgb(b / WHITE_Y),
        ]
    }

    pub fn to_hex(self) -> HexColor {
        let [r, g, b] = self.to_srgb();
        HexColor::from_rgb(scale_channel(r), scale_channel(g), scale_channel(b))
    }
}

// linear light -> sRGB (IEC 61966-2-1), then clamp
fn encode_srgb(linear: f64) -> f64 {
    let encoded = if linear > 0.00304 {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * linear
    };
    encoded.clamp(0.0, 1.0)
}

fn scale_channel(value: f64) -> u8 {
    (255.0 * value + 0.5).floor() as u8
}

/// `#RRGGBB` colour string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HexColor(String);

impl HexColor {
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(format!("#{:02X}{:02X}{:02X}", r, g, b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Channels back out of the hex string
    pub fn rgb(&self) -> [u8; 3] {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        [channel(1), channel(3), channel(5)]
    }

    /// True when all three channels are equal
    pub fn is_grey(&self) -> bool {
        let [r, g, b] = self.rgb();
        r == g && g == b
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.0
    }
}

impl serde::Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
