//! Taxon colour synthesis
//!
//! A colour is a pure function of (taxon identity, phylum):
//! - unclassified or unknown phylum → grey, luminance in [45, 80]
//! - otherwise hue within ±25° of the phylum's base hue, luminance in
//!   [40, 80], chroma in [35, 85], each driven by its own salted hash
//!
//! Nothing here depends on which other taxa are being coloured.

use super::hasher::{hash_unit, SALT_BASE, SALT_CHROMA, SALT_HUE, SALT_LUMINANCE};
use super::phylum_hues::PhylumHueTable;
use crate::models::{HclColor, HexColor, UNCLASSIFIED_PHYLUM};

const HUE_SPREAD: f64 = 50.0;
const GREY_LUMINANCE: (f64, f64) = (45.0, 35.0);
const LUMINANCE: (f64, f64) = (40.0, 40.0);
const CHROMA: (f64, f64) = (35.0, 50.0);

#[derive(Clone, Default)]
pub struct ColorSynthesizer {
    hues: PhylumHueTable,
}

impl ColorSynthesizer {
    pub fn new(hues: PhylumHueTable) -> Self {
        Self { hues }
    }

    /// HCL coordinates for a taxon; `identity` should already be the
    /// normalized, lower-cased name
    pub fn synthesize(&self, identity: &str, phylum: Option<&str>) -> HclColor {
        let phylum = match phylum {
            Some(p) if p != UNCLASSIFIED_PHYLUM => p,
            _ => {
                let luminance =
                    GREY_LUMINANCE.0 + hash_unit(identity, SALT_BASE) * GREY_LUMINANCE.1;
                return HclColor::new(0.0, 0.0, luminance);
            }
        };

        let base_hue = self.hues.base_hue(phylum);
        let hue_offset = (hash_unit(identity, SALT_HUE) - 0.5) * HUE_SPREAD;

        HclColor::new(
            (base_hue + hue_offset).rem_euclid(360.0),
            CHROMA.0 + hash_unit(identity, SALT_CHROMA) * CHROMA.1,
            LUMINANCE.0 + hash_unit(identity, SALT_LUMINANCE) * LUMINANCE.1,
        )
    }

    pub fn color_for(&self, identity: &str, phylum: Option<&str>) -> HexColor {
        self.synthesize(identity, phylum).to_hex()
    }
}
