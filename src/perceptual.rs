/// Perceptual color representation.
///
/// Gamma-corrected and alpha-premultiplied, so that distance math weighs
/// translucent colors by what they actually contribute on screen.
/// All components are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptualColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Conventional source gamma for 8-bit image data (1/2.2).
pub const DEFAULT_GAMMA: f64 = 0.45455;

impl PerceptualColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Squared difference over the premultiplied channels, with the alpha
    /// term weighted 3x. Symmetric, non-negative, zero only for identical
    /// colors; an alpha mismatch dominates an equal-sized channel mismatch.
    pub fn distance(self, other: Self) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        let da = self.a - other.a;
        da * da * 3.0 + dr * dr + dg * dg + db * db
    }
}

/// Convert an 8-bit RGBA pixel to a perceptual color.
///
/// Each channel is linearized as `(c/255)^(1/gamma)` and premultiplied by
/// alpha. Deterministic and pure: equal pixels convert to equal colors.
pub fn to_perceptual(gamma: f64, px: rgb::RGBA<u8>) -> PerceptualColor {
    let inv_gamma = 1.0 / gamma;
    let a = f64::from(px.a) / 255.0;
    let r = (f64::from(px.r) / 255.0).powf(inv_gamma) * a;
    let g = (f64::from(px.g) / 255.0).powf(inv_gamma) * a;
    let b = (f64::from(px.b) / 255.0).powf(inv_gamma) * a;

    PerceptualColor {
        r: r as f32,
        g: g as f32,
        b: b as f32,
        a: a as f32,
    }
}
