//! Global gamma and brightness correction applied after per-pen brightness.

/// 256-entry per-channel correction curve.
#[derive(Debug, Clone)]
pub struct Correction {
    gamma: f32,
    brightness: f32,
    table: [u8; 256],
}

impl Default for Correction {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Correction {
    /// Builds the curve `out = 255 * brightness * (in / 255) ^ (1 / gamma)`.
    ///
    /// Non-positive or non-finite parameters fall back to 1.0.
    pub fn new(gamma: f32, brightness: f32) -> Self {
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        let gamma = sanitize(gamma);
        let brightness = sanitize(brightness);

        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let linear = i as f32 / 255.0;
            let value = linear.powf(1.0 / gamma) * brightness * 255.0;
            *entry = value.round().clamp(0.0, 255.0) as u8;
        }
        Self {
            gamma,
            brightness,
            table,
        }
    }

    /// Gamma exponent.
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Brightness multiplier.
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Corrects one channel.
    #[inline]
    pub fn apply(&self, channel: u8) -> u8 {
        self.table[usize::from(channel)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        let c = Correction::default();
        for v in 0..=255u8 {
            assert_eq!(c.apply(v), v);
        }
    }

    #[test]
    fn brightness_scales_and_clamps() {
        let c = Correction::new(1.0, 0.5);
        assert_eq!(c.apply(200), 100);
        let c = Correction::new(1.0, 2.0);
        assert_eq!(c.apply(200), 255);
    }

    #[test]
    fn gamma_brightens_midtones() {
        let c = Correction::new(2.2, 1.0);
        assert!(c.apply(64) > 64);
        assert_eq!(c.apply(0), 0);
        assert_eq!(c.apply(255), 255);
    }

    #[test]
    fn invalid_parameters_fall_back() {
        let c = Correction::new(0.0, f32::NAN);
        assert_eq!(c.gamma(), 1.0);
        assert_eq!(c.brightness(), 1.0);
    }
}
