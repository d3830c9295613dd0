use crate::error::{FieldError, Result};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// How particle angles are spread around the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AngleDistribution {
    /// Uniformly random in [0, 2π).
    #[default]
    Random,
    /// `i / count * 2π`.
    Even,
}

/// Parameters of the (possibly elliptical) ring the field is laid out on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingLayout {
    pub r_min: f32,
    pub r_max: f32,
    /// Total depth of the slab; z is drawn from [-spread/2, spread/2].
    pub spread: f32,
    /// Vertical squash of the ring. 1.0 is a circle.
    pub y_scale: f32,
    pub angles: AngleDistribution,
}

impl Default for RingLayout {
    fn default() -> Self {
        Self {
            r_min: 15.0,
            r_max: 30.0,
            spread: 12.0,
            y_scale: 0.8,
            angles: AngleDistribution::Random,
        }
    }
}

impl RingLayout {
    /// Unit circle in the z = 0 plane.
    pub fn unit_ring() -> Self {
        Self {
            r_min: 1.0,
            r_max: 1.0,
            spread: 0.0,
            y_scale: 1.0,
            angles: AngleDistribution::Even,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("r_min", self.r_min),
            ("r_max", self.r_max),
            ("spread", self.spread),
            ("y_scale", self.y_scale),
        ] {
            if !value.is_finite() {
                return Err(FieldError::invalid(format!("{name} must be finite, got {value}")));
            }
        }
        if self.r_min < 0.0 {
            return Err(FieldError::invalid(format!("r_min must be non-negative, got {}", self.r_min)));
        }
        if self.r_min > self.r_max {
            return Err(FieldError::invalid(format!(
                "r_min ({}) exceeds r_max ({})",
                self.r_min, self.r_max
            )));
        }
        if self.spread < 0.0 {
            return Err(FieldError::invalid("spread must be non-negative"));
        }
        if self.y_scale <= 0.0 {
            return Err(FieldError::invalid("y_scale must be positive"));
        }
        Ok(())
    }

    /// Generate `count` origins. The layout must already be validated.
    pub fn generate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Vec3> {
        (0..count)
            .map(|i| {
                let angle = match self.angles {
                    AngleDistribution::Random => rng.gen::<f32>() * TAU,
                    AngleDistribution::Even => i as f32 / count as f32 * TAU,
                };
                let radius = self.r_min + rng.gen::<f32>() * (self.r_max - self.r_min);
                let z = (rng.gen::<f32>() - 0.5) * self.spread;
                Vec3::new(angle.cos() * radius, angle.sin() * radius * self.y_scale, z)
            })
            .collect()
    }

    /// Ring radius a point was generated with, undoing the vertical squash
    /// and ignoring depth.
    pub fn radial_distance(&self, p: Vec3) -> f32 {
        let y = p.y / self.y_scale;
        (p.x * p.x + y * y).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let ok = RingLayout::default();
        assert!(ok.validate().is_ok());
        assert!(RingLayout { r_min: -1.0, ..ok }.validate().is_err());
        assert!(RingLayout { r_max: f32::INFINITY, ..ok }.validate().is_err());
        assert!(RingLayout { spread: -2.0, ..ok }.validate().is_err());
        assert!(RingLayout { y_scale: 0.0, ..ok }.validate().is_err());
        // A degenerate range is a circle, not an error.
        assert!(RingLayout { r_min: 5.0, r_max: 5.0, ..ok }.validate().is_ok());
    }

    #[test]
    fn test_radial_distance_undoes_squash() {
        let layout = RingLayout::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for p in layout.generate(100, &mut rng) {
            let r = layout.radial_distance(p);
            assert!(r >= 15.0 - 1e-3 && r <= 30.0 + 1e-3, "r = {r}");
        }
    }
}
