use crate::error::{FieldError, Result};
use std::num::NonZeroUsize;

/// Particle count used by the site background.
pub const DEFAULT_PARTICLE_COUNT: usize = 2000;

/// Simulation constants for the ring field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    /// Beyond this distance from the pointer target a particle feels no repulsion.
    pub interaction_radius: f32,
    /// `K1` in `influence = min(1, K1 / (dist + 1))`.
    pub influence_scale: f32,
    /// `K2` in `force = influence^2 * K2`.
    pub repulsion_strength: f32,
    /// Fraction of the offset from origin turned into velocity each tick.
    pub spring_strength: f32,
    /// Velocity multiplier per tick, strictly inside (0, 1).
    pub damping: f32,
    /// Z rotation added to the whole ring each tick, in radians.
    pub rotation_speed: f32,
    /// Normalized pointer coordinates are multiplied by this to land in field space.
    pub pointer_scale: f32,
    /// Upper bound (exclusive) of the random per-particle point size.
    pub max_point_size: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            interaction_radius: 60.0,
            influence_scale: 20.0,
            repulsion_strength: 0.15,
            spring_strength: 0.02,
            damping: 0.85,
            rotation_speed: 0.005,
            pointer_scale: 15.0,
            max_point_size: 0.15,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("interaction_radius", self.interaction_radius),
            ("influence_scale", self.influence_scale),
            ("repulsion_strength", self.repulsion_strength),
            ("spring_strength", self.spring_strength),
            ("damping", self.damping),
            ("rotation_speed", self.rotation_speed),
            ("pointer_scale", self.pointer_scale),
            ("max_point_size", self.max_point_size),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(FieldError::invalid(format!("{name} must be finite, got {value}")));
            }
        }
        // Damping of 1 or more lets the spring pump energy forever.
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(FieldError::invalid(format!(
                "damping must lie strictly between 0 and 1, got {}",
                self.damping
            )));
        }
        if self.interaction_radius <= 0.0 {
            return Err(FieldError::invalid("interaction_radius must be positive"));
        }
        if self.spring_strength < 0.0 || self.repulsion_strength < 0.0 || self.influence_scale < 0.0 {
            return Err(FieldError::invalid("force constants must be non-negative"));
        }
        if self.max_point_size < 0.0 {
            return Err(FieldError::invalid("max_point_size must be non-negative"));
        }
        Ok(())
    }
}

/// Check a host-supplied particle count.
///
/// Hosts speak in signed integers; zero and negatives are rejected here so the
/// rest of the crate can rely on `NonZeroUsize`.
pub fn particle_count(raw: i64) -> Result<NonZeroUsize> {
    usize::try_from(raw)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| FieldError::invalid(format!("particle count must be positive, got {raw}")))
}
