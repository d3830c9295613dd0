use crate::camera::Viewport;
use glam::{Vec2, Vec3};

/// Parameters of the pointer repulsion applied to the ring field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepulsionParams {
    /// Particles further than this from the target are left alone.
    pub radius: f32,
    /// `K1`: distance scale at which influence starts to fall below 1.
    pub influence_scale: f32,
    /// `K2`: force magnitude at full influence.
    pub strength: f32,
}

/// Push a particle at `pos` away from `target`.
///
/// `influence = min(1, K1 / (dist + 1))` and the returned force has magnitude
/// `influence^2 * K2`, directed from the target to the particle. Outside
/// `params.radius`, when the particle sits exactly on the target, and when
/// the distance is not finite, the force is zero.
///
/// # Arguments
///
/// * `pos` - Current particle position in field space.
/// * `target` - Pointer target in field space.
/// * `params` - Radius and the two shaping constants.
#[inline]
pub fn compute_repulsion(pos: Vec3, target: Vec3, params: &RepulsionParams) -> Vec3 {
    let d = pos - target;
    let dist = d.length();
    // Exact coincidence has no direction to push along. A NaN distance fails
    // every comparison, so test for the valid range rather than against it.
    if !(dist.is_finite() && dist > 0.0 && dist <= params.radius) {
        return Vec3::ZERO;
    }
    let influence = (params.influence_scale / (dist + 1.0)).min(1.0);
    let magnitude = influence * influence * params.strength;
    d / dist * magnitude
}

/// Last known pointer position, in viewport pixels.
///
/// Written by pointer-move handlers and read once per frame to build the
/// target for that frame's tick.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PointerState {
    pub pixel: Vec2,
}

impl PointerState {
    /// Record a pointer move. Non-finite coordinates are dropped and the last
    /// good position is kept.
    pub fn moved(&mut self, x: f32, y: f32) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            return false;
        }
        self.pixel = Vec2::new(x, y);
        true
    }

    /// Pointer in normalized device coordinates: x right and y up, both in
    /// [-1, 1] across the viewport. A degenerate viewport maps to the centre.
    pub fn normalized(&self, viewport: Viewport) -> Vec2 {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            self.pixel.x / viewport.width * 2.0 - 1.0,
            -(self.pixel.y / viewport.height) * 2.0 + 1.0,
        )
    }

    /// Pointer target in field space on the z = 0 plane.
    pub fn target(&self, viewport: Viewport, scale: f32) -> Vec3 {
        (self.normalized(viewport) * scale).extend(0.0)
    }
}
