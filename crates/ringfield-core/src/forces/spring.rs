use glam::Vec3;

/// Hooke spring pulling `pos` back toward `origin`.
#[inline]
pub fn compute_spring(pos: Vec3, origin: Vec3, strength: f32) -> Vec3 {
    (origin - pos) * strength
}

/// One semi-implicit Euler step of the damped spring/repulsion system.
///
/// The velocity is updated from forces evaluated at the current position and
/// the position then moves by the new velocity. Returns `(position, velocity)`.
#[inline]
pub fn integrate(pos: Vec3, vel: Vec3, force: Vec3, spring: Vec3, damping: f32) -> (Vec3, Vec3) {
    let vel = (vel + force + spring) * damping;
    (pos + vel, vel)
}
