use crate::palette::Rgb;
use glam::Vec3;

/// SoA particle storage for the ring field.
///
/// All buffers have length `count` for the lifetime of the set.
pub struct ParticleSet {
    pub count: usize,
    /// Rest position the spring pulls toward. Fixed after creation.
    pub origin: Vec<Vec3>,
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    pub color: Vec<Rgb>,
    /// Point size handed to the renderer; not used by the physics.
    pub size: Vec<f32>,
}

impl ParticleSet {
    /// Place every particle at rest on its origin.
    pub fn from_origins(origins: Vec<Vec3>) -> Self {
        let count = origins.len();
        Self {
            count,
            position: origins.clone(),
            origin: origins,
            velocity: vec![Vec3::ZERO; count],
            color: vec![Rgb::default(); count],
            size: vec![0.0; count],
        }
    }
}
