use crate::camera::{Camera, CameraConfig, Viewport};
use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::forces::pointer::{compute_repulsion, RepulsionParams};
use crate::forces::spring::{compute_spring, integrate};
use crate::frame::{FrameContext, RenderFrame};
use crate::layout::RingLayout;
use crate::palette::{Palette, Rgb, Theme};
use crate::particle::ParticleSet;
use glam::{Mat4, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

/// Everything besides count and layout needed to build a field.
pub struct FieldParams {
    pub config: FieldConfig,
    pub palette: Palette,
    pub camera: CameraConfig,
    pub viewport: Viewport,
    /// Seed for angles, radii, depths, base colours and point sizes.
    pub seed: u64,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            config: FieldConfig::default(),
            palette: Palette::default(),
            camera: CameraConfig::default(),
            viewport: Viewport::default(),
            seed: 0x5EED,
        }
    }
}

/// The ring of particles behind the hero section.
///
/// Every tick each particle is pushed away from the pointer target and pulled
/// back toward its origin; there is no coupling between particles. The ring
/// as a whole also turns slowly about Z, which only affects the model matrix
/// given to the renderer.
pub struct Field {
    particles: ParticleSet,
    config: FieldConfig,
    palette: Palette,
    camera: Camera,
    rotation: f32,
    ticks: u64,
    last_timestamp_ms: f64,
}

impl Field {
    /// Build a field of `count` particles laid out on `layout`.
    ///
    /// Nothing is allocated unless every argument is valid.
    pub fn create(count: usize, layout: &RingLayout, params: FieldParams) -> Result<Self> {
        if count == 0 {
            return Err(FieldError::invalid("particle count must be positive, got 0"));
        }
        layout.validate()?;
        params.config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut particles = ParticleSet::from_origins(layout.generate(count, &mut rng));
        for i in 0..count {
            particles.color[i] = params.palette.pick(&mut rng);
            particles.size[i] = rng.gen::<f32>() * params.config.max_point_size;
        }

        log::debug!(
            "ring field created: {} particles, r in [{}, {}], seed {:#x}",
            count,
            layout.r_min,
            layout.r_max,
            params.seed
        );

        Ok(Self {
            particles,
            config: params.config,
            palette: params.palette,
            camera: Camera::new(params.camera, params.viewport),
            rotation: 0.0,
            ticks: 0,
            last_timestamp_ms: 0.0,
        })
    }

    /// [`Field::create`] with default constants, palette and camera.
    pub fn new(count: usize, layout: &RingLayout) -> Result<Self> {
        Self::create(count, layout, FieldParams::default())
    }

    /// Advance every particle by one fixed step toward `ctx.pointer_target`.
    pub fn advance(&mut self, ctx: &FrameContext) {
        let repulsion = RepulsionParams {
            radius: self.config.interaction_radius,
            influence_scale: self.config.influence_scale,
            strength: self.config.repulsion_strength,
        };
        let target = ctx.pointer_target;
        let spring_strength = self.config.spring_strength;
        let damping = self.config.damping;

        let step = |((pos, vel), origin): ((&mut Vec3, &mut Vec3), &Vec3)| {
            let force = compute_repulsion(*pos, target, &repulsion);
            let spring = compute_spring(*pos, *origin, spring_strength);
            (*pos, *vel) = integrate(*pos, *vel, force, spring, damping);
        };

        let particles = &mut self.particles;

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            particles
                .position
                .par_iter_mut()
                .zip(particles.velocity.par_iter_mut())
                .zip(particles.origin.par_iter())
                .for_each(step);
        }

        #[cfg(not(feature = "parallel"))]
        particles
            .position
            .iter_mut()
            .zip(particles.velocity.iter_mut())
            .zip(particles.origin.iter())
            .for_each(step);

        self.rotation = (self.rotation + self.config.rotation_speed).rem_euclid(TAU);
        self.ticks += 1;
        self.last_timestamp_ms = ctx.timestamp_ms;
    }

    /// Recompute the projection for a new viewport.
    ///
    /// Origins stay where they were generated; the ring does not rescale with
    /// the window.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.camera.set_viewport(viewport);
    }

    /// Overwrite every particle's colour with the palette constant for `theme`.
    pub fn on_theme_change(&mut self, theme: Theme) {
        let color = self.palette.for_theme(theme);
        self.particles.color.fill(color);
    }

    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            positions: self.positions(),
            colors: self.colors(),
            sizes: self.sizes(),
            rotation: self.rotation,
            model: self.model_matrix(),
            view_projection: self.camera.view_projection(),
            frame: self.ticks,
            timestamp_ms: self.last_timestamp_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.count
    }

    pub fn is_empty(&self) -> bool {
        self.particles.count == 0
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.particles.position
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.particles.velocity
    }

    pub fn origins(&self) -> &[Vec3] {
        &self.particles.origin
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.particles.color
    }

    pub fn sizes(&self) -> &[f32] {
        &self.particles.size
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Current whole-ring rotation about Z, in [0, 2π).
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_z(self.rotation)
    }

    /// Ticks applied since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
