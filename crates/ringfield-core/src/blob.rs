use crate::camera::Viewport;
use crate::error::{FieldError, Result};
use glam::Vec2;
use std::f32::consts::TAU;

/// Constants for the liquid blob.
///
/// Very low elasticity and friction give long, slow oscillations after the
/// pointer passes through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlobConfig {
    pub point_count: usize,
    /// Rest radius in pixels.
    pub base_radius: f32,
    /// Spring constant pulling each point back to the circle.
    pub elasticity: f32,
    /// Fraction of velocity lost per update, in [0, 1).
    pub friction: f32,
    /// The pointer counts as hovering within `base_radius + hover_margin` of the centre.
    pub hover_margin: f32,
    /// Points further than this from the pointer ignore it.
    pub influence_radius: f32,
    /// Pointer speed multiplier applied per update, in [0, 1).
    pub pointer_velocity_decay: f32,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            point_count: 32,
            base_radius: 300.0,
            elasticity: 0.001,
            friction: 0.0085,
            hover_margin: 100.0,
            influence_radius: 250.0,
            pointer_velocity_decay: 0.8,
        }
    }
}

impl BlobConfig {
    pub fn validate(&self) -> Result<()> {
        if self.point_count < 3 {
            return Err(FieldError::invalid(format!(
                "blob needs at least 3 points, got {}",
                self.point_count
            )));
        }
        if !(self.base_radius.is_finite() && self.base_radius > 0.0) {
            return Err(FieldError::invalid("base_radius must be positive"));
        }
        if !(self.friction >= 0.0 && self.friction < 1.0) {
            return Err(FieldError::invalid(format!(
                "friction must lie in [0, 1), got {}",
                self.friction
            )));
        }
        if !(self.influence_radius.is_finite() && self.influence_radius > 0.0) {
            return Err(FieldError::invalid("influence_radius must be positive"));
        }
        if !(self.pointer_velocity_decay >= 0.0 && self.pointer_velocity_decay < 1.0) {
            return Err(FieldError::invalid(format!(
                "pointer_velocity_decay must lie in [0, 1), got {}",
                self.pointer_velocity_decay
            )));
        }
        if !self.elasticity.is_finite() || !self.hover_margin.is_finite() {
            return Err(FieldError::invalid("blob constants must be finite"));
        }
        Ok(())
    }
}

/// One quadratic Bézier segment of the blob outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadSegment {
    pub control: Vec2,
    pub end: Vec2,
}

/// A closed ring of points in screen space that wobbles toward a moving pointer.
pub struct Blob {
    config: BlobConfig,
    center: Vec2,
    origin: Vec<Vec2>,
    position: Vec<Vec2>,
    velocity: Vec<Vec2>,
    pointer: Vec2,
    pointer_velocity: Vec2,
}

impl Blob {
    /// Points start at rest on a circle around the viewport centre, with the
    /// pointer parked on the centre.
    pub fn new(config: BlobConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;
        let center = viewport.center();
        let origin = circle(center, config.base_radius, config.point_count);
        Ok(Self {
            config,
            center,
            position: origin.clone(),
            velocity: vec![Vec2::ZERO; origin.len()],
            origin,
            pointer: center,
            pointer_velocity: Vec2::ZERO,
        })
    }

    /// Non-finite coordinates are ignored.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let next = Vec2::new(x, y);
        self.pointer_velocity = next - self.pointer;
        self.pointer = next;
    }

    /// Recentre the rest circle on the new viewport. Current positions are
    /// left alone and spring over on their own.
    pub fn resize(&mut self, viewport: Viewport) {
        self.center = viewport.center();
        self.origin = circle(self.center, self.config.base_radius, self.config.point_count);
    }

    pub fn is_hovered(&self) -> bool {
        self.pointer.distance(self.center) < self.config.base_radius + self.config.hover_margin
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        let hovering = self.is_hovered();
        let pointer_speed = self.pointer_velocity.length();
        let cfg = self.config;

        for ((pos, vel), origin) in self
            .position
            .iter_mut()
            .zip(self.velocity.iter_mut())
            .zip(self.origin.iter())
        {
            let mut acc = (*origin - *pos) * cfg.elasticity;

            if hovering {
                let to_pointer = self.pointer - *pos;
                let dist = to_pointer.length();
                if dist > 0.0 && dist < cfg.influence_radius {
                    let influence = 1.0 - dist / cfg.influence_radius;
                    let magnitude = influence * pointer_speed * 0.5;
                    acc += to_pointer / dist * magnitude * 0.01;
                }
            }

            *vel += acc;
            *vel *= 1.0 - cfg.friction;
            *pos += *vel;
        }

        self.pointer_velocity *= cfg.pointer_velocity_decay;
    }

    /// Closed outline through the midpoints of neighbouring points.
    ///
    /// The path starts at [`Blob::outline_start`]; each segment uses a point
    /// as control and ends halfway to the next one.
    pub fn outline(&self) -> Vec<QuadSegment> {
        let n = self.position.len();
        (0..n)
            .map(|i| {
                let current = self.position[i];
                let next = self.position[(i + 1) % n];
                QuadSegment {
                    control: current,
                    end: (current + next) * 0.5,
                }
            })
            .collect()
    }

    pub fn outline_start(&self) -> Vec2 {
        let n = self.position.len();
        (self.position[n - 1] + self.position[0]) * 0.5
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.position
    }

    pub fn origins(&self) -> &[Vec2] {
        &self.origin
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocity
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn pointer_velocity(&self) -> Vec2 {
        self.pointer_velocity
    }

    pub fn config(&self) -> &BlobConfig {
        &self.config
    }
}

fn circle(center: Vec2, radius: f32, count: usize) -> Vec<Vec2> {
    let slice = TAU / count as f32;
    (0..count)
        .map(|i| {
            let angle = slice * i as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}
