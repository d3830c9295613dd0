use glam::{Mat4, Vec3};

/// Host viewport size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// `None` for a collapsed viewport (minimised window, hidden canvas).
    pub fn aspect(&self) -> Option<f32> {
        if self.width > 0.0 && self.height > 0.0 {
            Some(self.width / self.height)
        } else {
            None
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the eye from the ring along +Z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 25.0,
        }
    }
}

/// Perspective camera looking at the ring centre.
///
/// Resizing only changes the aspect ratio; the ring itself is never
/// regenerated.
pub struct Camera {
    pub config: CameraConfig,
    aspect: f32,
}

impl Camera {
    pub fn new(config: CameraConfig, viewport: Viewport) -> Self {
        Self {
            config,
            aspect: viewport.aspect().unwrap_or(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Collapsed viewports keep the previous aspect.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if let Some(aspect) = viewport.aspect() {
            self.aspect = aspect;
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.config.distance)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.config.fov_y_degrees.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
