use glam::Vec3;
use ringfield_core::camera::Viewport;
use ringfield_core::config::{particle_count, FieldConfig, DEFAULT_PARTICLE_COUNT};
use ringfield_core::field::{Field, FieldParams};
use ringfield_core::frame::FrameContext;
use ringfield_core::layout::{AngleDistribution, RingLayout};
use ringfield_core::palette::{Palette, Rgb, Theme};
use ringfield_core::FieldError;

fn far_away() -> FrameContext {
    FrameContext::with_target(Vec3::new(1000.0, 1000.0, 0.0))
}

fn max_offset(field: &Field) -> f32 {
    field
        .positions()
        .iter()
        .zip(field.origins())
        .map(|(p, o)| p.distance(*o))
        .fold(0.0, f32::max)
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn test_zero_count_rejected() {
    let result = Field::new(0, &RingLayout::default());
    assert!(matches!(result, Err(FieldError::InvalidArgument(_))));
}

#[test]
fn test_negative_count_rejected_at_boundary() {
    assert!(matches!(particle_count(-1), Err(FieldError::InvalidArgument(_))));
    assert!(matches!(particle_count(0), Err(FieldError::InvalidArgument(_))));
}

#[test]
fn test_inverted_radius_range_rejected() {
    let layout = RingLayout {
        r_min: 30.0,
        r_max: 15.0,
        ..RingLayout::default()
    };
    assert!(matches!(Field::new(10, &layout), Err(FieldError::InvalidArgument(_))));
}

#[test]
fn test_undamped_config_rejected() {
    let params = FieldParams {
        config: FieldConfig {
            damping: 1.0,
            ..FieldConfig::default()
        },
        ..FieldParams::default()
    };
    let result = Field::create(10, &RingLayout::default(), params);
    assert!(matches!(result, Err(FieldError::InvalidArgument(_))));
}

#[test]
fn test_default_field_within_radial_bounds() {
    let layout = RingLayout::default();
    let field = Field::new(DEFAULT_PARTICLE_COUNT, &layout).unwrap();

    assert_eq!(field.len(), 2000);
    assert_eq!(field.positions().len(), 2000);
    assert_eq!(field.velocities().len(), 2000);
    assert_eq!(field.colors().len(), 2000);

    for (i, origin) in field.origins().iter().enumerate() {
        let r = layout.radial_distance(*origin);
        assert!(
            r >= layout.r_min - 1e-3 && r <= layout.r_max + 1e-3,
            "particle {i} radius {r} outside [{}, {}]",
            layout.r_min,
            layout.r_max
        );
        assert!(origin.z.abs() <= layout.spread / 2.0 + 1e-5, "particle {i} depth {}", origin.z);
        assert_eq!(field.positions()[i], *origin, "particle {i} not created at rest");
        assert_eq!(field.velocities()[i], Vec3::ZERO);
    }

    for &size in field.sizes() {
        assert!((0.0..=0.15).contains(&size), "size {size} out of range");
    }
}

#[test]
fn test_even_angles_on_unit_ring() {
    let field = Field::new(4, &RingLayout::unit_ring()).unwrap();
    let expected = [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
    ];
    for (origin, want) in field.origins().iter().zip(expected) {
        assert!(origin.distance(want) < 1e-6, "{origin:?} != {want:?}");
    }
}

#[test]
fn test_same_seed_same_layout() {
    let params = || FieldParams {
        seed: 42,
        ..FieldParams::default()
    };
    let a = Field::create(100, &RingLayout::default(), params()).unwrap();
    let b = Field::create(100, &RingLayout::default(), params()).unwrap();
    let c = Field::create(
        100,
        &RingLayout::default(),
        FieldParams {
            seed: 43,
            ..FieldParams::default()
        },
    )
    .unwrap();

    assert_eq!(a.origins(), b.origins());
    assert_eq!(a.sizes(), b.sizes());
    assert_ne!(a.origins(), c.origins());
}

#[test]
fn test_random_angles_cover_the_ring() {
    let layout = RingLayout {
        angles: AngleDistribution::Random,
        ..RingLayout::default()
    };
    let field = Field::new(500, &layout).unwrap();
    let quadrants = field.origins().iter().fold([0usize; 4], |mut q, o| {
        let idx = match (o.x >= 0.0, o.y >= 0.0) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        };
        q[idx] += 1;
        q
    });
    for (i, n) in quadrants.iter().enumerate() {
        assert!(*n > 50, "quadrant {i} has only {n} particles");
    }
}

// ---------------------------------------------------------------------------
// Ticking
// ---------------------------------------------------------------------------

#[test]
fn test_unit_ring_settles_with_far_pointer() {
    let layout = RingLayout {
        r_min: 1.0,
        r_max: 1.0,
        ..RingLayout::default()
    };
    let params = FieldParams {
        config: FieldConfig {
            damping: 0.85,
            spring_strength: 0.02,
            ..FieldConfig::default()
        },
        ..FieldParams::default()
    };
    let mut field = Field::create(4, &layout, params).unwrap();

    let ctx = far_away();
    for _ in 0..500 {
        field.advance(&ctx);
    }

    for (i, (p, o)) in field.positions().iter().zip(field.origins()).enumerate() {
        assert!(p.distance(*o) < 1e-3, "particle {i} is {} from origin", p.distance(*o));
    }
    assert_eq!(field.ticks(), 500);
}

#[test]
fn test_far_pointer_converges_to_origin() {
    let mut field = Field::new(200, &RingLayout::default()).unwrap();

    // Pointer in the middle of the ring pushes everything outward.
    let centre = FrameContext::with_target(Vec3::ZERO);
    for _ in 0..30 {
        field.advance(&centre);
    }
    let displaced = max_offset(&field);
    assert!(displaced > 0.5, "pointer barely moved the ring: {displaced}");

    // Spring-only from here on: the peak offset shrinks window after window.
    let ctx = far_away();
    let mut previous = f32::INFINITY;
    for window in 0..4 {
        let mut peak = 0.0_f32;
        for _ in 0..40 {
            field.advance(&ctx);
            peak = peak.max(max_offset(&field));
        }
        assert!(peak < previous, "window {window}: peak {peak} >= {previous}");
        previous = peak;
    }

    for _ in 0..500 {
        field.advance(&ctx);
    }
    assert!(max_offset(&field) < 1e-3, "still {} from origin", max_offset(&field));
}

#[test]
fn test_at_rest_without_force_stays_put() {
    let mut field = Field::new(50, &RingLayout::default()).unwrap();
    let origins = field.origins().to_vec();

    let ctx = far_away();
    for _ in 0..1000 {
        field.advance(&ctx);
    }

    assert_eq!(field.positions(), origins.as_slice());
    assert!(field.velocities().iter().all(|v| *v == Vec3::ZERO));
}

#[test]
fn test_pointer_exactly_on_particle_stays_finite() {
    let mut field = Field::new(64, &RingLayout::default()).unwrap();
    let target = field.positions()[7];

    field.advance(&FrameContext::with_target(target));

    for (i, (p, v)) in field.positions().iter().zip(field.velocities()).enumerate() {
        assert!(p.is_finite(), "particle {i} position {p:?}");
        assert!(v.is_finite(), "particle {i} velocity {v:?}");
    }
    // No repulsion and no spring on the coincident particle.
    assert_eq!(field.velocities()[7], Vec3::ZERO);
    assert_eq!(field.positions()[7], target);
}

#[test]
fn test_non_finite_target_leaves_field_finite() {
    let mut field = Field::new(8, &RingLayout::unit_ring()).unwrap();
    field.advance(&FrameContext::with_target(Vec3::new(f32::NAN, 0.0, 0.0)));
    field.advance(&FrameContext::with_target(Vec3::splat(f32::INFINITY)));

    // No force acts, so the ring stays exactly on its origins.
    assert_eq!(field.positions(), field.origins());

    for _ in 0..100 {
        field.advance(&FrameContext::with_target(Vec3::ZERO));
    }
    for (p, v) in field.positions().iter().zip(field.velocities()) {
        assert!(p.is_finite() && v.is_finite(), "{p:?} {v:?}");
    }
}

#[test]
fn test_near_pointer_repels() {
    let mut field = Field::new(4, &RingLayout::unit_ring()).unwrap();
    // Slightly right of centre: the particle at (1, 0, 0) is closest and
    // must move further right.
    field.advance(&FrameContext::with_target(Vec3::new(0.5, 0.0, 0.0)));
    assert!(field.positions()[0].x > 1.0);
    assert!(field.positions()[2].x < -1.0);
}

#[test]
fn test_rotation_is_separate_from_particle_state() {
    let mut field = Field::new(20, &RingLayout::default()).unwrap();
    let origins = field.origins().to_vec();

    let ctx = far_away();
    for _ in 0..3 {
        field.advance(&ctx);
    }

    let speed = field.config().rotation_speed;
    assert!((field.rotation() - 3.0 * speed).abs() < 1e-6);
    assert_eq!(field.positions(), origins.as_slice());

    let rotated = field.model_matrix().transform_point3(Vec3::X);
    let angle = rotated.y.atan2(rotated.x);
    assert!((angle - 3.0 * speed).abs() < 1e-5);
}

#[test]
fn test_rotation_wraps() {
    let params = FieldParams {
        config: FieldConfig {
            rotation_speed: 1.0,
            ..FieldConfig::default()
        },
        ..FieldParams::default()
    };
    let mut field = Field::create(1, &RingLayout::default(), params).unwrap();
    for _ in 0..100 {
        field.advance(&far_away());
    }
    assert!(field.rotation() >= 0.0 && field.rotation() < std::f32::consts::TAU);
}

// ---------------------------------------------------------------------------
// Colours and theme
// ---------------------------------------------------------------------------

fn two_tone_params() -> FieldParams {
    FieldParams {
        palette: Palette {
            base: [Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 1.0, 0.0)],
            light: Rgb::new(0.9, 0.9, 0.95),
            dark: Rgb::from_hex("#1a2b3c").unwrap(),
        },
        ..FieldParams::default()
    }
}

#[test]
fn test_colours_survive_ticks() {
    let mut field = Field::create(64, &RingLayout::default(), two_tone_params()).unwrap();
    let before = field.colors().to_vec();

    let close = FrameContext::with_target(Vec3::new(10.0, 5.0, 0.0));
    for _ in 0..100 {
        field.advance(&close);
    }
    assert_eq!(field.colors(), before.as_slice());

    let palette = *field.palette();
    assert!(before.iter().all(|c| palette.base.contains(c)));
}

#[test]
fn test_dark_theme_overwrites_every_colour() {
    let mut field = Field::create(2, &RingLayout::default(), two_tone_params()).unwrap();
    field.advance(&far_away());

    field.on_theme_change(Theme::Dark);
    let dark = field.palette().dark;
    for c in field.colors() {
        assert_eq!(c.r.to_bits(), dark.r.to_bits());
        assert_eq!(c.g.to_bits(), dark.g.to_bits());
        assert_eq!(c.b.to_bits(), dark.b.to_bits());
    }

    field.on_theme_change(Theme::Light);
    let light = field.palette().light;
    assert!(field.colors().iter().all(|c| *c == light));
}

// ---------------------------------------------------------------------------
// Resize and render view
// ---------------------------------------------------------------------------

#[test]
fn test_resize_keeps_origins() {
    let mut field = Field::new(100, &RingLayout::default()).unwrap();
    let origins = field.origins().to_vec();

    field.on_resize(Viewport::new(400.0, 800.0));

    assert_eq!(field.origins(), origins.as_slice());
    assert!((field.camera().aspect() - 0.5).abs() < 1e-6);
}

#[test]
fn test_render_frame_matches_buffers() {
    let mut field = Field::new(32, &RingLayout::default()).unwrap();
    field.advance(&far_away());

    let frame = field.render_frame();
    assert_eq!(frame.positions.len(), 32);
    assert_eq!(frame.colors.len(), 32);
    assert_eq!(frame.sizes.len(), 32);
    assert_eq!(frame.frame, 1);
    assert_eq!(frame.timestamp_ms, 0.0);
    assert_eq!(frame.model, field.model_matrix());

    field.advance(&FrameContext {
        timestamp_ms: 48.5,
        ..far_away()
    });
    let frame = field.render_frame();
    assert_eq!(frame.frame, 2);
    assert_eq!(frame.timestamp_ms, 48.5);
}
