use glam::Vec2;
use gradientfield_core::{FieldConfig, ParticleField, ParticleKind, PathShape, Viewport};
use gradientfield_core::{PointerState, FRAME_TIME};

fn seeded(count: usize, radius: f32, spring_rate: f32) -> ParticleField {
    let config = FieldConfig {
        particle_count: count,
        interaction_radius: radius,
        spring_rate,
        seed: Some(42),
        ..FieldConfig::default()
    };
    ParticleField::new(config, &PathShape::zigzag()).unwrap()
}

#[test]
fn held_pointer_only_disturbs_path_particles_inside_the_radius() {
    let mut touched = seeded(100, 0.4, 0.08);
    let mut control = seeded(100, 0.4, 0.08);

    let viewport = Viewport::new(800.0, 800.0, touched.config());
    let pointer = viewport.pointer_to_field(&PointerState {
        position: Vec2::new(0.5, 0.5),
        active: true,
    });
    for _ in 0..60 {
        touched.step(pointer);
        control.step(None);
    }
    assert!((touched.time() - 60.0 * FRAME_TIME).abs() < 1e-4);

    let center = pointer.unwrap();
    let mut disturbed = 0;
    for (p, rest) in touched.particles().iter().zip(control.particles()) {
        let distance = (p.origin - center).length();
        let shift = (p.position - rest.position).length();
        match p.kind {
            ParticleKind::Path { .. } if distance < 0.38 => {
                assert!(shift > 1e-4, "particle at {distance} did not move");
                assert!(
                    (p.position - center).length() > (rest.position - center).length(),
                    "pushed away from the pointer"
                );
                disturbed += 1;
            }
            ParticleKind::Path { .. } if distance < 0.4 => {}
            _ => assert_eq!(p.position, rest.position),
        }
    }
    assert!(disturbed > 0, "the zigzag crosses the center");
}

#[test]
fn steady_state_displacement_shrinks_with_distance() {
    let mut displacements = Vec::new();
    for gap in [0.05, 0.1, 0.2, 0.3] {
        let mut touched = seeded(40, 0.4, 0.08);
        let mut control = seeded(40, 0.4, 0.08);
        let origin = touched.particles()[10].origin;
        let pointer = Some(origin + Vec2::new(gap, 0.0));
        for _ in 0..400 {
            touched.step(pointer);
            control.step(None);
        }
        let shift = (touched.particles()[10].position - control.particles()[10].position).length();
        displacements.push(shift);
    }
    assert!(
        displacements.windows(2).all(|w| w[0] > w[1]),
        "{displacements:?}"
    );
}

#[test]
fn released_particles_ring_down_toward_their_targets() {
    let mut field = seeded(200, 0.5, 0.08);
    for _ in 0..120 {
        field.step(Some(Vec2::ZERO));
    }

    const WINDOW: usize = 25;
    let path_count = field.config().path_particle_count();
    let mut previous = vec![f32::INFINITY; path_count];
    for _ in 0..4 {
        let mut peaks = vec![0.0f32; path_count];
        for _ in 0..WINDOW {
            field.step(None);
            for (i, p) in field.particles()[..path_count].iter().enumerate() {
                let error = (p.position - field.target(p, None)).length();
                peaks[i] = peaks[i].max(error);
            }
        }
        for (peak, prev) in peaks.iter().zip(&previous) {
            assert!(*peak <= *prev + 5e-4, "{peak} > {prev}");
        }
        previous = peaks;
    }
}
