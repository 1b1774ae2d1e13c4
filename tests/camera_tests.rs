use std::cell::RefCell;

use glam::{Mat4, Vec3};
use inertial_camera::camera::{compose_view_matrix, Camera, CAMERA_UNIFORM_NAME};
use inertial_camera::config::CameraConfig;
use inertial_camera::core::{DetachedUniforms, InputSnapshot, UniformBinder, UniformSlot};

/// Mock binder that records every upload
struct RecordingBinder {
    known: Vec<&'static str>,
    uploads: RefCell<Vec<(Option<usize>, Mat4)>>,
}

impl RecordingBinder {
    fn new(known: &[&'static str]) -> Self {
        Self {
            known: known.to_vec(),
            uploads: RefCell::new(Vec::new()),
        }
    }
}

impl UniformBinder for RecordingBinder {
    type Handle = Option<usize>;

    fn resolve_uniform(&self, name: &str) -> Option<usize> {
        self.known.iter().position(|&n| n == name)
    }

    fn upload_matrix(&self, handle: Option<usize>, matrix: &Mat4) {
        self.uploads.borrow_mut().push((handle, *matrix));
    }
}

fn camera() -> Camera<UniformSlot> {
    Camera::initialize(&DetachedUniforms, &CameraConfig::default())
}

fn forward() -> InputSnapshot {
    InputSnapshot {
        move_up: true,
        ..Default::default()
    }
}

/// Frames of pure decay needed to bring a full cap back to zero
fn glide_frames(celerity: f64, decay: f64) -> usize {
    (celerity / decay.abs()).ceil() as usize + 1
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_initialize_resolves_camera_uniform() {
        let binder = RecordingBinder::new(&["projection_uniform", CAMERA_UNIFORM_NAME]);
        let cam = Camera::initialize(&binder, &CameraConfig::default());
        assert_eq!(cam.uniform(), Some(1));
    }

    #[test]
    fn test_bind_uploads_current_view() {
        let binder = RecordingBinder::new(&[CAMERA_UNIFORM_NAME]);
        let mut cam = Camera::initialize(&binder, &CameraConfig::default());

        cam.update(&forward());
        cam.bind(&binder);

        let uploads = binder.uploads.borrow();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0], (Some(0), cam.view_matrix()));
    }

    #[test]
    fn test_bind_with_missing_uniform_does_not_fail() {
        let binder = RecordingBinder::new(&[]);
        let cam = Camera::initialize(&binder, &CameraConfig::default());
        cam.bind(&binder);

        assert_eq!(cam.uniform(), None);
        assert_eq!(binder.uploads.borrow()[0].0, None);
    }

    #[test]
    fn test_initialize_uses_configured_defaults() {
        let config = CameraConfig {
            default_eye: [1.0, 2.0, 3.0],
            default_target: [0.1, 0.2, 0.3],
            ..Default::default()
        };
        let cam = Camera::initialize(&DetachedUniforms, &config);
        assert_eq!(cam.eye(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.target(), Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_reset_restores_defaults_and_keeps_inertia() {
        let mut cam = camera();
        let eye = cam.eye();
        let target = cam.target();

        for _ in 0..3 {
            cam.update(&InputSnapshot {
                move_up: true,
                move_left: true,
                look_delta_x: 0.3,
                look_delta_y: -0.2,
                ..Default::default()
            });
        }
        let drag = cam.drag_inertia();
        let turn = cam.turn_inertia();
        assert_ne!(cam.eye(), eye);

        cam.reset();

        assert_eq!(cam.eye(), eye);
        assert_eq!(cam.target(), target);
        assert_eq!(cam.drag_inertia(), drag);
        assert_eq!(cam.turn_inertia(), turn);
    }
}

#[cfg(test)]
mod inertia_behavior_tests {
    use super::*;

    #[test]
    fn test_clamp_invariant_over_mixed_input() {
        let mut cam = camera();
        let tuning = *cam.tuning();

        // Deterministic key pattern cycling through every combination
        for frame in 0u32..400 {
            let bits = frame.wrapping_mul(2654435761) >> 27;
            let input = InputSnapshot {
                move_up: bits & 1 != 0,
                move_down: bits & 2 != 0,
                move_left: bits & 4 != 0,
                move_right: bits & 8 != 0,
                move_turbo: bits & 16 != 0,
                ..Default::default()
            };
            let motion = cam.update(&input);

            if input.move_up || input.move_down {
                assert!(motion.drag.abs() <= motion.celerity, "frame {frame}: {motion:?}");
            }
            if input.move_left || input.move_right {
                assert!(motion.turn.abs() <= motion.celerity, "frame {frame}: {motion:?}");
            }
            assert!(cam.drag_inertia().abs() <= tuning.turbo_celerity);
            assert!(cam.turn_inertia().abs() <= tuning.turbo_celerity);
        }
    }

    #[test]
    fn test_holding_key_saturates_monotonically() {
        let mut cam = camera();
        let celerity = cam.tuning().cruise_celerity;
        let mut previous = 0.0;

        for _ in 0..50 {
            let motion = cam.update(&forward());
            assert!(motion.drag >= previous, "{} < {}", motion.drag, previous);
            assert!(motion.drag <= celerity);
            previous = motion.drag;
        }

        assert_eq!(previous, celerity);
    }

    #[test]
    fn test_holding_backward_saturates_negative() {
        let mut cam = camera();
        let celerity = cam.tuning().cruise_celerity;
        let input = InputSnapshot {
            move_down: true,
            ..Default::default()
        };

        let mut last = 0.0;
        for _ in 0..50 {
            last = cam.update(&input).drag;
        }
        assert_eq!(last, -celerity);
    }

    #[test]
    fn test_release_decays_to_zero() {
        let mut cam = camera();
        for _ in 0..50 {
            cam.update(&forward());
        }

        let tuning = *cam.tuning();
        let mut previous = cam.drag_inertia();
        assert!(previous > 0.0);

        for _ in 0..glide_frames(tuning.cruise_celerity, tuning.consume_forward) {
            let motion = cam.update(&InputSnapshot::default());
            assert!(motion.drag >= 0.0, "decay must not flip sign");
            assert!(cam.drag_inertia() <= previous);
            previous = cam.drag_inertia();
        }

        assert_eq!(cam.drag_inertia(), 0.0);
    }

    #[test]
    fn test_backward_release_decays_to_zero() {
        let mut cam = camera();
        let input = InputSnapshot {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..50 {
            cam.update(&input);
        }
        assert!(cam.turn_inertia() < 0.0);

        let tuning = *cam.tuning();
        for _ in 0..glide_frames(tuning.cruise_celerity, tuning.consume_backward) {
            let motion = cam.update(&InputSnapshot::default());
            assert!(motion.turn <= 0.0);
        }
        assert_eq!(cam.turn_inertia(), 0.0);
    }

    #[test]
    fn test_hold_five_then_release() {
        let mut cam = camera();
        let tuning = *cam.tuning();
        let celerity = tuning.cruise_celerity;

        // The constants must allow reaching the cap within five frames
        assert!(5.0 * tuning.produce_forward * celerity + 4.0 * tuning.consume_forward >= celerity);

        let mut drags = Vec::new();
        for _ in 0..5 {
            drags.push(cam.update(&forward()).drag);
        }
        assert_eq!(drags[4], celerity, "drag at frame 5: {drags:?}");

        let frames = glide_frames(celerity, tuning.consume_forward);
        let mut released = Vec::new();
        for _ in 0..frames {
            released.push(cam.update(&InputSnapshot::default()).drag);
        }

        assert!(released.windows(2).all(|w| w[1] <= w[0]));
        assert!(released[0] < celerity);
        assert_eq!(*released.last().unwrap(), 0.0);
    }

    #[test]
    fn test_turbo_diagonal_celerity() {
        let mut cam = camera();
        let turbo = cam.tuning().turbo_celerity;
        let motion = cam.update(&InputSnapshot {
            move_up: true,
            move_left: true,
            move_turbo: true,
            ..Default::default()
        });
        assert_eq!(motion.celerity, turbo / 2f64.sqrt());
    }

    #[test]
    fn test_diagonal_matches_axis_aligned_speed() {
        let mut straight = camera();
        let mut diagonal = camera();
        let diagonal_input = InputSnapshot {
            move_up: true,
            move_right: true,
            ..Default::default()
        };

        for _ in 0..50 {
            straight.update(&forward());
            diagonal.update(&diagonal_input);
        }
        let straight_motion = straight.update(&forward());
        let diagonal_motion = diagonal.update(&diagonal_input);

        let straight_speed = straight_motion.drag.abs();
        let diagonal_speed = diagonal_motion.drag.hypot(diagonal_motion.turn);
        assert!((straight_speed - diagonal_speed).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut cam = camera();
        let motion = cam.update(&InputSnapshot {
            move_up: true,
            move_down: true,
            ..Default::default()
        });
        assert!(motion.drag.abs() < 1e-12);
    }
}

#[cfg(test)]
mod composition_tests {
    use super::*;

    #[test]
    fn test_composition_is_deterministic() {
        let eye = Vec3::new(0.3, -1.7, 12.25);
        let target = Vec3::new(-0.4, 2.1, 0.05);

        let a = compose_view_matrix(eye, target);
        let b = compose_view_matrix(eye, target);
        assert_eq!(a.to_cols_array().map(f32::to_bits), b.to_cols_array().map(f32::to_bits));
    }

    #[test]
    fn test_identical_input_gives_identical_views() {
        let mut a = camera();
        let mut b = camera();
        let input = InputSnapshot {
            move_up: true,
            move_left: true,
            move_turbo: true,
            look_delta_x: 0.1,
            look_delta_y: 0.05,
            ..Default::default()
        };

        for _ in 0..20 {
            a.update(&input);
            b.update(&input);
        }
        assert_eq!(a.view_matrix(), b.view_matrix());
    }

    #[test]
    fn test_view_is_rebuilt_from_state() {
        let mut cam = camera();
        for _ in 0..10 {
            cam.update(&InputSnapshot {
                move_down: true,
                look_delta_x: -0.2,
                ..Default::default()
            });
            assert_eq!(cam.view_matrix(), compose_view_matrix(cam.eye(), cam.target()));
        }
    }

    #[test]
    fn test_forward_travel_uses_previous_pitch() {
        let mut cam = camera();
        let start = cam.eye();
        let celerity = cam.tuning().cruise_celerity;
        let step = cam.tuning().produce_forward * celerity;

        // Pitch changes this frame, but travel still uses the old (level) pitch
        cam.update(&InputSnapshot {
            move_up: true,
            look_delta_y: 0.25,
            ..Default::default()
        });
        assert!(((cam.eye().z - start.z) as f64 - step).abs() < 1e-6);

        // Next frame travel is scaled by cos(pitch) of the steep look
        let z = cam.eye().z;
        let motion = cam.update(&InputSnapshot {
            move_up: true,
            look_delta_y: 0.25,
            ..Default::default()
        });
        let expected = motion.drag * f64::from(-0.25 * std::f32::consts::TAU).cos();
        assert!(((cam.eye().z - z) as f64 - expected).abs() < 1e-6);
        assert!(((cam.eye().z - z) as f64).abs() < 1e-6);
    }

    #[test]
    fn test_roll_is_never_modified() {
        let config = CameraConfig {
            default_target: [0.0, 0.0, 0.5],
            ..Default::default()
        };
        let mut cam = Camera::initialize(&DetachedUniforms, &config);
        for _ in 0..5 {
            cam.update(&InputSnapshot {
                look_delta_x: 0.4,
                look_delta_y: -0.4,
                ..Default::default()
            });
        }
        assert_eq!(cam.target().z, 0.5);
    }
}
