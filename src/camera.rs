use glam::{Mat4, Vec3, Vec4};

use crate::config::CameraConfig;
use crate::core::controller::InputSnapshot;
use crate::core::uniform::UniformBinder;
use crate::inertia::{produce, InertiaTuning};

/// Name the scene shader exposes the view matrix under
pub const CAMERA_UNIFORM_NAME: &str = "camera_uniform";

/// Radians of look per unit of normalized look input
pub const LOOK_SCALE: f32 = std::f32::consts::TAU;

/// Constant correction every view starts from: mirrors the Y axis
pub fn base_matrix() -> Mat4 {
    Mat4::from_diagonal(Vec4::new(1.0, -1.0, 1.0, 1.0))
}

/// Build a view matrix from scratch: base, then translate, then rotate X, Y, Z.
pub fn compose_view_matrix(eye: Vec3, target: Vec3) -> Mat4 {
    base_matrix()
        * Mat4::from_translation(eye)
        * Mat4::from_rotation_x(target.x)
        * Mat4::from_rotation_y(target.y)
        * Mat4::from_rotation_z(target.z)
}

/// Per-frame result of [`Camera::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMotion {
    /// Speed cap used for production this frame
    pub celerity: f64,
    /// Drag momentum handed out this frame, before pitch coupling
    pub drag: f64,
    /// Turn momentum handed out this frame
    pub turn: f64,
}

/// Inertial first-person camera
///
/// `H` is the uniform handle type of the binder the camera was initialized
/// against.
#[derive(Debug, Clone)]
pub struct Camera<H> {
    view: Mat4,
    uniform: H,
    eye: Vec3,
    target: Vec3,
    drag_inertia: f64,
    turn_inertia: f64,
    tuning: InertiaTuning,
    default_eye: Vec3,
    default_target: Vec3,
}

impl<H: Copy + std::fmt::Debug> Camera<H> {
    /// Resolve the camera uniform and place the camera at its defaults
    pub fn initialize<B>(binder: &B, config: &CameraConfig) -> Self
    where
        B: UniformBinder<Handle = H>,
    {
        let uniform = binder.resolve_uniform(CAMERA_UNIFORM_NAME);
        let eye = config.default_eye();
        let target = config.default_target();

        log::debug!("Camera initialized at eye {eye} target {target}, uniform {uniform:?}");

        Self {
            view: compose_view_matrix(eye, target),
            uniform,
            eye,
            target,
            drag_inertia: 0.0,
            turn_inertia: 0.0,
            tuning: config.inertia,
            default_eye: eye,
            default_target: target,
        }
    }

    /// Run one frame: produce momentum from held keys, consume it into the
    /// eye position, take the look angles from input and rebuild the view.
    pub fn update(&mut self, input: &InputSnapshot) -> FrameMotion {
        let tuning = self.tuning;
        let celerity = tuning.celerity(input);

        if input.move_up {
            produce(&mut self.drag_inertia, tuning.produce_forward, celerity);
        }
        if input.move_down {
            produce(&mut self.drag_inertia, tuning.produce_backward, celerity);
        }
        if input.move_left {
            produce(&mut self.turn_inertia, tuning.produce_forward, celerity);
        }
        if input.move_right {
            produce(&mut self.turn_inertia, tuning.produce_backward, celerity);
        }

        // Pitch from the previous frame couples forward travel to the view
        let pitch = f64::from(self.target.x);
        let drag = tuning.consume(&mut self.drag_inertia);
        let turn = tuning.consume(&mut self.turn_inertia);

        self.eye.z += (drag * pitch.cos()) as f32;
        self.eye.x += turn as f32;

        // Absolute, not integrated; roll is never touched
        self.target.x = -input.look_delta_y * LOOK_SCALE;
        self.target.y = input.look_delta_x * LOOK_SCALE;

        self.view = compose_view_matrix(self.eye, self.target);

        log::trace!(
            "celerity {celerity:.4} drag {drag:.4} turn {turn:.4} eye {} target {}",
            self.eye,
            self.target
        );

        FrameMotion {
            celerity,
            drag,
            turn,
        }
    }

    /// Put eye and target back at their defaults, keeping any momentum
    pub fn reset(&mut self) {
        self.eye = self.default_eye;
        self.target = self.default_target;
        log::debug!("Camera recentered");
    }

    /// Upload the current view matrix
    pub fn bind<B>(&self, binder: &B)
    where
        B: UniformBinder<Handle = H>,
    {
        binder.upload_matrix(self.uniform, &self.view);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn drag_inertia(&self) -> f64 {
        self.drag_inertia
    }

    pub fn turn_inertia(&self) -> f64 {
        self.turn_inertia
    }

    pub fn uniform(&self) -> H {
        self.uniform
    }

    pub fn tuning(&self) -> &InertiaTuning {
        &self.tuning
    }
}
