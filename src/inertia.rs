//! Momentum accumulators for camera movement.
//!
//! Held keys produce inertia up to the current celerity; every frame the
//! accumulators are consumed, which hands out the displacement for that frame
//! and bleeds a fixed amount of momentum back toward zero.

use serde::{Deserialize, Serialize};

use crate::core::controller::InputSnapshot;

pub const CELERITY_CRUISE: f64 = 0.05;
pub const CELERITY_TURBO: f64 = 0.25;

/// Fraction of the celerity added per frame while a key is held
pub const PRODUCE_FORWARD: f64 = 0.25;
pub const PRODUCE_BACKWARD: f64 = -0.25;

/// Absolute decay applied per frame to positive and negative momentum
pub const CONSUME_FORWARD: f64 = -0.0025;
pub const CONSUME_BACKWARD: f64 = 0.0025;

/// Longest glide to rest a tuning may ask for
pub const MAX_GLIDE_FRAMES: u32 = 1_000_000;

/// Production and decay constants for both accumulators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaTuning {
    pub cruise_celerity: f64,
    pub turbo_celerity: f64,
    pub produce_forward: f64,
    pub produce_backward: f64,
    pub consume_forward: f64,
    pub consume_backward: f64,
}

impl Default for InertiaTuning {
    fn default() -> Self {
        Self {
            cruise_celerity: CELERITY_CRUISE,
            turbo_celerity: CELERITY_TURBO,
            produce_forward: PRODUCE_FORWARD,
            produce_backward: PRODUCE_BACKWARD,
            consume_forward: CONSUME_FORWARD,
            consume_backward: CONSUME_BACKWARD,
        }
    }
}

impl InertiaTuning {
    /// Pick this frame's speed cap from the held keys.
    ///
    /// Turbo selects the fast tier. Holding one key on each axis divides the
    /// cap by √2 so diagonal travel is no faster than straight travel.
    pub fn celerity(&self, input: &InputSnapshot) -> f64 {
        let mut celerity = if input.move_turbo {
            self.turbo_celerity
        } else {
            self.cruise_celerity
        };

        if input.is_diagonal() {
            celerity /= std::f64::consts::SQRT_2;
        }

        celerity
    }

    /// Frames of pure decay that bring a full `celerity` back to rest,
    /// including the frame that hands out the last non-zero displacement.
    /// Saturates at `MAX_GLIDE_FRAMES + 1`.
    pub fn glide_frames(celerity: f64, decay: f64) -> u32 {
        let steps = (celerity / decay.abs()).ceil();
        // `as` saturates and maps NaN to zero
        (steps.min(f64::from(MAX_GLIDE_FRAMES)) as u32).saturating_add(1)
    }

    /// Decay one accumulator and return the displacement it held.
    pub fn consume(&self, inertia: &mut f64) -> f64 {
        consume(inertia, self.consume_forward, self.consume_backward)
    }
}

/// Add `increment * celerity` to the accumulator, capped at `±celerity`.
pub fn produce(inertia: &mut f64, increment: f64, celerity: f64) {
    *inertia = (*inertia + increment * celerity).clamp(-celerity, celerity);
}

/// Return the current momentum, then move the stored value toward zero.
///
/// Positive momentum receives `decay_forward` (negative), negative momentum
/// receives `decay_backward` (positive). A step that would cross zero lands
/// on zero instead.
pub fn consume(inertia: &mut f64, decay_forward: f64, decay_backward: f64) -> f64 {
    let value = *inertia;

    if value > 0.0 {
        *inertia = (value + decay_forward).max(0.0);
    } else if value < 0.0 {
        *inertia = (value + decay_backward).min(0.0);
    }

    value
}
