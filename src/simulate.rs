//! Headless replay of scripted input through the camera's frame cycle.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::config::CameraConfig;
use crate::core::controller::InputSnapshot;
use crate::core::uniform::DetachedUniforms;
use crate::inertia::InertiaTuning;

/// A run of identical frames
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptStep {
    pub frames: u32,
    pub input: InputSnapshot,
    /// Recenter the camera before the first frame of this step
    pub recenter: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid script {}", path.display()))
    }

    /// Hold forward for five frames, then let go until the camera comes to rest
    pub fn hold_then_glide(config: &CameraConfig) -> Self {
        let tuning = &config.inertia;
        let glide = InertiaTuning::glide_frames(tuning.cruise_celerity, tuning.consume_forward);

        Self {
            steps: vec![
                ScriptStep {
                    frames: 5,
                    input: InputSnapshot {
                        move_up: true,
                        ..Default::default()
                    },
                    recenter: false,
                },
                ScriptStep {
                    frames: glide,
                    ..Default::default()
                },
            ],
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.frames)).sum()
    }
}

/// Camera state after one simulated frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub celerity: f64,
    pub drag: f64,
    pub turn: f64,
    pub drag_inertia: f64,
    pub turn_inertia: f64,
    pub eye: [f32; 3],
    pub target: [f32; 3],
}

/// Run every step of the script against a fresh camera, handing each
/// frame to `visit` as soon as it is produced. Stops at the first error.
///
/// Returns the number of frames simulated.
pub fn replay<F>(script: &Script, config: &CameraConfig, mut visit: F) -> anyhow::Result<u64>
where
    F: FnMut(FrameRecord) -> anyhow::Result<()>,
{
    let binder = DetachedUniforms;
    let mut camera = Camera::initialize(&binder, config);
    let mut frame = 0u64;

    for step in &script.steps {
        if step.recenter {
            camera.reset();
        }

        for _ in 0..step.frames {
            let motion = camera.update(&step.input);
            camera.bind(&binder);
            frame += 1;

            visit(FrameRecord {
                frame,
                celerity: motion.celerity,
                drag: motion.drag,
                turn: motion.turn,
                drag_inertia: camera.drag_inertia(),
                turn_inertia: camera.turn_inertia(),
                eye: camera.eye().to_array(),
                target: camera.target().to_array(),
            })?;
        }
    }

    log::info!("Simulated {frame} frames");
    Ok(frame)
}

/// Collect every frame of a replay
pub fn run(script: &Script, config: &CameraConfig) -> anyhow::Result<Vec<FrameRecord>> {
    let mut records = Vec::new();
    replay(script, config, |record| {
        records.push(record);
        Ok(())
    })?;
    Ok(records)
}

/// Replay the script, writing one JSON line per frame
pub fn stream<W: Write>(script: &Script, config: &CameraConfig, mut out: W) -> anyhow::Result<u64> {
    let frames = replay(script, config, |record| {
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
        Ok(())
    })?;
    out.flush()?;
    Ok(frames)
}
