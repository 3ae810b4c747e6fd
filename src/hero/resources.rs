use bevy::prelude::*;
use motiongen::backdrop::ParallaxBackdrop;
use motiongen::scene::{MotionScene, ScenePacket};
use motiongen::{MotionConfig, tools};

pub const CONFIG_PATH: &str = "motion_config.toml";

/// The motion engine instance driving the hero background.
#[derive(Resource)]
pub struct HeroScene {
    pub scene: MotionScene,
}

/// Parallax layers; advanced by scroll, not by the frame clock.
#[derive(Resource)]
pub struct HeroBackdrop {
    pub backdrop: ParallaxBackdrop,
}

/// Latest pointer position in canvas space (origin top-left, y down).
/// Written by the input system, read at tick time; last write wins.
#[derive(Resource, Default)]
pub struct PointerState {
    pub position: Vec2,
}

/// Accumulated wheel scroll standing in for page scroll.
#[derive(Resource, Default)]
pub struct ScrollState {
    pub offset: f32,
}

/// Window size as of the previous tick, for resize detection.
#[derive(Resource)]
pub struct ViewportState {
    pub size: Vec2,
}

/// Draw instructions produced by the latest tick.
#[derive(Resource, Default)]
pub struct LatestPacket {
    pub packet: ScenePacket,
}

/// Request a full scene rebuild (new seed or reshaped config).
#[derive(Message)]
pub struct RebuildScene;

/// Live-tunable copy of the engine configuration plus the session seed.
#[derive(Resource)]
pub struct HeroSettings {
    pub config: MotionConfig,
    pub user_seed: u32,
    pub seed: u64,
}

impl Default for HeroSettings {
    fn default() -> Self {
        let config = MotionConfig::load_from_file(CONFIG_PATH).unwrap_or_else(|err| {
            warn!("falling back to default motion config: {}", err);
            MotionConfig::default()
        });
        let user_seed = tools::generate_seed8();
        Self {
            config,
            user_seed,
            seed: tools::expand_seed64(user_seed),
        }
    }
}
