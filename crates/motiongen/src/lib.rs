pub mod backdrop;
pub mod config;
pub mod noise;
pub mod rect;
pub mod ribbon;
pub mod scene;
pub mod sprite;
pub mod tools;
pub mod wind;

pub use config::MotionConfig;
pub use scene::{FrameInput, MotionScene, ScenePacket};
